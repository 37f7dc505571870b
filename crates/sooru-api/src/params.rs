use crate::ApiError;
use std::collections::BTreeMap;

/// Plot size from `plotWidth`/`plotLength` (snake_case spellings accepted).
/// Range checks are left to the layout crate.
pub fn parse_plot_params(query: &BTreeMap<String, String>) -> Result<(f64, f64), ApiError> {
    let width = parse_number(query, &["plotWidth", "plot_width"])?;
    let length = parse_number(query, &["plotLength", "plot_length"])?;
    Ok((width, length))
}

fn parse_number(query: &BTreeMap<String, String>, names: &[&str]) -> Result<f64, ApiError> {
    let Some((name, raw)) = names
        .iter()
        .find_map(|name| query.get(*name).map(|raw| (*name, raw)))
    else {
        return Err(ApiError::missing_param(names[0]));
    };
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| ApiError::invalid_param(name, raw))?;
    if !value.is_finite() {
        return Err(ApiError::invalid_param(name, raw));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ApiErrorCode;

    fn query(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn camel_and_snake_case_names_are_accepted() {
        assert_eq!(
            parse_plot_params(&query(&[("plotWidth", "60"), ("plotLength", "40")])).expect("plot"),
            (60.0, 40.0)
        );
        assert_eq!(
            parse_plot_params(&query(&[("plot_width", "25.5"), ("plot_length", " 30 ")])).expect("plot"),
            (25.5, 30.0)
        );
    }

    #[test]
    fn missing_or_garbled_numbers_are_parameter_errors() {
        let err = parse_plot_params(&query(&[("plotWidth", "60")])).expect_err("missing");
        assert_eq!(err.code, ApiErrorCode::InvalidQueryParameter);
        assert!(err.message.contains("plotLength"));
        let err = parse_plot_params(&query(&[("plotWidth", "wide"), ("plotLength", "40")]))
            .expect_err("garbled");
        assert_eq!(err.details["field_errors"][0]["value"], "wide");
        assert!(parse_plot_params(&query(&[("plotWidth", "inf"), ("plotLength", "40")])).is_err());
    }
}
