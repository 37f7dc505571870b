// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use sooru_core::{ProjectId, UserId};

use crate::ValidationError;

pub const CODE_PREFIX_LEN: usize = 3;
pub const PASSWORD_MIN_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Project {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProjectId>,
    #[serde(default)]
    pub code: String,
    pub name: String,
    pub owner: UserId,
    #[serde(default)]
    pub created_at_ms: u64,
    #[serde(default)]
    pub updated_at_ms: u64,
    #[serde(default)]
    pub version: u64,
}

impl Project {
    #[must_use]
    pub fn new(name: impl Into<String>, owner: UserId) -> Self {
        Self {
            id: None,
            code: String::new(),
            name: name.into().trim().to_string(),
            owner,
            created_at_ms: 0,
            updated_at_ms: 0,
            version: 0,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name("project name", &self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    #[serde(default)]
    pub code: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub created_at_ms: u64,
    #[serde(default)]
    pub updated_at_ms: u64,
    #[serde(default)]
    pub version: u64,
}

impl User {
    /// Build an unsaved user. The password must already be hashed.
    pub fn new(
        name: &str,
        email: &str,
        password_hash: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        validate_name("name", name)?;
        Ok(Self {
            id: None,
            code: String::new(),
            name: name.trim().to_string(),
            email: normalize_email(email)?,
            password_hash: password_hash.into(),
            created_at_ms: 0,
            updated_at_ms: 0,
            version: 0,
        })
    }
}

pub fn validate_name(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError(format!("{field} is required")));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(ValidationError(format!(
            "password must be at least {PASSWORD_MIN_LEN} characters"
        )));
    }
    Ok(())
}

/// Trim and lowercase an address, then check it has the `local@domain.tld` shape.
pub fn normalize_email(input: &str) -> Result<String, ValidationError> {
    let email = input.trim().to_ascii_lowercase();
    let invalid = || ValidationError("please enter a valid email".to_string());
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if !is_word_run(local) || !is_word_run(domain) {
        return Err(invalid());
    }
    let tld = domain.rsplit_once('.').map(|(_, tld)| tld).ok_or_else(invalid)?;
    if !(2..=3).contains(&tld.len()) {
        return Err(invalid());
    }
    Ok(email)
}

// Word characters separated by single `.` or `-`.
fn is_word_run(value: &str) -> bool {
    !value.is_empty()
        && value.split(['.', '-']).all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}

/// First three alphanumeric characters of `name`, uppercased, padded with `X`.
#[must_use]
pub fn code_prefix(name: &str) -> String {
    let mut prefix: String = name
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(CODE_PREFIX_LEN)
        .map(|c| c.to_ascii_uppercase())
        .collect();
    while prefix.len() < CODE_PREFIX_LEN {
        prefix.push('X');
    }
    prefix
}

#[must_use]
pub fn format_code(prefix: &str, seq: u32) -> String {
    format!("{prefix}{seq:03}")
}

/// Next code for `name` given the codes already issued (any prefix).
#[must_use]
pub fn next_sequential_code<'a>(name: &str, existing: impl IntoIterator<Item = &'a str>) -> String {
    let prefix = code_prefix(name);
    let last = existing
        .into_iter()
        .filter_map(|code| code.strip_prefix(prefix.as_str()))
        .filter(|rest| rest.len() >= 3 && rest.chars().all(|c| c.is_ascii_digit()))
        .filter_map(|rest| rest.parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    format_code(&prefix, last + 1)
}
