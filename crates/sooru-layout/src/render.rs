use std::fmt::Write as _;

use sooru_model::{Dimensions, Room};

/// Pixels per plot unit.
pub const SVG_SCALE: f64 = 20.0;

/// Draw the plot boundary and one labelled rectangle per room.
#[must_use]
pub fn render_svg(plot: &Dimensions, rooms: &[Room]) -> String {
    let width = plot.width * SVG_SCALE;
    let height = plot.length * SVG_SCALE;
    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg viewBox="0 0 {width} {height}" xmlns="http://www.w3.org/2000/svg">"#
    );
    let _ = writeln!(
        out,
        r#"  <rect width="{width}" height="{height}" fill="none" stroke="black"/>"#
    );
    for room in rooms {
        let x = room.position.x * SVG_SCALE;
        let y = room.position.y * SVG_SCALE;
        let w = room.dimensions.width * SVG_SCALE;
        let h = room.dimensions.length * SVG_SCALE;
        let _ = writeln!(
            out,
            r#"  <rect x="{x}" y="{y}" width="{w}" height="{h}" fill="none" stroke="black"/>"#
        );
        let _ = writeln!(
            out,
            r#"  <text x="{}" y="{}" text-anchor="middle" dominant-baseline="middle">{}</text>"#,
            x + w / 2.0,
            y + h / 2.0,
            escape_xml(&room.name)
        );
    }
    out.push_str("</svg>\n");
    out
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use sooru_core::RoomId;
    use sooru_model::{Position, RoomType};

    #[test]
    fn svg_scales_plot_and_rooms_by_twenty() {
        let room = Room::new(
            RoomId::from_seq(1),
            "Bedroom 1",
            RoomType::Bedroom,
            Dimensions::new(4.0, 4.0),
            Position::new(4.0, 0.0),
        );
        let svg = render_svg(&Dimensions::new(30.0, 20.0), &[room]);
        assert!(svg.starts_with(r#"<svg viewBox="0 0 600 400""#));
        assert!(svg.contains(r#"<rect x="80" y="0" width="80" height="80""#));
        assert!(svg.contains(r#"<text x="120" y="40" text-anchor="middle" dominant-baseline="middle">Bedroom 1</text>"#));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn room_names_are_escaped() {
        assert_eq!(escape_xml(r#"Tom & "Jerry" <den>"#), "Tom &amp; &quot;Jerry&quot; &lt;den&gt;");
    }
}
