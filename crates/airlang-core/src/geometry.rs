//! AIRlang geometry and altitude literals
//!
//! Pure conversions from record altitudes and coordinate strings into the
//! literal forms the DSL grammar accepts. Conversions never fail: a
//! coordinate that does not match the grammar passes through with the
//! locator suffix appended, and callers decide whether that deserves a
//! diagnostic.

use notam_types::CircleDefinition;
use once_cell::sync::Lazy;
use regex::Regex;

/// Coordinate text: 4 latitude digits + N|S + 5 longitude digits + E|W,
/// with optional trailing seconds digits on either axis.
static COORDINATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})\d*([NS])(\d{5})\d*([EW])$").expect("valid pattern"));

/// Locator-flag suffix required by the coordinate literal grammar.
const COORDINATE_SUFFIX: &str = "+A+P";

/// Continuation indent for polygon coordinates inside an area block.
const POLYGON_INDENT: &str = "            ";

/// Altitude in feet as a flight level: `FL` + zero-padded hundreds.
pub fn feet_to_flight_level(feet: f64) -> String {
    format!("FL{:03}", (feet / 100.0).round() as i64)
}

/// Flight level for a lower bound.
///
/// The DSL has no representation for a surface-contiguous lower bound, so
/// `FL000` is substituted with the nearest representable level above
/// ground.
pub fn lower_flight_level(feet: f64) -> String {
    let fl = feet_to_flight_level(feet);
    if fl == "FL000" {
        "FL001".to_string()
    } else {
        fl
    }
}

/// Coordinate literal when the input matches the grammar: degrees and
/// minutes kept, trailing seconds digits discarded, locator suffix
/// appended.
pub fn try_format_coordinate(coord: &str) -> Option<String> {
    let caps = COORDINATE_RE.captures(coord)?;
    Some(format!(
        "{}{}{}{}{}",
        &caps[1], &caps[2], &caps[3], &caps[4], COORDINATE_SUFFIX
    ))
}

/// Coordinate literal with best-effort fallback: unmatched input passes
/// through unchanged with the suffix appended.
pub fn format_coordinate(coord: &str) -> String {
    try_format_coordinate(coord).unwrap_or_else(|| format!("{coord}{COORDINATE_SUFFIX}"))
}

/// `POLYGON(...)` literal, one coordinate per continuation line.
pub fn render_polygon(coords: &[String]) -> String {
    let joined = coords
        .iter()
        .map(|c| format_coordinate(c))
        .collect::<Vec<_>>()
        .join(&format!(",\n{POLYGON_INDENT}"));
    format!("POLYGON({joined})")
}

/// `CIRCLE(center, radius NM)` literal.
pub fn render_circle(circle: &CircleDefinition) -> String {
    format!(
        "CIRCLE({}, {} NM)",
        format_coordinate(&circle.center),
        circle.radius_nm
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn flight_level_encoding() {
        assert_eq!(feet_to_flight_level(0.0), "FL000");
        assert_eq!(feet_to_flight_level(25000.0), "FL250");
        assert_eq!(feet_to_flight_level(2500.0), "FL025");
        assert_eq!(feet_to_flight_level(99900.0), "FL999");
    }

    #[test]
    fn surface_lower_bound_clamps_to_fl001() {
        assert_eq!(lower_flight_level(0.0), "FL001");
        assert_eq!(lower_flight_level(49.0), "FL001"); // rounds to FL000 first
        assert_eq!(lower_flight_level(2500.0), "FL025");
    }

    #[test]
    fn coordinate_discards_seconds_digits() {
        assert_eq!(
            format_coordinate("380930N0013321W"),
            "3809N00133W+A+P".to_string()
        );
        assert_eq!(
            format_coordinate("3809N00133W"),
            "3809N00133W+A+P".to_string()
        );
    }

    #[test]
    fn unmatched_coordinate_passes_through() {
        assert_eq!(try_format_coordinate("somewhere"), None);
        assert_eq!(format_coordinate("somewhere"), "somewhere+A+P");
    }

    #[test]
    fn polygon_rendering_aligns_continuation_lines() {
        let coords = vec!["380930N0013321W".to_string(), "404040N0030303W".to_string()];
        assert_eq!(
            render_polygon(&coords),
            "POLYGON(3809N00133W+A+P,\n            4040N00303W+A+P)"
        );
    }

    #[test]
    fn circle_rendering_keeps_fractional_radius() {
        let circle = CircleDefinition {
            center: "380930N0013321W".to_string(),
            radius_nm: 4.5,
        };
        assert_eq!(render_circle(&circle), "CIRCLE(3809N00133W+A+P, 4.5 NM)");

        let whole = CircleDefinition {
            center: "380930N0013321W".to_string(),
            radius_nm: 5.0,
        };
        assert_eq!(render_circle(&whole), "CIRCLE(3809N00133W+A+P, 5 NM)");
    }
}
