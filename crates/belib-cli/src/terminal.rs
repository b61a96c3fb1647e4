//! Terminal styling and color utilities.
//!
//! ANSI escape codes are only emitted when stdout is an interactive terminal
//! and the environment does not opt out of color.

use std::io::IsTerminal;

/// ANSI escape codes for text styling and colors.
pub mod colors {
    /// Reset all styling.
    pub const RESET: &str = "\x1b[0m";
    /// Bright bold white for station names.
    pub const WHITE_BOLD: &str = "\x1b[1;97m";
    /// Gray for secondary details (coordinates, hints).
    pub const GRAY: &str = "\x1b[90m";
    /// Green for stations in service.
    pub const GREEN: &str = "\x1b[32m";
    /// Yellow for maintenance and other non-service statuses.
    pub const YELLOW: &str = "\x1b[33m";
    /// Cyan for distances and durations.
    pub const CYAN: &str = "\x1b[36m";
}

/// Resolved color codes, either ANSI sequences or empty strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPalette {
    pub reset: &'static str,
    pub white_bold: &'static str,
    pub gray: &'static str,
    pub green: &'static str,
    pub yellow: &'static str,
    pub cyan: &'static str,
}

impl ColorPalette {
    #[must_use]
    pub const fn colored() -> Self {
        Self {
            reset: colors::RESET,
            white_bold: colors::WHITE_BOLD,
            gray: colors::GRAY,
            green: colors::GREEN,
            yellow: colors::YELLOW,
            cyan: colors::CYAN,
        }
    }

    /// Palette with every code empty.
    #[must_use]
    pub const fn plain() -> Self {
        Self {
            reset: "",
            white_bold: "",
            gray: "",
            green: "",
            yellow: "",
            cyan: "",
        }
    }

    /// Colored when stdout is a terminal that accepts ANSI codes.
    #[must_use]
    pub fn detect() -> Self {
        if supports_color() && std::io::stdout().is_terminal() {
            Self::colored()
        } else {
            Self::plain()
        }
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::detect()
    }
}

/// Check if the environment allows ANSI color codes.
///
/// Respects `NO_COLOR` (https://no-color.org/) and `TERM=dumb`.
#[must_use]
pub fn supports_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if let Ok(term) = std::env::var("TERM") {
        if term.eq_ignore_ascii_case("dumb") {
            return false;
        }
    }
    true
}

/// Format a distance in meters as `850 m` or `2.73 km`.
#[must_use]
pub fn format_distance(meters: f64) -> String {
    let rounded = meters.round();
    if rounded < 1000.0 {
        format!("{rounded:.0} m")
    } else {
        format!("{:.2} km", meters / 1000.0)
    }
}

/// Format a duration in seconds as `45 s`, `7 min` or `1 h 05 min`.
#[must_use]
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.round().max(0.0) as u64;
    if total < 60 {
        return format!("{total} s");
    }
    let minutes = (total + 30) / 60;
    if minutes < 60 {
        format!("{minutes} min")
    } else {
        format!("{} h {:02} min", minutes / 60, minutes % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_palette_is_empty() {
        let palette = ColorPalette::plain();
        assert!(palette.reset.is_empty());
        assert!(palette.green.is_empty());
    }

    #[test]
    fn distances_switch_to_kilometres() {
        assert_eq!(format_distance(26.4), "26 m");
        assert_eq!(format_distance(999.4), "999 m");
        assert_eq!(format_distance(999.6), "1.00 km");
        assert_eq!(format_distance(999.99), "1.00 km");
        assert_eq!(format_distance(2734.6), "2.73 km");
    }

    #[test]
    fn durations_round_to_minutes() {
        assert_eq!(format_duration(42.2), "42 s");
        assert_eq!(format_duration(412.3), "7 min");
        assert_eq!(format_duration(3_900.0), "1 h 05 min");
    }
}
