//! Parsing of the duration text shown on the routing page.
//!
//! The page renders durations as whitespace-separated tokens:
//!
//! * `"45 min"`: minutes only
//! * `"2 h"`: whole hours
//! * `"1 h 30 min"`: hours then minutes

use trip_dataset_models::ExtractionFailure;

/// Converts a rendered duration into total minutes.
///
/// With exactly two tokens the second is the unit: `minutes_token` means
/// minutes, anything else is taken as hours. With more than two tokens the
/// first is hours and the third is minutes.
///
/// # Errors
///
/// Returns [`ExtractionFailure::Parse`] if there are fewer than two tokens,
/// a numeric token is not a non-negative integer, or the total overflows.
pub fn parse_duration(text: &str, minutes_token: &str) -> Result<u32, ExtractionFailure> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let unparsable = || ExtractionFailure::Parse {
        text: text.to_string(),
    };
    let number = |index: usize| -> Result<u32, ExtractionFailure> {
        tokens
            .get(index)
            .and_then(|token| token.parse::<u32>().ok())
            .ok_or_else(unparsable)
    };

    let minutes = match tokens.len() {
        2 if tokens[1] == minutes_token => Some(number(0)?),
        2 => number(0)?.checked_mul(60),
        n if n > 2 => number(0)?
            .checked_mul(60)
            .and_then(|hours| hours.checked_add(number(2).ok()?)),
        _ => None,
    };

    minutes.ok_or_else(unparsable)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minutes_only() {
        assert_eq!(parse_duration("45 min", "min").unwrap(), 45);
    }

    #[test]
    fn parses_whole_hours() {
        assert_eq!(parse_duration("2 h", "min").unwrap(), 120);
    }

    #[test]
    fn parses_hours_and_minutes() {
        assert_eq!(parse_duration("1 h 30 min", "min").unwrap(), 90);
    }

    #[test]
    fn parses_hours_and_minutes_without_trailing_unit() {
        assert_eq!(parse_duration("3 h 5", "min").unwrap(), 185);
    }

    #[test]
    fn tolerates_non_breaking_spaces_and_padding() {
        assert_eq!(parse_duration("  5\u{a0}h\u{a0}12\u{a0}min\n", "min").unwrap(), 312);
    }

    #[test]
    fn respects_configured_minutes_token() {
        assert_eq!(parse_duration("20 mins", "mins").unwrap(), 20);
        assert_eq!(parse_duration("20 mins", "min").unwrap(), 1200);
    }

    #[test]
    fn rejects_single_token() {
        let err = parse_duration("45", "min").unwrap_err();
        assert_eq!(
            err,
            ExtractionFailure::Parse {
                text: "45".to_string()
            }
        );
    }

    #[test]
    fn rejects_empty_text() {
        assert!(matches!(
            parse_duration("", "min"),
            Err(ExtractionFailure::Parse { .. })
        ));
    }

    #[test]
    fn rejects_non_numeric_tokens() {
        assert!(parse_duration("quelques min", "min").is_err());
        assert!(parse_duration("1 h trente min", "min").is_err());
        assert!(parse_duration("-5 min", "min").is_err());
    }

    #[test]
    fn rejects_overflowing_hours() {
        assert!(parse_duration("4294967295 h", "min").is_err());
    }
}
