//! Directive grammar
//!
//! Two message forms:
//!
//! - `home` (case-insensitive, surrounding whitespace ignored): return to
//!   the recorded start position.
//! - `x,y,z`: a 3D target. Tokens are split on commas, semicolons and
//!   spaces; empty tokens are discarded; at least three numeric tokens are
//!   required and only the first three are read.
//!
//! Decode failures are non-fatal: the consumer logs them and moves on to the
//! next queued message.

use core::fmt;

use nalgebra::Vector3;

/// Decoded target directive
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TargetDirective {
    /// Append a 3D target to the follower's list
    SetTarget(Vector3<f32>),
    /// Clear the list and return to the recorded start position
    ReturnHome,
}

/// Why a message failed to decode
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// Message was empty after trimming
    Empty,
    /// Fewer than three coordinate tokens
    MissingCoordinates {
        /// Tokens actually present
        found: usize,
    },
    /// One of the first three tokens failed numeric parsing
    InvalidCoordinate {
        /// Zero-based token index
        index: usize,
    },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Empty => write!(f, "empty message"),
            DecodeError::MissingCoordinates { found } => {
                write!(f, "expected 3 coordinates, found {} token(s)", found)
            }
            DecodeError::InvalidCoordinate { index } => {
                write!(f, "coordinate token {} is not a number", index)
            }
        }
    }
}

/// Decode one raw message into a directive
pub fn decode(message: &str) -> Result<TargetDirective, DecodeError> {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        return Err(DecodeError::Empty);
    }
    if trimmed.eq_ignore_ascii_case("home") {
        return Ok(TargetDirective::ReturnHome);
    }

    let tokens: Vec<&str> = trimmed
        .split(|c| c == ',' || c == ';' || c == ' ')
        .filter(|token| !token.is_empty())
        .collect();
    if tokens.len() < 3 {
        return Err(DecodeError::MissingCoordinates {
            found: tokens.len(),
        });
    }

    let mut coords = [0.0f32; 3];
    for (index, token) in tokens.iter().take(3).enumerate() {
        coords[index] = token
            .parse()
            .map_err(|_| DecodeError::InvalidCoordinate { index })?;
    }
    Ok(TargetDirective::SetTarget(Vector3::new(
        coords[0], coords[1], coords[2],
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== SetTarget Tests ==========

    #[test]
    fn test_comma_separated_target() {
        assert_eq!(
            decode("1,2,3"),
            Ok(TargetDirective::SetTarget(Vector3::new(1.0, 2.0, 3.0)))
        );
    }

    #[test]
    fn test_mixed_separators() {
        assert_eq!(
            decode("1;2 3"),
            Ok(TargetDirective::SetTarget(Vector3::new(1.0, 2.0, 3.0)))
        );
    }

    #[test]
    fn test_empty_tokens_discarded() {
        assert_eq!(
            decode(" 1 , ,  2 ;; 3 "),
            Ok(TargetDirective::SetTarget(Vector3::new(1.0, 2.0, 3.0)))
        );
    }

    #[test]
    fn test_extra_tokens_ignored() {
        assert_eq!(
            decode("1,2,3,4,5"),
            Ok(TargetDirective::SetTarget(Vector3::new(1.0, 2.0, 3.0)))
        );
    }

    #[test]
    fn test_negative_and_fractional_coordinates() {
        assert_eq!(
            decode("-1.5,0.25,-100"),
            Ok(TargetDirective::SetTarget(Vector3::new(-1.5, 0.25, -100.0)))
        );
    }

    // ========== ReturnHome Tests ==========

    #[test]
    fn test_home_lowercase() {
        assert_eq!(decode("home"), Ok(TargetDirective::ReturnHome));
    }

    #[test]
    fn test_home_uppercase() {
        assert_eq!(decode("HOME"), Ok(TargetDirective::ReturnHome));
    }

    #[test]
    fn test_home_mixed_case_with_whitespace() {
        assert_eq!(decode(" Home "), Ok(TargetDirective::ReturnHome));
    }

    // ========== Failure Tests ==========

    #[test]
    fn test_too_few_tokens() {
        assert_eq!(
            decode("1,2"),
            Err(DecodeError::MissingCoordinates { found: 2 })
        );
    }

    #[test]
    fn test_non_numeric_tokens() {
        assert_eq!(
            decode("a,b,c"),
            Err(DecodeError::InvalidCoordinate { index: 0 })
        );
    }

    #[test]
    fn test_failure_reports_offending_token() {
        assert_eq!(
            decode("1,x,3"),
            Err(DecodeError::InvalidCoordinate { index: 1 })
        );
    }

    #[test]
    fn test_empty_message() {
        assert_eq!(decode(""), Err(DecodeError::Empty));
        assert_eq!(decode("   "), Err(DecodeError::Empty));
    }

    #[test]
    fn test_fourth_token_parse_failure_is_ignored() {
        // Only the first three tokens are read.
        assert_eq!(
            decode("1,2,3,junk"),
            Ok(TargetDirective::SetTarget(Vector3::new(1.0, 2.0, 3.0)))
        );
    }
}
