//! Rating constants and value checks

use crate::error::{VaultError, VaultResult};

/// Lowest accepted star value
pub const MIN_RATING: u8 = 1;
/// Highest accepted star value
pub const MAX_RATING: u8 = 5;
/// Maximum review length in characters
pub const MAX_REVIEW_LEN: usize = 1000;

/// Check a submitted star value. Ratings are whole stars in `[1, 5]`.
pub fn check_rating_value(value: u8) -> VaultResult<()> {
    if (MIN_RATING..=MAX_RATING).contains(&value) {
        Ok(())
    } else {
        Err(VaultError::Validation(format!(
            "rating must be an integer between {} and {}, got {}",
            MIN_RATING, MAX_RATING, value
        )))
    }
}

/// Check an optional review body against the length cap.
pub fn check_review(review: Option<&str>) -> VaultResult<()> {
    match review {
        Some(text) if text.chars().count() > MAX_REVIEW_LEN => Err(VaultError::Validation(
            format!("review exceeds {} characters", MAX_REVIEW_LEN),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bounds() {
        assert!(check_rating_value(1).is_ok());
        assert!(check_rating_value(5).is_ok());
        assert!(check_rating_value(0).is_err());
        assert!(check_rating_value(6).is_err());
    }

    #[test]
    fn review_length_cap() {
        assert!(check_review(None).is_ok());
        assert!(check_review(Some("solid notes")).is_ok());
        let long = "x".repeat(MAX_REVIEW_LEN + 1);
        assert!(check_review(Some(&long)).is_err());
    }
}
