//! Serving unit normalization
//!
//! All quantities are stored and computed in grams. Household units are
//! converted at input time with fixed multipliers.

/// Grams per bowl serving
pub const GRAMS_PER_BOWL: f64 = 180.0;
/// Grams per cup serving
pub const GRAMS_PER_CUP: f64 = 240.0;
/// Grams per piece serving
pub const GRAMS_PER_PIECE: f64 = 60.0;

/// Grams per one unit of the given serving unit.
///
/// Unknown units map to 1.0, treating the quantity as already in grams.
/// Milliliters are treated as gram-equivalent.
pub fn gram_multiplier(unit: &str) -> f64 {
    match unit.to_lowercase().as_str() {
        "bowl" => GRAMS_PER_BOWL,
        "cup" => GRAMS_PER_CUP,
        "pc" => GRAMS_PER_PIECE,
        _ => 1.0,
    }
}

/// Convert a quantity in the given unit to grams
pub fn to_grams(quantity: f64, unit: &str) -> f64 {
    quantity * gram_multiplier(unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_units() {
        assert_eq!(to_grams(2.0, "bowl"), 360.0);
        assert_eq!(to_grams(1.0, "cup"), 240.0);
        assert_eq!(to_grams(3.0, "pc"), 180.0);
        assert_eq!(to_grams(150.0, "g"), 150.0);
        assert_eq!(to_grams(250.0, "ml"), 250.0);
    }

    #[test]
    fn test_unit_is_case_insensitive() {
        assert_eq!(to_grams(1.0, "Bowl"), 180.0);
        assert_eq!(to_grams(1.0, "CUP"), 240.0);
    }

    #[test]
    fn test_unknown_unit_passes_through() {
        assert_eq!(to_grams(42.0, "scoop"), 42.0);
        assert_eq!(to_grams(42.0, ""), 42.0);
    }
}
