//! Shared nutrition data structure
//!
//! Used across foods, food logs, and daily summaries.

use serde::{Deserialize, Serialize};

/// Round a value to one decimal place.
///
/// Uses `f64::round`, i.e. round-half-away-from-zero. All cached and
/// aggregated nutrition values in the system carry one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Nutritional values: the four core macros plus six advanced nutrients.
///
/// On a `Food` these are per 100g; on a `FoodLog` they are the absolute
/// scaled amounts for the logged quantity.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Nutrition {
    pub calories: f64,
    pub protein: f64,        // grams
    pub carbs: f64,          // grams
    pub fat: f64,            // grams
    #[serde(default)]
    pub cholesterol_mg: f64, // milligrams
    #[serde(default)]
    pub sodium_mg: f64,      // milligrams
    #[serde(default)]
    pub fibre_g: f64,        // grams
    #[serde(default)]
    pub vitc_mg: f64,        // milligrams
    #[serde(default)]
    pub vita_ug: f64,        // micrograms
    #[serde(default)]
    pub iron_mg: f64,        // milligrams
}

impl Nutrition {
    /// Create a new Nutrition with all zeros
    pub fn zero() -> Self {
        Self::default()
    }

    /// Scale nutrition values by a multiplier
    pub fn scale(&self, multiplier: f64) -> Self {
        Self {
            calories: self.calories * multiplier,
            protein: self.protein * multiplier,
            carbs: self.carbs * multiplier,
            fat: self.fat * multiplier,
            cholesterol_mg: self.cholesterol_mg * multiplier,
            sodium_mg: self.sodium_mg * multiplier,
            fibre_g: self.fibre_g * multiplier,
            vitc_mg: self.vitc_mg * multiplier,
            vita_ug: self.vita_ug * multiplier,
            iron_mg: self.iron_mg * multiplier,
        }
    }

    /// Round every field to one decimal place
    pub fn rounded(&self) -> Self {
        Self {
            calories: round1(self.calories),
            protein: round1(self.protein),
            carbs: round1(self.carbs),
            fat: round1(self.fat),
            cholesterol_mg: round1(self.cholesterol_mg),
            sodium_mg: round1(self.sodium_mg),
            fibre_g: round1(self.fibre_g),
            vitc_mg: round1(self.vitc_mg),
            vita_ug: round1(self.vita_ug),
            iron_mg: round1(self.iron_mg),
        }
    }

    /// Scale a per-100g profile to an absolute gram quantity.
    ///
    /// Every field is independently rounded to one decimal place. This is
    /// the value cached on a `FoodLog` at creation; it is never recomputed
    /// implicitly when the source food changes.
    pub fn scale_per_100g(&self, grams: f64) -> Self {
        self.scale(grams / 100.0).rounded()
    }

    /// Add another nutrition to this one
    pub fn add(&self, other: &Nutrition) -> Self {
        Self {
            calories: self.calories + other.calories,
            protein: self.protein + other.protein,
            carbs: self.carbs + other.carbs,
            fat: self.fat + other.fat,
            cholesterol_mg: self.cholesterol_mg + other.cholesterol_mg,
            sodium_mg: self.sodium_mg + other.sodium_mg,
            fibre_g: self.fibre_g + other.fibre_g,
            vitc_mg: self.vitc_mg + other.vitc_mg,
            vita_ug: self.vita_ug + other.vita_ug,
            iron_mg: self.iron_mg + other.iron_mg,
        }
    }
}

impl std::ops::Add for Nutrition {
    type Output = Nutrition;

    fn add(self, other: Nutrition) -> Nutrition {
        Nutrition::add(&self, &other)
    }
}

impl std::ops::Mul<f64> for Nutrition {
    type Output = Nutrition;

    fn mul(self, multiplier: f64) -> Nutrition {
        self.scale(multiplier)
    }
}

impl std::iter::Sum for Nutrition {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Nutrition::zero(), |acc, n| acc + n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chicken() -> Nutrition {
        Nutrition {
            calories: 165.0,
            protein: 31.0,
            carbs: 0.0,
            fat: 3.6,
            sodium_mg: 74.0,
            cholesterol_mg: 85.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_scale_per_100g_rounds_each_field() {
        let scaled = chicken().scale_per_100g(150.0);
        assert_eq!(scaled.calories, 247.5);
        assert_eq!(scaled.protein, 46.5);
        assert_eq!(scaled.carbs, 0.0);
        assert_eq!(scaled.fat, 5.4);
        assert_eq!(scaled.sodium_mg, 111.0);
        assert_eq!(scaled.cholesterol_mg, 127.5);
    }

    #[test]
    fn test_scale_per_100g_matches_round_of_product() {
        // scale(P, g).field == round(P.field * g/100, 1) for every field
        let p = chicken();
        for grams in [0.0, 33.0, 100.0, 137.5, 250.0] {
            let scaled = p.scale_per_100g(grams);
            assert_eq!(scaled.calories, round1(p.calories * grams / 100.0));
            assert_eq!(scaled.protein, round1(p.protein * grams / 100.0));
            assert_eq!(scaled.fat, round1(p.fat * grams / 100.0));
            assert_eq!(scaled.sodium_mg, round1(p.sodium_mg * grams / 100.0));
        }
    }

    #[test]
    fn test_scale_at_100g_is_identity_after_rounding() {
        let scaled = chicken().scale_per_100g(100.0);
        assert_eq!(scaled, chicken());
    }

    #[test]
    fn test_missing_advanced_fields_scale_to_zero() {
        let scaled = chicken().scale_per_100g(250.0);
        assert_eq!(scaled.fibre_g, 0.0);
        assert_eq!(scaled.vitc_mg, 0.0);
        assert_eq!(scaled.vita_ug, 0.0);
        assert_eq!(scaled.iron_mg, 0.0);
    }

    #[test]
    fn test_sum() {
        let total: Nutrition = vec![chicken(), chicken()].into_iter().sum();
        assert_eq!(total.calories, 330.0);
        assert_eq!(total.protein, 62.0);
    }

    #[test]
    fn test_round1_half_away_from_zero() {
        assert_eq!(round1(0.25), 0.3);
        assert_eq!(round1(0.24), 0.2);
        assert_eq!(round1(-0.25), -0.3);
    }
}
