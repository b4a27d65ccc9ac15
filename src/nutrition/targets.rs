//! Daily calorie and macro target calculation
//!
//! Mifflin-St Jeor BMR scaled by an activity multiplier, adjusted for the
//! user's goal, then split 30/40/30 across protein, carbs, and fat.

use serde::{Deserialize, Serialize};

/// Gender, as used by the BMR formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    /// Parse from string; anything other than "male" uses the non-male
    /// BMR constant
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "male" => Gender::Male,
            _ => Gender::Female,
        }
    }
}

/// Activity level with its TDEE multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "very_active",
        }
    }

    /// Parse from string; unrecognized levels fall back to sedentary,
    /// which carries the 1.2 multiplier
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "light" => ActivityLevel::Light,
            "moderate" => ActivityLevel::Moderate,
            "active" => ActivityLevel::Active,
            "very_active" => ActivityLevel::VeryActive,
            _ => ActivityLevel::Sedentary,
        }
    }

    /// TDEE multiplier for this activity level
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }
}

/// Weight goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    Loss,
    Gain,
    Maintain,
}

impl Goal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::Loss => "loss",
            Goal::Gain => "gain",
            Goal::Maintain => "maintain",
        }
    }

    /// Parse from string; unrecognized goals leave the TDEE unchanged,
    /// same as maintain
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "loss" => Goal::Loss,
            "gain" => Goal::Gain,
            _ => Goal::Maintain,
        }
    }

    /// Calorie adjustment applied on top of TDEE
    pub fn calorie_adjustment(&self) -> f64 {
        match self {
            Goal::Loss => -500.0,
            Goal::Gain => 300.0,
            Goal::Maintain => 0.0,
        }
    }
}

/// Derived daily targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Targets {
    pub calories: i64,
    pub protein_g: i64,
    pub carbs_g: i64,
    pub fat_g: i64,
}

impl Default for Targets {
    /// Schema defaults used before a profile is complete enough to
    /// calculate real targets
    fn default() -> Self {
        Self {
            calories: 2000,
            protein_g: 150,
            carbs_g: 200,
            fat_g: 65,
        }
    }
}

/// Outcome of a target calculation.
///
/// Missing profile fields are not an error: the calculation is skipped and
/// existing targets stay untouched. The variant names the missing fields so
/// callers can surface why nothing changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetOutcome {
    Updated(Targets),
    Skipped { missing: Vec<&'static str> },
}

/// Basal metabolic rate via Mifflin-St Jeor
pub fn bmr(gender: Gender, weight_kg: f64, height_cm: f64, age: i64) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age as f64;
    match gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
    }
}

/// Calculate daily targets from profile inputs.
///
/// All six inputs must be present; otherwise returns `Skipped` listing the
/// missing fields. Macro split is 30% protein / 40% carbs / 30% fat at
/// 4/4/9 kcal per gram, and every target is truncated to an integer, not
/// rounded.
pub fn calculate_targets(
    age: Option<i64>,
    gender: Option<Gender>,
    weight_kg: Option<f64>,
    height_cm: Option<f64>,
    activity_level: Option<ActivityLevel>,
    goal: Option<Goal>,
) -> TargetOutcome {
    let mut missing = Vec::new();
    if age.is_none() {
        missing.push("age");
    }
    if gender.is_none() {
        missing.push("gender");
    }
    if weight_kg.is_none() {
        missing.push("weight_kg");
    }
    if height_cm.is_none() {
        missing.push("height_cm");
    }
    if activity_level.is_none() {
        missing.push("activity_level");
    }
    if goal.is_none() {
        missing.push("goal");
    }
    if !missing.is_empty() {
        return TargetOutcome::Skipped { missing };
    }

    let bmr = bmr(
        gender.unwrap(),
        weight_kg.unwrap(),
        height_cm.unwrap(),
        age.unwrap(),
    );
    let tdee = bmr * activity_level.unwrap().multiplier();
    let target_calories = tdee + goal.unwrap().calorie_adjustment();

    TargetOutcome::Updated(Targets {
        calories: target_calories as i64,
        protein_g: (target_calories * 0.30 / 4.0) as i64,
        carbs_g: (target_calories * 0.40 / 4.0) as i64,
        fat_g: (target_calories * 0.30 / 9.0) as i64,
    })
}

/// Body mass index, rounded to one decimal place
pub fn bmi(weight_kg: f64, height_cm: f64) -> Option<f64> {
    if weight_kg <= 0.0 || height_cm <= 0.0 {
        return None;
    }
    let height_m = height_cm / 100.0;
    Some((weight_kg / (height_m * height_m) * 10.0).round() / 10.0)
}

/// Qualitative BMI category
pub fn bmi_category(bmi: f64) -> &'static str {
    if bmi < 18.5 {
        "Underweight"
    } else if bmi < 25.0 {
        "Healthy"
    } else if bmi < 30.0 {
        "Overweight"
    } else {
        "Obese"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bmr_male() {
        // 700 + 1093.75 - 150 + 5 = 1648.75
        let v = bmr(Gender::Male, 70.0, 175.0, 30);
        assert!((v - 1648.75).abs() < 1e-9);
    }

    #[test]
    fn test_bmr_female() {
        let v = bmr(Gender::Female, 60.0, 165.0, 25);
        assert!((v - (600.0 + 1031.25 - 125.0 - 161.0)).abs() < 1e-9);
    }

    #[test]
    fn test_reference_profile() {
        // 30yo male, 70kg, 175cm, moderate activity, loss goal:
        // TDEE = 1648.75 * 1.55 = 2555.5625, minus 500 = 2055.5625
        let outcome = calculate_targets(
            Some(30),
            Some(Gender::Male),
            Some(70.0),
            Some(175.0),
            Some(ActivityLevel::Moderate),
            Some(Goal::Loss),
        );
        assert_eq!(
            outcome,
            TargetOutcome::Updated(Targets {
                calories: 2055,
                protein_g: 154,
                carbs_g: 205,
                fat_g: 68,
            })
        );
    }

    #[test]
    fn test_targets_are_truncated_not_rounded() {
        // Same profile with gain: 2555.5625 + 300 = 2855.5625
        // carbs = 2855.5625 * 0.4 / 4 = 285.556... -> 285, would be 286 if rounded
        let outcome = calculate_targets(
            Some(30),
            Some(Gender::Male),
            Some(70.0),
            Some(175.0),
            Some(ActivityLevel::Moderate),
            Some(Goal::Gain),
        );
        assert_eq!(
            outcome,
            TargetOutcome::Updated(Targets {
                calories: 2855,
                protein_g: 214,
                carbs_g: 285,
                fat_g: 95,
            })
        );
    }

    #[test]
    fn test_missing_goal_skips() {
        let outcome = calculate_targets(
            Some(30),
            Some(Gender::Male),
            Some(70.0),
            Some(175.0),
            Some(ActivityLevel::Moderate),
            None,
        );
        assert_eq!(outcome, TargetOutcome::Skipped { missing: vec!["goal"] });
    }

    #[test]
    fn test_skip_lists_every_missing_field() {
        match calculate_targets(None, None, None, None, None, None) {
            TargetOutcome::Skipped { missing } => assert_eq!(missing.len(), 6),
            other => panic!("expected skip, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_activity_parses_to_sedentary() {
        assert_eq!(ActivityLevel::from_str("couch"), ActivityLevel::Sedentary);
        assert_eq!(ActivityLevel::Sedentary.multiplier(), 1.2);
    }

    #[test]
    fn test_unknown_goal_parses_to_maintain() {
        assert_eq!(Goal::from_str("recomp"), Goal::Maintain);
        assert_eq!(Goal::Maintain.calorie_adjustment(), 0.0);
    }

    #[test]
    fn test_bmi() {
        assert_eq!(bmi(70.0, 175.0), Some(22.9));
        assert_eq!(bmi(0.0, 175.0), None);
        assert_eq!(bmi_category(17.0), "Underweight");
        assert_eq!(bmi_category(22.9), "Healthy");
        assert_eq!(bmi_category(27.0), "Overweight");
        assert_eq!(bmi_category(31.0), "Obese");
    }
}
