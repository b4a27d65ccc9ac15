//! User account and profile tools

use serde::Serialize;
use tracing::info;

use crate::db::Database;
use crate::models::{ProfileUpdate, User};
use crate::nutrition::{
    bmi, bmi_category, calculate_targets, TargetOutcome, Targets,
};

use super::{ToolError, ToolResult};

/// Response for create_user
#[derive(Debug, Serialize)]
pub struct CreateUserResponse {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub created_at: String,
}

/// Full profile view
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub activity_level: Option<String>,
    pub goal: Option<String>,
    #[serde(flatten)]
    pub targets: Targets,
    pub bmi: Option<f64>,
    pub bmi_category: Option<String>,
    pub current_streak: i64,
    pub longest_streak: i64,
}

/// Response for update_profile
#[derive(Debug, Serialize)]
pub struct UpdateProfileResponse {
    pub profile: ProfileResponse,
    /// True when the profile was complete enough to recompute targets
    pub targets_updated: bool,
    /// Profile fields still missing when targets were not recomputed
    pub missing_fields: Vec<&'static str>,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        let bmi_value = match (user.weight_kg, user.height_cm) {
            (Some(w), Some(h)) => bmi(w, h),
            _ => None,
        };
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            age: user.age,
            gender: user.gender.map(|g| g.as_str().to_string()),
            weight_kg: user.weight_kg,
            height_cm: user.height_cm,
            activity_level: user.activity_level.map(|a| a.as_str().to_string()),
            goal: user.goal.map(|g| g.as_str().to_string()),
            targets: user.targets,
            bmi: bmi_value,
            bmi_category: bmi_value.map(|b| bmi_category(b).to_string()),
            current_streak: user.current_streak,
            longest_streak: user.longest_streak,
        }
    }
}

/// Create a new user account
pub fn create_user(db: &Database, email: &str, username: &str) -> ToolResult<CreateUserResponse> {
    let email = email.trim();
    let username = username.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(ToolError::InvalidInput("email must be a valid address".to_string()));
    }
    if username.is_empty() {
        return Err(ToolError::InvalidInput("username cannot be empty".to_string()));
    }

    let conn = db.get_conn()?;

    if User::get_by_email(&conn, email)?.is_some() {
        return Err(ToolError::InvalidInput(format!("email {} is already registered", email)));
    }
    if User::get_by_username(&conn, username)?.is_some() {
        return Err(ToolError::InvalidInput(format!("username {} is taken", username)));
    }

    let user = User::create(&conn, email, username)?;
    info!(user_id = user.id, "created user");

    Ok(CreateUserResponse {
        id: user.id,
        email: user.email,
        username: user.username,
        created_at: user.created_at,
    })
}

/// Get a user's profile with derived BMI
pub fn get_profile(db: &Database, user_id: i64) -> ToolResult<ProfileResponse> {
    let conn = db.get_conn()?;
    let user = User::get_by_id(&conn, user_id)?
        .ok_or_else(|| ToolError::NotFound(format!("user {}", user_id)))?;
    Ok(user.into())
}

/// Update profile fields and recompute daily targets when possible.
///
/// Missing profile fields do not fail the update: the fields that were
/// given are saved, targets stay as they were, and the response names
/// what is still missing.
pub fn update_profile(
    db: &Database,
    user_id: i64,
    update: &ProfileUpdate,
) -> ToolResult<UpdateProfileResponse> {
    if let Some(age) = update.age {
        if !(1..=120).contains(&age) {
            return Err(ToolError::InvalidInput("age must be between 1 and 120".to_string()));
        }
    }
    if let Some(weight) = update.weight_kg {
        if weight <= 0.0 {
            return Err(ToolError::InvalidInput("weight_kg must be greater than 0".to_string()));
        }
    }
    if let Some(height) = update.height_cm {
        if height <= 0.0 {
            return Err(ToolError::InvalidInput("height_cm must be greater than 0".to_string()));
        }
    }

    let conn = db.get_conn()?;

    let user = User::update_profile(&conn, user_id, update)?
        .ok_or_else(|| ToolError::NotFound(format!("user {}", user_id)))?;

    let outcome = calculate_targets(
        user.age,
        user.gender,
        user.weight_kg,
        user.height_cm,
        user.activity_level,
        user.goal,
    );

    let (targets_updated, missing_fields) = match outcome {
        TargetOutcome::Updated(targets) => {
            User::set_targets(&conn, user_id, &targets)?;
            info!(user_id, calories = targets.calories, "recalculated daily targets");
            (true, Vec::new())
        }
        TargetOutcome::Skipped { missing } => (false, missing),
    };

    let user = User::get_by_id(&conn, user_id)?
        .ok_or_else(|| ToolError::NotFound(format!("user {}", user_id)))?;

    Ok(UpdateProfileResponse {
        profile: user.into(),
        targets_updated,
        missing_fields,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::{ActivityLevel, Gender, Goal};

    fn test_db() -> Database {
        let db = Database::new_in_memory().unwrap();
        db.with_conn(|conn| crate::db::migrations::run_migrations(conn))
            .unwrap();
        db
    }

    #[test]
    fn test_create_user_rejects_duplicates() {
        let db = test_db();
        create_user(&db, "a@example.com", "alice").unwrap();
        assert!(matches!(
            create_user(&db, "a@example.com", "alice2"),
            Err(ToolError::InvalidInput(_))
        ));
        assert!(matches!(
            create_user(&db, "b@example.com", "alice"),
            Err(ToolError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_incomplete_profile_skips_targets() {
        let db = test_db();
        let user = create_user(&db, "a@example.com", "alice").unwrap();

        let resp = update_profile(
            &db,
            user.id,
            &ProfileUpdate {
                age: Some(30),
                weight_kg: Some(70.0),
                ..Default::default()
            },
        )
        .unwrap();

        assert!(!resp.targets_updated);
        assert!(resp.missing_fields.contains(&"gender"));
        assert_eq!(resp.profile.targets, Targets::default());
    }

    #[test]
    fn test_complete_profile_updates_targets() {
        let db = test_db();
        let user = create_user(&db, "a@example.com", "alice").unwrap();

        let resp = update_profile(
            &db,
            user.id,
            &ProfileUpdate {
                age: Some(30),
                gender: Some(Gender::Male),
                weight_kg: Some(70.0),
                height_cm: Some(175.0),
                activity_level: Some(ActivityLevel::Moderate),
                goal: Some(Goal::Loss),
            },
        )
        .unwrap();

        assert!(resp.targets_updated);
        assert_eq!(resp.profile.targets.calories, 2055);
        assert_eq!(resp.profile.targets.protein_g, 154);
        assert_eq!(resp.profile.targets.carbs_g, 205);
        assert_eq!(resp.profile.targets.fat_g, 68);
        assert_eq!(resp.profile.bmi, Some(22.9));
        assert_eq!(resp.profile.bmi_category.as_deref(), Some("Healthy"));
    }

    #[test]
    fn test_update_rejects_bad_age() {
        let db = test_db();
        let user = create_user(&db, "a@example.com", "alice").unwrap();
        assert!(matches!(
            update_profile(&db, user.id, &ProfileUpdate { age: Some(0), ..Default::default() }),
            Err(ToolError::InvalidInput(_))
        ));
    }
}
