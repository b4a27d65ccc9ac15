//! User model
//!
//! Account identity, optional profile inputs, derived daily targets, and
//! logging streaks. Targets are stored denormalized so dashboard reads do
//! not recompute them.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use crate::nutrition::targets::{ActivityLevel, Gender, Goal, Targets};

/// A user account with profile and derived targets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub age: Option<i64>,
    pub gender: Option<Gender>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub activity_level: Option<ActivityLevel>,
    pub goal: Option<Goal>,
    #[serde(flatten)]
    pub targets: Targets,
    pub current_streak: i64,
    pub longest_streak: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Profile fields to update. `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub age: Option<i64>,
    pub gender: Option<Gender>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub activity_level: Option<ActivityLevel>,
    pub goal: Option<Goal>,
}

impl User {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let gender: Option<String> = row.get("gender")?;
        let activity_level: Option<String> = row.get("activity_level")?;
        let goal: Option<String> = row.get("goal")?;

        Ok(Self {
            id: row.get("id")?,
            email: row.get("email")?,
            username: row.get("username")?,
            age: row.get("age")?,
            gender: gender.map(|s| Gender::from_str(&s)),
            weight_kg: row.get("weight_kg")?,
            height_cm: row.get("height_cm")?,
            activity_level: activity_level.map(|s| ActivityLevel::from_str(&s)),
            goal: goal.map(|s| Goal::from_str(&s)),
            targets: Targets {
                calories: row.get("calorie_target")?,
                protein_g: row.get("protein_target")?,
                carbs_g: row.get("carbs_target")?,
                fat_g: row.get("fat_target")?,
            },
            current_streak: row.get("current_streak")?,
            longest_streak: row.get("longest_streak")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Create a new user. Profile fields start empty and targets start at
    /// the schema defaults.
    pub fn create(conn: &Connection, email: &str, username: &str) -> DbResult<Self> {
        conn.execute(
            "INSERT INTO users (email, username) VALUES (?1, ?2)",
            params![email, username],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or_else(|| crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get a user by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM users WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get a user by email
    pub fn get_by_email(conn: &Connection, email: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM users WHERE email = ?1")?;

        let result = stmt.query_row([email], Self::from_row);
        match result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get a user by username
    pub fn get_by_username(conn: &Connection, username: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM users WHERE username = ?1")?;

        let result = stmt.query_row([username], Self::from_row);
        match result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Apply a partial profile update and return the refreshed user.
    /// Fields set to `None` keep their stored values.
    pub fn update_profile(
        conn: &Connection,
        id: i64,
        update: &ProfileUpdate,
    ) -> DbResult<Option<Self>> {
        conn.execute(
            r#"
            UPDATE users SET
                age = COALESCE(?1, age),
                gender = COALESCE(?2, gender),
                weight_kg = COALESCE(?3, weight_kg),
                height_cm = COALESCE(?4, height_cm),
                activity_level = COALESCE(?5, activity_level),
                goal = COALESCE(?6, goal),
                updated_at = datetime('now')
            WHERE id = ?7
            "#,
            params![
                update.age,
                update.gender.map(|g| g.as_str()),
                update.weight_kg,
                update.height_cm,
                update.activity_level.map(|a| a.as_str()),
                update.goal.map(|g| g.as_str()),
                id,
            ],
        )?;

        Self::get_by_id(conn, id)
    }

    /// Store derived daily targets
    pub fn set_targets(conn: &Connection, id: i64, targets: &Targets) -> DbResult<()> {
        conn.execute(
            r#"
            UPDATE users SET
                calorie_target = ?1,
                protein_target = ?2,
                carbs_target = ?3,
                fat_target = ?4,
                updated_at = datetime('now')
            WHERE id = ?5
            "#,
            params![
                targets.calories,
                targets.protein_g,
                targets.carbs_g,
                targets.fat_g,
                id,
            ],
        )?;
        Ok(())
    }

    /// Store recomputed streak counters
    pub fn set_streaks(conn: &Connection, id: i64, current: i64, longest: i64) -> DbResult<()> {
        conn.execute(
            "UPDATE users SET current_streak = ?1, longest_streak = ?2,
             updated_at = datetime('now') WHERE id = ?3",
            params![current, longest, id],
        )?;
        Ok(())
    }
}
