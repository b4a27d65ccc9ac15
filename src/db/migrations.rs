//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    // Create migrations table if it doesn't exist
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    // Get current version
    let current_version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    // Run migrations
    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
    }

    Ok(())
}

/// Get the current schema version recorded in the database
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- FOODS
        -- Reference nutrition database, values per 100g
        -- ============================================
        CREATE TABLE foods (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,

            -- Core nutrients (per 100g)
            calories REAL NOT NULL DEFAULT 0,
            protein REAL NOT NULL DEFAULT 0,        -- grams
            carbs REAL NOT NULL DEFAULT 0,          -- grams
            fat REAL NOT NULL DEFAULT 0,            -- grams

            -- Advanced nutrients (per 100g)
            cholesterol_mg REAL NOT NULL DEFAULT 0, -- milligrams
            sodium_mg REAL NOT NULL DEFAULT 0,      -- milligrams
            fibre_g REAL NOT NULL DEFAULT 0,        -- grams
            vitc_mg REAL NOT NULL DEFAULT 0,        -- milligrams
            vita_ug REAL NOT NULL DEFAULT 0,        -- micrograms
            iron_mg REAL NOT NULL DEFAULT 0,        -- milligrams

            category TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_foods_name ON foods(name);

        -- ============================================
        -- USERS
        -- Profile data and derived daily targets
        -- ============================================
        CREATE TABLE users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT NOT NULL UNIQUE,
            username TEXT NOT NULL UNIQUE,

            -- Profile inputs for target calculation (all optional)
            age INTEGER,
            gender TEXT CHECK(gender IN ('male', 'female')),
            weight_kg REAL,
            height_cm REAL,
            activity_level TEXT CHECK(activity_level IN
                ('sedentary', 'light', 'moderate', 'active', 'very_active')),
            goal TEXT CHECK(goal IN ('loss', 'gain', 'maintain')),

            -- Derived daily targets
            calorie_target INTEGER NOT NULL DEFAULT 2000,
            protein_target INTEGER NOT NULL DEFAULT 150,
            carbs_target INTEGER NOT NULL DEFAULT 200,
            fat_target INTEGER NOT NULL DEFAULT 65,

            -- Logging streaks
            current_streak INTEGER NOT NULL DEFAULT 0,
            longest_streak INTEGER NOT NULL DEFAULT 0,

            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_users_email ON users(email);
        CREATE INDEX idx_users_username ON users(username);

        -- ============================================
        -- FOOD LOGS
        -- Logged intake with cached scaled nutrition.
        -- food_id is deliberately not a foreign key: the cached values make
        -- logs self-contained, and CSV import replaces the foods table
        -- wholesale even when logs exist.
        -- ============================================
        CREATE TABLE food_logs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            food_id INTEGER NOT NULL,
            quantity REAL NOT NULL,              -- grams, unit-normalized
            meal_type TEXT NOT NULL CHECK(meal_type IN
                ('breakfast', 'lunch', 'dinner', 'snack')),

            -- Cached nutrition, scaled from the food at log time
            cached_calories REAL,
            cached_protein REAL,
            cached_carbs REAL,
            cached_fat REAL,
            cached_cholesterol_mg REAL DEFAULT 0,
            cached_sodium_mg REAL DEFAULT 0,
            cached_fibre_g REAL DEFAULT 0,
            cached_vitc_mg REAL DEFAULT 0,
            cached_vita_ug REAL DEFAULT 0,
            cached_iron_mg REAL DEFAULT 0,

            logged_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_food_logs_user ON food_logs(user_id);
        CREATE INDEX idx_food_logs_logged_at ON food_logs(logged_at);

        -- ============================================
        -- FAVORITE FOODS
        -- ============================================
        CREATE TABLE favorite_foods (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            food_id INTEGER NOT NULL REFERENCES foods(id) ON DELETE CASCADE,
            added_at TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(user_id, food_id)
        );

        CREATE INDEX idx_favorite_foods_user ON favorite_foods(user_id);
        "#,
    )?;

    Ok(())
}
