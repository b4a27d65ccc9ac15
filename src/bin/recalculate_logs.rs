//! Recompute the cached nutrition on every food log from the current food
//! table. Run after reloading the food database with corrected values.
//! Usage: cargo run --bin recalculate_logs

use std::path::PathBuf;

fn get_database_path() -> PathBuf {
    std::env::var("NUTRITRACK_DATABASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(parent) = path.parent() {
                    if let Some(grandparent) = parent.parent() {
                        path = grandparent.to_path_buf();
                    }
                }
            }

            path.push("data");
            path.push("nutritrack.db");
            path
        })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let db_path = get_database_path();
    println!("Database: {}", db_path.display());

    let database = nutritrack::db::Database::new(&db_path)?;

    database.with_conn(|conn| {
        let ids = nutritrack::models::FoodLog::list_all_ids(conn)?;
        println!("Found {} food logs", ids.len());

        let mut updated = 0;
        let mut missing = 0;
        for id in ids {
            let before = match nutritrack::models::FoodLog::get_by_id(conn, id)? {
                Some(log) => log,
                None => continue,
            };
            match nutritrack::models::FoodLog::rescale(conn, id) {
                Ok(Some(after)) => {
                    if (after.nutrition.calories - before.nutrition.calories).abs() > f64::EPSILON {
                        println!(
                            "  Log {}: {:.1} -> {:.1} cal",
                            id, before.nutrition.calories, after.nutrition.calories
                        );
                        updated += 1;
                    }
                }
                Ok(None) => missing += 1,
                Err(e) => println!("  Log {}: rescale failed: {}", id, e),
            }
        }

        println!("Updated: {}", updated);
        if missing > 0 {
            println!("Missing: {}", missing);
        }
        Ok(())
    })?;

    Ok(())
}
