//! Load the food reference table from a nutrition CSV.
//! Usage: cargo run --bin load_foods -- <csv_path>

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
    let args: Vec<String> = std::env::args().collect();
    let csv_path = match args.get(1) {
        Some(p) => p.clone(),
        None => {
            eprintln!("Usage: load_foods <csv_path>");
            std::process::exit(1);
        }
    };

    let db_path = get_database_path();
    println!("Database: {}", db_path.display());

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = nutritrack::db::Database::new(&db_path)?;
    database.with_conn(|conn| nutritrack::db::migrations::run_migrations(conn))?;

    let result = nutritrack::tools::import::import_nutrition_csv(&database, &csv_path)?;

    println!("Imported: {}", result.imported);
    println!("Skipped:  {}", result.skipped);
    println!("Replaced: {}", result.replaced);
    for error in &result.errors {
        println!("  {}", error);
    }

    Ok(())
}
