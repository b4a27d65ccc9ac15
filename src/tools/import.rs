//! Nutrition CSV import
//!
//! Loads a reference food table from a CSV export. Columns are located by
//! header name, so column order does not matter. Bad rows are skipped with
//! a row-level error; the batch never aborts. A successful import replaces
//! the existing food table.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};

use serde::Serialize;
use tracing::{info, warn};

use crate::db::Database;
use crate::models::{Food, FoodCreate};

use super::{ToolError, ToolResult};

/// Response for import_nutrition_csv
#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub imported: usize,
    pub skipped: usize,
    pub replaced: i64,
    pub errors: Vec<String>,
}

/// Map header names to column indexes
fn header_index(header: &str) -> HashMap<String, usize> {
    header
        .split(',')
        .enumerate()
        .map(|(i, name)| (name.trim().to_lowercase(), i))
        .collect()
}

/// Numeric field by header name; absent or empty cells default to 0.0,
/// an unparseable cell is a row error.
fn numeric_field(
    fields: &[&str],
    index: &HashMap<String, usize>,
    name: &str,
) -> Result<f64, String> {
    let cell = match index.get(name).and_then(|i| fields.get(*i)) {
        Some(cell) => cell.trim(),
        None => return Ok(0.0),
    };
    if cell.is_empty() {
        return Ok(0.0);
    }
    cell.parse::<f64>()
        .map_err(|_| format!("invalid {} value '{}'", name, cell))
}

fn parse_row(fields: &[&str], index: &HashMap<String, usize>) -> Result<FoodCreate, String> {
    let name = index
        .get("food_name")
        .and_then(|i| fields.get(*i))
        .map(|s| s.trim())
        .unwrap_or("");
    if name.is_empty() {
        return Err("empty food_name".to_string());
    }

    Ok(FoodCreate {
        name: name.to_string(),
        calories: numeric_field(fields, index, "energy_kcal")?,
        protein: numeric_field(fields, index, "protein_g")?,
        carbs: numeric_field(fields, index, "carb_g")?,
        fat: numeric_field(fields, index, "fat_g")?,
        cholesterol_mg: numeric_field(fields, index, "cholesterol_mg")?,
        sodium_mg: numeric_field(fields, index, "sodium_mg")?,
        fibre_g: numeric_field(fields, index, "fibre_g")?,
        vitc_mg: numeric_field(fields, index, "vitc_mg")?,
        vita_ug: numeric_field(fields, index, "vita_ug")?,
        iron_mg: numeric_field(fields, index, "iron_mg")?,
        category: index
            .get("category")
            .and_then(|i| fields.get(*i))
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string()),
    })
}

/// Import foods from a CSV file, replacing the current food table
pub fn import_nutrition_csv(db: &Database, file_path: &str) -> ToolResult<ImportResponse> {
    let file = File::open(file_path).map_err(|e| {
        ToolError::InvalidInput(format!("failed to open '{}': {}", file_path, e))
    })?;
    let reader = BufReader::new(file);
    let mut lines = reader.lines();

    let header = match lines.next() {
        Some(Ok(line)) => line,
        Some(Err(e)) => {
            return Err(ToolError::InvalidInput(format!("failed to read header: {}", e)))
        }
        None => return Err(ToolError::InvalidInput("file is empty".to_string())),
    };
    let index = header_index(&header);
    if !index.contains_key("food_name") {
        return Err(ToolError::InvalidInput(
            "header is missing a food_name column".to_string(),
        ));
    }

    let mut foods = Vec::new();
    let mut errors = Vec::new();
    let mut skipped = 0;

    for (line_num, line_result) in lines.enumerate() {
        let row = line_num + 2; // 1-based, after the header
        let line = match line_result {
            Ok(line) => line,
            Err(e) => {
                errors.push(format!("row {}: read error: {}", row, e));
                skipped += 1;
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(',').collect();
        match parse_row(&fields, &index) {
            Ok(food) => foods.push(food),
            Err(e) => {
                warn!(row, error = %e, "skipping csv row");
                errors.push(format!("row {}: {}", row, e));
                skipped += 1;
            }
        }
    }

    // Replace-then-load in one transaction so a mid-batch failure cannot
    // leave the table partially replaced
    let mut conn = db.get_conn()?;
    let tx = conn.transaction().map_err(crate::db::DbError::from)?;
    let replaced = Food::delete_all(&tx)? as i64;
    for food in &foods {
        Food::create(&tx, food)?;
    }
    tx.commit().map_err(crate::db::DbError::from)?;

    info!(imported = foods.len(), skipped, replaced, "nutrition csv import complete");

    Ok(ImportResponse {
        imported: foods.len(),
        skipped,
        replaced,
        errors,
    })
}
