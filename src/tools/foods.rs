//! Food database tools

use serde::Serialize;
use tracing::info;

use crate::db::Database;
use crate::models::{Favorite, Food, FoodCreate};

use super::{ToolError, ToolResult};

/// Summary of a food for list/search results
#[derive(Debug, Serialize)]
pub struct FoodSummary {
    pub id: i64,
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub category: Option<String>,
}

impl From<&Food> for FoodSummary {
    fn from(food: &Food) -> Self {
        Self {
            id: food.id,
            name: food.name.clone(),
            calories: food.nutrition.calories,
            protein: food.nutrition.protein,
            carbs: food.nutrition.carbs,
            fat: food.nutrition.fat,
            category: food.category.clone(),
        }
    }
}

/// Response for search_foods
#[derive(Debug, Serialize)]
pub struct SearchFoodsResponse {
    pub foods: Vec<FoodSummary>,
    pub total: usize,
}

/// Response for list_foods
#[derive(Debug, Serialize)]
pub struct ListFoodsResponse {
    pub foods: Vec<FoodSummary>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Response for toggle_favorite
#[derive(Debug, Serialize)]
pub struct ToggleFavoriteResponse {
    pub food_id: i64,
    pub is_favorite: bool,
}

/// Response for list_favorites
#[derive(Debug, Serialize)]
pub struct ListFavoritesResponse {
    pub foods: Vec<FoodSummary>,
    pub total: usize,
}

/// Response for seed_sample_foods
#[derive(Debug, Serialize)]
pub struct SeedResponse {
    pub added: usize,
    pub skipped: bool,
}

/// Add a food with per-100g nutrition
pub fn add_food(db: &Database, data: FoodCreate) -> ToolResult<Food> {
    let name = data.name.trim();
    if name.is_empty() {
        return Err(ToolError::InvalidInput("food name cannot be empty".to_string()));
    }
    for (field, value) in [
        ("calories", data.calories),
        ("protein", data.protein),
        ("carbs", data.carbs),
        ("fat", data.fat),
    ] {
        if value < 0.0 {
            return Err(ToolError::InvalidInput(format!("{} cannot be negative", field)));
        }
    }

    let conn = db.get_conn()?;
    let food = Food::create(&conn, &data)?;
    info!(food_id = food.id, name = %food.name, "added food");
    Ok(food)
}

/// Search foods by name. Queries shorter than 2 characters return an
/// empty list rather than scanning the whole table.
pub fn search_foods(db: &Database, query: &str, limit: i64) -> ToolResult<SearchFoodsResponse> {
    let query = query.trim();
    if query.len() < 2 {
        return Ok(SearchFoodsResponse { foods: Vec::new(), total: 0 });
    }

    let limit = limit.clamp(1, 100);
    let conn = db.get_conn()?;
    let foods = Food::search(&conn, query, limit)?;
    let summaries: Vec<FoodSummary> = foods.iter().map(FoodSummary::from).collect();
    let total = summaries.len();

    Ok(SearchFoodsResponse { foods: summaries, total })
}

/// List foods ordered by name, paginated
pub fn list_foods(db: &Database, limit: i64, offset: i64) -> ToolResult<ListFoodsResponse> {
    let limit = limit.clamp(1, 200);
    let offset = offset.max(0);

    let conn = db.get_conn()?;
    let foods = Food::list(&conn, limit, offset)?;
    let total = Food::count(&conn)?;

    Ok(ListFoodsResponse {
        foods: foods.iter().map(FoodSummary::from).collect(),
        total,
        limit,
        offset,
    })
}

/// Toggle a food in the user's favorites
pub fn toggle_favorite(db: &Database, user_id: i64, food_id: i64) -> ToolResult<ToggleFavoriteResponse> {
    let conn = db.get_conn()?;

    if Food::get_by_id(&conn, food_id)?.is_none() {
        return Err(ToolError::NotFound(format!("food {}", food_id)));
    }

    let is_favorite = Favorite::toggle(&conn, user_id, food_id)?;
    Ok(ToggleFavoriteResponse { food_id, is_favorite })
}

/// List the user's favorite foods, most recently added first
pub fn list_favorites(db: &Database, user_id: i64) -> ToolResult<ListFavoritesResponse> {
    let conn = db.get_conn()?;
    let favorites = Favorite::list_for_user(&conn, user_id)?;
    let foods: Vec<FoodSummary> = favorites.iter().map(|f| FoodSummary::from(&f.food)).collect();
    let total = foods.len();
    Ok(ListFavoritesResponse { foods, total })
}

/// Built-in starter foods, per 100g
fn sample_foods() -> Vec<FoodCreate> {
    let entry = |name: &str, calories: f64, protein: f64, carbs: f64, fat: f64, category: &str| {
        FoodCreate {
            name: name.to_string(),
            calories,
            protein,
            carbs,
            fat,
            cholesterol_mg: 0.0,
            sodium_mg: 0.0,
            fibre_g: 0.0,
            vitc_mg: 0.0,
            vita_ug: 0.0,
            iron_mg: 0.0,
            category: Some(category.to_string()),
        }
    };
    vec![
        entry("Banana", 89.0, 1.1, 23.0, 0.3, "Fruits"),
        entry("Apple", 52.0, 0.3, 14.0, 0.2, "Fruits"),
        entry("White Rice (cooked)", 130.0, 2.7, 28.0, 0.3, "Grains"),
        entry("Chapati", 297.0, 11.0, 46.0, 7.5, "Grains"),
        entry("Oats", 389.0, 16.9, 66.3, 6.9, "Grains"),
        entry("Chicken Breast", 165.0, 31.0, 0.0, 3.6, "Protein"),
        entry("Egg (whole)", 155.0, 13.0, 1.1, 11.0, "Protein"),
        entry("Paneer", 265.0, 18.3, 1.2, 20.8, "Dairy"),
        entry("Milk (whole)", 61.0, 3.2, 4.8, 3.3, "Dairy"),
        entry("Dal (cooked)", 116.0, 9.0, 20.0, 0.4, "Legumes"),
    ]
}

/// Seed the reference table with starter foods. Skipped when any foods
/// already exist, so it never duplicates a CSV load.
pub fn seed_sample_foods(db: &Database) -> ToolResult<SeedResponse> {
    let conn = db.get_conn()?;

    if Food::count(&conn)? > 0 {
        return Ok(SeedResponse { added: 0, skipped: true });
    }

    let samples = sample_foods();
    let added = samples.len();
    for data in &samples {
        Food::create(&conn, data)?;
    }
    info!(added, "seeded sample foods");

    Ok(SeedResponse { added, skipped: false })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::profile::create_user;

    fn test_db() -> Database {
        let db = Database::new_in_memory().unwrap();
        db.with_conn(|conn| crate::db::migrations::run_migrations(conn))
            .unwrap();
        db
    }

    #[test]
    fn test_short_query_returns_empty() {
        let db = test_db();
        seed_sample_foods(&db).unwrap();
        let resp = search_foods(&db, "a", 20).unwrap();
        assert_eq!(resp.total, 0);
    }

    #[test]
    fn test_search_matches_substring() {
        let db = test_db();
        seed_sample_foods(&db).unwrap();
        let resp = search_foods(&db, "rice", 20).unwrap();
        assert_eq!(resp.total, 1);
        assert_eq!(resp.foods[0].name, "White Rice (cooked)");
    }

    #[test]
    fn test_seed_is_skipped_when_foods_exist() {
        let db = test_db();
        let first = seed_sample_foods(&db).unwrap();
        assert!(!first.skipped);
        assert_eq!(first.added, 10);

        let second = seed_sample_foods(&db).unwrap();
        assert!(second.skipped);
        assert_eq!(second.added, 0);
    }

    #[test]
    fn test_add_food_rejects_negative_macros() {
        let db = test_db();
        let mut data = sample_foods().remove(0);
        data.calories = -1.0;
        assert!(matches!(add_food(&db, data), Err(ToolError::InvalidInput(_))));
    }

    #[test]
    fn test_favorite_toggle_roundtrip() {
        let db = test_db();
        seed_sample_foods(&db).unwrap();
        let user = create_user(&db, "a@example.com", "alice").unwrap();
        let food_id = search_foods(&db, "paneer", 5).unwrap().foods[0].id;

        let on = toggle_favorite(&db, user.id, food_id).unwrap();
        assert!(on.is_favorite);
        assert_eq!(list_favorites(&db, user.id).unwrap().total, 1);

        let off = toggle_favorite(&db, user.id, food_id).unwrap();
        assert!(!off.is_favorite);
        assert_eq!(list_favorites(&db, user.id).unwrap().total, 0);
    }

    #[test]
    fn test_favorite_unknown_food_is_not_found() {
        let db = test_db();
        let user = create_user(&db, "a@example.com", "alice").unwrap();
        assert!(matches!(
            toggle_favorite(&db, user.id, 999),
            Err(ToolError::NotFound(_))
        ));
    }
}
