//! NutriTrack MCP Server Implementation
//!
//! Exposes the nutrition tools over MCP.

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::models::{FoodCreate, MealType, ProfileUpdate};
use crate::nutrition::{ActivityLevel, Gender, Goal};
use crate::tools::{dashboard, foods, import, logs, profile, ToolError};

/// NutriTrack MCP Service
#[derive(Clone)]
pub struct NutriTrackService {
    database: Database,
    tool_router: ToolRouter<NutriTrackService>,
}

impl NutriTrackService {
    pub fn new(database: Database) -> Self {
        Self {
            database,
            tool_router: Self::tool_router(),
        }
    }
}

fn tool_error(e: ToolError) -> McpError {
    match e {
        ToolError::InvalidInput(msg) => McpError::invalid_params(msg, None),
        ToolError::NotFound(msg) => McpError::invalid_params(format!("not found: {}", msg), None),
        ToolError::Db(e) => McpError::internal_error(e.to_string(), None),
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateUserParams {
    pub email: String,
    pub username: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetProfileParams {
    pub user_id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateProfileParams {
    pub user_id: i64,
    pub age: Option<i64>,
    /// "male" or "female"
    pub gender: Option<String>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    /// sedentary, light, moderate, active, or very_active
    pub activity_level: Option<String>,
    /// loss, gain, or maintain
    pub goal: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddFoodParams {
    pub name: String,
    /// kcal per 100g
    pub calories: f64,
    /// grams per 100g
    pub protein: f64,
    /// grams per 100g
    pub carbs: f64,
    /// grams per 100g
    pub fat: f64,
    #[serde(default)]
    pub cholesterol_mg: f64,
    #[serde(default)]
    pub sodium_mg: f64,
    #[serde(default)]
    pub fibre_g: f64,
    #[serde(default)]
    pub vitc_mg: f64,
    #[serde(default)]
    pub vita_ug: f64,
    #[serde(default)]
    pub iron_mg: f64,
    pub category: Option<String>,
}

fn default_search_limit() -> i64 {
    20
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchFoodsParams {
    pub query: String,
    #[serde(default = "default_search_limit")]
    pub limit: i64,
}

fn default_list_limit() -> i64 {
    50
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListFoodsParams {
    #[serde(default = "default_list_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ImportCsvParams {
    /// Path to a CSV file with a food_name column and per-100g nutrient columns
    pub file_path: String,
}

fn default_unit() -> String {
    "g".to_string()
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogFoodParams {
    pub user_id: i64,
    pub food_id: i64,
    pub quantity: f64,
    /// g, ml, bowl, cup, or pc; unknown units are treated as grams
    #[serde(default = "default_unit")]
    pub unit: String,
    /// breakfast, lunch, dinner, or snack
    pub meal_type: String,
    /// "YYYY-MM-DD HH:MM:SS" override; defaults to now
    pub logged_at: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteLogParams {
    pub user_id: i64,
    pub log_id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DayParams {
    pub user_id: i64,
    /// "YYYY-MM-DD"; defaults to today
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RecentFoodsParams {
    pub user_id: i64,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FavoriteParams {
    pub user_id: i64,
    pub food_id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListFavoritesParams {
    pub user_id: i64,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl NutriTrackService {
    // --- Profile ---

    #[tool(description = "Create a new user account with email and username")]
    fn create_user(&self, Parameters(p): Parameters<CreateUserParams>) -> Result<CallToolResult, McpError> {
        let result = profile::create_user(&self.database, &p.email, &p.username).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Get a user's profile including daily targets, BMI, and streaks")]
    fn get_profile(&self, Parameters(p): Parameters<GetProfileParams>) -> Result<CallToolResult, McpError> {
        let result = profile::get_profile(&self.database, p.user_id).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Update profile fields (age, gender, weight, height, activity level, goal). Recalculates daily calorie and macro targets when the profile is complete; otherwise reports which fields are still missing.")]
    fn update_profile(&self, Parameters(p): Parameters<UpdateProfileParams>) -> Result<CallToolResult, McpError> {
        let update = ProfileUpdate {
            age: p.age,
            gender: p.gender.as_deref().map(Gender::from_str),
            weight_kg: p.weight_kg,
            height_cm: p.height_cm,
            activity_level: p.activity_level.as_deref().map(ActivityLevel::from_str),
            goal: p.goal.as_deref().map(Goal::from_str),
        };
        let result = profile::update_profile(&self.database, p.user_id, &update).map_err(tool_error)?;
        json_result(&result)
    }

    // --- Foods ---

    #[tool(description = "Add a food to the reference database with per-100g nutrition values")]
    fn add_food(&self, Parameters(p): Parameters<AddFoodParams>) -> Result<CallToolResult, McpError> {
        let data = FoodCreate {
            name: p.name,
            calories: p.calories,
            protein: p.protein,
            carbs: p.carbs,
            fat: p.fat,
            cholesterol_mg: p.cholesterol_mg,
            sodium_mg: p.sodium_mg,
            fibre_g: p.fibre_g,
            vitc_mg: p.vitc_mg,
            vita_ug: p.vita_ug,
            iron_mg: p.iron_mg,
            category: p.category,
        };
        let result = foods::add_food(&self.database, data).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Search foods by name (case-insensitive substring; queries under 2 characters return nothing)")]
    fn search_foods(&self, Parameters(p): Parameters<SearchFoodsParams>) -> Result<CallToolResult, McpError> {
        let result = foods::search_foods(&self.database, &p.query, p.limit).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "List foods ordered by name with pagination")]
    fn list_foods(&self, Parameters(p): Parameters<ListFoodsParams>) -> Result<CallToolResult, McpError> {
        let result = foods::list_foods(&self.database, p.limit, p.offset).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Import foods from a CSV file, replacing the current food table. Bad rows are skipped and reported, never aborting the import.")]
    fn import_nutrition_csv(&self, Parameters(p): Parameters<ImportCsvParams>) -> Result<CallToolResult, McpError> {
        let result = import::import_nutrition_csv(&self.database, &p.file_path).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Seed the food database with built-in starter foods. Does nothing if foods already exist.")]
    fn seed_sample_foods(&self) -> Result<CallToolResult, McpError> {
        let result = foods::seed_sample_foods(&self.database).map_err(tool_error)?;
        json_result(&result)
    }

    // --- Logging ---

    #[tool(description = "Log a food intake entry. Quantity is normalized to grams (bowl=180g, cup=240g, pc=60g), nutrition is scaled from the food's per-100g values and cached on the entry, and the logging streak is updated.")]
    fn log_food(&self, Parameters(p): Parameters<LogFoodParams>) -> Result<CallToolResult, McpError> {
        let result = logs::log_food(
            &self.database,
            p.user_id,
            p.food_id,
            p.quantity,
            &p.unit,
            MealType::from_str(&p.meal_type),
            p.logged_at,
        )
        .map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Delete a food log entry (must belong to the given user)")]
    fn delete_log(&self, Parameters(p): Parameters<DeleteLogParams>) -> Result<CallToolResult, McpError> {
        let result = logs::delete_log(&self.database, p.user_id, p.log_id).map_err(tool_error)?;
        json_result(&result)
    }

    // --- Dashboard ---

    #[tool(description = "Get one day's nutrition totals against the user's daily targets. A day with no logs is a zero summary, not an error.")]
    fn get_daily_summary(&self, Parameters(p): Parameters<DayParams>) -> Result<CallToolResult, McpError> {
        let result = dashboard::get_daily_summary(&self.database, p.user_id, p.date.as_deref())
            .map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Get calories per meal type for one day (meal types without entries are omitted)")]
    fn get_meal_breakdown(&self, Parameters(p): Parameters<DayParams>) -> Result<CallToolResult, McpError> {
        let result = dashboard::get_meal_breakdown(&self.database, p.user_id, p.date.as_deref())
            .map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Get seven daily calorie totals ending at the given date, oldest first, with weekday labels")]
    fn get_weekly_data(&self, Parameters(p): Parameters<DayParams>) -> Result<CallToolResult, McpError> {
        let result = dashboard::get_weekly_data(&self.database, p.user_id, p.date.as_deref())
            .map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Get the user's most recently logged distinct foods (default 5)")]
    fn get_recent_foods(&self, Parameters(p): Parameters<RecentFoodsParams>) -> Result<CallToolResult, McpError> {
        let result = dashboard::get_recent_foods(&self.database, p.user_id, p.limit)
            .map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "Get the full daily dashboard: summary vs targets, per-meal log groups, weekly trend, recent and favorite foods, and streak badge")]
    fn get_dashboard(&self, Parameters(p): Parameters<DayParams>) -> Result<CallToolResult, McpError> {
        let result = dashboard::get_dashboard(&self.database, p.user_id, p.date.as_deref())
            .map_err(tool_error)?;
        json_result(&result)
    }

    // --- Favorites ---

    #[tool(description = "Toggle a food in the user's favorites; reports whether it is now a favorite")]
    fn toggle_favorite(&self, Parameters(p): Parameters<FavoriteParams>) -> Result<CallToolResult, McpError> {
        let result = foods::toggle_favorite(&self.database, p.user_id, p.food_id).map_err(tool_error)?;
        json_result(&result)
    }

    #[tool(description = "List the user's favorite foods, most recently added first")]
    fn list_favorites(&self, Parameters(p): Parameters<ListFavoritesParams>) -> Result<CallToolResult, McpError> {
        let result = foods::list_favorites(&self.database, p.user_id).map_err(tool_error)?;
        json_result(&result)
    }
}

#[tool_handler]
impl ServerHandler for NutriTrackService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "nutritrack".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("NutriTrack".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "NutriTrack - personal nutrition tracking. \
                 Accounts: create_user, get_profile, update_profile (recalculates daily targets). \
                 Foods: add_food, search_foods, list_foods, import_nutrition_csv, seed_sample_foods. \
                 Logging: log_food (quantity in g/ml/bowl/cup/pc), delete_log. \
                 Dashboard: get_daily_summary, get_meal_breakdown, get_weekly_data, get_recent_foods, get_dashboard. \
                 Favorites: toggle_favorite, list_favorites. \
                 Start by creating a user and seeding or importing foods."
                    .into(),
            ),
        }
    }
}
