//! Data models
//!
//! Row-level types and their SQLite CRUD, one module per table.

pub mod favorite;
pub mod food;
pub mod food_log;
pub mod nutrition;
pub mod user;

pub use favorite::Favorite;
pub use food::{Food, FoodCreate};
pub use food_log::{day_bounds, FoodLog, FoodLogCreate, MealType};
pub use nutrition::{round1, Nutrition};
pub use user::{ProfileUpdate, User};
