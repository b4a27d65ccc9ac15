//! NutriTrack Library
//!
//! Core functionality for personal nutrition tracking: a reference food
//! database, food logging with cached scaled nutrition, daily and weekly
//! aggregation, and calorie/macro target calculation.

pub mod build_info;
pub mod db;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod tools;
