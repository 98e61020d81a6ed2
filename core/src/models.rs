use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub servings: i64,
    pub notes: Option<String>,
    pub created_at: String,
}

/// One ordered ingredient line of a recipe.
#[derive(Debug, Clone, Serialize)]
pub struct RecipeIngredient {
    pub id: String,
    pub recipe_id: String,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub display_order: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecipeDetail {
    pub id: String,
    pub name: String,
    pub servings: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub ingredients: Vec<RecipeIngredient>,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub name: String,
    pub servings: i64,
    pub notes: Option<String>,
    pub ingredients: Vec<NewIngredientLine>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewIngredientLine {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub category: Option<String>,
    pub notes: Option<String>,
}

/// Catalog entry mapping an ingredient name to a store category.
#[derive(Debug, Clone, Serialize)]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_unit: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlannedMeal {
    pub id: String,
    pub date: String,
    pub meal_type: String,
    pub recipe_id: String,
    pub servings: i64,
    pub created_at: String,
    // Joined field for display
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipe_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewPlannedMeal {
    pub date: NaiveDate,
    pub meal_type: String,
    pub recipe_id: String,
    pub servings: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShoppingList {
    pub id: String,
    pub week_start: String,
    pub name: String,
    pub list_type: String,
    pub created_at: String,
}

/// Persisted form of an item once it lives inside a list: manual entries,
/// quick-list copies, and aggregated entries materialized by a move.
#[derive(Debug, Clone, Serialize)]
pub struct ShoppingListItem {
    pub id: String,
    pub list_id: String,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub category: String,
    pub is_checked: bool,
    pub is_deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moved_to_list_id: Option<String>,
    pub source_recipe_ids: Vec<String>,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct NewShoppingItem {
    pub list_id: String,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub category: String,
    pub source_recipe_ids: Vec<String>,
}

/// User action recorded against a virtual (not yet materialized)
/// aggregated entry, keyed by canonical identity within one list.
#[derive(Debug, Clone, Serialize)]
pub struct AggregatedOverride {
    pub list_id: String,
    pub week_start: String,
    pub name: String,
    pub unit: String,
    pub is_checked: bool,
    pub is_hidden: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moved_to_list_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuickList {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuickListItem {
    pub id: String,
    pub quick_list_id: String,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub category: String,
}

#[derive(Debug, Clone)]
pub struct NewQuickListItem {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub category: String,
}

pub const MEAL_TYPES: &[&str] = &["breakfast", "lunch", "dinner", "snack"];

pub const LIST_TYPE_WEEKLY: &str = "weekly";
pub const LIST_TYPE_MIDWEEK: &str = "midweek";
pub const LIST_TYPE_CUSTOM: &str = "custom";

pub const LIST_TYPES: &[&str] = &[LIST_TYPE_WEEKLY, LIST_TYPE_MIDWEEK, LIST_TYPE_CUSTOM];

pub fn validate_meal_type(meal: &str) -> Result<String> {
    let lower = meal.to_lowercase();
    if MEAL_TYPES.contains(&lower.as_str()) {
        Ok(lower)
    } else {
        Err(Error::Validation(format!(
            "Invalid meal type '{meal}'. Must be one of: {}",
            MEAL_TYPES.join(", ")
        )))
    }
}

pub fn validate_list_type(list_type: &str) -> Result<String> {
    let lower = list_type.to_lowercase();
    if LIST_TYPES.contains(&lower.as_str()) {
        Ok(lower)
    } else {
        Err(Error::Validation(format!(
            "Invalid list type '{list_type}'. Must be one of: {}",
            LIST_TYPES.join(", ")
        )))
    }
}

pub fn validate_servings(servings: i64) -> Result<i64> {
    if servings >= 1 {
        Ok(servings)
    } else {
        Err(Error::Validation(format!(
            "Servings must be at least 1 (got {servings})"
        )))
    }
}

pub fn validate_quantity(quantity: f64) -> Result<f64> {
    if quantity > 0.0 {
        Ok(quantity)
    } else {
        Err(Error::Validation(format!(
            "Quantity must be greater than 0 (got {quantity})"
        )))
    }
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| Error::InvalidDate(s.to_string()))
}

/// Fixed set of store categories used for grouping list entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    Produce,
    MeatSeafood,
    Dairy,
    Bakery,
    Frozen,
    Beverages,
    Pantry,
    Household,
    Other,
}

impl Category {
    /// Display order for grouped views.
    pub const ALL: &'static [Category] = &[
        Category::Produce,
        Category::MeatSeafood,
        Category::Dairy,
        Category::Bakery,
        Category::Frozen,
        Category::Beverages,
        Category::Pantry,
        Category::Household,
        Category::Other,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Produce => "Produce",
            Category::MeatSeafood => "Meat & Seafood",
            Category::Dairy => "Dairy",
            Category::Bakery => "Bakery",
            Category::Frozen => "Frozen",
            Category::Beverages => "Beverages",
            Category::Pantry => "Pantry",
            Category::Household => "Household",
            Category::Other => "Other",
        }
    }

    /// Parse a stored category string; unrecognized values fall back to `Other`.
    #[must_use]
    pub fn parse(s: &str) -> Category {
        match s.trim().to_lowercase().as_str() {
            "produce" => Category::Produce,
            "meat & seafood" | "meat" | "seafood" => Category::MeatSeafood,
            "dairy" => Category::Dairy,
            "bakery" => Category::Bakery,
            "frozen" => Category::Frozen,
            "beverages" => Category::Beverages,
            "pantry" => Category::Pantry,
            "household" => Category::Household,
            _ => Category::Other,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
