//! Pure derivation of consolidated shopping items from planned meals.
//!
//! Three stages: normalize ingredient identity, expand planned meals into
//! scaled ingredient lines, and merge lines by canonical identity. All
//! functions here are pure; the service layer re-runs them whenever the
//! underlying plan or recipe data changes.

use std::collections::HashMap;

use serde::Serialize;

use crate::models::{PlannedMeal, RecipeDetail};

/// Canonical identity of a shopping item: lowercased, trimmed name plus
/// the unit string verbatim. No unit conversion happens during
/// aggregation, so "flour"/"g" and "flour"/"cup" stay distinct entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct IngredientKey {
    pub name: String,
    pub unit: String,
}

impl IngredientKey {
    #[must_use]
    pub fn new(name: &str, unit: &str) -> Self {
        IngredientKey {
            name: name.trim().to_lowercase(),
            unit: unit.to_string(),
        }
    }
}

/// One recipe ingredient line scaled to a planned meal's servings.
#[derive(Debug, Clone)]
pub struct ExpandedLine {
    pub key: IngredientKey,
    pub quantity: f64,
    pub source_recipe_id: String,
}

/// Consolidated shopping entry for one canonical key.
#[derive(Debug, Clone, Serialize)]
pub struct AggregatedItem {
    pub key: IngredientKey,
    pub quantity: f64,
    pub category: String,
    pub source_recipe_ids: Vec<String>,
}

/// Expand planned meals into flat, scaled ingredient lines.
///
/// Each meal's quantities are scaled by `meal.servings / recipe.servings`.
/// Meals whose recipe id is missing from `recipes` are skipped: a recipe
/// deleted after planning contributes nothing but must not abort the
/// rest of the batch. A recipe with `servings < 1` yields a multiplier
/// of 0 instead of dividing by zero.
#[must_use]
pub fn expand(meals: &[PlannedMeal], recipes: &HashMap<String, RecipeDetail>) -> Vec<ExpandedLine> {
    let mut lines = Vec::new();
    for meal in meals {
        let Some(recipe) = recipes.get(&meal.recipe_id) else {
            log::debug!(
                "expand: skipping meal {} with unresolved recipe {}",
                meal.id,
                meal.recipe_id
            );
            continue;
        };
        #[allow(clippy::cast_precision_loss)]
        let multiplier = if recipe.servings < 1 {
            0.0
        } else {
            meal.servings as f64 / recipe.servings as f64
        };
        for line in &recipe.ingredients {
            lines.push(ExpandedLine {
                key: IngredientKey::new(&line.name, &line.unit),
                quantity: line.quantity * multiplier,
                source_recipe_id: recipe.id.clone(),
            });
        }
    }
    lines
}

/// Merge expanded lines by canonical key: sum quantities, union the
/// contributing recipe ids. `category_for` maps a normalized ingredient
/// name to its catalog category; unknown names get "Other".
///
/// Output is sorted by category then name, so the result is stable
/// regardless of input order (summed floats may differ sub-epsilon
/// across orderings; compare with a tolerance).
pub fn aggregate<F>(lines: &[ExpandedLine], category_for: F) -> Vec<AggregatedItem>
where
    F: Fn(&str) -> Option<String>,
{
    struct Group {
        quantity: f64,
        recipe_ids: Vec<String>,
    }

    let mut grouped: HashMap<IngredientKey, Group> = HashMap::new();
    for line in lines {
        let group = grouped.entry(line.key.clone()).or_insert_with(|| Group {
            quantity: 0.0,
            recipe_ids: Vec::new(),
        });
        group.quantity += line.quantity;
        if !group.recipe_ids.contains(&line.source_recipe_id) {
            group.recipe_ids.push(line.source_recipe_id.clone());
        }
    }

    let mut result: Vec<AggregatedItem> = grouped
        .into_iter()
        .map(|(key, mut group)| {
            group.recipe_ids.sort();
            let category = category_for(&key.name).unwrap_or_else(|| "Other".to_string());
            AggregatedItem {
                key,
                quantity: group.quantity,
                category,
                source_recipe_ids: group.recipe_ids,
            }
        })
        .collect();

    result.sort_by(|a, b| {
        a.category
            .cmp(&b.category)
            .then_with(|| a.key.name.cmp(&b.key.name))
            .then_with(|| a.key.unit.cmp(&b.key.unit))
    });
    result
}
