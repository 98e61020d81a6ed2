//! List materialization: combine derived aggregated entries with stored
//! rows into the per-list view the UI renders, plus grouped projections.

use serde::Serialize;

use crate::aggregate::{AggregatedItem, IngredientKey};
use crate::lifecycle::ItemState;
use crate::models::{
    AggregatedOverride, Category, LIST_TYPE_WEEKLY, ShoppingList, ShoppingListItem,
};

/// One displayable entry of a materialized list. `item_id` is `None` for
/// virtual entries derived from the meal plan; those only gain a stored
/// row (and an id) once the user moves them into another list.
#[derive(Debug, Clone, Serialize)]
pub struct ListEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub category: String,
    pub checked: bool,
    pub source_recipe_ids: Vec<String>,
}

impl ListEntry {
    /// Recipe-derived entries carry provenance; manual entries do not.
    #[must_use]
    pub fn is_recipe_derived(&self) -> bool {
        !self.source_recipe_ids.is_empty()
    }

    #[must_use]
    pub fn key(&self) -> IngredientKey {
        IngredientKey::new(&self.name, &self.unit)
    }
}

/// Build the displayed entries for one list.
///
/// Weekly lists combine the aggregated meal-plan entries (minus hidden
/// overrides, with checked overrides applied) with the list's own stored
/// active rows. Midweek and custom lists never receive aggregated
/// entries; they show stored rows only.
#[must_use]
pub fn materialize(
    aggregated: &[AggregatedItem],
    overrides: &[AggregatedOverride],
    stored: &[ShoppingListItem],
    list: &ShoppingList,
) -> Vec<ListEntry> {
    let mut entries = Vec::new();

    if list.list_type == LIST_TYPE_WEEKLY {
        for item in aggregated {
            let ovr = overrides
                .iter()
                .find(|o| o.name == item.key.name && o.unit == item.key.unit);
            if ovr.is_some_and(|o| o.is_hidden) {
                continue;
            }
            entries.push(ListEntry {
                item_id: None,
                name: item.key.name.clone(),
                quantity: item.quantity,
                unit: item.key.unit.clone(),
                category: item.category.clone(),
                checked: ovr.is_some_and(|o| o.is_checked),
                source_recipe_ids: item.source_recipe_ids.clone(),
            });
        }
    }

    let mut active: Vec<&ShoppingListItem> = stored
        .iter()
        .filter(|i| matches!(ItemState::of(i), ItemState::Active { .. }))
        .collect();
    active.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.name.cmp(&b.name)));
    for item in active {
        entries.push(ListEntry {
            item_id: Some(item.id.clone()),
            name: item.name.clone(),
            quantity: item.quantity,
            unit: item.unit.clone(),
            category: item.category.clone(),
            checked: item.is_checked,
            source_recipe_ids: item.source_recipe_ids.clone(),
        });
    }

    entries
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryGroup {
    pub category: Category,
    pub entries: Vec<ListEntry>,
}

/// Partition entries into the fixed category set, in display order.
/// Unrecognized category strings land in `Other`. Empty groups are
/// omitted.
#[must_use]
pub fn group_by_category(entries: &[ListEntry]) -> Vec<CategoryGroup> {
    Category::ALL
        .iter()
        .filter_map(|&category| {
            let matching: Vec<ListEntry> = entries
                .iter()
                .filter(|e| Category::parse(&e.category) == category)
                .cloned()
                .collect();
            (!matching.is_empty()).then_some(CategoryGroup {
                category,
                entries: matching,
            })
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct RecipeGroup {
    pub recipe_id: String,
    pub entries: Vec<ListEntry>,
}

/// Fan entries out under each contributing recipe. An entry with N
/// source recipes appears in all N groups, so the total displayed count
/// can exceed the flat list length; this is a projection, not a
/// partition. Entries with no recipe provenance appear in no group.
#[must_use]
pub fn group_by_recipe(entries: &[ListEntry]) -> Vec<RecipeGroup> {
    let mut recipe_ids: Vec<String> = entries
        .iter()
        .flat_map(|e| e.source_recipe_ids.iter().cloned())
        .collect();
    recipe_ids.sort();
    recipe_ids.dedup();

    recipe_ids
        .into_iter()
        .map(|recipe_id| {
            let matching = entries
                .iter()
                .filter(|e| e.source_recipe_ids.contains(&recipe_id))
                .cloned()
                .collect();
            RecipeGroup {
                recipe_id,
                entries: matching,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(list_type: &str) -> ShoppingList {
        ShoppingList {
            id: "list-1".to_string(),
            week_start: "2025-01-13".to_string(),
            name: "Weekly".to_string(),
            list_type: list_type.to_string(),
            created_at: String::new(),
        }
    }

    fn agg(name: &str, unit: &str, qty: f64, category: &str, recipes: &[&str]) -> AggregatedItem {
        AggregatedItem {
            key: IngredientKey::new(name, unit),
            quantity: qty,
            category: category.to_string(),
            source_recipe_ids: recipes.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    fn stored(id: &str, name: &str, qty: f64, deleted: bool, moved: Option<&str>) -> ShoppingListItem {
        ShoppingListItem {
            id: id.to_string(),
            list_id: "list-1".to_string(),
            name: name.to_string(),
            quantity: qty,
            unit: "".to_string(),
            category: "Other".to_string(),
            is_checked: false,
            is_deleted: deleted,
            deleted_at: deleted.then(|| "2025-01-15T10:00:00Z".to_string()),
            moved_to_list_id: moved.map(String::from),
            source_recipe_ids: vec![],
            created_at: String::new(),
        }
    }

    fn ovr(name: &str, unit: &str, hidden: bool, checked: bool) -> AggregatedOverride {
        AggregatedOverride {
            list_id: "list-1".to_string(),
            week_start: "2025-01-13".to_string(),
            name: name.to_string(),
            unit: unit.to_string(),
            is_checked: checked,
            is_hidden: hidden,
            moved_to_list_id: None,
        }
    }

    #[test]
    fn test_weekly_list_combines_aggregated_and_manual() {
        let aggregated = vec![agg("ground beef", "g", 1000.0, "Meat & Seafood", &["tacos"])];
        let manual = vec![stored("i1", "Milk", 1.0, false, None)];
        let entries = materialize(&aggregated, &[], &manual, &list("weekly"));
        assert_eq!(entries.len(), 2);
        assert!(entries[0].item_id.is_none());
        assert!(entries[0].is_recipe_derived());
        assert_eq!(entries[1].item_id.as_deref(), Some("i1"));
        assert!(!entries[1].is_recipe_derived());
    }

    #[test]
    fn test_midweek_and_custom_lists_get_no_aggregation() {
        let aggregated = vec![agg("ground beef", "g", 1000.0, "Meat & Seafood", &["tacos"])];
        let manual = vec![stored("i1", "Milk", 1.0, false, None)];
        for list_type in ["midweek", "custom"] {
            let entries = materialize(&aggregated, &[], &manual, &list(list_type));
            assert_eq!(entries.len(), 1);
            assert_eq!(entries[0].name, "Milk");
        }
    }

    #[test]
    fn test_deleted_and_moved_rows_are_not_displayed() {
        let rows = vec![
            stored("i1", "Milk", 1.0, false, None),
            stored("i2", "Eggs", 12.0, true, None),
            stored("i3", "Bread", 1.0, false, Some("list-2")),
        ];
        let entries = materialize(&[], &[], &rows, &list("custom"));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Milk");
    }

    #[test]
    fn test_hidden_override_suppresses_virtual_entry() {
        let aggregated = vec![
            agg("onion", "", 3.0, "Produce", &["soup"]),
            agg("rice", "g", 200.0, "Pantry", &["curry"]),
        ];
        let overrides = vec![ovr("onion", "", true, false)];
        let entries = materialize(&aggregated, &overrides, &[], &list("weekly"));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "rice");
    }

    #[test]
    fn test_checked_override_applies_to_virtual_entry() {
        let aggregated = vec![agg("rice", "g", 200.0, "Pantry", &["curry"])];
        let overrides = vec![ovr("rice", "g", false, true)];
        let entries = materialize(&aggregated, &overrides, &[], &list("weekly"));
        assert_eq!(entries.len(), 1);
        assert!(entries[0].checked);
    }

    #[test]
    fn test_override_keyed_by_unit_too() {
        let aggregated = vec![
            agg("flour", "g", 500.0, "Pantry", &["bread"]),
            agg("flour", "cup", 2.0, "Pantry", &["cake"]),
        ];
        let overrides = vec![ovr("flour", "g", true, false)];
        let entries = materialize(&aggregated, &overrides, &[], &list("weekly"));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].unit, "cup");
    }

    #[test]
    fn test_group_by_category_uses_fixed_order_with_other_fallback() {
        let entries = materialize(
            &[
                agg("rice", "g", 200.0, "Pantry", &["curry"]),
                agg("apple", "", 4.0, "Produce", &["pie"]),
                agg("saffron", "g", 1.0, "Exotic Spices", &["paella"]),
            ],
            &[],
            &[],
            &list("weekly"),
        );
        let groups = group_by_category(&entries);
        let order: Vec<Category> = groups.iter().map(|g| g.category).collect();
        assert_eq!(
            order,
            vec![Category::Produce, Category::Pantry, Category::Other]
        );
        let other = groups.last().unwrap();
        assert_eq!(other.entries[0].name, "saffron");
    }

    #[test]
    fn test_group_by_recipe_fans_out_shared_items() {
        let entries = materialize(
            &[
                agg("onion", "", 3.0, "Produce", &["curry", "soup"]),
                agg("rice", "g", 200.0, "Pantry", &["curry"]),
            ],
            &[],
            &[],
            &list("weekly"),
        );
        let groups = group_by_recipe(&entries);
        assert_eq!(groups.len(), 2);
        let total: usize = groups.iter().map(|g| g.entries.len()).sum();
        // onion appears under both curry and soup: 3 displayed > 2 flat.
        assert_eq!(total, 3);
        assert!(total > entries.len());
    }

    #[test]
    fn test_group_by_recipe_skips_manual_entries() {
        let manual = vec![stored("i1", "Milk", 1.0, false, None)];
        let entries = materialize(&[], &[], &manual, &list("weekly"));
        assert!(group_by_recipe(&entries).is_empty());
    }
}
