use std::collections::HashMap;
use std::path::Path;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::aggregate::{self, AggregatedItem, IngredientKey};
use crate::db::Database;
use crate::error::{Error, Result};
use crate::lifecycle::{self, ItemState, Outcome};
use crate::materialize::{self, ListEntry};
use crate::models::{
    Ingredient, NewIngredientLine, NewPlannedMeal, NewQuickListItem, NewRecipe, NewShoppingItem,
    PlannedMeal, QuickList, QuickListItem, RecipeDetail, RecipeIngredient, ShoppingList,
    ShoppingListItem, parse_date,
};

/// One shopping list together with its displayed entries.
#[derive(Debug, Clone, Serialize)]
pub struct ListView {
    pub list: ShoppingList,
    pub entries: Vec<ListEntry>,
}

/// Everything the week screen shows: planned meals plus every list of
/// the week, materialized.
#[derive(Debug, Clone, Serialize)]
pub struct WeekView {
    pub week_start: String,
    pub meals: Vec<PlannedMeal>,
    pub lists: Vec<ListView>,
}

/// Application facade over the database and the pure derivation
/// pipeline. Derived list content is recomputed on every read; nothing
/// aggregated is persisted except the per-entry override markers.
pub struct LarderService {
    db: Database,
}

impl LarderService {
    pub fn new(path: &Path) -> Result<Self> {
        Ok(LarderService {
            db: Database::open(path)?,
        })
    }

    pub fn new_in_memory() -> Result<Self> {
        Ok(LarderService {
            db: Database::open_in_memory()?,
        })
    }

    // --- Recipes ---

    pub fn create_recipe(&self, recipe: &NewRecipe) -> Result<RecipeDetail> {
        self.db.create_recipe(recipe)
    }

    pub fn get_recipe(&self, id: &str) -> Result<RecipeDetail> {
        self.db.get_recipe(id)
    }

    pub fn find_recipe_by_name(&self, name: &str) -> Result<RecipeDetail> {
        self.db.find_recipe_by_name(name)
    }

    pub fn list_recipes(&self) -> Result<Vec<RecipeDetail>> {
        self.db.list_recipes()
    }

    pub fn set_recipe_servings(&self, id: &str, servings: i64) -> Result<()> {
        self.db.set_recipe_servings(id, servings)
    }

    pub fn delete_recipe(&self, id: &str) -> Result<()> {
        self.db.delete_recipe(id)
    }

    pub fn add_ingredient_line(
        &self,
        recipe_id: &str,
        line: &NewIngredientLine,
    ) -> Result<RecipeIngredient> {
        self.db.add_ingredient_line(recipe_id, line)
    }

    pub fn remove_ingredient_line(&self, recipe_id: &str, name: &str) -> Result<()> {
        self.db.remove_ingredient_line(recipe_id, name)
    }

    // --- Ingredient catalog ---

    pub fn list_ingredients(&self) -> Result<Vec<Ingredient>> {
        self.db.list_ingredients()
    }

    pub fn set_ingredient_category(&self, name: &str, category: &str) -> Result<Ingredient> {
        self.db.set_ingredient_category(name, category)
    }

    // --- Meal plans ---

    pub fn plan_meal(&self, meal: &NewPlannedMeal) -> Result<PlannedMeal> {
        self.db.plan_meal(meal)
    }

    pub fn list_planned_meals(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<PlannedMeal>> {
        self.db.list_planned_meals(start, end)
    }

    pub fn set_meal_servings(&self, id: &str, servings: i64) -> Result<PlannedMeal> {
        self.db.set_meal_servings(id, servings)
    }

    pub fn unplan_meal(&self, id: &str) -> Result<()> {
        self.db.unplan_meal(id)
    }

    // --- Derived views ---

    /// Aggregate the week's planned meals into consolidated entries.
    /// Plans whose recipe has since been deleted are skipped.
    fn aggregated_for_week(&self, week_start: NaiveDate) -> Result<Vec<AggregatedItem>> {
        let meals = self
            .db
            .list_planned_meals(week_start, week_start + Duration::days(6))?;

        let mut recipes: HashMap<String, RecipeDetail> = HashMap::new();
        for meal in &meals {
            if recipes.contains_key(&meal.recipe_id) {
                continue;
            }
            match self.db.get_recipe(&meal.recipe_id) {
                Ok(recipe) => {
                    recipes.insert(meal.recipe_id.clone(), recipe);
                }
                Err(Error::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }

        let lines = aggregate::expand(&meals, &recipes);
        let categories = self.db.category_map()?;
        Ok(aggregate::aggregate(&lines, |name| {
            categories.get(name).cloned()
        }))
    }

    fn materialize_list(
        &self,
        list: &ShoppingList,
        aggregated: &[AggregatedItem],
    ) -> Result<ListView> {
        let overrides = self.db.overrides_for_list(&list.id)?;
        let stored = self.db.list_items(&list.id)?;
        let entries = materialize::materialize(aggregated, &overrides, &stored, list);
        Ok(ListView {
            list: list.clone(),
            entries,
        })
    }

    /// The week screen. Creates the week's weekly list on first view.
    pub fn week_view(&self, week_start: NaiveDate) -> Result<WeekView> {
        self.db.ensure_weekly_list(week_start)?;
        let meals = self
            .db
            .list_planned_meals(week_start, week_start + Duration::days(6))?;
        let aggregated = self.aggregated_for_week(week_start)?;

        let mut lists = Vec::new();
        for list in self.db.lists_for_week(week_start)? {
            lists.push(self.materialize_list(&list, &aggregated)?);
        }
        Ok(WeekView {
            week_start: week_start.format("%Y-%m-%d").to_string(),
            meals,
            lists,
        })
    }

    pub fn list_view(&self, list_id: &str) -> Result<ListView> {
        let list = self.db.get_list(list_id)?;
        let week_start = parse_date(&list.week_start)?;
        let aggregated = self.aggregated_for_week(week_start)?;
        self.materialize_list(&list, &aggregated)
    }

    // --- Shopping lists ---

    pub fn create_list(
        &self,
        week_start: NaiveDate,
        name: &str,
        list_type: &str,
    ) -> Result<ShoppingList> {
        self.db.create_list(week_start, name, list_type)
    }

    pub fn get_list(&self, id: &str) -> Result<ShoppingList> {
        self.db.get_list(id)
    }

    pub fn lists_for_week(&self, week_start: NaiveDate) -> Result<Vec<ShoppingList>> {
        self.db.lists_for_week(week_start)
    }

    pub fn delete_list(&self, id: &str) -> Result<()> {
        self.db.delete_list(id)
    }

    // --- Stored items ---

    /// Add a manual item. The category defaults from the ingredient
    /// catalog when not given, and the catalog learns any new name.
    pub fn add_item(
        &self,
        list_id: &str,
        name: &str,
        quantity: f64,
        unit: &str,
        category: Option<&str>,
    ) -> Result<ShoppingListItem> {
        let category = match category {
            Some(c) => {
                self.db.get_or_create_ingredient(name, c, None)?;
                c.to_string()
            }
            None => self.db.get_or_create_ingredient(name, "Other", None)?.category,
        };
        self.db.add_item(&NewShoppingItem {
            list_id: list_id.to_string(),
            name: name.to_string(),
            quantity,
            unit: unit.to_string(),
            category,
            source_recipe_ids: vec![],
        })
    }

    pub fn get_item(&self, id: &str) -> Result<ShoppingListItem> {
        self.db.get_item(id)
    }

    pub fn deleted_items(&self, list_id: &str) -> Result<Vec<ShoppingListItem>> {
        self.db.deleted_items(list_id)
    }

    pub fn set_item_checked(&self, id: &str, checked: bool) -> Result<ShoppingListItem> {
        let item = self.db.get_item(id)?;
        lifecycle::check_toggle(ItemState::of(&item))?;
        self.db.set_item_checked(id, checked)?;
        self.db.get_item(id)
    }

    /// Soft-delete. Re-deleting an already deleted item is a no-op;
    /// deleting a moved item is rejected.
    pub fn soft_delete_item(&self, id: &str) -> Result<ShoppingListItem> {
        let item = self.db.get_item(id)?;
        match lifecycle::check_soft_delete(ItemState::of(&item))? {
            Outcome::Apply => {
                self.db.mark_item_deleted(id)?;
                self.db.get_item(id)
            }
            Outcome::Noop => Ok(item),
        }
    }

    /// Restore a soft-deleted item with its quantity and checked state
    /// exactly as they were at deletion time. If an equivalent row was
    /// added to the list while this one was deleted, the quantity folds
    /// into that row instead, so one canonical identity never spans two
    /// active rows.
    pub fn restore_item(&self, id: &str) -> Result<ShoppingListItem> {
        let item = self.db.get_item(id)?;
        lifecycle::check_restore(ItemState::of(&item))?;
        let key = IngredientKey::new(&item.name, &item.unit);
        if self.db.find_active_item(&item.list_id, &key)?.is_some() {
            let merged = self.db.add_item(&NewShoppingItem {
                list_id: item.list_id.clone(),
                name: item.name.clone(),
                quantity: item.quantity,
                unit: item.unit.clone(),
                category: item.category.clone(),
                source_recipe_ids: item.source_recipe_ids.clone(),
            })?;
            self.db.purge_item(id)?;
            return Ok(merged);
        }
        self.db.clear_item_deleted(id)?;
        self.db.get_item(id)
    }

    /// Move an item to another list. The source row stays behind marked
    /// as moved, so the item never appears on two lists at once; the
    /// destination merges on canonical identity like any other add.
    /// Moving to the item's own list is a no-op.
    pub fn move_item(&self, id: &str, to_list_id: &str) -> Result<ShoppingListItem> {
        let item = self.db.get_item(id)?;
        let dest = self.db.get_list(to_list_id)?;
        let state = ItemState::of(&item);
        // Same-list moves are a no-op, but only for an item that is
        // actually still on the list.
        if item.list_id == dest.id && matches!(state, ItemState::Active { .. }) {
            return Ok(item);
        }
        lifecycle::check_move(state)?;

        let moved = self.db.add_item(&NewShoppingItem {
            list_id: dest.id.clone(),
            name: item.name.clone(),
            quantity: item.quantity,
            unit: item.unit.clone(),
            category: item.category.clone(),
            source_recipe_ids: item.source_recipe_ids.clone(),
        })?;
        self.db.mark_item_moved(id, &dest.id)?;
        Ok(moved)
    }

    // --- Aggregated (virtual) entries ---

    /// Find a currently displayed aggregated entry of a weekly list.
    fn find_aggregated(&self, list_id: &str, name: &str, unit: &str) -> Result<ListEntry> {
        let view = self.list_view(list_id)?;
        let key = IngredientKey::new(name, unit);
        view.entries
            .into_iter()
            .find(|e| e.item_id.is_none() && e.key() == key)
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "No aggregated entry '{name}' ({unit}) on this list"
                ))
            })
    }

    /// Check or uncheck a virtual aggregated entry. The marker is
    /// stored per canonical identity, so it survives recomputation when
    /// the underlying quantities change.
    pub fn set_aggregated_checked(
        &self,
        list_id: &str,
        name: &str,
        unit: &str,
        checked: bool,
    ) -> Result<()> {
        let list = self.db.get_list(list_id)?;
        let entry = self.find_aggregated(list_id, name, unit)?;
        let key = entry.key();
        self.db
            .set_override_checked(&list.id, &list.week_start, &key.name, &key.unit, checked)
    }

    /// Hide a virtual aggregated entry from the list without touching
    /// the meal plan that produced it.
    pub fn dismiss_aggregated(&self, list_id: &str, name: &str, unit: &str) -> Result<()> {
        let list = self.db.get_list(list_id)?;
        let entry = self.find_aggregated(list_id, name, unit)?;
        let key = entry.key();
        self.db
            .set_override_hidden(&list.id, &list.week_start, &key.name, &key.unit)
    }

    /// Move a virtual aggregated entry to another list. The entry
    /// becomes a stored item on the destination (merging on canonical
    /// identity) and is hidden from the source via a moved marker.
    pub fn move_aggregated(
        &self,
        list_id: &str,
        name: &str,
        unit: &str,
        to_list_id: &str,
    ) -> Result<ShoppingListItem> {
        let list = self.db.get_list(list_id)?;
        let dest = self.db.get_list(to_list_id)?;
        let entry = self.find_aggregated(list_id, name, unit)?;
        if list.id == dest.id {
            return Err(Error::Validation(
                "Cannot move an entry to the list it is already on".into(),
            ));
        }

        let moved = self.db.add_item(&NewShoppingItem {
            list_id: dest.id.clone(),
            name: entry.name.clone(),
            quantity: entry.quantity,
            unit: entry.unit.clone(),
            category: entry.category.clone(),
            source_recipe_ids: entry.source_recipe_ids.clone(),
        })?;
        let key = entry.key();
        self.db
            .set_override_moved(&list.id, &list.week_start, &key.name, &key.unit, &dest.id)?;
        Ok(moved)
    }

    // --- Quick lists ---

    pub fn create_quick_list(&self, name: &str) -> Result<QuickList> {
        self.db.create_quick_list(name)
    }

    pub fn get_quick_list(&self, id: &str) -> Result<QuickList> {
        self.db.get_quick_list(id)
    }

    pub fn find_quick_list_by_name(&self, name: &str) -> Result<QuickList> {
        self.db.find_quick_list_by_name(name)
    }

    pub fn list_quick_lists(&self) -> Result<Vec<QuickList>> {
        self.db.list_quick_lists()
    }

    pub fn rename_quick_list(&self, id: &str, name: &str) -> Result<QuickList> {
        self.db.rename_quick_list(id, name)
    }

    pub fn delete_quick_list(&self, id: &str) -> Result<()> {
        self.db.delete_quick_list(id)
    }

    pub fn quick_list_items(&self, quick_list_id: &str) -> Result<Vec<QuickListItem>> {
        self.db.quick_list_items(quick_list_id)
    }

    pub fn add_quick_item(
        &self,
        quick_list_id: &str,
        item: &NewQuickListItem,
    ) -> Result<QuickListItem> {
        self.db.add_quick_item(quick_list_id, item)
    }

    pub fn remove_quick_item(&self, item_id: &str) -> Result<()> {
        self.db.remove_quick_item(item_id)
    }

    /// Stamp every template item onto a shopping list, merging with
    /// whatever is already there.
    pub fn apply_quick_list(
        &self,
        quick_list_id: &str,
        list_id: &str,
    ) -> Result<Vec<ShoppingListItem>> {
        let quick = self.db.get_quick_list(quick_list_id)?;
        self.db.get_list(list_id)?;
        let mut added = Vec::new();
        for template in self.db.quick_list_items(&quick.id)? {
            added.push(self.db.add_item(&NewShoppingItem {
                list_id: list_id.to_string(),
                name: template.name,
                quantity: template.quantity,
                unit: template.unit,
                category: template.category,
                source_recipe_ids: vec![],
            })?);
        }
        Ok(added)
    }
}
