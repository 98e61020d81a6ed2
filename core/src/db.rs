use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use uuid::Uuid;

use crate::aggregate::IngredientKey;
use crate::error::{Error, Result};
use crate::models::{
    AggregatedOverride, Ingredient, NewIngredientLine, NewPlannedMeal, NewQuickListItem, NewRecipe,
    NewShoppingItem, PlannedMeal, QuickList, QuickListItem, Recipe, RecipeDetail, RecipeIngredient,
    ShoppingList, ShoppingListItem, validate_list_type, validate_meal_type, validate_quantity,
    validate_servings,
};

pub struct Database {
    conn: Connection,
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

fn date_str(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Database { conn };
        db.init()?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Database { conn };
        db.init()?;
        Ok(db)
    }

    fn init(&self) -> Result<()> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        self.migrate()
    }

    fn migrate(&self) -> Result<()> {
        let version: i64 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;

        if version < 1 {
            self.conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS recipes (
                    id TEXT PRIMARY KEY,
                    name TEXT NOT NULL,
                    servings INTEGER NOT NULL,
                    notes TEXT,
                    created_at TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS recipe_ingredients (
                    id TEXT PRIMARY KEY,
                    recipe_id TEXT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                    name TEXT NOT NULL,
                    quantity REAL NOT NULL,
                    unit TEXT NOT NULL,
                    notes TEXT,
                    display_order INTEGER NOT NULL
                );

                CREATE TABLE IF NOT EXISTS ingredients (
                    id TEXT PRIMARY KEY,
                    name TEXT NOT NULL UNIQUE,
                    category TEXT NOT NULL,
                    default_unit TEXT
                );

                -- recipe_id is deliberately not a foreign key: deleting a
                -- recipe leaves its plans dangling, and expansion skips them.
                CREATE TABLE IF NOT EXISTS meal_plans (
                    id TEXT PRIMARY KEY,
                    date TEXT NOT NULL,
                    meal_type TEXT NOT NULL,
                    recipe_id TEXT NOT NULL,
                    servings INTEGER NOT NULL,
                    created_at TEXT NOT NULL,
                    UNIQUE(date, meal_type, recipe_id)
                );

                CREATE TABLE IF NOT EXISTS shopping_lists (
                    id TEXT PRIMARY KEY,
                    week_start TEXT NOT NULL,
                    name TEXT NOT NULL,
                    list_type TEXT NOT NULL,
                    created_at TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS shopping_list_items (
                    id TEXT PRIMARY KEY,
                    list_id TEXT NOT NULL REFERENCES shopping_lists(id) ON DELETE CASCADE,
                    name TEXT NOT NULL,
                    quantity REAL NOT NULL,
                    unit TEXT NOT NULL,
                    category TEXT NOT NULL,
                    is_checked INTEGER NOT NULL DEFAULT 0,
                    is_deleted INTEGER NOT NULL DEFAULT 0,
                    deleted_at TEXT,
                    moved_to_list_id TEXT,
                    source_recipe_ids TEXT NOT NULL DEFAULT '[]',
                    created_at TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS aggregated_overrides (
                    list_id TEXT NOT NULL REFERENCES shopping_lists(id) ON DELETE CASCADE,
                    week_start TEXT NOT NULL,
                    name TEXT NOT NULL,
                    unit TEXT NOT NULL,
                    is_checked INTEGER NOT NULL DEFAULT 0,
                    is_hidden INTEGER NOT NULL DEFAULT 0,
                    moved_to_list_id TEXT,
                    PRIMARY KEY (list_id, name, unit)
                );

                CREATE TABLE IF NOT EXISTS quick_lists (
                    id TEXT PRIMARY KEY,
                    name TEXT NOT NULL,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS quick_list_items (
                    id TEXT PRIMARY KEY,
                    quick_list_id TEXT NOT NULL REFERENCES quick_lists(id) ON DELETE CASCADE,
                    name TEXT NOT NULL,
                    quantity REAL NOT NULL,
                    unit TEXT NOT NULL,
                    category TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_recipe_ingredients_recipe
                    ON recipe_ingredients(recipe_id);
                CREATE INDEX IF NOT EXISTS idx_meal_plans_date ON meal_plans(date);
                CREATE INDEX IF NOT EXISTS idx_lists_week ON shopping_lists(week_start);
                CREATE INDEX IF NOT EXISTS idx_items_list ON shopping_list_items(list_id);

                PRAGMA user_version = 1;",
            )?;
        }

        Ok(())
    }

    // --- Row mapping helpers ---

    fn recipe_from_row(row: &rusqlite::Row) -> rusqlite::Result<Recipe> {
        Ok(Recipe {
            id: row.get(0)?,
            name: row.get(1)?,
            servings: row.get(2)?,
            notes: row.get(3)?,
            created_at: row.get(4)?,
        })
    }

    fn ingredient_line_from_row(row: &rusqlite::Row) -> rusqlite::Result<RecipeIngredient> {
        Ok(RecipeIngredient {
            id: row.get(0)?,
            recipe_id: row.get(1)?,
            name: row.get(2)?,
            quantity: row.get(3)?,
            unit: row.get(4)?,
            notes: row.get(5)?,
            display_order: row.get(6)?,
        })
    }

    // Expects: id, date, meal_type, recipe_id, servings, created_at, recipe name (joined)
    fn planned_meal_from_row(row: &rusqlite::Row) -> rusqlite::Result<PlannedMeal> {
        Ok(PlannedMeal {
            id: row.get(0)?,
            date: row.get(1)?,
            meal_type: row.get(2)?,
            recipe_id: row.get(3)?,
            servings: row.get(4)?,
            created_at: row.get(5)?,
            recipe_name: row.get(6)?,
        })
    }

    fn list_from_row(row: &rusqlite::Row) -> rusqlite::Result<ShoppingList> {
        Ok(ShoppingList {
            id: row.get(0)?,
            week_start: row.get(1)?,
            name: row.get(2)?,
            list_type: row.get(3)?,
            created_at: row.get(4)?,
        })
    }

    fn item_from_row(row: &rusqlite::Row) -> rusqlite::Result<ShoppingListItem> {
        let sources_json: String = row.get(10)?;
        let source_recipe_ids = serde_json::from_str(&sources_json).unwrap_or_else(|e| {
            log::warn!("Failed to parse source_recipe_ids JSON: {e}");
            Vec::new()
        });
        Ok(ShoppingListItem {
            id: row.get(0)?,
            list_id: row.get(1)?,
            name: row.get(2)?,
            quantity: row.get(3)?,
            unit: row.get(4)?,
            category: row.get(5)?,
            is_checked: row.get(6)?,
            is_deleted: row.get(7)?,
            deleted_at: row.get(8)?,
            moved_to_list_id: row.get(9)?,
            source_recipe_ids,
            created_at: row.get(11)?,
        })
    }

    const ITEM_COLUMNS: &str = "id, list_id, name, quantity, unit, category, \
         is_checked, is_deleted, deleted_at, moved_to_list_id, source_recipe_ids, created_at";

    fn override_from_row(row: &rusqlite::Row) -> rusqlite::Result<AggregatedOverride> {
        Ok(AggregatedOverride {
            list_id: row.get(0)?,
            week_start: row.get(1)?,
            name: row.get(2)?,
            unit: row.get(3)?,
            is_checked: row.get(4)?,
            is_hidden: row.get(5)?,
            moved_to_list_id: row.get(6)?,
        })
    }

    // --- Recipes ---

    pub fn create_recipe(&self, recipe: &NewRecipe) -> Result<RecipeDetail> {
        if recipe.name.trim().is_empty() {
            return Err(Error::Validation("Recipe name must not be empty".into()));
        }
        validate_servings(recipe.servings)?;
        for line in &recipe.ingredients {
            if line.name.trim().is_empty() {
                return Err(Error::Validation(
                    "Ingredient name must not be empty".into(),
                ));
            }
            validate_quantity(line.quantity)?;
        }

        let id = new_id();
        self.conn.execute(
            "INSERT INTO recipes (id, name, servings, notes, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![id, recipe.name.trim(), recipe.servings, recipe.notes, now()],
        )?;
        for (order, line) in recipe.ingredients.iter().enumerate() {
            self.insert_ingredient_line(&id, line, order as i64)?;
        }
        log::debug!("db::create_recipe inserted {id}");
        self.get_recipe(&id)
    }

    fn insert_ingredient_line(
        &self,
        recipe_id: &str,
        line: &NewIngredientLine,
        display_order: i64,
    ) -> Result<RecipeIngredient> {
        let id = new_id();
        self.conn.execute(
            "INSERT INTO recipe_ingredients
                 (id, recipe_id, name, quantity, unit, notes, display_order)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                id,
                recipe_id,
                line.name.trim(),
                line.quantity,
                line.unit,
                line.notes,
                display_order
            ],
        )?;
        // Keep the category catalog in sync with every line we learn about.
        self.get_or_create_ingredient(
            &line.name,
            line.category.as_deref().unwrap_or("Other"),
            None,
        )?;
        self.conn
            .query_row(
                "SELECT id, recipe_id, name, quantity, unit, notes, display_order
                 FROM recipe_ingredients WHERE id = ?1",
                params![id],
                Self::ingredient_line_from_row,
            )
            .map_err(Error::from)
    }

    pub fn get_recipe(&self, id: &str) -> Result<RecipeDetail> {
        let recipe = self
            .conn
            .query_row(
                "SELECT id, name, servings, notes, created_at FROM recipes WHERE id = ?1",
                params![id],
                Self::recipe_from_row,
            )
            .optional()?
            .ok_or_else(|| Error::not_found("Recipe", id))?;

        let mut stmt = self.conn.prepare(
            "SELECT id, recipe_id, name, quantity, unit, notes, display_order
             FROM recipe_ingredients WHERE recipe_id = ?1 ORDER BY display_order",
        )?;
        let ingredients = stmt
            .query_map(params![id], Self::ingredient_line_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(RecipeDetail {
            id: recipe.id,
            name: recipe.name,
            servings: recipe.servings,
            notes: recipe.notes,
            ingredients,
            created_at: recipe.created_at,
        })
    }

    pub fn find_recipe_by_name(&self, name: &str) -> Result<RecipeDetail> {
        let id: Option<String> = self
            .conn
            .query_row(
                "SELECT id FROM recipes WHERE lower(name) = lower(?1)",
                params![name.trim()],
                |row| row.get(0),
            )
            .optional()?;
        match id {
            Some(id) => self.get_recipe(&id),
            None => Err(Error::NotFound(format!("Recipe '{name}' not found"))),
        }
    }

    pub fn list_recipes(&self) -> Result<Vec<RecipeDetail>> {
        let ids: Vec<String> = {
            let mut stmt = self.conn.prepare("SELECT id FROM recipes ORDER BY name")?;
            stmt.query_map([], |row| row.get(0))?
                .collect::<std::result::Result<Vec<_>, _>>()?
        };
        ids.iter().map(|id| self.get_recipe(id)).collect()
    }

    pub fn set_recipe_servings(&self, id: &str, servings: i64) -> Result<()> {
        validate_servings(servings)?;
        let changed = self.conn.execute(
            "UPDATE recipes SET servings = ?1 WHERE id = ?2",
            params![servings, id],
        )?;
        if changed == 0 {
            return Err(Error::not_found("Recipe", id));
        }
        Ok(())
    }

    pub fn delete_recipe(&self, id: &str) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM recipes WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(Error::not_found("Recipe", id));
        }
        log::debug!("db::delete_recipe deleted {id}");
        Ok(())
    }

    pub fn add_ingredient_line(
        &self,
        recipe_id: &str,
        line: &NewIngredientLine,
    ) -> Result<RecipeIngredient> {
        if line.name.trim().is_empty() {
            return Err(Error::Validation(
                "Ingredient name must not be empty".into(),
            ));
        }
        validate_quantity(line.quantity)?;
        // Also verifies the recipe exists.
        self.get_recipe(recipe_id)?;
        let next_order: i64 = self.conn.query_row(
            "SELECT COALESCE(MAX(display_order) + 1, 0) FROM recipe_ingredients
             WHERE recipe_id = ?1",
            params![recipe_id],
            |row| row.get(0),
        )?;
        self.insert_ingredient_line(recipe_id, line, next_order)
    }

    pub fn remove_ingredient_line(&self, recipe_id: &str, name: &str) -> Result<()> {
        self.get_recipe(recipe_id)?;
        let changed = self.conn.execute(
            "DELETE FROM recipe_ingredients
             WHERE recipe_id = ?1 AND lower(name) = lower(?2)",
            params![recipe_id, name.trim()],
        )?;
        if changed == 0 {
            return Err(Error::NotFound(format!(
                "Ingredient '{name}' not found in recipe"
            )));
        }
        Ok(())
    }

    // --- Ingredient catalog ---

    pub fn get_or_create_ingredient(
        &self,
        name: &str,
        category: &str,
        default_unit: Option<&str>,
    ) -> Result<Ingredient> {
        let normalized = name.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(Error::Validation(
                "Ingredient name must not be empty".into(),
            ));
        }
        let existing = self
            .conn
            .query_row(
                "SELECT id, name, category, default_unit FROM ingredients WHERE name = ?1",
                params![normalized],
                |row| {
                    Ok(Ingredient {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        category: row.get(2)?,
                        default_unit: row.get(3)?,
                    })
                },
            )
            .optional()?;
        if let Some(ingredient) = existing {
            return Ok(ingredient);
        }

        let id = new_id();
        self.conn.execute(
            "INSERT INTO ingredients (id, name, category, default_unit) VALUES (?1, ?2, ?3, ?4)",
            params![id, normalized, category, default_unit],
        )?;
        Ok(Ingredient {
            id,
            name: normalized,
            category: category.to_string(),
            default_unit: default_unit.map(String::from),
        })
    }

    pub fn list_ingredients(&self) -> Result<Vec<Ingredient>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, category, default_unit FROM ingredients ORDER BY name")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Ingredient {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    category: row.get(2)?,
                    default_unit: row.get(3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn set_ingredient_category(&self, name: &str, category: &str) -> Result<Ingredient> {
        let normalized = name.trim().to_lowercase();
        let changed = self.conn.execute(
            "UPDATE ingredients SET category = ?1 WHERE name = ?2",
            params![category, normalized],
        )?;
        if changed == 0 {
            return Err(Error::NotFound(format!(
                "Ingredient '{name}' not found in catalog"
            )));
        }
        self.conn
            .query_row(
                "SELECT id, name, category, default_unit FROM ingredients WHERE name = ?1",
                params![normalized],
                |row| {
                    Ok(Ingredient {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        category: row.get(2)?,
                        default_unit: row.get(3)?,
                    })
                },
            )
            .map_err(Error::from)
    }

    /// Normalized ingredient name to category, for aggregation lookups.
    pub fn category_map(&self) -> Result<HashMap<String, String>> {
        let mut stmt = self.conn.prepare("SELECT name, category FROM ingredients")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<std::result::Result<HashMap<String, String>, _>>()?;
        Ok(rows)
    }

    // --- Meal plans ---

    /// Plan a recipe for a date and meal slot. Assigning the same recipe
    /// to the same slot again merges into the existing row (servings are
    /// updated) instead of creating a duplicate.
    pub fn plan_meal(&self, meal: &NewPlannedMeal) -> Result<PlannedMeal> {
        let meal_type = validate_meal_type(&meal.meal_type)?;
        validate_servings(meal.servings)?;
        // Planning requires the recipe to exist right now; it may still be
        // deleted later, at which point expansion skips the plan.
        self.get_recipe(&meal.recipe_id)?;

        let date = date_str(meal.date);
        self.conn.execute(
            "INSERT INTO meal_plans (id, date, meal_type, recipe_id, servings, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(date, meal_type, recipe_id)
             DO UPDATE SET servings = excluded.servings",
            params![new_id(), date, meal_type, meal.recipe_id, meal.servings, now()],
        )?;
        log::debug!("db::plan_meal upserted {date} {meal_type} {}", meal.recipe_id);

        self.conn
            .query_row(
                "SELECT mp.id, mp.date, mp.meal_type, mp.recipe_id, mp.servings, mp.created_at,
                        r.name
                 FROM meal_plans mp LEFT JOIN recipes r ON r.id = mp.recipe_id
                 WHERE mp.date = ?1 AND mp.meal_type = ?2 AND mp.recipe_id = ?3",
                params![date, meal_type, meal.recipe_id],
                Self::planned_meal_from_row,
            )
            .map_err(Error::from)
    }

    pub fn list_planned_meals(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<PlannedMeal>> {
        let mut stmt = self.conn.prepare(
            "SELECT mp.id, mp.date, mp.meal_type, mp.recipe_id, mp.servings, mp.created_at,
                    r.name
             FROM meal_plans mp LEFT JOIN recipes r ON r.id = mp.recipe_id
             WHERE mp.date >= ?1 AND mp.date <= ?2
             ORDER BY mp.date,
               CASE mp.meal_type
                 WHEN 'breakfast' THEN 1
                 WHEN 'lunch' THEN 2
                 WHEN 'dinner' THEN 3
                 WHEN 'snack' THEN 4
               END",
        )?;
        let rows = stmt
            .query_map(
                params![date_str(start), date_str(end)],
                Self::planned_meal_from_row,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        log::debug!("db::list_planned_meals returned {} rows", rows.len());
        Ok(rows)
    }

    pub fn set_meal_servings(&self, id: &str, servings: i64) -> Result<PlannedMeal> {
        validate_servings(servings)?;
        let changed = self.conn.execute(
            "UPDATE meal_plans SET servings = ?1 WHERE id = ?2",
            params![servings, id],
        )?;
        if changed == 0 {
            return Err(Error::not_found("Meal plan", id));
        }
        self.conn
            .query_row(
                "SELECT mp.id, mp.date, mp.meal_type, mp.recipe_id, mp.servings, mp.created_at,
                        r.name
                 FROM meal_plans mp LEFT JOIN recipes r ON r.id = mp.recipe_id
                 WHERE mp.id = ?1",
                params![id],
                Self::planned_meal_from_row,
            )
            .map_err(Error::from)
    }

    pub fn unplan_meal(&self, id: &str) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM meal_plans WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(Error::not_found("Meal plan", id));
        }
        Ok(())
    }

    // --- Shopping lists ---

    pub fn create_list(
        &self,
        week_start: NaiveDate,
        name: &str,
        list_type: &str,
    ) -> Result<ShoppingList> {
        let list_type = validate_list_type(list_type)?;
        if name.trim().is_empty() {
            return Err(Error::Validation("List name must not be empty".into()));
        }
        let id = new_id();
        self.conn.execute(
            "INSERT INTO shopping_lists (id, week_start, name, list_type, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![id, date_str(week_start), name.trim(), list_type, now()],
        )?;
        self.get_list(&id)
    }

    pub fn get_list(&self, id: &str) -> Result<ShoppingList> {
        self.conn
            .query_row(
                "SELECT id, week_start, name, list_type, created_at
                 FROM shopping_lists WHERE id = ?1",
                params![id],
                Self::list_from_row,
            )
            .optional()?
            .ok_or_else(|| Error::not_found("Shopping list", id))
    }

    pub fn lists_for_week(&self, week_start: NaiveDate) -> Result<Vec<ShoppingList>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, week_start, name, list_type, created_at
             FROM shopping_lists WHERE week_start = ?1 ORDER BY created_at",
        )?;
        let rows = stmt
            .query_map(params![date_str(week_start)], Self::list_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Find the week's weekly-type list, creating it on first use.
    pub fn ensure_weekly_list(&self, week_start: NaiveDate) -> Result<ShoppingList> {
        let existing = self
            .conn
            .query_row(
                "SELECT id, week_start, name, list_type, created_at
                 FROM shopping_lists WHERE week_start = ?1 AND list_type = 'weekly'
                 ORDER BY created_at LIMIT 1",
                params![date_str(week_start)],
                Self::list_from_row,
            )
            .optional()?;
        match existing {
            Some(list) => Ok(list),
            None => self.create_list(week_start, "Weekly", "weekly"),
        }
    }

    pub fn delete_list(&self, id: &str) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM shopping_lists WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(Error::not_found("Shopping list", id));
        }
        Ok(())
    }

    // --- Shopping list items ---

    pub fn get_item(&self, id: &str) -> Result<ShoppingListItem> {
        self.conn
            .query_row(
                &format!(
                    "SELECT {} FROM shopping_list_items WHERE id = ?1",
                    Self::ITEM_COLUMNS
                ),
                params![id],
                Self::item_from_row,
            )
            .optional()?
            .ok_or_else(|| Error::not_found("Shopping item", id))
    }

    /// All stored rows of a list, including deleted and moved ones; the
    /// materializer decides what is displayed.
    pub fn list_items(&self, list_id: &str) -> Result<Vec<ShoppingListItem>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM shopping_list_items WHERE list_id = ?1 ORDER BY category, name",
            Self::ITEM_COLUMNS
        ))?;
        let rows = stmt
            .query_map(params![list_id], Self::item_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn deleted_items(&self, list_id: &str) -> Result<Vec<ShoppingListItem>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM shopping_list_items
             WHERE list_id = ?1 AND is_deleted = 1 ORDER BY deleted_at DESC",
            Self::ITEM_COLUMNS
        ))?;
        let rows = stmt
            .query_map(params![list_id], Self::item_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Add an item to a list with merge-on-add: if a non-deleted,
    /// non-moved row with the same canonical identity (case-insensitive
    /// name + verbatim unit) already exists there, its quantity grows and
    /// the recipe provenance is unioned; otherwise a new row is inserted.
    pub fn add_item(&self, item: &NewShoppingItem) -> Result<ShoppingListItem> {
        if item.name.trim().is_empty() {
            return Err(Error::Validation("Item name must not be empty".into()));
        }
        validate_quantity(item.quantity)?;
        self.get_list(&item.list_id)?;

        // Name folding must match IngredientKey, which is Unicode-aware;
        // SQLite's lower() only folds ASCII, so the match happens in Rust.
        let key = IngredientKey::new(&item.name, &item.unit);
        if let Some(existing) = self.find_active_item(&item.list_id, &key)? {
            let mut sources = existing.source_recipe_ids;
            for src in &item.source_recipe_ids {
                if !sources.contains(src) {
                    sources.push(src.clone());
                }
            }
            sources.sort();
            self.conn.execute(
                "UPDATE shopping_list_items SET quantity = ?1, source_recipe_ids = ?2
                 WHERE id = ?3",
                params![
                    existing.quantity + item.quantity,
                    serde_json::to_string(&sources).unwrap_or_else(|_| "[]".into()),
                    existing.id
                ],
            )?;
            log::debug!("db::add_item merged into existing row {}", existing.id);
            return self.get_item(&existing.id);
        }

        let id = new_id();
        let mut sources = item.source_recipe_ids.clone();
        sources.sort();
        self.conn.execute(
            "INSERT INTO shopping_list_items
                 (id, list_id, name, quantity, unit, category, source_recipe_ids, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                id,
                item.list_id,
                item.name.trim(),
                item.quantity,
                item.unit,
                item.category,
                serde_json::to_string(&sources).unwrap_or_else(|_| "[]".into()),
                now()
            ],
        )?;
        log::debug!("db::add_item inserted {id}");
        self.get_item(&id)
    }

    /// Active (non-deleted, non-moved) row on the list whose canonical
    /// identity matches `key`, if one exists.
    pub fn find_active_item(
        &self,
        list_id: &str,
        key: &IngredientKey,
    ) -> Result<Option<ShoppingListItem>> {
        Ok(self
            .list_items(list_id)?
            .into_iter()
            .filter(|i| !i.is_deleted && i.moved_to_list_id.is_none())
            .find(|i| IngredientKey::new(&i.name, &i.unit) == *key))
    }

    /// Hard-delete a row. Only used when a restore folds the row into an
    /// equivalent active one; soft deletion goes through `mark_item_deleted`.
    pub fn purge_item(&self, id: &str) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM shopping_list_items WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(Error::not_found("Shopping item", id));
        }
        Ok(())
    }

    pub fn set_item_checked(&self, id: &str, checked: bool) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE shopping_list_items SET is_checked = ?1 WHERE id = ?2",
            params![checked, id],
        )?;
        if changed == 0 {
            return Err(Error::not_found("Shopping item", id));
        }
        Ok(())
    }

    pub fn mark_item_deleted(&self, id: &str) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE shopping_list_items SET is_deleted = 1, deleted_at = ?1 WHERE id = ?2",
            params![now(), id],
        )?;
        if changed == 0 {
            return Err(Error::not_found("Shopping item", id));
        }
        Ok(())
    }

    pub fn clear_item_deleted(&self, id: &str) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE shopping_list_items SET is_deleted = 0, deleted_at = NULL WHERE id = ?1",
            params![id],
        )?;
        if changed == 0 {
            return Err(Error::not_found("Shopping item", id));
        }
        Ok(())
    }

    pub fn mark_item_moved(&self, id: &str, to_list_id: &str) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE shopping_list_items SET moved_to_list_id = ?1 WHERE id = ?2",
            params![to_list_id, id],
        )?;
        if changed == 0 {
            return Err(Error::not_found("Shopping item", id));
        }
        Ok(())
    }

    // --- Aggregated-entry overrides ---

    pub fn overrides_for_list(&self, list_id: &str) -> Result<Vec<AggregatedOverride>> {
        let mut stmt = self.conn.prepare(
            "SELECT list_id, week_start, name, unit, is_checked, is_hidden, moved_to_list_id
             FROM aggregated_overrides WHERE list_id = ?1",
        )?;
        let rows = stmt
            .query_map(params![list_id], Self::override_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn get_override(
        &self,
        list_id: &str,
        name: &str,
        unit: &str,
    ) -> Result<Option<AggregatedOverride>> {
        self.conn
            .query_row(
                "SELECT list_id, week_start, name, unit, is_checked, is_hidden, moved_to_list_id
                 FROM aggregated_overrides WHERE list_id = ?1 AND name = ?2 AND unit = ?3",
                params![list_id, name, unit],
                Self::override_from_row,
            )
            .optional()
            .map_err(Error::from)
    }

    pub fn set_override_checked(
        &self,
        list_id: &str,
        week_start: &str,
        name: &str,
        unit: &str,
        checked: bool,
    ) -> Result<()> {
        self.conn.execute(
            "INSERT INTO aggregated_overrides (list_id, week_start, name, unit, is_checked)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(list_id, name, unit) DO UPDATE SET is_checked = excluded.is_checked",
            params![list_id, week_start, name, unit, checked],
        )?;
        Ok(())
    }

    pub fn set_override_hidden(
        &self,
        list_id: &str,
        week_start: &str,
        name: &str,
        unit: &str,
    ) -> Result<()> {
        self.conn.execute(
            "INSERT INTO aggregated_overrides (list_id, week_start, name, unit, is_hidden)
             VALUES (?1, ?2, ?3, ?4, 1)
             ON CONFLICT(list_id, name, unit) DO UPDATE SET is_hidden = 1",
            params![list_id, week_start, name, unit],
        )?;
        Ok(())
    }

    pub fn set_override_moved(
        &self,
        list_id: &str,
        week_start: &str,
        name: &str,
        unit: &str,
        to_list_id: &str,
    ) -> Result<()> {
        self.conn.execute(
            "INSERT INTO aggregated_overrides
                 (list_id, week_start, name, unit, is_hidden, moved_to_list_id)
             VALUES (?1, ?2, ?3, ?4, 1, ?5)
             ON CONFLICT(list_id, name, unit)
             DO UPDATE SET is_hidden = 1, moved_to_list_id = excluded.moved_to_list_id",
            params![list_id, week_start, name, unit, to_list_id],
        )?;
        Ok(())
    }

    // --- Quick lists ---

    pub fn create_quick_list(&self, name: &str) -> Result<QuickList> {
        if name.trim().is_empty() {
            return Err(Error::Validation(
                "Quick list name must not be empty".into(),
            ));
        }
        let id = new_id();
        let ts = now();
        self.conn.execute(
            "INSERT INTO quick_lists (id, name, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)",
            params![id, name.trim(), ts],
        )?;
        self.get_quick_list(&id)
    }

    pub fn get_quick_list(&self, id: &str) -> Result<QuickList> {
        self.conn
            .query_row(
                "SELECT id, name, created_at, updated_at FROM quick_lists WHERE id = ?1",
                params![id],
                |row| {
                    Ok(QuickList {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        created_at: row.get(2)?,
                        updated_at: row.get(3)?,
                    })
                },
            )
            .optional()?
            .ok_or_else(|| Error::not_found("Quick list", id))
    }

    pub fn find_quick_list_by_name(&self, name: &str) -> Result<QuickList> {
        let id: Option<String> = self
            .conn
            .query_row(
                "SELECT id FROM quick_lists WHERE lower(name) = lower(?1)",
                params![name.trim()],
                |row| row.get(0),
            )
            .optional()?;
        match id {
            Some(id) => self.get_quick_list(&id),
            None => Err(Error::NotFound(format!("Quick list '{name}' not found"))),
        }
    }

    pub fn list_quick_lists(&self) -> Result<Vec<QuickList>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, created_at, updated_at FROM quick_lists ORDER BY name",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(QuickList {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    created_at: row.get(2)?,
                    updated_at: row.get(3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn rename_quick_list(&self, id: &str, name: &str) -> Result<QuickList> {
        let changed = self.conn.execute(
            "UPDATE quick_lists SET name = ?1, updated_at = ?2 WHERE id = ?3",
            params![name.trim(), now(), id],
        )?;
        if changed == 0 {
            return Err(Error::not_found("Quick list", id));
        }
        self.get_quick_list(id)
    }

    pub fn delete_quick_list(&self, id: &str) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM quick_lists WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(Error::not_found("Quick list", id));
        }
        Ok(())
    }

    pub fn quick_list_items(&self, quick_list_id: &str) -> Result<Vec<QuickListItem>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, quick_list_id, name, quantity, unit, category
             FROM quick_list_items WHERE quick_list_id = ?1 ORDER BY category, name",
        )?;
        let rows = stmt
            .query_map(params![quick_list_id], |row| {
                Ok(QuickListItem {
                    id: row.get(0)?,
                    quick_list_id: row.get(1)?,
                    name: row.get(2)?,
                    quantity: row.get(3)?,
                    unit: row.get(4)?,
                    category: row.get(5)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn add_quick_item(
        &self,
        quick_list_id: &str,
        item: &NewQuickListItem,
    ) -> Result<QuickListItem> {
        if item.name.trim().is_empty() {
            return Err(Error::Validation("Item name must not be empty".into()));
        }
        validate_quantity(item.quantity)?;
        self.get_quick_list(quick_list_id)?;
        let id = new_id();
        self.conn.execute(
            "INSERT INTO quick_list_items (id, quick_list_id, name, quantity, unit, category)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                id,
                quick_list_id,
                item.name.trim(),
                item.quantity,
                item.unit,
                item.category
            ],
        )?;
        Ok(QuickListItem {
            id,
            quick_list_id: quick_list_id.to_string(),
            name: item.name.trim().to_string(),
            quantity: item.quantity,
            unit: item.unit.clone(),
            category: item.category.clone(),
        })
    }

    pub fn remove_quick_item(&self, item_id: &str) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM quick_list_items WHERE id = ?1", params![item_id])?;
        if changed == 0 {
            return Err(Error::not_found("Quick list item", item_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewIngredientLine;

    fn test_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn line(name: &str, quantity: f64, unit: &str) -> NewIngredientLine {
        NewIngredientLine {
            name: name.to_string(),
            quantity,
            unit: unit.to_string(),
            category: None,
            notes: None,
        }
    }

    fn taco_recipe(db: &Database) -> RecipeDetail {
        db.create_recipe(&NewRecipe {
            name: "Tacos".to_string(),
            servings: 4,
            notes: None,
            ingredients: vec![line("Ground beef", 500.0, "g"), line("Tortillas", 8.0, "")],
        })
        .unwrap()
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 13).unwrap()
    }

    #[test]
    fn test_open_from_path_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("larder.db");
        let id = {
            let db = Database::open(&path).unwrap();
            taco_recipe(&db).id
        };
        let db = Database::open(&path).unwrap();
        let recipe = db.get_recipe(&id).unwrap();
        assert_eq!(recipe.name, "Tacos");
        assert_eq!(recipe.ingredients.len(), 2);
    }

    #[test]
    fn test_create_recipe_validates() {
        let db = test_db();
        assert!(
            db.create_recipe(&NewRecipe {
                name: "  ".to_string(),
                servings: 4,
                notes: None,
                ingredients: vec![],
            })
            .is_err()
        );
        assert!(
            db.create_recipe(&NewRecipe {
                name: "Soup".to_string(),
                servings: 0,
                notes: None,
                ingredients: vec![],
            })
            .is_err()
        );
        assert!(
            db.create_recipe(&NewRecipe {
                name: "Soup".to_string(),
                servings: 2,
                notes: None,
                ingredients: vec![line("water", 0.0, "l")],
            })
            .is_err()
        );
    }

    #[test]
    fn test_recipe_lines_keep_order() {
        let db = test_db();
        let recipe = taco_recipe(&db);
        assert_eq!(recipe.ingredients[0].name, "Ground beef");
        assert_eq!(recipe.ingredients[1].name, "Tortillas");
        db.add_ingredient_line(&recipe.id, &line("Salsa", 1.0, "jar"))
            .unwrap();
        let recipe = db.get_recipe(&recipe.id).unwrap();
        assert_eq!(recipe.ingredients[2].name, "Salsa");
        assert_eq!(recipe.ingredients[2].display_order, 2);
    }

    #[test]
    fn test_find_recipe_by_name_case_insensitive() {
        let db = test_db();
        taco_recipe(&db);
        assert_eq!(db.find_recipe_by_name("tacos").unwrap().name, "Tacos");
        assert!(db.find_recipe_by_name("burritos").is_err());
    }

    #[test]
    fn test_recipe_lines_feed_ingredient_catalog() {
        let db = test_db();
        taco_recipe(&db);
        let names: Vec<String> = db.list_ingredients().unwrap().into_iter().map(|i| i.name).collect();
        assert!(names.contains(&"ground beef".to_string()));
        assert!(names.contains(&"tortillas".to_string()));
    }

    #[test]
    fn test_set_ingredient_category() {
        let db = test_db();
        taco_recipe(&db);
        let ing = db
            .set_ingredient_category("Ground Beef", "Meat & Seafood")
            .unwrap();
        assert_eq!(ing.category, "Meat & Seafood");
        assert_eq!(
            db.category_map().unwrap().get("ground beef").unwrap(),
            "Meat & Seafood"
        );
        assert!(db.set_ingredient_category("unobtainium", "Other").is_err());
    }

    #[test]
    fn test_plan_meal_upserts_on_duplicate_slot() {
        let db = test_db();
        let recipe = taco_recipe(&db);
        let plan = NewPlannedMeal {
            date: monday(),
            meal_type: "dinner".to_string(),
            recipe_id: recipe.id.clone(),
            servings: 2,
        };
        let first = db.plan_meal(&plan).unwrap();
        let second = db
            .plan_meal(&NewPlannedMeal {
                servings: 6,
                ..plan.clone()
            })
            .unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.servings, 6);
        let meals = db.list_planned_meals(monday(), monday()).unwrap();
        assert_eq!(meals.len(), 1);
    }

    #[test]
    fn test_plan_meal_requires_existing_recipe() {
        let db = test_db();
        let result = db.plan_meal(&NewPlannedMeal {
            date: monday(),
            meal_type: "dinner".to_string(),
            recipe_id: "ghost".to_string(),
            servings: 2,
        });
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_list_planned_meals_ordered_by_date_and_slot() {
        let db = test_db();
        let recipe = taco_recipe(&db);
        for (date, meal_type) in [
            (monday() + chrono::Duration::days(1), "breakfast"),
            (monday(), "dinner"),
            (monday(), "breakfast"),
        ] {
            db.plan_meal(&NewPlannedMeal {
                date,
                meal_type: meal_type.to_string(),
                recipe_id: recipe.id.clone(),
                servings: 2,
            })
            .unwrap();
        }
        let meals = db
            .list_planned_meals(monday(), monday() + chrono::Duration::days(6))
            .unwrap();
        let order: Vec<(String, String)> = meals
            .into_iter()
            .map(|m| (m.date, m.meal_type))
            .collect();
        assert_eq!(
            order,
            vec![
                ("2025-01-13".to_string(), "breakfast".to_string()),
                ("2025-01-13".to_string(), "dinner".to_string()),
                ("2025-01-14".to_string(), "breakfast".to_string()),
            ]
        );
    }

    #[test]
    fn test_ensure_weekly_list_is_idempotent() {
        let db = test_db();
        let a = db.ensure_weekly_list(monday()).unwrap();
        let b = db.ensure_weekly_list(monday()).unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(a.list_type, "weekly");
        assert_eq!(db.lists_for_week(monday()).unwrap().len(), 1);
    }

    #[test]
    fn test_create_list_validates_type() {
        let db = test_db();
        assert!(db.create_list(monday(), "Groceries", "daily").is_err());
        let list = db.create_list(monday(), "Midweek top-up", "midweek").unwrap();
        assert_eq!(list.list_type, "midweek");
    }

    #[test]
    fn test_add_item_merges_on_matching_name_and_unit() {
        let db = test_db();
        let list = db.create_list(monday(), "Weekly", "weekly").unwrap();
        let first = db
            .add_item(&NewShoppingItem {
                list_id: list.id.clone(),
                name: "Milk".to_string(),
                quantity: 3.0,
                unit: "gallon".to_string(),
                category: "Dairy".to_string(),
                source_recipe_ids: vec![],
            })
            .unwrap();
        let merged = db
            .add_item(&NewShoppingItem {
                list_id: list.id.clone(),
                name: "milk".to_string(),
                quantity: 2.0,
                unit: "gallon".to_string(),
                category: "Dairy".to_string(),
                source_recipe_ids: vec![],
            })
            .unwrap();
        assert_eq!(first.id, merged.id);
        assert!((merged.quantity - 5.0).abs() < 1e-9);
        assert_eq!(db.list_items(&list.id).unwrap().len(), 1);
    }

    #[test]
    fn test_add_item_merges_non_ascii_case_variants() {
        let db = test_db();
        let list = db.create_list(monday(), "Weekly", "weekly").unwrap();
        let first = db
            .add_item(&NewShoppingItem {
                list_id: list.id.clone(),
                name: "Éclair".to_string(),
                quantity: 1.0,
                unit: String::new(),
                category: "Bakery".to_string(),
                source_recipe_ids: vec![],
            })
            .unwrap();
        let merged = db
            .add_item(&NewShoppingItem {
                list_id: list.id.clone(),
                name: "éclair".to_string(),
                quantity: 2.0,
                unit: String::new(),
                category: "Bakery".to_string(),
                source_recipe_ids: vec![],
            })
            .unwrap();
        assert_eq!(first.id, merged.id);
        assert!((merged.quantity - 3.0).abs() < 1e-9);
        assert_eq!(db.list_items(&list.id).unwrap().len(), 1);
    }

    #[test]
    fn test_add_item_does_not_merge_across_units_or_deleted_rows() {
        let db = test_db();
        let list = db.create_list(monday(), "Weekly", "weekly").unwrap();
        let gallon = db
            .add_item(&NewShoppingItem {
                list_id: list.id.clone(),
                name: "Milk".to_string(),
                quantity: 1.0,
                unit: "gallon".to_string(),
                category: "Dairy".to_string(),
                source_recipe_ids: vec![],
            })
            .unwrap();
        let litre = db
            .add_item(&NewShoppingItem {
                list_id: list.id.clone(),
                name: "Milk".to_string(),
                quantity: 1.0,
                unit: "l".to_string(),
                category: "Dairy".to_string(),
                source_recipe_ids: vec![],
            })
            .unwrap();
        assert_ne!(gallon.id, litre.id);

        db.mark_item_deleted(&gallon.id).unwrap();
        let fresh = db
            .add_item(&NewShoppingItem {
                list_id: list.id.clone(),
                name: "Milk".to_string(),
                quantity: 2.0,
                unit: "gallon".to_string(),
                category: "Dairy".to_string(),
                source_recipe_ids: vec![],
            })
            .unwrap();
        // Deleted row is not a merge target; a new row appears instead.
        assert_ne!(fresh.id, gallon.id);
        assert!((fresh.quantity - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_add_item_unions_recipe_provenance() {
        let db = test_db();
        let list = db.create_list(monday(), "Weekly", "weekly").unwrap();
        db.add_item(&NewShoppingItem {
            list_id: list.id.clone(),
            name: "Onion".to_string(),
            quantity: 2.0,
            unit: "".to_string(),
            category: "Produce".to_string(),
            source_recipe_ids: vec!["curry".to_string()],
        })
        .unwrap();
        let merged = db
            .add_item(&NewShoppingItem {
                list_id: list.id.clone(),
                name: "onion".to_string(),
                quantity: 1.0,
                unit: "".to_string(),
                category: "Produce".to_string(),
                source_recipe_ids: vec!["soup".to_string(), "curry".to_string()],
            })
            .unwrap();
        assert_eq!(
            merged.source_recipe_ids,
            vec!["curry".to_string(), "soup".to_string()]
        );
    }

    #[test]
    fn test_item_lifecycle_columns() {
        let db = test_db();
        let list = db.create_list(monday(), "Weekly", "weekly").unwrap();
        let item = db
            .add_item(&NewShoppingItem {
                list_id: list.id.clone(),
                name: "Eggs".to_string(),
                quantity: 12.0,
                unit: "".to_string(),
                category: "Dairy".to_string(),
                source_recipe_ids: vec![],
            })
            .unwrap();

        db.set_item_checked(&item.id, true).unwrap();
        assert!(db.get_item(&item.id).unwrap().is_checked);

        db.mark_item_deleted(&item.id).unwrap();
        let deleted = db.get_item(&item.id).unwrap();
        assert!(deleted.is_deleted);
        assert!(deleted.deleted_at.is_some());
        assert_eq!(db.deleted_items(&list.id).unwrap().len(), 1);

        db.clear_item_deleted(&item.id).unwrap();
        let restored = db.get_item(&item.id).unwrap();
        assert!(!restored.is_deleted);
        assert!(restored.deleted_at.is_none());
        assert!((restored.quantity - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_item_id_is_not_found() {
        let db = test_db();
        assert!(matches!(db.get_item("ghost"), Err(Error::NotFound(_))));
        assert!(matches!(
            db.set_item_checked("ghost", true),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            db.mark_item_deleted("ghost"),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_override_upsert_accumulates_flags() {
        let db = test_db();
        let list = db.create_list(monday(), "Weekly", "weekly").unwrap();
        db.set_override_checked(&list.id, "2025-01-13", "rice", "g", true)
            .unwrap();
        db.set_override_hidden(&list.id, "2025-01-13", "rice", "g")
            .unwrap();
        let ovr = db.get_override(&list.id, "rice", "g").unwrap().unwrap();
        assert!(ovr.is_checked);
        assert!(ovr.is_hidden);
        assert_eq!(db.overrides_for_list(&list.id).unwrap().len(), 1);
    }

    #[test]
    fn test_deleting_list_cascades_items_and_overrides() {
        let db = test_db();
        let list = db.create_list(monday(), "Weekly", "weekly").unwrap();
        db.add_item(&NewShoppingItem {
            list_id: list.id.clone(),
            name: "Milk".to_string(),
            quantity: 1.0,
            unit: "l".to_string(),
            category: "Dairy".to_string(),
            source_recipe_ids: vec![],
        })
        .unwrap();
        db.set_override_hidden(&list.id, "2025-01-13", "rice", "g")
            .unwrap();
        db.delete_list(&list.id).unwrap();
        assert!(db.list_items(&list.id).unwrap().is_empty());
        assert!(db.overrides_for_list(&list.id).unwrap().is_empty());
    }

    #[test]
    fn test_quick_list_round_trip() {
        let db = test_db();
        let quick = db.create_quick_list("Staples").unwrap();
        db.add_quick_item(
            &quick.id,
            &NewQuickListItem {
                name: "Butter".to_string(),
                quantity: 1.0,
                unit: "".to_string(),
                category: "Dairy".to_string(),
            },
        )
        .unwrap();
        let items = db.quick_list_items(&quick.id).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Butter");

        let renamed = db.rename_quick_list(&quick.id, "Pantry staples").unwrap();
        assert_eq!(renamed.name, "Pantry staples");
        assert_eq!(
            db.find_quick_list_by_name("pantry STAPLES").unwrap().id,
            quick.id
        );

        db.remove_quick_item(&items[0].id).unwrap();
        assert!(db.quick_list_items(&quick.id).unwrap().is_empty());
        db.delete_quick_list(&quick.id).unwrap();
        assert!(db.get_quick_list(&quick.id).is_err());
    }

    #[test]
    fn test_delete_recipe_leaves_plans_dangling() {
        let db = test_db();
        let recipe = taco_recipe(&db);
        db.plan_meal(&NewPlannedMeal {
            date: monday(),
            meal_type: "dinner".to_string(),
            recipe_id: recipe.id.clone(),
            servings: 4,
        })
        .unwrap();
        db.delete_recipe(&recipe.id).unwrap();
        let meals = db.list_planned_meals(monday(), monday()).unwrap();
        assert_eq!(meals.len(), 1);
        assert!(meals[0].recipe_name.is_none());
    }
}
