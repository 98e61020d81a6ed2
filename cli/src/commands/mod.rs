mod helpers;
mod ingredient;
mod plan;
mod quick;
mod recipe;
mod shop;

use anyhow::{Result, bail};

use larder_core::error::Error as CoreError;
use larder_core::materialize::ListEntry;
use larder_core::models::{RecipeDetail, ShoppingList};
use larder_core::service::LarderService;

use helpers::parse_week;

pub(crate) use ingredient::{cmd_ingredient_list, cmd_ingredient_set_category};
pub(crate) use plan::{cmd_plan_add, cmd_plan_remove, cmd_plan_servings, cmd_plan_week};
pub(crate) use quick::{
    cmd_quick_add_item, cmd_quick_apply, cmd_quick_create, cmd_quick_delete, cmd_quick_list,
    cmd_quick_remove_item, cmd_quick_rename, cmd_quick_show,
};
pub(crate) use recipe::{
    cmd_recipe_add_ingredient, cmd_recipe_create, cmd_recipe_delete, cmd_recipe_list,
    cmd_recipe_remove_ingredient, cmd_recipe_set_servings, cmd_recipe_show,
};
pub(crate) use shop::{
    cmd_shop_add, cmd_shop_check, cmd_shop_deleted, cmd_shop_lists, cmd_shop_move,
    cmd_shop_new_list, cmd_shop_remove, cmd_shop_restore, cmd_shop_view,
};

/// Resolve the target list: an explicit list ID wins, otherwise the
/// weekly list of the given (or current) week, created on first use.
pub(super) fn resolve_list(
    svc: &LarderService,
    list_id: Option<&str>,
    week: Option<String>,
) -> Result<ShoppingList> {
    if let Some(id) = list_id {
        return Ok(svc.get_list(id)?);
    }
    let week_start = parse_week(week)?;
    let view = svc.week_view(week_start)?;
    view.lists
        .into_iter()
        .map(|l| l.list)
        .find(|l| l.list_type == "weekly")
        .ok_or_else(|| anyhow::anyhow!("No weekly list for week of {week_start}"))
}

/// Resolve a recipe reference: name first, then ID.
pub(super) fn resolve_recipe(svc: &LarderService, reference: &str) -> Result<RecipeDetail> {
    match svc.find_recipe_by_name(reference) {
        Ok(recipe) => Ok(recipe),
        Err(CoreError::NotFound(_)) => Ok(svc.get_recipe(reference)?),
        Err(e) => Err(e.into()),
    }
}

/// Find a displayed entry by name (and unit, when ambiguous).
pub(super) fn find_entry(
    svc: &LarderService,
    list_id: &str,
    name: &str,
    unit: Option<&str>,
) -> Result<ListEntry> {
    let view = svc.list_view(list_id)?;
    let wanted = name.trim().to_lowercase();
    let matches: Vec<ListEntry> = view
        .entries
        .into_iter()
        .filter(|e| {
            e.name.trim().to_lowercase() == wanted && unit.is_none_or(|u| e.unit == u)
        })
        .collect();

    match matches.len() {
        0 => bail!("No item '{name}' on this list"),
        1 => Ok(matches.into_iter().next().unwrap()),
        _ => {
            let units: Vec<String> = matches
                .iter()
                .map(|e| {
                    if e.unit.is_empty() {
                        "(unitless)".to_string()
                    } else {
                        e.unit.clone()
                    }
                })
                .collect();
            bail!(
                "'{name}' appears with multiple units ({}). Pass --unit to pick one",
                units.join(", ")
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use larder_core::models::NewRecipe;

    fn test_service() -> (tempfile::TempDir, LarderService) {
        let dir = tempfile::tempdir().unwrap();
        let svc = LarderService::new(&dir.path().join("larder.db")).unwrap();
        (dir, svc)
    }

    #[test]
    fn test_resolve_list_defaults_to_weekly() {
        let (_dir, svc) = test_service();
        let list = resolve_list(&svc, None, Some("2025-01-15".to_string())).unwrap();
        assert_eq!(list.list_type, "weekly");
        // Wednesday resolves to the Monday of the same week.
        assert_eq!(list.week_start, "2025-01-13");

        let by_id = resolve_list(&svc, Some(&list.id), None).unwrap();
        assert_eq!(by_id.id, list.id);
    }

    #[test]
    fn test_resolve_recipe_by_name_then_id() {
        let (_dir, svc) = test_service();
        let recipe = svc
            .create_recipe(&NewRecipe {
                name: "Tacos".to_string(),
                servings: 4,
                notes: None,
                ingredients: vec![],
            })
            .unwrap();
        assert_eq!(resolve_recipe(&svc, "tacos").unwrap().id, recipe.id);
        assert_eq!(resolve_recipe(&svc, &recipe.id).unwrap().id, recipe.id);
        assert!(resolve_recipe(&svc, "burritos").is_err());
    }

    #[test]
    fn test_find_entry_disambiguates_by_unit() {
        let (_dir, svc) = test_service();
        let list = resolve_list(&svc, None, Some("2025-01-13".to_string())).unwrap();
        svc.add_item(&list.id, "Milk", 1.0, "gallon", None).unwrap();
        svc.add_item(&list.id, "Milk", 500.0, "ml", None).unwrap();

        assert!(find_entry(&svc, &list.id, "milk", None).is_err());
        let entry = find_entry(&svc, &list.id, "milk", Some("ml")).unwrap();
        assert!((entry.quantity - 500.0).abs() < 1e-9);
        assert!(find_entry(&svc, &list.id, "bread", None).is_err());
    }
}
