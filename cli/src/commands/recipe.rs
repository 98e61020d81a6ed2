use anyhow::{Result, bail};
use std::process;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use larder_core::models::{NewIngredientLine, NewRecipe};
use larder_core::service::LarderService;

use super::helpers::{format_qty_unit, truncate};
use super::resolve_recipe;

/// Parse an ingredient spec of the form "name:quantity[:unit[:category]]",
/// e.g. "Ground beef:750:g:Meat & Seafood" or "Eggs:12".
fn parse_ingredient_spec(spec: &str) -> Result<NewIngredientLine> {
    let parts: Vec<&str> = spec.split(':').collect();
    if parts.len() < 2 || parts.len() > 4 {
        bail!("Invalid ingredient '{spec}'. Use name:quantity[:unit[:category]]");
    }
    let name = parts[0].trim();
    if name.is_empty() {
        bail!("Invalid ingredient '{spec}': empty name");
    }
    let quantity: f64 = parts[1]
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid quantity '{}' in '{spec}'", parts[1]))?;
    Ok(NewIngredientLine {
        name: name.to_string(),
        quantity,
        unit: parts.get(2).map_or("", |u| u.trim()).to_string(),
        category: parts.get(3).map(|c| c.trim().to_string()),
        notes: None,
    })
}

pub(crate) fn cmd_recipe_create(
    svc: &LarderService,
    name: &str,
    servings: i64,
    ingredient_specs: &[String],
    json: bool,
) -> Result<()> {
    let ingredients = ingredient_specs
        .iter()
        .map(|s| parse_ingredient_spec(s))
        .collect::<Result<Vec<_>>>()?;

    let recipe = svc.create_recipe(&NewRecipe {
        name: name.to_string(),
        servings,
        notes: None,
        ingredients,
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&recipe)?);
    } else {
        let id = &recipe.id;
        let count = recipe.ingredients.len();
        println!("Created recipe: {name} (id: {id}, serves {servings}, {count} ingredients)");
        if count == 0 {
            println!("Add ingredients with: larder recipe add-ingredient \"{name}\" <name> <quantity>");
        }
    }
    Ok(())
}

pub(crate) fn cmd_recipe_add_ingredient(
    svc: &LarderService,
    recipe_ref: &str,
    name: &str,
    quantity: f64,
    unit: &str,
    category: Option<String>,
    json: bool,
) -> Result<()> {
    let recipe = resolve_recipe(svc, recipe_ref)?;
    let line = svc.add_ingredient_line(
        &recipe.id,
        &NewIngredientLine {
            name: name.to_string(),
            quantity,
            unit: unit.to_string(),
            category,
            notes: None,
        },
    )?;

    if json {
        println!("{}", serde_json::to_string_pretty(&line)?);
    } else {
        let recipe_name = &recipe.name;
        let amount = format_qty_unit(quantity, unit);
        println!("Added {amount} {name} to {recipe_name}");
    }
    Ok(())
}

pub(crate) fn cmd_recipe_remove_ingredient(
    svc: &LarderService,
    recipe_ref: &str,
    name: &str,
    json: bool,
) -> Result<()> {
    let recipe = resolve_recipe(svc, recipe_ref)?;
    svc.remove_ingredient_line(&recipe.id, name)?;
    if json {
        println!("{}", serde_json::json!({ "removed": name }));
    } else {
        let recipe_name = &recipe.name;
        println!("Removed {name} from {recipe_name}");
    }
    Ok(())
}

pub(crate) fn cmd_recipe_set_servings(
    svc: &LarderService,
    recipe_ref: &str,
    servings: i64,
    json: bool,
) -> Result<()> {
    let recipe = resolve_recipe(svc, recipe_ref)?;
    svc.set_recipe_servings(&recipe.id, servings)?;
    if json {
        let detail = svc.get_recipe(&recipe.id)?;
        println!("{}", serde_json::to_string_pretty(&detail)?);
    } else {
        let recipe_name = &recipe.name;
        println!("Updated {recipe_name} to serve {servings}");
    }
    Ok(())
}

pub(crate) fn cmd_recipe_show(svc: &LarderService, recipe_ref: &str, json: bool) -> Result<()> {
    let detail = resolve_recipe(svc, recipe_ref)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&detail)?);
        return Ok(());
    }

    let name = &detail.name;
    let servings = detail.servings;
    println!("=== {name} ===");
    println!("  Serves: {servings}\n");
    println!("  INGREDIENTS:");
    for line in &detail.ingredients {
        let amount = format_qty_unit(line.quantity, &line.unit);
        let ing_name = &line.name;
        println!("    {amount} {ing_name}");
    }
    Ok(())
}

pub(crate) fn cmd_recipe_delete(svc: &LarderService, recipe_ref: &str, json: bool) -> Result<()> {
    let recipe = resolve_recipe(svc, recipe_ref)?;
    svc.delete_recipe(&recipe.id)?;
    if json {
        println!("{}", serde_json::json!({ "deleted": recipe.name }));
    } else {
        let recipe_name = &recipe.name;
        println!("Deleted recipe: {recipe_name}");
    }
    Ok(())
}

pub(crate) fn cmd_recipe_list(svc: &LarderService, json: bool) -> Result<()> {
    #[derive(Tabled)]
    struct RecipeRow {
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Serves")]
        serves: i64,
        #[tabled(rename = "Ingredients")]
        ingredients: usize,
        #[tabled(rename = "ID")]
        id: String,
    }

    let recipes = svc.list_recipes()?;
    if recipes.is_empty() {
        if json {
            println!("[]");
        } else {
            eprintln!("No recipes found");
        }
        process::exit(2);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&recipes)?);
        return Ok(());
    }

    let rows: Vec<RecipeRow> = recipes
        .iter()
        .map(|r| RecipeRow {
            name: truncate(&r.name, 30),
            serves: r.servings,
            ingredients: r.ingredients.len(),
            id: r.id.clone(),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..3)).with(Alignment::right()))
        .to_string();
    println!("{table}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ingredient_spec_full() {
        let line = parse_ingredient_spec("Ground beef:750:g:Meat & Seafood").unwrap();
        assert_eq!(line.name, "Ground beef");
        assert!((line.quantity - 750.0).abs() < f64::EPSILON);
        assert_eq!(line.unit, "g");
        assert_eq!(line.category.as_deref(), Some("Meat & Seafood"));
    }

    #[test]
    fn test_parse_ingredient_spec_minimal() {
        let line = parse_ingredient_spec("Eggs:12").unwrap();
        assert_eq!(line.name, "Eggs");
        assert!((line.quantity - 12.0).abs() < f64::EPSILON);
        assert_eq!(line.unit, "");
        assert!(line.category.is_none());
    }

    #[test]
    fn test_parse_ingredient_spec_invalid() {
        assert!(parse_ingredient_spec("Eggs").is_err());
        assert!(parse_ingredient_spec(":12").is_err());
        assert!(parse_ingredient_spec("Eggs:dozen").is_err());
        assert!(parse_ingredient_spec("a:1:b:c:d").is_err());
    }
}
