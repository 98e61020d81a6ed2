use anyhow::Result;
use std::process;
use tabled::{Table, Tabled, settings::Style};

use larder_core::service::LarderService;

use super::helpers::truncate;

pub(crate) fn cmd_ingredient_list(svc: &LarderService, json: bool) -> Result<()> {
    #[derive(Tabled)]
    struct IngredientRow {
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Category")]
        category: String,
    }

    let ingredients = svc.list_ingredients()?;
    if ingredients.is_empty() {
        if json {
            println!("[]");
        } else {
            eprintln!("No ingredients in the catalog yet");
        }
        process::exit(2);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&ingredients)?);
        return Ok(());
    }

    let rows: Vec<IngredientRow> = ingredients
        .iter()
        .map(|i| IngredientRow {
            name: truncate(&i.name, 35),
            category: i.category.clone(),
        })
        .collect();
    let table = Table::new(&rows).with(Style::rounded()).to_string();
    println!("{table}");
    Ok(())
}

pub(crate) fn cmd_ingredient_set_category(
    svc: &LarderService,
    name: &str,
    category: &str,
    json: bool,
) -> Result<()> {
    let ingredient = svc.set_ingredient_category(name, category)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&ingredient)?);
    } else {
        let ing_name = &ingredient.name;
        println!("{ing_name} is now categorized as {category}");
    }
    Ok(())
}
