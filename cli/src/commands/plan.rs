use anyhow::Result;
use std::process;
use tabled::{Table, Tabled, settings::Style};

use larder_core::models::NewPlannedMeal;
use larder_core::service::LarderService;

use super::helpers::{parse_date, parse_week, truncate};
use super::resolve_recipe;

pub(crate) fn cmd_plan_add(
    svc: &LarderService,
    recipe_ref: &str,
    date: Option<String>,
    meal_type: &str,
    servings: Option<i64>,
    json: bool,
) -> Result<()> {
    let recipe = resolve_recipe(svc, recipe_ref)?;
    let date = parse_date(date)?;
    let servings = servings.unwrap_or(recipe.servings);

    let meal = svc.plan_meal(&NewPlannedMeal {
        date,
        meal_type: meal_type.to_string(),
        recipe_id: recipe.id.clone(),
        servings,
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&meal)?);
    } else {
        let recipe_name = &recipe.name;
        let slot = &meal.meal_type;
        let d = &meal.date;
        println!("Planned {recipe_name} for {slot} on {d} ({servings} servings)");
    }
    Ok(())
}

pub(crate) fn cmd_plan_week(svc: &LarderService, week: Option<String>, json: bool) -> Result<()> {
    #[derive(Tabled)]
    struct MealRow {
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Meal")]
        meal: String,
        #[tabled(rename = "Recipe")]
        recipe: String,
        #[tabled(rename = "Servings")]
        servings: i64,
        #[tabled(rename = "ID")]
        id: String,
    }

    let week_start = parse_week(week)?;
    let meals = svc.list_planned_meals(week_start, week_start + chrono::Duration::days(6))?;

    if meals.is_empty() {
        if json {
            println!("[]");
        } else {
            eprintln!("Nothing planned for the week of {week_start}");
        }
        process::exit(2);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&meals)?);
        return Ok(());
    }

    println!("Week of {week_start}");
    let rows: Vec<MealRow> = meals
        .iter()
        .map(|m| MealRow {
            date: m.date.clone(),
            meal: m.meal_type.clone(),
            recipe: m
                .recipe_name
                .as_deref()
                .map_or("(recipe deleted)".to_string(), |n| truncate(n, 30)),
            servings: m.servings,
            id: m.id.clone(),
        })
        .collect();

    let table = Table::new(&rows).with(Style::rounded()).to_string();
    println!("{table}");
    Ok(())
}

pub(crate) fn cmd_plan_servings(
    svc: &LarderService,
    meal_id: &str,
    servings: i64,
    json: bool,
) -> Result<()> {
    let meal = svc.set_meal_servings(meal_id, servings)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&meal)?);
    } else {
        let recipe = meal.recipe_name.as_deref().unwrap_or("(recipe deleted)");
        let d = &meal.date;
        println!("Updated {recipe} on {d} to {servings} servings");
    }
    Ok(())
}

pub(crate) fn cmd_plan_remove(svc: &LarderService, meal_id: &str, json: bool) -> Result<()> {
    svc.unplan_meal(meal_id)?;
    if json {
        println!("{}", serde_json::json!({ "removed": meal_id }));
    } else {
        println!("Removed planned meal {meal_id}");
    }
    Ok(())
}
