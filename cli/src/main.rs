mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process;

use crate::commands::{
    cmd_ingredient_list, cmd_ingredient_set_category, cmd_plan_add, cmd_plan_remove,
    cmd_plan_servings, cmd_plan_week, cmd_quick_add_item, cmd_quick_apply, cmd_quick_create,
    cmd_quick_delete, cmd_quick_list, cmd_quick_remove_item, cmd_quick_rename, cmd_quick_show,
    cmd_recipe_add_ingredient, cmd_recipe_create, cmd_recipe_delete, cmd_recipe_list,
    cmd_recipe_remove_ingredient, cmd_recipe_set_servings, cmd_recipe_show, cmd_shop_add,
    cmd_shop_check, cmd_shop_deleted, cmd_shop_lists, cmd_shop_move, cmd_shop_new_list,
    cmd_shop_remove, cmd_shop_restore, cmd_shop_view,
};
use crate::config::Config;
use larder_core::service::LarderService;

#[derive(Parser)]
#[command(
    name = "larder",
    version,
    about = "Meal planning and shopping list CLI",
    long_about = "\n\n  ██╗      █████╗ ██████╗ ██████╗ ███████╗██████╗
  ██║     ██╔══██╗██╔══██╗██╔══██╗██╔════╝██╔══██╗
  ██║     ███████║██████╔╝██║  ██║█████╗  ██████╔╝
  ██║     ██╔══██║██╔══██╗██║  ██║██╔══╝  ██╔══██╗
  ███████╗██║  ██║██║  ██║██████╔╝███████╗██║  ██║
  ╚══════╝╚═╝  ╚═╝╚═╝  ╚═╝╚═════╝ ╚══════╝╚═╝  ╚═╝
        plan the week, shop it once.
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage recipes
    Recipe {
        #[command(subcommand)]
        command: RecipeCommands,
    },
    /// Plan meals onto the week
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Work with shopping lists
    Shop {
        #[command(subcommand)]
        command: ShopCommands,
    },
    /// Manage reusable quick lists
    Quick {
        #[command(subcommand)]
        command: QuickCommands,
    },
    /// Manage the ingredient category catalog
    Ingredient {
        #[command(subcommand)]
        command: IngredientCommands,
    },
}

#[derive(Subcommand)]
enum RecipeCommands {
    /// Create a new recipe
    Create {
        /// Recipe name
        name: String,
        /// How many servings the recipe makes
        #[arg(short, long, default_value = "4")]
        servings: i64,
        /// Ingredient line: "name:quantity[:unit[:category]]" (repeatable)
        #[arg(short, long = "ingredient", value_name = "SPEC")]
        ingredients: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add an ingredient line to a recipe
    AddIngredient {
        /// Recipe name or ID
        recipe: String,
        /// Ingredient name
        name: String,
        /// Quantity (e.g. 750, 2.5)
        quantity: f64,
        /// Unit (e.g. g, ml, tbsp; omit for countable items)
        #[arg(default_value = "")]
        unit: String,
        /// Store category (e.g. Produce, Dairy, "Meat & Seafood")
        #[arg(long)]
        category: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove an ingredient line from a recipe
    RemoveIngredient {
        /// Recipe name or ID
        recipe: String,
        /// Ingredient name to remove
        name: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change how many servings a recipe makes
    SetServings {
        /// Recipe name or ID
        recipe: String,
        /// New servings count
        servings: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a recipe with its ingredients
    Show {
        /// Recipe name or ID
        recipe: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List all recipes
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a recipe (planned meals referencing it are skipped, not removed)
    Delete {
        /// Recipe name or ID
        recipe: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum PlanCommands {
    /// Plan a recipe for a date and meal slot
    Add {
        /// Recipe name or ID
        recipe: String,
        /// Date (YYYY-MM-DD or today/yesterday/tomorrow, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Meal slot: breakfast, lunch, dinner, snack
        #[arg(short, long, default_value = "dinner")]
        meal: String,
        /// Servings to cook (default: the recipe's own servings)
        #[arg(short, long)]
        servings: Option<i64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the week's planned meals
    Week {
        /// Any date in the week to show (default: this week)
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change the servings of a planned meal
    Servings {
        /// Planned meal ID (shown by `plan week`)
        meal_id: String,
        /// New servings count
        servings: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove a planned meal
    Remove {
        /// Planned meal ID (shown by `plan week`)
        meal_id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum ShopCommands {
    /// Show a shopping list (default: this week's weekly list)
    View {
        /// List ID (default: the week's weekly list)
        #[arg(short, long)]
        list: Option<String>,
        /// Any date in the week (default: this week)
        #[arg(short, long)]
        week: Option<String>,
        /// Group entries by store category
        #[arg(long)]
        by_category: bool,
        /// Group entries by contributing recipe
        #[arg(long, conflicts_with = "by_category")]
        by_recipe: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the week's shopping lists
    Lists {
        /// Any date in the week (default: this week)
        #[arg(short, long)]
        week: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create an extra list for the week
    NewList {
        /// List name
        name: String,
        /// List type: midweek or custom
        #[arg(short = 't', long = "type", default_value = "custom")]
        list_type: String,
        /// Any date in the week (default: this week)
        #[arg(short, long)]
        week: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add an item to a list
    Add {
        /// Item name
        name: String,
        /// Quantity
        #[arg(default_value = "1")]
        quantity: f64,
        /// Unit (omit for countable items)
        #[arg(default_value = "")]
        unit: String,
        /// Store category (default: from the ingredient catalog)
        #[arg(long)]
        category: Option<String>,
        /// List ID (default: the week's weekly list)
        #[arg(short, long)]
        list: Option<String>,
        /// Any date in the week (default: this week)
        #[arg(short, long)]
        week: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check off an item
    Check {
        /// Item name
        name: String,
        /// Unit, when the name appears with several units
        #[arg(short, long)]
        unit: Option<String>,
        /// List ID (default: the week's weekly list)
        #[arg(short, long)]
        list: Option<String>,
        /// Any date in the week (default: this week)
        #[arg(short, long)]
        week: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Uncheck an item
    Uncheck {
        /// Item name
        name: String,
        /// Unit, when the name appears with several units
        #[arg(short, long)]
        unit: Option<String>,
        /// List ID (default: the week's weekly list)
        #[arg(short, long)]
        list: Option<String>,
        /// Any date in the week (default: this week)
        #[arg(short, long)]
        week: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove an item (manual items can be restored; planned entries are dismissed)
    Remove {
        /// Item name
        name: String,
        /// Unit, when the name appears with several units
        #[arg(short, long)]
        unit: Option<String>,
        /// List ID (default: the week's weekly list)
        #[arg(short, long)]
        list: Option<String>,
        /// Any date in the week (default: this week)
        #[arg(short, long)]
        week: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Restore a removed manual item
    Restore {
        /// Item name
        name: String,
        /// List ID (default: the week's weekly list)
        #[arg(short, long)]
        list: Option<String>,
        /// Any date in the week (default: this week)
        #[arg(short, long)]
        week: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Move an item to another list
    Move {
        /// Item name
        name: String,
        /// Destination list ID
        #[arg(long)]
        to: String,
        /// Unit, when the name appears with several units
        #[arg(short, long)]
        unit: Option<String>,
        /// Source list ID (default: the week's weekly list)
        #[arg(short, long)]
        list: Option<String>,
        /// Any date in the week (default: this week)
        #[arg(short, long)]
        week: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show removed items of a list
    Deleted {
        /// List ID (default: the week's weekly list)
        #[arg(short, long)]
        list: Option<String>,
        /// Any date in the week (default: this week)
        #[arg(short, long)]
        week: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum QuickCommands {
    /// Create a reusable quick list
    Create {
        /// Quick list name
        name: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List all quick lists
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a quick list with its items
    Show {
        /// Quick list name or ID
        quick: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add an item to a quick list
    AddItem {
        /// Quick list name or ID
        quick: String,
        /// Item name
        name: String,
        /// Quantity
        #[arg(default_value = "1")]
        quantity: f64,
        /// Unit (omit for countable items)
        #[arg(default_value = "")]
        unit: String,
        /// Store category
        #[arg(long)]
        category: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove an item from a quick list
    RemoveItem {
        /// Quick list item ID (shown by `quick show`)
        item_id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Rename a quick list
    Rename {
        /// Quick list name or ID
        quick: String,
        /// New name
        new_name: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a quick list
    Delete {
        /// Quick list name or ID
        quick: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Stamp a quick list onto a shopping list
    Apply {
        /// Quick list name or ID
        quick: String,
        /// Destination list ID (default: the week's weekly list)
        #[arg(short, long)]
        list: Option<String>,
        /// Any date in the week (default: this week)
        #[arg(short, long)]
        week: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum IngredientCommands {
    /// List the ingredient catalog
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set the store category for an ingredient
    SetCategory {
        /// Ingredient name
        name: String,
        /// Category (e.g. Produce, Dairy, "Meat & Seafood", Pantry)
        category: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

#[allow(clippy::too_many_lines)]
fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let svc = LarderService::new(&config.db_path)?;

    match cli.command {
        Commands::Recipe { command } => match command {
            RecipeCommands::Create {
                name,
                servings,
                ingredients,
                json,
            } => cmd_recipe_create(&svc, &name, servings, &ingredients, json),
            RecipeCommands::AddIngredient {
                recipe,
                name,
                quantity,
                unit,
                category,
                json,
            } => cmd_recipe_add_ingredient(&svc, &recipe, &name, quantity, &unit, category, json),
            RecipeCommands::RemoveIngredient { recipe, name, json } => {
                cmd_recipe_remove_ingredient(&svc, &recipe, &name, json)
            }
            RecipeCommands::SetServings {
                recipe,
                servings,
                json,
            } => cmd_recipe_set_servings(&svc, &recipe, servings, json),
            RecipeCommands::Show { recipe, json } => cmd_recipe_show(&svc, &recipe, json),
            RecipeCommands::List { json } => cmd_recipe_list(&svc, json),
            RecipeCommands::Delete { recipe, json } => cmd_recipe_delete(&svc, &recipe, json),
        },
        Commands::Plan { command } => match command {
            PlanCommands::Add {
                recipe,
                date,
                meal,
                servings,
                json,
            } => cmd_plan_add(&svc, &recipe, date, &meal, servings, json),
            PlanCommands::Week { date, json } => cmd_plan_week(&svc, date, json),
            PlanCommands::Servings {
                meal_id,
                servings,
                json,
            } => cmd_plan_servings(&svc, &meal_id, servings, json),
            PlanCommands::Remove { meal_id, json } => cmd_plan_remove(&svc, &meal_id, json),
        },
        Commands::Shop { command } => match command {
            ShopCommands::View {
                list,
                week,
                by_category,
                by_recipe,
                json,
            } => cmd_shop_view(&svc, list.as_deref(), week, by_category, by_recipe, json),
            ShopCommands::Lists { week, json } => cmd_shop_lists(&svc, week, json),
            ShopCommands::NewList {
                name,
                list_type,
                week,
                json,
            } => cmd_shop_new_list(&svc, &name, &list_type, week, json),
            ShopCommands::Add {
                name,
                quantity,
                unit,
                category,
                list,
                week,
                json,
            } => cmd_shop_add(
                &svc,
                list.as_deref(),
                week,
                &name,
                quantity,
                &unit,
                category.as_deref(),
                json,
            ),
            ShopCommands::Check {
                name,
                unit,
                list,
                week,
                json,
            } => cmd_shop_check(&svc, list.as_deref(), week, &name, unit.as_deref(), true, json),
            ShopCommands::Uncheck {
                name,
                unit,
                list,
                week,
                json,
            } => cmd_shop_check(&svc, list.as_deref(), week, &name, unit.as_deref(), false, json),
            ShopCommands::Remove {
                name,
                unit,
                list,
                week,
                json,
            } => cmd_shop_remove(&svc, list.as_deref(), week, &name, unit.as_deref(), json),
            ShopCommands::Restore {
                name,
                list,
                week,
                json,
            } => cmd_shop_restore(&svc, list.as_deref(), week, &name, json),
            ShopCommands::Move {
                name,
                to,
                unit,
                list,
                week,
                json,
            } => cmd_shop_move(&svc, list.as_deref(), week, &name, unit.as_deref(), &to, json),
            ShopCommands::Deleted { list, week, json } => {
                cmd_shop_deleted(&svc, list.as_deref(), week, json)
            }
        },
        Commands::Quick { command } => match command {
            QuickCommands::Create { name, json } => cmd_quick_create(&svc, &name, json),
            QuickCommands::List { json } => cmd_quick_list(&svc, json),
            QuickCommands::Show { quick, json } => cmd_quick_show(&svc, &quick, json),
            QuickCommands::AddItem {
                quick,
                name,
                quantity,
                unit,
                category,
                json,
            } => cmd_quick_add_item(&svc, &quick, &name, quantity, &unit, category, json),
            QuickCommands::RemoveItem { item_id, json } => {
                cmd_quick_remove_item(&svc, &item_id, json)
            }
            QuickCommands::Rename {
                quick,
                new_name,
                json,
            } => cmd_quick_rename(&svc, &quick, &new_name, json),
            QuickCommands::Delete { quick, json } => cmd_quick_delete(&svc, &quick, json),
            QuickCommands::Apply {
                quick,
                list,
                week,
                json,
            } => cmd_quick_apply(&svc, &quick, list.as_deref(), week, json),
        },
        Commands::Ingredient { command } => match command {
            IngredientCommands::List { json } => cmd_ingredient_list(&svc, json),
            IngredientCommands::SetCategory {
                name,
                category,
                json,
            } => cmd_ingredient_set_category(&svc, &name, &category, json),
        },
    }
}
