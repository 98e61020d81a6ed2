use anyhow::Result;
use std::process;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use larder_core::materialize::{self, ListEntry};
use larder_core::service::{LarderService, ListView};

use super::helpers::{format_qty, json_error, parse_week, truncate};
use super::{find_entry, resolve_list};

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = " ")]
    checked: String,
    #[tabled(rename = "Item")]
    name: String,
    #[tabled(rename = "Qty")]
    qty: String,
    #[tabled(rename = "Unit")]
    unit: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Source")]
    source: String,
}

fn entry_row(entry: &ListEntry) -> EntryRow {
    EntryRow {
        checked: if entry.checked { "x".into() } else { " ".into() },
        name: truncate(&entry.name, 30),
        qty: format_qty(entry.quantity),
        unit: entry.unit.clone(),
        category: entry.category.clone(),
        source: if entry.item_id.is_some() {
            "manual".into()
        } else {
            "planned".into()
        },
    }
}

fn print_entries(entries: &[ListEntry]) {
    let rows: Vec<EntryRow> = entries.iter().map(entry_row).collect();
    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(2..3)).with(Alignment::right()))
        .to_string();
    println!("{table}");
}

fn recipe_label(svc: &LarderService, recipe_id: &str) -> String {
    svc.get_recipe(recipe_id)
        .map_or_else(|_| format!("(deleted recipe {recipe_id})"), |r| r.name)
}

pub(crate) fn cmd_shop_view(
    svc: &LarderService,
    list_id: Option<&str>,
    week: Option<String>,
    by_category: bool,
    by_recipe: bool,
    json: bool,
) -> Result<()> {
    let list = resolve_list(svc, list_id, week)?;
    let view = svc.list_view(&list.id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    print_list_header(&view);
    if view.entries.is_empty() {
        println!("  (empty)");
        return Ok(());
    }

    if by_category {
        for group in materialize::group_by_category(&view.entries) {
            let category = group.category.as_str();
            println!("\n{category}:");
            print_entries(&group.entries);
        }
    } else if by_recipe {
        let groups = materialize::group_by_recipe(&view.entries);
        for group in &groups {
            let label = recipe_label(svc, &group.recipe_id);
            println!("\n{label}:");
            print_entries(&group.entries);
        }
        let manual: Vec<ListEntry> = view
            .entries
            .iter()
            .filter(|e| !e.is_recipe_derived())
            .cloned()
            .collect();
        if !manual.is_empty() {
            println!("\nManual items:");
            print_entries(&manual);
        }
    } else {
        print_entries(&view.entries);
    }
    Ok(())
}

fn print_list_header(view: &ListView) {
    let name = &view.list.name;
    let list_type = &view.list.list_type;
    let week = &view.list.week_start;
    let id = &view.list.id;
    println!("=== {name} ({list_type}, week of {week}) ===");
    println!("  id: {id}");
}

pub(crate) fn cmd_shop_lists(svc: &LarderService, week: Option<String>, json: bool) -> Result<()> {
    #[derive(Tabled)]
    struct ListRow {
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Type")]
        list_type: String,
        #[tabled(rename = "Week")]
        week: String,
        #[tabled(rename = "ID")]
        id: String,
    }

    let week_start = parse_week(week)?;
    let lists = svc.lists_for_week(week_start)?;

    if lists.is_empty() {
        if json {
            println!("[]");
        } else {
            eprintln!("No lists for the week of {week_start}");
        }
        process::exit(2);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&lists)?);
        return Ok(());
    }

    let rows: Vec<ListRow> = lists
        .iter()
        .map(|l| ListRow {
            name: truncate(&l.name, 25),
            list_type: l.list_type.clone(),
            week: l.week_start.clone(),
            id: l.id.clone(),
        })
        .collect();
    let table = Table::new(&rows).with(Style::rounded()).to_string();
    println!("{table}");
    Ok(())
}

pub(crate) fn cmd_shop_new_list(
    svc: &LarderService,
    name: &str,
    list_type: &str,
    week: Option<String>,
    json: bool,
) -> Result<()> {
    let week_start = parse_week(week)?;
    let list = svc.create_list(week_start, name, list_type)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&list)?);
    } else {
        let id = &list.id;
        println!("Created {list_type} list '{name}' for the week of {week_start} (id: {id})");
    }
    Ok(())
}

pub(crate) fn cmd_shop_add(
    svc: &LarderService,
    list_id: Option<&str>,
    week: Option<String>,
    name: &str,
    quantity: f64,
    unit: &str,
    category: Option<&str>,
    json: bool,
) -> Result<()> {
    let list = resolve_list(svc, list_id, week)?;
    let item = svc.add_item(&list.id, name, quantity, unit, category)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&item)?);
    } else {
        let item_name = &item.name;
        let qty = format_qty(item.quantity);
        let list_name = &list.name;
        println!("{item_name} on {list_name}: now {qty} {}", item.unit);
    }
    Ok(())
}

pub(crate) fn cmd_shop_check(
    svc: &LarderService,
    list_id: Option<&str>,
    week: Option<String>,
    name: &str,
    unit: Option<&str>,
    checked: bool,
    json: bool,
) -> Result<()> {
    let list = resolve_list(svc, list_id, week)?;
    let entry = find_entry(svc, &list.id, name, unit)?;

    if let Some(item_id) = &entry.item_id {
        svc.set_item_checked(item_id, checked)?;
    } else {
        svc.set_aggregated_checked(&list.id, &entry.name, &entry.unit, checked)?;
    }

    let verb = if checked { "Checked" } else { "Unchecked" };
    if json {
        println!(
            "{}",
            serde_json::json!({ "name": entry.name, "unit": entry.unit, "checked": checked })
        );
    } else {
        let entry_name = &entry.name;
        println!("{verb} {entry_name}");
    }
    Ok(())
}

pub(crate) fn cmd_shop_remove(
    svc: &LarderService,
    list_id: Option<&str>,
    week: Option<String>,
    name: &str,
    unit: Option<&str>,
    json: bool,
) -> Result<()> {
    let list = resolve_list(svc, list_id, week)?;
    let entry = find_entry(svc, &list.id, name, unit)?;

    if let Some(item_id) = &entry.item_id {
        svc.soft_delete_item(item_id)?;
        if json {
            println!("{}", serde_json::json!({ "removed": entry.name }));
        } else {
            let entry_name = &entry.name;
            println!("Removed {entry_name} (restore with: larder shop restore \"{entry_name}\")");
        }
    } else {
        svc.dismiss_aggregated(&list.id, &entry.name, &entry.unit)?;
        if json {
            println!("{}", serde_json::json!({ "dismissed": entry.name }));
        } else {
            let entry_name = &entry.name;
            println!("Dismissed planned entry {entry_name}");
        }
    }
    Ok(())
}

pub(crate) fn cmd_shop_restore(
    svc: &LarderService,
    list_id: Option<&str>,
    week: Option<String>,
    name: &str,
    json: bool,
) -> Result<()> {
    let list = resolve_list(svc, list_id, week)?;
    let wanted = name.trim().to_lowercase();
    let Some(item) = svc
        .deleted_items(&list.id)?
        .into_iter()
        .find(|i| i.name.trim().to_lowercase() == wanted)
    else {
        if json {
            println!("{}", json_error(&format!("No deleted item '{name}' on this list")));
        } else {
            eprintln!("No deleted item '{name}' on this list");
        }
        process::exit(2);
    };

    let restored = svc.restore_item(&item.id)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&restored)?);
    } else {
        let item_name = &restored.name;
        let qty = format_qty(restored.quantity);
        println!("Restored {item_name} ({qty} {})", restored.unit);
    }
    Ok(())
}

pub(crate) fn cmd_shop_move(
    svc: &LarderService,
    list_id: Option<&str>,
    week: Option<String>,
    name: &str,
    unit: Option<&str>,
    to_list_id: &str,
    json: bool,
) -> Result<()> {
    let list = resolve_list(svc, list_id, week)?;
    let dest = svc.get_list(to_list_id)?;
    let entry = find_entry(svc, &list.id, name, unit)?;

    let moved = if let Some(item_id) = &entry.item_id {
        svc.move_item(item_id, &dest.id)?
    } else {
        svc.move_aggregated(&list.id, &entry.name, &entry.unit, &dest.id)?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&moved)?);
    } else {
        let entry_name = &moved.name;
        let dest_name = &dest.name;
        println!("Moved {entry_name} to {dest_name}");
    }
    Ok(())
}

pub(crate) fn cmd_shop_deleted(
    svc: &LarderService,
    list_id: Option<&str>,
    week: Option<String>,
    json: bool,
) -> Result<()> {
    let list = resolve_list(svc, list_id, week)?;
    let items = svc.deleted_items(&list.id)?;

    if items.is_empty() {
        if json {
            println!("[]");
        } else {
            eprintln!("No deleted items on this list");
        }
        process::exit(2);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    #[derive(Tabled)]
    struct DeletedRow {
        #[tabled(rename = "Item")]
        name: String,
        #[tabled(rename = "Qty")]
        qty: String,
        #[tabled(rename = "Unit")]
        unit: String,
        #[tabled(rename = "Deleted at")]
        deleted_at: String,
    }

    let rows: Vec<DeletedRow> = items
        .iter()
        .map(|i| DeletedRow {
            name: truncate(&i.name, 30),
            qty: format_qty(i.quantity),
            unit: i.unit.clone(),
            deleted_at: i.deleted_at.clone().unwrap_or_default(),
        })
        .collect();
    let table = Table::new(&rows).with(Style::rounded()).to_string();
    println!("{table}");
    Ok(())
}
