use anyhow::Result;
use std::process;
use tabled::{Table, Tabled, settings::Style};

use larder_core::error::Error as CoreError;
use larder_core::models::NewQuickListItem;
use larder_core::service::LarderService;

use super::helpers::{format_qty, format_qty_unit, truncate};
use super::resolve_list;

/// Resolve a quick list reference: name first, then ID.
fn resolve_quick(svc: &LarderService, reference: &str) -> Result<larder_core::models::QuickList> {
    match svc.find_quick_list_by_name(reference) {
        Ok(quick) => Ok(quick),
        Err(CoreError::NotFound(_)) => Ok(svc.get_quick_list(reference)?),
        Err(e) => Err(e.into()),
    }
}

pub(crate) fn cmd_quick_create(svc: &LarderService, name: &str, json: bool) -> Result<()> {
    let quick = svc.create_quick_list(name)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&quick)?);
    } else {
        let id = &quick.id;
        println!("Created quick list '{name}' (id: {id})");
        println!("Add items with: larder quick add-item \"{name}\" <name> <quantity>");
    }
    Ok(())
}

pub(crate) fn cmd_quick_list(svc: &LarderService, json: bool) -> Result<()> {
    #[derive(Tabled)]
    struct QuickRow {
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Items")]
        items: usize,
        #[tabled(rename = "ID")]
        id: String,
    }

    let quicks = svc.list_quick_lists()?;
    if quicks.is_empty() {
        if json {
            println!("[]");
        } else {
            eprintln!("No quick lists found");
        }
        process::exit(2);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&quicks)?);
        return Ok(());
    }

    let mut rows = Vec::new();
    for quick in &quicks {
        rows.push(QuickRow {
            name: truncate(&quick.name, 25),
            items: svc.quick_list_items(&quick.id)?.len(),
            id: quick.id.clone(),
        });
    }
    let table = Table::new(&rows).with(Style::rounded()).to_string();
    println!("{table}");
    Ok(())
}

pub(crate) fn cmd_quick_show(svc: &LarderService, quick_ref: &str, json: bool) -> Result<()> {
    let quick = resolve_quick(svc, quick_ref)?;
    let items = svc.quick_list_items(&quick.id)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "quick_list": quick,
                "items": items,
            }))?
        );
        return Ok(());
    }

    let name = &quick.name;
    println!("=== {name} ===");
    if items.is_empty() {
        println!("  (empty)");
        return Ok(());
    }

    #[derive(Tabled)]
    struct ItemRow {
        #[tabled(rename = "Item")]
        name: String,
        #[tabled(rename = "Qty")]
        qty: String,
        #[tabled(rename = "Unit")]
        unit: String,
        #[tabled(rename = "Category")]
        category: String,
        #[tabled(rename = "ID")]
        id: String,
    }

    let rows: Vec<ItemRow> = items
        .iter()
        .map(|i| ItemRow {
            name: truncate(&i.name, 30),
            qty: format_qty(i.quantity),
            unit: i.unit.clone(),
            category: i.category.clone(),
            id: i.id.clone(),
        })
        .collect();
    let table = Table::new(&rows).with(Style::rounded()).to_string();
    println!("{table}");
    Ok(())
}

pub(crate) fn cmd_quick_add_item(
    svc: &LarderService,
    quick_ref: &str,
    name: &str,
    quantity: f64,
    unit: &str,
    category: Option<String>,
    json: bool,
) -> Result<()> {
    let quick = resolve_quick(svc, quick_ref)?;
    let item = svc.add_quick_item(
        &quick.id,
        &NewQuickListItem {
            name: name.to_string(),
            quantity,
            unit: unit.to_string(),
            category: category.unwrap_or_else(|| "Other".to_string()),
        },
    )?;

    if json {
        println!("{}", serde_json::to_string_pretty(&item)?);
    } else {
        let quick_name = &quick.name;
        let amount = format_qty_unit(quantity, unit);
        println!("Added {amount} {name} to {quick_name}");
    }
    Ok(())
}

pub(crate) fn cmd_quick_remove_item(svc: &LarderService, item_id: &str, json: bool) -> Result<()> {
    svc.remove_quick_item(item_id)?;
    if json {
        println!("{}", serde_json::json!({ "removed": item_id }));
    } else {
        println!("Removed quick list item {item_id}");
    }
    Ok(())
}

pub(crate) fn cmd_quick_rename(
    svc: &LarderService,
    quick_ref: &str,
    new_name: &str,
    json: bool,
) -> Result<()> {
    let quick = resolve_quick(svc, quick_ref)?;
    let renamed = svc.rename_quick_list(&quick.id, new_name)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&renamed)?);
    } else {
        let old = &quick.name;
        println!("Renamed '{old}' to '{new_name}'");
    }
    Ok(())
}

pub(crate) fn cmd_quick_delete(svc: &LarderService, quick_ref: &str, json: bool) -> Result<()> {
    let quick = resolve_quick(svc, quick_ref)?;
    svc.delete_quick_list(&quick.id)?;
    if json {
        println!("{}", serde_json::json!({ "deleted": quick.name }));
    } else {
        let name = &quick.name;
        println!("Deleted quick list '{name}'");
    }
    Ok(())
}

pub(crate) fn cmd_quick_apply(
    svc: &LarderService,
    quick_ref: &str,
    list_id: Option<&str>,
    week: Option<String>,
    json: bool,
) -> Result<()> {
    let quick = resolve_quick(svc, quick_ref)?;
    let list = resolve_list(svc, list_id, week)?;
    let added = svc.apply_quick_list(&quick.id, &list.id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&added)?);
    } else {
        let quick_name = &quick.name;
        let list_name = &list.name;
        let count = added.len();
        println!("Applied '{quick_name}' to {list_name} ({count} items)");
    }
    Ok(())
}
