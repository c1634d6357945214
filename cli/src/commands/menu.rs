use anyhow::Result;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use nutricalc_core::models::{NewMenu, Status};
use nutricalc_core::service::NutritionService;

use super::helpers::{grams, json_error, truncate};

pub(crate) fn cmd_menu_add(
    service: &NutritionService,
    name: String,
    protein: f64,
    fat: f64,
    carb: f64,
    creator_id: String,
    json: bool,
) -> Result<()> {
    let menu = service.create_menu(&NewMenu {
        name,
        protein,
        fat,
        carb,
        creator_id,
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&menu)?);
    } else {
        println!(
            "Added menu #{}: {} (P {}g, F {}g, C {}g)",
            menu.id,
            menu.name,
            grams(menu.protein),
            grams(menu.fat),
            grams(menu.carb)
        );
    }
    Ok(())
}

pub(crate) fn cmd_menu_list(service: &NutritionService, json: bool) -> Result<()> {
    let menus = service.list_menus()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&menus)?);
        return Ok(());
    }
    if menus.is_empty() {
        eprintln!("No menus yet. Use `nutricalc menu add` to create one.");
        return Ok(());
    }

    #[derive(Tabled)]
    struct MenuRow {
        #[tabled(rename = "ID")]
        id: i64,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Protein")]
        protein: String,
        #[tabled(rename = "Fat")]
        fat: String,
        #[tabled(rename = "Carb")]
        carb: String,
        #[tabled(rename = "Creator")]
        creator: String,
        #[tabled(rename = "Likes")]
        likes: i64,
        #[tabled(rename = "Status")]
        status: &'static str,
    }

    let rows: Vec<MenuRow> = menus
        .iter()
        .map(|m| MenuRow {
            id: m.menu.id,
            name: truncate(&m.menu.name, 35),
            protein: grams(m.menu.protein),
            fat: grams(m.menu.fat),
            carb: grams(m.menu.carb),
            creator: m
                .creator_name
                .clone()
                .unwrap_or_else(|| m.menu.creator_id.clone()),
            likes: m.likes,
            status: match m.menu.status {
                Status::Active => "active",
                Status::Deleted => "deleted",
            },
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(2..5)).with(Alignment::right()))
        .to_string();
    println!("{table}");
    Ok(())
}

pub(crate) fn cmd_menu_delete(service: &NutritionService, id: i64, json: bool) -> Result<()> {
    match service.delete_menu(id) {
        Ok(()) => {
            if json {
                println!("{}", serde_json::json!({ "deleted": id }));
            } else {
                println!("Deleted menu #{id}");
                eprintln!("Run `nutricalc recover <user> {id}` to clean up favorites that use it.");
            }
            Ok(())
        }
        Err(e) if e.is_not_found() && json => {
            println!("{}", json_error(&e.to_string()));
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
