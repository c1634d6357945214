use anyhow::Result;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use nutricalc_core::service::NutritionService;

use super::helpers::{grams, truncate};

pub(crate) fn cmd_favlist_list(service: &NutritionService, user_id: &str, json: bool) -> Result<()> {
    let lists = service.favorite_lists(user_id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&lists)?);
        return Ok(());
    }
    if lists.is_empty() {
        eprintln!("No favorite lists for {user_id}.");
        return Ok(());
    }

    #[derive(Tabled)]
    struct FavoriteListRow {
        #[tabled(rename = "ID")]
        id: i64,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Menus")]
        menues: String,
        #[tabled(rename = "Protein")]
        protein: String,
        #[tabled(rename = "Fat")]
        fat: String,
        #[tabled(rename = "Carb")]
        carb: String,
        #[tabled(rename = "Current")]
        current: &'static str,
    }

    let rows: Vec<FavoriteListRow> = lists
        .iter()
        .map(|l| FavoriteListRow {
            id: l.favorite_list.id,
            name: truncate(&l.favorite_list.name, 25),
            menues: truncate(&l.nutrition.menues, 40),
            protein: grams(l.nutrition.protein),
            fat: grams(l.nutrition.fat),
            carb: grams(l.nutrition.carb),
            current: if l.nutrition.is_updated { "yes" } else { "no" },
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(3..6)).with(Alignment::right()))
        .to_string();
    println!("{table}");

    if lists.iter().any(|l| !l.nutrition.is_updated) {
        eprintln!("Some lists reference deleted menus. Use `nutricalc recover` to update them.");
    }
    Ok(())
}
