use anyhow::Result;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use nutricalc_core::models::EVENT_TIMESTAMP_FORMAT;
use nutricalc_core::service::NutritionService;

use super::helpers::{grams, truncate};

pub(crate) fn cmd_record_list(service: &NutritionService, user_id: &str, json: bool) -> Result<()> {
    let records = service.records(user_id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }
    if records.is_empty() {
        eprintln!("No records for {user_id}.");
        return Ok(());
    }

    #[derive(Tabled)]
    struct RecordRow {
        #[tabled(rename = "ID")]
        id: i64,
        #[tabled(rename = "When")]
        when: String,
        #[tabled(rename = "Menus")]
        menues: String,
        #[tabled(rename = "Protein")]
        protein: String,
        #[tabled(rename = "Fat")]
        fat: String,
        #[tabled(rename = "Carb")]
        carb: String,
        #[tabled(rename = "Note")]
        note: String,
    }

    let rows: Vec<RecordRow> = records
        .iter()
        .map(|r| RecordRow {
            id: r.record.id,
            when: r
                .record
                .event_timestamp
                .format(EVENT_TIMESTAMP_FORMAT)
                .to_string(),
            menues: truncate(&r.nutrition.menues, 40),
            protein: grams(r.nutrition.protein),
            fat: grams(r.nutrition.fat),
            carb: grams(r.nutrition.carb),
            note: truncate(&r.record.note, 30),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(3..6)).with(Alignment::right()))
        .to_string();
    println!("{table}");
    Ok(())
}
