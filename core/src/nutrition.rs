use std::collections::HashMap;

use crate::id_list::IdList;
use crate::models::{Menu, NutritionSummary, Status};

/// Totals for an id list against the catalog. Each menu counts once per occurrence;
/// ids with no catalog row are skipped.
#[must_use]
pub fn summarize(list: &IdList, catalog: &HashMap<i64, Menu>) -> NutritionSummary {
    let mut summary = NutritionSummary {
        is_updated: true,
        ..NutritionSummary::default()
    };
    let mut parts = Vec::new();

    for (id, quantity) in list.quantities() {
        let Some(menu) = catalog.get(&id) else {
            tracing::debug!("Menu {id} referenced but not in catalog");
            continue;
        };
        #[allow(clippy::cast_precision_loss)]
        let servings = quantity as f64;
        summary.protein += menu.protein * servings;
        summary.fat += menu.fat * servings;
        summary.carb += menu.carb * servings;
        if menu.status == Status::Deleted {
            summary.is_updated = false;
        }
        parts.push(format!("{}-{quantity}", menu.name));
    }

    summary.menues = parts.join(", ");
    summary
}
