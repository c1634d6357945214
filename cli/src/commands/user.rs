use anyhow::Result;

use nutricalc_core::models::NewUser;
use nutricalc_core::service::NutritionService;

use super::helpers::{grams, json_error};

pub(crate) fn cmd_user_register(
    service: &NutritionService,
    user_id: String,
    username: String,
    password: String,
    weight: f64,
    json: bool,
) -> Result<()> {
    let user = service.register_user(&NewUser {
        user_id,
        password,
        username,
        weight,
        protein: 0.0,
        fat: 0.0,
        carb: 0.0,
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&user)?);
    } else {
        println!("Registered {} ({})", user.user_id, user.username);
    }
    Ok(())
}

pub(crate) fn cmd_user_show(service: &NutritionService, user_id: &str, json: bool) -> Result<()> {
    let user = match service.user_detail(user_id) {
        Ok(user) => user,
        Err(e) if e.is_not_found() && json => {
            println!("{}", json_error(&e.to_string()));
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&user)?);
    } else {
        println!("{} ({})", user.username, user.user_id);
        println!("  Weight:    {} kg", grams(user.weight));
        println!(
            "  Targets:   P {}g / F {}g / C {}g",
            grams(user.protein),
            grams(user.fat),
            grams(user.carb)
        );
        if user.favorite_menues.is_empty() {
            println!("  Favorites: none");
        } else {
            println!("  Favorites: {}", user.favorite_menues);
        }
    }
    Ok(())
}
