use anyhow::Result;

use nutricalc_core::recovery::{RecoverMenuRequest, RecoveryStep};
use nutricalc_core::service::NutritionService;

fn describe(step: &RecoveryStep) -> String {
    match step {
        RecoveryStep::ReplacementCreated { menu_id } => {
            format!("Created replacement menu #{menu_id}")
        }
        RecoveryStep::UserFavoritesUpdated { user_id } => {
            format!("Removed the menu from {user_id}'s favorites")
        }
        RecoveryStep::UserFavoritesUnchanged { user_id } => {
            format!("{user_id}'s favorites did not include the menu")
        }
        RecoveryStep::FavoriteListUpdated { favorite_list_id } => {
            format!("Updated favorite list #{favorite_list_id}")
        }
        RecoveryStep::FavoriteListUnchanged { favorite_list_id } => {
            format!("Favorite list #{favorite_list_id} unchanged")
        }
    }
}

pub(crate) fn cmd_recover(
    service: &NutritionService,
    user_id: String,
    deleted_menu_id: i64,
    create_replacement: bool,
    new_menu_name: Option<String>,
    json: bool,
) -> Result<()> {
    let request = RecoverMenuRequest {
        user_id,
        deleted_menu_id,
        new_menu_name,
        create_replacement,
    };

    match service.recover_deleted_menu(&request) {
        Ok(report) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for step in &report.steps {
                    println!("  {}", describe(step));
                }
                match report.new_menu_id {
                    Some(id) => println!("Menu #{deleted_menu_id} recovered as #{id}"),
                    None => println!("Menu #{deleted_menu_id} removed from {}", request.user_id),
                }
            }
            Ok(())
        }
        Err(failure) => {
            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "error": failure.source.to_string(),
                        "applied": failure.applied,
                    })
                );
            } else {
                for step in &failure.applied {
                    eprintln!("  {}", describe(step));
                }
            }
            Err(failure.into())
        }
    }
}
