//! Cleaning up after a menu is deleted from the catalog.
//!
//! Recovery optionally re-creates the deleted menu as a fresh catalog row, then walks
//! every place one user references the old id: their liked menus and each of their
//! favorite lists. Steps run in order and each is persisted on its own. There is no
//! rollback, so a failure reports exactly which steps had already been applied.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::models::NewMenu;
use crate::store::{FavoriteListStore, MenuStore, UserStore};
use crate::{favorites, users};

#[derive(Debug, Clone, Deserialize)]
pub struct RecoverMenuRequest {
    pub user_id: String,
    pub deleted_menu_id: i64,
    /// Name for the replacement menu; the deleted menu's name when absent or blank.
    #[serde(default)]
    pub new_menu_name: Option<String>,
    #[serde(default)]
    pub create_replacement: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum RecoveryStep {
    ReplacementCreated { menu_id: i64 },
    UserFavoritesUpdated { user_id: String },
    UserFavoritesUnchanged { user_id: String },
    FavoriteListUpdated { favorite_list_id: i64 },
    FavoriteListUnchanged { favorite_list_id: i64 },
}

#[derive(Debug, Serialize)]
pub struct RecoveryReport {
    pub new_menu_id: Option<i64>,
    pub steps: Vec<RecoveryStep>,
}

#[derive(Debug, thiserror::Error)]
#[error("Menu recovery stopped after {} step(s): {source}", .applied.len())]
pub struct RecoveryFailure {
    /// Steps that completed before the failure. Their writes are kept.
    pub applied: Vec<RecoveryStep>,
    pub source: Error,
}

pub fn recover_menu<S>(
    store: &S,
    request: &RecoverMenuRequest,
) -> std::result::Result<RecoveryReport, RecoveryFailure>
where
    S: MenuStore + UserStore + FavoriteListStore + ?Sized,
{
    tracing::info!(
        "Recovering menu {} for user {}",
        request.deleted_menu_id,
        request.user_id
    );
    let mut steps = Vec::new();
    match run(store, request, &mut steps) {
        Ok(new_menu_id) => Ok(RecoveryReport { new_menu_id, steps }),
        Err(source) => {
            tracing::warn!(
                "Recovery of menu {} failed after {} step(s): {source}",
                request.deleted_menu_id,
                steps.len()
            );
            Err(RecoveryFailure {
                applied: steps,
                source,
            })
        }
    }
}

fn run<S>(
    store: &S,
    request: &RecoverMenuRequest,
    steps: &mut Vec<RecoveryStep>,
) -> crate::Result<Option<i64>>
where
    S: MenuStore + UserStore + FavoriteListStore + ?Sized,
{
    let deleted = request.deleted_menu_id;

    let new_menu_id = if request.create_replacement {
        let old = store.menu_by_id(deleted)?;
        let name = request
            .new_menu_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(old.name.as_str());
        let replacement = store.insert_menu(&NewMenu {
            name: name.to_string(),
            protein: old.protein,
            fat: old.fat,
            carb: old.carb,
            creator_id: old.creator_id.clone(),
        })?;
        tracing::info!("Menu {deleted} replaced by menu {}", replacement.id);
        steps.push(RecoveryStep::ReplacementCreated {
            menu_id: replacement.id,
        });
        Some(replacement.id)
    } else {
        None
    };

    let user_id = request.user_id.clone();
    if users::recover_favorites(store, &request.user_id, deleted)? {
        steps.push(RecoveryStep::UserFavoritesUpdated { user_id });
    } else {
        steps.push(RecoveryStep::UserFavoritesUnchanged { user_id });
    }

    for favorite_list in store.favorite_lists_by_owner(&request.user_id)? {
        let favorite_list_id = favorite_list.id;
        if favorites::recover(store, favorite_list_id, deleted, new_menu_id)? {
            steps.push(RecoveryStep::FavoriteListUpdated { favorite_list_id });
        } else {
            steps.push(RecoveryStep::FavoriteListUnchanged { favorite_list_id });
        }
    }

    Ok(new_menu_id)
}
