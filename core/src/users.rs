use chrono::Local;
use sha2::{Digest, Sha256};

use crate::db::Database;
use crate::error::{Error, Result};
use crate::favorites::check_submitted_list;
use crate::id_list::reconcile;
use crate::models::{
    NewUser, UpdateUser, User, validate_macros, validate_password, validate_user_id,
    validate_username,
};
use crate::store::UserStore;

fn hash_password(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

pub fn register(db: &Database, new: &NewUser) -> Result<User> {
    validate_user_id(&new.user_id)?;
    validate_username(&new.username)?;
    validate_password(&new.password)?;
    validate_macros(new.protein, new.fat, new.carb)?;
    if new.weight < 0.0 {
        return Err(Error::Validation("weight must not be negative".to_string()));
    }

    match db.user_by_id(&new.user_id) {
        Ok(_) => {
            return Err(Error::Conflict(format!(
                "User Id '{}' is already taken",
                new.user_id
            )));
        }
        Err(e) if e.is_not_found() => {}
        Err(e) => return Err(e),
    }
    if db.user_by_username(&new.username)?.is_some() {
        return Err(Error::Conflict(format!(
            "Username '{}' is already taken",
            new.username
        )));
    }

    let user = User {
        user_id: new.user_id.clone(),
        password_hash: hash_password(&new.password),
        username: new.username.clone(),
        weight: new.weight,
        protein: new.protein,
        fat: new.fat,
        carb: new.carb,
        favorite_menues: String::new(),
        created_at: Local::now().to_rfc3339(),
    };
    db.insert_user(&user)?;
    tracing::info!("Registered user {}", user.user_id);
    Ok(user)
}

/// Unknown users simply fail the check.
pub fn check_login<S: UserStore + ?Sized>(store: &S, user_id: &str, password: &str) -> Result<bool> {
    match store.user_by_id(user_id) {
        Ok(user) => Ok(user.password_hash == hash_password(password)),
        Err(e) if e.is_not_found() => Ok(false),
        Err(e) => Err(e),
    }
}

pub fn update(db: &Database, user_id: &str, update: &UpdateUser) -> Result<User> {
    if update.is_empty() {
        return Err(Error::Validation("Nothing to update".to_string()));
    }
    let mut user = db.user_by_id(user_id)?;

    if let Some(username) = update.username.as_ref().filter(|u| **u != user.username) {
        validate_username(username)?;
        if db.user_by_username(username)?.is_some() {
            return Err(Error::Conflict(format!(
                "Username '{username}' is already taken"
            )));
        }
        user.username.clone_from(username);
    }
    if let Some(password) = &update.password {
        validate_password(password)?;
        user.password_hash = hash_password(password);
    }
    if let Some(weight) = update.weight {
        if weight < 0.0 {
            return Err(Error::Validation("weight must not be negative".to_string()));
        }
        user.weight = weight;
    }
    let protein = update.protein.unwrap_or(user.protein);
    let fat = update.fat.unwrap_or(user.fat);
    let carb = update.carb.unwrap_or(user.carb);
    validate_macros(protein, fat, carb)?;
    user.protein = protein;
    user.fat = fat;
    user.carb = carb;
    if let Some(favorites) = &update.favorite_menues {
        check_submitted_list(favorites)?;
        user.favorite_menues.clone_from(favorites);
    }

    db.write_user(&user)?;
    tracing::info!("Updated user {user_id}");
    Ok(user)
}

/// Drop a deleted menu from the user's liked menus. Likes are never carried over to
/// a replacement menu. Returns whether the user was written.
pub fn recover_favorites<S: UserStore + ?Sized>(
    store: &S,
    user_id: &str,
    deleted_menu_id: i64,
) -> Result<bool> {
    let mut user = store.user_by_id(user_id)?;
    let outcome = reconcile(&user.favorite_menues, deleted_menu_id, None).inspect_err(|e| {
        tracing::error!("User {user_id} holds a corrupt favorite menu list: {e}");
    })?;

    if outcome.is_noop() {
        tracing::debug!("User {user_id} does not like menu {deleted_menu_id}");
        return Ok(false);
    }

    user.favorite_menues = outcome.encoded;
    store.write_user(&user)?;
    tracing::info!("User {user_id}: removed menu {deleted_menu_id} from favorites");
    Ok(true)
}
