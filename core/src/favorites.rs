//! Favorite lists: named, reusable meals owned by one user.

use crate::db::Database;
use crate::error::{Error, Result};
use crate::id_list::{IdList, reconcile};
use crate::models::{FavoriteList, NewFavoriteList, Status, UpdateFavoriteList, validate_name};
use crate::store::FavoriteListStore;

/// Lists sent by clients are checked up front so a bad token never reaches the store.
pub(crate) fn check_submitted_list(encoded: &str) -> Result<()> {
    IdList::parse(encoded)
        .map(|_| ())
        .map_err(|e| Error::Validation(e.to_string()))
}

pub fn create(db: &Database, new: &NewFavoriteList) -> Result<FavoriteList> {
    validate_name("name", &new.name)?;
    check_submitted_list(&new.list)?;
    let favorite_list = db.insert_favorite_list(new)?;
    tracing::info!(
        "Created favorite list {} for {}",
        favorite_list.id,
        favorite_list.user_id
    );
    Ok(favorite_list)
}

pub fn update_fields<S: FavoriteListStore + ?Sized>(
    store: &S,
    id: i64,
    update: &UpdateFavoriteList,
) -> Result<FavoriteList> {
    let mut favorite_list = store.favorite_list_by_id(id)?;
    if let Some(name) = &update.name {
        validate_name("name", name)?;
        favorite_list.name.clone_from(name);
    }
    if let Some(list) = &update.list {
        check_submitted_list(list)?;
        favorite_list.list.clone_from(list);
    }
    store.write_favorite_list(&favorite_list)?;
    Ok(favorite_list)
}

pub fn soft_delete<S: FavoriteListStore + ?Sized>(store: &S, id: i64) -> Result<()> {
    let mut favorite_list = store.favorite_list_by_id(id)?;
    favorite_list.status = Status::Deleted;
    store.write_favorite_list(&favorite_list)?;
    tracing::info!("Deleted favorite list {id}");
    Ok(())
}

pub fn list_by_owner<S: FavoriteListStore + ?Sized>(
    store: &S,
    user_id: &str,
) -> Result<Vec<FavoriteList>> {
    store.favorite_lists_by_owner(user_id)
}

/// Drop (or substitute) a deleted menu from one favorite list.
///
/// Returns whether the list was written. A list that never referenced the menu is
/// left alone.
pub fn recover<S: FavoriteListStore + ?Sized>(
    store: &S,
    id: i64,
    old_menu_id: i64,
    new_menu_id: Option<i64>,
) -> Result<bool> {
    let mut favorite_list = store.favorite_list_by_id(id)?;
    let outcome = reconcile(&favorite_list.list, old_menu_id, new_menu_id).inspect_err(|e| {
        tracing::error!("Favorite list {id} holds a corrupt menu list: {e}");
    })?;

    if outcome.is_noop() {
        tracing::debug!("Favorite list {id} does not reference menu {old_menu_id}");
        return Ok(false);
    }

    favorite_list.list = outcome.encoded;
    store.write_favorite_list(&favorite_list)?;
    tracing::info!(
        "Favorite list {id}: replaced {} serving(s) of menu {old_menu_id}",
        outcome.matched
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    #[test]
    fn test_recover_removes_deleted_menu() {
        let store = MemoryStore::default();
        store.list(1, "gooddy20", "9,9,10,11");

        assert!(recover(&store, 1, 10, None).unwrap());
        assert_eq!(store.list_text(1), "9,9,11");
        assert_eq!(store.writes.get(), 1);
    }

    #[test]
    fn test_recover_substitutes_at_end() {
        let store = MemoryStore::default();
        store.list(1, "gooddy20", "9,9,10");

        assert!(recover(&store, 1, 9, Some(11)).unwrap());
        assert_eq!(store.list_text(1), "10,11,11");
    }

    #[test]
    fn test_recover_without_match_does_not_write() {
        let store = MemoryStore::default();
        store.list(1, "gooddy20", "9,9,10,11");

        assert!(!recover(&store, 1, 12, Some(13)).unwrap());
        assert_eq!(store.list_text(1), "9,9,10,11");
        assert_eq!(store.writes.get(), 0);
    }

    #[test]
    fn test_recover_missing_list_is_not_found() {
        let store = MemoryStore::default();
        let err = recover(&store, 7, 9, None).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_recover_corrupt_list_is_invalid_input() {
        let store = MemoryStore::default();
        store.list(1, "gooddy20", "9,9,10.5");

        let err = recover(&store, 1, 9, None).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(store.writes.get(), 0);
    }

    #[test]
    fn test_recover_write_failure_is_retryable() {
        let store = MemoryStore::default();
        store.list(1, "gooddy20", "9,10");
        store.fail_write(1);

        let err = recover(&store, 1, 9, None).unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(store.list_text(1), "9,10");
    }

    #[test]
    fn test_update_fields_keeps_unset_fields() {
        let store = MemoryStore::default();
        store.list(1, "gooddy20", "9,9,10");

        let updated = update_fields(
            &store,
            1,
            &UpdateFavoriteList {
                name: Some("Breakfast".to_string()),
                list: None,
            },
        )
        .unwrap();
        assert_eq!(updated.name, "Breakfast");
        assert_eq!(updated.list, "9,9,10");
    }

    #[test]
    fn test_update_fields_rejects_bad_list() {
        let store = MemoryStore::default();
        store.list(1, "gooddy20", "9,9,10");

        let err = update_fields(
            &store,
            1,
            &UpdateFavoriteList {
                name: None,
                list: Some("9,x".to_string()),
            },
        )
        .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(store.writes.get(), 0);
    }

    #[test]
    fn test_soft_delete_hides_list() {
        let store = MemoryStore::default();
        store.list(1, "gooddy20", "9");
        store.list(2, "gooddy20", "10");

        soft_delete(&store, 1).unwrap();
        let remaining = list_by_owner(&store, "gooddy20").unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, 2);
        assert!(store.favorite_list_by_id(1).unwrap_err().is_not_found());
    }

    #[test]
    fn test_create_validates_input() {
        let db = Database::open_in_memory().unwrap();
        let err = create(
            &db,
            &NewFavoriteList {
                user_id: "gooddy20".to_string(),
                name: " ".to_string(),
                list: "9".to_string(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let created = create(
            &db,
            &NewFavoriteList {
                user_id: "gooddy20".to_string(),
                name: "Daily Breakfast".to_string(),
                list: "9,9,10".to_string(),
            },
        )
        .unwrap();
        assert_eq!(created.status, Status::Active);
        assert_eq!(created.list, "9,9,10");
    }
}
