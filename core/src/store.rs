//! Storage contracts the aggregates and the recovery orchestrator are written against.
//!
//! [`crate::db::Database`] is the production implementation. Lookups by id return
//! [`crate::Error::NotFound`] for a missing row and [`crate::Error::Infrastructure`]
//! for every other failure.

use crate::error::Result;
use crate::models::{FavoriteList, Menu, NewMenu, User};

pub trait MenuStore {
    /// Soft-deleted menus are still returned.
    fn menu_by_id(&self, id: i64) -> Result<Menu>;
    fn insert_menu(&self, menu: &NewMenu) -> Result<Menu>;
    fn soft_delete_menu(&self, id: i64) -> Result<()>;
}

pub trait FavoriteListStore {
    /// Soft-deleted lists are reported as not found.
    fn favorite_list_by_id(&self, id: i64) -> Result<FavoriteList>;
    /// Active lists of one owner, ordered by id.
    fn favorite_lists_by_owner(&self, user_id: &str) -> Result<Vec<FavoriteList>>;
    /// Persist name, list and status of an existing list.
    fn write_favorite_list(&self, favorite_list: &FavoriteList) -> Result<()>;
}

pub trait UserStore {
    fn user_by_id(&self, user_id: &str) -> Result<User>;
    fn write_user(&self, user: &User) -> Result<()>;
}
