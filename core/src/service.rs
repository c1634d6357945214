use std::collections::HashMap;
use std::path::Path;

use crate::db::Database;
use crate::error::{Error, Result};
use crate::favorites::{self, check_submitted_list};
use crate::id_list::IdList;
use crate::models::{
    FavoriteList, FavoriteListDetail, Menu, MenuDetail, NewFavoriteList, NewMenu, NewRecord,
    NewUser, NutritionSummary, Record, RecordDetail, Status, UpdateFavoriteList, UpdateMenu,
    UpdateRecord, UpdateUser, User, validate_macros, validate_name,
};
use crate::nutrition::summarize;
use crate::recovery::{self, RecoverMenuRequest, RecoveryFailure, RecoveryReport};
use crate::store::{FavoriteListStore, MenuStore, UserStore};
use crate::users;

pub struct NutritionService {
    db: Database,
}

impl NutritionService {
    pub fn new(db_path: &Path) -> Result<Self> {
        let db = Database::open(db_path)?;
        Ok(Self { db })
    }

    pub fn new_in_memory() -> Result<Self> {
        let db = Database::open_in_memory()?;
        Ok(Self { db })
    }

    // --- Users ---

    pub fn register_user(&self, new: &NewUser) -> Result<User> {
        users::register(&self.db, new)
    }

    pub fn login(&self, user_id: &str, password: &str) -> Result<bool> {
        users::check_login(&self.db, user_id, password)
    }

    pub fn user_detail(&self, user_id: &str) -> Result<User> {
        self.db.user_by_id(user_id)
    }

    pub fn update_user(&self, user_id: &str, update: &UpdateUser) -> Result<User> {
        users::update(&self.db, user_id, update)
    }

    // --- Menus ---

    pub fn create_menu(&self, new: &NewMenu) -> Result<Menu> {
        validate_name("name", &new.name)?;
        validate_macros(new.protein, new.fat, new.carb)?;
        self.db.user_by_id(&new.creator_id)?;
        let menu = self.db.insert_menu(new)?;
        tracing::info!("Created menu {} '{}'", menu.id, menu.name);
        Ok(menu)
    }

    pub fn list_menus(&self) -> Result<Vec<MenuDetail>> {
        self.db.list_menus()
    }

    pub fn get_menu(&self, id: i64) -> Result<Menu> {
        self.db.menu_by_id(id)
    }

    /// Menus are versioned: the current row is soft-deleted and a new row carrying the
    /// merged values is inserted. Lists still referencing the old id show it as outdated
    /// until recovered.
    pub fn update_menu(&self, id: i64, update: &UpdateMenu) -> Result<Menu> {
        let old = self.db.menu_by_id(id)?;
        if old.status == Status::Deleted {
            return Err(Error::NotFound(format!("Menu {id} has been deleted")));
        }
        let new = NewMenu {
            name: update.name.clone().unwrap_or_else(|| old.name.clone()),
            protein: update.protein.unwrap_or(old.protein),
            fat: update.fat.unwrap_or(old.fat),
            carb: update.carb.unwrap_or(old.carb),
            creator_id: old.creator_id.clone(),
        };
        validate_name("name", &new.name)?;
        validate_macros(new.protein, new.fat, new.carb)?;

        self.db.soft_delete_menu(id)?;
        let menu = self.db.insert_menu(&new)?;
        tracing::info!("Menu {id} superseded by menu {}", menu.id);
        Ok(menu)
    }

    pub fn delete_menu(&self, id: i64) -> Result<()> {
        self.db.menu_by_id(id)?;
        self.db.soft_delete_menu(id)?;
        tracing::info!("Deleted menu {id}");
        Ok(())
    }

    // --- Favorite lists ---

    pub fn create_favorite_list(&self, new: &NewFavoriteList) -> Result<FavoriteList> {
        self.db.user_by_id(&new.user_id)?;
        favorites::create(&self.db, new)
    }

    pub fn favorite_lists(&self, user_id: &str) -> Result<Vec<FavoriteListDetail>> {
        let lists = favorites::list_by_owner(&self.db, user_id)?;
        let summaries = self.summarize_all(lists.iter().map(|l| l.list.as_str()))?;
        Ok(lists
            .into_iter()
            .zip(summaries)
            .map(|(favorite_list, nutrition)| FavoriteListDetail {
                favorite_list,
                nutrition,
            })
            .collect())
    }

    pub fn favorite_list_detail(&self, id: i64) -> Result<FavoriteListDetail> {
        let favorite_list = self.db.favorite_list_by_id(id)?;
        let nutrition = self.summarize_one(&favorite_list.list)?;
        Ok(FavoriteListDetail {
            favorite_list,
            nutrition,
        })
    }

    pub fn update_favorite_list(
        &self,
        id: i64,
        update: &UpdateFavoriteList,
    ) -> Result<FavoriteList> {
        favorites::update_fields(&self.db, id, update)
    }

    pub fn delete_favorite_list(&self, id: i64) -> Result<()> {
        favorites::soft_delete(&self.db, id)
    }

    // --- Records ---

    pub fn create_record(&self, new: &NewRecord) -> Result<Record> {
        self.db.user_by_id(&new.user_id)?;
        check_submitted_list(&new.list)?;
        if new.weight < 0.0 {
            return Err(Error::Validation("weight must not be negative".to_string()));
        }
        let record = self.db.insert_record(new)?;
        tracing::info!("Logged record {} for {}", record.id, record.user_id);
        Ok(record)
    }

    pub fn records(&self, user_id: &str) -> Result<Vec<RecordDetail>> {
        let records = self.db.records_by_owner(user_id)?;
        let summaries = self.summarize_all(records.iter().map(|r| r.list.as_str()))?;
        Ok(records
            .into_iter()
            .zip(summaries)
            .map(|(record, nutrition)| RecordDetail { record, nutrition })
            .collect())
    }

    pub fn record_detail(&self, id: i64) -> Result<RecordDetail> {
        let record = self.db.record_by_id(id)?;
        let nutrition = self.summarize_one(&record.list)?;
        Ok(RecordDetail { record, nutrition })
    }

    pub fn update_record(&self, id: i64, update: &UpdateRecord) -> Result<Record> {
        let mut record = self.db.record_by_id(id)?;
        if let Some(list) = &update.list {
            check_submitted_list(list)?;
            record.list.clone_from(list);
        }
        if let Some(note) = &update.note {
            record.note.clone_from(note);
        }
        if let Some(weight) = update.weight {
            if weight < 0.0 {
                return Err(Error::Validation("weight must not be negative".to_string()));
            }
            record.weight = weight;
        }
        if let Some(event_timestamp) = update.event_timestamp {
            record.event_timestamp = event_timestamp;
        }
        self.db.write_record(&record)?;
        Ok(record)
    }

    pub fn delete_record(&self, id: i64) -> Result<()> {
        let mut record = self.db.record_by_id(id)?;
        record.status = Status::Deleted;
        self.db.write_record(&record)?;
        tracing::info!("Deleted record {id}");
        Ok(())
    }

    // --- Recovery ---

    pub fn recover_deleted_menu(
        &self,
        request: &RecoverMenuRequest,
    ) -> std::result::Result<RecoveryReport, RecoveryFailure> {
        recovery::recover_menu(&self.db, request)
    }

    // --- Aggregation ---

    fn summarize_one(&self, encoded: &str) -> Result<NutritionSummary> {
        let mut summaries = self.summarize_all(std::iter::once(encoded))?;
        Ok(summaries.pop().unwrap_or_default())
    }

    /// One catalog lookup for every list, then a summary per list in input order.
    fn summarize_all<'a>(
        &self,
        encoded: impl Iterator<Item = &'a str>,
    ) -> Result<Vec<NutritionSummary>> {
        let lists = encoded
            .map(|e| {
                IdList::parse(e).inspect_err(|err| tracing::error!("Stored menu list: {err}"))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut ids: Vec<i64> = lists.iter().flat_map(|l| l.ids().iter().copied()).collect();
        ids.sort_unstable();
        ids.dedup();
        let catalog: HashMap<i64, Menu> = self.db.menus_by_ids(&ids)?;

        Ok(lists.iter().map(|l| summarize(l, &catalog)).collect())
    }
}
