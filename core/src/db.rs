use std::collections::HashMap;
use std::path::Path;

use chrono::{Local, NaiveDateTime};
use rusqlite::{Connection, params, params_from_iter};

use crate::error::{Error, Result, not_found_or};
use crate::models::{
    EVENT_TIMESTAMP_FORMAT, FavoriteList, Menu, MenuDetail, NewFavoriteList, NewMenu, NewRecord,
    Record, Status, User,
};
use crate::store::{FavoriteListStore, MenuStore, UserStore};

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Database { conn };
        db.migrate()?;
        tracing::debug!("Opened database at {}", path.display());
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Database { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        let version: i64 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;

        if version < 1 {
            self.conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS users (
                    user_id TEXT PRIMARY KEY,
                    password_hash TEXT NOT NULL,
                    username TEXT NOT NULL UNIQUE,
                    weight REAL NOT NULL DEFAULT 0,
                    protein REAL NOT NULL DEFAULT 0,
                    fat REAL NOT NULL DEFAULT 0,
                    carb REAL NOT NULL DEFAULT 0,
                    favorite_menues TEXT NOT NULL DEFAULT '',
                    created_at TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS menus (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL,
                    protein REAL NOT NULL,
                    fat REAL NOT NULL,
                    carb REAL NOT NULL,
                    creator_id TEXT NOT NULL,
                    status INTEGER NOT NULL DEFAULT 1,
                    created_at TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS favorite_lists (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id TEXT NOT NULL,
                    name TEXT NOT NULL,
                    list TEXT NOT NULL,
                    status INTEGER NOT NULL DEFAULT 1,
                    created_at TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS records (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id TEXT NOT NULL,
                    list TEXT NOT NULL,
                    note TEXT NOT NULL DEFAULT '',
                    weight REAL NOT NULL DEFAULT 0,
                    event_timestamp TEXT NOT NULL,
                    status INTEGER NOT NULL DEFAULT 1,
                    created_at TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_favorite_lists_user ON favorite_lists(user_id);
                CREATE INDEX IF NOT EXISTS idx_records_user ON records(user_id);
                CREATE INDEX IF NOT EXISTS idx_records_event ON records(event_timestamp);

                PRAGMA user_version = 1;",
            )?;
        }

        Ok(())
    }

    // --- Row mapping helpers ---

    // Expects columns:
    // 0: user_id, 1: password_hash, 2: username, 3: weight, 4: protein,
    // 5: fat, 6: carb, 7: favorite_menues, 8: created_at
    fn user_from_row(row: &rusqlite::Row) -> rusqlite::Result<User> {
        Ok(User {
            user_id: row.get(0)?,
            password_hash: row.get(1)?,
            username: row.get(2)?,
            weight: row.get(3)?,
            protein: row.get(4)?,
            fat: row.get(5)?,
            carb: row.get(6)?,
            favorite_menues: row.get(7)?,
            created_at: row.get(8)?,
        })
    }

    fn menu_from_row(row: &rusqlite::Row) -> rusqlite::Result<Menu> {
        Ok(Menu {
            id: row.get(0)?,
            name: row.get(1)?,
            protein: row.get(2)?,
            fat: row.get(3)?,
            carb: row.get(4)?,
            creator_id: row.get(5)?,
            status: Status::from_i64(row.get(6)?),
            created_at: row.get(7)?,
        })
    }

    fn favorite_list_from_row(row: &rusqlite::Row) -> rusqlite::Result<FavoriteList> {
        Ok(FavoriteList {
            id: row.get(0)?,
            user_id: row.get(1)?,
            name: row.get(2)?,
            list: row.get(3)?,
            status: Status::from_i64(row.get(4)?),
            created_at: row.get(5)?,
        })
    }

    fn record_from_row(row: &rusqlite::Row) -> rusqlite::Result<Record> {
        let raw: String = row.get(5)?;
        let event_timestamp = NaiveDateTime::parse_from_str(&raw, EVENT_TIMESTAMP_FORMAT)
            .map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    5,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })?;
        Ok(Record {
            id: row.get(0)?,
            user_id: row.get(1)?,
            list: row.get(2)?,
            note: row.get(3)?,
            weight: row.get(4)?,
            event_timestamp,
            status: Status::from_i64(row.get(6)?),
            created_at: row.get(7)?,
        })
    }

    // --- Users ---

    pub fn insert_user(&self, user: &User) -> Result<()> {
        self.conn.execute(
            "INSERT INTO users (user_id, password_hash, username, weight, protein, fat, carb, favorite_menues, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                user.user_id,
                user.password_hash,
                user.username,
                user.weight,
                user.protein,
                user.fat,
                user.carb,
                user.favorite_menues,
                user.created_at,
            ],
        )
        .map_err(|e| {
            if e.sqlite_error_code() == Some(rusqlite::ErrorCode::ConstraintViolation) {
                Error::Conflict(format!(
                    "User Id '{}' or username '{}' is already taken",
                    user.user_id, user.username
                ))
            } else {
                e.into()
            }
        })?;
        Ok(())
    }

    pub fn user_by_username(&self, username: &str) -> Result<Option<User>> {
        let mut stmt = self.conn.prepare(
            "SELECT user_id, password_hash, username, weight, protein, fat, carb, favorite_menues, created_at
             FROM users WHERE username = ?1",
        )?;
        let mut rows = stmt.query(params![username])?;
        if let Some(row) = rows.next()? {
            Ok(Some(Self::user_from_row(row)?))
        } else {
            Ok(None)
        }
    }

    // --- Menus ---

    /// Whole catalog, deleted rows included, with creator name and like count.
    pub fn list_menus(&self) -> Result<Vec<MenuDetail>> {
        let mut stmt = self.conn.prepare(
            "SELECT m.id, m.name, m.protein, m.fat, m.carb, m.creator_id, m.status, m.created_at,
                    u.username,
                    (SELECT COUNT(*) FROM users f
                     WHERE ',' || f.favorite_menues || ',' LIKE '%,' || m.id || ',%') AS likes
             FROM menus m
             LEFT JOIN users u ON u.user_id = m.creator_id
             ORDER BY m.id",
        )?;
        let menus = stmt
            .query_map([], |row| {
                Ok(MenuDetail {
                    menu: Self::menu_from_row(row)?,
                    creator_name: row.get(8)?,
                    likes: row.get(9)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(menus)
    }

    /// Look up several menus at once. Ids with no catalog row are simply absent.
    pub fn menus_by_ids(&self, ids: &[i64]) -> Result<HashMap<i64, Menu>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let placeholders = vec!["?"; ids.len()].join(", ");
        let mut stmt = self.conn.prepare(&format!(
            "SELECT id, name, protein, fat, carb, creator_id, status, created_at
             FROM menus WHERE id IN ({placeholders})"
        ))?;
        let menus = stmt
            .query_map(params_from_iter(ids.iter()), Self::menu_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(menus.into_iter().map(|m| (m.id, m)).collect())
    }

    // --- Favorite lists ---

    pub fn insert_favorite_list(&self, new: &NewFavoriteList) -> Result<FavoriteList> {
        let now = Local::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO favorite_lists (user_id, name, list, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                new.user_id,
                new.name,
                new.list,
                Status::Active.as_i64(),
                now
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        self.favorite_list_by_id(id)
    }

    // --- Records ---

    pub fn insert_record(&self, new: &NewRecord) -> Result<Record> {
        let now = Local::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO records (user_id, list, note, weight, event_timestamp, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                new.user_id,
                new.list,
                new.note,
                new.weight,
                new.event_timestamp.format(EVENT_TIMESTAMP_FORMAT).to_string(),
                Status::Active.as_i64(),
                now,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        self.record_by_id(id)
    }

    pub fn record_by_id(&self, id: i64) -> Result<Record> {
        self.conn
            .query_row(
                "SELECT id, user_id, list, note, weight, event_timestamp, status, created_at
                 FROM records WHERE id = ?1 AND status = 1",
                params![id],
                Self::record_from_row,
            )
            .map_err(|e| not_found_or(e, || format!("Record {id} not found")))
    }

    /// Active records of one user, most recent meal first.
    pub fn records_by_owner(&self, user_id: &str) -> Result<Vec<Record>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, list, note, weight, event_timestamp, status, created_at
             FROM records WHERE user_id = ?1 AND status = 1
             ORDER BY event_timestamp DESC, id DESC",
        )?;
        let records = stmt
            .query_map(params![user_id], Self::record_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    pub fn write_record(&self, record: &Record) -> Result<()> {
        let rows = self.conn.execute(
            "UPDATE records SET list = ?1, note = ?2, weight = ?3, event_timestamp = ?4, status = ?5
             WHERE id = ?6",
            params![
                record.list,
                record.note,
                record.weight,
                record
                    .event_timestamp
                    .format(EVENT_TIMESTAMP_FORMAT)
                    .to_string(),
                record.status.as_i64(),
                record.id,
            ],
        )?;
        if rows == 0 {
            return Err(Error::NotFound(format!("Record {} not found", record.id)));
        }
        Ok(())
    }
}

impl MenuStore for Database {
    fn menu_by_id(&self, id: i64) -> Result<Menu> {
        self.conn
            .query_row(
                "SELECT id, name, protein, fat, carb, creator_id, status, created_at
                 FROM menus WHERE id = ?1",
                params![id],
                Self::menu_from_row,
            )
            .map_err(|e| not_found_or(e, || format!("Menu {id} not found")))
    }

    fn insert_menu(&self, menu: &NewMenu) -> Result<Menu> {
        let now = Local::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO menus (name, protein, fat, carb, creator_id, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                menu.name,
                menu.protein,
                menu.fat,
                menu.carb,
                menu.creator_id,
                Status::Active.as_i64(),
                now,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        self.menu_by_id(id)
    }

    fn soft_delete_menu(&self, id: i64) -> Result<()> {
        let rows = self.conn.execute(
            "UPDATE menus SET status = ?1 WHERE id = ?2",
            params![Status::Deleted.as_i64(), id],
        )?;
        if rows == 0 {
            return Err(Error::NotFound(format!("Menu {id} not found")));
        }
        Ok(())
    }
}

impl FavoriteListStore for Database {
    fn favorite_list_by_id(&self, id: i64) -> Result<FavoriteList> {
        self.conn
            .query_row(
                "SELECT id, user_id, name, list, status, created_at
                 FROM favorite_lists WHERE id = ?1 AND status = 1",
                params![id],
                Self::favorite_list_from_row,
            )
            .map_err(|e| not_found_or(e, || format!("Favorite list {id} not found")))
    }

    fn favorite_lists_by_owner(&self, user_id: &str) -> Result<Vec<FavoriteList>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, name, list, status, created_at
             FROM favorite_lists WHERE user_id = ?1 AND status = 1
             ORDER BY id",
        )?;
        let lists = stmt
            .query_map(params![user_id], Self::favorite_list_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(lists)
    }

    fn write_favorite_list(&self, favorite_list: &FavoriteList) -> Result<()> {
        let rows = self.conn.execute(
            "UPDATE favorite_lists SET name = ?1, list = ?2, status = ?3 WHERE id = ?4",
            params![
                favorite_list.name,
                favorite_list.list,
                favorite_list.status.as_i64(),
                favorite_list.id,
            ],
        )?;
        if rows == 0 {
            return Err(Error::NotFound(format!(
                "Favorite list {} not found",
                favorite_list.id
            )));
        }
        Ok(())
    }
}

impl UserStore for Database {
    fn user_by_id(&self, user_id: &str) -> Result<User> {
        self.conn
            .query_row(
                "SELECT user_id, password_hash, username, weight, protein, fat, carb, favorite_menues, created_at
                 FROM users WHERE user_id = ?1",
                params![user_id],
                Self::user_from_row,
            )
            .map_err(|e| not_found_or(e, || format!("User {user_id} not found")))
    }

    fn write_user(&self, user: &User) -> Result<()> {
        let rows = self.conn.execute(
            "UPDATE users SET password_hash = ?1, username = ?2, weight = ?3, protein = ?4,
                    fat = ?5, carb = ?6, favorite_menues = ?7
             WHERE user_id = ?8",
            params![
                user.password_hash,
                user.username,
                user.weight,
                user.protein,
                user.fat,
                user.carb,
                user.favorite_menues,
                user.user_id,
            ],
        )?;
        if rows == 0 {
            return Err(Error::NotFound(format!("User {} not found", user.user_id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_user(user_id: &str, username: &str) -> User {
        User {
            user_id: user_id.to_string(),
            password_hash: "hash".to_string(),
            username: username.to_string(),
            weight: 70.0,
            protein: 120.0,
            fat: 60.0,
            carb: 120.0,
            favorite_menues: String::new(),
            created_at: Local::now().to_rfc3339(),
        }
    }

    fn sample_menu(name: &str, creator_id: &str) -> NewMenu {
        NewMenu {
            name: name.to_string(),
            protein: 20.0,
            fat: 5.0,
            carb: 0.0,
            creator_id: creator_id.to_string(),
        }
    }

    fn sample_timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 11, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_migration_sets_user_version() {
        let db = Database::open_in_memory().unwrap();
        let version: i64 = db
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .unwrap();
        assert_eq!(version, 1);
    }

    #[test]
    fn test_open_on_disk_reopens_existing_data() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("test.db");
        {
            let db = Database::open(&path).unwrap();
            db.insert_user(&sample_user("gooddy20", "GoodDy")).unwrap();
        }
        let db = Database::open(&path).unwrap();
        assert_eq!(db.user_by_id("gooddy20").unwrap().username, "GoodDy");
    }

    #[test]
    fn test_insert_and_get_user() {
        let db = Database::open_in_memory().unwrap();
        db.insert_user(&sample_user("gooddy20", "GoodDy")).unwrap();

        let user = db.user_by_id("gooddy20").unwrap();
        assert_eq!(user.username, "GoodDy");
        assert_eq!(user.favorite_menues, "");

        let by_name = db.user_by_username("GoodDy").unwrap().unwrap();
        assert_eq!(by_name.user_id, "gooddy20");
        assert!(db.user_by_username("Nobody").unwrap().is_none());
    }

    #[test]
    fn test_user_not_found() {
        let db = Database::open_in_memory().unwrap();
        let err = db.user_by_id("missing1").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_duplicate_user_is_conflict() {
        let db = Database::open_in_memory().unwrap();
        db.insert_user(&sample_user("gooddy20", "GoodDy")).unwrap();

        let same_id = db
            .insert_user(&sample_user("gooddy20", "Other1"))
            .unwrap_err();
        assert!(matches!(same_id, Error::Conflict(_)));
        assert!(!same_id.is_retryable());

        let same_name = db
            .insert_user(&sample_user("other001", "GoodDy"))
            .unwrap_err();
        assert!(matches!(same_name, Error::Conflict(_)));
    }

    #[test]
    fn test_write_user() {
        let db = Database::open_in_memory().unwrap();
        db.insert_user(&sample_user("gooddy20", "GoodDy")).unwrap();

        let mut user = db.user_by_id("gooddy20").unwrap();
        user.favorite_menues = "11,12,14".to_string();
        user.weight = 72.5;
        db.write_user(&user).unwrap();

        let fetched = db.user_by_id("gooddy20").unwrap();
        assert_eq!(fetched.favorite_menues, "11,12,14");
        assert!((fetched.weight - 72.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_write_missing_user_is_not_found() {
        let db = Database::open_in_memory().unwrap();
        let err = db
            .write_user(&sample_user("ghost01", "Ghost1"))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_insert_and_soft_delete_menu() {
        let db = Database::open_in_memory().unwrap();
        let menu = db.insert_menu(&sample_menu("Moo Yang", "gooddy20")).unwrap();
        assert_eq!(menu.name, "Moo Yang");
        assert_eq!(menu.status, Status::Active);

        db.soft_delete_menu(menu.id).unwrap();

        // Deleted menus remain readable by id
        let fetched = db.menu_by_id(menu.id).unwrap();
        assert_eq!(fetched.status, Status::Deleted);
        assert_eq!(fetched.name, "Moo Yang");
    }

    #[test]
    fn test_soft_delete_missing_menu() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.soft_delete_menu(99).unwrap_err().is_not_found());
        assert!(db.menu_by_id(99).unwrap_err().is_not_found());
    }

    #[test]
    fn test_list_menus_with_creator_and_likes() {
        let db = Database::open_in_memory().unwrap();
        db.insert_user(&sample_user("gooddy20", "GoodDy")).unwrap();
        let moo = db.insert_menu(&sample_menu("Moo Yang", "gooddy20")).unwrap();
        let rice = db.insert_menu(&sample_menu("Sticky Rice", "unknown1")).unwrap();

        let mut fan = sample_user("fanfan1", "FanFan");
        fan.favorite_menues = format!("{},{}", moo.id, rice.id);
        db.insert_user(&fan).unwrap();
        let mut other = sample_user("other12", "Other1");
        other.favorite_menues = format!("{}", moo.id);
        db.insert_user(&other).unwrap();

        let menus = db.list_menus().unwrap();
        assert_eq!(menus.len(), 2);
        assert_eq!(menus[0].menu.id, moo.id);
        assert_eq!(menus[0].creator_name.as_deref(), Some("GoodDy"));
        assert_eq!(menus[0].likes, 2);
        assert_eq!(menus[1].creator_name, None);
        assert_eq!(menus[1].likes, 1);
    }

    #[test]
    fn test_likes_do_not_match_id_prefixes() {
        let db = Database::open_in_memory().unwrap();
        let first = db.insert_menu(&sample_menu("First", "gooddy20")).unwrap();
        assert_eq!(first.id, 1);
        let mut fan = sample_user("fanfan1", "FanFan");
        fan.favorite_menues = "11,21".to_string();
        db.insert_user(&fan).unwrap();

        let menus = db.list_menus().unwrap();
        assert_eq!(menus[0].likes, 0);
    }

    #[test]
    fn test_menus_by_ids() {
        let db = Database::open_in_memory().unwrap();
        let a = db.insert_menu(&sample_menu("A", "gooddy20")).unwrap();
        let b = db.insert_menu(&sample_menu("B", "gooddy20")).unwrap();

        let found = db.menus_by_ids(&[a.id, b.id, 404]).unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[&a.id].name, "A");
        assert!(!found.contains_key(&404));
        assert!(db.menus_by_ids(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_favorite_lists_by_owner_excludes_deleted() {
        let db = Database::open_in_memory().unwrap();
        let first = db
            .insert_favorite_list(&NewFavoriteList {
                user_id: "gooddy20".to_string(),
                name: "Daily Breakfast".to_string(),
                list: "9,9,10".to_string(),
            })
            .unwrap();
        let second = db
            .insert_favorite_list(&NewFavoriteList {
                user_id: "gooddy20".to_string(),
                name: "Lunch".to_string(),
                list: "1,1".to_string(),
            })
            .unwrap();
        db.insert_favorite_list(&NewFavoriteList {
            user_id: "someone".to_string(),
            name: "Other".to_string(),
            list: "3".to_string(),
        })
        .unwrap();

        let mut deleted = second.clone();
        deleted.status = Status::Deleted;
        db.write_favorite_list(&deleted).unwrap();

        let lists = db.favorite_lists_by_owner("gooddy20").unwrap();
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].id, first.id);
        assert!(db.favorite_list_by_id(second.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_write_favorite_list() {
        let db = Database::open_in_memory().unwrap();
        let mut list = db
            .insert_favorite_list(&NewFavoriteList {
                user_id: "gooddy20".to_string(),
                name: "Daily Breakfast".to_string(),
                list: "9,9,10".to_string(),
            })
            .unwrap();
        list.list = "10,11,11".to_string();
        list.name = "Breakfast V2".to_string();
        db.write_favorite_list(&list).unwrap();

        let fetched = db.favorite_list_by_id(list.id).unwrap();
        assert_eq!(fetched.list, "10,11,11");
        assert_eq!(fetched.name, "Breakfast V2");
    }

    #[test]
    fn test_insert_and_get_record() {
        let db = Database::open_in_memory().unwrap();
        let record = db
            .insert_record(&NewRecord {
                user_id: "gooddy20".to_string(),
                list: "9,9,10".to_string(),
                note: "Breakfast".to_string(),
                weight: 63.0,
                event_timestamp: sample_timestamp(),
            })
            .unwrap();
        assert_eq!(record.event_timestamp, sample_timestamp());
        assert_eq!(record.note, "Breakfast");

        let fetched = db.record_by_id(record.id).unwrap();
        assert_eq!(fetched.list, "9,9,10");
        assert_eq!(fetched.status, Status::Active);
    }

    #[test]
    fn test_records_by_owner_newest_first_and_excludes_deleted() {
        let db = Database::open_in_memory().unwrap();
        let early = db
            .insert_record(&NewRecord {
                user_id: "gooddy20".to_string(),
                list: "9".to_string(),
                note: String::new(),
                weight: 0.0,
                event_timestamp: sample_timestamp(),
            })
            .unwrap();
        let late = db
            .insert_record(&NewRecord {
                user_id: "gooddy20".to_string(),
                list: "10".to_string(),
                note: String::new(),
                weight: 0.0,
                event_timestamp: sample_timestamp() + chrono::Duration::hours(3),
            })
            .unwrap();

        let records = db.records_by_owner("gooddy20").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, late.id);

        let mut deleted = early.clone();
        deleted.status = Status::Deleted;
        db.write_record(&deleted).unwrap();

        let records = db.records_by_owner("gooddy20").unwrap();
        assert_eq!(records.len(), 1);
        assert!(db.record_by_id(early.id).unwrap_err().is_not_found());
    }
}
