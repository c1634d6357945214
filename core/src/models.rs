use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Format accepted for a record's `event_timestamp`.
pub const EVENT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Soft-delete marker. Rows are never physically removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Active,
    Deleted,
}

impl Status {
    #[must_use]
    pub fn as_i64(self) -> i64 {
        match self {
            Self::Active => 1,
            Self::Deleted => 0,
        }
    }

    #[must_use]
    pub fn from_i64(value: i64) -> Self {
        if value == 0 {
            Self::Deleted
        } else {
            Self::Active
        }
    }
}

// --- Menu catalog ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Menu {
    pub id: i64,
    pub name: String,
    pub protein: f64,
    pub fat: f64,
    pub carb: f64,
    pub creator_id: String,
    pub status: Status,
    pub created_at: String,
}

/// Catalog listing row: the menu plus who created it and how many users like it.
#[derive(Debug, Clone, Serialize)]
pub struct MenuDetail {
    #[serde(flatten)]
    pub menu: Menu,
    pub creator_name: Option<String>,
    pub likes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewMenu {
    pub name: String,
    pub protein: f64,
    pub fat: f64,
    pub carb: f64,
    pub creator_id: String,
}

/// A menu update produces a new catalog row; `None` keeps the old value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMenu {
    pub name: Option<String>,
    pub protein: Option<f64>,
    pub fat: Option<f64>,
    pub carb: Option<f64>,
}

// --- Users ---

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub user_id: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub username: String,
    pub weight: f64,
    pub protein: f64,
    pub fat: f64,
    pub carb: f64,
    /// Encoded id list of liked menus.
    pub favorite_menues: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub user_id: String,
    pub password: String,
    pub username: String,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default)]
    pub carb: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    pub password: Option<String>,
    pub username: Option<String>,
    pub weight: Option<f64>,
    pub protein: Option<f64>,
    pub fat: Option<f64>,
    pub carb: Option<f64>,
    /// `Some("")` clears the favorites.
    pub favorite_menues: Option<String>,
}

impl UpdateUser {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.password.is_none()
            && self.username.is_none()
            && self.weight.is_none()
            && self.protein.is_none()
            && self.fat.is_none()
            && self.carb.is_none()
            && self.favorite_menues.is_none()
    }
}

// --- Favorite lists ---

#[derive(Debug, Clone, Serialize)]
pub struct FavoriteList {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    /// Encoded id list; repetition is quantity.
    pub list: String,
    pub status: Status,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewFavoriteList {
    pub user_id: String,
    pub name: String,
    pub list: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateFavoriteList {
    pub name: Option<String>,
    pub list: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FavoriteListDetail {
    #[serde(flatten)]
    pub favorite_list: FavoriteList,
    #[serde(flatten)]
    pub nutrition: NutritionSummary,
}

// --- Records ---

#[derive(Debug, Clone, Serialize)]
pub struct Record {
    pub id: i64,
    pub user_id: String,
    pub list: String,
    pub note: String,
    pub weight: f64,
    pub event_timestamp: NaiveDateTime,
    pub status: Status,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct NewRecord {
    pub user_id: String,
    pub list: String,
    pub note: String,
    pub weight: f64,
    pub event_timestamp: NaiveDateTime,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateRecord {
    pub list: Option<String>,
    pub note: Option<String>,
    pub weight: Option<f64>,
    pub event_timestamp: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordDetail {
    #[serde(flatten)]
    pub record: Record,
    #[serde(flatten)]
    pub nutrition: NutritionSummary,
}

// --- Aggregation ---

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NutritionSummary {
    /// e.g. `"Moo Yang-2, Sticky Rice-1"`
    pub menues: String,
    pub protein: f64,
    pub fat: f64,
    pub carb: f64,
    /// False when at least one referenced menu has been deleted.
    pub is_updated: bool,
}

// --- Validation ---

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

pub fn validate_user_id(user_id: &str) -> Result<()> {
    if user_id.chars().count() < 6 || !user_id.chars().all(is_word_char) {
        return Err(Error::Validation(
            "User Id must be at least 6 characters of letters, digits or '_'".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_username(username: &str) -> Result<()> {
    if username.chars().count() < 6 || !username.chars().all(is_word_char) {
        return Err(Error::Validation(
            "Username must be at least 6 characters of letters, digits or '_'".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < 6 || password.chars().any(char::is_whitespace) {
        return Err(Error::Validation(
            "Password must be at least 6 characters with no whitespace".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_name(field: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Macro values are grams: finite and not negative.
pub fn validate_macros(protein: f64, fat: f64, carb: f64) -> Result<()> {
    for (label, value) in [("protein", protein), ("fat", fat), ("carb", carb)] {
        if value < 0.0 || !value.is_finite() {
            return Err(Error::Validation(format!(
                "{label} must be a finite, non-negative number"
            )));
        }
    }
    Ok(())
}

pub fn parse_event_timestamp(s: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, EVENT_TIMESTAMP_FORMAT).map_err(|_| {
        Error::Validation(format!(
            "Invalid event_timestamp '{s}'. Use YYYY-MM-DD HH:MM:SS"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_db_value() {
        assert_eq!(Status::from_i64(Status::Active.as_i64()), Status::Active);
        assert_eq!(Status::from_i64(Status::Deleted.as_i64()), Status::Deleted);
        assert_eq!(Status::from_i64(7), Status::Active);
    }

    #[test]
    fn test_validate_user_id() {
        assert!(validate_user_id("gooddy20").is_ok());
        assert!(validate_user_id("good_dy").is_ok());
        assert!(validate_user_id("good").is_err());
        assert!(validate_user_id("good dy20").is_err());
        assert!(validate_user_id("gööddy20").is_err());
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("GoodDy").is_ok());
        assert!(validate_username("Good").is_err());
        assert!(validate_username("Good-Dy").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("zxc123zxc123").is_ok());
        assert!(validate_password("p@ss-w0rd!").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password("has space").is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("name", "Daily Breakfast").is_ok());
        assert!(validate_name("name", "   ").is_err());
    }

    #[test]
    fn test_validate_macros() {
        assert!(validate_macros(19.0, 0.5, 0.0).is_ok());
        assert!(validate_macros(-1.0, 0.5, 0.0).is_err());
        assert!(validate_macros(1.0, 0.5, f64::NAN).is_err());
        let err = validate_macros(f64::INFINITY, 0.5, 0.0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: protein must be a finite, non-negative number"
        );
    }

    #[test]
    fn test_parse_event_timestamp() {
        let ts = parse_event_timestamp("2023-11-01 09:30:00").unwrap();
        assert_eq!(ts.format(EVENT_TIMESTAMP_FORMAT).to_string(), "2023-11-01 09:30:00");
        assert!(matches!(
            parse_event_timestamp("2023-11-01T09:30:00"),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_update_user_is_empty() {
        assert!(UpdateUser::default().is_empty());
        let update = UpdateUser {
            favorite_menues: Some(String::new()),
            ..UpdateUser::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn test_user_serialization_hides_password_hash() {
        let user = User {
            user_id: "gooddy20".to_string(),
            password_hash: "secret".to_string(),
            username: "GoodDy".to_string(),
            weight: 70.0,
            protein: 120.0,
            fat: 60.0,
            carb: 120.0,
            favorite_menues: "9,10".to_string(),
            created_at: String::new(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["favorite_menues"], "9,10");
    }
}
