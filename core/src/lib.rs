pub mod db;
pub mod error;
pub mod favorites;
pub mod id_list;
pub mod models;
pub mod nutrition;
pub mod recovery;
pub mod service;
pub mod store;
pub mod users;

pub use error::{Error, Result};
