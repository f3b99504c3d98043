pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod service;
pub mod table;

pub use config::AppConfig;
pub use db::create_pool;
pub use error::SyncError;
pub use table::Table;
