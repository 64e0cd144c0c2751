//! Загрузка настроек хранения.

pub mod settings;

pub use settings::StoreConfig;
