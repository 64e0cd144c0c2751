//! Хранение значений и их сохранение на диск.
//!
//! - `store`: упорядоченная карта ключ → [`TypedValue`](crate::TypedValue).
//! - `source`: куда пишутся байты (файл или память).
//! - `compression`: gzip-обёртки потоков.
//! - `gateway`: сохранение и загрузка хранилища с политиками отказов.
//! - `plugin_data`: фасад, который держит сущность.

pub mod compression;
pub mod gateway;
pub mod plugin_data;
pub mod source;
pub mod store;

pub use gateway::*;
pub use plugin_data::*;
pub use source::*;
pub use store::*;
