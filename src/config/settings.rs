use std::path::{Path, PathBuf};

use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};

use crate::engine::compression;

/// Настройки хранения данных сущностей.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Каталог, в котором лежат файлы сущностей.
    pub data_dir: PathBuf,
    /// Расширение файла без точки.
    pub file_extension: String,
    /// Уровень gzip, 0..=9.
    pub compression_level: u32,
    pub max_payload_len: usize,
    pub max_records: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            file_extension: "dat".to_string(),
            compression_level: compression::DEFAULT_LEVEL,
            max_payload_len: 16 * 1024 * 1024,
            max_records: 1 << 20,
        }
    }
}

impl StoreConfig {
    /// Загружает настройки из файла (формат по расширению). Отсутствующие
    /// поля и отсутствующий файл дают значения по умолчанию.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }
        let cfg: Self = builder.build()?.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.compression_level > compression::MAX_LEVEL {
            return Err(ConfigError::Message(format!(
                "compression_level must be 0..={}, got {}",
                compression::MAX_LEVEL,
                self.compression_level
            )));
        }
        if self.file_extension.contains(['/', '\\']) {
            return Err(ConfigError::Message(format!(
                "file_extension must not contain path separators: {:?}",
                self.file_extension
            )));
        }
        Ok(())
    }

    /// Путь к файлу сущности `name`.
    pub fn file_path(
        &self,
        name: &str,
    ) -> PathBuf {
        let file = if self.file_extension.is_empty() {
            name.to_string()
        } else {
            format!("{name}.{}", self.file_extension.trim_start_matches('.'))
        };
        self.data_dir.join(file)
    }
}
