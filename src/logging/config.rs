use std::path::Path;

use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};

/// Уровни, которые принимает `level`.
const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Настройки логирования.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Уровень для событий библиотеки: `trace`..`error`.
    pub level: String,
    /// Писать события в JSON вместо человекочитаемого формата.
    pub json: bool,
    pub with_target: bool,
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            with_target: true,
            ansi: true,
        }
    }
}

impl LoggingConfig {
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
        if !LEVELS.contains(&self.level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::Message(format!(
                "unknown log level '{}', expected one of {LEVELS:?}",
                self.level
            )));
        }
        Ok(())
    }

    /// Директива `EnvFilter`: уровень для этой библиотеки, `warn` для
    /// остальных.
    pub fn build_filter_directive(&self) -> String {
        format!(
            "warn,{}={}",
            env!("CARGO_PKG_NAME"),
            self.level.to_ascii_lowercase()
        )
    }
}
