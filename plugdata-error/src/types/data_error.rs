use std::{any::Any, io};

use thiserror::Error;

use crate::{ErrorExt, LogLevel, StatusCode};

/// Ошибка хранилища значений и его бинарного формата.
#[derive(Debug, Error)]
pub enum DataError {
    /// Ключ отсутствует, а значение по умолчанию не передано.
    #[error("Key not found: {key}")]
    MissingKey { key: String },

    /// Значение есть, но другого типа.
    #[error("Type mismatch for key {key}: expected {expected}, found {found}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: String,
    },

    /// Для extension-типа не зарегистрирован сериализатор.
    #[error("Type {type_name} does not have a serializer registered{}", key_suffix(.key))]
    UnregisteredType {
        type_name: String,
        key: Option<String>,
    },

    /// Неизвестный тег, обрезанный поток, ошибка распаковки и т.п.
    #[error("Corrupt stream: {reason}{}", key_suffix(.key))]
    CorruptStream { reason: String, key: Option<String> },

    /// Превышен лимит размера.
    #[error("{what} size {size} exceeds limit {limit}")]
    SizeLimit { what: String, size: u64, limit: u64 },

    /// Значение невозможно закодировать.
    #[error("Encoding error for {what}: {reason}{}", key_suffix(.key))]
    Encoding {
        what: String,
        reason: String,
        key: Option<String>,
    },

    /// Ошибка нижележащего потока.
    #[error("I/O error: {0}")]
    Io(#[source] io::Error),
}

fn key_suffix(key: &Option<String>) -> String {
    match key {
        Some(k) => format!(" [key: {k}]"),
        None => String::new(),
    }
}

impl DataError {
    /// Сокращение для `CorruptStream` без ключа.
    pub fn corrupt(reason: impl Into<String>) -> Self {
        Self::CorruptStream {
            reason: reason.into(),
            key: None,
        }
    }

    /// Добавляет контекст ключа к ошибке.
    pub fn with_key(
        mut self,
        key: impl Into<String>,
    ) -> Self {
        match &mut self {
            Self::UnregisteredType { key: k, .. }
            | Self::CorruptStream { key: k, .. }
            | Self::Encoding { key: k, .. } => {
                *k = Some(key.into());
            }
            _ => {}
        }
        self
    }

    /// Ключ записи, на которой произошла ошибка (если известен).
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::MissingKey { key } | Self::TypeMismatch { key, .. } => Some(key.as_str()),
            Self::UnregisteredType { key, .. }
            | Self::CorruptStream { key, .. }
            | Self::Encoding { key, .. } => key.as_deref(),
            _ => None,
        }
    }

    /// Уровень логирования по статус-коду ошибки.
    pub fn log_level(&self) -> LogLevel {
        self.status_code().log_level()
    }

    /// Можно ли продолжить работу с хранилищем после ошибки без потери
    /// данных.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::MissingKey { .. } | Self::TypeMismatch { .. } | Self::UnregisteredType { .. }
        )
    }
}

impl ErrorExt for DataError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingKey { .. } => StatusCode::NotFound,
            Self::TypeMismatch { .. } => StatusCode::TypeError,
            Self::UnregisteredType { .. } => StatusCode::UnregisteredType,
            Self::CorruptStream { .. } => StatusCode::CorruptedData,
            Self::SizeLimit { .. } => StatusCode::SizeLimit,
            Self::Encoding { .. } => StatusCode::EncodingError,
            Self::Io(e) if e.kind() == io::ErrorKind::UnexpectedEof => StatusCode::UnexpectedEof,
            Self::Io(_) => StatusCode::Io,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn client_message(&self) -> String {
        match self {
            Self::CorruptStream { .. } => "Data file is corrupted".to_string(),
            Self::Io(_) => "Data file is unavailable".to_string(),
            _ => self.to_string(),
        }
    }

    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        let mut tags = vec![
            ("error_type", self.type_name()),
            ("status_code", self.status_code().to_string()),
            ("recoverable", self.is_recoverable().to_string()),
        ];
        if let Self::UnregisteredType { type_name, .. } = self {
            tags.push(("type_name", type_name.clone()));
        }
        tags
    }
}

/// `UnexpectedEof` и `InvalidData` от читателя или gzip-декодера означают
/// повреждённый поток; остальное остаётся ошибкой ввода-вывода.
impl From<io::Error> for DataError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::UnexpectedEof => DataError::corrupt(format!("truncated input: {e}")),
            io::ErrorKind::InvalidData | io::ErrorKind::InvalidInput => {
                DataError::corrupt(e.to_string())
            }
            _ => DataError::Io(e),
        }
    }
}

impl From<DataError> for io::Error {
    fn from(e: DataError) -> Self {
        match e {
            DataError::Io(inner) => inner,
            other => {
                let kind = match &other {
                    DataError::CorruptStream { .. } => io::ErrorKind::InvalidData,
                    DataError::SizeLimit { .. } => io::ErrorKind::InvalidInput,
                    DataError::MissingKey { .. } => io::ErrorKind::NotFound,
                    _ => io::ErrorKind::Other,
                };
                io::Error::new(kind, other.to_string())
            }
        }
    }
}
