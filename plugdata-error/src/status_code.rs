use std::fmt;

use num_enum::TryFromPrimitive;

/// Коды статуса для категоризации ошибок хранилища.
///
/// # Диапазоны:
/// - 0xxx: Успех
/// - 1xxx: Общие ошибки
/// - 2xxx: Ошибки данных (ключи, типы)
/// - 5xxx: Хранилище и сериализация
/// - 6xxx: IO
/// - 8xxx: Формат (кодирование/декодирование)
///
/// `num_enum::TryFromPrimitive` даёт нативную реализацию `TryFrom<u32>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u32)]
#[non_exhaustive]
pub enum StatusCode {
    // === 0xxx: Успех ===
    Success = 0,

    // === 1xxx: Общие ошибки ===
    Internal = 1003,

    // === 2xxx: Ошибки данных ===
    NotFound = 2000,
    TypeError = 2002,

    // === 5xxx: Хранилище ===
    CorruptedData = 5002,
    UnregisteredType = 5008,

    // === 6xxx: IO ===
    Io = 6000,
    UnexpectedEof = 6007,

    // === 8xxx: Формат ===
    SizeLimit = 8007,
    EncodingError = 8010,
}

/// Уровень, на котором стоит логировать ошибку с данным кодом.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl StatusCode {
    /// Числовое представление кода статуса.
    pub const fn code(self) -> u32 {
        self as u32
    }

    /// Рекомендуемый уровень логирования для данного кода.
    pub fn log_level(&self) -> LogLevel {
        match self {
            Self::Success => LogLevel::Trace,
            Self::NotFound => LogLevel::Debug,
            Self::TypeError => LogLevel::Info,
            Self::Internal
            | Self::CorruptedData
            | Self::Io
            | Self::UnexpectedEof
            | Self::SizeLimit => LogLevel::Error,
            Self::UnregisteredType | Self::EncodingError => LogLevel::Warn,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для StatusCode
////////////////////////////////////////////////////////////////////////////////

impl From<StatusCode> for u32 {
    fn from(c: StatusCode) -> Self {
        c.code()
    }
}

impl fmt::Display for StatusCode {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{:?} ({})", self, self.code())
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_from_u32() {
        let n = StatusCode::NotFound.code();
        assert_eq!(StatusCode::try_from(n).unwrap(), StatusCode::NotFound);
        assert!(StatusCode::try_from(99999).is_err());
    }

    #[test]
    fn test_code_and_into() {
        let c = StatusCode::UnregisteredType;
        assert_eq!(c.code(), 5008);
        let n: u32 = c.into();
        assert_eq!(n, 5008);
    }

    #[test]
    fn test_log_level_mappings() {
        assert_eq!(StatusCode::Success.log_level(), LogLevel::Trace);
        assert_eq!(StatusCode::NotFound.log_level(), LogLevel::Debug);
        assert_eq!(StatusCode::CorruptedData.log_level(), LogLevel::Error);
        assert_eq!(StatusCode::Io.log_level(), LogLevel::Error);
        assert_eq!(StatusCode::UnregisteredType.log_level(), LogLevel::Warn);
        assert_eq!(StatusCode::EncodingError.log_level(), LogLevel::Warn);
    }

    /// Тест проверяет формат `Display` — строка должна содержать имя варианта и
    /// числовой код.
    #[test]
    fn test_display_contains_name_and_code() {
        let s = format!("{}", StatusCode::NotFound);
        assert!(s.contains("2000"), "Display must contain code 2000, got: {s}");
        assert!(s.contains("NotFound"), "Display must contain 'NotFound', got: {s}");
    }
}
