//! Теги типов бинарного формата.
//!
//! Каждая запись после ключа помечается однобайтовым тегом.
//! Используется в модулях `decode` и `encode`.

use plugdata_error::DataError;

/// Логическое значение (1 байт)
pub const TAG_BOOL: u8 = 0x00;
/// Целое число (i32 BE)
pub const TAG_INT: u8 = 0x01;
/// Длинное целое (i64 BE)
pub const TAG_LONG: u8 = 0x02;
/// Число с плавающей точкой (f32 BE)
pub const TAG_FLOAT: u8 = 0x03;
/// Строка (u16 BE длина + UTF-8)
pub const TAG_STR: u8 = 0x04;
/// Extension-тип: имя + длина i32 BE + байты сериализатора
pub const TAG_EXTENSION: u8 = 0x05;

/// Все допустимые теги, по возрастанию.
pub const VALID_TAGS: [u8; 6] = [TAG_BOOL, TAG_INT, TAG_LONG, TAG_FLOAT, TAG_STR, TAG_EXTENSION];

/// Тег записи в виде перечисления.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag {
    Bool = TAG_BOOL,
    Int = TAG_INT,
    Long = TAG_LONG,
    Float = TAG_FLOAT,
    Str = TAG_STR,
    Extension = TAG_EXTENSION,
}

impl TypeTag {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for TypeTag {
    type Error = DataError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            TAG_BOOL => Ok(TypeTag::Bool),
            TAG_INT => Ok(TypeTag::Int),
            TAG_LONG => Ok(TypeTag::Long),
            TAG_FLOAT => Ok(TypeTag::Float),
            TAG_STR => Ok(TypeTag::Str),
            TAG_EXTENSION => Ok(TypeTag::Extension),
            other => Err(DataError::corrupt(format!(
                "Unknown tag 0x{other:02X} (valid: {VALID_TAGS:?})"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_from_valid_tags() {
        for tag in VALID_TAGS {
            assert_eq!(TypeTag::try_from(tag).unwrap().as_u8(), tag);
        }
    }

    #[test]
    fn test_try_from_unknown_tag() {
        let err = TypeTag::try_from(0x06).unwrap_err();
        assert!(matches!(err, DataError::CorruptStream { .. }));
        assert!(err.to_string().contains("0x06"));
    }
}
