//! Значения, которые лежат в хранилище.
//!
//! [`TypedValue`] перечисляет виды, которые кодек пишет сам, плюс вариант
//! [`Extension`](TypedValue::Extension) для любого другого типа с
//! сериализатором в [`SerializerRegistry`](crate::SerializerRegistry).

pub mod convert;
pub mod extension;

pub use convert::*;
pub use extension::*;

use crate::codec::TypeTag;

/// Одно значение хранилища вместе с его типом.
///
/// Значения неизменяемы: обновление заменяет `TypedValue` целиком.
#[derive(Clone, Debug, PartialEq)]
pub enum TypedValue {
    /// Логический флаг.
    Bool(bool),
    /// Знаковое 32-битное целое.
    Int(i32),
    /// Знаковое 64-битное целое.
    Long(i64),
    /// 32-битное число IEEE-754.
    Float(f32),
    /// Строка UTF-8.
    Str(String),
    /// Значение типа, о котором кодек сам не знает.
    Extension(ExtensionValue),
}

impl TypedValue {
    /// Оборачивает произвольное значение в extension-значение.
    pub fn extension<T: ExtensionData>(value: T) -> Self {
        TypedValue::Extension(ExtensionValue::new(value))
    }

    /// Тег, с которым значение пишется в поток.
    pub fn tag(&self) -> TypeTag {
        match self {
            TypedValue::Bool(_) => TypeTag::Bool,
            TypedValue::Int(_) => TypeTag::Int,
            TypedValue::Long(_) => TypeTag::Long,
            TypedValue::Float(_) => TypeTag::Float,
            TypedValue::Str(_) => TypeTag::Str,
            TypedValue::Extension(_) => TypeTag::Extension,
        }
    }

    /// Название вида для сообщений об ошибках.
    ///
    /// Для extension-значений это имя Rust-типа, а не каноническое имя, под
    /// которым тип сохраняется.
    pub fn kind_name(&self) -> &'static str {
        match self {
            TypedValue::Bool(_) => "bool",
            TypedValue::Int(_) => "i32",
            TypedValue::Long(_) => "i64",
            TypedValue::Float(_) => "f32",
            TypedValue::Str(_) => "String",
            TypedValue::Extension(ext) => ext.rust_name(),
        }
    }

    pub fn is_extension(&self) -> bool {
        matches!(self, TypedValue::Extension(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TypedValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            TypedValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            TypedValue::Long(l) => Some(*l),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            TypedValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Ссылка на значение внутри extension, если это `T`.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        match self {
            TypedValue::Extension(ext) => ext.downcast_ref::<T>(),
            _ => None,
        }
    }
}
