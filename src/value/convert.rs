//! Преобразования между Rust-значениями и [`TypedValue`].

use super::{ExtensionData, TypedValue};

/// Rust-тип, который можно прочитать обратно из [`TypedValue`].
///
/// Запись идёт через `Into<TypedValue>`, чтение через
/// [`DataValue::from_value`], который при несовпадении вида вернёт `None`.
pub trait DataValue: Into<TypedValue> + Sized {
    /// Название ожидаемого вида для ошибки несовпадения.
    fn kind() -> &'static str;

    fn from_value(value: &TypedValue) -> Option<Self>;
}

/// Помечает значение как extension-значение.
///
/// ```
/// use plugdata::{Ext, TypedValue};
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Point(i32, i32);
///
/// let v: TypedValue = Ext(Point(1, 2)).into();
/// assert!(v.is_extension());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Ext<T>(pub T);

impl<T> Ext<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

macro_rules! primitive_value {
    ($ty:ty, $variant:ident, $kind:literal) => {
        impl From<$ty> for TypedValue {
            fn from(v: $ty) -> Self {
                TypedValue::$variant(v)
            }
        }

        impl DataValue for $ty {
            fn kind() -> &'static str {
                $kind
            }

            fn from_value(value: &TypedValue) -> Option<Self> {
                match value {
                    TypedValue::$variant(v) => Some(v.clone()),
                    _ => None,
                }
            }
        }
    };
}

primitive_value!(bool, Bool, "bool");
primitive_value!(i32, Int, "i32");
primitive_value!(i64, Long, "i64");
primitive_value!(f32, Float, "f32");
primitive_value!(String, Str, "String");

impl From<&str> for TypedValue {
    fn from(v: &str) -> Self {
        TypedValue::Str(v.to_string())
    }
}

impl<T: ExtensionData> From<Ext<T>> for TypedValue {
    fn from(v: Ext<T>) -> Self {
        TypedValue::extension(v.0)
    }
}

impl<T: ExtensionData> DataValue for Ext<T> {
    fn kind() -> &'static str {
        std::any::type_name::<T>()
    }

    fn from_value(value: &TypedValue) -> Option<Self> {
        value.downcast_ref::<T>().cloned().map(Ext)
    }
}
