use std::{
    any::{Any, TypeId},
    fmt,
    sync::Arc,
};

/// Ограничение для типов, которые могут храниться как extension-значения.
///
/// Реализовано для всех подходящих типов; чтобы значение сохранялось и
/// читалось, для типа всё равно нужен зарегистрированный сериализатор.
pub trait ExtensionData: Any + Clone + PartialEq + fmt::Debug + Send + Sync {}

impl<T> ExtensionData for T where T: Any + Clone + PartialEq + fmt::Debug + Send + Sync {}

/// Extension-значение со стёртым типом.
///
/// Сравнение и `Debug` делегируются конкретному типу через указатели на
/// функции, захваченные в [`ExtensionValue::new`].
#[derive(Clone)]
pub struct ExtensionValue {
    inner: Arc<dyn Any + Send + Sync>,
    type_id: TypeId,
    rust_name: &'static str,
    eq: fn(&dyn Any, &dyn Any) -> bool,
    debug: fn(&dyn Any, &mut fmt::Formatter<'_>) -> fmt::Result,
}

impl ExtensionValue {
    pub fn new<T: ExtensionData>(value: T) -> Self {
        Self {
            inner: Arc::new(value),
            type_id: TypeId::of::<T>(),
            rust_name: std::any::type_name::<T>(),
            eq: eq_as::<T>,
            debug: debug_as::<T>,
        }
    }

    /// `TypeId`, по которому ищется кодировщик.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Имя Rust-типа значения (только для диагностики).
    pub fn rust_name(&self) -> &'static str {
        self.rust_name
    }

    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Значение как `&dyn Any` для зарегистрированного кодировщика.
    pub fn as_any(&self) -> &dyn Any {
        &*self.inner
    }
}

fn eq_as<T: ExtensionData>(
    a: &dyn Any,
    b: &dyn Any,
) -> bool {
    match (a.downcast_ref::<T>(), b.downcast_ref::<T>()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn debug_as<T: ExtensionData>(
    v: &dyn Any,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    match v.downcast_ref::<T>() {
        Some(v) => fmt::Debug::fmt(v, f),
        None => f.write_str("<invalid extension>"),
    }
}

impl PartialEq for ExtensionValue {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.type_id == other.type_id && (self.eq)(self.as_any(), other.as_any())
    }
}

impl fmt::Debug for ExtensionValue {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "Extension<{}>(", self.rust_name)?;
        (self.debug)(self.as_any(), f)?;
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_shows_type_and_value() {
        let v = ExtensionValue::new(vec![1u8, 2]);
        let s = format!("{v:?}");
        assert!(s.starts_with("Extension<") && s.contains("Vec<u8>>"), "got {s}");
        assert!(s.ends_with("[1, 2])"), "got {s}");
    }

    #[test]
    fn test_is_checks_type_identity() {
        let v = ExtensionValue::new(3.5f64);
        assert!(v.is::<f64>());
        assert!(!v.is::<f32>());
        assert_eq!(v.downcast_ref::<f64>(), Some(&3.5));
    }

    #[test]
    fn test_clone_shares_value() {
        let v = ExtensionValue::new(String::from("shared"));
        let c = v.clone();
        assert_eq!(v, c);
        assert_eq!(c.downcast_ref::<String>().map(String::as_str), Some("shared"));
    }
}
