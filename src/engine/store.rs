use std::collections::{btree_map, BTreeMap};

use plugdata_error::{DataError, DataResult};

use crate::{DataValue, TypedValue};

/// Упорядоченное хранилище значений одной сущности.
///
/// Ключи уникальны и итерируются по возрастанию, поэтому кодек всегда
/// пишет записи в одном и том же порядке.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueStore {
    entries: BTreeMap<String, TypedValue>,
}

impl ValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Записывает значение, возвращая предыдущее.
    pub fn set<V: Into<TypedValue>>(
        &mut self,
        key: impl Into<String>,
        value: V,
    ) -> Option<TypedValue> {
        self.entries.insert(key.into(), value.into())
    }

    /// Читает значение ожидаемого типа.
    ///
    /// Отсутствующий ключ даёт [`DataError::MissingKey`], значение другого
    /// типа даёт [`DataError::TypeMismatch`].
    pub fn get<T: DataValue>(
        &self,
        key: &str,
    ) -> DataResult<T> {
        let value = self.entries.get(key).ok_or_else(|| DataError::MissingKey {
            key: key.to_string(),
        })?;
        typed(key, value)
    }

    /// Как [`get`](Self::get), но при отсутствии ключа сохраняет и
    /// возвращает `default`.
    ///
    /// Значение другого типа не перезаписывается.
    pub fn get_or<T: DataValue + Clone>(
        &mut self,
        key: &str,
        default: T,
    ) -> DataResult<T> {
        match self.entries.get(key) {
            Some(value) => typed(key, value),
            None => {
                self.entries.insert(key.to_string(), default.clone().into());
                Ok(default)
            }
        }
    }

    pub fn get_value(
        &self,
        key: &str,
    ) -> Option<&TypedValue> {
        self.entries.get(key)
    }

    pub fn remove(
        &mut self,
        key: &str,
    ) -> Option<TypedValue> {
        self.entries.remove(key)
    }

    pub fn contains_key(
        &self,
        key: &str,
    ) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, TypedValue> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

fn typed<T: DataValue>(
    key: &str,
    value: &TypedValue,
) -> DataResult<T> {
    T::from_value(value).ok_or_else(|| DataError::TypeMismatch {
        key: key.to_string(),
        expected: T::kind(),
        found: value.kind_name().to_string(),
    })
}

impl Extend<(String, TypedValue)> for ValueStore {
    fn extend<I: IntoIterator<Item = (String, TypedValue)>>(
        &mut self,
        iter: I,
    ) {
        self.entries.extend(iter);
    }
}

impl FromIterator<(String, TypedValue)> for ValueStore {
    fn from_iter<I: IntoIterator<Item = (String, TypedValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ValueStore {
    type Item = (&'a String, &'a TypedValue);
    type IntoIter = btree_map::Iter<'a, String, TypedValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Ext;

    #[test]
    fn test_set_and_get() {
        let mut store = ValueStore::new();
        store.set("enabled", true);
        store.set("score", 42);
        store.set("total", 9_000_000_000i64);
        store.set("ratio", 0.5f32);
        store.set("name", "alice");

        assert!(store.get::<bool>("enabled").unwrap());
        assert_eq!(store.get::<i32>("score").unwrap(), 42);
        assert_eq!(store.get::<i64>("total").unwrap(), 9_000_000_000);
        assert_eq!(store.get::<f32>("ratio").unwrap(), 0.5);
        assert_eq!(store.get::<String>("name").unwrap(), "alice");
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn test_set_overwrites() {
        let mut store = ValueStore::new();
        assert_eq!(store.set("k", 1), None);
        assert_eq!(store.set("k", "now a string"), Some(TypedValue::Int(1)));
        assert_eq!(store.get::<String>("k").unwrap(), "now a string");
    }

    #[test]
    fn test_missing_key() {
        let store = ValueStore::new();
        let err = store.get::<i32>("nope").unwrap_err();
        assert!(matches!(err, DataError::MissingKey { ref key } if key == "nope"));
    }

    /// Тест проверяет, что запрос значения не того типа даёт
    /// детерминированную ошибку `TypeMismatch`.
    #[test]
    fn test_type_mismatch() {
        let mut store = ValueStore::new();
        store.set("n", 7);
        let err = store.get::<String>("n").unwrap_err();
        match err {
            DataError::TypeMismatch {
                key,
                expected,
                found,
            } => {
                assert_eq!(key, "n");
                assert_eq!(expected, "String");
                assert_eq!(found, "i32");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        // i32 и i64 — разные типы.
        assert!(store.get::<i64>("n").is_err());
    }

    #[test]
    fn test_get_or_inserts_default() {
        let mut store = ValueStore::new();
        assert_eq!(store.get_or("level", 3).unwrap(), 3);
        assert!(store.contains_key("level"));
        // Второй вызов возвращает сохранённое значение, а не новый default.
        assert_eq!(store.get_or("level", 99).unwrap(), 3);
    }

    #[test]
    fn test_get_or_keeps_mismatched_value() {
        let mut store = ValueStore::new();
        store.set("k", true);
        assert!(store.get_or("k", 5).is_err());
        assert_eq!(store.get_value("k"), Some(&TypedValue::Bool(true)));
    }

    #[test]
    fn test_extension_values() {
        #[derive(Debug, Clone, PartialEq)]
        struct Point(i32, i32);

        let mut store = ValueStore::new();
        store.set("pos", Ext(Point(1, 2)));
        assert_eq!(store.get::<Ext<Point>>("pos").unwrap().0, Point(1, 2));
        assert!(store.get::<Ext<String>>("pos").is_err());
        assert!(store.get::<i32>("pos").is_err());
    }

    #[test]
    fn test_keys_sorted_and_collection_ops() {
        let mut store: ValueStore = vec![
            ("b".to_string(), TypedValue::Int(2)),
            ("a".to_string(), TypedValue::Int(1)),
        ]
        .into_iter()
        .collect();
        store.extend([("c".to_string(), TypedValue::Int(3))]);

        assert_eq!(store.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(store.remove("b"), Some(TypedValue::Int(2)));
        assert_eq!((&store).into_iter().count(), 2);

        store.clear();
        assert!(store.is_empty());
    }
}
