//! Бинарный формат хранилища.
//!
//! ## Формат
//!
//! После распаковки gzip файл выглядит так:
//!
//! ```text
//! [record_count: i32 BE]
//! record_count × [key: u16 BE + UTF-8][tag: u8][payload]
//! ```
//!
//! | тег | тип      | payload                                                  |
//! |-----|----------|----------------------------------------------------------|
//! | 0   | bool     | 1 байт                                                   |
//! | 1   | i32      | 4 байта BE                                               |
//! | 2   | i64      | 8 байт BE                                                |
//! | 3   | f32      | 4 байта IEEE-754 BE                                      |
//! | 4   | строка   | u16 BE длина + UTF-8                                     |
//! | 5   | extension| имя типа (u16 + UTF-8) + длина i32 BE + байты            |
//!
//! ## Модули
//!
//! - [`encode`] — запись записей и всего хранилища
//! - [`decode`] — чтение записей и всего хранилища
//! - [`primitives`] — строки с префиксом длины
//! - [`tags`] — константы тегов
//!
//! [`BinaryCodec`] держит два переиспользуемых буфера (для кодирования и для
//! декодирования extension-значений), поэтому все операции требуют
//! `&mut self`: один экземпляр обслуживает один вызов за раз.

pub mod decode;
pub mod encode;
pub mod primitives;
pub mod tags;

pub use primitives::*;
pub use tags::*;

use std::sync::Arc;

use crate::SerializerRegistry;

/// Ограничения, проверяемые до выделения памяти под данные из файла.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecLimits {
    /// Максимальный размер payload одного extension-значения, байт.
    pub max_payload_len: usize,
    /// Максимальное количество записей в хранилище.
    pub max_records: usize,
}

impl Default for CodecLimits {
    fn default() -> Self {
        Self {
            max_payload_len: 16 * 1024 * 1024,
            max_records: 1 << 20,
        }
    }
}

/// Кодек хранилища.
pub struct BinaryCodec {
    registry: Arc<SerializerRegistry>,
    limits: CodecLimits,
    encode_buf: Vec<u8>,
    decode_buf: Vec<u8>,
}

impl BinaryCodec {
    pub fn new(registry: Arc<SerializerRegistry>) -> Self {
        Self::with_limits(registry, CodecLimits::default())
    }

    pub fn with_limits(
        registry: Arc<SerializerRegistry>,
        limits: CodecLimits,
    ) -> Self {
        Self {
            registry,
            limits,
            encode_buf: Vec::new(),
            decode_buf: Vec::new(),
        }
    }

    pub fn registry(&self) -> &Arc<SerializerRegistry> {
        &self.registry
    }

    pub fn limits(&self) -> CodecLimits {
        self.limits
    }
}

impl std::fmt::Debug for BinaryCodec {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("BinaryCodec")
            .field("registry", &self.registry)
            .field("limits", &self.limits)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::{Ext, TypedValue};

    #[allow(clippy::approx_constant)]
    fn sample() -> BTreeMap<String, TypedValue> {
        let mut map = BTreeMap::new();
        map.insert("enabled".to_string(), TypedValue::Bool(true));
        map.insert("score".to_string(), TypedValue::Int(42));
        map.insert("total".to_string(), TypedValue::Long(123_456_789_012));
        map.insert("ratio".to_string(), TypedValue::Float(3.14));
        map.insert("name".to_string(), TypedValue::Str("hello".to_string()));
        map.insert("blob".to_string(), Ext(vec![1u8, 2, 3]).into());
        map
    }

    #[test]
    fn test_store_roundtrip_through_one_codec() {
        let mut codec = BinaryCodec::new(Arc::new(SerializerRegistry::with_defaults()));
        let original = sample();

        let mut buf = Vec::new();
        let written = codec.write_store(&mut buf, &original).unwrap();
        assert_eq!(written, original.len());

        let decoded: BTreeMap<_, _> = codec
            .read_store(&mut buf.as_slice())
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(decoded, original);
    }

    /// Тест проверяет, что буферы переиспользуются между вызовами и не
    /// протекают из одного вызова в другой.
    #[test]
    fn test_scratch_buffers_reset_between_calls() {
        let mut codec = BinaryCodec::new(Arc::new(SerializerRegistry::with_defaults()));

        let mut first = Vec::new();
        codec
            .write_record(&mut first, "a", &Ext(vec![7u8; 100]).into())
            .unwrap();
        let mut second = Vec::new();
        codec
            .write_record(&mut second, "b", &Ext(vec![9u8]).into())
            .unwrap();

        let (_, v1) = codec.read_record(&mut first.as_slice()).unwrap();
        let (_, v2) = codec.read_record(&mut second.as_slice()).unwrap();
        assert_eq!(v1, TypedValue::from(Ext(vec![7u8; 100])));
        assert_eq!(v2, TypedValue::from(Ext(vec![9u8])));
    }

    #[test]
    fn test_default_limits() {
        let codec = BinaryCodec::new(Arc::new(SerializerRegistry::new()));
        assert_eq!(codec.limits(), CodecLimits::default());
        assert_eq!(codec.limits().max_payload_len, 16 * 1024 * 1024);
    }
}
