//! Запись значений в бинарный формат.

use std::io::Write;

use byteorder::{BigEndian, WriteBytesExt};
use plugdata_error::{DataError, DataResult};

use super::{write_utf, BinaryCodec, MAX_UTF_LEN, TAG_EXTENSION};
use crate::{registry::TypeEntry, TypedValue};

impl BinaryCodec {
    /// Проверяет, что для каждого extension-значения есть сериализатор.
    ///
    /// Вызывается до открытия файла, чтобы незарегистрированный тип не
    /// затрагивал уже сохранённые данные.
    pub fn check_encodable<'a, I>(
        &self,
        entries: I,
    ) -> DataResult<()>
    where
        I: IntoIterator<Item = (&'a String, &'a TypedValue)>,
    {
        for (key, value) in entries {
            if let TypedValue::Extension(ext) = value {
                if self.registry.lookup_type(ext.type_id()).is_none() {
                    return Err(DataError::UnregisteredType {
                        type_name: ext.rust_name().to_string(),
                        key: Some(key.clone()),
                    });
                }
            }
        }
        Ok(())
    }

    /// Пишет одну запись: ключ, тег и payload.
    ///
    /// Extension-значение сначала кодируется в буфер, поэтому ошибка
    /// сериализатора не оставляет в `w` начатую запись.
    pub fn write_record<W: Write + ?Sized>(
        &mut self,
        w: &mut W,
        key: &str,
        value: &TypedValue,
    ) -> DataResult<()> {
        check_utf_len("key", key, key)?;

        match value {
            TypedValue::Bool(b) => {
                write_utf(w, key)?;
                w.write_u8(value.tag().as_u8())?;
                w.write_u8(u8::from(*b))?;
            }
            TypedValue::Int(i) => {
                write_utf(w, key)?;
                w.write_u8(value.tag().as_u8())?;
                w.write_i32::<BigEndian>(*i)?;
            }
            TypedValue::Long(l) => {
                write_utf(w, key)?;
                w.write_u8(value.tag().as_u8())?;
                w.write_i64::<BigEndian>(*l)?;
            }
            TypedValue::Float(f) => {
                write_utf(w, key)?;
                w.write_u8(value.tag().as_u8())?;
                w.write_f32::<BigEndian>(*f)?;
            }
            TypedValue::Str(s) => {
                check_utf_len("string value", s, key)?;
                write_utf(w, key)?;
                w.write_u8(value.tag().as_u8())?;
                write_utf(w, s)?;
            }
            TypedValue::Extension(ext) => {
                let entry = self.registry.lookup_type(ext.type_id()).ok_or_else(|| {
                    DataError::UnregisteredType {
                        type_name: ext.rust_name().to_string(),
                        key: Some(key.to_string()),
                    }
                })?;
                check_utf_len("type name", entry.name(), key)?;

                self.encode_buf.clear();
                entry
                    .encode(ext, &mut self.encode_buf)
                    .map_err(|e| encoder_failed(entry, key, e))?;
                let len = self.checked_payload_len(key)?;

                write_utf(w, key)?;
                w.write_u8(TAG_EXTENSION)?;
                write_utf(w, entry.name())?;
                w.write_i32::<BigEndian>(len)?;
                w.write_all(&self.encode_buf)?;
            }
        }
        Ok(())
    }

    /// Пишет заголовок с количеством записей и все записи по порядку.
    ///
    /// Возвращает количество записанных записей.
    pub fn write_store<'a, W, I>(
        &mut self,
        w: &mut W,
        entries: I,
    ) -> DataResult<usize>
    where
        W: Write + ?Sized,
        I: IntoIterator<Item = (&'a String, &'a TypedValue)>,
        I::IntoIter: ExactSizeIterator,
    {
        let entries = entries.into_iter();
        let count = entries.len();
        let header = i32::try_from(count).map_err(|_| DataError::SizeLimit {
            what: "record count".to_string(),
            size: count as u64,
            limit: i32::MAX as u64,
        })?;
        w.write_i32::<BigEndian>(header)?;

        for (key, value) in entries {
            self.write_record(w, key, value)?;
        }
        Ok(count)
    }

    fn checked_payload_len(
        &self,
        key: &str,
    ) -> DataResult<i32> {
        let size = self.encode_buf.len();
        let limit = self.limits.max_payload_len.min(i32::MAX as usize);
        if size > limit {
            return Err(DataError::SizeLimit {
                what: format!("payload of '{key}'"),
                size: size as u64,
                limit: limit as u64,
            });
        }
        Ok(size as i32)
    }
}

fn check_utf_len(
    what: &str,
    s: &str,
    key: &str,
) -> DataResult<()> {
    if s.len() > MAX_UTF_LEN {
        return Err(DataError::Encoding {
            what: what.to_string(),
            reason: format!("{} bytes exceeds {MAX_UTF_LEN}", s.len()),
            key: Some(key.to_string()),
        });
    }
    Ok(())
}

fn encoder_failed(
    entry: &TypeEntry,
    key: &str,
    err: std::io::Error,
) -> DataError {
    DataError::Encoding {
        what: entry.name().to_string(),
        reason: err.to_string(),
        key: Some(key.to_string()),
    }
}
