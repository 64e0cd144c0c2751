//! Чтение значений из бинарного формата.
//!
//! Любая ошибка прерывает чтение всего хранилища: частично прочитанные
//! записи вызывающему не возвращаются.

use std::io::Read;

use byteorder::{BigEndian, ReadBytesExt};
use plugdata_error::{DataError, DataResult};
use tracing::warn;

use super::{read_utf, BinaryCodec, TypeTag};
use crate::TypedValue;

impl BinaryCodec {
    /// Читает одну запись: ключ, тег и payload.
    pub fn read_record<R: Read + ?Sized>(
        &mut self,
        r: &mut R,
    ) -> DataResult<(String, TypedValue)> {
        let key = read_utf(r)?;
        let value = self
            .read_payload(r, &key)
            .map_err(|e| e.with_key(key.as_str()))?;
        Ok((key, value))
    }

    /// Читает заголовок и ровно `record_count` записей.
    ///
    /// Записи возвращаются в порядке файла; при повторяющемся ключе
    /// побеждает последняя запись.
    pub fn read_store<R: Read + ?Sized>(
        &mut self,
        r: &mut R,
    ) -> DataResult<Vec<(String, TypedValue)>> {
        let count = r.read_i32::<BigEndian>()?;
        let count = usize::try_from(count)
            .map_err(|_| DataError::corrupt(format!("negative record count {count}")))?;
        if count > self.limits.max_records {
            return Err(DataError::SizeLimit {
                what: "record count".to_string(),
                size: count as u64,
                limit: self.limits.max_records as u64,
            });
        }

        let mut records = Vec::with_capacity(count.min(1024));
        for _ in 0..count {
            records.push(self.read_record(r)?);
        }
        Ok(records)
    }

    fn read_payload<R: Read + ?Sized>(
        &mut self,
        r: &mut R,
        key: &str,
    ) -> DataResult<TypedValue> {
        let tag = TypeTag::try_from(r.read_u8()?)?;
        let value = match tag {
            TypeTag::Bool => TypedValue::Bool(r.read_u8()? != 0),
            TypeTag::Int => TypedValue::Int(r.read_i32::<BigEndian>()?),
            TypeTag::Long => TypedValue::Long(r.read_i64::<BigEndian>()?),
            TypeTag::Float => TypedValue::Float(r.read_f32::<BigEndian>()?),
            TypeTag::Str => TypedValue::Str(read_utf(r)?),
            TypeTag::Extension => self.read_extension(r, key)?,
        };
        Ok(value)
    }

    fn read_extension<R: Read + ?Sized>(
        &mut self,
        r: &mut R,
        key: &str,
    ) -> DataResult<TypedValue> {
        let name = read_utf(r)?;
        let entry = self
            .registry
            .lookup(&name)
            .ok_or_else(|| DataError::UnregisteredType {
                type_name: name.clone(),
                key: None,
            })?;

        let len = r.read_i32::<BigEndian>()?;
        let len = usize::try_from(len)
            .map_err(|_| DataError::corrupt(format!("negative payload length {len}")))?;
        if len > self.limits.max_payload_len {
            return Err(DataError::SizeLimit {
                what: format!("payload of '{key}'"),
                size: len as u64,
                limit: self.limits.max_payload_len as u64,
            });
        }

        self.decode_buf.clear();
        let read = Read::take(&mut *r, len as u64).read_to_end(&mut self.decode_buf)?;
        if read != len {
            return Err(DataError::corrupt(format!(
                "truncated payload: expected {len} bytes, got {read}"
            )));
        }

        let mut payload = self.decode_buf.as_slice();
        let value = entry.decode(&mut payload).map_err(|e| {
            DataError::corrupt(format!("decoder '{name}' failed: {e}"))
        })?;
        if !payload.is_empty() {
            warn!(
                key = %key,
                type_name = %name,
                trailing = payload.len(),
                "Extension decoder left unread bytes"
            );
        }
        Ok(TypedValue::Extension(value))
    }
}
