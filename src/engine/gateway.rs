//! Сохранение и загрузка [`ValueStore`] через сжатый поток.
//!
//! Политики отказов:
//! - незарегистрированный extension-тип обнаруживается до открытия
//!   потока, поэтому уже сохранённый файл не затрагивается;
//! - любая другая ошибка после открытия потока удаляет источник;
//! - ошибка чтения не меняет хранилище: записи сначала собираются во
//!   временную карту и переносятся только после успешного разбора.

use std::{collections::BTreeMap, io, sync::Arc};

use plugdata_error::{DataError, DataResult, ErrorExt, LogLevel};
use tracing::{debug, error, info, trace, warn};

use super::{compression, ByteSource, ValueStore};
use crate::{BinaryCodec, CodecLimits, SerializerRegistry, TypedValue};

/// Событие об ошибке на уровне, который задаёт её статус-код.
macro_rules! log_failure {
    ($err:expr, $($arg:tt)+) => {
        match $err.log_level() {
            LogLevel::Trace => trace!($($arg)+),
            LogLevel::Debug => debug!($($arg)+),
            LogLevel::Info => info!($($arg)+),
            LogLevel::Warn => warn!($($arg)+),
            LogLevel::Error => error!($($arg)+),
        }
    };
}

/// Счётчики операций gateway.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GatewayStats {
    pub saves_ok: u64,
    pub saves_failed: u64,
    pub reads_ok: u64,
    pub reads_failed: u64,
    /// Сколько раз чтение не нашло источник и загрузило пустое хранилище.
    pub reads_missing: u64,
    pub records_written: u64,
    pub records_read: u64,
}

/// Связывает кодек, gzip и конкретный [`ByteSource`].
pub struct PersistenceGateway<S: ByteSource> {
    source: S,
    codec: BinaryCodec,
    compression_level: u32,
    stats: GatewayStats,
}

impl<S: ByteSource> PersistenceGateway<S> {
    pub fn new(
        source: S,
        registry: Arc<SerializerRegistry>,
    ) -> Self {
        Self::with_codec(source, BinaryCodec::new(registry))
    }

    pub fn with_codec(
        source: S,
        codec: BinaryCodec,
    ) -> Self {
        Self {
            source,
            codec,
            compression_level: compression::DEFAULT_LEVEL,
            stats: GatewayStats::default(),
        }
    }

    /// Собирает gateway с явными лимитами и уровнем сжатия.
    pub fn with_options(
        source: S,
        registry: Arc<SerializerRegistry>,
        limits: CodecLimits,
        compression_level: u32,
    ) -> Self {
        let mut gateway = Self::with_codec(source, BinaryCodec::with_limits(registry, limits));
        gateway.compression_level = compression_level.min(compression::MAX_LEVEL);
        gateway
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn stats(&self) -> GatewayStats {
        self.stats
    }

    pub fn compression_level(&self) -> u32 {
        self.compression_level
    }

    /// Перезаписывает источник содержимым `store`.
    ///
    /// Возвращает количество записанных записей.
    pub fn save(
        &mut self,
        store: &ValueStore,
    ) -> DataResult<usize> {
        match self.save_inner(store) {
            Ok(count) => {
                self.stats.saves_ok += 1;
                self.stats.records_written += count as u64;
                debug!(
                    source = %self.source.describe(),
                    records = count,
                    "Plugin data saved"
                );
                Ok(count)
            }
            Err(e) => {
                self.stats.saves_failed += 1;
                log_failure!(
                    e,
                    source = %self.source.describe(),
                    status = %e.status_code(),
                    error = %e,
                    "Failed to save plugin data"
                );
                Err(e)
            }
        }
    }

    fn save_inner(
        &mut self,
        store: &ValueStore,
    ) -> DataResult<usize> {
        self.codec.check_encodable(store)?;

        let writer = self.source.open_write(false).map_err(DataError::Io)?;
        let result = self.write_compressed(writer, store);
        if result.is_err() {
            if let Err(e) = self.source.delete() {
                warn!(
                    source = %self.source.describe(),
                    error = %e,
                    "Failed to remove partially written data"
                );
            }
        }
        result
    }

    fn write_compressed(
        &mut self,
        writer: Box<dyn io::Write>,
        store: &ValueStore,
    ) -> DataResult<usize> {
        let mut encoder = compression::wrap_for_write(writer, self.compression_level);
        let count = self.codec.write_store(&mut encoder, store)?;
        compression::finish_write(encoder).map_err(DataError::Io)?;
        Ok(count)
    }

    /// Загружает записи из источника в `store`, сообщая об ошибке.
    ///
    /// Отсутствующий источник считается пустым. При ошибке `store` не
    /// меняется. Возвращает количество прочитанных записей.
    pub fn try_read(
        &mut self,
        store: &mut ValueStore,
    ) -> DataResult<usize> {
        match self.read_staged() {
            Ok(Some(staged)) => {
                let count = staged.len();
                store.extend(staged);
                self.stats.reads_ok += 1;
                self.stats.records_read += count as u64;
                debug!(
                    source = %self.source.describe(),
                    records = count,
                    "Plugin data loaded"
                );
                Ok(count)
            }
            Ok(None) => {
                self.stats.reads_missing += 1;
                debug!(
                    source = %self.source.describe(),
                    "No stored data yet, starting empty"
                );
                Ok(0)
            }
            Err(e) => {
                self.stats.reads_failed += 1;
                Err(e)
            }
        }
    }

    /// Загружает записи из источника в `store`; ошибка только
    /// логируется (уровень по статус-коду), хранилище при этом остаётся
    /// прежним.
    pub fn read(
        &mut self,
        store: &mut ValueStore,
    ) {
        if let Err(e) = self.try_read(store) {
            log_failure!(
                e,
                source = %self.source.describe(),
                status = %e.status_code(),
                key = e.key().unwrap_or("-"),
                error = %e,
                "Failed to read plugin data"
            );
        }
    }

    fn read_staged(&mut self) -> DataResult<Option<BTreeMap<String, TypedValue>>> {
        let reader = match self.source.open_read() {
            Ok(reader) => reader,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(DataError::Io(e)),
        };

        let mut decoder = compression::wrap_for_read(reader);
        let records = self.codec.read_store(&mut decoder)?;
        let trailing = compression::finish_read(decoder)?;
        if trailing > 0 {
            return Err(DataError::corrupt(format!(
                "{trailing} unexpected bytes after the last record"
            )));
        }

        let mut staged = BTreeMap::new();
        for (key, value) in records {
            if let Some(previous) = staged.insert(key, value) {
                warn!(
                    source = %self.source.describe(),
                    previous = previous.kind_name(),
                    "Duplicate key in stored data, keeping the last record"
                );
            }
        }
        Ok(Some(staged))
    }
}

impl<S: ByteSource + std::fmt::Debug> std::fmt::Debug for PersistenceGateway<S> {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("PersistenceGateway")
            .field("source", &self.source)
            .field("codec", &self.codec)
            .field("compression_level", &self.compression_level)
            .field("stats", &self.stats)
            .finish()
    }
}
