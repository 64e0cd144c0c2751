use std::sync::Arc;

use plugdata_error::DataResult;

use super::{FileSource, GatewayStats, PersistenceGateway, ValueStore};
use crate::{config::StoreConfig, CodecLimits, DataValue, SerializerRegistry, TypedValue};

/// Данные одного плагина или сущности: значения в памяти плюс место, куда
/// они сохраняются.
///
/// ```
/// use std::sync::Arc;
///
/// use plugdata::{MemorySource, PluginData, SerializerRegistry};
///
/// let registry = Arc::new(SerializerRegistry::with_defaults());
/// let mut data = PluginData::new(MemorySource::new(), registry);
/// data.set_data("visits", 3);
/// data.save().unwrap();
///
/// data.set_data("visits", 4);
/// data.read();
/// assert_eq!(data.get_data::<i32>("visits").unwrap(), 3);
/// ```
pub struct PluginData<S: super::ByteSource = FileSource> {
    store: ValueStore,
    gateway: PersistenceGateway<S>,
}

impl PluginData<FileSource> {
    /// Открывает данные сущности `name` в каталоге из конфигурации.
    ///
    /// Файл не читается автоматически: вызовите [`read`](Self::read).
    pub fn open(
        config: &StoreConfig,
        registry: Arc<SerializerRegistry>,
        name: &str,
    ) -> Self {
        let source = FileSource::new(config.file_path(name));
        let limits = CodecLimits {
            max_payload_len: config.max_payload_len,
            max_records: config.max_records,
        };
        Self::with_gateway(PersistenceGateway::with_options(
            source,
            registry,
            limits,
            config.compression_level,
        ))
    }
}

impl<S: super::ByteSource> PluginData<S> {
    pub fn new(
        source: S,
        registry: Arc<SerializerRegistry>,
    ) -> Self {
        Self::with_gateway(PersistenceGateway::new(source, registry))
    }

    pub fn with_gateway(gateway: PersistenceGateway<S>) -> Self {
        Self {
            store: ValueStore::new(),
            gateway,
        }
    }

    pub fn set_data<V: Into<TypedValue>>(
        &mut self,
        key: impl Into<String>,
        value: V,
    ) {
        self.store.set(key, value);
    }

    pub fn get_data<T: DataValue>(
        &self,
        key: &str,
    ) -> DataResult<T> {
        self.store.get(key)
    }

    /// Возвращает значение или сохраняет и возвращает `default`.
    pub fn get_data_or<T: DataValue + Clone>(
        &mut self,
        key: &str,
        default: T,
    ) -> DataResult<T> {
        self.store.get_or(key, default)
    }

    pub fn save(&mut self) -> DataResult<usize> {
        self.gateway.save(&self.store)
    }

    /// Загружает сохранённые значения; ошибка только логируется.
    pub fn read(&mut self) {
        self.gateway.read(&mut self.store);
    }

    pub fn try_read(&mut self) -> DataResult<usize> {
        self.gateway.try_read(&mut self.store)
    }

    pub fn store(&self) -> &ValueStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ValueStore {
        &mut self.store
    }

    pub fn gateway(&self) -> &PersistenceGateway<S> {
        &self.gateway
    }

    pub fn stats(&self) -> GatewayStats {
        self.gateway.stats()
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::{engine::MemorySource, Ext};

    #[test]
    fn test_facade_roundtrip_on_disk() {
        let dir = tempdir().unwrap();
        let config = StoreConfig {
            data_dir: dir.path().to_path_buf(),
            ..StoreConfig::default()
        };
        let registry = Arc::new(SerializerRegistry::with_defaults());

        let mut data = PluginData::open(&config, Arc::clone(&registry), "economy");
        data.set_data("balance", 150i64);
        data.set_data("history", Ext(vec![10, 20, 30]));
        assert_eq!(data.save().unwrap(), 2);
        assert!(config.file_path("economy").is_file());

        let mut reopened = PluginData::open(&config, registry, "economy");
        assert_eq!(reopened.try_read().unwrap(), 2);
        assert_eq!(reopened.get_data::<i64>("balance").unwrap(), 150);
        assert_eq!(
            reopened.get_data::<Ext<Vec<i32>>>("history").unwrap().0,
            vec![10, 20, 30]
        );
    }

    #[test]
    fn test_get_data_or_materializes_default() {
        let source = MemorySource::new();
        let registry = Arc::new(SerializerRegistry::with_defaults());
        let mut data = PluginData::new(source.clone(), Arc::clone(&registry));

        assert_eq!(data.get_data_or("greeting", "hi".to_string()).unwrap(), "hi");
        data.save().unwrap();

        let mut other = PluginData::new(source, registry);
        other.read();
        assert_eq!(other.get_data::<String>("greeting").unwrap(), "hi");
        assert_eq!(other.stats().reads_ok, 1);
    }
}
