/// Binary wire format: record layout, type tags, length-prefixed strings.
pub mod codec;
/// Storage settings loaded from an optional config file.
pub mod config;
/// Value store, byte sources, gzip wrappers and the persistence gateway.
pub mod engine;
/// Subscriber setup for applications embedding the store.
pub mod logging;
/// Serializers for extension types, keyed by canonical name and `TypeId`.
pub mod registry;
/// Stored values and conversions from Rust types.
pub mod value;

// -----------------------------------------------------------------------------
//  Frequently used public types
// -----------------------------------------------------------------------------

/// Codec and its limits.
pub use codec::{BinaryCodec, CodecLimits, TypeTag};
/// Storage settings.
pub use self::config::StoreConfig;
/// Store, sources and persistence.
pub use engine::{
    ByteSource, FileSource, GatewayStats, MemorySource, PersistenceGateway, PluginData, ValueStore,
};
/// Logging setup.
pub use logging::{init_logging, LoggingConfig};
/// Error types.
pub use plugdata_error::{DataError, DataResult, ErrorExt, StatusCode};
/// Extension type registry.
pub use registry::{SerializerRegistry, TypeEntry, TypeSerializer};
/// Values.
pub use value::{DataValue, Ext, ExtensionData, ExtensionValue, TypedValue};
