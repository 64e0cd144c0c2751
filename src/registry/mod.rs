//! Реестр сериализаторов для extension-типов.
//!
//! Встроенные типы (`bool`, `i32`, `i64`, `f32`, `String`) кодек пишет сам и
//! в реестр не заглядывает. Любой другой тип должен быть зарегистрирован под
//! каноническим именем: это имя пишется в файл и по нему же при чтении
//! выбирается декодер. Имя из файла используется только как ключ поиска,
//! никакие типы по нему не создаются.
//!
//! Реестр заполняется через `&mut self` на этапе инициализации, затем
//! замораживается в `Arc` и раздаётся хранилищам только на чтение:
//!
//! ```
//! use std::sync::Arc;
//!
//! use plugdata::SerializerRegistry;
//!
//! let mut registry = SerializerRegistry::with_defaults();
//! registry.register::<u64, _, _>(
//!     "u64",
//!     |v, out| out.write_all(&v.to_be_bytes()),
//!     |input| {
//!         let mut buf = [0u8; 8];
//!         input.read_exact(&mut buf)?;
//!         Ok(u64::from_be_bytes(buf))
//!     },
//! );
//! let registry = Arc::new(registry);
//! assert!(registry.lookup("u64").is_some());
//! ```

pub mod defaults;

use std::{
    any::{Any, TypeId},
    collections::HashMap,
    fmt, io,
    io::{Read, Write},
    sync::Arc,
};

use tracing::{debug, warn};

use crate::value::{ExtensionData, ExtensionValue};

type EncodeFn = dyn Fn(&dyn Any, &mut dyn Write) -> io::Result<()> + Send + Sync;
type DecodeFn = dyn Fn(&mut dyn Read) -> io::Result<ExtensionValue> + Send + Sync;

/// Сериализатор одного extension-типа в объектной форме.
///
/// Альтернатива паре замыканий в [`SerializerRegistry::register`].
pub trait TypeSerializer<T>: Send + Sync + 'static {
    fn write(
        &self,
        out: &mut dyn Write,
        value: &T,
    ) -> io::Result<()>;

    fn read(
        &self,
        input: &mut dyn Read,
    ) -> io::Result<T>;
}

/// Запись реестра: каноническое имя, тип и пара encode/decode.
pub struct TypeEntry {
    name: String,
    type_id: TypeId,
    rust_name: &'static str,
    encode: Box<EncodeFn>,
    decode: Box<DecodeFn>,
}

impl TypeEntry {
    /// Каноническое имя, под которым тип пишется в файл.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn rust_name(&self) -> &'static str {
        self.rust_name
    }

    /// Кодирует значение зарегистрированным энкодером.
    ///
    /// Значение другого типа даёт `InvalidInput`.
    pub fn encode(
        &self,
        value: &ExtensionValue,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        if value.type_id() != self.type_id {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "serializer '{}' expects {}, got {}",
                    self.name,
                    self.rust_name,
                    value.rust_name()
                ),
            ));
        }
        (self.encode)(value.as_any(), out)
    }

    pub fn decode(
        &self,
        input: &mut dyn Read,
    ) -> io::Result<ExtensionValue> {
        (self.decode)(input)
    }
}

impl fmt::Debug for TypeEntry {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("TypeEntry")
            .field("name", &self.name)
            .field("rust_name", &self.rust_name)
            .finish()
    }
}

/// Таблица extension-сериализаторов.
#[derive(Default)]
pub struct SerializerRegistry {
    by_name: HashMap<String, Arc<TypeEntry>>,
    by_type: HashMap<TypeId, Arc<TypeEntry>>,
}

impl SerializerRegistry {
    /// Пустой реестр.
    pub fn new() -> Self {
        Self::default()
    }

    /// Реестр с базовыми сериализаторами (см. [`defaults`]).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        defaults::register_defaults(&mut registry);
        registry
    }

    /// Регистрирует `T` под именем `name`.
    ///
    /// Повторная регистрация того же имени или того же типа перезаписывает
    /// предыдущую (last write wins). Если тип раньше был зарегистрирован
    /// под другим именем, старое имя остаётся доступным для чтения.
    pub fn register<T, E, D>(
        &mut self,
        name: impl Into<String>,
        encoder: E,
        decoder: D,
    ) -> &mut Self
    where
        T: ExtensionData,
        E: Fn(&T, &mut dyn Write) -> io::Result<()> + Send + Sync + 'static,
        D: Fn(&mut dyn Read) -> io::Result<T> + Send + Sync + 'static,
    {
        let name = name.into();
        let rust_name = std::any::type_name::<T>();
        let encode = move |value: &dyn Any, out: &mut dyn Write| match value.downcast_ref::<T>() {
            Some(v) => encoder(v, out),
            None => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("value is not a {rust_name}"),
            )),
        };
        let decode = move |input: &mut dyn Read| decoder(input).map(ExtensionValue::new);

        let entry = Arc::new(TypeEntry {
            name: name.clone(),
            type_id: TypeId::of::<T>(),
            rust_name,
            encode: Box::new(encode),
            decode: Box::new(decode),
        });

        if let Some(old) = self.by_name.insert(name.clone(), Arc::clone(&entry)) {
            warn!(name = %name, previous = old.rust_name, new = rust_name, "Serializer overridden");
            if old.type_id != entry.type_id
                && self
                    .by_type
                    .get(&old.type_id)
                    .is_some_and(|e| e.name == name)
            {
                self.by_type.remove(&old.type_id);
            }
        }
        self.by_type.insert(entry.type_id, entry);

        debug!(name = %name, rust_type = rust_name, "Serializer registered");
        self
    }

    /// Регистрирует `T` через объект [`TypeSerializer`].
    pub fn register_serializer<T, S>(
        &mut self,
        name: impl Into<String>,
        serializer: S,
    ) -> &mut Self
    where
        T: ExtensionData,
        S: TypeSerializer<T>,
    {
        let serializer = Arc::new(serializer);
        let reader = Arc::clone(&serializer);
        self.register::<T, _, _>(
            name,
            move |value, out| serializer.write(out, value),
            move |input| reader.read(input),
        )
    }

    /// Поиск по каноническому имени (используется при чтении).
    pub fn lookup(
        &self,
        name: &str,
    ) -> Option<&TypeEntry> {
        self.by_name.get(name).map(Arc::as_ref)
    }

    /// Поиск по типу значения (используется при записи).
    pub fn lookup_type(
        &self,
        type_id: TypeId,
    ) -> Option<&TypeEntry> {
        self.by_type.get(&type_id).map(Arc::as_ref)
    }

    pub fn lookup_for<T: 'static>(&self) -> Option<&TypeEntry> {
        self.lookup_type(TypeId::of::<T>())
    }

    pub fn contains(
        &self,
        name: &str,
    ) -> bool {
        self.by_name.contains_key(name)
    }

    /// Количество зарегистрированных имён.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Зарегистрированные имена в алфавитном порядке.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_name.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for SerializerRegistry {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("SerializerRegistry")
            .field("names", &self.names())
            .finish()
    }
}
