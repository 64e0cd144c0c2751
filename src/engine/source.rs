//! Источники байтов, в которые сохраняется хранилище.
//!
//! [`ByteSource`] описывает один «файл»: его можно открыть на чтение,
//! перезаписать или удалить. Потоки возвращаются как trait-объекты и
//! закрываются при `Drop`.

use std::{
    fs::{self, File, OpenOptions},
    io::{self, BufReader, BufWriter, Cursor, Read, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use parking_lot::Mutex;

/// Хранилище сырых байтов за одним именем.
pub trait ByteSource {
    /// Открывает поток чтения. Отсутствующий источник даёт
    /// `io::ErrorKind::NotFound`.
    fn open_read(&self) -> io::Result<Box<dyn Read>>;

    /// Открывает поток записи; при `append = false` прежнее содержимое
    /// отбрасывается.
    fn open_write(
        &self,
        append: bool,
    ) -> io::Result<Box<dyn Write>>;

    /// Удаляет источник. Удаление отсутствующего источника не ошибка.
    fn delete(&self) -> io::Result<()>;

    fn exists(&self) -> bool;

    /// Описание для логов.
    fn describe(&self) -> String;
}

/// Файл на диске.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ByteSource for FileSource {
    fn open_read(&self) -> io::Result<Box<dyn Read>> {
        let file = File::open(&self.path)?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn open_write(
        &self,
        append: bool,
    ) -> io::Result<Box<dyn Write>> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(&self.path)?;
        Ok(Box::new(BufWriter::new(file)))
    }

    fn delete(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }

    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Источник в памяти.
///
/// Клоны разделяют один буфер, так что тест может держать у себя копию и
/// наблюдать, что записал gateway.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    data: Arc<Mutex<Option<Vec<u8>>>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            data: Arc::new(Mutex::new(Some(bytes.into()))),
        }
    }

    /// Копия текущего содержимого, `None` если источник удалён или ещё
    /// не создан.
    pub fn snapshot(&self) -> Option<Vec<u8>> {
        self.data.lock().clone()
    }

    pub fn replace(
        &self,
        bytes: impl Into<Vec<u8>>,
    ) {
        *self.data.lock() = Some(bytes.into());
    }
}

struct MemoryWriter {
    data: Arc<Mutex<Option<Vec<u8>>>>,
}

impl Write for MemoryWriter {
    fn write(
        &mut self,
        buf: &[u8],
    ) -> io::Result<usize> {
        self.data
            .lock()
            .get_or_insert_with(Vec::new)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl ByteSource for MemorySource {
    fn open_read(&self) -> io::Result<Box<dyn Read>> {
        match self.data.lock().as_ref() {
            Some(bytes) => Ok(Box::new(Cursor::new(bytes.clone()))),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                "memory source is empty",
            )),
        }
    }

    fn open_write(
        &self,
        append: bool,
    ) -> io::Result<Box<dyn Write>> {
        {
            let mut guard = self.data.lock();
            let buf = guard.get_or_insert_with(Vec::new);
            if !append {
                buf.clear();
            }
        }
        Ok(Box::new(MemoryWriter {
            data: Arc::clone(&self.data),
        }))
    }

    fn delete(&self) -> io::Result<()> {
        *self.data.lock() = None;
        Ok(())
    }

    fn exists(&self) -> bool {
        self.data.lock().is_some()
    }

    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn read_all(source: &dyn ByteSource) -> Vec<u8> {
        let mut out = Vec::new();
        source.open_read().unwrap().read_to_end(&mut out).unwrap();
        out
    }

    #[test]
    fn test_file_source_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let source = FileSource::new(dir.path().join("nested/deeper/data.dat"));
        assert!(!source.exists());

        let mut w = source.open_write(false).unwrap();
        w.write_all(b"abc").unwrap();
        w.flush().unwrap();
        drop(w);

        assert!(source.exists());
        assert_eq!(read_all(&source), b"abc");
    }

    #[test]
    fn test_file_source_truncate_and_append() {
        let dir = tempdir().unwrap();
        let source = FileSource::new(dir.path().join("data.dat"));

        source.open_write(false).unwrap().write_all(b"first").unwrap();
        source.open_write(true).unwrap().write_all(b"+more").unwrap();
        assert_eq!(read_all(&source), b"first+more");

        source.open_write(false).unwrap().write_all(b"new").unwrap();
        assert_eq!(read_all(&source), b"new");
    }

    #[test]
    fn test_file_source_missing_and_delete() {
        let dir = tempdir().unwrap();
        let source = FileSource::new(dir.path().join("absent.dat"));

        let err = source.open_read().err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        // Удаление отсутствующего файла не ошибка.
        source.delete().unwrap();

        source.open_write(false).unwrap().write_all(b"x").unwrap();
        source.delete().unwrap();
        assert!(!source.exists());
    }

    #[test]
    fn test_memory_source_shares_buffer() {
        let source = MemorySource::new();
        let observer = source.clone();
        assert!(!observer.exists());

        source.open_write(false).unwrap().write_all(b"hello").unwrap();
        assert_eq!(observer.snapshot().as_deref(), Some(&b"hello"[..]));

        source.open_write(false).unwrap().write_all(b"bye").unwrap();
        assert_eq!(read_all(&observer), b"bye");

        observer.delete().unwrap();
        assert!(!source.exists());
        assert_eq!(
            source.open_read().err().map(|e| e.kind()),
            Some(io::ErrorKind::NotFound)
        );
    }

    #[test]
    fn test_memory_source_append() {
        let source = MemorySource::with_bytes(b"ab".to_vec());
        source.open_write(true).unwrap().write_all(b"cd").unwrap();
        assert_eq!(source.snapshot().unwrap(), b"abcd");
        assert_eq!(source.describe(), "<memory>");
    }
}
