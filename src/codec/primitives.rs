//! Строки с префиксом длины.
//!
//! Формат: длина `u16` BE, затем байты UTF-8. Функции открыты, чтобы
//! пользовательские сериализаторы писали строки так же, как кодек.

use std::io::{self, Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

/// Максимальная длина строки в байтах.
pub const MAX_UTF_LEN: usize = u16::MAX as usize;

/// Пишет строку; строки длиннее [`MAX_UTF_LEN`] байт дают `InvalidInput`.
pub fn write_utf<W: Write + ?Sized>(
    w: &mut W,
    s: &str,
) -> io::Result<()> {
    let len = u16::try_from(s.len()).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("string of {} bytes exceeds {MAX_UTF_LEN}", s.len()),
        )
    })?;
    w.write_u16::<BigEndian>(len)?;
    w.write_all(s.as_bytes())
}

/// Читает строку; невалидный UTF-8 даёт `InvalidData`.
pub fn read_utf<R: Read + ?Sized>(r: &mut R) -> io::Result<String> {
    let len = r.read_u16::<BigEndian>()? as usize;
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf)?;
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
