//! Обёртки gzip вокруг потоков [`ByteSource`](super::ByteSource).
//!
//! Содержимое хранилища всегда пишется одним gzip-членом; сжатие не
//! отключается, меняется только уровень.

use std::io::{self, BufRead, BufReader, Read, Write};

use flate2::{bufread::GzDecoder, write::GzEncoder, Compression};

/// Уровень сжатия по умолчанию.
pub const DEFAULT_LEVEL: u32 = 6;

/// Максимально допустимый уровень сжатия.
pub const MAX_LEVEL: u32 = 9;

/// Оборачивает поток чтения в gzip-декодер.
///
/// Ошибки формата gzip проявляются при чтении как `InvalidInput` или
/// `InvalidData`. Декодер читает ровно один gzip-член; всё, что лежит
/// после него, остаётся в нижележащем буфере (см. [`finish_read`]).
pub fn wrap_for_read<R: Read>(reader: R) -> GzDecoder<BufReader<R>> {
    GzDecoder::new(BufReader::new(reader))
}

/// Дочитывает gzip-член до конца, чтобы декодер сверил CRC32 и длину из
/// трейлера.
///
/// Возвращает количество лишних байт: распакованных данных, которые никто
/// не прочитал, плюс сырых байт после конца gzip-члена. Повреждённый
/// трейлер даёт ошибку `InvalidInput`/`InvalidData`.
pub fn finish_read<R: Read>(mut decoder: GzDecoder<BufReader<R>>) -> io::Result<u64> {
    let unread = io::copy(&mut decoder, &mut io::sink())?;
    let mut inner = decoder.into_inner();
    let after_member = if inner.fill_buf()?.is_empty() {
        0
    } else {
        io::copy(&mut inner, &mut io::sink())?
    };
    Ok(unread + after_member)
}

/// Оборачивает поток записи в gzip-кодировщик. Уровень выше
/// [`MAX_LEVEL`] ограничивается.
pub fn wrap_for_write<W: Write>(
    writer: W,
    level: u32,
) -> GzEncoder<W> {
    GzEncoder::new(writer, Compression::new(level.min(MAX_LEVEL)))
}

/// Дописывает gzip-трейлер и сбрасывает нижележащий поток.
pub fn finish_write<W: Write>(encoder: GzEncoder<W>) -> io::Result<W> {
    let mut inner = encoder.finish()?;
    inner.flush()?;
    Ok(inner)
}
