//! Базовые сериализаторы, которые регистрирует
//! [`SerializerRegistry::with_defaults`].
//!
//! | имя           | тип           | формат                                 |
//! |---------------|---------------|----------------------------------------|
//! | `f64`         | `f64`         | 8 байт, IEEE-754 BE                    |
//! | `i16`         | `i16`         | 2 байта BE                             |
//! | `u8`          | `u8`          | 1 байт                                 |
//! | `bytes`       | `Vec<u8>`     | длина i32 BE + байты                   |
//! | `string_list` | `Vec<String>` | количество i32 BE + строки (u16 + UTF-8)|
//! | `int_list`    | `Vec<i32>`    | количество i32 BE + i32 BE             |

use std::io::{self, Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use super::SerializerRegistry;
use crate::codec::{read_utf, write_utf};

/// Регистрирует все базовые сериализаторы.
pub fn register_defaults(registry: &mut SerializerRegistry) {
    registry
        .register::<f64, _, _>(
            "f64",
            |v, out| out.write_f64::<BigEndian>(*v),
            |input| input.read_f64::<BigEndian>(),
        )
        .register::<i16, _, _>(
            "i16",
            |v, out| out.write_i16::<BigEndian>(*v),
            |input| input.read_i16::<BigEndian>(),
        )
        .register::<u8, _, _>("u8", |v, out| out.write_u8(*v), |input| input.read_u8())
        .register::<Vec<u8>, _, _>(
            "bytes",
            |v, out| {
                write_len(out, v.len())?;
                out.write_all(v)
            },
            |input| {
                let len = read_len(input)?;
                // Длина приходит из файла: не аллоцируем больше, чем реально прочитано.
                let mut buf = Vec::new();
                input.take(len as u64).read_to_end(&mut buf)?;
                if buf.len() != len {
                    return Err(io::ErrorKind::UnexpectedEof.into());
                }
                Ok(buf)
            },
        )
        .register::<Vec<String>, _, _>(
            "string_list",
            |v, out| {
                write_len(out, v.len())?;
                v.iter().try_for_each(|s| write_utf(&mut *out, s))
            },
            |input| {
                let len = read_len(input)?;
                (0..len).map(|_| read_utf(&mut *input)).collect()
            },
        )
        .register::<Vec<i32>, _, _>(
            "int_list",
            |v, out| {
                write_len(out, v.len())?;
                v.iter().try_for_each(|i| out.write_i32::<BigEndian>(*i))
            },
            |input| {
                let len = read_len(input)?;
                (0..len).map(|_| input.read_i32::<BigEndian>()).collect()
            },
        );
}

fn write_len(
    out: &mut dyn Write,
    len: usize,
) -> io::Result<()> {
    let len = i32::try_from(len).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("collection too large: {len} elements"),
        )
    })?;
    out.write_i32::<BigEndian>(len)
}

fn read_len(input: &mut dyn Read) -> io::Result<usize> {
    let len = input.read_i32::<BigEndian>()?;
    usize::try_from(len).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("negative collection length {len}"),
        )
    })
}
