//! Decoder for single `.npy` array members.
//!
//! Layout: `\x93NUMPY`, major/minor version bytes, little-endian header
//! length (u16 for 1.x, u32 for 2.x and 3.x), a Python dict literal header
//! padded with spaces, then the raw element bytes.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::core::archive::{ArrayData, RawArray};

pub const MAGIC: &[u8; 6] = b"\x93NUMPY";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NpyError {
    #[error("not an npy array (bad magic)")]
    BadMagic,
    #[error("unsupported npy version {0}.{1}")]
    UnsupportedVersion(u8, u8),
    #[error("malformed npy header: {0}")]
    BadHeader(String),
    #[error("unsupported dtype {0:?}")]
    UnsupportedDtype(String),
    #[error("pickled object arrays are not supported")]
    ObjectArray,
    #[error("expected {expected} data bytes, found {actual}")]
    Truncated { expected: usize, actual: usize },
}

/// Parsed `descr` entry, e.g. `<i8` or `<U12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Dtype {
    big_endian: bool,
    kind: char,
    size: usize,
}

impl Dtype {
    fn parse(descr: &str) -> Result<Self, NpyError> {
        let unsupported = || NpyError::UnsupportedDtype(descr.to_string());
        let mut chars = descr.chars();
        let order = chars.next().ok_or_else(unsupported)?;
        let big_endian = match order {
            '<' | '|' | '=' => false,
            '>' => true,
            _ => return Err(unsupported()),
        };
        let kind = chars.next().ok_or_else(unsupported)?;
        if kind == 'O' {
            return Err(NpyError::ObjectArray);
        }
        let size: usize = chars.as_str().parse().map_err(|_| unsupported())?;
        let supported = match kind {
            'b' => size == 1,
            'i' | 'u' => matches!(size, 1 | 2 | 4 | 8),
            'f' => matches!(size, 4 | 8),
            'U' | 'S' => true,
            _ => false,
        };
        if !supported {
            return Err(unsupported());
        }
        Ok(Self {
            big_endian,
            kind,
            size,
        })
    }

    /// Bytes per element; `None` when a `U` width overflows.
    fn item_size(self) -> Option<usize> {
        if self.kind == 'U' {
            self.size.checked_mul(4)
        } else {
            Some(self.size)
        }
    }
}

struct Header {
    dtype: Dtype,
    fortran_order: bool,
    shape: Vec<usize>,
}

fn parse_header(text: &str) -> Result<Header, NpyError> {
    static DESCR_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"'descr'\s*:\s*'([^']*)'").unwrap());
    static FORTRAN_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"'fortran_order'\s*:\s*(True|False)").unwrap());
    static SHAPE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"'shape'\s*:\s*\(([^)]*)\)").unwrap());

    let descr = DESCR_RE
        .captures(text)
        .map(|c| c[1].to_string())
        .ok_or_else(|| NpyError::BadHeader(format!("no descr in {text:?}")))?;
    let fortran_order = FORTRAN_RE
        .captures(text)
        .map(|c| &c[1] == "True")
        .ok_or_else(|| NpyError::BadHeader(format!("no fortran_order in {text:?}")))?;
    let shape_raw = SHAPE_RE
        .captures(text)
        .map(|c| c[1].to_string())
        .ok_or_else(|| NpyError::BadHeader(format!("no shape in {text:?}")))?;
    let shape = shape_raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.trim_end_matches('L')
                .parse::<usize>()
                .map_err(|_| NpyError::BadHeader(format!("bad shape entry {s:?}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Header {
        dtype: Dtype::parse(&descr)?,
        fortran_order,
        shape,
    })
}

/// Decode a complete `.npy` byte buffer.
pub fn decode(bytes: &[u8]) -> Result<RawArray, NpyError> {
    if bytes.len() < 10 || &bytes[..6] != MAGIC {
        return Err(NpyError::BadMagic);
    }
    let (major, minor) = (bytes[6], bytes[7]);
    let (header_len, header_start) = match major {
        1 => (usize::from(u16::from_le_bytes([bytes[8], bytes[9]])), 10),
        2 | 3 => {
            if bytes.len() < 12 {
                return Err(NpyError::BadHeader("truncated header length".to_string()));
            }
            let len = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
            (len as usize, 12)
        }
        _ => return Err(NpyError::UnsupportedVersion(major, minor)),
    };
    let data_start = header_start + header_len;
    let header_bytes = bytes
        .get(header_start..data_start)
        .ok_or_else(|| NpyError::BadHeader("header runs past end of member".to_string()))?;
    let header_text = String::from_utf8_lossy(header_bytes);
    let header = parse_header(&header_text)?;

    let expected = header
        .shape
        .iter()
        .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
        .zip(header.dtype.item_size())
        .and_then(|(count, item)| count.checked_mul(item))
        .ok_or_else(|| NpyError::BadHeader("array size overflows".to_string()))?;
    let payload = &bytes[data_start..];
    if payload.len() < expected {
        return Err(NpyError::Truncated {
            expected,
            actual: payload.len(),
        });
    }

    Ok(RawArray {
        shape: header.shape,
        fortran_order: header.fortran_order,
        data: decode_elements(header.dtype, &payload[..expected]),
    })
}

fn decode_elements(dtype: Dtype, data: &[u8]) -> ArrayData {
    let be = dtype.big_endian;
    match (dtype.kind, dtype.size) {
        ('b', _) => ArrayData::Bool(data.iter().map(|b| *b != 0).collect()),
        ('i', 1) => ArrayData::Int(data.iter().map(|b| i64::from(*b as i8)).collect()),
        ('i', 2) => ArrayData::Int(chunks::<2, _>(data, |b| {
            i64::from(if be { i16::from_be_bytes(b) } else { i16::from_le_bytes(b) })
        })),
        ('i', 4) => ArrayData::Int(chunks::<4, _>(data, |b| {
            i64::from(if be { i32::from_be_bytes(b) } else { i32::from_le_bytes(b) })
        })),
        ('i', _) => ArrayData::Int(chunks::<8, _>(data, |b| {
            if be { i64::from_be_bytes(b) } else { i64::from_le_bytes(b) }
        })),
        ('u', 1) => ArrayData::UInt(data.iter().map(|b| u64::from(*b)).collect()),
        ('u', 2) => ArrayData::UInt(chunks::<2, _>(data, |b| {
            u64::from(if be { u16::from_be_bytes(b) } else { u16::from_le_bytes(b) })
        })),
        ('u', 4) => ArrayData::UInt(chunks::<4, _>(data, |b| {
            u64::from(if be { u32::from_be_bytes(b) } else { u32::from_le_bytes(b) })
        })),
        ('u', _) => ArrayData::UInt(chunks::<8, _>(data, |b| {
            if be { u64::from_be_bytes(b) } else { u64::from_le_bytes(b) }
        })),
        ('f', 4) => ArrayData::Float(chunks::<4, _>(data, |b| {
            f64::from(if be { f32::from_be_bytes(b) } else { f32::from_le_bytes(b) })
        })),
        ('f', _) => ArrayData::Float(chunks::<8, _>(data, |b| {
            if be { f64::from_be_bytes(b) } else { f64::from_le_bytes(b) }
        })),
        ('U', _) => ArrayData::Text(decode_unicode(data, dtype.size, be)),
        _ => ArrayData::Text(decode_bytes(data, dtype.size)),
    }
}

fn chunks<const N: usize, T>(data: &[u8], convert: impl Fn([u8; N]) -> T) -> Vec<T> {
    data.chunks_exact(N)
        .map(|chunk| {
            let mut buf = [0u8; N];
            buf.copy_from_slice(chunk);
            convert(buf)
        })
        .collect()
}

/// Fixed-width UCS-4 strings; trailing NULs are padding.
fn decode_unicode(data: &[u8], chars_per_item: usize, be: bool) -> Vec<String> {
    if chars_per_item == 0 {
        return Vec::new();
    }
    data.chunks_exact(chars_per_item * 4)
        .map(|item| {
            let code_points = chunks::<4, _>(item, |b| {
                if be { u32::from_be_bytes(b) } else { u32::from_le_bytes(b) }
            });
            code_points
                .into_iter()
                .map(|cp| char::from_u32(cp).unwrap_or(char::REPLACEMENT_CHARACTER))
                .collect::<String>()
                .trim_end_matches('\0')
                .to_string()
        })
        .collect()
}

/// Fixed-width byte strings; trailing NULs are padding.
fn decode_bytes(data: &[u8], bytes_per_item: usize) -> Vec<String> {
    if bytes_per_item == 0 {
        return Vec::new();
    }
    data.chunks_exact(bytes_per_item)
        .map(|item| {
            let end = item.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
            String::from_utf8_lossy(&item[..end]).into_owned()
        })
        .collect()
}
