use std::io::{Cursor, Read};

use byteorder::{BigEndian, ByteOrder, LittleEndian, ReadBytesExt};
use flate2::read::GzDecoder;

/// Byte order of voxel data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

/// Voxel sample type shared by the supported volume formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScalarType {
    U8,
    I8,
    I16,
    U16,
    I32,
    U32,
    F32,
    F64,
}

impl ScalarType {
    pub fn size(self) -> usize {
        match self {
            Self::U8 | Self::I8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::I32 | Self::U32 | Self::F32 => 4,
            Self::F64 => 8,
        }
    }
}

/// Inflate a gzip stream held in memory.
pub(crate) fn gunzip(raw: &[u8]) -> Result<Vec<u8>, String> {
    let mut decoder = GzDecoder::new(raw);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|e| format!("gzip decompression failed: {e}"))?;
    Ok(out)
}

/// Total voxel count of an `x` by `y` by `z` grid, or an error when it does
/// not fit in `usize`.
pub(crate) fn voxel_count(x: usize, y: usize, z: usize) -> Result<usize, String> {
    x.checked_mul(y)
        .and_then(|v| v.checked_mul(z))
        .ok_or_else(|| format!("volume too large: {x}x{y}x{z}"))
}

/// Decode `count` samples from `raw`, converting each to f32.
///
/// Returns `None` when `raw` is too short.
pub(crate) fn decode_samples(
    raw: &[u8],
    scalar: ScalarType,
    endian: Endian,
    count: usize,
) -> Option<Vec<f32>> {
    let needed = count.checked_mul(scalar.size())?;
    if raw.len() < needed {
        return None;
    }
    let raw = &raw[..needed];
    match endian {
        Endian::Little => read_samples::<LittleEndian>(raw, scalar, count),
        Endian::Big => read_samples::<BigEndian>(raw, scalar, count),
    }
}

fn read_samples<B: ByteOrder>(raw: &[u8], scalar: ScalarType, count: usize) -> Option<Vec<f32>> {
    let mut cursor = Cursor::new(raw);
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let v = match scalar {
            ScalarType::U8 => cursor.read_u8().ok()? as f32,
            ScalarType::I8 => cursor.read_i8().ok()? as f32,
            ScalarType::I16 => cursor.read_i16::<B>().ok()? as f32,
            ScalarType::U16 => cursor.read_u16::<B>().ok()? as f32,
            ScalarType::I32 => cursor.read_i32::<B>().ok()? as f32,
            ScalarType::U32 => cursor.read_u32::<B>().ok()? as f32,
            ScalarType::F32 => cursor.read_f32::<B>().ok()?,
            ScalarType::F64 => cursor.read_f64::<B>().ok()? as f32,
        };
        out.push(v);
    }
    Some(out)
}
