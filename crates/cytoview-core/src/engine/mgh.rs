use std::io::Cursor;

use byteorder::{BigEndian, ReadBytesExt};
use ndarray::Array3;

use super::samples::{decode_samples, voxel_count, Endian, ScalarType};

/// MGH voxel data always starts after a fixed 284-byte header.
pub(crate) const MGH_DATA_OFFSET: usize = 284;

/// Decode frame 0 of a FreeSurfer MGH volume (already inflated if it was `.mgz`).
pub(crate) fn decode(buf: &[u8]) -> Result<Array3<f32>, String> {
    if buf.len() < MGH_DATA_OFFSET {
        return Err("file too small for MGH header".into());
    }

    let mut cursor = Cursor::new(buf);
    let read = |c: &mut Cursor<&[u8]>| c.read_i32::<BigEndian>().map_err(|e| e.to_string());
    let version = read(&mut cursor)?;
    if version != 1 {
        return Err(format!("unsupported MGH version {version}"));
    }
    let width = read(&mut cursor)?;
    let height = read(&mut cursor)?;
    let depth = read(&mut cursor)?;
    let _frames = read(&mut cursor)?;
    let type_code = read(&mut cursor)?;

    if width <= 0 || height <= 0 || depth <= 0 {
        return Err(format!("invalid dimensions {width}x{height}x{depth}"));
    }
    let scalar = match type_code {
        0 => ScalarType::U8,
        1 => ScalarType::I32,
        3 => ScalarType::F32,
        4 => ScalarType::I16,
        other => return Err(format!("unsupported MGH data type {other}")),
    };

    let (x, y, z) = (width as usize, height as usize, depth as usize);
    let count = voxel_count(x, y, z)?;
    let samples = decode_samples(&buf[MGH_DATA_OFFSET..], scalar, Endian::Big, count)
        .ok_or_else(|| format!("file truncated: expected {count} voxels"))?;

    Array3::from_shape_vec((z, y, x), samples).map_err(|e| e.to_string())
}
