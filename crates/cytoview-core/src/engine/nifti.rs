use byteorder::{BigEndian, ByteOrder, LittleEndian};
use ndarray::Array3;

use super::samples::{decode_samples, voxel_count, Endian, ScalarType};

pub(crate) const NIFTI_HEADER_SIZE: usize = 348;
const NIFTI_SINGLE_FILE_MAGIC: &[u8; 4] = b"n+1\0";
const NIFTI_PAIR_MAGIC: &[u8; 4] = b"ni1\0";

/// The subset of the NIfTI-1 header the viewer needs.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct NiftiHeader {
    pub endian: Endian,
    /// Voxel counts along x, y, z. Missing dimensions are 1.
    pub dims: [usize; 3],
    pub scalar: ScalarType,
    pub vox_offset: usize,
    pub scl_slope: f32,
    pub scl_inter: f32,
}

fn read_i16(buf: &[u8], endian: Endian) -> i16 {
    match endian {
        Endian::Little => LittleEndian::read_i16(buf),
        Endian::Big => BigEndian::read_i16(buf),
    }
}

fn read_f32(buf: &[u8], endian: Endian) -> f32 {
    match endian {
        Endian::Little => LittleEndian::read_f32(buf),
        Endian::Big => BigEndian::read_f32(buf),
    }
}

fn scalar_from_datatype(code: i16) -> Option<ScalarType> {
    match code {
        2 => Some(ScalarType::U8),
        4 => Some(ScalarType::I16),
        8 => Some(ScalarType::I32),
        16 => Some(ScalarType::F32),
        64 => Some(ScalarType::F64),
        256 => Some(ScalarType::I8),
        512 => Some(ScalarType::U16),
        768 => Some(ScalarType::U32),
        _ => None,
    }
}

pub(crate) fn parse_header(buf: &[u8]) -> Result<NiftiHeader, String> {
    if buf.len() < NIFTI_HEADER_SIZE {
        return Err("file too small for NIfTI-1 header".into());
    }

    // sizeof_hdr doubles as the byte-order marker.
    let endian = if LittleEndian::read_i32(&buf[0..4]) == NIFTI_HEADER_SIZE as i32 {
        Endian::Little
    } else if BigEndian::read_i32(&buf[0..4]) == NIFTI_HEADER_SIZE as i32 {
        Endian::Big
    } else {
        return Err("missing NIfTI-1 header size marker".into());
    };

    let magic = &buf[344..348];
    if magic == NIFTI_PAIR_MAGIC {
        return Err("detached .hdr/.img pairs are not supported".into());
    }
    if magic != NIFTI_SINGLE_FILE_MAGIC {
        return Err("missing n+1 magic".into());
    }

    let mut dim = [0i16; 8];
    for (i, d) in dim.iter_mut().enumerate() {
        let off = 40 + i * 2;
        *d = read_i16(&buf[off..off + 2], endian);
    }
    let ndim = dim[0];
    if !(1..=7).contains(&ndim) {
        return Err(format!("invalid dimension count {ndim}"));
    }
    let axis = |i: usize| -> Result<usize, String> {
        if (i as i16) > ndim {
            return Ok(1);
        }
        match dim[i] {
            n if n > 0 => Ok(n as usize),
            n => Err(format!("invalid size {n} on axis {i}")),
        }
    };
    let dims = [axis(1)?, axis(2)?, axis(3)?];

    let datatype = read_i16(&buf[70..72], endian);
    let scalar =
        scalar_from_datatype(datatype).ok_or_else(|| format!("unsupported datatype {datatype}"))?;

    let vox_offset = read_f32(&buf[108..112], endian);
    if !vox_offset.is_finite() || vox_offset < NIFTI_HEADER_SIZE as f32 {
        return Err(format!("invalid vox_offset {vox_offset}"));
    }

    Ok(NiftiHeader {
        endian,
        dims,
        scalar,
        vox_offset: vox_offset as usize,
        scl_slope: read_f32(&buf[112..116], endian),
        scl_inter: read_f32(&buf[116..120], endian),
    })
}

/// Decode the first 3-D volume of a single-file NIfTI-1 image.
pub(crate) fn decode(buf: &[u8]) -> Result<Array3<f32>, String> {
    let header = parse_header(buf)?;
    let [x, y, z] = header.dims;
    let count = voxel_count(x, y, z)?;

    let raw = buf
        .get(header.vox_offset..)
        .ok_or_else(|| "voxel offset beyond end of file".to_string())?;
    let mut samples = decode_samples(raw, header.scalar, header.endian, count)
        .ok_or_else(|| format!("file truncated: expected {count} voxels"))?;

    // A zero slope means "no scaling" in NIfTI-1.
    if header.scl_slope != 0.0 && header.scl_slope.is_finite() {
        let inter = if header.scl_inter.is_finite() { header.scl_inter } else { 0.0 };
        for v in samples.iter_mut() {
            *v = *v * header.scl_slope + inter;
        }
    }

    // NIfTI stores x fastest, which matches a (z, y, x) row-major array.
    Array3::from_shape_vec((z, y, x), samples).map_err(|e| e.to_string())
}
