use ndarray::Array3;

use super::samples::{decode_samples, gunzip, voxel_count, Endian, ScalarType};

const NRRD_MAGIC: &[u8] = b"NRRD000";

#[derive(Debug, Default)]
struct NrrdFields {
    scalar: Option<ScalarType>,
    dimension: Option<usize>,
    sizes: Vec<usize>,
    encoding: Option<String>,
    endian: Option<Endian>,
    detached: bool,
}

fn scalar_from_type(name: &str) -> Option<ScalarType> {
    match name {
        "uchar" | "unsigned char" | "uint8" | "uint8_t" => Some(ScalarType::U8),
        "signed char" | "int8" | "int8_t" => Some(ScalarType::I8),
        "short" | "short int" | "signed short" | "signed short int" | "int16" | "int16_t" => {
            Some(ScalarType::I16)
        }
        "ushort" | "unsigned short" | "unsigned short int" | "uint16" | "uint16_t" => {
            Some(ScalarType::U16)
        }
        "int" | "signed int" | "int32" | "int32_t" => Some(ScalarType::I32),
        "uint" | "unsigned int" | "uint32" | "uint32_t" => Some(ScalarType::U32),
        "float" => Some(ScalarType::F32),
        "double" => Some(ScalarType::F64),
        _ => None,
    }
}

/// Split the buffer at the blank line ending the header.
fn split_header(buf: &[u8]) -> Option<(&str, &[u8])> {
    let end = buf.windows(2).position(|w| w == b"\n\n").map(|p| (p, p + 2)).or_else(|| {
        buf.windows(4)
            .position(|w| w == b"\r\n\r\n")
            .map(|p| (p, p + 4))
    })?;
    let header = std::str::from_utf8(&buf[..end.0]).ok()?;
    Some((header, &buf[end.1..]))
}

fn parse_fields(header: &str) -> Result<NrrdFields, String> {
    let mut fields = NrrdFields::default();
    for line in header.lines().skip(1) {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.contains(":=") {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "type" => {
                fields.scalar = Some(
                    scalar_from_type(value).ok_or_else(|| format!("unsupported type '{value}'"))?,
                )
            }
            "dimension" => {
                fields.dimension = Some(value.parse().map_err(|_| format!("bad dimension '{value}'"))?)
            }
            "sizes" => {
                fields.sizes = value
                    .split_whitespace()
                    .map(|s| s.parse::<usize>().map_err(|_| format!("bad size '{s}'")))
                    .collect::<Result<_, _>>()?
            }
            "encoding" => fields.encoding = Some(value.to_string()),
            "endian" => {
                fields.endian = match value {
                    "little" => Some(Endian::Little),
                    "big" => Some(Endian::Big),
                    other => return Err(format!("bad endian '{other}'")),
                }
            }
            "data file" | "datafile" => fields.detached = true,
            _ => {}
        }
    }
    Ok(fields)
}

/// Decode a 3-D NRRD volume with inline raw or gzip-encoded data.
pub(crate) fn decode(buf: &[u8]) -> Result<Array3<f32>, String> {
    if !buf.starts_with(NRRD_MAGIC) {
        return Err("missing NRRD magic".into());
    }
    let (header, data) = split_header(buf).ok_or("unterminated NRRD header")?;
    let fields = parse_fields(header)?;

    if fields.detached {
        return Err("detached NRRD data files are not supported".into());
    }
    let inflated = match fields.encoding.as_deref() {
        Some("raw") => None,
        Some("gzip") | Some("gz") => Some(gunzip(data)?),
        Some(other) => return Err(format!("unsupported encoding '{other}'")),
        None => return Err("missing encoding field".into()),
    };
    let data = inflated.as_deref().unwrap_or(data);
    let scalar = fields.scalar.ok_or("missing type field")?;
    if fields.dimension != Some(3) || fields.sizes.len() != 3 {
        return Err("only 3-D NRRD volumes are supported".into());
    }
    let endian = match (fields.endian, scalar.size()) {
        (Some(e), _) => e,
        (None, 1) => Endian::Little,
        (None, _) => return Err("missing endian field".into()),
    };

    let (x, y, z) = (fields.sizes[0], fields.sizes[1], fields.sizes[2]);
    if x == 0 || y == 0 || z == 0 {
        return Err(format!("invalid sizes {x} {y} {z}"));
    }
    let count = voxel_count(x, y, z)?;
    let samples = decode_samples(data, scalar, endian, count)
        .ok_or_else(|| format!("file truncated: expected {count} voxels"))?;

    Array3::from_shape_vec((z, y, x), samples).map_err(|e| e.to_string())
}
