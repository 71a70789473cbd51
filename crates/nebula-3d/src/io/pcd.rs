use std::collections::HashMap;
use std::io::{BufRead, Read};
use std::path::Path;

use crate::pointcloud::PointCloud;

const MAX_POINT_STEP: usize = 1024;
const MAX_POINTS: usize = 50_000_000;

/// Error types for the PCD module.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PcdError {
    /// Failed to read PCD file
    #[error("Failed to read PCD file")]
    Io(#[from] std::io::Error),

    /// Malformed PCD header
    #[error("Malformed PCD header")]
    MalformedHeader,

    /// Field layout the reader does not support
    #[error("Unsupported PCD field layout")]
    UnsupportedField,

    /// No x/y/z fields present
    #[error("No position data found in PCD file")]
    MissingPositions,

    /// Point payload shorter than the header promises
    #[error("PCD point data is truncated or corrupted")]
    CorruptedData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PcdEncoding {
    Ascii,
    Binary,
}

/// Describes a single field in a PCD point record.
#[derive(Debug)]
struct PcdField {
    offset: usize,      // byte offset within a binary point record
    token_index: usize, // first token index within an ascii point line
    size: usize,
    count: usize,
    kind: char, // PCD type: 'F' = float, 'U' = unsigned int, 'I' = signed int
}

#[derive(Debug)]
struct PcdLayout {
    fields: HashMap<String, PcdField>,
    encoding: PcdEncoding,
    point_step: usize,
    token_count: usize,
    num_points: usize,
}

impl PcdLayout {
    fn position_field(&self, name: &str) -> Result<&PcdField, PcdError> {
        let field = self.fields.get(name).ok_or(PcdError::MissingPositions)?;
        // positions must be single 4-byte floats
        if field.kind != 'F' || field.size != 4 || field.count != 1 {
            return Err(PcdError::UnsupportedField);
        }
        Ok(field)
    }
}

/// Read a little-endian f32 from a byte buffer.
#[inline]
fn read_f32(buf: &[u8], offset: usize) -> Result<f32, PcdError> {
    let slice = buf
        .get(offset..offset + 4)
        .ok_or(PcdError::CorruptedData)?;
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(slice);
    Ok(f32::from_le_bytes(bytes))
}

fn parse_layout<R: BufRead>(reader: &mut R) -> Result<PcdLayout, PcdError> {
    let mut field_names: Vec<String> = Vec::new();
    let mut sizes = Vec::new();
    let mut types = Vec::new();
    let mut counts = Vec::new();
    let mut num_points = 0usize;
    let encoding;

    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Err(PcdError::MalformedHeader);
        }
        let line = line.trim();

        if line.starts_with("DATA") {
            encoding = match line {
                "DATA ascii" => PcdEncoding::Ascii,
                "DATA binary" => PcdEncoding::Binary,
                _ => return Err(PcdError::UnsupportedField),
            };
            break;
        }

        let mut it = line.split_whitespace();
        match it.next() {
            Some("FIELDS") => field_names = it.map(String::from).collect(),
            Some("SIZE") => {
                sizes = it
                    .map(|v| v.parse::<usize>().map_err(|_| PcdError::MalformedHeader))
                    .collect::<Result<Vec<_>, _>>()?;
            }
            Some("TYPE") => {
                types = it
                    .map(|v| v.chars().next().ok_or(PcdError::MalformedHeader))
                    .collect::<Result<Vec<_>, _>>()?;
            }
            Some("COUNT") => {
                counts = it
                    .map(|v| v.parse::<usize>().map_err(|_| PcdError::MalformedHeader))
                    .collect::<Result<Vec<_>, _>>()?;
            }
            Some("POINTS") => {
                let token = it.next().ok_or(PcdError::MalformedHeader)?;
                num_points = token.parse().map_err(|_| PcdError::MalformedHeader)?;
            }
            _ => {}
        }
    }

    if field_names.is_empty()
        || sizes.len() != field_names.len()
        || types.len() != field_names.len()
        || (!counts.is_empty() && counts.len() != field_names.len())
    {
        return Err(PcdError::MalformedHeader);
    }

    if num_points > MAX_POINTS {
        return Err(PcdError::MalformedHeader);
    }

    // compute byte offsets and ascii token indices for each field
    let mut offset = 0usize;
    let mut token_index = 0usize;
    let mut fields = HashMap::new();

    for i in 0..field_names.len() {
        // if COUNT is omitted, the PCD spec defines a default count of 1
        let count = counts.get(i).copied().unwrap_or(1);
        let size = sizes[i];

        let field_bytes = size.checked_mul(count).ok_or(PcdError::MalformedHeader)?;
        let field = PcdField {
            offset,
            token_index,
            size,
            count,
            kind: types[i],
        };

        offset = offset
            .checked_add(field_bytes)
            .ok_or(PcdError::MalformedHeader)?;
        token_index += count;

        if offset > MAX_POINT_STEP {
            return Err(PcdError::MalformedHeader);
        }
        if fields.insert(field_names[i].clone(), field).is_some() {
            return Err(PcdError::MalformedHeader);
        }
    }

    Ok(PcdLayout {
        fields,
        encoding,
        point_step: offset,
        token_count: token_index,
        num_points,
    })
}

fn read_points_binary<R: Read>(
    reader: &mut R,
    layout: &PcdLayout,
) -> Result<Vec<[f64; 3]>, PcdError> {
    let fx = layout.position_field("x")?.offset;
    let fy = layout.position_field("y")?.offset;
    let fz = layout.position_field("z")?.offset;

    let mut buffer = vec![0u8; layout.point_step];
    let mut points = Vec::with_capacity(layout.num_points);

    for _ in 0..layout.num_points {
        reader
            .read_exact(&mut buffer)
            .map_err(|_| PcdError::CorruptedData)?;
        points.push([
            read_f32(&buffer, fx)? as f64,
            read_f32(&buffer, fy)? as f64,
            read_f32(&buffer, fz)? as f64,
        ]);
    }
    Ok(points)
}

fn read_points_ascii<R: BufRead>(
    reader: &mut R,
    layout: &PcdLayout,
) -> Result<Vec<[f64; 3]>, PcdError> {
    let ix = layout.position_field("x")?.token_index;
    let iy = layout.position_field("y")?.token_index;
    let iz = layout.position_field("z")?.token_index;

    let mut line = String::new();
    let mut points = Vec::with_capacity(layout.num_points);

    for _ in 0..layout.num_points {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(PcdError::CorruptedData);
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < layout.token_count {
            return Err(PcdError::CorruptedData);
        }
        let coord = |i: usize| -> Result<f64, PcdError> {
            tokens[i].parse().map_err(|_| PcdError::CorruptedData)
        };
        points.push([coord(ix)?, coord(iy)?, coord(iz)?]);
    }
    Ok(points)
}

fn parse_pcd<R: BufRead>(reader: &mut R) -> Result<PointCloud, PcdError> {
    let layout = parse_layout(reader)?;
    let points = match layout.encoding {
        PcdEncoding::Ascii => read_points_ascii(reader, &layout)?,
        PcdEncoding::Binary => read_points_binary(reader, &layout)?,
    };
    Ok(PointCloud::new(points))
}

/// Read a PCD file in ASCII or binary format, extracting point positions
/// only.
///
/// # Supported layouts
/// - `x y z` as single 4-byte floats, in any field order
/// - additional fields (rgb, intensity, normals, ...) are skipped by offset
pub fn read_pcd(path: impl AsRef<Path>) -> Result<PointCloud, PcdError> {
    let file = std::fs::File::open(path)?;
    let mut reader = std::io::BufReader::new(file);
    parse_pcd(&mut reader)
}
