use std::io::{BufRead, Read};
use std::path::Path;

use crate::pointcloud::PointCloud;

const MAX_VERTICES: usize = 50_000_000;
const MAX_VERTEX_STRIDE: usize = 1024;

/// Error types for the PLY module.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PlyError {
    /// Failed to read PLY file
    #[error("Failed to read PLY file")]
    Io(#[from] std::io::Error),

    /// Malformed PLY header
    #[error("Malformed PLY header")]
    MalformedHeader,

    /// Unsupported PLY format or property layout
    #[error("Unsupported PLY format")]
    UnsupportedFormat,

    /// No position data found
    #[error("No position data found in PLY file")]
    MissingPositions,

    /// Vertex payload shorter than the header promises
    #[error("PLY vertex data is truncated or corrupted")]
    CorruptedData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlyEncoding {
    Ascii,
    BinaryLittleEndian,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScalarType {
    Float32,
    Float64,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
}

impl ScalarType {
    fn parse(token: &str) -> Result<Self, PlyError> {
        match token {
            "float" | "float32" => Ok(Self::Float32),
            "double" | "float64" => Ok(Self::Float64),
            "char" | "int8" => Ok(Self::Int8),
            "uchar" | "uint8" => Ok(Self::UInt8),
            "short" | "int16" => Ok(Self::Int16),
            "ushort" | "uint16" => Ok(Self::UInt16),
            "int" | "int32" => Ok(Self::Int32),
            "uint" | "uint32" => Ok(Self::UInt32),
            _ => Err(PlyError::UnsupportedFormat),
        }
    }

    fn size(self) -> usize {
        match self {
            Self::Float64 => 8,
            Self::Float32 | Self::Int32 | Self::UInt32 => 4,
            Self::Int16 | Self::UInt16 => 2,
            Self::Int8 | Self::UInt8 => 1,
        }
    }

    /// Decode a little-endian coordinate at `offset`. Only float positions
    /// are accepted, so the integer variants never reach this.
    fn read_f64(self, buf: &[u8], offset: usize) -> Result<f64, PlyError> {
        match self {
            Self::Float32 => {
                let slice = buf.get(offset..offset + 4).ok_or(PlyError::CorruptedData)?;
                let mut bytes = [0u8; 4];
                bytes.copy_from_slice(slice);
                Ok(f32::from_le_bytes(bytes) as f64)
            }
            Self::Float64 => {
                let slice = buf.get(offset..offset + 8).ok_or(PlyError::CorruptedData)?;
                let mut bytes = [0u8; 8];
                bytes.copy_from_slice(slice);
                Ok(f64::from_le_bytes(bytes))
            }
            _ => Err(PlyError::UnsupportedFormat),
        }
    }
}

#[derive(Debug)]
struct PlyProperty {
    name: String,
    data_type: ScalarType,
    offset: usize,
    index: usize,
}

#[derive(Debug)]
struct PlyHeader {
    encoding: PlyEncoding,
    vertex_count: usize,
    stride: usize,
    properties: Vec<PlyProperty>,
}

impl PlyHeader {
    fn position_property(&self, name: &str) -> Result<&PlyProperty, PlyError> {
        let prop = self
            .properties
            .iter()
            .find(|p| p.name == name)
            .ok_or(PlyError::MissingPositions)?;
        match prop.data_type {
            ScalarType::Float32 | ScalarType::Float64 => Ok(prop),
            _ => Err(PlyError::UnsupportedFormat),
        }
    }
}

fn parse_header<R: BufRead>(reader: &mut R) -> Result<PlyHeader, PlyError> {
    let mut line = String::new();
    let mut encoding = None;
    let mut vertex_count = None;
    let mut is_ply = false;
    let mut in_vertex_element = false;
    let mut seen_other_element = false;
    let mut properties: Vec<PlyProperty> = Vec::new();
    let mut stride = 0usize;
    let mut index = 0usize;

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(PlyError::MalformedHeader);
        }
        let trimmed = line.trim();

        if trimmed == "ply" {
            is_ply = true;
            continue;
        }
        if trimmed == "end_header" {
            break;
        }

        if trimmed.starts_with("format") {
            encoding = Some(match trimmed.split_whitespace().nth(1) {
                Some("ascii") => PlyEncoding::Ascii,
                Some("binary_little_endian") => PlyEncoding::BinaryLittleEndian,
                _ => return Err(PlyError::UnsupportedFormat),
            });
        } else if trimmed.starts_with("element") {
            let parts: Vec<&str> = trimmed.split_whitespace().collect();
            if parts.len() < 3 {
                return Err(PlyError::MalformedHeader);
            }
            if parts[1] == "vertex" {
                // vertex data must come first so byte offsets stay computable
                if vertex_count.is_some() || seen_other_element {
                    return Err(PlyError::UnsupportedFormat);
                }
                vertex_count =
                    Some(parts[2].parse().map_err(|_| PlyError::MalformedHeader)?);
                in_vertex_element = true;
            } else {
                seen_other_element = true;
                in_vertex_element = false;
            }
        } else if trimmed.starts_with("property") && in_vertex_element {
            let parts: Vec<&str> = trimmed.split_whitespace().collect();
            if parts.len() < 3 {
                return Err(PlyError::MalformedHeader);
            }
            if parts[1] == "list" {
                return Err(PlyError::UnsupportedFormat);
            }
            let data_type = ScalarType::parse(parts[1])?;
            properties.push(PlyProperty {
                name: parts[2].to_string(),
                data_type,
                offset: stride,
                index,
            });
            stride += data_type.size();
            index += 1;
            if stride > MAX_VERTEX_STRIDE {
                return Err(PlyError::MalformedHeader);
            }
        }
    }

    if !is_ply {
        return Err(PlyError::MalformedHeader);
    }
    let encoding = encoding.ok_or(PlyError::MalformedHeader)?;
    let vertex_count = vertex_count.ok_or(PlyError::MissingPositions)?;
    if vertex_count > MAX_VERTICES {
        return Err(PlyError::MalformedHeader);
    }

    Ok(PlyHeader {
        encoding,
        vertex_count,
        stride,
        properties,
    })
}

fn read_vertices_binary<R: Read>(
    reader: &mut R,
    header: &PlyHeader,
) -> Result<Vec<[f64; 3]>, PlyError> {
    let px = header.position_property("x")?;
    let py = header.position_property("y")?;
    let pz = header.position_property("z")?;

    let mut buffer = vec![0u8; header.stride];
    let mut points = Vec::with_capacity(header.vertex_count);

    for _ in 0..header.vertex_count {
        reader
            .read_exact(&mut buffer)
            .map_err(|_| PlyError::CorruptedData)?;
        points.push([
            px.data_type.read_f64(&buffer, px.offset)?,
            py.data_type.read_f64(&buffer, py.offset)?,
            pz.data_type.read_f64(&buffer, pz.offset)?,
        ]);
    }
    Ok(points)
}

fn read_vertices_ascii<R: BufRead>(
    reader: &mut R,
    header: &PlyHeader,
) -> Result<Vec<[f64; 3]>, PlyError> {
    let ix = header.position_property("x")?.index;
    let iy = header.position_property("y")?.index;
    let iz = header.position_property("z")?.index;

    let mut line = String::new();
    let mut points = Vec::with_capacity(header.vertex_count);

    for _ in 0..header.vertex_count {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(PlyError::CorruptedData);
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < header.properties.len() {
            return Err(PlyError::CorruptedData);
        }
        let coord = |i: usize| -> Result<f64, PlyError> {
            tokens[i].parse().map_err(|_| PlyError::CorruptedData)
        };
        points.push([coord(ix)?, coord(iy)?, coord(iz)?]);
    }
    Ok(points)
}

fn parse_ply<R: BufRead>(reader: &mut R) -> Result<PointCloud, PlyError> {
    let header = parse_header(reader)?;
    let points = match header.encoding {
        PlyEncoding::Ascii => read_vertices_ascii(reader, &header)?,
        PlyEncoding::BinaryLittleEndian => read_vertices_binary(reader, &header)?,
    };
    Ok(PointCloud::new(points))
}

/// Read a PLY file in ASCII or binary-little-endian format, extracting
/// vertex positions only.
pub fn read_ply(path: impl AsRef<Path>) -> Result<PointCloud, PlyError> {
    let file = std::fs::File::open(path)?;
    let mut reader = std::io::BufReader::new(file);
    parse_ply(&mut reader)
}
