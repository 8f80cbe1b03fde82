//! Geometry serializer.
//!
//! Maps a [`GeometryUnit`] onto the binary JSON schema of `.bgeo` files, or
//! packs several already serialized units into one packed-geometry file.
//!
//! Every call uses a fresh [`BinaryJsonWriter`], so id-string tables never
//! cross units. Serialization is all-or-nothing: on error no bytes are
//! returned.

mod attrib;
mod capture;
mod packed;
mod primitives;

pub use capture::{pack_capture, PackedCapture, BONE_CAPTURE_ATTRIBUTE, CAPTURE_DATA_ROWS};
pub use primitives::{loop_count_rle, loop_count_runs};

use crate::geo::{Attribute, GeometryUnit, PackedUnit};
use crate::json::BinaryJsonWriter;
use crate::util::{Result, WriteOptions};

use attrib::write_attribute;

/// Geometry file version written to every file.
pub const GEO_FILE_VERSION: &str = "20.5.410";

/// Elements per page of paged attribute data.
pub const PAGE_SIZE: usize = 1024;

/// Position written in the legacy index section.
const INDEX_POSITION: i64 = 102;

/// Serializes geometry units and packed containers.
#[derive(Clone, Debug, Default)]
pub struct Converter {
    options: WriteOptions,
}

/// Header counts of a serialized unit.
struct Counts {
    points: usize,
    vertices: usize,
    primitives: usize,
}

impl Converter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: WriteOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &WriteOptions {
        &self.options
    }

    /// Serialize one geometry unit into a complete `.bgeo` buffer.
    pub fn convert(&self, unit: &GeometryUnit) -> Result<Vec<u8>> {
        let counts = Counts {
            points: unit.point_count(),
            vertices: unit.vertex_count(),
            primitives: unit.primitive_count(),
        };
        tracing::debug!(
            points = counts.points,
            vertices = counts.vertices,
            primitives = counts.primitives,
            curves = unit.curves.len(),
            "serializing geometry unit"
        );

        if let Some(capture) = &unit.capture {
            capture.validate(counts.points)?;
        }

        let mut w = BinaryJsonWriter::new();
        w.array_block(|w| {
            self.write_header(w, &counts)?;
            write_topology(w, &unit.indices)?;

            w.write_id_string("attributes")?;
            w.array_block(|w| write_attribute_sets(w, unit))?;

            w.write_id_string("primitives")?;
            primitives::write_primitives(w, unit)?;

            if !unit.edge_groups.is_empty() {
                w.write_id_string("edgegroups")?;
                primitives::write_edge_groups(w, &unit.edge_groups)?;
            }

            if self.options.write_index {
                write_index_section(w)?;
            }
            Ok(())
        })?;

        let bytes = w.finish()?;
        tracing::debug!(bytes = bytes.len(), "geometry unit serialized");
        Ok(bytes)
    }

    /// Pack already serialized units into one file of packed primitives.
    pub fn pack(&self, units: &[PackedUnit]) -> Result<Vec<u8>> {
        let _span = tracing::info_span!("pack", units = units.len()).entered();
        packed::pack(self, units)
    }

    /// `fileversion` through `info`.
    fn write_header(&self, w: &mut BinaryJsonWriter, counts: &Counts) -> Result<()> {
        w.write_id_string("fileversion")?;
        w.write_id_string(GEO_FILE_VERSION)?;

        w.write_id_string("hasindex")?;
        w.write_bool(self.options.write_index);

        w.write_id_string("pointcount")?;
        w.write_int(counts.points as i64)?;

        w.write_id_string("vertexcount")?;
        w.write_int(counts.vertices as i64)?;

        w.write_id_string("primitivecount")?;
        w.write_int(counts.primitives as i64)?;

        w.write_id_string("info")?;
        w.map_block(|w| {
            w.write_id_string("software")?;
            w.write_id_string(&self.options.software)
        })
    }
}

/// `topology` / `pointref` / `indices`.
fn write_topology(w: &mut BinaryJsonWriter, indices: &[u32]) -> Result<()> {
    w.write_id_string("topology")?;
    w.array_block(|w| {
        w.write_id_string("pointref")?;
        w.array_block(|w| {
            w.write_id_string("indices")?;
            w.write_auto_int_uniform_array(indices)
        })
    })
}

fn write_attribute_list(w: &mut BinaryJsonWriter, key: &str, attributes: &[Attribute]) -> Result<()> {
    if attributes.is_empty() {
        return Ok(());
    }
    w.write_id_string(key)?;
    w.array_block(|w| {
        for attrib in attributes {
            write_attribute(w, attrib)?;
        }
        Ok(())
    })
}

/// Vertex, point, primitive and global attribute sets, each skipped when empty.
fn write_attribute_sets(w: &mut BinaryJsonWriter, unit: &GeometryUnit) -> Result<()> {
    write_attribute_list(w, "vertexattributes", &unit.vertex_attributes)?;

    match &unit.capture {
        Some(capture) => {
            w.write_id_string("pointattributes")?;
            w.array_block(|w| {
                for attrib in &unit.point_attributes {
                    write_attribute(w, attrib)?;
                }
                capture::write_bone_capture(w, capture)
            })?;
        }
        None => write_attribute_list(w, "pointattributes", &unit.point_attributes)?,
    }

    write_attribute_list(w, "primitiveattributes", &unit.primitive_attributes)?;

    if let Some(capture) = &unit.capture {
        w.write_id_string("globalattributes")?;
        w.array_block(|w| capture::write_capture_globals(w, capture))?;
    }
    Ok(())
}

/// Legacy index section, written only when `hasindex` is set.
fn write_index_section(w: &mut BinaryJsonWriter) -> Result<()> {
    w.write_string("index")?;
    w.array_block(|w| {
        for key in ["integerentries", "stringentries", "integerkeyentries", "stringkeyentries"] {
            w.write_string(key)?;
            w.map_block(|_| Ok(()))?;
        }
        Ok(())
    })?;
    w.write_string("indexposition")?;
    w.write_int64(INDEX_POSITION)
}
