//! Bone capture (skin weight) encoding.
//!
//! Capture indices are stored per page of [`PAGE_SIZE`] points and, inside a
//! page, slot by slot: every point's first bone index, then every point's
//! second bone index, and so on.

use crate::geo::SkinCapture;
use crate::json::{narrow_i32, BinaryJsonWriter};
use crate::util::{transposed_entries, Result};

use super::attrib::{write_attribute_header, write_paged_real32};
use super::PAGE_SIZE;

/// Rows of the per-bone capture table.
pub const CAPTURE_DATA_ROWS: usize = 20;

/// Name of the per-point capture attribute.
pub const BONE_CAPTURE_ATTRIBUTE: &str = "boneCapture";

/// Default `pCaptData` entry: identity 4x4 followed by four ones.
const CAPTURE_DATA_DEFAULTS: [f32; CAPTURE_DATA_ROWS] = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0, //
    1.0, 1.0, 1.0, 1.0,
];

/// Capture data laid out the way it is stored.
#[derive(Clone, Debug, PartialEq)]
pub struct PackedCapture {
    /// `CAPTURE_DATA_ROWS` rows, one entry per bone.
    pub capture_data: Vec<Vec<f32>>,
    pub max_influences: usize,
    /// `points * max_influences` bone indices, paged and slot-major, `-1` when unused.
    pub bone_indices: Vec<i32>,
    /// One array per influence slot, one weight per point, `-1.0` when unused.
    pub weights: Vec<Vec<f32>>,
}

/// Lay out `capture` for writing.
pub fn pack_capture(capture: &SkinCapture) -> Result<PackedCapture> {
    let mut capture_data = vec![Vec::with_capacity(capture.bones.len()); CAPTURE_DATA_ROWS];
    for bone in &capture.bones {
        let entries = transposed_entries(&bone.transform);
        for (row, value) in entries.iter().enumerate() {
            capture_data[row].push(*value);
        }
        for row in &mut capture_data[16..] {
            row.push(1.0);
        }
    }

    let point_count = capture.influences.len();
    let max_influences = capture.max_influences();

    let mut bone_indices = vec![-1i32; point_count * max_influences];
    for page_start in (0..point_count).step_by(PAGE_SIZE) {
        let page_len = PAGE_SIZE.min(point_count - page_start);
        let page_base = max_influences * page_start;
        for offset in 0..page_len {
            for (slot, &(bone, _)) in capture.influences[page_start + offset].iter().enumerate() {
                bone_indices[page_base + slot * page_len + offset] = narrow_i32(bone as i64)?;
            }
        }
    }

    let weights = (0..max_influences)
        .map(|slot| {
            capture
                .influences
                .iter()
                .map(|influences| influences.get(slot).map_or(-1.0, |&(_, weight)| weight))
                .collect()
        })
        .collect();

    Ok(PackedCapture { capture_data, max_influences, bone_indices, weights })
}

/// Write the `boneCapture` point attribute.
pub(crate) fn write_bone_capture(w: &mut BinaryJsonWriter, capture: &SkinCapture) -> Result<()> {
    let packed = pack_capture(capture)?;
    tracing::trace!(
        bones = capture.bones.len(),
        max_influences = packed.max_influences,
        "bone capture"
    );

    w.array_block(|w| {
        write_attribute_header(w, "indexpair", BONE_CAPTURE_ATTRIBUTE, None)?;
        write_bone_capture_values(w, capture, &packed)
    })
}

fn write_bone_capture_values(
    w: &mut BinaryJsonWriter,
    capture: &SkinCapture,
    packed: &PackedCapture,
) -> Result<()> {
    let entries = packed.max_influences as i64;

    w.array_block(|w| {
        w.write_id_string("idefault")?;
        w.array_block(|w| {
            w.write_attribute_size_storage(1, "int64")?;

            w.write_id_string("values")?;
            w.write_int64_uniform_array(&[-1])
        })?;

        w.write_id_string("vdefault")?;
        w.array_block(|w| {
            w.write_attribute_size_storage(1, "fpreal64")?;

            w.write_id_string("values")?;
            w.write_real64_uniform_array(&[-1.0])
        })?;

        w.write_id_string("objectsets")?;
        w.array_block(|w| {
            w.array_block(|w| {
                w.write_id_string("entries")?;
                w.write_int(capture.bones.len() as i64)?;

                w.write_id_string("properties")?;
                w.array_block(|w| {
                    write_capture_paths(w, capture)?;
                    write_capture_data(w, packed)
                })
            })
        })?;

        w.write_id_string("istorage")?;
        w.write_id_string("int32")?;

        w.write_id_string("vsize")?;
        w.write_int(1)?;

        w.write_id_string("vstorage")?;
        w.write_id_string("fpreal32")?;

        w.write_id_string("entries")?;
        w.write_int(entries)?;

        w.write_id_string("index")?;
        w.array_block(|w| {
            w.write_attribute_size_storage(entries, "int32")?;

            w.write_id_string("pagesize")?;
            w.write_int(PAGE_SIZE as i64)?;

            w.write_id_string("packing")?;
            w.write_uint8_uniform_array(&vec![1u8; packed.max_influences])?;

            w.write_id_string("rawpagedata")?;
            w.write_int32_uniform_array(&packed.bone_indices)
        })?;

        w.write_id_string("value")?;
        w.array_block(|w| {
            for weights in &packed.weights {
                write_paged_real32(w, 1, weights)?;
            }
            Ok(())
        })
    })
}

/// `pCaptPath`: bone names as literal strings.
fn write_capture_paths(w: &mut BinaryJsonWriter, capture: &SkinCapture) -> Result<()> {
    w.array_block(|w| {
        w.write_id_string("name")?;
        w.write_string("pCaptPath")?;

        w.write_id_string("storage")?;
        w.write_id_string("string")?;

        w.write_id_string("size")?;
        w.write_int(1)?;

        w.write_id_string("defaults")?;
        w.array_block(|w| w.write_string(""))?;

        w.write_id_string("value")?;
        w.array_block(|w| {
            w.array_block(|w| {
                for name in capture.bone_names() {
                    w.write_string(name)?;
                }
                Ok(())
            })
        })
    })
}

/// `pCaptData`: the 20-row per-bone table.
fn write_capture_data(w: &mut BinaryJsonWriter, packed: &PackedCapture) -> Result<()> {
    w.array_block(|w| {
        w.write_id_string("name")?;
        w.write_string("pCaptData")?;

        w.write_id_string("storage")?;
        w.write_id_string("fpreal32")?;

        w.write_id_string("size")?;
        w.write_int(CAPTURE_DATA_ROWS as i64)?;

        w.write_id_string("defaults")?;
        w.array_block(|w| {
            for value in CAPTURE_DATA_DEFAULTS {
                w.write_real32(value)?;
            }
            Ok(())
        })?;

        w.write_id_string("value")?;
        w.array_block(|w| {
            for row in &packed.capture_data {
                w.write_real32_uniform_array(row)?;
            }
            Ok(())
        })
    })
}

/// Write the skeleton's detail attributes: `capt_names`, `capt_parents`, `capt_xforms`.
pub(crate) fn write_capture_globals(w: &mut BinaryJsonWriter, capture: &SkinCapture) -> Result<()> {
    let names: Vec<&str> = capture.bone_names().collect();
    let identity: Vec<i32> = (0..names.len())
        .map(|i| narrow_i32(i as i64))
        .collect::<Result<_>>()?;
    let parents: Vec<i32> = capture.bones.iter().map(|b| b.parent).collect();
    let xforms: Vec<f32> = capture
        .bones
        .iter()
        .flat_map(|b| transposed_entries(&b.transform))
        .collect();

    w.array_block(|w| {
        write_attribute_header(w, "string", "capt_names", None)?;
        w.array_block(|w| {
            w.write_attribute_size_storage(1, "int32")?;

            w.write_id_string("strings")?;
            w.array_block(|w| {
                for name in &names {
                    w.write_id_string(name)?;
                }
                Ok(())
            })?;

            w.write_id_string("indices")?;
            w.array_block(|w| w.write_int32_uniform_array(&identity))
        })
    })?;

    w.array_block(|w| {
        write_attribute_header(w, "numeric", "capt_parents", None)?;
        w.array_block(|w| {
            w.write_attribute_size_storage(1, "int32")?;

            w.write_id_string("values")?;
            w.array_block(|w| w.write_int32_uniform_array(&parents))
        })
    })?;

    w.array_block(|w| {
        write_attribute_header(w, "numeric", "capt_xforms", None)?;
        w.array_block(|w| {
            w.write_attribute_size_storage(16, "fpreal32")?;

            w.write_id_string("values")?;
            w.array_block(|w| w.write_real32_uniform_array(&xforms))
        })
    })
}
