//! Attribute blocks.

use crate::geo::{Attribute, AttributeValues, StringList, TypeHint};
use crate::json::BinaryJsonWriter;
use crate::util::{flatten_mat3, flatten_vec2, flatten_vec3, Result};

use super::PAGE_SIZE;

/// Scope written for every attribute.
pub(crate) const PUBLIC_SCOPE: &str = "public";

/// Write one attribute: `[[info, options], values]`.
pub(crate) fn write_attribute(w: &mut BinaryJsonWriter, attrib: &Attribute) -> Result<()> {
    tracing::trace!(name = %attrib.name, len = attrib.len(), "attribute");
    w.array_block(|w| {
        write_attribute_header(w, attrib.values.type_name(), &attrib.name, attrib.hint)?;
        write_attribute_values(w, &attrib.values)
    })
}

/// `[scope, type, name, options]`.
pub(crate) fn write_attribute_header(
    w: &mut BinaryJsonWriter,
    type_name: &str,
    name: &str,
    hint: Option<TypeHint>,
) -> Result<()> {
    w.array_block(|w| {
        w.write_attribute_info(PUBLIC_SCOPE, type_name, name)?;
        w.write_attribute_options(hint.map(TypeHint::as_str))
    })
}

pub(crate) fn write_attribute_values(w: &mut BinaryJsonWriter, values: &AttributeValues) -> Result<()> {
    match values {
        AttributeValues::Float(v) => write_numeric_values(w, 1, v),
        AttributeValues::Vector2(v) => write_numeric_values(w, 2, flatten_vec2(v)),
        AttributeValues::Vector3(v) => write_numeric_values(w, 3, flatten_vec3(v)),
        AttributeValues::Matrix3(v) => write_numeric_values(w, 9, flatten_mat3(v)),
        AttributeValues::String(list) => write_string_values(w, list),
    }
}

/// Paged fpreal32 data with a single fpreal64 zero default.
pub(crate) fn write_numeric_values(w: &mut BinaryJsonWriter, size: i64, data: &[f32]) -> Result<()> {
    w.array_block(|w| {
        w.write_attribute_size_storage(size, "fpreal32")?;

        w.write_id_string("defaults")?;
        w.array_block(|w| {
            w.write_attribute_size_storage(1, "fpreal64")?;

            w.write_id_string("values")?;
            w.write_real64_uniform_array(&[0.0])
        })?;

        w.write_id_string("values")?;
        write_paged_real32(w, size, data)
    })
}

/// `[size, fpreal32, pagesize, rawpagedata]`.
pub(crate) fn write_paged_real32(w: &mut BinaryJsonWriter, size: i64, data: &[f32]) -> Result<()> {
    w.array_block(|w| {
        w.write_attribute_size_storage(size, "fpreal32")?;

        w.write_id_string("pagesize")?;
        w.write_int(PAGE_SIZE as i64)?;

        w.write_id_string("rawpagedata")?;
        w.write_real32_uniform_array(data)
    })
}

/// Distinct strings plus one table index per element.
pub(crate) fn write_string_values(w: &mut BinaryJsonWriter, list: &StringList) -> Result<()> {
    w.array_block(|w| {
        w.write_attribute_size_storage(1, "int32")?;

        w.write_id_string("strings")?;
        w.array_block(|w| {
            for s in list.strings() {
                w.write_id_string(s)?;
            }
            Ok(())
        })?;

        w.write_id_string("indices")?;
        w.array_block(|w| {
            w.write_attribute_size_storage(1, "int32")?;

            w.write_id_string("pagesize")?;
            w.write_int(PAGE_SIZE as i64)?;

            w.write_id_string("rawpagedata")?;
            w.write_auto_int_uniform_array(list.indices())
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::constants::*;
    use crate::util::Vec3;

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn test_vector3_values_are_flattened() -> Result<()> {
        let mut w = BinaryJsonWriter::new();
        let values = AttributeValues::Vector3(vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0)]);
        write_attribute_values(&mut w, &values)?;
        let out = w.finish()?;

        let mut raw = vec![UNIFORM_ARRAY, TAG_REAL32, 6];
        for f in [1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0] {
            raw.extend_from_slice(&f.to_le_bytes());
        }
        assert!(contains(&out, &raw));

        // Default is a single fpreal64 zero.
        let mut default = vec![UNIFORM_ARRAY, TAG_REAL64, 1];
        default.extend_from_slice(&0.0f64.to_le_bytes());
        assert!(contains(&out, &default));
        Ok(())
    }

    #[test]
    fn test_size_follows_variant() -> Result<()> {
        let mut w = BinaryJsonWriter::new();
        write_attribute_values(&mut w, &AttributeValues::Matrix3(vec![[0.0; 9]]))?;
        let out = w.finish()?;
        // "size" is the first id string, followed by the int8 size tag.
        assert_eq!(&out[MAGIC_SIZE + 1..MAGIC_SIZE + 8], &[b'+', 0, 4, b's', b'i', b'z', b'e']);
        assert_eq!(&out[MAGIC_SIZE + 8..MAGIC_SIZE + 12], &[b'&', 0, TAG_INT8, 9]);
        Ok(())
    }

    #[test]
    fn test_string_values() -> Result<()> {
        let list = StringList::from_values(["wood", "", "wood", "steel"]);
        let mut w = BinaryJsonWriter::new();
        write_string_values(&mut w, &list)?;
        assert!(w.id_index("wood").is_some());
        assert!(w.id_index("steel").is_some());
        let out = w.finish()?;

        assert!(contains(&out, &[UNIFORM_ARRAY, TAG_INT8, 4, 0, 0xff, 0, 1]));
        Ok(())
    }

    #[test]
    fn test_attribute_header_without_hint() -> Result<()> {
        let attrib = Attribute::numeric("radius").with_values(AttributeValues::Float(vec![0.5]));
        let mut w = BinaryJsonWriter::new();
        write_attribute(&mut w, &attrib)?;
        assert!(w.id_index("public").is_some());
        assert!(w.id_index("numeric").is_some());
        assert!(w.id_index("radius").is_some());
        let out = w.finish()?;
        assert!(contains(&out, b"{}"));
        Ok(())
    }
}
