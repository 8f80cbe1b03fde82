//! Packed geometry container.

use crate::geo::{Attribute, AttributeValues, PackedUnit, StringList};
use crate::json::{magic_header, BinaryJsonWriter, MAGIC_SIZE};
use crate::util::{Error, Result};

use super::attrib::write_attribute;
use super::{Converter, Counts};

/// Primitive type of every packed primitive.
const PACKED_GEOMETRY: &str = "PackedGeometry";

/// Shared data key of an embedded geometry.
const EMBEDDED_GEO: &str = "gu:embeddedgeo";

/// Id index the shared data section redefines for [`PACKED_GEOMETRY`].
const SHARED_TYPE_ID: u64 = 0;

/// One point and one packed primitive per unit, with each unit's payload
/// embedded in `sharedprimitivedata`.
pub(super) fn pack(converter: &Converter, units: &[PackedUnit]) -> Result<Vec<u8>> {
    let payloads = units
        .iter()
        .map(|unit| embedded_payload(unit).map(|payload| (unit.embed_key(), payload)))
        .collect::<Result<Vec<_>>>()?;

    let counts = Counts { points: units.len(), vertices: units.len(), primitives: units.len() };
    let point_indices: Vec<u32> = (0..units.len() as u32).collect();
    let point_attributes = [Attribute::point()
        .with_values(AttributeValues::Vector3(units.iter().map(|u| u.position).collect()))];
    let primitive_attributes = [
        Attribute::string("type")
            .with_hint(None)
            .with_values(AttributeValues::String(StringList::from_values(units.iter().map(|u| &u.type_name)))),
        Attribute::string("name")
            .with_hint(None)
            .with_values(AttributeValues::String(StringList::from_values(units.iter().map(|u| &u.name)))),
    ];

    let mut w = BinaryJsonWriter::new();
    w.array_block(|w| {
        converter.write_header(w, &counts)?;
        super::write_topology(w, &point_indices)?;

        w.write_id_string("attributes")?;
        w.array_block(|w| {
            w.write_id_string("pointattributes")?;
            w.array_block(|w| write_attribute(w, &point_attributes[0]))?;

            w.write_id_string("primitiveattributes")?;
            w.array_block(|w| {
                for attrib in &primitive_attributes {
                    write_attribute(w, attrib)?;
                }
                Ok(())
            })
        })?;

        w.write_id_string("primitives")?;
        w.array_block(|w| {
            for (i, (unit, (key, _))) in units.iter().zip(&payloads).enumerate() {
                write_packed_primitive(w, i, unit, key)?;
            }
            Ok(())
        })?;

        w.write_id_string("sharedprimitivedata")?;
        w.array_block(|w| {
            for (key, payload) in &payloads {
                w.write_id_definition_at(SHARED_TYPE_ID, PACKED_GEOMETRY)?;
                w.array_block(|w| {
                    w.write_string(EMBEDDED_GEO)?;
                    w.write_string(key)?;
                    w.write_raw(payload);
                    Ok(())
                })?;
            }
            Ok(())
        })
    })?;

    let bytes = w.finish()?;
    tracing::debug!(units = units.len(), bytes = bytes.len(), "packed geometry serialized");
    Ok(bytes)
}

/// Serialized unit without its magic header.
fn embedded_payload(unit: &PackedUnit) -> Result<&[u8]> {
    if unit.bgeo.len() < MAGIC_SIZE || unit.bgeo[..MAGIC_SIZE] != magic_header() {
        return Err(Error::InvalidEmbeddedPayload(unit.embed_key()));
    }
    Ok(&unit.bgeo[MAGIC_SIZE..])
}

fn write_packed_primitive(w: &mut BinaryJsonWriter, vertex: usize, unit: &PackedUnit, key: &str) -> Result<()> {
    w.array_block(|w| {
        w.array_block(|w| {
            w.write_id_string("type")?;
            w.write_id_string(PACKED_GEOMETRY)
        })?;
        w.array_block(|w| {
            w.write_id_string("parameters")?;
            w.map_block(|w| {
                w.write_id_string("embedded")?;
                w.write_id_string(key)?;

                w.write_id_string("pointinstancetransform")?;
                w.write_int(0)?;

                w.write_id_string("treatasfolder")?;
                w.write_int(0)
            })?;

            w.write_id_string("pivot")?;
            w.write_real32_uniform_array(&unit.pivot.to_array())?;

            w.write_id_string("transform")?;
            w.write_real64_uniform_array(&unit.transform)?;

            w.write_id_string("vertex")?;
            w.write_int(vertex as i64)?;

            w.write_id_string("viewportlod")?;
            w.write_id_string("full")
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeometryUnit;
    use crate::util::Vec3;

    fn tiny_unit() -> Result<Vec<u8>> {
        let mut unit = GeometryUnit::new();
        unit.point_attributes.push(
            Attribute::point().with_values(AttributeValues::Vector3(vec![Vec3::ZERO, Vec3::X, Vec3::Y])),
        );
        unit.push_polygon(&[0, 1, 2]);
        Converter::new().convert(&unit)
    }

    #[test]
    fn test_payload_is_embedded_without_magic() -> Result<()> {
        let bgeo = tiny_unit()?;
        let packed = Converter::new().pack(&[PackedUnit::new(1, bgeo.clone(), "MESH", "tri")])?;
        let payload = &bgeo[MAGIC_SIZE..];
        assert!(packed.windows(payload.len()).any(|w| w == payload));
        assert!(packed.ends_with(&[b']', b']', b']']));
        Ok(())
    }

    #[test]
    fn test_invalid_payload() {
        let err = Converter::new()
            .pack(&[PackedUnit::new(2, b"[]".to_vec(), "MESH", "bad")])
            .unwrap_err();
        match err {
            Error::InvalidEmbeddedPayload(key) => assert_eq!(key, "embed:0000000000000002"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_empty_pack() -> Result<()> {
        let packed = Converter::new().pack(&[])?;
        assert_eq!(&packed[..MAGIC_SIZE], &magic_header());
        assert_eq!(packed.last(), Some(&b']'));
        Ok(())
    }
}
