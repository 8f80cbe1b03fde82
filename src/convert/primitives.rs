//! Primitive and edge group blocks.

use crate::geo::{CurvePrimitive, EdgeGroup, GeometryUnit};
use crate::json::{narrow_i16, BinaryJsonWriter};
use crate::util::Result;

/// Collapse consecutive equal loop counts into `(count, repeat)` pairs.
///
/// A final run of zero-vertex loops is dropped; earlier zero runs are kept.
pub fn loop_count_runs(loop_counts: &[u32]) -> Vec<(u32, u32)> {
    let mut runs: Vec<(u32, u32)> = Vec::new();
    for &count in loop_counts {
        match runs.last_mut() {
            Some((last, repeat)) if *last == count => *repeat += 1,
            _ => runs.push((count, 1)),
        }
    }
    if matches!(runs.last(), Some((0, _))) {
        runs.pop();
    }
    runs
}

/// Flattened `count, repeat, count, repeat, ...` run data.
pub fn loop_count_rle(loop_counts: &[u32]) -> Vec<u32> {
    loop_count_runs(loop_counts)
        .into_iter()
        .flat_map(|(count, repeat)| [count, repeat])
        .collect()
}

/// Write every primitive of `unit`: one polygon run, then one block per curve.
pub(crate) fn write_primitives(w: &mut BinaryJsonWriter, unit: &GeometryUnit) -> Result<()> {
    w.array_block(|w| {
        if !unit.loop_counts.is_empty() {
            write_polygon_run(w, unit)?;
        }
        for curve in &unit.curves {
            write_curve(w, curve)?;
        }
        Ok(())
    })
}

fn write_polygon_run(w: &mut BinaryJsonWriter, unit: &GeometryUnit) -> Result<()> {
    w.array_block(|w| {
        w.array_block(|w| {
            w.write_id_string("type")?;
            w.write_id_string(unit.primitive_run.as_str())
        })?;
        w.array_block(|w| {
            // start vertex
            w.write_id_string("s_v")?;
            w.write_int(0)?;
            // number of primitives
            w.write_id_string("n_p")?;
            w.write_int(unit.loop_counts.len() as i64)?;
            // vertex count run-length encoding
            w.write_id_string("r_v")?;
            w.write_auto_int_uniform_array(&loop_count_rle(&unit.loop_counts))
        })
    })
}

fn write_curve(w: &mut BinaryJsonWriter, curve: &CurvePrimitive) -> Result<()> {
    let vertices = curve
        .vertices
        .iter()
        .map(|&v| narrow_i16(v as i64))
        .collect::<Result<Vec<i16>>>()?;

    w.array_block(|w| {
        w.array_block(|w| {
            w.write_id_string("type")?;
            w.write_id_string(curve.family.primitive_type())
        })?;
        w.array_block(|w| {
            w.write_id_string("vertex")?;
            w.write_int16_uniform_array(&vertices)?;

            w.write_id_string("closed")?;
            w.write_bool(curve.closed);

            w.write_id_string("basis")?;
            w.array_block(|w| {
                w.write_id_string("type")?;
                w.write_id_string(curve.family.basis())?;

                w.write_id_string("order")?;
                w.write_int(curve.order as i64)?;

                if let Some(end_interpolation) = curve.end_interpolation {
                    w.write_id_string("endinterpolation")?;
                    w.write_bool(end_interpolation);
                }

                w.write_id_string("knots")?;
                w.write_real64_uniform_array(&curve.knots)
            })
        })
    })
}

pub(crate) fn write_edge_groups(w: &mut BinaryJsonWriter, groups: &[EdgeGroup]) -> Result<()> {
    w.array_block(|w| {
        for group in groups {
            w.array_block(|w| {
                w.array_block(|w| {
                    w.write_id_string("name")?;
                    w.write_id_string(&group.name)
                })?;
                w.array_block(|w| {
                    w.write_id_string("points")?;
                    w.array_block(|w| {
                        for &p in &group.points {
                            w.write_int(p as i64)?;
                        }
                        Ok(())
                    })
                })
            })?;
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::constants::*;
    use crate::util::Error;

    #[test]
    fn test_rle() {
        assert_eq!(loop_count_runs(&[3, 3, 3, 4, 4]), vec![(3, 3), (4, 2)]);
        assert_eq!(loop_count_runs(&[3]), vec![(3, 1)]);
        assert_eq!(loop_count_runs(&[]), Vec::<(u32, u32)>::new());
        assert_eq!(loop_count_runs(&[4, 3, 4]), vec![(4, 1), (3, 1), (4, 1)]);
        assert_eq!(loop_count_rle(&[3, 3, 3, 4, 4]), vec![3, 3, 4, 2]);
    }

    #[test]
    fn test_rle_zero_vertex_runs() {
        // Trailing empty loops vanish, leading and inner ones survive.
        assert_eq!(loop_count_runs(&[3, 3, 0, 0]), vec![(3, 2)]);
        assert_eq!(loop_count_runs(&[0, 3, 0, 4]), vec![(0, 1), (3, 1), (0, 1), (4, 1)]);
        assert_eq!(loop_count_runs(&[0, 0]), Vec::<(u32, u32)>::new());
        assert_eq!(loop_count_rle(&[4, 0]), vec![4, 1]);
    }

    #[test]
    fn test_curve_block() -> Result<()> {
        let curve = CurvePrimitive::nurbs(vec![0, 1, 2, 3], true, 4, false);
        let mut w = BinaryJsonWriter::new();
        write_curve(&mut w, &curve)?;
        assert!(w.id_index("NURBCurve").is_some());
        assert!(w.id_index("endinterpolation").is_some());
        let out = w.finish()?;

        let mut vertex = vec![UNIFORM_ARRAY, TAG_INT16, 4];
        for v in [0i16, 1, 2, 3] {
            vertex.extend_from_slice(&v.to_le_bytes());
        }
        assert!(out.windows(vertex.len()).any(|win| win == vertex.as_slice()));
        Ok(())
    }

    #[test]
    fn test_bezier_curve_omits_end_interpolation() -> Result<()> {
        let curve = CurvePrimitive::bezier(vec![0, 1, 2, 3], false, 2, 4);
        let mut w = BinaryJsonWriter::new();
        write_curve(&mut w, &curve)?;
        assert!(w.id_index("endinterpolation").is_none());
        assert!(w.id_index("BezierCurve").is_some());
        Ok(())
    }

    #[test]
    fn test_curve_vertex_out_of_int16_range() {
        let curve = CurvePrimitive { vertices: vec![0, 40000], ..CurvePrimitive::default() };
        let mut w = BinaryJsonWriter::new();
        let err = write_curve(&mut w, &curve).unwrap_err();
        assert!(matches!(err, Error::ValueOutOfRange { value: 40000, .. }));
        assert_eq!(w.depth(), 0);
    }

    #[test]
    fn test_polygon_count_excludes_curves() -> Result<()> {
        let mut unit = GeometryUnit::new();
        unit.push_polygon(&[0, 1, 2]);
        unit.indices.extend_from_slice(&[0, 1]);
        unit.curves.push(CurvePrimitive::bezier(vec![3, 4], false, 2, 2));
        assert_eq!(unit.primitive_count(), 2);

        let mut w = BinaryJsonWriter::new();
        write_primitives(&mut w, &unit)?;
        let n_p = w.id_index("n_p").expect("n_p written") as u8;
        let out = w.finish()?;

        // `n_p` counts the polygons of the run only.
        let record = [b'&', n_p, TAG_INT8, 1];
        assert!(out.windows(record.len()).any(|win| win == record));
        Ok(())
    }

    #[test]
    fn test_edge_groups() -> Result<()> {
        let mut seams = EdgeGroup::new("seams");
        seams.push_edge(0, 1);
        let mut w = BinaryJsonWriter::new();
        write_edge_groups(&mut w, &[seams])?;
        let out = w.finish()?;
        assert!(out.ends_with(&[TAG_INT8, 0, TAG_INT8, 1, b']', b']', b']', b']']));
        Ok(())
    }
}
