//! The geometry unit aggregate.

use crate::util::{mat3_entries, Error, Mat3, Mat4, Result};

use super::attribute::{self, Attribute, AttributeValues};
use super::capture::SkinCapture;
use super::curve::CurvePrimitive;
use super::string_list::StringList;

/// Named set of edges, stored as point pairs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EdgeGroup {
    pub name: String,
    pub points: Vec<u32>,
}

impl EdgeGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), points: Vec::new() }
    }

    /// Add one edge.
    pub fn push_edge(&mut self, a: u32, b: u32) {
        self.points.extend_from_slice(&[a, b]);
    }
}

/// Primitive run type of the polygon block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PrimitiveRun {
    /// Closed polygons.
    #[default]
    Polygon,
    /// Open polylines.
    PolygonCurve,
}

impl PrimitiveRun {
    pub fn as_str(self) -> &'static str {
        match self {
            PrimitiveRun::Polygon => "p_r",
            PrimitiveRun::PolygonCurve => "c_r",
        }
    }
}

/// Input of [`GeometryUnit::skeleton`].
#[derive(Clone, Debug, PartialEq)]
pub struct SkeletonBone {
    pub name: String,
    /// Name of a bone listed earlier.
    pub parent: Option<String>,
    /// Bone-to-world transform.
    pub matrix: Mat4,
    pub length: f32,
}

/// Everything written for one serialized geometry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeometryUnit {
    pub point_attributes: Vec<Attribute>,
    pub vertex_attributes: Vec<Attribute>,
    pub primitive_attributes: Vec<Attribute>,
    pub edge_groups: Vec<EdgeGroup>,
    pub primitive_run: PrimitiveRun,
    /// Vertex count of each polygon.
    pub loop_counts: Vec<u32>,
    /// Point index of each vertex.
    pub indices: Vec<u32>,
    pub curves: Vec<CurvePrimitive>,
    pub capture: Option<SkinCapture>,
}

impl GeometryUnit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Length of the first point attribute.
    pub fn point_count(&self) -> usize {
        self.point_attributes.first().map_or(0, |a| a.len())
    }

    pub fn vertex_count(&self) -> usize {
        self.indices.len()
    }

    /// Polygons plus curves.
    pub fn primitive_count(&self) -> usize {
        self.loop_counts.len() + self.curves.len()
    }

    pub fn find_point_attribute(&self, name: &str) -> Option<&Attribute> {
        attribute::find(&self.point_attributes, name)
    }

    pub fn find_vertex_attribute(&self, name: &str) -> Option<&Attribute> {
        attribute::find(&self.vertex_attributes, name)
    }

    pub fn find_primitive_attribute(&self, name: &str) -> Option<&Attribute> {
        attribute::find(&self.primitive_attributes, name)
    }

    /// Append one polygon.
    pub fn push_polygon(&mut self, points: &[u32]) {
        self.indices.extend_from_slice(points);
        self.loop_counts.push(points.len() as u32);
    }

    /// Build a skeleton: one point per bone and a two-vertex polyline from
    /// each parent to its child.
    pub fn skeleton(bones: &[SkeletonBone]) -> Result<Self> {
        let mut unit = Self { primitive_run: PrimitiveRun::PolygonCurve, ..Self::default() };

        let mut positions = Vec::with_capacity(bones.len());
        let mut names = StringList::new();
        let mut transforms = Vec::with_capacity(bones.len());
        let mut lengths = Vec::with_capacity(bones.len());

        for (i, bone) in bones.iter().enumerate() {
            if let Some(parent) = &bone.parent {
                let parent_index = names.element_of(parent).ok_or_else(|| Error::UnknownParentBone {
                    bone: bone.name.clone(),
                    parent: parent.clone(),
                })?;
                unit.push_polygon(&[parent_index as u32, i as u32]);
            }

            positions.push(bone.matrix.w_axis.truncate());
            names.push(&bone.name);
            transforms.push(mat3_entries(&Mat3::from_mat4(bone.matrix)));
            lengths.push(bone.length);
        }

        unit.point_attributes = vec![
            Attribute::point().with_values(AttributeValues::Vector3(positions)),
            Attribute::string("name").with_values(AttributeValues::String(names)),
            Attribute::matrix("transform").with_values(AttributeValues::Matrix3(transforms)),
            Attribute::numeric("length").with_values(AttributeValues::Float(lengths)),
        ];
        Ok(unit)
    }
}
