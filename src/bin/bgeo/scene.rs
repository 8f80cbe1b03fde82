//! JSON scene description consumed by the command line tool.

use serde::Deserialize;

use bgeo::prelude::*;

#[derive(Debug, Deserialize)]
pub struct Scene {
    pub objects: Vec<SceneObject>,
}

#[derive(Debug, Deserialize)]
pub struct SceneObject {
    pub name: String,
    #[serde(rename = "type", default = "default_type")]
    pub type_name: String,
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default)]
    pub pivot: [f32; 3],
    #[serde(default = "identity3")]
    pub transform: [f64; 9],
    #[serde(flatten)]
    pub geometry: SceneGeometry,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SceneGeometry {
    Mesh(MeshDesc),
    Skeleton { bones: Vec<BoneDesc> },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MeshDesc {
    pub points: Vec<[f32; 3]>,
    pub polygons: Vec<Vec<u32>>,
    pub point_attributes: Vec<AttributeDesc>,
    pub vertex_attributes: Vec<AttributeDesc>,
    pub primitive_attributes: Vec<AttributeDesc>,
    pub curves: Vec<CurveDesc>,
    pub edge_groups: Vec<EdgeGroupDesc>,
}

#[derive(Debug, Deserialize)]
pub struct AttributeDesc {
    pub name: String,
    #[serde(default)]
    pub hint: Option<HintDesc>,
    pub values: ValuesDesc,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HintDesc {
    Point,
    Normal,
    TextureCoord,
    Color,
    Matrix,
    String,
}

/// Element shape is taken from the JSON: numbers, 2/3/9-element arrays, or strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ValuesDesc {
    Float(Vec<f32>),
    Vector2(Vec<[f32; 2]>),
    Vector3(Vec<[f32; 3]>),
    Matrix3(Vec<[f32; 9]>),
    String(Vec<Option<String>>),
}

#[derive(Debug, Deserialize)]
pub struct CurveDesc {
    /// Point index of each curve vertex.
    pub points: Vec<u32>,
    #[serde(default)]
    pub closed: bool,
    #[serde(default = "default_order")]
    pub order: u32,
    /// Present for NURBS curves.
    #[serde(default)]
    pub end_interpolation: Option<bool>,
    /// Segment end points of Bezier curves.
    #[serde(default)]
    pub control_points: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct EdgeGroupDesc {
    pub name: String,
    pub edges: Vec<[u32; 2]>,
}

#[derive(Debug, Deserialize)]
pub struct BoneDesc {
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
    /// Column-major 4x4 bone-to-world matrix.
    pub matrix: [f32; 16],
    #[serde(default)]
    pub length: f32,
}

fn default_type() -> String {
    "MESH".to_string()
}

fn default_order() -> u32 {
    4
}

fn identity3() -> [f64; 9] {
    [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]
}

impl From<HintDesc> for TypeHint {
    fn from(h: HintDesc) -> Self {
        match h {
            HintDesc::Point => TypeHint::Point,
            HintDesc::Normal => TypeHint::Normal,
            HintDesc::TextureCoord => TypeHint::TextureCoord,
            HintDesc::Color => TypeHint::Color,
            HintDesc::Matrix => TypeHint::Matrix,
            HintDesc::String => TypeHint::String,
        }
    }
}

impl From<&AttributeDesc> for Attribute {
    fn from(desc: &AttributeDesc) -> Self {
        let values = match &desc.values {
            ValuesDesc::Float(v) => AttributeValues::Float(v.clone()),
            ValuesDesc::Vector2(v) => AttributeValues::Vector2(v.iter().map(|&a| Vec2::from(a)).collect()),
            ValuesDesc::Vector3(v) => AttributeValues::Vector3(v.iter().map(|&a| Vec3::from(a)).collect()),
            ValuesDesc::Matrix3(v) => AttributeValues::Matrix3(v.clone()),
            ValuesDesc::String(v) => {
                let mut list = StringList::new();
                for s in v {
                    list.push_opt(s.as_deref());
                }
                AttributeValues::String(list)
            }
        };
        Attribute::new(&desc.name, desc.hint.map(TypeHint::from), values)
    }
}

impl SceneObject {
    /// Build the geometry unit described by this object.
    pub fn to_unit(&self) -> Result<GeometryUnit> {
        match &self.geometry {
            SceneGeometry::Skeleton { bones } => {
                let bones: Vec<SkeletonBone> = bones
                    .iter()
                    .map(|b| SkeletonBone {
                        name: b.name.clone(),
                        parent: b.parent.clone(),
                        matrix: Mat4::from_cols_array(&b.matrix),
                        length: b.length,
                    })
                    .collect();
                GeometryUnit::skeleton(&bones)
            }
            SceneGeometry::Mesh(mesh) => Ok(mesh.to_unit()),
        }
    }

    pub fn packed(&self, embed_id: u64, bgeo: Vec<u8>) -> PackedUnit {
        PackedUnit::new(embed_id, bgeo, &self.type_name, &self.name)
            .with_position(Vec3::from(self.position))
            .with_pivot(Vec3::from(self.pivot))
            .with_transform(self.transform)
    }
}

impl MeshDesc {
    fn to_unit(&self) -> GeometryUnit {
        let mut unit = GeometryUnit::new();
        if !self.points.is_empty() {
            let points = self.points.iter().map(|&p| Vec3::from(p)).collect();
            unit.point_attributes.push(Attribute::point().with_values(AttributeValues::Vector3(points)));
        }
        unit.point_attributes.extend(self.point_attributes.iter().map(Attribute::from));
        unit.vertex_attributes.extend(self.vertex_attributes.iter().map(Attribute::from));
        unit.primitive_attributes.extend(self.primitive_attributes.iter().map(Attribute::from));

        for polygon in &self.polygons {
            unit.push_polygon(polygon);
        }

        // Curve vertices follow the polygon vertices in the topology.
        for curve in &self.curves {
            let first = unit.indices.len() as u32;
            let vertices: Vec<u32> = (first..first + curve.points.len() as u32).collect();
            unit.indices.extend_from_slice(&curve.points);

            let primitive = match curve.end_interpolation {
                Some(end) => CurvePrimitive::nurbs(vertices, curve.closed, curve.order, end),
                None => {
                    let control_points = curve.control_points.unwrap_or(curve.points.len());
                    CurvePrimitive::bezier(vertices, curve.closed, control_points, curve.order)
                }
            };
            unit.curves.push(primitive);
        }

        for group in &self.edge_groups {
            let mut edges = EdgeGroup::new(&group.name);
            for &[a, b] in &group.edges {
                edges.push_edge(a, b);
            }
            unit.edge_groups.push(edges);
        }
        unit
    }
}
