//! Skin capture (bone weights) input.

use smallvec::SmallVec;

use crate::util::{Error, Mat4, Result};

/// `(bone index, weight)` pairs of one point. Most points have few influences.
pub type Influences = SmallVec<[(u32, f32); 4]>;

/// One bone of a capture skeleton.
#[derive(Clone, Debug, PartialEq)]
pub struct CaptureBone {
    pub name: String,
    /// Parent bone index, `-1` for roots.
    pub parent: i32,
    /// Bone-to-world transform.
    pub transform: Mat4,
}

impl CaptureBone {
    pub fn new(name: impl Into<String>, parent: i32, transform: Mat4) -> Self {
        Self { name: name.into(), parent, transform }
    }
}

/// Bones plus per-point influences.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SkinCapture {
    pub bones: Vec<CaptureBone>,
    pub influences: Vec<Influences>,
}

impl SkinCapture {
    pub fn new(bones: Vec<CaptureBone>) -> Self {
        Self { bones, influences: Vec::new() }
    }

    /// Append the influences of the next point.
    pub fn push_point<I>(&mut self, influences: I)
    where
        I: IntoIterator<Item = (u32, f32)>,
    {
        self.influences.push(influences.into_iter().collect());
    }

    /// Largest number of influences held by any point.
    pub fn max_influences(&self) -> usize {
        self.influences.iter().map(|i| i.len()).max().unwrap_or(0)
    }

    pub fn bone_names(&self) -> impl Iterator<Item = &str> {
        self.bones.iter().map(|b| b.name.as_str())
    }

    /// Check influences against the bone list and the owning point count.
    pub fn validate(&self, point_count: usize) -> Result<()> {
        if self.influences.len() != point_count {
            return Err(Error::invalid_attribute(
                "boneCapture",
                format!("{} influence lists for {} points", self.influences.len(), point_count),
            ));
        }
        let bone_count = self.bones.len();
        for (point, influences) in self.influences.iter().enumerate() {
            if let Some(&(bone, _)) = influences.iter().find(|(b, _)| *b as usize >= bone_count) {
                return Err(Error::invalid_attribute(
                    "boneCapture",
                    format!("point {} refers to bone {} of {}", point, bone, bone_count),
                ));
            }
        }
        Ok(())
    }
}
