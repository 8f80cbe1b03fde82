//! Math type re-exports and flattening helpers for bulk attribute data.

pub use glam::{Mat3, Mat4, Vec2, Vec3};

/// Flatten a slice of `glam` vectors into their float components, in order.
#[inline]
pub fn flatten_vec2(values: &[Vec2]) -> &[f32] {
    bytemuck::cast_slice(values)
}

/// Flatten a slice of `glam` vectors into their float components, in order.
#[inline]
pub fn flatten_vec3(values: &[Vec3]) -> &[f32] {
    bytemuck::cast_slice(values)
}

/// Flatten 3x3 tuples into a single float run.
#[inline]
pub fn flatten_mat3(values: &[[f32; 9]]) -> &[f32] {
    bytemuck::cast_slice(values)
}

/// Entries of a 4x4 matrix in transposed (column-major) order.
///
/// Entry `i` is row `i % 4`, column `i / 4`.
#[inline]
pub fn transposed_entries(m: &Mat4) -> [f32; 16] {
    m.to_cols_array()
}

/// Entries of a 3x3 matrix in transposed (column-major) order.
#[inline]
pub fn mat3_entries(m: &Mat3) -> [f32; 9] {
    m.to_cols_array()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_keeps_component_order() {
        let v = [Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0)];
        assert_eq!(flatten_vec3(&v), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

        let uv = [Vec2::new(0.25, 0.5)];
        assert_eq!(flatten_vec2(&uv), &[0.25, 0.5]);
    }

    #[test]
    fn test_transposed_entries() {
        let m = Mat4::from_translation(Vec3::new(7.0, 8.0, 9.0));
        let e = transposed_entries(&m);
        // Translation lives in the last column: rows 0..3 of column 3.
        assert_eq!(&e[12..16], &[7.0, 8.0, 9.0, 1.0]);
        assert_eq!(e[0], 1.0);
        assert_eq!(e[5], 1.0);
    }
}
