//! Curve primitives.

/// Curve family.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CurveFamily {
    #[default]
    Bezier,
    Nurbs,
}

impl CurveFamily {
    /// Primitive type name.
    pub fn primitive_type(self) -> &'static str {
        match self {
            CurveFamily::Bezier => "BezierCurve",
            CurveFamily::Nurbs => "NURBCurve",
        }
    }

    /// Basis type name.
    pub fn basis(self) -> &'static str {
        match self {
            CurveFamily::Bezier => "Bezier",
            CurveFamily::Nurbs => "NURBS",
        }
    }
}

/// One Bezier or NURBS curve.
#[derive(Clone, Debug, PartialEq)]
pub struct CurvePrimitive {
    pub family: CurveFamily,
    /// Point indices, one per curve vertex.
    pub vertices: Vec<u32>,
    pub closed: bool,
    pub order: u32,
    pub knots: Vec<f64>,
    /// Only written when set (NURBS curves).
    pub end_interpolation: Option<bool>,
}

impl Default for CurvePrimitive {
    fn default() -> Self {
        Self {
            family: CurveFamily::Bezier,
            vertices: Vec::new(),
            closed: false,
            order: 4,
            knots: vec![0.0, 0.5, 1.0],
            end_interpolation: None,
        }
    }
}

impl CurvePrimitive {
    /// Bezier curve with uniform knots over `control_points` segment ends.
    pub fn bezier(vertices: Vec<u32>, closed: bool, control_points: usize, order: u32) -> Self {
        Self {
            family: CurveFamily::Bezier,
            vertices,
            closed,
            order,
            knots: bezier_knots(control_points),
            end_interpolation: None,
        }
    }

    /// NURBS curve with a clamped knot vector sized from the vertex count.
    pub fn nurbs(vertices: Vec<u32>, closed: bool, order: u32, end_interpolation: bool) -> Self {
        let knots = nurbs_knots(vertices.len(), order as usize, closed);
        Self {
            family: CurveFamily::Nurbs,
            vertices,
            closed,
            order,
            knots,
            end_interpolation: Some(end_interpolation),
        }
    }
}

/// `i / (n - 1)` for `i` in `0..n`.
pub fn bezier_knots(control_points: usize) -> Vec<f64> {
    if control_points < 2 {
        return vec![0.0; control_points];
    }
    let last = (control_points - 1) as f64;
    (0..control_points).map(|i| i as f64 / last).collect()
}

/// `order` zeros, evenly spaced interior knots, then ones.
///
/// Knot count is `max(points + order, 2 * order)`, plus one for closed curves.
pub fn nurbs_knots(points: usize, order: usize, closed: bool) -> Vec<f64> {
    let mut count = (points + order).max(2 * order);
    if closed {
        count += 1;
    }

    let interior = count.saturating_sub(2 * order);
    let mut knots = Vec::with_capacity(count);
    knots.extend(std::iter::repeat(0.0).take(order));
    knots.extend((0..interior).map(|i| (i as f64 + 1.0) / (interior as f64 + 1.0)));
    while knots.len() < count {
        knots.push(1.0);
    }
    knots
}
