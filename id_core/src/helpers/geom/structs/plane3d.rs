use ultraviolet::{Vec2, Vec3};

/// [Plane3d] is a plane in the form `a*x + b*y + c*z + d = 0`, where
/// `normal = (a, b, c)` and `offset = d`.
///
/// Floors face up (+z), ceilings face down (-z). The height at a point does
/// not depend on which way the plane faces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane3d {
    pub normal: Vec3,
    pub offset: f32,
}

impl Default for Plane3d {
    fn default() -> Self {
        Self::flat_floor(0.0)
    }
}

impl Plane3d {
    pub fn new(normal: Vec3, offset: f32) -> Self {
        Self { normal, offset }
    }

    pub fn flat_floor(height: f32) -> Self {
        Self::new(Vec3::unit_z(), -height)
    }

    pub fn flat_ceiling(height: f32) -> Self {
        Self::new(-Vec3::unit_z(), height)
    }

    /// Plane through `point`, facing along `normal`.
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        Self::new(normal, -normal.dot(point))
    }

    /// Plane through three points. With `up` the normal faces +z, otherwise
    /// -z. Returns [None] when the points are collinear.
    pub fn from_points(p1: Vec3, p2: Vec3, p3: Vec3, up: bool) -> Option<Self> {
        let cross = (p2 - p1).cross(p3 - p1);
        if cross.mag_sq() <= f32::EPSILON {
            return None;
        }

        let mut normal = cross.normalized();
        if (up && normal.z < 0.0) || (!up && normal.z > 0.0) {
            normal = -normal;
        }

        Some(Self::from_point_normal(p1, normal))
    }

    /// Height of the plane at the given XY position.
    ///
    /// Vertical planes have no defined height and return a non-finite value.
    pub fn z_at(&self, pos: Vec2) -> f32 {
        (-self.offset - self.normal.x * pos.x - self.normal.y * pos.y) / self.normal.z
    }

    /// Same surface, facing the other way.
    pub fn inverted(&self) -> Self {
        Self::new(-self.normal, -self.offset)
    }
}
