use ultraviolet::Vec2;

#[derive(Debug, Clone)]
pub struct Bounds2d {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds2d {
    /// Smallest bounds containing every point, [None] without points.
    pub fn from_points(points: impl IntoIterator<Item = Vec2>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;

        let mut bounds = Bounds2d {
            min: first,
            max: first,
        };
        for point in points {
            bounds.min = bounds.min.min_by_component(point);
            bounds.max = bounds.max.max_by_component(point);
        }

        Some(bounds)
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn has_point(&self, point: Vec2) -> bool {
        (point - self.min).component_min() >= 0. && (point - self.max).component_max() <= 0.
    }
}
