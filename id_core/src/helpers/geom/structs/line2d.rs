use ultraviolet::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line2d {
    pub start: Vec2,
    pub end: Vec2,
}

impl Line2d {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    pub fn delta(&self) -> Vec2 {
        self.end - self.start
    }

    /// Squared distance from `point` to the infinite line, or to the segment
    /// when `bounded`.
    pub fn distance_to_sq(&self, point: Vec2, bounded: bool) -> f32 {
        let d = self.delta();
        let len_sq = d.mag_sq();
        if len_sq == 0.0 {
            return (point - self.start).mag_sq();
        }

        let mut u = (point - self.start).dot(d) / len_sq;
        if bounded {
            u = u.clamp(0.0, 1.0);
        }

        let nearest = self.start + d * u;
        (point - nearest).mag_sq()
    }
}
