/// 32-bit ARGB color, packed into an `i32` the same way map fields store it
/// (`0xAARRGGBB`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelColor {
    pub a: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl PixelColor {
    pub const TRANSPARENT: PixelColor = PixelColor::new(0, 0, 0, 0);
    pub const WHITE: PixelColor = PixelColor::new(255, 255, 255, 255);

    pub const fn new(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { a, r, g, b }
    }

    pub const fn gray(level: u8) -> Self {
        Self::new(255, level, level, level)
    }

    pub fn from_int(color: i32) -> Self {
        let [a, r, g, b] = (color as u32).to_be_bytes();
        Self { a, r, g, b }
    }

    pub fn to_int(self) -> i32 {
        u32::from_be_bytes([self.a, self.r, self.g, self.b]) as i32
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Component-wise multiply, treating each channel as 0..1.
    pub fn modulate(self, other: PixelColor) -> Self {
        fn mul(x: u8, y: u8) -> u8 {
            ((x as u32 * y as u32) / 255) as u8
        }

        Self {
            a: mul(self.a, other.a),
            r: mul(self.r, other.r),
            g: mul(self.g, other.g),
            b: mul(self.b, other.b),
        }
    }
}
