use std::ops::Sub;

/// Intrinsic 2D size of a sprite rect.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}
impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn magnitude(&self) -> f32 {
        ObservedSize::from(*self).magnitude()
    }
}

/// Size a sprite was observed at, as measured by the scanner.
///
/// This is a 3D vector because the scanner measures world-space extents. Size
/// comparisons against a [`Size`] treat the rect as a vector with `z = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ObservedSize {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}
impl ObservedSize {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub const fn flat(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    pub fn sqr_magnitude(&self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    pub fn magnitude(&self) -> f32 {
        self.sqr_magnitude().sqrt()
    }
}
impl From<Size> for ObservedSize {
    fn from(size: Size) -> Self {
        Self::flat(size.width, size.height)
    }
}
impl Sub for ObservedSize {
    type Output = ObservedSize;
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}
