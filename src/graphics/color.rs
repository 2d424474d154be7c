use std::ops::{Add, AddAssign, Mul, MulAssign, Sub, SubAssign};

/// An RGBA color with 8 bits per channel
///
/// Component arithmetic saturates instead of wrapping: adding two bright
/// colors clamps at white
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);
    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    /// Creates an opaque color from RGB components
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Converts sRGB components to linear floats for GPU upload
    ///
    /// Surfaces & textures use sRGB formats, so values written by shaders
    /// must be linear for the stored bytes to round-trip
    pub(crate) fn to_linear(self) -> [f32; 4] {
        [
            srgb_to_linear(self.r),
            srgb_to_linear(self.g),
            srgb_to_linear(self.b),
            self.a as f32 / 255.0,
        ]
    }

    pub(crate) fn to_wgpu(self) -> wgpu::Color {
        let [r, g, b, a] = self.to_linear();
        wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: a as f64,
        }
    }
}

fn srgb_to_linear(byte: u8) -> f32 {
    let c = byte as f32 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

impl Add for Color {
    type Output = Color;
    fn add(self, rhs: Color) -> Color {
        Color::rgba(
            self.r.saturating_add(rhs.r),
            self.g.saturating_add(rhs.g),
            self.b.saturating_add(rhs.b),
            self.a.saturating_add(rhs.a),
        )
    }
}

impl AddAssign for Color {
    fn add_assign(&mut self, rhs: Color) {
        *self = *self + rhs;
    }
}

impl Sub for Color {
    type Output = Color;
    fn sub(self, rhs: Color) -> Color {
        Color::rgba(
            self.r.saturating_sub(rhs.r),
            self.g.saturating_sub(rhs.g),
            self.b.saturating_sub(rhs.b),
            self.a.saturating_sub(rhs.a),
        )
    }
}

impl SubAssign for Color {
    fn sub_assign(&mut self, rhs: Color) {
        *self = *self - rhs;
    }
}

/// Component-wise modulation: `c * c' / 255` per channel
impl Mul for Color {
    type Output = Color;
    fn mul(self, rhs: Color) -> Color {
        let mul = |a: u8, b: u8| ((a as u16 * b as u16) / 255) as u8;
        Color::rgba(
            mul(self.r, rhs.r),
            mul(self.g, rhs.g),
            mul(self.b, rhs.b),
            mul(self.a, rhs.a),
        )
    }
}

impl MulAssign for Color {
    fn mul_assign(&mut self, rhs: Color) {
        *self = *self * rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addition_saturates_instead_of_wrapping() {
        let c = Color::rgba(200, 200, 200, 200) + Color::rgba(200, 200, 200, 200);
        assert_eq!(c, Color::rgba(255, 255, 255, 255));
    }

    #[test]
    fn subtraction_saturates_at_zero() {
        let c = Color::rgba(50, 100, 150, 255) - Color::rgba(100, 100, 100, 0);
        assert_eq!(c, Color::rgba(0, 0, 50, 255));
    }

    #[test]
    fn modulation() {
        assert_eq!(Color::WHITE * Color::RED, Color::RED);
        assert_eq!(Color::BLACK * Color::WHITE, Color::BLACK);
        let half = Color::rgba(128, 128, 128, 255);
        let c = Color::rgb(200, 100, 0) * half;
        assert_eq!(c, Color::rgba(100, 50, 0, 255));
    }

    #[test]
    fn linear_conversion_endpoints() {
        assert_eq!(Color::BLACK.to_linear()[0], 0.0);
        assert!((Color::WHITE.to_linear()[0] - 1.0).abs() < 1e-6);
        assert!((Color::rgba(0, 0, 0, 128).to_linear()[3] - 128.0 / 255.0).abs() < 1e-6);
    }
}
