use std::f32::consts::PI;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// A strongly typed angle, constructible from degrees or radians
///
/// Keeps rotation APIs unit-safe: `Transform::rotate` & `View::set_rotation`
/// take an `Angle` so callers can't mix up degrees & radians
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd)]
pub struct Angle {
    radians: f32,
}

impl Angle {
    pub const ZERO: Angle = Angle { radians: 0.0 };

    /// Creates an angle from a value in degrees
    pub fn degrees(degrees: f32) -> Self {
        Self {
            radians: degrees * (PI / 180.0),
        }
    }

    /// Creates an angle from a value in radians
    pub fn radians(radians: f32) -> Self {
        Self { radians }
    }

    pub fn as_degrees(self) -> f32 {
        self.radians * (180.0 / PI)
    }

    pub fn as_radians(self) -> f32 {
        self.radians
    }

    /// Normalizes into [0, 360) degrees
    pub fn wrap_unsigned(self) -> Self {
        let tau = 2.0 * PI;
        Self {
            radians: self.radians.rem_euclid(tau),
        }
    }

    /// Normalizes into [-180, 180) degrees
    pub fn wrap_signed(self) -> Self {
        let tau = 2.0 * PI;
        Self {
            radians: (self.radians + PI).rem_euclid(tau) - PI,
        }
    }
}

impl Add for Angle {
    type Output = Angle;
    fn add(self, rhs: Angle) -> Angle {
        Angle::radians(self.radians + rhs.radians)
    }
}

impl AddAssign for Angle {
    fn add_assign(&mut self, rhs: Angle) {
        self.radians += rhs.radians;
    }
}

impl Sub for Angle {
    type Output = Angle;
    fn sub(self, rhs: Angle) -> Angle {
        Angle::radians(self.radians - rhs.radians)
    }
}

impl SubAssign for Angle {
    fn sub_assign(&mut self, rhs: Angle) {
        self.radians -= rhs.radians;
    }
}

impl Neg for Angle {
    type Output = Angle;
    fn neg(self) -> Angle {
        Angle::radians(-self.radians)
    }
}

impl Mul<f32> for Angle {
    type Output = Angle;
    fn mul(self, rhs: f32) -> Angle {
        Angle::radians(self.radians * rhs)
    }
}

impl Div<f32> for Angle {
    type Output = Angle;
    fn div(self, rhs: f32) -> Angle {
        Angle::radians(self.radians / rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degrees_and_radians_agree() {
        let a = Angle::degrees(180.0);
        assert!((a.as_radians() - PI).abs() < 1e-6);
        assert!((Angle::radians(PI).as_degrees() - 180.0).abs() < 1e-4);
    }

    #[test]
    fn wrapping() {
        assert!((Angle::degrees(450.0).wrap_unsigned().as_degrees() - 90.0).abs() < 1e-4);
        assert!((Angle::degrees(270.0).wrap_signed().as_degrees() + 90.0).abs() < 1e-4);
        assert!((Angle::degrees(-90.0).wrap_unsigned().as_degrees() - 270.0).abs() < 1e-4);
    }

    #[test]
    fn arithmetic() {
        let sum = Angle::degrees(30.0) + Angle::degrees(60.0);
        assert!((sum.as_degrees() - 90.0).abs() < 1e-4);
        assert!(((-Angle::degrees(45.0)).as_degrees() + 45.0).abs() < 1e-4);
        assert!(((Angle::degrees(10.0) * 3.0).as_degrees() - 30.0).abs() < 1e-4);
    }
}
