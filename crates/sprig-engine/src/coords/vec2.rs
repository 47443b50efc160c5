use core::ops::{Add, Div, Mul, Neg, Sub};

/// 2D vector value.
///
/// Every operator returns a new value. Division by zero follows IEEE-754 and
/// yields infinities or NaN rather than failing.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    #[inline]
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

/// Componentwise product.
impl Mul for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x * rhs.x, self.y * rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Componentwise quotient.
impl Div for Vec2 {
    type Output = Vec2;
    #[inline]
    fn div(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x / rhs.x, self.y / rhs.y)
    }
}

impl Div<f64> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn div(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x / rhs, self.y / rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_componentwise() {
        assert_eq!(Vec2::new(2.0, 3.0) + Vec2::new(1.0, 1.0), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn sub_componentwise() {
        assert_eq!(Vec2::new(2.0, 3.0) - Vec2::new(1.0, 5.0), Vec2::new(1.0, -2.0));
    }

    #[test]
    fn div_by_scalar() {
        assert_eq!(Vec2::new(4.0, 2.0) / 2.0, Vec2::new(2.0, 1.0));
    }

    #[test]
    fn mul_then_div_by_same_vector_restores_value() {
        let a = Vec2::new(3.5, -7.25);
        let b = Vec2::new(0.3, 11.0);
        let back = a * b / b;
        assert!((back.x - a.x).abs() < 1e-12);
        assert!((back.y - a.y).abs() < 1e-12);
    }

    #[test]
    fn operands_are_not_mutated() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(3.0, 4.0);
        let _ = a + b;
        let _ = a * b;
        assert_eq!(a, Vec2::new(1.0, 2.0));
        assert_eq!(b, Vec2::new(3.0, 4.0));
    }

    #[test]
    fn div_by_zero_propagates_ieee_values() {
        let v = Vec2::new(1.0, 0.0) / 0.0;
        assert_eq!(v.x, f64::INFINITY);
        assert!(v.y.is_nan());
        assert!(!v.is_finite());

        let w = Vec2::new(-2.0, 2.0) / Vec2::new(0.0, 1.0);
        assert_eq!(w.x, f64::NEG_INFINITY);
        assert_eq!(w.y, 2.0);
    }
}
