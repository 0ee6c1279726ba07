use crate::core::traits::FuzzyEq;
use std::ops;

/// 2D vector/point in the transient planar pixel space of a map viewport.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    /// Create a new vector with x and y components.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Vector2 { x, y }
    }

    /// Create a zero vector (x = 0, y = 0).
    #[inline]
    pub fn zero() -> Self {
        Vector2::new(0.0, 0.0)
    }

    /// Uniformly scale the vector by `scale_factor`.
    #[inline]
    pub fn scale(&self, scale_factor: f64) -> Self {
        vec2(scale_factor * self.x, scale_factor * self.y)
    }

    /// Dot product.
    #[inline]
    pub fn dot(&self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Compute the perpendicular dot product (`self.x * other.y - self.y * other.x`).
    #[inline]
    pub fn perp_dot(&self, other: Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Squared length of the vector.
    #[inline]
    pub fn length_squared(&self) -> f64 {
        self.dot(*self)
    }

    /// Length of the vector.
    #[inline]
    pub fn length(&self) -> f64 {
        self.dot(*self).sqrt()
    }

    /// Fuzzy equal comparison with another vector using `fuzzy_epsilon` given.
    #[inline]
    pub fn fuzzy_eq_eps(&self, other: Self, fuzzy_epsilon: f64) -> bool {
        self.x.fuzzy_eq_eps(other.x, fuzzy_epsilon) && self.y.fuzzy_eq_eps(other.y, fuzzy_epsilon)
    }

    /// Fuzzy equal comparison with another vector using the default fuzzy epsilon.
    #[inline]
    pub fn fuzzy_eq(&self, other: Self) -> bool {
        self.fuzzy_eq_eps(other, f64::fuzzy_epsilon())
    }

    /// Rotate this point around an `origin` point by some `angle` in radians.
    ///
    /// A zero `angle` returns the point bit-for-bit unchanged (exact identity,
    /// not just within epsilon) since unrotated placements are the common case.
    pub fn rotate_about(&self, origin: Self, angle: f64) -> Self {
        if angle == 0.0 {
            return *self;
        }

        // translate to origin
        let translated = self - origin;

        // rotate
        let s = angle.sin();
        let c = angle.cos();
        let rotated = vec2(
            translated.x * c - translated.y * s,
            translated.x * s + translated.y * c,
        );

        // translate back
        rotated + origin
    }

    /// Same as [Vector2::rotate_about] with the angle given in degrees.
    #[inline]
    pub fn rotate_about_deg(&self, origin: Self, angle_deg: f64) -> Self {
        if angle_deg == 0.0 {
            return *self;
        }
        self.rotate_about(origin, angle_deg.to_radians())
    }
}

#[inline(always)]
pub fn vec2(x: f64, y: f64) -> Vector2 {
    Vector2::new(x, y)
}

macro_rules! impl_binary_op {
    ($op_trait:ident, $op_func:ident, $op:tt) => {
        impl ops::$op_trait<Vector2> for Vector2 {
            type Output = Vector2;
            fn $op_func(self, rhs: Vector2) -> Self::Output {
                Vector2::new(self.x $op rhs.x, self.y $op rhs.y)
            }
        }

        impl ops::$op_trait<&Vector2> for Vector2 {
            type Output = Vector2;
            fn $op_func(self, rhs: &Vector2) -> Self::Output {
                Vector2::new(self.x $op rhs.x, self.y $op rhs.y)
            }
        }

        impl<'a, 'b> ops::$op_trait<&'b Vector2> for &'a Vector2 {
            type Output = Vector2;
            fn $op_func(self, rhs: &'b Vector2) -> Self::Output {
                Vector2::new(self.x $op rhs.x, self.y $op rhs.y)
            }
        }

        impl ops::$op_trait<Vector2> for &Vector2 {
            type Output = Vector2;
            fn $op_func(self, rhs: Vector2) -> Self::Output {
                Vector2::new(self.x $op rhs.x, self.y $op rhs.y)
            }
        }
    };
}

impl_binary_op!(Add, add, +);
impl_binary_op!(Sub, sub, -);

impl ops::Neg for Vector2 {
    type Output = Vector2;
    fn neg(self) -> Self::Output {
        Vector2::new(-self.x, -self.y)
    }
}
