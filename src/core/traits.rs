//! Shared traits for fuzzy floating point comparison.

/// Trait for fuzzy equality comparisons with floating point numbers.
///
/// Exact equality is rarely achievable in geometric computations, so
/// comparisons throughout the engine go through this trait with a tolerance
/// (epsilon).
///
/// # Examples
///
/// ```
/// # use overlay_placement::core::traits::*;
/// let a = 0.1 + 0.2;
/// let b = 0.3;
///
/// // direct comparison fails due to floating point representation
/// assert_ne!(a, b);
///
/// // fuzzy comparison succeeds
/// assert!(a.fuzzy_eq(b));
/// ```
pub trait FuzzyEq: Sized + Copy {
    /// Returns the default epsilon value for fuzzy comparisons.
    fn fuzzy_epsilon() -> Self;

    /// Returns `true` if this value is approximately equal to the other one, using
    /// a provided epsilon value.
    fn fuzzy_eq_eps(&self, other: Self, fuzzy_epsilon: Self) -> bool;

    /// Returns `true` if this value is approximately equal to the other one, using
    /// the implemented [FuzzyEq::fuzzy_epsilon] value.
    #[inline]
    fn fuzzy_eq(&self, other: Self) -> bool {
        self.fuzzy_eq_eps(other, Self::fuzzy_epsilon())
    }

    /// Returns `true` if this value is approximately equal to zero, using
    /// a provided epsilon value.
    fn fuzzy_eq_zero_eps(&self, fuzzy_epsilon: Self) -> bool;

    /// Returns `true` if this value is approximately equal to zero, using
    /// the implemented [FuzzyEq::fuzzy_epsilon] value.
    #[inline]
    fn fuzzy_eq_zero(&self) -> bool {
        self.fuzzy_eq_zero_eps(Self::fuzzy_epsilon())
    }
}

impl FuzzyEq for f64 {
    #[inline]
    fn fuzzy_epsilon() -> Self {
        1.0e-8
    }

    #[inline]
    fn fuzzy_eq_eps(&self, other: Self, fuzzy_epsilon: Self) -> bool {
        (*self - other).abs() < fuzzy_epsilon
    }

    #[inline]
    fn fuzzy_eq_zero_eps(&self, fuzzy_epsilon: Self) -> bool {
        self.abs() < fuzzy_epsilon
    }
}
