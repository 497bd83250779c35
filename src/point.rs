use core::fmt::Debug;
use core::ops::{Add, Mul, Sub};

use num_traits::Float;

/// Trait defined over generic points P which themselves are generic over their `Scalar`.
/// Many libraries already provide Point-types and the mathematical operations
/// that we need for working with curves, so that implementing methods requires mostly wrapping.
/// Keeping the trait as minimal as possible to make integration with other libraries easy
pub trait Point: Copy + PartialEq + Default + Debug
where
    Self: Add<Self, Output = Self>,
    Self: Sub<Self, Output = Self>,
    Self: Mul<<Self as Point>::Scalar, Output = Self>,
    Self: IntoIterator<Item = <Self as Point>::Scalar>,
{
    type Scalar: Float + Default + Debug;

    /// Number of coordinate axes
    const DIM: usize;

    /// Returns the component of the Point on its axis corresponding to index e.g. [0, 1, 2] -> [x, y, z]
    fn axis(&self, index: usize) -> Self::Scalar;

    /// Returns the squared L2 norm of the Point interpreted as a vector
    fn squared_length(&self) -> Self::Scalar;

    /// Returns the euclidean distance between self and other
    fn distance(&self, other: Self) -> Self::Scalar {
        (*self - other).squared_length().sqrt()
    }

    /// Linear interpolation from self (t = 0) to other (t = 1)
    fn lerp(self, other: Self, t: Self::Scalar) -> Self {
        self + (other - self) * t
    }
}
