use core::fmt::Debug;
use core::ops::{Add, Mul, Sub};

use num_traits::Float;

use super::point::Point;
use super::NativeFloat;

/// Point with dimensions of constant generic size N and of generic type T
/// (Implemented as Newtype Pattern on an array)
/// This type only interacts with the library through
/// the point trait, so you are free to use your own
/// Point/Coord/Vec structures instead by implementing the (small) trait
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointN<T, const N: usize>([T; N]);

/// Screen space point (viewport pixels).
pub type Point2 = PointN<NativeFloat, 2>;

/// World space point.
pub type Point3 = PointN<NativeFloat, 3>;

impl<T, const N: usize> PointN<T, N> {
    pub fn new(array: [T; N]) -> Self {
        PointN(array)
    }
}

/// Initialize with the Default value for the underlying type
impl<T: Default + Copy, const N: usize> Default for PointN<T, N> {
    fn default() -> Self {
        PointN([T::default(); N])
    }
}

impl<T, const N: usize> Add for PointN<T, N>
where
    T: Add<Output = T> + Copy,
{
    type Output = Self;

    fn add(self, other: PointN<T, N>) -> PointN<T, N> {
        let mut res = self;
        for i in 0..N {
            res.0[i] = self.0[i] + other.0[i];
        }
        res
    }
}

impl<T, const N: usize> Sub for PointN<T, N>
where
    T: Sub<Output = T> + Copy,
{
    type Output = Self;

    fn sub(self, other: PointN<T, N>) -> PointN<T, N> {
        let mut res = self;
        for i in 0..N {
            res.0[i] = self.0[i] - other.0[i];
        }
        res
    }
}

impl<T, const N: usize> Mul<T> for PointN<T, N>
where
    T: Mul<Output = T> + Copy,
{
    type Output = PointN<T, N>;

    fn mul(self, rhs: T) -> PointN<T, N> {
        let mut res = self;
        for i in 0..N {
            res.0[i] = res.0[i] * rhs;
        }
        res
    }
}

impl<T, const N: usize> IntoIterator for PointN<T, N> {
    type Item = T;
    type IntoIter = core::array::IntoIter<Self::Item, N>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIterator::into_iter(self.0)
    }
}

impl<T, const N: usize> Point for PointN<T, N>
where
    T: Float + Default + Debug,
{
    type Scalar = T;
    const DIM: usize = N;

    fn axis(&self, index: usize) -> Self::Scalar {
        self.0[index]
    }

    fn squared_length(&self) -> Self::Scalar {
        let mut sqr_dist = T::zero();
        for i in 0..N {
            sqr_dist = sqr_dist + self.0[i] * self.0[i];
        }
        sqr_dist
    }
}

impl Point2 {
    pub fn x(&self) -> NativeFloat {
        self.0[0]
    }

    pub fn y(&self) -> NativeFloat {
        self.0[1]
    }
}

impl Point3 {
    pub fn x(&self) -> NativeFloat {
        self.0[0]
    }

    pub fn y(&self) -> NativeFloat {
        self.0[1]
    }

    pub fn z(&self) -> NativeFloat {
        self.0[2]
    }
}

// nalgebra is only used for the view/projection matrices, keep the
// conversions at that seam

impl From<Point3> for nalgebra::Point3<NativeFloat> {
    fn from(p: Point3) -> Self {
        nalgebra::Point3::new(p.0[0], p.0[1], p.0[2])
    }
}

impl From<nalgebra::Point3<NativeFloat>> for Point3 {
    fn from(p: nalgebra::Point3<NativeFloat>) -> Self {
        PointN([p.x, p.y, p.z])
    }
}

impl From<nalgebra::Point2<NativeFloat>> for Point2 {
    fn from(p: nalgebra::Point2<NativeFloat>) -> Self {
        PointN([p.x, p.y])
    }
}
