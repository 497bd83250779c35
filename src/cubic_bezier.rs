use num_traits::{Float, One, Zero};

use super::point::Point;

/// A cubic Bezier curve defined by four points: the starting anchor, two successive
/// handles and the ending anchor.
/// The curve is defined by equation:
/// ```∀ t ∈ [0..1],  P(t) = (1 - t)³ * start + 3 * (1 - t)² * t * ctrl1 + 3 * t² * (1 - t) * ctrl2 + t³ * end```
///
/// A curve is never modified in place, splitting it yields new curves.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CubicBezier<P> {
    pub(crate) start: P,
    pub(crate) ctrl1: P,
    pub(crate) ctrl2: P,
    pub(crate) end: P,
}

impl<P> CubicBezier<P>
where
    P: Point,
{
    pub fn new(start: P, ctrl1: P, ctrl2: P, end: P) -> Self {
        CubicBezier {
            start,
            ctrl1,
            ctrl2,
            end,
        }
    }

    /// Return the control points in the order `[start, ctrl1, ctrl2, end]`
    pub fn control_points(&self) -> [P; 4] {
        [self.start, self.ctrl1, self.ctrl2, self.end]
    }

    pub fn start(&self) -> P {
        self.start
    }

    pub fn end(&self) -> P {
        self.end
    }

    /// Evaluate a CubicBezier curve at t by direct evaluation of the Bernstein polynomial.
    /// t is meaningful in [0, 1] but not restricted to it.
    pub fn eval(&self, t: P::Scalar) -> P {
        let one = P::Scalar::one();
        let three = one + one + one;
        let one_t = one - t;

        self.start * (one_t * one_t * one_t)
            + self.ctrl1 * (three * t * one_t * one_t)
            + self.ctrl2 * (three * t * t * one_t)
            + self.end * (t * t * t)
    }

    /// Evaluate a CubicBezier curve at t using the numerically stable De Casteljau algorithm
    pub fn eval_casteljau(&self, t: P::Scalar) -> P {
        self.split(t).anchor()
    }

    /// Subdivide the curve at t with De Casteljau's algorithm.
    /// Both halves together trace exactly the same shape as self,
    /// the handles next to the new anchor stay colinear with the tangent at t.
    pub fn split(&self, t: P::Scalar) -> SplitResult<P> {
        // unrolled de casteljau algorithm
        // _1ab is the first iteration from first (a) to second (b) control point and so on
        let ctrl_1ab = self.start.lerp(self.ctrl1, t);
        let ctrl_1bc = self.ctrl1.lerp(self.ctrl2, t);
        let ctrl_1cd = self.ctrl2.lerp(self.end, t);
        // second iteration
        let ctrl_2ab = ctrl_1ab.lerp(ctrl_1bc, t);
        let ctrl_2bc = ctrl_1bc.lerp(ctrl_1cd, t);
        // third iteration, final point on the curve
        let ctrl_3ab = ctrl_2ab.lerp(ctrl_2bc, t);

        SplitResult {
            points: [
                self.start, ctrl_1ab, ctrl_2ab, ctrl_3ab, ctrl_2bc, ctrl_1cd, self.end,
            ],
        }
    }

    /// Return the control points of the derivative function.
    /// The derivative is a quadratic bezier curve with the weights
    ///     w'0 = 3(w1-w0), w'1 = 3(w2-w1) and w'2 = 3(w3-w2).
    pub fn derivative(&self) -> [P; 3] {
        let one = P::Scalar::one();
        let three = one + one + one;
        [
            (self.ctrl1 - self.start) * three,
            (self.ctrl2 - self.ctrl1) * three,
            (self.end - self.ctrl2) * three,
        ]
    }

    /// Sample the derivative at t, i.e. the (unnormalized) tangent of the curve
    pub fn tangent(&self, t: P::Scalar) -> P {
        let one = P::Scalar::one();
        let two = one + one;
        let one_t = one - t;
        let [d0, d1, d2] = self.derivative();
        d0 * (one_t * one_t) + d1 * (two * one_t * t) + d2 * (t * t)
    }
}

/// The seven points produced by subdividing a cubic curve at one parameter:
/// `[p0, p12, p123, p1234, p234, p34, p3]`.
/// `p1234` is the new anchor shared by the two halves `(p0, p12, p123, p1234)`
/// and `(p1234, p234, p34, p3)`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SplitResult<P> {
    points: [P; 7],
}

impl<P> SplitResult<P>
where
    P: Point,
{
    pub fn points(&self) -> [P; 7] {
        self.points
    }

    /// The new on-curve point both halves share
    pub fn anchor(&self) -> P {
        self.points[3]
    }

    /// The curve from the original start to the new anchor
    pub fn left(&self) -> CubicBezier<P> {
        CubicBezier::new(self.points[0], self.points[1], self.points[2], self.points[3])
    }

    /// The curve from the new anchor to the original end
    pub fn right(&self) -> CubicBezier<P> {
        CubicBezier::new(self.points[3], self.points[4], self.points[5], self.points[6])
    }
}

impl<P> core::ops::Index<usize> for SplitResult<P> {
    type Output = P;

    fn index(&self, index: usize) -> &P {
        &self.points[index]
    }
}

/// i / n as a float, n = 0 yields 0
pub(crate) fn scalar_ratio<F: Float>(i: usize, n: usize) -> F {
    match (F::from(i), F::from(n)) {
        (Some(i), Some(n)) if n > F::zero() => i / n,
        _ => F::zero(),
    }
}
