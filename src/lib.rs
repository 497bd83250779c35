//! Interactive point insertion on cubic Bézier splines.
//!
//! The cursor position in a viewport is mapped onto the nearest location of
//! a set of candidate segments, the segment is subdivided there with
//! De Casteljau's algorithm and the seven resulting points are written back
//! into the spline without changing its shape.
//!
//! ```
//! use stroke_insert::{CubicBezier, Point3};
//!
//! let arch = CubicBezier::new(
//!     Point3::new([0.0, 0.0, 0.0]),
//!     Point3::new([1.0, 1.0, 0.0]),
//!     Point3::new([2.0, 1.0, 0.0]),
//!     Point3::new([3.0, 0.0, 0.0]),
//! );
//! let split = arch.split(0.5);
//! assert_eq!(split.anchor(), Point3::new([1.5, 0.75, 0.0]));
//! assert_eq!(split.left().end(), split.right().start());
//! ```
//!
//! Interactive use goes through [`InsertSession`]:
//!
//! ```
//! use stroke_insert::{
//!     BezierPoint, CurveData, InputEvent, InsertConfig, InsertSession, Point3, Projection,
//!     Response, SplineData, ViewState,
//! };
//!
//! let p = |x, y| Point3::new([x, y, 0.0]);
//! let curve = CurveData::new(vec![SplineData::new(vec![
//!     BezierPoint::new(p(0.0, 0.0), p(-1.0, -1.0), p(1.0, 1.0)),
//!     BezierPoint::new(p(3.0, 0.0), p(2.0, 1.0), p(4.0, -1.0)),
//! ])]);
//! let view = ViewState::orthographic(
//!     Point3::new([1.5, 0.5, 10.0]),
//!     Point3::new([1.5, 0.5, 0.0]),
//!     Point3::new([0.0, 1.0, 0.0]),
//!     5.0,
//!     800.0,
//!     600.0,
//!     0.1,
//!     100.0,
//! );
//! let cursor = view.project(p(1.5, 0.75)).unwrap();
//!
//! let mut session = InsertSession::begin(curve, &InsertConfig::default(), view, cursor)?;
//! if let Response::Committed(insertion) = session.handle(InputEvent::Confirm)? {
//!     assert_eq!(insertion.curve.splines[0].points.len(), 3);
//! }
//! # Ok::<(), stroke_insert::Error>(())
//! ```

pub mod config;
pub mod cubic_bezier;
pub mod error;
pub mod point;
pub mod point_generic;
pub mod projection;
pub mod search;
pub mod session;
pub mod spline;

/// Float type used for world and screen coordinates
pub type NativeFloat = f64;

/// Tolerance for squared distances in tests and numeric comparisons
pub const EPSILON: NativeFloat = 1e-10;

pub use config::{InsertConfig, Refinement, SearchConfig, SegmentSelect, SnapTo, SplineSelect};
pub use cubic_bezier::{CubicBezier, SplitResult};
pub use error::{Error, Result};
pub use point::Point;
pub use point_generic::{Point2, Point3, PointN};
pub use projection::{Projection, ViewState};
pub use search::{
    CandidateSpan, Candidates, ClosestPointSearch, SearchResult, DEGENERATE_TOLERANCE, MAX_REFINE_STEPS,
};
pub use session::{InputEvent, InsertSession, Insertion, Response, SessionState};
pub use spline::{beziers_from_splines, BezierPoint, CurveData, HandleType, Spline, SplineData};
