//! Closest point search: maps a cursor position to a spline, a segment and
//! a curve parameter.
//!
//! The search samples every candidate segment coarsely in screen space and
//! then refines the parameter around the best sample. The default refinement
//! is a distance equalizing bisection, it converges on a local minimum of the
//! screen distance but is not guaranteed to find the global one when a
//! segment curls back towards the cursor.

use tinyvec::TinyVec;

use crate::config::{Refinement, SearchConfig};
use crate::cubic_bezier::{scalar_ratio, CubicBezier};
use crate::error::{Error, Result};
use crate::projection::Projection;
use crate::spline::Spline;
use crate::{NativeFloat, Point, Point2, Point3};

/// Upper bound of refinement iterations per search.
pub const MAX_REFINE_STEPS: usize = 64;

/// Parameters closer than this to 0 or 1 are treated as touching an anchor.
pub const DEGENERATE_TOLERANCE: NativeFloat = 1e-6;

/// Bracket width in parameter space at which golden-section refinement stops.
const GOLDEN_SECTION_TOLERANCE: NativeFloat = 1e-7;

const INV_PHI: NativeFloat = 0.618_033_988_749_894_9;

/// Segments of one spline that take part in a search, `segment: None` means all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CandidateSpan {
    pub spline: usize,
    pub segment: Option<usize>,
}

/// The set of segments a search may snap to.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Candidates {
    spans: TinyVec<[CandidateSpan; 4]>,
}

impl Candidates {
    /// An empty set, every search on it fails with `NoCandidateFound`
    pub fn none() -> Self {
        Candidates::default()
    }

    /// Every segment of every spline
    pub fn all(splines: &[Spline]) -> Self {
        Candidates {
            spans: (0..splines.len())
                .map(|spline| CandidateSpan { spline, segment: None })
                .collect(),
        }
    }

    /// Every segment of one spline
    pub fn spline(splines: &[Spline], spline: usize) -> Result<Self> {
        if spline >= splines.len() {
            return Err(Error::SplineOutOfRange { spline });
        }
        let mut spans = TinyVec::new();
        spans.push(CandidateSpan { spline, segment: None });
        Ok(Candidates { spans })
    }

    /// A single segment
    pub fn segment(splines: &[Spline], spline: usize, segment: usize) -> Result<Self> {
        let data = splines.get(spline).ok_or(Error::SplineOutOfRange { spline })?;
        if segment >= data.len() {
            return Err(Error::SegmentOutOfRange { spline, segment });
        }
        let mut spans = TinyVec::new();
        spans.push(CandidateSpan {
            spline,
            segment: Some(segment),
        });
        Ok(Candidates { spans })
    }

    pub fn spans(&self) -> &[CandidateSpan] {
        &self.spans
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Iterate over `(spline, segment, curve)` of every candidate segment
    pub fn segments<'a>(
        &'a self,
        splines: &'a [Spline],
    ) -> impl Iterator<Item = (usize, usize, &'a CubicBezier<Point3>)> + 'a {
        self.spans.iter().flat_map(move |span| {
            let segments = splines.get(span.spline).map(Spline::segments).into_iter().flatten();
            segments
                .enumerate()
                .filter(move |(segment, _)| span.segment.map_or(true, |only| only == *segment))
                .map(move |(segment, bezier)| (span.spline, segment, bezier))
        })
    }
}

/// Location on a curve: the spline, its segment and the parameter on that segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchResult {
    pub spline: usize,
    pub segment: usize,
    pub t: NativeFloat,
}

impl SearchResult {
    /// True if `t` is within `tolerance` of a segment endpoint
    pub fn is_degenerate(&self, tolerance: NativeFloat) -> bool {
        self.t <= tolerance || self.t >= 1.0 - tolerance
    }

    /// The exact parameter, or `DegenerateSplit` if splitting there would
    /// only duplicate an existing anchor.
    pub fn check_split(&self, tolerance: NativeFloat) -> Result<NativeFloat> {
        if self.is_degenerate(tolerance) {
            return Err(Error::DegenerateSplit { t: self.t });
        }
        Ok(self.t)
    }

    /// The curve this result points into
    pub fn bezier<'a>(&self, splines: &'a [Spline]) -> Result<&'a CubicBezier<Point3>> {
        splines
            .get(self.spline)
            .and_then(|spline| spline.segment(self.segment))
            .ok_or(Error::SegmentOutOfRange {
                spline: self.spline,
                segment: self.segment,
            })
    }
}

/// Best coarse sample found so far
#[derive(Debug, Clone, Copy)]
struct Sample {
    spline: usize,
    segment: usize,
    index: usize,
    distance: NativeFloat,
}

/// Coarse sampling plus refinement over a candidate set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestPointSearch {
    config: SearchConfig,
}

impl ClosestPointSearch {
    pub fn new(config: SearchConfig) -> Result<Self> {
        config.validate()?;
        Ok(ClosestPointSearch { config })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// The candidate segment with the visible sample nearest to the viewer.
    /// Samples `t = i/N` for `i = 0..=N`, samples outside of the viewport are skipped.
    /// Returns None if no sample of any candidate is visible.
    pub fn closest_3d<V: Projection>(
        &self,
        splines: &[Spline],
        candidates: &Candidates,
        view: &V,
    ) -> Option<(usize, usize)> {
        let samples = self.config.samples();
        let mut best: Option<(usize, usize, NativeFloat)> = None;

        for (spline, segment, bezier) in candidates.segments(splines) {
            for i in 0..=samples {
                let point = bezier.eval(scalar_ratio(i, samples));
                if view.project(point).is_none() {
                    continue;
                }
                let depth = view.depth(point);
                if best.map_or(true, |(_, _, nearest)| depth < nearest) {
                    best = Some((spline, segment, depth));
                }
            }
        }

        log::debug!("closest_3d: {:?}", best);
        best.map(|(spline, segment, _)| (spline, segment))
    }

    /// The location on the candidate segments closest to `cursor` on screen.
    pub fn closest_2d<V: Projection>(
        &self,
        splines: &[Spline],
        candidates: &Candidates,
        cursor: Point2,
        view: &V,
    ) -> Result<SearchResult> {
        let best = self.coarse(splines, candidates, cursor, view).ok_or(Error::NoCandidateFound)?;
        let bezier = splines
            .get(best.spline)
            .and_then(|spline| spline.segment(best.segment))
            .ok_or(Error::NoCandidateFound)?;

        let samples = self.config.samples();
        let t_a = scalar_ratio(best.index - 1, samples);
        let t_b = scalar_ratio(best.index + 1, samples);
        let t = match self.config.refinement() {
            Refinement::Bisection => self.bisect(bezier, t_a, t_b, cursor, view),
            Refinement::GoldenSection => golden_section(bezier, t_a, t_b, cursor, view),
        };

        let result = SearchResult {
            spline: best.spline,
            segment: best.segment,
            t,
        };
        log::debug!(
            "closest_2d: coarse sample {} at distance {:.3}, refined to {:?}",
            best.index,
            best.distance,
            result
        );
        Ok(result)
    }

    /// Interior samples `t = i/N`, `i = 1..N-1`, of every candidate; the
    /// anchors themselves are never sampled.
    fn coarse<V: Projection>(
        &self,
        splines: &[Spline],
        candidates: &Candidates,
        cursor: Point2,
        view: &V,
    ) -> Option<Sample> {
        let samples = self.config.samples();
        let mut best: Option<Sample> = None;

        for (spline, segment, bezier) in candidates.segments(splines) {
            for index in 1..samples {
                let distance = screen_distance(bezier, scalar_ratio(index, samples), cursor, view);
                if !distance.is_finite() {
                    continue;
                }
                if best.map_or(true, |sample| distance < sample.distance) {
                    best = Some(Sample {
                        spline,
                        segment,
                        index,
                        distance,
                    });
                }
            }
        }
        best
    }

    /// Halve the bracket by moving the farther end to the midpoint until both
    /// ends are equally far from the cursor (within epsilon). Returns the closer end.
    fn bisect<V: Projection>(
        &self,
        bezier: &CubicBezier<Point3>,
        mut t_a: NativeFloat,
        mut t_b: NativeFloat,
        cursor: Point2,
        view: &V,
    ) -> NativeFloat {
        let epsilon = self.config.epsilon();
        let mut d_a = refine_distance(bezier, t_a, cursor, view);
        let mut d_b = refine_distance(bezier, t_b, cursor, view);

        // at least one step, a cursor right on the coarse sample must not
        // stop at the symmetric bracket around it
        for step in 0..MAX_REFINE_STEPS {
            if d_a > d_b {
                core::mem::swap(&mut t_a, &mut t_b);
                core::mem::swap(&mut d_a, &mut d_b);
            }
            t_b = (t_a + t_b) / 2.0;
            d_b = refine_distance(bezier, t_b, cursor, view);

            let difference = (d_a - d_b).abs();
            log::trace!("bisect step {}: t_a={} t_b={} difference={}", step, t_a, t_b, difference);
            // NaN when both ends are behind the viewer
            if !(difference >= epsilon) {
                break;
            }
        }

        if d_b < d_a {
            t_b
        } else {
            t_a
        }
    }
}

/// Golden-section minimization of the screen distance on `[t_a, t_b]`
fn golden_section<V: Projection>(
    bezier: &CubicBezier<Point3>,
    t_a: NativeFloat,
    t_b: NativeFloat,
    cursor: Point2,
    view: &V,
) -> NativeFloat {
    let (mut lo, mut hi) = (t_a.min(t_b), t_a.max(t_b));
    let mut c = hi - INV_PHI * (hi - lo);
    let mut d = lo + INV_PHI * (hi - lo);
    let mut f_c = refine_distance(bezier, c, cursor, view);
    let mut f_d = refine_distance(bezier, d, cursor, view);

    for _ in 0..MAX_REFINE_STEPS {
        if hi - lo <= GOLDEN_SECTION_TOLERANCE {
            break;
        }
        if f_c < f_d {
            hi = d;
            d = c;
            f_d = f_c;
            c = hi - INV_PHI * (hi - lo);
            f_c = refine_distance(bezier, c, cursor, view);
        } else {
            lo = c;
            c = d;
            f_c = f_d;
            d = lo + INV_PHI * (hi - lo);
            f_d = refine_distance(bezier, d, cursor, view);
        }
    }
    log::trace!("golden section converged on [{}, {}]", lo, hi);

    if f_c < f_d {
        c
    } else {
        d
    }
}

/// Screen distance between the curve at `t` and the cursor, infinite when out of view
fn screen_distance<V: Projection>(
    bezier: &CubicBezier<Point3>,
    t: NativeFloat,
    cursor: Point2,
    view: &V,
) -> NativeFloat {
    view.project(bezier.eval(t))
        .map_or(NativeFloat::INFINITY, |screen| screen.distance(cursor))
}

/// Screen distance for refinement: points beside the viewport still count,
/// only points behind the viewer are infinitely far.
fn refine_distance<V: Projection>(
    bezier: &CubicBezier<Point3>,
    t: NativeFloat,
    cursor: Point2,
    view: &V,
) -> NativeFloat {
    view.project_unclipped(bezier.eval(t))
        .map_or(NativeFloat::INFINITY, |screen| screen.distance(cursor))
}
