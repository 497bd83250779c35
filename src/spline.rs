//! Value-type mirror of a host curve (anchors with left/right handles) and
//! its conversion into cubic segments.

use core::slice;

use crate::cubic_bezier::{CubicBezier, SplitResult};
use crate::error::{Error, Result};
use crate::{NativeFloat, Point3};

/// Handle behaviour as known from curve editors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandleType {
    #[default]
    Free,
    /// Both handles stay colinear through the anchor
    Aligned,
    Vector,
    Auto,
}

/// One anchor of a spline with its two handles.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BezierPoint {
    pub co: Point3,
    pub handle_left: Point3,
    pub handle_right: Point3,
    pub handle_left_type: HandleType,
    pub handle_right_type: HandleType,
    pub selected: bool,
}

impl BezierPoint {
    pub fn new(co: Point3, handle_left: Point3, handle_right: Point3) -> Self {
        BezierPoint {
            co,
            handle_left,
            handle_right,
            ..Default::default()
        }
    }
}

/// Ordered anchors of one continuous spline.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SplineData {
    pub points: Vec<BezierPoint>,
}

impl SplineData {
    pub fn new(points: Vec<BezierPoint>) -> Self {
        SplineData { points }
    }

    /// Number of cubic segments between consecutive anchors
    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Index of the segment starting at the first selected anchor
    pub fn first_selected_segment(&self) -> Option<usize> {
        self.points
            .iter()
            .take(self.segment_count())
            .position(|point| point.selected)
    }

    /// Cubic segments `(co_i, handle_right_i, handle_left_i+1, co_i+1)`
    pub fn to_spline(&self) -> Spline {
        let segments = self
            .points
            .windows(2)
            .map(|pair| CubicBezier::new(pair[0].co, pair[0].handle_right, pair[1].handle_left, pair[1].co))
            .collect();
        Spline { segments }
    }

    /// Write a subdivision of `segment` back into the anchors.
    /// The new anchor is inserted after `segment`, gets aligned handles and is
    /// the only selected point afterwards. Returns the index of the new anchor.
    pub fn insert_split(&mut self, segment: usize, split: &SplitResult<Point3>) -> Result<usize> {
        let count = self.segment_count();
        if segment >= count {
            return Err(Error::SegmentPastEnd { segment, count });
        }
        let [_, p12, p123, p1234, p234, p34, _] = split.points();

        for point in self.points.iter_mut() {
            point.selected = false;
        }

        self.points[segment].handle_right = p12;
        self.points[segment + 1].handle_left = p34;
        self.points.insert(
            segment + 1,
            BezierPoint {
                co: p1234,
                handle_left: p123,
                handle_right: p234,
                handle_left_type: HandleType::Aligned,
                handle_right_type: HandleType::Aligned,
                selected: true,
            },
        );
        Ok(segment + 1)
    }
}

/// A host curve: several splines, one of which may be active.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CurveData {
    pub splines: Vec<SplineData>,
    pub active: Option<usize>,
}

impl CurveData {
    pub fn new(splines: Vec<SplineData>) -> Self {
        CurveData {
            splines,
            active: None,
        }
    }

    pub fn with_active(self, active: usize) -> Self {
        CurveData {
            active: Some(active),
            ..self
        }
    }

    pub fn segment_count(&self) -> usize {
        self.splines.iter().map(SplineData::segment_count).sum()
    }

    /// Insert a split of `segment` of `spline`, every other point gets deselected.
    pub fn insert_split(&mut self, spline: usize, segment: usize, split: &SplitResult<Point3>) -> Result<usize> {
        let count = self
            .splines
            .get(spline)
            .ok_or(Error::SplineOutOfRange { spline })?
            .segment_count();
        if segment >= count {
            return Err(Error::SegmentOutOfRange { spline, segment });
        }
        for data in self.splines.iter_mut() {
            for point in data.points.iter_mut() {
                point.selected = false;
            }
        }
        self.splines[spline].insert_split(segment, split)
    }
}

/// The cubic segments of one spline, in order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Spline {
    segments: Vec<CubicBezier<Point3>>,
}

impl Spline {
    pub fn new(segments: Vec<CubicBezier<Point3>>) -> Self {
        Spline { segments }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segment(&self, index: usize) -> Option<&CubicBezier<Point3>> {
        self.segments.get(index)
    }

    pub fn segments(&self) -> slice::Iter<'_, CubicBezier<Point3>> {
        self.segments.iter()
    }

    /// Evaluate a point along the whole spline for t in [0,1], every segment
    /// covers an equal share. Values outside the range are clamped. Returns None for empty splines.
    pub fn eval(&self, t: NativeFloat) -> Option<Point3> {
        let (index, local_t) = self.segment_parameter(t)?;
        Some(self.segments[index].eval(local_t))
    }

    fn segment_parameter(&self, t: NativeFloat) -> Option<(usize, NativeFloat)> {
        let count = self.segments.len();
        if count == 0 {
            return None;
        }

        let count_native = count as NativeFloat;
        let scaled = t.clamp(0.0, 1.0) * count_native;
        if scaled >= count_native {
            return Some((count - 1, 1.0));
        }

        let index = scaled.floor() as usize;
        Some((index, scaled - index as NativeFloat))
    }
}

/// Convert every spline of a host curve into its cubic segments
pub fn beziers_from_splines(splines: &[SplineData]) -> Vec<Spline> {
    splines.iter().map(SplineData::to_spline).collect()
}
