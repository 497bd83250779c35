//! Interactive insertion: the cursor is tracked on the candidate segments
//! until the user confirms or cancels.
//!
//! ```text
//! begin ──► Selecting ◄──► Refining ──confirm──► Committed
//!               │              │
//!               └───cancel─────┴──────────────► Cancelled
//! ```

use crate::config::{InsertConfig, SegmentSelect, SnapTo, SplineSelect};
use crate::cubic_bezier::SplitResult;
use crate::error::{Error, Result};
use crate::projection::Projection;
use crate::search::{Candidates, ClosestPointSearch, SearchResult, DEGENERATE_TOLERANCE};
use crate::spline::{beziers_from_splines, CurveData, Spline};
use crate::{Point2, Point3};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No candidate is visible, nothing would be inserted
    Selecting,
    /// A split location is tracked and can be confirmed
    Refining,
    Committed,
    Cancelled,
}

impl SessionState {
    pub fn is_finished(&self) -> bool {
        matches!(self, SessionState::Committed | SessionState::Cancelled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Cursor moved to a new viewport position
    PointerMove(Point2),
    Confirm,
    Cancel,
    /// View navigation the host handles itself
    Navigate,
}

/// Outcome of a handled event.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// The session keeps running
    Running,
    /// The event is not consumed, the host should process it
    PassThrough,
    Committed(Insertion),
    Cancelled,
}

/// A committed insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct Insertion {
    pub result: SearchResult,
    pub split: SplitResult<Point3>,
    /// Index of the new anchor inside `curve.splines[result.spline]`
    pub point_index: usize,
    /// The curve with the new anchor written back
    pub curve: CurveData,
}

/// One interactive point insertion on a host curve.
#[derive(Debug, Clone)]
pub struct InsertSession<V> {
    curve: CurveData,
    splines: Vec<Spline>,
    candidates: Candidates,
    search: ClosestPointSearch,
    view: V,
    state: SessionState,
    result: Option<SearchResult>,
}

impl<V: Projection> InsertSession<V> {
    /// Start a session with the cursor at `cursor`.
    /// The candidate set is fixed for the lifetime of the session.
    pub fn begin(curve: CurveData, config: &InsertConfig, view: V, cursor: Point2) -> Result<Self> {
        if curve.segment_count() == 0 {
            return Err(Error::EmptyCurve);
        }
        let search = ClosestPointSearch::new(config.search)?;
        let splines = beziers_from_splines(&curve.splines);
        let candidates = candidate_set(&curve, &splines, config, &search, &view, cursor)?;
        log::debug!("insert session candidates: {:?}", candidates.spans());

        let mut session = InsertSession {
            curve,
            splines,
            candidates,
            search,
            view,
            state: SessionState::Selecting,
            result: None,
        };
        session.track(cursor)?;
        Ok(session)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The tracked split location, only present while refining
    pub fn result(&self) -> Option<SearchResult> {
        self.result
    }

    pub fn candidates(&self) -> &Candidates {
        &self.candidates
    }

    pub fn curve(&self) -> &CurveData {
        &self.curve
    }

    pub fn splines(&self) -> &[Spline] {
        &self.splines
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// The split that confirming now would write back, for drawing a preview
    pub fn preview(&self) -> Option<SplitResult<Point3>> {
        let result = self.result?;
        let bezier = result.bezier(&self.splines).ok()?;
        Some(bezier.split(result.t))
    }

    pub fn handle(&mut self, event: InputEvent) -> Result<Response> {
        if self.state.is_finished() {
            return Err(Error::SessionClosed);
        }
        match event {
            InputEvent::Navigate => Ok(Response::PassThrough),
            InputEvent::Cancel => {
                self.transition(SessionState::Cancelled);
                self.result = None;
                Ok(Response::Cancelled)
            }
            InputEvent::PointerMove(cursor) => {
                self.track(cursor)?;
                Ok(Response::Running)
            }
            InputEvent::Confirm => self.commit().map(Response::Committed),
        }
    }

    fn track(&mut self, cursor: Point2) -> Result<()> {
        match self
            .search
            .closest_2d(&self.splines, &self.candidates, cursor, &self.view)
        {
            Ok(result) => {
                self.result = Some(result);
                self.transition(SessionState::Refining);
                Ok(())
            }
            Err(Error::NoCandidateFound) => {
                self.result = None;
                self.transition(SessionState::Selecting);
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    fn commit(&mut self) -> Result<Insertion> {
        let result = self.result.ok_or(Error::NoCandidateFound)?;
        let t = result.check_split(DEGENERATE_TOLERANCE).map_err(|err| {
            log::warn!("refusing to insert: {}", err);
            err
        })?;
        let split = result.bezier(&self.splines)?.split(t);

        let mut curve = self.curve.clone();
        let point_index = curve.insert_split(result.spline, result.segment, &split)?;
        self.transition(SessionState::Committed);
        log::info!(
            "inserted point {} into spline {} at t={:.4}",
            point_index,
            result.spline,
            t
        );

        Ok(Insertion {
            result,
            split,
            point_index,
            curve,
        })
    }

    fn transition(&mut self, next: SessionState) {
        if self.state != next {
            log::debug!("insert session {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }
}

/// Segments the session may snap to, following the snap policies
fn candidate_set<V: Projection>(
    curve: &CurveData,
    splines: &[Spline],
    config: &InsertConfig,
    search: &ClosestPointSearch,
    view: &V,
    cursor: Point2,
) -> Result<Candidates> {
    if config.snap_to == SnapTo::All {
        return Ok(Candidates::all(splines));
    }

    let spline = match config.single_select {
        SplineSelect::Active => curve.active.unwrap_or(0),
        SplineSelect::Closest => search
            .closest_3d(splines, &Candidates::all(splines), view)
            .map_or(0, |(spline, _)| spline),
    };
    let whole_spline = Candidates::spline(splines, spline)?;
    if config.snap_to == SnapTo::Single || whole_spline.segments(splines).next().is_none() {
        return Ok(whole_spline);
    }

    let segment = match config.segment_select {
        // nothing selected keeps the whole spline
        SegmentSelect::Selected => match curve.splines[spline].first_selected_segment() {
            Some(segment) => segment,
            None => return Ok(whole_spline),
        },
        SegmentSelect::Closest => match search.closest_2d(splines, &whole_spline, cursor, view) {
            Ok(result) => result.segment,
            Err(Error::NoCandidateFound) => 0,
            Err(err) => return Err(err),
        },
    };
    Candidates::segment(splines, spline, segment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;
    use crate::projection::ViewState;
    use crate::search::CandidateSpan;
    use crate::spline::{BezierPoint, HandleType, SplineData};
    use crate::Point;
    use approx::assert_abs_diff_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new([x, y, z])
    }

    /// An arch from (0,0) to (3,0) followed by a straight run to (6,0), moved by `offset`
    fn spline_at(offset: Point3) -> SplineData {
        SplineData::new(vec![
            BezierPoint::new(p(0.0, 0.0, 0.0) + offset, p(-1.0, -1.0, 0.0) + offset, p(1.0, 1.0, 0.0) + offset),
            BezierPoint::new(p(3.0, 0.0, 0.0) + offset, p(2.0, 1.0, 0.0) + offset, p(4.0, 0.0, 0.0) + offset),
            BezierPoint::new(p(6.0, 0.0, 0.0) + offset, p(5.0, 0.0, 0.0) + offset, p(7.0, 0.0, 0.0) + offset),
        ])
    }

    /// Spline 1 sits above spline 0 and further away from the camera
    fn two_spline_curve() -> CurveData {
        CurveData::new(vec![
            spline_at(p(0.0, 0.0, 0.0)),
            spline_at(p(0.0, 3.0, -2.0)),
        ])
    }

    fn front_view() -> ViewState {
        ViewState::orthographic(
            p(3.0, 1.5, 10.0),
            p(3.0, 1.5, 0.0),
            p(0.0, 1.0, 0.0),
            5.0,
            800.0,
            600.0,
            0.1,
            100.0,
        )
    }

    /// Looks away from every curve
    fn empty_view() -> ViewState {
        ViewState::orthographic(
            p(300.0, 0.0, 10.0),
            p(300.0, 0.0, 0.0),
            p(0.0, 1.0, 0.0),
            5.0,
            800.0,
            600.0,
            0.1,
            100.0,
        )
    }

    fn on_curve(curve: &CurveData, spline: usize, segment: usize, t: f64) -> Point2 {
        let bezier = curve.splines[spline].to_spline().segment(segment).copied().unwrap();
        front_view().project(bezier.eval(t)).unwrap()
    }

    fn config(snap_to: SnapTo, single_select: SplineSelect, segment_select: SegmentSelect) -> InsertConfig {
        InsertConfig {
            snap_to,
            single_select,
            segment_select,
            search: SearchConfig::default(),
        }
    }

    #[test]
    fn begin_tracks_the_cursor() {
        let curve = two_spline_curve();
        let cursor = on_curve(&curve, 0, 0, 0.4);
        let session = InsertSession::begin(curve, &InsertConfig::default(), front_view(), cursor).unwrap();
        assert_eq!(session.state(), SessionState::Refining);
        let result = session.result().unwrap();
        assert_eq!((result.spline, result.segment), (0, 0));
        assert_abs_diff_eq!(result.t, 0.4, epsilon = 1e-2);

        let preview = session.preview().unwrap();
        let at = session.splines()[0].segment(0).unwrap().eval(result.t);
        assert!((preview.anchor() - at).squared_length() < crate::EPSILON);
    }

    #[test]
    fn confirm_writes_back_and_closes() {
        let curve = two_spline_curve();
        let cursor = on_curve(&curve, 0, 1, 0.5);
        let mut session =
            InsertSession::begin(curve.clone(), &InsertConfig::default(), front_view(), cursor).unwrap();

        let insertion = match session.handle(InputEvent::Confirm).unwrap() {
            Response::Committed(insertion) => insertion,
            other => panic!("expected a commit, got {:?}", other),
        };
        assert_eq!(session.state(), SessionState::Committed);
        assert_eq!(insertion.point_index, 2);

        let points = &insertion.curve.splines[0].points;
        assert_eq!(points.len(), 4);
        assert_eq!(points[2].co, insertion.split.anchor());
        assert_eq!(points[2].handle_left_type, HandleType::Aligned);
        assert!(points[2].selected);
        assert_eq!(points.iter().filter(|point| point.selected).count(), 1);
        // the host's curve is untouched until it takes the insertion
        assert_eq!(session.curve(), &curve);
        assert_eq!(insertion.curve.splines[1], curve.splines[1]);

        assert!(matches!(session.handle(InputEvent::Confirm), Err(Error::SessionClosed)));
        assert!(matches!(session.handle(InputEvent::Navigate), Err(Error::SessionClosed)));
    }

    #[test]
    fn cancel_closes_without_changes() {
        let curve = two_spline_curve();
        let cursor = on_curve(&curve, 0, 0, 0.5);
        let mut session = InsertSession::begin(curve, &InsertConfig::default(), front_view(), cursor).unwrap();
        assert_eq!(session.handle(InputEvent::Cancel).unwrap(), Response::Cancelled);
        assert_eq!(session.state(), SessionState::Cancelled);
        assert!(session.result().is_none());
        assert!(matches!(
            session.handle(InputEvent::PointerMove(cursor)),
            Err(Error::SessionClosed)
        ));
    }

    #[test]
    fn navigate_passes_through() {
        let curve = two_spline_curve();
        let cursor = on_curve(&curve, 0, 0, 0.5);
        let mut session = InsertSession::begin(curve, &InsertConfig::default(), front_view(), cursor).unwrap();
        let before = session.result();
        assert_eq!(session.handle(InputEvent::Navigate).unwrap(), Response::PassThrough);
        assert_eq!(session.state(), SessionState::Refining);
        assert_eq!(session.result(), before);
    }

    #[test]
    fn pointer_moves_follow_the_cursor() {
        let curve = two_spline_curve();
        let start = on_curve(&curve, 0, 0, 0.2);
        let end = on_curve(&curve, 0, 1, 0.6);
        let mut session = InsertSession::begin(curve, &InsertConfig::default(), front_view(), start).unwrap();
        assert_eq!(session.handle(InputEvent::PointerMove(end)).unwrap(), Response::Running);
        let result = session.result().unwrap();
        assert_eq!(result.segment, 1);
        assert_abs_diff_eq!(result.t, 0.6, epsilon = 1e-2);
    }

    #[test]
    fn nothing_visible_stays_selecting() {
        let curve = two_spline_curve();
        let mut session = InsertSession::begin(
            curve,
            &InsertConfig::default(),
            empty_view(),
            Point2::new([400.0, 300.0]),
        )
        .unwrap();
        assert_eq!(session.state(), SessionState::Selecting);
        assert!(session.preview().is_none());
        assert!(matches!(session.handle(InputEvent::Confirm), Err(Error::NoCandidateFound)));
        assert_eq!(session.state(), SessionState::Selecting);
        assert_eq!(
            session.handle(InputEvent::PointerMove(Point2::new([10.0, 10.0]))).unwrap(),
            Response::Running
        );
        assert_eq!(session.state(), SessionState::Selecting);
    }

    #[test]
    fn degenerate_confirm_keeps_refining() {
        let curve = CurveData::new(vec![SplineData::new(spline_at(p(0.0, 0.0, 0.0)).points[..2].to_vec())]);
        let cursor = on_curve(&curve, 0, 0, 0.0);
        let mut session = InsertSession::begin(curve, &InsertConfig::default(), front_view(), cursor).unwrap();
        assert_eq!(session.state(), SessionState::Refining);
        assert!(matches!(
            session.handle(InputEvent::Confirm),
            Err(Error::DegenerateSplit { .. })
        ));
        assert_eq!(session.state(), SessionState::Refining);

        // moving on to the middle makes the insertion possible again
        let inside = on_curve(session.curve(), 0, 0, 0.5);
        session.handle(InputEvent::PointerMove(inside)).unwrap();
        assert!(matches!(session.handle(InputEvent::Confirm), Ok(Response::Committed(_))));
    }

    #[test]
    fn empty_curve_is_rejected() {
        let single = SplineData::new(vec![BezierPoint::default()]);
        let result = InsertSession::begin(
            CurveData::new(vec![single]),
            &InsertConfig::default(),
            front_view(),
            Point2::new([400.0, 300.0]),
        );
        assert!(matches!(result, Err(Error::EmptyCurve)));
        assert!(matches!(
            InsertSession::begin(CurveData::default(), &InsertConfig::default(), front_view(), Point2::default()),
            Err(Error::EmptyCurve)
        ));
    }

    #[test]
    fn snap_to_all_reaches_every_spline() {
        let curve = two_spline_curve();
        let cursor = on_curve(&curve, 1, 0, 0.3);
        let all = config(SnapTo::All, SplineSelect::Active, SegmentSelect::Closest);
        let session = InsertSession::begin(curve.clone(), &all, front_view(), cursor).unwrap();
        assert_eq!(session.result().unwrap().spline, 1);

        // restricted to the active spline the cursor snaps to spline 0
        let single = config(SnapTo::Single, SplineSelect::Active, SegmentSelect::Closest);
        let session = InsertSession::begin(curve.with_active(0), &single, front_view(), cursor).unwrap();
        assert_eq!(session.result().unwrap().spline, 0);
    }

    #[test]
    fn single_closest_picks_the_nearest_spline() {
        let curve = two_spline_curve().with_active(1);
        let cursor = on_curve(&curve, 1, 0, 0.3);
        let closest = config(SnapTo::Single, SplineSelect::Closest, SegmentSelect::Closest);
        let session = InsertSession::begin(curve, &closest, front_view(), cursor).unwrap();
        // spline 0 is nearer to the viewer even though the cursor sits on spline 1
        assert_eq!(session.candidates().spans()[0].spline, 0);
        assert_eq!(session.result().unwrap().spline, 0);
    }

    #[test]
    fn segment_policies() {
        let mut curve = two_spline_curve().with_active(0);
        let cursor = on_curve(&curve, 0, 1, 0.5);
        let closest = config(SnapTo::Segment, SplineSelect::Active, SegmentSelect::Closest);
        let session = InsertSession::begin(curve.clone(), &closest, front_view(), cursor).unwrap();
        assert_eq!(session.candidates().segments(session.splines()).count(), 1);
        assert_eq!(session.result().unwrap().segment, 1);

        // the first selected anchor picks segment 0 regardless of the cursor
        curve.splines[0].points[0].selected = true;
        let selected = config(SnapTo::Segment, SplineSelect::Active, SegmentSelect::Selected);
        let session = InsertSession::begin(curve.clone(), &selected, front_view(), cursor).unwrap();
        assert_eq!(session.result().unwrap().segment, 0);

        // without a selection every segment of the spline stays a candidate
        curve.splines[0].points[0].selected = false;
        let mut session = InsertSession::begin(curve.clone(), &selected, front_view(), cursor).unwrap();
        assert_eq!(session.candidates().spans(), &[CandidateSpan { spline: 0, segment: None }]);
        assert_eq!(session.result().unwrap().segment, 1);
        session
            .handle(InputEvent::PointerMove(on_curve(&curve, 0, 0, 0.5)))
            .unwrap();
        assert_eq!(session.result().unwrap().segment, 0);
    }

    #[test]
    fn invalid_active_spline_is_reported() {
        let curve = two_spline_curve().with_active(7);
        let cursor = Point2::new([400.0, 300.0]);
        let result = InsertSession::begin(curve, &InsertConfig::default(), front_view(), cursor);
        assert!(matches!(result, Err(Error::SplineOutOfRange { spline: 7 })));
    }
}
