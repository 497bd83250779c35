//! Mapping of world space points into viewport pixels.

use nalgebra::{Matrix4, Orthographic3, Perspective3, Vector3, Vector4};

use crate::{NativeFloat, Point2, Point3};

/// A camera the search can project through.
/// Hosts that already own their projection can implement this directly.
pub trait Projection {
    /// Viewport coordinates of `point`, `None` if it lies behind the viewer
    /// or outside of `[0, width) × [0, height)`.
    fn project(&self, point: Point3) -> Option<Point2>;

    /// Viewport coordinates without the viewport rectangle test, coordinates
    /// may be negative or exceed the viewport. `None` only behind the viewer.
    fn project_unclipped(&self, point: Point3) -> Option<Point2>;

    /// Monotonic measure of the distance to the viewer, only the ordering is meaningful.
    fn depth(&self, point: Point3) -> NativeFloat;
}

/// View and projection transform of the active viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    view: Matrix4<NativeFloat>,
    projection: Matrix4<NativeFloat>,
    perspective: bool,
    width: NativeFloat,
    height: NativeFloat,
}

impl ViewState {
    pub fn new(
        view: Matrix4<NativeFloat>,
        projection: Matrix4<NativeFloat>,
        perspective: bool,
        width: NativeFloat,
        height: NativeFloat,
    ) -> Self {
        ViewState {
            view,
            projection,
            perspective,
            width,
            height,
        }
    }

    /// Perspective camera at `eye` looking at `target`, `fovy` in radians.
    #[allow(clippy::too_many_arguments)]
    pub fn perspective(
        eye: Point3,
        target: Point3,
        up: Point3,
        fovy: NativeFloat,
        width: NativeFloat,
        height: NativeFloat,
        znear: NativeFloat,
        zfar: NativeFloat,
    ) -> Self {
        let view = look_at(eye, target, up);
        let projection = Perspective3::new(width / height, fovy, znear, zfar).to_homogeneous();
        ViewState::new(view, projection, true, width, height)
    }

    /// Orthographic camera at `eye` looking at `target` showing `2 * half_height`
    /// world units vertically.
    #[allow(clippy::too_many_arguments)]
    pub fn orthographic(
        eye: Point3,
        target: Point3,
        up: Point3,
        half_height: NativeFloat,
        width: NativeFloat,
        height: NativeFloat,
        znear: NativeFloat,
        zfar: NativeFloat,
    ) -> Self {
        let view = look_at(eye, target, up);
        let half_width = half_height * width / height;
        let projection =
            Orthographic3::new(-half_width, half_width, -half_height, half_height, znear, zfar)
                .to_homogeneous();
        ViewState::new(view, projection, false, width, height)
    }

    /// True if `screen` lies inside `[0, width) × [0, height)`
    pub fn contains(&self, screen: Point2) -> bool {
        screen.x() >= 0.0 && screen.y() >= 0.0 && screen.x() < self.width && screen.y() < self.height
    }

    fn view_space(&self, point: Point3) -> Vector4<NativeFloat> {
        self.view * homogeneous(point)
    }
}

impl Projection for ViewState {
    fn project(&self, point: Point3) -> Option<Point2> {
        self.project_unclipped(point).filter(|screen| self.contains(*screen))
    }

    fn project_unclipped(&self, point: Point3) -> Option<Point2> {
        let clip = self.projection * self.view * homogeneous(point);
        if clip.w <= 0.0 {
            return None;
        }
        let half_width = self.width / 2.0;
        let half_height = self.height / 2.0;
        Some(Point2::new([
            half_width + half_width * (clip.x / clip.w),
            half_height + half_height * (clip.y / clip.w),
        ]))
    }

    fn depth(&self, point: Point3) -> NativeFloat {
        let view = self.view_space(point);
        if self.perspective {
            view.xyz().norm()
        } else {
            -view.z
        }
    }
}

fn homogeneous(point: Point3) -> Vector4<NativeFloat> {
    Vector4::new(point.x(), point.y(), point.z(), 1.0)
}

fn look_at(eye: Point3, target: Point3, up: Point3) -> Matrix4<NativeFloat> {
    Matrix4::look_at_rh(
        &eye.into(),
        &target.into(),
        &Vector3::new(up.x(), up.y(), up.z()),
    )
}
