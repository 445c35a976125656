//! Camera control: view-mode presets, orbit/zoom/pan, auto-framing
//!
//! The controller is the only writer of camera state. Pointer input is fed
//! through explicit transition functions over an owned drag state, so the
//! controller stays independent of any particular event dispatch mechanism.

use crate::camera::Camera;
use nalgebra::{Point3, Vector3};
use parascope_core::Aabb;

/// Radians of rotation per pixel of drag
const ORBIT_SPEED: f32 = 0.01;

/// Polar angle clamp, strictly inside (0, pi) to avoid gimbal flip
const POLAR_MIN: f32 = 0.1;
const POLAR_MAX: f32 = std::f32::consts::PI - 0.1;

/// Multiplicative zoom factors per wheel tick
const ZOOM_OUT_FACTOR: f32 = 1.1;
const ZOOM_IN_FACTOR: f32 = 0.9;

/// Camera distance band
const MIN_DISTANCE: f32 = 1_000.0;
const MAX_DISTANCE: f32 = 50_000.0;

/// Pan translation per pixel, as a fraction of the camera distance
const PAN_SPEED: f32 = 0.001;

/// Auto-framing: camera offset per unit of bounding-box size, and the floor
/// that keeps a zero-volume box from producing a degenerate look vector
const FRAME_DISTANCE_FACTOR: f32 = 1.5;
const MIN_FRAME_DISTANCE: f32 = 1_000.0;
const FRAME_DIRECTION: Vector3<f32> = Vector3::new(0.8, 1.0, -0.8);

/// Canonical poses for the two view modes
const PERSPECTIVE_EYE: Point3<f32> = Point3::new(15_000.0, 10_000.0, -15_000.0);
const TOP_DOWN_EYE: Point3<f32> = Point3::new(0.0, 20_000.0, 0.0);

/// Discrete camera presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Perspective,
    TopDown,
}

/// Pointer buttons the controller distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// Explicit pointer input state
#[derive(Debug, Clone, Copy, Default)]
pub struct DragState {
    pub primary_down: bool,
    pub secondary_down: bool,
    pub last: Option<(f64, f64)>,
}

/// Orbit camera controller
#[derive(Debug, Default)]
pub struct OrbitController {
    pub mode: ViewMode,
    drag: DragState,
}

impl OrbitController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a view-mode preset. Idempotent: entering the current mode again
    /// restores the same canonical pose.
    pub fn set_view_mode(&mut self, camera: &mut Camera, mode: ViewMode) {
        self.mode = mode;
        match mode {
            ViewMode::Perspective => {
                camera.position = PERSPECTIVE_EYE;
                camera.target = Point3::origin();
                camera.up = Vector3::new(0.0, 1.0, 0.0);
            }
            ViewMode::TopDown => {
                camera.position = TOP_DOWN_EYE;
                camera.target = Point3::origin();
                // Looking straight down; Y-up would be parallel to the view
                // direction and degenerate the view basis.
                camera.up = Vector3::new(0.0, 0.0, -1.0);
            }
        }
    }

    /// Re-apply the current mode's canonical pose
    pub fn reset(&mut self, camera: &mut Camera) {
        self.set_view_mode(camera, self.mode);
    }

    /// Record a button transition
    pub fn pointer_button(&mut self, button: PointerButton, pressed: bool) {
        match button {
            PointerButton::Primary => self.drag.primary_down = pressed,
            PointerButton::Secondary => self.drag.secondary_down = pressed,
        }
    }

    /// Feed a pointer position; orbits or pans while the matching button is
    /// held. Positions are tracked even while no button is down so a drag
    /// starts from the press location.
    pub fn pointer_moved(&mut self, camera: &mut Camera, x: f64, y: f64) {
        if let Some((lx, ly)) = self.drag.last {
            let dx = (x - lx) as f32;
            let dy = (y - ly) as f32;
            if self.drag.primary_down {
                self.orbit(camera, dx, dy);
            } else if self.drag.secondary_down {
                self.pan(camera, dx, dy);
            }
        }
        self.drag.last = Some((x, y));
    }

    /// Rotate the camera around its target.
    ///
    /// Horizontal drag adjusts azimuth, vertical drag adjusts the polar
    /// angle, clamped away from the poles.
    pub fn orbit(&mut self, camera: &mut Camera, dx: f32, dy: f32) {
        let offset = camera.position - camera.target;
        let radius = offset.norm();
        if radius <= f32::EPSILON {
            return;
        }

        let mut azimuth = offset.x.atan2(offset.z);
        let mut polar = (offset.y / radius).clamp(-1.0, 1.0).acos();

        azimuth -= dx * ORBIT_SPEED;
        polar = (polar + dy * ORBIT_SPEED).clamp(POLAR_MIN, POLAR_MAX);

        camera.position = camera.target
            + Vector3::new(
                radius * polar.sin() * azimuth.sin(),
                radius * polar.cos(),
                radius * polar.sin() * azimuth.cos(),
            );
        // Up follows the polar tangent of the orbit sphere. It projects to
        // the same screen orientation as +Y away from the poles and stays
        // continuous with the top-down pose's up at them.
        camera.up = Vector3::new(
            -polar.cos() * azimuth.sin(),
            polar.sin(),
            -polar.cos() * azimuth.cos(),
        );
    }

    /// Scale the camera distance by a fixed factor per wheel tick, clamped to
    /// the distance band. Positive `scroll` zooms out.
    pub fn zoom(&mut self, camera: &mut Camera, scroll: f32) {
        if scroll == 0.0 {
            return;
        }
        let factor = if scroll > 0.0 {
            ZOOM_OUT_FACTOR
        } else {
            ZOOM_IN_FACTOR
        };

        let offset = camera.position - camera.target;
        let radius = offset.norm();
        if radius <= f32::EPSILON {
            return;
        }
        let distance = (radius * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
        camera.position = camera.target + offset / radius * distance;
    }

    /// Translate camera and target together in the camera plane
    pub fn pan(&mut self, camera: &mut Camera, dx: f32, dy: f32) {
        let view = camera.target - camera.position;
        let distance = view.norm();
        if distance <= f32::EPSILON {
            return;
        }
        let forward = view / distance;
        let right = forward.cross(&camera.up);
        if right.norm() <= f32::EPSILON {
            return;
        }
        let right = right.normalize();
        let plane_up = right.cross(&forward);

        let shift = (right * -dx + plane_up * dy) * distance * PAN_SPEED;
        camera.position += shift;
        camera.target += shift;
    }

    /// Reframe the camera around a freshly loaded bounding volume.
    ///
    /// An empty box leaves the camera untouched; a zero-volume box still
    /// produces a valid pose via the minimum-distance floor.
    pub fn frame(&mut self, camera: &mut Camera, aabb: &Aabb) {
        if aabb.is_empty() {
            return;
        }
        let center = aabb.center();
        let distance = (aabb.max_dimension() * FRAME_DISTANCE_FACTOR).max(MIN_FRAME_DISTANCE);

        camera.target = center;
        camera.position = center + FRAME_DIRECTION * distance;
        camera.up = Vector3::new(0.0, 1.0, 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rig() -> (OrbitController, Camera) {
        let mut controller = OrbitController::new();
        let mut camera = Camera::default();
        controller.set_view_mode(&mut camera, ViewMode::Perspective);
        (controller, camera)
    }

    fn azimuth_polar(camera: &Camera) -> (f32, f32) {
        let offset = camera.position - camera.target;
        let radius = offset.norm();
        (
            offset.x.atan2(offset.z),
            (offset.y / radius).clamp(-1.0, 1.0).acos(),
        )
    }

    #[test]
    fn view_mode_entry_is_idempotent() {
        let (mut controller, mut camera) = rig();

        controller.set_view_mode(&mut camera, ViewMode::TopDown);
        let once = camera.clone();
        controller.set_view_mode(&mut camera, ViewMode::TopDown);
        assert_eq!(camera, once);
    }

    #[test]
    fn top_down_looks_straight_down() {
        let (mut controller, mut camera) = rig();
        controller.set_view_mode(&mut camera, ViewMode::TopDown);
        assert_eq!(camera.position, Point3::new(0.0, 20_000.0, 0.0));
        assert_eq!(camera.target, Point3::origin());
        // View basis must stay non-degenerate.
        assert!(camera.view_matrix().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn rightward_drag_changes_azimuth_monotonically() {
        let (mut controller, mut camera) = rig();
        controller.pointer_button(PointerButton::Primary, true);

        controller.pointer_moved(&mut camera, 0.0, 0.0);
        let (start_azimuth, start_polar) = azimuth_polar(&camera);

        let mut previous = start_azimuth;
        for step in 1..=4 {
            controller.pointer_moved(&mut camera, step as f64 * 25.0, 0.0);
            let (azimuth, polar) = azimuth_polar(&camera);
            assert!(azimuth < previous, "azimuth must keep decreasing");
            assert_relative_eq!(polar, start_polar, epsilon = 1e-4);
            previous = azimuth;
        }
    }

    #[test]
    fn drag_without_button_does_not_move_camera() {
        let (mut controller, mut camera) = rig();
        let before = camera.clone();
        controller.pointer_moved(&mut camera, 0.0, 0.0);
        controller.pointer_moved(&mut camera, 100.0, 50.0);
        assert_eq!(camera, before);
    }

    #[test]
    fn orbit_preserves_radius() {
        let (mut controller, mut camera) = rig();
        let before = camera.distance();
        controller.orbit(&mut camera, 40.0, 25.0);
        assert_relative_eq!(camera.distance(), before, epsilon = 1e-2);
    }

    #[test]
    fn polar_angle_is_clamped() {
        let (mut controller, mut camera) = rig();
        controller.orbit(&mut camera, 0.0, 10_000.0);
        let (_, polar) = azimuth_polar(&camera);
        assert!(polar <= POLAR_MAX + 1e-4);

        controller.orbit(&mut camera, 0.0, -10_000.0);
        let (_, polar) = azimuth_polar(&camera);
        assert!(polar >= POLAR_MIN - 1e-4);
    }

    #[test]
    fn orbit_out_of_top_down_keeps_up_continuous() {
        let (mut controller, mut camera) = rig();
        controller.set_view_mode(&mut camera, ViewMode::TopDown);
        let before = camera.up;

        // One pixel of drag must not snap the up vector.
        controller.orbit(&mut camera, 1.0, 0.0);
        assert!(camera.up.dot(&before) > 0.98);
        assert!(camera.view_matrix().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn orbit_up_matches_world_up_on_screen() {
        let (mut controller, mut camera) = rig();
        controller.orbit(&mut camera, 30.0, -20.0);

        // Away from the poles, up must project to the same screen
        // orientation as +Y: its direction equals +Y minus the component
        // along the view axis.
        let forward = (camera.target - camera.position).normalize();
        let y_perp = Vector3::new(0.0, 1.0, 0.0) - forward * forward.y;
        assert_relative_eq!(
            y_perp.normalize().dot(&camera.up),
            1.0,
            epsilon = 1e-4
        );
    }

    #[test]
    fn zoom_is_clamped_to_distance_band() {
        let (mut controller, mut camera) = rig();

        for _ in 0..200 {
            controller.zoom(&mut camera, -1.0);
        }
        assert_relative_eq!(camera.distance(), MIN_DISTANCE, epsilon = 1.0);

        for _ in 0..200 {
            controller.zoom(&mut camera, 1.0);
        }
        assert_relative_eq!(camera.distance(), MAX_DISTANCE, epsilon = 1.0);
    }

    #[test]
    fn pan_moves_target_with_position() {
        let (mut controller, mut camera) = rig();
        let distance = camera.distance();
        controller.pan(&mut camera, 30.0, -20.0);
        assert_relative_eq!(camera.distance(), distance, epsilon = 1e-2);
        assert_ne!(camera.target, Point3::origin());
    }

    #[test]
    fn framing_empty_box_leaves_camera_untouched() {
        let (mut controller, mut camera) = rig();
        let before = camera.clone();
        controller.frame(&mut camera, &Aabb::empty());
        assert_eq!(camera, before);
    }

    #[test]
    fn framing_single_point_respects_distance_floor() {
        let (mut controller, mut camera) = rig();
        let mut aabb = Aabb::empty();
        aabb.grow(&Point3::new(100.0, 0.0, 0.0));

        controller.frame(&mut camera, &aabb);
        assert_eq!(camera.target, Point3::new(100.0, 0.0, 0.0));
        assert!(camera.distance() >= MIN_FRAME_DISTANCE);
    }

    #[test]
    fn framing_centers_on_box() {
        let (mut controller, mut camera) = rig();
        let mut aabb = Aabb::empty();
        aabb.grow(&Point3::new(0.0, 0.0, 0.0));
        aabb.grow(&Point3::new(2_000.0, 2_000.0, 2_000.0));

        controller.frame(&mut camera, &aabb);
        assert_eq!(camera.target, Point3::new(1_000.0, 1_000.0, 1_000.0));
        let expected = FRAME_DIRECTION.norm() * 2_000.0 * FRAME_DISTANCE_FACTOR;
        assert_relative_eq!(camera.distance(), expected, epsilon = 1.0);
    }
}
