//! Orbit camera for the scene viewport

use crate::constants::camera as defaults;
use crate::scene::Aabb;
use glam::{Mat4, Vec3};

/// Camera position plus orbit target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
}

impl CameraPose {
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self { position, target }
    }

    /// Pose shown before any model has loaded
    pub fn initial() -> Self {
        Self::new(
            Vec3::from(defaults::DEFAULT_POSITION),
            Vec3::from(defaults::DEFAULT_TARGET),
        )
    }
}

/// Perspective camera with orbit, pan and zoom navigation
#[derive(Debug, Clone)]
pub struct Camera3D {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub aspect: f32,

    pub orbit_sensitivity: f32,
    pub zoom_sensitivity: f32,
}

impl Default for Camera3D {
    fn default() -> Self {
        let pose = CameraPose::initial();
        Self {
            position: pose.position,
            target: pose.target,
            up: Vec3::Y,
            fov: defaults::FOV_DEGREES.to_radians(),
            near: defaults::NEAR,
            far: defaults::FAR,
            aspect: 1.0,
            orbit_sensitivity: defaults::ORBIT_SENSITIVITY,
            zoom_sensitivity: defaults::ZOOM_SENSITIVITY,
        }
    }
}

impl Camera3D {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose::new(self.position, self.target)
    }

    pub fn set_pose(&mut self, pose: CameraPose) {
        self.position = pose.position;
        self.target = pose.target;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn build_view_projection_matrix(&self) -> Mat4 {
        let proj = Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far);
        proj * self.view_matrix()
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    pub fn distance(&self) -> f32 {
        (self.target - self.position).length()
    }

    /// Orbit around the target
    pub fn orbit(&mut self, delta_x: f32, delta_y: f32) {
        let offset = self.position - self.target;
        let radius = offset.length();
        if radius < 0.001 {
            return;
        }

        // Spherical coordinates around the target
        let mut theta = offset.z.atan2(offset.x);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

        theta += delta_x * self.orbit_sensitivity;
        phi -= delta_y * self.orbit_sensitivity;

        // Keep away from the poles
        phi = phi.clamp(0.01, std::f32::consts::PI - 0.01);

        let new_offset = Vec3::new(
            radius * phi.sin() * theta.cos(),
            radius * phi.cos(),
            radius * phi.sin() * theta.sin(),
        );
        self.position = self.target + new_offset;
    }

    /// Converts a screen delta into a world-space pan at the target distance
    pub fn screen_to_world_pan(
        &self,
        screen_delta_x: f32,
        screen_delta_y: f32,
        viewport_height: f32,
    ) -> Vec3 {
        let fov_height = 2.0 * self.distance() * (self.fov / 2.0).tan();
        let world_per_pixel = fov_height / viewport_height.max(1.0);

        let forward = (self.target - self.position).normalize_or_zero();
        let right = forward.cross(self.up).normalize_or_zero();
        let up = right.cross(forward).normalize_or_zero();

        right * (screen_delta_x * world_per_pixel) + up * (screen_delta_y * world_per_pixel)
    }

    /// Drags the scene along with the cursor
    pub fn pan(&mut self, screen_delta_x: f32, screen_delta_y: f32, viewport_height: f32) {
        let pan = self.screen_to_world_pan(-screen_delta_x, screen_delta_y, viewport_height);
        self.position += pan;
        self.target += pan;
    }

    /// Positive scroll moves toward the target
    pub fn zoom(&mut self, scroll: f32) {
        let direction = (self.position - self.target).normalize_or_zero();
        if direction == Vec3::ZERO {
            return;
        }
        let distance = (self.distance() * (-scroll * self.zoom_sensitivity).exp())
            .clamp(self.near * 10.0, self.far * 0.9);
        self.position = self.target + direction * distance;
    }

    /// Ray from the camera through a normalized (0..1) screen position
    pub fn screen_to_ray(&self, screen_x: f32, screen_y: f32) -> (Vec3, Vec3) {
        let ndc_x = screen_x * 2.0 - 1.0;
        let ndc_y = 1.0 - screen_y * 2.0;

        let inv_view_proj = self.build_view_projection_matrix().inverse();

        // glam's perspective_rh maps depth to 0..1
        let near_point = inv_view_proj.project_point3(Vec3::new(ndc_x, ndc_y, 0.0));
        let far_point = inv_view_proj.project_point3(Vec3::new(ndc_x, ndc_y, 1.0));

        (near_point, (far_point - near_point).normalize())
    }

    /// Frames the bounds from the front, or the initial pose without bounds
    pub fn reset_pose(&self, bounds: Option<&Aabb>) -> CameraPose {
        let Some(bounds) = bounds.filter(|b| !b.is_empty()) else {
            return CameraPose::initial();
        };
        let center = bounds.center();
        let size = bounds.size();
        let visible = size.x.max(size.y);
        let distance = visible / (2.0 * (self.fov / 2.0).tan()) * defaults::RESET_PADDING;
        CameraPose::new(
            Vec3::new(
                center.x,
                center.y + defaults::RESET_ELEVATION * distance,
                center.z + distance,
            ),
            center,
        )
    }

    /// Diagonal pose far enough out to see all of `bounds`
    pub fn show_all_pose(bounds: &Aabb) -> CameraPose {
        let center = bounds.center();
        let distance = defaults::SHOW_ALL_FACTOR * bounds.size().max_element();
        CameraPose::new(center + Vec3::splat(distance), center)
    }

    /// Close-up pose looking at one object
    pub fn focus_pose(bounds: &Aabb) -> CameraPose {
        let center = bounds.center();
        CameraPose::new(center + Vec3::splat(defaults::FOCUS_OFFSET), center)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn test_default_pose() {
        let camera = Camera3D::new();
        assert_eq!(camera.position, Vec3::new(100.0, 150.0, 200.0));
        assert_eq!(camera.target, Vec3::new(100.0, 0.0, 40.0));
        assert!((camera.fov - 45f32.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn test_reset_pose_frames_bounds() {
        let camera = Camera3D::new();
        let bounds = Aabb::new(Vec3::new(-10.0, 0.0, -5.0), Vec3::new(10.0, 10.0, 5.0));
        let pose = camera.reset_pose(Some(&bounds));

        let distance = 20.0 / (2.0 * (22.5f32).to_radians().tan()) * 1.05;
        assert!(approx(pose.target, Vec3::new(0.0, 5.0, 0.0)));
        assert!(approx(
            pose.position,
            Vec3::new(0.0, 5.0 + 0.3 * distance, distance)
        ));
    }

    #[test]
    fn test_reset_pose_without_model() {
        let camera = Camera3D::new();
        assert_eq!(camera.reset_pose(None), CameraPose::initial());
        assert_eq!(camera.reset_pose(Some(&Aabb::EMPTY)), CameraPose::initial());
    }

    #[test]
    fn test_show_all_and_focus_poses() {
        let bounds = Aabb::new(Vec3::ZERO, Vec3::new(4.0, 2.0, 10.0));
        let pose = Camera3D::show_all_pose(&bounds);
        assert!(approx(pose.target, Vec3::new(2.0, 1.0, 5.0)));
        assert!(approx(pose.position, Vec3::new(22.0, 21.0, 25.0)));

        let focus = Camera3D::focus_pose(&bounds);
        assert!(approx(focus.position, Vec3::new(52.0, 51.0, 55.0)));
    }

    #[test]
    fn test_orbit_keeps_distance() {
        let mut camera = Camera3D::new();
        let before = camera.distance();
        camera.orbit(40.0, -25.0);
        assert!((camera.distance() - before).abs() < 1e-2);
        assert_eq!(camera.target, Vec3::new(100.0, 0.0, 40.0));
    }

    #[test]
    fn test_zoom_moves_toward_target() {
        let mut camera = Camera3D::new();
        let before = camera.distance();
        camera.zoom(100.0);
        assert!(camera.distance() < before);
        camera.zoom(-200.0);
        assert!(camera.distance() > before);
    }

    #[test]
    fn test_pan_moves_target_and_position() {
        let mut camera = Camera3D::new();
        let offset = camera.position - camera.target;
        camera.pan(30.0, 10.0, 600.0);
        assert!(approx(camera.position - camera.target, offset));
        assert_ne!(camera.target, Vec3::new(100.0, 0.0, 40.0));
    }

    #[test]
    fn test_center_ray_points_at_target() {
        let mut camera = Camera3D::new();
        camera.set_aspect(1.5);
        let (origin, direction) = camera.screen_to_ray(0.5, 0.5);
        let expected = (camera.target - camera.position).normalize();
        assert!(approx(direction, expected));
        assert!((origin - camera.position).length() < 1.0);
    }
}
