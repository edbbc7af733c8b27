//! Eased camera transitions

use super::camera::CameraPose;
use crate::constants::camera as defaults;
use std::time::Duration;

/// Cubic ease-out: fast start, gentle stop
pub fn ease_out_cubic(progress: f32) -> f32 {
    let progress = progress.clamp(0.0, 1.0);
    1.0 - (1.0 - progress).powi(3)
}

/// One in-flight transition between two poses
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraAnimation {
    from: CameraPose,
    to: CameraPose,
    duration: Duration,
    elapsed: Duration,
}

impl CameraAnimation {
    pub fn new(from: CameraPose, to: CameraPose) -> Self {
        Self::with_duration(
            from,
            to,
            Duration::from_millis(defaults::ANIMATION_DURATION_MS),
        )
    }

    pub fn with_duration(from: CameraPose, to: CameraPose, duration: Duration) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: Duration::ZERO,
        }
    }

    pub fn destination(&self) -> CameraPose {
        self.to
    }

    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            1.0
        } else {
            (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
        }
    }

    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }

    /// Pose at the current progress
    pub fn sample(&self) -> CameraPose {
        let eased = ease_out_cubic(self.progress());
        CameraPose::new(
            self.from.position.lerp(self.to.position, eased),
            self.from.target.lerp(self.to.target, eased),
        )
    }

    /// Advances by one frame and returns the pose to show
    pub fn advance(&mut self, frame_time: Duration) -> CameraPose {
        self.elapsed = (self.elapsed + frame_time).min(self.duration);
        self.sample()
    }
}

/// Owns at most one running animation. Starting another replaces it; the
/// caller passes the live pose so the new one picks up mid-flight.
#[derive(Debug, Default, Clone)]
pub struct CameraAnimator {
    current: Option<CameraAnimation>,
}

impl CameraAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn animate_to(&mut self, live: CameraPose, to: CameraPose) {
        if self.current.is_some() {
            log::debug!("Replacing in-flight camera animation");
        }
        self.current = Some(CameraAnimation::new(live, to));
    }

    pub fn is_animating(&self) -> bool {
        self.current.is_some()
    }

    pub fn cancel(&mut self) {
        self.current = None;
    }

    /// Steps the running animation; `None` when idle
    pub fn tick(&mut self, frame_time: Duration) -> Option<CameraPose> {
        let animation = self.current.as_mut()?;
        let pose = animation.advance(frame_time);
        if animation.is_finished() {
            self.current = None;
        }
        Some(pose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn pose(x: f32) -> CameraPose {
        CameraPose::new(Vec3::new(x, 0.0, 0.0), Vec3::ZERO)
    }

    #[test]
    fn test_ease_out_cubic() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert!((ease_out_cubic(0.5) - 0.875).abs() < 1e-6);
        assert_eq!(ease_out_cubic(2.0), 1.0);
    }

    #[test]
    fn test_animation_reaches_destination() {
        let mut animation = CameraAnimation::new(pose(0.0), pose(100.0));
        let halfway = animation.advance(Duration::from_millis(500));
        assert!((halfway.position.x - 87.5).abs() < 1e-3);
        assert!(!animation.is_finished());

        let end = animation.advance(Duration::from_millis(700));
        assert_eq!(end, pose(100.0));
        assert!(animation.is_finished());
    }

    #[test]
    fn test_animator_finishes_and_idles() {
        let mut animator = CameraAnimator::new();
        assert!(animator.tick(Duration::from_millis(16)).is_none());

        animator.animate_to(pose(0.0), pose(10.0));
        let mut last = None;
        for _ in 0..100 {
            match animator.tick(Duration::from_millis(16)) {
                Some(p) => last = Some(p),
                None => break,
            }
        }
        assert_eq!(last, Some(pose(10.0)));
        assert!(!animator.is_animating());
    }

    #[test]
    fn test_second_call_starts_from_live_pose() {
        let mut animator = CameraAnimator::new();
        animator.animate_to(pose(0.0), pose(100.0));
        let live = animator.tick(Duration::from_millis(500)).unwrap();

        animator.animate_to(live, pose(-50.0));
        let next = animator.tick(Duration::ZERO).unwrap();
        assert!((next.position.x - live.position.x).abs() < 1e-4);

        let end = animator.tick(Duration::from_secs(2)).unwrap();
        assert_eq!(end, pose(-50.0));
    }
}
