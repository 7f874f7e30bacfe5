//! Interpolation of a group from its original pose to its net placement.
//!
//! Presentation only: the target placement never changes, callers just
//! sample the in-between transform while drawing the unfold.

use nalgebra::UnitQuaternion;

use crate::transform::RigidTransform;

/// Cubic ease-out: fast start, gentle landing.
#[must_use]
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// An animated unfold of one group.
#[derive(Debug, Clone, Copy)]
pub struct UnfoldAnimation {
    start: RigidTransform,
    end: RigidTransform,
}

impl UnfoldAnimation {
    /// Animate from `start` to `end`.
    #[must_use]
    pub const fn new(start: RigidTransform, end: RigidTransform) -> Self {
        Self { start, end }
    }

    /// Animate from the original (identity) pose to a placement.
    #[must_use]
    pub fn from_rest(end: RigidTransform) -> Self {
        Self::new(RigidTransform::identity(), end)
    }

    /// The final placement.
    #[must_use]
    pub const fn target(&self) -> RigidTransform {
        self.end
    }

    /// Sample the transform at progress `t` in `0..=1`, eased.
    ///
    /// Rotation is spherically interpolated, translation linearly; out of
    /// range `t` clamps to the endpoints.
    #[must_use]
    pub fn transform_at(&self, t: f64) -> RigidTransform {
        let eased = ease_out_cubic(t);
        let rotation = self
            .start
            .rotation
            .try_slerp(&self.end.rotation, eased, f64::EPSILON)
            .unwrap_or(self.end.rotation);
        let translation = self.start.translation.lerp(&self.end.translation, eased);
        RigidTransform::new(rotation, translation)
    }
}
