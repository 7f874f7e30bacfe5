//! Rigid transforms for group placement.

use nalgebra::{Point3, Unit, UnitQuaternion, Vector3};

/// A rotation followed by a translation.
///
/// Placement never scales or shears a group, so a quaternion plus an offset
/// is the whole story.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidTransform {
    /// Rotation applied first.
    pub rotation: UnitQuaternion<f64>,
    /// Translation applied after the rotation.
    pub translation: Vector3<f64>,
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl RigidTransform {
    /// The identity transform.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            rotation: UnitQuaternion::identity(),
            translation: Vector3::zeros(),
        }
    }

    /// Create from parts.
    #[must_use]
    pub const fn new(rotation: UnitQuaternion<f64>, translation: Vector3<f64>) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// Apply to a point.
    #[must_use]
    pub fn transform_point(&self, point: &Point3<f64>) -> Point3<f64> {
        self.rotation * point + self.translation
    }

    /// Apply to a direction (rotation only).
    #[must_use]
    pub fn transform_vector(&self, vector: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * vector
    }
}

/// Shortest rotation taking `from` onto `to`.
///
/// Both inputs must be nonzero. The anti-parallel case has no unique
/// shortest arc; a π rotation about a stable perpendicular axis is used so
/// the result is still deterministic.
#[must_use]
pub fn rotation_to(from: &Vector3<f64>, to: &Vector3<f64>) -> UnitQuaternion<f64> {
    if let Some(rotation) = UnitQuaternion::rotation_between(from, to) {
        return rotation;
    }
    // Anti-parallel: rotation_between returns None. Any axis perpendicular
    // to `from` works; derive one from whichever world axis is least aligned.
    let helper = if from.x.abs() < 0.9 * from.norm() {
        Vector3::x()
    } else {
        Vector3::y()
    };
    let axis = Unit::new_normalize(from.cross(&helper));
    UnitQuaternion::from_axis_angle(&axis, std::f64::consts::PI)
}
