//! Orientation-based group classification.
//!
//! Labels each face group by comparing its normal against a world up axis.

use nalgebra::Vector3;

use crate::error::{GroupError, GroupResult};
use crate::group::GroupSet;

/// Orientation label for a face group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GroupKind {
    /// Normal points within the threshold of the up axis.
    Top,
    /// Normal points within the threshold of the negated up axis.
    Bottom,
    /// Everything in between.
    Side,
    /// No usable normal (degenerate seed triangle).
    #[default]
    Unclassified,
}

impl GroupKind {
    /// Whether this is a side group.
    #[inline]
    #[must_use]
    pub fn is_side(self) -> bool {
        matches!(self, Self::Side)
    }

    /// Whether this is a top or bottom cap group.
    #[inline]
    #[must_use]
    pub fn is_cap(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }
}

/// Parameters for group classification.
#[derive(Debug, Clone)]
pub struct ClassifyParams {
    /// World up axis (normalized internally).
    pub up_axis: Vector3<f64>,
    /// Angular threshold in radians. Angles below it are Top, angles above
    /// π minus it are Bottom.
    pub threshold: f64,
}

impl Default for ClassifyParams {
    fn default() -> Self {
        Self {
            up_axis: Vector3::z(),
            threshold: std::f64::consts::FRAC_PI_4, // 45 degrees
        }
    }
}

impl ClassifyParams {
    /// Set the up axis.
    #[must_use]
    pub fn with_up_axis(mut self, up_axis: Vector3<f64>) -> Self {
        self.up_axis = up_axis;
        self
    }

    /// Set the threshold from degrees.
    #[must_use]
    pub fn with_threshold_degrees(mut self, degrees: f64) -> Self {
        self.threshold = degrees.to_radians();
        self
    }
}

/// Classify a single normal against the up axis.
///
/// Strict inequalities on both thresholds, so a normal at exactly 45° (with
/// the default threshold) lands on Side. A near-zero normal is
/// [`GroupKind::Unclassified`].
///
/// # Example
///
/// ```
/// use nalgebra::Vector3;
/// use unfold_group::{classify_normal, ClassifyParams, GroupKind};
///
/// let params = ClassifyParams::default();
/// assert_eq!(classify_normal(&Vector3::z(), &params), GroupKind::Top);
/// assert_eq!(classify_normal(&(-Vector3::z()), &params), GroupKind::Bottom);
/// assert_eq!(classify_normal(&Vector3::x(), &params), GroupKind::Side);
/// ```
#[must_use]
pub fn classify_normal(normal: &Vector3<f64>, params: &ClassifyParams) -> GroupKind {
    if normal.norm_squared() < f64::EPSILON {
        return GroupKind::Unclassified;
    }
    let angle = normal.angle(&params.up_axis);
    if angle < params.threshold {
        GroupKind::Top
    } else if angle > std::f64::consts::PI - params.threshold {
        GroupKind::Bottom
    } else {
        GroupKind::Side
    }
}

/// Classify every group in a set.
///
/// Pure per-group relabeling; order-independent and idempotent.
///
/// # Errors
///
/// Returns an error if the threshold is outside (0, π/2] or the up axis is
/// degenerate.
pub fn classify_groups(groups: &mut GroupSet, params: &ClassifyParams) -> GroupResult<()> {
    if !(params.threshold > 0.0 && params.threshold <= std::f64::consts::FRAC_PI_2) {
        return Err(GroupError::InvalidThreshold {
            radians: params.threshold,
            max: std::f64::consts::FRAC_PI_2,
        });
    }
    if params.up_axis.norm_squared() < f64::EPSILON {
        return Err(GroupError::DegenerateUpAxis);
    }

    for group in groups.iter_mut() {
        group.kind = classify_normal(&group.normal, params);
    }
    Ok(())
}
