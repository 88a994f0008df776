//! Basic vector math helper functions.
//! Small helpers for straight-line movement between two points.
use glam::Vec3;

/// Returns the straight-line distance between two points.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use warrens::vector_math::distance;
/// let d = distance(Vec3::ZERO, Vec3::new(3.0, 4.0, 12.0));
/// assert!((d - 13.0).abs() < f32::EPSILON);
/// ```
pub fn distance(from: Vec3, to: Vec3) -> f32 {
    from.distance(to)
}

/// Returns the unit vector pointing from `from` towards `to`.
///
/// The function checks that the offset is finite and non-zero before
/// normalising. If the offset is invalid or the two points coincide, it
/// returns [`Vec3::ZERO`].
///
/// # Examples
///
/// ```
/// use glam::Vec3;
/// use warrens::vector_math::direction_to;
/// let dir = direction_to(Vec3::ZERO, Vec3::new(3.0, 0.0, 4.0));
/// assert!((dir.x - 0.6).abs() < 1e-6);
/// assert!((dir.z - 0.8).abs() < 1e-6);
///
/// assert_eq!(direction_to(Vec3::ONE, Vec3::ONE), Vec3::ZERO);
/// ```
pub fn direction_to(from: Vec3, to: Vec3) -> Vec3 {
    let offset = to - from;
    if !offset.is_finite() {
        return Vec3::ZERO;
    }
    offset.try_normalize().unwrap_or(Vec3::ZERO)
}
