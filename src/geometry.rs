//! Small 2D vector helpers used by the marcher.

#[inline]
pub fn direction(angle: f64) -> [f64; 2] {
    [angle.cos(), angle.sin()]
}

#[inline]
pub fn dot(a: [f64; 2], b: [f64; 2]) -> f64 {
    a[0] * b[0] + a[1] * b[1]
}

#[inline]
pub fn distance_squared(a: [f64; 2], b: [f64; 2]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    dx * dx + dy * dy
}

/// Unit normal of a circle at `point`, pointing away from `center`.
///
/// Returns `None` when the point sits on the center (or the inputs are not
/// finite), since there is no direction to normalize.
pub fn surface_normal(point: [f64; 2], center: [f64; 2]) -> Option<[f64; 2]> {
    let nx = point[0] - center[0];
    let ny = point[1] - center[1];
    let len = (nx * nx + ny * ny).sqrt();
    if len == 0.0 || !len.is_finite() {
        return None;
    }
    Some([nx / len, ny / len])
}

/// Mirror `incident` about `normal`: R = I - 2(I.N)N. `normal` must be unit length.
#[inline]
pub fn reflect(incident: [f64; 2], normal: [f64; 2]) -> [f64; 2] {
    let d = dot(incident, normal);
    [incident[0] - 2.0 * d * normal[0], incident[1] - 2.0 * d * normal[1]]
}

/// Angle of the mirrored direction for a ray travelling at `angle` that hits a
/// circle centered on `center` at `point`.
pub fn reflected_angle(angle: f64, point: [f64; 2], center: [f64; 2]) -> Option<f64> {
    let normal = surface_normal(point, center)?;
    let r = reflect(direction(angle), normal);
    Some(r[1].atan2(r[0]))
}
