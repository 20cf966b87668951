//! Barrier repulsion profile.

/// Repulsion magnitude at `distance` from a barrier.
///
/// Falls smoothly from `max_repulsion` at contact to zero at `range`:
///
/// ```text
/// f(d) = max · (1 − √(d / range))²     for 0 ≤ d < range
///        0                             otherwise
/// ```
///
/// ```rust
/// use ped_motion::barrier_repulsion;
/// assert_eq!(barrier_repulsion(0.0, 1.0, 4.0), 4.0);
/// assert_eq!(barrier_repulsion(0.25, 1.0, 4.0), 1.0);
/// assert_eq!(barrier_repulsion(1.5, 1.0, 4.0), 0.0);
/// ```
#[inline]
pub fn barrier_repulsion(distance: f64, range: f64, max_repulsion: f64) -> f64 {
    if distance >= range || range <= 0.0 {
        return 0.0;
    }
    let blend = 1.0 - (distance.max(0.0) / range).sqrt();
    max_repulsion * blend * blend
}
