use nalgebra::Point3;

/// Samples `f` at `num_segments + 1` evenly spaced parameters from `t_start` to
/// `t_end`, both ends included.
pub fn path_iter_parametric<F, S>(
    f: F,
    t_start: S,
    t_end: S,
    num_segments: usize,
) -> impl Iterator<Item = Point3<f32>>
where
    F: Fn(S) -> Point3<f32>,
    S: nalgebra::RealField + simba::scalar::SupersetOf<usize> + Copy,
{
    assert!(
        num_segments >= 1,
        "Must have at least one segment, num_segments was {}",
        num_segments
    );
    let convert = nalgebra::convert::<usize, S>;
    (0..=num_segments)
        .map(move |i| convert(i) / convert(num_segments))
        // u ranges from 0 to 1 (inclusive)
        .map(move |u| t_start + u * (t_end - t_start))
        .map(f)
}

/// Points on the unit circle in the z = 0 plane, starting at +x and going
/// counterclockwise. The first point is repeated at the end.
pub fn unit_circle(num_segments: usize) -> impl Iterator<Item = Point3<f32>> {
    path_iter_parametric(
        |theta: f32| Point3::new(theta.cos(), theta.sin(), 0.0),
        0.0,
        std::f32::consts::TAU,
        num_segments,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parametric_endpoints() {
        let pts: Vec<_> =
            path_iter_parametric(|s: f64| Point3::new(s as f32, 0.0, 0.0), 1.0, 3.0, 4).collect();

        assert_eq!(pts.len(), 5);
        approx::assert_relative_eq!(pts[0].x, 1.0);
        approx::assert_relative_eq!(pts[2].x, 2.0);
        approx::assert_relative_eq!(pts[4].x, 3.0);
    }

    #[test]
    #[should_panic]
    fn test_zero_segments() {
        let _ = unit_circle(0).count();
    }

    #[test]
    fn test_unit_circle_closes() {
        let pts: Vec<_> = unit_circle(7).collect();
        assert_eq!(pts.len(), 8);
        approx::assert_abs_diff_eq!(pts[0], pts[7], epsilon = 1e-6);
    }
}
