/// Pearson product-moment correlation over paired scores
///
/// Returns `0.0` when either series has no variance (including empty and
/// single-pair input), so a peer with nothing to compare reads as neutral
/// rather than as an error. Sums are accumulated in `f64`; the result is
/// clamped into [-1.0, 1.0] to absorb rounding.
pub fn pearson<P>(pairs: &[P]) -> f64
where
    P: Copy + Into<(f64, f64)>,
{
    let n = pairs.len() as f64;
    let (mut sum_x, mut sum_y) = (0.0_f64, 0.0_f64);
    let (mut sum_xy, mut sum_xx, mut sum_yy) = (0.0_f64, 0.0_f64, 0.0_f64);

    for &pair in pairs {
        let (x, y) = pair.into();
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
        sum_yy += y * y;
    }

    let numerator = n * sum_xy - sum_x * sum_y;
    let denominator = ((n * sum_xx - sum_x * sum_x) * (n * sum_yy - sum_y * sum_y)).sqrt();

    // sqrt of a rounding-negative product is NaN
    if denominator.is_nan() || denominator <= 0.0 {
        return 0.0;
    }

    (numerator / denominator).clamp(-1.0, 1.0)
}
