//! Clamped table interpolation.
//!
//! Calibration tables in the aerodynamic pipeline are never extrapolated: queries
//! outside the tabulated range return the edge value and report that they were
//! clamped so the caller can log it.

/// Linear interpolation in a table with ascending `xs`.
///
/// Returns `ys[0]` for `xq <= xs[0]` and the last value for `xq >= xs[last]`.
/// Empty tables yield `NaN`.
pub fn interpolate(xs: &[f64], ys: &[f64], xq: f64) -> f64 {
    let n = xs.len().min(ys.len());
    if n == 0 || xq.is_nan() {
        return f64::NAN;
    }
    if xq <= xs[0] {
        return ys[0];
    }
    if xq >= xs[n - 1] {
        return ys[n - 1];
    }
    let i = xs[..n].partition_point(|&x| x <= xq).saturating_sub(1).min(n - 2);
    let (x0, x1) = (xs[i], xs[i + 1]);
    let (y0, y1) = (ys[i], ys[i + 1]);
    if (x1 - x0).abs() < f64::EPSILON {
        return y0;
    }
    y0 + (y1 - y0) * (xq - x0) / (x1 - x0)
}

/// Result of a bilinear lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bilinear {
    pub value: f64,
    /// True if either query coordinate was outside the grid and got clamped
    pub clamped: bool,
}

/// Bilinear interpolation on a grid with `grid[j][i]` at (`xs[i]`, `ys[j]`).
pub fn bilinear(xs: &[f64], ys: &[f64], grid: &[&[f64]], xq: f64, yq: f64) -> Bilinear {
    let (x_lo, x_hi) = (xs[0], xs[xs.len() - 1]);
    let (y_lo, y_hi) = (ys[0], ys[ys.len() - 1]);
    let clamped = xq < x_lo || xq > x_hi || yq < y_lo || yq > y_hi;
    let x = xq.clamp(x_lo, x_hi);
    let y = yq.clamp(y_lo, y_hi);

    // Interpolate along x in every row, then along y across rows
    let column: Vec<f64> = grid.iter().map(|row| interpolate(xs, row, x)).collect();
    Bilinear {
        value: interpolate(ys, &column, y),
        clamped,
    }
}
