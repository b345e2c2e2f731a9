/// Fraction of the data span added on each side of a scatter axis.
const AXIS_PADDING: f64 = 0.05;

/// Axis bounds covering every value and the zero reference line.
pub fn axis_bounds(values: impl IntoIterator<Item = f64>) -> [f64; 2] {
    let (mut lo, mut hi) = (0.0f64, 0.0f64);
    for v in values.into_iter().filter(|v| v.is_finite()) {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    let span = hi - lo;
    if span <= f64::EPSILON {
        return [lo - 1.0, hi + 1.0];
    }
    let pad = span * AXIS_PADDING;
    [lo - pad, hi + pad]
}

/// Cells of a horizontal bar drawn from zero to `value` in a track of `width`
/// cells spanning `[lo, hi]`.
///
/// Returns `(start, len)` in cells from the left edge of the track. The zero
/// point must lie inside `[lo, hi]`.
pub fn bar_span(value: f64, lo: f64, hi: f64, width: u16) -> (u16, u16) {
    if width == 0 || hi - lo <= f64::EPSILON || !value.is_finite() {
        return (0, 0);
    }
    let scale = f64::from(width) / (hi - lo);
    let to_cell = |v: f64| (((v - lo) * scale).round() as i64).clamp(0, i64::from(width)) as u16;
    let zero = to_cell(0.0);
    let end = to_cell(value);
    if end >= zero {
        (zero, end - zero)
    } else {
        (end, zero - end)
    }
}

/// Range of a ranking track: the values plus zero.
pub fn ranking_range(values: impl IntoIterator<Item = f64>) -> (f64, f64) {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

pub fn format_value(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1e9 {
        format!("{:.1}B", value / 1e9)
    } else if abs >= 1e6 {
        format!("{:.1}M", value / 1e6)
    } else if abs >= 1e3 {
        format!("{:.1}K", value / 1e3)
    } else {
        format!("{:.2}", value)
    }
}
