use crate::error::ColorError;

/// Restricts `value` to `[min, max]`.
///
/// Fails with [`ColorError::InvalidRange`] when `min > max`; in-range and
/// out-of-range values are otherwise always accepted.
pub fn clamp<T>(value: T, min: T, max: T) -> Result<T, ColorError>
where
    T: PartialOrd + Copy + Into<f64>,
{
    if min > max {
        return Err(ColorError::InvalidRange {
            min: min.into(),
            max: max.into(),
        });
    }
    if value < min {
        Ok(min)
    } else if value > max {
        Ok(max)
    } else {
        Ok(value)
    }
}

/// Clamps into `[0, 1]`. NaN maps to 0.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    // 0 <= 1, cannot fail
    clamp(value, 0.0, 1.0).unwrap_or(0.0)
}

/// Position of a thumb of `width` whose center must stay inside `[min, max]`.
///
/// Returns the thumb's leading edge, so the result lies in
/// `[min - width / 2, max - width / 2]`.
pub fn clamp_offset(value: f64, min: f64, max: f64, width: f64) -> Result<f64, ColorError> {
    let half = width / 2.0;
    clamp(value - half, min - half, max - half)
}
