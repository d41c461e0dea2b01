//! Scale functions for data-to-pixel mappings.
//!
//! The chart derives one [`LinearScale`] per axis from the active field's
//! padded extent. Tick generation follows the usual "nice numbers" rule: a
//! step of 1, 2 or 5 times a power of ten, chosen to land near the requested
//! tick count.

use trueno::Vector;

use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::field::Field;

/// Lower bound multiplier applied to a field's minimum.
pub const DOMAIN_PAD_LOW: f32 = 0.8;
/// Upper bound multiplier applied to a field's maximum.
pub const DOMAIN_PAD_HIGH: f32 = 1.2;

/// Trait for scale functions that map domain values to range values.
pub trait Scale<D, R> {
    /// Transform a domain value to a range value.
    fn scale(&self, value: D) -> R;

    /// Get the domain extent.
    fn domain(&self) -> (D, D);

    /// Get the range extent.
    fn range(&self) -> (R, R);
}

/// Linear scale for continuous-to-continuous mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_min: f32,
    domain_max: f32,
    range_min: f32,
    range_max: f32,
}

impl LinearScale {
    /// Create a new linear scale.
    ///
    /// A degenerate domain (equal ends) is allowed and maps every value to
    /// the middle of the range.
    ///
    /// # Errors
    ///
    /// Returns an error if any bound is not finite.
    pub fn new(domain: (f32, f32), range: (f32, f32)) -> Result<Self> {
        if ![domain.0, domain.1, range.0, range.1].iter().all(|v| v.is_finite()) {
            return Err(Error::ScaleDomain(format!(
                "non-finite bounds: domain {domain:?}, range {range:?}"
            )));
        }

        Ok(Self {
            domain_min: domain.0,
            domain_max: domain.1,
            range_min: range.0,
            range_max: range.1,
        })
    }

    /// Scale with no domain, for a field that has no finite value. Every
    /// value maps to `NaN` and there are no ticks.
    #[must_use]
    pub fn unmapped(range: (f32, f32)) -> Self {
        Self {
            domain_min: f32::NAN,
            domain_max: f32::NAN,
            range_min: range.0,
            range_max: range.1,
        }
    }

    /// Whether the scale has a domain to map from.
    #[must_use]
    pub fn is_mapped(&self) -> bool {
        self.domain_min.is_finite() && self.domain_max.is_finite()
    }

    /// Build the scale for one field of a dataset: the domain is the field's
    /// extent padded 20% on both sides, mapped onto `range`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyData`] if the field has no finite value.
    pub fn for_field(dataset: &Dataset, field: Field, range: (f32, f32)) -> Result<Self> {
        let domain = padded_extent(&dataset.values(field))?;
        tracing::trace!(%field, ?domain, ?range, "derived scale");
        Self::new(domain, range)
    }

    /// Nice tick values inside the domain, roughly `count` of them.
    #[must_use]
    pub fn ticks(&self, count: usize) -> Vec<f32> {
        ticks(f64::from(self.domain_min), f64::from(self.domain_max), count)
            .into_iter()
            .map(|t| t as f32)
            .collect()
    }

    /// Formatter matching [`LinearScale::ticks`] for the same count.
    #[must_use]
    pub fn tick_format(&self, count: usize) -> TickFormat {
        let step = tick_step(f64::from(self.domain_min), f64::from(self.domain_max), count);
        TickFormat::for_step(step)
    }
}

impl Scale<f32, f32> for LinearScale {
    fn scale(&self, value: f32) -> f32 {
        let span = self.domain_max - self.domain_min;
        let t = if span == 0.0 { 0.5 } else { (value - self.domain_min) / span };
        self.range_min + t * (self.range_max - self.range_min)
    }

    fn domain(&self) -> (f32, f32) {
        (self.domain_min, self.domain_max)
    }

    fn range(&self) -> (f32, f32) {
        (self.range_min, self.range_max)
    }
}

/// Padded extent `[0.8 * min, 1.2 * max]` over the finite values.
///
/// `NaN` entries are skipped, so a malformed cell never poisons the whole
/// axis.
///
/// # Errors
///
/// Returns [`Error::EmptyData`] if no finite value is present.
pub fn padded_extent(values: &[f32]) -> Result<(f32, f32)> {
    let finite: Vec<f32> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return Err(Error::EmptyData);
    }

    // SIMD reductions
    let vec = Vector::from_vec(finite);
    let min = vec.min().map_err(|e| Error::ScaleDomain(e.to_string()))?;
    let max = vec.max().map_err(|e| Error::ScaleDomain(e.to_string()))?;

    Ok((min * DOMAIN_PAD_LOW, max * DOMAIN_PAD_HIGH))
}

// ============================================================================
// Ticks
// ============================================================================

const E10: f64 = 7.071_067_811_865_476; // sqrt(50)
const E5: f64 = 3.162_277_660_168_379_5; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

/// `(i1, i2, inc)`: ticks are `i * inc` for `i` in `i1..=i2`, or `i / -inc`
/// when `inc` is negative (sub-unit steps kept exact).
fn tick_spec(start: f64, stop: f64, count: f64) -> Option<(i64, i64, f64)> {
    let step = (stop - start) / count.max(0.0);
    if !step.is_finite() || step <= 0.0 {
        return None;
    }

    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    let (i1, i2, inc) = if power < 0.0 {
        let inc = 10f64.powf(-power) / factor;
        let mut i1 = (start * inc).round() as i64;
        let mut i2 = (stop * inc).round() as i64;
        if (i1 as f64) / inc < start {
            i1 += 1;
        }
        if (i2 as f64) / inc > stop {
            i2 -= 1;
        }
        (i1, i2, -inc)
    } else {
        let inc = 10f64.powf(power) * factor;
        let mut i1 = (start / inc).round() as i64;
        let mut i2 = (stop / inc).round() as i64;
        if (i1 as f64) * inc < start {
            i1 += 1;
        }
        if (i2 as f64) * inc > stop {
            i2 -= 1;
        }
        (i1, i2, inc)
    };

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }

    Some((i1, i2, inc))
}

/// Nice ticks between `start` and `stop` (either order), about `count` of them.
#[must_use]
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }

    let reverse = stop < start;
    let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };
    let Some((i1, i2, inc)) = tick_spec(lo, hi, count as f64) else {
        return Vec::new();
    };
    if i2 < i1 {
        return Vec::new();
    }

    let at = |i: i64| if inc < 0.0 { i as f64 / -inc } else { i as f64 * inc };
    let mut out: Vec<f64> = (i1..=i2).map(at).collect();
    if reverse {
        out.reverse();
    }
    out
}

/// Distance between consecutive ticks for the same arguments as [`ticks`].
#[must_use]
pub fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let reverse = stop < start;
    let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };
    let step = match tick_spec(lo, hi, count as f64) {
        Some((_, _, inc)) if inc < 0.0 => 1.0 / -inc,
        Some((_, _, inc)) => inc,
        None => 0.0,
    };
    if reverse {
        -step
    } else {
        step
    }
}

/// Fixed-precision tick label format with thousands grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickFormat {
    precision: usize,
}

impl TickFormat {
    /// Enough decimals to tell ticks `step` apart.
    #[must_use]
    pub fn for_step(step: f64) -> Self {
        let step = step.abs();
        let precision = if step > 0.0 && step.is_finite() {
            (-step.log10().floor()).max(0.0) as usize
        } else {
            0
        };
        Self { precision }
    }

    /// Number of decimals printed.
    #[must_use]
    pub fn precision(&self) -> usize {
        self.precision
    }

    /// Format a tick value, e.g. `40,000` or `12.5`.
    #[must_use]
    pub fn format(&self, value: f32) -> String {
        let fixed = format!("{:.*}", self.precision, f64::from(value).abs());
        let (int_part, frac_part) = match fixed.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (fixed.as_str(), None),
        };

        let mut grouped = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
        if value < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
            grouped.push('-');
        }
        for (i, ch) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        if let Some(frac) = frac_part {
            grouped.push('.');
            grouped.push_str(frac);
        }
        grouped
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        /// The padded extent is exactly 0.8 * min and 1.2 * max.
        #[test]
        fn prop_padded_extent_matches_min_max(
            values in prop::collection::vec(0.1f32..100_000.0, 1..60)
        ) {
            let (lo, hi) = padded_extent(&values).unwrap();
            let min = values.iter().copied().fold(f32::INFINITY, f32::min);
            let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);

            prop_assert!((lo - min * 0.8).abs() <= min.abs() * 1e-5);
            prop_assert!((hi - max * 1.2).abs() <= max.abs() * 1e-5);
        }

        /// Ticks stay inside the domain and are increasing.
        #[test]
        fn prop_ticks_inside_domain(
            start in -1000.0f64..1000.0,
            span in 0.01f64..10_000.0,
            count in 1usize..20
        ) {
            let stop = start + span;
            let t = ticks(start, stop, count);
            for w in t.windows(2) {
                prop_assert!(w[0] < w[1]);
            }
            for v in &t {
                prop_assert!(*v >= start - 1e-9 && *v <= stop + 1e-9);
            }
        }
    }
}
