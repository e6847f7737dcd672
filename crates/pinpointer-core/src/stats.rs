//! Per-dimension summary statistics over a session.
//!
//! All statistics are population statistics: the session is treated as the
//! complete measured set, so the variance divides by `count`. The variance is
//! computed in two passes (mean first, then squared deviations).
//!
//! Very large values are divided by a power of two before summing, which is
//! exact, so finite inputs only fail when a result itself leaves the `f64`
//! range (for example the variance of errors near `1e200`).

use serde::{Deserialize, Serialize};

use crate::error::PinpointError;
use crate::session::Session;
use crate::trial::Trial;

/// Magnitude above which values are rescaled before summing squares.
const RESCALE_ABOVE: f64 = 1e150;

/// One of the three error dimensions of a trial.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorDimension {
    X,
    Y,
    Radial,
}

impl ErrorDimension {
    pub const ALL: [ErrorDimension; 3] = [
        ErrorDimension::X,
        ErrorDimension::Y,
        ErrorDimension::Radial,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ErrorDimension::X => "x",
            ErrorDimension::Y => "y",
            ErrorDimension::Radial => "radial",
        }
    }

    /// This dimension's error value for `trial`.
    pub fn of(self, trial: &Trial) -> f64 {
        match self {
            ErrorDimension::X => trial.error_x(),
            ErrorDimension::Y => trial.error_y(),
            ErrorDimension::Radial => trial.error_radial(),
        }
    }
}

/// Read-only summary of one error dimension.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorStatistics {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub variance: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    /// `max - min`.
    pub range: f64,
    /// Interquartile range, `q75 - q25` with linear interpolation.
    pub iqr: f64,
    /// Largest absolute deviation from the mean, in percent of `|mean|`
    /// (0 when the mean is 0).
    pub max_deviation_pct: f64,
}

impl ErrorStatistics {
    /// Summarize a non-empty set of finite values.
    ///
    /// Fails with [`PinpointError::NonFiniteStatistic`] if any input is not
    /// finite or any statistic overflows.
    pub fn from_values(values: &[f64]) -> Result<Self, PinpointError> {
        if values.is_empty() {
            return Err(PinpointError::EmptySession);
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(PinpointError::NonFiniteStatistic);
        }

        let count = values.len();
        let n = count as f64;
        let max_abs = values.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
        let scale = if max_abs > RESCALE_ABOVE {
            2f64.powi(max_abs.log2().floor() as i32)
        } else {
            1.0
        };

        // Both passes run on `v / scale`.
        let mean_s = values.iter().map(|v| v / scale).sum::<f64>() / n;
        let deviations = || values.iter().map(move |v| v / scale - mean_s);
        let variance_s = deviations().map(|d| d * d).sum::<f64>() / n;
        let max_deviation_s = deviations().map(f64::abs).fold(0.0_f64, f64::max);

        let mean = mean_s * scale;
        let variance = variance_s * scale * scale;
        let max_deviation_pct = if mean_s != 0.0 {
            max_deviation_s / mean_s.abs() * 100.0
        } else {
            0.0
        };

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let min = sorted[0];
        let max = sorted[count - 1];

        let stats = Self {
            count,
            mean,
            std_dev: variance_s.sqrt() * scale,
            variance,
            min,
            max,
            median: quantile_sorted(&sorted, 0.5),
            range: max - min,
            iqr: quantile_sorted(&sorted, 0.75) - quantile_sorted(&sorted, 0.25),
            max_deviation_pct,
        };
        if !stats.is_finite() {
            return Err(PinpointError::NonFiniteStatistic);
        }
        Ok(stats)
    }

    fn is_finite(&self) -> bool {
        [
            self.mean,
            self.std_dev,
            self.variance,
            self.median,
            self.range,
            self.iqr,
            self.max_deviation_pct,
        ]
        .iter()
        .all(|v| v.is_finite())
    }

    /// Like [`ErrorStatistics::from_values`], but every value must be a valid
    /// radial distance.
    pub fn from_radial_values(values: &[f64]) -> Result<Self, PinpointError> {
        if let Some(&value) = values.iter().find(|v| !(**v >= 0.0)) {
            return Err(PinpointError::NegativeRadial { value });
        }
        Self::from_values(values)
    }
}

/// Linear-interpolation quantile of ascending, non-empty `sorted`.
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Statistics for all three error dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionStatistics {
    pub x: ErrorStatistics,
    pub y: ErrorStatistics,
    pub radial: ErrorStatistics,
}

impl SessionStatistics {
    pub fn get(&self, dim: ErrorDimension) -> &ErrorStatistics {
        match dim {
            ErrorDimension::X => &self.x,
            ErrorDimension::Y => &self.y,
            ErrorDimension::Radial => &self.radial,
        }
    }
}

/// Compute statistics over every trial in `session` and close it.
///
/// Fails with [`PinpointError::EmptySession`] (leaving the session open) when
/// there are no trials. Calling this again on a closed session recomputes the
/// same snapshot.
pub fn compute_statistics(session: &mut Session) -> Result<SessionStatistics, PinpointError> {
    let stats = summarize(session.trials())?;
    session.close();
    Ok(stats)
}

pub(crate) fn summarize(trials: &[Trial]) -> Result<SessionStatistics, PinpointError> {
    let column = |dim: ErrorDimension| trials.iter().map(|t| dim.of(t)).collect::<Vec<_>>();
    Ok(SessionStatistics {
        x: ErrorStatistics::from_values(&column(ErrorDimension::X))?,
        y: ErrorStatistics::from_values(&column(ErrorDimension::Y))?,
        radial: ErrorStatistics::from_radial_values(&column(ErrorDimension::Radial))?,
    })
}
