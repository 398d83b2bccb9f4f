//! Forecast engine — short-horizon projection with confidence bands.
//!
//! Three interchangeable methods over an ordered (year, value) series:
//! - **Linear**: ordinary least-squares fit of value on year
//! - **Growth**: mean year-over-year percent change applied to the last value
//! - **Weighted**: position-weighted average nudged ±5% for momentum
//!
//! Every method is total: 0, 1, or many points all produce a defined value,
//! never a panic or a non-finite number. One `forecast()` call projects the
//! revenue and grower-count series together with the same method and
//! confidence level.

use serde::{Deserialize, Serialize};

// ─── Inputs ─────────────────────────────────────────────────────────

/// One historical observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub year: i32,
    pub value: f64,
}

/// Projection method, mutually exclusive per invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastMethod {
    Linear,
    Growth,
    Weighted,
}

impl Default for ForecastMethod {
    fn default() -> Self {
        ForecastMethod::Linear
    }
}

/// Supported confidence levels with their z-scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    #[serde(rename = "0.80")]
    P80,
    #[serde(rename = "0.90")]
    P90,
    #[serde(rename = "0.95")]
    P95,
}

impl ConfidenceLevel {
    /// Two-sided z-score lookup.
    pub fn z_score(self) -> f64 {
        match self {
            ConfidenceLevel::P80 => 1.28,
            ConfidenceLevel::P90 => 1.645,
            ConfidenceLevel::P95 => 1.96,
        }
    }

    /// Map a fractional level to the nearest supported one. Unrecognized
    /// levels fall back to 90% (z = 1.645).
    pub fn from_fraction(level: f64) -> Self {
        if (level - 0.80).abs() < 1e-9 {
            ConfidenceLevel::P80
        } else if (level - 0.95).abs() < 1e-9 {
            ConfidenceLevel::P95
        } else {
            ConfidenceLevel::P90
        }
    }

    pub fn as_fraction(self) -> f64 {
        match self {
            ConfidenceLevel::P80 => 0.80,
            ConfidenceLevel::P90 => 0.90,
            ConfidenceLevel::P95 => 0.95,
        }
    }
}

// ─── Outputs ────────────────────────────────────────────────────────

/// A point projection with its confidence band.
///
/// Invariant: `low <= value <= high`. The point value and lower bound are
/// floored at 0 (revenue and grower counts cannot project negative); the
/// upper bound is never floored below the value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub value: f64,
    pub low: f64,
    pub high: f64,
}

/// Combined revenue + grower-count forecast for one target year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub target_year: i32,
    pub method: ForecastMethod,
    pub confidence: ConfidenceLevel,
    pub revenue: Projection,
    pub growers: Projection,
}

// ─── Projection methods ─────────────────────────────────────────────

/// Project the series at `target_year` using `method`. Total over any input.
pub fn project(series: &[SeriesPoint], method: ForecastMethod, target_year: i32) -> f64 {
    match method {
        ForecastMethod::Linear => project_linear(series, target_year),
        ForecastMethod::Growth => project_growth(series),
        ForecastMethod::Weighted => project_weighted(series),
    }
}

/// Ordinary least-squares fit of value on year, evaluated at the target.
///
/// Fewer than 2 distinct years leaves the slope denominator at 0, so the
/// fallback is the series mean (which is the point itself for a 1-point
/// series). Empty series projects 0.
fn project_linear(series: &[SeriesPoint], target_year: i32) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    let n = series.len() as f64;
    let mean_x = series.iter().map(|p| p.year as f64).sum::<f64>() / n;
    let mean_y = series.iter().map(|p| p.value).sum::<f64>() / n;

    let sxx: f64 = series
        .iter()
        .map(|p| (p.year as f64 - mean_x).powi(2))
        .sum();
    if sxx < 1e-12 {
        return mean_y;
    }
    let sxy: f64 = series
        .iter()
        .map(|p| (p.year as f64 - mean_x) * (p.value - mean_y))
        .sum();

    let slope = sxy / sxx;
    mean_y + slope * (target_year as f64 - mean_x)
}

/// Mean year-over-year percent change applied once to the last value.
///
/// Transitions from a zero prior value are skipped (the rate is undefined).
/// Fewer than 2 points returns the last (or only) value unchanged; an empty
/// series returns 0.
fn project_growth(series: &[SeriesPoint]) -> f64 {
    let last = match series.last() {
        Some(p) => p.value,
        None => return 0.0,
    };
    if series.len() < 2 {
        return last;
    }

    let rates: Vec<f64> = series
        .windows(2)
        .filter(|w| w[0].value != 0.0)
        .map(|w| (w[1].value - w[0].value) / w[0].value)
        .collect();
    if rates.is_empty() {
        return last;
    }

    let avg_rate = rates.iter().sum::<f64>() / rates.len() as f64;
    last * (1.0 + avg_rate)
}

/// Linearly-increasing-weight average (earliest weight 1), nudged ±5%
/// depending on whether the last value sits above or below the unweighted
/// mean. Captures simple momentum without a trend fit.
fn project_weighted(series: &[SeriesPoint]) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;
    for (i, point) in series.iter().enumerate() {
        let weight = (i + 1) as f64;
        weighted_sum += point.value * weight;
        weight_total += weight;
    }
    let weighted_avg = weighted_sum / weight_total;

    let values: Vec<f64> = series.iter().map(|p| p.value).collect();
    let unweighted_mean = mean(&values);
    let last = series[series.len() - 1].value;

    if last > unweighted_mean {
        weighted_avg * 1.05
    } else if last < unweighted_mean {
        weighted_avg * 0.95
    } else {
        weighted_avg
    }
}

// ─── Confidence band ────────────────────────────────────────────────

/// Band around a point projection: projected ± population-std-dev × z.
///
/// The point value is floored at 0 before the band is computed so the
/// `low <= value <= high` invariant holds even when a steeply declining
/// series projects negative.
pub fn confidence_band(projected: f64, series: &[SeriesPoint], level: ConfidenceLevel) -> Projection {
    let value = projected.max(0.0);
    let values: Vec<f64> = series.iter().map(|p| p.value).collect();
    let spread = population_std_dev(&values) * level.z_score();
    Projection {
        value,
        low: (value - spread).max(0.0),
        high: value + spread,
    }
}

/// Project the revenue and grower-count series together.
pub fn forecast(
    revenue_series: &[SeriesPoint],
    grower_series: &[SeriesPoint],
    method: ForecastMethod,
    confidence: ConfidenceLevel,
    target_year: i32,
) -> Forecast {
    let revenue_point = project(revenue_series, method, target_year);
    let grower_point = project(grower_series, method, target_year);
    Forecast {
        target_year,
        method,
        confidence,
        revenue: confidence_band(revenue_point, revenue_series, confidence),
        growers: confidence_band(grower_point, grower_series, confidence),
    }
}

// ─── Helpers ────────────────────────────────────────────────────────

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divide by n, not n-1).
pub(crate) fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
