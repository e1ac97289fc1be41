// Feature matrices for the forecaster.
use ndarray::{Array1, Array2};

use crate::indicators::sma::simple_moving_average;

/// Training rows plus the row the model predicts from.
pub struct FeatureSet {
    pub x: Array2<f64>,
    pub y: Array1<f64>,
    pub latest: Array1<f64>,
}

/// Each row holds `lags` consecutive closes and is labelled with the close that follows.
/// Callers guarantee `0 < lags < closes.len()`.
pub fn lagged_closes(closes: &[f64], lags: usize) -> FeatureSet {
    let rows = closes.len() - lags;
    let x = Array2::from_shape_fn((rows, lags), |(r, c)| closes[r + c]);
    let y = Array1::from_iter(closes[lags..].iter().copied());
    let latest = Array1::from_iter(closes[rows..].iter().copied());
    FeatureSet { x, y, latest }
}

/// Rolling mean and sample standard deviation over `period` closes.
pub fn rolling_mean_std(closes: &[f64], period: usize) -> Vec<Option<(f64, f64)>> {
    simple_moving_average(closes, period)
        .into_iter()
        .enumerate()
        .map(|(i, mean)| {
            mean.map(|mean| {
                let window = &closes[i + 1 - period..=i];
                let variance = window.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / (period as f64 - 1.0);
                (mean, variance.sqrt())
            })
        })
        .collect()
}

/// Bollinger features `[mid, mid + 2σ, mid - 2σ]`; the row at position i is
/// labelled with the close at i + 1. Rows inside the warm-up window are dropped.
/// Callers guarantee `2 <= period` and `closes.len() >= period + 1`.
pub fn bollinger_bands(closes: &[f64], period: usize) -> FeatureSet {
    let bands: Vec<[f64; 3]> = rolling_mean_std(closes, period)
        .into_iter()
        .flatten()
        .map(|(mid, std)| [mid, mid + 2.0 * std, mid - 2.0 * std])
        .collect();

    // bands[k] belongs to closes[k + period - 1]
    let rows = bands.len() - 1;
    let x = Array2::from_shape_fn((rows, 3), |(r, c)| bands[r][c]);
    let y = Array1::from_iter(closes[period..].iter().copied());
    let latest = Array1::from_iter(bands[rows].iter().copied());
    FeatureSet { x, y, latest }
}
