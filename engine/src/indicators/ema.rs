// Exponential Moving Average (EMA), the smoothing behind MACD and its signal line.

/// EMA with smoothing factor `2 / (span + 1)`, seeded with the first value and
/// without bias adjustment. Defined from the first position onward.
pub fn exponential_moving_average(values: &[f64], span: usize) -> Vec<f64> {
    let multiplier = 2.0 / (span as f64 + 1.0);
    let mut results = Vec::with_capacity(values.len());
    let mut iter = values.iter();
    let Some(&first) = iter.next() else {
        return results;
    };

    let mut previous_ema = first;
    results.push(previous_ema);
    for &value in iter {
        let ema = (value - previous_ema) * multiplier + previous_ema;
        results.push(ema);
        previous_ema = ema;
    }
    results
}
