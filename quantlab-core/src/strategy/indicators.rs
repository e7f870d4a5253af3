//! Shared indicator math used by the signal generators.
//!
//! All functions are pure. Callers guarantee minimum input lengths; the
//! functions themselves return neutral values on degenerate input rather
//! than panicking.

/// Simple moving average: arithmetic mean of the slice.
pub fn sma(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Exponential moving average over the full series, seeded with the first value.
///
/// Multiplier `2 / (period + 1)`, applied bar by bar across all inputs.
pub fn ema(values: &[f64], period: usize) -> f64 {
    let mut iter = values.iter();
    let mut ema = match iter.next() {
        Some(&first) => first,
        None => return 0.0,
    };
    let multiplier = 2.0 / (period as f64 + 1.0);
    for &value in iter {
        ema = (value - ema) * multiplier + ema;
    }
    ema
}

/// Wilder-style RSI: simple average of the last `period` gains and losses
/// over the consecutive price differences (not a smoothed EMA).
///
/// Defined as exactly 100 when the average loss is zero. Callers must pass
/// at least `period + 1` prices.
pub fn rsi(prices: &[f64], period: usize) -> f64 {
    let mut gains = Vec::with_capacity(prices.len().saturating_sub(1));
    let mut losses = Vec::with_capacity(prices.len().saturating_sub(1));
    for window in prices.windows(2) {
        let change = window[1] - window[0];
        gains.push(if change > 0.0 { change } else { 0.0 });
        losses.push(if change < 0.0 { -change } else { 0.0 });
    }

    let start = gains.len().saturating_sub(period);
    let avg_gain = gains[start..].iter().sum::<f64>() / period as f64;
    let avg_loss = losses[start..].iter().sum::<f64>() / period as f64;

    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

/// Population standard deviation (divide by N, not N − 1).
pub fn std_dev_population(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = sma(values);
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
