use super::types::NumericStats;
use once_cell::sync::Lazy;
use regex::Regex;

// Plain decimal notation with an optional exponent. Rust's float parser also
// accepts words like "inf" and "NaN", which must stay text.
static DECIMAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?$")
        .expect("decimal pattern is valid")
});

/// A field counts as empty when nothing but whitespace is left after trimming.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Integer parse first, then decimal parse. Anything else is not a number.
pub fn parse_number(value: &str) -> Option<f64> {
    let value = value.trim();
    if let Ok(int) = value.parse::<i64>() {
        return Some(int as f64);
    }
    if !DECIMAL.is_match(value) {
        return None;
    }
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn is_numeric(value: &str) -> bool {
    parse_number(value).is_some()
}

/// `part / whole` as a percentage rounded to one decimal place.
pub fn round_percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64 * 1000.0).round() / 10.0
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NumericAccumulator {
    count: usize,
    min: f64,
    max: f64,
    mean: f64,
}

impl NumericAccumulator {
    pub fn push(&mut self, value: f64) {
        if self.count == 0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        // Scale both terms before adding so large values of either sign
        // cannot overflow the running mean.
        self.count += 1;
        let n = self.count as f64;
        self.mean += value / n - self.mean / n;
    }

    pub fn finish(self) -> Option<NumericStats> {
        (self.count > 0).then(|| NumericStats {
            count: self.count,
            min: self.min,
            max: self.max,
            mean: self.mean,
        })
    }
}
