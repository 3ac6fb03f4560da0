use std::fmt;

use crate::error::PurifyError;
use crate::filter::ClassifiedDatum;
use crate::math::{checked_ratio, standardize};
use crate::transforms::Transformer;

/// Running sum, sum of squared deviations and count of a stream.
///
/// `sum_sq_dev` accumulates each datum's squared deviation from the mean as it
/// stood right after that datum was folded in, not from the final mean.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RunningStats {
    sum: f64,
    sum_sq_dev: f64,
    count: u64,
}

impl RunningStats {
    pub fn new() -> Self {
        Self {
            sum: 0.0,
            sum_sq_dev: 0.0,
            count: 0,
        }
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    pub fn sum_sq_dev(&self) -> f64 {
        self.sum_sq_dev
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    // Non-finite sums never recover, so this also covers every earlier fold.
    pub fn is_finite(&self) -> bool {
        self.sum.is_finite() && self.sum_sq_dev.is_finite()
    }

    pub fn mean(&self) -> Result<f64, PurifyError> {
        checked_ratio(self.sum, self.count)
    }

    pub fn sigma(&self) -> Result<f64, PurifyError> {
        Ok(checked_ratio(self.sum_sq_dev, self.count)?.sqrt())
    }

    // Folds `datum` in and returns its deviation from the updated mean.
    fn fold(&mut self, datum: f64) -> f64 {
        self.sum += datum;
        self.count += 1;
        let mean = self.sum / self.count as f64;
        let deviation = datum - mean;
        self.sum_sq_dev += deviation * deviation;
        deviation
    }

    fn population_sigma(&self) -> f64 {
        (self.sum_sq_dev / self.count as f64).sqrt()
    }
}

impl fmt::Display for RunningStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "sum: {:.6}; sum_sq_dev: {:.6}; count: {};",
            self.sum, self.sum_sq_dev, self.count
        )
    }
}

/// Online mean/sigma estimator that scores each datum as it arrives.
///
/// The z-score returned by [`push`](Self::push) is computed with statistics
/// that already include the datum being scored. [`zscore`](Self::zscore)
/// scores against the current statistics without touching them.
#[derive(Debug, Clone, Default)]
pub struct StreamingVarianceEstimator {
    stats: RunningStats,
}

impl StreamingVarianceEstimator {
    pub fn new() -> Self {
        Self {
            stats: RunningStats::new(),
        }
    }

    pub fn from_stats(stats: RunningStats) -> Self {
        Self { stats }
    }

    pub fn push_f32(&mut self, x: f32) -> f64 {
        self.push(x as f64)
    }

    pub fn push(&mut self, datum: f64) -> f64 {
        let deviation = self.stats.fold(datum);
        standardize(deviation, self.stats.population_sigma())
    }

    pub fn zscore(&self, datum: f64) -> Result<f64, PurifyError> {
        let mean = self.stats.mean()?;
        let sigma = self.stats.sigma()?;
        Ok(standardize(datum - mean, sigma))
    }

    pub fn mean(&self) -> Result<f64, PurifyError> {
        self.stats.mean()
    }

    pub fn sigma(&self) -> Result<f64, PurifyError> {
        self.stats.sigma()
    }

    pub fn count(&self) -> u64 {
        self.stats.count()
    }

    pub fn snapshot(&self) -> RunningStats {
        self.stats
    }
}

impl Transformer for StreamingVarianceEstimator {
    type Input = f64;
    type Output = ClassifiedDatum;

    fn transform(&mut self, input: f64) -> ClassifiedDatum {
        ClassifiedDatum {
            value: input,
            zscore: self.push(input),
        }
    }
}
