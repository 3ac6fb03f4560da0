use crate::transforms::Transformer;

pub const DEFAULT_THRESHOLD: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifiedDatum {
    pub value: f64,
    pub zscore: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected,
}

/// Partition of one round's input. Both sides keep input order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterResult {
    pub accepted: Vec<f64>,
    pub rejected: Vec<f64>,
}

impl FilterResult {
    pub fn len(&self) -> usize {
        self.accepted.len() + self.rejected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn rejection_count(&self) -> usize {
        self.rejected.len()
    }
}

/// Accepts values whose |z| is strictly below the threshold.
///
/// Single use: feed one round through it, then take the result with
/// [`finish`](Self::finish).
#[derive(Debug)]
pub struct OutlierFilter {
    threshold: f64,
    result: FilterResult,
}

impl OutlierFilter {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            result: FilterResult::default(),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn push(&mut self, datum: ClassifiedDatum) -> Verdict {
        if datum.zscore.abs() < self.threshold {
            self.result.accepted.push(datum.value);
            Verdict::Accepted
        } else {
            self.result.rejected.push(datum.value);
            Verdict::Rejected
        }
    }

    pub fn accepted(&self) -> &[f64] {
        &self.result.accepted
    }

    pub fn rejected(&self) -> &[f64] {
        &self.result.rejected
    }

    pub fn finish(self) -> FilterResult {
        self.result
    }
}

impl Default for OutlierFilter {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl Transformer for OutlierFilter {
    type Input = ClassifiedDatum;
    type Output = Verdict;

    fn transform(&mut self, input: ClassifiedDatum) -> Verdict {
        self.push(input)
    }
}
