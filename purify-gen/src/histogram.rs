use std::fmt::Write;

/// Fixed-range counts for text display. Values outside the range are dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    lo: f64,
    hi: f64,
    counts: Vec<usize>,
}

impl Histogram {
    pub fn new(lo: f64, hi: f64, bins: usize) -> Self {
        assert!(bins > 0, "bins must be greater than 0");
        assert!(lo <= hi, "lo must be at most hi");
        Self {
            lo,
            hi,
            counts: vec![0; bins],
        }
    }

    // Range spans the min and max of `values`; None when empty.
    pub fn spanning(values: &[f64], bins: usize) -> Option<Self> {
        let lo = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        if lo > hi {
            return None;
        }
        let mut hist = Self::new(lo, hi, bins);
        hist.extend(values);
        Some(hist)
    }

    pub fn with_range_of(&self, values: &[f64]) -> Self {
        let mut hist = Self::new(self.lo, self.hi, self.counts.len());
        hist.extend(values);
        hist
    }

    fn bin_of(&self, v: f64) -> Option<usize> {
        if !(v >= self.lo && v <= self.hi) {
            return None;
        }
        let bins = self.counts.len();
        let width = self.hi - self.lo;
        if width == 0.0 {
            return Some(0);
        }
        let idx = ((v - self.lo) / width * bins as f64) as usize;
        Some(idx.min(bins - 1))
    }

    pub fn push(&mut self, v: f64) {
        if let Some(idx) = self.bin_of(v) {
            self.counts[idx] += 1;
        }
    }

    pub fn extend(&mut self, values: &[f64]) {
        for &v in values.iter() {
            self.push(v);
        }
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn render(&self, width: usize) -> String {
        let bins = self.counts.len();
        let step = (self.hi - self.lo) / bins as f64;
        let peak = self.counts.iter().cloned().max().unwrap_or(0).max(1);
        let mut out = String::new();
        for (i, &count) in self.counts.iter().enumerate() {
            let start = self.lo + step * i as f64;
            let bar = count * width / peak;
            // Writing into a String cannot fail.
            let _ = writeln!(out, "{:>10.3} | {:<w$} {}", start, "#".repeat(bar), count, w = width);
        }
        out
    }
}
