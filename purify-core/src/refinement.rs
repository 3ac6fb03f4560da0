//! Repeated estimate-then-filter rounds over a shrinking candidate set.
//!
//! Every round scores its input with a fresh [`StreamingVarianceEstimator`],
//! partitions it with a fresh [`OutlierFilter`], and hands the accepted values
//! to the next round. Statistics never carry over between rounds.

use std::rc::Rc;

use itertools::Itertools;
use log::{debug, info};

use crate::config::{RefinementConfig, StopPolicy};
use crate::error::PurifyError;
use crate::filter::{ClassifiedDatum, FilterResult, OutlierFilter};
use crate::math::{first_non_finite, min_max};
use crate::running_stat::{RunningStats, StreamingVarianceEstimator};
use crate::transforms::transform_all;

/// Pushes every value through `estimator` and returns the z-scores aligned by
/// index with `data`.
pub fn streaming_zscore(data: &[f64], estimator: &mut StreamingVarianceEstimator) -> Vec<f64> {
    transform_all(estimator, data.iter().cloned())
        .into_iter()
        .map(|d| d.zscore)
        .collect()
}

/// Runs a single round over `data` and returns the partition together with
/// the estimator's end-of-round statistics.
pub fn apply_round(
    data: &[f64],
    threshold: f64,
) -> Result<(FilterResult, RunningStats), PurifyError> {
    if data.is_empty() {
        return Err(PurifyError::EmptyInput);
    }
    if let Some((index, value)) = first_non_finite(data) {
        return Err(PurifyError::NonFinite { index, value });
    }

    let mut estimator = StreamingVarianceEstimator::new();
    let zscores = streaming_zscore(data, &mut estimator);
    let snapshot = estimator.snapshot();
    if !snapshot.is_finite() {
        return Err(PurifyError::Overflow);
    }

    let mut filter = OutlierFilter::new(threshold);
    for (&value, zscore) in data.iter().zip_eq(zscores) {
        filter.push(ClassifiedDatum { value, zscore });
    }
    let result = filter.finish();

    if result.rejection_count() != 0 {
        if let Some((lo, hi)) = min_max(&result.accepted) {
            debug!("accepted range: [{}, {}]", lo, hi);
        }
        if let Some((lo, hi)) = min_max(&result.rejected) {
            debug!("rejected range: [{}, {}]", lo, hi);
        }
        info!("this round outliers found: {}", result.rejection_count());
    }

    Ok((result, snapshot))
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoundReport {
    // 1-based.
    pub round: usize,
    // Shared with the loop as the next round's input.
    pub accepted: Rc<Vec<f64>>,
    pub rejected: Vec<f64>,
    pub snapshot: RunningStats,
}

impl RoundReport {
    pub fn input_len(&self) -> usize {
        self.accepted.len() + self.rejected.len()
    }

    pub fn rejection_count(&self) -> usize {
        self.rejected.len()
    }

    pub fn summary(&self) -> RoundSummary {
        RoundSummary {
            round: self.round,
            input_len: self.input_len(),
            accepted_len: self.accepted.len(),
            snapshot: self.snapshot,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundSummary {
    pub round: usize,
    pub input_len: usize,
    pub accepted_len: usize,
    pub snapshot: RunningStats,
}

impl RoundSummary {
    pub fn rejected_len(&self) -> usize {
        self.input_len - self.accepted_len
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running(usize),
    Done,
}

/// Drives refinement rounds one at a time; each call to `next` runs a round.
///
/// After the last round, or after a round fails, the loop is `Done` and yields
/// nothing further.
#[derive(Debug)]
pub struct RefinementLoop {
    config: RefinementConfig,
    candidates: Rc<Vec<f64>>,
    state: LoopState,
}

impl RefinementLoop {
    pub fn new(config: RefinementConfig, input: Vec<f64>) -> Result<Self, PurifyError> {
        config.validate().map_err(PurifyError::InvalidConfig)?;
        Ok(Self {
            config,
            candidates: Rc::new(input),
            state: LoopState::Running(1),
        })
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn candidates(&self) -> &[f64] {
        self.candidates.as_slice()
    }

    pub fn config(&self) -> &RefinementConfig {
        &self.config
    }

    fn next_state(&self, round: usize, rejected: usize) -> LoopState {
        if round >= self.config.max_rounds {
            return LoopState::Done;
        }
        match self.config.stop_policy {
            StopPolicy::FixedPoint if rejected == 0 => LoopState::Done,
            _ => LoopState::Running(round + 1),
        }
    }

    /// Runs every remaining round and returns the survivors of the last one.
    ///
    /// Only a summary of each earlier round is kept.
    pub fn run(self) -> Result<RefinementOutcome, PurifyError> {
        let mut rounds = Vec::new();
        let mut last = None;
        for report in self {
            let report = report?;
            rounds.push(report.summary());
            last = Some(report);
        }
        let last = last.ok_or(PurifyError::EmptyInput)?;
        // The loop is gone by now, so the survivors are uniquely owned.
        let survivors = Rc::try_unwrap(last.accepted).unwrap_or_else(|shared| (*shared).clone());
        Ok(RefinementOutcome {
            survivors,
            final_stats: last.snapshot,
            rounds,
        })
    }
}

impl Iterator for RefinementLoop {
    type Item = Result<RoundReport, PurifyError>;

    fn next(&mut self) -> Option<Self::Item> {
        let round = match self.state {
            LoopState::Running(round) => round,
            LoopState::Done => return None,
        };
        info!("round {}: {} candidates", round, self.candidates.len());

        let (result, snapshot) = match apply_round(&self.candidates, self.config.threshold) {
            Ok(output) => output,
            Err(e) => {
                self.state = LoopState::Done;
                return Some(Err(e));
            }
        };
        info!("round {}: {}", round, snapshot);

        self.state = self.next_state(round, result.rejection_count());
        self.candidates = Rc::new(result.accepted);
        Some(Ok(RoundReport {
            round,
            accepted: Rc::clone(&self.candidates),
            rejected: result.rejected,
            snapshot,
        }))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RefinementOutcome {
    pub survivors: Vec<f64>,
    pub final_stats: RunningStats,
    pub rounds: Vec<RoundSummary>,
}

pub fn refine(input: Vec<f64>, config: &RefinementConfig) -> Result<RefinementOutcome, PurifyError> {
    RefinementLoop::new(config.clone(), input)?.run()
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    fn contaminated(n_clean: usize, outliers: &[(usize, f64)]) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(7);
        let mut data: Vec<f64> = (0..n_clean).map(|_| rng.gen_range(-1.0, 1.0)).collect();
        for &(idx, v) in outliers.iter() {
            data.insert(idx, v);
        }
        data
    }

    #[test]
    fn zscores_align_with_input() {
        let mut est = StreamingVarianceEstimator::new();
        let z = streaming_zscore(&[0.0, 10.0, 5.0], &mut est);
        assert_eq!(z.len(), 3);
        assert_eq!(z[0], 0.0);
        assert!((z[1] - 2.0f64.sqrt()).abs() < 1e-12);
        assert_eq!(z[2], 0.0);
        assert_eq!(est.count(), 3);
    }

    #[test]
    fn zscores_continue_from_given_estimator() {
        let mut warm = StreamingVarianceEstimator::new();
        streaming_zscore(&[1.0, 2.0, 3.0], &mut warm);
        let z = streaming_zscore(&[2.0], &mut warm);
        assert_eq!(z, vec![0.0]);
        assert_eq!(warm.count(), 4);
    }

    #[test]
    fn round_partitions_input() {
        let data = contaminated(200, &[(60, 40.0), (150, -35.0)]);
        let (result, stats) = apply_round(&data, 3.0).unwrap();
        assert_eq!(result.len(), data.len());
        assert_eq!(stats.count(), data.len() as u64);
        assert_eq!(result.rejected, vec![40.0, -35.0]);

        let mut expected = data.clone();
        expected.retain(|v| *v != 40.0 && *v != -35.0);
        assert_eq!(result.accepted, expected);
    }

    #[test]
    fn clean_round_is_identity() {
        let data = contaminated(100, &[]);
        let (result, _) = apply_round(&data, 3.0).unwrap();
        assert_eq!(result.accepted, data);
        assert!(result.rejected.is_empty());
    }

    #[test]
    fn first_datum_is_always_accepted() {
        let (result, _) = apply_round(&[1e9, 0.0, 0.0], 0.5).unwrap();
        assert_eq!(result.accepted[0], 1e9);
    }

    #[test]
    fn round_rejects_empty_and_non_finite_input() {
        assert_eq!(apply_round(&[], 3.0), Err(PurifyError::EmptyInput));
        assert_eq!(
            apply_round(&[1.0, f64::INFINITY, 2.0], 3.0),
            Err(PurifyError::NonFinite {
                index: 1,
                value: f64::INFINITY
            })
        );
        match apply_round(&[f64::NAN], 3.0) {
            Err(PurifyError::NonFinite { index: 0, .. }) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn round_reports_overflowing_statistics() {
        assert_eq!(apply_round(&[1e308, 1e308], 3.0), Err(PurifyError::Overflow));
        assert_eq!(
            apply_round(&[1e200, -1e200, 0.0], 3.0),
            Err(PurifyError::Overflow)
        );
        assert!(apply_round(&[1e150, -1e150, 0.0], 3.0).is_ok());

        let mut rounds =
            RefinementLoop::new(RefinementConfig::default(), vec![1e308, 1e308]).unwrap();
        assert_eq!(rounds.next(), Some(Err(PurifyError::Overflow)));
        assert_eq!(rounds.state(), LoopState::Done);
    }

    #[test]
    fn report_shares_survivors_with_next_round() {
        let data = contaminated(50, &[(20, 80.0)]);
        let mut rounds = RefinementLoop::new(RefinementConfig::default(), data).unwrap();
        let report = rounds.next().unwrap().unwrap();
        assert_eq!(rounds.candidates(), report.accepted.as_slice());
        assert_eq!(Rc::strong_count(&report.accepted), 2);
        rounds.next().unwrap().unwrap();
        assert_eq!(Rc::strong_count(&report.accepted), 1);
    }

    #[test]
    fn fixed_rounds_runs_every_round() {
        let data = contaminated(100, &[]);
        let mut rounds = RefinementLoop::new(RefinementConfig::default(), data.clone()).unwrap();
        for i in 1..=4 {
            assert_eq!(rounds.state(), LoopState::Running(i));
            let report = rounds.next().unwrap().unwrap();
            assert_eq!(report.round, i);
            assert_eq!(*report.accepted, data);
        }
        assert_eq!(rounds.state(), LoopState::Done);
        assert!(rounds.next().is_none());
    }

    #[test]
    fn fixed_point_stops_once_nothing_is_rejected() {
        let data = contaminated(300, &[(100, 50.0), (200, 60.0)]);
        let config = RefinementConfig {
            max_rounds: 10,
            stop_policy: StopPolicy::FixedPoint,
            ..RefinementConfig::default()
        };
        let outcome = refine(data.clone(), &config).unwrap();
        let last = outcome.rounds.last().unwrap();
        assert!(outcome.rounds.len() < 10);
        assert_eq!(last.rejected_len(), 0);
        assert!(outcome.rounds[..outcome.rounds.len() - 1]
            .iter()
            .all(|r| r.rejected_len() > 0));
        assert!(!outcome.survivors.contains(&50.0));
        assert!(!outcome.survivors.contains(&60.0));
    }

    #[test]
    fn rounds_feed_each_other() {
        let data = contaminated(500, &[(50, 30.0), (120, 25.0), (300, -28.0), (450, 12.0)]);
        let reports: Vec<RoundReport> = RefinementLoop::new(RefinementConfig::default(), data)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(reports.len(), 4);
        for pair in reports.windows(2) {
            assert_eq!(pair[1].input_len(), pair[0].accepted.len());
            assert!(pair[1].accepted.len() <= pair[0].accepted.len());
        }
        for report in reports.iter() {
            assert_eq!(report.snapshot.count(), report.input_len() as u64);
        }
    }

    #[test]
    fn outcome_matches_last_round() {
        let data = contaminated(200, &[(30, 90.0)]);
        let outcome = refine(data, &RefinementConfig::default()).unwrap();
        assert_eq!(outcome.rounds.len(), 4);
        let last = outcome.rounds.last().unwrap();
        assert_eq!(last.accepted_len, outcome.survivors.len());
        assert_eq!(last.snapshot, outcome.final_stats);
        assert!(!outcome.survivors.contains(&90.0));
        assert!(outcome.final_stats.mean().unwrap().abs() < 0.5);
    }

    #[test]
    fn failing_round_ends_the_loop() {
        let mut rounds = RefinementLoop::new(RefinementConfig::default(), vec![]).unwrap();
        assert_eq!(rounds.next(), Some(Err(PurifyError::EmptyInput)));
        assert_eq!(rounds.state(), LoopState::Done);
        assert!(rounds.next().is_none());
        match refine(vec![1.0, f64::NAN], &RefinementConfig::default()) {
            Err(PurifyError::NonFinite { index: 1, .. }) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = RefinementConfig {
            max_rounds: 0,
            ..RefinementConfig::default()
        };
        match RefinementLoop::new(config, vec![1.0]) {
            Err(PurifyError::InvalidConfig(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }
}
