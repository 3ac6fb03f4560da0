//! Streaming mean/variance estimation and iterative z-score outlier rejection.
//!
//! A [`StreamingVarianceEstimator`] scores values as they arrive, an
//! [`OutlierFilter`] splits scored values into accepted and rejected, and a
//! [`RefinementLoop`] repeats both over the surviving values.

mod math;
mod transforms;

pub mod config;
pub mod error;
pub mod filter;
pub mod refinement;
pub mod running_stat;

pub use config::{RefinementConfig, StopPolicy};
pub use error::PurifyError;
pub use filter::{ClassifiedDatum, FilterResult, OutlierFilter, Verdict};
pub use refinement::{
    apply_round, refine, streaming_zscore, LoopState, RefinementLoop, RefinementOutcome,
    RoundReport, RoundSummary,
};
pub use running_stat::{RunningStats, StreamingVarianceEstimator};
pub use transforms::{transform_all, Transformer};
