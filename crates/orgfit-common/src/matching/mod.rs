pub mod ko_checks;
pub mod ranking;
pub mod scoring;
pub mod skills;
pub mod weights;

pub use ranking::{CandidateRankingEngine, RankedCandidate, RankingConfig, ShortlistEntry};
pub use scoring::{
    DetailedMetrics, FitScoringEngine, ManagerFit, Metrics, RoleFitBreakdown, ScoringConfig,
    SeniorityMatch,
};
