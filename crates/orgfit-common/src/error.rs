#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("fit weights must be finite numbers (skills={skills}, seniority={seniority})")]
    NonFiniteWeight { skills: f64, seniority: f64 },
    #[error("fit weights must be non-negative (skills={skills}, seniority={seniority})")]
    NegativeWeight { skills: f64, seniority: f64 },
    #[error("fit weights must sum to 1.0 but sum to {0}")]
    WeightSum(f64),
    #[error("seniority penalties must be finite and non-negative (over={over}, under={under})")]
    InvalidPenalty { over: f64, under: f64 },
    #[error("ranking cutoff must not be negative, got {0}")]
    NegativeCutoff(i8),
    #[error("top_n must be at least 1")]
    EmptyTopN,
}
