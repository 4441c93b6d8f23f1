pub mod candidate_response;
pub mod position_response;

pub use candidate_response::RankedCandidateResponse;
pub use position_response::{DetailedMetricsDto, ManagerFitDto, MetricsDto, PositionResponse};
