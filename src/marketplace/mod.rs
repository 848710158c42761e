pub mod opportunity;
pub mod source;

pub use opportunity::{OpportunityRecord, RiskLevel};
pub use source::{JsonFileSource, OpportunitySource};
