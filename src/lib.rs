pub mod config;
pub mod currency;
pub mod engine;
pub mod error;
pub mod marketplace;
pub mod report;

pub use config::{ConfigStore, UserConfig};
pub use currency::{Currency, CurrencyTable};
pub use engine::{
    score_all, AllocationParams, BudgetAllocator, Distribution, OpportunityScorer,
    ScoredOpportunity,
};
pub use error::{LendSeerError, Result};
pub use marketplace::{JsonFileSource, OpportunityRecord, OpportunitySource, RiskLevel};
