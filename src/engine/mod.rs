pub mod allocator;
pub mod scorer;

pub use allocator::{AllocationParams, BudgetAllocator, Distribution};
pub use scorer::{OpportunityScorer, ScoreBonuses, ScoringWeights};

use serde::{Deserialize, Serialize};

use crate::config::UserConfig;
use crate::currency::CurrencyTable;
use crate::marketplace::OpportunityRecord;

/// How strongly a scored opportunity is endorsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationLevel {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub level: RecommendationLevel,
    pub text: String,
    /// Up to two short phrases explaining the level.
    pub reasons: Vec<String>,
}

/// Threshold checks shared by scoring bonuses and the allocation filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eligibility {
    pub fits_budget: bool,
    pub meets_return: bool,
    pub acceptable_risk: bool,
}

impl Eligibility {
    pub fn evaluate(
        record: &OpportunityRecord,
        config: &UserConfig,
        currencies: &CurrencyTable,
    ) -> Self {
        let budget = currencies.to_canonical(config.budget, config.currency);
        let min_investment = record
            .min_investment
            .unwrap_or(currencies.min_ticket_pen);

        Self {
            fits_budget: min_investment <= budget,
            meets_return: record.annual_return.unwrap_or(0.0) >= config.min_return,
            // A listing that does not state its risk is not excluded on risk
            // grounds; it only loses points through the neutral risk score.
            acceptable_risk: record
                .risk
                .map(|r| r.ordinal() <= config.max_risk.ordinal())
                .unwrap_or(true),
        }
    }

    pub fn all(&self) -> bool {
        self.fits_budget && self.meets_return && self.acceptable_risk
    }
}

/// An opportunity decorated with everything the presentation layer needs.
/// Recomputed fresh on every scoring pass, never persisted on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredOpportunity {
    #[serde(flatten)]
    pub opportunity: OpportunityRecord,
    pub score: u8,
    pub recommendation: Recommendation,
    pub fits_budget: bool,
    pub meets_return: bool,
    pub acceptable_risk: bool,
}

/// Score every record and return the list sorted by score descending.
/// The sort is stable: listings with equal scores keep their scraped order.
pub fn score_all(
    scorer: &OpportunityScorer,
    records: &[OpportunityRecord],
    config: &UserConfig,
) -> Vec<ScoredOpportunity> {
    let mut scored: Vec<ScoredOpportunity> = records
        .iter()
        .map(|record| scorer.evaluate(record, config))
        .collect();
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
}
