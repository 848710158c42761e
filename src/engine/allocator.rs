use serde::{Deserialize, Serialize};

use crate::config::UserConfig;
use crate::currency::{finite_or, Currency, CurrencyTable};
use crate::marketplace::OpportunityRecord;
use super::{Eligibility, ScoredOpportunity};

/// Tuning knobs for how aggressively the allocator sizes positions.
/// The defaults are heuristic, so they live here rather than as literals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationParams {
    /// Hard cap on the share of the remaining budget a single listing may take.
    pub max_budget_ratio: f64,
    /// Converts a 0-1 score into a share of the remaining budget.
    pub score_multiplier: f64,
}

impl Default for AllocationParams {
    fn default() -> Self {
        Self {
            max_budget_ratio: 0.5,
            score_multiplier: 0.7,
        }
    }
}

/// One slice of the budget assigned to an opportunity. Amounts are carried
/// in canonical units with display-currency mirrors alongside.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Distribution {
    pub opportunity: OpportunityRecord,
    pub score: u8,
    /// Invested amount, canonical units. Always a multiple of the ticket.
    pub investment: f64,
    /// Expected return over the listing's term, canonical units.
    pub expected_return: f64,
    /// Share of the total budget, percent.
    pub percentage: f64,
    pub investment_display: f64,
    pub expected_return_display: f64,
    pub currency: Currency,
}

/// Greedily distributes a budget across scored opportunities, best score
/// first. Single pass, no backtracking: deterministic and explainable
/// rather than provably optimal.
#[derive(Debug, Clone, Default)]
pub struct BudgetAllocator {
    pub params: AllocationParams,
    pub currencies: CurrencyTable,
}

impl BudgetAllocator {
    pub fn new(params: AllocationParams, currencies: CurrencyTable) -> Self {
        Self { params, currencies }
    }

    /// Walk the eligible opportunities in score order and assign each a
    /// slice of the remaining budget, rounded down to a whole number of
    /// tickets so every emitted amount is actually investable.
    pub fn allocate(
        &self,
        scored: &[ScoredOpportunity],
        config: &UserConfig,
    ) -> Vec<Distribution> {
        // Eligibility is recomputed from the thresholds; the score only
        // influences ordering and sizing, never inclusion.
        let mut eligible: Vec<&ScoredOpportunity> = scored
            .iter()
            .filter(|s| {
                let e = Eligibility::evaluate(&s.opportunity, config, &self.currencies);
                e.meets_return && e.acceptable_risk
            })
            .collect();
        eligible.sort_by(|a, b| b.score.cmp(&a.score));

        let budget = self.currencies.to_canonical(config.budget, config.currency);
        let ticket = self.currencies.min_ticket_canonical(config.currency);
        if !(ticket > 0.0) {
            return Vec::new();
        }

        let mut distributions = Vec::new();
        let mut remaining = budget;

        for scored_op in eligible {
            if remaining < ticket {
                break;
            }
            let op = &scored_op.opportunity;

            let max_possible = remaining.min(op.unfunded_amount());
            if max_possible < ticket {
                // This listing has no investable room left; later ones
                // might, so keep walking.
                continue;
            }

            let budget_ratio = (scored_op.score as f64 / 100.0 * self.params.score_multiplier)
                .min(self.params.max_budget_ratio);
            let strategic_amount = remaining * budget_ratio;

            let investment =
                (strategic_amount.min(max_possible) / ticket).floor() * ticket;
            if investment <= 0.0 {
                continue;
            }

            let annual_return = op.annual_return.unwrap_or(0.0);
            let expected_return =
                investment * (annual_return / 100.0) * (op.term_days() / 365.0);

            distributions.push(Distribution {
                opportunity: op.clone(),
                score: scored_op.score,
                investment,
                expected_return,
                percentage: finite_or(investment / budget * 100.0, 0.0),
                investment_display: finite_or(
                    self.currencies.from_canonical(investment, config.currency),
                    0.0,
                ),
                expected_return_display: finite_or(
                    self.currencies.from_canonical(expected_return, config.currency),
                    0.0,
                ),
                currency: config.currency,
            });
            remaining -= investment;
        }

        distributions
    }

    /// Render 3-4 human-readable lines summarizing a completed allocation.
    /// Pure formatting over the distribution slice.
    pub fn summary(&self, distributions: &[Distribution], config: &UserConfig) -> Vec<String> {
        let symbol = config.currency.symbol();

        if distributions.is_empty() {
            return vec![
                "No opportunities match your criteria right now. Consider relaxing \
                 your minimum return or maximum risk."
                    .to_string(),
            ];
        }

        let total: f64 = distributions.iter().map(|d| d.investment).sum();
        let total_return: f64 = distributions.iter().map(|d| d.expected_return).sum();
        let total_display = finite_or(
            self.currencies.from_canonical(total, config.currency),
            0.0,
        );
        let return_display = finite_or(
            self.currencies.from_canonical(total_return, config.currency),
            0.0,
        );
        let return_pct = finite_or(total_return / total * 100.0, 0.0);

        let mut lines = Vec::with_capacity(4);
        lines.push(format!(
            "Investing {}{:.2} of your {}{:.2} budget across {} {}.",
            symbol,
            total_display,
            symbol,
            config.budget,
            distributions.len(),
            if distributions.len() == 1 {
                "opportunity"
            } else {
                "opportunities"
            },
        ));
        lines.push(format!(
            "Estimated return: {}{:.2} ({:.1}% on the amount invested).",
            symbol, return_display, return_pct,
        ));

        let top_share = finite_or(distributions[0].investment / total, 0.0);
        if distributions.len() == 1 || top_share > 0.6 {
            lines.push(
                "Concentrated strategy: most of the budget rides on the top-scored listing."
                    .to_string(),
            );
        } else {
            lines.push(format!(
                "Diversified strategy: the budget is spread across {} listings.",
                distributions.len(),
            ));
        }

        let budget = self.currencies.to_canonical(config.budget, config.currency);
        let leftover = budget - total;
        if leftover >= self.currencies.min_ticket_canonical(config.currency) {
            lines.push(format!(
                "{}{:.2} of the budget remains unallocated.",
                symbol,
                finite_or(self.currencies.from_canonical(leftover, config.currency), 0.0),
            ));
        }

        lines
    }
}
