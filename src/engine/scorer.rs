use serde::{Deserialize, Serialize};

use crate::config::UserConfig;
use crate::currency::CurrencyTable;
use crate::marketplace::{OpportunityRecord, RiskLevel};
use super::{Eligibility, Recommendation, RecommendationLevel, ScoredOpportunity};

/// Relative weight of each sub-score in the composite. Should sum to 1.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub annual_return: f64,
    pub risk: f64,
    pub term: f64,
    pub progress: f64,
    pub accessibility: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            annual_return: 0.40,
            risk: 0.25,
            term: 0.15,
            progress: 0.10,
            accessibility: 0.10,
        }
    }
}

/// Multiplicative adjustments applied after the weighted sum, in the order
/// the fields are declared. Independent checks: every applicable multiplier
/// composes with the rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBonuses {
    /// All three eligibility flags hold.
    pub fully_eligible: f64,
    /// Return below the user's minimum.
    pub below_min_return: f64,
    /// Risk beyond the user's tolerance.
    pub over_risk: f64,
    /// Minimum ticket above the user's budget.
    pub over_budget: f64,
    /// Category carries the real-estate marker.
    pub real_estate: f64,
}

impl Default for ScoreBonuses {
    fn default() -> Self {
        Self {
            fully_eligible: 1.10,
            below_min_return: 0.80,
            over_risk: 0.70,
            over_budget: 0.90,
            real_estate: 1.05,
        }
    }
}

const REAL_ESTATE_CATEGORY: &str = "inmobiliario";

/// Spread between the user's minimum return and the return that earns a
/// full sub-score, in percentage points.
const EXCELLENT_RETURN_SPREAD: f64 = 8.0;

/// Penalty per risk step beyond the user's tolerance.
const RISK_STEP_PENALTY: f64 = 20.0;

/// Computes a 0-100 desirability score and a recommendation tier per
/// opportunity. Pure and total: missing fields score their documented
/// neutral values, nothing here fails or logs.
///
/// All tables live on the scorer as plain values so tests can substitute
/// alternates; there is no process-wide mutable state.
#[derive(Debug, Clone)]
pub struct OpportunityScorer {
    pub weights: ScoringWeights,
    pub bonuses: ScoreBonuses,
    /// Base risk score per level, indexed by ordinal A..E.
    pub risk_base: [f64; 5],
    /// Score used when a listing states no risk level.
    pub neutral_risk_score: f64,
    pub currencies: CurrencyTable,
}

impl Default for OpportunityScorer {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            bonuses: ScoreBonuses::default(),
            risk_base: [100.0, 85.0, 70.0, 50.0, 25.0],
            neutral_risk_score: 50.0,
            currencies: CurrencyTable::default(),
        }
    }
}

impl OpportunityScorer {
    pub fn new(currencies: CurrencyTable) -> Self {
        Self {
            currencies,
            ..Default::default()
        }
    }

    /// Score a single opportunity and attach recommendation and flags.
    pub fn evaluate(&self, record: &OpportunityRecord, config: &UserConfig) -> ScoredOpportunity {
        let eligibility = self.eligibility(record, config);
        let score = self.score(record, config);
        let recommendation = self.classify(record, config, score, &eligibility);

        ScoredOpportunity {
            opportunity: record.clone(),
            score,
            recommendation,
            fits_budget: eligibility.fits_budget,
            meets_return: eligibility.meets_return,
            acceptable_risk: eligibility.acceptable_risk,
        }
    }

    pub fn eligibility(&self, record: &OpportunityRecord, config: &UserConfig) -> Eligibility {
        Eligibility::evaluate(record, config, &self.currencies)
    }

    /// Composite desirability score in [0, 100].
    pub fn score(&self, record: &OpportunityRecord, config: &UserConfig) -> u8 {
        let eligibility = self.eligibility(record, config);

        let weighted = self.weights.annual_return * self.return_score(record.annual_return, config.min_return)
            + self.weights.risk * self.risk_score(record.risk, config.max_risk)
            + self.weights.term * self.term_score(record.term_months)
            + self.weights.progress * self.progress_score(record.progress)
            + self.weights.accessibility * self.accessibility_score(record, config);

        let mut adjusted = weighted;
        if eligibility.all() {
            adjusted *= self.bonuses.fully_eligible;
        }
        if !eligibility.meets_return {
            adjusted *= self.bonuses.below_min_return;
        }
        if !eligibility.acceptable_risk {
            adjusted *= self.bonuses.over_risk;
        }
        if !eligibility.fits_budget {
            adjusted *= self.bonuses.over_budget;
        }
        if record
            .category
            .as_deref()
            .map(|c| c.eq_ignore_ascii_case(REAL_ESTATE_CATEGORY))
            .unwrap_or(false)
        {
            adjusted *= self.bonuses.real_estate;
        }

        adjusted.clamp(0.0, 100.0).round() as u8
    }

    /// Linear ramp up to 50 below the minimum, interpolation between 50 and
    /// 100 from the minimum up to minimum + 8 points, 100 beyond that.
    fn return_score(&self, annual_return: Option<f64>, min_return: f64) -> f64 {
        let ret = match annual_return {
            Some(r) => r,
            None => return 0.0,
        };
        let excellent = min_return + EXCELLENT_RETURN_SPREAD;

        if ret < min_return {
            if min_return <= 0.0 {
                return 0.0;
            }
            (ret / min_return * 50.0).max(0.0)
        } else if ret >= excellent {
            100.0
        } else {
            50.0 + (ret - min_return) / (excellent - min_return) * 50.0
        }
    }

    fn risk_score(&self, risk: Option<RiskLevel>, max_risk: RiskLevel) -> f64 {
        let risk = match risk {
            Some(r) => r,
            None => return self.neutral_risk_score,
        };
        let base = self.risk_base[risk.ordinal() as usize];

        let steps_over = risk.ordinal().saturating_sub(max_risk.ordinal());
        (base - RISK_STEP_PENALTY * steps_over as f64).max(0.0)
    }

    fn term_score(&self, term_months: Option<f64>) -> f64 {
        match term_months {
            None => 50.0,
            Some(t) if t <= 6.0 => 100.0,
            Some(t) if t <= 12.0 => 85.0,
            Some(t) if t <= 24.0 => 70.0,
            Some(t) if t <= 36.0 => 55.0,
            Some(_) => 40.0,
        }
    }

    /// Mid-funded listings score best: early ones are unproven, nearly full
    /// ones leave little room to enter.
    fn progress_score(&self, progress: Option<f64>) -> f64 {
        let p = match progress {
            Some(p) => p,
            None => return 50.0,
        };
        if (20.0..=80.0).contains(&p) {
            100.0
        } else if (10.0..20.0).contains(&p) || (80.0..=90.0).contains(&p) {
            80.0
        } else if p > 90.0 {
            60.0
        } else {
            40.0
        }
    }

    fn accessibility_score(&self, record: &OpportunityRecord, config: &UserConfig) -> f64 {
        let budget = self.currencies.to_canonical(config.budget, config.currency);
        let min_investment = record
            .min_investment
            .unwrap_or(self.currencies.min_ticket_pen);

        let mut score: f64 = 50.0;
        if min_investment <= budget {
            score += 30.0;
        }
        if min_investment <= 100.0 {
            score += 20.0;
        } else if min_investment <= 500.0 {
            score += 10.0;
        } else if min_investment > 5000.0 {
            score -= 10.0;
        }
        score.clamp(0.0, 100.0)
    }

    /// Qualitative tier plus up to two reasons derived from threshold checks.
    pub fn classify(
        &self,
        record: &OpportunityRecord,
        config: &UserConfig,
        score: u8,
        eligibility: &Eligibility,
    ) -> Recommendation {
        let strengths = self.strengths(record, config);
        let issues = self.issues(record, config, eligibility);

        let (level, text, reasons) = if score >= 80 {
            (
                RecommendationLevel::High,
                "Strongly recommended".to_string(),
                strengths.into_iter().take(2).collect(),
            )
        } else if score >= 60 {
            let mut reasons: Vec<String> = Vec::new();
            reasons.extend(strengths.into_iter().take(1));
            reasons.extend(issues.into_iter().take(1));
            (
                RecommendationLevel::Medium,
                "Reasonable option".to_string(),
                reasons,
            )
        } else {
            (
                RecommendationLevel::Low,
                "Better options available".to_string(),
                issues.into_iter().take(2).collect(),
            )
        };

        Recommendation {
            level,
            text,
            reasons,
        }
    }

    fn strengths(&self, record: &OpportunityRecord, config: &UserConfig) -> Vec<String> {
        let mut strengths = Vec::new();

        if let Some(ret) = record.annual_return {
            if ret >= config.min_return + 3.0 {
                strengths.push(format!(
                    "Return of {:.1}% comfortably clears your {:.1}% minimum",
                    ret, config.min_return
                ));
            }
        }
        if let Some(risk @ (RiskLevel::A | RiskLevel::B)) = record.risk {
            strengths.push(format!("Low risk profile ({})", risk));
        }
        if let Some(term) = record.term_months {
            if term <= 12.0 {
                strengths.push(format!("Short {:.0}-month term", term));
            }
        }

        strengths
    }

    fn issues(
        &self,
        record: &OpportunityRecord,
        config: &UserConfig,
        eligibility: &Eligibility,
    ) -> Vec<String> {
        let mut issues = Vec::new();

        if record.annual_return.unwrap_or(0.0) < config.min_return {
            issues.push(format!(
                "Return below your {:.1}% minimum",
                config.min_return
            ));
        }
        if let Some(risk @ (RiskLevel::D | RiskLevel::E)) = record.risk {
            issues.push(format!("High risk profile ({})", risk));
        }
        if let Some(term) = record.term_months {
            if term > 36.0 {
                issues.push(format!("Long {:.0}-month term", term));
            }
        }
        if !eligibility.fits_budget {
            issues.push("Minimum ticket exceeds your budget".to_string());
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::score_all;

    fn config() -> UserConfig {
        UserConfig {
            budget: 1000.0,
            min_return: 8.0,
            max_risk: RiskLevel::B,
            currency: crate::currency::Currency::Pen,
        }
    }

    fn opportunity() -> OpportunityRecord {
        OpportunityRecord {
            id: "op-1".into(),
            title: "Factura Acme".into(),
            amount: 10000.0,
            annual_return: Some(12.0),
            risk: Some(RiskLevel::A),
            term_months: Some(6.0),
            progress: Some(0.0),
            min_investment: Some(100.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_worked_example_scores_92() {
        // 0.4*75 + 0.25*100 + 0.15*100 + 0.1*40 + 0.1*100 = 84, then the
        // fully-eligible bonus: 84 * 1.10 = 92.4 -> 92.
        let scorer = OpportunityScorer::default();
        assert_eq!(scorer.score(&opportunity(), &config()), 92);

        let eligibility = scorer.eligibility(&opportunity(), &config());
        assert!(eligibility.all());
    }

    #[test]
    fn test_score_bounds_and_integrality() {
        let scorer = OpportunityScorer::default();
        let cfg = config();

        // u8 return type enforces integrality; probe extremes for bounds.
        let empty = OpportunityRecord::default();
        assert!(scorer.score(&empty, &cfg) <= 100);

        let best = OpportunityRecord {
            annual_return: Some(30.0),
            risk: Some(RiskLevel::A),
            term_months: Some(3.0),
            progress: Some(50.0),
            min_investment: Some(50.0),
            category: Some("inmobiliario".into()),
            ..Default::default()
        };
        assert_eq!(scorer.score(&best, &cfg), 100);
    }

    #[test]
    fn test_return_score_segments() {
        let scorer = OpportunityScorer::default();

        // Below minimum: linear ramp capped at 50.
        assert_eq!(scorer.return_score(Some(4.0), 8.0), 25.0);
        // At minimum: start of the upper segment.
        assert_eq!(scorer.return_score(Some(8.0), 8.0), 50.0);
        // Midway to excellent.
        assert_eq!(scorer.return_score(Some(12.0), 8.0), 75.0);
        // At and beyond excellent.
        assert_eq!(scorer.return_score(Some(16.0), 8.0), 100.0);
        assert_eq!(scorer.return_score(Some(25.0), 8.0), 100.0);
        // Unknown return.
        assert_eq!(scorer.return_score(None, 8.0), 0.0);
        // Zero minimum: anything non-negative interpolates toward excellent.
        assert_eq!(scorer.return_score(Some(5.0), 0.0), 81.25);
        // Below a zero minimum must not divide by zero.
        assert_eq!(scorer.return_score(Some(-1.0), 0.0), 0.0);
    }

    #[test]
    fn test_return_monotonicity_within_segments() {
        let scorer = OpportunityScorer::default();
        let mut last = -1.0;
        for tenths in 0..300 {
            let ret = tenths as f64 / 10.0;
            let score = scorer.return_score(Some(ret), 8.0);
            assert!(
                score >= last,
                "return score decreased at {}%: {} < {}",
                ret,
                score,
                last
            );
            last = score;
        }
    }

    #[test]
    fn test_risk_score_at_and_beyond_tolerance() {
        let scorer = OpportunityScorer::default();

        // At tolerance: undiminished base value.
        assert_eq!(scorer.risk_score(Some(RiskLevel::B), RiskLevel::B), 85.0);
        // One step beyond loses exactly 20.
        assert_eq!(scorer.risk_score(Some(RiskLevel::C), RiskLevel::B), 50.0);
        // Two steps beyond: 50 - 40 = 10.
        assert_eq!(scorer.risk_score(Some(RiskLevel::D), RiskLevel::B), 10.0);
        // Floors at zero.
        assert_eq!(scorer.risk_score(Some(RiskLevel::E), RiskLevel::A), 0.0);
        // Missing risk scores neutral.
        assert_eq!(scorer.risk_score(None, RiskLevel::B), 50.0);
    }

    #[test]
    fn test_term_and_progress_steps() {
        let scorer = OpportunityScorer::default();

        assert_eq!(scorer.term_score(Some(6.0)), 100.0);
        assert_eq!(scorer.term_score(Some(12.0)), 85.0);
        assert_eq!(scorer.term_score(Some(24.0)), 70.0);
        assert_eq!(scorer.term_score(Some(36.0)), 55.0);
        assert_eq!(scorer.term_score(Some(48.0)), 40.0);
        assert_eq!(scorer.term_score(None), 50.0);

        assert_eq!(scorer.progress_score(Some(50.0)), 100.0);
        assert_eq!(scorer.progress_score(Some(15.0)), 80.0);
        assert_eq!(scorer.progress_score(Some(85.0)), 80.0);
        assert_eq!(scorer.progress_score(Some(95.0)), 60.0);
        assert_eq!(scorer.progress_score(Some(5.0)), 40.0);
        assert_eq!(scorer.progress_score(None), 50.0);
    }

    #[test]
    fn test_accessibility_score_bounds() {
        let scorer = OpportunityScorer::default();
        let cfg = config();

        // Fits budget and smallest ticket tier: 50 + 30 + 20, capped at 100.
        let easy = OpportunityRecord {
            min_investment: Some(100.0),
            ..Default::default()
        };
        assert_eq!(scorer.accessibility_score(&easy, &cfg), 100.0);

        // Over budget and oversized ticket: 50 - 10.
        let heavy = OpportunityRecord {
            min_investment: Some(6000.0),
            ..Default::default()
        };
        assert_eq!(scorer.accessibility_score(&heavy, &cfg), 40.0);
    }

    #[test]
    fn test_penalties_compose() {
        let scorer = OpportunityScorer::default();
        let cfg = config();

        // Fails return, risk and budget at once: every penalty applies.
        let bad = OpportunityRecord {
            annual_return: Some(4.0),
            risk: Some(RiskLevel::E),
            term_months: Some(48.0),
            progress: Some(95.0),
            min_investment: Some(6000.0),
            ..Default::default()
        };
        let eligibility = scorer.eligibility(&bad, &cfg);
        assert!(!eligibility.meets_return);
        assert!(!eligibility.acceptable_risk);
        assert!(!eligibility.fits_budget);

        // Weighted: 0.4*25 + 0.25*0 + 0.15*40 + 0.1*60 + 0.1*40 = 26,
        // then 26 * 0.8 * 0.7 * 0.9 = 13.104 -> 13.
        assert_eq!(scorer.score(&bad, &cfg), 13);
    }

    #[test]
    fn test_real_estate_bonus() {
        let scorer = OpportunityScorer::default();
        let cfg = config();

        let plain = OpportunityRecord {
            annual_return: Some(10.0),
            risk: Some(RiskLevel::B),
            term_months: Some(12.0),
            progress: Some(50.0),
            min_investment: Some(200.0),
            ..Default::default()
        };
        let real_estate = OpportunityRecord {
            category: Some("Inmobiliario".into()),
            ..plain.clone()
        };

        assert!(scorer.score(&real_estate, &cfg) > scorer.score(&plain, &cfg));
    }

    #[test]
    fn test_classification_tiers() {
        let scorer = OpportunityScorer::default();
        let cfg = config();

        let scored = scorer.evaluate(&opportunity(), &cfg);
        assert_eq!(scored.recommendation.level, RecommendationLevel::High);
        assert_eq!(scored.recommendation.text, "Strongly recommended");
        assert!(!scored.recommendation.reasons.is_empty());
        assert!(scored.recommendation.reasons.len() <= 2);

        let weak = OpportunityRecord {
            annual_return: Some(5.0),
            risk: Some(RiskLevel::E),
            term_months: Some(48.0),
            ..Default::default()
        };
        let scored = scorer.evaluate(&weak, &cfg);
        assert_eq!(scored.recommendation.level, RecommendationLevel::Low);
        assert!(scored.recommendation.reasons.len() <= 2);
    }

    #[test]
    fn test_scoring_is_deterministic_and_idempotent() {
        let scorer = OpportunityScorer::default();
        let cfg = config();
        let record = opportunity();

        let first = scorer.evaluate(&record, &cfg);
        let second = scorer.evaluate(&record, &cfg);
        assert_eq!(first.score, second.score);
        assert_eq!(first.recommendation.level, second.recommendation.level);
        assert_eq!(first.recommendation.reasons, second.recommendation.reasons);
    }

    #[test]
    fn test_score_all_sorts_descending_and_stable() {
        let scorer = OpportunityScorer::default();
        let cfg = config();

        let strong = opportunity();
        let twin = OpportunityRecord {
            id: "op-2".into(),
            ..opportunity()
        };
        let weak = OpportunityRecord {
            id: "op-3".into(),
            annual_return: Some(5.0),
            risk: Some(RiskLevel::D),
            ..Default::default()
        };

        let scored = score_all(&scorer, &[weak, strong, twin], &cfg);
        assert_eq!(scored[0].opportunity.id, "op-1");
        assert_eq!(scored[1].opportunity.id, "op-2");
        assert_eq!(scored[2].opportunity.id, "op-3");
        assert!(scored[0].score >= scored[1].score);
        assert_eq!(scored[0].score, scored[1].score);
    }

    #[test]
    fn test_alternate_risk_table_is_injectable() {
        let scorer = OpportunityScorer {
            risk_base: [100.0, 90.0, 80.0, 70.0, 60.0],
            ..Default::default()
        };
        assert_eq!(scorer.risk_score(Some(RiskLevel::E), RiskLevel::E), 60.0);
    }
}
