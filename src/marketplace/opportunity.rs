use serde::{Deserialize, Serialize};

/// Risk classification used by the marketplace, ordered from lowest (A) to
/// highest (E) risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    A,
    B,
    C,
    D,
    E,
}

impl RiskLevel {
    /// Position in the A..E ordering, used for threshold comparisons.
    pub fn ordinal(&self) -> u8 {
        match self {
            RiskLevel::A => 0,
            RiskLevel::B => 1,
            RiskLevel::C => 2,
            RiskLevel::D => 3,
            RiskLevel::E => 4,
        }
    }

    pub fn letter(&self) -> char {
        match self {
            RiskLevel::A => 'A',
            RiskLevel::B => 'B',
            RiskLevel::C => 'C',
            RiskLevel::D => 'D',
            RiskLevel::E => 'E',
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl std::str::FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(RiskLevel::A),
            "B" => Ok(RiskLevel::B),
            "C" => Ok(RiskLevel::C),
            "D" => Ok(RiskLevel::D),
            "E" => Ok(RiskLevel::E),
            other => Err(format!("unknown risk level: {}", other)),
        }
    }
}

/// A single investable listing as delivered by the page scraper.
///
/// Scraped data is unreliable: numbers arrive as numbers, formatted strings,
/// or not at all. Every numeric field deserializes leniently (garbage becomes
/// `None`, never an error) and the engines substitute documented defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OpportunityRecord {
    pub id: String,
    pub title: String,
    /// Total size of the opportunity, canonical units. Missing or invalid
    /// values are treated as 0.
    #[serde(deserialize_with = "lenient::f64_or_zero")]
    pub amount: f64,
    /// Nominal annualized return percentage.
    #[serde(rename = "return", deserialize_with = "lenient::opt_f64")]
    pub annual_return: Option<f64>,
    #[serde(deserialize_with = "lenient::opt_risk")]
    pub risk: Option<RiskLevel>,
    /// Duration in months.
    #[serde(rename = "term", deserialize_with = "lenient::opt_f64")]
    pub term_months: Option<f64>,
    /// Percent of the amount already funded, 0-100.
    #[serde(deserialize_with = "lenient::opt_f64")]
    pub progress: Option<f64>,
    #[serde(deserialize_with = "lenient::opt_f64")]
    pub min_investment: Option<f64>,
    /// ISO-like currency code as scraped, informational only.
    pub currency: Option<String>,
    /// Free-text classification, e.g. "inmobiliario".
    pub category: Option<String>,

    // Enrichment fields scraped from the listing detail modal, when present.
    #[serde(deserialize_with = "lenient::opt_f64")]
    pub raised_amount: Option<f64>,
    #[serde(deserialize_with = "lenient::opt_f64")]
    pub remaining_amount: Option<f64>,
    #[serde(deserialize_with = "lenient::opt_u64")]
    pub total_investors: Option<u64>,
    #[serde(deserialize_with = "lenient::opt_f64")]
    pub max_investment: Option<f64>,
    #[serde(deserialize_with = "lenient::opt_f64")]
    pub monthly_return: Option<f64>,
    pub payment_guaranteed: Option<bool>,
    pub estimated_payment: Option<String>,
    pub auction_close: Option<String>,
    pub remaining_time: Option<String>,
}

impl OpportunityRecord {
    /// Term expressed in days, defaulting to 90 when the listing does not
    /// state one.
    pub fn term_days(&self) -> f64 {
        self.term_months.map(|m| m * 30.0).unwrap_or(90.0)
    }

    /// Portion of the amount still open for funding, canonical units.
    pub fn unfunded_amount(&self) -> f64 {
        let progress = self.progress.unwrap_or(0.0).clamp(0.0, 100.0);
        self.amount.max(0.0) * (100.0 - progress) / 100.0
    }

    /// Clamp scraped values into their documented ranges.
    pub fn sanitize(mut self) -> Self {
        self.amount = self.amount.max(0.0);
        self.progress = self.progress.map(|p| p.clamp(0.0, 100.0));
        self
    }
}

mod lenient {
    use super::RiskLevel;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn value_to_f64(value: Value) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
            Value::String(s) => s
                .trim()
                .trim_start_matches(['S', '/', '$'])
                .replace(',', "")
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite()),
            _ => None,
        }
    }

    pub fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.and_then(value_to_f64))
    }

    pub fn f64_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(opt_f64(deserializer)?.unwrap_or(0.0))
    }

    pub fn opt_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(opt_f64(deserializer)?
            .filter(|v| *v >= 0.0)
            .map(|v| v as u64))
    }

    pub fn opt_risk<'de, D>(deserializer: D) -> Result<Option<RiskLevel>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.and_then(|v| match v {
            Value::String(s) => s.parse::<RiskLevel>().ok(),
            _ => None,
        }))
    }
}
