use serde::{Deserialize, Serialize};

/// Fixed exchange rate: canonical units (PEN) per USD.
pub const PEN_PER_USD: f64 = 3.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "PEN")]
    Pen,
    #[serde(rename = "USD")]
    Usd,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Pen => "PEN",
            Currency::Usd => "USD",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Pen => "S/",
            Currency::Usd => "$",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PEN" => Ok(Currency::Pen),
            "USD" => Ok(Currency::Usd),
            other => Err(format!("unsupported currency code: {}", other)),
        }
    }
}

/// Per-currency constants used by the scoring and allocation engines.
///
/// All internal arithmetic happens in the canonical unit (PEN); amounts are
/// converted at the display boundary only. The table is a value injected into
/// the engines rather than a process-wide global, so tests can substitute
/// alternate rates and ticket sizes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyTable {
    /// Canonical units per one USD.
    pub usd_rate: f64,
    /// Smallest allowed investment, in each currency's own unit.
    pub min_ticket_pen: f64,
    pub min_ticket_usd: f64,
}

impl Default for CurrencyTable {
    fn default() -> Self {
        Self {
            usd_rate: PEN_PER_USD,
            min_ticket_pen: 50.0,
            min_ticket_usd: 15.0,
        }
    }
}

impl CurrencyTable {
    /// Convert an amount expressed in `currency` into canonical units.
    pub fn to_canonical(&self, amount: f64, currency: Currency) -> f64 {
        match currency {
            Currency::Pen => amount,
            Currency::Usd => amount * self.usd_rate,
        }
    }

    /// Convert an amount in canonical units into `currency` for display.
    pub fn from_canonical(&self, amount: f64, currency: Currency) -> f64 {
        match currency {
            Currency::Pen => amount,
            Currency::Usd => amount / self.usd_rate,
        }
    }

    /// Minimum ticket in the currency's own unit.
    pub fn min_ticket(&self, currency: Currency) -> f64 {
        match currency {
            Currency::Pen => self.min_ticket_pen,
            Currency::Usd => self.min_ticket_usd,
        }
    }

    /// Minimum ticket expressed in canonical units.
    pub fn min_ticket_canonical(&self, currency: Currency) -> f64 {
        self.to_canonical(self.min_ticket(currency), currency)
    }
}

/// Guard for quantities that feed currency display: non-finite values fall
/// back to the given default instead of propagating NaN/inf into output.
pub fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usd_round_trip_is_linear() {
        let table = CurrencyTable::default();
        let canonical = table.to_canonical(100.0, Currency::Usd);
        assert!((canonical - 370.0).abs() < 1e-9);
        let back = table.from_canonical(canonical, Currency::Usd);
        assert!((back - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_pen_is_canonical() {
        let table = CurrencyTable::default();
        assert_eq!(table.to_canonical(123.45, Currency::Pen), 123.45);
        assert_eq!(table.from_canonical(123.45, Currency::Pen), 123.45);
    }

    #[test]
    fn test_min_ticket_canonical() {
        let table = CurrencyTable::default();
        assert!((table.min_ticket_canonical(Currency::Pen) - 50.0).abs() < 1e-9);
        assert!((table.min_ticket_canonical(Currency::Usd) - 15.0 * 3.7).abs() < 1e-9);
    }

    #[test]
    fn test_currency_parsing() {
        assert_eq!("pen".parse::<Currency>().unwrap(), Currency::Pen);
        assert_eq!(" USD ".parse::<Currency>().unwrap(), Currency::Usd);
        assert!("EUR".parse::<Currency>().is_err());
    }

    #[test]
    fn test_finite_or_fallback() {
        assert_eq!(finite_or(1.5, 0.0), 1.5);
        assert_eq!(finite_or(f64::NAN, 0.0), 0.0);
        assert_eq!(finite_or(f64::INFINITY, 50.0), 50.0);
    }
}
