//! # Currency Formatting
//!
//! Amounts are displayed with two decimals, a configurable symbol and either
//! Western (`1,234,567.00`) or Indian (`12,34,567.00`) digit grouping.
//!
//! ## Example
//!
//! ```rust
//! use quote_core::currency::CurrencyFormat;
//!
//! let inr = CurrencyFormat::default();
//! assert_eq!(inr.format(123456.789), "₹1,23,456.79");
//!
//! let usd = CurrencyFormat::western("$");
//! assert_eq!(usd.format(-1234.5), "-$1,234.50");
//! ```

use serde::{Deserialize, Serialize};

/// How the integer digits are grouped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigitGrouping {
    /// Groups of three
    Western,
    /// Last three digits, then groups of two (lakh / crore)
    #[default]
    Indian,
}

/// Display settings for money amounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub grouping: DigitGrouping,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        CurrencyFormat {
            symbol: "₹".to_string(),
            grouping: DigitGrouping::Indian,
        }
    }
}

impl CurrencyFormat {
    pub fn new(symbol: impl Into<String>, grouping: DigitGrouping) -> Self {
        CurrencyFormat {
            symbol: symbol.into(),
            grouping,
        }
    }

    pub fn western(symbol: impl Into<String>) -> Self {
        CurrencyFormat::new(symbol, DigitGrouping::Western)
    }

    /// Symbol, grouped digits and two decimals. Non-finite amounts show as 0.
    pub fn format(&self, amount: f64) -> String {
        let plain = self.format_plain(amount);
        match plain.strip_prefix('-') {
            Some(digits) => format!("-{}{}", self.symbol, digits),
            None => format!("{}{}", self.symbol, plain),
        }
    }

    /// Grouped digits and two decimals without the symbol.
    pub fn format_plain(&self, amount: f64) -> String {
        let amount = if amount.is_finite() { amount } else { 0.0 };
        let fixed = format!("{:.2}", amount.abs());
        let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

        let grouped = group_digits(int_part, self.grouping);
        // "-0.00" reads oddly; only show the sign when something survives rounding
        let negative = amount < 0.0 && fixed.bytes().any(|b| matches!(b, b'1'..=b'9'));
        format!("{}{}.{}", if negative { "-" } else { "" }, grouped, frac_part)
    }
}

fn group_digits(digits: &str, grouping: DigitGrouping) -> String {
    let len = digits.len();
    if len <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(len - 3);
    let head_group = match grouping {
        DigitGrouping::Western => 3,
        DigitGrouping::Indian => 2,
    };

    let mut groups = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(head_group);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    groups.push(tail);
    groups.join(",")
}
