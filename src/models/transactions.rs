use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Currency amount held in cents so balances never drift.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid amount: {0}")]
pub struct InvalidAmount(String);

impl TryFrom<f64> for Money {
    type Error = InvalidAmount;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        let cents = (value * 100.0).round();
        if !cents.is_finite() || cents.abs() > i64::MAX as f64 {
            return Err(InvalidAmount(value.to_string()));
        }

        Ok(Money(cents as i64))
    }
}

impl From<Money> for f64 {
    fn from(money: Money) -> Self {
        money.0 as f64 / 100.0
    }
}

impl FromStr for Money {
    type Err = InvalidAmount;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));

        let valid = !whole.is_empty()
            && fraction.len() <= 2
            && whole.chars().all(|c| c.is_ascii_digit())
            && fraction.chars().all(|c| c.is_ascii_digit());
        if !valid {
            return Err(InvalidAmount(s.to_string()));
        }

        let whole: i64 = whole.parse().map_err(|_| InvalidAmount(s.to_string()))?;
        let fraction: i64 = format!("{:0<2}", fraction)
            .parse()
            .map_err(|_| InvalidAmount(s.to_string()))?;
        let cents = whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(fraction))
            .ok_or_else(|| InvalidAmount(s.to_string()))?;

        Ok(Money(if negative { -cents } else { cents }))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    Donation,
    Transfer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Completed,
    Pending,
    Failed,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Transaction {
    pub id: String,
    pub kind: TransactionKind,
    pub amount: Money,
    pub recipient_name: String,
    pub date: NaiveDate,
    pub category: String,
    pub status: TransactionStatus,
}

/// The two views that move money out of the balance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowKind {
    Transfer,
    Donation,
}

impl FlowKind {
    pub fn transaction_kind(self) -> TransactionKind {
        match self {
            FlowKind::Transfer => TransactionKind::Transfer,
            FlowKind::Donation => TransactionKind::Donation,
        }
    }

    /// Transfers show a confirmation screen before money moves; donations
    /// are confirmed straight from the form.
    pub fn has_review(self) -> bool {
        matches!(self, FlowKind::Transfer)
    }

    pub fn success_title(self) -> &'static str {
        match self {
            FlowKind::Transfer => "Transfer completed",
            FlowKind::Donation => "Donation processed",
        }
    }

    pub fn failure_title(self) -> &'static str {
        match self {
            FlowKind::Transfer => "Transfer failed",
            FlowKind::Donation => "Donation failed",
        }
    }

    pub fn history_category(self) -> &'static str {
        match self {
            FlowKind::Transfer => "Personal",
            FlowKind::Donation => "Giving",
        }
    }
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowKind::Transfer => write!(f, "transfer"),
            FlowKind::Donation => write!(f, "donation"),
        }
    }
}

impl FromStr for FlowKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "transfer" | "transfers" => Ok(FlowKind::Transfer),
            "donation" | "donations" => Ok(FlowKind::Donation),
            other => Err(format!("Unknown flow: {}", other)),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowStep {
    #[default]
    Details,
    Review,
    Completed,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Recipient {
    pub name: String,
    pub account: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct TransferOrder {
    pub recipient: Recipient,
    pub amount: Money,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub instant: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FlowState {
    pub step: FlowStep,
    pub draft: Option<TransferOrder>,
    pub processing: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct Receipt {
    pub transaction: Transaction,
    pub balance: Money,
}

pub fn demo_history() -> Vec<Transaction> {
    let record = |id: &str, kind: TransactionKind, cents: i64, recipient: &str, (y, m, d): (i32, u32, u32), category: &str| Transaction {
        id: id.to_string(),
        kind,
        amount: Money::from_cents(cents),
        recipient_name: recipient.to_string(),
        date: NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default(),
        category: category.to_string(),
        status: TransactionStatus::Completed,
    };

    vec![
        record("t1", TransactionKind::Donation, 50_000, "Fondation Marie Curie", (2023, 11, 20), "Health"),
        record("t2", TransactionKind::Transfer, 120_000, "Pierre Durand", (2023, 11, 18), "Personal"),
        record("t3", TransactionKind::Deposit, 350_000, "Self transfer", (2023, 11, 15), "Salary"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal_strings() {
        assert_eq!("40".parse::<Money>().unwrap(), Money::from_cents(4_000));
        assert_eq!("40.5".parse::<Money>().unwrap(), Money::from_cents(4_050));
        assert_eq!(" 12450.75 ".parse::<Money>().unwrap(), Money::from_cents(1_245_075));
        assert_eq!("-3.10".parse::<Money>().unwrap(), Money::from_cents(-310));
        assert!("4.005".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!(".5".parse::<Money>().is_err());
    }

    #[test]
    fn displays_two_decimals() {
        assert_eq!(Money::from_cents(4_000).to_string(), "40.00");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::from_cents(-1_205).to_string(), "-12.05");
    }

    #[test]
    fn json_numbers_round_to_cents() {
        let money: Money = serde_json::from_str("60.1").unwrap();
        assert_eq!(money, Money::from_cents(6_010));
        assert_eq!(serde_json::to_string(&Money::from_cents(6_000)).unwrap(), "60.0");
    }

    #[test]
    fn flow_kind_accepts_view_names() {
        assert_eq!("transfers".parse::<FlowKind>().unwrap(), FlowKind::Transfer);
        assert_eq!("donation".parse::<FlowKind>().unwrap(), FlowKind::Donation);
        assert!("history".parse::<FlowKind>().is_err());
    }
}
