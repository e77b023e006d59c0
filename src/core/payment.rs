//! Payment status business logic.
//!
//! Every view that shows a lesson needs the same answer to "is this paid?", so the
//! classification lives here as one pure function. Amounts that are absent or not
//! numbers count as zero; nothing in this module can fail.

use std::fmt;

/// Currency symbol used when none is configured (South African rand)
pub const DEFAULT_CURRENCY_SYMBOL: &str = "R";

/// Payment state of a single lesson.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaymentStatus {
    /// Amount due is set and has been met or exceeded
    Paid {
        /// What was actually paid, which may exceed the amount due
        amount_paid: f64,
    },
    /// Part of the amount due has been paid
    Outstanding {
        /// Amount still owed
        remaining: f64,
        /// Amount paid so far
        amount_paid: f64,
    },
    /// Amount due is set and nothing has been paid
    Unpaid {
        /// Full amount owed
        amount_due: f64,
    },
    /// No amount due recorded; status comes from the legacy flag alone
    Legacy {
        /// Value of the legacy paid flag
        is_paid: bool,
    },
}

/// Result of assessing a lesson's amounts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaymentSummary {
    /// Classified status
    pub status: PaymentStatus,
    /// `amount_due - amount_paid`; negative when overpaid
    pub remaining: f64,
}

fn coerce(amount: Option<f64>) -> f64 {
    amount.filter(|value| value.is_finite()).unwrap_or(0.0)
}

/// Classifies a lesson's payment state from its amounts.
///
/// Rules are checked in order and the first match wins:
/// 1. due > 0 and paid >= due: `Paid`
/// 2. due > 0, paid > 0 and something remains: `Outstanding`
/// 3. due > 0 and paid == 0: `Unpaid`
/// 4. anything else (no amount due): `Legacy`, using `is_paid`
///
/// # Arguments
/// * `amount_due` - Amount charged, `None` if never set
/// * `amount_paid` - Amount received, `None` if never set
/// * `is_paid` - Legacy flag, only consulted for rule 4
#[must_use]
#[allow(clippy::float_cmp)] // exact zero is the "nothing paid" marker
pub fn assess_payment(amount_due: Option<f64>, amount_paid: Option<f64>, is_paid: bool) -> PaymentSummary {
    let due = coerce(amount_due);
    let paid = coerce(amount_paid);
    let remaining = due - paid;

    let status = if due > 0.0 && paid >= due {
        PaymentStatus::Paid { amount_paid: paid }
    } else if due > 0.0 && paid > 0.0 && remaining > 0.0 {
        PaymentStatus::Outstanding {
            remaining,
            amount_paid: paid,
        }
    } else if due > 0.0 && paid == 0.0 {
        PaymentStatus::Unpaid { amount_due: due }
    } else {
        PaymentStatus::Legacy { is_paid }
    };

    PaymentSummary { status, remaining }
}

impl PaymentStatus {
    /// True for lessons counted as unpaid on the dashboard: `Unpaid`, or
    /// `Legacy` with the flag cleared. Partially paid lessons are not included.
    #[must_use]
    pub const fn is_unpaid(&self) -> bool {
        matches!(self, Self::Unpaid { .. } | Self::Legacy { is_paid: false })
    }

    /// Text shown next to a lesson, e.g. `"Outstanding R25.00 · Paid R25.00"`.
    #[must_use]
    pub fn label(&self, currency: &str) -> String {
        match self {
            Self::Paid { amount_paid } => format!("Paid {}", format_amount(currency, *amount_paid)),
            Self::Outstanding {
                remaining,
                amount_paid,
            } => format!(
                "Outstanding {} · Paid {}",
                format_amount(currency, *remaining),
                format_amount(currency, *amount_paid)
            ),
            Self::Unpaid { amount_due } => format!("Unpaid {}", format_amount(currency, *amount_due)),
            Self::Legacy { is_paid: true } => "Paid".to_string(),
            Self::Legacy { is_paid: false } => "Unpaid".to_string(),
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label(DEFAULT_CURRENCY_SYMBOL))
    }
}

/// Formats a money amount with two decimals and the currency symbol in front.
///
/// # Returns
/// Formatted string like "R150.00", or "-R20.00" for negative balances
#[must_use]
pub fn format_amount(currency: &str, amount: f64) -> String {
    // -0.0 and sub-cent negatives print unsigned
    let amount = (amount * 100.0).round() / 100.0 + 0.0;
    if amount < 0.0 {
        format!("-{currency}{:.2}", amount.abs())
    } else {
        format!("{currency}{amount:.2}")
    }
}
