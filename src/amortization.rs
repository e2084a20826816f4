//! Amortization Formulas
//!
//! Pure loan calculations used as the expensive work behind
//! [`crate::calculation::CalculationCache`].

use serde::{Deserialize, Serialize};

use crate::calculation::CalculationParams;

/// Optional-parameter key for an extra principal payment made every month.
pub const EXTRA_PAYMENT: &str = "extra_payment";

/// Upper bound on rows reserved up front; longer schedules grow as needed.
const MAX_PREALLOCATED_MONTHS: usize = 600;

// == Amortization Row ==
/// One month of an amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    /// 1-based month number
    pub month: u32,
    pub payment: f64,
    pub principal: f64,
    pub interest: f64,
    /// Balance remaining after this payment
    pub balance: f64,
}

// == Monthly Payment ==
/// Fixed monthly payment for a fully amortizing loan.
///
/// A zero rate spreads the principal evenly. A zero term yields 0. A term
/// so long that the growth factor overflows pays interest only.
pub fn monthly_payment(principal: f64, annual_rate: f64, term_months: u32) -> f64 {
    if term_months == 0 {
        return 0.0;
    }
    let n = f64::from(term_months);
    let r = annual_rate / 12.0;
    if r == 0.0 {
        return principal / n;
    }
    let growth = (1.0 + r).powf(n);
    if growth.is_infinite() {
        return principal * r;
    }
    principal * r * growth / (growth - 1.0)
}

// == Schedule ==
/// Month-by-month schedule, honoring an optional extra monthly payment.
///
/// The schedule stops early once the balance reaches zero.
pub fn amortization_schedule(
    principal: f64,
    annual_rate: f64,
    term_months: u32,
    extra: Option<&CalculationParams>,
) -> Vec<AmortizationRow> {
    let base_payment = monthly_payment(principal, annual_rate, term_months);
    let extra_payment = extra
        .and_then(|params| params.get(EXTRA_PAYMENT).copied())
        .unwrap_or(0.0)
        .max(0.0);
    let r = annual_rate / 12.0;

    let mut rows = Vec::with_capacity((term_months as usize).min(MAX_PREALLOCATED_MONTHS));
    let mut balance = principal;

    for month in 1..=term_months {
        if balance <= 0.0 {
            break;
        }
        let interest = balance * r;
        let principal_part = (base_payment + extra_payment - interest).min(balance);
        balance -= principal_part;
        if balance.abs() < 1e-9 {
            balance = 0.0;
        }
        rows.push(AmortizationRow {
            month,
            payment: principal_part + interest,
            principal: principal_part,
            interest,
            balance,
        });
    }

    rows
}

// == Total Interest ==
/// Interest paid over the life of the loan without extra payments.
pub fn total_interest(principal: f64, annual_rate: f64, term_months: u32) -> f64 {
    monthly_payment(principal, annual_rate, term_months) * f64::from(term_months) - principal
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn test_monthly_payment_standard_mortgage() {
        // 200k at 6% over 30 years
        let payment = monthly_payment(200_000.0, 0.06, 360);
        assert!(close(payment, 1199.10), "got {}", payment);
    }

    #[test]
    fn test_monthly_payment_zero_rate() {
        assert_eq!(monthly_payment(1200.0, 0.0, 12), 100.0);
    }

    #[test]
    fn test_monthly_payment_zero_term() {
        assert_eq!(monthly_payment(1200.0, 0.05, 0), 0.0);
    }

    #[test]
    fn test_schedule_pays_off_balance() {
        let schedule = amortization_schedule(10_000.0, 0.05, 24, None);
        assert_eq!(schedule.len(), 24);
        assert!(close(schedule.last().unwrap().balance, 0.0));
        assert!(schedule[0].interest > schedule[23].interest);
    }

    #[test]
    fn test_schedule_extra_payment_shortens_loan() {
        let mut extra = CalculationParams::new();
        extra.insert(EXTRA_PAYMENT.to_string(), 200.0);

        let base = amortization_schedule(10_000.0, 0.05, 24, None);
        let faster = amortization_schedule(10_000.0, 0.05, 24, Some(&extra));

        assert!(faster.len() < base.len());
        assert_eq!(faster.last().unwrap().balance, 0.0);
    }

    #[test]
    fn test_monthly_payment_overflowing_term_is_interest_only() {
        let payment = monthly_payment(1000.0, 0.05, u32::MAX);
        assert!(payment.is_finite());
        assert!(close(payment, 1000.0 * 0.05 / 12.0));
    }

    #[test]
    fn test_schedule_huge_term_reserves_bounded_rows() {
        let mut extra = CalculationParams::new();
        extra.insert(EXTRA_PAYMENT.to_string(), 500.0);

        let schedule = amortization_schedule(1000.0, 0.05, 1_000_000, Some(&extra));

        assert_eq!(schedule.len(), 2);
        assert_eq!(schedule.last().unwrap().balance, 0.0);
        assert!(schedule.capacity() < 1_000_000);

        // Nothing to repay: no rows, no large reservation
        let empty = amortization_schedule(0.0, 0.05, u32::MAX, None);
        assert!(empty.is_empty());
        assert!(empty.capacity() < 1_000_000);
    }

    #[test]
    fn test_total_interest() {
        assert_eq!(total_interest(1200.0, 0.0, 12), 0.0);
        assert!(total_interest(200_000.0, 0.06, 360) > 200_000.0);
    }
}
