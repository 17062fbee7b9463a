//! Fixed-rate loan amortisation.
//!
//! Monthly repayments on a standard principal-and-interest mortgage, the
//! outstanding balance at any month, and a year-by-year split of each
//! year's repayments into principal and interest.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::MAX_LOAN_TERM_YEARS;
use crate::error::PropertyReturnsError;
use crate::inputs::InvestmentInputs;
use crate::time_value::compound_factor;
use crate::types::{to_rate, Money, Percent};
use crate::validation::MAX_PRICE;
use crate::PropertyReturnsResult;

const MONTHS_PER_YEAR: u32 = 12;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Principal and interest paid during one loan year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationYear {
    pub year: u32,
    pub opening_balance: Money,
    pub principal_paid: Money,
    pub interest_paid: Money,
    pub closing_balance: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanSchedule {
    pub loan_amount: Money,
    pub annual_interest_rate_percent: Percent,
    pub loan_term_years: u32,
    /// loan_term_years x 12
    pub number_of_payments: u32,
    pub monthly_payment: Money,
    /// monthly_payment x number_of_payments
    pub total_payment: Money,
    /// Never negative; rounding residue is absorbed at zero
    pub total_interest_paid: Money,
    pub annual_breakdown: Vec<AmortizationYear>,
}

impl LoanSchedule {
    /// Schedule for the loan implied by a validated input set.
    pub fn for_inputs(inputs: &InvestmentInputs) -> PropertyReturnsResult<Self> {
        build_loan_schedule(
            inputs.loan_amount(),
            inputs.annual_interest_rate_percent,
            inputs.loan_term_years,
        )
    }

    pub fn annual_debt_service(&self) -> Money {
        self.monthly_payment * Decimal::from(MONTHS_PER_YEAR)
    }

    /// Outstanding balance after `months_elapsed` repayments.
    pub fn balance_after_months(&self, months_elapsed: u32) -> Money {
        balance_from_payment(
            self.loan_amount,
            monthly_rate(self.annual_interest_rate_percent),
            self.number_of_payments,
            self.monthly_payment,
            months_elapsed,
        )
    }

    /// Whether any repayment falls in projection year `year` (1-indexed).
    pub fn is_repaying_in_year(&self, year: u32) -> bool {
        !self.loan_amount.is_zero() && year >= 1 && year <= self.loan_term_years
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Standard fixed-rate repayment: L * r(1+r)^n / ((1+r)^n - 1).
///
/// `r` is the monthly rate (annual % / 100 / 12) and `n` the number of
/// monthly repayments. A zero rate repays `L / n` each month.
pub fn monthly_payment(
    loan_amount: Money,
    annual_interest_rate_percent: Percent,
    loan_term_years: u32,
) -> PropertyReturnsResult<Money> {
    check_loan(loan_amount, annual_interest_rate_percent, loan_term_years)?;
    Ok(payment_unchecked(
        loan_amount,
        monthly_rate(annual_interest_rate_percent),
        loan_term_years * MONTHS_PER_YEAR,
    ))
}

/// Outstanding balance after `months_elapsed` repayments; zero once the
/// term has run.
pub fn remaining_balance(
    loan_amount: Money,
    annual_interest_rate_percent: Percent,
    loan_term_years: u32,
    months_elapsed: u32,
) -> PropertyReturnsResult<Money> {
    check_loan(loan_amount, annual_interest_rate_percent, loan_term_years)?;
    let r = monthly_rate(annual_interest_rate_percent);
    let n = loan_term_years * MONTHS_PER_YEAR;
    let payment = payment_unchecked(loan_amount, r, n);
    Ok(balance_from_payment(loan_amount, r, n, payment, months_elapsed))
}

/// Full schedule with a principal/interest split for every loan year.
pub fn build_loan_schedule(
    loan_amount: Money,
    annual_interest_rate_percent: Percent,
    loan_term_years: u32,
) -> PropertyReturnsResult<LoanSchedule> {
    check_loan(loan_amount, annual_interest_rate_percent, loan_term_years)?;

    let r = monthly_rate(annual_interest_rate_percent);
    let n = loan_term_years * MONTHS_PER_YEAR;
    let payment = payment_unchecked(loan_amount, r, n);
    let total_payment = payment * Decimal::from(n);
    let total_interest_paid = (total_payment - loan_amount).max(Decimal::ZERO);

    let mut annual_breakdown = Vec::with_capacity(loan_term_years as usize);
    let mut balance = loan_amount;

    for year in 1..=loan_term_years {
        let opening_balance = balance;
        let mut principal_paid = Decimal::ZERO;
        let mut interest_paid = Decimal::ZERO;

        for month in 1..=MONTHS_PER_YEAR {
            let interest = balance * r;
            let is_final = year == loan_term_years && month == MONTHS_PER_YEAR;
            // The final repayment clears whatever rounding left behind.
            let principal = if is_final {
                balance
            } else {
                (payment - interest).min(balance)
            };
            interest_paid += interest;
            principal_paid += principal;
            balance -= principal;
        }

        annual_breakdown.push(AmortizationYear {
            year,
            opening_balance,
            principal_paid,
            interest_paid,
            closing_balance: balance,
        });
    }

    Ok(LoanSchedule {
        loan_amount,
        annual_interest_rate_percent,
        loan_term_years,
        number_of_payments: n,
        monthly_payment: payment,
        total_payment,
        total_interest_paid,
        annual_breakdown,
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn check_loan(
    loan_amount: Money,
    annual_interest_rate_percent: Percent,
    loan_term_years: u32,
) -> PropertyReturnsResult<()> {
    if loan_amount < Decimal::ZERO {
        return Err(PropertyReturnsError::InvalidLoanParameters {
            reason: format!("loan amount {loan_amount} is negative"),
        });
    }
    if loan_amount > MAX_PRICE {
        return Err(PropertyReturnsError::InvalidLoanParameters {
            reason: format!("loan amount {loan_amount} exceeds {MAX_PRICE}"),
        });
    }
    if loan_term_years == 0 {
        return Err(PropertyReturnsError::InvalidLoanParameters {
            reason: "loan term must be at least one year".into(),
        });
    }
    if loan_term_years > MAX_LOAN_TERM_YEARS {
        return Err(PropertyReturnsError::InvalidLoanParameters {
            reason: format!("loan term of {loan_term_years} years exceeds {MAX_LOAN_TERM_YEARS}"),
        });
    }
    if annual_interest_rate_percent < Decimal::ZERO
        || annual_interest_rate_percent > Decimal::ONE_HUNDRED
    {
        return Err(PropertyReturnsError::InvalidLoanParameters {
            reason: format!(
                "interest rate {annual_interest_rate_percent}% must be between 0 and 100"
            ),
        });
    }
    Ok(())
}

fn monthly_rate(annual_interest_rate_percent: Percent) -> Decimal {
    to_rate(annual_interest_rate_percent) / Decimal::from(MONTHS_PER_YEAR)
}

fn payment_unchecked(loan_amount: Money, r: Decimal, n: u32) -> Money {
    if r.is_zero() {
        return loan_amount / Decimal::from(n);
    }
    // Same formula divided through by (1+r)^n, so L * (1+r)^n never has to
    // be materialised for long terms at high rates.
    let factor = compound_factor(r, n);
    loan_amount * r / (Decimal::ONE - Decimal::ONE / factor)
}

/// Balance = present value of the repayments still to come.
fn balance_from_payment(loan_amount: Money, r: Decimal, n: u32, payment: Money, k: u32) -> Money {
    if k >= n || loan_amount.is_zero() {
        return Decimal::ZERO;
    }
    let balance = if r.is_zero() {
        loan_amount - payment * Decimal::from(k)
    } else {
        let remaining = compound_factor(r, n - k);
        payment * (Decimal::ONE - Decimal::ONE / remaining) / r
    };
    balance.max(Decimal::ZERO).min(loan_amount)
}
