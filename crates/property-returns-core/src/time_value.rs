use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::types::Money;

const CONVERGENCE_THRESHOLD: Decimal = dec!(0.0000001);
const MAX_IRR_ITERATIONS: u32 = 100;
const IRR_GUESS: Decimal = dec!(0.10);
const MAX_IRR: Decimal = dec!(10.0);
const MAX_BISECTION_ITERATIONS: u32 = 200;
const BISECTION_WIDTH: Decimal = dec!(0.000000000001);
const BRACKET_GRID: [Decimal; 13] = [
    dec!(-0.99),
    dec!(-0.9),
    dec!(-0.75),
    dec!(-0.5),
    dec!(-0.25),
    dec!(-0.1),
    dec!(0),
    dec!(0.1),
    dec!(0.25),
    dec!(0.5),
    dec!(1),
    dec!(3),
    dec!(10),
];

/// (1 + rate)^periods, with `rate` as a fraction.
pub fn compound_factor(rate: Decimal, periods: u32) -> Decimal {
    (Decimal::ONE + rate).powi(i64::from(periods))
}

/// Grow `value` at `rate` (fraction) for `periods` periods.
pub fn compound(value: Money, rate: Decimal, periods: u32) -> Money {
    value * compound_factor(rate, periods)
}

/// Net Present Value of period-spaced cash flows, first flow at t = 0.
///
/// Returns `None` for rates at or below -100%, or when discounting
/// overflows.
pub fn npv(rate: Decimal, cash_flows: &[Money]) -> Option<Money> {
    if rate <= dec!(-1) {
        return None;
    }
    npv_and_derivative(cash_flows, rate).map(|(npv, _)| npv)
}

/// Internal Rate of Return using Newton-Raphson, falling back to bisection
/// over a fixed rate grid when Newton overflows or wanders off.
///
/// `None` when the flows never change sign or no root can be located;
/// both are "not applicable" outcomes for the caller, not errors.
pub fn irr(cash_flows: &[Money]) -> Option<Decimal> {
    if cash_flows.len() < 2 {
        return None;
    }
    let has_outflow = cash_flows.iter().any(|cf| cf.is_sign_negative() && !cf.is_zero());
    let has_inflow = cash_flows.iter().any(|cf| cf.is_sign_positive() && !cf.is_zero());
    if !has_outflow || !has_inflow {
        return None;
    }

    newton_irr(cash_flows).or_else(|| bisect_irr(cash_flows))
}

fn newton_irr(cash_flows: &[Money]) -> Option<Decimal> {
    let mut rate = IRR_GUESS;

    for _ in 0..MAX_IRR_ITERATIONS {
        let (npv_val, dnpv) = npv_and_derivative(cash_flows, rate)?;

        if npv_val.abs() < CONVERGENCE_THRESHOLD {
            return Some(rate);
        }
        if dnpv.is_zero() {
            return None;
        }

        let mut next = rate.checked_sub(npv_val.checked_div(dnpv)?)?;
        if (next - rate).abs() < CONVERGENCE_THRESHOLD {
            return Some(next);
        }
        // Never step to or past -100%; move halfway towards it instead.
        if next <= dec!(-1) {
            next = (rate - Decimal::ONE) / Decimal::TWO;
        } else if next > MAX_IRR {
            next = MAX_IRR;
        }
        rate = next;
    }

    None
}

fn bisect_irr(cash_flows: &[Money]) -> Option<Decimal> {
    // Rates whose NPV overflows are skipped; the bracket comes from the
    // first adjacent pair of evaluable rates with opposite signs.
    let evaluated: Vec<(Decimal, Decimal)> = BRACKET_GRID
        .iter()
        .filter_map(|&r| npv(r, cash_flows).map(|v| (r, v)))
        .collect();

    let (mut lo, mut lo_npv, mut hi) = evaluated.windows(2).find_map(|pair| {
        let ((r0, v0), (r1, v1)) = (pair[0], pair[1]);
        if v0.is_zero() {
            Some((r0, v0, r0))
        } else if v0.is_sign_positive() != v1.is_sign_positive() || v1.is_zero() {
            Some((r0, v0, r1))
        } else {
            None
        }
    })?;

    for _ in 0..MAX_BISECTION_ITERATIONS {
        let mid = (lo + hi) / Decimal::TWO;
        let mid_npv = npv(mid, cash_flows)?;
        if mid_npv.abs() < CONVERGENCE_THRESHOLD || hi - lo < BISECTION_WIDTH {
            return Some(mid);
        }
        if mid_npv.is_sign_positive() == lo_npv.is_sign_positive() {
            lo = mid;
            lo_npv = mid_npv;
        } else {
            hi = mid;
        }
    }

    Some((lo + hi) / Decimal::TWO)
}

/// NPV(r) = sum CF_t / (1+r)^t and its derivative d(NPV)/dr.
///
/// Discounting by repeated division keeps long horizons at high trial rates
/// from overflowing. Rates close to -100% grow the factors instead, so every
/// step is checked and an overflow yields `None`.
fn npv_and_derivative(cash_flows: &[Money], rate: Decimal) -> Option<(Decimal, Decimal)> {
    let one_plus_r = Decimal::ONE + rate;
    if one_plus_r <= Decimal::ZERO {
        return None;
    }
    let mut npv = Decimal::ZERO;
    let mut dnpv = Decimal::ZERO;
    let mut discount = Decimal::ONE;

    for (t, cf) in cash_flows.iter().enumerate() {
        let present = cf.checked_mul(discount)?;
        npv = npv.checked_add(present)?;
        if t > 0 {
            // d/dr of CF_t / (1+r)^t = -t * CF_t / (1+r)^(t+1)
            let slope = Decimal::from(t as i64)
                .checked_mul(present)?
                .checked_div(one_plus_r)?;
            dnpv = dnpv.checked_sub(slope)?;
        }
        discount = discount.checked_div(one_plus_r)?;
    }

    Some((npv, dnpv))
}
