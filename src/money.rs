//! Validation and decimal arithmetic behind every balance change.
//!
//! Functions here never round; callers apply [`round_cents`](crate::amount::round_cents)
//! once to the returned value before committing it.

use rust_decimal::Decimal;

use crate::{amount::Operand, amount::round_cents, errors::MoneyErr};

const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;
/// Compounding periods per year
const PERIODS_PER_YEAR: u32 = 12;

/// Accept an interest rate in percent, `0 < rate <= 100`, rounded to two digits.
///
/// The rounded rate must stay above zero too, so `0.004` is rejected.
pub fn validate_interest_rate(value: &Operand) -> Result<Decimal, MoneyErr> {
    let rounded = value
        .as_number()
        .filter(|rate| *rate <= ONE_HUNDRED)
        .map(round_cents)
        .filter(|rate| *rate > Decimal::ZERO);

    rounded.ok_or_else(|| MoneyErr::InvalidInterestRate(value.clone()))
}

/// Accept a strictly positive number, returned unchanged
pub fn validate_money_amount(value: &Operand) -> Result<Decimal, MoneyErr> {
    let amount = match value {
        Operand::Number(num) => *num,
        Operand::OutOfRange(_) => return Err(MoneyErr::AmountOutOfRange),
        _ => return Err(MoneyErr::InvalidDataType(value.clone())),
    };

    if amount <= Decimal::ZERO {
        return Err(MoneyErr::NegativeOrZeroAmount(amount));
    }

    Ok(amount)
}

/// Balance after depositing `deposit`
pub fn add_funds(deposit: &Operand, current_balance: Decimal) -> Result<Decimal, MoneyErr> {
    let amount = validate_money_amount(deposit)?;

    current_balance
        .checked_add(amount)
        .ok_or(MoneyErr::AmountOutOfRange)
}

/// Balance after withdrawing `withdrawal`.
///
/// The overdraft check runs before amount validation: a withdrawal that reads
/// as a number larger than the balance is reported as an overdraft even when
/// it would fail validation.
pub fn compute_withdrawal(
    withdrawal: &Operand,
    current_balance: Decimal,
) -> Result<Decimal, MoneyErr> {
    if let Some(requested) = withdrawal.numeric_view() {
        if requested > current_balance {
            return Err(MoneyErr::OverdrawnFunds {
                requested,
                balance: current_balance,
            });
        }
    }

    let amount = validate_money_amount(withdrawal)?;

    Ok(current_balance - amount)
}

/// Principal after one monthly period of an annual `interest_rate` (percent)
pub fn compound_interest(interest_rate: Decimal, principal: Decimal) -> Result<Decimal, MoneyErr> {
    let growth = Decimal::ONE + interest_rate / ONE_HUNDRED;
    let final_amount = principal
        .checked_mul(growth)
        .ok_or(MoneyErr::AmountOutOfRange)?;
    let periodic_interest = (final_amount - principal) / Decimal::from(PERIODS_PER_YEAR);

    principal
        .checked_add(periodic_interest)
        .ok_or(MoneyErr::AmountOutOfRange)
}

#[cfg(test)]
mod test {
    use super::{add_funds, compound_interest, compute_withdrawal, validate_interest_rate,
        validate_money_amount};
    use crate::{amount::round_cents, amount::Operand, errors::MoneyErr};
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn interest_rate_bounds() {
        assert_eq!(validate_interest_rate(&100.into()), Ok(dec!(100)));
        assert_eq!(validate_interest_rate(&12.into()), Ok(dec!(12)));
        assert_eq!(validate_interest_rate(&12.345.into()), Ok(dec!(12.35)));

        for bad in [Operand::from(0), Operand::from(-10), Operand::from(100.01)] {
            assert_eq!(
                validate_interest_rate(&bad),
                Err(MoneyErr::InvalidInterestRate(bad.clone()))
            );
        }
    }

    #[test]
    fn interest_rate_rejects_non_numbers() {
        for bad in [
            Operand::from("10"),
            Operand::from("%"),
            Operand::Missing,
            Operand::Other("true".to_owned()),
        ] {
            assert_eq!(
                validate_interest_rate(&bad),
                Err(MoneyErr::InvalidInterestRate(bad.clone()))
            );
        }
    }

    #[test]
    fn money_amount_type_checked_before_sign() {
        assert_eq!(
            validate_money_amount(&"500".into()),
            Err(MoneyErr::InvalidDataType("500".into()))
        );
        assert_eq!(
            validate_money_amount(&"-5".into()),
            Err(MoneyErr::InvalidDataType("-5".into()))
        );
        assert_eq!(
            validate_money_amount(&(-1000).into()),
            Err(MoneyErr::NegativeOrZeroAmount(dec!(-1000)))
        );
        assert_eq!(
            validate_money_amount(&0.into()),
            Err(MoneyErr::NegativeOrZeroAmount(Decimal::ZERO))
        );
        assert_eq!(validate_money_amount(&0.01.into()), Ok(dec!(0.01)));
    }

    #[test]
    fn unrepresentable_amounts_are_out_of_range() {
        for big_or_tiny in [1e30, 1e-30, -1e30] {
            assert_eq!(
                validate_money_amount(&big_or_tiny.into()),
                Err(MoneyErr::AmountOutOfRange)
            );
        }
        assert_eq!(
            compute_withdrawal(&1e30.into(), dec!(500)),
            Err(MoneyErr::AmountOutOfRange)
        );
        assert_eq!(
            validate_interest_rate(&1e-30.into()),
            Err(MoneyErr::InvalidInterestRate(1e-30.into()))
        );
    }

    #[test]
    fn rates_rounding_to_zero_are_rejected() {
        for tiny in [0.004, 0.001, 0.0049] {
            assert_eq!(
                validate_interest_rate(&tiny.into()),
                Err(MoneyErr::InvalidInterestRate(tiny.into()))
            );
        }
        assert_eq!(validate_interest_rate(&0.005.into()), Ok(dec!(0.01)));
    }

    #[test]
    fn add_funds_is_exact() {
        let balance = add_funds(&0.1.into(), Decimal::ZERO).unwrap();
        let balance = add_funds(&0.2.into(), balance).unwrap();
        assert_eq!(balance, dec!(0.3));
    }

    #[test]
    fn add_funds_overflow_is_an_error() {
        assert_eq!(
            add_funds(&Decimal::MAX.into(), Decimal::MAX),
            Err(MoneyErr::AmountOutOfRange)
        );
    }

    #[test]
    fn withdrawal_overdraft() {
        assert_eq!(
            compute_withdrawal(&1000.into(), dec!(500)),
            Err(MoneyErr::OverdrawnFunds {
                requested: dec!(1000),
                balance: dec!(500)
            })
        );
        assert_eq!(compute_withdrawal(&500.into(), dec!(500)), Ok(Decimal::ZERO));
    }

    #[test]
    fn withdrawal_overdraft_reported_before_type_error() {
        assert_eq!(
            compute_withdrawal(&"1000".into(), dec!(500)),
            Err(MoneyErr::OverdrawnFunds {
                requested: dec!(1000),
                balance: dec!(500)
            })
        );
        assert_eq!(
            compute_withdrawal(&"100".into(), dec!(500)),
            Err(MoneyErr::InvalidDataType("100".into()))
        );
        assert_eq!(
            compute_withdrawal(&(-1).into(), dec!(500)),
            Err(MoneyErr::NegativeOrZeroAmount(dec!(-1)))
        );
    }

    #[test]
    fn compounding_monthly_at_twelve_percent() {
        let mut balance = dec!(1000);
        let mut seen = vec![];
        for _ in 0..4 {
            balance = round_cents(compound_interest(dec!(12), balance).unwrap());
            seen.push(balance);
        }
        assert_eq!(seen, vec![dec!(1010.00), dec!(1020.10), dec!(1030.30), dec!(1040.60)]);
    }

    #[test]
    fn compounding_zero_principal_stays_zero() {
        assert_eq!(compound_interest(dec!(50), Decimal::ZERO), Ok(Decimal::ZERO));
    }

    fn cents() -> impl Strategy<Value = Decimal> {
        (1i64..100_000_000).prop_map(|c| Decimal::new(c, 2))
    }

    fn rates() -> impl Strategy<Value = Decimal> {
        (1i64..=10_000).prop_map(|c| Decimal::new(c, 2))
    }

    proptest! {
        #[test]
        fn valid_rates_are_accepted_and_rounded(milli in 5i64..=100_000) {
            let rate = Decimal::new(milli, 3);
            prop_assert_eq!(validate_interest_rate(&rate.into()), Ok(round_cents(rate)));
        }

        #[test]
        fn out_of_range_rates_are_rejected(milli in prop_oneof![-100_000i64..=0, 100_001i64..1_000_000]) {
            let rate = Operand::from(Decimal::new(milli, 3));
            prop_assert_eq!(
                validate_interest_rate(&rate),
                Err(MoneyErr::InvalidInterestRate(rate.clone()))
            );
        }

        #[test]
        fn deposit_then_withdraw_restores_balance(balance in cents(), amount in cents()) {
            let raised = round_cents(add_funds(&amount.into(), balance).unwrap());
            let back = round_cents(compute_withdrawal(&amount.into(), raised).unwrap());
            prop_assert_eq!(back, balance);
        }

        #[test]
        fn overdraft_always_rejected(balance in cents(), extra in cents()) {
            let requested = balance + extra;
            prop_assert_eq!(
                compute_withdrawal(&requested.into(), balance),
                Err(MoneyErr::OverdrawnFunds { requested, balance })
            );
        }

        #[test]
        fn compounding_never_decreases(rate in rates(), principal in cents()) {
            let mut balance = principal;
            for _ in 0..6 {
                let next = round_cents(compound_interest(rate, balance).unwrap());
                prop_assert!(next >= balance);
                balance = next;
            }
        }
    }
}
