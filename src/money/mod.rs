use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use thiserror::Error;

pub mod amount;
pub mod currency;

pub use currency::{Currency, CurrencyError, currency_symbol_for_code, get_currency_symbol};

pub const MINOR_UNITS_PER_MAJOR: i64 = 100;
pub const MAX_DECIMAL_PLACES: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DenominationError {
    #[error("Amount is out of range for the lowest denomination")]
    OutOfRange,
}

/// Pence/cents to pounds/euros. Exact.
pub fn from_lowest_denomination(amount: i64) -> Decimal {
    Decimal::new(amount, MAX_DECIMAL_PLACES)
}

/// Pounds/euros to pence/cents. Ties round away from zero, so `1.235` becomes
/// `124` and `-1.235` becomes `-124`.
pub fn to_lowest_denomination(amount: Decimal) -> Result<i64, DenominationError> {
    amount
        .checked_mul(Decimal::from(MINOR_UNITS_PER_MAJOR))
        .map(|minor| minor.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|minor| minor.to_i64())
        .ok_or(DenominationError::OutOfRange)
}

/// Renders an amount as `£1,234.56` / `-€500.00`.
///
/// `amount` is read as pence/cents when `is_lowest_denomination` is set,
/// otherwise as pounds/euros. Grouping is always `,` for thousands and `.`
/// for the fraction, independent of the currency. The sign goes in front of
/// the symbol.
pub fn format_currency(
    amount: impl Into<Decimal>,
    currency: Currency,
    is_lowest_denomination: bool,
) -> String {
    let amount = amount.into();
    let major = if is_lowest_denomination {
        amount / Decimal::from(MINOR_UNITS_PER_MAJOR)
    } else {
        amount
    };
    let rounded = major.round_dp_with_strategy(
        MAX_DECIMAL_PLACES,
        RoundingStrategy::MidpointAwayFromZero,
    );

    // sign is taken after rounding so that nothing renders as "-£0.00"
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    format!(
        "{sign}{}{}",
        currency.symbol(),
        group_digits(rounded.abs())
    )
}

fn group_digits(mut amount: Decimal) -> String {
    amount.rescale(MAX_DECIMAL_PLACES);
    let digits = amount.to_string();
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3 + fraction.len() + 1);
    for (idx, digit) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    // amounts near the top of the Decimal range cannot be rescaled to two places
    grouped.push('.');
    grouped.push_str(&format!("{fraction:0<2}"));
    grouped
}
