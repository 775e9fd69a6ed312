use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use super::{Currency, MAX_DECIMAL_PLACES, format_currency};

pub const DEFAULT_MAXIMUM_AMOUNT: i64 = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("Amount is required")]
    Required,
    #[error("Amount must be a valid number")]
    NotANumber,
    #[error("Amount must be greater than 0")]
    NotPositive,
    #[error("Amount can only have up to 2 decimal places")]
    TooManyDecimals,
    #[error("Amount cannot exceed {}", display_maximum(.maximum))]
    ExceedsMaximum { maximum: Decimal },
}

fn display_maximum(maximum: &Decimal) -> String {
    format_currency(*maximum, Currency::Gbp, false)
}

/// Limits applied to a payout amount in major units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountRules {
    pub maximum: Decimal,
}

impl Default for AmountRules {
    fn default() -> Self {
        Self {
            maximum: Decimal::from(DEFAULT_MAXIMUM_AMOUNT),
        }
    }
}

impl AmountRules {
    pub fn with_maximum(maximum: Decimal) -> Self {
        Self { maximum }
    }
}

/// Checks a major-unit amount. Rules run in order and the first failure wins:
/// positive, at most two decimal places, not above the maximum.
pub fn validate_amount(amount: Decimal, rules: &AmountRules) -> Result<Decimal, AmountError> {
    let result = if amount <= Decimal::ZERO {
        Err(AmountError::NotPositive)
    } else if amount.round_dp(MAX_DECIMAL_PLACES) != amount {
        Err(AmountError::TooManyDecimals)
    } else if amount > rules.maximum {
        Err(AmountError::ExceedsMaximum {
            maximum: rules.maximum,
        })
    } else {
        Ok(amount)
    };
    if let Err(err) = &result {
        debug!(%amount, "amount rejected: {err}");
    }
    result
}

/// Parses text typed into an amount field, then applies [`validate_amount`].
/// Empty input is reported before anything else, unparseable input next.
pub fn parse_amount_input(input: &str, rules: &AmountRules) -> Result<Decimal, AmountError> {
    let input = input.trim();
    if input.is_empty() {
        debug!("amount rejected: empty input");
        return Err(AmountError::Required);
    }
    let Some(number) = ScannedNumber::scan(input) else {
        debug!("amount rejected: not a number");
        return Err(AmountError::NotANumber);
    };
    let amount = number.to_decimal(rules).map_err(|err| {
        debug!("amount rejected: {err}");
        err
    })?;
    validate_amount(amount, rules)
}

/// Significant digits `Decimal` can hold without losing precision.
const MAX_DECIMAL_DIGITS: i64 = 28;

/// A syntactically valid number: `[+-]digits[.digits][(e|E)[+-]digits]`.
#[derive(Debug)]
struct ScannedNumber<'a> {
    negative: bool,
    integer: &'a str,
    fraction: &'a str,
    /// Position of the decimal point, counted in digits from the start of
    /// `integer` + `fraction`. Negative or past the end after an exponent.
    point: i64,
}

impl<'a> ScannedNumber<'a> {
    fn scan(input: &'a str) -> Option<Self> {
        let (negative, unsigned) = match input.as_bytes().first()? {
            b'-' => (true, &input[1..]),
            b'+' => (false, &input[1..]),
            _ => (false, input),
        };
        let (mantissa, exponent) = match unsigned.split_once(['e', 'E']) {
            Some((mantissa, exponent)) => (mantissa, Some(exponent)),
            None => (unsigned, None),
        };
        let (integer, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if (integer.is_empty() && fraction.is_empty()) || !all_digits(integer) || !all_digits(fraction)
        {
            return None;
        }

        let exponent = match exponent {
            None => 0,
            Some(exponent) => {
                let (sign, digits) = match exponent.as_bytes().first()? {
                    b'-' => (-1, &exponent[1..]),
                    b'+' => (1, &exponent[1..]),
                    _ => (1, exponent),
                };
                if digits.is_empty() || !all_digits(digits) {
                    return None;
                }
                // anything past i32 is far outside what any rule accepts anyway
                sign * digits.parse::<i64>().unwrap_or(i64::from(i32::MAX))
            }
        };

        Some(Self {
            negative,
            integer,
            fraction,
            point: (integer.len() as i64).saturating_add(exponent),
        })
    }

    fn digit(&self, position: i64) -> u8 {
        let integer = self.integer.as_bytes();
        let fraction = self.fraction.as_bytes();
        match usize::try_from(position) {
            Ok(idx) if idx < integer.len() => integer[idx],
            Ok(idx) if idx - integer.len() < fraction.len() => fraction[idx - integer.len()],
            _ => b'0',
        }
    }

    /// Converts to `Decimal`. Numbers `Decimal` cannot represent are still
    /// numbers, so they map onto the rule they break instead of `NotANumber`.
    fn to_decimal(&self, rules: &AmountRules) -> Result<Decimal, AmountError> {
        let len = (self.integer.len() + self.fraction.len()) as i64;
        let Some(first) = (0..len).find(|&pos| self.digit(pos) != b'0') else {
            return Ok(Decimal::ZERO);
        };
        let last = (first..len)
            .rev()
            .find(|&pos| self.digit(pos) != b'0')
            .unwrap_or(first);

        let integer_places = (self.point - first).max(0);
        let fraction_places = (last + 1 - self.point).max(0);
        let unrepresentable = || {
            if self.negative {
                AmountError::NotPositive
            } else if fraction_places > i64::from(MAX_DECIMAL_PLACES) {
                AmountError::TooManyDecimals
            } else {
                AmountError::ExceedsMaximum {
                    maximum: rules.maximum,
                }
            }
        };
        if integer_places.saturating_add(fraction_places) > MAX_DECIMAL_DIGITS {
            return Err(unrepresentable());
        }

        let mut canonical = String::with_capacity((integer_places + fraction_places + 3) as usize);
        if self.negative {
            canonical.push('-');
        }
        if integer_places == 0 {
            canonical.push('0');
        }
        canonical.extend((first.min(self.point)..self.point).map(|pos| self.digit(pos) as char));
        if fraction_places > 0 {
            canonical.push('.');
            canonical.extend((self.point..=last).map(|pos| self.digit(pos) as char));
        }
        Decimal::from_str_exact(&canonical).map_err(|_| unrepresentable())
    }
}
