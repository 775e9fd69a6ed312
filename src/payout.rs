use std::fmt;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    iban::{Iban, IbanError, validate_iban},
    money::{
        Currency, CurrencyError, DenominationError,
        amount::{AmountError, AmountRules, parse_amount_input},
        to_lowest_denomination,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayoutField {
    Amount,
    Currency,
    Iban,
}

impl fmt::Display for PayoutField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PayoutField::Amount => "amount",
            PayoutField::Currency => "currency",
            PayoutField::Iban => "iban",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayoutFieldError {
    #[error(transparent)]
    Amount(#[from] AmountError),
    #[error(transparent)]
    Currency(#[from] CurrencyError),
    #[error(transparent)]
    Iban(#[from] IbanError),
    #[error(transparent)]
    Denomination(#[from] DenominationError),
}

/// Raw payout form input, exactly as typed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PayoutForm {
    pub amount: String,
    pub currency: String,
    pub iban: String,
}

/// A payout that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payout {
    pub amount: Decimal,
    pub amount_minor: i64,
    pub currency: Currency,
    pub iban: Iban,
}

/// First error per field. Fields that validated are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayoutFormErrors {
    pub amount: Option<PayoutFieldError>,
    pub currency: Option<PayoutFieldError>,
    pub iban: Option<PayoutFieldError>,
}

impl PayoutFormErrors {
    pub fn get(&self, field: PayoutField) -> Option<&PayoutFieldError> {
        match field {
            PayoutField::Amount => self.amount.as_ref(),
            PayoutField::Currency => self.currency.as_ref(),
            PayoutField::Iban => self.iban.as_ref(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (PayoutField, &PayoutFieldError)> {
        [PayoutField::Amount, PayoutField::Currency, PayoutField::Iban]
            .into_iter()
            .filter_map(|field| self.get(field).map(|err| (field, err)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

impl fmt::Display for PayoutFormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, (field, err)) in self.iter().enumerate() {
            if idx > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for PayoutFormErrors {}

/// Validates a single form field, the way an input does on every keystroke.
pub fn validate_payout_field(
    field: PayoutField,
    value: &str,
    rules: &AmountRules,
) -> Result<(), PayoutFieldError> {
    match field {
        PayoutField::Amount => parse_amount_input(value, rules).map(|_| ())?,
        PayoutField::Currency => value.parse::<Currency>().map(|_| ())?,
        PayoutField::Iban => validate_iban(value).map(|_| ())?,
    }
    Ok(())
}

impl PayoutForm {
    /// Validates every field and collects one error per field.
    pub fn validate(&self, rules: &AmountRules) -> Result<Payout, PayoutFormErrors> {
        let amount = parse_amount_input(&self.amount, rules)
            .map_err(PayoutFieldError::from)
            .and_then(|amount| Ok((amount, to_lowest_denomination(amount)?)));
        let currency = self
            .currency
            .parse::<Currency>()
            .map_err(PayoutFieldError::from);
        let iban = validate_iban(&self.iban).map_err(PayoutFieldError::from);

        match (amount, currency, iban) {
            (Ok((amount, amount_minor)), Ok(currency), Ok(iban)) => {
                trace!(%currency, country = iban.country_code(), "payout form accepted");
                Ok(Payout {
                    amount,
                    amount_minor,
                    currency,
                    iban,
                })
            }
            (amount, currency, iban) => {
                let errors = PayoutFormErrors {
                    amount: amount.err(),
                    currency: currency.err(),
                    iban: iban.err(),
                };
                debug!("payout form rejected: {errors}");
                Err(errors)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn form(amount: &str, currency: &str, iban: &str) -> PayoutForm {
        PayoutForm {
            amount: amount.to_string(),
            currency: currency.to_string(),
            iban: iban.to_string(),
        }
    }

    #[test]
    fn valid_form() {
        let payout = form("1234.5", "GBP", "gb82 west 1234 5698 7654 32")
            .validate(&AmountRules::default())
            .unwrap();
        assert_eq!(payout.amount, Decimal::from_str("1234.5").unwrap());
        assert_eq!(payout.amount_minor, 123450);
        assert_eq!(payout.currency, Currency::Gbp);
        assert_eq!(payout.iban.as_str(), "GB82WEST12345698765432");
    }

    #[test]
    fn collects_one_error_per_field() {
        let errors = form("", "USD", "GB00WEST12345698765432")
            .validate(&AmountRules::default())
            .unwrap_err();
        assert_eq!(
            errors.amount,
            Some(PayoutFieldError::Amount(AmountError::Required))
        );
        assert!(matches!(
            errors.currency,
            Some(PayoutFieldError::Currency(CurrencyError::Unsupported(_)))
        ));
        assert_eq!(
            errors.iban,
            Some(PayoutFieldError::Iban(IbanError::InvalidChecksum))
        );
        assert_eq!(
            errors.to_string(),
            "amount: Amount is required; currency: Please select a valid currency; iban: Invalid IBAN checksum"
        );
    }

    #[test]
    fn only_failing_fields_are_reported() {
        let errors = form("10.999", "EUR", "FR1420041010050500013M02606")
            .validate(&AmountRules::default())
            .unwrap_err();
        assert!(!errors.is_empty());
        assert_eq!(
            errors.get(PayoutField::Amount),
            Some(&PayoutFieldError::Amount(AmountError::TooManyDecimals))
        );
        assert_eq!(errors.get(PayoutField::Currency), None);
        assert_eq!(errors.get(PayoutField::Iban), None);
        assert_eq!(errors.iter().count(), 1);
    }

    #[test]
    fn single_field_validation() {
        let rules = AmountRules::default();
        assert!(validate_payout_field(PayoutField::Amount, "99.99", &rules).is_ok());
        assert_eq!(
            validate_payout_field(PayoutField::Amount, "-1", &rules),
            Err(PayoutFieldError::Amount(AmountError::NotPositive))
        );
        assert!(validate_payout_field(PayoutField::Currency, "EUR", &rules).is_ok());
        assert!(validate_payout_field(PayoutField::Currency, "JPY", &rules).is_err());
        assert!(validate_payout_field(PayoutField::Iban, "NO93 8601 1117 947", &rules).is_ok());
        assert_eq!(
            validate_payout_field(PayoutField::Iban, "XX82WEST12345698765432", &rules),
            Err(PayoutFieldError::Iban(IbanError::UnknownCountryCode {
                country: "XX".to_string()
            }))
        );
    }

    #[test]
    fn field_names() {
        assert_eq!(PayoutField::Amount.to_string(), "amount");
        assert_eq!(PayoutField::Iban.to_string(), "iban");
    }
}
