use std::{fmt, str::FromStr};

use serde::{Serialize, Serializer};
use thiserror::Error;
use tracing::{debug, trace};

pub mod country;

pub const MIN_IBAN_LENGTH: usize = 15;
pub const MAX_IBAN_LENGTH: usize = 34;

const IBAN_CHECKSUM_MODULUS: u32 = 97;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IbanError {
    #[error("Invalid IBAN format. Must start with 2 letters followed by 2 digits")]
    InvalidFormat,
    #[error("Unknown IBAN country code `{country}`")]
    UnknownCountryCode { country: String },
    #[error("Invalid IBAN length for {country}: expected {expected} characters, got {actual}")]
    InvalidLength {
        country: String,
        expected: usize,
        actual: usize,
    },
    #[error("Invalid IBAN checksum")]
    InvalidChecksum,
}

/// Uppercases the input and strips every whitespace character, including
/// the byte order mark that pasted text sometimes carries.
pub fn normalize_iban(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{FEFF}')
        .flat_map(char::to_uppercase)
        .collect()
}

/// Checks `^[A-Z]{2}[0-9]{2}[A-Z0-9]{1,30}$` within the overall 15..=34 length bounds.
pub fn validate_iban_structure(normalized: &str) -> bool {
    let bytes = normalized.as_bytes();
    if !(MIN_IBAN_LENGTH..=MAX_IBAN_LENGTH).contains(&bytes.len()) {
        return false;
    }
    bytes[..2].iter().all(u8::is_ascii_uppercase)
        && bytes[2..4].iter().all(u8::is_ascii_digit)
        && bytes[4..]
            .iter()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

/// Compares the character count against the fixed length of the country
/// prefix. Returns false for countries that are not in the table.
pub fn validate_iban_length(normalized: &str) -> bool {
    normalized
        .get(..2)
        .and_then(country::iban_length)
        .is_some_and(|expected| normalized.chars().count() == expected)
}

/// MOD-97 check: the first four characters are moved to the end, letters are
/// expanded to two digits (A = 10 .. Z = 35) and the resulting number must
/// leave remainder 1.
pub fn validate_iban_checksum(normalized: &str) -> bool {
    let split = normalized
        .char_indices()
        .nth(4)
        .map_or(normalized.len(), |(idx, _)| idx);
    let (head, tail) = normalized.split_at(split);

    let mut remainder = 0u32;
    for c in tail.chars().chain(head.chars()) {
        let Some(value) = c.to_digit(36) else {
            return false;
        };
        let shift = if value < 10 { 10 } else { 100 };
        remainder = (remainder * shift + value) % IBAN_CHECKSUM_MODULUS;
    }
    remainder == 1
}

/// Runs normalization followed by the structure, length and checksum checks,
/// stopping at the first one that fails.
pub fn validate_iban(raw: &str) -> Result<Iban, IbanError> {
    let normalized = normalize_iban(raw);

    if !validate_iban_structure(&normalized) {
        debug!(length = normalized.len(), "IBAN rejected: invalid format");
        return Err(IbanError::InvalidFormat);
    }

    // structure guarantees two ASCII letters up front
    let country = &normalized[..2];
    if !validate_iban_length(&normalized) {
        let err = match country::iban_length(country) {
            Some(expected) => IbanError::InvalidLength {
                country: country.to_string(),
                expected,
                actual: normalized.len(),
            },
            None => IbanError::UnknownCountryCode {
                country: country.to_string(),
            },
        };
        debug!(country, "IBAN rejected: {err}");
        return Err(err);
    }

    if !validate_iban_checksum(&normalized) {
        debug!(country, "IBAN rejected: checksum mismatch");
        return Err(IbanError::InvalidChecksum);
    }

    trace!(country, "IBAN accepted");
    Ok(Iban(normalized))
}

/// A normalized IBAN that passed every check.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Iban(String);

impl Iban {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn country_code(&self) -> &str {
        &self.0[..2]
    }

    pub fn check_digits(&self) -> &str {
        &self.0[2..4]
    }

    /// Basic Bank Account Number, everything after the check digits.
    pub fn bban(&self) -> &str {
        &self.0[4..]
    }

    /// Space separated groups of four, the way IBANs are printed on paper.
    pub fn print_format(&self) -> String {
        self.0
            .as_bytes()
            .chunks(4)
            .map(|chunk| String::from_utf8_lossy(chunk))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Iban {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Iban {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Iban {
    type Err = IbanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate_iban(s)
    }
}

impl TryFrom<&str> for Iban {
    type Error = IbanError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        validate_iban(value)
    }
}

impl Serialize for Iban {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}
