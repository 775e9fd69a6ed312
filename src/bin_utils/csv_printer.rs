use std::io::Write;

use anyhow::Context;
use csv::Writer;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    iban::Iban,
    money::{Currency, format_currency},
    payout::Payout,
};

#[derive(Debug, Serialize)]
pub struct PayoutRecord {
    pub iban: Iban,
    pub currency: Currency,
    pub amount: Decimal,
    pub amount_minor: i64,
    pub display: String,
}

impl From<Payout> for PayoutRecord {
    fn from(payout: Payout) -> Self {
        Self {
            display: format_currency(payout.amount_minor, payout.currency, true),
            iban: payout.iban,
            currency: payout.currency,
            amount: payout.amount,
            amount_minor: payout.amount_minor,
        }
    }
}

/// Writes accepted payouts as CSV. The header row is emitted with the first
/// record, so an empty batch produces no output at all.
pub fn print_payouts<W>(
    output: &mut W,
    mut payouts: impl Iterator<Item = PayoutRecord>,
) -> anyhow::Result<()>
where
    W: Write,
{
    let mut writer = Writer::from_writer(output);
    payouts
        .try_for_each(|payout| writer.serialize(payout))
        .context("Failed to write payout CSV")?;
    writer.flush().context("Failed to flush payout CSV")
}

#[cfg(test)]
mod tests {
    use std::str::{FromStr, from_utf8};

    use super::*;

    #[test]
    fn prints_header_and_display_column() {
        let record = PayoutRecord::from(Payout {
            amount: Decimal::from_str("1234.5").unwrap(),
            amount_minor: 123450,
            currency: Currency::Eur,
            iban: "FR14 2004 1010 0505 0001 3M02 606".parse().unwrap(),
        });
        let mut output = Vec::new();
        print_payouts(&mut output, std::iter::once(record)).unwrap();
        assert_eq!(
            from_utf8(&output).unwrap(),
            "iban,currency,amount,amount_minor,display\n\
             FR1420041010050500013M02606,EUR,1234.5,123450,\"€1,234.50\"\n"
        );
    }

    #[test]
    fn empty_batch_writes_nothing() {
        let mut output = Vec::new();
        print_payouts(&mut output, std::iter::empty()).unwrap();
        assert!(output.is_empty());
    }
}
