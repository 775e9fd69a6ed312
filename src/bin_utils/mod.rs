//! Bootstraps the payout validation core for the `payout-check` binary.
//! Kept in the library so the integration tests can drive it directly.

use std::io::{Read, Write};

use anyhow::Result;
use thiserror::Error;
use tracing::info;

use crate::{money::amount::AmountRules, payout::PayoutFormErrors};
use csv_parser::CsvPayoutParser;
use csv_printer::{PayoutRecord, print_payouts};
pub mod csv_parser;
pub mod csv_printer;

#[derive(Debug, Error)]
pub enum PayoutRowError {
    #[error("Malformed row: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Invalid(#[from] PayoutFormErrors),
}

pub struct Service<'w, R, W: 'w> {
    pub input: R,
    pub output: &'w mut W,
    pub rules: AmountRules,
    pub error_printer: Box<dyn FnMut(u64, PayoutRowError)>,
}

impl<'w, R, W> Service<'w, R, W>
where
    R: Read,
    W: Write + 'w,
{
    /// Validates every row, writing accepted payouts to `output` and handing
    /// rejected rows to `error_printer`. A bad row never stops the batch.
    pub fn run(self) -> Result<()> {
        let Service {
            input,
            output,
            rules,
            mut error_printer,
        } = self;

        let mut accepted = 0usize;
        let mut rejected = 0usize;
        let payouts = CsvPayoutParser::new(input).filter_map(|(line, row)| {
            let checked = row
                .map_err(PayoutRowError::from)
                .and_then(|form| form.validate(&rules).map_err(PayoutRowError::from));
            match checked {
                Ok(payout) => {
                    accepted += 1;
                    Some(PayoutRecord::from(payout))
                }
                Err(err) => {
                    rejected += 1;
                    error_printer(line, err);
                    None
                }
            }
        });

        print_payouts(output, payouts)?;
        info!(accepted, rejected, "payout batch checked");
        Ok(())
    }
}
