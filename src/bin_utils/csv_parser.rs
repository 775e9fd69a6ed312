use std::io::Read;

use csv::{DeserializeRecordsIntoIter, Trim};

use crate::payout::PayoutForm;

/// Parses payout requests in CSV format, one [`PayoutForm`] per row
/// (`amount,currency,iban`). Missing trailing columns read as empty fields.
pub struct CsvPayoutParser<R> {
    iter: DeserializeRecordsIntoIter<R, PayoutForm>,
}

impl<R> CsvPayoutParser<R>
where
    R: Read,
{
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(source);

        Self {
            iter: reader.into_deserialize(),
        }
    }
}

impl<R> Iterator for CsvPayoutParser<R>
where
    R: Read,
{
    type Item = (u64, csv::Result<PayoutForm>);

    fn next(&mut self) -> Option<Self::Item> {
        let curr_line = self.iter.reader().position().line();
        self.iter.next().map(|row| (curr_line, row))
    }
}
