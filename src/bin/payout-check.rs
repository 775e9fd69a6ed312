use std::{fs::File, str::FromStr};

use anyhow::{Context, Result};
use payout_core::{
    bin_utils::{PayoutRowError, Service},
    money::amount::AmountRules,
};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let filename = args
        .next()
        .context("Expected a file name as the first argument")?;
    let rules = match (args.next().as_deref(), args.next()) {
        (None, _) => AmountRules::default(),
        (Some("--max"), Some(max)) => AmountRules::with_maximum(
            Decimal::from_str(&max).with_context(|| format!("Invalid `--max` value `{max}`"))?,
        ),
        (Some("--max"), None) => anyhow::bail!("Missing value for `--max`"),
        (Some(other), _) => anyhow::bail!("Unexpected argument `{other}`, expected `--max <amount>`"),
    };
    let file = File::open(&filename).with_context(|| format!("Failed to open `{filename}`"))?;

    let service = Service {
        input: file,
        output: &mut std::io::stdout(),
        rules,
        error_printer: Box::new(|line, err| match err {
            PayoutRowError::Csv(err) => eprintln!("Error at line {line}: {err}"),
            PayoutRowError::Invalid(errors) => {
                for (field, err) in errors.iter() {
                    eprintln!("Error at line {line}: {field}: {err}")
                }
            }
        }),
    };
    service.run()
}
