/// IBAN normalization plus structure, per-country length and MOD-97 checks.
pub mod iban;

/// Conversion between pence/cents and pounds/euros, currency display
/// formatting and amount input rules.
pub mod money;

/// Payout form validation. Composes [`iban`] and [`money`] into one
/// result per submitted form.
pub mod payout;

/// CSV batch checking used by the `payout-check` binary. Lives here rather
/// than in the binary so integration tests can run it.
pub mod bin_utils;
