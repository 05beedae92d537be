//! Currency formatting utilities for Bitcoin and satoshi values
//!
//! Formatting uses integer arithmetic so chain-wide totals print exactly.

/// Satoshis per Bitcoin
pub const SATS_PER_BTC: u64 = 100_000_000;

/// Format a satoshi amount in BTC with eight decimal places
///
/// # Examples
/// ```
/// use chainstate_dump::utils::currency::format_btc;
///
/// assert_eq!(format_btc(5_000_000_000), "50.00000000");
/// assert_eq!(format_btc(5471), "0.00005471");
/// ```
pub fn format_btc(sats: u64) -> String {
    format!("{}.{:08}", sats / SATS_PER_BTC, sats % SATS_PER_BTC)
}

/// Format a satoshi amount as dual BTC + sats display
///
/// # Examples
/// ```
/// use chainstate_dump::utils::currency::format_sats_as_btc;
///
/// assert_eq!(
///     format_sats_as_btc(28125351850),
///     "281.25351850 BTC (28125351850 sats)"
/// );
/// ```
pub fn format_sats_as_btc(sats: u64) -> String {
    format!("{} BTC ({} sats)", format_btc(sats), sats)
}
