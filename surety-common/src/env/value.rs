/// Monetary values are carried in the smallest unit (wei).
pub type Amount = u128;

/// One ether expressed in wei.
pub const ETHER: Amount = 1_000_000_000_000_000_000;
