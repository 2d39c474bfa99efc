//! Ecosystem Constants for the commission pallets
//!
//! Pallet identifiers for the escrow accounts and the default limits shared by runtime and
//! test configurations.

/// Balance type alias for consistency across ecosystem
pub type Balance = u128;

/// Pallet identifiers for deriving pallet-owned accounts.
///
/// These IDs are used by Polkadot SDK's `PalletId::into_account_truncating()`
/// to deterministically generate the accounts that hold escrowed funds.
pub mod pallet_ids {
  /// Commission ledger custody account (withdrawable balances)
  pub const COMMISSION_LEDGER_PALLET_ID: &[u8; 8] = b"py/cmled";

  /// Batch commission escrow account (staged batches)
  pub const BATCH_COMMISSION_PALLET_ID: &[u8; 8] = b"py/bcomm";

  /// Commission router account (in-flight commissions, always drained)
  pub const COMMISSION_ROUTER_PALLET_ID: &[u8; 8] = b"py/cmrtr";
}

/// Default limits for the commission pallets.
pub mod params {
  use super::Balance;

  /// One whole unit of any asset (10^12).
  pub const PRECISION: Balance = 1_000_000_000_000;

  /// Maximum number of entries in a single staged batch.
  pub const MAX_BATCH_ENTRIES: u32 = 64;

  /// Maximum length in bytes of a caller-chosen batch key.
  pub const MAX_BATCH_KEY_LENGTH: u32 = 64;

  /// Maximum number of commission receivers in a single routed execution.
  pub const MAX_RECEIVERS: u32 = 32;

  /// Maximum size in bytes of an encoded forwarded call.
  pub const MAX_CALL_DATA_LENGTH: u32 = 4096;
}
