use alloc::collections::BTreeMap;
use frame::deps::sp_runtime::ArithmeticError;
use frame::prelude::*;
pub use primitives::{AssetKind, Balance};

/// One payment obligation: `amount` of `asset` owed to `holder`.
#[derive(
  Clone, Debug, Decode, DecodeWithMemTracking, Encode, Eq, MaxEncodedLen, PartialEq, TypeInfo,
)]
pub struct CommissionEntry<AccountId> {
  pub holder: AccountId,
  pub asset: AssetKind,
  pub amount: Balance,
}

impl<AccountId> CommissionEntry<AccountId> {
  pub fn new(holder: AccountId, asset: AssetKind, amount: Balance) -> Self {
    Self {
      holder,
      asset,
      amount,
    }
  }
}

/// Per-asset sums over a list of commission entries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssetTotals {
  /// Sum of all native-currency amounts
  pub native: Balance,
  /// Sum per distinct token, in asset order
  pub tokens: BTreeMap<AssetKind, Balance>,
}

impl AssetTotals {
  pub fn tally<'a, AccountId: 'a>(
    entries: impl IntoIterator<Item = &'a CommissionEntry<AccountId>>,
  ) -> Result<Self, ArithmeticError> {
    let mut totals = Self::default();
    for entry in entries {
      let slot = match entry.asset {
        AssetKind::Native => &mut totals.native,
        token => totals.tokens.entry(token).or_default(),
      };
      *slot = slot
        .checked_add(entry.amount)
        .ok_or(ArithmeticError::Overflow)?;
    }
    Ok(totals)
  }
}

/// Ledger operations available to other pallets.
pub trait LedgerInterface<AccountId> {
  /// Account holding the backing funds of every recorded balance.
  fn custody_account() -> AccountId;

  /// Move `amount` of `asset` already held by `source` into custody and credit it to `holder`.
  fn credit_from(
    source: &AccountId,
    holder: &AccountId,
    asset: AssetKind,
    amount: Balance,
  ) -> DispatchResult;

  /// Move what `source` holds for `entries` into custody and credit every entry to its holder.
  ///
  /// Funds move once per asset, so a pooled `source` never passes through a dust remainder.
  fn credit_all(source: &AccountId, entries: &[CommissionEntry<AccountId>]) -> DispatchResult;

  fn balance_of(holder: &AccountId, asset: AssetKind) -> Balance;

  /// Fails when `dest` is the custody account or a registered escrow account.
  fn ensure_direct_funding_allowed(dest: &AccountId) -> DispatchResult;
}
