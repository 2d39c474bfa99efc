//! Transfer collaborator for the commission pallets
//!
//! The ledger, the batch stager and the router never touch pallet-balances or pallet-assets
//! directly. All value movement goes through [`AssetTransfer`], which models direct value
//! movement for the native currency and an approve-then-transfer model for tokens.
//!
//! Pallet accounts pool the funds of many parties. A payout never leaves such an account with
//! a non-zero remainder below the minimum balance, since the asset pallets would sweep that
//! remainder as dust.

use core::marker::PhantomData;
use frame::deps::frame_support::traits::{
  fungible::{Inspect as NativeInspect, Mutate as NativeMutate},
  fungibles::{
    Inspect as FungiblesInspect, Mutate as FungiblesMutate,
    approvals::{Inspect as ApprovalInspect, Mutate as ApprovalMutate},
  },
  tokens::Preservation,
};
use frame::prelude::*;
use primitives::{AssetInspector, AssetKind, Balance};

/// Asset movements and queries used by the commission pallets.
pub trait AssetTransfer<AccountId> {
  /// Spendable balance of `who` in `asset`.
  fn balance(who: &AccountId, asset: AssetKind) -> Balance;

  /// Amount of `asset` that `spender` may pull from `owner`.
  ///
  /// The native currency has no allowance concept and reports zero.
  fn allowance(owner: &AccountId, spender: &AccountId, asset: AssetKind) -> Balance;

  /// Whether `asset` resolves to an existing token.
  fn is_token(asset: AssetKind) -> bool;

  /// Pull `amount` of `asset` from `owner` into `spender`.
  ///
  /// Native value moves directly while keeping `owner` alive. Tokens are pulled under the
  /// allowance `owner` granted to `spender`.
  fn transfer_in(
    owner: &AccountId,
    spender: &AccountId,
    asset: AssetKind,
    amount: Balance,
  ) -> DispatchResult;

  /// Send `amount` of `asset` held by `from` to `to`.
  ///
  /// `from` is drained only when `amount` is its whole balance. Otherwise the transfer fails
  /// rather than leave less than the minimum balance behind.
  fn transfer_out(from: &AccountId, to: &AccountId, asset: AssetKind, amount: Balance)
  -> DispatchResult;

  /// Top up the native balance of `who` to the existential deposit.
  fn endow(who: &AccountId) -> DispatchResult;
}

/// Preservation for sending `amount` out of an account holding `balance`.
pub fn payout_preservation(balance: Balance, amount: Balance) -> Preservation {
  if amount >= balance {
    Preservation::Expendable
  } else {
    Preservation::Preserve
  }
}

/// `AssetTransfer` backed by a `fungible` native currency and `fungibles` tokens with approvals.
pub struct NativeAndAssets<Currency, Assets>(PhantomData<(Currency, Assets)>);

impl<AccountId, Currency, Assets> AssetTransfer<AccountId> for NativeAndAssets<Currency, Assets>
where
  AccountId: Eq,
  Currency: NativeInspect<AccountId, Balance = Balance> + NativeMutate<AccountId>,
  Assets: FungiblesInspect<AccountId, AssetId = u32, Balance = Balance>
    + FungiblesMutate<AccountId>
    + ApprovalInspect<AccountId>
    + ApprovalMutate<AccountId>,
{
  fn balance(who: &AccountId, asset: AssetKind) -> Balance {
    match asset.token_id() {
      None => Currency::balance(who),
      Some(id) => Assets::balance(id, who),
    }
  }

  fn allowance(owner: &AccountId, spender: &AccountId, asset: AssetKind) -> Balance {
    match asset.token_id() {
      None => 0,
      Some(id) => Assets::allowance(id, owner, spender),
    }
  }

  fn is_token(asset: AssetKind) -> bool {
    asset.token_id().is_some_and(|id| Assets::asset_exists(id))
  }

  fn transfer_in(
    owner: &AccountId,
    spender: &AccountId,
    asset: AssetKind,
    amount: Balance,
  ) -> DispatchResult {
    match asset.token_id() {
      None => {
        Currency::transfer(owner, spender, amount, Preservation::Preserve)?;
      }
      Some(id) => {
        Assets::transfer_from(id, owner, spender, spender, amount)?;
      }
    }
    Ok(())
  }

  fn transfer_out(
    from: &AccountId,
    to: &AccountId,
    asset: AssetKind,
    amount: Balance,
  ) -> DispatchResult {
    let held = <Self as AssetTransfer<AccountId>>::balance(from, asset);
    let preservation = payout_preservation(held, amount);
    match asset.token_id() {
      None => {
        Currency::transfer(from, to, amount, preservation)?;
      }
      Some(id) => {
        Assets::transfer(id, from, to, amount, preservation)?;
      }
    }
    Ok(())
  }

  fn endow(who: &AccountId) -> DispatchResult {
    let shortfall = Currency::minimum_balance().saturating_sub(Currency::balance(who));
    if shortfall > 0 {
      Currency::mint_into(who, shortfall)?;
    }
    Ok(())
  }
}
