//! Forwarded call capability of the router

use crate::Config;
use codec::DecodeLimit;
use core::marker::PhantomData;
use frame::deps::frame_support::dispatch::GetDispatchInfo;
use frame::deps::sp_runtime::traits::{Dispatchable, Zero};
use frame::prelude::*;
use pallet_commission_ledger::{AssetTransfer, LedgerInterface};
use primitives::{AssetKind, Balance};

/// Nesting limit when decoding a forwarded call.
pub const MAX_CALL_DECODE_DEPTH: u32 = 64;

/// Runs the caller-supplied invocation of a routed execution.
pub trait Invoker<AccountId> {
  /// Send `value` of the native currency from `caller` to `target`, then run `data` on behalf
  /// of `caller`. Empty `data` is a bare value transfer.
  ///
  /// Returns the weight consumed by running `data`.
  fn invoke(
    caller: &AccountId,
    target: &AccountId,
    value: Balance,
    data: &[u8],
  ) -> Result<Weight, DispatchError>;
}

/// Decodes `data` as a runtime call and dispatches it from the caller's signed origin.
///
/// The call passes through the runtime's base call filter and can never act with the router's
/// own authority.
pub struct DispatchInvoker<T>(PhantomData<T>);

impl<T: Config> Invoker<T::AccountId> for DispatchInvoker<T> {
  fn invoke(
    caller: &T::AccountId,
    target: &T::AccountId,
    value: Balance,
    data: &[u8],
  ) -> Result<Weight, DispatchError> {
    if !value.is_zero() {
      T::Ledger::ensure_direct_funding_allowed(target)?;
      T::Transfer::transfer_out(caller, target, AssetKind::Native, value)?;
    }
    if data.is_empty() {
      return Ok(Weight::zero());
    }

    let call = <T as frame_system::Config>::RuntimeCall::decode_all_with_depth_limit(
      MAX_CALL_DECODE_DEPTH,
      &mut &data[..],
    )
    .map_err(|_| DispatchError::Other("undecodable forwarded call"))?;
    let call_weight = call.get_dispatch_info().call_weight;
    ensure!(
      call_weight.all_lte(T::ForwardedCallWeight::get()),
      DispatchError::Exhausted
    );
    call
      .dispatch(frame_system::RawOrigin::Signed(caller.clone()).into())
      .map(|_| call_weight)
      .map_err(|e| e.error)
  }
}
