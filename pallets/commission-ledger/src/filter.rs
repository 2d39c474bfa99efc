//! Base call filter rejecting plain native transfers into commission accounts

use crate::{Config, Pallet};
use core::marker::PhantomData;
use frame::deps::frame_support::traits::{Contains, IsSubType};
use frame::deps::sp_runtime::traits::StaticLookup;
use polkadot_sdk::pallet_balances;

/// Rejects `pallet_balances` transfers whose destination is the custody account or a
/// registered escrow account.
///
/// Use it as the runtime's `BaseCallFilter`, or combine it with other filters:
///
/// ```ignore
/// impl frame_system::Config for Runtime {
///   type BaseCallFilter = pallet_commission_ledger::DirectFundingFilter<Runtime>;
///   // ...
/// }
/// ```
pub struct DirectFundingFilter<T, I = ()>(PhantomData<(T, I)>);

impl<T, I, Call> Contains<Call> for DirectFundingFilter<T, I>
where
  T: Config + pallet_balances::Config<I>,
  I: 'static,
  Call: IsSubType<pallet_balances::Call<T, I>>,
{
  fn contains(call: &Call) -> bool {
    let dest = match call.is_sub_type() {
      Some(
        pallet_balances::Call::transfer_allow_death { dest, .. }
        | pallet_balances::Call::transfer_keep_alive { dest, .. }
        | pallet_balances::Call::transfer_all { dest, .. },
      ) => dest,
      _ => return true,
    };
    T::Lookup::lookup(dest.clone())
      .map_or(true, |who| Pallet::<T>::ensure_direct_funding_allowed(&who).is_ok())
  }
}
