//! Commission Router Pallet
//!
//! Executes a caller-supplied invocation and settles commissions to many receivers in one
//! atomic operation. Commissions are credited into the commission ledger first. The native
//! value left after commissions is forwarded to the target, together with an optional runtime
//! call dispatched on behalf of the caller.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub use pallet::*;

pub mod invoker;
pub use invoker::{DispatchInvoker, Invoker};

#[cfg(test)]
pub mod mock;

#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

pub mod weights;
pub use weights::WeightInfo;

pub const LOG_TARGET: &str = "runtime::commission-router";

#[frame::pallet]
pub mod pallet {
  use super::{Invoker, LOG_TARGET, WeightInfo};
  use frame::deps::sp_runtime::traits::{AccountIdConversion, TrailingZeroInput, Zero};
  use frame::prelude::*;
  use pallet_commission_ledger::{AssetTotals, AssetTransfer, CommissionEntry, LedgerInterface};
  use primitives::{AssetKind, Balance};

  /// Commission receivers of one execution
  pub type ReceiversOf<T> = BoundedVec<
    CommissionEntry<<T as frame_system::Config>::AccountId>,
    <T as Config>::MaxReceivers,
  >;

  /// Encoded call forwarded to the target
  pub type CallDataOf<T> = BoundedVec<u8, <T as Config>::MaxCallDataLength>;

  const STORAGE_VERSION: StorageVersion = StorageVersion::new(1);

  #[pallet::pallet]
  #[pallet::storage_version(STORAGE_VERSION)]
  pub struct Pallet<T>(PhantomData<T>);

  #[pallet::config]
  pub trait Config: frame_system::Config<RuntimeEvent: From<Event<Self>>> {
    /// Native and token transfers through the router account
    type Transfer: AssetTransfer<Self::AccountId>;

    /// Ledger crediting the receivers
    type Ledger: LedgerInterface<Self::AccountId>;

    /// Runs the forwarded value transfer and call
    type Invoker: Invoker<Self::AccountId>;

    /// Pallet ID for the router account
    #[pallet::constant]
    type PalletId: Get<PalletId>;

    /// Maximum commission receivers per execution
    #[pallet::constant]
    type MaxReceivers: Get<u32> + 'static;

    /// Maximum encoded length of a forwarded call
    #[pallet::constant]
    type MaxCallDataLength: Get<u32> + 'static;

    /// Upper bound on the weight of a forwarded call
    #[pallet::constant]
    type ForwardedCallWeight: Get<Weight>;

    /// Weight information for extrinsics
    type WeightInfo: WeightInfo;

    /// Helper for benchmarking
    #[cfg(feature = "runtime-benchmarks")]
    type BenchmarkHelper: pallet_commission_ledger::BenchmarkHelper<Self::AccountId>;
  }

  #[pallet::event]
  #[pallet::generate_deposit(pub(super) fn deposit_event)]
  pub enum Event<T: Config> {
    /// Commissions were credited and the invocation succeeded
    Executed {
      caller: T::AccountId,
      target: T::AccountId,
      forwarded: Balance,
      commissions: u32,
    },
  }

  #[pallet::error]
  pub enum Error<T> {
    /// Target is the null account
    InvalidAddress,
    /// Receiver amount must be greater than zero
    InvalidAmount,
    /// Supplied native value is below the native commission total
    InsufficientNativeSent,
    /// Caller holds less of a token than the receivers require
    InsufficientTokenBalance,
    /// Caller approved less of a token to the router account than the receivers require
    InsufficientAllowance,
    /// The forwarded transfer or call failed
    ForwardedCallFailed,
  }

  #[pallet::call]
  impl<T: Config> Pallet<T> {
    /// Credit `receivers` in the ledger, then forward what remains of `native_value` to
    /// `target` along with `call_data`.
    ///
    /// Either every commission is credited and the invocation succeeds, or nothing happens.
    /// The unused part of the forwarded call weight bound is refunded.
    #[pallet::call_index(0)]
    #[pallet::weight(
      T::WeightInfo::execute(receivers.len() as u32)
        .saturating_add(T::ForwardedCallWeight::get())
    )]
    pub fn execute(
      origin: OriginFor<T>,
      call_data: CallDataOf<T>,
      target: T::AccountId,
      receivers: ReceiversOf<T>,
      native_value: Balance,
    ) -> DispatchResultWithPostInfo {
      let caller = ensure_signed(origin)?;
      let forwarded_weight =
        Self::do_execute(&caller, &call_data, &target, &receivers, native_value)?;
      Ok(Some(Self::actual_weight(receivers.len() as u32, forwarded_weight)).into())
    }
  }

  impl<T: Config> Pallet<T> {
    pub fn account_id() -> T::AccountId {
      T::PalletId::get().into_account_truncating()
    }

    /// Whether `who` is the all-zero account, which is never a valid target.
    pub fn is_null_account(who: &T::AccountId) -> bool {
      T::AccountId::decode(&mut TrailingZeroInput::zeroes()).is_ok_and(|null| null == *who)
    }

    /// Weight charged for an execution with `receivers` commissions whose forwarded call
    /// consumed `forwarded_weight`.
    pub fn actual_weight(receivers: u32, forwarded_weight: Weight) -> Weight {
      T::WeightInfo::execute(receivers).saturating_add(forwarded_weight)
    }

    /// Returns the weight consumed by the forwarded call.
    pub(crate) fn do_execute(
      caller: &T::AccountId,
      call_data: &[u8],
      target: &T::AccountId,
      receivers: &[CommissionEntry<T::AccountId>],
      native_value: Balance,
    ) -> Result<Weight, DispatchError> {
      ensure!(!Self::is_null_account(target), Error::<T>::InvalidAddress);
      ensure!(
        receivers.iter().all(|entry| !entry.amount.is_zero()),
        Error::<T>::InvalidAmount
      );
      let totals = AssetTotals::tally(receivers)?;
      let forwarded = native_value
        .checked_sub(totals.native)
        .ok_or(Error::<T>::InsufficientNativeSent)?;

      let router = Self::account_id();
      for (&asset, &total) in totals.tokens.iter() {
        ensure!(
          T::Transfer::balance(caller, asset) >= total,
          Error::<T>::InsufficientTokenBalance
        );
        ensure!(
          T::Transfer::allowance(caller, &router, asset) >= total,
          Error::<T>::InsufficientAllowance
        );
      }

      if !totals.native.is_zero() {
        T::Transfer::transfer_in(caller, &router, AssetKind::Native, totals.native)?;
      }
      for (&asset, &total) in totals.tokens.iter() {
        T::Transfer::transfer_in(caller, &router, asset, total)?;
      }
      T::Ledger::credit_all(&router, receivers)?;

      let forwarded_weight =
        T::Invoker::invoke(caller, target, forwarded, call_data).map_err(|e| {
          log::warn!(target: LOG_TARGET, "forwarded call from {caller:?} to {target:?} failed: {e:?}");
          Error::<T>::ForwardedCallFailed
        })?;

      log::debug!(
        target: LOG_TARGET,
        "{caller:?} executed against {target:?} with {} commissions",
        receivers.len()
      );
      Self::deposit_event(Event::Executed {
        caller: caller.clone(),
        target: target.clone(),
        forwarded,
        commissions: receivers.len() as u32,
      });
      Ok(forwarded_weight)
    }
  }

  /// Genesis configuration, endows the router account with the existential deposit
  #[pallet::genesis_config]
  #[derive(frame::prelude::DefaultNoBound)]
  pub struct GenesisConfig<T: Config> {
    #[serde(skip)]
    pub _marker: core::marker::PhantomData<T>,
  }

  #[pallet::genesis_build]
  impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
    fn build(&self) {
      let router = Pallet::<T>::account_id();
      if let Err(e) = T::Transfer::endow(&router) {
        log::error!(target: LOG_TARGET, "failed to endow router account {router:?}: {e:?}");
      }
    }
  }
}
