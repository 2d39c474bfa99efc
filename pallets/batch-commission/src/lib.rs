//! Batch Commission Pallet
//!
//! Stages keyed batches of commission entries in escrow. A batch is later distributed into
//! the commission ledger or refunded to its depositor. Behavior is selected by the active
//! [`Revision`]; all revisions share one storage layout.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub use pallet::*;

pub mod revision;
pub use revision::{CommissionBehavior, Revision, V1, V2};

#[cfg(test)]
pub mod mock;

#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

pub mod weights;
pub use weights::WeightInfo;

pub const LOG_TARGET: &str = "runtime::batch-commission";

#[frame::pallet]
pub mod pallet {
  use super::{LOG_TARGET, Revision, WeightInfo};
  use frame::deps::frame_support::storage::with_storage_layer;
  use frame::deps::sp_runtime::traits::{AccountIdConversion, Zero};
  use frame::prelude::*;
  use pallet_commission_ledger::{AssetTotals, AssetTransfer, CommissionEntry, LedgerInterface};
  use primitives::{AssetKind, Balance};

  /// Caller-chosen batch key
  pub type BatchKeyOf<T> = BoundedVec<u8, <T as Config>::MaxKeyLength>;

  /// Ordered entries of one staged batch
  pub type CommissionBatchOf<T> = BoundedVec<
    CommissionEntry<<T as frame_system::Config>::AccountId>,
    <T as Config>::MaxEntries,
  >;

  const STORAGE_VERSION: StorageVersion = StorageVersion::new(1);

  #[pallet::pallet]
  #[pallet::storage_version(STORAGE_VERSION)]
  pub struct Pallet<T>(PhantomData<T>);

  #[pallet::config]
  pub trait Config: frame_system::Config<RuntimeEvent: From<Event<Self>>> {
    /// Native and token transfers in and out of the escrow account
    type Transfer: AssetTransfer<Self::AccountId>;

    /// Ledger receiving distributed batches
    type Ledger: LedgerInterface<Self::AccountId>;

    /// Pallet ID for the escrow account
    #[pallet::constant]
    type PalletId: Get<PalletId>;

    /// Maximum entries in one batch
    #[pallet::constant]
    type MaxEntries: Get<u32> + 'static;

    /// Maximum key length in bytes
    #[pallet::constant]
    type MaxKeyLength: Get<u32> + 'static;

    /// Origin allowed to switch the active revision
    type AdminOrigin: EnsureOrigin<Self::RuntimeOrigin>;

    /// Weight information for extrinsics
    type WeightInfo: WeightInfo;

    /// Helper for benchmarking
    #[cfg(feature = "runtime-benchmarks")]
    type BenchmarkHelper: pallet_commission_ledger::BenchmarkHelper<Self::AccountId>;
  }

  /// Staged batches per (depositor, key)
  #[pallet::storage]
  pub type Commissions<T: Config> = StorageDoubleMap<
    _,
    Blake2_128Concat,
    T::AccountId,
    Blake2_128Concat,
    BatchKeyOf<T>,
    CommissionBatchOf<T>,
    OptionQuery,
  >;

  /// Behavior applied to `Commissions`
  #[pallet::storage]
  pub type ActiveRevision<T: Config> = StorageValue<_, Revision, ValueQuery>;

  #[pallet::event]
  #[pallet::generate_deposit(pub(super) fn deposit_event)]
  pub enum Event<T: Config> {
    /// A funded batch was installed
    CommissionDeposited {
      depositor: T::AccountId,
      key: BatchKeyOf<T>,
      entries: u32,
    },
    /// An existing batch was refunded to make room for a new deposit under the same key
    CommissionReplaced {
      depositor: T::AccountId,
      key: BatchKeyOf<T>,
      refunded: u32,
    },
    /// A batch was moved into the ledger
    CommissionDistributed {
      depositor: T::AccountId,
      key: BatchKeyOf<T>,
      entries: u32,
    },
    /// A batch was refunded to its depositor, `refunded` is zero when no batch existed
    CommissionReturned {
      depositor: T::AccountId,
      key: BatchKeyOf<T>,
      refunded: u32,
    },
    /// Funded entries were appended to a batch
    CommissionAppended {
      depositor: T::AccountId,
      key: BatchKeyOf<T>,
      entries: u32,
    },
    /// The active revision changed
    RevisionChanged { from: Revision, to: Revision },
  }

  #[pallet::error]
  pub enum Error<T> {
    /// No entries were supplied, or the batch is missing or empty
    EmptyInput,
    /// Entry amount must be greater than zero
    InvalidAmount,
    /// Supplied native value does not equal the native total of the entries
    InsufficientNativeSent,
    /// Depositor holds less of a token than the entries require
    InsufficientTokenBalance,
    /// Depositor approved less of a token to the escrow account than the entries require
    InsufficientAllowance,
    /// Batch would exceed the maximum number of entries
    TooManyEntries,
    /// Operation is not available in the active revision
    UnsupportedByRevision,
  }

  #[pallet::hooks]
  impl<T: Config> Hooks<BlockNumberFor<T>> for Pallet<T> {
    #[cfg(feature = "try-runtime")]
    fn try_state(_n: BlockNumberFor<T>) -> Result<(), frame::deps::sp_runtime::TryRuntimeError> {
      Self::do_try_state()
    }
  }

  #[pallet::call]
  impl<T: Config> Pallet<T> {
    /// Stage `entries` under `key`, funded by the caller.
    ///
    /// An existing batch under the same key is refunded to the caller first.
    #[pallet::call_index(0)]
    #[pallet::weight(T::WeightInfo::deposit_commission(entries.len() as u32))]
    pub fn deposit_commission(
      origin: OriginFor<T>,
      key: BatchKeyOf<T>,
      entries: CommissionBatchOf<T>,
      native_value: Balance,
    ) -> DispatchResult {
      let depositor = ensure_signed(origin)?;
      ActiveRevision::<T>::get().deposit::<T>(&depositor, &key, entries, native_value)
    }

    /// Move the batch staged by `depositor` under `key` into the ledger.
    #[pallet::call_index(1)]
    #[pallet::weight(T::WeightInfo::distribute_commission(T::MaxEntries::get()))]
    pub fn distribute_commission(
      origin: OriginFor<T>,
      depositor: T::AccountId,
      key: BatchKeyOf<T>,
    ) -> DispatchResult {
      ensure_signed(origin)?;
      ActiveRevision::<T>::get().distribute::<T>(&depositor, &key)
    }

    /// Refund the caller's batch under `key`. Succeeds when no batch exists.
    #[pallet::call_index(2)]
    #[pallet::weight(T::WeightInfo::destroy_and_return_commission(T::MaxEntries::get()))]
    pub fn destroy_and_return_commission(origin: OriginFor<T>, key: BatchKeyOf<T>) -> DispatchResult {
      let depositor = ensure_signed(origin)?;
      ActiveRevision::<T>::get().destroy_and_return::<T>(&depositor, &key)
    }

    /// Append funded entries to the caller's batch under `key` without refunding it.
    #[pallet::call_index(3)]
    #[pallet::weight(T::WeightInfo::append_commission(entries.len() as u32))]
    pub fn append_commission(
      origin: OriginFor<T>,
      key: BatchKeyOf<T>,
      entries: CommissionBatchOf<T>,
      native_value: Balance,
    ) -> DispatchResult {
      let depositor = ensure_signed(origin)?;
      ActiveRevision::<T>::get().append::<T>(&depositor, &key, entries, native_value)
    }

    /// Switch the behavior applied to staged batches.
    #[pallet::call_index(4)]
    #[pallet::weight(T::WeightInfo::set_revision())]
    pub fn set_revision(origin: OriginFor<T>, revision: Revision) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      let from = ActiveRevision::<T>::get();
      ActiveRevision::<T>::put(revision);
      Self::deposit_event(Event::RevisionChanged { from, to: revision });
      Ok(())
    }
  }

  impl<T: Config> Pallet<T> {
    pub fn account_id() -> T::AccountId {
      T::PalletId::get().into_account_truncating()
    }

    pub fn commission_batch(
      depositor: &T::AccountId,
      key: &BatchKeyOf<T>,
    ) -> Option<CommissionBatchOf<T>> {
      Commissions::<T>::get(depositor, key)
    }

    pub fn commission_entry(
      depositor: &T::AccountId,
      key: &BatchKeyOf<T>,
      index: u32,
    ) -> Option<CommissionEntry<T::AccountId>> {
      Commissions::<T>::get(depositor, key)?
        .get(index as usize)
        .cloned()
    }

    /// Validate `entries` and pull their funding from `depositor` into escrow.
    ///
    /// Every check runs before any funds move.
    pub(crate) fn fund_batch(
      depositor: &T::AccountId,
      entries: &[CommissionEntry<T::AccountId>],
      native_value: Balance,
    ) -> DispatchResult {
      ensure!(!entries.is_empty(), Error::<T>::EmptyInput);
      ensure!(
        entries.iter().all(|entry| !entry.amount.is_zero()),
        Error::<T>::InvalidAmount
      );
      let totals = AssetTotals::tally(entries)?;
      ensure!(
        native_value == totals.native,
        Error::<T>::InsufficientNativeSent
      );

      let escrow = Self::account_id();
      for (&asset, &total) in totals.tokens.iter() {
        ensure!(
          T::Transfer::balance(depositor, asset) >= total,
          Error::<T>::InsufficientTokenBalance
        );
        ensure!(
          T::Transfer::allowance(depositor, &escrow, asset) >= total,
          Error::<T>::InsufficientAllowance
        );
      }

      if !totals.native.is_zero() {
        T::Transfer::transfer_in(depositor, &escrow, AssetKind::Native, totals.native)?;
      }
      for (asset, total) in totals.tokens {
        T::Transfer::transfer_in(depositor, &escrow, asset, total)?;
      }
      Ok(())
    }

    /// Take the batch at (`depositor`, `key`) and send its per-asset totals back to the
    /// depositor.
    ///
    /// Returns the number of refunded entries, `None` when no batch was staged.
    pub(crate) fn refund_batch(
      depositor: &T::AccountId,
      key: &BatchKeyOf<T>,
    ) -> Result<Option<u32>, DispatchError> {
      let Some(batch) = Commissions::<T>::take(depositor, key) else {
        return Ok(None);
      };
      let totals = AssetTotals::tally(batch.iter())?;
      let escrow = Self::account_id();
      if !totals.native.is_zero() {
        T::Transfer::transfer_out(&escrow, depositor, AssetKind::Native, totals.native)?;
      }
      for (asset, total) in totals.tokens {
        T::Transfer::transfer_out(&escrow, depositor, asset, total)?;
      }
      Ok(Some(batch.len() as u32))
    }

    pub(crate) fn install_batch(
      depositor: &T::AccountId,
      key: &BatchKeyOf<T>,
      entries: CommissionBatchOf<T>,
    ) {
      Commissions::<T>::insert(depositor, key, entries);
    }

    /// Fund a new batch, refund the one it supersedes, then install it.
    pub(crate) fn replace_batch(
      depositor: &T::AccountId,
      key: &BatchKeyOf<T>,
      entries: CommissionBatchOf<T>,
      native_value: Balance,
    ) -> DispatchResult {
      Self::fund_batch(depositor, &entries, native_value)?;

      if let Some(refunded) = Self::refund_batch(depositor, key)? {
        Self::deposit_event(Event::CommissionReplaced {
          depositor: depositor.clone(),
          key: key.clone(),
          refunded,
        });
      }

      let count = entries.len() as u32;
      Self::install_batch(depositor, key, entries);
      log::debug!(target: LOG_TARGET, "{depositor:?} staged {count} commission entries");
      Self::deposit_event(Event::CommissionDeposited {
        depositor: depositor.clone(),
        key: key.clone(),
        entries: count,
      });
      Ok(())
    }

    /// Credit every entry of the batch to its holder in the ledger and clear the batch.
    ///
    /// A missing or empty batch is an error. Any failing entry rolls back the whole batch.
    pub(crate) fn settle_batch(depositor: &T::AccountId, key: &BatchKeyOf<T>) -> DispatchResult {
      with_storage_layer(|| {
        let batch = Commissions::<T>::take(depositor, key)
          .filter(|batch| !batch.is_empty())
          .ok_or(Error::<T>::EmptyInput)?;
        T::Ledger::credit_all(&Self::account_id(), &batch)?;
        log::debug!(
          target: LOG_TARGET,
          "distributed {} commission entries of {depositor:?}",
          batch.len()
        );
        Self::deposit_event(Event::CommissionDistributed {
          depositor: depositor.clone(),
          key: key.clone(),
          entries: batch.len() as u32,
        });
        Ok(())
      })
    }

    /// Refund whatever is staged under `key`. A missing batch refunds nothing and still succeeds.
    pub(crate) fn return_batch(depositor: &T::AccountId, key: &BatchKeyOf<T>) -> DispatchResult {
      let refunded = Self::refund_batch(depositor, key)?.unwrap_or_default();
      Self::deposit_event(Event::CommissionReturned {
        depositor: depositor.clone(),
        key: key.clone(),
        refunded,
      });
      Ok(())
    }

    /// Fund `entries` and append them to the batch under `key`, creating it when missing.
    pub(crate) fn extend_batch(
      depositor: &T::AccountId,
      key: &BatchKeyOf<T>,
      entries: CommissionBatchOf<T>,
      native_value: Balance,
    ) -> DispatchResult {
      Self::fund_batch(depositor, &entries, native_value)?;
      let count = entries.len() as u32;
      Commissions::<T>::try_mutate(depositor, key, |slot| -> DispatchResult {
        let batch = slot.get_or_insert_with(Default::default);
        for entry in entries {
          batch
            .try_push(entry)
            .map_err(|_| Error::<T>::TooManyEntries)?;
        }
        Ok(())
      })?;
      Self::deposit_event(Event::CommissionAppended {
        depositor: depositor.clone(),
        key: key.clone(),
        entries: count,
      });
      Ok(())
    }

    /// Escrow holds at least everything currently staged.
    pub fn do_try_state() -> DispatchResult {
      let mut staged = alloc::collections::BTreeMap::<AssetKind, Balance>::new();
      for (_, _, batch) in Commissions::<T>::iter() {
        for entry in batch {
          let total = staged.entry(entry.asset).or_default();
          *total = total.saturating_add(entry.amount);
        }
      }
      let escrow = Self::account_id();
      for (asset, total) in staged {
        ensure!(
          T::Transfer::balance(&escrow, asset) >= total,
          DispatchError::Other("escrow holds less than staged commissions")
        );
      }
      Ok(())
    }
  }

  /// Genesis configuration, endows the escrow account with the existential deposit
  #[pallet::genesis_config]
  #[derive(frame::prelude::DefaultNoBound)]
  pub struct GenesisConfig<T: Config> {
    #[serde(skip)]
    pub _marker: core::marker::PhantomData<T>,
  }

  #[pallet::genesis_build]
  impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
    fn build(&self) {
      let escrow = Pallet::<T>::account_id();
      if let Err(e) = T::Transfer::endow(&escrow) {
        log::error!(target: LOG_TARGET, "failed to endow escrow account {escrow:?}: {e:?}");
      }
    }
  }
}
