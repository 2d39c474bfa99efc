//! Commission Ledger Pallet
//!
//! Durable per-holder commission balances in the native currency and in pallet-assets tokens.
//! Every recorded balance is backed one-to-one by funds held in the custody account.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub use pallet::*;

pub mod adapters;
pub use adapters::{AssetTransfer, NativeAndAssets};

pub mod filter;
pub use filter::DirectFundingFilter;

pub mod types;
pub use types::*;


#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

pub mod weights;
pub use weights::WeightInfo;

pub const LOG_TARGET: &str = "runtime::commission-ledger";

/// Helper for benchmarking
#[cfg(feature = "runtime-benchmarks")]
pub trait BenchmarkHelper<AccountId> {
  /// A token usable in benchmarks, created on first `fund`.
  fn token() -> AssetKind;
  fn fund(who: &AccountId, asset: AssetKind, amount: Balance)
  -> frame::deps::sp_runtime::DispatchResult;
  fn approve(
    owner: &AccountId,
    spender: &AccountId,
    asset: AssetKind,
    amount: Balance,
  ) -> frame::deps::sp_runtime::DispatchResult;
}

#[frame::pallet]
pub mod pallet {
  use super::{AssetTotals, AssetTransfer, CommissionEntry, LOG_TARGET, LedgerInterface, WeightInfo};
  use frame::deps::frame_support::traits::Contains;
  use frame::deps::sp_runtime::{
    ArithmeticError,
    traits::{AccountIdConversion, Zero},
  };
  use frame::prelude::*;
  use primitives::{AssetKind, Balance};

  const STORAGE_VERSION: StorageVersion = StorageVersion::new(1);

  #[pallet::pallet]
  #[pallet::storage_version(STORAGE_VERSION)]
  pub struct Pallet<T>(PhantomData<T>);

  #[pallet::config]
  pub trait Config: frame_system::Config<RuntimeEvent: From<Event<Self>>> {
    /// Native and token transfers in and out of the custody account
    type Transfer: AssetTransfer<Self::AccountId>;

    /// Pallet ID for the custody account
    #[pallet::constant]
    type PalletId: Get<PalletId>;

    /// Escrow accounts of other commission components. Like the custody account they only
    /// receive funds through their own operations.
    type EscrowAccounts: Contains<Self::AccountId>;

    /// Weight information for extrinsics
    type WeightInfo: WeightInfo;

    /// Helper for benchmarking
    #[cfg(feature = "runtime-benchmarks")]
    type BenchmarkHelper: crate::BenchmarkHelper<Self::AccountId>;
  }

  /// Recorded balance per (holder, asset). The entry is kept at zero after a full withdrawal,
  /// so the key set lists every asset a holder was ever credited in.
  #[pallet::storage]
  pub type HolderBalances<T: Config> = StorageDoubleMap<
    _,
    Blake2_128Concat,
    T::AccountId,
    Blake2_128Concat,
    AssetKind,
    Balance,
    ValueQuery,
  >;

  /// Sum of all recorded balances per asset
  #[pallet::storage]
  pub type CustodyTotals<T: Config> = StorageMap<_, Blake2_128Concat, AssetKind, Balance, ValueQuery>;

  #[pallet::event]
  #[pallet::generate_deposit(pub(super) fn deposit_event)]
  pub enum Event<T: Config> {
    /// Funds from `payer` were credited to `holder`
    Deposited {
      payer: T::AccountId,
      holder: T::AccountId,
      asset: AssetKind,
      amount: Balance,
    },
    /// A holder withdrew part of their balance
    Withdrawn {
      holder: T::AccountId,
      asset: AssetKind,
      amount: Balance,
    },
  }

  #[pallet::error]
  pub enum Error<T> {
    /// Amount must be greater than zero
    InvalidAmount,
    /// Supplied native value does not match the value the operation consumes
    InsufficientNativeSent,
    /// Payer holds less of the token than required
    InsufficientTokenBalance,
    /// Payer approved less of the token to the custody account than required
    InsufficientAllowance,
    /// Holder's recorded balance is lower than the requested withdrawal
    InsufficientBalance,
    /// Asset is not an existing token
    NoSuchAsset,
    /// Custody and escrow accounts only accept funds through their own operations
    DirectFundingRejected,
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
    /// Credit `amount` of `asset` to `holder`, paid by the caller.
    ///
    /// Native deposits require `native_value == amount`. Token deposits pull `amount` under the
    /// caller's approval to the custody account and take no native value.
    #[pallet::call_index(0)]
    #[pallet::weight(T::WeightInfo::deposit())]
    pub fn deposit(
      origin: OriginFor<T>,
      holder: T::AccountId,
      asset: AssetKind,
      amount: Balance,
      native_value: Balance,
    ) -> DispatchResult {
      let payer = ensure_signed(origin)?;
      Self::do_deposit(&payer, &holder, asset, amount, native_value)
    }

    /// Withdraw part of the caller's native balance.
    #[pallet::call_index(1)]
    #[pallet::weight(T::WeightInfo::withdraw_native())]
    pub fn withdraw_native(origin: OriginFor<T>, amount: Balance) -> DispatchResult {
      let holder = ensure_signed(origin)?;
      Self::do_withdraw(&holder, AssetKind::Native, amount)
    }

    /// Withdraw part of the caller's balance in a token.
    #[pallet::call_index(2)]
    #[pallet::weight(T::WeightInfo::withdraw_token())]
    pub fn withdraw_token(origin: OriginFor<T>, asset: AssetKind, amount: Balance) -> DispatchResult {
      let holder = ensure_signed(origin)?;
      ensure!(!amount.is_zero(), Error::<T>::InvalidAmount);
      ensure!(T::Transfer::is_token(asset), Error::<T>::NoSuchAsset);
      Self::do_withdraw(&holder, asset, amount)
    }
  }

  impl<T: Config> Pallet<T> {
    pub fn account_id() -> T::AccountId {
      T::PalletId::get().into_account_truncating()
    }

    pub fn balance_of(holder: &T::AccountId, asset: AssetKind) -> Balance {
      HolderBalances::<T>::get(holder, asset)
    }

    /// Every (asset, amount) pair recorded for `holder`, read lazily from storage.
    pub fn balances_of(holder: &T::AccountId) -> impl Iterator<Item = (AssetKind, Balance)> {
      HolderBalances::<T>::iter_prefix(holder)
    }

    pub fn is_escrow_account(who: &T::AccountId) -> bool {
      *who == Self::account_id() || T::EscrowAccounts::contains(who)
    }

    /// Reject a plain transfer whose destination is the custody or an escrow account.
    pub fn ensure_direct_funding_allowed(dest: &T::AccountId) -> DispatchResult {
      ensure!(
        !Self::is_escrow_account(dest),
        Error::<T>::DirectFundingRejected
      );
      Ok(())
    }

    pub(crate) fn do_deposit(
      payer: &T::AccountId,
      holder: &T::AccountId,
      asset: AssetKind,
      amount: Balance,
      native_value: Balance,
    ) -> DispatchResult {
      ensure!(!amount.is_zero(), Error::<T>::InvalidAmount);
      let custody = Self::account_id();
      match asset {
        AssetKind::Native => {
          ensure!(native_value == amount, Error::<T>::InsufficientNativeSent);
        }
        token => {
          ensure!(native_value.is_zero(), Error::<T>::InsufficientNativeSent);
          ensure!(
            T::Transfer::balance(payer, token) >= amount,
            Error::<T>::InsufficientTokenBalance
          );
          ensure!(
            T::Transfer::allowance(payer, &custody, token) >= amount,
            Error::<T>::InsufficientAllowance
          );
        }
      }
      T::Transfer::transfer_in(payer, &custody, asset, amount)?;
      Self::credit(payer, holder, asset, amount)
    }

    /// Record `amount` for `holder` once the backing funds sit in custody.
    fn credit(
      payer: &T::AccountId,
      holder: &T::AccountId,
      asset: AssetKind,
      amount: Balance,
    ) -> DispatchResult {
      HolderBalances::<T>::try_mutate(holder, asset, |balance| -> DispatchResult {
        *balance = balance
          .checked_add(amount)
          .ok_or(ArithmeticError::Overflow)?;
        Ok(())
      })?;
      CustodyTotals::<T>::try_mutate(asset, |total| -> DispatchResult {
        *total = total.checked_add(amount).ok_or(ArithmeticError::Overflow)?;
        Ok(())
      })?;
      log::debug!(target: LOG_TARGET, "credited {amount} of {asset:?} to {holder:?}");
      Self::deposit_event(Event::Deposited {
        payer: payer.clone(),
        holder: holder.clone(),
        asset,
        amount,
      });
      Ok(())
    }

    /// Move the per-asset totals of `entries` from `source` into custody, then credit each
    /// entry to its holder.
    pub(crate) fn credit_entries(
      source: &T::AccountId,
      entries: &[CommissionEntry<T::AccountId>],
    ) -> DispatchResult {
      ensure!(
        entries.iter().all(|entry| !entry.amount.is_zero()),
        Error::<T>::InvalidAmount
      );
      let totals = AssetTotals::tally(entries)?;
      let custody = Self::account_id();
      if !totals.native.is_zero() {
        T::Transfer::transfer_out(source, &custody, AssetKind::Native, totals.native)?;
      }
      for (asset, total) in totals.tokens {
        T::Transfer::transfer_out(source, &custody, asset, total)?;
      }
      for entry in entries {
        Self::credit(source, &entry.holder, entry.asset, entry.amount)?;
      }
      Ok(())
    }

    pub(crate) fn do_withdraw(
      holder: &T::AccountId,
      asset: AssetKind,
      amount: Balance,
    ) -> DispatchResult {
      ensure!(!amount.is_zero(), Error::<T>::InvalidAmount);
      // Balance leaves the books before funds leave custody.
      HolderBalances::<T>::try_mutate(holder, asset, |balance| -> DispatchResult {
        *balance = balance
          .checked_sub(amount)
          .ok_or(Error::<T>::InsufficientBalance)?;
        Ok(())
      })?;
      CustodyTotals::<T>::mutate(asset, |total| *total = total.saturating_sub(amount));
      T::Transfer::transfer_out(&Self::account_id(), holder, asset, amount)?;
      log::debug!(target: LOG_TARGET, "{holder:?} withdrew {amount} of {asset:?}");
      Self::deposit_event(Event::Withdrawn {
        holder: holder.clone(),
        asset,
        amount,
      });
      Ok(())
    }

    /// Recorded balances sum to the per-asset totals and custody holds at least those totals.
    pub fn do_try_state() -> DispatchResult {
      let mut sums = alloc::collections::BTreeMap::<AssetKind, Balance>::new();
      for (_, asset, balance) in HolderBalances::<T>::iter() {
        let sum = sums.entry(asset).or_default();
        *sum = sum.saturating_add(balance);
      }
      for (asset, total) in CustodyTotals::<T>::iter() {
        ensure!(
          sums.remove(&asset).unwrap_or_default() == total,
          DispatchError::Other("recorded balances diverge from custody totals")
        );
        ensure!(
          T::Transfer::balance(&Self::account_id(), asset) >= total,
          DispatchError::Other("custody holds less than recorded balances")
        );
      }
      ensure!(
        sums.values().all(|sum| sum.is_zero()),
        DispatchError::Other("balances recorded without a custody total")
      );
      Ok(())
    }
  }

  impl<T: Config> LedgerInterface<T::AccountId> for Pallet<T> {
    fn custody_account() -> T::AccountId {
      Self::account_id()
    }

    fn credit_from(
      source: &T::AccountId,
      holder: &T::AccountId,
      asset: AssetKind,
      amount: Balance,
    ) -> DispatchResult {
      Self::credit_entries(source, &[CommissionEntry::new(holder.clone(), asset, amount)])
    }

    fn credit_all(
      source: &T::AccountId,
      entries: &[CommissionEntry<T::AccountId>],
    ) -> DispatchResult {
      Self::credit_entries(source, entries)
    }

    fn balance_of(holder: &T::AccountId, asset: AssetKind) -> Balance {
      HolderBalances::<T>::get(holder, asset)
    }

    fn ensure_direct_funding_allowed(dest: &T::AccountId) -> DispatchResult {
      Pallet::<T>::ensure_direct_funding_allowed(dest)
    }
  }

  /// Genesis configuration, endows the custody account with the existential deposit
  #[pallet::genesis_config]
  #[derive(frame::prelude::DefaultNoBound)]
  pub struct GenesisConfig<T: Config> {
    #[serde(skip)]
    pub _marker: core::marker::PhantomData<T>,
  }

  #[pallet::genesis_build]
  impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
    fn build(&self) {
      let custody = Pallet::<T>::account_id();
      if let Err(e) = T::Transfer::endow(&custody) {
        log::error!(target: LOG_TARGET, "failed to endow custody account {custody:?}: {e:?}");
      }
    }
  }
}
