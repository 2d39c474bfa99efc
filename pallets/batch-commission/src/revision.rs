//! Behavioral revisions of the batch stager
//!
//! Every revision reads and writes the same `Commissions` layout, so switching the active
//! revision swaps behavior only. Batches staged under an older revision keep working unchanged.

use crate::{BatchKeyOf, CommissionBatchOf, Config, Error, Pallet};
use frame::prelude::*;
use primitives::Balance;

/// Revision selected by `set_revision`.
#[derive(
  Clone,
  Copy,
  Debug,
  Decode,
  DecodeWithMemTracking,
  Default,
  Encode,
  Eq,
  MaxEncodedLen,
  PartialEq,
  TypeInfo,
)]
pub enum Revision {
  #[default]
  V1,
  V2,
}

/// Operation contracts implemented by every revision.
pub trait CommissionBehavior<T: Config> {
  fn deposit(
    depositor: &T::AccountId,
    key: &BatchKeyOf<T>,
    entries: CommissionBatchOf<T>,
    native_value: Balance,
  ) -> DispatchResult {
    Pallet::<T>::replace_batch(depositor, key, entries, native_value)
  }

  fn distribute(depositor: &T::AccountId, key: &BatchKeyOf<T>) -> DispatchResult {
    Pallet::<T>::settle_batch(depositor, key)
  }

  fn destroy_and_return(depositor: &T::AccountId, key: &BatchKeyOf<T>) -> DispatchResult {
    Pallet::<T>::return_batch(depositor, key)
  }

  fn append(
    _depositor: &T::AccountId,
    _key: &BatchKeyOf<T>,
    _entries: CommissionBatchOf<T>,
    _native_value: Balance,
  ) -> DispatchResult {
    Err(Error::<T>::UnsupportedByRevision.into())
  }
}

/// Deposit, distribute and destroy-and-return.
pub struct V1;

/// V1 plus funded appends to a staged batch.
pub struct V2;

impl<T: Config> CommissionBehavior<T> for V1 {}

impl<T: Config> CommissionBehavior<T> for V2 {
  fn append(
    depositor: &T::AccountId,
    key: &BatchKeyOf<T>,
    entries: CommissionBatchOf<T>,
    native_value: Balance,
  ) -> DispatchResult {
    Pallet::<T>::extend_batch(depositor, key, entries, native_value)
  }
}

impl Revision {
  pub fn deposit<T: Config>(
    self,
    depositor: &T::AccountId,
    key: &BatchKeyOf<T>,
    entries: CommissionBatchOf<T>,
    native_value: Balance,
  ) -> DispatchResult {
    match self {
      Revision::V1 => <V1 as CommissionBehavior<T>>::deposit(depositor, key, entries, native_value),
      Revision::V2 => <V2 as CommissionBehavior<T>>::deposit(depositor, key, entries, native_value),
    }
  }

  pub fn distribute<T: Config>(self, depositor: &T::AccountId, key: &BatchKeyOf<T>) -> DispatchResult {
    match self {
      Revision::V1 => <V1 as CommissionBehavior<T>>::distribute(depositor, key),
      Revision::V2 => <V2 as CommissionBehavior<T>>::distribute(depositor, key),
    }
  }

  pub fn destroy_and_return<T: Config>(
    self,
    depositor: &T::AccountId,
    key: &BatchKeyOf<T>,
  ) -> DispatchResult {
    match self {
      Revision::V1 => <V1 as CommissionBehavior<T>>::destroy_and_return(depositor, key),
      Revision::V2 => <V2 as CommissionBehavior<T>>::destroy_and_return(depositor, key),
    }
  }

  pub fn append<T: Config>(
    self,
    depositor: &T::AccountId,
    key: &BatchKeyOf<T>,
    entries: CommissionBatchOf<T>,
    native_value: Balance,
  ) -> DispatchResult {
    match self {
      Revision::V1 => <V1 as CommissionBehavior<T>>::append(depositor, key, entries, native_value),
      Revision::V2 => <V2 as CommissionBehavior<T>>::append(depositor, key, entries, native_value),
    }
  }
}
