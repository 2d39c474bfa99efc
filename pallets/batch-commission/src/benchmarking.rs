use crate::*;
use alloc::vec::Vec;
use pallet_commission_ledger::{BenchmarkHelper as _, CommissionEntry};
use polkadot_sdk::frame_benchmarking::v2::*;
use polkadot_sdk::frame_support::traits::{EnsureOrigin, Get};
use polkadot_sdk::frame_system::RawOrigin;
use primitives::{AssetKind, params::PRECISION};

fn batch_key<T: Config>() -> BatchKeyOf<T> {
  b"benchmark".to_vec().try_into().expect("Key too long")
}

/// `n` entries alternating between the native currency and the benchmark token.
fn entries<T: Config>(n: u32) -> (CommissionBatchOf<T>, u128) {
  let token = T::BenchmarkHelper::token();
  let entries: Vec<_> = (0..n)
    .map(|i| {
      let asset = if i % 2 == 0 { AssetKind::Native } else { token };
      CommissionEntry::new(account("holder", i, 0), asset, PRECISION)
    })
    .collect();
  let native = entries
    .iter()
    .filter(|entry| entry.asset == AssetKind::Native)
    .count() as u128
    * PRECISION;
  (entries.try_into().expect("Too many entries"), native)
}

fn funded_depositor<T: Config>() -> T::AccountId {
  let depositor: T::AccountId = whitelisted_caller();
  let token = T::BenchmarkHelper::token();
  T::BenchmarkHelper::fund(&depositor, AssetKind::Native, 1_000 * PRECISION)
    .expect("Failed to fund depositor");
  T::BenchmarkHelper::fund(&depositor, token, 1_000 * PRECISION)
    .expect("Failed to fund depositor");
  T::BenchmarkHelper::approve(&depositor, &Pallet::<T>::account_id(), token, 1_000 * PRECISION)
    .expect("Failed to approve escrow");
  depositor
}

fn staged<T: Config>(n: u32) -> T::AccountId {
  let depositor = funded_depositor::<T>();
  let (batch, native) = entries::<T>(n);
  Pallet::<T>::replace_batch(&depositor, &batch_key::<T>(), batch, native)
    .expect("Failed to stage batch");
  depositor
}

#[benchmarks]
mod benches {
  use super::*;

  /// Worst case replaces a full batch already staged under the key.
  #[benchmark]
  fn deposit_commission(n: Linear<1, { T::MaxEntries::get() }>) {
    let depositor = staged::<T>(T::MaxEntries::get());
    let (batch, native) = entries::<T>(n);

    #[extrinsic_call]
    deposit_commission(
      RawOrigin::Signed(depositor.clone()),
      batch_key::<T>(),
      batch,
      native,
    );

    assert_eq!(
      Pallet::<T>::commission_batch(&depositor, &batch_key::<T>()).map(|b| b.len() as u32),
      Some(n)
    );
  }

  #[benchmark]
  fn distribute_commission(n: Linear<1, { T::MaxEntries::get() }>) {
    let depositor = staged::<T>(n);
    let caller: T::AccountId = account("caller", 0, 0);

    #[extrinsic_call]
    distribute_commission(
      RawOrigin::Signed(caller),
      depositor.clone(),
      batch_key::<T>(),
    );

    assert!(Pallet::<T>::commission_batch(&depositor, &batch_key::<T>()).is_none());
  }

  #[benchmark]
  fn destroy_and_return_commission(n: Linear<0, { T::MaxEntries::get() }>) {
    let depositor = if n == 0 {
      funded_depositor::<T>()
    } else {
      staged::<T>(n)
    };

    #[extrinsic_call]
    destroy_and_return_commission(RawOrigin::Signed(depositor.clone()), batch_key::<T>());

    assert!(Pallet::<T>::commission_batch(&depositor, &batch_key::<T>()).is_none());
  }

  #[benchmark]
  fn append_commission(n: Linear<1, { T::MaxEntries::get() / 2 }>) {
    ActiveRevision::<T>::put(Revision::V2);
    let depositor = staged::<T>(T::MaxEntries::get() / 2);
    let (batch, native) = entries::<T>(n);

    #[extrinsic_call]
    append_commission(
      RawOrigin::Signed(depositor.clone()),
      batch_key::<T>(),
      batch,
      native,
    );

    assert_eq!(
      Pallet::<T>::commission_batch(&depositor, &batch_key::<T>()).map(|b| b.len() as u32),
      Some(T::MaxEntries::get() / 2 + n)
    );
  }

  #[benchmark]
  fn set_revision() -> Result<(), BenchmarkError> {
    let origin =
      T::AdminOrigin::try_successful_origin().map_err(|_| BenchmarkError::Weightless)?;

    #[extrinsic_call]
    _(origin as T::RuntimeOrigin, Revision::V2);

    assert_eq!(ActiveRevision::<T>::get(), Revision::V2);
    Ok(())
  }

  impl_benchmark_test_suite!(Pallet, crate::mock::new_test_ext(), crate::mock::Test);
}
