use crate::*;
use alloc::vec::Vec;
use pallet_commission_ledger::{AssetTransfer, BenchmarkHelper as _, CommissionEntry};
use polkadot_sdk::frame_benchmarking::v2::*;
use polkadot_sdk::frame_support::traits::Get;
use polkadot_sdk::frame_system::RawOrigin;
use primitives::{AssetKind, params::PRECISION};

#[benchmarks]
mod benches {
  use super::*;

  /// Half of the receivers are paid in native currency, half in a token.
  #[benchmark]
  fn execute(n: Linear<0, { T::MaxReceivers::get() }>) {
    let caller: T::AccountId = whitelisted_caller();
    let target: T::AccountId = account("target", 0, 0);
    let token = T::BenchmarkHelper::token();
    let router = Pallet::<T>::account_id();
    T::BenchmarkHelper::fund(&caller, AssetKind::Native, 1_000 * PRECISION)
      .expect("Failed to fund caller");
    T::BenchmarkHelper::fund(&target, AssetKind::Native, PRECISION)
      .expect("Failed to fund target");
    T::BenchmarkHelper::fund(&caller, token, 1_000 * PRECISION).expect("Failed to fund caller");
    T::BenchmarkHelper::approve(&caller, &router, token, 1_000 * PRECISION)
      .expect("Failed to approve router");

    let entries: Vec<_> = (0..n)
      .map(|i| {
        let asset = if i % 2 == 0 { AssetKind::Native } else { token };
        CommissionEntry::new(account("receiver", i, 0), asset, PRECISION)
      })
      .collect();
    let native_total = entries
      .iter()
      .filter(|entry| entry.asset == AssetKind::Native)
      .count() as u128
      * PRECISION;
    let receivers: ReceiversOf<T> = entries.try_into().expect("Too many receivers");

    #[extrinsic_call]
    execute(
      RawOrigin::Signed(caller.clone()),
      Default::default(),
      target.clone(),
      receivers,
      native_total + PRECISION,
    );

    assert_eq!(
      T::Transfer::balance(&target, AssetKind::Native),
      2 * PRECISION
    );
  }

  impl_benchmark_test_suite!(Pallet, crate::mock::new_test_ext(), crate::mock::Test);
}
