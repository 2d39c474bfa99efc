use crate::*;
use polkadot_sdk::frame_benchmarking::v2::*;
use polkadot_sdk::frame_system::RawOrigin;
use primitives::{AssetKind, params::PRECISION};

#[benchmarks]
mod benches {
  use super::*;

  #[benchmark]
  fn deposit() {
    let caller: T::AccountId = whitelisted_caller();
    let holder: T::AccountId = account("holder", 0, 0);
    let token = T::BenchmarkHelper::token();
    let custody = Pallet::<T>::account_id();
    T::BenchmarkHelper::fund(&caller, AssetKind::Native, 10 * PRECISION)
      .expect("Failed to fund caller");
    T::BenchmarkHelper::fund(&caller, token, 10 * PRECISION).expect("Failed to fund caller");
    T::BenchmarkHelper::approve(&caller, &custody, token, PRECISION)
      .expect("Failed to approve custody");

    #[extrinsic_call]
    deposit(RawOrigin::Signed(caller), holder.clone(), token, PRECISION, 0);

    assert_eq!(HolderBalances::<T>::get(&holder, token), PRECISION);
  }

  #[benchmark]
  fn withdraw_native() {
    let caller: T::AccountId = whitelisted_caller();
    T::BenchmarkHelper::fund(&caller, AssetKind::Native, 10 * PRECISION)
      .expect("Failed to fund caller");
    Pallet::<T>::do_deposit(
      &caller,
      &caller,
      AssetKind::Native,
      2 * PRECISION,
      2 * PRECISION,
    )
    .expect("Failed to seed ledger");

    #[extrinsic_call]
    withdraw_native(RawOrigin::Signed(caller.clone()), PRECISION);

    assert_eq!(
      HolderBalances::<T>::get(&caller, AssetKind::Native),
      PRECISION
    );
  }

  #[benchmark]
  fn withdraw_token() {
    let caller: T::AccountId = whitelisted_caller();
    let token = T::BenchmarkHelper::token();
    let custody = Pallet::<T>::account_id();
    T::BenchmarkHelper::fund(&caller, AssetKind::Native, 10 * PRECISION)
      .expect("Failed to fund caller");
    T::BenchmarkHelper::fund(&caller, token, 10 * PRECISION).expect("Failed to fund caller");
    T::BenchmarkHelper::approve(&caller, &custody, token, 2 * PRECISION)
      .expect("Failed to approve custody");
    Pallet::<T>::do_deposit(&caller, &caller, token, 2 * PRECISION, 0)
      .expect("Failed to seed ledger");

    #[extrinsic_call]
    withdraw_token(RawOrigin::Signed(caller.clone()), token, PRECISION);

    assert_eq!(HolderBalances::<T>::get(&caller, token), PRECISION);
  }

  impl_benchmark_test_suite!(Pallet, crate::mock::new_test_ext(), crate::mock::Test);
}
