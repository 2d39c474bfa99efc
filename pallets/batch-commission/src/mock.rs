use crate as pallet_batch_commission;
use crate::{BatchKeyOf, CommissionBatchOf};
use pallet_commission_ledger::CommissionEntry;
use polkadot_sdk::frame_support::{
  PalletId, construct_runtime, derive_impl, parameter_types,
  traits::{ConstU32, ConstU128, Contains},
};
use polkadot_sdk::frame_system;
use polkadot_sdk::pallet_balances;
use polkadot_sdk::sp_runtime::{
  BuildStorage,
  testing::H256,
  traits::{BlakeTwo256, IdentityLookup},
};
use primitives::{
  AssetKind, Balance, pallet_ids,
  params::{MAX_BATCH_ENTRIES, MAX_BATCH_KEY_LENGTH, PRECISION},
};

pub const ALICE: u64 = 1;
pub const BOB: u64 = 2;
pub const CHARLIE: u64 = 3;
pub const DAVE: u64 = 4;

pub const UNIT: Balance = PRECISION;
pub const INITIAL_NATIVE: Balance = 1_000 * UNIT;
pub const INITIAL_TOKEN: Balance = 100 * UNIT;

pub const TOKEN_ID: u32 = 1;
pub const TOKEN: AssetKind = AssetKind::Local(TOKEN_ID);
pub const OTHER_TOKEN_ID: u32 = 2;
pub const OTHER_TOKEN: AssetKind = AssetKind::Local(OTHER_TOKEN_ID);

type Block = frame_system::mocking::MockBlock<Test>;

construct_runtime!(
  pub struct Test {
    System: frame_system,
    Balances: pallet_balances,
    Assets: polkadot_sdk::pallet_assets,
    Ledger: pallet_commission_ledger,
    BatchCommission: pallet_batch_commission,
  }
);

pub struct CommissionEscrows;
impl Contains<u64> for CommissionEscrows {
  fn contains(who: &u64) -> bool {
    *who == BatchCommission::account_id()
  }
}

#[derive_impl(frame_system::config_preludes::TestDefaultConfig)]
impl frame_system::Config for Test {
  type Block = Block;
  type AccountId = u64;
  type Lookup = IdentityLookup<Self::AccountId>;
  type Hash = H256;
  type Hashing = BlakeTwo256;
  type AccountData = pallet_balances::AccountData<u128>;
  type BaseCallFilter = pallet_commission_ledger::DirectFundingFilter<Test>;
}

impl pallet_balances::Config for Test {
  type MaxLocks = ();
  type MaxReserves = ();
  type ReserveIdentifier = [u8; 8];
  type Balance = u128;
  type DustRemoval = ();
  type RuntimeEvent = RuntimeEvent;
  type ExistentialDeposit = ExistentialDeposit;
  type AccountStore = System;
  type WeightInfo = ();
  type FreezeIdentifier = ();
  type MaxFreezes = ();
  type RuntimeHoldReason = ();
  type RuntimeFreezeReason = ();
  type DoneSlashHandler = ();
}

impl polkadot_sdk::pallet_assets::Config for Test {
  type RuntimeEvent = RuntimeEvent;
  type Balance = u128;
  type AssetId = u32;
  type AssetIdParameter = u32;
  type Currency = Balances;
  type CreateOrigin = polkadot_sdk::frame_support::traits::AsEnsureOriginWithArg<
    frame_system::EnsureSigned<Self::AccountId>,
  >;
  type ForceOrigin = frame_system::EnsureRoot<Self::AccountId>;
  type AssetDeposit = ConstU128<1>;
  type AssetAccountDeposit = ConstU128<1>;
  type MetadataDepositBase = ConstU128<1>;
  type MetadataDepositPerByte = ConstU128<1>;
  type ApprovalDeposit = ConstU128<1>;
  type StringLimit = ConstU32<50>;
  type Freezer = ();
  type Extra = ();
  type ReserveData = ();
  type CallbackHandle = ();
  type WeightInfo = ();
  type RemoveItemsLimit = ConstU32<5>;
  type Holder = ();
  #[cfg(feature = "runtime-benchmarks")]
  type BenchmarkHelper = AssetBenchmarkHelper;
}

#[cfg(feature = "runtime-benchmarks")]
pub struct AssetBenchmarkHelper;

#[cfg(feature = "runtime-benchmarks")]
impl polkadot_sdk::pallet_assets::BenchmarkHelper<u32, ()> for AssetBenchmarkHelper {
  fn create_asset_id_parameter(id: u32) -> u32 {
    id
  }
  fn create_reserve_id_parameter(_id: u32) -> () {
    ()
  }
}

parameter_types! {
  pub static ExistentialDeposit: Balance = 1;
  pub static TokenMinBalance: Balance = 1;
  pub const LedgerPalletId: PalletId = PalletId(*pallet_ids::COMMISSION_LEDGER_PALLET_ID);
  pub const BatchPalletId: PalletId = PalletId(*pallet_ids::BATCH_COMMISSION_PALLET_ID);
}

pub type Transfer = pallet_commission_ledger::NativeAndAssets<Balances, Assets>;

impl pallet_commission_ledger::Config for Test {
  type Transfer = Transfer;
  type PalletId = LedgerPalletId;
  type EscrowAccounts = CommissionEscrows;
  type WeightInfo = ();
  #[cfg(feature = "runtime-benchmarks")]
  type BenchmarkHelper = CommissionBenchmarkHelper;
}

impl pallet_batch_commission::Config for Test {
  type Transfer = Transfer;
  type Ledger = Ledger;
  type PalletId = BatchPalletId;
  type MaxEntries = ConstU32<MAX_BATCH_ENTRIES>;
  type MaxKeyLength = ConstU32<MAX_BATCH_KEY_LENGTH>;
  type AdminOrigin = frame_system::EnsureRoot<u64>;
  type WeightInfo = ();
  #[cfg(feature = "runtime-benchmarks")]
  type BenchmarkHelper = CommissionBenchmarkHelper;
}

#[cfg(feature = "runtime-benchmarks")]
pub struct CommissionBenchmarkHelper;

#[cfg(feature = "runtime-benchmarks")]
impl pallet_commission_ledger::BenchmarkHelper<u64> for CommissionBenchmarkHelper {
  fn token() -> AssetKind {
    TOKEN
  }

  fn fund(
    who: &u64,
    asset: AssetKind,
    amount: Balance,
  ) -> polkadot_sdk::sp_runtime::DispatchResult {
    use polkadot_sdk::frame_support::traits::{fungible, fungibles};
    match asset {
      AssetKind::Native => <Balances as fungible::Mutate<u64>>::mint_into(who, amount),
      AssetKind::Local(id) => {
        <Assets as fungibles::Mutate<u64>>::mint_into(id, who, amount)
      }
    }
    .map(|_| ())
  }

  fn approve(
    owner: &u64,
    spender: &u64,
    asset: AssetKind,
    amount: Balance,
  ) -> polkadot_sdk::sp_runtime::DispatchResult {
    use polkadot_sdk::frame_support::traits::fungibles::approvals::Mutate;
    match asset {
      AssetKind::Native => Ok(()),
      AssetKind::Local(id) => {
        <Assets as Mutate<u64>>::approve(id, owner, spender, amount)
      }
    }
  }
}

pub fn escrow() -> u64 {
  BatchCommission::account_id()
}

pub fn custody() -> u64 {
  Ledger::account_id()
}

pub fn key(bytes: &[u8]) -> BatchKeyOf<Test> {
  bytes.to_vec().try_into().unwrap()
}

pub fn entry(holder: u64, asset: AssetKind, amount: Balance) -> CommissionEntry<u64> {
  CommissionEntry::new(holder, asset, amount)
}

pub fn batch(entries: Vec<CommissionEntry<u64>>) -> CommissionBatchOf<Test> {
  entries.try_into().unwrap()
}

/// Approve the batch escrow to pull `amount` of `asset_id` from `owner`.
pub fn approve_escrow(owner: u64, asset_id: u32, amount: Balance) {
  polkadot_sdk::frame_support::assert_ok!(Assets::approve_transfer(
    RuntimeOrigin::signed(owner),
    asset_id,
    escrow(),
    amount
  ));
}

pub fn native_balance(who: u64) -> Balance {
  Balances::free_balance(who)
}

pub fn token_balance(asset_id: u32, who: u64) -> Balance {
  Assets::balance(asset_id, who)
}

/// Native balance of a pallet account above its existential deposit endowment.
pub fn pooled_native(who: u64) -> Balance {
  Balances::free_balance(who) - ExistentialDeposit::get()
}

pub fn new_test_ext() -> polkadot_sdk::sp_io::TestExternalities {
  let mut t = frame_system::GenesisConfig::<Test>::default()
    .build_storage()
    .unwrap();

  pallet_balances::GenesisConfig::<Test> {
    balances: vec![
      (ALICE, INITIAL_NATIVE),
      (BOB, INITIAL_NATIVE),
      (CHARLIE, INITIAL_NATIVE),
      (DAVE, INITIAL_NATIVE),
    ],
    dev_accounts: None,
  }
  .assimilate_storage(&mut t)
  .unwrap();

  polkadot_sdk::pallet_assets::GenesisConfig::<Test> {
    assets: vec![
      (TOKEN_ID, ALICE, true, TokenMinBalance::get()),
      (OTHER_TOKEN_ID, ALICE, true, 1),
    ],
    metadata: vec![],
    accounts: vec![
      (TOKEN_ID, ALICE, INITIAL_TOKEN),
      (OTHER_TOKEN_ID, ALICE, INITIAL_TOKEN),
    ],
    reserves: vec![],
    next_asset_id: None,
  }
  .assimilate_storage(&mut t)
  .unwrap();

  pallet_commission_ledger::GenesisConfig::<Test>::default()
    .assimilate_storage(&mut t)
    .unwrap();
  pallet_batch_commission::GenesisConfig::<Test>::default()
    .assimilate_storage(&mut t)
    .unwrap();

  let mut ext: polkadot_sdk::sp_io::TestExternalities = t.into();
  ext.execute_with(|| System::set_block_number(1));
  ext
}
