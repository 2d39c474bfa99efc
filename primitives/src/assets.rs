use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};

/// Single source of truth for asset identifiers across the commission pallets.
///
/// Balances, staged batches and router receivers are all keyed by this type, so the
/// native currency and fungible tokens are treated uniformly.
///
/// - `Native`: the sentinel for the chain's native currency (managed by pallet-balances).
/// - `Local(u32)`: a fungible token managed by pallet-assets. Each token id has exactly one key.
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
  Ord,
  PartialEq,
  PartialOrd,
  TypeInfo,
  Serialize,
  Deserialize,
)]
pub enum AssetKind {
  /// Native currency managed by pallet-balances
  #[default]
  Native,
  /// Token managed by pallet-assets
  Local(u32),
}

impl From<u32> for AssetKind {
  fn from(asset_id: u32) -> Self {
    AssetKind::Local(asset_id)
  }
}

/// Helper trait to inspect AssetKind properties
pub trait AssetInspector {
  fn is_native(&self) -> bool;
  /// Underlying pallet-assets id, `None` for the native currency.
  fn token_id(&self) -> Option<u32>;
}

impl AssetInspector for AssetKind {
  fn is_native(&self) -> bool {
    matches!(self, AssetKind::Native)
  }

  fn token_id(&self) -> Option<u32> {
    match self {
      AssetKind::Local(id) => Some(*id),
      AssetKind::Native => None,
    }
  }
}
