//! Test fixtures and constants.

use std::sync::Arc;

use hangar::core::cipher::MasterKey;
use hangar::core::store::{Backend, Database};
use hangar::{IdentityRetention, Tree, Vault};

/// Master key handed to the binary in CLI tests.
pub const TEST_KEY_HEX: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

/// Owner used by library tests.
pub const OWNER: u64 = 1;

pub fn test_key() -> MasterKey {
    MasterKey::from_hex(TEST_KEY_HEX).expect("fixture key is valid")
}

/// In-memory tree with the default retention policy.
pub fn memory_tree() -> Tree {
    Tree::new(Vault::new(Arc::new(Database::in_memory()), Arc::new(test_key())))
}

/// Tree over an arbitrary backend.
pub fn tree_over(backend: impl Backend + 'static, retention: IdentityRetention) -> Tree {
    let db = Database::open(backend).expect("backend loads");
    Tree::new(Vault::new(Arc::new(db), Arc::new(test_key()))).with_retention(retention)
}
