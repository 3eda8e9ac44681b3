//! In-memory backend.

use super::{Backend, Tables};
use crate::error::Result;

/// Keeps nothing beyond the process; every load starts empty.
pub struct Memory;

impl Backend for Memory {
    fn load(&self) -> Result<Tables> {
        Ok(Tables::default())
    }

    fn persist(&self, _tables: &Tables) -> Result<()> {
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
