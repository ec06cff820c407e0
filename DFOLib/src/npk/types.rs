//! Types for NPK archive handling

use serde::Serialize;

/// Entry in the file table describing one inner file of the NPK
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NpkEntry {
    /// Decrypted name, e.g. `sprite/character/swordman/equipment/avatar/skin/sm_body0000.img`
    pub name: String,
    /// Offset of the data from the start of the archive
    pub offset: u32,
    /// Size of the data in bytes
    pub size: u32,
    /// Position of this entry in the file table
    pub table_index: usize,
}

impl NpkEntry {
    /// Exclusive end offset of the entry data.
    #[must_use]
    pub fn end(&self) -> u64 {
        u64::from(self.offset) + u64::from(self.size)
    }
}
