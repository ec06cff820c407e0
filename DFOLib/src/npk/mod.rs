//! NPK ("Neople Pack") archive reader
//!
//! Layout, all integers little-endian:
//!
//! ```text
//! 0x00  [u8; 16]  magic "NeoplePack_Bill\0"
//! 0x10  u32       entry count
//! 0x14  entries   { u32 offset, u32 size, [u8; 256] name ^ NAME_KEY } * count
//! ....  [u8; 32]  SHA-256 of the header, truncated to a multiple of 17 bytes
//! ```
//!
//! Entries are stored uncompressed at absolute offsets.

mod reader;
mod types;

pub use reader::{NpkArchive, NpkFile, decrypt_name};
pub use types::NpkEntry;

/// NPK magic bytes
pub const MAGIC: [u8; 16] = *b"NeoplePack_Bill\0";

/// Size of the fixed header (magic + entry count)
pub const HEADER_SIZE: usize = 20;

/// Length of the encrypted name field in a table entry
pub const NAME_LENGTH: usize = 256;

/// Size of one table entry
pub const ENTRY_SIZE: usize = 4 + 4 + NAME_LENGTH;

/// Size of the checksum following the table
pub const CHECKSUM_SIZE: usize = 32;

/// XOR key applied to entry names
pub const NAME_KEY: [u8; NAME_LENGTH] = build_name_key();

const fn build_name_key() -> [u8; NAME_LENGTH] {
    let prefix = b"puchikon@neople dungeon and fighter ";
    let fill = b"DNF";
    let mut key = [0u8; NAME_LENGTH];
    let mut i = 0;
    // Last byte stays 0
    while i < NAME_LENGTH - 1 {
        key[i] = if i < prefix.len() {
            prefix[i]
        } else {
            fill[(i - prefix.len()) % fill.len()]
        };
        i += 1;
    }
    key
}

/// Number of header bytes covered by the checksum for `count` entries.
#[must_use]
pub fn checksum_coverage(count: usize) -> usize {
    (HEADER_SIZE + count * ENTRY_SIZE) / 17 * 17
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_key_layout() {
        assert_eq!(&NAME_KEY[..36], b"puchikon@neople dungeon and fighter ");
        assert_eq!(&NAME_KEY[36..42], b"DNFDNF");
        assert_eq!(&NAME_KEY[252..255], b"DNF");
        assert_eq!(NAME_KEY[255], 0);
    }

    #[test]
    fn test_checksum_coverage() {
        assert_eq!(checksum_coverage(0), 17);
        assert_eq!(checksum_coverage(1), 272);
        assert_eq!(checksum_coverage(2), 544);
    }
}
