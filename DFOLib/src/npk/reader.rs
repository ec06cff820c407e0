//! NPK file table parsing and entry access

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use super::{CHECKSUM_SIZE, ENTRY_SIZE, HEADER_SIZE, MAGIC, NAME_KEY, NAME_LENGTH, NpkEntry, checksum_coverage};
use crate::error::{Error, Result};
use crate::utils::ByteCursor;

/// Parsed NPK file table.
///
/// Holds no archive bytes; pair it with the buffer it was parsed from
/// (see [`NpkFile`]) to read entry data.
#[derive(Debug)]
pub struct NpkArchive {
    entries: Vec<NpkEntry>,
    /// Name -> index of the first entry with that name
    index: HashMap<String, usize>,
    checksum_valid: bool,
    warnings: Vec<Error>,
}

impl NpkArchive {
    /// Parse the header and file table of an NPK held in memory.
    ///
    /// Duplicate names and a checksum mismatch are not fatal: the first
    /// entry with a given name wins and both conditions are recorded in
    /// [`warnings`](Self::warnings).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] if the magic is missing.
    /// Returns [`Error::TruncatedData`] if the declared entry count needs more
    /// bytes than the buffer holds.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut cursor = ByteCursor::new(data);

        let magic = cursor.read_array::<16>().map_err(|_| Error::InvalidFormat {
            what: "NPK header",
            offset: 0,
            reason: format!("file is {} bytes, too short for magic", data.len()),
        })?;
        if magic != MAGIC {
            return Err(Error::InvalidFormat {
                what: "NPK header",
                offset: 0,
                reason: "missing NeoplePack_Bill magic".to_string(),
            });
        }

        let count = cursor.read_u32()? as usize;

        // Check the whole table up front so nothing is half-built
        let table_len = count
            .checked_mul(ENTRY_SIZE)
            .and_then(|len| len.checked_add(CHECKSUM_SIZE))
            .ok_or(Error::TruncatedData {
                offset: HEADER_SIZE as u64,
                needed: u64::MAX,
                available: cursor.remaining() as u64,
            })?;
        if table_len > cursor.remaining() {
            return Err(Error::TruncatedData {
                offset: HEADER_SIZE as u64,
                needed: table_len as u64,
                available: cursor.remaining() as u64,
            });
        }

        tracing::debug!("NPK table: {} entries", count);

        let mut entries = Vec::with_capacity(count);
        let mut index = HashMap::with_capacity(count);
        let mut warnings = Vec::new();

        for table_index in 0..count {
            let offset = cursor.read_u32()?;
            let size = cursor.read_u32()?;
            let name = decrypt_name(cursor.read_bytes(NAME_LENGTH)?);

            match index.entry(name.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(table_index);
                }
                Entry::Occupied(slot) => {
                    let first: &NpkEntry = &entries[*slot.get()];
                    let duplicate = Error::DuplicateEntry {
                        name: name.clone(),
                        offset: u64::from(offset),
                        first_offset: u64::from(first.offset),
                    };
                    tracing::warn!("{duplicate}");
                    warnings.push(duplicate);
                }
            }

            entries.push(NpkEntry {
                name,
                offset,
                size,
                table_index,
            });
        }

        let stored: [u8; CHECKSUM_SIZE] = cursor.read_array()?;
        let covered = checksum_coverage(count);
        let computed = Sha256::digest(&data[..covered]);
        let checksum_valid = computed.as_slice() == stored.as_slice();
        if !checksum_valid {
            let mismatch = Error::ChecksumMismatch { covered };
            tracing::warn!("{mismatch}");
            warnings.push(mismatch);
        }

        Ok(Self {
            entries,
            index,
            checksum_valid,
            warnings,
        })
    }

    /// All entries in table order, duplicates included.
    #[must_use]
    pub fn entries(&self) -> &[NpkEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by exact name. Duplicates resolve to the first entry.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&NpkEntry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    /// Look up an entry ignoring ASCII case, preferring an exact match.
    #[must_use]
    pub fn find_ignore_case(&self, name: &str) -> Option<&NpkEntry> {
        self.find(name).or_else(|| {
            self.entries
                .iter()
                .find(|e| e.name.eq_ignore_ascii_case(name))
        })
    }

    /// Whether the stored header checksum matched.
    #[must_use]
    pub fn checksum_valid(&self) -> bool {
        self.checksum_valid
    }

    /// Non-fatal conditions found while parsing.
    #[must_use]
    pub fn warnings(&self) -> &[Error] {
        &self.warnings
    }

    /// Slice an entry's bytes out of the archive buffer.
    ///
    /// # Errors
    /// Returns [`Error::TruncatedData`] (wrapped with the entry name) if the
    /// entry extends past the end of the archive.
    pub fn entry_data<'a>(&self, data: &'a [u8], entry: &NpkEntry) -> Result<&'a [u8]> {
        let start = entry.offset as usize;
        if entry.end() > data.len() as u64 {
            return Err(Error::TruncatedData {
                offset: u64::from(entry.offset),
                needed: u64::from(entry.size),
                available: data.len().saturating_sub(start) as u64,
            }
            .in_entry(&entry.name));
        }
        Ok(&data[start..start + entry.size as usize])
    }
}

/// Decrypt a name field, stopping at the first NUL.
#[must_use]
pub fn decrypt_name(encrypted: &[u8]) -> String {
    let plain: Vec<u8> = encrypted
        .iter()
        .zip(NAME_KEY.iter())
        .map(|(b, k)| b ^ k)
        .take_while(|&b| b != 0)
        .collect();
    String::from_utf8_lossy(&plain).into_owned()
}

/// An NPK loaded into memory together with its parsed table.
#[derive(Debug)]
pub struct NpkFile {
    path: PathBuf,
    data: Vec<u8>,
    archive: NpkArchive,
}

impl NpkFile {
    /// Read and parse an NPK from disk.
    ///
    /// # Errors
    /// Returns [`Error::IoAt`] if the file cannot be read, or any error from
    /// [`NpkArchive::parse`].
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| Error::IoAt {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(path, data)
    }

    /// Parse an NPK that is already in memory.
    ///
    /// # Errors
    /// Any error from [`NpkArchive::parse`].
    pub fn from_bytes(path: impl Into<PathBuf>, data: Vec<u8>) -> Result<Self> {
        let archive = NpkArchive::parse(&data)?;
        Ok(Self {
            path: path.into(),
            data,
            archive,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn archive(&self) -> &NpkArchive {
        &self.archive
    }

    /// Bytes of the named entry.
    ///
    /// # Errors
    /// Returns [`Error::EntryNotFound`] if no entry has this name, or
    /// [`Error::TruncatedData`] if the entry runs past the end of the file.
    pub fn read_entry(&self, name: &str) -> Result<&[u8]> {
        let entry = self
            .archive
            .find(name)
            .ok_or_else(|| Error::EntryNotFound {
                name: name.to_string(),
            })?;
        self.archive.entry_data(&self.data, entry)
    }
}
