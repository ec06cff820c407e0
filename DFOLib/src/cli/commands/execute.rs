//! Command execution implementations

use super::Commands;
use super::{export, frames, list};

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the underlying command fails.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::List {
                source,
                filter,
                count,
                json,
            } => list::execute(source, filter.as_deref(), *count, *json),
            Commands::Frames {
                source,
                entry,
                json,
            } => frames::execute(source, entry, *json),
            Commands::Export {
                source,
                entry,
                output,
                frames,
                all,
                quiet,
                json,
            } => export::execute(source, entry, output, frames, *all, *quiet, *json),
        }
    }
}
