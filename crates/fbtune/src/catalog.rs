//! Named catalog of known-good display timing presets.

use crate::error::{ModeError, Result};
use crate::mode::{ModeRecord, VideoMode};

/// Insertion-ordered collection of named [`VideoMode`] entries.
///
/// Built once per run from parsed mode-database records and never
/// persisted. Names are unique; lookups are exact, case-sensitive matches.
#[derive(Debug, Default)]
pub struct ModeCatalog {
    modes: Vec<VideoMode>,
}

impl ModeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    /// Construct a mode from `record` and insert it, rates populated.
    ///
    /// Fails if a mode of that name is already catalogued or if the
    /// scan-rate derivation rejects the record's timings. Either failure
    /// poisons the whole catalog build; callers must not continue with a
    /// partial catalog.
    pub fn add(&mut self, record: &ModeRecord) -> Result<()> {
        if self.find(&record.name).is_some() {
            return Err(ModeError::DuplicateModeName(record.name.clone()));
        }
        let mut mode = VideoMode::from_record(record);
        if !mode.update_rates() {
            return Err(ModeError::InvalidMode {
                name: Some(record.name.clone()),
            });
        }
        self.modes.push(mode);
        Ok(())
    }

    /// Exact-name lookup. Given the uniqueness invariant the first match is
    /// the only one.
    pub fn find(&self, name: &str) -> Option<&VideoMode> {
        self.modes.iter().find(|m| m.name.as_deref() == Some(name))
    }
}
