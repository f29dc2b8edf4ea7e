//! Log entry structure

use super::caller::CallSite;
use super::level::Level;
use super::value::{FieldValue, Fields};

/// One log occurrence
///
/// Fully populated before any handler sees it and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    level: Level,
    message: FieldValue,
    fields: Fields,
    call_site: CallSite,
}

impl Entry {
    /// Create an entry located at the caller
    #[track_caller]
    pub fn new(level: Level, message: impl Into<FieldValue>) -> Self {
        Self {
            level,
            message: message.into(),
            fields: Fields::new(),
            call_site: CallSite::capture(),
        }
    }

    #[must_use]
    pub fn with_fields(mut self, fields: Fields) -> Self {
        self.fields.merge(fields);
        self
    }

    #[must_use]
    pub fn with_call_site(mut self, call_site: CallSite) -> Self {
        self.call_site = call_site;
        self
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn message(&self) -> &FieldValue {
        &self.message
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn call_site(&self) -> CallSite {
        self.call_site
    }
}

/// Assembles an [`Entry`] from the pieces gathered during one `log` call
pub trait EntryBuilder: Send + Sync {
    fn build(
        &self,
        level: Level,
        message: FieldValue,
        hook_fields: Fields,
        fields: Fields,
        call_site: CallSite,
    ) -> Entry;
}

/// Hook fields first, explicit fields override them
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeEntryBuilder;

impl EntryBuilder for MergeEntryBuilder {
    fn build(
        &self,
        level: Level,
        message: FieldValue,
        mut hook_fields: Fields,
        fields: Fields,
        call_site: CallSite,
    ) -> Entry {
        hook_fields.merge(fields);
        Entry {
            level,
            message,
            fields: hook_fields,
            call_site,
        }
    }
}
