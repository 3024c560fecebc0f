//! Core types for the warning registry.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque call-site token.
///
/// Produced by the host at the point of a logging call and interpreted only
/// by the [`StackPopper`](crate::ports::StackPopper) implementation; this
/// crate never inspects execution-frame internals itself.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct CallSite(pub u64);

impl fmt::Debug for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CallSite({})", self.0)
    }
}

/// One argument of a logging call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LogArg {
    /// Plain text segment.
    Text(String),
    /// Structured value, stringified deterministically when rendered.
    Structured(serde_json::Value),
}

impl LogArg {
    pub fn text(s: impl Into<String>) -> Self {
        LogArg::Text(s.into())
    }

    /// Render this argument as one segment of the display message.
    pub fn render(&self) -> String {
        match self {
            LogArg::Text(s) => s.clone(),
            LogArg::Structured(value) => value.to_string(),
        }
    }
}

impl From<&str> for LogArg {
    fn from(s: &str) -> Self {
        LogArg::Text(s.to_string())
    }
}

impl From<String> for LogArg {
    fn from(s: String) -> Self {
        LogArg::Text(s)
    }
}

impl From<serde_json::Value> for LogArg {
    fn from(value: serde_json::Value) -> Self {
        LogArg::Structured(value)
    }
}

/// A single intercepted logging call. Immutable once captured.
#[derive(Clone, Debug)]
pub struct LogCall {
    /// Ordered argument segments, mixed text and structured values.
    pub args: Vec<LogArg>,
    /// Call-site context for stack capture.
    pub site: CallSite,
}

impl LogCall {
    pub fn new(args: Vec<LogArg>, site: CallSite) -> Self {
        Self { args, site }
    }
}

/// Deduplication identity for one kind of warning.
///
/// Two logging calls map to the same category iff their rendered message and
/// trimmed stack trace are identical. Equality, hashing, and ordering derive
/// from content alone.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Category {
    /// Human-readable message, joined from the call's argument segments.
    pub message: String,
    /// Formatted stack trace with the interception machinery's frames removed.
    pub stack: String,
}

impl fmt::Debug for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Category({:?})", self.message)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// One live category plus its occurrence count.
///
/// The count is the number of calls that mapped to this category since it was
/// last cleared; it is always at least 1, since a count of zero means the
/// entry was removed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub category: Category,
    pub count: u64,
}

/// Ordered snapshot of live categories, unique by category.
///
/// Insertion order is display order, oldest first. Every broadcast carries a
/// complete snapshot, never a diff, so consumers can treat each one as
/// self-sufficient.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Registry {
    entries: Vec<RegistryEntry>,
}

impl Registry {
    /// Entries in display order.
    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, category: &Category) -> bool {
        self.entries.iter().any(|e| &e.category == category)
    }

    /// Occurrence count for a category, if live.
    pub fn count_of(&self, category: &Category) -> Option<u64> {
        self.entries
            .iter()
            .find(|e| &e.category == category)
            .map(|e| e.count)
    }

    /// Increment in place (order unchanged) or append with count 1.
    pub(crate) fn upsert(&mut self, category: Category) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.category == category) {
            entry.count += 1;
        } else {
            self.entries.push(RegistryEntry { category, count: 1 });
        }
    }

    /// Returns whether the category was present.
    pub(crate) fn remove(&mut self, category: &Category) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| &e.category != category);
        self.entries.len() != before
    }

    pub(crate) fn clear_all(&mut self) {
        self.entries.clear();
    }
}
