//! Category derivation: turning a logging call into its dedup identity.

use crate::ports::StackPopper;
use crate::types::{Category, LogArg, LogCall};
use std::sync::Arc;

/// Derives a [`Category`] from a logging call's arguments and its
/// frame-trimmed stack trace.
///
/// Pure in its inputs: identical arguments and an identical trimmed stack
/// always yield categories that compare equal.
pub struct CategoryKeyer {
    popper: Arc<dyn StackPopper>,
}

impl CategoryKeyer {
    pub fn new(popper: Arc<dyn StackPopper>) -> Self {
        Self { popper }
    }

    /// Join the call's segments into the display message and pair it with the
    /// stack trace for the call site, `frames_to_pop` leading frames removed.
    ///
    /// A zero-argument call yields an empty message; the category is then
    /// keyed solely by the trace.
    pub fn key_of(&self, call: &LogCall, frames_to_pop: usize) -> Category {
        let message = call
            .args
            .iter()
            .map(LogArg::render)
            .collect::<Vec<_>>()
            .join(" ");
        let stack = self.popper.stack_trace(call.site, frames_to_pop);
        Category { message, stack }
    }
}
