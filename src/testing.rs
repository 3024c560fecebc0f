//! Shared fakes for unit tests.

use crate::ports::{LoggerPort, StackPopper};
use crate::types::{CallSite, LogArg};
use parking_lot::Mutex;

/// Records every request and answers with a deterministic trace, so tests
/// can both assert on frame counts and rely on stable dedup keys.
pub(crate) struct FakePopper {
    pub(crate) requests: Mutex<Vec<(CallSite, usize)>>,
}

impl FakePopper {
    pub(crate) fn new() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn last_frames_to_pop(&self) -> Option<usize> {
        self.requests.lock().last().map(|(_, frames)| *frames)
    }
}

impl StackPopper for FakePopper {
    fn stack_trace(&self, site: CallSite, frames_to_pop: usize) -> String {
        self.requests.lock().push((site, frames_to_pop));
        format!("at site {} (popped {})", site.0, frames_to_pop)
    }
}

/// Captures everything the original logger would have printed.
#[derive(Default)]
pub(crate) struct RecordingPort {
    pub(crate) errors: Mutex<Vec<String>>,
    pub(crate) warns: Mutex<Vec<String>>,
}

impl RecordingPort {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

fn join(args: &[LogArg]) -> String {
    args.iter().map(LogArg::render).collect::<Vec<_>>().join(" ")
}

impl LoggerPort for RecordingPort {
    fn error(&self, args: &[LogArg], _site: CallSite) {
        self.errors.lock().push(join(args));
    }

    fn warn(&self, args: &[LogArg], _site: CallSite) {
        self.warns.lock().push(join(args));
    }
}
