//! Installation and removal of the logging wrappers.
//!
//! The interceptor swaps a wrapping [`LoggerPort`] into the [`Console`]
//! exactly once, captures the original port so uninstall can restore it, and
//! feeds surviving calls into the [`WarningRegistry`]. Wrappers always
//! forward to the original first; interception never hides output from the
//! standard log destination.

use crate::error::{Result, WarnboxError};
use crate::ignore::IgnorePattern;
use crate::ports::{Console, LoggerPort};
use crate::registry::WarningRegistry;
use crate::types::{CallSite, LogArg, LogCall};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

/// Error-class calls register a warning only when their first argument is
/// textual and starts with this sentinel, which distinguishes genuine
/// validation warnings from generic errors.
pub const WARNING_PREFIX: &str = "Warning: ";

/// Leading stack frames contributed by the interception machinery itself:
/// the registration helper, the installed wrapper, and the logging entry
/// point. A devtools-style wrapper on the warn port adds one more.
pub const BASE_FRAMES_TO_POP: usize = 3;

/// Interceptor configuration.
#[derive(Clone, Debug, Default)]
pub struct InterceptorConfig {
    /// Host-supplied "automated test run" signal. When true, install forces
    /// the disable flag on so test output stays free of registrations.
    pub is_test_run: bool,
}

/// How many leading frames to discard for a registration happening now.
///
/// Queried against the console's *current* warn port on every call, never
/// cached: a devtools-style wrapper can be installed or removed by unrelated
/// code between calls.
fn frames_to_pop_via(console: &Weak<Console>) -> usize {
    let wrapped = console
        .upgrade()
        .map(|c| c.current_port().devtools_wrapped())
        .unwrap_or(false);
    if wrapped {
        BASE_FRAMES_TO_POP + 1
    } else {
        BASE_FRAMES_TO_POP
    }
}

/// The wrapper swapped in by `install()`.
struct InterceptingPort {
    original: Arc<dyn LoggerPort>,
    console: Weak<Console>,
    registry: Arc<WarningRegistry>,
}

impl InterceptingPort {
    fn register(&self, args: &[LogArg], site: CallSite) {
        let call = LogCall::new(args.to_vec(), site);
        self.registry.add(&call, frames_to_pop_via(&self.console));
    }
}

impl LoggerPort for InterceptingPort {
    fn error(&self, args: &[LogArg], site: CallSite) {
        self.original.error(args, site);
        if let Some(LogArg::Text(first)) = args.first() {
            if first.starts_with(WARNING_PREFIX) {
                self.register(args, site);
            }
        }
    }

    fn warn(&self, args: &[LogArg], site: CallSite) {
        self.original.warn(args, site);
        self.register(args, site);
    }
}

/// Installs and removes the wrapping of the console's logging entry points.
///
/// Two states, uninstalled and installed; `install`/`uninstall` are both
/// idempotent, so double-install never double-wraps.
pub struct LogInterceptor {
    console: Arc<Console>,
    registry: Arc<WarningRegistry>,
    config: InterceptorConfig,
    /// `Some` iff installed; holds the port captured at install time.
    original: Mutex<Option<Arc<dyn LoggerPort>>>,
}

impl LogInterceptor {
    pub fn new(
        console: Arc<Console>,
        registry: Arc<WarningRegistry>,
        config: InterceptorConfig,
    ) -> Self {
        Self {
            console,
            registry,
            config,
            original: Mutex::new(None),
        }
    }

    /// Wrap the console's entry points and wire the collaborators.
    ///
    /// Captures the current port, swaps in the wrapper, routes the console's
    /// disable flag through the registry (honoring a pre-set `true`), forces
    /// the flag on for test runs, and hooks the log bridge so side-channel
    /// warnings register too. Idempotent.
    pub fn install(&self) {
        let mut original = self.original.lock();
        if original.is_some() {
            return;
        }

        let previous = self.console.current_port();
        let wrapper = Arc::new(InterceptingPort {
            original: previous.clone(),
            console: Arc::downgrade(&self.console),
            registry: self.registry.clone(),
        });
        self.console.swap_port(wrapper);

        self.console.install_disable_hook(self.registry.clone());
        if self.config.is_test_run {
            self.console.set_disabled(true);
        }

        let registry = self.registry.clone();
        let console = Arc::downgrade(&self.console);
        self.console
            .bridge()
            .set_warning_handler(Some(Arc::new(move |args: &[LogArg], site: CallSite| {
                let call = LogCall::new(args.to_vec(), site);
                registry.add(&call, frames_to_pop_via(&console));
            })));

        *original = Some(previous);
        tracing::debug!("log interception installed");
    }

    /// Restore the port captured at install time, revert the disable flag to
    /// a plain value, and disconnect the bridge handler, so post-uninstall
    /// logging has no registration side effects. Idempotent.
    pub fn uninstall(&self) {
        let mut original = self.original.lock();
        let Some(previous) = original.take() else {
            return;
        };

        self.console.swap_port(previous);
        self.console.remove_disable_hook();
        self.console.bridge().set_warning_handler(None);
        tracing::debug!("log interception uninstalled");
    }

    pub fn is_installed(&self) -> bool {
        self.original.lock().is_some()
    }

    /// The frame-skip count a registration would use right now.
    ///
    /// Fails before `install()`: frame accounting only makes sense once the
    /// wrapper is in place, and asking earlier means the host wiring is
    /// incomplete.
    pub fn frames_to_pop(&self) -> Result<usize> {
        if self.original.lock().is_none() {
            return Err(WarnboxError::NotInstalled);
        }
        Ok(frames_to_pop_via(&Arc::downgrade(&self.console)))
    }

    /// Extend the suppression configuration. Usable before or after install.
    pub fn ignore_warnings(&self, patterns: impl IntoIterator<Item = IgnorePattern>) {
        self.registry.add_ignore_patterns(patterns);
    }
}
