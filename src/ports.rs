//! Collaborator ports: the logging surface, the stack formatter, and the
//! host's side-channel warning bridge.
//!
//! The process's mutable error/warn entry points are modeled as an explicit
//! [`LoggerPort`] held by a [`Console`] with swap-in/swap-out semantics,
//! rather than ambient global state. The interceptor captures the original
//! port at install time and restores exactly that port on uninstall.

use crate::types::{CallSite, LogArg};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

/// Formats a stack trace for a call site.
///
/// `frames_to_pop` leading frames are removed as interception-machinery
/// noise. Implementations may panic on malfunction; failures propagate to the
/// logging caller rather than being swallowed here.
pub trait StackPopper: Send + Sync {
    fn stack_trace(&self, site: CallSite, frames_to_pop: usize) -> String;
}

/// A destination for error-class and warn-class reports.
pub trait LoggerPort: Send + Sync {
    fn error(&self, args: &[LogArg], site: CallSite);
    fn warn(&self, args: &[LogArg], site: CallSite);

    /// Whether this port declares itself as a devtools-style wrapper around
    /// the warn-class entry point. Such a wrapper contributes one extra
    /// non-meaningful stack frame that frame accounting must discard.
    fn devtools_wrapped(&self) -> bool {
        false
    }
}

/// Backing for the console's disable flag once interception is installed.
pub trait DisableHook: Send + Sync {
    fn get(&self) -> bool;
    fn set(&self, value: bool);
}

/// Handler invoked when the host emits a warning through the side channel.
pub type BridgeHandler = Arc<dyn Fn(&[LogArg], CallSite) + Send + Sync>;

/// Single-callback registration point for the host's separate warning
/// channel. The interceptor wires its handler in during install.
#[derive(Default)]
pub struct LogBridge {
    handler: Mutex<Option<BridgeHandler>>,
}

impl LogBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current handler; `None` disconnects it.
    pub fn set_warning_handler(&self, handler: Option<BridgeHandler>) {
        *self.handler.lock() = handler;
    }

    /// Called by the host whenever it emits a warning through this channel.
    pub fn emit_warning(&self, args: &[LogArg], site: CallSite) {
        let handler = self.handler.lock().clone();
        if let Some(handler) = handler {
            handler(args, site);
        }
    }

    pub fn has_handler(&self) -> bool {
        self.handler.lock().is_some()
    }
}

enum FlagState {
    /// Plain boolean, used before any hook is installed.
    Plain(bool),
    /// Reads and writes route through the hook.
    Hooked(Arc<dyn DisableHook>),
}

/// Process-wide logging facade.
///
/// Holds the currently active [`LoggerPort`], the boolean disable flag, and
/// the [`LogBridge`]. `error`/`warn` dispatch to the current port without
/// holding any lock across the call, so ports may themselves log or swap
/// ports reentrantly.
pub struct Console {
    port: RwLock<Arc<dyn LoggerPort>>,
    flag: RwLock<FlagState>,
    bridge: LogBridge,
}

impl Console {
    pub fn new(port: Arc<dyn LoggerPort>) -> Self {
        Self {
            port: RwLock::new(port),
            flag: RwLock::new(FlagState::Plain(false)),
            bridge: LogBridge::new(),
        }
    }

    /// Report an error-class diagnostic.
    pub fn error(&self, args: &[LogArg], site: CallSite) {
        let port = self.port.read().clone();
        port.error(args, site);
    }

    /// Report a warn-class diagnostic.
    pub fn warn(&self, args: &[LogArg], site: CallSite) {
        let port = self.port.read().clone();
        port.warn(args, site);
    }

    /// The currently active port.
    pub fn current_port(&self) -> Arc<dyn LoggerPort> {
        self.port.read().clone()
    }

    /// Swap in a new port, returning the one it replaces.
    pub fn swap_port(&self, port: Arc<dyn LoggerPort>) -> Arc<dyn LoggerPort> {
        std::mem::replace(&mut *self.port.write(), port)
    }

    /// Current value of the disable flag.
    pub fn disabled(&self) -> bool {
        match &*self.flag.read() {
            FlagState::Plain(value) => *value,
            FlagState::Hooked(hook) => hook.get(),
        }
    }

    /// Write the disable flag; routed through the hook when one is installed.
    pub fn set_disabled(&self, value: bool) {
        let hook = {
            let mut flag = self.flag.write();
            match &mut *flag {
                FlagState::Plain(v) => {
                    *v = value;
                    None
                }
                FlagState::Hooked(hook) => Some(hook.clone()),
            }
        };
        if let Some(hook) = hook {
            hook.set(value);
        }
    }

    /// Route future flag reads/writes through `hook`.
    ///
    /// Idempotent: a no-op when a hook is already installed. A pre-set plain
    /// `true` is propagated into the hook before routing begins.
    pub fn install_disable_hook(&self, hook: Arc<dyn DisableHook>) {
        let mut flag = self.flag.write();
        if let FlagState::Plain(preset) = *flag {
            if preset {
                hook.set(true);
            }
            *flag = FlagState::Hooked(hook);
        }
    }

    /// Revert the flag to a plain value, keeping whatever the hook last held.
    pub fn remove_disable_hook(&self) {
        let mut flag = self.flag.write();
        if let FlagState::Hooked(hook) = &*flag {
            let value = hook.get();
            *flag = FlagState::Plain(value);
        }
    }

    pub fn bridge(&self) -> &LogBridge {
        &self.bridge
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    struct CountingPort {
        errors: AtomicUsize,
        warns: AtomicUsize,
    }

    impl CountingPort {
        fn new() -> Self {
            Self {
                errors: AtomicUsize::new(0),
                warns: AtomicUsize::new(0),
            }
        }
    }

    impl LoggerPort for CountingPort {
        fn error(&self, _args: &[LogArg], _site: CallSite) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }

        fn warn(&self, _args: &[LogArg], _site: CallSite) {
            self.warns.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct FlagHook(AtomicBool);

    impl DisableHook for FlagHook {
        fn get(&self) -> bool {
            self.0.load(Ordering::SeqCst)
        }

        fn set(&self, value: bool) {
            self.0.store(value, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_console_dispatches_to_current_port() {
        let port = Arc::new(CountingPort::new());
        let console = Console::new(port.clone());

        console.error(&[LogArg::text("e")], CallSite(1));
        console.warn(&[LogArg::text("w")], CallSite(1));
        console.warn(&[LogArg::text("w")], CallSite(1));

        assert_eq!(port.errors.load(Ordering::SeqCst), 1);
        assert_eq!(port.warns.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_swap_port_returns_previous() {
        let first = Arc::new(CountingPort::new());
        let second = Arc::new(CountingPort::new());
        let console = Console::new(first.clone());

        let previous = console.swap_port(second.clone());
        console.warn(&[], CallSite(0));

        assert_eq!(first.warns.load(Ordering::SeqCst), 0);
        assert_eq!(second.warns.load(Ordering::SeqCst), 1);
        previous.warn(&[], CallSite(0));
        assert_eq!(first.warns.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_disable_flag_routes_through_hook() {
        let console = Console::new(Arc::new(CountingPort::new()));
        let hook = Arc::new(FlagHook(AtomicBool::new(false)));

        console.set_disabled(true);
        console.install_disable_hook(hook.clone());
        // Pre-set value propagated into the hook.
        assert!(hook.get());
        assert!(console.disabled());

        console.set_disabled(false);
        assert!(!hook.get());

        console.remove_disable_hook();
        assert!(!console.disabled());
    }

    #[test]
    fn test_install_disable_hook_is_idempotent() {
        let console = Console::new(Arc::new(CountingPort::new()));
        let first = Arc::new(FlagHook(AtomicBool::new(false)));
        let second = Arc::new(FlagHook(AtomicBool::new(false)));

        console.install_disable_hook(first.clone());
        console.install_disable_hook(second.clone());

        console.set_disabled(true);
        assert!(first.get());
        assert!(!second.get());
    }

    #[test]
    fn test_bridge_invokes_handler_when_present() {
        let bridge = LogBridge::new();
        let hits = Arc::new(AtomicUsize::new(0));

        bridge.emit_warning(&[LogArg::text("dropped")], CallSite(0));
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        let counter = hits.clone();
        bridge.set_warning_handler(Some(Arc::new(move |_args: &[LogArg], _site: CallSite| {
            counter.fetch_add(1, Ordering::SeqCst);
        })));
        bridge.emit_warning(&[LogArg::text("seen")], CallSite(0));
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        bridge.set_warning_handler(None);
        bridge.emit_warning(&[LogArg::text("dropped again")], CallSite(0));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
