//! # Warnbox
//!
//! Intercepts a process's diagnostic logging calls, deduplicates them into
//! warning categories, and republishes the live set to observers so a
//! presentation layer can display and dismiss them.
//!
//! ## Core Concepts
//!
//! - **Interception**: the [`LogInterceptor`] wraps the [`Console`]'s
//!   error/warn entry points exactly once, always forwarding to the original
//!   logger before registering anything
//! - **Categories**: a warning's identity is its rendered message plus its
//!   frame-trimmed stack trace; repeat calls increment a count instead of
//!   adding entries
//! - **Registry**: ordered, deduplicated store of live categories, oldest
//!   first
//! - **Subscriptions**: every mutation broadcasts one complete snapshot to
//!   all current observers
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use warnbox::{Console, InterceptorConfig, LogInterceptor, WarningRegistry};
//!
//! let console = Arc::new(Console::new(host_logger));
//! let registry = Arc::new(WarningRegistry::new(stack_popper));
//! let interceptor = LogInterceptor::new(console.clone(), registry.clone(),
//!     InterceptorConfig::default());
//! interceptor.install();
//!
//! let subscription = registry.observe(|snapshot| render(snapshot));
//!
//! // Elsewhere in the host...
//! console.warn(&[warnbox::LogArg::text("Each child needs a key")], site);
//!
//! subscription.unsubscribe();
//! ```

pub mod category;
pub mod error;
pub mod ignore;
pub mod interceptor;
pub mod ports;
pub mod registry;
pub mod subscriptions;
#[cfg(test)]
pub(crate) mod testing;
pub mod types;

// Re-exports
pub use category::CategoryKeyer;
pub use error::{Result, WarnboxError};
pub use ignore::{IgnoreMatcher, IgnorePattern};
pub use interceptor::{
    InterceptorConfig, LogInterceptor, BASE_FRAMES_TO_POP, WARNING_PREFIX,
};
pub use ports::{BridgeHandler, Console, DisableHook, LogBridge, LoggerPort, StackPopper};
pub use registry::WarningRegistry;
pub use subscriptions::{RegistryObserver, Subscription, SubscriptionHub, SubscriptionId};
pub use types::{CallSite, Category, LogArg, LogCall, Registry, RegistryEntry};
