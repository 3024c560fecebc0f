//! The ordered, deduplicated store of live warning categories.

use crate::category::CategoryKeyer;
use crate::ignore::{IgnoreMatcher, IgnorePattern};
use crate::ports::{DisableHook, StackPopper};
use crate::subscriptions::{RegistryObserver, Subscription, SubscriptionHub};
use crate::types::{Category, LogCall, Registry};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

struct Inner {
    registry: Registry,
    ignore: IgnoreMatcher,
}

/// Central mutable state: live categories with occurrence counts, the ignore
/// configuration, and the global disable flag.
///
/// Every mutating call that changes registry contents triggers exactly one
/// broadcast of the full updated snapshot. The internal lock is released
/// before broadcasting, so observer callbacks may reenter any public
/// operation here (including logging again) without deadlocking.
pub struct WarningRegistry {
    inner: Mutex<Inner>,
    disabled: AtomicBool,
    keyer: CategoryKeyer,
    hub: SubscriptionHub,
}

impl WarningRegistry {
    pub fn new(popper: Arc<dyn StackPopper>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                registry: Registry::default(),
                ignore: IgnoreMatcher::new(),
            }),
            disabled: AtomicBool::new(false),
            keyer: CategoryKeyer::new(popper),
            hub: SubscriptionHub::new(),
        }
    }

    /// Register one logging call.
    ///
    /// No-op when globally disabled or when the rendered message matches an
    /// ignore pattern; neither case broadcasts. Otherwise the call's category
    /// is upserted (count incremented in place, or inserted at the end with
    /// count 1) and the new snapshot is broadcast once.
    pub fn add(&self, call: &LogCall, frames_to_pop: usize) {
        if self.is_disabled() {
            return;
        }

        let category = self.keyer.key_of(call, frames_to_pop);
        let snapshot = {
            let mut inner = self.inner.lock();
            if inner.ignore.matches(&category.message) {
                return;
            }
            tracing::trace!(warning = %category.message, "warning registered");
            inner.registry.upsert(category);
            inner.registry.clone()
        };
        self.hub.notify(&snapshot);
    }

    /// Remove one category. Absent categories are a silent no-op; only an
    /// actual removal broadcasts.
    pub fn delete(&self, category: &Category) {
        let snapshot = {
            let mut inner = self.inner.lock();
            if !inner.registry.remove(category) {
                return;
            }
            inner.registry.clone()
        };
        self.hub.notify(&snapshot);
    }

    /// Remove every category.
    ///
    /// Always broadcasts, even when the registry was already empty, so
    /// consumers get an explicit "cleared" signal.
    pub fn clear(&self) {
        let snapshot = {
            let mut inner = self.inner.lock();
            inner.registry.clear_all();
            inner.registry.clone()
        };
        self.hub.notify(&snapshot);
    }

    /// Suppress all new registrations. Entries already present stay visible
    /// until explicitly deleted.
    pub fn set_disabled(&self, disabled: bool) {
        self.disabled.store(disabled, Ordering::SeqCst);
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::SeqCst)
    }

    /// Append suppression patterns. Not retroactive: categories already
    /// registered stay registered even if a new pattern matches them.
    pub fn add_ignore_patterns(&self, patterns: impl IntoIterator<Item = IgnorePattern>) {
        self.inner.lock().ignore.add_patterns(patterns);
    }

    /// Current registry contents, for late-joining consumers.
    pub fn snapshot(&self) -> Registry {
        self.inner.lock().registry.clone()
    }

    pub fn hub(&self) -> &SubscriptionHub {
        &self.hub
    }

    /// Convenience passthrough to [`SubscriptionHub::observe`].
    pub fn observe(&self, observer: impl RegistryObserver + 'static) -> Subscription {
        self.hub.observe(observer)
    }
}

impl DisableHook for WarningRegistry {
    fn get(&self) -> bool {
        self.is_disabled()
    }

    fn set(&self, value: bool) {
        self.set_disabled(value);
    }
}
