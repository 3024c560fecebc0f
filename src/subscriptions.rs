//! Fan-out broadcasting of registry snapshots to observers.
//!
//! Observers register through [`SubscriptionHub::observe`] and receive every
//! subsequent snapshot until their [`Subscription`] is cancelled. Delivery is
//! synchronous on the mutating caller's context; there is no buffering or
//! coalescing here, so one `notify` means one delivery per active observer.

use crate::types::Registry;
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

/// Receives registry snapshots. Blanket-implemented for closures.
pub trait RegistryObserver: Send + Sync {
    fn on_change(&self, snapshot: &Registry);
}

impl<F> RegistryObserver for F
where
    F: Fn(&Registry) + Send + Sync,
{
    fn on_change(&self, snapshot: &Registry) {
        self(snapshot)
    }
}

/// Unique identifier for a subscription.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

impl fmt::Debug for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubscriptionId({})", self.0)
    }
}

struct ObserverSlot {
    id: SubscriptionId,
    /// Shared with the Subscription handle; flipped off on cancellation.
    live: Arc<AtomicBool>,
    observer: Arc<dyn RegistryObserver>,
}

type ObserverSet = Mutex<Vec<ObserverSlot>>;

/// Broadcasts registry snapshots to all current observers.
///
/// The observer set is process-lived state; individual observers come and go
/// via their subscriptions.
#[derive(Default)]
pub struct SubscriptionHub {
    observers: Arc<ObserverSet>,
    next_id: AtomicU64,
}

impl SubscriptionHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer.
    ///
    /// The first delivery occurs on the next registry change; current state
    /// is not replayed at subscribe time. Late joiners that need it can pull
    /// a snapshot from the registry directly.
    pub fn observe(&self, observer: impl RegistryObserver + 'static) -> Subscription {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let live = Arc::new(AtomicBool::new(true));
        self.observers.lock().push(ObserverSlot {
            id,
            live: live.clone(),
            observer: Arc::new(observer),
        });
        tracing::trace!(id = id.0, "observer subscribed");
        Subscription {
            id,
            live,
            observers: Arc::downgrade(&self.observers),
        }
    }

    /// Channel-flavored observer: snapshots are cloned into an unbounded
    /// channel for consumers that prefer draining to callbacks.
    pub fn observe_channel(&self) -> (Subscription, crossbeam_channel::Receiver<Registry>) {
        let (sender, receiver) = crossbeam_channel::unbounded();
        let subscription = self.observe(move |snapshot: &Registry| {
            // Receiver may be gone; delivery is best effort.
            let _ = sender.send(snapshot.clone());
        });
        (subscription, receiver)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.lock().len()
    }

    /// Deliver `snapshot` to every live observer, in subscription order.
    ///
    /// Iterates over a stable copy of the observer set taken up front, so
    /// observers may subscribe, unsubscribe, or mutate the registry (which
    /// reenters `notify`) during delivery without corrupting iteration.
    pub fn notify(&self, snapshot: &Registry) {
        let targets: Vec<(Arc<AtomicBool>, Arc<dyn RegistryObserver>)> = self
            .observers
            .lock()
            .iter()
            .map(|slot| (slot.live.clone(), slot.observer.clone()))
            .collect();

        for (live, observer) in targets {
            if live.load(Ordering::SeqCst) {
                observer.on_change(snapshot);
            }
        }
    }
}

/// Cancellable handle for one observer registration.
///
/// Dropping the handle does not unsubscribe; cancellation is explicit.
pub struct Subscription {
    id: SubscriptionId,
    live: Arc<AtomicBool>,
    observers: Weak<ObserverSet>,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn is_cancelled(&self) -> bool {
        !self.live.load(Ordering::SeqCst)
    }

    /// Cancel this subscription. Permanent and idempotent; the observer
    /// receives no further broadcasts once this returns.
    pub fn unsubscribe(&self) {
        if self.live.swap(false, Ordering::SeqCst) {
            if let Some(observers) = self.observers.upgrade() {
                observers.lock().retain(|slot| slot.id != self.id);
            }
            tracing::trace!(id = self.id.0, "observer unsubscribed");
        }
    }
}
