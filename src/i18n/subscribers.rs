// src/i18n/subscribers.rs  —  Live UI text sinks refreshed on language change
use std::sync::{Arc, Mutex, PoisonError, Weak};

/// A UI text sink that re-resolves its text when told to.
pub trait Subscriber: Send + Sync {
    fn refresh(&self);
}

/// Non-owning list of subscribers.
///
/// The registry only holds `Weak` handles: a sink dropped by its owner is
/// treated as already unregistered and is pruned on the next `notify_all`.
#[derive(Default)]
pub struct SubscriberRegistry {
    entries: Mutex<Vec<Weak<dyn Subscriber>>>,
}

impl SubscriberRegistry {
    pub fn new() -> Self { Self::default() }

    /// Returns `false` if `sub` was already registered.
    pub fn register<S: Subscriber + 'static>(&self, sub: &Arc<S>) -> bool {
        self.insert(downgrade(sub))
    }

    /// [`Self::register`] for hosts that already hold a trait object.
    pub fn register_dyn(&self, sub: &Arc<dyn Subscriber>) -> bool {
        self.insert(Arc::downgrade(sub))
    }

    /// Returns `false` if `sub` was not registered.
    pub fn unregister<S: Subscriber + 'static>(&self, sub: &Arc<S>) -> bool {
        self.remove(&downgrade(sub))
    }

    pub fn unregister_dyn(&self, sub: &Arc<dyn Subscriber>) -> bool {
        self.remove(&Arc::downgrade(sub))
    }

    pub fn contains<S: Subscriber + 'static>(&self, sub: &Arc<S>) -> bool {
        let weak = downgrade(sub);
        self.lock().iter().any(|w| same_target(w, &weak))
    }

    fn insert(&self, weak: Weak<dyn Subscriber>) -> bool {
        let mut entries = self.lock();
        if entries.iter().any(|w| same_target(w, &weak)) {
            return false;
        }
        entries.push(weak);
        true
    }

    fn remove(&self, weak: &Weak<dyn Subscriber>) -> bool {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|w| !same_target(w, weak));
        entries.len() != before
    }

    /// Drop entries whose subscriber no longer exists. Returns how many went.
    pub fn prune(&self) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|w| w.strong_count() > 0);
        before - entries.len()
    }

    /// Prune, then call `refresh` on every live subscriber.
    ///
    /// Callbacks run after the registry lock is released, so a subscriber
    /// may register, unregister or drop others from inside `refresh`.
    /// Returns the number of subscribers refreshed.
    pub fn notify_all(&self) -> usize {
        let (live, pruned) = {
            let mut entries = self.lock();
            let before = entries.len();
            let mut live: Vec<Arc<dyn Subscriber>> = Vec::with_capacity(before);
            entries.retain(|w| match w.upgrade() {
                Some(s) => { live.push(s); true }
                None    => false,
            });
            (live, before - entries.len())
        };
        if pruned > 0 {
            log::debug!("[subscribers] pruned {pruned} stale subscriber(s)");
        }
        for s in &live {
            s.refresh();
        }
        live.len()
    }

    pub fn len(&self) -> usize { self.lock().len() }
    pub fn is_empty(&self) -> bool { self.lock().is_empty() }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Weak<dyn Subscriber>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// unsize after downgrading; `Arc::downgrade` itself cannot coerce `&Arc<S>`
fn downgrade<S: Subscriber + 'static>(sub: &Arc<S>) -> Weak<dyn Subscriber> {
    let weak: Weak<S> = Arc::downgrade(sub);
    weak
}

fn same_target(a: &Weak<dyn Subscriber>, b: &Weak<dyn Subscriber>) -> bool {
    std::ptr::eq(a.as_ptr() as *const (), b.as_ptr() as *const ())
}
