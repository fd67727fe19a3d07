use std::sync::{Arc, RwLock};

pub type ChangeListener = Arc<dyn Fn() + Send + Sync>;

/// Append-only list of zero-argument listeners.
///
/// Clones share the same registrations. `trigger` snapshots the list before
/// calling out, so listeners may register further listeners or mutate the
/// field that owns the notifier; those calls recurse synchronously.
#[derive(Clone, Default)]
pub struct ChangeNotifier {
    listeners: Arc<RwLock<Vec<ChangeListener>>>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, listener: impl Fn() + Send + Sync + 'static) {
        self.add_shared(Arc::new(listener));
    }

    pub fn add_shared(&self, listener: ChangeListener) {
        let mut listeners = match self.listeners.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        listeners.push(listener);
    }

    /// Calls every listener in registration order. A panicking listener is
    /// not caught, so the listeners after it do not run.
    pub fn trigger(&self) {
        let listeners = {
            let guard = match self.listeners.read() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            guard.clone()
        };
        tracing::trace!(listeners = listeners.len(), "triggering change listeners");
        for listener in listeners {
            listener();
        }
    }

    pub fn len(&self) -> usize {
        match self.listeners.read() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{AssertUnwindSafe, catch_unwind};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn trigger_runs_listeners_in_registration_order() {
        let notifier = ChangeNotifier::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for index in 0..3 {
            let order = order.clone();
            notifier.add(move || order.lock().expect("order lock").push(index));
        }

        notifier.trigger();
        assert_eq!(*order.lock().expect("order lock"), vec![0, 1, 2]);
    }

    #[test]
    fn duplicate_registrations_fire_each_time() {
        let notifier = ChangeNotifier::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let listener: ChangeListener = {
            let calls = calls.clone();
            Arc::new(move || {
                calls.fetch_add(1, Ordering::SeqCst);
            })
        };
        notifier.add_shared(listener.clone());
        notifier.add_shared(listener);

        notifier.trigger();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(notifier.len(), 2);
    }

    #[test]
    fn listener_may_register_listener_while_triggering() {
        let notifier = ChangeNotifier::new();
        let inner = notifier.clone();
        notifier.add(move || inner.add(|| {}));

        notifier.trigger();
        assert_eq!(notifier.len(), 2);
        notifier.trigger();
        assert_eq!(notifier.len(), 3);
    }

    #[test]
    fn panicking_listener_stops_remaining_listeners() {
        let notifier = ChangeNotifier::new();
        let calls = Arc::new(AtomicUsize::new(0));
        notifier.add(|| panic!("listener failure"));
        {
            let calls = calls.clone();
            notifier.add(move || {
                calls.fetch_add(1, Ordering::SeqCst);
            });
        }

        let result = catch_unwind(AssertUnwindSafe(|| notifier.trigger()));
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
