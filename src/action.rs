//! Entry/exit side effects

use std::sync::Arc;

/// A zero-argument side effect run when a state is entered or exited.
///
/// Any `Fn() + Send + Sync` closure is an action, so collaborators usually
/// just pass a closure capturing whatever they need (a cursor, a token sink,
/// a [`Controller`](crate::Controller) to stage the next event).
pub trait Action: Send + Sync {
    /// Run the side effect.
    fn invoke(&self);
}

impl<F> Action for F
where
    F: Fn() + Send + Sync,
{
    fn invoke(&self) {
        self()
    }
}

/// Shared, type-erased action as stored in the state graph
pub(crate) type SharedAction = Arc<dyn Action>;

pub(crate) fn share<A>(action: A) -> SharedAction
where
    A: Action + 'static,
{
    Arc::new(action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counter(AtomicUsize);

    impl Action for Counter {
        fn invoke(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_closure_is_action() {
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_clone = Arc::clone(&hits);
        let action = share(move || {
            hits_clone.fetch_add(1, Ordering::SeqCst);
        });

        action.invoke();
        action.invoke();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_custom_action_type() {
        let counter = Arc::new(Counter(AtomicUsize::new(0)));
        let action: SharedAction = counter.clone();
        action.invoke();
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);
    }
}
