//! Temporary overrides with guaranteed restoration.
//!
//! [`StateContext`] applies a set of key/value overrides to any
//! [`ContextTarget`] and puts the previous values back when the guard is
//! dropped, whether the scope ends normally, through `?`, or by unwinding.
//! Keys that did not exist before the context are removed again.
//!
//! Entry and exit are serialized by one process-wide reentrant lock, so a
//! thread may nest contexts freely while other threads wait. The lock only
//! covers context application; plain assignments made outside a context are
//! not serialized against it.

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use std::collections::HashMap;
use std::hash::BuildHasher;
use tracing::trace;

use crate::error::Result;

static CONTEXT_LOCK: ReentrantMutex<()> = parking_lot::const_reentrant_mutex(());

/// Acquire the lock shared by every context and by global rc updates.
pub(crate) fn lock_contexts() -> ReentrantMutexGuard<'static, ()> {
    CONTEXT_LOCK.lock()
}

/// Something that can be temporarily overridden key by key
pub trait ContextTarget {
    type Value: Clone;

    /// Current value of `key`, or `None` if it is absent
    fn lookup(&self, key: &str) -> Option<Self::Value>;

    /// Set `key`, validating as the target sees fit
    fn apply(&mut self, key: &str, value: Self::Value) -> Result<()>;

    /// Put back a value captured by [`lookup`](ContextTarget::lookup);
    /// `None` means the key has to be removed.
    fn restore(&mut self, key: &str, previous: Option<Self::Value>);
}

impl<T: ContextTarget + ?Sized> ContextTarget for &mut T {
    type Value = T::Value;

    fn lookup(&self, key: &str) -> Option<Self::Value> {
        (**self).lookup(key)
    }

    fn apply(&mut self, key: &str, value: Self::Value) -> Result<()> {
        (**self).apply(key, value)
    }

    fn restore(&mut self, key: &str, previous: Option<Self::Value>) {
        (**self).restore(key, previous)
    }
}

impl<V: Clone, S: BuildHasher> ContextTarget for HashMap<String, V, S> {
    type Value = V;

    fn lookup(&self, key: &str) -> Option<V> {
        self.get(key).cloned()
    }

    fn apply(&mut self, key: &str, value: V) -> Result<()> {
        self.insert(key.to_string(), value);
        Ok(())
    }

    fn restore(&mut self, key: &str, previous: Option<V>) {
        match previous {
            Some(value) => {
                self.insert(key.to_string(), value);
            }
            None => {
                self.remove(key);
            }
        }
    }
}

impl<V: Clone, S: BuildHasher> ContextTarget for indexmap::IndexMap<String, V, S> {
    type Value = V;

    fn lookup(&self, key: &str) -> Option<V> {
        self.get(key).cloned()
    }

    fn apply(&mut self, key: &str, value: V) -> Result<()> {
        self.insert(key.to_string(), value);
        Ok(())
    }

    fn restore(&mut self, key: &str, previous: Option<V>) {
        match previous {
            Some(value) => {
                self.insert(key.to_string(), value);
            }
            None => {
                self.shift_remove(key);
            }
        }
    }
}

/// Guard holding a set of applied overrides.
///
/// Dropping the guard restores every overridden key in reverse order and
/// then releases the context lock.
#[must_use = "the overrides are reverted as soon as the context is dropped"]
pub struct StateContext<T: ContextTarget> {
    target: T,
    saved: Vec<(String, Option<T::Value>)>,
    // Declared last so it is released after the restore in `Drop`.
    _lock: ReentrantMutexGuard<'static, ()>,
}

impl<T: ContextTarget> StateContext<T> {
    /// Apply `overrides` to `target`.
    ///
    /// If any override is rejected, the ones already applied are rolled back
    /// before the error is returned.
    pub fn enter<I, K>(mut target: T, overrides: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, T::Value)>,
        K: Into<String>,
    {
        let lock = lock_contexts();
        let overrides: Vec<(String, T::Value)> =
            overrides.into_iter().map(|(k, v)| (k.into(), v)).collect();

        let mut saved: Vec<(String, Option<T::Value>)> = Vec::with_capacity(overrides.len());
        for (key, _) in &overrides {
            if !saved.iter().any(|(k, _)| k == key) {
                saved.push((key.clone(), target.lookup(key)));
            }
        }

        for (key, value) in overrides {
            if let Err(err) = target.apply(&key, value) {
                trace!(key = %key, "Context override rejected, rolling back");
                rollback(&mut target, &mut saved);
                return Err(err);
            }
        }

        trace!(keys = saved.len(), "Entered context");
        Ok(Self {
            target,
            saved,
            _lock: lock,
        })
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    /// Keys overridden by this context, in application order
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.saved.iter().map(|(k, _)| k.as_str())
    }

    /// Leave the context explicitly; same as dropping it.
    pub fn exit(self) {}
}

fn rollback<T: ContextTarget>(target: &mut T, saved: &mut Vec<(String, Option<T::Value>)>) {
    while let Some((key, previous)) = saved.pop() {
        target.restore(&key, previous);
    }
}

impl<T: ContextTarget> Drop for StateContext<T> {
    fn drop(&mut self) {
        rollback(&mut self.target, &mut self.saved);
        trace!("Exited context");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlotError;

    /// Map that refuses negative values
    #[derive(Default)]
    struct Positive(HashMap<String, i64>);

    impl ContextTarget for Positive {
        type Value = i64;

        fn lookup(&self, key: &str) -> Option<i64> {
            self.0.get(key).copied()
        }

        fn apply(&mut self, key: &str, value: i64) -> Result<()> {
            if value < 0 {
                return Err(PlotError::InvalidValue {
                    key: key.to_string(),
                    value: value.to_string(),
                    expected: "a positive number".to_string(),
                });
            }
            self.0.insert(key.to_string(), value);
            Ok(())
        }

        fn restore(&mut self, key: &str, previous: Option<i64>) {
            match previous {
                Some(v) => self.0.insert(key.to_string(), v),
                None => self.0.remove(key),
            };
        }
    }

    #[test]
    fn test_restores_and_removes() {
        let mut attrs: HashMap<String, i32> = HashMap::new();
        attrs.insert("a".to_string(), 1);
        {
            let ctx = StateContext::enter(&mut attrs, vec![("a", 10), ("b", 20)]).unwrap();
            assert_eq!(ctx.target().get("a"), Some(&10));
            assert_eq!(ctx.target().get("b"), Some(&20));
        }
        assert_eq!(attrs.get("a"), Some(&1));
        assert!(!attrs.contains_key("b"));
    }

    #[test]
    fn test_nested_contexts_restore_lifo() {
        let mut attrs: HashMap<String, i32> = HashMap::new();
        attrs.insert("a".to_string(), 1);
        {
            let mut outer = StateContext::enter(&mut attrs, vec![("a", 2)]).unwrap();
            {
                let inner = StateContext::enter(outer.target_mut(), vec![("a", 3), ("c", 4)]);
                let inner = inner.unwrap();
                assert_eq!(inner.target().get("a"), Some(&3));
            }
            assert_eq!(outer.target().get("a"), Some(&2));
            assert!(!outer.target().contains_key("c"));
        }
        assert_eq!(attrs.get("a"), Some(&1));
    }

    #[test]
    fn test_partial_application_is_rolled_back() {
        let mut target = Positive::default();
        target.0.insert("x".to_string(), 5);
        let result = StateContext::enter(&mut target, vec![("x", 7), ("y", 8), ("z", -1)]);
        assert!(matches!(result, Err(PlotError::InvalidValue { ref key, .. }) if key == "z"));
        drop(result);
        assert_eq!(target.0.get("x"), Some(&5));
        assert!(!target.0.contains_key("y"));
        // The lock was released with the error
        let ctx = StateContext::enter(&mut target, vec![("x", 1)]).unwrap();
        ctx.exit();
    }

    #[test]
    fn test_duplicate_keys_restore_original() {
        let mut attrs: HashMap<String, i32> = HashMap::new();
        attrs.insert("a".to_string(), 1);
        {
            let ctx = StateContext::enter(&mut attrs, vec![("a", 2), ("a", 3)]).unwrap();
            assert_eq!(ctx.target().get("a"), Some(&3));
            assert_eq!(ctx.keys().count(), 1);
        }
        assert_eq!(attrs.get("a"), Some(&1));
    }

    #[test]
    fn test_restores_on_panic() {
        let mut attrs: HashMap<String, i32> = HashMap::new();
        attrs.insert("a".to_string(), 1);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _ctx = StateContext::enter(&mut attrs, vec![("a", 99)]).unwrap();
            panic!("boom");
        }));
        assert!(result.is_err());
        assert_eq!(attrs.get("a"), Some(&1));
    }

    #[test]
    fn test_restores_on_early_return() {
        fn failing(attrs: &mut HashMap<String, i32>) -> Result<()> {
            let _ctx = StateContext::enter(attrs, vec![("a", 42)])?;
            Err(PlotError::Config {
                message: "inner failure".to_string(),
            })
        }
        let mut attrs: HashMap<String, i32> = HashMap::new();
        attrs.insert("a".to_string(), 1);
        assert!(failing(&mut attrs).is_err());
        assert_eq!(attrs.get("a"), Some(&1));
    }
}
