//! `sync(key, fn, ...args)`: call `fn(...args)` while holding the lock
//! named by `key`.
//!
//! ```text
//! sync("orders", function (id) { ... }, orderId);
//! ```
//!
//! Calls on the same key from different threads run one at a time. A
//! thread already inside `sync` for a key may enter it again. Object keys
//! compare by identity; any other key compares by its string form.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::trace;

use super::lock::ScriptLock;
use crate::runner::ds::error::HostError;
use crate::runner::ds::value::HostValue;
use crate::runner::plugin::descriptor::ComponentDescriptor;
use crate::runner::plugin::gateway::invoke;

pub const NAME: &str = "sync";

pub fn descriptor() -> ComponentDescriptor {
    let locks = Arc::new(KeyedLocks::default());
    ComponentDescriptor::function(NAME, move |_, args| locks.run(args)).singleton()
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum LockKey {
    Object(usize),
    Value(String),
}

impl LockKey {
    fn of(value: &HostValue) -> Self {
        match value {
            HostValue::Object(o) => LockKey::Object(Arc::as_ptr(o) as *const () as usize),
            other => LockKey::Value(other.to_string()),
        }
    }
}

/// One reentrant lock per key, dropped again once nobody holds or waits on it.
#[derive(Default)]
struct KeyedLocks {
    locks: Mutex<HashMap<LockKey, Arc<ScriptLock>>>,
}

struct Held<'a> {
    owner: &'a KeyedLocks,
    key: LockKey,
    lock: Arc<ScriptLock>,
}

impl Drop for Held<'_> {
    fn drop(&mut self) {
        let mut locks = self.owner.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // Only this thread can own the lock here, so unlock cannot fail.
        let _ = self.lock.unlock();
        // One reference in the table and one here means no other caller.
        if Arc::strong_count(&self.lock) == 2 && !self.lock.is_locked() {
            locks.remove(&self.key);
        }
    }
}

impl KeyedLocks {
    fn acquire(&self, key: LockKey) -> Held<'_> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks
                .entry(key.clone())
                .or_insert_with(|| Arc::new(ScriptLock::new()))
                .clone()
        };
        lock.lock();
        trace!(?key, "sync lock acquired");
        Held { owner: self, key, lock }
    }

    /// Answers `null` without locking when the second argument is not callable.
    fn run(&self, mut args: Vec<HostValue>) -> Result<HostValue, HostError> {
        let (key, function) = match args.as_slice() {
            [key, function, ..] if function.as_object().map_or(false, |f| f.is_function()) => {
                (LockKey::of(key), function.clone())
            }
            _ => return Ok(HostValue::Null),
        };
        let rest = args.split_off(2);
        let _held = self.acquire(key);
        Ok(invoke(&function, HostValue::Undefined, rest)?)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
