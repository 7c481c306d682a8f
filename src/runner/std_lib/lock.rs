//! `Lock` and `ReadWriteLock` constructors.
//!
//! Scripts running on different server threads coordinate through these:
//!
//! ```text
//! var lock = new Lock();
//! lock.lock();
//! try { ... } finally { lock.unlock(); }
//! ```
//!
//! The lock is held across separate script calls, so it cannot be a guard
//! object; ownership is tracked per thread instead.

use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

use crate::runner::ds::capability::CapabilityObject;
use crate::runner::ds::data_object::DataObject;
use crate::runner::ds::error::HostError;
use crate::runner::ds::value::HostValue;
use crate::runner::plugin::descriptor::ComponentDescriptor;

pub const LOCK_NAME: &str = "Lock";
pub const READ_WRITE_LOCK_NAME: &str = "ReadWriteLock";

pub fn lock_descriptor() -> ComponentDescriptor {
    ComponentDescriptor::constructor(LOCK_NAME, |_| Ok(LockObject::new())).singleton()
}

pub fn read_write_lock_descriptor() -> ComponentDescriptor {
    ComponentDescriptor::constructor(READ_WRITE_LOCK_NAME, |_| Ok(ReadWriteLockObject::new())).singleton()
}

fn wait<'a, T>(cond: &Condvar, guard: MutexGuard<'a, T>) -> MutexGuard<'a, T> {
    cond.wait(guard).unwrap_or_else(PoisonError::into_inner)
}

struct ReentrantState {
    owner: Option<ThreadId>,
    holds: usize,
}

/// Reentrant mutual exclusion owned by a thread between `lock` and `unlock`.
pub struct ScriptLock {
    state: Mutex<ReentrantState>,
    released: Condvar,
}

impl ScriptLock {
    pub fn new() -> Self {
        ScriptLock {
            state: Mutex::new(ReentrantState { owner: None, holds: 0 }),
            released: Condvar::new(),
        }
    }

    pub fn lock(&self) {
        let me = thread::current().id();
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        while state.owner.map_or(false, |owner| owner != me) {
            state = wait(&self.released, state);
        }
        state.owner = Some(me);
        state.holds += 1;
    }

    pub fn unlock(&self) -> Result<(), HostError> {
        let me = thread::current().id();
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.owner != Some(me) {
            return Err("unlock called by a thread that does not hold the lock".into());
        }
        state.holds -= 1;
        if state.holds == 0 {
            state.owner = None;
            self.released.notify_one();
        }
        Ok(())
    }

    pub fn is_locked(&self) -> bool {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .owner
            .is_some()
    }
}

impl Default for ScriptLock {
    fn default() -> Self {
        Self::new()
    }
}

/// What `new Lock()` returns.
pub struct LockObject {
    lock: Arc<ScriptLock>,
    members: DataObject,
}

impl LockObject {
    pub fn new() -> Self {
        let lock = Arc::new(ScriptLock::new());
        let (l, u, q) = (lock.clone(), lock.clone(), lock.clone());
        let members = DataObject::new(LOCK_NAME)
            .with_function("lock", move |_, _| {
                l.lock();
                Ok(HostValue::Undefined)
            })
            .with_function("unlock", move |_, _| {
                u.unlock()?;
                Ok(HostValue::Undefined)
            })
            .with_function("isLocked", move |_, _| Ok(HostValue::Boolean(q.is_locked())));
        LockObject { lock, members }
    }

    pub fn lock(&self) -> &ScriptLock {
        &self.lock
    }
}

impl Default for LockObject {
    fn default() -> Self {
        Self::new()
    }
}

impl CapabilityObject for LockObject {
    fn class_name(&self) -> &str {
        LOCK_NAME
    }

    fn get_member(&self, name: &str) -> Option<HostValue> {
        self.members.get_member(name)
    }

    fn has_member(&self, name: &str) -> bool {
        self.members.has_member(name)
    }

    fn member_names(&self) -> Vec<String> {
        self.members.member_names()
    }
}

#[derive(Default)]
struct ReadWriteState {
    readers: HashMap<ThreadId, usize>,
    writer: Option<ThreadId>,
    write_holds: usize,
}

impl ReadWriteState {
    fn writer_is_other(&self, me: ThreadId) -> bool {
        self.writer.map_or(false, |owner| owner != me)
    }
}

/// Many readers or one writer, both reentrant per thread.
///
/// The writing thread may also take the read lock, and keeps it after
/// `write_unlock` (a downgrade). A thread that only reads cannot take the
/// write lock; that would wait on itself forever, so it is an error.
pub struct ScriptReadWriteLock {
    state: Mutex<ReadWriteState>,
    changed: Condvar,
}

impl ScriptReadWriteLock {
    pub fn new() -> Self {
        ScriptReadWriteLock {
            state: Mutex::new(ReadWriteState::default()),
            changed: Condvar::new(),
        }
    }

    pub fn read_lock(&self) {
        let me = thread::current().id();
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        while state.writer_is_other(me) {
            state = wait(&self.changed, state);
        }
        *state.readers.entry(me).or_insert(0) += 1;
    }

    pub fn read_unlock(&self) -> Result<(), HostError> {
        let me = thread::current().id();
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let holds = match state.readers.get_mut(&me) {
            Some(holds) => holds,
            None => return Err("readUnlock called by a thread that does not hold a read lock".into()),
        };
        *holds -= 1;
        if *holds == 0 {
            state.readers.remove(&me);
            self.changed.notify_all();
        }
        Ok(())
    }

    pub fn write_lock(&self) -> Result<(), HostError> {
        let me = thread::current().id();
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.writer == Some(me) {
            state.write_holds += 1;
            return Ok(());
        }
        if state.readers.contains_key(&me) {
            return Err("writeLock called by a thread that holds a read lock".into());
        }
        while state.writer.is_some() || !state.readers.is_empty() {
            state = wait(&self.changed, state);
        }
        state.writer = Some(me);
        state.write_holds = 1;
        Ok(())
    }

    pub fn write_unlock(&self) -> Result<(), HostError> {
        let me = thread::current().id();
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.writer != Some(me) {
            return Err("writeUnlock called by a thread that does not hold the write lock".into());
        }
        state.write_holds -= 1;
        if state.write_holds == 0 {
            state.writer = None;
            self.changed.notify_all();
        }
        Ok(())
    }

    /// Read holds across all threads, counting reentrant ones.
    pub fn readers(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .readers
            .values()
            .sum()
    }

    pub fn is_write_locked(&self) -> bool {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .writer
            .is_some()
    }
}

impl Default for ScriptReadWriteLock {
    fn default() -> Self {
        Self::new()
    }
}

/// What `new ReadWriteLock()` returns.
pub struct ReadWriteLockObject {
    lock: Arc<ScriptReadWriteLock>,
    members: DataObject,
}

impl ReadWriteLockObject {
    pub fn new() -> Self {
        let lock = Arc::new(ScriptReadWriteLock::new());
        let (rl, ru, wl, wu) = (lock.clone(), lock.clone(), lock.clone(), lock.clone());
        let members = DataObject::new(READ_WRITE_LOCK_NAME)
            .with_function("readLock", move |_, _| {
                rl.read_lock();
                Ok(HostValue::Undefined)
            })
            .with_function("readUnlock", move |_, _| {
                ru.read_unlock()?;
                Ok(HostValue::Undefined)
            })
            .with_function("writeLock", move |_, _| {
                wl.write_lock()?;
                Ok(HostValue::Undefined)
            })
            .with_function("writeUnlock", move |_, _| {
                wu.write_unlock()?;
                Ok(HostValue::Undefined)
            });
        ReadWriteLockObject { lock, members }
    }

    pub fn lock(&self) -> &ScriptReadWriteLock {
        &self.lock
    }
}

impl Default for ReadWriteLockObject {
    fn default() -> Self {
        Self::new()
    }
}

impl CapabilityObject for ReadWriteLockObject {
    fn class_name(&self) -> &str {
        READ_WRITE_LOCK_NAME
    }

    fn get_member(&self, name: &str) -> Option<HostValue> {
        self.members.get_member(name)
    }

    fn has_member(&self, name: &str) -> bool {
        self.members.has_member(name)
    }

    fn member_names(&self) -> Vec<String> {
        self.members.member_names()
    }
}
