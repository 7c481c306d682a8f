//! Single-slot atomic cell with compare-and-install semantics.
//!
//! An [`AtomicSlot`] starts empty and holds at most one `Arc<T>` for its whole
//! life. Writers race to fill it: the first candidate to land wins, every
//! other candidate is handed back to its builder and every reader sees the
//! winner. Neither reading nor installing ever takes a lock, so a thread can
//! never block another thread's lazy initialisation.

use std::sync::Arc;

use once_cell::race::OnceBox;

/// Outcome of [`AtomicSlot::install`].
pub enum Install<T: ?Sized> {
    /// The candidate is now the slot's value.
    Installed(Arc<T>),
    /// Another value was installed first. `winner` is the slot's value and
    /// `rejected` is the candidate that was offered.
    Lost { winner: Arc<T>, rejected: Arc<T> },
}

impl<T: ?Sized> Install<T> {
    /// The value now held by the slot, whichever candidate it came from.
    pub fn into_current(self) -> Arc<T> {
        match self {
            Install::Installed(v) => v,
            Install::Lost { winner, .. } => winner,
        }
    }

    pub fn was_installed(&self) -> bool {
        matches!(self, Install::Installed(_))
    }
}

pub struct AtomicSlot<T: ?Sized> {
    cell: OnceBox<Arc<T>>,
}

impl<T: ?Sized> AtomicSlot<T> {
    pub fn new() -> Self {
        AtomicSlot {
            cell: OnceBox::new(),
        }
    }

    pub fn get(&self) -> Option<Arc<T>> {
        self.cell.get().cloned()
    }

    pub fn is_set(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn install(&self, candidate: Arc<T>) -> Install<T> {
        match self.cell.set(Box::new(candidate.clone())) {
            Ok(()) => Install::Installed(candidate),
            Err(rejected) => {
                // The slot is full once `set` fails, so the initialiser
                // below never runs and only reads the winner back.
                let winner = self.cell.get_or_init(|| rejected.clone()).clone();
                Install::Lost {
                    winner,
                    rejected: *rejected,
                }
            }
        }
    }

    /// Return the installed value, building and installing one if the slot is
    /// empty. `build` may run on several threads at once; only one result is
    /// kept and every caller receives that one. The flag tells whether this
    /// caller's candidate was the one kept.
    pub fn get_or_try_install_with<E, F>(&self, build: F) -> Result<(Arc<T>, bool), E>
    where
        F: FnOnce() -> Result<Arc<T>, E>,
    {
        if let Some(current) = self.get() {
            return Ok((current, false));
        }
        let outcome = self.install(build()?);
        let installed = outcome.was_installed();
        Ok((outcome.into_current(), installed))
    }
}

impl<T: ?Sized> Default for AtomicSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}
