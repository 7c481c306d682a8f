//! Process startup and shutdown hooks.

use std::fmt;

use tracing::{debug, warn};

use crate::runner::ds::error::HostError;

pub type Hook = Box<dyn Fn() -> Result<(), HostError> + Send + Sync>;

/// Named callbacks run when the host process starts and stops.
///
/// Hooks run in registration order. A failing hook is reported and does not
/// stop the ones after it.
#[derive(Default)]
pub struct LifecycleHooks {
    startup: Vec<(String, Hook)>,
    shutdown: Vec<(String, Hook)>,
}

impl LifecycleHooks {
    pub fn new() -> Self {
        LifecycleHooks::default()
    }

    pub fn on_startup<F>(&mut self, name: impl Into<String>, hook: F)
    where
        F: Fn() -> Result<(), HostError> + Send + Sync + 'static,
    {
        self.startup.push((name.into(), Box::new(hook)));
    }

    pub fn on_shutdown<F>(&mut self, name: impl Into<String>, hook: F)
    where
        F: Fn() -> Result<(), HostError> + Send + Sync + 'static,
    {
        self.shutdown.push((name.into(), Box::new(hook)));
    }

    /// Returns the number of hooks that failed.
    pub fn run_startup(&self) -> usize {
        run_all("startup", &self.startup)
    }

    /// Returns the number of hooks that failed.
    pub fn run_shutdown(&self) -> usize {
        run_all("shutdown", &self.shutdown)
    }
}

fn run_all(phase: &str, hooks: &[(String, Hook)]) -> usize {
    let mut failures = 0;
    for (name, hook) in hooks {
        debug!(phase, hook = %name, "running lifecycle hook");
        if let Err(e) = hook() {
            warn!(phase, hook = %name, error = %e, "lifecycle hook failed");
            failures += 1;
        }
    }
    failures
}

impl fmt::Debug for LifecycleHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = |hooks: &[(String, Hook)]| hooks.iter().map(|(n, _)| n.clone()).collect::<Vec<_>>();
        f.debug_struct("LifecycleHooks")
            .field("startup", &names(&self.startup))
            .field("shutdown", &names(&self.shutdown))
            .finish()
    }
}
