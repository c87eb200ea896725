use std::collections::HashMap;
use tracing::{debug, warn};

use crate::error::{log_and_ignore, log_warn, Result, WindowError};
use crate::window::WindowHandle;

/// How a best-effort close ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    Closed,
    /// The window reported itself closed; nothing was sent to the toolkit.
    AlreadyClosed,
    /// The toolkit had already destroyed the window. Happens when the
    /// application shuts down while an explicit close is in flight.
    StaleIgnored,
}

/// Close a window, treating "already torn down" as success.
///
/// Only [`WindowError::StaleInstanceTeardown`] is absorbed; any other close
/// failure is returned.
pub fn best_effort_close<W: WindowHandle + ?Sized>(window: &mut W) -> Result<CloseOutcome> {
    if window.is_closed() {
        return Ok(CloseOutcome::AlreadyClosed);
    }

    match window.close() {
        Ok(()) => Ok(CloseOutcome::Closed),
        Err(e @ WindowError::StaleInstanceTeardown) => {
            log_and_ignore(Err::<(), _>(e), "closing torn down window");
            Ok(CloseOutcome::StaleIgnored)
        }
        Err(e) => {
            warn!("Failed to close window: {}", e);
            Err(e)
        }
    }
}

/// Live windows by identity, at most one each.
#[derive(Debug)]
pub struct WindowRegistry<W> {
    instances: HashMap<String, W>,
}

impl<W> Default for WindowRegistry<W> {
    fn default() -> Self {
        Self {
            instances: HashMap::new(),
        }
    }
}

impl<W: WindowHandle> WindowRegistry<W> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `window` as the live instance of `identity`, closing the
    /// previous one first.
    pub fn show_singleton(&mut self, identity: &str, window: W) -> Result<&mut W> {
        self.clear_instance(identity)?;
        debug!("Registering window instance {}", identity);
        Ok(self.instances.entry(identity.to_string()).or_insert(window))
    }

    /// Deregister and close the instance of `identity`, returning it.
    ///
    /// The instance is deregistered even when closing it fails.
    pub fn clear_instance(&mut self, identity: &str) -> Result<Option<W>> {
        let Some(mut previous) = self.instances.remove(identity) else {
            return Ok(None);
        };

        debug!("Clearing window instance {}", identity);
        best_effort_close(&mut previous)?;
        Ok(Some(previous))
    }

    /// Close every registered instance, logging failures.
    pub fn clear_all(&mut self) {
        for (identity, mut window) in self.instances.drain() {
            debug!("Tearing down window instance {}", identity);
            log_warn(best_effort_close(&mut window), "window teardown");
        }
    }

    pub fn get(&self, identity: &str) -> Option<&W> {
        self.instances.get(identity)
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.instances.contains_key(identity)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
