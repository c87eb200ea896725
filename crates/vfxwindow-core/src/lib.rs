//! Window geometry persistence and standalone window lifecycle.
//!
//! [`geometry`] keeps restored windows on a connected display,
//! [`persistence`] moves geometry in and out of the settings store,
//! [`registry`] enforces one live window per identity and [`standalone`]
//! ties them together around a blocking toolkit event loop.

pub mod error;
pub mod geometry;
pub mod persistence;
pub mod registry;
pub mod standalone;
pub mod window;

#[cfg(test)]
mod testing;

pub use error::{Result, WindowError};
pub use geometry::{clamp_to_visible_area, Display, DisplaySource, WindowGeometry};
pub use persistence::{BaseWindow, StandalonePersistence, WindowPersistence};
pub use registry::{best_effort_close, CloseOutcome, WindowRegistry};
pub use standalone::{launch, run_standalone, StandaloneContext, Toolkit, WindowOptions};
pub use window::WindowHandle;

pub use vfxwindow_config::{ConfigError, KeyPath, WindowSettings};
