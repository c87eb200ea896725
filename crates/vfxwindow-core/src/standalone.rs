use tracing::{error, info, warn};
use vfxwindow_config::WindowSettings;

use crate::error::{log_warn, Result, WindowError};
use crate::geometry::DisplaySource;
use crate::persistence::WindowPersistence;
use crate::registry::WindowRegistry;
use crate::window::WindowHandle;

/// What to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowOptions {
    pub identity: String,
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl WindowOptions {
    pub fn new(identity: impl Into<String>) -> Self {
        let identity = identity.into();
        Self {
            title: identity.clone(),
            identity,
            width: 640,
            height: 480,
        }
    }
}

/// Windowing backend driving a standalone launch.
pub trait Toolkit: DisplaySource {
    type Window: WindowHandle;

    fn create_window(&mut self, options: &WindowOptions) -> Result<Self::Window>;

    /// Make the window visible.
    fn show(&mut self, window: &mut Self::Window) -> Result<()>;

    /// Run the event loop until the user asks to close `window`, returning
    /// the exit status for the process.
    fn run(&mut self, window: &mut Self::Window) -> Result<i32>;
}

/// Process-wide state of a standalone launch.
///
/// Starts with no windows; dropping it closes whatever is still registered.
#[derive(Debug)]
pub struct StandaloneContext<W: WindowHandle> {
    registry: WindowRegistry<W>,
}

impl<W: WindowHandle> Default for StandaloneContext<W> {
    fn default() -> Self {
        Self {
            registry: WindowRegistry::new(),
        }
    }
}

impl<W: WindowHandle> StandaloneContext<W> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &WindowRegistry<W> {
        &self.registry
    }

    pub fn show_singleton(&mut self, identity: &str, window: W) -> Result<&mut W> {
        self.registry.show_singleton(identity, window)
    }

    pub fn clear_instance(&mut self, identity: &str) -> Result<Option<W>> {
        self.registry.clear_instance(identity)
    }
}

impl<W: WindowHandle> Drop for StandaloneContext<W> {
    fn drop(&mut self) {
        self.registry.clear_all();
    }
}

/// Open one window, block in the toolkit's event loop until it is closed
/// and return the loop's exit status.
///
/// A live instance of the same identity is closed before the new window is
/// created. On close the geometry is saved and written to disk, then the
/// window is deregistered. A failed restore leaves the window where the
/// toolkit put it, and a failed final close does not change the status.
pub fn run_standalone<T, P>(
    ctx: &mut StandaloneContext<T::Window>,
    toolkit: &mut T,
    persistence: &mut P,
    settings: &mut WindowSettings,
    options: &WindowOptions,
) -> Result<i32>
where
    T: Toolkit,
    P: WindowPersistence<T::Window>,
{
    ctx.clear_instance(&options.identity)?;
    let window = toolkit.create_window(options)?;
    let window = ctx.show_singleton(&options.identity, window)?;
    toolkit.show(window)?;

    if let Err(e) = persistence.load_window_position(window, settings, &*toolkit) {
        warn!("Could not restore window position, keeping default placement: {}", e);
    }

    info!("Window {} shown, entering event loop", options.identity);
    let status = toolkit.run(window)?;
    info!("Window {} closed with status {}", options.identity, status);

    log_warn(
        persistence.save_window_position(window, settings),
        "saving window position",
    );
    log_warn(settings.save(), "writing window settings");

    if let Some(None) = log_warn(ctx.clear_instance(&options.identity), "closing window") {
        let e = WindowError::NotRegistered {
            identity: options.identity.clone(),
        };
        warn!("{}", e);
    }
    Ok(status)
}

/// Launch a window as the only top-level entry point of the process.
///
/// Never returns: the process exits with the event loop's status once the
/// window is closed. Another window needs another process.
pub fn launch<T, P>(mut toolkit: T, mut persistence: P, mut settings: WindowSettings, options: WindowOptions) -> !
where
    T: Toolkit,
    P: WindowPersistence<T::Window>,
{
    let mut ctx = StandaloneContext::new();
    let status = match run_standalone(&mut ctx, &mut toolkit, &mut persistence, &mut settings, &options) {
        Ok(status) => status,
        Err(e) => {
            error!("Standalone window {} failed: {}", options.identity, e);
            1
        }
    };

    drop(ctx);
    drop(toolkit);
    std::process::exit(status)
}
