use tracing::{debug, info};
use vfxwindow_config::{ConfigError, KeyPath, WindowSettings};

use crate::error::Result;
use crate::geometry::{self, clamp_to_visible_area, DisplaySource, WindowGeometry};
use crate::window::WindowHandle;

pub const STANDALONE_SCOPE: &str = "standalone";
pub const MAIN_ROLE: &str = "main";

/// Margin kept between a restored window and the edge of its display.
pub const STANDALONE_PADDING: u32 = 5;

/// Saving and restoring a window's placement.
///
/// The provided methods are the base behavior: saving records nothing and
/// loading centres the window on the fallback display. Window kinds override
/// what they persist and call back into their base for the rest.
pub trait WindowPersistence<W: WindowHandle + ?Sized> {
    fn save_window_position(&mut self, window: &W, settings: &mut WindowSettings) -> Result<()> {
        let _ = (window, settings);
        Ok(())
    }

    fn load_window_position(
        &mut self,
        window: &mut W,
        settings: &WindowSettings,
        displays: &dyn DisplaySource,
    ) -> Result<()> {
        let _ = settings;
        place_default(window, displays)
    }
}

/// Default placement: centred on the fallback display at the current size.
///
/// With no display attached the toolkit's own placement is left alone.
pub fn place_default<W: WindowHandle + ?Sized>(window: &mut W, displays: &dyn DisplaySource) -> Result<()> {
    let displays = displays.displays();
    let Some(display) = geometry::fallback_display(&displays) else {
        debug!("No display to centre on, keeping toolkit placement");
        return Ok(());
    };

    let (width, height) = window.size()?;
    let (x, y) = geometry::center_on(display, width, height);
    window.move_to(x, y)
}

/// Plain window with only the base behavior.
#[derive(Debug, Default, Clone, Copy)]
pub struct BaseWindow;

impl<W: WindowHandle + ?Sized> WindowPersistence<W> for BaseWindow {}

/// Persistence of a window launched on its own, outside any host
/// application. Geometry lives under `standalone.main`.
#[derive(Debug, Default, Clone)]
pub struct StandalonePersistence<B = BaseWindow> {
    base: B,
}

impl StandalonePersistence {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<B> StandalonePersistence<B> {
    pub fn with_base(base: B) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &B {
        &self.base
    }

    pub fn key(field: &str) -> KeyPath {
        KeyPath::new(STANDALONE_SCOPE, MAIN_ROLE, field)
    }

    /// Saved geometry, or `None` when any of the four fields is absent.
    pub fn saved_geometry(settings: &WindowSettings) -> Result<Option<WindowGeometry>, ConfigError> {
        let fields = ["x", "y", "width", "height"].map(|field| settings.get_i32(&Self::key(field)));

        if fields.iter().any(|field| matches!(field, Err(e) if e.is_missing())) {
            return Ok(None);
        }
        let [x, y, width, height] = fields;
        Ok(Some(WindowGeometry::new(x?, y?, width?, height?)))
    }
}

impl<W, B> WindowPersistence<W> for StandalonePersistence<B>
where
    W: WindowHandle + ?Sized,
    B: WindowPersistence<W>,
{
    fn save_window_position(&mut self, window: &W, settings: &mut WindowSettings) -> Result<()> {
        let geometry = window.geometry()?;
        settings.set_integer(&Self::key("width"), i64::from(geometry.width));
        settings.set_integer(&Self::key("height"), i64::from(geometry.height));
        settings.set_integer(&Self::key("x"), i64::from(geometry.x));
        settings.set_integer(&Self::key("y"), i64::from(geometry.y));
        debug!("Saved window geometry {:?}", geometry);

        self.base.save_window_position(window, settings)
    }

    fn load_window_position(
        &mut self,
        window: &mut W,
        settings: &WindowSettings,
        displays: &dyn DisplaySource,
    ) -> Result<()> {
        let Some(saved) = Self::saved_geometry(settings)? else {
            debug!("No saved standalone geometry, using default placement");
            return self.base.load_window_position(window, settings, displays);
        };

        let (x, y) = clamp_to_visible_area(
            displays,
            saved.x,
            saved.y,
            saved.width,
            saved.height,
            STANDALONE_PADDING,
        )?;
        // clamping was computed for the saved size, so apply it first;
        // a non-positive saved extent keeps the current one
        if saved.width > 0 || saved.height > 0 {
            let (width, height) = window.size()?;
            let width = if saved.width > 0 { saved.width } else { width };
            let height = if saved.height > 0 { saved.height } else { height };
            window.resize(width, height)?;
        }
        window.move_to(x, y)?;
        info!("Restored window at ({}, {}) size {}x{}", x, y, saved.width, saved.height);
        Ok(())
    }
}
