//! In-memory window and toolkit used by the unit tests.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{Result, WindowError};
use crate::geometry::{Display, DisplaySource, WindowGeometry};
use crate::standalone::{Toolkit, WindowOptions};
use crate::window::WindowHandle;

#[derive(Debug, Default)]
pub struct FakeState {
    pub geometry: WindowGeometry,
    pub closed: bool,
    pub close_calls: usize,
    pub stale_on_close: bool,
    pub fail_close: bool,
    pub ops: Vec<&'static str>,
}

/// Shares its state with clones so tests can inspect a window after handing
/// it over.
#[derive(Debug, Clone, Default)]
pub struct FakeWindow {
    pub state: Rc<RefCell<FakeState>>,
}

impl FakeWindow {
    pub fn at(x: i32, y: i32, width: i32, height: i32) -> Self {
        let window = Self::default();
        window.state.borrow_mut().geometry = WindowGeometry::new(x, y, width, height);
        window
    }

    pub fn geometry_now(&self) -> WindowGeometry {
        self.state.borrow().geometry
    }
}

impl WindowHandle for FakeWindow {
    fn position(&self) -> Result<(i32, i32)> {
        let geometry = self.state.borrow().geometry;
        Ok((geometry.x, geometry.y))
    }

    fn size(&self) -> Result<(i32, i32)> {
        let geometry = self.state.borrow().geometry;
        Ok((geometry.width, geometry.height))
    }

    fn resize(&mut self, width: i32, height: i32) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.ops.push("resize");
        state.geometry.width = width;
        state.geometry.height = height;
        Ok(())
    }

    fn move_to(&mut self, x: i32, y: i32) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.ops.push("move");
        state.geometry.x = x;
        state.geometry.y = y;
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.state.borrow().closed
    }

    fn close(&mut self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.close_calls += 1;
        if state.stale_on_close {
            state.closed = true;
            return Err(WindowError::StaleInstanceTeardown);
        }
        if state.fail_close {
            return Err(WindowError::toolkit("close", "connection lost"));
        }
        state.closed = true;
        Ok(())
    }
}

pub struct FakeToolkit {
    pub displays: Vec<Display>,
    pub windows: Vec<FakeWindow>,
    pub user_moves_to: Option<(i32, i32)>,
    pub exit_status: i32,
    /// Make the window's close fail once the loop has returned.
    pub break_close_on_exit: bool,
    /// Window whose closed flag is recorded when a new window is created.
    pub watched: Option<FakeWindow>,
    pub watched_closed_at_create: Option<bool>,
}

impl FakeToolkit {
    pub fn new(displays: Vec<Display>) -> Self {
        Self {
            displays,
            windows: Vec::new(),
            user_moves_to: None,
            exit_status: 0,
            break_close_on_exit: false,
            watched: None,
            watched_closed_at_create: None,
        }
    }
}

impl DisplaySource for FakeToolkit {
    fn displays(&self) -> Vec<Display> {
        self.displays.clone()
    }
}

impl Toolkit for FakeToolkit {
    type Window = FakeWindow;

    fn create_window(&mut self, options: &WindowOptions) -> Result<FakeWindow> {
        self.watched_closed_at_create = self.watched.as_ref().map(FakeWindow::is_closed);
        let window = FakeWindow::at(0, 0, options.width as i32, options.height as i32);
        self.windows.push(window.clone());
        Ok(window)
    }

    fn show(&mut self, window: &mut FakeWindow) -> Result<()> {
        window.state.borrow_mut().ops.push("show");
        Ok(())
    }

    fn run(&mut self, window: &mut FakeWindow) -> Result<i32> {
        if let Some((x, y)) = self.user_moves_to {
            window.move_to(x, y)?;
        }
        if self.break_close_on_exit {
            window.state.borrow_mut().fail_close = true;
        }
        Ok(self.exit_status)
    }
}
