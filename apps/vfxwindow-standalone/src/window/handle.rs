use std::rc::Rc;
use tracing::debug;
use vfxwindow_core::{Result, WindowError, WindowHandle};
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{ConfigureWindowAux, ConnectionExt, Window};

use super::{window_reply_error, x11_error};
use crate::core::context::Context;

/// Top-level X11 window owned by this process.
pub struct X11Window {
    ctx: Rc<Context>,
    id: Window,
    closed: bool,
}

impl X11Window {
    pub fn new(ctx: Rc<Context>, id: Window) -> Self {
        Self { ctx, id, closed: false }
    }

    pub fn id(&self) -> Window {
        self.id
    }

    /// The server destroyed the window behind our back.
    pub fn mark_destroyed(&mut self) {
        self.closed = true;
    }

    fn configure(&self, operation: &'static str, aux: &ConfigureWindowAux) -> Result<()> {
        self.ctx
            .conn
            .configure_window(self.id, aux)
            .map_err(x11_error(operation))?;
        self.ctx.conn.flush().map_err(x11_error(operation))?;
        Ok(())
    }
}

fn to_extent(value: i32) -> u32 {
    value.clamp(1, i32::from(u16::MAX)) as u32
}

impl WindowHandle for X11Window {
    fn position(&self) -> Result<(i32, i32)> {
        let reply = self
            .ctx
            .conn
            .translate_coordinates(self.id, self.ctx.root_window, 0, 0)
            .map_err(x11_error("translate_coordinates"))?
            .reply()
            .map_err(window_reply_error("translate_coordinates"))?;
        Ok((i32::from(reply.dst_x), i32::from(reply.dst_y)))
    }

    fn size(&self) -> Result<(i32, i32)> {
        let geom = self
            .ctx
            .conn
            .get_geometry(self.id)
            .map_err(x11_error("get_geometry"))?
            .reply()
            .map_err(window_reply_error("get_geometry"))?;
        Ok((i32::from(geom.width), i32::from(geom.height)))
    }

    fn resize(&mut self, width: i32, height: i32) -> Result<()> {
        self.configure(
            "resize",
            &ConfigureWindowAux::new()
                .width(to_extent(width))
                .height(to_extent(height)),
        )
    }

    fn move_to(&mut self, x: i32, y: i32) -> Result<()> {
        self.configure("move", &ConfigureWindowAux::new().x(x).y(y))
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn close(&mut self) -> Result<()> {
        let result = self
            .ctx
            .conn
            .destroy_window(self.id)
            .map_err(x11_error("destroy_window"))?
            .check()
            .map_err(window_reply_error("destroy_window"));
        // gone either way
        if matches!(result, Ok(()) | Err(WindowError::StaleInstanceTeardown)) {
            self.closed = true;
        }
        debug!("Destroyed window {}", self.id);
        result
    }
}
