use std::rc::Rc;
use tracing::{debug, info, warn};
use vfxwindow_core::{Display, DisplaySource, Result, Toolkit, WindowOptions};
use x11rb::connection::Connection;
use x11rb::properties::WmSizeHints;
use x11rb::protocol::randr::ConnectionExt as _;
use x11rb::protocol::xproto::{
    AtomEnum, ConnectionExt, CreateWindowAux, EventMask, Gravity, PropMode, WindowClass,
};
use x11rb::protocol::Event;
use x11rb::wrapper::ConnectionExt as _;

use super::handle::X11Window;
use super::x11_error;
use crate::core::context::Context;

/// Standalone windows on an X11 server.
pub struct X11Toolkit {
    ctx: Rc<Context>,
}

impl X11Toolkit {
    pub fn new(ctx: Context) -> Self {
        Self { ctx: Rc::new(ctx) }
    }

    fn root_display(&self) -> Display {
        Display::new(
            0,
            0,
            i32::from(self.ctx.screen_width),
            i32::from(self.ctx.screen_height),
        )
        .with_primary(true)
    }

    fn query_monitors(&self) -> anyhow::Result<Vec<Display>> {
        let reply = self
            .ctx
            .conn
            .randr_get_monitors(self.ctx.root_window, true)?
            .reply()?;

        Ok(reply
            .monitors
            .iter()
            .map(|monitor| {
                Display::new(
                    i32::from(monitor.x),
                    i32::from(monitor.y),
                    i32::from(monitor.width),
                    i32::from(monitor.height),
                )
                .with_primary(monitor.primary)
            })
            .collect())
    }
}

impl DisplaySource for X11Toolkit {
    fn displays(&self) -> Vec<Display> {
        if !self.ctx.has_monitors {
            return vec![self.root_display()];
        }

        match self.query_monitors() {
            Ok(displays) if !displays.is_empty() => {
                debug!("RandR reports {} monitors", displays.len());
                displays
            }
            Ok(_) => vec![self.root_display()],
            Err(e) => {
                warn!("Monitor query failed, using the root window: {}", e);
                vec![self.root_display()]
            }
        }
    }
}

impl Toolkit for X11Toolkit {
    type Window = X11Window;

    fn create_window(&mut self, options: &WindowOptions) -> Result<X11Window> {
        let conn = &self.ctx.conn;
        let atoms = &self.ctx.atoms;
        let id = conn.generate_id().map_err(x11_error("generate_id"))?;

        conn.create_window(
            x11rb::COPY_DEPTH_FROM_PARENT,
            id,
            self.ctx.root_window,
            0,
            0,
            u16::try_from(options.width).unwrap_or(u16::MAX).max(1),
            u16::try_from(options.height).unwrap_or(u16::MAX).max(1),
            0,
            WindowClass::INPUT_OUTPUT,
            x11rb::COPY_FROM_PARENT,
            &CreateWindowAux::new()
                .background_pixel(self.ctx.black_pixel)
                .event_mask(EventMask::STRUCTURE_NOTIFY),
        )
        .map_err(x11_error("create_window"))?;

        conn.change_property32(
            PropMode::REPLACE,
            id,
            atoms.WM_PROTOCOLS,
            AtomEnum::ATOM,
            &[atoms.WM_DELETE_WINDOW],
        )
        .map_err(x11_error("set WM_PROTOCOLS"))?;

        conn.change_property8(
            PropMode::REPLACE,
            id,
            AtomEnum::WM_NAME,
            AtomEnum::STRING,
            options.title.as_bytes(),
        )
        .map_err(x11_error("set WM_NAME"))?;

        conn.change_property8(
            PropMode::REPLACE,
            id,
            atoms._NET_WM_NAME,
            atoms.UTF8_STRING,
            options.title.as_bytes(),
        )
        .map_err(x11_error("set _NET_WM_NAME"))?;

        // Static gravity: configured x/y are the client's own root position,
        // so a saved position comes back without frame offsets.
        let mut hints = WmSizeHints::new();
        hints.win_gravity = Some(Gravity::STATIC);
        hints
            .set_normal_hints(conn, id)
            .map_err(x11_error("set WM_NORMAL_HINTS"))?;

        debug!("Created window {} for {}", id, options.identity);
        Ok(X11Window::new(Rc::clone(&self.ctx), id))
    }

    fn show(&mut self, window: &mut X11Window) -> Result<()> {
        self.ctx
            .conn
            .map_window(window.id())
            .map_err(x11_error("map_window"))?;
        self.ctx.conn.flush().map_err(x11_error("flush"))?;
        Ok(())
    }

    fn run(&mut self, window: &mut X11Window) -> Result<i32> {
        let atoms = &self.ctx.atoms;
        loop {
            self.ctx.conn.flush().map_err(x11_error("flush"))?;
            let event = self
                .ctx
                .conn
                .wait_for_event()
                .map_err(x11_error("wait_for_event"))?;

            match event {
                Event::ClientMessage(event) if event.window == window.id() => {
                    let data = event.data.as_data32();
                    if event.format == 32
                        && event.type_ == atoms.WM_PROTOCOLS
                        && data[0] == atoms.WM_DELETE_WINDOW
                    {
                        info!("Close requested for window {}", window.id());
                        return Ok(0);
                    }
                }
                Event::DestroyNotify(event) if event.window == window.id() => {
                    warn!("Window {} destroyed before close was requested", window.id());
                    window.mark_destroyed();
                    return Ok(0);
                }
                Event::ConfigureNotify(event) if event.window == window.id() => {
                    debug!(
                        "Window {} now at ({}, {}) size {}x{}",
                        event.window, event.x, event.y, event.width, event.height
                    );
                }
                Event::Error(e) => {
                    warn!("X11 error in event loop: {:?}", e);
                }
                _ => {}
            }
        }
    }
}
