use anyhow::Result;
use tracing::{debug, warn};
use x11rb::connection::Connection;
use x11rb::protocol::randr::ConnectionExt as _;
use x11rb::rust_connection::RustConnection;

x11rb::atom_manager! {
    pub AtomCollection: AtomCollectionCookie {
        WM_PROTOCOLS,
        WM_DELETE_WINDOW,
        _NET_WM_NAME,
        UTF8_STRING,
    }
}

/// RandR version that introduced GetMonitors.
const RANDR_MAJOR: u32 = 1;
const RANDR_MINOR: u32 = 5;

pub struct Context {
    pub conn: RustConnection,
    pub screen_num: usize,
    pub root_window: u32,
    pub black_pixel: u32,
    pub atoms: AtomCollection,
    pub screen_width: u16,
    pub screen_height: u16,
    pub has_monitors: bool,
}

impl Context {
    pub fn new() -> Result<Self> {
        let (conn, screen_num) = x11rb::connect(None)?;
        let screen = &conn.setup().roots[screen_num];
        let root_window = screen.root;
        let black_pixel = screen.black_pixel;
        let screen_width = screen.width_in_pixels;
        let screen_height = screen.height_in_pixels;

        let atoms = AtomCollection::new(&conn)?.reply()?;
        let has_monitors = Self::negotiate_randr(&conn);

        Ok(Self {
            conn,
            screen_num,
            root_window,
            black_pixel,
            atoms,
            screen_width,
            screen_height,
            has_monitors,
        })
    }

    /// Announce our RandR version; monitor queries need 1.5.
    fn negotiate_randr(conn: &RustConnection) -> bool {
        let reply = conn
            .randr_query_version(RANDR_MAJOR, RANDR_MINOR)
            .map_err(anyhow::Error::from)
            .and_then(|cookie| cookie.reply().map_err(anyhow::Error::from));

        match reply {
            Ok(version) => {
                debug!("RandR {}.{}", version.major_version, version.minor_version);
                (version.major_version, version.minor_version) >= (RANDR_MAJOR, RANDR_MINOR)
            }
            Err(e) => {
                warn!("RandR unavailable, treating the root window as the only display: {}", e);
                false
            }
        }
    }
}
