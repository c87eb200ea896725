use crate::error::Result;
use crate::geometry::WindowGeometry;

/// Toolkit window as seen by the session code.
pub trait WindowHandle {
    /// Top-left corner in root coordinates.
    fn position(&self) -> Result<(i32, i32)>;

    fn size(&self) -> Result<(i32, i32)>;

    fn resize(&mut self, width: i32, height: i32) -> Result<()>;

    fn move_to(&mut self, x: i32, y: i32) -> Result<()>;

    fn is_closed(&self) -> bool;

    /// Close the window. Fails with
    /// [`WindowError::StaleInstanceTeardown`](crate::WindowError::StaleInstanceTeardown)
    /// when the toolkit already destroyed it.
    fn close(&mut self) -> Result<()>;

    fn geometry(&self) -> Result<WindowGeometry> {
        let (x, y) = self.position()?;
        let (width, height) = self.size()?;
        Ok(WindowGeometry::new(x, y, width, height))
    }
}
