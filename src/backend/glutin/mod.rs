/*!

Backend implementation for the glutin library.

The window itself is owned by the caller; the backend owns the OpenGL context and the
window surface. Use `SimpleWindowBuilder` to create both.

*/
use std::ffi::CString;
use std::num::NonZeroU32;
use std::os::raw::c_void;

use ::glutin::context::PossiblyCurrentContext;
use ::glutin::display::GetGlDisplay;
use ::glutin::error::ErrorKind;
use ::glutin::prelude::*;
use ::glutin::surface::{Surface, WindowSurface};

use crate::backend::{Backend, SwapBuffersError};

pub use self::simple_window_builder::SimpleWindowBuilder;

mod simple_window_builder;

/// An implementation of the `Backend` trait for glutin.
pub struct GlutinBackend {
    context: PossiblyCurrentContext,
    surface: Surface<WindowSurface>,
}

impl GlutinBackend {
    /// Builds a backend from a context that has already been made current on `surface`.
    pub fn new(context: PossiblyCurrentContext, surface: Surface<WindowSurface>) -> GlutinBackend {
        GlutinBackend { context, surface }
    }
}

unsafe impl Backend for GlutinBackend {
    fn swap_buffers(&self) -> Result<(), SwapBuffersError> {
        match self.surface.swap_buffers(&self.context) {
            Ok(()) => Ok(()),
            Err(err) if err.error_kind() == ErrorKind::ContextLost => {
                Err(SwapBuffersError::ContextLost)
            },
            Err(err) => {
                log::error!("error while swapping buffers: {}", err);
                Err(SwapBuffersError::ContextLost)
            },
        }
    }

    unsafe fn get_proc_address(&self, symbol: &str) -> *const c_void {
        let symbol = match CString::new(symbol) {
            Ok(symbol) => symbol,
            Err(_) => return std::ptr::null(),
        };
        self.context.display().get_proc_address(&symbol) as *const _
    }

    #[inline]
    fn get_framebuffer_dimensions(&self) -> (u32, u32) {
        (self.surface.width().unwrap_or(0), self.surface.height().unwrap_or(0))
    }

    fn resize(&self, (width, height): (u32, u32)) {
        if let (Some(width), Some(height)) = (NonZeroU32::new(width), NonZeroU32::new(height)) {
            self.surface.resize(&self.context, width, height);
        }
    }

    #[inline]
    fn is_current(&self) -> bool {
        self.context.is_current()
    }

    unsafe fn make_current(&self) {
        if let Err(err) = self.context.make_current(&self.surface) {
            log::error!("failed to make the OpenGL context current: {}", err);
        }
    }
}
