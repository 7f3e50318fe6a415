/*!
The backend is the object that owns the OpenGL context and the surface it draws to.

The only implementation provided is the glutin one, in the `glutin` module.

*/
use std::os::raw::c_void;
use std::rc::Rc;
use std::ops::Deref;

pub mod glutin;

/// Error that can happen when swapping buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapBuffersError {
    /// The OpenGL context has been lost and needs to be recreated.
    ContextLost,
    /// The buffers have already been swapped.
    AlreadySwapped,
}

/// Trait for types that can be used as a backend for a `Context`.
///
/// # Safety
///
/// `get_proc_address` must return valid function pointers for the context made current by
/// `make_current`.
pub unsafe trait Backend {
    /// Swaps buffers at the end of a frame.
    fn swap_buffers(&self) -> Result<(), SwapBuffersError>;

    /// Returns the address of an OpenGL function.
    ///
    /// Must be called in the same thread and after the backend has been made current
    /// with `make_current`.
    unsafe fn get_proc_address(&self, symbol: &str) -> *const c_void;

    /// Returns the dimensions of the window, or screen, etc.
    fn get_framebuffer_dimensions(&self) -> (u32, u32);

    /// Resizes the surface. Zero dimensions are ignored.
    fn resize(&self, new_size: (u32, u32));

    /// Returns true if the OpenGL context is the current one in the thread.
    fn is_current(&self) -> bool;

    /// Makes the OpenGL context the current context in the current thread.
    unsafe fn make_current(&self);
}

unsafe impl<T> Backend for Rc<T> where T: Backend {
    #[inline]
    fn swap_buffers(&self) -> Result<(), SwapBuffersError> {
        self.deref().swap_buffers()
    }

    #[inline]
    unsafe fn get_proc_address(&self, symbol: &str) -> *const c_void {
        self.deref().get_proc_address(symbol)
    }

    #[inline]
    fn get_framebuffer_dimensions(&self) -> (u32, u32) {
        self.deref().get_framebuffer_dimensions()
    }

    #[inline]
    fn resize(&self, new_size: (u32, u32)) {
        self.deref().resize(new_size)
    }

    #[inline]
    fn is_current(&self) -> bool {
        self.deref().is_current()
    }

    #[inline]
    unsafe fn make_current(&self) {
        self.deref().make_current();
    }
}
