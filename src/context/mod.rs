/*!
Contains everything related to the OpenGL context: the loaded function pointers, the version
and the extensions.

*/
use std::rc::Rc;

use backtrace::Backtrace;

use crate::backend::{Backend, SwapBuffersError};
use crate::error::{CreationError, ProbeError};
use crate::gl;
use crate::version::{self, Api, Version};

pub use self::extensions::ExtensionsList;

mod extensions;

/// Stores the state and information required for OpenGL calls.
pub struct Context {
    gl: gl::Gl,
    version: Version,
    extensions: ExtensionsList,
    backend: Box<dyn Backend>,
}

/// Borrowed access to the function pointers, given out once the context is current.
pub struct CommandContext<'a> {
    /// Loaded OpenGL functions.
    pub gl: &'a gl::Gl,
    /// Version of the context.
    pub version: &'a Version,
    /// Supported extensions.
    pub extensions: &'a ExtensionsList,
}

impl Context {
    /// Builds a new context from a backend.
    ///
    /// # Safety
    ///
    /// The backend must stay valid for as long as the `Context` lives.
    pub unsafe fn new<B>(backend: B) -> Result<Rc<Context>, CreationError> where B: Backend + 'static {
        backend.make_current();

        let gl = gl::Gl::load_with(|symbol| backend.get_proc_address(symbol));

        let version = version::get_gl_version(&gl).ok_or_else(|| {
            CreationError::IncompatibleOpenGl("glGetString(GL_VERSION) returned garbage".to_owned())
        })?;
        let extensions = extensions::get_extensions(&gl, &version);

        check_gl_compatibility(&gl, &version)?;

        log::info!("created {} context", version);

        Ok(Rc::new(Context {
            gl,
            version,
            extensions,
            backend: Box::new(backend),
        }))
    }

    /// Makes the context current if needed and gives access to the OpenGL functions.
    #[inline]
    pub fn make_current(&self) -> CommandContext<'_> {
        if !self.backend.is_current() {
            unsafe { self.backend.make_current() };
        }

        CommandContext {
            gl: &self.gl,
            version: &self.version,
            extensions: &self.extensions,
        }
    }

    /// Returns the OpenGL version of the context.
    #[inline]
    pub fn get_version(&self) -> &Version {
        &self.version
    }

    /// Returns the list of extensions that are supported.
    #[inline]
    pub fn get_extensions(&self) -> &ExtensionsList {
        &self.extensions
    }

    /// Returns the dimensions of the default framebuffer.
    #[inline]
    pub fn get_framebuffer_dimensions(&self) -> (u32, u32) {
        self.backend.get_framebuffer_dimensions()
    }

    /// Resizes the default framebuffer.
    #[inline]
    pub fn resize(&self, new_size: (u32, u32)) {
        self.backend.resize(new_size)
    }

    /// Swaps the front and back buffers.
    #[inline]
    pub fn swap_buffers(&self) -> Result<(), SwapBuffersError> {
        self.backend.swap_buffers()
    }

    /// Pops the pending OpenGL error, if any.
    pub fn get_error(&self) -> Option<&'static str> {
        get_gl_error(&self.make_current())
    }

    /// Asserts that there are no OpenGL errors pending.
    ///
    /// Panics with a backtrace in debug builds. Release builds only log the error.
    pub fn assert_no_error(&self, user_msg: Option<&str>) {
        let error = match self.get_error() {
            Some(error) => error,
            None => return,
        };

        let user_msg = user_msg.unwrap_or("OpenGL error");

        if cfg!(debug_assertions) {
            let backtrace = Backtrace::new();
            panic!("{}: {}\n{:?}", user_msg, error, backtrace);
        } else {
            log::error!("{}: {}", user_msg, error);
        }
    }
}

/// Pops the pending OpenGL error, if any, and returns its name.
pub fn get_gl_error(ctxt: &CommandContext) -> Option<&'static str> {
    match unsafe { ctxt.gl.GetError() } {
        gl::NO_ERROR => None,
        gl::INVALID_ENUM => Some("GL_INVALID_ENUM"),
        gl::INVALID_VALUE => Some("GL_INVALID_VALUE"),
        gl::INVALID_OPERATION => Some("GL_INVALID_OPERATION"),
        gl::INVALID_FRAMEBUFFER_OPERATION => Some("GL_INVALID_FRAMEBUFFER_OPERATION"),
        gl::OUT_OF_MEMORY => Some("GL_OUT_OF_MEMORY"),
        gl::STACK_UNDERFLOW => Some("GL_STACK_UNDERFLOW"),
        gl::STACK_OVERFLOW => Some("GL_STACK_OVERFLOW"),
        _ => Some("Unknown glGetError return value")
    }
}

/// Turns a pending OpenGL error into a `ProbeError` naming `call`.
pub fn check_gl_error(ctxt: &CommandContext, call: &'static str) -> Result<(), ProbeError> {
    match get_gl_error(ctxt) {
        None => Ok(()),
        Some(error) => Err(ProbeError::Gl { call, error }),
    }
}

/// Discards every pending OpenGL error.
pub fn clear_gl_errors(ctxt: &CommandContext) {
    // a context can queue one flag per error kind
    for _ in 0 .. 8 {
        if get_gl_error(ctxt).is_none() {
            break;
        }
    }
}

fn check_gl_compatibility(gl: &gl::Gl, version: &Version) -> Result<(), CreationError> {
    let mut result = Vec::with_capacity(0);

    if !(version >= &Version(Api::Gl, 1, 3)) && !(version >= &Version(Api::GlEs, 2, 0)) {
        result.push("OpenGL implementation doesn't support compressed textures");
    }

    if !gl.CompressedTexImage2D.is_loaded() {
        result.push("glCompressedTexImage2D is not available");
    }

    if !gl.CreateShader.is_loaded() || !gl.VertexAttribPointer.is_loaded() {
        result.push("OpenGL implementation doesn't support vertex and fragment shaders");
    }

    if result.is_empty() {
        Ok(())
    } else {
        Err(CreationError::IncompatibleOpenGl(result.join("\n")))
    }
}
