use std::ffi::CStr;

use crate::gl;
use crate::version::{Api, Version};

/// Contains data about the list of extensions.
///
/// Only the extensions whose entry points or enums are used somewhere are listed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtensionsList {
    /// GL_ARB_copy_image
    pub gl_arb_copy_image: bool,
    /// GL_ARB_framebuffer_sRGB
    pub gl_arb_framebuffer_srgb: bool,
    /// GL_ARB_get_texture_sub_image
    pub gl_arb_get_texture_sub_image: bool,
    /// GL_ARB_internalformat_query2
    pub gl_arb_internalformat_query2: bool,
    /// GL_EXT_framebuffer_sRGB
    pub gl_ext_framebuffer_srgb: bool,
}

impl ExtensionsList {
    /// Builds the list from extension names. Unknown names are ignored.
    pub fn from_names<'a, I>(names: I) -> ExtensionsList where I: IntoIterator<Item = &'a str> {
        let mut extensions = ExtensionsList::default();

        for extension in names {
            match extension {
                "GL_ARB_copy_image" => extensions.gl_arb_copy_image = true,
                "GL_ARB_framebuffer_sRGB" => extensions.gl_arb_framebuffer_srgb = true,
                "GL_ARB_get_texture_sub_image" => extensions.gl_arb_get_texture_sub_image = true,
                "GL_ARB_internalformat_query2" => extensions.gl_arb_internalformat_query2 = true,
                "GL_EXT_framebuffer_sRGB" => extensions.gl_ext_framebuffer_srgb = true,
                _ => ()
            }
        }

        extensions
    }
}

/// Returns the list of extensions supported by the backend.
///
/// The version must match the one of the backend.
///
/// *Safety*: the OpenGL context corresponding to `gl` must be current in the thread.
pub unsafe fn get_extensions(gl: &gl::Gl, version: &Version) -> ExtensionsList {
    let strings = get_extensions_strings(gl, version);
    ExtensionsList::from_names(strings.iter().map(|s| s.as_str()))
}

/// Returns the list of all extension names supported by the OpenGL implementation.
///
/// *Safety*: the OpenGL context corresponding to `gl` must be current in the thread.
unsafe fn get_extensions_strings(gl: &gl::Gl, version: &Version) -> Vec<String> {
    if version >= &Version(Api::Gl, 3, 0) || version >= &Version(Api::GlEs, 3, 0) {
        let mut num_extensions = 0;
        gl.GetIntegerv(gl::NUM_EXTENSIONS, &mut num_extensions);

        (0 .. num_extensions).filter_map(|num| {
            let ext = gl.GetStringi(gl::EXTENSIONS, num as gl::types::GLuint);
            if ext.is_null() {
                return None;
            }
            Some(CStr::from_ptr(ext as *const _).to_string_lossy().into_owned())
        }).collect()

    } else {
        let list = gl.GetString(gl::EXTENSIONS);
        if list.is_null() {
            return Vec::new();
        }
        let list = CStr::from_ptr(list as *const _).to_string_lossy();
        list.split(' ').filter(|e| !e.is_empty()).map(|e| e.to_owned()).collect()
    }
}
