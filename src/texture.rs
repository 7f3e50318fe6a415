/*!
OpenGL implementation of `Driver`.

Every texture is a `GL_TEXTURE_2D`. The functions here call OpenGL directly and check
`glGetError` after each call that matters; entry points that the context doesn't expose are
reported as `ProbeError::Unsupported` instead of being called.

*/
use std::rc::Rc;

use smallvec::SmallVec;

use crate::container;
use crate::context::{self, CommandContext, Context, ExtensionsList};
use crate::driver::{Driver, FormatSupport, LevelInfo, Region};
use crate::error::ProbeError;
use crate::format::CompressedFormat;
use crate::gl;
use crate::version::{Api, Version};

/// A texture object holding compressed data. The OpenGL object is deleted on drop.
pub struct CompressedTexture {
    context: Rc<Context>,
    id: gl::types::GLuint,
    format: CompressedFormat,
    width: u32,
    height: u32,
    levels: u32,
}

impl CompressedTexture {
    /// Generates a new texture object and binds it to `GL_TEXTURE_2D`.
    fn create(context: &Rc<Context>, ctxt: &CommandContext, format: CompressedFormat,
              width: u32, height: u32, levels: u32) -> CompressedTexture
    {
        let mut id = 0;
        unsafe {
            ctxt.gl.GenTextures(1, &mut id);
            ctxt.gl.BindTexture(gl::TEXTURE_2D, id);
        }

        CompressedTexture {
            context: context.clone(),
            id,
            format,
            width,
            height,
            levels,
        }
    }

    /// Returns the OpenGL name of the texture.
    #[inline]
    pub fn get_id(&self) -> gl::types::GLuint {
        self.id
    }

    /// Returns the format the texture was created with.
    #[inline]
    pub fn format(&self) -> CompressedFormat {
        self.format
    }

    /// Returns the dimensions of level 0.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the number of mip levels.
    #[inline]
    pub fn levels(&self) -> u32 {
        self.levels
    }

    /// Returns the dimensions of a mip level.
    #[inline]
    pub fn level_dimensions(&self, level: u32) -> (u32, u32) {
        container::level_dimensions(self.width, self.height, level)
    }

    /// Binds the texture to texture unit `unit`.
    pub fn bind(&self, ctxt: &CommandContext, unit: u32) {
        unsafe {
            ctxt.gl.ActiveTexture(gl::TEXTURE0 + unit);
            ctxt.gl.BindTexture(gl::TEXTURE_2D, self.id);
        }
    }
}

impl Drop for CompressedTexture {
    fn drop(&mut self) {
        let ctxt = self.context.make_current();
        unsafe {
            ctxt.gl.DeleteTextures(1, [self.id].as_ptr());
        }
    }
}

/// Implements `Driver` on top of an OpenGL context.
pub struct GlDriver {
    context: Rc<Context>,
}

impl GlDriver {
    /// Builds the driver.
    pub fn new(context: Rc<Context>) -> GlDriver {
        GlDriver { context }
    }

    /// Returns the context.
    #[inline]
    pub fn get_context(&self) -> &Rc<Context> {
        &self.context
    }
}

impl Driver for GlDriver {
    type Texture = CompressedTexture;

    fn compressed_formats(&mut self) -> SmallVec<[FormatSupport; 32]> {
        let ctxt = self.context.make_current();
        let can_query = ctxt.gl.GetInternalformativ.is_loaded() &&
            (ctxt.version >= &Version(Api::Gl, 4, 3) ||
             ctxt.extensions.gl_arb_internalformat_query2);

        let mut formats = SmallVec::new();
        unsafe {
            let mut num_formats = 0;
            ctxt.gl.GetIntegerv(gl::NUM_COMPRESSED_TEXTURE_FORMATS, &mut num_formats);
            if num_formats <= 0 {
                return formats;
            }

            let mut list = vec![0 as gl::types::GLint; num_formats as usize];
            ctxt.gl.GetIntegerv(gl::COMPRESSED_TEXTURE_FORMATS, list.as_mut_ptr());

            for format in list {
                let compressed = if can_query {
                    let mut value = 0;
                    ctxt.gl.GetInternalformativ(gl::TEXTURE_2D, format as gl::types::GLenum,
                                                gl::TEXTURE_COMPRESSED, 1, &mut value);
                    Some(value == gl::TRUE as gl::types::GLint)
                } else {
                    None
                };

                formats.push(FormatSupport {
                    format: CompressedFormat(format as u32),
                    compressed,
                });
            }
        }

        context::clear_gl_errors(&ctxt);
        formats
    }

    fn compress(&mut self, format: CompressedFormat, width: u32, height: u32, pixels: &[u8])
                -> Result<Vec<u8>, ProbeError>
    {
        let expected = width as usize * height as usize * 3;
        if pixels.len() != expected {
            return Err(ProbeError::DataSizeMismatch { expected, got: pixels.len() });
        }

        let texture = {
            let ctxt = self.context.make_current();
            context::clear_gl_errors(&ctxt);

            let texture = CompressedTexture::create(&self.context, &ctxt, format, width, height, 1);
            unsafe {
                // RGB rows aren't 4-byte aligned in general
                ctxt.gl.PixelStorei(gl::UNPACK_ALIGNMENT, 1);
                ctxt.gl.TexImage2D(gl::TEXTURE_2D, 0, format.0 as gl::types::GLint,
                                   width as gl::types::GLsizei, height as gl::types::GLsizei, 0,
                                   gl::RGB, gl::UNSIGNED_BYTE, pixels.as_ptr() as *const _);
            }
            context::check_gl_error(&ctxt, "glTexImage2D")?;
            texture
        };

        let info = self.level_info(&texture, 0)?;
        if !info.compressed {
            return Err(ProbeError::NotCompressed);
        }

        self.read_level(&texture, 0)
    }

    fn upload(&mut self, format: CompressedFormat, width: u32, height: u32, levels: &[&[u8]])
              -> Result<CompressedTexture, ProbeError>
    {
        let ctxt = self.context.make_current();
        context::clear_gl_errors(&ctxt);

        let texture = CompressedTexture::create(&self.context, &ctxt, format, width, height,
                                                levels.len() as u32);

        unsafe {
            let min_filter = if levels.len() > 1 { gl::LINEAR_MIPMAP_NEAREST } else { gl::LINEAR };
            ctxt.gl.TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, min_filter as gl::types::GLint);
            ctxt.gl.TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, gl::LINEAR as gl::types::GLint);
            ctxt.gl.TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAX_LEVEL,
                                  levels.len().saturating_sub(1) as gl::types::GLint);
            ctxt.gl.PixelStorei(gl::UNPACK_ALIGNMENT, 1);

            for (level, data) in levels.iter().enumerate() {
                let (level_width, level_height) = texture.level_dimensions(level as u32);
                ctxt.gl.CompressedTexImage2D(gl::TEXTURE_2D, level as gl::types::GLint, format.0,
                                             level_width as gl::types::GLsizei,
                                             level_height as gl::types::GLsizei, 0,
                                             data.len() as gl::types::GLsizei,
                                             data.as_ptr() as *const _);
                context::check_gl_error(&ctxt, "glCompressedTexImage2D")?;
            }
        }

        Ok(texture)
    }

    fn level_info(&mut self, texture: &CompressedTexture, level: u32)
                  -> Result<LevelInfo, ProbeError>
    {
        let ctxt = self.context.make_current();
        if !ctxt.gl.GetTexLevelParameteriv.is_loaded() {
            return Err(ProbeError::Unsupported("glGetTexLevelParameteriv"));
        }

        let level = level as gl::types::GLint;
        let (compressed, size, internal_format, width, height) = unsafe {
            ctxt.gl.BindTexture(gl::TEXTURE_2D, texture.id);

            let mut compressed = 0;
            ctxt.gl.GetTexLevelParameteriv(gl::TEXTURE_2D, level, gl::TEXTURE_COMPRESSED, &mut compressed);

            let mut size = 0;
            if compressed != 0 {
                ctxt.gl.GetTexLevelParameteriv(gl::TEXTURE_2D, level,
                                               gl::TEXTURE_COMPRESSED_IMAGE_SIZE, &mut size);
            }

            let mut internal_format = 0;
            ctxt.gl.GetTexLevelParameteriv(gl::TEXTURE_2D, level, gl::TEXTURE_INTERNAL_FORMAT,
                                           &mut internal_format);

            let mut width = 0;
            ctxt.gl.GetTexLevelParameteriv(gl::TEXTURE_2D, level, gl::TEXTURE_WIDTH, &mut width);
            let mut height = 0;
            ctxt.gl.GetTexLevelParameteriv(gl::TEXTURE_2D, level, gl::TEXTURE_HEIGHT, &mut height);

            (compressed, size, internal_format, width, height)
        };
        context::check_gl_error(&ctxt, "glGetTexLevelParameteriv")?;

        Ok(LevelInfo {
            compressed: compressed != 0,
            compressed_size: size.max(0) as usize,
            internal_format: CompressedFormat(internal_format as u32),
            width: width.max(0) as u32,
            height: height.max(0) as u32,
        })
    }

    fn read_level(&mut self, texture: &CompressedTexture, level: u32)
                  -> Result<Vec<u8>, ProbeError>
    {
        let info = self.level_info(texture, level)?;
        if !info.compressed {
            return Err(ProbeError::NotCompressed);
        }

        let ctxt = self.context.make_current();
        if !ctxt.gl.GetCompressedTexImage.is_loaded() {
            return Err(ProbeError::Unsupported("glGetCompressedTexImage"));
        }

        let mut buffer = vec![0u8; info.compressed_size];
        unsafe {
            unbind_pixel_pack_buffer(&ctxt);
            ctxt.gl.PixelStorei(gl::PACK_ALIGNMENT, 1);
            ctxt.gl.BindTexture(gl::TEXTURE_2D, texture.id);
            ctxt.gl.GetCompressedTexImage(gl::TEXTURE_2D, level as gl::types::GLint,
                                          buffer.as_mut_ptr() as *mut _);
        }
        context::check_gl_error(&ctxt, "glGetCompressedTexImage")?;

        Ok(buffer)
    }

    fn read_region(&mut self, texture: &CompressedTexture, level: u32, region: Region)
                   -> Result<Vec<u8>, ProbeError>
    {
        let (width, height) = texture.level_dimensions(level);
        let size = region.validate(texture.format, width, height)?;

        let ctxt = self.context.make_current();
        if !is_texture_sub_image_supported(ctxt.version, ctxt.extensions) ||
            !ctxt.gl.GetCompressedTextureSubImage.is_loaded()
        {
            return Err(ProbeError::Unsupported("glGetCompressedTextureSubImage"));
        }

        let mut buffer = vec![0u8; size];
        unsafe {
            unbind_pixel_pack_buffer(&ctxt);
            ctxt.gl.PixelStorei(gl::PACK_ALIGNMENT, 1);
            ctxt.gl.GetCompressedTextureSubImage(texture.id, level as gl::types::GLint,
                                                 region.x as gl::types::GLint,
                                                 region.y as gl::types::GLint, 0,
                                                 region.width as gl::types::GLsizei,
                                                 region.height as gl::types::GLsizei, 1,
                                                 size as gl::types::GLsizei,
                                                 buffer.as_mut_ptr() as *mut _);
        }
        context::check_gl_error(&ctxt, "glGetCompressedTextureSubImage")?;

        Ok(buffer)
    }

    fn write_region(&mut self, texture: &CompressedTexture, level: u32, region: Region,
                    data: &[u8]) -> Result<(), ProbeError>
    {
        let (width, height) = texture.level_dimensions(level);
        let size = region.validate(texture.format, width, height)?;
        if data.len() != size {
            return Err(ProbeError::DataSizeMismatch { expected: size, got: data.len() });
        }

        let ctxt = self.context.make_current();
        unsafe {
            ctxt.gl.BindTexture(gl::TEXTURE_2D, texture.id);
            ctxt.gl.PixelStorei(gl::UNPACK_ALIGNMENT, 1);
            ctxt.gl.CompressedTexSubImage2D(gl::TEXTURE_2D, level as gl::types::GLint,
                                            region.x as gl::types::GLint,
                                            region.y as gl::types::GLint,
                                            region.width as gl::types::GLsizei,
                                            region.height as gl::types::GLsizei,
                                            texture.format.0, size as gl::types::GLsizei,
                                            data.as_ptr() as *const _);
        }
        context::check_gl_error(&ctxt, "glCompressedTexSubImage2D")
    }

    fn copy_region(&mut self, source: &CompressedTexture, region: Region,
                   destination: &CompressedTexture, dest_x: u32, dest_y: u32)
                   -> Result<(), ProbeError>
    {
        region.validate(source.format, source.width, source.height)?;
        Region::new(dest_x, dest_y, region.width, region.height)
            .validate(destination.format, destination.width, destination.height)?;

        let ctxt = self.context.make_current();
        if !is_copy_image_supported(ctxt.version, ctxt.extensions) ||
            !ctxt.gl.CopyImageSubData.is_loaded()
        {
            return Err(ProbeError::Unsupported("glCopyImageSubData"));
        }

        unsafe {
            ctxt.gl.CopyImageSubData(source.id, gl::TEXTURE_2D, 0,
                                     region.x as gl::types::GLint,
                                     region.y as gl::types::GLint, 0,
                                     destination.id, gl::TEXTURE_2D, 0,
                                     dest_x as gl::types::GLint, dest_y as gl::types::GLint, 0,
                                     region.width as gl::types::GLsizei,
                                     region.height as gl::types::GLsizei, 1);
        }
        context::check_gl_error(&ctxt, "glCopyImageSubData")
    }
}

/// Returns true if `glGetCompressedTextureSubImage` is part of the context.
///
/// Window system loaders hand out pointers for entry points the driver doesn't implement, so
/// `is_loaded` alone can't tell.
pub fn is_texture_sub_image_supported(version: &Version, extensions: &ExtensionsList) -> bool {
    version >= &Version(Api::Gl, 4, 5) || extensions.gl_arb_get_texture_sub_image
}

/// Returns true if `glCopyImageSubData` is part of the context.
///
/// `GL_NV_copy_image` doesn't count: `glCopyImageSubDataNV` is a different entry point.
pub fn is_copy_image_supported(version: &Version, extensions: &ExtensionsList) -> bool {
    version >= &Version(Api::Gl, 4, 3) || version >= &Version(Api::GlEs, 3, 2) ||
        extensions.gl_arb_copy_image
}

unsafe fn unbind_pixel_pack_buffer(ctxt: &CommandContext) {
    if ctxt.version >= &Version(Api::Gl, 2, 1) || ctxt.version >= &Version(Api::GlEs, 3, 0) {
        ctxt.gl.BindBuffer(gl::PIXEL_PACK_BUFFER, 0);
    }
}

#[cfg(test)]
mod tests {
    use super::{is_copy_image_supported, is_texture_sub_image_supported};
    use crate::context::ExtensionsList;
    use crate::version::{Api, Version};

    #[test]
    fn texture_sub_image_needs_gl45_or_extension() {
        let none = ExtensionsList::default();
        let ext = ExtensionsList::from_names(vec!["GL_ARB_get_texture_sub_image"]);

        assert!(is_texture_sub_image_supported(&Version(Api::Gl, 4, 5), &none));
        assert!(is_texture_sub_image_supported(&Version(Api::Gl, 4, 6), &none));
        assert!(!is_texture_sub_image_supported(&Version(Api::Gl, 4, 4), &none));
        assert!(!is_texture_sub_image_supported(&Version(Api::Gl, 3, 3), &none));
        assert!(!is_texture_sub_image_supported(&Version(Api::GlEs, 3, 2), &none));
        assert!(is_texture_sub_image_supported(&Version(Api::Gl, 3, 3), &ext));
    }

    #[test]
    fn copy_image_needs_gl43_es32_or_extension() {
        let none = ExtensionsList::default();
        let arb = ExtensionsList::from_names(vec!["GL_ARB_copy_image"]);
        let nv = ExtensionsList::from_names(vec!["GL_NV_copy_image"]);

        assert!(is_copy_image_supported(&Version(Api::Gl, 4, 3), &none));
        assert!(is_copy_image_supported(&Version(Api::GlEs, 3, 2), &none));
        assert!(!is_copy_image_supported(&Version(Api::Gl, 4, 2), &none));
        assert!(!is_copy_image_supported(&Version(Api::GlEs, 3, 1), &none));
        assert!(is_copy_image_supported(&Version(Api::Gl, 3, 0), &arb));
        assert!(!is_copy_image_supported(&Version(Api::Gl, 3, 0), &nv));
    }
}
