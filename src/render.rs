/*!
Draws compressed textures on screen.

A single unit quad is drawn once per `Quad`, each time placed and scaled by uniforms and
sampling the texture at an explicit level of detail. The X axis is scaled by the inverse of
the window's aspect ratio so that square textures stay square.

*/
use std::mem;
use std::ptr;
use std::rc::Rc;

use memoffset::offset_of;

use crate::context::{self, CommandContext, Context};
use crate::error::CreationError;
use crate::gl;
use crate::texture::CompressedTexture;
use crate::version::Api;

/// A rectangle in normalized device coordinates, `(x, y)` being its bottom-left corner.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Bottom edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// The whole viewport.
    pub const FULL_SCREEN: Rect = Rect { x: -1.0, y: -1.0, width: 2.0, height: 2.0 };
}

/// One textured rectangle of a frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Quad {
    /// Where to draw.
    pub rect: Rect,
    /// Mip level to sample.
    pub lod: f32,
}

/// Places the levels of a mip chain side by side, each half the size of the previous one,
/// top-aligned, filling the width of the viewport.
pub fn mip_chain_layout(levels: usize) -> Vec<Rect> {
    let total: f32 = (0 .. levels).map(|level| 0.5f32.powi(level as i32)).sum();
    if levels == 0 {
        return Vec::new();
    }

    let base = 2.0 / total;
    let top = base / 2.0;

    let mut x = -1.0;
    (0 .. levels).map(|level| {
        let size = base * 0.5f32.powi(level as i32);
        let rect = Rect { x, y: top - size, width: size, height: size };
        x += size;
        rect
    }).collect()
}

#[derive(Copy, Clone)]
#[repr(C)]
struct Vertex {
    position: [f32; 2],
    tex_coords: [f32; 2],
}

// texture row 0 is at the top of the quad
static QUAD: [Vertex; 4] = [
    Vertex { position: [0.0, 0.0], tex_coords: [0.0, 1.0] },
    Vertex { position: [1.0, 0.0], tex_coords: [1.0, 1.0] },
    Vertex { position: [0.0, 1.0], tex_coords: [0.0, 0.0] },
    Vertex { position: [1.0, 1.0], tex_coords: [1.0, 0.0] },
];

const ATTRIB_POSITION: gl::types::GLuint = 0;
const ATTRIB_TEX_COORDS: gl::types::GLuint = 1;

const VERTEX_SHADER: &str = "
    in vec2 position;
    in vec2 tex_coords;

    uniform vec2 scale;
    uniform vec2 offset;
    uniform vec2 size;

    out vec2 v_tex_coords;

    void main() {
        v_tex_coords = tex_coords;
        gl_Position = vec4((offset + position * size) * scale, 0.0, 1.0);
    }
";

const FRAGMENT_SHADER: &str = "
    in vec2 v_tex_coords;

    uniform sampler2D tex;
    uniform float lod;

    out vec4 color;

    void main() {
        color = textureLod(tex, v_tex_coords, lod);
    }
";

struct Uniforms {
    scale: gl::types::GLint,
    offset: gl::types::GLint,
    size: gl::types::GLint,
    lod: gl::types::GLint,
    tex: gl::types::GLint,
}

/// Owns the program and the quad geometry.
pub struct Renderer {
    context: Rc<Context>,
    program: gl::types::GLuint,
    vertex_array: Option<gl::types::GLuint>,
    vertex_buffer: gl::types::GLuint,
    uniforms: Uniforms,
    scale: [f32; 2],
}

impl Renderer {
    /// Compiles the program and uploads the quad.
    pub fn new(context: Rc<Context>) -> Result<Renderer, CreationError> {
        let (program, vertex_array, vertex_buffer, uniforms) = {
            let ctxt = context.make_current();
            let program = unsafe { build_program(&ctxt)? };

            let uniforms = unsafe {
                Uniforms {
                    scale: ctxt.gl.GetUniformLocation(program, b"scale\0".as_ptr() as *const _),
                    offset: ctxt.gl.GetUniformLocation(program, b"offset\0".as_ptr() as *const _),
                    size: ctxt.gl.GetUniformLocation(program, b"size\0".as_ptr() as *const _),
                    lod: ctxt.gl.GetUniformLocation(program, b"lod\0".as_ptr() as *const _),
                    tex: ctxt.gl.GetUniformLocation(program, b"tex\0".as_ptr() as *const _),
                }
            };

            let (vertex_array, vertex_buffer) = unsafe {
                let mut vertex_buffer = 0;
                ctxt.gl.GenBuffers(1, &mut vertex_buffer);
                ctxt.gl.BindBuffer(gl::ARRAY_BUFFER, vertex_buffer);
                ctxt.gl.BufferData(gl::ARRAY_BUFFER, mem::size_of_val(&QUAD) as gl::types::GLsizeiptr,
                                   QUAD.as_ptr() as *const _, gl::STATIC_DRAW);

                let vertex_array = if ctxt.gl.GenVertexArrays.is_loaded() {
                    let mut vertex_array = 0;
                    ctxt.gl.GenVertexArrays(1, &mut vertex_array);
                    ctxt.gl.BindVertexArray(vertex_array);
                    bind_vertex_attributes(&ctxt);
                    ctxt.gl.BindVertexArray(0);
                    Some(vertex_array)
                } else {
                    None
                };

                (vertex_array, vertex_buffer)
            };

            context::check_gl_error(&ctxt, "creating the quad")
                .map_err(|err| CreationError::Program(err.to_string()))?;

            (program, vertex_array, vertex_buffer, uniforms)
        };

        let mut renderer = Renderer {
            context,
            program,
            vertex_array,
            vertex_buffer,
            uniforms,
            scale: [1.0, 1.0],
        };
        let dimensions = renderer.context.get_framebuffer_dimensions();
        renderer.reshape(dimensions);

        Ok(renderer)
    }

    /// Updates the viewport and the aspect ratio correction.
    pub fn reshape(&mut self, (width, height): (u32, u32)) {
        if width == 0 || height == 0 {
            return;
        }

        let ctxt = self.context.make_current();
        unsafe {
            ctxt.gl.Viewport(0, 0, width as gl::types::GLsizei, height as gl::types::GLsizei);
        }

        let aspect = width as f32 / height as f32;
        self.scale = [1.0 / aspect, 1.0];
    }

    /// Clears the framebuffer and draws `quads` with `texture`.
    pub fn draw(&self, texture: &CompressedTexture, quads: &[Quad]) {
        let ctxt = self.context.make_current();

        unsafe {
            ctxt.gl.ClearColor(0.0, 0.0, 0.0, 1.0);
            ctxt.gl.Clear(gl::COLOR_BUFFER_BIT);

            ctxt.gl.UseProgram(self.program);
            match self.vertex_array {
                Some(vertex_array) => ctxt.gl.BindVertexArray(vertex_array),
                None => {
                    ctxt.gl.BindBuffer(gl::ARRAY_BUFFER, self.vertex_buffer);
                    bind_vertex_attributes(&ctxt);
                },
            }

            texture.bind(&ctxt, 0);
            ctxt.gl.Uniform1i(self.uniforms.tex, 0);
            ctxt.gl.Uniform2f(self.uniforms.scale, self.scale[0], self.scale[1]);

            for quad in quads {
                ctxt.gl.Uniform2f(self.uniforms.offset, quad.rect.x, quad.rect.y);
                ctxt.gl.Uniform2f(self.uniforms.size, quad.rect.width, quad.rect.height);
                ctxt.gl.Uniform1f(self.uniforms.lod, quad.lod);
                ctxt.gl.DrawArrays(gl::TRIANGLE_STRIP, 0, QUAD.len() as gl::types::GLsizei);
            }

            if self.vertex_array.is_some() {
                ctxt.gl.BindVertexArray(0);
            }
            ctxt.gl.UseProgram(0);
        }
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        let ctxt = self.context.make_current();
        unsafe {
            ctxt.gl.DeleteProgram(self.program);
            ctxt.gl.DeleteBuffers(1, [self.vertex_buffer].as_ptr());
            if let Some(vertex_array) = self.vertex_array {
                ctxt.gl.DeleteVertexArrays(1, [vertex_array].as_ptr());
            }
        }
    }
}

unsafe fn bind_vertex_attributes(ctxt: &CommandContext) {
    let stride = mem::size_of::<Vertex>() as gl::types::GLsizei;

    ctxt.gl.EnableVertexAttribArray(ATTRIB_POSITION);
    ctxt.gl.VertexAttribPointer(ATTRIB_POSITION, 2, gl::FLOAT, gl::FALSE, stride,
                                offset_of!(Vertex, position) as *const _);

    ctxt.gl.EnableVertexAttribArray(ATTRIB_TEX_COORDS);
    ctxt.gl.VertexAttribPointer(ATTRIB_TEX_COORDS, 2, gl::FLOAT, gl::FALSE, stride,
                                offset_of!(Vertex, tex_coords) as *const _);
}

unsafe fn build_program(ctxt: &CommandContext) -> Result<gl::types::GLuint, CreationError> {
    let header = match ctxt.version.0 {
        Api::Gl => "#version 130\n",
        Api::GlEs => "#version 300 es\nprecision mediump float;\n",
    };

    let vertex = compile_shader(ctxt, gl::VERTEX_SHADER, &[header, VERTEX_SHADER])?;
    let fragment = match compile_shader(ctxt, gl::FRAGMENT_SHADER, &[header, FRAGMENT_SHADER]) {
        Ok(fragment) => fragment,
        Err(err) => {
            ctxt.gl.DeleteShader(vertex);
            return Err(err);
        },
    };

    let program = ctxt.gl.CreateProgram();
    ctxt.gl.AttachShader(program, vertex);
    ctxt.gl.AttachShader(program, fragment);
    ctxt.gl.BindAttribLocation(program, ATTRIB_POSITION, b"position\0".as_ptr() as *const _);
    ctxt.gl.BindAttribLocation(program, ATTRIB_TEX_COORDS, b"tex_coords\0".as_ptr() as *const _);
    ctxt.gl.LinkProgram(program);

    // the program keeps the shaders alive
    ctxt.gl.DeleteShader(vertex);
    ctxt.gl.DeleteShader(fragment);

    let mut linked = 0;
    ctxt.gl.GetProgramiv(program, gl::LINK_STATUS, &mut linked);
    if linked == 0 {
        let mut length = 0;
        ctxt.gl.GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut length);
        let mut log = vec![0u8; length.max(1) as usize];
        ctxt.gl.GetProgramInfoLog(program, log.len() as gl::types::GLsizei, ptr::null_mut(),
                                  log.as_mut_ptr() as *mut _);
        ctxt.gl.DeleteProgram(program);
        return Err(CreationError::Program(info_log_to_string(log)));
    }

    Ok(program)
}

unsafe fn compile_shader(ctxt: &CommandContext, ty: gl::types::GLenum, sources: &[&str])
                         -> Result<gl::types::GLuint, CreationError>
{
    let shader = ctxt.gl.CreateShader(ty);

    let pointers: Vec<*const gl::types::GLchar> =
        sources.iter().map(|s| s.as_ptr() as *const _).collect();
    let lengths: Vec<gl::types::GLint> =
        sources.iter().map(|s| s.len() as gl::types::GLint).collect();
    ctxt.gl.ShaderSource(shader, sources.len() as gl::types::GLsizei, pointers.as_ptr(),
                         lengths.as_ptr());
    ctxt.gl.CompileShader(shader);

    let mut compiled = 0;
    ctxt.gl.GetShaderiv(shader, gl::COMPILE_STATUS, &mut compiled);
    if compiled == 0 {
        let mut length = 0;
        ctxt.gl.GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut length);
        let mut log = vec![0u8; length.max(1) as usize];
        ctxt.gl.GetShaderInfoLog(shader, log.len() as gl::types::GLsizei, ptr::null_mut(),
                                 log.as_mut_ptr() as *mut _);
        ctxt.gl.DeleteShader(shader);
        return Err(CreationError::Program(info_log_to_string(log)));
    }

    Ok(shader)
}

fn info_log_to_string(mut log: Vec<u8>) -> String {
    if let Some(end) = log.iter().position(|&c| c == 0) {
        log.truncate(end);
    }
    String::from_utf8_lossy(&log).into_owned()
}
