/*!
The display loop shared by both programs.

The window is redrawn when the system asks for it, or continuously when `continuous` is set.
Escape or closing the window ends the program.

*/
use std::rc::Rc;

use winit::event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent};
use winit::event_loop::EventLoop;
use winit::window::Window;

use crate::context::{Context, ExtensionsList};
use crate::gl;
use crate::render::{Quad, Renderer};
use crate::texture::CompressedTexture;
use crate::version::{Api, Version};

/// Everything the display loop owns.
pub struct App {
    window: Window,
    context: Rc<Context>,
    renderer: Renderer,
    texture: CompressedTexture,
    quads: Vec<Quad>,
    // textures that must live as long as the displayed one
    keep_alive: Vec<CompressedTexture>,
    continuous: bool,
}

impl App {
    /// Displays `texture` as `quads`.
    pub fn new(window: Window, context: Rc<Context>, renderer: Renderer,
               texture: CompressedTexture, quads: Vec<Quad>) -> App
    {
        App {
            window,
            context,
            renderer,
            texture,
            quads,
            keep_alive: Vec::new(),
            continuous: false,
        }
    }

    /// Redraw on every iteration of the event loop instead of on demand.
    pub fn with_continuous_redraw(mut self, continuous: bool) -> App {
        self.continuous = continuous;
        self
    }

    /// Keeps a texture alive until the program exits.
    pub fn keep_alive(mut self, texture: CompressedTexture) -> App {
        self.keep_alive.push(texture);
        self
    }

    /// Converts the output of the fragment shader to sRGB.
    pub fn with_srgb_framebuffer(self, srgb: bool) -> App {
        if srgb {
            let ctxt = self.context.make_current();
            if is_framebuffer_srgb_supported(ctxt.version, ctxt.extensions) {
                unsafe { ctxt.gl.Enable(gl::FRAMEBUFFER_SRGB) };
                if let Some(error) = crate::context::get_gl_error(&ctxt) {
                    log::warn!("failed to enable GL_FRAMEBUFFER_SRGB: {}", error);
                }
            } else {
                log::warn!("GL_FRAMEBUFFER_SRGB is not supported, colors are left linear");
            }
        }
        self
    }

    fn redraw(&mut self) {
        self.renderer.draw(&self.texture, &self.quads);

        if let Err(err) = self.context.swap_buffers() {
            log::warn!("failed to swap buffers: {:?}", err);
        }

        self.context.assert_no_error(Some("frame"));
    }

    fn resize(&mut self, (width, height): (u32, u32)) {
        if width == 0 || height == 0 {
            return;
        }

        self.context.resize((width, height));
        self.renderer.reshape((width, height));
        self.window.request_redraw();
    }

    /// Runs the event loop until the window is closed. Never returns.
    pub fn run(mut self, event_loop: EventLoop<()>) -> ! {
        log::info!("displaying {} texture(s), press escape to quit", 1 + self.keep_alive.len());

        event_loop.run(move |event, _, control_flow| {
            if self.continuous {
                control_flow.set_poll();
            } else {
                control_flow.set_wait();
            }

            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => control_flow.set_exit(),
                    WindowEvent::KeyboardInput {
                        input: KeyboardInput {
                            state: ElementState::Pressed,
                            virtual_keycode: Some(VirtualKeyCode::Escape),
                            ..
                        },
                        ..
                    } => control_flow.set_exit(),
                    WindowEvent::Resized(new_size) => self.resize(new_size.into()),
                    _ => (),
                },
                Event::RedrawRequested(_) => self.redraw(),
                Event::MainEventsCleared if self.continuous => self.window.request_redraw(),
                _ => (),
            }
        })
    }
}

/// `GL_FRAMEBUFFER_SRGB` can be enabled from desktop OpenGL 3.0 or with either extension.
fn is_framebuffer_srgb_supported(version: &Version, extensions: &ExtensionsList) -> bool {
    version >= &Version(Api::Gl, 3, 0) || extensions.gl_arb_framebuffer_srgb ||
        extensions.gl_ext_framebuffer_srgb
}

#[cfg(test)]
mod tests {
    use super::is_framebuffer_srgb_supported;
    use crate::context::ExtensionsList;
    use crate::version::{Api, Version};

    #[test]
    fn framebuffer_srgb() {
        let none = ExtensionsList::default();
        let ext = ExtensionsList::from_names(vec!["GL_EXT_framebuffer_sRGB"]);

        assert!(is_framebuffer_srgb_supported(&Version(Api::Gl, 3, 0), &none));
        assert!(!is_framebuffer_srgb_supported(&Version(Api::Gl, 2, 1), &none));
        assert!(!is_framebuffer_srgb_supported(&Version(Api::GlEs, 3, 2), &none));
        assert!(is_framebuffer_srgb_supported(&Version(Api::Gl, 2, 1), &ext));
    }
}
