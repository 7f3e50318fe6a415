/*!

A utility to simplify window and context creation with glutin.

`SimpleWindowBuilder` targets the single-window, single-context case of the probe programs.

*/
use std::num::NonZeroU32;

use ::glutin::config::{Config, ConfigTemplateBuilder};
use ::glutin::context::{ContextApi, ContextAttributesBuilder};
use ::glutin::display::GetGlDisplay;
use ::glutin::prelude::*;
use ::glutin::surface::{SurfaceAttributesBuilder, SwapInterval, WindowSurface};
use glutin_winit::DisplayBuilder;
use raw_window_handle::HasRawWindowHandle;
use winit::event_loop::EventLoopWindowTarget;
use winit::window::{Window, WindowBuilder};

use super::GlutinBackend;
use crate::error::CreationError;

/// Builder to simplify context creation.
pub struct SimpleWindowBuilder {
    window_builder: WindowBuilder,
    vsync: bool,
    srgb: bool,
}

impl Default for SimpleWindowBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SimpleWindowBuilder {
    /// Initializes a new builder with default values.
    pub fn new() -> Self {
        Self {
            window_builder: WindowBuilder::new()
                .with_title("comptex")
                .with_inner_size(winit::dpi::PhysicalSize::new(800, 600)),
            vsync: true,
            srgb: false,
        }
    }

    /// Requests the window to be of a certain size.
    /// If this is not set, the builder defaults to 800x600.
    pub fn with_inner_size(mut self, width: u32, height: u32) -> Self {
        self.window_builder = self
            .window_builder
            .with_inner_size(winit::dpi::PhysicalSize::new(width, height));
        self
    }

    /// Set the initial title for the window.
    pub fn with_title(mut self, title: &str) -> Self {
        self.window_builder = self.window_builder.with_title(title);
        self
    }

    /// Creates the window hidden. Used by tests.
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.window_builder = self.window_builder.with_visible(visible);
        self
    }

    /// Replace the used vsync configuration.
    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    /// Prefer an sRGB capable framebuffer configuration.
    pub fn with_srgb(mut self, srgb: bool) -> Self {
        self.srgb = srgb;
        self
    }

    /// Create a new `Window` and the backend owning its OpenGL context.
    pub fn build<T>(self, event_loop: &EventLoopWindowTarget<T>)
                    -> Result<(Window, GlutinBackend), CreationError>
    {
        let srgb = self.srgb;
        let display_builder = DisplayBuilder::new().with_window_builder(Some(self.window_builder));

        let (window, gl_config) = display_builder
            .build(event_loop, ConfigTemplateBuilder::new(), |configs| pick_config(configs, srgb))
            .map_err(|err| CreationError::Window(err.to_string()))?;
        let window = window.ok_or_else(|| CreationError::Window("no window was created".to_owned()))?;

        // Desktop GL first, ES as a fallback for ARM boards and friends.
        let raw_window_handle = window.raw_window_handle();
        let context_attributes = ContextAttributesBuilder::new().build(Some(raw_window_handle));
        let fallback_context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::Gles(None))
            .build(Some(raw_window_handle));

        let gl_display = gl_config.display();
        let not_current_context = unsafe {
            match gl_display.create_context(&gl_config, &context_attributes) {
                Ok(context) => context,
                Err(_) => gl_display.create_context(&gl_config, &fallback_context_attributes)?,
            }
        };

        let (width, height): (u32, u32) = window.inner_size().into();
        let (width, height) = match (NonZeroU32::new(width), NonZeroU32::new(height)) {
            (Some(width), Some(height)) => (width, height),
            _ => return Err(CreationError::Window("window has a zero size".to_owned())),
        };
        let attrs = SurfaceAttributesBuilder::<WindowSurface>::new()
            .build(raw_window_handle, width, height);
        let surface = unsafe { gl_display.create_window_surface(&gl_config, &attrs)? };
        let context = not_current_context.make_current(&surface)?;

        let swap_interval = match NonZeroU32::new(1) {
            Some(one) if self.vsync => SwapInterval::Wait(one),
            _ => SwapInterval::DontWait,
        };
        if let Err(err) = surface.set_swap_interval(&context, swap_interval) {
            log::warn!("failed to set the swap interval: {}", err);
        }

        Ok((window, GlutinBackend::new(context, surface)))
    }
}

/// Picks an sRGB capable config when one is requested, the first config otherwise.
fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>, srgb: bool) -> Config {
    configs
        .reduce(|best, config| {
            if srgb && config.srgb_capable() && !best.srgb_capable() {
                config
            } else {
                best
            }
        })
        .expect("the display returned an empty list of configs")
}
