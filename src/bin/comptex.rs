//! Uploads a compressed texture, checks what the driver did with it and displays it.
use std::fmt;

use comptex::app::App;
use comptex::backend::glutin::SimpleWindowBuilder;
use comptex::cli::{self, ProbeArgs};
use comptex::logging::{self, LoggingConfig};
use comptex::probe;
use comptex::render::{Quad, Rect, Renderer};
use comptex::{Context, GlDriver};
use winit::event_loop::EventLoop;

fn main() {
    let args: ProbeArgs = cli::parse_or_exit();
    logging::init_logging(LoggingConfig::default());

    let event_loop = EventLoop::new();
    let (window, backend) = SimpleWindowBuilder::new()
        .with_srgb(args.srgb)
        .build(&event_loop)
        .unwrap_or_else(|err| fatal("failed to create the window", err));
    let context = unsafe { Context::new(backend) }
        .unwrap_or_else(|err| fatal("failed to create the OpenGL context", err));

    let mut driver = GlDriver::new(context.clone());
    let report = probe::run(&mut driver, &args.to_options())
        .unwrap_or_else(|err| fatal("probe failed", err));

    let renderer = Renderer::new(context.clone())
        .unwrap_or_else(|err| fatal("failed to create the renderer", err));

    let quads = vec![Quad { rect: Rect::FULL_SCREEN, lod: 0.0 }];
    let mut app = App::new(window, context, renderer, report.texture, quads)
        .with_continuous_redraw(args.copytest_loop)
        .with_srgb_framebuffer(args.srgb);
    if let Some(source) = report.copy_source {
        app = app.keep_alive(source);
    }

    app.run(event_loop)
}

fn fatal<E>(what: &str, err: E) -> ! where E: fmt::Display {
    log::error!("{}: {}", what, err);
    std::process::exit(1)
}
