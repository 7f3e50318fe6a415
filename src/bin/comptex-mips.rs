//! Uploads a compressed mip chain, checks every level and displays them side by side.
use std::fmt;

use comptex::app::App;
use comptex::backend::glutin::SimpleWindowBuilder;
use comptex::cli::{self, MipArgs};
use comptex::container;
use comptex::logging::{self, LoggingConfig};
use comptex::probe;
use comptex::render::{self, Quad, Renderer};
use comptex::{Context, GlDriver};
use winit::event_loop::EventLoop;

fn main() {
    let args: MipArgs = cli::parse_or_exit();
    logging::init_logging(LoggingConfig::default());

    let event_loop = EventLoop::new();
    let (window, backend) = SimpleWindowBuilder::new()
        .with_title("comptex-mips")
        .with_srgb(args.srgb)
        .build(&event_loop)
        .unwrap_or_else(|err| fatal("failed to create the window", err));
    let context = unsafe { Context::new(backend) }
        .unwrap_or_else(|err| fatal("failed to create the OpenGL context", err));

    let mut driver = GlDriver::new(context.clone());

    let image = match args.texfile {
        Some(ref path) => {
            let image = container::load(path)
                .unwrap_or_else(|err| fatal("failed to load compressed texture file", err));
            log::info!("loaded compressed texture file: {} ({}x{}, {}, {} levels)",
                       path.display(), image.width, image.height, image.format,
                       image.levels.len());
            image
        },
        None => {
            probe::generate_mip_chain(&mut driver, args.format(), args.size, args.size)
                .unwrap_or_else(|err| fatal("failed to compress the mip chain", err))
        },
    };

    let report = probe::run_mip_chain(&mut driver, &image)
        .unwrap_or_else(|err| fatal("probe failed", err));

    let mismatches = report.levels.iter().filter(|level| !level.verification.is_match()).count();
    if mismatches != 0 {
        log::warn!("{} of {} levels differ after readback", mismatches, report.levels.len());
    }

    let renderer = Renderer::new(context.clone())
        .unwrap_or_else(|err| fatal("failed to create the renderer", err));

    let quads = render::mip_chain_layout(report.levels.len())
        .into_iter()
        .enumerate()
        .map(|(level, rect)| Quad { rect, lod: level as f32 })
        .collect();

    App::new(window, context, renderer, report.texture, quads)
        .with_srgb_framebuffer(args.srgb)
        .run(event_loop)
}

fn fatal<E>(what: &str, err: E) -> ! where E: fmt::Display {
    log::error!("{}: {}", what, err);
    std::process::exit(1)
}
