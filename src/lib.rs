/*!
Probes the compressed texture support of an OpenGL driver.

The library backs two programs:

 - `comptex` uploads a compressed texture (loaded from a file, or produced by the driver from a
   generated test pattern), checks that the driver kept it compressed and at the same size, reads
   it back, optionally exercises the sub-image and copy entry points, then displays it.
 - `comptex-mips` does the same for a whole mip chain and displays every level side by side.

# Files

Two file formats are supported:

 - `COMPTEX0` containers (see the `container` module), a 192 bytes header followed by up to 20
   mip levels,
 - raw dumps (see the `dump` module), the width and height of the image followed by the bytes
   returned by the driver.

# Probing

The probe sequence in the `probe` module is written against the `Driver` trait. `GlDriver`
implements it on top of an OpenGL context:

```no_run
use comptex::backend::glutin::SimpleWindowBuilder;
use comptex::probe::{self, ProbeOptions};
use comptex::{Context, GlDriver};

let event_loop = winit::event_loop::EventLoop::new();
let (_window, backend) = SimpleWindowBuilder::new().build(&event_loop).unwrap();
let context = unsafe { Context::new(backend) }.unwrap();

let mut driver = GlDriver::new(context);
let report = probe::run(&mut driver, &ProbeOptions::default()).unwrap();
assert!(report.verification.is_match());
```

*/
#![warn(missing_docs)]

pub use crate::container::CompressedImage;
pub use crate::context::{CommandContext, Context, ExtensionsList};
pub use crate::driver::{Driver, FormatSupport, LevelInfo, Region};
pub use crate::error::{ContainerError, CreationError, DumpError, ProbeError};
pub use crate::format::CompressedFormat;
pub use crate::texture::{CompressedTexture, GlDriver};
pub use crate::version::{Api, Version};

pub mod app;
pub mod backend;
pub mod cli;
pub mod container;
pub mod context;
pub mod driver;
pub mod dump;
pub mod error;
pub mod format;
pub mod logging;
pub mod pattern;
pub mod probe;
pub mod render;
pub mod texture;
pub mod version;

#[allow(clippy::all, missing_docs, non_camel_case_types, non_snake_case, non_upper_case_globals)]
mod gl {
    include!(concat!(env!("OUT_DIR"), "/gl_bindings.rs"));
}
