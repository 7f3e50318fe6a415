/*!
Command line of the two programs.

*/
use std::path::PathBuf;

use clap::Parser;

use crate::format::CompressedFormat;
use crate::probe::{ProbeOptions, TextureSource};

/// Uploads a compressed texture, reads it back and displays it.
///
/// Without a file, the XOR test pattern is compressed by the driver.
#[derive(Debug, Clone, Parser)]
#[command(name = "comptex", version)]
pub struct ProbeArgs {
    /// Texture file to load (a COMPTEX0 container, or a dump with --raw)
    pub texfile: Option<PathBuf>,

    /// Test glGetCompressedTextureSubImage and glCompressedTexSubImage2D
    #[arg(long)]
    pub subtest: bool,

    /// Test glCopyImageSubData
    #[arg(long)]
    pub copytest: bool,

    /// Like --copytest, and redraw continuously
    #[arg(long = "copytest-loop")]
    pub copytest_loop: bool,

    /// The texture file is a raw dump (width, height, bytes) instead of a container
    #[arg(long)]
    pub raw: bool,

    /// Where to dump the texture compressed by the driver
    #[arg(long, value_name = "PATH", default_value = "compressed_texture")]
    pub dump: PathBuf,

    /// Also save the texture compressed by the driver as a COMPTEX0 container
    #[arg(long, value_name = "PATH")]
    pub save_container: Option<PathBuf>,

    /// Use GL_COMPRESSED_SRGB8_ETC2 and an sRGB framebuffer
    #[arg(long)]
    pub srgb: bool,

    /// Edge of the generated texture, in texels
    #[arg(long, value_name = "N", default_value_t = 512,
          value_parser = clap::value_parser!(u32).range(1..))]
    pub size: u32,
}

impl ProbeArgs {
    /// Whether the copy test runs, either alone or looping.
    #[inline]
    pub fn copy_test(&self) -> bool {
        self.copytest || self.copytest_loop
    }

    /// Builds the options of the probe sequence.
    pub fn to_options(&self) -> ProbeOptions {
        let source = match self.texfile {
            Some(ref path) if self.raw => TextureSource::Dump(path.clone()),
            Some(ref path) => TextureSource::Container(path.clone()),
            None => TextureSource::Generated { width: self.size, height: self.size },
        };

        ProbeOptions {
            source,
            format: compressed_format(self.srgb),
            sub_image_test: self.subtest,
            copy_test: self.copy_test(),
            dump_path: Some(self.dump.clone()),
            container_path: self.save_container.clone(),
        }
    }
}

/// Uploads a compressed texture with its whole mip chain and displays every level.
///
/// Without a file, the driver compresses the XOR test pattern at every level.
#[derive(Debug, Clone, Parser)]
#[command(name = "comptex-mips", version)]
pub struct MipArgs {
    /// COMPTEX0 container to load
    pub texfile: Option<PathBuf>,

    /// Use GL_COMPRESSED_SRGB8_ETC2 and an sRGB framebuffer
    #[arg(long)]
    pub srgb: bool,

    /// Edge of the generated level 0, in texels
    #[arg(long, value_name = "N", default_value_t = 512,
          value_parser = clap::value_parser!(u32).range(1..))]
    pub size: u32,
}

impl MipArgs {
    /// Format used when compressing the generated chain.
    #[inline]
    pub fn format(&self) -> CompressedFormat {
        compressed_format(self.srgb)
    }
}

fn compressed_format(srgb: bool) -> CompressedFormat {
    if srgb { CompressedFormat::SRGB8_ETC2 } else { CompressedFormat::RGB8_ETC2 }
}

/// Parses the command line, exiting with status 1 on errors and 0 after `--help`.
pub fn parse_or_exit<P>() -> P where P: Parser {
    match P::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let status = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            std::process::exit(status);
        },
    }
}
