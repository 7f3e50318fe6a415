/*!
The probe sequence.

`run` is the sequence of the `comptex` program:

1. list the compressed formats the driver advertises,
2. load a container or a dump, or generate the XOR pattern and let the driver compress it,
3. upload the compressed bytes, check that the driver kept them compressed and at the same
   size, read them back and compare,
4. optionally run the sub-image test and the copy test.

`run_mip_chain` does the same for every level of a mip chain, for `comptex-mips`.

Fatal failures are returned as errors. A readback that doesn't match, a failed dump or a
skipped optional test are logged and recorded in the report.

*/
use std::path::PathBuf;

use crate::container::{self, CompressedImage, MAX_LEVELS};
use crate::driver::{Driver, Region};
use crate::dump;
use crate::error::ProbeError;
use crate::format::CompressedFormat;
use crate::pattern;

/// Region read back by the sub-image test.
pub const SUB_IMAGE_SOURCE: Region = Region::new(192, 64, 64, 64);
/// Where the sub-image test writes the region back.
pub const SUB_IMAGE_DEST: (u32, u32) = (32, 32);
/// Region of the second texture copied by the copy test.
pub const COPY_SOURCE: Region = Region::new(128, 64, 64, 64);
/// Where the copy test writes into the first texture.
pub const COPY_DEST: (u32, u32) = (32, 32);

/// Where the texture data comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextureSource {
    /// Generate the XOR pattern and let the driver compress it.
    Generated {
        /// Width of the generated image.
        width: u32,
        /// Height of the generated image.
        height: u32,
    },
    /// Load the first level of a `COMPTEX0` container.
    Container(PathBuf),
    /// Load a raw dump; the format comes from `ProbeOptions::format`.
    Dump(PathBuf),
}

/// Options of `run`.
#[derive(Debug, Clone)]
pub struct ProbeOptions {
    /// Source of the texture.
    pub source: TextureSource,
    /// Format to compress to, and format of dumps.
    pub format: CompressedFormat,
    /// Run the sub-image test.
    pub sub_image_test: bool,
    /// Run the copy test.
    pub copy_test: bool,
    /// Where to dump the driver-compressed texture.
    pub dump_path: Option<PathBuf>,
    /// Where to save the driver-compressed texture as a container.
    pub container_path: Option<PathBuf>,
}

impl Default for ProbeOptions {
    fn default() -> ProbeOptions {
        ProbeOptions {
            source: TextureSource::Generated { width: 512, height: 512 },
            format: CompressedFormat::RGB8_ETC2,
            sub_image_test: false,
            copy_test: false,
            dump_path: Some(PathBuf::from("compressed_texture")),
            container_path: None,
        }
    }
}

/// Result of comparing submitted and retrieved bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// Both buffers are identical.
    Match {
        /// Number of bytes compared.
        size: usize,
    },
    /// The buffers differ.
    Mismatch {
        /// First offset that differs. Equal to the shorter length if one buffer is a prefix
        /// of the other.
        offset: usize,
    },
}

impl Verification {
    /// Returns true for `Match`.
    #[inline]
    pub fn is_match(&self) -> bool {
        matches!(*self, Verification::Match { .. })
    }
}

/// Outcome of an optional test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestOutcome {
    /// The test wasn't requested.
    NotRun,
    /// The test ran.
    Done,
    /// The test was requested but couldn't run.
    Skipped(String),
}

/// Everything `run` found out.
pub struct ProbeReport<T> {
    /// The texture to display.
    pub texture: T,
    /// The second texture of the copy test, kept alive with the first one.
    pub copy_source: Option<T>,
    /// Format of the texture.
    pub format: CompressedFormat,
    /// Width of the texture.
    pub width: u32,
    /// Height of the texture.
    pub height: u32,
    /// Compressed size reported by the driver right after the upload.
    pub compressed_size: usize,
    /// Comparison of the uploaded and read back bytes.
    pub verification: Verification,
    /// Outcome of the sub-image test.
    pub sub_image_test: TestOutcome,
    /// Outcome of the copy test.
    pub copy_test: TestOutcome,
}

/// Report of one level of `run_mip_chain`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelReport {
    /// Width of the level.
    pub width: u32,
    /// Height of the level.
    pub height: u32,
    /// Compressed size reported by the driver.
    pub compressed_size: usize,
    /// Comparison of the uploaded and read back bytes.
    pub verification: Verification,
}

/// Everything `run_mip_chain` found out.
pub struct MipChainReport<T> {
    /// The texture, with every level.
    pub texture: T,
    /// Format of the texture.
    pub format: CompressedFormat,
    /// One entry per level.
    pub levels: Vec<LevelReport>,
}

/// Compares the submitted and retrieved bytes.
pub fn verify(submitted: &[u8], retrieved: &[u8]) -> Verification {
    match submitted.iter().zip(retrieved.iter()).position(|(a, b)| a != b) {
        Some(offset) => Verification::Mismatch { offset },
        None if submitted.len() != retrieved.len() => Verification::Mismatch {
            offset: submitted.len().min(retrieved.len()),
        },
        None => Verification::Match { size: submitted.len() },
    }
}

/// Logs the compressed formats advertised by the driver.
pub fn print_compressed_formats<D>(driver: &mut D) where D: Driver {
    let formats = driver.compressed_formats();
    log::info!("{} generic compressed texture formats available:", formats.len());

    for support in formats {
        let state = match support.compressed {
            Some(true) => "compressed format",
            Some(false) => "not compressed format",
            None => "compression unknown",
        };
        log::info!(" {:05x}: {} ({})", support.format.0, support.format.name(), state);
    }
}

/// Runs the probe sequence.
pub fn run<D>(driver: &mut D, options: &ProbeOptions)
              -> Result<ProbeReport<D::Texture>, ProbeError> where D: Driver
{
    print_compressed_formats(driver);

    let image = load_source(driver, options)?;

    let (texture, compressed_size) = upload_checked(driver, &image)?;
    let verification = readback(driver, &texture, 0, image.first_level())?;

    let sub_image_test = if options.sub_image_test {
        log::info!("testing glGetCompressedTextureSubImage and glCompressedTexSubImage2D");
        outcome(sub_image_test(driver, &texture))
    } else {
        TestOutcome::NotRun
    };

    let (copy_source, copy_test) = if options.copy_test {
        log::info!("testing glCopyImageSubData");
        match copy_test(driver, &texture, &image) {
            Ok(source) => (Some(source), TestOutcome::Done),
            Err(err) => (None, outcome(Err(err))),
        }
    } else {
        (None, TestOutcome::NotRun)
    };

    Ok(ProbeReport {
        texture,
        copy_source,
        format: image.format,
        width: image.width,
        height: image.height,
        compressed_size,
        verification,
        sub_image_test,
        copy_test,
    })
}

fn load_source<D>(driver: &mut D, options: &ProbeOptions)
                  -> Result<CompressedImage, ProbeError> where D: Driver
{
    match options.source {
        TextureSource::Container(ref path) => {
            let image = container::load_first_level(path)?;
            log::info!("loaded compressed texture file: {} ({}x{}, {})",
                       path.display(), image.width, image.height, image.format);
            Ok(image)
        },

        TextureSource::Dump(ref path) => {
            let dump = dump::load(path)?;
            log::info!("loaded compressed texture dump: {} ({}x{})",
                       path.display(), dump.width, dump.height);
            Ok(CompressedImage::new(options.format, dump.width, dump.height, dump.data))
        },

        TextureSource::Generated { width, height } => {
            let pixels = pattern::generate(width, height);

            log::info!("compressing texture");
            let data = driver.compress(options.format, width, height, &pixels)?;
            log::info!("compressed texture is {} bytes (uncompressed was: {})",
                       data.len(), pixels.len());

            let image = CompressedImage::new(options.format, width, height, data);

            if let Some(ref path) = options.dump_path {
                if let Err(err) = dump::save(path, width, height, image.first_level()) {
                    log::warn!("failed to dump compressed texture to {}: {}", path.display(), err);
                }
            }

            if let Some(ref path) = options.container_path {
                if let Err(err) = container::save(path, &image) {
                    log::warn!("failed to save compressed texture to {}: {}", path.display(), err);
                }
            }

            Ok(image)
        },
    }
}

/// Uploads the first level and checks what the driver made of it.
fn upload_checked<D>(driver: &mut D, image: &CompressedImage)
                     -> Result<(D::Texture, usize), ProbeError> where D: Driver
{
    let data = image.first_level();
    let texture = driver.upload(image.format, image.width, image.height, &[data])?;

    let info = driver.level_info(&texture, 0)?;
    if !info.compressed {
        return Err(ProbeError::NotCompressed);
    }
    if info.compressed_size != data.len() {
        return Err(ProbeError::SizeMismatch { expected: data.len(), got: info.compressed_size });
    }

    Ok((texture, info.compressed_size))
}

/// Reads a level back and compares it with what was submitted.
fn readback<D>(driver: &mut D, texture: &D::Texture, level: u32, submitted: &[u8])
               -> Result<Verification, ProbeError> where D: Driver
{
    let retrieved = driver.read_level(texture, level)?;
    let verification = verify(submitted, &retrieved);

    match verification {
        Verification::Match { size } => {
            log::info!("submitted and retrieved sizes match ({} bytes)", size);
        },
        Verification::Mismatch { offset } => {
            log::warn!("submitted and retrieved pixel data differ! (level {}, first difference \
                        at byte {})", level, offset);
        },
    }

    Ok(verification)
}

fn sub_image_test<D>(driver: &mut D, texture: &D::Texture) -> Result<(), ProbeError>
    where D: Driver
{
    let data = driver.read_region(texture, 0, SUB_IMAGE_SOURCE)?;
    let (x, y) = SUB_IMAGE_DEST;
    let dest = Region::new(x, y, SUB_IMAGE_SOURCE.width, SUB_IMAGE_SOURCE.height);
    driver.write_region(texture, 0, dest, &data)
}

fn copy_test<D>(driver: &mut D, texture: &D::Texture, image: &CompressedImage)
                -> Result<D::Texture, ProbeError> where D: Driver
{
    let source = driver.upload(image.format, image.width, image.height, &[image.first_level()])?;
    let (x, y) = COPY_DEST;
    driver.copy_region(&source, COPY_SOURCE, texture, x, y)?;
    Ok(source)
}

/// Optional tests never abort the run.
fn outcome(result: Result<(), ProbeError>) -> TestOutcome {
    match result {
        Ok(()) => TestOutcome::Done,
        Err(err) => {
            log::warn!("test skipped: {}", err);
            TestOutcome::Skipped(err.to_string())
        },
    }
}

/// Compresses the XOR pattern at every size of a `width` x `height` mip chain.
pub fn generate_mip_chain<D>(driver: &mut D, format: CompressedFormat, width: u32, height: u32)
                             -> Result<CompressedImage, ProbeError> where D: Driver
{
    let mut levels = Vec::new();

    for level in 0 .. MAX_LEVELS as u32 {
        let (level_width, level_height) = container::level_dimensions(width, height, level);
        let pixels = pattern::generate(level_width, level_height);
        levels.push(driver.compress(format, level_width, level_height, &pixels)?);

        if level_width == 1 && level_height == 1 {
            break;
        }
    }

    log::info!("compressed {} mip levels ({} bytes total)", levels.len(),
               levels.iter().map(|level| level.len()).sum::<usize>());

    Ok(CompressedImage { format, flags: 0, width, height, levels })
}

/// Uploads every level of `image`, checks each one and reads each one back.
pub fn run_mip_chain<D>(driver: &mut D, image: &CompressedImage)
                        -> Result<MipChainReport<D::Texture>, ProbeError> where D: Driver
{
    print_compressed_formats(driver);

    let levels: Vec<&[u8]> = image.levels.iter().map(|level| level.as_slice()).collect();
    let texture = driver.upload(image.format, image.width, image.height, &levels)?;

    let mut reports = Vec::with_capacity(levels.len());
    for (level, data) in levels.iter().enumerate() {
        let level = level as u32;
        let info = driver.level_info(&texture, level)?;
        if !info.compressed {
            return Err(ProbeError::NotCompressed);
        }
        if info.compressed_size != data.len() {
            return Err(ProbeError::SizeMismatch { expected: data.len(), got: info.compressed_size });
        }

        let (width, height) = image.level_dimensions(level);
        log::info!("level {}: {}x{}, {} bytes", level, width, height, info.compressed_size);

        let verification = readback(driver, &texture, level, data)?;
        reports.push(LevelReport {
            width,
            height,
            compressed_size: info.compressed_size,
            verification,
        });
    }

    Ok(MipChainReport { texture, format: image.format, levels: reports })
}
