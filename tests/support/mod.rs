/*!
Test supports module.

*/

#![allow(dead_code)]

use std::io::Write;

use comptex::container::{HEADER_SIZE, MAGIC, MAX_LEVELS};
use comptex::{CompressedFormat, Driver, FormatSupport, LevelInfo, ProbeError, Region};
use smallvec::SmallVec;

/// Handle of a texture of `SoftDriver`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoftTexture {
    pub id: usize,
    pub format: CompressedFormat,
    pub width: u32,
    pub height: u32,
}

/// In-memory implementation of `Driver`.
///
/// "Compression" is a deterministic function of the pixels with the exact size of the
/// requested format, and levels are stored as rows of blocks, so the region operations move
/// the same bytes a real driver would.
#[derive(Default)]
pub struct SoftDriver {
    /// Levels of every texture, indexed by `SoftTexture::id`.
    pub textures: Vec<Vec<Vec<u8>>>,
    /// Stores textures uncompressed, like a driver that doesn't support the format.
    pub store_uncompressed: bool,
    /// Flips a byte of everything read back.
    pub corrupt_readback: bool,
    /// Reports a different compressed size than what was uploaded.
    pub size_offset: usize,
    /// Pretends `glCopyImageSubData` isn't available.
    pub no_copy_image: bool,
    /// Pretends `glGetCompressedTextureSubImage` isn't available.
    pub no_sub_image: bool,
    /// Number of calls to `compress`.
    pub compress_calls: usize,
}

impl SoftDriver {
    pub fn new() -> SoftDriver {
        SoftDriver::default()
    }

    /// Returns the current bytes of a level.
    pub fn level(&self, texture: &SoftTexture, level: u32) -> &[u8] {
        &self.textures[texture.id][level as usize]
    }

    fn level_width(texture: &SoftTexture, level: u32) -> u32 {
        (texture.width >> level).max(1)
    }

    /// Byte range of each row of blocks covered by `region`.
    fn block_rows(texture: &SoftTexture, level: u32, region: Region)
                  -> Result<Vec<std::ops::Range<usize>>, ProbeError>
    {
        let block = texture.format.block().ok_or(ProbeError::UnknownFormat(texture.format.0))?;
        let blocks_per_row = ((Self::level_width(texture, level) + block.width - 1) / block.width) as usize;

        let first_x = (region.x / block.width) as usize;
        let first_y = (region.y / block.height) as usize;
        let blocks_x = ((region.width + block.width - 1) / block.width) as usize;
        let blocks_y = ((region.height + block.height - 1) / block.height) as usize;
        let bytes = block.bytes as usize;

        Ok((first_y .. first_y + blocks_y).map(|row| {
            let start = (row * blocks_per_row + first_x) * bytes;
            start .. start + blocks_x * bytes
        }).collect())
    }

    fn check_level(&self, texture: &SoftTexture, level: u32) -> Result<(), ProbeError> {
        if self.textures[texture.id].len() <= level as usize {
            return Err(ProbeError::Gl { call: "glGetTexLevelParameteriv", error: "GL_INVALID_VALUE" });
        }
        Ok(())
    }
}

impl Driver for SoftDriver {
    type Texture = SoftTexture;

    fn compressed_formats(&mut self) -> SmallVec<[FormatSupport; 32]> {
        [CompressedFormat::RGB8_ETC2, CompressedFormat::SRGB8_ETC2, CompressedFormat(0x83f0)]
            .iter()
            .map(|&format| FormatSupport { format, compressed: Some(true) })
            .collect()
    }

    fn compress(&mut self, format: CompressedFormat, width: u32, height: u32, pixels: &[u8])
                -> Result<Vec<u8>, ProbeError>
    {
        self.compress_calls += 1;

        if pixels.len() != width as usize * height as usize * 3 {
            return Err(ProbeError::DataSizeMismatch {
                expected: width as usize * height as usize * 3,
                got: pixels.len(),
            });
        }
        if self.store_uncompressed {
            return Err(ProbeError::NotCompressed);
        }

        let size = format.compressed_size(width, height).ok_or(ProbeError::UnknownFormat(format.0))?;
        Ok((0 .. size).map(|i| pixels[i % pixels.len()] ^ (i as u8)).collect())
    }

    fn upload(&mut self, format: CompressedFormat, width: u32, height: u32, levels: &[&[u8]])
              -> Result<SoftTexture, ProbeError>
    {
        for (level, data) in levels.iter().enumerate() {
            let (w, h) = ((width >> level).max(1), (height >> level).max(1));
            let expected = format.compressed_size(w, h).ok_or(ProbeError::UnknownFormat(format.0))?;
            if data.len() != expected {
                return Err(ProbeError::Gl { call: "glCompressedTexImage2D", error: "GL_INVALID_VALUE" });
            }
        }

        self.textures.push(levels.iter().map(|level| level.to_vec()).collect());
        Ok(SoftTexture { id: self.textures.len() - 1, format, width, height })
    }

    fn level_info(&mut self, texture: &SoftTexture, level: u32) -> Result<LevelInfo, ProbeError> {
        self.check_level(texture, level)?;

        let size = self.level(texture, level).len();
        Ok(LevelInfo {
            compressed: !self.store_uncompressed,
            compressed_size: if self.store_uncompressed { 0 } else { size + self.size_offset },
            internal_format: texture.format,
            width: Self::level_width(texture, level),
            height: (texture.height >> level).max(1),
        })
    }

    fn read_level(&mut self, texture: &SoftTexture, level: u32) -> Result<Vec<u8>, ProbeError> {
        self.check_level(texture, level)?;

        let mut data = self.level(texture, level).to_vec();
        if self.corrupt_readback {
            if let Some(byte) = data.last_mut() {
                *byte = !*byte;
            }
        }
        Ok(data)
    }

    fn read_region(&mut self, texture: &SoftTexture, level: u32, region: Region)
                   -> Result<Vec<u8>, ProbeError>
    {
        if self.no_sub_image {
            return Err(ProbeError::Unsupported("glGetCompressedTextureSubImage"));
        }
        self.check_level(texture, level)?;
        let (width, height) = (Self::level_width(texture, level), (texture.height >> level).max(1));
        region.validate(texture.format, width, height)?;

        let data = self.level(texture, level);
        let mut out = Vec::new();
        for range in Self::block_rows(texture, level, region)? {
            out.extend_from_slice(&data[range]);
        }
        Ok(out)
    }

    fn write_region(&mut self, texture: &SoftTexture, level: u32, region: Region, data: &[u8])
                    -> Result<(), ProbeError>
    {
        self.check_level(texture, level)?;
        let (width, height) = (Self::level_width(texture, level), (texture.height >> level).max(1));
        let expected = region.validate(texture.format, width, height)?;
        if data.len() != expected {
            return Err(ProbeError::DataSizeMismatch { expected, got: data.len() });
        }

        let rows = Self::block_rows(texture, level, region)?;
        let stored = &mut self.textures[texture.id][level as usize];
        let mut offset = 0;
        for range in rows {
            let len = range.len();
            stored[range].copy_from_slice(&data[offset .. offset + len]);
            offset += len;
        }
        Ok(())
    }

    fn copy_region(&mut self, source: &SoftTexture, region: Region,
                   destination: &SoftTexture, dest_x: u32, dest_y: u32)
                   -> Result<(), ProbeError>
    {
        if self.no_copy_image {
            return Err(ProbeError::Unsupported("glCopyImageSubData"));
        }
        region.validate(source.format, source.width, source.height)?;

        let mut data = Vec::new();
        for range in Self::block_rows(source, 0, region)? {
            data.extend_from_slice(&self.textures[source.id][0][range]);
        }

        let dest = Region::new(dest_x, dest_y, region.width, region.height);
        self.write_region(destination, 0, dest, &data)
    }
}

/// Builds the raw bytes of a container header.
pub fn header_bytes(format: u32, num_levels: u16, width: u32, height: u32,
                    levels: &[(u32, u32)]) -> Vec<u8>
{
    let mut out = Vec::with_capacity(HEADER_SIZE);
    out.write_all(MAGIC).unwrap();
    out.extend_from_slice(&format.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&num_levels.to_le_bytes());
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());

    for index in 0 .. MAX_LEVELS {
        let (offset, size) = levels.get(index).cloned().unwrap_or((0, 0));
        out.extend_from_slice(&offset.to_le_bytes());
        out.extend_from_slice(&size.to_le_bytes());
    }

    out.extend_from_slice(&[0u8; 8]);
    assert_eq!(out.len(), HEADER_SIZE);
    out
}

/// Builds a hidden window and its context.
///
/// winit allows a single event loop per process, so every test that needs a context must run
/// from the same test function.
#[cfg(feature = "test_display")]
pub fn build_context() -> (winit::event_loop::EventLoop<()>, winit::window::Window,
                           std::rc::Rc<comptex::Context>)
{
    use comptex::backend::glutin::SimpleWindowBuilder;
    use winit::event_loop::EventLoopBuilder;

    let mut builder = EventLoopBuilder::new();
    #[cfg(target_os = "linux")]
    {
        use winit::platform::x11::EventLoopBuilderExtX11;
        builder.with_any_thread(true);
    }
    let event_loop = builder.build();

    let (window, backend) = SimpleWindowBuilder::new()
        .with_visible(false)
        .with_inner_size(256, 256)
        .build(&event_loop)
        .unwrap();
    let context = unsafe { comptex::Context::new(backend) }.unwrap();

    (event_loop, window, context)
}
