/*!
The boundary between the probe sequence and the graphics driver.

The probe only needs a handful of operations on compressed textures. `Driver` lists them so
that the sequence in `probe` doesn't depend on OpenGL directly; `texture::GlDriver` is the
OpenGL implementation.

*/
use smallvec::SmallVec;

use crate::error::ProbeError;
use crate::format::CompressedFormat;

/// A rectangle of texels.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Region {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in texels.
    pub width: u32,
    /// Height in texels.
    pub height: u32,
}

impl Region {
    /// Builds a region.
    #[inline]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Region {
        Region { x, y, width, height }
    }

    /// Checks that the region lies inside a `tex_width` x `tex_height` image of `format` and
    /// is aligned on its blocks. Returns the compressed size of the region.
    ///
    /// The width and height may end on a partial block only at the edge of the image.
    pub fn validate(&self, format: CompressedFormat, tex_width: u32, tex_height: u32)
                    -> Result<usize, ProbeError>
    {
        let block = format.block().ok_or(ProbeError::UnknownFormat(format.0))?;

        let right = self.x as u64 + self.width as u64;
        let bottom = self.y as u64 + self.height as u64;

        if self.width == 0 || self.height == 0 ||
            right > tex_width as u64 || bottom > tex_height as u64
        {
            return Err(ProbeError::InvalidRegion);
        }

        if self.x % block.width != 0 || self.y % block.height != 0 {
            return Err(ProbeError::InvalidRegion);
        }

        if (self.width % block.width != 0 && right != tex_width as u64) ||
            (self.height % block.height != 0 && bottom != tex_height as u64)
        {
            return Err(ProbeError::InvalidRegion);
        }

        format.compressed_size(self.width, self.height).ok_or(ProbeError::UnknownFormat(format.0))
    }
}

/// State of a mip level as reported by the driver.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LevelInfo {
    /// Whether the driver stored the level compressed.
    pub compressed: bool,
    /// Size in bytes of the compressed level. Zero if uncompressed.
    pub compressed_size: usize,
    /// Internal format the driver picked.
    pub internal_format: CompressedFormat,
    /// Width of the level.
    pub width: u32,
    /// Height of the level.
    pub height: u32,
}

/// A compressed format advertised by the driver.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FormatSupport {
    /// The format.
    pub format: CompressedFormat,
    /// Whether the driver stores 2D textures of that format compressed. `None` if the
    /// driver can't be asked.
    pub compressed: Option<bool>,
}

/// Operations on compressed textures.
pub trait Driver {
    /// Handle of a texture object.
    type Texture;

    /// Lists the generic compressed formats the driver advertises.
    fn compressed_formats(&mut self) -> SmallVec<[FormatSupport; 32]>;

    /// Asks the driver to compress RGB8 `pixels` into `format` and returns the compressed
    /// bytes of the result.
    ///
    /// Fails if the driver raises an error or stores the texture uncompressed.
    fn compress(&mut self, format: CompressedFormat, width: u32, height: u32, pixels: &[u8])
                -> Result<Vec<u8>, ProbeError>;

    /// Creates a texture from already compressed levels, level 0 being `width` x `height`.
    fn upload(&mut self, format: CompressedFormat, width: u32, height: u32, levels: &[&[u8]])
              -> Result<Self::Texture, ProbeError>;

    /// Queries the state of a mip level.
    fn level_info(&mut self, texture: &Self::Texture, level: u32) -> Result<LevelInfo, ProbeError>;

    /// Reads back the compressed bytes of a whole mip level.
    fn read_level(&mut self, texture: &Self::Texture, level: u32) -> Result<Vec<u8>, ProbeError>;

    /// Reads back the compressed bytes of a region of a mip level.
    fn read_region(&mut self, texture: &Self::Texture, level: u32, region: Region)
                   -> Result<Vec<u8>, ProbeError>;

    /// Replaces a region of a mip level with compressed bytes.
    fn write_region(&mut self, texture: &Self::Texture, level: u32, region: Region, data: &[u8])
                    -> Result<(), ProbeError>;

    /// Copies a region of level 0 of `source` into level 0 of `destination` at
    /// `(dest_x, dest_y)`, without going through client memory.
    fn copy_region(&mut self, source: &Self::Texture, region: Region,
                   destination: &Self::Texture, dest_x: u32, dest_y: u32)
                   -> Result<(), ProbeError>;
}
