/*!
Compressed texture formats.

Formats are identified by their OpenGL enum value. The name table covers every format a
driver is likely to list in `GL_COMPRESSED_TEXTURE_FORMATS`; the block table covers the
formats whose layout is fixed (everything except the generic and paletted ones).

*/
use std::fmt;

use fnv::FnvHashMap;
use lazy_static::lazy_static;

/// An OpenGL compressed internal format token.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CompressedFormat(pub u32);

/// Layout of the blocks of a compressed format.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BlockLayout {
    /// Width of a block in texels.
    pub width: u32,
    /// Height of a block in texels.
    pub height: u32,
    /// Size of a block in bytes.
    pub bytes: u32,
}

impl CompressedFormat {
    /// `GL_COMPRESSED_RGB8_ETC2`, the format used when none is specified.
    pub const RGB8_ETC2: CompressedFormat = CompressedFormat(0x9274);
    /// `GL_COMPRESSED_SRGB8_ETC2`
    pub const SRGB8_ETC2: CompressedFormat = CompressedFormat(0x9275);

    /// Returns the OpenGL name of the format, or `"unknown"`.
    #[inline]
    pub fn name(&self) -> &'static str {
        name(self.0)
    }

    /// Returns the block layout, or `None` if the format isn't block based or isn't known.
    pub fn block(&self) -> Option<BlockLayout> {
        let (width, height, bytes) = match self.0 {
            // S3TC
            0x83f0 | 0x83f1 | 0x8c4c | 0x8c4d => (4, 4, 8),
            0x83f2 | 0x83f3 | 0x8c4e | 0x8c4f => (4, 4, 16),
            // FXT1
            0x86b0 | 0x86b1 => (8, 4, 16),
            // RGTC
            0x8dbb | 0x8dbc => (4, 4, 8),
            0x8dbd | 0x8dbe => (4, 4, 16),
            // BPTC
            0x8e8c ..= 0x8e8f => (4, 4, 16),
            // EAC
            0x9270 | 0x9271 => (4, 4, 8),
            0x9272 | 0x9273 => (4, 4, 16),
            // ETC2
            0x9274 ..= 0x9277 => (4, 4, 8),
            0x9278 | 0x9279 => (4, 4, 16),
            // ASTC, linear and sRGB variants share their footprints
            0x93b0 ..= 0x93bd => astc_footprint(self.0 - 0x93b0),
            0x93d0 ..= 0x93dd => astc_footprint(self.0 - 0x93d0),
            _ => return None,
        };

        Some(BlockLayout { width, height, bytes })
    }

    /// Returns the number of bytes of a `width` x `height` image in this format.
    pub fn compressed_size(&self, width: u32, height: u32) -> Option<usize> {
        let block = self.block()?;
        let blocks_x = (width as usize + block.width as usize - 1) / block.width as usize;
        let blocks_y = (height as usize + block.height as usize - 1) / block.height as usize;
        Some(blocks_x * blocks_y * block.bytes as usize)
    }
}

impl fmt::Display for CompressedFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} (0x{:04x})", self.name(), self.0)
    }
}

fn astc_footprint(index: u32) -> (u32, u32, u32) {
    const FOOTPRINTS: [(u32, u32); 14] = [
        (4, 4), (5, 4), (5, 5), (6, 5), (6, 6), (8, 5), (8, 6),
        (8, 8), (10, 5), (10, 6), (10, 8), (10, 10), (12, 10), (12, 12),
    ];

    let (w, h) = FOOTPRINTS[index as usize];
    (w, h, 16)
}

lazy_static! {
    static ref FORMAT_NAMES: FnvHashMap<u32, &'static str> = {
        let table: &[(u32, &'static str)] = &[
            (0x86b0, "GL_COMPRESSED_RGB_FXT1_3DFX"),
            (0x86b1, "GL_COMPRESSED_RGBA_FXT1_3DFX"),
            (0x8dbb, "GL_COMPRESSED_RED_RGTC1"),
            (0x8dbc, "GL_COMPRESSED_SIGNED_RED_RGTC1"),
            (0x8dbd, "GL_COMPRESSED_RG_RGTC2"),
            (0x8dbe, "GL_COMPRESSED_SIGNED_RG_RGTC2"),
            (0x8e8c, "GL_COMPRESSED_RGBA_BPTC_UNORM"),
            (0x8e8d, "GL_COMPRESSED_SRGB_ALPHA_BPTC_UNORM"),
            (0x8e8e, "GL_COMPRESSED_RGB_BPTC_SIGNED_FLOAT"),
            (0x8e8f, "GL_COMPRESSED_RGB_BPTC_UNSIGNED_FLOAT"),
            (0x9274, "GL_COMPRESSED_RGB8_ETC2"),
            (0x9275, "GL_COMPRESSED_SRGB8_ETC2"),
            (0x9276, "GL_COMPRESSED_RGB8_PUNCHTHROUGH_ALPHA1_ETC2"),
            (0x9277, "GL_COMPRESSED_SRGB8_PUNCHTHROUGH_ALPHA1_ETC2"),
            (0x9278, "GL_COMPRESSED_RGBA8_ETC2_EAC"),
            (0x9279, "GL_COMPRESSED_SRGB8_ALPHA8_ETC2_EAC"),
            (0x9270, "GL_COMPRESSED_R11_EAC"),
            (0x9271, "GL_COMPRESSED_SIGNED_R11_EAC"),
            (0x9272, "GL_COMPRESSED_RG11_EAC"),
            (0x9273, "GL_COMPRESSED_SIGNED_RG11_EAC"),
            (0x83f0, "GL_COMPRESSED_RGB_S3TC_DXT1_EXT"),
            (0x83f1, "GL_COMPRESSED_RGBA_S3TC_DXT1_EXT"),
            (0x83f2, "GL_COMPRESSED_RGBA_S3TC_DXT3_EXT"),
            (0x83f3, "GL_COMPRESSED_RGBA_S3TC_DXT5_EXT"),
            (0x8c48, "GL_COMPRESSED_SRGB_EXT"),
            (0x8c49, "GL_COMPRESSED_SRGB_ALPHA_EXT"),
            (0x8c4a, "GL_COMPRESSED_SLUMINANCE_EXT"),
            (0x8c4b, "GL_COMPRESSED_SLUMINANCE_ALPHA_EXT"),
            (0x8c4c, "GL_COMPRESSED_SRGB_S3TC_DXT1_EXT"),
            (0x8c4d, "GL_COMPRESSED_SRGB_ALPHA_S3TC_DXT1_EXT"),
            (0x8c4e, "GL_COMPRESSED_SRGB_ALPHA_S3TC_DXT3_EXT"),
            (0x8c4f, "GL_COMPRESSED_SRGB_ALPHA_S3TC_DXT5_EXT"),
            (0x8b90, "GL_PALETTE4_RGB8_OES"),
            (0x8b91, "GL_PALETTE4_RGBA8_OES"),
            (0x8b92, "GL_PALETTE4_R5_G6_B5_OES"),
            (0x8b93, "GL_PALETTE4_RGBA4_OES"),
            (0x8b94, "GL_PALETTE4_RGB5_A1_OES"),
            (0x8b95, "GL_PALETTE8_RGB8_OES"),
            (0x8b96, "GL_PALETTE8_RGBA8_OES"),
            (0x8b97, "GL_PALETTE8_R5_G6_B5_OES"),
            (0x8b98, "GL_PALETTE8_RGBA4_OES"),
            (0x8b99, "GL_PALETTE8_RGB5_A1_OES"),
            (0x93b0, "GL_COMPRESSED_RGBA_ASTC_4x4_KHR"),
            (0x93b1, "GL_COMPRESSED_RGBA_ASTC_5x4_KHR"),
            (0x93b2, "GL_COMPRESSED_RGBA_ASTC_5x5_KHR"),
            (0x93b3, "GL_COMPRESSED_RGBA_ASTC_6x5_KHR"),
            (0x93b4, "GL_COMPRESSED_RGBA_ASTC_6x6_KHR"),
            (0x93b5, "GL_COMPRESSED_RGBA_ASTC_8x5_KHR"),
            (0x93b6, "GL_COMPRESSED_RGBA_ASTC_8x6_KHR"),
            (0x93b7, "GL_COMPRESSED_RGBA_ASTC_8x8_KHR"),
            (0x93b8, "GL_COMPRESSED_RGBA_ASTC_10x5_KHR"),
            (0x93b9, "GL_COMPRESSED_RGBA_ASTC_10x6_KHR"),
            (0x93ba, "GL_COMPRESSED_RGBA_ASTC_10x8_KHR"),
            (0x93bb, "GL_COMPRESSED_RGBA_ASTC_10x10_KHR"),
            (0x93bc, "GL_COMPRESSED_RGBA_ASTC_12x10_KHR"),
            (0x93bd, "GL_COMPRESSED_RGBA_ASTC_12x12_KHR"),
            (0x93d0, "GL_COMPRESSED_SRGB8_ALPHA8_ASTC_4x4_KHR"),
            (0x93d1, "GL_COMPRESSED_SRGB8_ALPHA8_ASTC_5x4_KHR"),
            (0x93d2, "GL_COMPRESSED_SRGB8_ALPHA8_ASTC_5x5_KHR"),
            (0x93d3, "GL_COMPRESSED_SRGB8_ALPHA8_ASTC_6x5_KHR"),
            (0x93d4, "GL_COMPRESSED_SRGB8_ALPHA8_ASTC_6x6_KHR"),
            (0x93d5, "GL_COMPRESSED_SRGB8_ALPHA8_ASTC_8x5_KHR"),
            (0x93d6, "GL_COMPRESSED_SRGB8_ALPHA8_ASTC_8x6_KHR"),
            (0x93d7, "GL_COMPRESSED_SRGB8_ALPHA8_ASTC_8x8_KHR"),
            (0x93d8, "GL_COMPRESSED_SRGB8_ALPHA8_ASTC_10x5_KHR"),
            (0x93d9, "GL_COMPRESSED_SRGB8_ALPHA8_ASTC_10x6_KHR"),
            (0x93da, "GL_COMPRESSED_SRGB8_ALPHA8_ASTC_10x8_KHR"),
            (0x93db, "GL_COMPRESSED_SRGB8_ALPHA8_ASTC_10x10_KHR"),
            (0x93dc, "GL_COMPRESSED_SRGB8_ALPHA8_ASTC_12x10_KHR"),
            (0x93dd, "GL_COMPRESSED_SRGB8_ALPHA8_ASTC_12x12_KHR"),
        ];

        table.iter().cloned().collect()
    };
}

/// Returns the OpenGL name of a compressed format token, or `"unknown"`.
pub fn name(format: u32) -> &'static str {
    FORMAT_NAMES.get(&format).cloned().unwrap_or("unknown")
}
