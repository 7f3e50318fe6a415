/*!
The `COMPTEX0` compressed texture container.

Layout, all integers little-endian:

| Offset | Size | Field |
|---|---|---|
| 0 | 8 | magic, `COMPTEX0` |
| 8 | 4 | format, an OpenGL compressed internal format |
| 12 | 2 | flags |
| 14 | 2 | number of mip levels |
| 16 | 4 | width |
| 20 | 4 | height |
| 24 | 160 | 20 times (offset, size) of each level, offsets from the start of the file |
| 184 | 8 | reserved |

The level payloads follow the header.

A level count of zero is read as one: the first level is always present and never empty.

*/
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use smallvec::SmallVec;

use crate::error::ContainerError;
use crate::format::CompressedFormat;

/// The first 8 bytes of every container.
pub const MAGIC: &[u8; 8] = b"COMPTEX0";

/// Maximum number of mip levels a container can describe.
pub const MAX_LEVELS: usize = 20;

/// Size of the fixed header in bytes.
pub const HEADER_SIZE: usize = 8 + 4 + 2 + 2 + 4 + 4 + MAX_LEVELS * 8 + 8;

/// Location of a mip level payload in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LevelDesc {
    /// Offset from the start of the file.
    pub offset: u32,
    /// Size in bytes.
    pub size: u32,
}

/// Decoded container header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Compressed format of every level.
    pub format: CompressedFormat,
    /// Opaque flags, carried through unchanged.
    pub flags: u16,
    /// Width of the first level.
    pub width: u32,
    /// Height of the first level.
    pub height: u32,
    /// The declared levels; never empty.
    pub levels: SmallVec<[LevelDesc; MAX_LEVELS]>,
}

impl Header {
    /// Reads and validates a header.
    ///
    /// The magic is checked before anything else is read.
    pub fn read_from<R>(reader: &mut R) -> Result<Header, ContainerError> where R: Read {
        let mut magic = [0u8; 8];
        reader.read_exact(&mut magic)?;
        if &magic != MAGIC {
            return Err(ContainerError::InvalidMagic);
        }

        let format = CompressedFormat(reader.read_u32::<LittleEndian>()?);
        let flags = reader.read_u16::<LittleEndian>()?;
        let num_levels = reader.read_u16::<LittleEndian>()?;
        if num_levels as usize > MAX_LEVELS {
            return Err(ContainerError::TooManyLevels(num_levels));
        }

        let width = reader.read_u32::<LittleEndian>()?;
        let height = reader.read_u32::<LittleEndian>()?;

        let mut table = [LevelDesc::default(); MAX_LEVELS];
        for desc in table.iter_mut() {
            desc.offset = reader.read_u32::<LittleEndian>()?;
            desc.size = reader.read_u32::<LittleEndian>()?;
        }

        let mut reserved = [0u8; 8];
        reader.read_exact(&mut reserved)?;

        if table[0].size == 0 {
            return Err(ContainerError::EmptyFirstLevel);
        }

        let levels = table[.. (num_levels as usize).max(1)].iter().cloned().collect();

        Ok(Header { format, flags, width, height, levels })
    }

    /// Writes the header.
    pub fn write_to<W>(&self, writer: &mut W) -> Result<(), ContainerError> where W: Write {
        if self.levels.is_empty() || self.levels.len() > MAX_LEVELS {
            return Err(ContainerError::TooLarge);
        }

        writer.write_all(MAGIC)?;
        writer.write_u32::<LittleEndian>(self.format.0)?;
        writer.write_u16::<LittleEndian>(self.flags)?;
        writer.write_u16::<LittleEndian>(self.levels.len() as u16)?;
        writer.write_u32::<LittleEndian>(self.width)?;
        writer.write_u32::<LittleEndian>(self.height)?;

        for index in 0 .. MAX_LEVELS {
            let desc = self.levels.get(index).cloned().unwrap_or_default();
            writer.write_u32::<LittleEndian>(desc.offset)?;
            writer.write_u32::<LittleEndian>(desc.size)?;
        }

        writer.write_all(&[0u8; 8])?;
        Ok(())
    }
}

/// A compressed image with its mip chain, as stored in a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedImage {
    /// Compressed format of every level.
    pub format: CompressedFormat,
    /// Opaque flags.
    pub flags: u16,
    /// Width of the first level.
    pub width: u32,
    /// Height of the first level.
    pub height: u32,
    /// Payload of each level, the first one being full resolution.
    pub levels: Vec<Vec<u8>>,
}

impl CompressedImage {
    /// Builds a single-level image.
    pub fn new(format: CompressedFormat, width: u32, height: u32, data: Vec<u8>) -> CompressedImage {
        CompressedImage { format, flags: 0, width, height, levels: vec![data] }
    }

    /// Returns the payload of the first level.
    #[inline]
    pub fn first_level(&self) -> &[u8] {
        self.levels.first().map(|level| level.as_slice()).unwrap_or(&[])
    }

    /// Returns the dimensions of mip level `level`.
    #[inline]
    pub fn level_dimensions(&self, level: u32) -> (u32, u32) {
        level_dimensions(self.width, self.height, level)
    }

    /// Reads a container with every declared level.
    pub fn read_from<R>(reader: &mut R) -> Result<CompressedImage, ContainerError>
        where R: Read + Seek
    {
        let header = Header::read_from(reader)?;
        let count = header.levels.len();
        read_levels(reader, header, count)
    }

    /// Reads a container, loading only the first level.
    pub fn read_first_level_from<R>(reader: &mut R) -> Result<CompressedImage, ContainerError>
        where R: Read + Seek
    {
        let header = Header::read_from(reader)?;
        read_levels(reader, header, 1)
    }

    /// Writes the container: header first, then each level back to back.
    pub fn write_to<W>(&self, writer: &mut W) -> Result<(), ContainerError> where W: Write {
        if self.levels.is_empty() || self.levels.len() > MAX_LEVELS {
            return Err(ContainerError::TooLarge);
        }
        if self.first_level().is_empty() {
            return Err(ContainerError::EmptyFirstLevel);
        }

        let mut levels = SmallVec::new();
        let mut offset = HEADER_SIZE as u64;
        for level in &self.levels {
            let size = u32::try_from(level.len()).map_err(|_| ContainerError::TooLarge)?;
            let start = u32::try_from(offset).map_err(|_| ContainerError::TooLarge)?;
            levels.push(LevelDesc { offset: start, size });
            offset += size as u64;
        }

        let header = Header {
            format: self.format,
            flags: self.flags,
            width: self.width,
            height: self.height,
            levels,
        };
        header.write_to(writer)?;

        for level in &self.levels {
            writer.write_all(level)?;
        }

        Ok(())
    }
}

/// Returns the dimensions of mip level `level` of a `width` x `height` image.
#[inline]
pub fn level_dimensions(width: u32, height: u32, level: u32) -> (u32, u32) {
    let shift = level.min(31);
    ((width >> shift).max(1), (height >> shift).max(1))
}

fn read_levels<R>(reader: &mut R, header: Header, count: usize)
                  -> Result<CompressedImage, ContainerError> where R: Read + Seek
{
    let file_len = reader.seek(SeekFrom::End(0))?;

    // every level is checked before anything gets allocated
    for (index, desc) in header.levels.iter().take(count).enumerate() {
        let end = desc.offset as u64 + desc.size as u64;
        if (desc.offset as usize) < HEADER_SIZE || end > file_len {
            return Err(ContainerError::LevelOutOfBounds {
                level: index,
                offset: desc.offset,
                size: desc.size,
                file_len,
            });
        }
    }

    let mut levels = Vec::with_capacity(count);
    for desc in header.levels.iter().take(count) {
        reader.seek(SeekFrom::Start(desc.offset as u64))?;
        let mut data = vec![0u8; desc.size as usize];
        reader.read_exact(&mut data)?;
        levels.push(data);
    }

    Ok(CompressedImage {
        format: header.format,
        flags: header.flags,
        width: header.width,
        height: header.height,
        levels,
    })
}

/// Loads every level of the container at `path`.
pub fn load<P>(path: P) -> Result<CompressedImage, ContainerError> where P: AsRef<Path> {
    let mut reader = BufReader::new(File::open(path)?);
    CompressedImage::read_from(&mut reader)
}

/// Loads the first level of the container at `path`.
pub fn load_first_level<P>(path: P) -> Result<CompressedImage, ContainerError>
    where P: AsRef<Path>
{
    let mut reader = BufReader::new(File::open(path)?);
    CompressedImage::read_first_level_from(&mut reader)
}

/// Writes `image` to a new container at `path`.
pub fn save<P>(path: P, image: &CompressedImage) -> Result<(), ContainerError>
    where P: AsRef<Path>
{
    let mut writer = BufWriter::new(File::create(path)?);
    image.write_to(&mut writer)?;
    writer.flush()?;
    Ok(())
}
