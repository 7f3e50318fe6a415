/*!
Raw dump of a compressed texture.

The dump is the width and the height as little-endian `u32`, followed by the compressed
bytes of the first level. There is no magic, no format and no level table, so a dump can't
be told apart from any other file; the caller has to know what it is loading.

*/
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::DumpError;

/// Dimensions and payload of a dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dump {
    /// Width of the image.
    pub width: u32,
    /// Height of the image.
    pub height: u32,
    /// Compressed bytes.
    pub data: Vec<u8>,
}

/// Writes a dump to `writer`.
pub fn write_to<W>(writer: &mut W, width: u32, height: u32, data: &[u8]) -> io::Result<()>
    where W: Write
{
    writer.write_u32::<LittleEndian>(width)?;
    writer.write_u32::<LittleEndian>(height)?;
    writer.write_all(data)
}

/// Reads a dump from `reader`. Everything after the dimensions is the payload.
pub fn read_from<R>(reader: &mut R) -> Result<Dump, DumpError> where R: Read {
    let width = read_dimension(reader)?;
    let height = read_dimension(reader)?;

    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;

    Ok(Dump { width, height, data })
}

fn read_dimension<R>(reader: &mut R) -> Result<u32, DumpError> where R: Read {
    reader.read_u32::<LittleEndian>().map_err(|err| match err.kind() {
        io::ErrorKind::UnexpectedEof => DumpError::Truncated,
        _ => DumpError::Io(err),
    })
}

/// Creates `path` and writes a dump to it.
pub fn save<P>(path: P, width: u32, height: u32, data: &[u8]) -> Result<(), DumpError>
    where P: AsRef<Path>
{
    let mut writer = BufWriter::new(File::create(path)?);
    write_to(&mut writer, width, height, data)?;
    writer.flush()?;
    Ok(())
}

/// Loads the dump at `path`.
pub fn load<P>(path: P) -> Result<Dump, DumpError> where P: AsRef<Path> {
    let mut reader = BufReader::new(File::open(path)?);
    read_from(&mut reader)
}
