/*!
Error types.

*/
use std::io;

use thiserror::Error;

/// Error while reading or writing a `COMPTEX0` container.
#[derive(Debug, Error)]
pub enum ContainerError {
    /// The underlying reader or writer failed, including short reads.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    /// The first 8 bytes are not `COMPTEX0`.
    #[error("invalid magic, not a COMPTEX0 file")]
    InvalidMagic,

    /// More than the maximum number of mip levels is declared.
    #[error("too many mip levels: {0}")]
    TooManyLevels(u16),

    /// The first level has a declared size of zero.
    #[error("first mip level is empty")]
    EmptyFirstLevel,

    /// A level points outside of the file, or into the header.
    #[error("mip level {level} ({size} bytes at offset {offset}) is outside of the {file_len} byte file")]
    LevelOutOfBounds {
        /// Index of the offending level.
        level: usize,
        /// Declared offset.
        offset: u32,
        /// Declared size.
        size: u32,
        /// Actual length of the stream.
        file_len: u64,
    },

    /// The image has more levels or bytes than the header can describe.
    #[error("image does not fit in a COMPTEX0 header")]
    TooLarge,
}

/// Error while reading or writing a raw dump.
#[derive(Debug, Error)]
pub enum DumpError {
    /// The underlying reader or writer failed.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    /// The file is shorter than the 8 byte dimension header.
    #[error("dump file is truncated")]
    Truncated,
}

/// Error of the probe sequence.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Loading a container failed.
    #[error("failed to load compressed texture file: {0}")]
    Container(#[from] ContainerError),

    /// Loading a dump failed.
    #[error("failed to load compressed texture dump: {0}")]
    Dump(#[from] DumpError),

    /// An OpenGL call left an error flag.
    #[error("{call} failed: {error}")]
    Gl {
        /// Name of the entry point that failed.
        call: &'static str,
        /// Name of the error, as returned by `glGetError`.
        error: &'static str,
    },

    /// The driver stored the texture uncompressed.
    #[error("texture is not compressed")]
    NotCompressed,

    /// The driver reports a compressed size that differs from the uploaded one.
    #[error("internal compressed size differs (expected: {expected}, got: {got})")]
    SizeMismatch {
        /// Number of bytes that were uploaded.
        expected: usize,
        /// Number of bytes reported by the driver.
        got: usize,
    },

    /// The entry point isn't available on this context.
    #[error("{0} is not supported by the OpenGL implementation")]
    Unsupported(&'static str),

    /// A region is outside of the texture or not aligned on blocks.
    #[error("region is outside of the texture or not block aligned")]
    InvalidRegion,

    /// The client data doesn't have the size the operation requires.
    #[error("data size mismatch (expected: {expected} bytes, got: {got})")]
    DataSizeMismatch {
        /// Number of bytes required.
        expected: usize,
        /// Number of bytes provided.
        got: usize,
    },

    /// The format has no known block layout.
    #[error("unknown compressed format 0x{0:04x}")]
    UnknownFormat(u32),
}

/// Error that can happen while creating the window and its OpenGL context.
#[derive(Debug, Error)]
pub enum CreationError {
    /// Creating the window or picking a config failed.
    #[error("failed to create window: {0}")]
    Window(String),

    /// An error has happened in glutin.
    #[error("glutin error: {0}")]
    Glutin(#[from] glutin::error::Error),

    /// Compiling or linking the shader program failed.
    #[error("failed to build the shader program: {0}")]
    Program(String),

    /// The OpenGL implementation is too old or broken.
    #[error("incompatible OpenGL implementation: {0}")]
    IncompatibleOpenGl(String),
}
