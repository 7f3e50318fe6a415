/*!
OpenGL version detection.

*/
use std::cmp::Ordering;
use std::ffi::CStr;
use std::fmt;

use crate::gl;

/// Describes a version.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Version(pub Api, pub u8, pub u8);

/// Describes the corresponding API.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Api {
    /// Desktop OpenGL.
    Gl,
    /// OpenGL ES.
    GlEs,
}

impl PartialOrd for Version {
    #[inline]
    fn partial_cmp(&self, other: &Version) -> Option<Ordering> {
        if self.0 != other.0 {
            return None;
        }

        match self.1.cmp(&other.1) {
            Ordering::Equal => Some(self.2.cmp(&other.2)),
            a => Some(a)
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            Api::Gl => write!(f, "OpenGL {}.{}", self.1, self.2),
            Api::GlEs => write!(f, "OpenGL ES {}.{}", self.1, self.2),
        }
    }
}

/// Parses the string returned by `glGetString(GL_VERSION)`.
///
/// Accepts `"4.6.0 NVIDIA 535.54"`, `"3.1 Mesa 23.0.4"` and `"OpenGL ES 3.2 Mesa 23.0.4"`
/// styles. Returns `None` if no major/minor pair can be found.
pub fn parse_version(version: &str) -> Option<Version> {
    let (version, api) = match version.strip_prefix("OpenGL ES ") {
        Some(rest) => (rest, Api::GlEs),
        None => (version, Api::Gl),
    };

    let version = version.split_whitespace().next()?;

    let mut iter = version.split('.');
    let major = iter.next()?.parse().ok()?;
    let minor = iter.next()?.parse().ok()?;

    Some(Version(api, major, minor))
}

/// Queries the version of the current context.
///
/// *Safety*: the OpenGL context corresponding to `gl` must be current in the thread.
pub unsafe fn get_gl_version(gl: &gl::Gl) -> Option<Version> {
    let version = gl.GetString(gl::VERSION);
    if version.is_null() {
        return None;
    }

    let version = CStr::from_ptr(version as *const _).to_string_lossy();
    parse_version(&version)
}

#[cfg(test)]
mod tests {
    use super::{parse_version, Api, Version};

    #[test]
    fn desktop_versions() {
        assert_eq!(parse_version("4.6.0 NVIDIA 535.54.03"), Some(Version(Api::Gl, 4, 6)));
        assert_eq!(parse_version("3.1 Mesa 23.0.4"), Some(Version(Api::Gl, 3, 1)));
    }

    #[test]
    fn es_versions() {
        assert_eq!(parse_version("OpenGL ES 3.2 Mesa 23.0.4"), Some(Version(Api::GlEs, 3, 2)));
    }

    #[test]
    fn garbage() {
        assert_eq!(parse_version(""), None);
        assert_eq!(parse_version("four.six"), None);
        assert_eq!(parse_version("4"), None);
    }

    #[test]
    fn ordering_is_per_api() {
        assert!(Version(Api::Gl, 4, 5) > Version(Api::Gl, 4, 3));
        assert!(Version(Api::Gl, 3, 0) < Version(Api::Gl, 4, 0));
        assert_eq!(Version(Api::Gl, 4, 5).partial_cmp(&Version(Api::GlEs, 3, 2)), None);
    }
}
