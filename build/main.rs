extern crate gl_generator;

use gl_generator::{Api, Fallbacks, Profile, Registry, StructGenerator};
use std::env;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

fn main() {
    let dest = env::var("OUT_DIR").unwrap();
    let mut file = BufWriter::new(File::create(Path::new(&dest).join("gl_bindings.rs")).unwrap());

    generate_gl_bindings(&mut file);
}

fn generate_gl_bindings<W>(dest: &mut W) where W: std::io::Write {
    let gl_registry = Registry::new(
        Api::Gl,
        (4, 5),
        Profile::Compatibility,
        Fallbacks::All,
        vec![
            "GL_3DFX_texture_compression_FXT1",
            "GL_ARB_copy_image",
            "GL_ARB_get_texture_sub_image",
            "GL_ARB_internalformat_query2",
            "GL_ARB_texture_compression_bptc",
            "GL_ARB_texture_compression_rgtc",
            "GL_EXT_texture_compression_s3tc",
            "GL_EXT_texture_sRGB",
            "GL_KHR_texture_compression_astc_ldr",
        ],
    );

    gl_registry.write_bindings(StructGenerator, dest).unwrap();
}
