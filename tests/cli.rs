use std::path::PathBuf;

use clap::Parser;
use comptex::cli::{MipArgs, ProbeArgs};
use comptex::probe::TextureSource;
use comptex::CompressedFormat;

#[test]
fn defaults() {
    let args = ProbeArgs::try_parse_from(["comptex"]).unwrap();
    let options = args.to_options();

    assert_eq!(options.source, TextureSource::Generated { width: 512, height: 512 });
    assert_eq!(options.format, CompressedFormat::RGB8_ETC2);
    assert_eq!(options.dump_path, Some(PathBuf::from("compressed_texture")));
    assert_eq!(options.container_path, None);
    assert!(!options.sub_image_test);
    assert!(!options.copy_test);
}

#[test]
fn copytest_loop_implies_copytest() {
    let args = ProbeArgs::try_parse_from(["comptex", "--copytest-loop"]).unwrap();
    assert!(args.copy_test());
    assert!(args.to_options().copy_test);
}

#[test]
fn file_and_flags() {
    let args = ProbeArgs::try_parse_from(
        ["comptex", "--subtest", "--srgb", "--raw", "texture.bin"]).unwrap();
    let options = args.to_options();

    assert_eq!(options.source, TextureSource::Dump(PathBuf::from("texture.bin")));
    assert_eq!(options.format, CompressedFormat::SRGB8_ETC2);
    assert!(options.sub_image_test);

    let args = ProbeArgs::try_parse_from(["comptex", "texture.ctx"]).unwrap();
    assert_eq!(args.to_options().source, TextureSource::Container(PathBuf::from("texture.ctx")));
}

#[test]
fn second_positional_is_rejected() {
    assert!(ProbeArgs::try_parse_from(["comptex", "a.ctx", "b.ctx"]).is_err());
    assert!(MipArgs::try_parse_from(["comptex-mips", "a.ctx", "b.ctx"]).is_err());
}

#[test]
fn unknown_flag_is_rejected() {
    let err = ProbeArgs::try_parse_from(["comptex", "--frobnicate"]).unwrap_err();
    assert!(err.use_stderr());
}

#[test]
fn help_is_not_an_error_exit() {
    let err = ProbeArgs::try_parse_from(["comptex", "--help"]).unwrap_err();
    assert!(!err.use_stderr());
}

#[test]
fn mip_args() {
    let args = MipArgs::try_parse_from(["comptex-mips", "--size", "64", "--srgb"]).unwrap();
    assert_eq!(args.size, 64);
    assert_eq!(args.format(), CompressedFormat::SRGB8_ETC2);
    assert!(args.texfile.is_none());
}

#[test]
fn zero_size_is_rejected() {
    assert!(ProbeArgs::try_parse_from(["comptex", "--size", "0"]).is_err());
    assert!(MipArgs::try_parse_from(["comptex-mips", "--size", "0"]).is_err());

    let args = MipArgs::try_parse_from(["comptex-mips", "--size", "1"]).unwrap();
    assert_eq!(args.size, 1);
}
