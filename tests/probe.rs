use comptex::container;
use comptex::dump;
use comptex::probe::{self, ProbeOptions, TestOutcome, TextureSource, Verification};
use comptex::probe::{COPY_DEST, COPY_SOURCE, SUB_IMAGE_DEST, SUB_IMAGE_SOURCE};
use comptex::{CompressedFormat, CompressedImage, Driver, ProbeError, Region};

mod support;

use support::SoftDriver;

fn options(dir: &tempfile::TempDir) -> ProbeOptions {
    ProbeOptions {
        dump_path: Some(dir.path().join("compressed_texture")),
        ..ProbeOptions::default()
    }
}

#[test]
fn generated_texture_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let mut driver = SoftDriver::new();

    let report = probe::run(&mut driver, &options(&dir)).unwrap();

    assert_eq!(driver.compress_calls, 1);
    assert_eq!((report.width, report.height), (512, 512));
    assert_eq!(report.format, CompressedFormat::RGB8_ETC2);
    assert_eq!(report.compressed_size, 512 * 512 / 2);
    assert_eq!(report.verification, Verification::Match { size: 512 * 512 / 2 });
    assert_eq!(report.sub_image_test, TestOutcome::NotRun);
    assert_eq!(report.copy_test, TestOutcome::NotRun);
    assert!(report.copy_source.is_none());
}

#[test]
fn generated_texture_is_dumped() {
    let dir = tempfile::tempdir().unwrap();
    let mut options = options(&dir);
    options.source = TextureSource::Generated { width: 128, height: 64 };
    options.container_path = Some(dir.path().join("compressed_texture.ctx"));

    let mut driver = SoftDriver::new();
    let report = probe::run(&mut driver, &options).unwrap();

    let dumped = dump::load(dir.path().join("compressed_texture")).unwrap();
    assert_eq!((dumped.width, dumped.height), (128, 64));
    assert_eq!(dumped.data, driver.level(&report.texture, 0));

    let saved = container::load(dir.path().join("compressed_texture.ctx")).unwrap();
    assert_eq!((saved.width, saved.height), (128, 64));
    assert_eq!(saved.format, CompressedFormat::RGB8_ETC2);
    assert_eq!(saved.first_level(), &dumped.data[..]);
}

#[test]
fn failed_dump_is_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut options = options(&dir);
    options.dump_path = Some(dir.path().join("missing").join("compressed_texture"));

    let mut driver = SoftDriver::new();
    let report = probe::run(&mut driver, &options).unwrap();
    assert!(report.verification.is_match());
}

#[test]
fn container_scenario_reports_dimensions_and_size() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("etc2.ctx");
    let image = CompressedImage::new(CompressedFormat(0x9274), 64, 64, vec![0x5a; 2048]);
    container::save(&path, &image).unwrap();

    let mut options = options(&dir);
    options.source = TextureSource::Container(path);

    let mut driver = SoftDriver::new();
    let report = probe::run(&mut driver, &options).unwrap();

    assert_eq!(driver.compress_calls, 0);
    assert_eq!((report.width, report.height), (64, 64));
    assert_eq!(report.compressed_size, 2048);
    assert!(report.verification.is_match());
    // nothing is dumped when loading a file
    assert!(!dir.path().join("compressed_texture").exists());
}

#[test]
fn dump_source_uses_the_requested_format() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dump");
    dump::save(&path, 32, 32, &[7; 512]).unwrap();

    let mut options = options(&dir);
    options.source = TextureSource::Dump(path);
    options.format = CompressedFormat::SRGB8_ETC2;

    let mut driver = SoftDriver::new();
    let report = probe::run(&mut driver, &options).unwrap();

    assert_eq!(report.format, CompressedFormat::SRGB8_ETC2);
    assert_eq!(report.compressed_size, 512);
}

#[test]
fn missing_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut options = options(&dir);
    options.source = TextureSource::Container(dir.path().join("nope.ctx"));

    let mut driver = SoftDriver::new();
    match probe::run(&mut driver, &options) {
        Err(ProbeError::Container(_)) => (),
        Err(err) => panic!("unexpected error: {}", err),
        Ok(_) => panic!("loading a missing file succeeded"),
    }
}

#[test]
fn uncompressed_texture_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("etc2.ctx");
    container::save(&path, &CompressedImage::new(CompressedFormat::RGB8_ETC2, 64, 64,
                                                 vec![1; 2048])).unwrap();

    let mut options = options(&dir);
    options.source = TextureSource::Container(path);

    let mut driver = SoftDriver::new();
    driver.store_uncompressed = true;
    assert!(matches!(probe::run(&mut driver, &options), Err(ProbeError::NotCompressed)));
}

#[test]
fn size_mismatch_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut driver = SoftDriver::new();
    driver.size_offset = 8;

    match probe::run(&mut driver, &options(&dir)) {
        Err(ProbeError::SizeMismatch { expected, got }) => {
            assert_eq!(expected, 512 * 512 / 2);
            assert_eq!(got, expected + 8);
        },
        Err(err) => panic!("unexpected error: {}", err),
        Ok(_) => panic!("size mismatch went unnoticed"),
    }
}

#[test]
fn corrupted_readback_is_reported_but_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut driver = SoftDriver::new();
    driver.corrupt_readback = true;

    let report = probe::run(&mut driver, &options(&dir)).unwrap();
    assert_eq!(report.verification, Verification::Mismatch { offset: 512 * 512 / 2 - 1 });
}

#[test]
fn sub_image_test_keeps_the_compressed_size() {
    let dir = tempfile::tempdir().unwrap();
    let mut options = options(&dir);
    options.sub_image_test = true;

    let mut driver = SoftDriver::new();
    let report = probe::run(&mut driver, &options).unwrap();
    assert_eq!(report.sub_image_test, TestOutcome::Done);

    let info = driver.level_info(&report.texture, 0).unwrap();
    assert!(info.compressed);
    assert_eq!(info.compressed_size, report.compressed_size);

    let (x, y) = SUB_IMAGE_DEST;
    let dest = Region::new(x, y, SUB_IMAGE_SOURCE.width, SUB_IMAGE_SOURCE.height);
    let source = driver.read_region(&report.texture, 0, SUB_IMAGE_SOURCE).unwrap();
    assert_eq!(driver.read_region(&report.texture, 0, dest).unwrap(), source);
}

#[test]
fn copy_test_copies_from_a_second_texture() {
    let dir = tempfile::tempdir().unwrap();
    let mut options = options(&dir);
    options.copy_test = true;

    let mut driver = SoftDriver::new();
    let report = probe::run(&mut driver, &options).unwrap();
    assert_eq!(report.copy_test, TestOutcome::Done);

    let source = report.copy_source.expect("the copy source is kept alive");
    assert_ne!(source.id, report.texture.id);

    let (x, y) = COPY_DEST;
    let dest = Region::new(x, y, COPY_SOURCE.width, COPY_SOURCE.height);
    let copied = driver.read_region(&source, 0, COPY_SOURCE).unwrap();
    assert_eq!(driver.read_region(&report.texture, 0, dest).unwrap(), copied);
}

#[test]
fn unsupported_optional_tests_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let mut options = options(&dir);
    options.sub_image_test = true;
    options.copy_test = true;

    let mut driver = SoftDriver::new();
    driver.no_sub_image = true;
    driver.no_copy_image = true;

    let report = probe::run(&mut driver, &options).unwrap();
    assert!(matches!(report.sub_image_test, TestOutcome::Skipped(_)));
    assert!(matches!(report.copy_test, TestOutcome::Skipped(_)));
    assert!(report.copy_source.is_none());
    assert!(report.verification.is_match());
}

#[test]
fn small_texture_skips_the_sub_image_test() {
    // the sub-image region doesn't fit in a 64x64 texture
    let dir = tempfile::tempdir().unwrap();
    let mut options = options(&dir);
    options.source = TextureSource::Generated { width: 64, height: 64 };
    options.sub_image_test = true;

    let mut driver = SoftDriver::new();
    let report = probe::run(&mut driver, &options).unwrap();
    assert!(matches!(report.sub_image_test, TestOutcome::Skipped(_)));
}

#[test]
fn mip_chain_is_generated_down_to_one_texel() {
    let mut driver = SoftDriver::new();
    let image = probe::generate_mip_chain(&mut driver, CompressedFormat::RGB8_ETC2, 64, 64).unwrap();

    assert_eq!(image.levels.len(), 7);
    let sizes: Vec<usize> = image.levels.iter().map(|level| level.len()).collect();
    assert_eq!(sizes, vec![2048, 512, 128, 32, 8, 8, 8]);
}

#[test]
fn mip_chain_is_checked_level_by_level() {
    let mut driver = SoftDriver::new();
    let image = probe::generate_mip_chain(&mut driver, CompressedFormat::RGB8_ETC2, 128, 32).unwrap();
    let report = probe::run_mip_chain(&mut driver, &image).unwrap();

    assert_eq!(report.levels.len(), 8);
    assert_eq!((report.levels[0].width, report.levels[0].height), (128, 32));
    assert_eq!((report.levels[7].width, report.levels[7].height), (1, 1));
    for (level, data) in report.levels.iter().zip(image.levels.iter()) {
        assert_eq!(level.compressed_size, data.len());
        assert!(level.verification.is_match());
    }
}

#[test]
fn mip_chain_mismatch_is_not_fatal() {
    let mut driver = SoftDriver::new();
    let image = probe::generate_mip_chain(&mut driver, CompressedFormat::RGB8_ETC2, 16, 16).unwrap();
    driver.corrupt_readback = true;

    let report = probe::run_mip_chain(&mut driver, &image).unwrap();
    assert!(report.levels.iter().all(|level| !level.verification.is_match()));
}
