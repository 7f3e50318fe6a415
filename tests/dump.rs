use std::io::Cursor;

use comptex::dump;
use comptex::DumpError;

#[test]
fn header_holds_the_dimensions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("compressed_texture");

    dump::save(&path, 512, 256, &[0xcc; 1024]).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes.len(), 8 + 1024);
    assert_eq!(&bytes[.. 4], &512u32.to_le_bytes());
    assert_eq!(&bytes[4 .. 8], &256u32.to_le_bytes());

    let dump = dump::load(&path).unwrap();
    assert_eq!((dump.width, dump.height), (512, 256));
    assert_eq!(dump.data, vec![0xcc; 1024]);
}

#[test]
fn empty_payload() {
    let mut bytes = Vec::new();
    dump::write_to(&mut bytes, 1, 1, &[]).unwrap();

    let dump = dump::read_from(&mut Cursor::new(bytes)).unwrap();
    assert_eq!((dump.width, dump.height), (1, 1));
    assert!(dump.data.is_empty());
}

#[test]
fn truncated() {
    let bytes = [1u8, 0, 0, 0, 2, 0];
    assert!(matches!(dump::read_from(&mut Cursor::new(&bytes[..])), Err(DumpError::Truncated)));
}

#[test]
fn missing_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(dump::load(dir.path().join("nope")), Err(DumpError::Io(_))));
}
