//! Writing buffers to disk and loading them back, including legacy input

use argbuf::{
    import_legacy, Argument, Arguments, ArgumentsBuilder, ArgumentsError, SharedArguments,
    ValueType,
};
use std::fs::File;
use std::io::Write;
use tempfile::TempDir;

fn sample() -> Arguments {
    ArgumentsBuilder::new()
        .named("title", "Quarterly report")
        .named("pages", 42u32)
        .named("id", Argument::guid([0x11; 16]))
        .named("thumb", Argument::binary(vec![0x89u8, b'P', b'N', b'G']))
        .section("tags", [Argument::wide("draft"), Argument::wide("ünï")])
        .named("ratio", 0.75f32)
        .build()
        .unwrap()
}

#[test]
fn test_write_and_read_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("args.bin");

    let args = sample();
    args.write_to(File::create(&path).unwrap()).unwrap();

    let loaded = Arguments::read_from(File::open(&path).unwrap()).unwrap();
    assert_eq!(loaded, args);
    assert_eq!(loaded.as_bytes(), args.as_bytes());
    assert_eq!(loaded.value("pages").as_u32(), 42);
    assert_eq!(loaded.section_value("tags", 1).to_string(), "ünï");

    let shared = SharedArguments::read_from(File::open(&path).unwrap()).unwrap();
    assert!(shared.contains_all(&args));
    assert!(args.contains_all(&shared));
}

#[test]
fn test_truncated_file_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("truncated.bin");

    let args = sample();
    let bytes = args.as_bytes();
    File::create(&path)
        .unwrap()
        .write_all(&bytes[..bytes.len() - 4])
        .unwrap();

    let result = Arguments::read_from(File::open(&path).unwrap());
    assert!(matches!(result, Err(ArgumentsError::Truncated { .. })));
}

#[test]
fn test_unknown_tag_in_file_is_rejected() {
    let mut bytes = sample().as_bytes().to_vec();
    // The last record is the value of `ratio`; give it tag 19
    let last = bytes.len() - 8;
    bytes[last..last + 4].copy_from_slice(&((19u32 << 24) | 4).to_ne_bytes());
    assert!(matches!(
        Arguments::from_bytes(&bytes),
        Err(ArgumentsError::InvalidTag(19))
    ));
}

#[test]
fn test_legacy_import_matches_native_buffer() {
    let mut legacy = Vec::new();
    legacy.extend_from_slice(&[0x14, 4]);
    legacy.extend_from_slice(b"name");
    legacy.push(ValueType::Utf8String as u8);
    legacy.extend_from_slice(b"widget\0");
    legacy.extend_from_slice(&[0x14, 5]);
    legacy.extend_from_slice(b"count");
    legacy.push(ValueType::UInt16 as u8);
    legacy.extend_from_slice(&7u16.to_ne_bytes());
    legacy.push(ValueType::UInt16 as u8);
    legacy.extend_from_slice(&8u16.to_ne_bytes());

    let imported: Arguments = import_legacy(&legacy).unwrap();

    let mut expected = Arguments::new();
    expected.append_named("name", Argument::utf8("widget")).unwrap();
    expected.append_section("count", [7u16, 8]).unwrap();

    assert_eq!(imported, expected);
    assert_eq!(imported.as_bytes(), expected.as_bytes());
    assert_eq!(imported.used_len() % argbuf::ALIGNMENT, 0);
}
