//! Buffers built inside caller-provided memory

use argbuf::{Argument, Arguments, BorrowedArguments, Key};

#[test]
fn test_fits_in_stack_region() {
    let mut region = [0u8; 128];
    let mut args = BorrowedArguments::new_in(&mut region);
    assert_eq!(args.capacity(), 128);

    args.append_named("x", 1i32).unwrap();
    args.append_named("y", 2i32).unwrap();
    assert!(args.is_borrowed());
    assert!(!args.is_owner());
    assert_eq!(args.used_len(), 32);
    assert_eq!(args.print(), "\"x\": 1, \"y\": 2");

    let used = args.used_len();
    drop(args);
    // Records were written straight into the region
    let reloaded = Arguments::from_bytes(&region[..used]).unwrap();
    assert_eq!(reloaded.value("y"), Argument::Int32(2));
}

#[test]
fn test_moves_to_heap_when_full() {
    let mut region = [0u8; 16];
    let mut args = BorrowedArguments::new_in(&mut region);

    args.append_named("a", 1u8).unwrap();
    assert!(args.is_borrowed());

    args.append_named("b", "does not fit in sixteen bytes").unwrap();
    assert!(!args.is_borrowed());
    assert!(args.is_owner());
    assert!(args.capacity() > 16);
    assert_eq!(args.value("a"), Argument::UInt8(1));
    assert_eq!(args.value("b").to_string(), "does not fit in sixteen bytes");

    drop(args);
    // The region still holds only the first entry
    let early = Arguments::from_bytes(&region).unwrap();
    assert_eq!(early.len(), 1);
}

#[test]
fn test_edits_through_keys() {
    let mut region = [0u8; 256];
    let mut args = BorrowedArguments::new_in(&mut region);
    args.append_section("list", [1i32, 2, 3]).unwrap();
    args.append_named("mode", "slow").unwrap();

    args.edit("mode").set("fast").unwrap();
    args.edit(("list", 3)).set(4i32).unwrap();
    assert!(args.edit(Key::Index(0)).exists());
    assert!(args.edit(("list", 1)).remove().unwrap());

    assert_eq!(
        args.section_values("list"),
        vec![Argument::Int32(1), Argument::Int32(3), Argument::Int32(4)]
    );
    assert_eq!(args.value("mode").as_str(), Some("fast"));
    assert!(args.is_borrowed());
}
