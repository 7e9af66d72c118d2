#![no_main]
use argbuf::{Arguments, Position};
use libfuzzer_sys::fuzz_target;

// Untrusted bytes must either be rejected or decode completely
fuzz_target!(|data: &[u8]| {
    let Ok(args) = Arguments::from_bytes(data) else {
        return;
    };

    let mut count = 0;
    let mut cursor = args.first();
    while let Some(position) = cursor {
        args.entry(position).unwrap();
        count += 1;
        cursor = args.next(position).unwrap();
    }
    assert_eq!(count, args.len());
    assert_eq!(args.as_bytes(), data);

    let _ = args.print();
    let _ = args.to_json();
    let _ = args.get(Position::from_offset(data.len() / 2));
});
