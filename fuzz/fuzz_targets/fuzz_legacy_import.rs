#![no_main]
use argbuf::{import_legacy, Arguments};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(args) = import_legacy::<argbuf::OwnedStore>(data) {
        // Whatever was imported is a valid packed buffer
        let reloaded = Arguments::from_bytes(args.as_bytes()).unwrap();
        assert_eq!(reloaded, args);
    }
});
