//! Property-based tests for the packed layout
//!
//! Uses proptest to check that arbitrary mutation sequences keep the buffer
//! aligned, ordered and decodable.

use argbuf::{Argument, Arguments, SharedArguments, ALIGNMENT, GROWTH_ALIGNMENT};
use proptest::prelude::*;

fn arb_argument() -> impl Strategy<Value = Argument<'static>> {
    prop_oneof![
        any::<bool>().prop_map(Argument::Bool),
        any::<i8>().prop_map(Argument::Int8),
        any::<u16>().prop_map(Argument::UInt16),
        any::<i32>().prop_map(Argument::Int32),
        any::<u64>().prop_map(Argument::UInt64),
        any::<i32>().prop_map(|v| Argument::Double(f64::from(v) / 4.0)),
        any::<[u8; 16]>().prop_map(Argument::Guid),
        "[a-z ]{0,12}".prop_map(|s| Argument::from(s)),
        "\\PC{0,6}".prop_map(|s| Argument::utf8(s)),
        "\\PC{0,6}".prop_map(|s| Argument::wide(&s)),
        prop::collection::vec(any::<u8>(), 0..24).prop_map(|bytes| Argument::binary(bytes)),
    ]
}

fn arb_name() -> impl Strategy<Value = Option<String>> {
    prop::option::of("[a-z]{1,9}")
}

proptest! {
    #[test]
    fn prop_appends_preserve_order_and_alignment(
        entries in prop::collection::vec((arb_name(), arb_argument()), 0..40)
    ) {
        let mut args = Arguments::new();
        for (name, value) in &entries {
            let position = match name {
                Some(name) => args.append_named(name, value.reborrow()).unwrap(),
                None => args.append(value.reborrow()).unwrap(),
            };
            prop_assert_eq!(position.offset() % ALIGNMENT, 0);
        }

        prop_assert_eq!(args.used_len() % ALIGNMENT, 0);
        prop_assert_eq!(args.len(), entries.len());
        for (entry, (name, value)) in args.iter().zip(&entries) {
            prop_assert_eq!(entry.name, name.as_deref());
            prop_assert_eq!(&entry.value, value);
        }

        let reloaded = Arguments::from_bytes(args.as_bytes()).unwrap();
        prop_assert!(reloaded == args);
    }

    #[test]
    fn prop_capacity_grows_in_aligned_steps(
        sizes in prop::collection::vec(0usize..300, 1..20)
    ) {
        let mut args = Arguments::new();
        for size in sizes {
            let before = args.capacity();
            args.append(Argument::binary(vec![0xA5u8; size])).unwrap();
            prop_assert!(args.capacity() >= args.used_len());
            if args.capacity() != before {
                prop_assert_eq!(args.capacity() % GROWTH_ALIGNMENT, 0);
            }
        }
    }

    #[test]
    fn prop_set_and_remove_match_model(
        initial in prop::collection::vec(arb_argument(), 1..16),
        edits in prop::collection::vec((any::<prop::sample::Index>(), arb_argument(), any::<bool>()), 0..24)
    ) {
        let mut args = Arguments::new();
        let mut model: Vec<Argument<'static>> = Vec::new();
        for value in initial {
            args.append(value.reborrow()).unwrap();
            model.push(value);
        }

        for (index, value, remove) in edits {
            if model.is_empty() {
                break;
            }
            let index = index.index(model.len());
            if remove {
                args.remove_index(index).unwrap();
                model.remove(index);
            } else {
                args.set_index(index, value.reborrow()).unwrap();
                model[index] = value;
            }
        }

        prop_assert_eq!(args.len(), model.len());
        prop_assert_eq!(args.used_len() % ALIGNMENT, 0);
        for (entry, expected) in args.iter().zip(&model) {
            prop_assert_eq!(&entry.value, expected);
        }
    }

    #[test]
    fn prop_shared_clones_are_isolated(
        values in prop::collection::vec(any::<i32>(), 1..12),
        replacement in any::<i64>()
    ) {
        let mut original = SharedArguments::new();
        original.append_section("values", values.iter().copied()).unwrap();
        let snapshot = original.clone();

        let mut copy = original.clone();
        copy.set_index(0, replacement).unwrap();

        prop_assert!(original == snapshot);
        prop_assert_eq!(copy.value_at(0), Argument::Int64(replacement));
        prop_assert_eq!(copy.len(), values.len());
    }
}
