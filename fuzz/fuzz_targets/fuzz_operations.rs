#![no_main]
use arbitrary::Arbitrary;
use argbuf::{Argument, Arguments, SharedArguments};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
enum Value {
    Int(i64),
    Small(u8),
    Text(String),
    Bytes(Vec<u8>),
}

impl Value {
    fn to_argument(&self) -> Argument<'_> {
        match self {
            Value::Int(v) => Argument::Int64(*v),
            Value::Small(v) => Argument::UInt8(*v),
            Value::Text(s) => Argument::utf8(s.as_str()),
            Value::Bytes(b) => Argument::binary(b.as_slice()),
        }
    }
}

#[derive(Arbitrary, Debug)]
enum Op {
    Append(Option<String>, Value),
    SetIndex(u8, Value),
    Insert(u8, Option<String>, Value),
    Remove(u8),
    SetSection(String, Vec<Value>),
    Parse(String),
    Fork,
    Shrink,
}

fuzz_target!(|ops: Vec<Op>| {
    let mut args = SharedArguments::new();
    let mut forks = Vec::new();

    for op in &ops {
        match op {
            Op::Append(name, value) => {
                let _ = match name {
                    Some(name) => args.append_named(name, value.to_argument()),
                    None => args.append(value.to_argument()),
                };
            }
            Op::SetIndex(index, value) => {
                let _ = args.set_index(usize::from(*index), value.to_argument());
            }
            Op::Insert(index, name, value) => {
                let _ = args.insert_at(usize::from(*index), name.as_deref(), value.to_argument());
            }
            Op::Remove(index) => {
                let _ = args.remove_index(usize::from(*index));
            }
            Op::SetSection(name, values) => {
                let before = args.as_bytes().to_vec();
                if args.set_section(name, values.iter().map(Value::to_argument)).is_err() {
                    assert_eq!(args.as_bytes(), &before[..]);
                }
            }
            Op::Parse(text) => {
                let before = args.as_bytes().to_vec();
                if args.append_parsed(text).is_err() {
                    assert_eq!(args.as_bytes(), &before[..]);
                }
            }
            Op::Fork => {
                let snapshot: Arguments = args.to_buffer().unwrap();
                forks.push((args.clone(), snapshot));
            }
            Op::Shrink => {
                args.shrink_to_fit().unwrap();
            }
        }
        Arguments::from_bytes(args.as_bytes()).unwrap();
    }

    // Writes after a fork never leak into the forked handle
    for (fork, snapshot) in &forks {
        assert!(fork == snapshot);
    }
});
