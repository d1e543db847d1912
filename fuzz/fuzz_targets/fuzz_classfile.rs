#![no_main]

use libfuzzer_sys::fuzz_target;
use nova_classfile::{NoSiblings, StubBuilder};

mod utils;

fn check(input: &[u8]) {
    let resolver = NoSiblings;
    let Ok(tree) = StubBuilder::new(&resolver).build_or_placeholder("Fuzz.class", input) else {
        return;
    };
    for id in tree.descendants() {
        let path = tree.path_of(id);
        assert_eq!(tree.resolve(&path), Some(id), "path {path} does not resolve");
    }
}

fuzz_target!(|data: &[u8]| {
    utils::run_with_timeout("fuzz_classfile", data, check);
});
