#![no_main]

use libfuzzer_sys::fuzz_target;

mod utils;

fn check(input: &[u8]) {
    let Some(sig) = utils::truncate_utf8(input) else {
        return;
    };
    let _ = nova_classfile::parse_class_signature(sig);
    let _ = nova_classfile::parse_method_signature(sig);
    if let Ok(field) = nova_classfile::parse_field_signature(sig) {
        let _ = field.java_text();
    }
}

fuzz_target!(|data: &[u8]| {
    utils::run_with_timeout("fuzz_signature", data, check);
});
