#![no_main]

use libfuzzer_sys::fuzz_target;
use nova_decompile::{CompiledFile, TextSize};

mod utils;

fn check(input: &[u8]) {
    let file = CompiledFile::new("Fuzz.class", input.to_vec());
    let text = file.text();
    assert_eq!(file.degraded_paths(), Vec::new(), "synthesized text failed to bind");

    let len = u32::try_from(text.len()).unwrap_or(u32::MAX);
    for offset in (0..=len).step_by(7) {
        if let Some(element) = file.element_at(TextSize::from(offset)) {
            let range = element.text_range().expect("bound element has a range");
            assert!(range.start() <= TextSize::from(offset) && TextSize::from(offset) <= range.end());
        }
    }
}

fuzz_target!(|data: &[u8]| {
    utils::run_with_timeout("fuzz_decompile_classfile", data, check);
});
