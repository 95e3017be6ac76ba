//! Fuzz target for template generation from arbitrary container bytes.
//!
//! Run with: cargo +nightly fuzz run generate
//!
//! Any input must either fail with a typed error or produce an archive that
//! opens again with the same parts in the same order.

#![no_main]

use libfuzzer_sys::fuzz_target;
use slidefill::{Archive, Pipeline, TemplateMapping};

fuzz_target!(|data: &[u8]| {
    let Ok(archive) = Archive::open(data) else {
        return;
    };

    let mut mapping = TemplateMapping::new();
    let _ = mapping.insert("name", "A & B <C>");

    if let Ok(generated) = Pipeline::default().generate(data, &mapping) {
        let output = Archive::open(&generated.bytes).expect("generated archive must reopen");
        assert_eq!(output.len(), archive.len());
        for (before, after) in archive.parts().iter().zip(output.parts()) {
            assert_eq!(before.path(), after.path());
            assert_eq!(before.compression(), after.compression());
        }
    }
});
