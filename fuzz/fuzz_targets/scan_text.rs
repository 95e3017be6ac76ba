//! Fuzz target for the placeholder scanner and substitution engine.
//!
//! Run with: cargo +nightly fuzz run scan_text
//!
//! Properties checked:
//! - Segments reassemble the input exactly
//! - Passthrough with no values leaves the text unchanged

#![no_main]

use libfuzzer_sys::fuzz_target;
use slidefill::template::{Scanner, SubstitutionEngine};
use slidefill::{PartPath, PartReport, TemplateMapping, UnresolvedPolicy};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let rebuilt: String = Scanner::new(text).map(|s| s.raw()).collect();
    assert_eq!(rebuilt, text);

    let mapping = TemplateMapping::new();
    let engine = SubstitutionEngine::new(&mapping, UnresolvedPolicy::Passthrough);
    let Ok(path) = PartPath::new("fuzz.xml") else {
        return;
    };
    let mut report = PartReport::new(path, 0);
    let rendered = engine
        .render("fuzz.xml", text, &mut report)
        .expect("passthrough never fails without values");
    assert_eq!(rendered, text);
});
