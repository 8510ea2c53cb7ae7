//! Fuzz target for the build-script parser and extractor
//!
//! Run with: cargo +nightly fuzz run parser_fuzz -- -max_total_time=60

#![no_main]

use buildscan_dsl::{extract, parse, pretty_print, same_structure};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        match parse(input) {
            Ok(script) => {
                // Whatever parses must survive a trip through the printer.
                let printed = pretty_print(&script);
                let reparsed = parse(&printed).expect("printed script must parse");
                assert!(same_structure(&script, &reparsed));

                let report = extract(input).expect("parsed script must extract");
                for window in report.diagnostics.windows(2) {
                    assert!(window[0].location.offset <= window[1].location.offset);
                }
            }
            Err(err) => {
                let location = err.location();
                assert!(location.line >= 1 && location.column >= 1);
            }
        }
    }
});
