//! Fuzz target for text annotations.
//!
//! Reading arbitrary bytes must either fail with an encoding error or
//! produce an annotation that materializes to four well-formed statements.

#![no_main]

use libfuzzer_sys::fuzz_target;
use distill::annotation::{Annotation, formats};

fuzz_target!(|data: &[u8]| {
    let Ok(format) = formats().lookup("TXT") else {
        return;
    };

    if let Ok(annotation) = Annotation::read(data, format) {
        let graph = annotation.materialize();
        assert_eq!(graph.len(), 4);
        assert!(graph.iter().all(|s| s.is_well_formed()));
    }
});
