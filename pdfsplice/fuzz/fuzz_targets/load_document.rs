#![no_main]

use libfuzzer_sys::fuzz_target;
use pdfsplice::{PageSpec, ops, page_tree, parser, writer};

fuzz_target!(|data: &[u8]| {
    let Ok(doc) = parser::load(data) else {
        return;
    };

    // Anything that loads must survive a full edit cycle without panicking
    let Ok(count) = page_tree::page_count(&doc) else {
        return;
    };
    ops::metadata(&doc);
    if count > 0 {
        let _ = ops::extract(&doc, &PageSpec::single(1));
        let _ = ops::delete(&doc, &PageSpec::single(1));
    }

    if let Ok(bytes) = writer::write(&doc) {
        let reloaded = parser::load(&bytes).expect("written output must load");
        assert_eq!(page_tree::page_count(&reloaded).ok(), Some(count));
    }
});
