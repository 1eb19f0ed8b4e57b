#![no_main]

use libfuzzer_sys::fuzz_target;
use pdfsplice::PageSpec;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(spec) = PageSpec::parse(text) else {
        return;
    };

    let pages = spec.to_vec();
    assert!(pages.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(pages.iter().all(|page| *page >= 1));
    assert_eq!(pages.len(), spec.len());
});
