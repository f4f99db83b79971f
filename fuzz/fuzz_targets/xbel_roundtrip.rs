#![no_main]
use libfuzzer_sys::fuzz_target;
use xbelkit::{from_xbel_str, to_xbel_string};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(tree) = from_xbel_str(s) {
            let xml = to_xbel_string(&tree).unwrap();
            assert_eq!(from_xbel_str(&xml).unwrap(), tree);
        }
    }
});
