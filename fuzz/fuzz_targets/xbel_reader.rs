#![no_main]
use libfuzzer_sys::fuzz_target;
use xbelkit::{from_xbel_bytes_with_config, Config};

fuzz_target!(|data: &[u8]| {
    let _ = from_xbel_bytes_with_config(data, Config::new(64, 1 << 16));
});
