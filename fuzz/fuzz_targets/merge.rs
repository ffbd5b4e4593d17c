#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    json_addition_fuzz::fuzz_merge(data);
});
