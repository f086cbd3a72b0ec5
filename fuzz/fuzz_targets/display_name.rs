#![no_main]

use libfuzzer_sys::fuzz_target;

use apkwatch_risk_engine::display_name;

fuzz_target!(|identifier: &str| {
    let name = display_name(identifier);
    assert!(!name.is_empty() || identifier.split('.').any(|t| !t.is_empty()));
    assert!(!name.contains('.'));
});
