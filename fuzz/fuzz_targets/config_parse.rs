#![no_main]

use libfuzzer_sys::fuzz_target;

use apkwatch_core::config::ApkwatchConfig;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        if let Ok(config) = ApkwatchConfig::parse(content) {
            if config.validate().is_ok() {
                assert!(config.stream.channel_capacity >= 1);
                assert!(!config.feed.identifiers.is_empty());
                assert!(config.server.socket_addr().is_ok());
            }
        }
    }
});
