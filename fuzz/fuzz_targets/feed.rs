#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use apkwatch_risk_engine::threat_feed;

/// Structured feed input
#[derive(Arbitrary, Debug)]
struct FuzzFeed {
    identifiers: Vec<String>,
    limit: u8,
}

fuzz_target!(|input: FuzzFeed| {
    let limit = usize::from(input.limit);
    let items = threat_feed(&input.identifiers, limit);

    assert_eq!(items.len(), input.identifiers.len().min(limit));
    for item in &items {
        assert!((15..=98).contains(&item.risk_score));
    }
});
