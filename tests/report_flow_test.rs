//! End-to-end grouping and rendering of a small invoice feed

use boost_report::display::ReportDisplayManager;
use boost_report::{aggregate, Bitcoin, InvoiceRecord};
use serde_json::json;

fn feed() -> Vec<InvoiceRecord> {
    serde_json::from_value(json!([
        {
            "amount": 1000,
            "boostagram": {"action": "stream", "sender_name": "Alice", "episode_guid": "E1"},
            "creation_date": 1_700_000_000,
            "identifier": "inv-1"
        },
        {
            "amount": 500,
            "boostagram": {"action": "boost", "sender_name": "Alice", "episode_guid": "E1", "message": "nice"},
            "creation_date": 1_700_000_060,
            "identifier": "inv-2"
        },
        {
            "amount": 77,
            "boostagram": null,
            "creation_date": 1_700_000_090,
            "identifier": "inv-unattributed"
        },
        {
            "amount": 200,
            "boostagram": {"action": "stream", "episode": "Show"},
            "creation_date": 1_700_000_120,
            "identifier": "inv-3"
        }
    ]))
    .unwrap()
}

#[test]
fn groups_listeners_in_first_seen_order() {
    let listeners = aggregate(&feed());

    assert_eq!(listeners.len(), 2);
    assert_eq!(listeners[0].name, "Alice");
    assert_eq!(listeners[0].stream_total(), Bitcoin::from_sats(1000));
    assert_eq!(listeners[0].boost_total(), Bitcoin::from_sats(500));
    assert_eq!(listeners[0].episodes.len(), 1);
    assert_eq!(listeners[0].episodes[0].payments.len(), 2);

    assert_eq!(listeners[1].name, "Anonymous");
    assert_eq!(listeners[1].stream_total(), Bitcoin::from_sats(200));
    assert_eq!(listeners[1].boost_total(), Bitcoin::ZERO);
}

#[test]
fn renders_streamers_and_boost_sections() {
    colored::control::set_override(false);
    let display = ReportDisplayManager::default();
    let listeners = aggregate(&feed());

    assert_eq!(
        display.streamers_section(&listeners),
        "\nSTREAMERS\n\nAlice\t1,000 sats\nAnonymous\t200 sats\n"
    );
    assert_eq!(
        display.boost_section(&listeners),
        "\nBOOST\n\nAlice\n\tE1\n\t\t500 sats - nice - timestamp: unknown\n"
    );
}
