//! Property-Based Tests for settings and backend config
//!
//! Uses `proptest` to check that well-formed environment values always land
//! in their fields unchanged and malformed ones always fail at construction.

use proptest::prelude::*;

use memlink_core::backend::SLOTS;
use memlink_core::{MemlinkError, MemoryBackendConfig, Settings, VectorStoreConfig};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

fn arb_origin() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("http"), Just("https")],
        "[a-z][a-z0-9-]{0,15}(\\.[a-z]{2,6}){0,2}",
        proptest::option::of(1u16..=65535),
    )
        .prop_map(|(scheme, host, port)| match port {
            Some(p) => format!("{scheme}://{host}:{p}"),
            None => format!("{scheme}://{host}"),
        })
}

fn arb_api_key() -> impl Strategy<Value = String> {
    // Includes all-digit and float-looking keys, which must stay verbatim.
    prop_oneof![
        "[A-Za-z0-9_-]{1,48}",
        "0[0-9]{1,8}",
        Just("1e5".to_string()),
        Just("nan".to_string()),
    ]
}

// ---------------------------------------------------------------------------
// Property: origin lists round-trip in both accepted encodings
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn origins_round_trip_as_comma_list(origins in prop::collection::vec(arb_origin(), 1..6)) {
        let raw = origins.join(",");
        let settings = Settings::from_map([("CORS_ORIGINS", raw)]).expect("settings");
        prop_assert_eq!(settings.cors_origins, origins);
    }

    #[test]
    fn origins_round_trip_as_json(origins in prop::collection::vec(arb_origin(), 1..6)) {
        let raw = serde_json::to_string(&origins).expect("json");
        let settings = Settings::from_map([("CORS_ORIGINS", raw)]).expect("settings");
        prop_assert_eq!(settings.cors_origins, origins);
    }
}

// ---------------------------------------------------------------------------
// Property: typed values round-trip; malformed ones fail eagerly
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn any_valid_port_round_trips(port in 1u16..=65535) {
        let settings = Settings::from_map([("QDRANT_PORT", port.to_string())]).expect("settings");
        prop_assert_eq!(settings.qdrant_port, port);
    }

    #[test]
    fn non_numeric_port_fails(raw in "[a-z]{1,12}") {
        let result = Settings::from_map([("QDRANT_PORT", raw)]);
        prop_assert!(matches!(result, Err(MemlinkError::Settings(_))));
    }

    #[test]
    fn word_temperature_fails(raw in "[a-z]{1,12}") {
        // Includes `nan`/`inf`, which parse as floats but are not finite.
        let result = Settings::from_map([("LLM_TEMPERATURE", raw)]);
        prop_assert!(matches!(result, Err(MemlinkError::Settings(_))));
    }

    #[test]
    fn finite_temperature_round_trips(t in 0.0f64..=2.0) {
        let settings = Settings::from_map([("LLM_TEMPERATURE", t.to_string())]).expect("settings");
        prop_assert_eq!(settings.llm_temperature, t);
    }

    #[test]
    fn credentials_round_trip(openrouter in arb_api_key(), google in arb_api_key()) {
        let settings = Settings::from_map([
            ("OPENROUTER_API_KEY", openrouter.clone()),
            ("GOOGLE_API_KEY", google.clone()),
        ])
        .expect("settings");
        prop_assert_eq!(
            settings.openrouter_api_key.as_ref().map(|k| k.expose().to_string()),
            Some(openrouter)
        );
        prop_assert_eq!(
            settings.google_api_key.as_ref().map(|k| k.expose().to_string()),
            Some(google)
        );
    }
}

// ---------------------------------------------------------------------------
// Property: the wire form always carries exactly the four slots
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn wire_form_always_has_four_slots(
        host in "[a-z][a-z0-9.-]{0,20}",
        port in 1u16..=65535,
    ) {
        let config = MemoryBackendConfig {
            vector_store: VectorStoreConfig::qdrant(host.clone(), port),
            ..MemoryBackendConfig::default()
        };
        let value = config.to_value().expect("to_value");
        let map = value.as_object().expect("object");
        prop_assert_eq!(map.len(), 4);
        for slot in SLOTS {
            prop_assert!(map.contains_key(slot));
        }
        prop_assert_eq!(&value["vector_store"]["config"]["host"], &serde_json::json!(host));
        prop_assert_eq!(&value["vector_store"]["config"]["port"], &serde_json::json!(port));

        let back = MemoryBackendConfig::from_value(value).expect("parse");
        prop_assert_eq!(back, config);
    }
}
