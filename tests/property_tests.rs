/// Property-based tests using proptest
/// Tests invariants that should hold for all inputs
use proptest::prelude::*;
use serde_json::{json, Value};

use startup_harvester::extract::extract_cin;
use startup_harvester::models::{is_empty_document, profile_id};

// Property: CIN extraction should never panic
proptest! {
    #[test]
    fn extraction_never_panics_on_scalar_values(input in "\\PC*") {
        let _ = extract_cin(&Value::String(input));
    }

    #[test]
    fn extraction_never_panics_on_arbitrary_json(input in "\\PC*") {
        // Any text that happens to parse as JSON must be handled
        if let Ok(value) = serde_json::from_str::<Value>(&input) {
            let _ = extract_cin(&value);
        }
    }

    #[test]
    fn unrelated_root_keys_never_match(
        key in "[a-z]{1,12}",
        value in "[A-Z0-9]{1,21}"
    ) {
        // "cin" is the only all-lowercase candidate name without separators
        prop_assume!(key != "cin");
        let profile = json!({ key: value });
        prop_assert_eq!(extract_cin(&profile), "");
    }

    #[test]
    fn primary_path_returns_cin_verbatim(cin in "[A-Z][A-Z0-9]{4,20}") {
        let profile = json!({
            "cin": "SHADOWED",
            "user": { "startup": { "cin": cin.clone() } }
        });
        prop_assert_eq!(extract_cin(&profile), cin);
    }
}

// Property: listing-id lookup and emptiness checks hold for all inputs
proptest! {
    #[test]
    fn non_empty_string_ids_are_accepted(id in "[a-zA-Z0-9-]{1,24}") {
        let item = json!({ "id": id.clone() });
        prop_assert_eq!(profile_id(&item), Some(id.as_str()));
    }

    #[test]
    fn non_string_ids_are_rejected(id in proptest::num::i64::ANY) {
        let item = json!({ "id": id });
        prop_assert_eq!(profile_id(&item), None);
    }

    #[test]
    fn scalar_documents_are_never_empty(n in proptest::num::i64::ANY) {
        prop_assert!(!is_empty_document(&json!(n)));
    }

    #[test]
    fn single_key_objects_are_never_empty(
        key in "[a-z]{1,10}",
        value in "[a-z0-9]{0,10}"
    ) {
        let doc = json!({ key: value });
        prop_assert!(!is_empty_document(&doc));
    }
}
