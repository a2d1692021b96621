use serde_json::{Map, Value};

/// Flat field names a CIN has been observed under, in precedence order.
const CIN_FIELDS: [&str; 6] = [
    "cin",
    "CIN",
    "cinNumber",
    "cin_number",
    "companyCin",
    "registrationNumber",
];

/// Sub-objects scanned with the same field list when nothing matches at the
/// document root.
const CIN_SECTIONS: [&str; 4] = ["user", "company", "businessDetails", "startup"];

/// Locates the CIN inside a schema-flexible profile document.
///
/// Recognised startups carry it at `user.startup.cin`; older profile shapes
/// put it under varying flat names at the root or inside one of a few
/// sub-objects. First non-empty string match wins. Returns an empty string
/// when absent or when the input is not an object.
pub fn extract_cin(profile: &Value) -> String {
    let Some(root) = profile.as_object() else {
        return String::new();
    };

    if let Some(cin) = profile
        .pointer("/user/startup/cin")
        .and_then(Value::as_str)
        .filter(|c| !c.is_empty())
    {
        return cin.to_string();
    }

    if let Some(cin) = scan_fields(root) {
        return cin;
    }

    for section in CIN_SECTIONS {
        if let Some(cin) = root
            .get(section)
            .and_then(Value::as_object)
            .and_then(scan_fields)
        {
            return cin;
        }
    }

    String::new()
}

fn scan_fields(obj: &Map<String, Value>) -> Option<String> {
    for field in CIN_FIELDS {
        if let Some(value) = obj.get(field).and_then(Value::as_str) {
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}
