//! The patient registered by `hdx demo`.

use serde_json::{Value, json};

/// A synthetic patient with enough demographics for record matching.
pub fn patient() -> Value {
    json!({
        "resourceType": "Patient",
        "gender": "male",
        "name": [{ "family": "Klein", "given": ["Quinton"] }],
        "address": [{
            "line": ["629 Schuster Common"],
            "city": "Amesbury",
            "state": "MA",
            "postalCode": "01913"
        }],
        "birthDate": "1967-10-20",
        "identifier": [{
            "type": { "text": "SSN" },
            "value": "123-45-6789"
        }],
        "telecom": [{ "system": "phone", "value": "1-234-567-8910" }]
    })
}
