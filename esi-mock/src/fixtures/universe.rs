use esi_core::Id;
use serde_json::{Value, json};

/// First solar system id in these fixtures.
pub const FIRST_SYSTEM_ID: Id = 30_000_001;

/// Ids of `n` solar systems, as the all-systems endpoint returns them.
#[must_use]
pub fn system_ids(n: Id) -> Value {
    Value::Array((0..n).map(|i| json!(FIRST_SYSTEM_ID + i)).collect())
}

/// Solar system records for the ids returned by [`system_ids`].
#[must_use]
pub fn systems(n: Id) -> Vec<Value> {
    (0..n).map(|i| system(FIRST_SYSTEM_ID + i)).collect()
}

/// One solar system record.
#[must_use]
pub fn system(system_id: Id) -> Value {
    json!({
        "system_id": system_id,
        "name": format!("J{:06}", system_id - FIRST_SYSTEM_ID + 100_000),
        "constellation_id": 20_000_001 + (system_id - FIRST_SYSTEM_ID) / 6,
        "security_status": 0.5,
    })
}

/// Name records for systems, characters and corporations.
#[must_use]
pub fn names(system_count: Id) -> Vec<Value> {
    let mut out: Vec<Value> = (0..system_count)
        .map(|i| {
            let id = FIRST_SYSTEM_ID + i;
            json!({
                "id": id,
                "name": format!("J{:06}", i + 100_000),
                "category": "solar_system",
            })
        })
        .collect();
    for c in super::character::characters() {
        out.push(json!({ "id": c["character_id"], "name": c["name"], "category": "character" }));
    }
    for c in super::corporation::corporations() {
        out.push(json!({ "id": c["corporation_id"], "name": c["name"], "category": "corporation" }));
    }
    out
}
