use esi_core::Id;
use serde_json::{Value, json};

/// Corporation records, keyed by `corporation_id`.
#[must_use]
pub fn corporations() -> Vec<Value> {
    vec![
        json!({
            "corporation_id": 98_000_001,
            "name": "Interstellar Logistics",
            "ticker": "ISLOG",
            "member_count": 42,
            "ceo_id": 90_000_001,
            "alliance_id": 99_000_001,
            "date_founded": "2019-07-14T09:30:00Z",
        }),
        json!({
            "corporation_id": 98_000_002,
            "name": "Deep Core Mining",
            "ticker": "DCM",
            "member_count": 7,
            "ceo_id": 90_000_002,
        }),
        json!({
            "corporation_id": 1_000_125,
            "name": "Center for Advanced Studies",
            "ticker": "CAS",
            "member_count": 0,
            "ceo_id": 3_004_141,
        }),
    ]
}

/// Starbases with ids `1_000_001..=1_000_000 + n`, in page order.
#[must_use]
pub fn starbases(n: Id) -> Vec<Value> {
    (1..=n).map(|i| starbase(1_000_000 + i)).collect()
}

/// One starbase record.
#[must_use]
pub fn starbase(starbase_id: Id) -> Value {
    let state = match starbase_id % 3 {
        0 => "online",
        1 => "reinforced",
        _ => "offline",
    };
    json!({
        "starbase_id": starbase_id,
        "system_id": 30_000_142 + starbase_id % 7,
        "type_id": 12_235,
        "moon_id": 40_000_000 + starbase_id % 1_000,
        "state": state,
    })
}
