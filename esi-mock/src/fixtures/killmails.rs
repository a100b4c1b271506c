use esi_core::Id;
use serde_json::{Value, json};

/// Killmail links with ids `1..=n`, newest (highest id) first.
#[must_use]
pub fn links(n: Id) -> Vec<Value> {
    (1..=n).rev().map(link).collect()
}

/// The link record for one killmail id.
#[must_use]
pub fn link(id: Id) -> Value {
    json!({ "killmail_id": id, "killmail_hash": hash(id) })
}

/// The hash paired with a killmail id in these fixtures.
#[must_use]
pub fn hash(id: Id) -> String {
    format!("{:040x}", id.unsigned_abs().wrapping_mul(0x9e37_79b9_7f4a_7c15))
}

/// Full killmail records for ids `1..=n`.
#[must_use]
pub fn killmails(n: Id) -> Vec<Value> {
    (1..=n).map(killmail).collect()
}

/// One full killmail record.
#[must_use]
pub fn killmail(id: Id) -> Value {
    json!({
        "killmail_id": id,
        "killmail_time": format!("2026-03-{:02}T12:{:02}:00Z", id % 28 + 1, id % 60),
        "solar_system_id": 30_000_142 + id % 5,
        "victim": {
            "character_id": 90_000_000 + id,
            "corporation_id": 98_000_001,
            "ship_type_id": 587,
            "damage_taken": 1_000 + id,
        },
    })
}
