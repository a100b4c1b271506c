use serde_json::{Value, json};

/// Character records, keyed by `character_id`.
#[must_use]
pub fn characters() -> Vec<Value> {
    vec![
        json!({
            "character_id": 90_000_001,
            "name": "Aura Vex",
            "corporation_id": 98_000_001,
            "alliance_id": 99_000_001,
            "birthday": "2015-03-24T11:37:00Z",
            "security_status": 2.5,
        }),
        json!({
            "character_id": 90_000_002,
            "name": "Ivo Kestrel",
            "corporation_id": 98_000_002,
            "birthday": "2021-11-02T18:05:00Z",
            "security_status": -1.25,
        }),
        json!({
            "character_id": 90_000_003,
            "name": "Mara Lind",
            "corporation_id": 1_000_125,
            "birthday": "2024-01-09T08:00:00Z",
        }),
    ]
}

/// Affiliation records derived from [`characters`].
#[must_use]
pub fn affiliations() -> Vec<Value> {
    characters()
        .into_iter()
        .map(|c| {
            let mut a = json!({
                "character_id": c["character_id"],
                "corporation_id": c["corporation_id"],
            });
            if let Some(alliance) = c.get("alliance_id") {
                a["alliance_id"] = alliance.clone();
            }
            a
        })
        .collect()
}
