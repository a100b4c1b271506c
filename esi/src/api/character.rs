use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use esi_core::{
    EsiError, Id, IdHandle, IdSetHandle, MappedResource, RequestParams, RouteId, SingleResource,
};

use crate::Esi;
use crate::api::corporation::CorporationRef;
use crate::api::killmails::RecentKillmails;

/// Public character information.
pub const CHARACTER: RouteId = RouteId::new("get_characters_character_id");
/// Bulk character affiliation.
pub const AFFILIATION: RouteId = RouteId::new("post_characters_affiliation");

/// Most ids the affiliation endpoint accepts in one body.
pub const AFFILIATION_MAX_IDS: usize = 1000;

/// Public character information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Character name.
    pub name: String,
    /// Current corporation.
    pub corporation_id: Id,
    /// Current alliance, if any.
    #[serde(default)]
    pub alliance_id: Option<Id>,
    /// Creation time.
    pub birthday: DateTime<Utc>,
    /// Security status, -10.0 to 10.0.
    #[serde(default)]
    pub security_status: Option<f64>,
}

/// Corporation, alliance and faction membership of a character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Affiliation {
    /// Character the record describes.
    pub character_id: Id,
    /// Current corporation.
    pub corporation_id: Id,
    /// Current alliance, if any.
    #[serde(default)]
    pub alliance_id: Option<Id>,
    /// Faction warfare faction, if enlisted.
    #[serde(default)]
    pub faction_id: Option<Id>,
}

async fn fetch_character(esi: &Esi, id: Id) -> Result<Character, EsiError> {
    esi.get(CHARACTER, RequestParams::new().with_path("character_id", id))
        .await
        .map_err(|e| e.relabel_not_found(format!("character {id}")))
}

impl Esi {
    /// One character.
    #[must_use]
    pub fn character(&self, id: impl Into<IdHandle>) -> CharacterRef {
        CharacterRef {
            esi: self.clone(),
            resource: SingleResource::new(id),
        }
    }

    /// A set of characters.
    #[must_use]
    pub fn characters(&self, ids: impl Into<IdSetHandle>) -> CharacterSet {
        CharacterSet {
            esi: self.clone(),
            resource: MappedResource::new(ids),
        }
    }
}

/// One character.
#[derive(Clone)]
pub struct CharacterRef {
    esi: Esi,
    resource: SingleResource,
}

impl CharacterRef {
    /// Resolve the character id.
    ///
    /// # Errors
    /// Propagates a dynamic handle's resolver failure.
    pub async fn id(&self) -> Result<Id, EsiError> {
        self.resource.id().await
    }

    /// Public character information.
    ///
    /// # Errors
    /// `NotFound` for an unknown character, or the request failure.
    pub async fn info(&self) -> Result<Character, EsiError> {
        self.resource
            .fetch(|id| fetch_character(&self.esi, id))
            .await
    }

    /// The character's current corporation.
    ///
    /// The corporation id is not known until the character is fetched, so
    /// the returned handle looks it up whenever it is resolved.
    #[must_use]
    pub fn corporation(&self) -> CorporationRef {
        let me = self.clone();
        let handle = IdHandle::dynamic(move || {
            let me = me.clone();
            async move { Ok(me.info().await?.corporation_id) }
        });
        self.esi.corporation(handle)
    }

    /// The character's recent kills and losses. Requires an access token.
    #[must_use]
    pub fn killmails(&self) -> RecentKillmails {
        RecentKillmails::new(self.esi.clone(), self.resource.handle().clone())
    }
}

/// A set of characters.
#[derive(Clone)]
pub struct CharacterSet {
    esi: Esi,
    resource: MappedResource,
}

impl CharacterSet {
    /// Public information for every character; unknown ids are omitted.
    ///
    /// # Errors
    /// The first failure other than an unknown id.
    pub async fn info(&self) -> Result<HashMap<Id, Character>, EsiError> {
        let esi = &self.esi;
        self.resource
            .fetch_each(esi.config().batch_concurrency, |id| fetch_character(esi, id))
            .await
    }

    /// Affiliations for every character, through the bulk endpoint.
    ///
    /// # Errors
    /// Fails as a whole if any group request fails.
    pub async fn affiliations(&self) -> Result<HashMap<Id, Affiliation>, EsiError> {
        let esi = &self.esi;
        let batcher = esi.batcher(AFFILIATION_MAX_IDS);
        self.resource
            .batch(
                &batcher,
                |group| {
                    esi.get::<Vec<Affiliation>>(AFFILIATION, RequestParams::new().with_body(group))
                },
                |a: &Affiliation| a.character_id,
            )
            .await
    }
}
