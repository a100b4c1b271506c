use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use esi_core::{
    EsiError, Id, IdHandle, IdSetHandle, ItemStream, IteratedResource, MappedResource, Memoized,
    PageStreamer, RequestParams, RouteId, SingleResource, Streamer, filter_one_streamed,
};

use crate::Esi;
use crate::api::PinnedId;
use crate::api::scope::Scoped;

/// Public corporation information.
pub const CORPORATION: RouteId = RouteId::new("get_corporations_corporation_id");
/// A corporation's starbases, paginated.
pub const STARBASES: RouteId = RouteId::new("get_corporations_corporation_id_starbases");

/// Records per full page of the starbase listing.
pub const STARBASES_PAGE_SIZE: usize = 1000;

/// Public corporation information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corporation {
    /// Corporation name.
    pub name: String,
    /// Short ticker.
    pub ticker: String,
    /// Number of member characters.
    pub member_count: u32,
    /// Character id of the CEO.
    pub ceo_id: Id,
    /// Alliance, if the corporation is in one.
    #[serde(default)]
    pub alliance_id: Option<Id>,
    /// Founding time; absent for NPC corporations.
    #[serde(default)]
    pub date_founded: Option<DateTime<Utc>>,
}

/// Operating state of a starbase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StarbaseState {
    /// Anchored, not running.
    Offline,
    /// Running.
    Online,
    /// Coming online.
    Onlining,
    /// Under reinforcement timer.
    Reinforced,
    /// Being unanchored.
    Unanchoring,
}

/// One row of a corporation's starbase listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Starbase {
    /// Starbase id.
    pub starbase_id: Id,
    /// Solar system it is anchored in.
    pub system_id: Id,
    /// Control tower type.
    pub type_id: Id,
    /// Moon it is anchored at, if any.
    #[serde(default)]
    pub moon_id: Option<Id>,
    /// Operating state; absent while unanchored.
    #[serde(default)]
    pub state: Option<StarbaseState>,
    /// End of the current reinforcement timer.
    #[serde(default)]
    pub reinforced_until: Option<DateTime<Utc>>,
    /// When unanchoring started.
    #[serde(default)]
    pub unanchor_at: Option<DateTime<Utc>>,
}

const fn starbase_key(s: &Starbase) -> Id {
    s.starbase_id
}

async fn fetch_corporation(esi: &Esi, id: Id) -> Result<Corporation, EsiError> {
    esi.get(
        CORPORATION,
        RequestParams::new().with_path("corporation_id", id),
    )
    .await
    .map_err(|e| e.relabel_not_found(format!("corporation {id}")))
}

impl Esi {
    /// One corporation, by id or by a lazily resolved handle.
    #[must_use]
    pub fn corporation(&self, id: impl Into<IdHandle>) -> CorporationRef {
        CorporationRef {
            esi: self.clone(),
            resource: SingleResource::new(id),
        }
    }

    /// A set of corporations.
    #[must_use]
    pub fn corporations(&self, ids: impl Into<IdSetHandle>) -> CorporationSet {
        CorporationSet {
            esi: self.clone(),
            resource: MappedResource::new(ids),
        }
    }
}

/// One corporation.
#[derive(Clone)]
pub struct CorporationRef {
    esi: Esi,
    resource: SingleResource,
}

impl CorporationRef {
    /// Resolve the corporation id.
    ///
    /// # Errors
    /// Propagates a dynamic handle's resolver failure.
    pub async fn id(&self) -> Result<Id, EsiError> {
        self.resource.id().await
    }

    /// Public corporation information.
    ///
    /// # Errors
    /// `NotFound` for an unknown corporation, or the request failure.
    pub async fn info(&self) -> Result<Corporation, EsiError> {
        self.resource
            .fetch(|id| fetch_corporation(&self.esi, id))
            .await
    }

    /// The corporation's starbases. Requires an access token.
    ///
    /// The listing is fetched page by page on first use and shared by every
    /// view derived from the returned value.
    #[must_use]
    pub fn starbases(&self) -> Starbases {
        let corporation = PinnedId::new(self.resource.handle().clone());
        let esi = self.esi.clone();
        let pages = PageStreamer::new(STARBASES_PAGE_SIZE, move |page| {
            let esi = esi.clone();
            let corporation = corporation.clone();
            async move {
                let id = corporation.get().await?;
                esi.get_authed::<Vec<Starbase>>(
                    STARBASES,
                    RequestParams::new()
                        .with_path("corporation_id", id)
                        .with_query("page", page),
                )
                .await
            }
        });
        Starbases {
            index: Arc::new(Memoized::new(pages)),
        }
    }
}

/// A set of corporations.
#[derive(Clone)]
pub struct CorporationSet {
    esi: Esi,
    resource: MappedResource,
}

impl CorporationSet {
    /// Public information for every corporation; unknown ids are omitted.
    ///
    /// # Errors
    /// The first failure other than an unknown id.
    pub async fn info(&self) -> Result<HashMap<Id, Corporation>, EsiError> {
        let esi = &self.esi;
        self.resource
            .fetch_each(esi.config().batch_concurrency, |id| fetch_corporation(esi, id))
            .await
    }
}

/// A corporation's starbase listing, readable for one, many, or all starbases.
///
/// The listing is the only source for individual starbases, so per-id reads
/// scan it and stop at the last page they need.
#[derive(Clone)]
pub struct Starbases {
    index: Arc<Memoized<Starbase>>,
}

impl Starbases {
    /// Every starbase, in page order.
    #[must_use]
    pub fn stream(&self) -> ItemStream<Starbase> {
        self.index.stream()
    }

    /// Forget the pages fetched so far.
    pub fn refresh(&self) {
        self.index.reset();
    }
}

impl Scoped for Starbases {
    type One = StarbaseRef;
    type Many = StarbaseSet;
    type All = IteratedResource<Starbase>;

    fn for_one(&self, id: impl Into<IdHandle>) -> StarbaseRef {
        StarbaseRef {
            index: Arc::clone(&self.index),
            resource: SingleResource::new(id),
        }
    }

    fn for_many(&self, ids: impl Into<IdSetHandle>) -> StarbaseSet {
        StarbaseSet {
            index: Arc::clone(&self.index),
            resource: MappedResource::new(ids),
        }
    }

    fn for_all(&self) -> IteratedResource<Starbase> {
        IteratedResource::from_shared(self.index.clone())
    }
}

/// One starbase of a listing.
#[derive(Clone)]
pub struct StarbaseRef {
    index: Arc<Memoized<Starbase>>,
    resource: SingleResource,
}

impl StarbaseRef {
    /// Find the starbase in the listing.
    ///
    /// # Errors
    /// `NotFound` when the listing has no such starbase, or the first page
    /// failure before it was found.
    pub async fn get(&self) -> Result<Starbase, EsiError> {
        let id = self.resource.id().await?;
        filter_one_streamed(self.index.stream(), id, starbase_key)
            .await
            .map_err(|e| e.relabel_not_found(format!("starbase {id}")))
    }
}

/// Several starbases of a listing.
#[derive(Clone)]
pub struct StarbaseSet {
    index: Arc<Memoized<Starbase>>,
    resource: MappedResource,
}

impl StarbaseSet {
    /// Find the starbases in the listing; ids it lacks are omitted.
    ///
    /// # Errors
    /// The first page failure before every id was found.
    pub async fn get(&self) -> Result<HashMap<Id, Starbase>, EsiError> {
        self.resource.find(&*self.index, starbase_key).await
    }
}
