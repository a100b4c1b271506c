use std::collections::HashMap;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use esi_core::{
    ArrayStreamer, EsiError, Id, IdHandle, IdSetHandle, ItemStream, IteratedResource,
    MappedResource, Memoized, RequestParams, RouteId, SingleResource,
};

use crate::Esi;
use crate::api::scope::Scoped;

/// Bulk name resolution.
pub const NAMES: RouteId = RouteId::new("post_universe_names");
/// Ids of every solar system.
pub const SYSTEMS: RouteId = RouteId::new("get_universe_systems");
/// One solar system.
pub const SYSTEM: RouteId = RouteId::new("get_universe_systems_system_id");

/// Most ids the name endpoint accepts in one body.
pub const NAMES_MAX_IDS: usize = 1000;

/// What kind of entity a resolved name belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum NameCategory {
    /// Player alliance.
    Alliance,
    /// Player character.
    Character,
    /// Constellation of solar systems.
    Constellation,
    /// Player or NPC corporation.
    Corporation,
    /// Item type.
    InventoryType,
    /// Region of constellations.
    Region,
    /// Solar system.
    SolarSystem,
    /// Station.
    Station,
    /// NPC faction.
    Faction,
}

/// One record of the bulk name endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityName {
    /// Entity id.
    pub id: Id,
    /// Display name.
    pub name: String,
    /// Entity kind.
    pub category: NameCategory,
}

/// Solar system details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarSystem {
    /// System id.
    pub system_id: Id,
    /// Display name.
    pub name: String,
    /// Owning constellation.
    pub constellation_id: Id,
    /// Security rating, -1.0 to 1.0.
    pub security_status: f64,
}

type GroupFetch<V> = BoxFuture<'static, Result<Vec<V>, EsiError>>;
type OneFetch<V> = BoxFuture<'static, Result<V, EsiError>>;

fn names_fetcher(esi: Esi) -> impl Fn(Vec<Id>) -> GroupFetch<EntityName> + Send + Sync + 'static {
    move |group: Vec<Id>| {
        let esi = esi.clone();
        async move {
            esi.get::<Vec<EntityName>>(NAMES, RequestParams::new().with_body(group))
                .await
        }
        .boxed()
    }
}

fn system_fetcher(esi: Esi) -> impl Fn(Id) -> OneFetch<SolarSystem> + Send + Sync + 'static {
    move |id: Id| {
        let esi = esi.clone();
        async move {
            esi.get::<SolarSystem>(SYSTEM, RequestParams::new().with_path("system_id", id))
                .await
                .map_err(|e| e.relabel_not_found(format!("solar system {id}")))
        }
        .boxed()
    }
}

const fn name_key(n: &EntityName) -> Id {
    n.id
}

/// Universe lookups.
#[derive(Clone)]
pub struct Universe {
    esi: Esi,
}

impl Esi {
    /// Universe lookups: names and solar systems.
    #[must_use]
    pub fn universe(&self) -> Universe {
        Universe { esi: self.clone() }
    }
}

impl Universe {
    /// Resolve names for any number of ids.
    ///
    /// Ids are split into groups the endpoint accepts; unknown ids are
    /// omitted from the map.
    ///
    /// # Errors
    /// Fails as a whole if any group request fails.
    pub async fn names(
        &self,
        ids: impl IntoIterator<Item = Id>,
    ) -> Result<HashMap<Id, EntityName>, EsiError> {
        self.esi
            .batcher(NAMES_MAX_IDS)
            .fetch_map(ids, names_fetcher(self.esi.clone()), name_key)
            .await
    }

    /// Resolve names lazily, group by group, as the requests settle.
    #[must_use]
    pub fn names_stream(&self, ids: impl IntoIterator<Item = Id>) -> ItemStream<(Id, EntityName)> {
        self.esi
            .batcher(NAMES_MAX_IDS)
            .fetch_stream(ids, names_fetcher(self.esi.clone()), name_key)
    }

    /// Solar systems. The id index behind [`Scoped::for_all`] is fetched
    /// once per returned value and shared by its consumers.
    #[must_use]
    pub fn systems(&self) -> Systems {
        let esi = self.esi.clone();
        let ids = ArrayStreamer::new(move || {
            let esi = esi.clone();
            async move { esi.get::<Vec<Id>>(SYSTEMS, RequestParams::new()).await }
        });
        Systems {
            esi: self.esi.clone(),
            index: Arc::new(Memoized::new(ids)),
        }
    }
}

/// Solar systems, readable for one, many, or all ids.
#[derive(Clone)]
pub struct Systems {
    esi: Esi,
    index: Arc<Memoized<Id>>,
}

impl Scoped for Systems {
    type One = System;
    type Many = SystemSet;
    type All = AllSystems;

    fn for_one(&self, id: impl Into<IdHandle>) -> System {
        System {
            esi: self.esi.clone(),
            resource: SingleResource::new(id),
        }
    }

    fn for_many(&self, ids: impl Into<IdSetHandle>) -> SystemSet {
        SystemSet {
            esi: self.esi.clone(),
            resource: MappedResource::new(ids),
        }
    }

    fn for_all(&self) -> AllSystems {
        AllSystems {
            esi: self.esi.clone(),
            resource: IteratedResource::from_shared(self.index.clone()),
        }
    }
}

/// One solar system.
#[derive(Clone)]
pub struct System {
    esi: Esi,
    resource: SingleResource,
}

impl System {
    /// Fetch the system's details.
    ///
    /// # Errors
    /// `NotFound` for an unknown system, or the request failure.
    pub async fn get(&self) -> Result<SolarSystem, EsiError> {
        self.resource.fetch(system_fetcher(self.esi.clone())).await
    }
}

/// A set of solar systems.
#[derive(Clone)]
pub struct SystemSet {
    esi: Esi,
    resource: MappedResource,
}

impl SystemSet {
    /// Fetch every system's details, one request per id.
    ///
    /// # Errors
    /// The first failure other than an unknown id.
    pub async fn get(&self) -> Result<HashMap<Id, SolarSystem>, EsiError> {
        self.resource
            .fetch_each(
                self.esi.config().batch_concurrency,
                system_fetcher(self.esi.clone()),
            )
            .await
    }

    /// Resolve every system's name through the bulk name endpoint.
    ///
    /// # Errors
    /// Fails as a whole if any group request fails.
    pub async fn names(&self) -> Result<HashMap<Id, EntityName>, EsiError> {
        let batcher = self.esi.batcher(NAMES_MAX_IDS);
        self.resource
            .batch(&batcher, names_fetcher(self.esi.clone()), name_key)
            .await
    }
}

/// Every solar system.
#[derive(Clone)]
pub struct AllSystems {
    esi: Esi,
    resource: IteratedResource<Id>,
}

impl AllSystems {
    /// Every system id.
    #[must_use]
    pub fn ids(&self) -> ItemStream<Id> {
        self.resource.stream()
    }

    /// Every system's name, grouped into bulk requests as ids arrive.
    #[must_use]
    pub fn names(&self) -> ItemStream<(Id, EntityName)> {
        let batcher = self.esi.batcher(NAMES_MAX_IDS);
        self.resource
            .batch_details(&batcher, |id| *id, names_fetcher(self.esi.clone()), name_key)
    }

    /// Every system's details, one request per id.
    #[must_use]
    pub fn details(&self) -> ItemStream<(Id, SolarSystem)> {
        self.resource.each(
            self.esi.config().batch_concurrency,
            |id| *id,
            system_fetcher(self.esi.clone()),
        )
    }
}
