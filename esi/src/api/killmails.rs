use chrono::{DateTime, Utc};
use futures::StreamExt;
use serde::{Deserialize, Serialize};

use esi_core::{
    CursorDirection, CursorStreamer, EsiError, Id, IdHandle, ItemStream, RequestParams, RouteId,
    Streamer, end_on_error, split_failure,
};

use crate::Esi;
use crate::api::PinnedId;

/// A character's recent killmail links, cursor paginated.
pub const RECENT: RouteId = RouteId::new("get_characters_character_id_killmails_recent");
/// One full killmail.
pub const KILLMAIL: RouteId = RouteId::new("get_killmails_killmail_id_killmail_hash");

/// Records per full batch of the recent killmail listing.
pub const RECENT_BATCH_SIZE: usize = 1000;
/// Query parameter carrying the cursor boundary.
pub const BOUNDARY_PARAM: &str = "max_kill_id";

/// Reference to a killmail: its id plus the hash needed to fetch it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KillmailLink {
    /// Killmail id; newer killmails have larger ids.
    pub killmail_id: Id,
    /// Hash authorizing the public detail fetch.
    pub killmail_hash: String,
}

/// A full killmail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Killmail {
    /// Killmail id.
    pub killmail_id: Id,
    /// When the kill happened.
    pub killmail_time: DateTime<Utc>,
    /// Solar system of the kill.
    pub solar_system_id: Id,
    /// The destroyed ship's side.
    pub victim: Victim,
}

/// The losing side of a killmail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Victim {
    /// Pilot, absent for structures.
    #[serde(default)]
    pub character_id: Option<Id>,
    /// Owning corporation.
    #[serde(default)]
    pub corporation_id: Option<Id>,
    /// Owning alliance.
    #[serde(default)]
    pub alliance_id: Option<Id>,
    /// Type of the destroyed ship or structure.
    pub ship_type_id: Id,
    /// Total damage taken.
    pub damage_taken: i64,
}

impl Esi {
    /// Fetch the full killmail a link points to. Public; no token needed.
    ///
    /// # Errors
    /// `NotFound` for an unknown id/hash pair, or the request failure.
    pub async fn killmail(&self, link: &KillmailLink) -> Result<Killmail, EsiError> {
        let id = link.killmail_id;
        self.get(
            KILLMAIL,
            RequestParams::new()
                .with_path("killmail_id", id)
                .with_path("killmail_hash", link.killmail_hash.clone()),
        )
        .await
        .map_err(|e| e.relabel_not_found(format!("killmail {id}")))
    }
}

/// A character's recent killmails, newest first.
///
/// The listing is cursor paginated: each request after the first carries
/// the smallest killmail id seen so far as its upper bound.
#[derive(Clone)]
pub struct RecentKillmails {
    esi: Esi,
    links: CursorStreamer<KillmailLink>,
}

impl RecentKillmails {
    pub(crate) fn new(esi: Esi, character: IdHandle) -> Self {
        let character = PinnedId::new(character);
        let fetch_esi = esi.clone();
        let links = CursorStreamer::new(
            RECENT_BATCH_SIZE,
            CursorDirection::Descending,
            |link: &KillmailLink| link.killmail_id,
            move |boundary| {
                let esi = fetch_esi.clone();
                let character = character.clone();
                async move {
                    let id = character.get().await?;
                    let mut params = RequestParams::new().with_path("character_id", id);
                    if let Some(b) = boundary {
                        params = params.with_query(BOUNDARY_PARAM, b);
                    }
                    esi.get_authed::<Vec<KillmailLink>>(RECENT, params).await
                }
            },
        );
        Self { esi, links }
    }

    /// The underlying cursor streamer.
    #[must_use]
    pub const fn streamer(&self) -> &CursorStreamer<KillmailLink> {
        &self.links
    }

    /// Every link, newest first, fetched batch by batch as consumed.
    #[must_use]
    pub fn links(&self) -> ItemStream<KillmailLink> {
        self.links.stream()
    }

    /// Every full killmail, newest first.
    ///
    /// Detail fetches run ahead of the consumer, at most the configured
    /// batch concurrency at a time, but are yielded in link order. The first
    /// failure ends the sequence. A listing failure is yielded only after
    /// the details of every link listed before it.
    #[must_use]
    pub fn details(&self) -> ItemStream<Killmail> {
        let esi = self.esi.clone();
        let concurrency = esi.config().batch_concurrency.max(1);
        let (links, failure) = split_failure(self.links());
        let details = links
            .map(move |link| {
                let esi = esi.clone();
                async move { esi.killmail(&link).await }
            })
            .buffered(concurrency)
            .chain(failure.into_stream());
        end_on_error(details)
    }
}
