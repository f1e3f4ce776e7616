//! Click entity recording one resolved redirect.

use chrono::{DateTime, Duration, Local, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use uuid::Uuid;

use crate::domain::enrichment::{ClientInfo, GeoData};

/// A persisted, enriched click. Immutable after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Click {
    pub id: Uuid,
    pub link_id: Uuid,
    pub client_address: String,
    pub user_agent: String,
    pub referrer: Option<String>,
    pub geo: GeoData,
    pub client: ClientInfo,
    pub session_id: Option<String>,
    /// First click from this address on this link within its local day.
    pub is_unique: bool,
    pub clicked_at: DateTime<Utc>,
}

/// An enriched click awaiting persistence.
///
/// Uniqueness is decided by the repository at insert time.
#[derive(Debug, Clone, PartialEq)]
pub struct NewClick {
    pub link_id: Uuid,
    pub client_address: String,
    pub user_agent: String,
    pub referrer: Option<String>,
    pub geo: GeoData,
    pub client: ClientInfo,
    pub session_id: Option<String>,
    pub clicked_at: DateTime<Utc>,
}

impl NewClick {
    /// Materializes the click with its assigned id and uniqueness flag.
    pub fn into_click(self, id: Uuid, is_unique: bool) -> Click {
        Click {
            id,
            link_id: self.link_id,
            client_address: self.client_address,
            user_agent: self.user_agent,
            referrer: self.referrer,
            geo: self.geo,
            client: self.client,
            session_id: self.session_id,
            is_unique,
            clicked_at: self.clicked_at,
        }
    }
}

/// Bounds of the server-local calendar day containing `at`, as
/// `[start, end)` in UTC.
///
/// Two clicks fall on the same day exactly when both lie in one window, which
/// is how repositories decide [`Click::is_unique`].
pub fn local_day_window(at: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let day = at.with_timezone(&Local).date_naive();
    let start = local_midnight(day);
    let end = day
        .succ_opt()
        .map(local_midnight)
        .unwrap_or(start + Duration::days(1));
    (start, end)
}

/// Returns true if both instants share a server-local calendar date.
pub fn same_local_day(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    a.with_timezone(&Local).date_naive() == b.with_timezone(&Local).date_naive()
}

fn local_midnight(day: NaiveDate) -> DateTime<Utc> {
    let midnight = day.and_time(NaiveTime::MIN);
    match Local.from_local_datetime(&midnight) {
        LocalResult::Single(t) => t.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        // Midnight skipped by a DST jump; the day starts an hour later.
        LocalResult::None => Local
            .from_local_datetime(&(midnight + Duration::hours(1)))
            .earliest()
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(|| Utc.from_utc_datetime(&midnight)),
    }
}
