//! Shared test utilities for gc-db tests.

pub(crate) mod helpers {
    use chrono::{NaiveDate, NaiveDateTime};

    use crate::service::GravService;

    /// Create an in-memory service for pure DB tests.
    pub async fn test_service() -> GravService {
        GravService::open_local(":memory:").await.unwrap()
    }

    /// Shorthand timestamp constructor for fixtures.
    pub fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }
}
