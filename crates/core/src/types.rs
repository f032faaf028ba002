//! Shared primitive type aliases.

use chrono::{DateTime, Utc};

/// Internal database identifier (Postgres `BIGSERIAL`).
pub type DbId = i64;

/// UTC timestamp as stored in `TIMESTAMPTZ` columns.
pub type Timestamp = DateTime<Utc>;
