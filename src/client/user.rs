//! User record

use crate::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::mysql::MySqlRow;
use sqlx::Row;
use std::fmt;

/// A timestamp column, decoded natively or kept as server text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Timestamp {
    /// Decoded into UTC
    Parsed(DateTime<Utc>),
    /// Text exactly as the server rendered it
    Raw(String),
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parsed(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S %z UTC")),
            Self::Raw(text) => f.write_str(text),
        }
    }
}

/// Row of the `user` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// Server-generated UUID
    pub id: String,
    /// Insertion time (`cat`)
    pub created_at: Timestamp,
    /// Last update time (`uat`)
    pub updated_at: Timestamp,
    /// User name
    pub name: String,
}

impl User {
    /// Decode a row selected with `id, cat, uat, name`.
    ///
    /// With `parse_time` the timestamp columns must be native `TIMESTAMP`s; without
    /// it they must have been cast to text by the query.
    pub(crate) fn from_row(row: &MySqlRow, parse_time: bool) -> Result<Self> {
        let timestamp = |column: &str| -> Result<Timestamp> {
            if parse_time {
                Ok(Timestamp::Parsed(row.try_get::<DateTime<Utc>, _>(column)?))
            } else {
                Ok(Timestamp::Raw(row.try_get::<String, _>(column)?))
            }
        };

        Ok(Self {
            id: row.try_get("id")?,
            created_at: timestamp("cat")?,
            updated_at: timestamp("uat")?,
            name: row.try_get("name")?,
        })
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{id:{} createdAt:{} updatedAt:{} name:{}}}",
            self.id, self.created_at, self.updated_at, self.name
        )
    }
}
