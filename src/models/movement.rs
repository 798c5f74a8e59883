use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum MovementKind {
    Inbound,
    Outbound,
}

impl MovementKind {
    /// The change this movement applies to a product's on-hand quantity.
    pub fn signed(self, quantity: i64) -> i64 {
        match self {
            MovementKind::Inbound => quantity,
            MovementKind::Outbound => -quantity,
        }
    }
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MovementKind::Inbound => f.write_str("inbound"),
            MovementKind::Outbound => f.write_str("outbound"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Movement {
    pub id: i64,
    #[sqlx(rename = "fecha")]
    pub date: NaiveDate,
    #[sqlx(rename = "hora")]
    pub time: NaiveTime,
    pub quantity: i64,
    pub kind: MovementKind,
    pub product_id: i64,
}

impl Movement {
    pub fn timestamp(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }
}

/// Request body for both `/movements/inbound` and `/movements/outbound`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordMovement {
    pub product_id: i64,
    pub quantity: i64,
}
