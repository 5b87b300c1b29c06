//! Custom actions for the Order actor.

use crate::model::OrderStatus;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub enum OrderAction {
    /// Applies every delivery transition due at `now`.
    Advance { now: DateTime<Utc> },
}

/// Results from OrderActions - variants match 1:1 with OrderAction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderActionResult {
    /// Statuses appended to the timeline, oldest first. Empty when nothing was due.
    Advance(Vec<OrderStatus>),
}
