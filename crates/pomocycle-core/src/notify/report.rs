//! Per-channel outcome of a notification dispatch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::events::CompletionKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Sound,
    Desktop,
    Toast,
}

impl Channel {
    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Sound => "sound",
            Channel::Desktop => "desktop",
            Channel::Toast => "toast",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ChannelStatus {
    Delivered,
    /// Channel disabled or not permitted
    Skipped { reason: String },
    /// Backend reported an error; swallowed
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelResult {
    pub channel: Channel,
    #[serde(flatten)]
    pub status: ChannelStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchReport {
    pub kind: CompletionKind,
    pub dispatched_at: DateTime<Utc>,
    pub results: Vec<ChannelResult>,
}

impl DispatchReport {
    pub fn new(kind: CompletionKind, results: Vec<ChannelResult>) -> Self {
        Self {
            kind,
            dispatched_at: Utc::now(),
            results,
        }
    }

    pub fn status(&self, channel: Channel) -> Option<&ChannelStatus> {
        self.results
            .iter()
            .find(|r| r.channel == channel)
            .map(|r| &r.status)
    }

    pub fn delivered_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.status, ChannelStatus::Delivered))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.status, ChannelStatus::Failed { .. }))
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.status, ChannelStatus::Skipped { .. }))
            .count()
    }
}
