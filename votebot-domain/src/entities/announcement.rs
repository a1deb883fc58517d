// Announcement entity
// Fully composed monthly results, ready to be rendered and posted

use serde::Serialize;

use crate::entities::{RankedPlayer, RewardTier};
use crate::value_objects::{Period, Resolution};

#[derive(Debug, Clone, Serialize)]
pub struct WinnerEntry {
    pub rank: u32,
    pub player: RankedPlayer,
    pub resolution: Resolution,
    pub reward: RewardTier,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParticipantEntry {
    pub rank: u32,
    pub player: RankedPlayer,
    pub resolution: Resolution,
    pub diamonds: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Announcement {
    /// Gate period: the month in which the announcement is posted.
    pub period: Period,
    /// Month whose votes are being rewarded.
    pub results_period: Period,
    pub results_label: String,
    pub winners: Vec<WinnerEntry>,
    pub participants: Vec<ParticipantEntry>,
    pub mention_everyone: bool,
    pub chunks: Vec<String>,
}

impl Announcement {
    pub fn linked_count(&self) -> usize {
        self.resolutions().filter(|res| res.is_linked()).count()
    }

    pub fn unresolved_count(&self) -> usize {
        self.resolutions().filter(|res| !res.is_linked()).count()
    }

    fn resolutions(&self) -> impl Iterator<Item = &Resolution> {
        self.winners
            .iter()
            .map(|entry| &entry.resolution)
            .chain(self.participants.iter().map(|entry| &entry.resolution))
    }
}
