//! Plays: the owner of regions and the ordered cue list.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{Channel, Cue, Region};

/// A complete show: regions plus a strictly ordered cue list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Play {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub regions: Vec<Region>,
    #[serde(default)]
    pub cues: Vec<Cue>,
}

/// Id and name only, as returned by the play listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaySummary {
    pub id: String,
    pub name: String,
}

/// Two regions with effects in the same cue whose ranges overlap on one
/// channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlapConflict {
    pub cue_id: String,
    pub cue_name: String,
    pub channel_id: String,
    pub first_region: String,
    pub second_region: String,
}

impl Play {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            regions: Vec::new(),
            cues: Vec::new(),
        }
    }

    pub fn summary(&self) -> PlaySummary {
        PlaySummary {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }

    // ── Regions ──────────────────────────────────────────────────

    pub fn region(&self, id: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == id)
    }

    pub fn region_index(&self, id: &str) -> Option<usize> {
        self.regions.iter().position(|r| r.id == id)
    }

    /// Regions on `channel_id`, in play order.
    pub fn regions_on<'a>(&'a self, channel_id: &str) -> impl Iterator<Item = &'a Region> {
        self.regions.iter().filter(move |r| r.channel_id == channel_id)
    }

    /// Replace the region with the same id, or append it.
    pub fn upsert_region(&mut self, region: Region) {
        match self.regions.iter_mut().find(|r| r.id == region.id) {
            Some(existing) => *existing = region,
            None => self.regions.push(region),
        }
    }

    /// Remove a region and strip every cue's reference to it.
    pub fn delete_region(&mut self, id: &str) -> Option<Region> {
        let index = self.region_index(id)?;
        let removed = self.regions.remove(index);
        for cue in &mut self.cues {
            cue.forget_region(id);
        }
        Some(removed)
    }

    // ── Cues ─────────────────────────────────────────────────────

    pub fn cue(&self, id: &str) -> Option<&Cue> {
        self.cues.iter().find(|c| c.id == id)
    }

    pub fn cue_index(&self, id: &str) -> Option<usize> {
        self.cues.iter().position(|c| c.id == id)
    }

    /// Replace the cue with the same id in place, or append it.
    pub fn upsert_cue(&mut self, cue: Cue) {
        match self.cues.iter_mut().find(|c| c.id == cue.id) {
            Some(existing) => *existing = cue,
            None => self.cues.push(cue),
        }
    }

    pub fn delete_cue(&mut self, id: &str) -> Option<Cue> {
        let index = self.cue_index(id)?;
        Some(self.cues.remove(index))
    }

    /// Swap the cue at `index` with its predecessor.
    pub fn move_cue_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.cues.len() {
            return false;
        }
        self.cues.swap(index - 1, index);
        true
    }

    /// Swap the cue at `index` with its successor.
    pub fn move_cue_down(&mut self, index: usize) -> bool {
        if index + 1 >= self.cues.len() {
            return false;
        }
        self.cues.swap(index, index + 1);
        true
    }

    // ── Diagnostics ──────────────────────────────────────────────

    /// Regions whose channel is not in `channels`.
    pub fn unknown_channel_refs<'a>(&'a self, channels: &[Channel]) -> Vec<&'a Region> {
        self.regions
            .iter()
            .filter(|r| !channels.iter().any(|c| c.id == r.channel_id))
            .collect()
    }

    /// Per-cue overlaps between regions that both carry an explicit effect.
    pub fn overlap_conflicts(&self) -> Vec<OverlapConflict> {
        let by_id: HashMap<&str, &Region> =
            self.regions.iter().map(|r| (r.id.as_str(), r)).collect();

        let mut conflicts = Vec::new();
        for cue in &self.cues {
            let assigned: Vec<&Region> = cue
                .effects_by_region
                .keys()
                .filter_map(|id| by_id.get(id.as_str()).copied())
                .collect();

            for (i, a) in assigned.iter().enumerate() {
                for b in &assigned[i + 1..] {
                    if a.channel_id != b.channel_id {
                        continue;
                    }
                    let clash = a
                        .ranges
                        .iter()
                        .any(|ra| b.ranges.iter().any(|rb| ra.overlaps(rb)));
                    if clash {
                        conflicts.push(OverlapConflict {
                            cue_id: cue.id.clone(),
                            cue_name: cue.name.clone(),
                            channel_id: a.channel_id.clone(),
                            first_region: a.id.clone(),
                            second_region: b.id.clone(),
                        });
                    }
                }
            }
        }
        conflicts
    }
}
