//! In-memory play editing.
//!
//! A [`PlayEditor`] owns one [`Play`] for the lifetime of an editing view.
//! Regions and cues are edited through drafts: selecting an entity takes a
//! deep copy, edits touch only the copy, and applying validates it and
//! writes it back into the play. Nothing reaches the controller until
//! [`PlayEditor::save`].

use tracing::{info, warn};

use crate::effects::ParamValue;
use crate::error::{PilitesError, ValidationError};
use crate::resolve::{self, ModeChoice, RegionMode};
use crate::rpc::{HttpTransport, RpcGateway};
use crate::segment::{Segment, segment_channel};
use crate::show::{Channel, Cue, IdGenerator, PixelRange, Play, Region};

/// A working copy of a region or cue.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft<T> {
    pub value: T,
    /// Not yet part of the play.
    pub is_new: bool,
}

pub struct PlayEditor {
    play: Play,
    channels: Vec<Channel>,
    ids: Box<dyn IdGenerator>,
    dirty: bool,
    region_draft: Option<Draft<Region>>,
    cue_draft: Option<Draft<Cue>>,
}

impl PlayEditor {
    pub fn new(play: Play, channels: Vec<Channel>, ids: impl IdGenerator + 'static) -> Self {
        Self {
            play,
            channels,
            ids: Box::new(ids),
            dirty: false,
            region_draft: None,
            cue_draft: None,
        }
    }

    pub fn play(&self) -> &Play {
        &self.play
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Whether the play has changes the controller has not seen.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn region_draft(&self) -> Option<&Draft<Region>> {
        self.region_draft.as_ref()
    }

    pub fn cue_draft(&self) -> Option<&Draft<Cue>> {
        self.cue_draft.as_ref()
    }

    pub fn into_play(self) -> Play {
        self.play
    }

    // ── Region drafts ────────────────────────────────────────────

    /// Open a draft for a new region on the first channel.
    pub fn new_region(&mut self) -> &Region {
        let mut region = Region::new(
            self.ids.next_id("region"),
            self.channels.first().map(|c| c.id.as_str()).unwrap_or_default(),
        );
        region.ui_color = Some(Region::palette_color(self.play.regions.len()).to_string());
        &self
            .region_draft
            .insert(Draft {
                value: region,
                is_new: true,
            })
            .value
    }

    pub fn select_region(&mut self, region_id: &str) -> Result<&Region, PilitesError> {
        let region = self
            .play
            .region(region_id)
            .ok_or_else(|| ValidationError::UnknownRegion(region_id.to_string()))?
            .clone();
        Ok(&self
            .region_draft
            .insert(Draft {
                value: region,
                is_new: false,
            })
            .value)
    }

    /// Edit the region draft in place (name, channel, color).
    pub fn update_region_draft(&mut self, edit: impl FnOnce(&mut Region)) -> Result<(), PilitesError> {
        edit(self.region_mut()?);
        Ok(())
    }

    /// Append a default range; returns its index.
    pub fn add_range(&mut self) -> Result<usize, PilitesError> {
        let region = self.region_mut()?;
        region.ranges.push(PixelRange::DEFAULT);
        Ok(region.ranges.len() - 1)
    }

    /// Replace one range. Bounds are checked when the draft is applied.
    pub fn set_range(&mut self, index: usize, range: PixelRange) -> Result<(), PilitesError> {
        let slot = self
            .region_mut()?
            .ranges
            .get_mut(index)
            .ok_or(ValidationError::NoSuchRange(index))?;
        *slot = range;
        Ok(())
    }

    pub fn remove_range(&mut self, index: usize) -> Result<PixelRange, PilitesError> {
        let region = self.region_mut()?;
        if index >= region.ranges.len() {
            return Err(ValidationError::NoSuchRange(index).into());
        }
        if region.ranges.len() == 1 {
            return Err(ValidationError::LastRange.into());
        }
        Ok(region.ranges.remove(index))
    }

    /// Validate the draft and write it into the play.
    pub fn apply_region_draft(&mut self) -> Result<&Region, PilitesError> {
        let draft = self.region_draft.as_mut().ok_or(ValidationError::NoDraft)?;
        draft.value.validate()?;

        self.play.upsert_region(draft.value.clone());
        let added = std::mem::replace(&mut draft.is_new, false);
        self.dirty = true;
        info!(
            region = %draft.value.id,
            name = %draft.value.name,
            "region {}",
            if added { "added" } else { "updated" }
        );
        Ok(&draft.value)
    }

    /// Delete the selected region and every cue's reference to it.
    pub fn delete_region(&mut self) -> Result<Region, PilitesError> {
        let draft = self.region_draft.as_ref().ok_or(ValidationError::NoDraft)?;
        if draft.is_new {
            return Err(ValidationError::DraftNotCommitted.into());
        }
        let id = draft.value.id.clone();
        let removed = self
            .play
            .delete_region(&id)
            .ok_or_else(|| ValidationError::UnknownRegion(id.clone()))?;

        if let Some(cue) = self.cue_draft.as_mut() {
            cue.value.forget_region(&id);
        }
        self.region_draft = None;
        self.dirty = true;
        info!(region = %id, "region deleted");
        Ok(removed)
    }

    pub fn cancel_region_draft(&mut self) {
        self.region_draft = None;
    }

    /// Regions to draw on `channel_id`, with the draft standing in for its
    /// committed version (or appended when new or moved to this channel).
    pub fn display_regions(&self, channel_id: &str) -> Vec<&Region> {
        let draft = self.region_draft.as_ref().map(|d| &d.value);
        let draft_id = draft.map(|r| r.id.as_str());

        let mut regions: Vec<&Region> = Vec::new();
        let mut placed = false;
        for region in self.play.regions_on(channel_id) {
            if Some(region.id.as_str()) == draft_id {
                if let Some(d) = draft.filter(|d| d.channel_id == channel_id) {
                    regions.push(d);
                    placed = true;
                }
            } else {
                regions.push(region);
            }
        }
        if let Some(d) = draft.filter(|d| !placed && d.channel_id == channel_id) {
            regions.push(d);
        }
        regions
    }

    /// Segmentation of [`display_regions`](Self::display_regions).
    ///
    /// Returns `None` for an unknown channel.
    pub fn channel_layout(&self, channel_id: &str) -> Option<Vec<Segment<'_>>> {
        let channel = self.channels.iter().find(|c| c.id == channel_id)?;
        Some(segment_channel(
            channel.led_count,
            self.display_regions(channel_id),
        ))
    }

    /// Light the selected, committed region on the hardware.
    pub async fn test_selected_region<T: HttpTransport>(
        &self,
        gateway: &RpcGateway<T>,
    ) -> Result<(), PilitesError> {
        let draft = self.region_draft.as_ref().ok_or(ValidationError::NoDraft)?;
        if draft.is_new {
            return Err(ValidationError::DraftNotCommitted.into());
        }
        gateway.test_region(&self.play.id, &draft.value.id).await
    }

    fn region_mut(&mut self) -> Result<&mut Region, PilitesError> {
        self.region_draft
            .as_mut()
            .map(|d| &mut d.value)
            .ok_or_else(|| ValidationError::NoDraft.into())
    }

    // ── Cue drafts ───────────────────────────────────────────────

    /// Open a draft for a new cue appended at the end.
    ///
    /// Every region tracks by default, except on the first cue.
    pub fn new_cue(&mut self) -> &Cue {
        let mut cue = Cue::new(self.ids.next_id("cue"));
        if !self.play.cues.is_empty() {
            cue.tracking_regions = self.play.regions.iter().map(|r| r.id.clone()).collect();
        }
        &self
            .cue_draft
            .insert(Draft {
                value: cue,
                is_new: true,
            })
            .value
    }

    pub fn select_cue(&mut self, cue_id: &str) -> Result<&Cue, PilitesError> {
        let cue = self
            .play
            .cue(cue_id)
            .ok_or_else(|| ValidationError::UnknownCue(cue_id.to_string()))?
            .clone();
        Ok(&self
            .cue_draft
            .insert(Draft {
                value: cue,
                is_new: false,
            })
            .value)
    }

    pub fn rename_cue(&mut self, name: impl Into<String>) -> Result<(), PilitesError> {
        self.cue_mut()?.name = name.into();
        Ok(())
    }

    /// Position the cue draft occupies or will occupy in the play.
    pub fn draft_cue_index(&self) -> Option<usize> {
        let draft = self.cue_draft.as_ref()?;
        if draft.is_new {
            Some(self.play.cues.len())
        } else {
            self.play.cue_index(&draft.value.id)
        }
    }

    /// Resolved mode of every region in the cue draft.
    pub fn draft_modes(&self) -> Option<Vec<(&Region, RegionMode<'_>)>> {
        let cue = &self.cue_draft.as_ref()?.value;
        let index = self.draft_cue_index()?;
        Some(
            self.play
                .regions
                .iter()
                .map(|region| (region, resolve::resolve_mode(cue, index, &region.id)))
                .collect(),
        )
    }

    pub fn set_region_mode(&mut self, region_id: &str, choice: ModeChoice) -> Result<(), PilitesError> {
        if self.play.region(region_id).is_none() {
            return Err(ValidationError::UnknownRegion(region_id.to_string()).into());
        }
        let index = self.draft_cue_index().ok_or(ValidationError::NoDraft)?;
        let draft = self.cue_draft.as_mut().ok_or(ValidationError::NoDraft)?;
        resolve::set_region_mode(&mut draft.value, index, region_id, choice, self.ids.as_mut())
    }

    pub fn set_param(
        &mut self,
        region_id: &str,
        key: &str,
        value: ParamValue,
    ) -> Result<(), PilitesError> {
        resolve::set_effect_param(self.cue_mut()?, region_id, key, value)
    }

    /// Validate the cue draft and write it into the play.
    pub fn apply_cue_draft(&mut self) -> Result<&Cue, PilitesError> {
        let draft = self.cue_draft.as_mut().ok_or(ValidationError::NoDraft)?;
        if draft.value.name.trim().is_empty() {
            return Err(ValidationError::MissingName.into());
        }
        for effect in draft.value.effects_by_region.values() {
            effect.kind.validate(&effect.params)?;
        }

        self.play.upsert_cue(draft.value.clone());
        let added = std::mem::replace(&mut draft.is_new, false);
        self.dirty = true;
        info!(
            cue = %draft.value.id,
            name = %draft.value.name,
            "cue {}",
            if added { "added" } else { "updated" }
        );
        Ok(&draft.value)
    }

    pub fn delete_cue(&mut self) -> Result<Cue, PilitesError> {
        let draft = self.cue_draft.as_ref().ok_or(ValidationError::NoDraft)?;
        if draft.is_new {
            return Err(ValidationError::DraftNotCommitted.into());
        }
        let id = draft.value.id.clone();
        let removed = self
            .play
            .delete_cue(&id)
            .ok_or_else(|| ValidationError::UnknownCue(id.clone()))?;
        self.cue_draft = None;
        self.dirty = true;
        info!(cue = %id, "cue deleted");
        Ok(removed)
    }

    pub fn move_cue_up(&mut self, index: usize) -> bool {
        let moved = self.play.move_cue_up(index);
        self.dirty |= moved;
        moved
    }

    pub fn move_cue_down(&mut self, index: usize) -> bool {
        let moved = self.play.move_cue_down(index);
        self.dirty |= moved;
        moved
    }

    pub fn cancel_cue_draft(&mut self) {
        self.cue_draft = None;
    }

    fn cue_mut(&mut self) -> Result<&mut Cue, PilitesError> {
        self.cue_draft
            .as_mut()
            .map(|d| &mut d.value)
            .ok_or_else(|| ValidationError::NoDraft.into())
    }

    // ── Save ─────────────────────────────────────────────────────

    /// Send the whole play to the controller.
    ///
    /// Overlapping effect regions and dangling channel references are
    /// logged but do not block the save. The dirty flag is cleared only
    /// when the controller accepts the play.
    pub async fn save<T: HttpTransport>(&mut self, gateway: &RpcGateway<T>) -> Result<(), PilitesError> {
        for region in self.play.unknown_channel_refs(&self.channels) {
            warn!(
                region = %region.id,
                channel = %region.channel_id,
                "region references an unknown channel"
            );
        }
        for conflict in self.play.overlap_conflicts() {
            warn!(
                cue = %conflict.cue_name,
                channel = %conflict.channel_id,
                "regions {} and {} overlap",
                conflict.first_region,
                conflict.second_region
            );
        }

        gateway.update_play(&self.play).await?;
        self.dirty = false;
        info!(play = %self.play.id, "play saved");
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────
