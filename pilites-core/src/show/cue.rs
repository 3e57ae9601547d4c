//! Cues and the effects they assign.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::effects::{EffectKind, Params};

/// A parameterised lighting pattern owned by one (cue, region) pairing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: EffectKind,
    #[serde(default)]
    pub params: Params,
}

impl Effect {
    /// A new effect carrying the kind's default parameters.
    pub fn with_defaults(id: impl Into<String>, kind: EffectKind) -> Self {
        Self {
            id: id.into(),
            kind,
            params: kind.default_params(),
        }
    }
}

/// One step in a play's timeline.
///
/// A region absent from both maps is off for this cue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cue {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub effects_by_region: BTreeMap<String, Effect>,
    /// Regions continuing whatever they rendered in the previous cue.
    #[serde(default)]
    pub tracking_regions: BTreeSet<String>,
}

impl Cue {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            effects_by_region: BTreeMap::new(),
            tracking_regions: BTreeSet::new(),
        }
    }

    /// Drop every reference this cue holds to `region_id`.
    ///
    /// Returns `true` when something was removed.
    pub fn forget_region(&mut self, region_id: &str) -> bool {
        let had_effect = self.effects_by_region.remove(region_id).is_some();
        let was_tracking = self.tracking_regions.remove(region_id);
        had_effect || was_tracking
    }

    pub fn references(&self, region_id: &str) -> bool {
        self.effects_by_region.contains_key(region_id) || self.tracking_regions.contains(region_id)
    }
}
