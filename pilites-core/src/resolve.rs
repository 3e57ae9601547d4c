//! Per-region mode resolution within a cue.
//!
//! A region in a cue is either off, tracking (continue what it rendered in
//! the previous cue), or running an explicit effect. Tracking is only
//! meaningful from the second cue on; a tracking entry stored on the first
//! cue resolves to whatever else the cue says, usually off.
//!
//! What a tracked region actually renders is decided by the controller; the
//! client only stores and round-trips the mode.

use std::fmt;

use crate::effects::{EffectKind, ParamValue};
use crate::error::{PilitesError, ValidationError};
use crate::show::{Cue, Effect, IdGenerator, Play, Region};

/// The resolved mode of one region in one cue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RegionMode<'a> {
    Off,
    Track,
    Effect(&'a Effect),
}

impl RegionMode<'_> {
    /// The selection that would reproduce this mode.
    pub fn choice(&self) -> ModeChoice {
        match self {
            Self::Off => ModeChoice::Off,
            Self::Track => ModeChoice::Track,
            Self::Effect(effect) => ModeChoice::Effect(effect.kind),
        }
    }
}

/// A mode an editor can switch a region to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeChoice {
    Off,
    Track,
    Effect(EffectKind),
}

impl ModeChoice {
    /// The choices offered for a cue at `cue_index`, in display order.
    pub fn available(cue_index: usize) -> Vec<ModeChoice> {
        let mut choices = vec![ModeChoice::Off];
        if cue_index > 0 {
            choices.push(ModeChoice::Track);
        }
        choices.extend(EffectKind::ALL.into_iter().map(ModeChoice::Effect));
        choices
    }
}

impl fmt::Display for ModeChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => f.write_str("None"),
            Self::Track => f.write_str("Track"),
            Self::Effect(kind) => f.write_str(kind.label()),
        }
    }
}

/// Resolve the mode of `region_id` in `cue`, which sits at `cue_index`.
pub fn resolve_mode<'a>(cue: &'a Cue, cue_index: usize, region_id: &str) -> RegionMode<'a> {
    if cue_index > 0 && cue.tracking_regions.contains(region_id) {
        return RegionMode::Track;
    }
    match cue.effects_by_region.get(region_id) {
        Some(effect) => RegionMode::Effect(effect),
        None => RegionMode::Off,
    }
}

/// Modes for every region of `play` in the cue at `cue_index`.
///
/// Returns `None` when the index is out of range.
pub fn cue_modes(play: &Play, cue_index: usize) -> Option<Vec<(&Region, RegionMode<'_>)>> {
    let cue = play.cues.get(cue_index)?;
    Some(
        play.regions
            .iter()
            .map(|region| (region, resolve_mode(cue, cue_index, &region.id)))
            .collect(),
    )
}

/// Switch `region_id` in `cue` to `choice`.
///
/// Switching to a different effect kind resets parameters to the new
/// kind's defaults; re-selecting the current kind keeps the existing
/// values and effect id.
pub fn set_region_mode(
    cue: &mut Cue,
    cue_index: usize,
    region_id: &str,
    choice: ModeChoice,
    ids: &mut dyn IdGenerator,
) -> Result<(), PilitesError> {
    if choice == ModeChoice::Track && cue_index == 0 {
        return Err(ValidationError::TrackOnFirstCue.into());
    }

    cue.tracking_regions.remove(region_id);
    let existing = cue.effects_by_region.remove(region_id);

    match choice {
        ModeChoice::Off => {}
        ModeChoice::Track => {
            cue.tracking_regions.insert(region_id.to_string());
        }
        ModeChoice::Effect(kind) => {
            let effect = match existing {
                Some(previous) if previous.kind == kind => previous,
                Some(previous) => Effect::with_defaults(previous.id, kind),
                None => Effect::with_defaults(ids.next_id("effect"), kind),
            };
            cue.effects_by_region.insert(region_id.to_string(), effect);
        }
    }
    Ok(())
}

/// Set one parameter on the effect assigned to `region_id`.
///
/// The value is validated against the effect kind's schema first.
pub fn set_effect_param(
    cue: &mut Cue,
    region_id: &str,
    key: &str,
    value: ParamValue,
) -> Result<(), PilitesError> {
    let effect = cue
        .effects_by_region
        .get_mut(region_id)
        .ok_or_else(|| ValidationError::NoEffect(region_id.to_string()))?;

    let def = effect
        .kind
        .schema()
        .param(key)
        .ok_or_else(|| ValidationError::UnknownParam {
            kind: effect.kind.id(),
            key: key.to_string(),
        })?;
    def.check(&value)?;

    effect.params.insert(key.to_string(), value);
    Ok(())
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::show::SequentialIds;

    fn cue_with(region: &str, kind: EffectKind) -> Cue {
        let mut cue = Cue::new("c");
        cue.effects_by_region
            .insert(region.into(), Effect::with_defaults("e-0", kind));
        cue
    }

    #[test]
    fn first_cue_never_tracks() {
        let mut cue = Cue::new("c");
        cue.tracking_regions.insert("r1".into());
        assert_eq!(resolve_mode(&cue, 0, "r1"), RegionMode::Off);
        assert_eq!(resolve_mode(&cue, 1, "r1"), RegionMode::Track);
    }

    #[test]
    fn first_cue_tracking_falls_through_to_effect() {
        let mut cue = cue_with("r1", EffectKind::Pulse);
        cue.tracking_regions.insert("r1".into());
        assert!(matches!(resolve_mode(&cue, 0, "r1"), RegionMode::Effect(e) if e.kind == EffectKind::Pulse));
    }

    #[test]
    fn setting_track_on_first_cue_is_rejected() {
        let mut cue = Cue::new("c");
        let mut ids = SequentialIds::new();
        let err = set_region_mode(&mut cue, 0, "r1", ModeChoice::Track, &mut ids).unwrap_err();
        assert!(matches!(
            err,
            PilitesError::Validation(ValidationError::TrackOnFirstCue)
        ));
        assert!(cue.tracking_regions.is_empty());
    }

    #[test]
    fn switching_kind_resets_params() {
        let mut cue = cue_with("r1", EffectKind::Chase);
        set_effect_param(&mut cue, "r1", "speed", ParamValue::Number(3.0)).unwrap();

        let mut ids = SequentialIds::new();
        set_region_mode(&mut cue, 1, "r1", ModeChoice::Effect(EffectKind::Strobe), &mut ids).unwrap();

        let effect = &cue.effects_by_region["r1"];
        assert_eq!(effect.kind, EffectKind::Strobe);
        assert_eq!(effect.id, "e-0");
        assert_eq!(effect.params, EffectKind::Strobe.default_params());
    }

    #[test]
    fn reselecting_same_kind_keeps_params() {
        let mut cue = cue_with("r1", EffectKind::Chase);
        set_effect_param(&mut cue, "r1", "speed", ParamValue::Number(3.0)).unwrap();
        let before = cue.effects_by_region["r1"].params.clone();

        let mut ids = SequentialIds::new();
        set_region_mode(&mut cue, 1, "r1", ModeChoice::Effect(EffectKind::Chase), &mut ids).unwrap();
        assert_eq!(cue.effects_by_region["r1"].params, before);
    }

    #[test]
    fn modes_are_mutually_exclusive() {
        let mut cue = cue_with("r1", EffectKind::Chase);
        let mut ids = SequentialIds::new();

        set_region_mode(&mut cue, 2, "r1", ModeChoice::Track, &mut ids).unwrap();
        assert!(cue.effects_by_region.is_empty());
        assert_eq!(resolve_mode(&cue, 2, "r1"), RegionMode::Track);

        set_region_mode(&mut cue, 2, "r1", ModeChoice::Effect(EffectKind::Twinkle), &mut ids).unwrap();
        assert!(cue.tracking_regions.is_empty());
        assert_eq!(cue.effects_by_region["r1"].id, "effect-1");

        set_region_mode(&mut cue, 2, "r1", ModeChoice::Off, &mut ids).unwrap();
        assert_eq!(resolve_mode(&cue, 2, "r1"), RegionMode::Off);
    }

    #[test]
    fn param_updates_are_validated() {
        let mut cue = cue_with("r1", EffectKind::StaticColor);
        assert!(set_effect_param(&mut cue, "r1", "intensity", ParamValue::Number(2.0)).is_err());
        assert!(set_effect_param(&mut cue, "r1", "speed", ParamValue::Number(1.0)).is_err());
        assert!(set_effect_param(&mut cue, "r2", "intensity", ParamValue::Number(0.5)).is_err());
        set_effect_param(&mut cue, "r1", "color", ParamValue::color("#00FF00")).unwrap();
        assert_eq!(
            cue.effects_by_region["r1"].params["color"],
            ParamValue::Text("#00ff00".into())
        );
    }

    #[test]
    fn available_choices_hide_track_on_first_cue() {
        assert!(!ModeChoice::available(0).contains(&ModeChoice::Track));
        assert!(ModeChoice::available(1).contains(&ModeChoice::Track));
        assert_eq!(ModeChoice::available(1).len(), EffectKind::ALL.len() + 2);
    }

    #[test]
    fn cue_modes_cover_every_region() {
        let mut play = Play::new("p", "P");
        play.regions.push(Region::new("r1", "ch"));
        play.regions.push(Region::new("r2", "ch"));
        play.cues.push(cue_with("r2", EffectKind::Rainbow));

        let modes = cue_modes(&play, 0).unwrap();
        assert_eq!(modes.len(), 2);
        assert_eq!(modes[0].1, RegionMode::Off);
        assert_eq!(modes[1].1.choice(), ModeChoice::Effect(EffectKind::Rainbow));
        assert!(cue_modes(&play, 1).is_none());
    }
}
