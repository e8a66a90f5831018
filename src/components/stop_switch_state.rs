use std::time::Duration;

use crate::error::{ConfigError, ConfigResult};
use crate::motion::settle_after;
use crate::style::SwipeDirection;
use crate::theme::ColorValue;
use crate::tokens::MOTION_DURATIONS;

use super::control;

pub const DEFAULT_STOP_COUNT: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LaneRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    pub radius: f32,
}

/// Stop positions and part geometry derived from the switch bounds.
#[derive(Clone, Debug, PartialEq)]
pub struct StopTrack {
    pub width: f32,
    pub height: f32,
    pub thumb_diameter: f32,
    pub thumb_top: f32,
    pub lane: LaneRect,
    positions: Vec<f32>,
}

impl StopTrack {
    pub fn from_bounds(width: f32, height: f32, stop_count: usize) -> ConfigResult<Self> {
        if stop_count < 2 {
            return Err(ConfigError::TooFewStops { count: stop_count });
        }
        let thumb_diameter = height / 2.0;
        let valid = width.is_finite()
            && height.is_finite()
            && width > 0.0
            && height > 0.0
            && width > thumb_diameter;
        if !valid {
            return Err(ConfigError::InvalidBounds { width, height });
        }

        Ok(Self::compute(width, height, stop_count))
    }

    fn compute(width: f32, height: f32, stop_count: usize) -> Self {
        let thumb_diameter = height / 2.0;
        let travel = width - thumb_diameter;
        let step = travel / stop_count.saturating_sub(1).max(1) as f32;
        let positions = (0..stop_count).map(|index| index as f32 * step).collect();
        let thumb_top = height / 4.0;

        Self {
            width,
            height,
            thumb_diameter,
            thumb_top,
            lane: LaneRect {
                left: thumb_diameter / 2.0,
                top: thumb_top + thumb_diameter / 4.0,
                width: travel,
                height: thumb_diameter / 2.0,
                radius: thumb_diameter / 4.0,
            },
            positions,
        }
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn stop_count(&self) -> usize {
        self.positions.len()
    }

    pub fn position(&self, index: usize) -> f32 {
        let last = self.positions.len().saturating_sub(1);
        self.positions.get(index.min(last)).copied().unwrap_or(0.0)
    }

    /// Thumb x while travelling from `from` to `to`, `progress` in `0..=1`.
    pub fn thumb_left_between(&self, from: usize, to: usize, progress: f32) -> f32 {
        let start = self.position(from);
        let end = self.position(to);
        start + (end - start) * progress.clamp(0.0, 1.0)
    }
}

/// Accent color for every stop, checked against the stop count up front.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StopPalette {
    colors: Vec<ColorValue>,
}

impl StopPalette {
    pub fn validated(colors: Vec<ColorValue>, stop_count: usize) -> ConfigResult<Self> {
        if colors.len() != stop_count {
            return Err(ConfigError::StopColorMismatch {
                stops: stop_count,
                colors: colors.len(),
            });
        }
        Ok(Self { colors })
    }

    /// Builds a palette from theme accents, cycling when there are fewer
    /// accents than stops.
    pub fn cyclic(accents: &[ColorValue], stop_count: usize) -> Self {
        let colors = if accents.is_empty() {
            vec![ColorValue::Black; stop_count]
        } else {
            accents.iter().cycle().take(stop_count).cloned().collect()
        };
        Self { colors }
    }

    pub fn accent(&self, index: usize) -> Option<&ColorValue> {
        self.colors.get(index)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StopTransition {
    pub from: usize,
    pub to: usize,
    pub generation: u64,
}

/// Position state of a stop switch. The index only moves through
/// [`StopSwitchMachine::swipe`] followed by [`StopSwitchMachine::complete`],
/// and a pending transition blocks further swipes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StopSwitchMachine {
    stop_count: usize,
    current_index: usize,
    pending: Option<StopTransition>,
    generation: u64,
    completed_generation: u64,
}

impl StopSwitchMachine {
    pub fn new(stop_count: usize) -> Self {
        Self::with_initial_index(stop_count, 0)
    }

    pub fn with_initial_index(stop_count: usize, index: usize) -> Self {
        let stop_count = stop_count.max(1);
        Self {
            stop_count,
            current_index: index.min(stop_count - 1),
            pending: None,
            generation: 0,
            completed_generation: 0,
        }
    }

    pub fn stop_count(&self) -> usize {
        self.stop_count
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<StopTransition> {
        self.pending
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Generation of the most recent committed transition, 0 before any.
    pub fn completed_generation(&self) -> u64 {
        self.completed_generation
    }

    pub fn swipe(&mut self, direction: SwipeDirection) -> Option<StopTransition> {
        if let Some(pending) = self.pending {
            log::trace!(
                "stop switch busy ({} -> {}), dropping {direction:?} swipe",
                pending.from,
                pending.to
            );
            return None;
        }

        let target = match direction {
            SwipeDirection::Left => self.current_index.checked_sub(1),
            SwipeDirection::Right => {
                Some(self.current_index + 1).filter(|next| *next < self.stop_count)
            }
        };
        let Some(target) = target else {
            log::trace!(
                "stop switch at edge {}, ignoring {direction:?} swipe",
                self.current_index
            );
            return None;
        };

        self.generation += 1;
        let transition = StopTransition {
            from: self.current_index,
            to: target,
            generation: self.generation,
        };
        self.pending = Some(transition);
        log::debug!(
            "stop switch transition #{} started: {} -> {}",
            transition.generation,
            transition.from,
            transition.to
        );
        Some(transition)
    }

    pub fn swipe_left(&mut self) -> Option<StopTransition> {
        self.swipe(SwipeDirection::Left)
    }

    pub fn swipe_right(&mut self) -> Option<StopTransition> {
        self.swipe(SwipeDirection::Right)
    }

    /// Commits the pending transition tagged `generation` and re-enables
    /// input. Stale generations commit nothing.
    pub fn complete(&mut self, generation: u64) -> Option<usize> {
        let pending = self.pending.filter(|pending| pending.generation == generation)?;
        self.pending = None;
        self.current_index = pending.to;
        self.completed_generation = generation;
        log::debug!(
            "stop switch transition #{generation} completed at index {}",
            self.current_index
        );
        Some(self.current_index)
    }
}

/// Plain display configuration of a stop switch. Setters recompute the
/// derived track geometry and keep the previous state when a value is
/// rejected.
#[derive(Clone, Debug, PartialEq)]
pub struct StopSwitchConfig {
    stop_count: usize,
    track_width: f32,
    track_height: f32,
    stop_colors: Option<StopPalette>,
    pub corner_radius: f32,
    pub thumb_color: Option<ColorValue>,
    pub lane_color: Option<ColorValue>,
    pub ripple_color: Option<ColorValue>,
    pub background_color: Option<ColorValue>,
    pub travel_duration_ms: u16,
    pub ripple_duration_ms: u16,
    pub ripple_scale: f32,
    pub swipe_threshold_px: f32,
    track: StopTrack,
}

impl Default for StopSwitchConfig {
    fn default() -> Self {
        let track_width = 120.0;
        let track_height = 40.0;
        Self {
            stop_count: DEFAULT_STOP_COUNT,
            track_width,
            track_height,
            stop_colors: None,
            corner_radius: 2.5,
            thumb_color: None,
            lane_color: None,
            ripple_color: None,
            background_color: None,
            travel_duration_ms: MOTION_DURATIONS.travel_ms,
            ripple_duration_ms: MOTION_DURATIONS.ripple_ms,
            ripple_scale: 2.0,
            swipe_threshold_px: 24.0,
            track: StopTrack::compute(track_width, track_height, DEFAULT_STOP_COUNT),
        }
    }
}

impl StopSwitchConfig {
    pub fn new(stop_count: usize) -> ConfigResult<Self> {
        let mut config = Self::default();
        config.set_stop_count(stop_count)?;
        Ok(config)
    }

    pub fn stop_count(&self) -> usize {
        self.stop_count
    }

    pub fn track(&self) -> &StopTrack {
        &self.track
    }

    pub fn bounds(&self) -> (f32, f32) {
        (self.track_width, self.track_height)
    }

    pub fn stop_colors(&self) -> Option<&StopPalette> {
        self.stop_colors.as_ref()
    }

    pub fn set_stop_count(&mut self, stop_count: usize) -> ConfigResult<()> {
        if let Some(colors) = &self.stop_colors
            && colors.len() != stop_count
        {
            return Err(ConfigError::StopColorMismatch {
                stops: stop_count,
                colors: colors.len(),
            });
        }
        self.track = StopTrack::from_bounds(self.track_width, self.track_height, stop_count)?;
        self.stop_count = stop_count;
        Ok(())
    }

    pub fn set_bounds(&mut self, width: f32, height: f32) -> ConfigResult<()> {
        self.track = StopTrack::from_bounds(width, height, self.stop_count)?;
        self.track_width = width;
        self.track_height = height;
        Ok(())
    }

    /// Replaces the per-stop accents; `None` falls back to theme accents.
    pub fn set_stop_colors(&mut self, colors: Option<Vec<ColorValue>>) -> ConfigResult<()> {
        self.stop_colors = match colors {
            Some(colors) => Some(StopPalette::validated(colors, self.stop_count)?),
            None => None,
        };
        Ok(())
    }

    pub fn palette(&self, theme_accents: &[ColorValue]) -> StopPalette {
        self.stop_colors
            .clone()
            .unwrap_or_else(|| StopPalette::cyclic(theme_accents, self.stop_count))
    }
}

/// Waits out the travel animation, then commits `transition` in the machine
/// stored under `id`. Returns the new index when the completion was current.
pub async fn drive_transition(
    id: &str,
    transition: StopTransition,
    duration: Duration,
) -> Option<usize> {
    settle_after(duration).await;
    control::update_stop_machine(id, |machine| machine.complete(transition.generation)).flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settle(machine: &mut StopSwitchMachine, direction: SwipeDirection) -> usize {
        if let Some(transition) = machine.swipe(direction) {
            machine.complete(transition.generation);
        }
        machine.current_index()
    }

    #[test]
    fn three_stops_sit_at_left_center_right() {
        let track = StopTrack::from_bounds(120.0, 40.0, 3).expect("valid bounds");
        assert_eq!(track.thumb_diameter, 20.0);
        assert_eq!(track.thumb_top, 10.0);
        assert_eq!(track.positions(), &[0.0, 50.0, 100.0]);
        assert_eq!(track.lane.left, 10.0);
        assert_eq!(track.lane.width, 100.0);
        assert_eq!(track.lane.height, 10.0);
        assert_eq!(track.lane.top, 15.0);
    }

    #[test]
    fn default_config_matches_computed_track() {
        let config = StopSwitchConfig::default();
        let computed = StopTrack::from_bounds(120.0, 40.0, DEFAULT_STOP_COUNT).expect("valid");
        assert_eq!(config.track(), &computed);
        assert_eq!(config.track().positions(), &[0.0, 50.0, 100.0]);
        assert_eq!(config.track().lane.radius, 5.0);
    }

    #[test]
    fn n_stops_are_evenly_spaced() {
        let track = StopTrack::from_bounds(100.0, 20.0, 5).expect("valid bounds");
        assert_eq!(track.positions(), &[0.0, 22.5, 45.0, 67.5, 90.0]);
        assert_eq!(track.position(99), 90.0);
    }

    #[test]
    fn track_rejects_degenerate_bounds() {
        assert_eq!(
            StopTrack::from_bounds(120.0, 40.0, 1),
            Err(ConfigError::TooFewStops { count: 1 })
        );
        assert!(matches!(
            StopTrack::from_bounds(10.0, 40.0, 3),
            Err(ConfigError::InvalidBounds { .. })
        ));
        assert!(matches!(
            StopTrack::from_bounds(f32::NAN, 40.0, 3),
            Err(ConfigError::InvalidBounds { .. })
        ));
    }

    #[test]
    fn thumb_interpolates_between_stops() {
        let track = StopTrack::from_bounds(120.0, 40.0, 3).expect("valid bounds");
        assert_eq!(track.thumb_left_between(0, 1, 0.5), 25.0);
        assert_eq!(track.thumb_left_between(2, 1, 1.0), 50.0);
        assert_eq!(track.thumb_left_between(0, 2, 3.0), 100.0);
    }

    #[test]
    fn swipes_clamp_to_valid_range_for_every_start() {
        for stops in 2..6 {
            for start in 0..stops {
                let mut left = StopSwitchMachine::with_initial_index(stops, start);
                assert_eq!(
                    settle(&mut left, SwipeDirection::Left),
                    start.saturating_sub(1)
                );
                let mut right = StopSwitchMachine::with_initial_index(stops, start);
                assert_eq!(
                    settle(&mut right, SwipeDirection::Right),
                    (start + 1).min(stops - 1)
                );
            }
        }
    }

    #[test]
    fn edge_swipes_do_not_start_transitions() {
        let mut machine = StopSwitchMachine::new(3);
        assert_eq!(machine.swipe_left(), None);
        assert!(!machine.is_busy());
        assert_eq!(machine.generation(), 0);
    }

    #[test]
    fn swipe_during_transition_is_dropped() {
        let mut machine = StopSwitchMachine::new(3);
        let first = machine.swipe_right().expect("transition");
        assert!(machine.is_busy());
        assert_eq!(machine.swipe_right(), None);
        assert_eq!(machine.swipe_left(), None);
        assert_eq!(machine.current_index(), 0);
        assert_eq!(machine.pending(), Some(first));

        assert_eq!(machine.complete(first.generation), Some(1));
        assert!(!machine.is_busy());
        assert_eq!(machine.current_index(), 1);
    }

    #[test]
    fn stale_completion_commits_nothing() {
        let mut machine = StopSwitchMachine::new(3);
        let transition = machine.swipe_right().expect("transition");
        assert_eq!(machine.complete(transition.generation + 1), None);
        assert!(machine.is_busy());
        assert_eq!(machine.complete(transition.generation), Some(1));
        assert_eq!(machine.complete(transition.generation), None);
        assert_eq!(machine.completed_generation(), transition.generation);
    }

    #[test]
    fn initial_index_is_clamped() {
        let machine = StopSwitchMachine::with_initial_index(3, 10);
        assert_eq!(machine.current_index(), 2);
    }

    #[test]
    fn palette_must_cover_every_stop() {
        let colors = vec![ColorValue::White, ColorValue::Black];
        assert_eq!(
            StopPalette::validated(colors.clone(), 3),
            Err(ConfigError::StopColorMismatch {
                stops: 3,
                colors: 2
            })
        );
        let palette = StopPalette::validated(colors, 2).expect("matching palette");
        assert_eq!(palette.accent(1), Some(&ColorValue::Black));
        assert_eq!(palette.accent(2), None);
    }

    #[test]
    fn cyclic_palette_repeats_theme_accents() {
        let palette = StopPalette::cyclic(&[ColorValue::White, ColorValue::Black], 5);
        assert_eq!(palette.len(), 5);
        assert_eq!(palette.accent(4), Some(&ColorValue::White));
        assert_eq!(StopPalette::cyclic(&[], 2).accent(0), Some(&ColorValue::Black));
    }

    #[test]
    fn config_rejects_stop_count_that_breaks_palette() {
        let mut config = StopSwitchConfig::default();
        config
            .set_stop_colors(Some(vec![
                ColorValue::White,
                ColorValue::Black,
                ColorValue::White,
            ]))
            .expect("three colors for three stops");
        assert!(config.set_stop_count(4).is_err());
        assert_eq!(config.stop_count(), 3);
        assert_eq!(config.track().stop_count(), 3);
    }

    #[test]
    fn config_recomputes_track_on_bounds_change() {
        let mut config = StopSwitchConfig::default();
        config.set_bounds(200.0, 40.0).expect("valid bounds");
        assert_eq!(config.track().positions(), &[0.0, 90.0, 180.0]);

        assert!(config.set_bounds(5.0, 40.0).is_err());
        assert_eq!(config.bounds(), (200.0, 40.0));
    }

    #[test]
    fn config_palette_prefers_explicit_colors() {
        let mut config = StopSwitchConfig::new(2).expect("two stops");
        let theme = [ColorValue::White];
        assert_eq!(config.palette(&theme).accent(1), Some(&ColorValue::White));
        config
            .set_stop_colors(Some(vec![ColorValue::Black, ColorValue::Black]))
            .expect("matching palette");
        assert_eq!(config.palette(&theme).accent(1), Some(&ColorValue::Black));
    }
}
