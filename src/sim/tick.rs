//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use super::direction::Direction;
use super::state::{GamePhase, GameState};
use super::wave::WaveError;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Swipe heading in degrees, clockwise from up
    pub swipe_angle: Option<f32>,
    /// Keyboard direction (unforced)
    pub direction: Option<Direction>,
    pub move_left: bool,
    pub move_right: bool,
    /// Fire the forced forward move now
    pub force_auto_move: bool,
    /// Camera origin from the view layer
    pub view_origin_y: Option<f32>,
}

/// Advance the game state by one fixed timestep
///
/// Streaming maintenance runs first so input and motion always see the
/// updated graph. An exhausted wave library is fatal for the run.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Result<(), WaveError> {
    if state.phase == GamePhase::GameOver {
        return Ok(());
    }

    if let Some(origin) = input.view_origin_y {
        state.view_origin_y = origin;
    }

    let GameState {
        settings,
        grid,
        player,
        feed,
        view_origin_y,
        events,
        ..
    } = state;

    grid.maintain(
        player.position.y,
        *view_origin_y,
        feed,
        player.pinned_line(),
        events,
    )?;

    // Input
    if let Some(dir) = input.direction {
        player.move_direction(dir, false, grid, events);
    }
    if input.move_left {
        player.move_left(grid, events);
    }
    if input.force_auto_move {
        player.force_auto_move();
    }
    if input.move_right {
        player.move_right(grid, events);
    }
    if let Some(angle) = input.swipe_angle {
        if settings.swipe_control {
            player.swipe(angle, grid, events);
        }
    }

    player.update(grid, settings, dt, events);
    state.time_ticks += 1;

    // Falling too far behind the camera ends the run
    if let Some(margin) = state.settings.kill_margin {
        if state.player.position.y < state.view_origin_y - margin {
            state.end_run();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::settings::Settings;
    use crate::sim::state::GameEvent;
    use crate::sim::tile::TileId;
    use crate::sim::wave::{WaveData, WaveLibrary};

    fn wave(width: usize, rows: usize) -> WaveData {
        WaveData {
            width,
            lines: vec![vec!["TileDefault".to_string(); width]; rows],
        }
    }

    fn library() -> WaveLibrary {
        WaveLibrary {
            waves: vec![wave(5, 8)],
        }
    }

    /// Start width depends on the seeded wave pick
    fn mixed_library() -> WaveLibrary {
        WaveLibrary {
            waves: vec![wave(5, 8), wave(4, 3), wave(6, 5)],
        }
    }

    fn quiet_settings() -> Settings {
        Settings {
            auto_move: false,
            ..Default::default()
        }
    }

    fn new_state(settings: Settings, seed: u64) -> GameState {
        GameState::from_library(settings, library(), seed).unwrap()
    }

    #[test]
    fn test_first_tick_fills_view() {
        let mut state = new_state(quiet_settings(), 1);
        tick(&mut state, &TickInput::default(), SIM_DT).unwrap();
        let half = state.settings.view_half_extent;
        assert!(state.grid.newest().world_y >= half);
        assert_eq!(state.grid.oldest().sequence_number, 1);
        assert_eq!(state.time_ticks, 1);
        // Warm-up lines keep the start width
        for seq in 1..=state.settings.warmup_lines {
            assert_eq!(state.grid.line(seq).unwrap().width(), 5);
        }
    }

    #[test]
    fn test_direction_input_moves_player() {
        let mut state = new_state(quiet_settings(), 1);
        let input = TickInput {
            direction: Some(Direction::North),
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT).unwrap();
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::TileLeft(TileId::new(1, 2))]
        );

        for _ in 0..60 {
            tick(&mut state, &TickInput::default(), SIM_DT).unwrap();
        }
        assert_eq!(state.player.root_tile(), Some(TileId::new(2, 2)));
        assert_eq!(state.player.progress(), 2);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::TileEntered(TileId::new(2, 2))));
        assert!(events.contains(&GameEvent::LineReached { line: 2, points: 1 }));
    }

    #[test]
    fn test_swipe_ignored_when_disabled() {
        let mut settings = quiet_settings();
        settings.swipe_control = false;
        let mut state = new_state(settings, 1);
        let input = TickInput {
            swipe_angle: Some(0.0),
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT).unwrap();
        assert_eq!(state.player.queue_len(), 0);

        let mut state = new_state(quiet_settings(), 1);
        tick(&mut state, &input, SIM_DT).unwrap();
        assert_eq!(state.player.queue().next(), Some(TileId::new(2, 2)));
    }

    #[test]
    fn test_lateral_inputs() {
        let mut state = new_state(quiet_settings(), 1);
        let input = TickInput {
            move_left: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT).unwrap();
        assert_eq!(state.player.queue().next(), Some(TileId::new(2, 1)));

        let mut state = new_state(quiet_settings(), 1);
        let input = TickInput {
            move_right: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT).unwrap();
        assert_eq!(state.player.queue().next(), Some(TileId::new(2, 3)));
    }

    #[test]
    fn test_auto_move_walks_forward() {
        let settings = Settings {
            auto_move: true,
            auto_move_delay: 0.5,
            ..Default::default()
        };
        let mut state = new_state(settings, 7);
        let input = TickInput {
            force_auto_move: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT).unwrap();
        assert_eq!(state.player.auto_move_target(), Some(TileId::new(2, 2)));

        for _ in 0..240 {
            tick(&mut state, &TickInput::default(), SIM_DT).unwrap();
        }
        assert!(state.player.progress() > 3);
        let triggers = state
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::AutoMoveTriggered(_)))
            .count();
        assert!(triggers >= 3);
    }

    #[test]
    fn test_pinned_line_survives_pruning() {
        let mut state = new_state(quiet_settings(), 1);
        let input = TickInput {
            view_origin_y: Some(40.0),
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT).unwrap();
        // Everything below the boundary could go, but the player stands on line 1
        assert_eq!(state.grid.oldest().sequence_number, 1);
        assert!(state.grid.newest().world_y >= 46.0);
    }

    #[test]
    fn test_kill_margin_ends_run() {
        let mut settings = quiet_settings();
        settings.kill_margin = Some(2.0);
        let mut state = new_state(settings, 1);
        tick(&mut state, &TickInput::default(), SIM_DT).unwrap();
        assert_eq!(state.phase, GamePhase::Playing);

        let input = TickInput {
            view_origin_y: Some(5.0),
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT).unwrap();
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state
            .drain_events()
            .contains(&GameEvent::RunEnded { progress: 1, score: 0 }));

        // Game over: ticks are ignored
        let ticks = state.time_ticks;
        tick(&mut state, &TickInput::default(), SIM_DT).unwrap();
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_exhausted_library_is_fatal() {
        let settings = Settings {
            warmup_lines: 0,
            ..quiet_settings()
        };
        let library = WaveLibrary {
            waves: vec![WaveData::plain(5)],
        };
        let mut state = GameState::from_library(settings, library, 1).unwrap();
        let result = tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(matches!(result, Err(WaveError::Exhausted { .. })));
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let make = || GameState::from_library(Settings::default(), mixed_library(), 99999).unwrap();
        let mut state1 = make();
        let mut state2 = make();

        let inputs = [
            TickInput {
                swipe_angle: Some(30.0),
                ..Default::default()
            },
            TickInput {
                move_left: true,
                ..Default::default()
            },
            TickInput {
                direction: Some(Direction::NorthEast),
                view_origin_y: Some(3.0),
                ..Default::default()
            },
            TickInput::default(),
        ];

        for step in 0..600 {
            let input = &inputs[step % inputs.len()];
            tick(&mut state1, input, SIM_DT).unwrap();
            tick(&mut state2, input, SIM_DT).unwrap();
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.player.history(), state2.player.history());
        assert_eq!(state1.player.score(), state2.player.score());
        assert_eq!(state1.feed.current_wave(), state2.feed.current_wave());
        assert_eq!(
            state1.grid.newest().sequence_number,
            state2.grid.newest().sequence_number
        );
        assert!((state1.player.position - state2.player.position).length() < 0.0001);
        assert_eq!(state1.drain_events(), state2.drain_events());
    }
}
