//! Fixed timestep simulation tick
//!
//! Control events are applied at the tick boundary, then the current phase
//! advances: integrate, ground check, edge checks in angular order.

use super::collision::{CollisionCursor, EdgeCrossing};
use super::events::{GameEvent, SoundEvent};
use super::kinematics::clamp_dt;
use super::state::{GamePhase, GameState};
use crate::difficulty::Difficulty;
use crate::wrap_angle;

/// Input for a single tick, collected from the sample queue
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// A completed flap gesture (or any other flap trigger)
    pub flap: bool,
    /// Latest headset height above the real floor
    pub head_height: Option<f32>,
    /// Hand tracking authorization changed
    pub sensor_authorized: Option<bool>,
    /// Abandon the running round
    pub interrupt: bool,
    pub difficulty: Option<Difficulty>,
    pub music: Option<bool>,
    /// Enter (true) or leave (false) the game world
    pub session: Option<bool>,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if let Some(active) = input.session {
        if active {
            enter_session(state);
        } else {
            exit_session(state);
        }
    }
    if let Some(authorized) = input.sensor_authorized {
        set_sensor_authorized(state, authorized);
    }
    if input.interrupt {
        interrupt(state);
    }
    if let Some(height) = input.head_height {
        state.head_offset = height;
    }
    if let Some(difficulty) = input.difficulty {
        set_difficulty(state, difficulty);
    }
    if let Some(enabled) = input.music {
        set_music(state, enabled);
    }
    if input.flap {
        flap(state);
    }

    state.time_ticks += 1;
    state.time += clamp_dt(dt) as f64;

    match state.phase {
        GamePhase::Idle => idle_hover(state),
        GamePhase::Playing => advance_playing(state, dt),
        GamePhase::RoundOver => {}
    }
}

/// One step of active play
fn advance_playing(state: &mut GameState, dt: f32) {
    let profile = state.profile();
    state
        .world
        .integrate(dt, profile.gravity, state.config.angular_velocity);
    state.emit_world();

    if state.head_height() < state.config.ground_death_height {
        log::debug!("Hit the ground at height {:.2}", state.world.height);
        die(state);
        return;
    }

    // A clamped step can cross at most a couple of edges; bound it anyway
    for _ in 0..2 * state.config.num_slots {
        let Some(crossing) = state.cursor.poll(state.world.angle, &state.config) else {
            break;
        };
        arrived_at_edge(state, crossing);
        if !state.game_playing() {
            break;
        }
    }
}

/// Collision check at an obstacle edge, plus scoring when leaving it
fn arrived_at_edge(state: &mut GameState, crossing: EdgeCrossing) {
    let gap = state.profile().gap_width;
    let obstacle = *state.ring.get(crossing.slot() as u64);
    if obstacle.is_lethal(state.head_height(), gap) {
        log::debug!(
            "Hit obstacle {} (head {:.2}, gap {:.2}..{:.2})",
            obstacle.slot,
            state.head_height(),
            obstacle.bot_height,
            obstacle.top_height(gap)
        );
        die(state);
    }

    if let EdgeCrossing::Exit { refresh_slot, .. } = crossing {
        let placement = state
            .ring
            .randomize_height(refresh_slot, gap, false, &mut state.rng);
        state.emit(GameEvent::ObstacleMoved(placement));
        if state.game_playing() {
            score_point(state);
        }
    }
}

fn score_point(state: &mut GameState) {
    state.score += 1;
    log::debug!("Scored, now {}", state.score);
    state.emit(GameEvent::Sound(SoundEvent::Score));
    state.emit(GameEvent::Scored { score: state.score });
    if state.score % state.config.surprise_interval == 0 {
        state.emit(GameEvent::Sound(SoundEvent::Surprise));
    }
}

/// End the round. Only the first call per round has any effect.
pub fn die(state: &mut GameState) {
    if !state.game_playing() {
        return;
    }
    state.phase = GamePhase::RoundOver;
    state.world.halt();
    state.emit(GameEvent::Sound(SoundEvent::Death));

    let difficulty = state.difficulty();
    let new_high_score = state.best_scores.record(difficulty, state.score);
    if new_high_score {
        state.emit(GameEvent::Sound(SoundEvent::HighScore));
    }
    log::info!(
        "Round over: score {} on {} (best {}{})",
        state.score,
        difficulty.as_str(),
        state.best(),
        if new_high_score { ", new high score" } else { "" }
    );
    state.emit(GameEvent::RoundOver {
        difficulty,
        score: state.score,
        best: state.best(),
        new_high_score,
    });
}

/// Handle a flap: start, steer, or respawn depending on phase.
/// Rounds only start or respawn inside a session.
pub fn flap(state: &mut GameState) {
    if state.sensor_denied {
        log::debug!("Flap ignored, sensor access denied");
        return;
    }
    match state.phase {
        GamePhase::Playing => {
            let impulse = state.profile().flap_impulse;
            state.world.apply_flap(impulse);
            state.emit(GameEvent::Sound(SoundEvent::Flap));
        }
        _ if !state.in_session => log::debug!("Flap ignored outside a session"),
        GamePhase::Idle => start_round(state),
        GamePhase::RoundOver => respawn(state),
    }
}

/// Begin a round from the idle pose
pub fn start_round(state: &mut GameState) {
    let gap = state.profile().gap_width;
    let first = state.config.first_slot;
    // The obstacle in front of the player is already visible; leave it alone
    let placements = state.ring.randomize_all_except(gap, first, &mut state.rng);
    for placement in placements {
        state.emit(GameEvent::ObstacleMoved(placement));
    }
    state.score = 0;
    state.cursor = CollisionCursor::new(first);
    state.phase = GamePhase::Playing;
    log::info!("Round started on {}", state.difficulty().as_str());
    state.emit(GameEvent::RoundStarted {
        difficulty: state.difficulty(),
    });
}

/// Return to the spawn pose after a round ended
pub fn respawn(state: &mut GameState) {
    state.phase = GamePhase::Idle;
    state.reset_pose();
    log::info!("Respawned");
    state.emit(GameEvent::Respawned);
}

/// Abandon a running round without a result
pub fn interrupt(state: &mut GameState) {
    if state.phase != GamePhase::Playing {
        return;
    }
    log::warn!("Round interrupted at score {}", state.score);
    state.phase = GamePhase::Idle;
    state.reset_pose();
    state.emit(GameEvent::Interrupted);
}

pub fn set_sensor_authorized(state: &mut GameState, authorized: bool) {
    if authorized {
        if state.sensor_denied {
            log::info!("Hand tracking authorized");
            state.sensor_denied = false;
            state.emit(GameEvent::SensorStatus { denied: false });
        }
        return;
    }
    if !state.sensor_denied {
        log::warn!("Hand tracking authorization denied");
        state.sensor_denied = true;
        state.emit(GameEvent::SensorStatus { denied: true });
    }
    interrupt(state);
}

/// Change difficulty outside of a running round and lay out a fresh ring
pub fn set_difficulty(state: &mut GameState, difficulty: Difficulty) {
    if state.game_playing() {
        log::warn!("Difficulty change ignored while playing");
        return;
    }
    if state.settings.difficulty == difficulty {
        return;
    }
    state.settings.difficulty = difficulty;
    state.reset_ring();
    log::info!("Difficulty set to {}", difficulty.as_str());
    state.emit(GameEvent::SettingsChanged);
}

pub fn set_music(state: &mut GameState, enabled: bool) {
    if state.settings.music_enabled == enabled {
        return;
    }
    state.settings.music_enabled = enabled;
    state.emit(GameEvent::SettingsChanged);
    if state.in_session {
        let cue = if enabled {
            SoundEvent::BackgroundStart
        } else {
            SoundEvent::BackgroundStop
        };
        state.emit(GameEvent::Sound(cue));
    }
}

pub fn enter_session(state: &mut GameState) {
    if state.in_session {
        return;
    }
    state.in_session = true;
    log::info!("Session started");
    if state.settings.music_enabled {
        state.emit(GameEvent::Sound(SoundEvent::BackgroundStart));
    }
}

pub fn exit_session(state: &mut GameState) {
    interrupt(state);
    if !state.in_session {
        return;
    }
    state.in_session = false;
    log::info!("Session ended");
    state.emit(GameEvent::Sound(SoundEvent::BackgroundStop));
}

/// Gentle bob around the spawn pose while waiting for the first flap
fn idle_hover(state: &mut GameState) {
    let jiggle = state.time.sin() as f32;
    state.world.angle = wrap_angle(state.config.spawn_angle() + 0.01 * jiggle);
    state.world.height = state.config.initial_height + 0.1 * jiggle;
    state.emit_world();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use crate::consts::SIM_DT;
    use crate::persistence::SaveData;
    use crate::sim::collision::EdgePhase;

    const FLAP: TickInput = TickInput {
        flap: true,
        head_height: None,
        sensor_authorized: None,
        interrupt: false,
        difficulty: None,
        music: None,
        session: None,
    };

    fn outside_session() -> GameState {
        let mut state = GameState::new(WorldConfig::default(), SaveData::default(), 12345).unwrap();
        state.drain_events();
        state
    }

    fn new_state() -> GameState {
        let mut state = outside_session();
        enter_session(&mut state);
        state.drain_events();
        state
    }

    fn playing_state() -> GameState {
        let mut state = new_state();
        tick(&mut state, &FLAP, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        state.drain_events();
        state
    }

    /// Tick with the player pinned at a head height until `done` holds
    fn fly_at(state: &mut GameState, head: impl Fn(&GameState) -> f32, done: impl Fn(&GameState) -> bool) {
        for _ in 0..10_000 {
            if done(state) {
                return;
            }
            state.world.height = head(state) - state.head_offset;
            state.world.vertical_velocity = 0.0;
            tick(state, &TickInput::default(), SIM_DT);
        }
        panic!("condition never reached");
    }

    fn gap_middle(state: &GameState) -> f32 {
        let gap = state.profile().gap_width;
        state.ring.get(state.cursor.next_pipe_index).bot_height + gap / 2.0
    }

    #[test]
    fn test_flap_starts_round() {
        let mut state = new_state();
        let front = *state.ring.get(state.config.first_slot as u64);
        state.score = 7;

        tick(&mut state, &FLAP, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(*state.ring.get(state.config.first_slot as u64), front);

        let events = state.drain_events();
        let moved: Vec<usize> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::ObstacleMoved(p) => Some(p.slot),
                _ => None,
            })
            .collect();
        assert_eq!(moved.len(), state.config.num_slots - 1);
        assert!(!moved.contains(&state.config.first_slot));
        assert!(events.contains(&GameEvent::RoundStarted {
            difficulty: Difficulty::Medium
        }));
    }

    #[test]
    fn test_flap_while_playing_sets_velocity() {
        let mut state = playing_state();
        state.world.vertical_velocity = -5.0;
        tick(&mut state, &FLAP, 0.0);
        assert_eq!(state.world.vertical_velocity, state.profile().flap_impulse);
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::Sound(SoundEvent::Flap))
        );
    }

    #[test]
    fn test_world_moves_while_playing() {
        let mut state = playing_state();
        let before = state.world.angle;
        tick(&mut state, &TickInput::default(), SIM_DT);
        let expected = before + state.config.angular_velocity * SIM_DT;
        assert!((state.world.angle - expected).abs() < 1e-5);
        assert!(
            state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::WorldMoved { .. }))
        );
    }

    #[test]
    fn test_ground_death_threshold() {
        let eps = 1e-3;
        let mut state = playing_state();
        state.world.height = state.config.ground_death_height + eps - state.head_offset;
        tick(&mut state, &TickInput::default(), 0.0);
        assert_eq!(state.phase, GamePhase::Playing);

        state.world.height = state.config.ground_death_height - eps - state.head_offset;
        tick(&mut state, &TickInput::default(), 0.0);
        assert_eq!(state.phase, GamePhase::RoundOver);
        assert_eq!(state.world.vertical_velocity, 0.0);
    }

    #[test]
    fn test_passing_through_gap_scores_once() {
        let mut state = playing_state();
        fly_at(&mut state, gap_middle, |s| s.cursor.next_pipe_index > s.config.first_slot as u64);

        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 1);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Scored { score: 1 }));
        assert!(events.contains(&GameEvent::Sound(SoundEvent::Score)));
    }

    #[test]
    fn test_low_at_entry_ends_round() {
        let mut state = playing_state();
        fly_at(
            &mut state,
            |s| s.ring.get(s.cursor.next_pipe_index).bot_height - 0.05,
            |s| !s.game_playing(),
        );
        assert_eq!(state.phase, GamePhase::RoundOver);
        assert_eq!(state.score, 0);
        // Died at the entry edge, exit not yet reached
        assert!(state.cursor.passed_first_edge());
    }

    #[test]
    fn test_drifting_out_before_exit_ends_round() {
        let mut state = playing_state();
        fly_at(&mut state, gap_middle, |s| s.cursor.passed_first_edge());
        assert_eq!(state.phase, GamePhase::Playing);

        let gap = state.profile().gap_width;
        fly_at(
            &mut state,
            move |s| s.ring.get(s.cursor.next_pipe_index).top_height(gap) + 0.05,
            |s| !s.game_playing(),
        );
        assert_eq!(state.phase, GamePhase::RoundOver);
        assert_eq!(state.score, 0);
        // The exit still completed the cursor transition
        assert_eq!(state.cursor.phase, EdgePhase::AwaitingEntry);
        assert_eq!(state.cursor.next_pipe_index, state.config.first_slot as u64 + 1);
    }

    #[test]
    fn test_surprise_on_interval() {
        let mut state = playing_state();
        state.score = state.config.surprise_interval - 1;
        fly_at(&mut state, gap_middle, |s| s.cursor.next_pipe_index > s.config.first_slot as u64);
        assert_eq!(state.score, state.config.surprise_interval);
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::Sound(SoundEvent::Surprise))
        );
    }

    #[test]
    fn test_high_score_recorded_once() {
        let mut state = playing_state();
        state.score = 3;
        die(&mut state);
        die(&mut state);
        let events = state.drain_events();
        let round_overs: Vec<&GameEvent> = events
            .iter()
            .filter(|e| matches!(e, GameEvent::RoundOver { .. }))
            .collect();
        assert_eq!(round_overs.len(), 1);
        assert_eq!(
            round_overs[0],
            &GameEvent::RoundOver {
                difficulty: Difficulty::Medium,
                score: 3,
                best: 3,
                new_high_score: true
            }
        );
        assert!(events.contains(&GameEvent::Sound(SoundEvent::HighScore)));
        assert_eq!(state.best(), 3);

        // A worse round does not overwrite the best
        tick(&mut state, &FLAP, SIM_DT); // respawn
        tick(&mut state, &FLAP, SIM_DT); // start
        state.score = 1;
        die(&mut state);
        assert_eq!(state.best(), 3);
        assert!(
            !state
                .drain_events()
                .contains(&GameEvent::Sound(SoundEvent::HighScore))
        );
    }

    #[test]
    fn test_flap_after_round_over_respawns() {
        let mut state = playing_state();
        fly_at(&mut state, |s| s.world.height.min(-10.0), |s| !s.game_playing());
        tick(&mut state, &FLAP, SIM_DT);
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.cursor, CollisionCursor::new(state.config.first_slot));
        assert!(state.drain_events().contains(&GameEvent::Respawned));
    }

    #[test]
    fn test_interrupt_returns_to_idle() {
        let mut state = playing_state();
        fly_at(&mut state, gap_middle, |s| s.cursor.passed_first_edge());
        let input = TickInput {
            interrupt: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.cursor, CollisionCursor::new(state.config.first_slot));
        assert!(state.drain_events().contains(&GameEvent::Interrupted));
    }

    #[test]
    fn test_denied_sensor_suspends_play() {
        let mut state = playing_state();
        let denied = TickInput {
            sensor_authorized: Some(false),
            ..Default::default()
        };
        tick(&mut state, &denied, SIM_DT);
        assert_eq!(state.phase, GamePhase::Idle);
        assert!(state.sensor_denied);

        tick(&mut state, &FLAP, SIM_DT);
        assert_eq!(state.phase, GamePhase::Idle);

        let allowed = TickInput {
            sensor_authorized: Some(true),
            flap: true,
            ..Default::default()
        };
        tick(&mut state, &allowed, SIM_DT);
        assert!(!state.sensor_denied);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_difficulty_change_only_outside_play() {
        let mut state = playing_state();
        let hard = TickInput {
            difficulty: Some(Difficulty::Hard),
            ..Default::default()
        };
        tick(&mut state, &hard, SIM_DT);
        assert_eq!(state.difficulty(), Difficulty::Medium);

        die(&mut state);
        state.drain_events();
        tick(&mut state, &hard, SIM_DT);
        assert_eq!(state.difficulty(), Difficulty::Hard);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::SettingsChanged));
        let moved = events
            .iter()
            .filter(|e| matches!(e, GameEvent::ObstacleMoved(_)))
            .count();
        assert_eq!(moved, state.config.num_slots);
    }

    #[test]
    fn test_session_and_music_cues() {
        let mut state = outside_session();
        let enter = TickInput {
            session: Some(true),
            ..Default::default()
        };
        tick(&mut state, &enter, SIM_DT);
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::Sound(SoundEvent::BackgroundStart))
        );

        let mute = TickInput {
            music: Some(false),
            ..Default::default()
        };
        tick(&mut state, &mute, SIM_DT);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Sound(SoundEvent::BackgroundStop)));
        assert!(events.contains(&GameEvent::SettingsChanged));

        tick(&mut state, &FLAP, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        let leave = TickInput {
            session: Some(false),
            ..Default::default()
        };
        tick(&mut state, &leave, SIM_DT);
        assert_eq!(state.phase, GamePhase::Idle);
        assert!(!state.in_session);
    }

    #[test]
    fn test_flap_outside_session_does_not_start() {
        let mut state = outside_session();
        tick(&mut state, &FLAP, SIM_DT);
        assert_eq!(state.phase, GamePhase::Idle);
        assert!(
            !state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::RoundStarted { .. }))
        );

        // A finished round waits for the next session to respawn
        let mut state = playing_state();
        die(&mut state);
        exit_session(&mut state);
        tick(&mut state, &FLAP, SIM_DT);
        assert_eq!(state.phase, GamePhase::RoundOver);
        enter_session(&mut state);
        tick(&mut state, &FLAP, SIM_DT);
        assert_eq!(state.phase, GamePhase::Idle);
    }

    #[test]
    fn test_idle_hover_stays_near_spawn() {
        let mut state = new_state();
        for _ in 0..500 {
            tick(&mut state, &TickInput::default(), SIM_DT);
            let drift = crate::angle_delta(state.config.spawn_angle(), state.world.angle);
            assert!(drift.abs() <= 0.011);
            assert!((state.world.height - state.config.initial_height).abs() <= 0.11);
        }
        assert_eq!(state.phase, GamePhase::Idle);
    }

    #[test]
    fn test_long_run_invariants() {
        // Simple autopilot: flap when the head sinks into the lower part of the gap
        let mut save = SaveData::default();
        save.settings.difficulty = Difficulty::VeryEasy;
        let mut state = GameState::new(WorldConfig::default(), save, 7).unwrap();
        enter_session(&mut state);
        let mut last_index = state.cursor.next_pipe_index;
        let mut scored = 0;
        for _ in 0..40_000 {
            let gap = state.profile().gap_width;
            let target = state.ring.get(state.cursor.next_pipe_index).bot_height + gap * 0.3;
            let input = TickInput {
                flap: state.phase != GamePhase::Playing
                    || (state.head_height() < target && state.world.vertical_velocity < 0.0),
                ..Default::default()
            };
            let active_slot = state.cursor.slot(state.config.num_slots);
            let was_playing = state.game_playing();
            tick(&mut state, &input, SIM_DT);

            if was_playing && state.cursor.next_pipe_index >= last_index {
                for event in state.drain_events() {
                    match event {
                        GameEvent::ObstacleMoved(p) => {
                            // Never the obstacle being crossed or the one after it
                            assert_ne!(p.slot, active_slot);
                            assert_ne!(p.slot, (active_slot + 1) % state.config.num_slots);
                        }
                        GameEvent::Scored { .. } => scored += 1,
                        _ => {}
                    }
                }
                assert!(state.cursor.next_pipe_index - last_index <= 1);
            } else {
                state.drain_events();
            }
            last_index = state.cursor.next_pipe_index;
        }
        assert!(scored > 0);
    }
}
