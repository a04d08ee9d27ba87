#![forbid(unsafe_code)]

//! The shuffle state machine.
//!
//! ```text
//! Idle -> Highlighting -> WaitingToShuffle -> Shuffling(0) -> ... -> Shuffling(budget)
//!      -> Finalizing -> Ready -> Over(outcome)
//! ```
//!
//! [`Game`] never touches a host. [`Game::init`] and [`Game::update`] return
//! [`Cmd`]s; the program executes them and feeds timer and click messages
//! back in. This keeps every transition testable without a clock.
//!
//! # Invariants
//!
//! 1. The position table is a permutation of the grid slots after every update.
//! 2. Exactly `shuffle_budget` patterns are applied before `Finalizing`.
//! 3. `Finalizing` is entered once.
//! 4. Clicks are ignored outside `Ready`; the first click in `Ready` ends the game.

use std::fmt;

use limbo_core::color::{HIGHLIGHT, NEUTRAL, PALETTE, Rgb};
use limbo_core::config::{GameConfig, KEY_COUNT};
use limbo_core::geometry::{Position, Size, compute_grid};
use limbo_core::surface::SurfaceId;
use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::mover;
use crate::pattern::Pattern;
use crate::program::Cmd;
use crate::table::PositionTable;

/// Result of the one accepted click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Lose,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Win => "win",
            Self::Lose => "lose",
        })
    }
}

/// Where the game is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Highlighting,
    WaitingToShuffle,
    /// Patterns applied so far.
    Shuffling(u32),
    Finalizing,
    Ready,
    Over(Outcome),
}

/// Messages delivered to [`Game::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Msg {
    /// Paint the target key with the highlight color.
    HighlightOn,
    /// Revert the target key to neutral.
    HighlightOff,
    /// Begin the shuffle loop.
    StartShuffle,
    /// Apply the next pattern, or finalize when the budget is spent.
    ShuffleStep,
    /// One animation frame for one key.
    Frame {
        surface: SurfaceId,
        position: Position,
    },
    /// The player clicked a key.
    Click(SurfaceId),
}

/// What a key currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Surface {
    pub id: SurfaceId,
    pub color: Rgb,
    pub position: Position,
}

/// One game session.
#[derive(Debug)]
pub struct Game {
    config: GameConfig,
    rng: StdRng,
    grid: [Position; KEY_COUNT],
    table: PositionTable,
    surfaces: [Surface; KEY_COUNT],
    highlight: SurfaceId,
    shuffles: u32,
    input_enabled: bool,
    phase: Phase,
    trail: Vec<Phase>,
    patterns: Vec<Pattern>,
}

impl Game {
    /// New session on a screen of `screen` size; the target is drawn from `rng`.
    #[must_use]
    pub fn new(config: GameConfig, screen: Size, mut rng: StdRng) -> Self {
        let highlight = SurfaceId(rng.random_range(0..KEY_COUNT));
        Self::with_highlight(config, screen, rng, highlight)
    }

    /// New session with a fixed target.
    ///
    /// # Panics
    ///
    /// Panics if `highlight` is not a valid key id.
    #[must_use]
    pub fn with_highlight(
        config: GameConfig,
        screen: Size,
        rng: StdRng,
        highlight: SurfaceId,
    ) -> Self {
        assert!(highlight.index() < KEY_COUNT, "no such key: {highlight}");
        let grid = compute_grid(
            screen.width,
            screen.height,
            config.window_size,
            config.margin_x,
            config.margin_y,
        );
        let surfaces = std::array::from_fn(|i| Surface {
            id: SurfaceId(i),
            color: NEUTRAL,
            position: grid[i],
        });
        Self {
            config,
            rng,
            grid,
            table: PositionTable::canonical(grid),
            surfaces,
            highlight,
            shuffles: 0,
            input_enabled: false,
            phase: Phase::Idle,
            trail: vec![Phase::Idle],
            patterns: Vec::new(),
        }
    }

    // ── Accessors ──────────────────────────────────────────────────────

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Every phase entered so far, starting with `Idle`.
    #[must_use]
    pub fn phase_trail(&self) -> &[Phase] {
        &self.trail
    }

    #[must_use]
    pub fn highlight(&self) -> SurfaceId {
        self.highlight
    }

    #[must_use]
    pub fn grid(&self) -> &[Position; KEY_COUNT] {
        &self.grid
    }

    #[must_use]
    pub fn table(&self) -> &PositionTable {
        &self.table
    }

    #[must_use]
    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }

    #[must_use]
    pub fn shuffles(&self) -> u32 {
        self.shuffles
    }

    /// Patterns applied so far, in order.
    #[must_use]
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    #[must_use]
    pub fn input_enabled(&self) -> bool {
        self.input_enabled
    }

    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            Phase::Over(outcome) => Some(outcome),
            _ => None,
        }
    }

    // ── Transitions ────────────────────────────────────────────────────

    /// Create the keys and arm the highlight flash.
    pub fn init(&mut self) -> Cmd {
        if self.phase != Phase::Idle {
            tracing::warn!(target: "limbo.game", phase = ?self.phase, "init called twice");
            return Cmd::none();
        }
        tracing::info!(
            target: "limbo.game",
            budget = self.config.shuffle_budget,
            "game starting"
        );
        tracing::debug!(target: "limbo.game", highlight = %self.highlight, "target chosen");

        let mut cmds: Vec<Cmd> = self
            .surfaces
            .iter()
            .map(|s| Cmd::Create {
                surface: s.id,
                size: self.config.window_size,
                position: s.position,
                color: s.color,
            })
            .collect();
        cmds.push(Cmd::after(self.config.highlight_delay, Msg::HighlightOn));
        self.enter(Phase::Highlighting);
        Cmd::batch(cmds)
    }

    /// Advance the state machine by one message.
    pub fn update(&mut self, msg: Msg) -> Cmd {
        match (msg, self.phase) {
            (Msg::HighlightOn, Phase::Highlighting) => Cmd::batch(vec![
                self.paint(self.highlight, HIGHLIGHT),
                Cmd::after(self.config.highlight_hold, Msg::HighlightOff),
            ]),
            (Msg::HighlightOff, Phase::Highlighting) => {
                self.enter(Phase::WaitingToShuffle);
                Cmd::batch(vec![
                    self.paint(self.highlight, NEUTRAL),
                    Cmd::after(self.config.shuffle_lead_in, Msg::StartShuffle),
                ])
            }
            (Msg::StartShuffle, Phase::WaitingToShuffle) => {
                self.enter(Phase::Shuffling(0));
                self.shuffle_step()
            }
            (Msg::ShuffleStep, Phase::Shuffling(_)) => self.shuffle_step(),
            (Msg::Frame { surface, position }, phase) if !matches!(phase, Phase::Over(_)) => {
                self.surfaces[surface.index()].position = position;
                Cmd::Place { surface, position }
            }
            (Msg::Click(surface), Phase::Ready) => self.resolve(surface),
            (Msg::Click(surface), phase) => {
                tracing::trace!(target: "limbo.game", %surface, ?phase, "click ignored");
                Cmd::none()
            }
            (msg, phase) => {
                tracing::warn!(target: "limbo.game", ?msg, ?phase, "unexpected message");
                Cmd::none()
            }
        }
    }

    fn shuffle_step(&mut self) -> Cmd {
        if self.shuffles >= self.config.shuffle_budget {
            return self.finalize();
        }

        let pattern = Pattern::draw(&mut self.rng);
        let (next, moves) = pattern.apply(&self.table);
        debug_assert!(next.is_permutation_of(&self.grid));
        self.table = next;
        self.patterns.push(pattern);
        self.shuffles += 1;
        self.enter(Phase::Shuffling(self.shuffles));

        tracing::debug!(
            target: "limbo.game",
            shuffle = self.shuffles,
            %pattern,
            "pattern applied"
        );

        let duration = pattern.duration();
        let steps = self.config.animation_steps;
        let mut cmds: Vec<Cmd> = moves
            .into_iter()
            .map(|m| mover::animate(m.surface, m.from, m.to, duration, steps))
            .collect();
        cmds.push(Cmd::after(self.config.shuffle_interval(), Msg::ShuffleStep));
        Cmd::batch(cmds)
    }

    fn finalize(&mut self) -> Cmd {
        self.enter(Phase::Finalizing);

        let mut palette = PALETTE;
        palette.shuffle(&mut self.rng);
        self.table.reset(self.grid);

        let mut cmds = Vec::with_capacity(KEY_COUNT * 2);
        for id in SurfaceId::all() {
            cmds.push(self.paint(id, palette[id.index()]));
        }
        for (id, position) in self.table.iter() {
            self.surfaces[id.index()].position = position;
            cmds.push(Cmd::Place {
                surface: id,
                position,
            });
        }

        self.input_enabled = true;
        self.enter(Phase::Ready);
        tracing::info!(
            target: "limbo.game",
            shuffles = self.shuffles,
            "shuffle finished, input enabled"
        );
        Cmd::batch(cmds)
    }

    fn resolve(&mut self, clicked: SurfaceId) -> Cmd {
        let outcome = if clicked == self.highlight {
            Outcome::Win
        } else {
            Outcome::Lose
        };
        self.enter(Phase::Over(outcome));
        tracing::info!(
            target: "limbo.game",
            %clicked,
            highlight = %self.highlight,
            %outcome,
            "click resolved"
        );

        let mut cmds = Vec::with_capacity(KEY_COUNT + 2);
        cmds.push(match outcome {
            Outcome::Win => Cmd::NotifyWin,
            Outcome::Lose => Cmd::Punish(self.config.shutdown_delay),
        });
        cmds.extend(SurfaceId::all().map(Cmd::Destroy));
        cmds.push(Cmd::Quit);
        Cmd::batch(cmds)
    }

    fn paint(&mut self, surface: SurfaceId, color: Rgb) -> Cmd {
        self.surfaces[surface.index()].color = color;
        Cmd::Paint { surface, color }
    }

    fn enter(&mut self, phase: Phase) {
        tracing::trace!(target: "limbo.game", from = ?self.phase, to = ?phase, "transition");
        self.phase = phase;
        self.trail.push(phase);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::collections::HashSet;
    use std::time::Duration;

    const SCREEN: Size = Size::new(1920, 1080);

    fn game_with(config: GameConfig, highlight: usize, seed: u64) -> Game {
        Game::with_highlight(
            config,
            SCREEN,
            StdRng::seed_from_u64(seed),
            SurfaceId(highlight),
        )
    }

    fn game(highlight: usize) -> Game {
        game_with(GameConfig::default(), highlight, 1)
    }

    /// Flatten a command tree into its leaves.
    fn leaves(cmd: Cmd) -> Vec<Cmd> {
        match cmd {
            Cmd::Batch(cmds) => cmds.into_iter().flat_map(leaves).collect(),
            Cmd::None => Vec::new(),
            other => vec![other],
        }
    }

    fn delayed(cmds: &[Cmd]) -> Vec<(Duration, Msg)> {
        cmds.iter()
            .filter_map(|c| match c {
                Cmd::After(d, m) => Some((*d, *m)),
                _ => None,
            })
            .collect()
    }

    /// Drive the game to `Ready` without a clock.
    fn drive_to_ready(g: &mut Game) {
        g.init();
        g.update(Msg::HighlightOn);
        g.update(Msg::HighlightOff);
        g.update(Msg::StartShuffle);
        while g.phase() != Phase::Ready {
            g.update(Msg::ShuffleStep);
        }
    }

    // ── Startup ────────────────────────────────────────────────────────

    #[test]
    fn init_creates_every_key_neutral() {
        let mut g = game(3);
        let cmds = leaves(g.init());
        let created: Vec<_> = cmds
            .iter()
            .filter_map(|c| match c {
                Cmd::Create {
                    surface,
                    size,
                    position,
                    color,
                } => Some((*surface, *size, *position, *color)),
                _ => None,
            })
            .collect();
        assert_eq!(created.len(), KEY_COUNT);
        for (i, (id, size, pos, color)) in created.into_iter().enumerate() {
            assert_eq!(id, SurfaceId(i));
            assert_eq!(size, 100);
            assert_eq!(pos, g.grid()[i]);
            assert_eq!(color, NEUTRAL);
        }
        assert_eq!(
            delayed(&cmds),
            vec![(Duration::from_millis(500), Msg::HighlightOn)]
        );
        assert_eq!(g.phase(), Phase::Highlighting);
    }

    #[test]
    fn init_twice_is_ignored() {
        let mut g = game(0);
        g.init();
        assert!(matches!(g.init(), Cmd::None));
    }

    #[test]
    fn new_draws_highlight_in_range() {
        for seed in 0..64 {
            let g = Game::new(GameConfig::default(), SCREEN, StdRng::seed_from_u64(seed));
            assert!(g.highlight().index() < KEY_COUNT);
        }
    }

    // ── Highlight ──────────────────────────────────────────────────────

    #[test]
    fn highlight_flashes_then_clears() {
        let mut g = game(5);
        g.init();

        let on = leaves(g.update(Msg::HighlightOn));
        assert!(on.iter().any(|c| matches!(
            c,
            Cmd::Paint { surface: SurfaceId(5), color } if *color == HIGHLIGHT
        )));
        assert_eq!(g.surfaces()[5].color, HIGHLIGHT);
        assert_eq!(
            delayed(&on),
            vec![(Duration::from_millis(500), Msg::HighlightOff)]
        );

        let off = leaves(g.update(Msg::HighlightOff));
        assert!(off.iter().any(|c| matches!(
            c,
            Cmd::Paint { surface: SurfaceId(5), color } if *color == NEUTRAL
        )));
        assert_eq!(g.phase(), Phase::WaitingToShuffle);
        assert_eq!(delayed(&off), vec![(Duration::ZERO, Msg::StartShuffle)]);
    }

    #[test]
    fn only_target_is_ever_highlighted() {
        let mut g = game(2);
        g.init();
        g.update(Msg::HighlightOn);
        let green: Vec<_> = g
            .surfaces()
            .iter()
            .filter(|s| s.color == HIGHLIGHT)
            .map(|s| s.id)
            .collect();
        assert_eq!(green, vec![SurfaceId(2)]);
    }

    // ── Shuffling ──────────────────────────────────────────────────────

    #[test]
    fn each_step_applies_one_pattern_and_rearms() {
        let mut g = game(0);
        g.init();
        g.update(Msg::HighlightOn);
        g.update(Msg::HighlightOff);
        let cmds = leaves(g.update(Msg::StartShuffle));

        assert_eq!(g.shuffles(), 1);
        assert_eq!(g.phase(), Phase::Shuffling(1));
        let rearm: Vec<_> = delayed(&cmds)
            .into_iter()
            .filter(|(_, m)| *m == Msg::ShuffleStep)
            .collect();
        assert_eq!(rearm, vec![(Duration::from_millis(360), Msg::ShuffleStep)]);

        let frames = delayed(&cmds)
            .into_iter()
            .filter(|(_, m)| matches!(m, Msg::Frame { .. }))
            .count();
        let moved = match g.patterns()[0] {
            Pattern::CrossColumn { .. } => 2,
            _ => KEY_COUNT,
        };
        assert_eq!(frames, moved * 21);
    }

    #[test]
    fn table_stays_a_permutation() {
        let mut g = game(0);
        g.init();
        g.update(Msg::HighlightOn);
        g.update(Msg::HighlightOff);
        g.update(Msg::StartShuffle);
        while matches!(g.phase(), Phase::Shuffling(_)) {
            assert!(g.table().is_permutation_of(g.grid()));
            g.update(Msg::ShuffleStep);
        }
    }

    #[test]
    fn budget_is_spent_exactly() {
        for seed in 0..16 {
            let mut g = game_with(GameConfig::default(), 0, seed);
            drive_to_ready(&mut g);
            assert_eq!(g.shuffles(), 32);
            assert_eq!(g.patterns().len(), 32);
            let finalizing = g
                .phase_trail()
                .iter()
                .filter(|p| **p == Phase::Finalizing)
                .count();
            assert_eq!(finalizing, 1, "seed {seed}");
        }
    }

    #[test]
    fn frames_update_displayed_position() {
        let mut g = game(0);
        g.init();
        let target = Position::new(1, 2);
        let cmd = g.update(Msg::Frame {
            surface: SurfaceId(4),
            position: target,
        });
        assert!(matches!(
            cmd,
            Cmd::Place { surface: SurfaceId(4), position } if position == target
        ));
        assert_eq!(g.surfaces()[4].position, target);
    }

    #[test]
    fn out_of_order_timer_is_ignored() {
        let mut g = game(0);
        g.init();
        assert!(matches!(g.update(Msg::ShuffleStep), Cmd::None));
        assert!(matches!(g.update(Msg::StartShuffle), Cmd::None));
        assert_eq!(g.phase(), Phase::Highlighting);
    }

    // ── Finalization ───────────────────────────────────────────────────

    #[test]
    fn finalize_reveals_permuted_palette() {
        let mut g = game(1);
        drive_to_ready(&mut g);
        let colors: HashSet<_> = g.surfaces().iter().map(|s| s.color).collect();
        let palette: HashSet<_> = PALETTE.iter().copied().collect();
        assert_eq!(colors, palette);
    }

    #[test]
    fn finalize_restores_grid_without_animation() {
        let mut g = game(1);
        g.init();
        g.update(Msg::HighlightOn);
        g.update(Msg::HighlightOff);
        g.update(Msg::StartShuffle);
        let mut last = Cmd::None;
        while g.phase() != Phase::Ready {
            last = g.update(Msg::ShuffleStep);
        }
        let cmds = leaves(last);
        assert!(delayed(&cmds).is_empty());
        let placed: Vec<_> = cmds
            .iter()
            .filter_map(|c| match c {
                Cmd::Place { surface, position } => Some((*surface, *position)),
                _ => None,
            })
            .collect();
        let expected: Vec<_> = SurfaceId::all().map(|id| (id, g.grid()[id.index()])).collect();
        assert_eq!(placed, expected);
        assert_eq!(*g.table(), PositionTable::canonical(*g.grid()));
        assert!(g.input_enabled());
    }

    #[test]
    fn zero_budget_still_finalizes() {
        let config = GameConfig {
            shuffle_budget: 0,
            ..GameConfig::default()
        };
        let mut g = game_with(config, 4, 9);
        g.init();
        g.update(Msg::HighlightOn);
        g.update(Msg::HighlightOff);
        g.update(Msg::StartShuffle);
        assert_eq!(g.phase(), Phase::Ready);
        assert_eq!(g.shuffles(), 0);
        assert!(g.input_enabled());
        assert!(g.patterns().is_empty());
    }

    // ── Input gate ─────────────────────────────────────────────────────

    #[test]
    fn clicks_before_ready_are_noops() {
        let mut g = game(3);
        for id in SurfaceId::all() {
            assert!(matches!(g.update(Msg::Click(id)), Cmd::None));
        }
        g.init();
        g.update(Msg::HighlightOn);
        for id in SurfaceId::all() {
            assert!(matches!(g.update(Msg::Click(id)), Cmd::None));
        }
        g.update(Msg::HighlightOff);
        g.update(Msg::StartShuffle);
        for id in SurfaceId::all() {
            assert!(matches!(g.update(Msg::Click(id)), Cmd::None));
        }
        assert!(!g.input_enabled());
        assert_eq!(g.outcome(), None);
    }

    #[test]
    fn correct_click_wins() {
        let mut g = game(3);
        drive_to_ready(&mut g);
        let cmds = leaves(g.update(Msg::Click(SurfaceId(3))));
        assert_eq!(g.outcome(), Some(Outcome::Win));
        assert!(matches!(cmds.first(), Some(Cmd::NotifyWin)));
        let destroyed = cmds.iter().filter(|c| matches!(c, Cmd::Destroy(_))).count();
        assert_eq!(destroyed, KEY_COUNT);
        assert!(matches!(cmds.last(), Some(Cmd::Quit)));
    }

    #[test]
    fn wrong_click_loses_and_punishes_once() {
        let mut g = game(3);
        drive_to_ready(&mut g);
        let cmds = leaves(g.update(Msg::Click(SurfaceId(6))));
        assert_eq!(g.outcome(), Some(Outcome::Lose));
        let punish: Vec<_> = cmds
            .iter()
            .filter_map(|c| match c {
                Cmd::Punish(d) => Some(*d),
                _ => None,
            })
            .collect();
        assert_eq!(punish, vec![Duration::from_secs(3)]);
        assert!(!cmds.iter().any(|c| matches!(c, Cmd::NotifyWin)));
    }

    #[test]
    fn second_click_is_ignored() {
        let mut g = game(3);
        drive_to_ready(&mut g);
        g.update(Msg::Click(SurfaceId(3)));
        assert!(matches!(g.update(Msg::Click(SurfaceId(0))), Cmd::None));
        assert_eq!(g.outcome(), Some(Outcome::Win));
    }

    #[test]
    fn full_trail() {
        let config = GameConfig {
            shuffle_budget: 2,
            ..GameConfig::default()
        };
        let mut g = game_with(config, 0, 3);
        drive_to_ready(&mut g);
        g.update(Msg::Click(SurfaceId(1)));
        assert_eq!(
            g.phase_trail(),
            &[
                Phase::Idle,
                Phase::Highlighting,
                Phase::WaitingToShuffle,
                Phase::Shuffling(0),
                Phase::Shuffling(1),
                Phase::Shuffling(2),
                Phase::Finalizing,
                Phase::Ready,
                Phase::Over(Outcome::Lose),
            ]
        );
    }
}
