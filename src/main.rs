//! STACKFALL headless driver
//!
//! Plays the simulation with a seeded autopilot standing in for a human,
//! then prints the final board and a JSON summary. New best scores are
//! written back to the settings file the run was loaded from. Usage:
//!
//! ```text
//! stackfall [path/to/settings.toml]
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use stackfall::{Action, Board, Buttons, Game, HoldOutcome, InputLatch, Settings, StepEvents};
use std::collections::VecDeque;
use std::io;
use std::path::PathBuf;

/// Get the stackfall temp directory, creating it if needed
fn stackfall_temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join("stackfall");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

/// Button frames queued for the current piece
struct Autopilot {
    rng: ChaCha8Rng,
    script: VecDeque<Buttons>,
}

impl Autopilot {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            script: VecDeque::new(),
        }
    }

    /// Plan a placement for a freshly spawned piece
    fn plan(&mut self, can_hold: bool) {
        self.script.clear();
        let idle = Buttons::default();

        if can_hold && self.rng.gen_ratio(1, 8) {
            self.script.push_back(Buttons::from_actions(&[Action::Hold]));
            self.script.push_back(idle);
            return;
        }

        for _ in 0..self.rng.gen_range(0..4) {
            self.script.push_back(Buttons::from_actions(&[Action::RotateCW]));
            self.script.push_back(idle);
        }
        let shift: i32 = self.rng.gen_range(-5..=5);
        let action = if shift < 0 {
            Action::MoveLeft
        } else {
            Action::MoveRight
        };
        for _ in 0..shift.abs() {
            self.script.push_back(Buttons::from_actions(&[action]));
        }
        self.script.push_back(idle);
        if self.rng.gen_ratio(3, 4) {
            self.script.push_back(Buttons::from_actions(&[Action::HardDrop]));
        } else {
            // Ride it down with soft drop instead
            self.script.extend(std::iter::repeat_n(
                Buttons::from_actions(&[Action::SoftDrop]),
                40,
            ));
        }
    }

    fn next_buttons(&mut self) -> Buttons {
        self.script.pop_front().unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
struct GameSummary {
    steps: u64,
    simulated_ms: u64,
    pieces_locked: u64,
    holds: u64,
    score: u64,
    level: u32,
    lines: u32,
    topped_out: bool,
}

#[derive(Debug, Serialize)]
struct RunSummary {
    settings: Settings,
    games: Vec<GameSummary>,
}

/// Play until top-out or the step limit. Returns the summary and the board
/// as it stood when the game ended.
fn play_one(
    game: &mut Game,
    autopilot: &mut Autopilot,
    latch: &mut InputLatch,
    settings: &Settings,
) -> (GameSummary, Board) {
    let mut summary = GameSummary {
        steps: 0,
        simulated_ms: 0,
        pieces_locked: 0,
        holds: 0,
        score: 0,
        level: 0,
        lines: 0,
        topped_out: false,
    };

    game.start();
    latch.release_all();
    autopilot.plan(true);

    let mut final_board = game.board.clone();
    while summary.steps < settings.driver.max_steps {
        let frame = latch.frame(autopilot.next_buttons());
        // A top-out resets the session inside step(), so keep what it had
        let board_before = game.board.clone();
        let score_before = game.score.clone();
        let events: StepEvents = game.step(&frame);
        summary.steps += 1;

        if events.locked {
            summary.pieces_locked += 1;
        }
        if events.leveled_up {
            tracing::info!(
                level = game.score.level,
                rows_to_next = game.score.rows_to_next_level(),
                "Level up"
            );
        }
        if events.game_over {
            summary.topped_out = true;
            summary.score = game.last_score().unwrap_or(score_before.points);
            summary.lines = score_before.lines + events.lines_cleared as u32;
            summary.level = score_before.level + u32::from(events.leveled_up);
            final_board = board_before;
            break;
        }
        match events.hold {
            Some(outcome) if outcome != HoldOutcome::Rejected => {
                summary.holds += 1;
                autopilot.plan(false);
            }
            _ if events.locked => autopilot.plan(true),
            _ => {}
        }

        summary.score = game.score.points;
        summary.level = game.score.level;
        summary.lines = game.score.lines;
        final_board.clone_from(&game.board);
    }

    summary.simulated_ms = summary.steps * settings.driver.tick_ms;
    tracing::info!(
        "Game finished: score={} lines={} steps={} topped_out={}",
        summary.score,
        summary.lines,
        summary.steps,
        summary.topped_out
    );
    (summary, final_board)
}

fn main() -> io::Result<()> {
    // Generate session ID for this instance
    let session_id: u32 = rand::random();

    // Setup tracing to log file
    let log_dir = stackfall_temp_dir();
    let log_file = format!("{:08x}.log", session_id);
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("stackfall=debug"));
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(filter)
        .with_ansi(false)
        .init();

    tracing::info!(
        "STACKFALL starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    let settings_path = std::env::args_os().nth(1).map(PathBuf::from);
    let mut stored = match &settings_path {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };
    // Pin the seed so the printed summary can reproduce this run
    let mut settings = stored.clone();
    let seed = *settings.gameplay.seed.get_or_insert_with(rand::random);
    tracing::info!(?settings, "Settings loaded");

    let mut game = Game::new(settings.game_config(), settings.piece_source());
    let mut autopilot = Autopilot::new(seed ^ 0x5eed);
    let mut latch = InputLatch::new();

    let mut games = Vec::new();
    let mut last_board = game.board.clone();
    for _ in 0..settings.driver.games {
        let (summary, board) = play_one(&mut game, &mut autopilot, &mut latch, &settings);
        games.push(summary);
        last_board = board;
    }

    let improved = games
        .iter()
        .fold(false, |improved, g| stored.record(g.score, g.lines) || improved);
    if improved {
        tracing::info!(records = ?stored.records, "New records");
        let saved = match &settings_path {
            Some(path) => stored.save_to(path),
            None => stored.save(),
        };
        if let Err(e) = saved {
            tracing::warn!("Could not save records: {}", e);
            eprintln!("Warning: Could not save settings: {}", e);
        }
    }
    settings.records = stored.records;

    println!("{}", last_board);
    println!();
    let summary = RunSummary { settings, games };
    let json = serde_json::to_string_pretty(&summary).map_err(io::Error::other)?;
    println!("{}", json);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackfall::{Cell, GameConfig, ScriptedSource, TetrominoType};

    #[test]
    fn test_top_out_keeps_final_board_and_stats() {
        let settings = Settings::default();
        let mut game = Game::new(
            GameConfig::default(),
            Box::new(ScriptedSource::new([TetrominoType::O])),
        );
        // Stack everything below row 1, leaving column 0 open so no row clears
        for row in 2..24 {
            for col in 1..10 {
                game.board.set(col, row, Cell::Filled(1));
            }
        }
        let mut autopilot = Autopilot::new(1);
        let mut latch = InputLatch::new();

        let (summary, board) = play_one(&mut game, &mut autopilot, &mut latch, &settings);

        assert!(summary.topped_out);
        assert_eq!(summary.pieces_locked, 1);
        assert_eq!(summary.lines, 0);
        assert_eq!(Some(summary.score), game.last_score());
        assert!(game.board.is_empty());
        let filled = board.rows().flatten().filter(|cell| cell.is_filled()).count();
        assert_eq!(filled, 22 * 9 + 4);
    }
}
