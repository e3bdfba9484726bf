//! Road Racer entry point
//!
//! Native builds run a headless demo: the autopilot drives one run at a
//! fixed 60 fps, the result goes on the JSON leaderboard, and the top of
//! the board is printed. The web build is driven through the library.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Road Racer (native) starting...");

    if let Err(e) = headless::run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use rand::Rng;

    use road_racer::highscores::SHOWN_HIGH_SCORES;
    use road_racer::persistence::{JsonFileStore, LeaderboardStore};
    use road_racer::sim::{GameEvent, GamePhase};
    use road_racer::{Result, Session, Settings};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Demo runs end here even if the autopilot never crashes
    const MAX_RUN_MS: f64 = 120_000.0;

    pub fn run() -> Result<()> {
        let settings = match std::env::args().nth(1) {
            Some(path) => Settings::load_or_default(&PathBuf::from(path)),
            None => Settings::default(),
        };
        let seed = settings.seed.unwrap_or_else(|| rand::rng().random());

        let mut session = Session::new(&settings, seed);
        session.set_autopilot(true);

        let mut now = 0.0;
        session.start(now);
        let mut overtakes = 0usize;
        while session.phase() == GamePhase::Running && now < MAX_RUN_MS {
            now += FRAME_MS;
            for event in session.frame(now) {
                if matches!(event, GameEvent::Overtaken { .. }) {
                    overtakes += 1;
                }
            }
        }

        let snapshot = session.latest();
        log::info!(
            "Run finished after {:.1}s: score {}, {overtakes} overtakes, phase {:?}",
            now / 1000.0,
            snapshot.score,
            snapshot.phase
        );
        log::info!("Final snapshot: {}", serde_json::to_string(&*snapshot)?);

        let mut store = JsonFileStore::new(&settings.leaderboard_path);
        match session.save_score(&settings.display_name(), &mut store)? {
            Some(rank) => log::info!("Ranked #{rank} in {}", store.path().display()),
            None if session.phase() == GamePhase::GameOver => {
                log::info!("Score did not make the board")
            }
            // Only crashed runs are recorded
            None => log::info!("Run hit the time limit, not recorded"),
        }

        let board = store.load()?;
        println!("Score: {}", snapshot.score);
        println!("Top {SHOWN_HIGH_SCORES}:");
        for (rank, entry) in board.top(SHOWN_HIGH_SCORES).iter().enumerate() {
            println!("{:>2}. {:<12} {:>8}", rank + 1, entry.name, entry.score);
        }
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    if console_log::init_with_level(log::Level::Info).is_err() {
        return;
    }
    log::info!("Road Racer (web) ready");
}
