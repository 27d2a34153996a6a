//! Orbit Flap headless host
//!
//! Runs the simulation at 90 Hz against a synthetic hand sensor, routes events
//! to audio and the scene table, and keeps settings and best scores on disk.
//!
//! Usage: orbit-flap [SAVE_FILE] [--seed N] [--seconds S] [--difficulty NAME]

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread::{self, JoinHandle};
    use std::time::{Duration, Instant};

    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use orbit_flap::audio::{AudioManager, LogBackend};
    use orbit_flap::consts::SIM_DT;
    use orbit_flap::persistence::{JsonFileStorage, Storage, load_or_default};
    use orbit_flap::platform::{FixedStepClock, InputEvent, InputSender, input_channel};
    use orbit_flap::scene::SceneTable;
    use orbit_flap::sim::{GameEvent, GameState, Hand, tick};
    use orbit_flap::{Difficulty, GestureConfig, WorldConfig};

    /// Command line options
    struct Args {
        save_path: PathBuf,
        seed: u64,
        seconds: f32,
        difficulty: Option<Difficulty>,
    }

    impl Args {
        fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, String> {
            let mut parsed = Args {
                save_path: PathBuf::from("orbit-flap-save.json"),
                seed: 0x5EED,
                seconds: 60.0,
                difficulty: None,
            };
            while let Some(arg) = args.next() {
                let mut value = |name: &str| args.next().ok_or(format!("{name} needs a value"));
                match arg.as_str() {
                    "--seed" => {
                        let v = value("--seed")?;
                        parsed.seed = v.parse().map_err(|_| format!("bad seed: {v}"))?;
                    }
                    "--seconds" => {
                        let v = value("--seconds")?;
                        parsed.seconds = v.parse().map_err(|_| format!("bad duration: {v}"))?;
                    }
                    "--difficulty" => {
                        let v = value("--difficulty")?;
                        parsed.difficulty = Some(
                            Difficulty::from_str(&v).ok_or(format!("unknown difficulty: {v}"))?,
                        );
                    }
                    flag if flag.starts_with("--") => return Err(format!("unknown option: {flag}")),
                    path => parsed.save_path = PathBuf::from(path),
                }
            }
            Ok(parsed)
        }
    }

    /// Fake wrist tracker: both hands rise slowly then drop sharply, once per period
    fn spawn_sensor(tx: InputSender, running: Arc<AtomicBool>, seed: u64) -> JoinHandle<()> {
        thread::spawn(move || {
            let mut rng = Pcg32::seed_from_u64(seed);
            let start = Instant::now();
            let period = 0.9;
            tx.send(InputEvent::Authorization(true));
            tx.send(InputEvent::HeadHeight(1.7));

            while running.load(Ordering::Relaxed) {
                let t = start.elapsed().as_secs_f64();
                let phase = (t % period) / period;
                let base: f64 = if phase < 0.75 {
                    1.0 + 0.3 * (phase / 0.75)
                } else {
                    1.3 - 0.3 * ((phase - 0.75) / 0.25)
                };
                let base = base as f32;
                for hand in Hand::BOTH {
                    let jitter = rng.random_range(-0.002..0.002);
                    if !tx.hand(hand, base + jitter, t) {
                        return;
                    }
                }
                thread::sleep(Duration::from_secs_f32(SIM_DT));
            }
        })
    }

    fn persist(storage: &mut JsonFileStorage, state: &GameState) {
        if let Err(err) = storage.save(&state.save_data()) {
            log::warn!("Failed to save to {}: {err}", storage.path().display());
        }
    }

    pub fn run() {
        env_logger::init();
        log::info!("Orbit Flap (headless) starting...");

        let args = match Args::parse(std::env::args().skip(1)) {
            Ok(args) => args,
            Err(msg) => {
                eprintln!("{msg}");
                eprintln!("usage: orbit-flap [SAVE_FILE] [--seed N] [--seconds S] [--difficulty NAME]");
                std::process::exit(2);
            }
        };

        let config = WorldConfig::default();
        let gesture = GestureConfig::default();
        if let Err(err) = gesture.validate() {
            log::error!("Invalid gesture configuration: {err}");
            std::process::exit(1);
        }

        let mut storage = JsonFileStorage::new(&args.save_path);
        let save = load_or_default(&storage);
        log::info!(
            "Loaded {} (difficulty {}, music {})",
            storage.path().display(),
            save.settings.difficulty.as_str(),
            if save.settings.music_enabled { "on" } else { "off" }
        );

        let mut state = match GameState::new(config.clone(), save, args.seed) {
            Ok(state) => state,
            Err(err) => {
                log::error!("Invalid world configuration: {err}");
                std::process::exit(1);
            }
        };
        let mut scene = SceneTable::new(&config, |slot| slot);
        let mut audio = AudioManager::new(LogBackend, args.seed.wrapping_add(1));
        let (tx, mut queue) = input_channel(gesture);
        log::info!("Game initialized with seed: {}", args.seed);

        let running = Arc::new(AtomicBool::new(true));
        let sensor = spawn_sensor(tx.clone(), running.clone(), args.seed.wrapping_add(2));

        if let Some(difficulty) = args.difficulty {
            tx.send(InputEvent::Difficulty(difficulty));
        }
        tx.send(InputEvent::Session(true));

        let mut clock = FixedStepClock::default();
        let start = Instant::now();
        let mut last = start;
        let mut rounds = 0u32;
        let run_for = Duration::from_secs_f32(args.seconds.max(0.0));

        loop {
            let finished = start.elapsed() >= run_for;
            if finished {
                // Abandon any running round before the final save
                tx.send(InputEvent::Interrupt);
                tx.send(InputEvent::Session(false));
            }

            let now = Instant::now();
            let frame_dt = (now - last).as_secs_f32();
            last = now;
            let steps = if finished { 1 } else { clock.advance(frame_dt) };

            for _ in 0..steps {
                let input = queue.poll();
                tick(&mut state, &input, clock.step());

                let mut dirty = false;
                for event in state.drain_events() {
                    scene.apply(&event);
                    match event {
                        GameEvent::Sound(sound) => audio.handle(sound),
                        GameEvent::Scored { score } => log::info!("Score: {score}"),
                        GameEvent::RoundOver { .. } => {
                            rounds += 1;
                            dirty = true;
                        }
                        GameEvent::SettingsChanged => dirty = true,
                        GameEvent::SensorStatus { denied: true } => {
                            log::warn!("Hand tracking required to play")
                        }
                        _ => {}
                    }
                }
                if dirty {
                    persist(&mut storage, &state);
                }
            }

            if finished {
                break;
            }
            thread::sleep(Duration::from_secs_f32(SIM_DT));
        }

        running.store(false, Ordering::Relaxed);
        if sensor.join().is_err() {
            log::warn!("Sensor thread panicked");
        }
        persist(&mut storage, &state);
        log::info!(
            "Stopped after {rounds} rounds, best on {}: {}",
            state.difficulty().as_str(),
            state.best()
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Headless host needs threads and a filesystem
}
