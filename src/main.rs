//! Headless demo host
//!
//! Drives the lane-catch game with a tiny autopilot for a couple of
//! simulated minutes, exercising the full run lifecycle including one
//! continue, then prints the funnel summary. Real hosts bring their own
//! surface, storage backing and frame clock.

use arcade_shell::config::GameConfig;
use arcade_shell::feedback::{NullAudio, NullHaptics};
use arcade_shell::games::{Key, LaneGame};
use arcade_shell::render::Canvas;
use arcade_shell::{Lane, MemoryStore, RunPhase, Shell};

const DT: f32 = 1.0 / 60.0;
const SIM_SECONDS: u32 = 150;

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(7);
    log::info!("headless demo starting (seed {seed})");

    let mut shell = Shell::new(
        LaneGame::new(seed),
        GameConfig::lane_catch(),
        Box::new(MemoryStore::new()),
        Box::new(NullAudio),
        Box::new(NullHaptics),
    )
    .expect("built-in config must validate");
    shell.set_viewport(400.0, 800.0);

    let mut canvas = Canvas::new();
    for _ in 0..(SIM_SECONDS * 60) {
        match shell.phase() {
            RunPhase::Ready => shell.start(),
            RunPhase::Playing => {
                if let Some(lane) = shell.module().nearest_threat() {
                    shell.key_down(match lane {
                        Lane::Left => Key::ArrowLeft,
                        Lane::Right => Key::ArrowRight,
                    });
                }
            }
            RunPhase::Dead => {
                if shell.continue_available() {
                    shell.continue_run();
                } else {
                    shell.restart();
                }
            }
            RunPhase::AdReady => shell.acknowledge_continue(),
            RunPhase::Paused | RunPhase::AdCountdown => {}
        }
        shell.frame(DT, &mut canvas);
    }

    let snapshot = shell.snapshot();
    let metrics = shell.metrics();
    let (offer_click, click_complete, offer_complete) = metrics.summary();
    println!(
        "demo over: best {} across {} runs",
        snapshot.best,
        shell.lifetime_runs()
    );
    println!(
        "continue funnel: offered {} clicked {} completed {} granted {}",
        metrics.continue_offered,
        metrics.continue_clicked,
        metrics.continue_completed,
        metrics.continue_granted
    );
    println!(
        "conversion: offer->click {offer_click:.0}% click->complete {click_complete:.0}% offer->complete {offer_complete:.0}%"
    );
}
