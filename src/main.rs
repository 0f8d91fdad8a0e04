//! Terminal quiz runner (default binary).
//!
//! Loads configuration, fetches a question set, then runs a fixed-timestep
//! loop: poll input, tick the session, draw. Finished sessions are reported
//! once.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use tokio::runtime::Runtime;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use eco_quiz::backend::{
    HttpBackend, MemoryBackend, QuestionSource, QuizBackend, QuizConfig, SessionController,
};
use eco_quiz::core::{Randomizer, SessionSnapshot};
use eco_quiz::input::{handle_key_event, should_quit};
use eco_quiz::term::{FrameBuffer, QuizView, TerminalRenderer, Viewport};
use eco_quiz::types::{QuizAction, TICK_MS};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = QuizConfig::from_env();
    let _guard = init_logging(&config);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build async runtime")?;

    let backend = rt.block_on(open_backend(&config.source))?;
    let randomizer = match config.seed {
        Some(seed) => Randomizer::new(seed),
        None => Randomizer::from_entropy(),
    };
    let mut controller = SessionController::new(backend, randomizer);
    rt.block_on(controller.start(config.kind.clone()))
        .with_context(|| format!("could not start a quiz for `{}`", config.kind.category()))?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &rt, &mut controller);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

/// File logging only; the terminal is in raw mode while the quiz runs.
fn init_logging(config: &QuizConfig) -> WorkerGuard {
    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "eco-quiz.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let env_filter =
        EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();
    guard
}

async fn open_backend(source: &QuestionSource) -> Result<Arc<dyn QuizBackend>> {
    let backend: Arc<dyn QuizBackend> = match source {
        QuestionSource::Http(cfg) => {
            info!(base = %cfg.base_url, "using HTTP backend");
            Arc::new(HttpBackend::new(cfg.clone()).context("failed to build HTTP client")?)
        }
        QuestionSource::File(path) => Arc::new(
            MemoryBackend::from_file(path)
                .await
                .with_context(|| format!("failed to load questions from {}", path.display()))?,
        ),
    };
    Ok(backend)
}

enum Flow {
    Continue,
    Quit,
}

fn run(
    term: &mut TerminalRenderer,
    rt: &Runtime,
    controller: &mut SessionController,
) -> Result<()> {
    let view = QuizView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut snap = SessionSnapshot::default();

    let tick_duration = Duration::from_millis(TICK_MS as u64);
    let mut last_tick = Instant::now();

    loop {
        // Render.
        match controller.session() {
            Some(session) => session.snapshot_into(&mut snap),
            None => return Ok(()),
        }
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(&snap, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        if let Some(session) = controller.session_mut() {
                            session.abort();
                        }
                        return Ok(());
                    }
                    if let Some(action) = handle_key_event(key) {
                        if let Flow::Quit = apply(rt, controller, action) {
                            return Ok(());
                        }
                    }
                }
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        // Tick with the real elapsed time so the session clock tracks the wall clock.
        let elapsed = last_tick.elapsed();
        if elapsed >= tick_duration {
            last_tick = Instant::now();
            let ms = elapsed.as_millis().min(u32::MAX as u128) as u32;
            let ended = match controller.session_mut() {
                Some(session) => {
                    session.tick(ms);
                    session.ended()
                }
                None => false,
            };
            if ended {
                rt.block_on(controller.report());
            }
        }
    }
}

fn apply(rt: &Runtime, controller: &mut SessionController, action: QuizAction) -> Flow {
    let Some(session) = controller.session_mut() else {
        return Flow::Quit;
    };

    if !session.ended() {
        session.apply_action(action);
        return Flow::Continue;
    }

    match action {
        QuizAction::Exit | QuizAction::ConfirmExit => Flow::Quit,
        QuizAction::Replay => {
            // Report before the finished session is replaced.
            rt.block_on(controller.report());
            if let Err(err) = rt.block_on(controller.replay()) {
                warn!(%err, "replay failed");
            }
            Flow::Continue
        }
        _ => Flow::Continue,
    }
}
