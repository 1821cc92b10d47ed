use anyhow::{Context, Result};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use log::LevelFilter;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use rochambeau::{
    app_dirs::AppDirs,
    config::{ConfigStore, FileConfigStore, GameConfig},
    hand_source::{HandSource, Pose, PoseSource, ReplaySource},
    logging,
    runtime::{CrosstermEventSource, FixedTicker, GameEvent, GameEventSource, Runner, Ticker},
    ui::Overlay,
    HandLandmarks, RoundEngine,
};
use std::{
    io::{self, stdin},
    path::PathBuf,
    time::Instant,
};

/// rock paper scissors against the computer, played with hand gestures
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Rock paper scissors against the computer. Every round counts down from three, then reads the shape of your hand from hand-skeleton landmarks and resolves against a random computer move."
)]
pub struct Cli {
    /// replay recorded hand landmarks (JSON Lines, one frame per line) instead of the keyboard-held pose
    #[clap(short = 'r', long)]
    replay: Option<PathBuf>,

    /// config file to load (defaults to the platform config directory)
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// length of the countdown before each round, in seconds
    #[clap(long)]
    countdown_secs: Option<u64>,

    /// time between the starts of consecutive rounds, in seconds
    #[clap(long)]
    round_interval_secs: Option<u64>,

    /// how long a round result stays on screen, in seconds
    #[clap(long)]
    result_display_secs: Option<u64>,

    /// margin a fingertip must clear above its knuckle to count as extended
    #[clap(short = 't', long)]
    threshold: Option<f32>,

    /// time between processed frames, in milliseconds
    #[clap(long)]
    frame_interval_ms: Option<u64>,

    /// write the effective settings to the config file and exit
    #[clap(long)]
    save_config: bool,

    /// log file (defaults to the platform state directory)
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// log per-frame finger states
    #[clap(short = 'v', long)]
    verbose: bool,
}

impl Cli {
    /// Command line flags win over the config file
    fn apply(&self, cfg: &mut GameConfig) {
        if let Some(v) = self.countdown_secs {
            cfg.countdown_secs = v;
        }
        if let Some(v) = self.round_interval_secs {
            cfg.round_interval_secs = v;
        }
        if let Some(v) = self.result_display_secs {
            cfg.result_display_secs = v;
        }
        if let Some(v) = self.threshold {
            cfg.extension_threshold = v;
        }
        if let Some(v) = self.frame_interval_ms {
            cfg.frame_interval_ms = v;
        }
    }
}

/// Where the hands of each frame come from
enum Hands {
    Keyboard(PoseSource),
    Replay { source: ReplaySource, name: String },
}

impl Hands {
    fn next_frame(&mut self) -> Vec<HandLandmarks> {
        match self {
            Hands::Keyboard(source) => source.next_frame(),
            Hands::Replay { source, .. } => source.next_frame(),
        }
    }

    fn on_key(&mut self, code: KeyCode) {
        if let Hands::Keyboard(source) = self {
            match code {
                KeyCode::Char('r') => source.set_pose(Some(Pose::Fist)),
                KeyCode::Char('p') => source.set_pose(Some(Pose::Flat)),
                KeyCode::Char('x') => source.set_pose(Some(Pose::Vee)),
                KeyCode::Char('i') => source.set_pose(Some(Pose::Point)),
                KeyCode::Char('h') => source.set_pose(None),
                _ => {}
            }
        }
    }

    fn label(&self) -> String {
        match self {
            Hands::Keyboard(source) => format!(
                "Hand: {} (r fist, p flat, x vee, i point, h hide)",
                source.pose().map_or("none".to_string(), |p| p.to_string())
            ),
            Hands::Replay { source, name } => {
                format!("Replaying {} ({} frames)", name, source.len())
            }
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let store = cli
        .config
        .as_ref()
        .map(FileConfigStore::with_path)
        .unwrap_or_default();
    let mut config = store.load();
    cli.apply(&mut config);

    if cli.save_config {
        store
            .save(&config)
            .with_context(|| format!("saving config to {}", store.path().display()))?;
        println!("saved settings to {}", store.path().display());
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let log_path = cli
        .log_file
        .clone()
        .or_else(AppDirs::log_path)
        .unwrap_or_else(|| PathBuf::from("rochambeau.log"));
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    logging::init(&log_path, level)?;
    log::info!("settings: {:?}", config);

    let mut hands = match &cli.replay {
        Some(path) => Hands::Replay {
            source: ReplaySource::load(path)?,
            name: path.display().to_string(),
        },
        None => Hands::Keyboard(PoseSource::default()),
    };

    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(config.frame_interval()),
    );
    let mut engine = RoundEngine::new(config);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = play(&mut terminal, &runner, &mut engine, &mut hands);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

/// One loop iteration per camera frame: take at most one key, then tick the
/// engine with the first hand of the frame and redraw.
fn play<B: Backend, E: GameEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    runner: &Runner<E, T>,
    engine: &mut RoundEngine,
    hands: &mut Hands,
) -> Result<()> {
    loop {
        if let GameEvent::Key(key) = runner.step() {
            match key.code {
                KeyCode::Esc | KeyCode::Char('q') => break,
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
                KeyCode::Char('s') => engine.toggle(Instant::now()),
                code => hands.on_key(code),
            }
        }

        let frame = hands.next_frame();
        let model = engine.tick(Instant::now(), frame.first());
        let overlay = Overlay::new(model, hands.label());
        terminal.draw(|f| f.render_widget(&overlay, f.area()))?;
    }

    log::info!("quit");
    Ok(())
}
