pub mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyModifiers, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use klear::{
    config::{ConfigStore, FileConfigStore},
    runtime::{CrosstermEventSource, FixedTicker, GameEvent, Runner},
    telemetry, BoardSize, ClickOutcome, Game, GameConfig,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::Duration,
};

const TICK_RATE_MS: u64 = 50;
const MAX_POINTS_DIGITS: usize = 4;

/// clear the numbered points in order before they fade
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal reaction game: numbered points appear on the board and must be clicked in ascending order. One wrong click ends the round."
)]
pub struct Cli {
    /// number of points in a round (also the value restored by restart)
    #[clap(short = 'p', long)]
    points: Option<u32>,

    /// enable auto play for the first round
    #[clap(long)]
    auto_play: bool,

    /// seed for point placement
    #[clap(long)]
    seed: Option<u64>,

    /// play one auto-played round without a terminal and print the final state as JSON
    #[clap(long)]
    headless: bool,

    /// board size for headless mode, as WIDTHxHEIGHT
    #[clap(long, default_value = "800x600", value_parser = parse_board)]
    board: BoardSize,

    /// save the effective settings as the new defaults
    #[clap(long)]
    save_config: bool,
}

fn parse_board(s: &str) -> Result<BoardSize, String> {
    BoardSize::parse(s).ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))
}

fn new_game(config: GameConfig, seed: Option<u64>) -> Game {
    match seed {
        Some(seed) => Game::with_seed(config, seed),
        None => Game::new(config),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct App {
    pub game: Game,
    /// Text of the points field; empty means no value
    pub points_input: String,
    pub status: Option<String>,
}

impl App {
    pub fn new(cli: &Cli, config: GameConfig) -> Self {
        let mut game = new_game(config, cli.seed);
        if cli.auto_play {
            game.toggle_auto_play();
        }

        let mut app = Self {
            game,
            points_input: String::new(),
            status: None,
        };
        app.sync_points_input();
        app
    }

    fn sync_points_input(&mut self) {
        self.points_input = self
            .game
            .point_count()
            .map(|n| n.to_string())
            .unwrap_or_default();
    }

    /// The Start/Restart button
    pub fn start_or_restart(&mut self, board: BoardSize) {
        if self.game.is_playing() {
            self.game.restart_game();
            self.sync_points_input();
            self.status = None;
            return;
        }

        match self.game.start_game(board) {
            Ok(()) => self.status = None,
            Err(err) => self.status = Some(err.to_string()),
        }
    }

    fn edit_points(&mut self, edit: impl FnOnce(&mut String)) {
        edit(&mut self.points_input);
        self.game.set_point_count(self.points_input.parse().ok());
        self.status = None;
    }

    pub fn on_key(&mut self, key: KeyEvent, board: BoardSize) -> Control {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Control::Quit,
            // ctrl+c to quit
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Control::Quit
            }
            KeyCode::Char('s') | KeyCode::Enter => self.start_or_restart(board),
            // the auto play button only exists during a round
            KeyCode::Char('a') if self.game.is_playing() => self.game.toggle_auto_play(),
            KeyCode::Char(c) if c.is_ascii_digit() && !self.game.is_playing() => {
                if self.points_input.len() < MAX_POINTS_DIGITS {
                    self.edit_points(|input| input.push(c));
                }
            }
            KeyCode::Backspace if !self.game.is_playing() => {
                self.edit_points(|input| {
                    input.pop();
                });
            }
            _ => {}
        }
        Control::Continue
    }

    pub fn on_mouse(&mut self, mouse: MouseEvent, board: Rect) -> Option<ClickOutcome> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return None;
        }
        let point = ui::cell_to_board(board, mouse.column, mouse.row)?;
        let index = self.game.node_at(point)?;
        Some(self.game.click_node(index))
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let store = FileConfigStore::new();
    let mut config = store.load();
    if let Some(points) = cli.points {
        config.default_points = points;
    }
    if cli.save_config {
        store.save(&config)?;
    }

    if cli.headless {
        telemetry::init_stderr();
        let snapshot = run_headless(&cli, (&config).into())?;
        println!("{}", serde_json::to_string(&snapshot)?);
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(path) = telemetry::default_log_path() {
        telemetry::init_file(&path)?;
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&cli, (&config).into());
    let res = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    res
}

/// Virtual time an auto-played round may take: one interval per point plus one
fn headless_budget(config: &GameConfig) -> Duration {
    config
        .auto_play_interval
        .checked_mul(config.default_points.saturating_add(1))
        .unwrap_or(Duration::MAX)
}

/// One auto-played round on a virtual clock
fn run_headless(cli: &Cli, config: GameConfig) -> Result<klear::GameSnapshot, Box<dyn Error>> {
    let budget = headless_budget(&config);
    let mut game = new_game(config, cli.seed);

    game.start_game(cli.board)?;
    if !game.auto_play_enabled() {
        game.toggle_auto_play();
    }

    let step = Duration::from_millis(TICK_RATE_MS);
    let mut clock = Duration::ZERO;
    while game.is_playing() && clock < budget {
        game.advance(step);
        clock += step;
    }

    Ok(game.snapshot())
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    loop {
        terminal.draw(|f| ui(app, f))?;

        let size = terminal.size()?;
        let board = ui::board_rect(Rect::new(0, 0, size.width, size.height));

        match runner.step() {
            GameEvent::Tick(dt) => app.game.advance(dt),
            GameEvent::Resize => {}
            GameEvent::Key(key) => {
                if app.on_key(key, ui::board_size(board)) == Control::Quit {
                    break;
                }
            }
            GameEvent::Mouse(mouse) => {
                app.on_mouse(mouse, board);
            }
        }
    }

    Ok(())
}

fn ui(app: &mut App, f: &mut Frame) {
    f.render_widget(&*app, f.area());
}
