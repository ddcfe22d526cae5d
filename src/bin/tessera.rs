use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use tessera_wm::common::collections::HashMap;
use tessera_wm::common::config::{Config, config_file};
use tessera_wm::common::log;
use tessera_wm::layout_engine::{
    Direction, FileLayouts, LayoutCommand, LayoutSource, NavigationEngine, StaticLayouts,
};
use tessera_wm::model::layout::LayoutDef;
use tessera_wm::sys::geometry::Rect;
use tessera_wm::sys::screen::{DisplaySystem, ScreenDescriptor, ScreenId, VirtualScreens};
use tessera_wm::sys::window::{VirtualWindow, VirtualWindows, WindowId, WindowSystem};
use tessera_wm::ui::boundary::extract_boundary;
use tessera_wm::ui::overlay::render_plan;

#[derive(Parser)]
#[command(version, about = "Directional tiling and layout geometry")]
struct Cli {
    /// Path to configuration file to use (overrides default).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Check the configuration file and exit.
    #[arg(long)]
    validate: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the outline of a rectangle with another one cut out, as JSON.
    Boundary {
        /// Rectangle as X,Y,WIDTH,HEIGHT.
        #[arg(long, value_parser = parse_rect, allow_hyphen_values = true)]
        rect: Rect,
        /// Rectangle to cut out, as X,Y,WIDTH,HEIGHT.
        #[arg(long, value_parser = parse_rect, allow_hyphen_values = true)]
        exclude: Option<Rect>,
    },
    /// Move the scenario's window and print the outcome as JSON.
    Navigate {
        #[arg(long, value_name = "FILE")]
        scenario: PathBuf,
        #[arg(long, value_parser = parse_direction)]
        direction: Direction,
        /// Grow the window over the neighbouring tile instead of moving it.
        #[arg(long)]
        span: bool,
    },
    /// Print the computed layout tree of a display.
    Tree {
        #[arg(long, value_name = "FILE")]
        scenario: PathBuf,
        #[arg(long, default_value_t = 0)]
        display: usize,
    },
    /// Print the shapes that would be drawn for a display's layout, as JSON.
    Overlay {
        #[arg(long, value_name = "FILE")]
        scenario: PathBuf,
        #[arg(long, default_value_t = 0)]
        display: usize,
    },
}

/// A set of displays, one window on them, and optionally the stored layouts.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Scenario {
    screens: Vec<ScreenDescriptor>,
    #[serde(default)]
    window: Option<VirtualWindow>,
    /// Layouts by display index. When absent, the configured layouts file is
    /// used.
    #[serde(default)]
    layouts: Option<HashMap<usize, LayoutDef>>,
}

const WINDOW: WindowId = WindowId::new(1);

impl Scenario {
    fn read(path: &Path) -> anyhow::Result<Scenario> {
        let buf = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        ron::from_str(&buf).with_context(|| format!("parsing {}", path.display()))
    }

    fn screens(&self) -> VirtualScreens { VirtualScreens::new(self.screens.clone()) }

    fn windows(&self) -> VirtualWindows {
        let mut windows =
            VirtualWindows::new(self.screens.iter().map(|s| (s.id, s.frame)).collect());
        if let Some(window) = &self.window {
            windows.add_window(WINDOW, window.clone());
            windows.focus(Some(WINDOW));
        }
        windows
    }

    fn engine(&self, config: &Config) -> NavigationEngine {
        let fallback = config.settings.default_layout.grid();
        let source = match &self.layouts {
            Some(layouts) => LayoutSource::new(
                layouts.iter().map(|(&i, def)| (ScreenId::new(i), def.clone())).collect::<StaticLayouts>(),
                fallback,
            ),
            None => LayoutSource::new(FileLayouts::new(config.settings.layouts_path()), fallback),
        };
        NavigationEngine::new(source, config.settings.navigation.clone())
    }
}

fn parse_rect(s: &str) -> anyhow::Result<Rect> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<f64>().with_context(|| format!("invalid number {p:?}")))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let [x, y, width, height] = parts[..] else {
        bail!("expected X,Y,WIDTH,HEIGHT, got {s:?}");
    };
    Ok(Rect::new(x, y, width, height))
}

fn parse_direction(s: &str) -> Result<Direction, String> {
    s.parse().map_err(|_| format!("expected one of left, right, up, down, got {s:?}"))
}

fn main() {
    sigpipe::reset();
    let opt = Cli::parse();
    log::init_logging();

    let config_path = opt.config.clone().unwrap_or_else(config_file);

    if opt.validate {
        let config = match Config::read(&config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}: {e:#}", config_path.display());
                process::exit(1);
            }
        };
        let issues = config.validate();
        if issues.is_empty() {
            println!("Config validation passed");
        } else {
            for issue in issues {
                eprintln!("{}", issue);
            }
            process::exit(1);
        }
        return;
    }

    let config = match Config::read_or_default(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {e:#}", config_path.display());
            process::exit(1);
        }
    };

    let Some(command) = opt.command else {
        eprintln!("No command given, see --help");
        process::exit(2);
    };

    if let Err(e) = run(command, &config) {
        eprintln!("{e:#}");
        process::exit(1);
    }
}

fn run(command: Commands, config: &Config) -> anyhow::Result<()> {
    match command {
        Commands::Boundary { rect, exclude } => {
            let polygon = extract_boundary(&rect, exclude.as_ref());
            println!("{}", serde_json::to_string(&polygon)?);
        }
        Commands::Navigate { scenario, direction, span } => {
            let scenario = Scenario::read(&scenario)?;
            let screens = scenario.screens();
            let mut windows = scenario.windows();
            let mut engine = scenario.engine(config);
            let command = if span {
                LayoutCommand::SpanWindow(direction)
            } else {
                LayoutCommand::MoveWindow(direction)
            };
            let response = engine.handle_command(&mut windows, &screens, command);
            let output = serde_json::json!({
                "response": response,
                "frame": windows.frame(WINDOW),
                "display": windows.screen_of(WINDOW),
                "requests": windows.requests(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Tree { scenario, display } => {
            let scenario = Scenario::read(&scenario)?;
            let screens = scenario.screens();
            let Some(tree) = scenario.engine(config).computed_tree(&screens, ScreenId::new(display)) else {
                bail!("no display {display}");
            };
            print!("{}", tree.draw_tree());
        }
        Commands::Overlay { scenario, display } => {
            let scenario = Scenario::read(&scenario)?;
            let screens = scenario.screens();
            let id = ScreenId::new(display);
            let (Some(frame), Some(tree)) =
                (screens.screen_frame(id), scenario.engine(config).computed_tree(&screens, id))
            else {
                bail!("no display {display}");
            };
            let shapes = render_plan(&tree, &frame, &config.settings.overlay);
            println!("{}", serde_json::to_string_pretty(&shapes)?);
        }
    }
    Ok(())
}
