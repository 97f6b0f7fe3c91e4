//! Panoplot - plot a synthetic wave packet in the terminal.

use anyhow::{ensure, Result};
use clap::Parser;
use crossterm::{
    cursor::MoveTo,
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    style::Print,
    terminal::{self, disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use ndarray::{Array1, Array2};
use panoplot::backend::{shared, TerminalBackend, TerminalConfig, TerminalViewport};
use panoplot::data::{AxisKind, PlotDataAxis};
use panoplot::datasets::{GridDataset, Quantity, Timeline};
use panoplot::plots::{FigureConfig, StyleName};
use panoplot::plugins::{plot_grid_dataset, Explorer, PlotRequest};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "panoplot")]
#[command(about = "Plot a synthetic wave packet in the terminal", long_about = None)]
struct Args {
    /// Bundled style: light or dark
    #[arg(long, default_value = "dark")]
    style: StyleName,

    /// Style rc file, taking precedence over --style
    #[arg(long)]
    style_file: Option<PathBuf>,

    /// Number of frames in the time series
    #[arg(long, default_value_t = 24)]
    frames: usize,

    /// Write the figure to this file instead of opening the scrubber
    #[arg(long)]
    save: Option<PathBuf>,

    /// Resolution of the rendered figure
    #[arg(long, default_value_t = 150)]
    dpi: u32,

    /// Enable logging to specified file
    #[arg(long)]
    log: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging if --log option is provided
    if let Some(log_path) = &args.log {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_path)?;
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
        tracing::info!("Starting panoplot");
    }

    ensure!(args.frames > 0, "--frames must be at least 1");
    ensure!(args.dpi > 0, "--dpi must be positive");

    let series = wave_packet(args.frames)?;
    let request = PlotRequest {
        figure: FigureConfig {
            style: args.style,
            style_file: args.style_file.clone(),
            ..Default::default()
        },
        ..Default::default()
    };

    if let Some(path) = &args.save {
        let backend = shared(TerminalBackend::default());

        // First and last frame on one panel, the full history next to it.
        let first = plot_grid_dataset(&series.frame(0)?, None, None, &request, &backend)?;
        let last = plot_grid_dataset(&series.frame(args.frames - 1)?, None, None, &request, &backend)?;
        let history = plot_grid_dataset(&series, None, None, &request, &backend)?;

        let lines = (&first * &last)?;
        let mut figure = (&lines + &history)?;
        figure.save(path, args.dpi)?;
        println!("Saved figure to {}", path.display());
    } else {
        let backend = shared(TerminalBackend::new(TerminalConfig {
            dpi: args.dpi,
            viewport: TerminalViewport::Fullscreen,
        }));
        let mut explorer = Explorer::new(series, request, &backend)?;

        // Setup terminal
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;

        let res = run_scrubber(&mut explorer);

        // Restore terminal
        disable_raw_mode()?;
        execute!(io::stdout(), LeaveAlternateScreen)?;

        if let Err(err) = res {
            eprintln!("Error: {}", err);
        }
    }

    if args.log.is_some() {
        tracing::info!("Panoplot exited");
    }

    Ok(())
}

fn run_scrubber(explorer: &mut Explorer) -> Result<()> {
    let mut stdout = io::stdout();
    let mut dirty = true;

    loop {
        if dirty {
            execute!(stdout, Clear(ClearType::All))?;
            explorer.show()?;
            let (_, rows) = terminal::size()?;
            execute!(
                stdout,
                MoveTo(0, rows.saturating_sub(1)),
                Print(format!(
                    " {}   ←/→ step  tab mode  q quit",
                    explorer.scrubber().status()
                ))
            )?;
            dirty = false;
        }

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let before = (explorer.scrubber().mode(), explorer.scrubber().position());
                let scrubber = explorer.scrubber_mut();
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Left | KeyCode::Char('h') => scrubber.step(-1),
                    KeyCode::Right | KeyCode::Char('l') => scrubber.step(1),
                    KeyCode::Home | KeyCode::Char('g') => scrubber.step(isize::MIN),
                    KeyCode::End | KeyCode::Char('G') => scrubber.step(isize::MAX),
                    KeyCode::Tab => scrubber.cycle_mode(),
                    _ => {}
                }
                dirty = before != (scrubber.mode(), scrubber.position());
            }
        }
    }

    Ok(())
}

/// Gaussian wave packet drifting along x, sampled at `frames` times.
fn wave_packet(frames: usize) -> panoplot::Result<GridDataset> {
    let x = Array1::linspace(0.0, 40.0, 240);
    let time = Array1::from_iter((0..frames).map(|i| i as f64 * 0.5));
    let iteration = Array1::from_iter((0..frames as i64).map(|i| i * 50));

    let values = Array2::from_shape_fn((frames, x.len()), |(n, i)| {
        let (t, xi) = (time[n], x[i]);
        let envelope = (-(xi - 10.0 - 0.8 * t).powi(2) / 18.0).exp();
        envelope * (1.5 * xi - 2.0 * t).sin()
    });
    let frames = values.outer_iter().map(|row| row.to_owned().into_dyn()).collect();

    GridDataset::new(
        Quantity::new("e1", "E_1", "m_e c ω_p e^-1"),
        vec![PlotDataAxis::new("x1", "x_1", "c/ω_p", AxisKind::Grid, x)?],
        Timeline::new(time, iteration, "1/ω_p")?,
        frames,
    )
}
