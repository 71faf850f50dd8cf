use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use laneway_input::{Action, InputScript};
use laneway_kernel::{Run, RunConfig, RunEvent};
use laneway_render::{DebugTextRenderer, HeadlessBackend};
use laneway_stream::SectionEvent;
use laneway_tools::RunInspector;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "laneway-cli", about = "Headless driver for laneway runs")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Run a headless simulation and report telemetry
    Simulate {
        /// Simulated seconds to run
        #[arg(short, long, default_value = "30")]
        seconds: f32,
        /// Ticks per simulated second
        #[arg(long, default_value = "60")]
        fps: u32,
        /// Override the config seed
        #[arg(long)]
        seed: Option<u64>,
        /// YAML run config
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Timed input script, e.g. "0.5:left,1.2:right,10:restart"
        #[arg(short, long, default_value = "")]
        input: String,
        /// Print the HUD line every N simulated seconds (0 = never)
        #[arg(long, default_value = "5")]
        report_every: f32,
        /// Emit the final summary as JSON
        #[arg(long)]
        json: bool,
        /// List live visuals at the end
        #[arg(long)]
        dump: bool,
    },
    /// Print the default run config as YAML
    Config,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("laneway-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("kernel: {}", laneway_kernel::crate_info());
            println!("stream: {}", laneway_stream::crate_info());
            println!("render: {}", laneway_render::crate_info());
            println!("input: {}", laneway_input::crate_info());
            println!("tools: {}", laneway_tools::crate_info());
        }
        Commands::Simulate {
            seconds,
            fps,
            seed,
            config,
            input,
            report_every,
            json,
            dump,
        } => {
            let mut run_config = match config {
                Some(path) => load_config(&path)?,
                None => RunConfig::default(),
            };
            if let Some(seed) = seed {
                run_config.seed = seed;
            }
            let script = InputScript::parse(&input).context("invalid input script")?;
            simulate(run_config, script, seconds, fps, report_every, json, dump)?;
        }
        Commands::Config => {
            print!("{}", RunConfig::default().to_yaml()?);
        }
    }

    Ok(())
}

fn load_config(path: &Path) -> anyhow::Result<RunConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config = RunConfig::from_yaml(&text)
        .with_context(|| format!("invalid config {}", path.display()))?;
    tracing::info!("loaded config from {}", path.display());
    Ok(config)
}

fn simulate(
    config: RunConfig,
    mut script: InputScript,
    seconds: f32,
    fps: u32,
    report_every: f32,
    json: bool,
    dump: bool,
) -> anyhow::Result<()> {
    anyhow::ensure!(fps > 0, "fps must be positive");
    anyhow::ensure!(seconds >= 0.0, "seconds must not be negative");

    let dt = 1.0 / fps as f32;
    let ticks = (seconds * fps as f32).round() as u64;
    let mut run = Run::new(config, HeadlessBackend::new())?;
    run.drain_events();

    let mut clock = 0.0_f32;
    let mut next_report = report_every;
    let (mut spawned, mut destroyed, mut restarts) = (0usize, 0usize, 0usize);

    for _ in 0..ticks {
        for action in script.due(clock) {
            run.apply(action);
            if action == Action::Restart {
                restarts += 1;
            }
        }
        run.step(dt);
        clock += dt;

        for event in run.drain_events() {
            match event {
                RunEvent::Section(SectionEvent::Spawned { .. }) => spawned += 1,
                RunEvent::Section(SectionEvent::Destroyed { .. }) => destroyed += 1,
                _ => {}
            }
        }

        if report_every > 0.0 && clock >= next_report {
            next_report += report_every;
            println!("[{clock:>6.1}s] {}", RunInspector::hud(&run));
        }
    }

    let summary = RunInspector::summary(&run);
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{summary}");
        println!(
            "Sections spawned={spawned} destroyed={destroyed} restarts={restarts} advance avg={:?} max={:?}",
            run.stream().timer().average(),
            run.stream().timer().max()
        );
    }

    if dump {
        print!("{}", DebugTextRenderer::new().render(run.backend()));
        for info in RunInspector::list_sections(&run) {
            println!("{info}");
        }
    }

    Ok(())
}
