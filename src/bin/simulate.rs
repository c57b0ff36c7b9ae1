use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{SecondsFormat, Utc};
use clap::{Parser, ValueEnum};
use log::info;
use trajectory::dynamics::{StepOptions, StepOrdering};
use trajectory::export::summary::{self, Metadata};
use trajectory::export::trajectory::writer_for_path;
use trajectory::scenario;
use trajectory::simulation::{self, CsvRecorder, RunOptions};
use trajectory::time::seconds_to_days;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Step an N-body scenario headlessly and export its trajectory"
)]
struct Cli {
    /// Scenario file (YAML, or TOML by extension)
    #[arg(long, default_value = "data/scenarios/solar_system.yaml")]
    scenario: PathBuf,
    /// Number of frames to run
    #[arg(long, default_value_t = 100)]
    frames: usize,
    /// Override the scenario time step (seconds)
    #[arg(long)]
    dt: Option<f64>,
    /// Override the number of steps per frame
    #[arg(long)]
    steps_per_frame: Option<usize>,
    /// Override the integration ordering
    #[arg(long, value_enum)]
    ordering: Option<OrderingArg>,
    /// Keep parentless bodies fixed
    #[arg(long)]
    anchor_roots: bool,
    /// Trajectory CSV destination (`-` for stdout)
    #[arg(long, default_value = "-")]
    output: PathBuf,
    /// JSON summary destination; defaults to `<output stem>_summary.json` for file outputs
    #[arg(long)]
    summary: Option<PathBuf>,
    /// Log body summaries every N frames (0 disables)
    #[arg(long, default_value_t = 0)]
    log_every: usize,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum OrderingArg {
    GaussSeidel,
    Jacobi,
}

impl From<OrderingArg> for StepOrdering {
    fn from(value: OrderingArg) -> Self {
        match value {
            OrderingArg::GaussSeidel => StepOrdering::GaussSeidel,
            OrderingArg::Jacobi => StepOrdering::Jacobi,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let loaded = scenario::load(&cli.scenario)
        .with_context(|| format!("loading scenario {}", cli.scenario.display()))?;
    let scenario_name = loaded.name;
    let mut system = loaded.system;

    let defaults = *system.options();
    let options = StepOptions {
        ordering: cli.ordering.map(Into::into).unwrap_or(defaults.ordering),
        anchor_roots: cli.anchor_roots || defaults.anchor_roots,
    };
    system = system.with_options(options);

    let run_options = RunOptions {
        frames: cli.frames,
        steps_per_frame: cli.steps_per_frame.unwrap_or(loaded.steps_per_frame),
        dt: cli.dt.unwrap_or(loaded.time_step_s),
        log_every: cli.log_every,
    };
    if run_options.steps_per_frame == 0 {
        anyhow::bail!("--steps-per-frame must be at least 1");
    }
    if run_options.frames.checked_mul(run_options.steps_per_frame).is_none() {
        anyhow::bail!(
            "{} frames of {} steps overflow the step counter",
            run_options.frames,
            run_options.steps_per_frame
        );
    }

    let mut writer = writer_for_path(&cli.output)
        .with_context(|| format!("opening {}", cli.output.display()))?;
    let report = {
        let mut recorder = CsvRecorder::new(writer.as_mut())?;
        let report = simulation::run(&mut system, &run_options, &mut recorder)?;
        recorder.finish()?;
        report
    };
    writer.flush()?;

    info!(
        "ran {} frames ({} steps) to t = {:.3} s ({:.2} days); energy drift {:.3e}, angular momentum drift {:.3e}",
        report.frames,
        report.steps,
        report.final_time,
        seconds_to_days(report.final_time),
        report.drift.energy,
        report.drift.angular_momentum
    );

    let summary_path = cli.summary.clone().or_else(|| {
        (cli.output != Path::new("-")).then(|| summary::sidecar_path(&cli.output))
    });
    if let Some(path) = summary_path {
        let generated = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let meta = Metadata {
            scenario: &scenario_name,
            generated_utc: &generated,
            ordering: simulation::ordering_label(options.ordering),
            gravitational_constant: system.gravity().constant,
        };
        let run_summary = simulation::summarize(&system, &run_options, &report);
        summary::write_summary(&path, &meta, &run_summary)
            .with_context(|| format!("writing summary {}", path.display()))?;
        info!("summary written to {}", path.display());
    }

    Ok(())
}
