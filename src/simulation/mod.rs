//! Headless frame loop: step a system a fixed number of times per frame, sample it once per
//! frame and keep track of how well energy and angular momentum are conserved.

use std::io::{self, Write};

use log::info;
use thiserror::Error;
use trajectory_dynamics::diagnostics::{Drift, Invariants};
use trajectory_dynamics::{DynamicsError, StepBuffer, StepOrdering, System, advance_many};
use trajectory_export::summary::{BodySummary, ElementsSummary, RunSummary};
use trajectory_export::trajectory::{Record, TrajectoryWriter};

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Dynamics(#[from] DynamicsError),
    #[error("failed to record frame: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunOptions {
    pub frames: usize,
    pub steps_per_frame: usize,
    pub dt: f64,
    /// Log every body's summary each `log_every` frames; zero disables it.
    pub log_every: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunReport {
    pub frames: usize,
    pub steps: usize,
    pub final_time: f64,
    pub initial: Invariants,
    pub last: Invariants,
    pub drift: Drift,
    pub max_energy_drift: f64,
}

/// Receives one sample of the system per frame, starting with frame 0 (the initial state).
pub trait Recorder {
    fn record(&mut self, frame: usize, system: &System) -> io::Result<()>;
}

impl Recorder for () {
    fn record(&mut self, _frame: usize, _system: &System) -> io::Result<()> {
        Ok(())
    }
}

/// Writes one CSV row per body per frame.
pub struct CsvRecorder<'w> {
    table: TrajectoryWriter<&'w mut dyn Write>,
}

impl<'w> CsvRecorder<'w> {
    /// Wrap `writer`, emitting the header first.
    pub fn new(writer: &'w mut dyn Write) -> io::Result<Self> {
        Ok(Self {
            table: TrajectoryWriter::new(writer)?,
        })
    }

    /// Flush buffered rows through to the wrapped writer.
    pub fn finish(mut self) -> io::Result<()> {
        self.table.flush()
    }
}

impl Recorder for CsvRecorder<'_> {
    fn record(&mut self, frame: usize, system: &System) -> io::Result<()> {
        for body in system.bodies() {
            self.table.write(&Record {
                frame,
                time_s: system.time(),
                body: &body.name,
                position_m: body.pos,
                velocity_m_s: body.vel,
            })?;
        }
        Ok(())
    }
}

/// Advance `system` through `options.frames` frames.
pub fn run(
    system: &mut System,
    options: &RunOptions,
    recorder: &mut dyn Recorder,
) -> Result<RunReport, SimulationError> {
    let initial = Invariants::measure(system.bodies(), system.gravity())?;
    let mut last = initial;
    let mut max_energy_drift = 0.0_f64;
    let mut buffer = StepBuffer::for_system(system);

    recorder.record(0, system)?;
    for frame in 1..=options.frames {
        advance_many(system, options.dt, options.steps_per_frame, &mut buffer)?;
        recorder.record(frame, system)?;

        last = Invariants::measure(system.bodies(), system.gravity())?;
        let drift = last.drift_from(&initial);
        max_energy_drift = max_energy_drift.max(drift.energy);

        if options.log_every > 0 && frame % options.log_every == 0 {
            info!(
                "frame {frame}: t = {:.3} s, energy drift {:.3e}",
                system.time(),
                drift.energy
            );
            for body in system.bodies() {
                info!("{body}");
            }
        }
    }

    Ok(RunReport {
        frames: options.frames,
        steps: options.frames.saturating_mul(options.steps_per_frame),
        final_time: system.time(),
        initial,
        last,
        drift: last.drift_from(&initial),
        max_energy_drift,
    })
}

pub fn ordering_label(ordering: StepOrdering) -> &'static str {
    match ordering {
        StepOrdering::GaussSeidel => "gauss_seidel",
        StepOrdering::Jacobi => "jacobi",
    }
}

/// Build the exportable summary of a finished run. Elements are re-derived from the final
/// state; bodies whose state no longer describes a closed orbit get none.
pub fn summarize(system: &System, options: &RunOptions, report: &RunReport) -> RunSummary {
    let bodies = system
        .bodies()
        .iter()
        .enumerate()
        .map(|(index, body)| {
            let parent = body
                .parent()
                .and_then(|id| system.body(id))
                .map(|p| p.name.clone());
            let elements = if body.is_root() {
                None
            } else {
                system
                    .derive_orbital_elements(index)
                    .ok()
                    .map(|orbit| ElementsSummary {
                        sma_m: orbit.sma,
                        ecc: orbit.ecc,
                        inc_rad: orbit.inc,
                        lan_rad: orbit.lan,
                        ape_rad: orbit.ape,
                        mna_rad: orbit.mna,
                        epoch_s: system.time(),
                    })
            };
            BodySummary {
                name: body.name.clone(),
                mass_kg: body.mass,
                color: body.color.to_hex(),
                parent,
                position_m: body.pos,
                velocity_m_s: body.vel,
                speed_m_s: body.speed(),
                elements,
            }
        })
        .collect();

    RunSummary {
        frames: report.frames,
        steps_per_frame: options.steps_per_frame,
        time_step_s: options.dt,
        final_time_s: report.final_time,
        initial_energy_j: report.initial.energy,
        final_energy_j: report.last.energy,
        energy_drift: report.drift.energy,
        max_energy_drift: report.max_energy_drift,
        angular_momentum_drift: report.drift.angular_momentum,
        bodies,
    }
}
