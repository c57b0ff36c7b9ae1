//! Export helpers for trajectory CSV tables and JSON run summaries.

pub mod trajectory {
    use std::fs::{self, File};
    use std::io::{self, BufWriter, Write};
    use std::path::Path;

    pub const HEADER: [&str; 9] = [
        "frame", "time_s", "body", "x_m", "y_m", "z_m", "vx_m_s", "vy_m_s", "vz_m_s",
    ];

    /// Create a writer for the target path, handling stdout (`-`) by convention.
    pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
        if path == Path::new("-") {
            return Ok(Box::new(BufWriter::new(io::stdout())));
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        Ok(Box::new(BufWriter::new(file)))
    }

    /// One body at one sampled frame.
    #[derive(Debug, Clone)]
    pub struct Record<'a> {
        pub frame: usize,
        pub time_s: f64,
        pub body: &'a str,
        pub position_m: [f64; 3],
        pub velocity_m_s: [f64; 3],
    }

    impl Record<'_> {
        fn fields(&self) -> [String; 9] {
            let [x, y, z] = self.position_m;
            let [vx, vy, vz] = self.velocity_m_s;
            [
                self.frame.to_string(),
                self.time_s.to_string(),
                self.body.to_string(),
                format!("{x:.3}"),
                format!("{y:.3}"),
                format!("{z:.3}"),
                format!("{vx:.6}"),
                format!("{vy:.6}"),
                format!("{vz:.6}"),
            ]
        }
    }

    /// CSV table of [`Record`]s, header first.
    pub struct TrajectoryWriter<W: Write> {
        inner: csv::Writer<W>,
    }

    impl<W: Write> TrajectoryWriter<W> {
        pub fn new(writer: W) -> io::Result<Self> {
            let mut inner = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(writer);
            inner.write_record(HEADER)?;
            Ok(Self { inner })
        }

        pub fn write(&mut self, record: &Record<'_>) -> io::Result<()> {
            self.inner.write_record(record.fields())?;
            Ok(())
        }

        pub fn flush(&mut self) -> io::Result<()> {
            self.inner.flush()
        }
    }

}

pub mod summary {
    use serde::Serialize;
    use serde_json::to_writer_pretty;
    use std::fs::{self, File};
    use std::io::{self, BufWriter, Write};
    use std::path::{Path, PathBuf};

    /// Keplerian elements re-derived at the end of a run.
    #[derive(Debug, Clone, Copy, Serialize)]
    pub struct ElementsSummary {
        pub sma_m: f64,
        pub ecc: f64,
        pub inc_rad: f64,
        pub lan_rad: f64,
        pub ape_rad: f64,
        pub mna_rad: f64,
        pub epoch_s: f64,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct BodySummary {
        pub name: String,
        pub mass_kg: f64,
        pub color: String,
        pub parent: Option<String>,
        pub position_m: [f64; 3],
        pub velocity_m_s: [f64; 3],
        pub speed_m_s: f64,
        /// `None` for root bodies and for states that no longer describe a closed orbit.
        pub elements: Option<ElementsSummary>,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct RunSummary {
        pub frames: usize,
        pub steps_per_frame: usize,
        pub time_step_s: f64,
        pub final_time_s: f64,
        pub initial_energy_j: f64,
        pub final_energy_j: f64,
        pub energy_drift: f64,
        pub max_energy_drift: f64,
        pub angular_momentum_drift: f64,
        pub bodies: Vec<BodySummary>,
    }

    /// Metadata describing the run that produced a summary.
    #[derive(Debug)]
    pub struct Metadata<'a> {
        pub scenario: &'a str,
        pub generated_utc: &'a str,
        pub ordering: &'a str,
        pub gravitational_constant: f64,
    }

    #[derive(Serialize)]
    struct Sidecar<'a> {
        scenario: &'a str,
        generated_utc: &'a str,
        ordering: &'a str,
        gravitational_constant: f64,
        #[serde(flatten)]
        summary: &'a RunSummary,
    }

    /// `<stem>_summary.json` next to `output`.
    pub fn sidecar_path(output: &Path) -> PathBuf {
        let parent = output.parent().unwrap_or_else(|| Path::new("."));
        let stem = output
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("trajectory");
        parent.join(format!("{}_summary.json", stem))
    }

    pub fn write_summary_to(
        writer: &mut dyn Write,
        meta: &Metadata<'_>,
        summary: &RunSummary,
    ) -> io::Result<()> {
        let sidecar = Sidecar {
            scenario: meta.scenario,
            generated_utc: meta.generated_utc,
            ordering: meta.ordering,
            gravitational_constant: meta.gravitational_constant,
            summary,
        };
        to_writer_pretty(&mut *writer, &sidecar)?;
        writeln!(writer)
    }

    /// Write the JSON summary to `path`, creating parent directories as needed.
    pub fn write_summary(path: &Path, meta: &Metadata<'_>, summary: &RunSummary) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut writer = BufWriter::new(File::create(path)?);
        write_summary_to(&mut writer, meta, summary)?;
        writer.flush()
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn sidecar_sits_next_to_the_table() {
            assert_eq!(
                sidecar_path(Path::new("out/run.csv")),
                PathBuf::from("out/run_summary.json")
            );
        }

        #[test]
        fn summary_flattens_run_fields() {
            let summary = RunSummary {
                frames: 2,
                steps_per_frame: 5,
                time_step_s: 10.0,
                final_time_s: 100.0,
                initial_energy_j: -1.0,
                final_energy_j: -1.0,
                energy_drift: 0.0,
                max_energy_drift: 0.0,
                angular_momentum_drift: 0.0,
                bodies: Vec::new(),
            };
            let meta = Metadata {
                scenario: "pair",
                generated_utc: "2025-01-01T00:00:00Z",
                ordering: "gauss_seidel",
                gravitational_constant: 1.0,
            };
            let mut out = Vec::new();
            write_summary_to(&mut out, &meta, &summary).unwrap();
            let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
            assert_eq!(value["scenario"], "pair");
            assert_eq!(value["frames"], 2);
            assert_eq!(value["final_time_s"], 100.0);
        }
    }
}
