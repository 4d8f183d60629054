//! Export helpers for burn reports (JSON) and telemetry (CSV).

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

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

pub mod telemetry {
    use std::io::{self, Write};

    use burnsim_guidance::TelemetrySample;

    pub const HEADER: &str =
        "tick,sim_time,apogee_radius_km,eccentricity,phase_angle_rad,total_impulse_km_s";

    pub fn write_header(writer: &mut dyn Write) -> io::Result<()> {
        writeln!(writer, "{HEADER}")
    }

    /// Serialize one sample, matching [`HEADER`] ordering.
    pub fn write_sample(writer: &mut dyn Write, sample: &TelemetrySample) -> io::Result<()> {
        writeln!(
            writer,
            "{},{:.6},{:.6},{:.9},{:.9},{:.9}",
            sample.tick,
            sample.sim_time,
            sample.apogee_radius_km,
            sample.eccentricity,
            sample.phase_angle_rad,
            sample.total_impulse_km_s,
        )
    }

    /// Header plus every sample, flushed at the end.
    pub fn write_all(writer: &mut dyn Write, samples: &[TelemetrySample]) -> io::Result<()> {
        write_header(writer)?;
        for sample in samples {
            write_sample(writer, sample)?;
        }
        writer.flush()
    }
}

pub mod report {
    use std::io::Write;

    use burnsim_guidance::BurnReport;
    use chrono::{SecondsFormat, Utc};
    use serde::Serialize;
    use serde_json::to_writer_pretty;

    use crate::ExportError;

    #[derive(Serialize)]
    struct ReportEnvelope<'a> {
        scenario: &'a str,
        generated_at: String,
        success: bool,
        delta_v_overhead_km_s: f64,
        report: &'a BurnReport,
    }

    /// Write a pretty-printed JSON document wrapping `report` with run metadata.
    pub fn write_json(
        writer: &mut dyn Write,
        scenario: &str,
        report: &BurnReport,
    ) -> Result<(), ExportError> {
        let envelope = ReportEnvelope {
            scenario,
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            success: report.is_success(),
            delta_v_overhead_km_s: report.delta_v_overhead_km_s(),
            report,
        };
        to_writer_pretty(&mut *writer, &envelope)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Human-readable multi-line summary for terminals.
    pub fn summary(scenario: &str, report: &BurnReport) -> String {
        let mut lines = vec![
            format!("scenario:        {scenario}"),
            format!("outcome:         {:?}", report.outcome),
            format!(
                "steering/mode:   {:?} / {:?}",
                report.steering_mode, report.burn_mode
            ),
            format!(
                "apogee:          {:.3} km (target {:.3} km)",
                report.final_snapshot.apogee_radius_km, report.target_radius_km
            ),
            format!("eccentricity:    {:.6}", report.final_snapshot.eccentricity),
            format!(
                "elapsed:         {:.3} sim / {:.3} s world over {} burning ticks",
                report.elapsed_sim_time, report.elapsed_world_s, report.ticks_burning
            ),
            format!(
                "delta-v:         {:.6} km/s spent, {:.6} km/s planned",
                report.total_delta_v_km_s, report.planned_delta_v_km_s
            ),
        ];
        if let Some(offset) = report.phase_offset_rad {
            lines.push(format!("phase offset:    {offset:.6} rad vs impulsive reference"));
        }
        lines.join("\n")
    }
}
