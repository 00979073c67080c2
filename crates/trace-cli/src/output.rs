//! Trace CSV reading/writing and result formatting.

use anyhow::{bail, Context, Result};
use lib_signal::Peak;
use lib_trace::trace::{TimeAxis, Trace};
use std::io::Write;
use std::path::Path;

use crate::OutputFormat;

/// Read a `t_ns,ch0,ch1,ch2` CSV file into a time axis and trace.
pub fn read_trace_csv(path: &Path) -> Result<(TimeAxis, Trace)> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading trace from {path:?}"))?;

    let mut time = Vec::new();
    let mut channels: [Vec<f64>; 3] = Default::default();

    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || (line_no == 0 && line.starts_with("t_ns")) {
            continue;
        }

        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != 4 {
            bail!("{path:?}:{}: expected 4 columns, got {}", line_no + 1, fields.len());
        }

        let parse = |s: &str| -> Result<f64> {
            s.trim()
                .parse::<f64>()
                .with_context(|| format!("{path:?}:{}: bad number {s:?}", line_no + 1))
        };

        time.push(parse(fields[0])?);
        for (value, channel) in fields[1..].iter().zip(channels.iter_mut()) {
            channel.push(parse(value)?);
        }
    }

    let time = TimeAxis::try_new(time).map_err(|e| anyhow::anyhow!("{path:?}: {e}"))?;
    let trace = Trace::try_new(channels).map_err(|e| anyhow::anyhow!("{path:?}: {e}"))?;

    if time.len() != trace.len() {
        bail!("{path:?}: time axis and channels disagree in length");
    }

    Ok((time, trace))
}

/// Write a time axis and trace as `t_ns,ch0,ch1,ch2` CSV.
pub fn write_trace_csv(path: &Path, time: &TimeAxis, trace: &Trace) -> Result<()> {
    let mut f = std::fs::File::create(path)
        .with_context(|| format!("creating {path:?}"))?;

    writeln!(f, "t_ns,ch0,ch1,ch2")?;
    for (i, &t) in time.values().iter().enumerate() {
        writeln!(
            f,
            "{},{},{},{}",
            t,
            trace.channel(0)[i],
            trace.channel(1)[i],
            trace.channel(2)[i]
        )?;
    }

    tracing::info!("wrote {} samples to {:?}", time.len(), path);
    Ok(())
}

/// Write a magnitude spectrum as `freq_mhz,ch0,ch1,ch2` CSV.
pub fn write_spectrum_csv(
    path: &Path,
    frequencies: &[f64],
    magnitudes: &[Vec<f64>; 3],
) -> Result<()> {
    let mut f = std::fs::File::create(path)
        .with_context(|| format!("creating {path:?}"))?;

    writeln!(f, "freq_mhz,ch0,ch1,ch2")?;
    for (i, &freq) in frequencies.iter().enumerate() {
        writeln!(
            f,
            "{},{},{},{}",
            freq, magnitudes[0][i], magnitudes[1][i], magnitudes[2][i]
        )?;
    }

    tracing::info!("wrote {} bins to {:?}", frequencies.len(), path);
    Ok(())
}

/// Print a peak result in the requested format.
pub fn print_peak(peak: &Peak, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            println!("Envelope peak");
            println!("  Time:      {:.4} ns", peak.time_ns);
            println!("  Amplitude: {:.6}", peak.amplitude);
            println!("  Channel:   {}", peak.channel);
            println!("  Index:     {}", peak.index);
        }
        OutputFormat::Json => {
            let json = serde_json::json!({
                "time_ns": peak.time_ns,
                "amplitude": peak.amplitude,
                "channel": peak.channel,
                "index": peak.index,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    Ok(())
}
