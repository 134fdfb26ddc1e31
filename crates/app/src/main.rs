use std::{
    io::Write,
    path::{Path, PathBuf},
};

use clap::{Parser, Subcommand};
use squat_counter_core::{
    AppConfig, Feedback, FeedbackSink, FramePump, PoseFrame, RepCounterState, ReplaySource,
    SkeletonOverlay,
};
use tracing_subscriber::EnvFilter;

fn main() -> squat_counter_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Replay {
            input,
            config,
            summary,
        } => run_replay(&input, config.as_deref(), summary.as_deref()),
        Commands::Count { depths, config } => run_count(&depths, config.as_deref()),
        Commands::Config => print_default_config(),
    };

    if let Err(err) = &result {
        if err.is_fatal() {
            tracing::error!(%err, "session aborted");
        }
    }
    result
}

fn load_config(path: Option<&Path>) -> squat_counter_core::Result<AppConfig> {
    match path {
        Some(path) => {
            tracing::info!(?path, "loading configuration");
            AppConfig::from_json_file(path)
        }
        None => Ok(AppConfig::live_defaults()),
    }
}

fn run_replay(
    input: &Path,
    config: Option<&Path>,
    summary_path: Option<&Path>,
) -> squat_counter_core::Result<()> {
    let config = load_config(config)?;
    let source = ReplaySource::from_json_file(input)?;
    tracing::info!(?input, frames = source.remaining(), "replaying recorded session");

    let mut pump = FramePump::new(source, ConsoleSink::new(std::io::stdout()), config);
    let summary = pump.run()?;

    println!("Reps: {}", summary.rep_count);

    if let Some(path) = summary_path {
        std::fs::write(path, serde_json::to_vec_pretty(&summary)?)?;
        tracing::info!(?path, "wrote session summary");
    }
    Ok(())
}

fn run_count(depths: &[u8], config: Option<&Path>) -> squat_counter_core::Result<()> {
    let config = load_config(config)?;

    let mut state = RepCounterState::new();
    for &depth in depths {
        let step = state.step(depth.min(100), &config.counting);
        state = step.state;
        tracing::debug!(depth, squatting = state.is_squatting, "depth applied");
        if step.rep_counted {
            tracing::info!(reps = state.rep_count, "rep completed");
        }
    }

    println!("Reps: {}", state.rep_count);
    Ok(())
}

fn print_default_config() -> squat_counter_core::Result<()> {
    println!("{}", serde_json::to_string_pretty(&AppConfig::default())?);
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Writes one status line per processed frame, tagged with the status
/// tone.
#[derive(Debug)]
struct ConsoleSink<W> {
    out: W,
}

impl<W: Write> ConsoleSink<W> {
    fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> FeedbackSink for ConsoleSink<W> {
    fn present(
        &mut self,
        frame: &PoseFrame,
        overlay: &SkeletonOverlay,
        feedback: &Feedback,
    ) -> squat_counter_core::Result<()> {
        tracing::trace!(
            timestamp = frame.timestamp,
            bones = overlay.segments.len(),
            joints = overlay.points.len(),
            "skeleton projected"
        );

        writeln!(
            self.out,
            "[{:>9.1} ms] {:<9} {:<17} {:<13} depth {:>3}%  knee {:>3}°  reps {}",
            feedback.timestamp,
            feedback.status.tone().as_str(),
            feedback.status.indicator(),
            feedback.status.label(),
            feedback.depth_percent,
            feedback.knee_angle_degrees,
            feedback.rep_count,
        )?;
        Ok(())
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Squat repetition counter", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a recorded pose session through the counter.
    Replay {
        /// JSON array of pose frames (`timestamp` plus `landmarks`).
        input: PathBuf,
        /// Optional configuration file overriding the defaults.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Write the session summary as JSON to this path.
        #[arg(short, long)]
        summary: Option<PathBuf>,
    },
    /// Count reps in a raw sequence of depth values (0-100).
    Count {
        #[arg(required = true, value_delimiter = ',', num_args = 1..)]
        depths: Vec<u8>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print the default configuration as JSON.
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;
    use squat_counter_core::SquatStatus;

    fn feedback(timestamp: f64, depth: u8, rep_count: u32) -> Feedback {
        Feedback {
            timestamp,
            depth_percent: depth,
            knee_angle_degrees: 180.0 - depth as f32 * 0.9,
            hip_angle_degrees: 170.0,
            rep_count,
            status: SquatStatus::classify(depth),
            rep_completed: false,
            rep_counted: false,
            in_target_band: false,
        }
    }

    #[test]
    fn console_sink_writes_every_processed_frame() {
        let mut sink = ConsoleSink::new(Vec::new());
        let frame = PoseFrame::default();
        let overlay = SkeletonOverlay::default();

        for (i, depth) in [10, 12, 55, 90].into_iter().enumerate() {
            sink.present(&frame, &overlay, &feedback(i as f64 * 33.0, depth, 0))
                .unwrap();
        }

        let output = String::from_utf8(sink.out).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("ready") && lines[0].contains("Standing"));
        assert!(lines[1].contains("ready"));
        assert!(lines[2].contains("squatting") && lines[2].contains("Keep Going..."));
        assert!(lines[3].contains("success") && lines[3].contains("depth  90%"));
    }
}
