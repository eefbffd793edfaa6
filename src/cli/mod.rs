//! CLI argument parsing and command handling

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use thread_counter_core::{
    clamp_worker_count, LaunchConfig, LaunchEvent, LauncherBuilder, Report, SleepSampler,
    Verbosity, DEFAULT_MAX_RANDOM_SLEEP, DEFAULT_WORKER_COUNT,
};
use thread_counter_samplers::{SeededUniformSleep, UniformSleep};

/// A simple thread counter
///
/// Launches concurrent workers that each sleep a random number of seconds,
/// then reports how many ran and how long they slept in total.
#[derive(Parser, Debug)]
#[command(name = "thread-counter")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "What do you want me to tell you?")]
pub struct Cli {
    /// Number of workers to launch (values below 1 are clamped to 1)
    #[arg(
        short = 'm',
        long,
        env = "THREAD_COUNTER_WORKERS",
        default_value_t = DEFAULT_WORKER_COUNT as i64,
        allow_negative_numbers = true
    )]
    pub max_workers: i64,

    /// Milliseconds of delay between two worker launches
    #[arg(short, long, env = "THREAD_COUNTER_DELAY_MS", default_value_t = 0)]
    pub delay: u64,

    /// Maximum random sleep of each worker, in seconds (inclusive)
    #[arg(short = 's', long, env = "THREAD_COUNTER_MAX_SLEEP", default_value_t = DEFAULT_MAX_RANDOM_SLEEP)]
    pub max_sleep: u64,

    /// Output verbosity: 0 silent, 1 basic, 2 detailed
    #[arg(
        short,
        long,
        env = "THREAD_COUNTER_VERBOSE",
        default_value_t = 0,
        value_parser = clap::value_parser!(u8).range(0..=2)
    )]
    pub verbose: u8,

    /// Seed for reproducible sleep draws
    #[arg(long)]
    pub seed: Option<u64>,

    /// Cancel the run after this many seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Print the final report as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Build the launch configuration from the parsed arguments
    pub fn launch_config(&self) -> Result<LaunchConfig> {
        let verbosity = Verbosity::try_from(self.verbose)
            .with_context(|| format!("Invalid verbosity: {}", self.verbose))?;

        Ok(LaunchConfig::new(clamp_worker_count(self.max_workers))
            .with_inter_spawn_delay(Duration::from_millis(self.delay))
            .with_max_random_sleep(self.max_sleep)
            .with_verbosity(verbosity))
    }

    /// Pick the sleep sampler
    fn sampler(&self) -> Arc<dyn SleepSampler> {
        match self.seed {
            Some(seed) => Arc::new(SeededUniformSleep::new(seed)),
            None => Arc::new(UniformSleep::new()),
        }
    }

    /// Run the launch based on CLI arguments
    pub async fn run(&self) -> Result<()> {
        let config = self.launch_config()?;

        tracing::info!(
            workers = config.worker_count,
            delay_ms = self.delay,
            max_sleep = config.max_random_sleep,
            verbosity = %config.verbosity,
            seed = ?self.seed,
            "Starting thread-counter"
        );

        if !self.json {
            print_banner(&config);
        }

        let (launcher, mut events_rx) = LauncherBuilder::new()
            .config(config)
            .sampler(self.sampler())
            .build()
            .context("Failed to set up launcher")?;

        // Print progress as it arrives
        let quiet = self.json;
        let printer = tokio::spawn(async move {
            while let Some(event) = events_rx.recv().await {
                if !quiet {
                    println!("{}", format_event(&event));
                }
            }
        });

        let report = match self.timeout_secs {
            Some(secs) => launcher.run_with_timeout(Duration::from_secs(secs)).await,
            None => launcher.run_with_signal_handling().await,
        }
        .context("Launch failed")?;

        // Close the event channel so the printer drains and exits
        drop(launcher);
        printer.await.context("Event printer failed")?;

        if self.json {
            let json =
                serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
            println!("{json}");
        } else {
            print_results(&report);
        }

        Ok(())
    }
}

fn print_banner(config: &LaunchConfig) {
    println!(
        "Verbose level {} ({})",
        config.verbosity as u8,
        config.verbosity
    );
    println!("Max {} workers", config.worker_count);
    println!(
        "Delay between workers {} milliseconds",
        config.inter_spawn_delay.as_millis()
    );
    println!("Max random sleep {} seconds", config.max_random_sleep);
    println!("Launching ...");
}

/// Render one progress event as a console line
pub fn format_event(event: &LaunchEvent) -> String {
    match event {
        LaunchEvent::WorkerBegan {
            worker_id,
            active,
            sleep_seconds,
        } => format!(
            "Begin worker id {worker_id} : Active counter {active} : Random sleep {sleep_seconds}"
        ),
        LaunchEvent::WorkerEnded { worker_id, active } => {
            format!("End worker id {worker_id} : Active counter {active}")
        }
        LaunchEvent::SpawnPhaseComplete(phase) => format!(
            "Finished workers launch.\nTotal workers {} : Current active {}\nLaunched {} workers in {:6.2} seconds",
            phase.launched,
            phase.active,
            phase.spawned,
            phase.elapsed.as_secs_f64()
        ),
    }
}

/// Render the final summary lines
pub fn format_results(report: &Report) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Performed {} workers in {:6.2} seconds",
            report.total_launched,
            report.elapsed_secs()
        ),
        format!("Current active workers {}", report.final_active_count),
        format!(
            "Total sleep {} seconds : Average sleep {:.2} seconds",
            report.total_sleep_seconds, report.average_sleep_seconds
        ),
    ];

    if report.cancelled {
        lines.push(format!(
            "Run cancelled : {} workers interrupted",
            report.interrupted_workers
        ));
    }

    lines
}

fn print_results(report: &Report) {
    for line in format_results(report) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thread_counter_core::SpawnPhase;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["thread-counter"]).unwrap();
        assert_eq!(cli.max_workers, 10_000);
        assert_eq!(cli.delay, 0);
        assert_eq!(cli.max_sleep, 10);
        assert_eq!(cli.verbose, 0);
        assert!(cli.seed.is_none());
        assert!(!cli.json);

        let config = cli.launch_config().unwrap();
        assert_eq!(config, LaunchConfig::default());
    }

    #[test]
    fn test_short_flags() {
        let cli =
            Cli::try_parse_from(["thread-counter", "-m", "50", "-d", "20", "-s", "3", "-v", "2"])
                .unwrap();

        let config = cli.launch_config().unwrap();
        assert_eq!(config.worker_count, 50);
        assert_eq!(config.inter_spawn_delay, Duration::from_millis(20));
        assert_eq!(config.max_random_sleep, 3);
        assert_eq!(config.verbosity, Verbosity::Detailed);
    }

    #[test]
    fn test_worker_count_clamped() {
        for raw in ["0", "-7"] {
            let cli = Cli::try_parse_from(["thread-counter", "--max-workers", raw]).unwrap();
            assert_eq!(cli.launch_config().unwrap().worker_count, 1);
        }
    }

    #[test]
    fn test_verbosity_out_of_range_rejected() {
        assert!(Cli::try_parse_from(["thread-counter", "-v", "3"]).is_err());
    }

    #[test]
    fn test_negative_delay_rejected() {
        assert!(Cli::try_parse_from(["thread-counter", "-d", "-1"]).is_err());
    }

    #[test]
    fn test_seed_and_json_flags() {
        let cli = Cli::try_parse_from(["thread-counter", "--seed", "42", "--json"]).unwrap();
        assert_eq!(cli.seed, Some(42));
        assert!(cli.json);
        assert_eq!(cli.sampler().name(), "seeded-uniform");
    }

    #[test]
    fn test_format_worker_events() {
        let began = LaunchEvent::WorkerBegan {
            worker_id: 3,
            active: 2,
            sleep_seconds: 9,
        };
        assert_eq!(
            format_event(&began),
            "Begin worker id 3 : Active counter 2 : Random sleep 9"
        );

        let ended = LaunchEvent::WorkerEnded {
            worker_id: 3,
            active: 1,
        };
        assert_eq!(format_event(&ended), "End worker id 3 : Active counter 1");
    }

    #[test]
    fn test_format_spawn_phase() {
        let event = LaunchEvent::SpawnPhaseComplete(SpawnPhase {
            spawned: 10,
            launched: 8,
            active: 8,
            elapsed: Duration::from_millis(1_500),
        });

        let text = format_event(&event);
        assert!(text.starts_with("Finished workers launch."));
        assert!(text.contains("Total workers 8 : Current active 8"));
        assert!(text.contains("Launched 10 workers in   1.50 seconds"));
    }

    #[tokio::test]
    async fn test_run_small_launch() {
        let cli = Cli::try_parse_from(["thread-counter", "-m", "5", "-s", "0", "--json"]).unwrap();
        cli.run().await.expect("run failed");
    }
}
