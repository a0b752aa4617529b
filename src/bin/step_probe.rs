use std::env;
use std::time::Instant;

use dp_stepper::audit::audit_seek_consistency;
use dp_stepper::reference::lcs_length;
use dp_stepper::{SequencePair, StepEngine};
use rand::{rngs::StdRng, Rng, SeedableRng};
use sysinfo::{get_current_pid, ProcessRefreshKind, System};

fn main() {
    let options = match Options::parse(env::args().skip(1)) {
        Ok(opts) => opts,
        Err(err) => {
            eprintln!("step_probe: {err}");
            Options::print_help();
            std::process::exit(2);
        }
    };

    #[cfg(feature = "tracing")]
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    eprintln!("\n{}", "=".repeat(80));
    eprintln!("dp-stepper probe: stepping, seeking and undo at increasing sizes");
    eprintln!("{}", "=".repeat(80));
    eprintln!("  • run:   step a fresh engine to DONE, compare with the full-table LCS");
    eprintln!("  • seek:  {} random seeks, each checked against the closed-form schedule", options.seeks);
    eprintln!("  • audit: exhaustive seek/replay audit (sizes up to {})", options.verify_limit);
    eprintln!();

    let mut sys = System::new();
    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut measurements = Vec::new();

    const SIZES: &[usize] = &[4, 8, 16, 32, 64, 128, 256, 512];
    let total = SIZES.len();
    for (idx, &len) in SIZES.iter().enumerate() {
        eprintln!("[{}/{}] len={len}", idx + 1, total);
        let pair = random_pair(&mut rng, len);
        measurements.push(probe_run(&pair, &mut sys));
        measurements.push(probe_seek(&pair, &options, &mut rng, &mut sys));
        if len <= options.verify_limit {
            measurements.push(probe_audit(&pair, &mut sys));
        }
    }

    print_summary(&measurements);

    if let Err(err) = options.format.write(&measurements) {
        eprintln!("step_probe output error: {err}");
        std::process::exit(1);
    }
    if measurements
        .iter()
        .any(|m| matches!(m.verification_status, VerificationStatus::Failed))
    {
        std::process::exit(1);
    }
}

struct Options {
    format: OutputFormat,
    verify_limit: usize,
    seeks: usize,
    seed: u64,
}

impl Options {
    fn parse<I, T>(mut args: I) -> Result<Self, String>
    where
        I: Iterator<Item = T>,
        T: Into<String>,
    {
        let mut options = Options {
            format: OutputFormat::Csv,
            verify_limit: 16,
            seeks: 200,
            seed: 42,
        };

        while let Some(arg) = args.next() {
            let arg = arg.into();
            if arg == "--help" || arg == "-h" {
                Options::print_help();
                std::process::exit(0);
            }
            let (flag, inline) = match arg.split_once('=') {
                Some((flag, value)) => (flag.to_string(), Some(value.to_string())),
                None => (arg, None),
            };
            let mut value = || -> Result<String, String> {
                match &inline {
                    Some(v) => Ok(v.clone()),
                    None => args
                        .next()
                        .map(Into::into)
                        .ok_or_else(|| format!("missing value after {flag}")),
                }
            };
            match flag.as_str() {
                "--format" => options.format = OutputFormat::from_str(&value()?)?,
                "--verify-limit" => options.verify_limit = parse_number(&value()?, "verify limit")?,
                "--seeks" => options.seeks = parse_number(&value()?, "seek count")?,
                "--seed" => options.seed = parse_number(&value()?, "seed")?,
                _ => return Err(format!("unrecognized argument '{flag}'")),
            }
        }

        Ok(options)
    }

    fn print_help() {
        println!(
            "\
Usage: cargo run --features probe --bin step_probe [-- <options>]

Options:
  --format <csv|table>     Output format (default: csv)
  --verify-limit <N>       Largest sequence length given the exhaustive audit (default: 16)
  --seeks <N>              Random seeks per size (default: 200)
  --seed <N>               RNG seed for inputs and seek targets (default: 42)
  -h, --help               Print this help message
"
        );
    }
}

fn parse_number<N: std::str::FromStr>(value: &str, what: &str) -> Result<N, String> {
    value
        .parse::<N>()
        .map_err(|_| format!("{what} must be a non-negative integer"))
}

#[derive(Copy, Clone)]
enum OutputFormat {
    Csv,
    Table,
}

impl OutputFormat {
    fn from_str(value: &str) -> Result<Self, String> {
        match value {
            "csv" => Ok(Self::Csv),
            "table" => Ok(Self::Table),
            other => Err(format!("unknown format '{other}'")),
        }
    }

    fn write(self, measurements: &[Measurement]) -> Result<(), String> {
        match self {
            OutputFormat::Csv => write_csv(measurements),
            OutputFormat::Table => write_table(measurements),
        }
    }
}

struct Measurement {
    scenario: &'static str,
    size_desc: String,
    steps: usize,
    wall_s: f64,
    rss_delta_kib: u64,
    verification_status: VerificationStatus,
    verification_detail: Option<String>,
}

#[derive(Clone, Copy)]
enum VerificationStatus {
    Passed,
    Failed,
}

impl VerificationStatus {
    fn label(&self) -> &'static str {
        match self {
            VerificationStatus::Passed => "passed",
            VerificationStatus::Failed => "failed",
        }
    }
}

fn measure<F>(scenario: &'static str, pair: &SequencePair, sys: &mut System, compute: F) -> Measurement
where
    F: FnOnce() -> (usize, Result<(), String>),
{
    let before = rss_kib(sys);
    let start = Instant::now();
    let (steps, outcome) = compute();
    let duration = start.elapsed();
    let after = rss_kib(sys);

    let (verification_status, verification_detail) = match outcome {
        Ok(()) => (VerificationStatus::Passed, None),
        Err(detail) => (VerificationStatus::Failed, Some(detail)),
    };
    eprintln!(
        "      {:<6} steps={steps:<8} time={:.3}s status={}",
        scenario,
        duration.as_secs_f64(),
        verification_status.label()
    );
    Measurement {
        scenario,
        size_desc: format!("{}x{}", pair.n(), pair.m()),
        steps,
        wall_s: duration.as_secs_f64(),
        rss_delta_kib: after.saturating_sub(before),
        verification_status,
        verification_detail,
    }
}

fn probe_run(pair: &SequencePair, sys: &mut System) -> Measurement {
    measure("run", pair, sys, || {
        let mut engine = match StepEngine::new(&pair.x_string(), &pair.y_string()) {
            Ok(engine) => engine,
            Err(err) => return (0, Err(err.to_string())),
        };
        let steps = engine.run_to_end();
        let expected = lcs_length(pair.x(), pair.y());
        let outcome = match engine.lcs_length() {
            Ok(len) if len == expected => Ok(()),
            Ok(len) => Err(format!("expected {expected}, got {len}")),
            Err(err) => Err(err.to_string()),
        };
        (steps, outcome)
    })
}

fn probe_seek(
    pair: &SequencePair,
    options: &Options,
    rng: &mut StdRng,
    sys: &mut System,
) -> Measurement {
    measure("seek", pair, sys, || {
        let mut engine = match StepEngine::new(&pair.x_string(), &pair.y_string()) {
            Ok(engine) => engine,
            Err(err) => return (0, Err(err.to_string())),
        };
        let max = engine.max_step_index();
        let mut moved = 0usize;
        for _ in 0..options.seeks {
            let target = rng.gen_range(0..=max);
            moved += target.abs_diff(engine.logical_step_index());
            if let Err(err) = engine.seek(target) {
                return (moved, Err(err.to_string()));
            }
            if Some(engine.state()) != engine.schedule().counter_at(target) {
                return (
                    moved,
                    Err(format!("counter {} disagrees with schedule at {target}", engine.state())),
                );
            }
        }
        (moved, Ok(()))
    })
}

fn probe_audit(pair: &SequencePair, sys: &mut System) -> Measurement {
    measure("audit", pair, sys, || match audit_seek_consistency(pair) {
        Ok(report) => (report.targets_checked, Ok(())),
        Err(err) => (0, Err(err.to_string())),
    })
}

fn random_pair(rng: &mut StdRng, len: usize) -> SequencePair {
    const ALPHABET: &[u8] = b"ACGT";
    let mut seq = |len: usize| -> String {
        (0..len)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect()
    };
    let x = seq(len);
    let y = seq(len + len / 4);
    SequencePair::new(&x, &y)
}

fn print_summary(measurements: &[Measurement]) {
    let failed = measurements
        .iter()
        .filter(|m| matches!(m.verification_status, VerificationStatus::Failed))
        .count();
    eprintln!("\n{}", "=".repeat(80));
    eprintln!(
        "{} checks, {} passed, {} failed",
        measurements.len(),
        measurements.len() - failed,
        failed
    );
    eprintln!("{}\n", "=".repeat(80));
}

fn write_csv(measurements: &[Measurement]) -> Result<(), String> {
    println!("scenario,size_desc,steps,wall_s,rss_delta_kib,verification_status,verification_detail");
    for m in measurements {
        let detail = m
            .verification_detail
            .as_ref()
            .map(|s| s.replace('"', "'"))
            .unwrap_or_default();
        println!(
            "{},{},{},{:.3},{},{},\"{}\"",
            m.scenario,
            m.size_desc,
            m.steps,
            m.wall_s,
            m.rss_delta_kib,
            m.verification_status.label(),
            detail
        );
    }
    Ok(())
}

fn write_table(measurements: &[Measurement]) -> Result<(), String> {
    let col1 = measurements.iter().map(|m| m.scenario.len()).max().unwrap_or(8).max(8);
    let col2 = measurements.iter().map(|m| m.size_desc.len()).max().unwrap_or(4).max(4);
    println!(
        "{:<col1$}  {:<col2$}  {:>10}  {:>10}  {:>14}  {:>8}  detail",
        "scenario", "size", "steps", "wall_s", "rss_delta_kib", "status"
    );
    for m in measurements {
        println!(
            "{:<col1$}  {:<col2$}  {:>10}  {:>10.3}  {:>14}  {:>8}  {}",
            m.scenario,
            m.size_desc,
            m.steps,
            m.wall_s,
            m.rss_delta_kib,
            m.verification_status.label(),
            m.verification_detail.as_deref().unwrap_or(""),
        );
    }
    Ok(())
}

fn rss_kib(sys: &mut System) -> u64 {
    sys.refresh_processes_specifics(ProcessRefreshKind::new());
    if let Some(process) = get_current_pid().ok().and_then(|pid| sys.process(pid)) {
        process.memory() / 1024
    } else {
        0
    }
}
