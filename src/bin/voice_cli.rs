use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use voice_origin::analysis::{DetectionResponse, FeatureVector, VoiceLabel};
use voice_origin::config::AppConfig;
use voice_origin::service::ClassificationService;
use voice_origin::testing::fixtures::{SyntheticPattern, SyntheticSpec};

#[derive(Parser, Debug)]
#[command(
    name = "voice_cli",
    about = "Classify speech recordings as human or AI-generated"
)]
struct Cli {
    /// JSON configuration file (defaults are used when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify an audio file and print the response JSON
    Classify {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: Option<PathBuf>,
        /// Expected label (HUMAN or AI_GENERATED); exit code 2 on mismatch
        #[arg(long, value_parser = parse_label)]
        expect: Option<VoiceLabel>,
    },
    /// Print the extracted feature vector as JSON
    Features {
        #[arg(long)]
        input: PathBuf,
    },
    /// Write a deterministic synthetic WAV clip
    Synth {
        /// sine, jittered_voice, white_noise or silence
        #[arg(long, value_parser = parse_pattern)]
        pattern: SyntheticPattern,
        #[arg(long)]
        output: PathBuf,
        #[arg(long, default_value_t = 3_000)]
        duration_ms: u32,
        #[arg(long, default_value_t = 16_000)]
        sample_rate: u32,
        #[arg(long)]
        frequency: Option<f32>,
        #[arg(long)]
        amplitude: Option<f32>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Serve the HTTP API
    #[cfg(feature = "http")]
    Serve {
        /// Listen address (overrides the configured one)
        #[arg(long)]
        addr: Option<String>,
    },
}

fn main() -> ExitCode {
    init_tracing();
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // stdout carries JSON output only
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Classify {
            input,
            output,
            expect,
        } => run_classify(&config, &input, output, expect),
        Commands::Features { input } => run_features(&config, &input),
        Commands::Synth {
            pattern,
            output,
            duration_ms,
            sample_rate,
            frequency,
            amplitude,
            seed,
        } => {
            let mut spec = SyntheticSpec::new(pattern, sample_rate, duration_ms);
            if let Some(frequency) = frequency {
                spec = spec.with_frequency(frequency);
            }
            if let Some(amplitude) = amplitude {
                spec = spec.with_amplitude(amplitude);
            }
            if let Some(seed) = seed {
                spec = spec.with_seed(seed);
            }
            run_synth(&spec, &output)
        }
        #[cfg(feature = "http")]
        Commands::Serve { addr } => run_serve(config, addr),
    }
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => AppConfig::try_load_from_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(AppConfig::default()),
    }
}

fn build_service(config: &AppConfig) -> Result<ClassificationService> {
    ClassificationService::new(config).context("building classification service")
}

fn read_audio(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("reading {}", path.display()))
}

fn run_classify(
    config: &AppConfig,
    input: &Path,
    output_path: Option<PathBuf>,
    expect: Option<VoiceLabel>,
) -> Result<ExitCode> {
    let service = build_service(config)?;
    let bytes = read_audio(input)?;
    let result = service
        .evaluate(&bytes)
        .with_context(|| format!("classifying {}", input.display()))?;
    let response = result.to_response();

    let report = ClassifyReport {
        input,
        response: &response,
    };
    emit_report(&report, output_path)?;

    match expect {
        Some(expected) if expected != result.label => {
            eprintln!("Expected {}, got {}", expected, result.label);
            Ok(ExitCode::from(2))
        }
        _ => Ok(ExitCode::from(0)),
    }
}

fn run_features(config: &AppConfig, input: &Path) -> Result<ExitCode> {
    let service = build_service(config)?;
    let bytes = read_audio(input)?;
    let features = service
        .extract(&bytes)
        .with_context(|| format!("extracting features from {}", input.display()))?;

    let report = FeatureReport {
        input,
        features: &features,
    };
    emit_report(&report, None)?;
    Ok(ExitCode::from(0))
}

fn run_synth(spec: &SyntheticSpec, output: &Path) -> Result<ExitCode> {
    let wav = spec.to_wav().context("encoding WAV")?;
    fs::write(output, wav).with_context(|| format!("writing {}", output.display()))?;
    println!(
        "Wrote {} samples ({:?}) to {}",
        spec.total_samples(),
        spec.pattern,
        output.display()
    );
    Ok(ExitCode::from(0))
}

#[cfg(feature = "http")]
fn run_serve(config: AppConfig, addr: Option<String>) -> Result<ExitCode> {
    use std::net::SocketAddr;
    use std::sync::Arc;

    let addr = addr.unwrap_or_else(|| config.server.addr.clone());
    let addr: SocketAddr = addr
        .parse()
        .with_context(|| format!("parsing listen address {}", addr))?;
    let service = Arc::new(build_service(&config)?);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("building tokio runtime")?;
    runtime.block_on(voice_origin::http::run_http_server(addr, service, &config))?;
    Ok(ExitCode::from(0))
}

fn emit_report<T: Serialize>(report: &T, output_path: Option<PathBuf>) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;

    if let Some(path) = output_path {
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    } else {
        println!("{json}");
    }

    Ok(())
}

fn parse_label(raw: &str) -> Result<VoiceLabel> {
    match raw.to_ascii_uppercase().as_str() {
        "HUMAN" => Ok(VoiceLabel::Human),
        "AI_GENERATED" => Ok(VoiceLabel::AiGenerated),
        other => bail!("unknown label {other} (expected HUMAN or AI_GENERATED)"),
    }
}

fn parse_pattern(raw: &str) -> Result<SyntheticPattern> {
    serde_json::from_value(serde_json::Value::String(raw.to_string()))
        .with_context(|| format!("unknown pattern {raw}"))
}

#[derive(Serialize)]
struct ClassifyReport<'a> {
    input: &'a Path,
    #[serde(flatten)]
    response: &'a DetectionResponse,
}

#[derive(Serialize)]
struct FeatureReport<'a> {
    input: &'a Path,
    features: &'a FeatureVector,
}
