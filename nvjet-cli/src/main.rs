//! nvjet CLI entrypoint.
//!
//! ```bash
//! nvjet decode --input images/ --batch-size 8 --threads 2 --format rgbi
//! nvjet decode --input images/ --roi 100,100,200,200 --output dumped/
//! nvjet probe --json
//! ```

use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};

use nvjet_core::error::{EngineError, Result};
use nvjet_core::types::{Backend, OutputFormat, Roi};
use nvjet_nvjpeg::{CudaAllocator, NvjpegHandle, NvjpegSession};
use nvjet_pipeline::{run, RunConfig, RunSummary};

mod input;

const JSON_SCHEMA_VERSION: u32 = 1;

#[derive(Parser, Debug)]
#[command(
    name = "nvjet",
    version,
    about = "Batched nvJPEG decode engine",
    arg_required_else_help = true,
    after_help = "Examples:\n  nvjet probe --json\n  nvjet decode --input images/ --batch-size 8 --format rgbi\n  nvjet decode --input images/ --roi 100,100,200,200 --output dumped/"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode a file or directory of JPEGs into device buffers.
    Decode(DecodeArgs),
    /// Probe CUDA/nvJPEG library availability and print basic status.
    Probe(ProbeArgs),
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Input JPEG file, or directory walked recursively.
    #[arg(short = 'i', long = "input")]
    input: PathBuf,

    /// Images per batch.
    #[arg(short = 'b', long = "batch-size", default_value_t = 4)]
    batch_size: usize,

    /// Total images to decode, rounded up to whole batches per thread.
    #[arg(short = 't', long = "total-images", default_value_t = 16)]
    total_images: usize,

    /// Warm-up batches, decoded but excluded from timing.
    #[arg(short = 'w', long = "warmup", default_value_t = 1)]
    warmup: usize,

    /// Worker threads, each with its own decoder and stream.
    #[arg(short = 'j', long = "threads", default_value_t = 1)]
    threads: usize,

    /// Output pixel format.
    #[arg(long = "format", value_enum, default_value_t = FormatArg::Rgbi)]
    format: FormatArg,

    /// CUDA device ordinal.
    #[arg(short = 'd', long = "device", default_value_t = 0)]
    device: i32,

    /// Region of interest as x,y,width,height in source pixels.
    #[arg(long = "roi", value_parser = parse_roi)]
    roi: Option<Roi>,

    /// Decoder backend.
    #[arg(long = "backend", value_enum, default_value_t = BackendArg::Hybrid)]
    backend: BackendArg,

    /// Directory for BMP dumps of decoded images.
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Emit the run summary as JSON on stdout.
    #[arg(long = "json")]
    json: bool,
}

#[derive(Args, Debug)]
struct ProbeArgs {
    /// Emit probe status as JSON on stdout.
    #[arg(long = "json")]
    json: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum FormatArg {
    Rgb,
    Bgr,
    Rgbi,
    Bgri,
    Yuv,
    Y,
    Unchanged,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Rgb => OutputFormat::Rgb,
            FormatArg::Bgr => OutputFormat::Bgr,
            FormatArg::Rgbi => OutputFormat::Rgbi,
            FormatArg::Bgri => OutputFormat::Bgri,
            FormatArg::Yuv => OutputFormat::Yuv,
            FormatArg::Y => OutputFormat::Y,
            FormatArg::Unchanged => OutputFormat::Unchanged,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum BackendArg {
    /// Host-side Huffman parsing, device IDCT/color pipeline.
    Hybrid,
    /// Entire decode on the device.
    GpuHybrid,
}

impl From<BackendArg> for Backend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Hybrid => Backend::Hybrid,
            BackendArg::GpuHybrid => Backend::GpuHybrid,
        }
    }
}

fn parse_roi(value: &str) -> std::result::Result<Roi, String> {
    let parts: Vec<&str> = value.split(',').collect();
    if parts.len() != 4 {
        return Err(format!(
            "expected x,y,width,height (four comma-separated values), got '{value}'"
        ));
    }
    let mut nums = [0u32; 4];
    for (slot, part) in nums.iter_mut().zip(&parts) {
        *slot = part
            .trim()
            .parse()
            .map_err(|_| format!("'{part}' is not a non-negative integer"))?;
    }
    if nums[2] == 0 || nums[3] == 0 {
        return Err("region width and height must be positive".to_string());
    }
    Ok(Roi {
        x: nums[0],
        y: nums[1],
        width: nums[2],
        height: nums[3],
    })
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let json_error_command = match &cli.command {
        Commands::Decode(args) if args.json => Some("decode"),
        Commands::Probe(args) if args.json => Some("probe"),
        _ => None,
    };

    let result = match cli.command {
        Commands::Decode(args) => run_decode(args),
        Commands::Probe(args) => run_probe(args),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(err) => {
            if let Some(command) = json_error_command {
                println!(
                    "{}",
                    serde_json::json!({
                        "schema_version": JSON_SCHEMA_VERSION,
                        "command": command,
                        "ok": false,
                        "error": err.to_string(),
                        "code": err.error_code(),
                    })
                );
            } else {
                tracing::error!(error = %err, code = err.error_code(), "Command failed");
            }
            std::process::exit(err.error_code() as i32);
        }
    }
}

fn init_tracing() {
    let ansi_enabled = std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_ansi(ansi_enabled)
        .init();
}

fn run_decode(args: DecodeArgs) -> Result<()> {
    let format = OutputFormat::from(args.format);
    let backend = Backend::from(args.backend);

    if args.output.is_some() && !matches!(
        format,
        OutputFormat::Rgb | OutputFormat::Bgr | OutputFormat::Rgbi | OutputFormat::Bgri
    ) {
        return Err(EngineError::Config(format!(
            "BMP dumping requires an RGB/BGR output format, not {:?}",
            args.format
        )));
    }

    let files = input::collect(&args.input)?;
    tracing::info!(files = files.len(), input = %args.input.display(), "input resolved");

    if let Some(dir) = &args.output {
        std::fs::create_dir_all(dir)?;
    }

    let handle = Arc::new(NvjpegHandle::new()?);
    let config = RunConfig {
        batch_size: args.batch_size,
        total_images: args.total_images,
        warmup_batches: args.warmup,
        threads: args.threads,
        format,
        roi: args.roi,
        output_dir: args.output.clone(),
    };

    let session_handle = Arc::clone(&handle);
    let summary = run(
        &config,
        files,
        handle.as_ref(),
        move |_thread| NvjpegSession::new(Arc::clone(&session_handle), args.device, format, backend),
        |_thread| CudaAllocator::new(),
    )?;

    report_summary(&args, &summary);
    Ok(())
}

fn report_summary(args: &DecodeArgs, summary: &RunSummary) {
    if args.json {
        println!(
            "{}",
            serde_json::json!({
                "schema_version": JSON_SCHEMA_VERSION,
                "command": "decode",
                "ok": true,
                "images_decoded": summary.images_decoded,
                "elapsed_seconds": summary.elapsed.as_secs_f64(),
                "images_per_sec": summary.images_per_sec,
            })
        );
    } else {
        println!(
            "decoded {} images in {:.3} s ({:.1} images/s)",
            summary.images_decoded,
            summary.elapsed.as_secs_f64(),
            summary.images_per_sec
        );
    }
}

fn run_probe(args: ProbeArgs) -> Result<()> {
    let status = NvjpegHandle::new();
    let (available, detail) = match &status {
        Ok(_) => (true, String::new()),
        Err(err) => (false, err.to_string()),
    };

    if args.json {
        println!(
            "{}",
            serde_json::json!({
                "schema_version": JSON_SCHEMA_VERSION,
                "command": "probe",
                "ok": true,
                "available": available,
                "detail": detail,
            })
        );
    } else if available {
        println!("CUDA/nvJPEG runtime available");
    } else {
        println!("CUDA/nvJPEG runtime unavailable: {detail}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roi_parser_accepts_four_fields() {
        let roi = parse_roi("100,100,200,200").unwrap();
        assert_eq!(
            roi,
            Roi {
                x: 100,
                y: 100,
                width: 200,
                height: 200
            }
        );
    }

    #[test]
    fn roi_parser_rejects_malformed_input() {
        assert!(parse_roi("1,2,3").is_err());
        assert!(parse_roi("1,2,3,4,5").is_err());
        assert!(parse_roi("a,b,c,d").is_err());
        assert!(parse_roi("0,0,0,10").is_err());
        assert!(parse_roi("-1,0,10,10").is_err());
    }
}
