//! tinysecp CLI
//!
//! Validated secp256k1 operations on hex-encoded arguments.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tinysecp_core::{
    random_private_key, sha256, BenchConfig, BenchOperation, BenchReport, Benchmark, CallOptions,
    Operation, Output, PointOptions, Secp256k1,
};

#[derive(Parser)]
#[command(name = "tinysecp")]
#[command(author = "tinysecp contributors")]
#[command(version = "0.1.0")]
#[command(about = "Validated secp256k1 key, point and signature operations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one operation on hex arguments
    Call {
        /// Operation name, camelCase or kebab-case (see `ops`)
        operation: String,

        /// Positional arguments as hex
        args: Vec<String>,

        /// Force compressed point output
        #[arg(long, conflicts_with = "uncompressed")]
        compressed: bool,

        /// Force uncompressed point output
        #[arg(long)]
        uncompressed: bool,

        /// Reject high-S signatures in verify
        #[arg(long)]
        strict: bool,

        /// Extra entropy (32 bytes hex) for signing
        #[arg(short, long)]
        entropy: Option<String>,

        /// Expected y parity for xOnlyPointAddTweakCheck
        #[arg(long)]
        parity: Option<u8>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List operations and their arity
    Ops,

    /// SHA-256 of a UTF-8 message
    Hash {
        message: String,
    },

    /// Generate a random key pair
    Keygen {
        /// Print the uncompressed public point
        #[arg(long)]
        uncompressed: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run benchmark
    Benchmark {
        /// Operation to measure
        #[arg(short, long, default_value = "sign")]
        op: BenchOpArg,

        /// Duration in seconds
        #[arg(short, long, default_value = "5")]
        duration: u64,

        /// Number of threads (0 = auto)
        #[arg(long, default_value = "0")]
        threads: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum BenchOpArg {
    Sign,
    Verify,
    PointFromScalar,
    PointAdd,
}

impl From<BenchOpArg> for BenchOperation {
    fn from(arg: BenchOpArg) -> Self {
        match arg {
            BenchOpArg::Sign => BenchOperation::Sign,
            BenchOpArg::Verify => BenchOperation::Verify,
            BenchOpArg::PointFromScalar => BenchOperation::PointFromScalar,
            BenchOpArg::PointAdd => BenchOperation::PointAdd,
        }
    }
}

#[derive(Serialize)]
struct CallResult<'a> {
    operation: &'a str,
    output: &'a Output,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct KeyPair {
    private_key: String,
    public_key: String,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Call {
            operation,
            args,
            compressed,
            uncompressed,
            strict,
            entropy,
            parity,
            json,
        } => {
            let compressed = match (compressed, uncompressed) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            let entropy = entropy
                .as_deref()
                .map(|value| parse_hex("entropy", value))
                .transpose()?;
            let options = CallOptions { compressed, strict, entropy, parity };
            cmd_call(&operation, &args, &options, json)?;
        }
        Commands::Ops => {
            cmd_ops();
        }
        Commands::Hash { message } => {
            println!("{}", hex::encode(sha256(message.as_bytes())));
        }
        Commands::Keygen { uncompressed, json } => {
            cmd_keygen(uncompressed, json)?;
        }
        Commands::Benchmark {
            op,
            duration,
            threads,
            json,
        } => {
            cmd_benchmark(op.into(), duration, threads, json)?;
        }
    }

    Ok(())
}

/// Decode a hex argument, with or without a `0x` prefix
fn parse_hex(label: &str, value: &str) -> Result<Vec<u8>> {
    let digits = value.strip_prefix("0x").unwrap_or(value);
    hex::decode(digits).with_context(|| format!("{} is not valid hex: {}", label, value))
}

fn cmd_call(name: &str, args: &[String], options: &CallOptions, json_output: bool) -> Result<()> {
    let operation: Operation = name.parse()?;
    let args = args
        .iter()
        .enumerate()
        .map(|(index, value)| parse_hex(&format!("argument {}", index + 1), value))
        .collect::<Result<Vec<_>>>()?;

    let ctx: Secp256k1 = Secp256k1::default();
    let output = ctx
        .invoke(operation, &args, options)
        .with_context(|| format!("{} failed", operation))?;

    if json_output {
        let result = CallResult { operation: operation.name(), output: &output };
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", output);
    }
    Ok(())
}

fn cmd_ops() {
    println!("Operations:");
    println!("{:-<40}", "");
    println!("{:<28} {}", "Name", "Arguments");
    println!("{:-<40}", "");

    for operation in Operation::all() {
        println!("{:<28} {}", operation.name(), operation.arity());
    }
}

fn cmd_keygen(uncompressed: bool, json_output: bool) -> Result<()> {
    let ctx: Secp256k1 = Secp256k1::default();
    let private_key = random_private_key();
    let options = if uncompressed {
        PointOptions::uncompressed()
    } else {
        PointOptions::compressed()
    };
    let point = ctx
        .point_from_scalar(&private_key, options)?
        .context("generated key has no public point")?;

    let pair = KeyPair {
        private_key: hex::encode(private_key),
        public_key: point.to_hex(),
    };
    if json_output {
        println!("{}", serde_json::to_string_pretty(&pair)?);
    } else {
        println!("Private Key: {}", pair.private_key);
        println!("Public Key:  {}", pair.public_key);
    }
    Ok(())
}

fn cmd_benchmark(
    operation: BenchOperation,
    duration_secs: u64,
    threads: usize,
    json_output: bool,
) -> Result<()> {
    if !json_output {
        eprintln!("Benchmarking {} for {} seconds...", operation, duration_secs);
        eprintln!("Threads: {}", if threads == 0 { num_cpus::get() } else { threads });
        eprintln!();
    }

    let config = BenchConfig {
        threads,
        max_time_secs: duration_secs,
        progress: !json_output,
        ..Default::default()
    };

    let ctx: Secp256k1 = Secp256k1::default();
    let report = Benchmark::new(&ctx, operation, config).run()?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &BenchReport) {
    println!();
    println!("{:-<40}", "");
    println!("Operation:   {}", report.operation);
    println!("Threads:     {}", report.threads);
    println!("Operations:  {}", report.ops);
    println!("Time:        {:.2}s", report.time_secs);
    println!("Speed:       {:.2} Kop/s", report.ops_per_second / 1_000.0);
}
