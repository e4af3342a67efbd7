//! Throughput benchmark

use std::fmt;
use std::hint::black_box;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tinysecp_crypto::{random_private_key, CurveEngine};
use tracing::info;

use crate::codec::PointBytes;
use crate::error::ValidationError;
use crate::ops::{PointOptions, Secp256k1, VerifyOptions};
use crate::stats::OpStats;

/// Benchmark configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchConfig {
    /// Number of threads (0 = auto)
    pub threads: usize,
    /// Operations per worker between limit checks
    pub batch_size: usize,
    /// Maximum operations (0 = unlimited)
    pub max_ops: u64,
    /// Maximum time in seconds (0 = unlimited)
    pub max_time_secs: u64,
    /// Print a live progress line to stderr
    pub progress: bool,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            batch_size: 256,
            max_ops: 0,
            max_time_secs: 5,
            progress: false,
        }
    }
}

/// Operation driven by the benchmark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BenchOperation {
    Sign,
    Verify,
    PointFromScalar,
    PointAdd,
}

impl BenchOperation {
    pub fn all() -> [BenchOperation; 4] {
        [
            BenchOperation::Sign,
            BenchOperation::Verify,
            BenchOperation::PointFromScalar,
            BenchOperation::PointAdd,
        ]
    }

    pub fn name(self) -> &'static str {
        match self {
            BenchOperation::Sign => "sign",
            BenchOperation::Verify => "verify",
            BenchOperation::PointFromScalar => "pointFromScalar",
            BenchOperation::PointAdd => "pointAdd",
        }
    }
}

impl fmt::Display for BenchOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Benchmark result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchReport {
    pub operation: BenchOperation,
    /// Worker threads used
    pub threads: usize,
    /// Total operations completed
    pub ops: u64,
    /// Wall time in seconds
    pub time_secs: f64,
    pub ops_per_second: f64,
}

#[derive(Error, Debug)]
pub enum BenchError {
    #[error("benchmark needs an operation or time limit")]
    Unbounded,
    #[error("batch size must be at least 1")]
    EmptyBatch,
    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("operation rejected benchmark input: {0}")]
    Operation(#[from] ValidationError),
}

/// Inputs one worker reuses for every iteration
struct Fixture {
    private_key: [u8; 32],
    hash: [u8; 32],
    point: PointBytes,
    other: PointBytes,
    signature: [u8; 64],
}

/// Repeatedly runs one operation against a shared context
pub struct Benchmark<'a, E: CurveEngine> {
    ctx: &'a Secp256k1<E>,
    operation: BenchOperation,
    config: BenchConfig,
}

impl<'a, E: CurveEngine> Benchmark<'a, E> {
    pub fn new(ctx: &'a Secp256k1<E>, operation: BenchOperation, config: BenchConfig) -> Self {
        Self { ctx, operation, config }
    }

    fn fixture(&self) -> Result<Fixture, BenchError> {
        let private_key = random_private_key();
        let hash: [u8; 32] = rand::random();
        let point = self
            .ctx
            .point_from_scalar(&private_key, PointOptions::default())?
            .ok_or(ValidationError::InvalidPrivateKey)?;
        let other = self
            .ctx
            .point_from_scalar(&random_private_key(), PointOptions::default())?
            .ok_or(ValidationError::InvalidPrivateKey)?;
        let signature = self.ctx.sign(&hash, &private_key)?;
        Ok(Fixture { private_key, hash, point, other, signature })
    }

    fn run_once(&self, fixture: &Fixture) -> Result<(), ValidationError> {
        match self.operation {
            BenchOperation::Sign => {
                black_box(self.ctx.sign(&fixture.hash, &fixture.private_key)?);
            }
            BenchOperation::Verify => {
                black_box(self.ctx.verify(
                    &fixture.hash,
                    fixture.point.as_bytes(),
                    &fixture.signature,
                    VerifyOptions::default(),
                )?);
            }
            BenchOperation::PointFromScalar => {
                black_box(
                    self.ctx.point_from_scalar(&fixture.private_key, PointOptions::default())?,
                );
            }
            BenchOperation::PointAdd => {
                black_box(self.ctx.point_add(
                    fixture.point.as_bytes(),
                    fixture.other.as_bytes(),
                    PointOptions::default(),
                )?);
            }
        }
        Ok(())
    }

    /// Run until one of the limits is reached
    pub fn run(&self) -> Result<BenchReport, BenchError> {
        let max_ops = self.config.max_ops;
        let max_time = self.config.max_time_secs;
        if max_ops == 0 && max_time == 0 {
            return Err(BenchError::Unbounded);
        }
        let batch_size = self.config.batch_size;
        if batch_size == 0 {
            return Err(BenchError::EmptyBatch);
        }

        let num_threads = if self.config.threads == 0 {
            num_cpus::get()
        } else {
            self.config.threads
        };
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build()?;

        info!(operation = %self.operation, threads = num_threads, "benchmark started");

        let stats = OpStats::new();
        let printer = self.config.progress.then(|| {
            let stats = Arc::clone(&stats);
            thread::spawn(move || {
                while stats.is_running() {
                    eprint!("\r{}", stats.format());
                    thread::sleep(Duration::from_millis(250));
                }
                eprintln!();
            })
        });

        let outcome = pool.install(|| {
            (0..num_threads).into_par_iter().try_for_each(|_| {
                // a failing worker halts the others too
                let fail = |err: BenchError| {
                    stats.stop();
                    err
                };
                let fixture = self.fixture().map_err(fail)?;
                while stats.is_running() {
                    if max_ops > 0 && stats.total_ops() >= max_ops {
                        stats.stop();
                        break;
                    }
                    if max_time > 0 && stats.elapsed().as_secs() >= max_time {
                        stats.stop();
                        break;
                    }
                    for _ in 0..batch_size {
                        self.run_once(&fixture).map_err(|err| fail(err.into()))?;
                    }
                    stats.add_ops(batch_size as u64);
                }
                Ok::<(), BenchError>(())
            })
        });

        stats.stop();
        if let Some(handle) = printer {
            let _ = handle.join();
        }
        outcome?;

        let report = BenchReport {
            operation: self.operation,
            threads: num_threads,
            ops: stats.total_ops(),
            time_secs: stats.elapsed().as_secs_f64(),
            ops_per_second: stats.ops_per_second(),
        };
        info!(
            operation = %report.operation,
            ops = report.ops,
            ops_per_second = report.ops_per_second,
            "benchmark finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BenchConfig::default();
        assert_eq!(config.threads, 0);
        assert_eq!(config.batch_size, 256);
        assert_eq!(config.max_time_secs, 5);
        assert!(!config.progress);
    }

    #[test]
    fn test_unbounded_rejected() {
        let ctx: Secp256k1 = Secp256k1::default();
        let config = BenchConfig { max_ops: 0, max_time_secs: 0, ..Default::default() };
        let bench = Benchmark::new(&ctx, BenchOperation::Sign, config);
        assert!(matches!(bench.run(), Err(BenchError::Unbounded)));
    }

    #[test]
    fn test_every_operation_runs_to_op_limit() {
        let ctx: Secp256k1 = Secp256k1::default();
        for operation in BenchOperation::all() {
            let config = BenchConfig {
                threads: 2,
                batch_size: 8,
                max_ops: 32,
                max_time_secs: 0,
                progress: false,
            };
            let report = Benchmark::new(&ctx, operation, config).run().unwrap();
            assert_eq!(report.operation, operation);
            assert_eq!(report.threads, 2);
            assert!(report.ops >= 32, "{} ran {} ops", operation, report.ops);
        }
    }

    #[test]
    fn test_report_serializes() {
        let report = BenchReport {
            operation: BenchOperation::PointFromScalar,
            threads: 1,
            ops: 10,
            time_secs: 1.0,
            ops_per_second: 10.0,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["operation"], "pointFromScalar");
        assert_eq!(json["ops"], 10);
    }
}
