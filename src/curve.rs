use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Number of read-ratio buckets: 0%, 2%, .. 100%, inclusive.
pub const NUM_BUCKETS: usize = 51;

/// One measured (bandwidth, latency) pair, already normalized into the
/// units `access()` works in: accesses per CPU cycle, and CPU cycles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    pub bandwidth: f64,
    pub latency: f64,
}

/// One bandwidth-latency curve for a single read-ratio bucket, ordered
/// descending in bandwidth (the first point is the saturation point, the
/// last is the idle point). Points are stored exactly in file order; the
/// loader does not re-sort them.
#[derive(Debug, Clone, Default)]
pub struct Curve {
    points: Vec<CurvePoint>,
}

impl Curve {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }
}

/// The loaded family of 51 curves, one per read-ratio bucket, plus the
/// per-bucket and global bandwidth/latency extremes derived from them.
/// Read-only after [`CurveStore::load`] returns; safe to share behind an
/// `Arc` across multiple [`crate::ctrl::MessMemCtrl`] instances configured
/// with the same curve family.
#[derive(Debug, Clone)]
pub struct CurveStore {
    curves: Vec<Curve>,
    max_bandwidth_per_bucket: Vec<f64>,
    max_latency_per_bucket: Vec<f64>,
    lead_off_latency: f64,
    max_bandwidth: f64,
    max_latency: f64,
}

impl CurveStore {
    /// Load the curve family from `{path}/bwlat_{b}.txt` for
    /// `b in {0, 2, .. 100}`, converting raw (MB/s, cycles-at-curve-frequency)
    /// pairs into (accesses/cycle, CPU cycles).
    ///
    /// A single missing file is non-fatal: the bucket is left empty and a
    /// warning is logged. A missing directory, or every bucket coming back
    /// empty, fails construction.
    pub fn load(
        path: &Path,
        cpu_frequency: f64,
        curve_frequency: f64,
        on_core_latency: f64,
    ) -> Result<Self, ConfigError> {
        if cpu_frequency <= 0.0 {
            return Err(ConfigError::InvalidCpuFrequency(cpu_frequency));
        }
        if curve_frequency <= 0.0 {
            return Err(ConfigError::InvalidCurveFrequency(curve_frequency));
        }
        if !path.exists() {
            return Err(ConfigError::MissingDirectory(path.to_path_buf()));
        }

        let mut curves = Vec::with_capacity(NUM_BUCKETS);
        let mut max_bandwidth_per_bucket = Vec::with_capacity(NUM_BUCKETS);
        let mut max_latency_per_bucket = Vec::with_capacity(NUM_BUCKETS);

        let mut lead_off_latency = f64::INFINITY;
        let mut max_bandwidth = 0.0f64;
        let mut max_latency = 0.0f64;
        let mut any_points = false;

        for b in (0..=100usize).step_by(2) {
            let file_path = path.join(format!("bwlat_{b}.txt"));
            let curve = match fs::read_to_string(&file_path) {
                Ok(contents) => parse_curve_file(&file_path, &contents)?,
                Err(_) => {
                    tracing::warn!(file = %file_path.display(), "curve file missing, bucket will have no points");
                    Curve::default()
                }
            };

            let mut bucket_max_bw = 0.0f64;
            let mut bucket_max_lat = 0.0f64;
            for point in &curve.points {
                let bandwidth = (point.bandwidth / 64.0) / (cpu_frequency * 1000.0);
                let latency = point.latency * (cpu_frequency / curve_frequency) - on_core_latency;

                if latency < lead_off_latency {
                    lead_off_latency = latency;
                }
                if latency > max_latency {
                    max_latency = latency;
                }
                if bandwidth > max_bandwidth {
                    max_bandwidth = bandwidth;
                }
                if bandwidth > bucket_max_bw {
                    bucket_max_bw = bandwidth;
                }
                if latency > bucket_max_lat {
                    bucket_max_lat = latency;
                }
            }

            let normalized_points: Vec<CurvePoint> = curve
                .points
                .iter()
                .map(|p| CurvePoint {
                    bandwidth: (p.bandwidth / 64.0) / (cpu_frequency * 1000.0),
                    latency: p.latency * (cpu_frequency / curve_frequency) - on_core_latency,
                })
                .collect();

            if !normalized_points.is_empty() {
                any_points = true;
            }

            curves.push(Curve {
                points: normalized_points,
            });
            max_bandwidth_per_bucket.push(bucket_max_bw);
            max_latency_per_bucket.push(bucket_max_lat);
        }

        if !any_points {
            return Err(ConfigError::NoCurvesLoaded(path.to_path_buf()));
        }

        Ok(CurveStore {
            curves,
            max_bandwidth_per_bucket,
            max_latency_per_bucket,
            lead_off_latency,
            max_bandwidth,
            max_latency,
        })
    }

    pub fn curve(&self, bucket_index: usize) -> &Curve {
        &self.curves[bucket_index]
    }

    pub fn max_bandwidth_for_bucket(&self, bucket_index: usize) -> f64 {
        self.max_bandwidth_per_bucket[bucket_index]
    }

    pub fn max_latency_for_bucket(&self, bucket_index: usize) -> f64 {
        self.max_latency_per_bucket[bucket_index]
    }

    pub fn lead_off_latency(&self) -> f64 {
        self.lead_off_latency
    }

    pub fn max_bandwidth(&self) -> f64 {
        self.max_bandwidth
    }

    pub fn max_latency(&self) -> f64 {
        self.max_latency
    }

    pub fn num_buckets(&self) -> usize {
        self.curves.len()
    }
}

/// Parse a raw (unconverted) curve file: whitespace-separated
/// `<bandwidth_MBps> <latency_cycles>` pairs, one per line. Blank lines and
/// a missing trailing newline are tolerated.
fn parse_curve_file(path: &PathBuf, contents: &str) -> Result<Curve, ConfigError> {
    let mut points = Vec::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut fields = line.split_whitespace();
        let (Some(bw), Some(lat), None) = (fields.next(), fields.next(), fields.next()) else {
            return Err(ConfigError::UnparseableCurveFile {
                path: path.clone(),
                line: line.to_string(),
            });
        };
        let bandwidth: f64 = bw.parse().map_err(|_| ConfigError::UnparseableCurveFile {
            path: path.clone(),
            line: line.to_string(),
        })?;
        let latency: f64 = lat.parse().map_err(|_| ConfigError::UnparseableCurveFile {
            path: path.clone(),
            line: line.to_string(),
        })?;
        points.push(CurvePoint { bandwidth, latency });
    }
    Ok(Curve { points })
}
