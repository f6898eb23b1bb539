//! Per-phase run statistics.
//!
//! Phase timings are always recorded. Process CPU and memory are sampled
//! with sysinfo only when monitoring is requested and the `cli` feature is
//! built in.

use std::fmt::Write as _;
use std::time::{Duration, Instant};

/// Process usage at the end of a phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Usage {
    pub cpu_percent: f32,
    pub memory_mb: u64,
}

#[derive(Debug, Clone)]
pub struct PhaseStats {
    pub phase: &'static str,
    pub elapsed: Duration,
    pub usage: Option<Usage>,
}

/// What a pipeline run cost, phase by phase.
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    pub phases: Vec<PhaseStats>,
    pub total: Duration,
    pub peak_memory_mb: Option<u64>,
}

impl RunStats {
    pub fn phase(&self, name: &str) -> Option<&PhaseStats> {
        self.phases.iter().find(|p| p.phase == name)
    }

    pub fn render_text(&self) -> String {
        let mut out = String::from("📊 Run summary\n");
        for phase in &self.phases {
            let _ = write!(out, "   {:<10} {:>10.3}s", phase.phase, phase.elapsed.as_secs_f64());
            if let Some(usage) = phase.usage {
                let _ = write!(out, "   CPU {:>5.1}%   {} MB", usage.cpu_percent, usage.memory_mb);
            }
            out.push('\n');
        }
        let _ = write!(out, "   {:<10} {:>10.3}s", "total", self.total.as_secs_f64());
        if let Some(peak) = self.peak_memory_mb {
            let _ = write!(out, "   peak {} MB", peak);
        }
        out.push('\n');
        out
    }
}

/// Closes a phase each time `record` is called and collects the timings.
pub struct PhaseRecorder {
    started: Instant,
    phase_started: Instant,
    sampler: Option<UsageSampler>,
    stats: RunStats,
}

impl PhaseRecorder {
    pub fn new(sample_usage: bool) -> Self {
        let now = Instant::now();
        Self {
            started: now,
            phase_started: now,
            sampler: if sample_usage { UsageSampler::new() } else { None },
            stats: RunStats::default(),
        }
    }

    pub fn is_sampling(&self) -> bool {
        self.sampler.is_some()
    }

    pub fn record(&mut self, phase: &'static str) {
        let elapsed = self.phase_started.elapsed();
        let usage = self.sampler.as_mut().and_then(UsageSampler::sample);

        match usage {
            Some(u) => {
                tracing::info!(
                    "📊 {} - {:?}, CPU: {:.1}%, Memory: {}MB",
                    phase,
                    elapsed,
                    u.cpu_percent,
                    u.memory_mb
                );
                let peak = self.stats.peak_memory_mb.get_or_insert(0);
                *peak = (*peak).max(u.memory_mb);
            }
            None => tracing::debug!("{} took {:?}", phase, elapsed),
        }

        self.stats.phases.push(PhaseStats {
            phase,
            elapsed,
            usage,
        });
        self.phase_started = Instant::now();
    }

    pub fn finish(mut self) -> RunStats {
        self.stats.total = self.started.elapsed();
        if self.is_sampling() {
            tracing::info!(
                "📊 Total time: {:?}, peak memory: {}MB",
                self.stats.total,
                self.stats.peak_memory_mb.unwrap_or(0)
            );
        }
        self.stats
    }
}

#[cfg(feature = "cli")]
struct UsageSampler {
    system: sysinfo::System,
    pid: sysinfo::Pid,
}

#[cfg(feature = "cli")]
impl UsageSampler {
    fn new() -> Option<Self> {
        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => pid,
            Err(e) => {
                tracing::warn!("⚠️ Could not resolve current PID, monitoring disabled: {}", e);
                return None;
            }
        };
        let mut system = sysinfo::System::new();
        system.refresh_all();
        Some(Self { system, pid })
    }

    fn sample(&mut self) -> Option<Usage> {
        self.system.refresh_all();
        let process = self.system.process(self.pid)?;
        Some(Usage {
            cpu_percent: process.cpu_usage(),
            memory_mb: process.memory() / 1024 / 1024,
        })
    }
}

#[cfg(not(feature = "cli"))]
struct UsageSampler;

#[cfg(not(feature = "cli"))]
impl UsageSampler {
    fn new() -> Option<Self> {
        tracing::warn!("⚠️ Built without the cli feature, only timings are recorded");
        None
    }

    fn sample(&mut self) -> Option<Usage> {
        None
    }
}
