#[cfg(feature = "cli")]
use std::sync::Mutex;
#[cfg(feature = "cli")]
use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

/// One sample taken at the end of a conversion phase.
#[cfg(feature = "cli")]
#[derive(Debug, Clone)]
pub struct PhaseSample {
    pub phase: String,
    pub records: usize,
    pub cpu_usage: f32,
    pub memory_mb: u64,
    pub phase_time: Duration,
}

#[cfg(feature = "cli")]
impl PhaseSample {
    pub fn records_per_second(&self) -> f64 {
        let secs = self.phase_time.as_secs_f64();
        if secs > 0.0 {
            self.records as f64 / secs
        } else {
            0.0
        }
    }
}

/// Samples this process between extract, transform and load.
#[cfg(feature = "cli")]
pub struct SystemMonitor {
    system: Mutex<System>,
    pid: Option<Pid>,
    start_time: Instant,
    samples: Mutex<Vec<PhaseSample>>,
    last_mark: Mutex<Instant>,
}

#[cfg(feature = "cli")]
impl SystemMonitor {
    pub fn new(enabled: bool) -> Self {
        let pid = if enabled {
            sysinfo::get_current_pid().ok()
        } else {
            None
        };
        if enabled && pid.is_none() {
            tracing::warn!("Unable to resolve current PID, resource stats disabled");
        }

        let now = Instant::now();
        Self {
            system: Mutex::new(System::new()),
            pid,
            start_time: now,
            samples: Mutex::new(Vec::new()),
            last_mark: Mutex::new(now),
        }
    }

    fn sample(&self, phase: &str, records: usize) -> Option<PhaseSample> {
        let pid = self.pid?;

        let mut system = self.system.lock().ok()?;
        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::nothing().with_cpu().with_memory(),
        );
        let process = system.process(pid)?;

        let mut last_mark = self.last_mark.lock().ok()?;
        let phase_time = last_mark.elapsed();
        *last_mark = Instant::now();

        Some(PhaseSample {
            phase: phase.to_string(),
            records,
            cpu_usage: process.cpu_usage(),
            memory_mb: process.memory() / 1024 / 1024,
            phase_time,
        })
    }

    pub fn log_stats(&self, phase: &str, records: usize) {
        let Some(sample) = self.sample(phase, records) else {
            return;
        };

        tracing::info!(
            "📊 {} - {} records in {:?} ({:.0}/s), CPU: {:.1}%, Memory: {}MB",
            sample.phase,
            sample.records,
            sample.phase_time,
            sample.records_per_second(),
            sample.cpu_usage,
            sample.memory_mb
        );
        if let Ok(mut samples) = self.samples.lock() {
            samples.push(sample);
        }
    }

    pub fn log_final_stats(&self) {
        if !self.is_enabled() {
            return;
        }
        let Ok(samples) = self.samples.lock() else {
            return;
        };

        let peak = samples.iter().map(|s| s.memory_mb).max().unwrap_or(0);
        let slowest = samples.iter().max_by_key(|s| s.phase_time);
        tracing::info!(
            "📊 Final Stats - Total Time: {:?}, Peak Memory: {}MB, Slowest Phase: {}",
            self.start_time.elapsed(),
            peak,
            slowest.map(|s| s.phase.as_str()).unwrap_or("-")
        );
    }

    /// Samples recorded so far, in phase order.
    pub fn samples(&self) -> Vec<PhaseSample> {
        self.samples
            .lock()
            .map(|samples| samples.clone())
            .unwrap_or_default()
    }

    pub fn is_enabled(&self) -> bool {
        self.pid.is_some()
    }
}

#[cfg(feature = "cli")]
impl Default for SystemMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}

// 非 CLI 環境的空實現
#[cfg(not(feature = "cli"))]
#[derive(Default)]
pub struct SystemMonitor;

#[cfg(not(feature = "cli"))]
impl SystemMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn log_stats(&self, _phase: &str, _records: usize) {}

    pub fn log_final_stats(&self) {}

    pub fn is_enabled(&self) -> bool {
        false
    }
}
