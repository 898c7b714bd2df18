#[cfg(feature = "cli")]
mod enabled {
    use std::sync::Mutex;
    use std::time::{Duration, Instant};
    use sysinfo::{Pid, ProcessesToUpdate, System};

    #[derive(Debug, Clone)]
    pub struct PhaseStats {
        pub cpu_usage: f32,
        pub memory_mb: u64,
        pub peak_memory_mb: u64,
        pub elapsed: Duration,
    }

    /// Samples this process' CPU and memory between pipeline phases.
    pub struct SystemMonitor {
        state: Option<Mutex<MonitorState>>,
        started: Instant,
    }

    struct MonitorState {
        system: System,
        pid: Pid,
        peak_memory_mb: u64,
    }

    impl SystemMonitor {
        pub fn new(enabled: bool) -> Self {
            let state = if enabled {
                match sysinfo::get_current_pid() {
                    Ok(pid) => Some(Mutex::new(MonitorState {
                        system: System::new(),
                        pid,
                        peak_memory_mb: 0,
                    })),
                    Err(e) => {
                        tracing::warn!("System monitoring unavailable: {}", e);
                        None
                    }
                }
            } else {
                None
            };

            Self {
                state,
                started: Instant::now(),
            }
        }

        pub fn sample(&self) -> Option<PhaseStats> {
            let mut state = self.state.as_ref()?.lock().ok()?;
            let pid = state.pid;
            state
                .system
                .refresh_processes(ProcessesToUpdate::Some(&[pid]), true);

            let process = state.system.process(pid)?;
            let cpu_usage = process.cpu_usage();
            let memory_mb = process.memory() / 1024 / 1024;
            state.peak_memory_mb = state.peak_memory_mb.max(memory_mb);

            Some(PhaseStats {
                cpu_usage,
                memory_mb,
                peak_memory_mb: state.peak_memory_mb,
                elapsed: self.started.elapsed(),
            })
        }

        pub fn log_stats(&self, phase: &str) {
            if let Some(stats) = self.sample() {
                tracing::info!(
                    "📊 {} - CPU: {:.1}%, Memory: {}MB, Peak: {}MB, Time: {:?}",
                    phase,
                    stats.cpu_usage,
                    stats.memory_mb,
                    stats.peak_memory_mb,
                    stats.elapsed
                );
            }
        }

        pub fn log_final_stats(&self) {
            if let Some(stats) = self.sample() {
                tracing::info!(
                    "📊 Final Stats - Total Time: {:?}, Peak Memory: {}MB",
                    stats.elapsed,
                    stats.peak_memory_mb
                );
            }
        }

        pub fn is_enabled(&self) -> bool {
            self.state.is_some()
        }
    }

    impl Default for SystemMonitor {
        fn default() -> Self {
            Self::new(false)
        }
    }
}

#[cfg(feature = "cli")]
pub use enabled::{PhaseStats, SystemMonitor};

// no sysinfo without the cli feature
#[cfg(not(feature = "cli"))]
#[derive(Default)]
pub struct SystemMonitor;

#[cfg(not(feature = "cli"))]
impl SystemMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn log_stats(&self, _phase: &str) {}

    pub fn log_final_stats(&self) {}

    pub fn is_enabled(&self) -> bool {
        false
    }
}
