use crossbeam::channel::{self, Receiver, Sender};
use log::{info, warn};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crate::error::{Result, YarnError};
use crate::math::MeshSnapshot;
use crate::yarn::config::StrandConfig;
use crate::yarn::dispatch::run_pass;
use crate::yarn::output::StrandTargets;

pub enum YarnCommand {
    Generate(StrandConfig),
    Stop,
}

pub enum YarnResult {
    Mesh(MeshSnapshot),
    Error(String),
}

#[derive(Default)]
pub struct PassStats {
    passes: AtomicU64,
    last_pass_micros: AtomicU64,
}

impl PassStats {
    pub fn passes(&self) -> u64 {
        self.passes.load(Ordering::Relaxed)
    }

    pub fn last_pass_micros(&self) -> u64 {
        self.last_pass_micros.load(Ordering::Relaxed)
    }
}

pub struct YarnEngine {
    tx_cmd: Sender<YarnCommand>,
    rx_result: Receiver<YarnResult>,
    last_error: Arc<Mutex<Option<String>>>,
    stats: Arc<PassStats>,
    thread_handle: Option<JoinHandle<()>>,
}

impl YarnEngine {
    pub fn new() -> Self {
        let (tx_cmd, rx_cmd) = channel::unbounded::<YarnCommand>();
        let (tx_result, rx_result) = channel::bounded::<YarnResult>(2);
        let last_error = Arc::new(Mutex::new(None));
        let last_error_clone = Arc::clone(&last_error);
        let stats = Arc::new(PassStats::default());
        let stats_clone = Arc::clone(&stats);

        let thread_handle = thread::spawn(move || {
            yarn_thread(rx_cmd, tx_result, last_error_clone, stats_clone);
        });

        Self {
            tx_cmd,
            rx_result,
            last_error,
            stats,
            thread_handle: Some(thread_handle),
        }
    }

    pub fn generate(&self, config: StrandConfig) {
        let _ = self.tx_cmd.send(YarnCommand::Generate(config));
    }

    pub fn try_recv_result(&self) -> Option<YarnResult> {
        self.rx_result.try_recv().ok()
    }

    pub fn recv_result(&self) -> Result<YarnResult> {
        self.rx_result.recv().map_err(|_| YarnError::EngineStopped)
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().clone()
    }

    pub fn stats(&self) -> &PassStats {
        &self.stats
    }

    pub fn stop(&self) {
        let _ = self.tx_cmd.send(YarnCommand::Stop);
    }
}

impl Default for YarnEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for YarnEngine {
    fn drop(&mut self) {
        let _ = self.tx_cmd.send(YarnCommand::Stop);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

fn yarn_thread(
    rx_cmd: Receiver<YarnCommand>,
    tx_result: Sender<YarnResult>,
    last_error: Arc<Mutex<Option<String>>>,
    stats: Arc<PassStats>,
) {
    let mut targets: Option<StrandTargets> = None;

    loop {
        let cmd = match rx_cmd.recv() {
            Ok(c) => c,
            Err(_) => return,
        };

        match cmd {
            YarnCommand::Generate(config) => {
                *last_error.lock() = None;

                if let Err(e) = config.validate() {
                    let e = e.to_string();
                    warn!("rejected config: {}", e);
                    *last_error.lock() = Some(e.clone());
                    let _ = tx_result.send(YarnResult::Error(e));
                    continue;
                }

                let targets = match targets.take() {
                    Some(t) if t.fits(&config) => targets.insert(t),
                    _ => {
                        info!(
                            "allocating targets: {} vertices, {} lines",
                            config.vertex_capacity(),
                            config.line_capacity()
                        );
                        targets.insert(StrandTargets::for_config(&config))
                    }
                };

                let started = Instant::now();
                run_pass(&config, targets);
                let elapsed = started.elapsed().as_micros() as u64;

                stats.passes.fetch_add(1, Ordering::Relaxed);
                stats.last_pass_micros.store(elapsed, Ordering::Relaxed);

                let _ = tx_result.send(YarnResult::Mesh(targets.snapshot()));
            }
            YarnCommand::Stop => return,
        }
    }
}
