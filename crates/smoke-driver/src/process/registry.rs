//! Registry of live application instances.
//!
//! Every launched application process is registered here so that teardown
//! can kill whatever is still running when the harness exits or receives a
//! termination signal.

use crate::core::InstanceKind;
use crate::error::ProcessError;
use crate::result::Result;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::process::ExitStatus;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, SystemTime};
use tokio::process::Child;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// How long a graceful kill waits before escalating to a forced kill.
pub const GRACEFUL_TIMEOUT: Duration = Duration::from_secs(5);

/// Future returned by a [`KillHook`].
pub type KillFuture = Pin<Box<dyn Future<Output = Result<()>> + Send>>;

/// Launcher-provided shutdown for an instance, such as closing the browser
/// attached to a web server. Runs once, before the process is signalled.
pub type KillHook = Box<dyn FnOnce() -> KillFuture + Send>;

/// Unique id of a registered instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId(uuid::Uuid);

impl InstanceId {
    /// Generate a new random id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug)]
enum ChildState {
    Running(Child),
    Exited(Option<ExitStatus>),
}

/// Handle to a registered application process.
#[derive(Clone)]
pub struct InstanceHandle {
    /// Registry id.
    pub id: InstanceId,

    /// Flavour of the instance.
    pub kind: InstanceKind,

    /// Process ID (PID).
    pub pid: u32,

    /// Timestamp when the process was registered.
    pub started_at: SystemTime,

    child: Arc<Mutex<ChildState>>,
    kill_hook: Arc<Mutex<Option<KillHook>>>,
}

impl fmt::Debug for InstanceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceHandle")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("pid", &self.pid)
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

impl InstanceHandle {
    fn new(kind: InstanceKind, child: Child, pid: u32, kill_hook: Option<KillHook>) -> Self {
        Self {
            id: InstanceId::generate(),
            kind,
            pid,
            started_at: SystemTime::now(),
            child: Arc::new(Mutex::new(ChildState::Running(child))),
            kill_hook: Arc::new(Mutex::new(kill_hook)),
        }
    }

    /// Check whether the process is still running without blocking.
    pub async fn is_running(&self) -> bool {
        let mut state = self.child.lock().await;

        if let ChildState::Running(child) = &mut *state {
            match child.try_wait() {
                Ok(None) => return true,
                Ok(Some(status)) => *state = ChildState::Exited(Some(status)),
                // Error checking status, assume not running
                Err(_) => *state = ChildState::Exited(None),
            }
        }

        false
    }

    /// Exit status, once the process has been observed to exit.
    pub async fn exit_status(&self) -> Option<ExitStatus> {
        match &*self.child.lock().await {
            ChildState::Exited(status) => *status,
            ChildState::Running(_) => None,
        }
    }

    /// Time since the process was registered.
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed().unwrap_or_default()
    }
}

/// Thread-safe registry of live instances.
///
/// Cloning the registry shares the same underlying state.
#[derive(Debug, Clone, Default)]
pub struct InstanceRegistry {
    instances: Arc<RwLock<HashMap<InstanceId, InstanceHandle>>>,
    stopped: Arc<AtomicBool>,
}

impl InstanceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a spawned process.
    pub fn register(&self, kind: InstanceKind, child: Child) -> Result<InstanceHandle> {
        self.register_with_kill(kind, child, None)
    }

    /// Track a spawned process together with a hook that [`kill`](Self::kill)
    /// runs before signalling it.
    pub fn register_with_kill(
        &self,
        kind: InstanceKind,
        child: Child,
        kill_hook: Option<KillHook>,
    ) -> Result<InstanceHandle> {
        let pid = child.id().ok_or(ProcessError::MissingPid)?;
        let has_hook = kill_hook.is_some();
        let handle = InstanceHandle::new(kind, child, pid, kill_hook);

        self.write().insert(handle.id, handle.clone());
        info!(kind = %kind, pid, kill_hook = has_hook, "registered instance");

        Ok(handle)
    }

    /// Look up an instance.
    pub fn get(&self, id: &InstanceId) -> Option<InstanceHandle> {
        self.read().get(id).cloned()
    }

    /// Stop tracking an instance without killing it.
    pub fn unregister(&self, id: &InstanceId) -> Option<InstanceHandle> {
        self.write().remove(id)
    }

    /// Ids of all tracked instances.
    pub fn list_active(&self) -> Vec<InstanceId> {
        self.read().keys().copied().collect()
    }

    /// Number of tracked instances.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether no instances are tracked.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Whether teardown has started.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Kill an instance and stop tracking it.
    ///
    /// The instance's kill hook runs first; a failing hook is logged and the
    /// process is signalled anyway. A graceful kill sends SIGTERM and
    /// escalates to SIGKILL after [`GRACEFUL_TIMEOUT`].
    pub async fn kill(&self, id: &InstanceId, graceful: bool) -> Result<()> {
        let handle = self
            .get(id)
            .ok_or_else(|| ProcessError::NotFound(id.to_string()))?;

        let hook = handle.kill_hook.lock().await.take();
        if let Some(hook) = hook {
            if let Err(e) = hook().await {
                warn!(instance = %id, "kill hook failed: {}", e);
            }
        }

        if !handle.is_running().await {
            self.unregister(id);
            return Ok(());
        }

        if graceful {
            self.kill_graceful(&handle).await?;
        } else {
            self.kill_forced(&handle).await?;
        }

        self.unregister(id);
        Ok(())
    }

    /// Drop instances whose process has exited, logging each one.
    ///
    /// Returns the number of instances removed.
    pub async fn reap_finished(&self) -> usize {
        let mut reaped = 0;

        for id in self.list_active() {
            let Some(handle) = self.get(&id) else { continue };
            if handle.is_running().await {
                continue;
            }

            let status = handle
                .exit_status()
                .await
                .map(|s| s.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            info!(
                "Process terminated (type: {}, pid: {}, status: {})",
                handle.kind, handle.pid, status
            );

            self.unregister(&id);
            reaped += 1;
        }

        reaped
    }

    /// Kill every tracked instance and refuse further launches.
    ///
    /// Instances that already exited are reaped first. Kills run one after
    /// another; failures are logged and do not stop the remaining kills.
    /// Returns the process exit code for `signal` (`128 + signal`), or
    /// `None` for a normal exit.
    pub async fn teardown(&self, signal: Option<i32>) -> Option<i32> {
        self.stopped.store(true, Ordering::SeqCst);
        self.reap_finished().await;

        for id in self.list_active() {
            if let Err(e) = self.kill(&id, true).await {
                warn!(instance = %id, "failed to kill instance during teardown: {}", e);
                self.unregister(&id);
            }
        }

        signal.map(|s| 128 + s)
    }

    async fn kill_graceful(&self, handle: &InstanceHandle) -> Result<()> {
        {
            let mut state = handle.child.lock().await;
            match &mut *state {
                ChildState::Running(child) => {
                    if send_term_signal(handle.pid).await.is_err() {
                        let _ = child.start_kill();
                    }
                }
                ChildState::Exited(_) => return Ok(()),
            }
        }

        let start = std::time::Instant::now();
        while start.elapsed() < GRACEFUL_TIMEOUT {
            if !handle.is_running().await {
                return Ok(());
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        self.kill_forced(handle).await
    }

    async fn kill_forced(&self, handle: &InstanceHandle) -> Result<()> {
        {
            let mut state = handle.child.lock().await;
            match &mut *state {
                ChildState::Running(child) => {
                    let _ = child.start_kill();
                    tokio::time::sleep(Duration::from_millis(100)).await;

                    if let Ok(Some(status)) = child.try_wait() {
                        *state = ChildState::Exited(Some(status));
                        return Ok(());
                    }
                }
                ChildState::Exited(_) => return Ok(()),
            }
        }

        kill_by_pid(handle.pid).await
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<InstanceId, InstanceHandle>> {
        self.instances.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<InstanceId, InstanceHandle>> {
        self.instances.write().unwrap_or_else(|e| e.into_inner())
    }
}

async fn send_term_signal(pid: u32) -> Result<()> {
    #[cfg(unix)]
    let output = tokio::process::Command::new("kill")
        .args(["-TERM", &pid.to_string()])
        .output()
        .await;

    #[cfg(windows)]
    let output = tokio::process::Command::new("taskkill")
        .args(["/PID", &pid.to_string()])
        .output()
        .await;

    #[cfg(not(any(unix, windows)))]
    let output: std::io::Result<std::process::Output> = Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "unsupported platform for process signals",
    ));

    check_signal_output(pid, output)
}

async fn kill_by_pid(pid: u32) -> Result<()> {
    #[cfg(unix)]
    let output = tokio::process::Command::new("kill")
        .args(["-KILL", &pid.to_string()])
        .output()
        .await;

    #[cfg(windows)]
    let output = tokio::process::Command::new("taskkill")
        .args(["/F", "/PID", &pid.to_string()])
        .output()
        .await;

    #[cfg(not(any(unix, windows)))]
    let output: std::io::Result<std::process::Output> = Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "unsupported platform for process signals",
    ));

    check_signal_output(pid, output)
}

fn check_signal_output(pid: u32, output: std::io::Result<std::process::Output>) -> Result<()> {
    let output = output.map_err(|e| ProcessError::SignalFailed {
        pid,
        reason: e.to_string(),
    })?;

    if !output.status.success() {
        return Err(ProcessError::SignalFailed {
            pid,
            reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
        .into());
    }

    Ok(())
}
