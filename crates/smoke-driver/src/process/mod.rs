//! Process lifecycle for launched application instances.
//!
//! # Examples
//!
//! ```rust,no_run
//! use smoke_driver::core::InstanceKind;
//! use smoke_driver::process::{wait_for_shutdown_signal, InstanceRegistry};
//! use tokio::process::Command;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = InstanceRegistry::new();
//!
//!     let child = Command::new("code").arg("--wait").spawn()?;
//!     registry.register(InstanceKind::Electron, child)?;
//!
//!     let watcher = registry.clone();
//!     tokio::spawn(async move {
//!         if let Ok(signal) = wait_for_shutdown_signal().await {
//!             if let Some(code) = watcher.teardown(Some(signal)).await {
//!                 std::process::exit(code);
//!             }
//!         }
//!     });
//!
//!     // ... run smoke tests ...
//!
//!     registry.teardown(None).await;
//!     Ok(())
//! }
//! ```

pub mod registry;
pub mod signal;

pub use registry::{InstanceHandle, InstanceId, InstanceRegistry, KillFuture, KillHook};
pub use signal::{wait_for_shutdown_signal, SIGINT, SIGTERM};
