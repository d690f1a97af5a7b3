//! # Smoke-test automation driver
//!
//! Drives a running IDE instance through a remote [`Driver`], with polled
//! `wait_for_*` helpers, call logging, process bookkeeping and teardown.
//!
//! ## Features
//!
//! - **Polling**: bounded retry-until-accepted loops with descriptive timeouts
//! - **Logging**: every driver call is logged through `tracing`
//! - **Process tracking**: launched instances are killed on teardown or signal
//! - **Configuration**: TOML file plus `SMOKE_*` environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use smoke_driver::launch::{launch, LaunchOptions, Launcher};
//! use smoke_driver::process::InstanceRegistry;
//! use smoke_driver::{Result, SmokeConfig};
//! use std::path::Path;
//!
//! async fn run(launcher: &dyn Launcher) -> Result<()> {
//!     let registry = InstanceRegistry::new();
//!     let config = SmokeConfig::load(Some(Path::new("smoke.toml")))?;
//!     let options = LaunchOptions::new("/tmp/workspace", "/tmp/smoke");
//!
//!     let code = launch(&options, launcher, &registry, Path::new("."), config).await?;
//!     code.wait_for_element(".monaco-workbench").await?;
//!     code.dispatch_keybinding("ctrl+shift+p").await?;
//!     code.wait_for_active_element(".quick-input-widget input").await?;
//!     code.exit().await?;
//!
//!     registry.teardown(None).await;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

pub mod code;
pub mod config;
pub mod core;
pub mod driver;
pub mod element;
pub mod error;
pub mod launch;
pub mod localization;
pub mod logging;
pub mod poll;
pub mod process;
pub mod result;

pub use code::Code;
pub use config::SmokeConfig;
pub use core::{Element, InstanceKind, LocaleInfo, LocalizedStrings, WindowId};
pub use driver::{Driver, DriverResult};
pub use element::{find_element, find_elements};
pub use error::{DriverError, Error, ProcessError};
pub use localization::LocaleExpectation;
pub use logging::{measure_and_log, LoggingDriver};
pub use poll::{poll, PollOptions};
pub use result::Result;
