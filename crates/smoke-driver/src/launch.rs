//! Launching application instances.
//!
//! A [`Launcher`] knows how to start the desktop or browser-hosted flavour
//! and connect a driver to it. [`launch`] wraps it with the harness
//! bookkeeping: teardown guard, test extension setup, timing and process
//! registration.

use crate::code::Code;
use crate::config::SmokeConfig;
use crate::core::InstanceKind;
use crate::driver::Driver;
use crate::error::Error;
use crate::logging::measure_and_log;
use crate::process::{InstanceRegistry, KillHook};
use crate::result::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tokio::process::Child;
use tracing::debug;

/// Browser used for web instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    /// Chromium.
    #[default]
    Chromium,
    /// WebKit.
    Webkit,
    /// Firefox.
    Firefox,
}

impl Browser {
    /// Lowercase browser name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chromium => "chromium",
            Self::Webkit => "webkit",
            Self::Firefox => "firefox",
        }
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Browser {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "chromium" => Ok(Self::Chromium),
            "webkit" => Ok(Self::Webkit),
            "firefox" => Ok(Self::Firefox),
            other => Err(Error::config(format!("Unknown browser: {}", other))),
        }
    }
}

/// How to start an instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchOptions {
    /// Application build to run; `None` runs from sources.
    pub code_path: Option<PathBuf>,
    /// Folder opened in the instance.
    pub workspace_path: PathBuf,
    /// User data directory.
    pub user_data_dir: PathBuf,
    /// Extensions directory.
    pub extensions_path: PathBuf,
    /// Verbose driver logging.
    pub verbose: bool,
    /// Extra command line arguments.
    pub extra_args: Vec<String>,
    /// Run against a remote extension host.
    pub remote: bool,
    /// Launch the browser-hosted flavour.
    pub web: bool,
    /// Run the browser headless.
    pub headless: bool,
    /// Browser for web instances.
    pub browser: Option<Browser>,
}

impl LaunchOptions {
    /// Options for a workspace, with data and extensions under `root`.
    pub fn new(workspace_path: impl Into<PathBuf>, root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            workspace_path: workspace_path.into(),
            user_data_dir: root.join("d"),
            extensions_path: root.join("extensions-dir"),
            ..Self::default()
        }
    }

    /// Set the application build.
    pub fn with_code_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.code_path = Some(path.into());
        self
    }

    /// Launch the browser-hosted flavour in `browser`.
    pub fn with_web(mut self, browser: Browser, headless: bool) -> Self {
        self.web = true;
        self.browser = Some(browser);
        self.headless = headless;
        self
    }

    /// Append an extra command line argument.
    pub fn with_extra_arg(mut self, arg: impl Into<String>) -> Self {
        self.extra_args.push(arg.into());
        self
    }

    /// Instance flavour these options launch.
    pub fn kind(&self) -> InstanceKind {
        if self.web {
            InstanceKind::Server
        } else {
            InstanceKind::Electron
        }
    }
}

/// A started instance: its main process and a connected driver.
pub struct Launched {
    /// Main process (the server process for web instances).
    pub process: Child,
    /// Driver connected to the instance.
    pub driver: Box<dyn Driver>,
    /// Extra shutdown run before the process is killed, e.g. closing the
    /// browser of a web instance.
    pub kill: Option<KillHook>,
}

impl Launched {
    /// A launched instance without a kill hook.
    pub fn new(process: Child, driver: Box<dyn Driver>) -> Self {
        Self {
            process,
            driver,
            kill: None,
        }
    }

    /// Attach a kill hook.
    pub fn with_kill(mut self, hook: KillHook) -> Self {
        self.kill = Some(hook);
        self
    }
}

impl fmt::Debug for Launched {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Launched")
            .field("pid", &self.process.id())
            .field("kill_hook", &self.kill.is_some())
            .finish_non_exhaustive()
    }
}

/// Starts application instances.
#[async_trait]
pub trait Launcher: Send + Sync {
    /// Start the desktop application.
    async fn launch_electron(&self, options: &LaunchOptions) -> Result<Launched>;

    /// Start the server and a browser connected to it.
    async fn launch_web(&self, options: &LaunchOptions) -> Result<Launched>;
}

/// Launch an instance and register its process.
///
/// The launcher's kill hook is stored with the instance so teardown runs it
/// before killing the process.
///
/// Copies the test extension named in `config` from
/// `<repo_path>/extensions` into the extensions directory first. Fails with
/// [`Error::Stopped`] once `registry` has been torn down.
pub async fn launch(
    options: &LaunchOptions,
    launcher: &dyn Launcher,
    registry: &InstanceRegistry,
    repo_path: &Path,
    config: SmokeConfig,
) -> Result<Code> {
    if registry.is_stopped() {
        return Err(Error::Stopped);
    }

    let extension = &config.launch.extension_name;
    measure_and_log(
        copy_extension(repo_path, &options.extensions_path, extension),
        &format!("copyExtension({})", extension),
    )
    .await?;

    let kind = options.kind();
    let launched = match kind {
        InstanceKind::Server => {
            measure_and_log(launcher.launch_web(options), "launch playwright").await?
        }
        InstanceKind::Electron => {
            measure_and_log(launcher.launch_electron(options), "launch electron").await?
        }
    };

    let handle = registry.register_with_kill(kind, launched.process, launched.kill)?;
    Ok(Code::new(launched.driver, Some(handle), config).with_registry(registry.clone()))
}

/// Copy `<repo_path>/extensions/<name>` into `extensions_path` unless it is
/// already there.
pub async fn copy_extension(repo_path: &Path, extensions_path: &Path, name: &str) -> Result<()> {
    let dest = extensions_path.join(name);
    if tokio::fs::try_exists(&dest).await? {
        debug!(dest = %dest.display(), "extension already present");
        return Ok(());
    }

    let source = repo_path.join("extensions").join(name);
    copy_dir(&source, &dest).await
}

async fn copy_dir(source: &Path, dest: &Path) -> Result<()> {
    let mut pending = vec![(source.to_path_buf(), dest.to_path_buf())];

    while let Some((from, to)) = pending.pop() {
        tokio::fs::create_dir_all(&to).await?;

        let mut entries = tokio::fs::read_dir(&from).await?;
        while let Some(entry) = entries.next_entry().await? {
            let target = to.join(entry.file_name());
            if entry.file_type().await?.is_dir() {
                pending.push((entry.path(), target));
            } else {
                tokio::fs::copy(entry.path(), &target).await?;
            }
        }
    }

    Ok(())
}
