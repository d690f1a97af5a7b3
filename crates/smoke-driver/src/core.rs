//! Core types shared by the driver surface.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Identifier of an application window.
///
/// # Examples
///
/// ```rust
/// use smoke_driver::core::WindowId;
///
/// let id = WindowId::new(1);
/// assert_eq!(id.get(), 1);
/// assert_eq!(id.to_string(), "1");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(u32);

impl WindowId {
    /// Wrap a raw window id.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// The raw window id.
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for WindowId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Snapshot of a DOM element reported by the driver.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// Tag name, e.g. `DIV`.
    pub tag_name: String,
    /// Space-separated class list.
    #[serde(default)]
    pub class_name: String,
    /// Text content of the element.
    #[serde(default)]
    pub text_content: String,
    /// Element attributes.
    #[serde(default)]
    pub attributes: HashMap<String, String>,
    /// Child elements, when queried recursively.
    #[serde(default)]
    pub children: Vec<Element>,
    /// Top offset in pixels.
    #[serde(default)]
    pub top: f64,
    /// Left offset in pixels.
    #[serde(default)]
    pub left: f64,
}

impl Element {
    /// Whether the class list contains `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.class_name.split_whitespace().any(|c| c == class)
    }
}

/// Locale reported by the running application.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LocaleInfo {
    /// Requested locale, if any was requested.
    pub locale: Option<String>,
    /// Active UI language.
    pub language: String,
}

/// A handful of localized UI strings used to verify language packs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LocalizedStrings {
    /// Translation of "Open".
    pub open: String,
    /// Translation of "Close".
    pub close: String,
    /// Translation of "Find".
    pub find: String,
}

/// Flavour of a launched application instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceKind {
    /// Desktop (Electron) application.
    Electron,
    /// Web server backing a browser-hosted instance.
    Server,
}

impl InstanceKind {
    /// Lowercase name used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Electron => "electron",
            Self::Server => "server",
        }
    }
}

impl fmt::Display for InstanceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
