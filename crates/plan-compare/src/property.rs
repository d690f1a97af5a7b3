//! Execution plan element properties.
//!
//! A plan node or edge carries an ordered list of named properties. A
//! property value is either a display string or a nested property list, so
//! the properties of one element form a tree.

use crate::result::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Value of a plan property: a leaf string or a nested property list.
///
/// Serialized untagged: a JSON string is a leaf, a JSON array is nested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// Terminal value.
    Leaf(String),
    /// Sub-tree of properties.
    Nested(Vec<GraphElementProperty>),
}

impl PropertyValue {
    /// Nested properties, or `None` for a leaf.
    pub fn nested(&self) -> Option<&[GraphElementProperty]> {
        match self {
            Self::Leaf(_) => None,
            Self::Nested(children) => Some(children),
        }
    }

    /// Whether this value is a leaf string.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }
}

impl Default for PropertyValue {
    fn default() -> Self {
        Self::Leaf(String::new())
    }
}

/// A named property of a plan node or edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphElementProperty {
    /// Property name; the merge key between the two plans.
    pub name: String,

    /// Human readable value, possibly spanning several lines.
    #[serde(default)]
    pub display_value: String,

    /// Raw value or nested properties.
    #[serde(default)]
    pub value: PropertyValue,

    /// Ranking hint for the default presentation order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i32>,
}

impl GraphElementProperty {
    /// Create a leaf property whose value and display value are both `value`.
    pub fn leaf(name: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            name: name.into(),
            display_value: value.clone(),
            value: PropertyValue::Leaf(value),
            display_order: None,
        }
    }

    /// Create a property holding nested child properties.
    pub fn nested(
        name: impl Into<String>,
        display_value: impl Into<String>,
        children: Vec<GraphElementProperty>,
    ) -> Self {
        Self {
            name: name.into(),
            display_value: display_value.into(),
            value: PropertyValue::Nested(children),
            display_order: None,
        }
    }

    /// Set the display order hint.
    pub fn with_display_order(mut self, order: i32) -> Self {
        self.display_order = Some(order);
        self
    }

    /// Override the display value.
    pub fn with_display_value(mut self, display_value: impl Into<String>) -> Self {
        self.display_value = display_value.into();
        self
    }
}

/// A plan element selected for comparison.
///
/// Nodes are named operations; edges connect nodes and have no name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlanElement {
    /// A named plan operation.
    Node {
        /// Operation name, possibly multi-line.
        name: String,
        /// Properties of the operation.
        #[serde(default)]
        properties: Vec<GraphElementProperty>,
    },
    /// An edge between two operations.
    Edge {
        /// Properties of the edge.
        #[serde(default)]
        properties: Vec<GraphElementProperty>,
    },
}

impl PlanElement {
    /// Decode an element from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and decode an element from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Operation name, if the element is a node with a non-empty name.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Node { name, .. } if !name.is_empty() => Some(name),
            _ => None,
        }
    }

    /// Properties of the element.
    pub fn properties(&self) -> &[GraphElementProperty] {
        match self {
            Self::Node { properties, .. } | Self::Edge { properties } => properties,
        }
    }
}
