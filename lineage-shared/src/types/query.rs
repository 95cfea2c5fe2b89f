//! Query enumerations: which graph, which traversal scope, which view.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a string does not name a known enumeration value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown {kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Normalise user input: upper case, `-` and spaces folded into `_`.
fn normalise(value: &str) -> String {
    value.trim().to_ascii_uppercase().replace(['-', ' '], "_")
}

/// One of the independently-lifecycled named graphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GraphName {
    /// Authoritative current state.
    Main,
    /// Partially-observed multi-event assemblies awaiting promotion.
    Buffer,
    /// Isolated graph for tests.
    Mock,
    /// Append-only full-graph snapshots.
    History,
}

impl GraphName {
    pub const ALL: [GraphName; 4] = [Self::Main, Self::Buffer, Self::Mock, Self::History];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Main => "MAIN",
            Self::Buffer => "BUFFER",
            Self::Mock => "MOCK",
            Self::History => "HISTORY",
        }
    }
}

impl fmt::Display for GraphName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GraphName {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalise(s).as_str() {
            "MAIN" => Ok(Self::Main),
            "BUFFER" => Ok(Self::Buffer),
            "MOCK" => Ok(Self::Mock),
            "HISTORY" => Ok(Self::History),
            _ => Err(ParseEnumError::new("graph name", s)),
        }
    }
}

/// Traversal strategy of a lineage query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Scope {
    SourceAndDestination,
    EndToEnd,
    UltimateSource,
    UltimateDestination,
    Glossary,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SourceAndDestination => "SOURCE_AND_DESTINATION",
            Self::EndToEnd => "END_TO_END",
            Self::UltimateSource => "ULTIMATE_SOURCE",
            Self::UltimateDestination => "ULTIMATE_DESTINATION",
            Self::Glossary => "GLOSSARY",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalise(s).as_str() {
            "SOURCE_AND_DESTINATION" => Ok(Self::SourceAndDestination),
            "END_TO_END" => Ok(Self::EndToEnd),
            "ULTIMATE_SOURCE" => Ok(Self::UltimateSource),
            "ULTIMATE_DESTINATION" => Ok(Self::UltimateDestination),
            "GLOSSARY" => Ok(Self::Glossary),
            _ => Err(ParseEnumError::new("scope", s)),
        }
    }
}

/// Granularity at which result vertices are reported.
///
/// Ordered from coarsest to finest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum View {
    HostView,
    TableView,
    ColumnView,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HostView => "HOST_VIEW",
            Self::TableView => "TABLE_VIEW",
            Self::ColumnView => "COLUMN_VIEW",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for View {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept both HOST_VIEW and the compact "hostview" spelling.
        match normalise(s).as_str() {
            "HOST_VIEW" | "HOSTVIEW" => Ok(Self::HostView),
            "TABLE_VIEW" | "TABLEVIEW" => Ok(Self::TableView),
            "COLUMN_VIEW" | "COLUMNVIEW" => Ok(Self::ColumnView),
            _ => Err(ParseEnumError::new("view", s)),
        }
    }
}
