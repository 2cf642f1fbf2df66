use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::Deserialize;
use thiserror::Error;

/// Graphviz layout programs.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    Neato,
    Dot,
    Twopi,
    Circo,
    Fdp,
    Sfdp,
    Osage,
    Patchwork,
    Nop,
}

/// What a city node shows.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeLabel {
    /// Empty circle, city name placed beside it.
    External,
    /// City name inside the node.
    Inside,
    /// Upper-cased city key inside the node.
    Key,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown {kind}: {value:?}")]
pub struct UnknownOption {
    kind: &'static str,
    value: String,
}

/// Rendering configuration shared by the graph builder and the renderers.
///
/// Every field is optional when deserialized; missing fields keep their
/// default value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Style {
    pub background: String,
    pub node_colour: String,
    pub node_shape: String,
    /// Colour used for wild routes.
    pub edge_colour: String,
    pub node_label: NodeLabel,
    pub engine: Engine,
    pub format: String,
    /// Additional graph attributes, written verbatim.
    pub graph_attrs: BTreeMap<String, String>,
}

impl Default for Style {
    fn default() -> Self {
        let graph_attrs = [
            ("margin", "0.1"),
            ("model", "mds"),
            ("esep", "+3"),
            ("outputOrder", "nodesfirst"),
            ("pad", "0.5"),
            ("rankdir", "LR"),
            ("start", "self?10?"),
        ]
        .iter()
        .map(|&(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Style {
            background: "darkgoldenrod".into(),
            node_colour: "white".into(),
            node_shape: "circle".into(),
            edge_colour: "dimgray".into(),
            node_label: NodeLabel::External,
            engine: Engine::Neato,
            format: "svg".into(),
            graph_attrs,
        }
    }
}

impl Style {
    pub fn graph_attributes(&self) -> Vec<(&str, &str)> {
        let mut attrs = vec![("bgcolor", self.background.as_str())];
        attrs.extend(
            self.graph_attrs
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str())),
        );
        attrs
    }

    pub fn node_attributes(&self) -> Vec<(&str, &str)> {
        vec![
            ("fillcolor", self.node_colour.as_str()),
            ("style", "filled"),
            ("shape", self.node_shape.as_str()),
        ]
    }

    pub fn edge_attributes(&self) -> Vec<(&str, &str)> {
        vec![("color", self.edge_colour.as_str())]
    }
}

impl Engine {
    pub const ALL: [Engine; 9] = [
        Engine::Neato,
        Engine::Dot,
        Engine::Twopi,
        Engine::Circo,
        Engine::Fdp,
        Engine::Sfdp,
        Engine::Osage,
        Engine::Patchwork,
        Engine::Nop,
    ];

    pub fn program(self) -> &'static str {
        use Engine::*;

        match self {
            Neato => "neato",
            Dot => "dot",
            Twopi => "twopi",
            Circo => "circo",
            Fdp => "fdp",
            Sfdp => "sfdp",
            Osage => "osage",
            Patchwork => "patchwork",
            Nop => "nop",
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.program())
    }
}

impl FromStr for Engine {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Engine::ALL
            .iter()
            .copied()
            .find(|e| e.program().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownOption {
                kind: "layout engine",
                value: s.into(),
            })
    }
}

impl FromStr for NodeLabel {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "external" => Ok(NodeLabel::External),
            "inside" => Ok(NodeLabel::Inside),
            "key" => Ok(NodeLabel::Key),
            _ => Err(UnknownOption {
                kind: "node label mode",
                value: s.into(),
            }),
        }
    }
}
