//! Node and edge records as handed over by graph stores
//!
//! Edges come in two shapes: `{ fromId, toId }` and `{ source, target }`.
//! Both are resolved once, when the record is built or deserialized, so the
//! layout code only ever sees [`EdgeRecord::source`] and [`EdgeRecord::target`].

use serde::{Deserialize, Serialize};

/// A node to lay out, with whatever data the caller attaches to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord<P = ()> {
    pub id: String,
    #[serde(default)]
    pub data: P,
}

impl NodeRecord<()> {
    /// Create a node without payload
    pub fn bare(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            data: (),
        }
    }
}

impl<P> NodeRecord<P> {
    pub fn new(id: impl Into<String>, data: P) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }
}

/// The accepted field conventions for edge endpoints
///
/// Variants are tried in order when deserializing, so `fromId`/`toId` win
/// when a record carries both conventions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Endpoints {
    #[serde(rename_all = "camelCase")]
    FromTo { from_id: String, to_id: String },
    SourceTarget { source: String, target: String },
}

/// A directed edge between two nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Endpoints", into = "Endpoints")]
pub struct EdgeRecord {
    source: String,
    target: String,
}

impl EdgeRecord {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

impl From<Endpoints> for EdgeRecord {
    fn from(endpoints: Endpoints) -> Self {
        match endpoints {
            Endpoints::FromTo { from_id, to_id } => Self::new(from_id, to_id),
            Endpoints::SourceTarget { source, target } => Self::new(source, target),
        }
    }
}

impl From<EdgeRecord> for Endpoints {
    fn from(edge: EdgeRecord) -> Self {
        Endpoints::FromTo {
            from_id: edge.source,
            to_id: edge.target,
        }
    }
}

impl<S: Into<String>, T: Into<String>> From<(S, T)> for EdgeRecord {
    fn from((source, target): (S, T)) -> Self {
        Self::new(source, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_edge_from_id_convention() -> anyhow::Result<()> {
        let edge: EdgeRecord = serde_json::from_str(r#"{"fromId": "a", "toId": "b"}"#)?;
        assert_eq!(edge, EdgeRecord::new("a", "b"));
        Ok(())
    }

    #[test]
    fn test_edge_source_target_convention() -> anyhow::Result<()> {
        let edge: EdgeRecord =
            serde_json::from_str(r#"{"id": "e1", "source": "a", "target": "b"}"#)?;
        assert_eq!(edge.source(), "a");
        assert_eq!(edge.target(), "b");
        Ok(())
    }

    #[test]
    fn test_edge_from_id_takes_precedence() -> anyhow::Result<()> {
        let edge: EdgeRecord = serde_json::from_str(
            r#"{"fromId": "a", "toId": "b", "source": "x", "target": "y"}"#,
        )?;
        assert_eq!(edge, EdgeRecord::new("a", "b"));
        Ok(())
    }

    #[test]
    fn test_edge_without_endpoints_is_rejected() {
        let edge = serde_json::from_str::<EdgeRecord>(r#"{"fromId": "a", "target": "b"}"#);
        assert!(edge.is_err());
    }

    #[test]
    fn test_node_payload_defaults() -> anyhow::Result<()> {
        let node: NodeRecord<Option<String>> = serde_json::from_str(r#"{"id": "a"}"#)?;
        assert_eq!(node, NodeRecord::new("a", None));
        Ok(())
    }
}
