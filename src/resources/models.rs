use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Pdf,
    Image,
    Youtube,
    Link,
    Note,
    AiGenerated,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Pdf => "pdf",
            ResourceKind::Image => "image",
            ResourceKind::Youtube => "youtube",
            ResourceKind::Link => "link",
            ResourceKind::Note => "note",
            ResourceKind::AiGenerated => "ai_generated",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "pdf" => Ok(ResourceKind::Pdf),
            "image" => Ok(ResourceKind::Image),
            "youtube" => Ok(ResourceKind::Youtube),
            "link" => Ok(ResourceKind::Link),
            "note" => Ok(ResourceKind::Note),
            "ai_generated" => Ok(ResourceKind::AiGenerated),
            _ => Err(EngineError::invalid(format!("unknown resource kind '{}'", s))),
        }
    }
}

/// Processing stage of an uploaded resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResourceStatus {
    #[default]
    Uploaded,
    Parsed,
    Indexed,
}

impl fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResourceStatus::Uploaded => "uploaded",
            ResourceStatus::Parsed => "parsed",
            ResourceStatus::Indexed => "indexed",
        })
    }
}

/// Study material attached by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: Uuid,
    pub user_id: String,
    pub kind: ResourceKind,
    pub title: String,
    /// Base64 for images, text for notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub status: ResourceStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRequest {
    pub title: String,
    pub kind: ResourceKind,
    pub content: Option<String>,
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parses_serde_names() {
        for kind in [
            ResourceKind::Pdf,
            ResourceKind::Image,
            ResourceKind::Youtube,
            ResourceKind::Link,
            ResourceKind::Note,
            ResourceKind::AiGenerated,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind));
            assert_eq!(kind.as_str().parse::<ResourceKind>().unwrap(), kind);
        }
        assert_eq!("AI-Generated".parse::<ResourceKind>().unwrap(), ResourceKind::AiGenerated);
        assert!("video".parse::<ResourceKind>().unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_status_order_follows_pipeline() {
        assert!(ResourceStatus::Uploaded < ResourceStatus::Parsed);
        assert!(ResourceStatus::Parsed < ResourceStatus::Indexed);
    }
}
