use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::VkdlError;

static RESOURCE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"audio(-?\d+)_(\d+)(\w+)?").unwrap());

/// Identifies a single audio item on VK, as extracted from a share link.
///
/// The owner id is a signed numeric string; negative owners denote groups and
/// other non-personal namespaces. The access key is whatever trails the item
/// id in the link and is empty when the link has none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDescriptor {
    pub owner_id: String,
    pub item_id: String,
    pub access_key: String,
}

impl ResourceDescriptor {
    /// Extracts the descriptor from anywhere inside the given string.
    pub fn parse(input: &str) -> Result<ResourceDescriptor, VkdlError> {
        let caps = RESOURCE_RE
            .captures(input)
            .ok_or_else(|| VkdlError::InvalidResourceUrl {
                input: input.to_string(),
            })?;
        Ok(ResourceDescriptor {
            owner_id: caps[1].to_string(),
            item_id: caps[2].to_string(),
            access_key: caps
                .get(3)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
        })
    }

    /// The `audios` query value expected by the lookup API. A trailing
    /// underscore when the access key is empty is accepted by the remote end.
    pub fn api_query(&self) -> String {
        format!("{}_{}_{}", self.owner_id, self.item_id, self.access_key)
    }
}
