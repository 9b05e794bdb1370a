//! Associations between measurement tokens and regions.

use super::{ComponentType, TokenBox};
use crate::processors::{PixelRect, Point};
use serde::{Deserialize, Serialize};

/// The two centre points joined by a link.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    /// Centre of the token.
    pub from: Point,
    /// Centre of the region.
    pub to: Point,
}

/// A token associated with its nearest region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    /// Text of the token.
    pub token_text: String,
    /// Bounding box of the token.
    pub token_bbox: TokenBox,
    /// Label of the linked region.
    pub region_type: ComponentType,
    /// Bounding box of the linked region.
    pub region_bbox: PixelRect,
    /// Centre-to-centre distance in pixels, rounded to two decimals.
    pub distance: f32,
    /// Centre points of the token and the region.
    pub connection: Connection,
}
