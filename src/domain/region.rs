//! Region types for segmentation results.

use crate::processors::PixelRect;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic label assigned to a region by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    /// Long horizontal member such as a rail or stretcher.
    HorizontalSupport,
    /// Long vertical member.
    Leg,
    /// Large region in the top band of the image.
    TableTop,
    /// Large region below the top band, usually a cabinet face.
    DrawerSection,
    /// Small wide region.
    Drawer,
    /// Near-perfect rectangle with few corners.
    Panel,
    /// Anything else.
    Component,
}

impl ComponentType {
    /// Returns the wire name of the component type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentType::HorizontalSupport => "horizontal_support",
            ComponentType::Leg => "leg",
            ComponentType::TableTop => "table_top",
            ComponentType::DrawerSection => "drawer_section",
            ComponentType::Drawer => "drawer",
            ComponentType::Panel => "panel",
            ComponentType::Component => "component",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Geometric features of a candidate region, as produced by the extractor.
///
/// All feature values are computed once from the traced contour and never
/// change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionShape {
    /// Bounding rectangle of the contour.
    pub bbox: PixelRect,
    /// Polygon area of the contour (not the bounding box area).
    pub area: f32,
    /// `area` divided by the image area.
    pub area_ratio: f32,
    /// Longer bounding box side over the shorter one.
    pub aspect_ratio: f32,
    /// `area` divided by the bounding box area.
    pub extent: f32,
    /// Vertex count of the approximated polygon.
    pub vertex_count: usize,
}

impl RegionShape {
    /// Vertical centre of the bounding box relative to the image height.
    pub fn relative_y(&self, image_height: u32) -> f32 {
        let center_y = self.bbox.y as f32 + self.bbox.height as f32 / 2.0;
        center_y / image_height.max(1) as f32
    }

    /// Returns true if the bounding box is wider than it is tall.
    pub fn is_wide(&self) -> bool {
        self.bbox.width > self.bbox.height
    }
}

/// A classified region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    /// Geometric features from extraction.
    #[serde(flatten)]
    pub shape: RegionShape,
    /// Label assigned by the classifier.
    pub component_type: ComponentType,
    /// Confidence proxy in `[0, 0.92]`, derived from the extent.
    pub predicted_score: f32,
}

impl Region {
    /// Bounding rectangle of the region.
    pub fn bbox(&self) -> &PixelRect {
        &self.shape.bbox
    }

    /// Contour area of the region.
    pub fn area(&self) -> f32 {
        self.shape.area
    }

    /// Extent (rectangularity) of the region.
    pub fn extent(&self) -> f32 {
        self.shape.extent
    }
}
