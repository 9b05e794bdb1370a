//! Rule-based component classification.
//!
//! Labels are assigned from a fixed cascade over geometric features. The
//! first matching rule wins:
//!
//! 1. aspect ratio > 5: `horizontal_support` if wider than tall, else `leg`
//! 2. area ratio > 0.25 in the top band (relative y < 0.3): `table_top`
//! 3. area ratio > 0.15 below the top band (relative y > 0.3): `drawer_section`
//! 4. 2 < aspect ratio < 4 and area ratio < 0.1: `drawer`
//! 5. extent > 0.85 and at most 6 vertices: `panel`
//! 6. otherwise `component`

use crate::core::constants::{
    DRAWER_ASPECT_RATIO_RANGE, DRAWER_MAX_AREA_RATIO, DRAWER_SECTION_MIN_AREA_RATIO,
    ELONGATED_ASPECT_RATIO, MAX_PREDICTED_SCORE, PANEL_MAX_VERTICES, PANEL_MIN_EXTENT,
    SCORE_EXTENT_FACTOR, TABLE_TOP_MIN_AREA_RATIO, TOP_BAND_RELATIVE_Y,
};
use crate::domain::{ComponentType, Region, RegionShape};

/// The feature tuple the classification cascade looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionFeatures {
    /// Longer side over shorter side.
    pub aspect_ratio: f32,
    /// Contour area over image area.
    pub area_ratio: f32,
    /// Vertical centre over image height.
    pub relative_y: f32,
    /// Contour area over bounding box area.
    pub extent: f32,
    /// Vertex count of the approximated polygon.
    pub vertex_count: usize,
    /// Whether the bounding box is wider than tall.
    pub is_wide: bool,
}

impl RegionFeatures {
    /// Collects the features of a region shape.
    pub fn from_shape(shape: &RegionShape, image_height: u32) -> Self {
        Self {
            aspect_ratio: shape.aspect_ratio,
            area_ratio: shape.area_ratio,
            relative_y: shape.relative_y(image_height),
            extent: shape.extent,
            vertex_count: shape.vertex_count,
            is_wide: shape.is_wide(),
        }
    }
}

/// Stateless classifier labelling regions from their geometry.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegionClassifier;

impl RegionClassifier {
    /// Creates a new classifier.
    pub fn new() -> Self {
        Self
    }

    /// Classifies a candidate and computes its predicted score.
    pub fn classify(&self, shape: RegionShape, image_height: u32) -> Region {
        let features = RegionFeatures::from_shape(&shape, image_height);
        Region {
            component_type: classify_features(&features),
            predicted_score: predicted_score(shape.extent),
            shape,
        }
    }

    /// Classifies every candidate, keeping their order.
    pub fn classify_all(&self, shapes: Vec<RegionShape>, image_height: u32) -> Vec<Region> {
        shapes
            .into_iter()
            .map(|shape| self.classify(shape, image_height))
            .collect()
    }
}

/// Applies the rule cascade to a feature tuple.
pub fn classify_features(features: &RegionFeatures) -> ComponentType {
    let (drawer_min_ar, drawer_max_ar) = DRAWER_ASPECT_RATIO_RANGE;

    if features.aspect_ratio > ELONGATED_ASPECT_RATIO {
        if features.is_wide {
            ComponentType::HorizontalSupport
        } else {
            ComponentType::Leg
        }
    } else if features.area_ratio > TABLE_TOP_MIN_AREA_RATIO
        && features.relative_y < TOP_BAND_RELATIVE_Y
    {
        ComponentType::TableTop
    } else if features.area_ratio > DRAWER_SECTION_MIN_AREA_RATIO
        && features.relative_y > TOP_BAND_RELATIVE_Y
    {
        ComponentType::DrawerSection
    } else if features.aspect_ratio > drawer_min_ar
        && features.aspect_ratio < drawer_max_ar
        && features.area_ratio < DRAWER_MAX_AREA_RATIO
    {
        ComponentType::Drawer
    } else if features.extent > PANEL_MIN_EXTENT && features.vertex_count <= PANEL_MAX_VERTICES
    {
        ComponentType::Panel
    } else {
        ComponentType::Component
    }
}

/// Confidence proxy: `min(extent * 0.95, 0.92)`.
pub fn predicted_score(extent: f32) -> f32 {
    (extent * SCORE_EXTENT_FACTOR).min(MAX_PREDICTED_SCORE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::FEATURE_EPSILON;
    use crate::processors::PixelRect;

    const IMAGE_W: u32 = 1000;
    const IMAGE_H: u32 = 800;

    fn shape(bbox: PixelRect, area: f32, vertex_count: usize) -> RegionShape {
        RegionShape {
            bbox,
            area,
            area_ratio: area / (IMAGE_W * IMAGE_H) as f32,
            aspect_ratio: bbox.aspect_ratio(FEATURE_EPSILON),
            extent: area / (bbox.area() as f32 + FEATURE_EPSILON),
            vertex_count,
        }
    }

    fn features(aspect_ratio: f32, area_ratio: f32, relative_y: f32, extent: f32) -> RegionFeatures {
        RegionFeatures {
            aspect_ratio,
            area_ratio,
            relative_y,
            extent,
            vertex_count: 4,
            is_wide: true,
        }
    }

    #[test]
    fn test_elongated_regions() {
        let classifier = RegionClassifier::new();

        let a = shape(PixelRect::new(100, 100, 300, 40), 11_000.0, 4);
        assert!((a.aspect_ratio - 7.5).abs() < 1e-3);
        assert_eq!(
            classifier.classify(a, IMAGE_H).component_type,
            ComponentType::HorizontalSupport
        );

        let b = shape(PixelRect::new(50, 50, 40, 300), 11_000.0, 4);
        assert_eq!(classifier.classify(b, IMAGE_H).component_type, ComponentType::Leg);
    }

    #[test]
    fn test_square_region_falls_through_to_panel_or_component() {
        let classifier = RegionClassifier::new();
        let bbox = PixelRect::new(0, 0, 280, 250);

        // extent 0.8: no rule fires.
        let plain = shape(bbox, 56_000.0, 4);
        assert!((plain.area_ratio - 0.07).abs() < 1e-6);
        assert!((plain.relative_y(IMAGE_H) - 0.156).abs() < 1e-3);
        assert_eq!(
            classifier.classify(plain, IMAGE_H).component_type,
            ComponentType::Component
        );

        // extent 0.9 with four corners: panel.
        let rectangular = shape(bbox, 63_000.0, 4);
        assert_eq!(
            classifier.classify(rectangular, IMAGE_H).component_type,
            ComponentType::Panel
        );

        // Same extent but too many vertices.
        let jagged = shape(bbox, 63_000.0, 7);
        assert_eq!(
            classifier.classify(jagged, IMAGE_H).component_type,
            ComponentType::Component
        );
    }

    #[test]
    fn test_each_rule_in_order() {
        assert_eq!(
            classify_features(&features(1.5, 0.3, 0.2, 0.9)),
            ComponentType::TableTop
        );
        assert_eq!(
            classify_features(&features(1.5, 0.2, 0.6, 0.9)),
            ComponentType::DrawerSection
        );
        assert_eq!(
            classify_features(&features(3.0, 0.05, 0.6, 0.9)),
            ComponentType::Drawer
        );
        assert_eq!(
            classify_features(&features(1.2, 0.05, 0.6, 0.9)),
            ComponentType::Panel
        );
        assert_eq!(
            classify_features(&features(1.2, 0.05, 0.6, 0.7)),
            ComponentType::Component
        );
    }

    #[test]
    fn test_rule_precedence_and_boundaries() {
        // Elongation beats size.
        assert_eq!(
            classify_features(&features(6.0, 0.5, 0.1, 0.9)),
            ComponentType::HorizontalSupport
        );
        // A large region exactly on the band boundary is neither top nor section.
        assert_eq!(
            classify_features(&features(1.2, 0.3, 0.3, 0.9)),
            ComponentType::Panel
        );
        // Large region in the top band but below the table-top size.
        assert_eq!(
            classify_features(&features(1.2, 0.2, 0.2, 0.9)),
            ComponentType::Panel
        );
        // Drawer bounds are exclusive.
        assert_eq!(
            classify_features(&features(2.0, 0.05, 0.6, 0.7)),
            ComponentType::Component
        );
        assert_eq!(
            classify_features(&features(4.0, 0.05, 0.6, 0.7)),
            ComponentType::Component
        );
        // Aspect ratio of exactly 5 is not elongated.
        assert_eq!(
            classify_features(&features(5.0, 0.05, 0.6, 0.7)),
            ComponentType::Component
        );
    }

    #[test]
    fn test_classification_is_deterministic() {
        let f = features(3.3, 0.04, 0.7, 0.88);
        let first = classify_features(&f);
        for _ in 0..10 {
            assert_eq!(classify_features(&f), first);
        }
    }

    #[test]
    fn test_predicted_score_is_capped() {
        assert!((predicted_score(0.8) - 0.76).abs() < 1e-6);
        assert_eq!(predicted_score(1.0), 0.92);
        assert_eq!(predicted_score(0.99), 0.92);
        assert!(predicted_score(0.5) <= 0.92);
    }

    #[test]
    fn test_classify_all_keeps_order() {
        let shapes = vec![
            shape(PixelRect::new(100, 100, 300, 40), 11_000.0, 4),
            shape(PixelRect::new(50, 50, 40, 300), 11_000.0, 4),
        ];
        let regions = RegionClassifier::new().classify_all(shapes, IMAGE_H);
        assert_eq!(regions[0].component_type, ComponentType::HorizontalSupport);
        assert_eq!(regions[1].component_type, ComponentType::Leg);
    }
}
