//! Nearest-region linking of measurement tokens.
//!
//! Each token is matched independently against every region centre, so one
//! region can collect several measurements (width and depth next to the same
//! table top, for instance). There is no global assignment step.

use crate::core::config::{ConfigError, ConfigValidator};
use crate::core::constants::DEFAULT_MAX_LINK_DISTANCE;
use crate::domain::{Connection, Link, Region, TextToken};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Configuration for [`SpatialLinker`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkingConfig {
    /// Maximum centre-to-centre distance in pixels for a link.
    pub max_distance: f32,
}

impl Default for LinkingConfig {
    fn default() -> Self {
        Self {
            max_distance: DEFAULT_MAX_LINK_DISTANCE,
        }
    }
}

impl ConfigValidator for LinkingConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_non_negative("max_distance", self.max_distance)
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Links tokens to the region whose bounding box centre is nearest.
#[derive(Debug, Clone, Default)]
pub struct SpatialLinker {
    config: LinkingConfig,
}

impl SpatialLinker {
    /// Creates a new linker with the given configuration.
    pub fn new(config: LinkingConfig) -> Self {
        Self { config }
    }

    /// Returns the configured maximum distance.
    pub fn max_distance(&self) -> f32 {
        self.config.max_distance
    }

    /// Links every token to its nearest region.
    ///
    /// `max_distance` overrides the configured limit for this call. Tokens
    /// without a bounding box are skipped, and a token whose nearest region
    /// is farther than the limit produces no link. When several regions are
    /// equally near, the first one in `regions` wins.
    pub fn link_tokens(
        &self,
        tokens: &[TextToken],
        regions: &[Region],
        max_distance: Option<f32>,
    ) -> Vec<Link> {
        let limit = max_distance.unwrap_or(self.config.max_distance);
        if tokens.is_empty() || regions.is_empty() {
            debug!(
                tokens = tokens.len(),
                regions = regions.len(),
                "Nothing to link"
            );
            return Vec::new();
        }

        let mut links = Vec::new();
        for token in tokens {
            let Some(token_bbox) = token.bbox else {
                continue;
            };
            let token_center = token_bbox.center();

            let mut nearest: Option<(&Region, f32)> = None;
            for region in regions {
                let distance = token_center.distance_to(&region.bbox().center());
                match nearest {
                    Some((_, best)) if distance >= best => {}
                    _ => nearest = Some((region, distance)),
                }
            }

            let Some((region, distance)) = nearest else {
                continue;
            };
            if distance > limit {
                debug!(
                    token = %token.text,
                    distance,
                    limit,
                    "Nearest region is beyond the link distance"
                );
                continue;
            }

            links.push(Link {
                token_text: token.text.clone(),
                token_bbox,
                region_type: region.component_type,
                region_bbox: *region.bbox(),
                distance: round_to_hundredths(distance),
                connection: Connection {
                    from: token_center,
                    to: region.bbox().center(),
                },
            });
        }

        debug!(
            tokens = tokens.len(),
            regions = regions.len(),
            links = links.len(),
            "Linked measurement tokens"
        );
        links
    }
}

fn round_to_hundredths(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::FEATURE_EPSILON;
    use crate::domain::{ComponentType, RegionShape, TokenBox};
    use crate::processors::{PixelRect, Point};

    fn region(x: u32, y: u32, w: u32, h: u32, component_type: ComponentType) -> Region {
        let bbox = PixelRect::new(x, y, w, h);
        Region {
            shape: RegionShape {
                bbox,
                area: bbox.area() as f32 * 0.9,
                area_ratio: bbox.area() as f32 * 0.9 / 800_000.0,
                aspect_ratio: bbox.aspect_ratio(FEATURE_EPSILON),
                extent: 0.9,
                vertex_count: 4,
            },
            component_type,
            predicted_score: 0.855,
        }
    }

    fn token(text: &str, cx: f32, cy: f32) -> TextToken {
        TextToken::new(text, 0.97, TokenBox::centered_at(cx, cy, 40.0, 16.0))
    }

    fn region_a() -> Region {
        region(100, 100, 300, 40, ComponentType::HorizontalSupport)
    }

    fn region_b() -> Region {
        region(50, 50, 40, 300, ComponentType::Leg)
    }

    #[test]
    fn test_links_token_to_only_region() {
        let links = SpatialLinker::default().link_tokens(&[token("24 in", 120.0, 95.0)], &[region_a()], None);
        assert_eq!(links.len(), 1);
        let link = &links[0];
        assert_eq!(link.token_text, "24 in");
        assert_eq!(link.region_type, ComponentType::HorizontalSupport);
        assert_eq!(link.region_bbox, PixelRect::new(100, 100, 300, 40));
        // sqrt(130^2 + 25^2)
        assert!((link.distance - 132.38).abs() < 1e-3);
        assert_eq!(link.connection.from, Point::new(120.0, 95.0));
        assert_eq!(link.connection.to, Point::new(250.0, 120.0));
    }

    #[test]
    fn test_picks_nearest_region() {
        let links = SpatialLinker::default().link_tokens(
            &[token("24 in", 120.0, 95.0)],
            &[region_a(), region_b()],
            None,
        );
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].region_type, ComponentType::Leg);
        // sqrt(50^2 + 105^2)
        assert!((links[0].distance - 116.30).abs() < 1e-3);
    }

    #[test]
    fn test_far_token_is_not_linked() {
        let links = SpatialLinker::default().link_tokens(
            &[token("36", 900.0, 780.0)],
            &[region_a(), region_b()],
            None,
        );
        assert!(links.is_empty());
    }

    #[test]
    fn test_empty_inputs_yield_no_links() {
        let linker = SpatialLinker::default();
        assert!(linker.link_tokens(&[], &[region_a()], None).is_empty());
        assert!(linker.link_tokens(&[token("12", 10.0, 10.0)], &[], None).is_empty());
    }

    #[test]
    fn test_region_can_receive_several_links() {
        let top = region(100, 50, 800, 200, ComponentType::TableTop);
        let tokens = vec![token("48 in", 500.0, 30.0), token("30 in", 920.0, 150.0)];
        let links = SpatialLinker::default().link_tokens(&tokens, &[top], None);
        assert_eq!(links.len(), 2);
        assert!(links.iter().all(|l| l.region_type == ComponentType::TableTop));
    }

    #[test]
    fn test_distance_never_exceeds_limit() {
        let regions = vec![region_a(), region_b(), region(600, 500, 200, 200, ComponentType::Panel)];
        let tokens: Vec<TextToken> = (0..10)
            .flat_map(|i| (0..8).map(move |j| token("1", i as f32 * 100.0, j as f32 * 100.0)))
            .collect();
        let limit = 150.0;
        let links = SpatialLinker::default().link_tokens(&tokens, &regions, Some(limit));
        assert!(!links.is_empty());
        assert!(links.len() < tokens.len());
        assert!(links.iter().all(|l| l.distance <= limit));
    }

    #[test]
    fn test_ties_go_to_first_region() {
        let left = region(0, 0, 100, 100, ComponentType::Panel);
        let right = region(200, 0, 100, 100, ComponentType::Drawer);
        let links = SpatialLinker::default().link_tokens(&[token("5", 150.0, 50.0)], &[left, right], None);
        assert_eq!(links[0].region_type, ComponentType::Panel);
    }

    #[test]
    fn test_tokens_without_bbox_are_skipped() {
        let unlocated = TextToken {
            text: "18".to_string(),
            confidence: 1.0,
            bbox: None,
        };
        let links = SpatialLinker::default().link_tokens(&[unlocated], &[region_a()], None);
        assert!(links.is_empty());
    }

    #[test]
    fn test_config_validation() {
        assert!(LinkingConfig::default().validate().is_ok());
        assert!(LinkingConfig { max_distance: -1.0 }.validate().is_err());
    }
}
