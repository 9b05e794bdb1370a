//! Geometric utilities for region extraction.
//!
//! This module provides the geometric primitives used by the pipeline: points,
//! axis-aligned pixel rectangles, and contour polygons with area, perimeter,
//! bounding rectangle and Douglas-Peucker simplification.

use imageproc::contours::Contour;
use itertools::{Itertools, MinMaxResult};
use serde::{Deserialize, Serialize};

/// A 2D point with floating-point coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X-coordinate of the point.
    pub x: f32,
    /// Y-coordinate of the point.
    pub y: f32,
}

impl Point {
    /// Creates a new point with the given coordinates.
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance_to(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// An axis-aligned rectangle in pixel space.
///
/// `width` and `height` count pixels, so a rectangle covering a single pixel
/// has a width and height of 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelRect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelRect {
    /// Creates a new rectangle.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Area of the rectangle in pixels.
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Centre of the rectangle, `(x + w/2, y + h/2)`.
    pub fn center(&self) -> Point {
        Point::new(
            self.x as f32 + self.width as f32 / 2.0,
            self.y as f32 + self.height as f32 / 2.0,
        )
    }

    /// Ratio of the longer side to the shorter side.
    ///
    /// `epsilon` is added to the shorter side so the ratio is always finite.
    pub fn aspect_ratio(&self, epsilon: f32) -> f32 {
        let long = self.width.max(self.height) as f32;
        let short = self.width.min(self.height) as f32;
        long / (short + epsilon)
    }

    /// Area of the intersection with another rectangle, 0 when disjoint.
    pub fn intersection_area(&self, other: &PixelRect) -> u64 {
        let x1 = self.x.max(other.x) as u64;
        let y1 = self.y.max(other.y) as u64;
        let x2 = (self.x as u64 + self.width as u64).min(other.x as u64 + other.width as u64);
        let y2 = (self.y as u64 + self.height as u64).min(other.y as u64 + other.height as u64);

        if x2 <= x1 || y2 <= y1 {
            return 0;
        }
        (x2 - x1) * (y2 - y1)
    }
}

/// A closed polygon, typically a traced contour or its approximation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Polygon {
    /// The vertices of the polygon, in traversal order.
    pub points: Vec<Point>,
}

impl Polygon {
    /// Creates a new polygon from a vector of points.
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Creates a polygon from an imageproc contour.
    pub fn from_contour(contour: &Contour<u32>) -> Self {
        let points = contour
            .points
            .iter()
            .map(|p| Point::new(p.x as f32, p.y as f32))
            .collect();
        Self { points }
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the polygon has no vertices.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Calculates the area of the polygon using the shoelace formula.
    ///
    /// Returns 0.0 if the polygon has fewer than 3 points.
    pub fn area(&self) -> f32 {
        if self.points.len() < 3 {
            return 0.0;
        }

        let mut area = 0.0;
        let n = self.points.len();
        for i in 0..n {
            let j = (i + 1) % n;
            area += self.points[i].x * self.points[j].y;
            area -= self.points[j].x * self.points[i].y;
        }
        area.abs() / 2.0
    }

    /// Calculates the perimeter of the closed polygon.
    pub fn perimeter(&self) -> f32 {
        let mut perimeter = 0.0;
        let n = self.points.len();
        if n < 2 {
            return 0.0;
        }
        for i in 0..n {
            let j = (i + 1) % n;
            perimeter += self.points[i].distance_to(&self.points[j]);
        }
        perimeter
    }

    /// Smallest pixel rectangle containing every vertex.
    ///
    /// Vertices are pixel coordinates, so the extent is inclusive on both ends.
    /// Returns `None` for an empty polygon or one with negative coordinates.
    pub fn bounding_rect(&self) -> Option<PixelRect> {
        let (min_x, max_x) = match self.points.iter().map(|p| p.x).minmax() {
            MinMaxResult::NoElements => return None,
            MinMaxResult::OneElement(x) => (x, x),
            MinMaxResult::MinMax(min, max) => (min, max),
        };
        let (min_y, max_y) = match self.points.iter().map(|p| p.y).minmax() {
            MinMaxResult::NoElements => return None,
            MinMaxResult::OneElement(y) => (y, y),
            MinMaxResult::MinMax(min, max) => (min, max),
        };
        if min_x < 0.0 || min_y < 0.0 {
            return None;
        }

        let x = min_x.floor() as u32;
        let y = min_y.floor() as u32;
        let width = max_x.floor() as u32 - x + 1;
        let height = max_y.floor() as u32 - y + 1;
        Some(PixelRect::new(x, y, width, height))
    }

    /// Approximates the closed polygon using the Douglas-Peucker algorithm.
    ///
    /// The contour is split at the vertex farthest from its first vertex and
    /// each half is simplified independently, so the result does not depend on
    /// the two traversal endpoints being neighbours.
    ///
    /// # Arguments
    ///
    /// * `epsilon` - The maximum distance between the original curve and the simplified curve.
    pub fn approx_poly_dp(&self, epsilon: f32) -> Polygon {
        if self.points.len() <= 2 {
            return self.clone();
        }

        let first = self.points[0];
        let (split, _) = self
            .points
            .iter()
            .enumerate()
            .skip(1)
            .fold((0usize, 0.0f32), |(best, best_dist), (i, p)| {
                let dist = first.distance_to(p);
                if dist > best_dist {
                    (i, dist)
                } else {
                    (best, best_dist)
                }
            });

        if split == 0 {
            return Polygon::new(vec![first]);
        }

        let mut head = Vec::new();
        Self::douglas_peucker(&self.points[..=split], epsilon, &mut head);

        let mut tail_input: Vec<Point> = self.points[split..].to_vec();
        tail_input.push(first);
        let mut tail = Vec::new();
        Self::douglas_peucker(&tail_input, epsilon, &mut tail);

        // Both halves share the split vertex, and the tail ends at the first vertex.
        head.pop();
        tail.pop();
        head.extend(tail);
        Polygon::new(head)
    }

    /// Implements the Douglas-Peucker algorithm for an open polyline.
    fn douglas_peucker(points: &[Point], epsilon: f32, result: &mut Vec<Point>) {
        if points.len() <= 2 {
            result.extend_from_slice(points);
            return;
        }

        let mut stack = vec![(0, points.len() - 1)];

        let mut keep = vec![false; points.len()];
        keep[0] = true;
        keep[points.len() - 1] = true;

        while let Some((start, end)) = stack.pop() {
            if end - start <= 1 {
                continue;
            }

            let mut max_dist = 0.0;
            let mut max_index = start;

            for i in (start + 1)..end {
                let dist = Self::point_to_line_distance(&points[i], &points[start], &points[end]);
                if dist > max_dist {
                    max_dist = dist;
                    max_index = i;
                }
            }

            if max_dist > epsilon {
                keep[max_index] = true;

                if max_index - start > 1 {
                    stack.push((start, max_index));
                }
                if end - max_index > 1 {
                    stack.push((max_index, end));
                }
            }
        }

        for (i, &should_keep) in keep.iter().enumerate() {
            if should_keep {
                result.push(points[i]);
            }
        }
    }

    /// Perpendicular distance from a point to the line through two points.
    ///
    /// Falls back to the distance to `line_start` when the line is degenerate.
    fn point_to_line_distance(point: &Point, line_start: &Point, line_end: &Point) -> f32 {
        let a = line_end.y - line_start.y;
        let b = line_start.x - line_end.x;
        let c = line_end.x * line_start.y - line_start.x * line_end.y;

        let denominator = (a * a + b * b).sqrt();
        if denominator == 0.0 {
            return point.distance_to(line_start);
        }

        (a * point.x + b * point.y + c).abs() / denominator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Traces the boundary pixels of a `w`x`h` rectangle clockwise from its top-left pixel.
    fn rect_outline(x0: f32, y0: f32, w: u32, h: u32) -> Polygon {
        let (w, h) = (w as f32 - 1.0, h as f32 - 1.0);
        let mut points = Vec::new();
        let mut x = 0.0;
        while x < w {
            points.push(Point::new(x0 + x, y0));
            x += 1.0;
        }
        let mut y = 0.0;
        while y < h {
            points.push(Point::new(x0 + w, y0 + y));
            y += 1.0;
        }
        while x > 0.0 {
            points.push(Point::new(x0 + x, y0 + h));
            x -= 1.0;
        }
        while y > 0.0 {
            points.push(Point::new(x0, y0 + y));
            y -= 1.0;
        }
        Polygon::new(points)
    }

    #[test]
    fn test_shoelace_area_and_perimeter() {
        let square = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ]);
        assert_eq!(square.area(), 100.0);
        assert_eq!(square.perimeter(), 40.0);

        let line = Polygon::new(vec![Point::new(0.0, 0.0), Point::new(5.0, 0.0)]);
        assert_eq!(line.area(), 0.0);
    }

    #[test]
    fn test_bounding_rect_is_inclusive() {
        let outline = rect_outline(10.0, 20.0, 30, 15);
        let rect = outline.bounding_rect().unwrap();
        assert_eq!(rect, PixelRect::new(10, 20, 30, 15));
        // Contour area runs through pixel centres.
        assert_eq!(outline.area(), 29.0 * 14.0);
        assert!(Polygon::default().bounding_rect().is_none());
    }

    #[test]
    fn test_approx_poly_dp_recovers_rectangle_corners() {
        let outline = rect_outline(5.0, 5.0, 60, 40);
        let approx = outline.approx_poly_dp(0.02 * outline.perimeter());
        assert_eq!(approx.len(), 4);
        for corner in [
            Point::new(5.0, 5.0),
            Point::new(64.0, 5.0),
            Point::new(64.0, 44.0),
            Point::new(5.0, 44.0),
        ] {
            assert!(approx.points.contains(&corner), "missing {corner:?}");
        }
    }

    #[test]
    fn test_approx_poly_dp_small_inputs() {
        let two = Polygon::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)]);
        assert_eq!(two.approx_poly_dp(1.0).len(), 2);

        let same = Polygon::new(vec![Point::new(3.0, 3.0); 4]);
        assert_eq!(same.approx_poly_dp(1.0).len(), 1);
    }

    #[test]
    fn test_rect_center_and_intersection() {
        let a = PixelRect::new(100, 100, 300, 40);
        assert_eq!(a.center(), Point::new(250.0, 120.0));

        let b = PixelRect::new(350, 110, 100, 100);
        assert_eq!(a.intersection_area(&b), 50 * 30);
        assert_eq!(b.intersection_area(&a), 50 * 30);

        let far = PixelRect::new(0, 0, 10, 10);
        assert_eq!(a.intersection_area(&far), 0);

        // Touching edges do not overlap.
        let touching = PixelRect::new(400, 100, 10, 10);
        assert_eq!(a.intersection_area(&touching), 0);
    }

    #[test]
    fn test_aspect_ratio_is_orientation_free() {
        let wide = PixelRect::new(0, 0, 300, 40);
        let tall = PixelRect::new(0, 0, 40, 300);
        assert!((wide.aspect_ratio(1e-5) - 7.5).abs() < 1e-3);
        assert_eq!(wide.aspect_ratio(1e-5), tall.aspect_ratio(1e-5));
    }
}
