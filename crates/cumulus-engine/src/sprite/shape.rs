use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Marker shape drawn inside each point sprite.
///
/// The active shape is baked into the render pipeline through the
/// `SHAPE` override constant of `point_sprite.wgsl`; [`Shape::pipeline_id`]
/// must stay in sync with the `switch` in that shader.
///
/// Serialized by [`Shape::name`]; parsing is case-insensitive.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Shape {
    #[default]
    Disc,
    Ring,
    Square,
    Diamond,
    ArrowRight,
    Clover,
    Vbar,
    Hbar,
    Cross,
}

impl Shape {
    pub const ALL: [Shape; 9] = [
        Shape::Disc,
        Shape::Ring,
        Shape::Square,
        Shape::Diamond,
        Shape::ArrowRight,
        Shape::Clover,
        Shape::Vbar,
        Shape::Hbar,
        Shape::Cross,
    ];

    /// Value of the `SHAPE` pipeline-overridable constant.
    pub const fn pipeline_id(self) -> u32 {
        match self {
            Shape::Disc => 0,
            Shape::Ring => 1,
            Shape::Square => 2,
            Shape::Diamond => 3,
            Shape::ArrowRight => 4,
            Shape::Clover => 5,
            Shape::Vbar => 6,
            Shape::Hbar => 7,
            Shape::Cross => 8,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Shape::Disc => "disc",
            Shape::Ring => "ring",
            Shape::Square => "square",
            Shape::Diamond => "diamond",
            Shape::ArrowRight => "arrow_right",
            Shape::Clover => "clover",
            Shape::Vbar => "vbar",
            Shape::Hbar => "hbar",
            Shape::Cross => "cross",
        }
    }

    /// Signed distance (in pixels) from a sprite-local point to the shape boundary.
    ///
    /// - `p` is the point coordinate in `[0, 1]²`, origin at the sprite's top-left.
    /// - `sprite_size` is the full quad side in pixels (marker plus stroke/AA margin).
    /// - `marker_size` is the point's own size attribute.
    ///
    /// Negative inside, positive outside.
    pub fn distance(self, p: Vec2, sprite_size: f32, marker_size: f32) -> f32 {
        let size = sprite_size;
        let half = marker_size / 2.0;
        let c = p - Vec2::splat(0.5);

        match self {
            Shape::Disc => (c * size).length() - half,

            Shape::Ring => {
                let r1 = (c * size).length() - half;
                let r2 = (c * size).length() - marker_size / 4.0;
                r1.max(-r2)
            }

            Shape::Square => (c.x.abs() * size).max(c.y.abs() * size) - half,

            Shape::Diamond => c.x.abs() * size + c.y.abs() * size - half,

            Shape::ArrowRight => {
                let r1 = (p.x - 0.50).abs() * size + (p.y - 0.5).abs() * size - half;
                let r2 = (p.x - 0.25).abs() * size + (p.y - 0.5).abs() * size - half;
                r1.max(-r2)
            }

            Shape::Clover => {
                let lobe = |t: f32| {
                    let center = 0.2 * Vec2::new(t.cos(), t.sin());
                    ((c - center) * size).length() - marker_size / 3.0
                };
                let t1 = -PI / 2.0;
                let t2 = t1 + 2.0 * PI / 3.0;
                let t3 = t2 + 2.0 * PI / 3.0;
                lobe(t1).min(lobe(t2)).min(lobe(t3))
            }

            Shape::Vbar => {
                let r1 = bars(p.x, size);
                let r3 = box_term(c, size);
                r1.max(r3) - half
            }

            Shape::Hbar => {
                let r2 = bars(p.y, size);
                let r3 = box_term(c, size);
                r2.max(r3) - half
            }

            Shape::Cross => {
                let r1 = bars(p.x, size);
                let r2 = bars(p.y, size);
                let r3 = box_term(c, size);
                r1.min(r2).max(r3) - half
            }
        }
    }
}

// max(|v - .75|, |v - .25|) * size
fn bars(v: f32, size: f32) -> f32 {
    ((v - 0.75).abs() * size).max((v - 0.25).abs() * size)
}

// max(|x - .5|, |y - .5|) * size, with `c` already centered
fn box_term(c: Vec2, size: f32) -> f32 {
    (c.x.abs() * size).max(c.y.abs() * size)
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a shape name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sprite shape `{0}` (expected one of: disc, ring, square, diamond, arrow_right, clover, vbar, hbar, cross)")]
pub struct ShapeParseError(pub String);

impl FromStr for Shape {
    type Err = ShapeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        // "clober" is accepted for old configs that used the misspelled name.
        if wanted == "clober" {
            return Ok(Shape::Clover);
        }
        Shape::ALL
            .into_iter()
            .find(|shape| shape.name() == wanted)
            .ok_or_else(|| ShapeParseError(s.to_string()))
    }
}

impl TryFrom<String> for Shape {
    type Error = ShapeParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Shape> for String {
    fn from(shape: Shape) -> Self {
        shape.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CENTER: Vec2 = Vec2::new(0.5, 0.5);

    // Default style: linewidth 1, antialias 1, marker 10 -> sprite 10 + 2 * (1 + 1.5) = 15.
    const SPRITE: f32 = 15.0;
    const MARKER: f32 = 10.0;

    #[test]
    fn disc_center_is_minus_radius() {
        assert_eq!(Shape::Disc.distance(CENTER, SPRITE, MARKER), -5.0);
    }

    #[test]
    fn disc_boundary_is_zero() {
        // 5 px right of center in a 15 px sprite.
        let p = Vec2::new(0.5 + 5.0 / SPRITE, 0.5);
        assert!(Shape::Disc.distance(p, SPRITE, MARKER).abs() < 1e-5);
    }

    #[test]
    fn disc_corner_is_outside() {
        let r = Shape::Disc.distance(Vec2::ZERO, SPRITE, MARKER);
        let expected = (2.0f32 * 7.5 * 7.5).sqrt() - 5.0;
        assert!((r - expected).abs() < 1e-4);
    }

    #[test]
    fn ring_center_is_hollow() {
        // Inside the inner radius the ring distance is positive.
        assert!(Shape::Ring.distance(CENTER, SPRITE, MARKER) > 0.0);
    }

    #[test]
    fn ring_between_radii_is_inside() {
        // 3.75 px from center: between s/4 = 2.5 and s/2 = 5.
        let p = Vec2::new(0.5 + 3.75 / SPRITE, 0.5);
        assert!(Shape::Ring.distance(p, SPRITE, MARKER) < 0.0);
    }

    #[test]
    fn square_and_diamond_differ_on_diagonal() {
        let p = Vec2::new(0.5 + 4.0 / SPRITE, 0.5 + 4.0 / SPRITE);
        assert!(Shape::Square.distance(p, SPRITE, MARKER) < 0.0);
        assert!(Shape::Diamond.distance(p, SPRITE, MARKER) > 0.0);
    }

    #[test]
    fn arrow_notch_is_cut_out() {
        // The notch is centered at x = .25; left-of-center points fall inside it.
        let notch = Vec2::new(0.25, 0.5);
        assert!(Shape::ArrowRight.distance(notch, SPRITE, MARKER) > 0.0);
        let tip = Vec2::new(0.6, 0.5);
        assert!(Shape::ArrowRight.distance(tip, SPRITE, MARKER) < 0.0);
    }

    #[test]
    fn clover_lobe_centers_are_inside() {
        let top = CENTER + 0.2 * Vec2::new((-PI / 2.0).cos(), (-PI / 2.0).sin());
        assert!(Shape::Clover.distance(top, SPRITE, MARKER) < 0.0);
    }

    #[test]
    fn cross_arms_are_symmetric() {
        let right = Vec2::new(0.5 + 2.0 / SPRITE, 0.5);
        let down = Vec2::new(0.5, 0.5 + 2.0 / SPRITE);
        let a = Shape::Cross.distance(right, SPRITE, MARKER);
        let b = Shape::Cross.distance(down, SPRITE, MARKER);
        assert!((a - b).abs() < 1e-5);
    }

    #[test]
    fn hbar_is_vbar_transposed() {
        let p = Vec2::new(0.3, 0.6);
        let q = Vec2::new(0.6, 0.3);
        let v = Shape::Vbar.distance(p, SPRITE, MARKER);
        let h = Shape::Hbar.distance(q, SPRITE, MARKER);
        assert!((v - h).abs() < 1e-5);
    }

    #[test]
    fn pipeline_ids_are_unique() {
        let mut ids: Vec<u32> = Shape::ALL.iter().map(|s| s.pipeline_id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), Shape::ALL.len());
    }

    #[test]
    fn parse_names() {
        for shape in Shape::ALL {
            assert_eq!(shape.name().parse::<Shape>().unwrap(), shape);
        }
        assert_eq!(" Disc ".parse::<Shape>().unwrap(), Shape::Disc);
        assert_eq!("clober".parse::<Shape>().unwrap(), Shape::Clover);
    }

    #[test]
    fn parse_unknown_fails() {
        let err = "hexagon".parse::<Shape>().unwrap_err();
        assert_eq!(err, ShapeParseError("hexagon".to_string()));
    }
}
