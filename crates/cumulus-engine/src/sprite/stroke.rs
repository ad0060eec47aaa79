use serde::{Deserialize, Serialize};

use crate::paint::Color;

/// Stroke parameters shared by every sprite in a draw (uniforms, not attributes).
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    /// Outline width in pixels.
    pub linewidth: f32,
    /// Width of the antialiasing falloff band in pixels.
    pub antialias: f32,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            linewidth: 1.0,
            antialias: 1.0,
        }
    }
}

/// Result of shading one sprite fragment.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Fragment {
    Discard,
    Color(Color),
}

impl Fragment {
    pub fn color(self) -> Option<Color> {
        match self {
            Fragment::Discard => None,
            Fragment::Color(c) => Some(c),
        }
    }
}

impl StrokeStyle {
    /// Full quad side length for a marker of `marker_size` pixels.
    ///
    /// Leaves room for the stroke plus one and a half AA bands on each side.
    #[inline]
    pub fn sprite_size(&self, marker_size: f32) -> f32 {
        marker_size + 2.0 * (self.linewidth + 1.5 * self.antialias)
    }

    /// Half stroke width minus the AA band.
    #[inline]
    pub fn inner_threshold(&self) -> f32 {
        self.linewidth / 2.0 - self.antialias
    }

    /// Distances beyond this are discarded.
    #[inline]
    pub fn outer_limit(&self) -> f32 {
        self.linewidth / 2.0 + self.antialias
    }

    /// Exponential falloff weight for a fragment `d` pixels past the solid stroke.
    ///
    /// `exp(-(d / antialias)²)`: 1 at the stroke edge, strictly decreasing in `|d|`.
    #[inline]
    pub fn falloff(&self, d: f32) -> f32 {
        let alpha = d / self.antialias;
        (-alpha * alpha).exp()
    }

    /// Converts a signed distance `r` into the fragment output.
    ///
    /// Mirrors `fs_main` in `point_sprite.wgsl`.
    pub fn shade(&self, r: f32, fg: Color, bg: Color) -> Fragment {
        let d = r.abs() - self.inner_threshold();

        if r > self.outer_limit() {
            Fragment::Discard
        } else if d < 0.0 {
            Fragment::Color(fg)
        } else {
            let alpha = self.falloff(d);
            if r > 0.0 {
                Fragment::Color(fg.fade(alpha))
            } else {
                Fragment::Color(bg.mix(fg, alpha))
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        self.linewidth.is_finite()
            && self.antialias.is_finite()
            && self.linewidth >= 0.0
            && self.antialias > 0.0
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::sprite::Shape;

    const FG: Color = Color::BLACK;
    const BG: Color = Color::rgba(0.9, 0.95, 0.88, 1.0);

    #[test]
    fn sprite_size_adds_stroke_margin() {
        let style = StrokeStyle::default();
        assert_eq!(style.sprite_size(10.0), 15.0);
    }

    #[test]
    fn beyond_outer_limit_is_discarded() {
        let style = StrokeStyle::default();
        let limit = style.outer_limit();
        assert_eq!(style.shade(limit + 0.01, FG, BG), Fragment::Discard);
        assert_eq!(style.shade(limit + 100.0, FG, BG), Fragment::Discard);
        assert_ne!(style.shade(limit, FG, BG), Fragment::Discard);
    }

    #[test]
    fn disc_outside_envelope_has_no_coverage() {
        let style = StrokeStyle::default();
        let marker = 10.0;
        let sprite = style.sprite_size(marker);
        // Sprite corner is ~5.6 px past the disc edge.
        let r = Shape::Disc.distance(Vec2::ZERO, sprite, marker);
        assert!(r > style.outer_limit());
        assert!(style.shade(r, FG, BG).color().is_none());
    }

    #[test]
    fn boundary_is_foreground_when_stroke_exceeds_aa_band() {
        let style = StrokeStyle {
            linewidth: 4.0,
            antialias: 1.0,
        };
        assert_eq!(style.shade(0.0, FG, BG), Fragment::Color(FG));
    }

    #[test]
    fn boundary_with_default_style_is_in_aa_band() {
        let style = StrokeStyle::default();
        // t = -0.5, d = 0.5, r is not > 0 -> mix(bg, fg, exp(-0.25)).
        let expected = BG.mix(FG, (-0.25f32).exp());
        assert_eq!(style.shade(0.0, FG, BG), Fragment::Color(expected));
    }

    #[test]
    fn outer_edge_fades_foreground_alpha() {
        let style = StrokeStyle::default();
        let Fragment::Color(c) = style.shade(1.0, FG, BG) else {
            panic!("expected color");
        };
        // d = 1.5 -> alpha = exp(-2.25)
        assert_eq!((c.r, c.g, c.b), (FG.r, FG.g, FG.b));
        assert!((c.a - (-2.25f32).exp()).abs() < 1e-6);
    }

    #[test]
    fn deep_interior_is_background() {
        let style = StrokeStyle::default();
        let c = style.shade(-5.0, FG, BG).color().unwrap();
        // d = 5.5 -> alpha ~ 7e-14
        assert!((c.r - BG.r).abs() < 1e-6);
        assert!((c.g - BG.g).abs() < 1e-6);
    }

    #[test]
    fn falloff_is_monotonically_decreasing() {
        let style = StrokeStyle::default();
        let mut prev = style.falloff(0.0);
        assert_eq!(prev, 1.0);
        for i in 1..=40 {
            let d = i as f32 * 0.05;
            let w = style.falloff(d);
            assert!(w < prev, "falloff({d}) = {w} not below {prev}");
            prev = w;
        }
    }

    #[test]
    fn falloff_is_symmetric_in_d() {
        let style = StrokeStyle {
            linewidth: 2.0,
            antialias: 0.5,
        };
        assert_eq!(style.falloff(0.3), style.falloff(-0.3));
    }

    #[test]
    fn validity() {
        assert!(StrokeStyle::default().is_valid());
        assert!(!StrokeStyle { linewidth: 1.0, antialias: 0.0 }.is_valid());
        assert!(!StrokeStyle { linewidth: -1.0, antialias: 1.0 }.is_valid());
    }
}
