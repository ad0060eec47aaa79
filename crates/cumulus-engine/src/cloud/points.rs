use anyhow::{Result, ensure};
use bytemuck::{Pod, Zeroable};
use rand::distributions::Uniform;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::paint::Color;

/// Parameters for random cloud generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudParams {
    /// Number of points.
    pub count: usize,
    /// Standard deviation of the (isotropic, zero-mean) position distribution.
    pub spread: f32,
    /// Half-open `[min, max)` range of marker sizes in pixels.
    pub size_range: [f32; 2],
    /// Half-open range for each background RGB channel. Alpha is always 1.
    pub bg_range: [f32; 2],
    /// Outline color shared by every point.
    pub fg_color: Color,
    /// Fixed RNG seed; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for CloudParams {
    fn default() -> Self {
        Self {
            count: 1_000_000,
            spread: 0.45,
            size_range: [5.0, 10.0],
            bg_range: [0.85, 1.0],
            fg_color: Color::BLACK,
            seed: None,
        }
    }
}

impl CloudParams {
    pub fn validate(&self) -> Result<()> {
        ensure!(self.count > 0, "cloud.count must be positive");
        ensure!(
            self.count <= u32::MAX as usize,
            "cloud.count {} exceeds the instance limit",
            self.count
        );
        ensure!(
            self.spread.is_finite() && self.spread >= 0.0,
            "cloud.spread must be a non-negative number (got {})",
            self.spread
        );
        let [lo, hi] = self.size_range;
        ensure!(
            lo.is_finite() && hi.is_finite() && 0.0 < lo && lo < hi,
            "cloud.size_range must satisfy 0 < min < max (got [{lo}, {hi}])"
        );
        let [lo, hi] = self.bg_range;
        ensure!(
            lo.is_finite() && hi.is_finite() && 0.0 <= lo && lo < hi && hi <= 1.0,
            "cloud.bg_range must satisfy 0 <= min < max <= 1 (got [{lo}, {hi}])"
        );
        ensure!(self.fg_color.is_finite(), "cloud.fg_color must be finite");
        Ok(())
    }
}

/// Per-point static vertex attributes (44 bytes).
///
///  offset  0  position [f32; 3]   loc 1
///  offset 12  fg_color [f32; 4]   loc 2
///  offset 28  bg_color [f32; 4]   loc 3
///
/// The marker size lives in a separate stream so zoom can rewrite it alone.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PointAttributes {
    pub position: [f32; 3],
    pub fg_color: [f32; 4],
    pub bg_color: [f32; 4],
}

/// A generated point cloud.
///
/// Positions and colors never change after generation. `base_sizes` holds the
/// sizes drawn at generation time; renderers upload scaled copies of them.
#[derive(Debug, Clone)]
pub struct PointCloud {
    attributes: Vec<PointAttributes>,
    base_sizes: Vec<f32>,
}

impl PointCloud {
    pub fn generate(params: &CloudParams) -> Result<Self> {
        params.validate()?;

        let mut rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self::generate_with(params, &mut rng))
    }

    /// Generates a cloud from an explicit RNG. `params` must already be valid.
    pub fn generate_with<R: Rng + ?Sized>(params: &CloudParams, rng: &mut R) -> Self {
        let bg = Uniform::new(params.bg_range[0], params.bg_range[1]);
        let size = Uniform::new(params.size_range[0], params.size_range[1]);
        let fg = params.fg_color.to_array();

        let mut attributes = Vec::with_capacity(params.count);
        let mut base_sizes = Vec::with_capacity(params.count);

        for _ in 0..params.count {
            let mut position = [0.0f32; 3];
            for p in &mut position {
                *p = params.spread * rng.sample::<f32, _>(StandardNormal);
            }
            let bg_color = [rng.sample(bg), rng.sample(bg), rng.sample(bg), 1.0];

            attributes.push(PointAttributes {
                position,
                fg_color: fg,
                bg_color,
            });
            base_sizes.push(rng.sample(size));
        }

        log::debug!("generated {} points (spread {})", params.count, params.spread);

        Self {
            attributes,
            base_sizes,
        }
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn attributes(&self) -> &[PointAttributes] {
        &self.attributes
    }

    pub fn base_sizes(&self) -> &[f32] {
        &self.base_sizes
    }

    /// Writes `base_size * scale` for every point into `out`, reusing its allocation.
    pub fn scaled_sizes_into(&self, scale: f32, out: &mut Vec<f32>) {
        out.clear();
        out.extend(self.base_sizes.iter().map(|s| s * scale));
    }
}
