//! Seeded generation of harmonious colors.
//!
//! Given "locked" base colors and a [`HarmonyMode`], the generator
//! synthesizes new colors related to the bases by a hue rotation plus a
//! random jitter of hue, lightness and chroma in L\*C\*h.  The
//! [`HarmonyMode::DeltaESmart`] mode instead searches a Lab grid for
//! colors at a chosen perceptual distance from every base.
//!
//! Generation is deterministic: the same bases, mode, count, variation
//! index and batch seed always give the same colors.

use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};
use log::debug;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use crate::color::Color;
use crate::error::Error;

/// Color-theory rule relating generated colors to the bases.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HarmonyMode {
    /// Opposite hue (180°).
    Complementary,
    /// Same hue family, widely jittered.
    Analogous,
    /// 120° and 240°, alternately.
    Triadic,
    /// 150° and 210°, alternately.
    SplitComplementary,
    /// Grid search for colors at a target ΔE from all bases.
    DeltaESmart,
}

impl HarmonyMode {
    pub const ALL: [HarmonyMode; 5] = [
        HarmonyMode::Complementary,
        HarmonyMode::Analogous,
        HarmonyMode::Triadic,
        HarmonyMode::SplitComplementary,
        HarmonyMode::DeltaESmart,
    ];

    /// Hue rotations (degrees) applied alternately across outputs.
    /// Empty for [`HarmonyMode::DeltaESmart`].
    pub fn offsets(&self) -> &'static [f64] {
        match self {
            HarmonyMode::Complementary => &[180.],
            HarmonyMode::Analogous => &[0.],
            HarmonyMode::Triadic => &[120., 240.],
            HarmonyMode::SplitComplementary => &[150., 210.],
            HarmonyMode::DeltaESmart => &[],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            HarmonyMode::Complementary => "complementary",
            HarmonyMode::Analogous => "analogous",
            HarmonyMode::Triadic => "triadic",
            HarmonyMode::SplitComplementary => "split-complementary",
            HarmonyMode::DeltaESmart => "delta-e-smart",
        }
    }
}

impl fmt::Display for HarmonyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HarmonyMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        let s = s.trim();
        HarmonyMode::ALL.iter().copied()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::Parse(s.to_string()))
    }
}

/// Jitter amounts and search bounds of the generator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Maximum lightness change (±) from the base.
    pub lightness_jitter: f64,
    /// Maximum chroma change (±) from the base.
    pub chroma_jitter: f64,
    /// Maximum hue jitter (±, degrees) per mode.
    pub complementary_jitter: f64,
    pub analogous_jitter: f64,
    pub triadic_jitter: f64,
    pub split_jitter: f64,
    /// Outputs closer than this (ΔE) to an earlier output are redrawn…
    pub min_separation: f64,
    /// …at most this many times.
    pub max_redraws: usize,
    /// Lab grid of the ΔE-smart mode: `[start, end, step]`.
    pub grid_lightness: [f64; 3],
    pub grid_ab: [f64; 3],
    /// Range of the target ΔE between candidates and bases.
    pub target_distance: [f64; 2],
    /// Range of the minimum ΔE between accepted candidates.
    pub spread_distance: [f64; 2],
    /// Maximum tie-breaking noise added to candidate scores.
    pub noise: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            lightness_jitter: 30.,
            chroma_jitter: 20.,
            complementary_jitter: 12.,
            analogous_jitter: 35.,
            triadic_jitter: 10.,
            split_jitter: 10.,
            min_separation: 4.,
            max_redraws: 8,
            grid_lightness: [15., 90., 8.],
            grid_ab: [-60., 60., 12.],
            target_distance: [25., 45.],
            spread_distance: [10., 20.],
            noise: 2.,
        }
    }
}

impl GeneratorConfig {
    fn hue_jitter(&self, mode: HarmonyMode) -> f64 {
        match mode {
            HarmonyMode::Complementary => self.complementary_jitter,
            HarmonyMode::Analogous => self.analogous_jitter,
            HarmonyMode::Triadic => self.triadic_jitter,
            HarmonyMode::SplitComplementary => self.split_jitter,
            HarmonyMode::DeltaESmart => 0.,
        }
    }
}

/// A seed for a new batch of suggestions, derived from the clock.
/// Persist it to reproduce the batch.
pub fn clock_seed() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() as u64)
}

#[inline]
fn uniform(rng: &mut StdRng, lo: f64, hi: f64) -> f64 {
    lo + (hi - lo) * rng.random::<f64>()
}

/// `lo`, `lo + step`, … up to `hi` (included).
fn steps([lo, hi, step]: [f64; 3]) -> impl Iterator<Item = f64> {
    let n = if step > 0. && hi >= lo { ((hi - lo) / step).floor() as usize + 1 }
            else { 1 };
    (0 .. n).map(move |k| lo + k as f64 * step)
}

/// The harmony generator.
#[derive(Clone, Copy, Debug, Default)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self { Generator { config } }

    #[inline]
    pub fn config(&self) -> &GeneratorConfig { &self.config }

    fn rng(batch_seed: u64, variation: u32) -> StdRng {
        let mix = (variation as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        StdRng::seed_from_u64(batch_seed ^ mix)
    }

    /// A random base: any hue, lightness 40–70, chroma 15–55.
    fn synthetic_base(rng: &mut StdRng) -> Color {
        let h = uniform(rng, 0., 360.);
        let l = uniform(rng, 40., 70.);
        let c = uniform(rng, 15., 55.);
        Color::polar(l, c, h)
    }

    /// Generate `count` colors related to `bases` by `mode`.
    ///
    /// `variation` distinguishes the palettes of one batch; `batch_seed`
    /// identifies the batch.  When `bases` is empty a random base is
    /// synthesized first.  The ΔE-smart mode may return fewer colors than
    /// requested.  All returned colors are displayable (they survive a
    /// round trip through their hex encoding).
    pub fn generate(&self, bases: &[Color], mode: HarmonyMode, count: usize,
                    variation: u32, batch_seed: u64) -> Vec<Color> {
        if count == 0 { return vec![] }
        let mut rng = Self::rng(batch_seed, variation);
        let synthetic;
        let bases = if bases.is_empty() {
            synthetic = [Self::synthetic_base(&mut rng)];
            &synthetic[..]
        } else {
            bases
        };
        match mode {
            HarmonyMode::DeltaESmart => self.delta_e_smart(bases, count, &mut rng),
            _ => self.rotated(bases, mode, count, &mut rng),
        }
    }

    /// One palette per variation index `0 .. variations`.
    pub fn generate_batch(&self, bases: &[Color], mode: HarmonyMode,
                          count: usize, variations: u32, batch_seed: u64)
                          -> Vec<Vec<Color>> {
        (0 .. variations)
            .map(|v| self.generate(bases, mode, count, v, batch_seed))
            .collect()
    }

    fn rotated(&self, bases: &[Color], mode: HarmonyMode, count: usize,
               rng: &mut StdRng) -> Vec<Color> {
        let cfg = &self.config;
        let offsets = mode.offsets();
        let hj = cfg.hue_jitter(mode);
        let mut out: Vec<Color> = Vec::with_capacity(count);
        let mut redraws = 0;
        for i in 0 .. count {
            let base = bases[i % bases.len()].to_lch();
            let rot = offsets[i % offsets.len()];
            let mut pick = None;
            for attempt in 0 ..= cfg.max_redraws {
                let h = base.h + rot + uniform(rng, -hj, hj);
                let l = base.l + uniform(rng, -cfg.lightness_jitter,
                                         cfg.lightness_jitter);
                let c = base.c + uniform(rng, -cfg.chroma_jitter,
                                         cfg.chroma_jitter);
                let Ok(color) = Color::lch(l.clamp(0., 100.), c.max(0.), h)
                else { continue };
                let color = color.snapped();
                if attempt == cfg.max_redraws
                    || out.iter().all(|o| o.distance(&color) >= cfg.min_separation) {
                    pick = Some(color);
                    break
                }
                redraws += 1;
            }
            out.extend(pick);
        }
        debug!("{mode}: {} colors from {} bases ({redraws} redraws)",
               out.len(), bases.len());
        out
    }

    fn delta_e_smart(&self, bases: &[Color], count: usize, rng: &mut StdRng)
                     -> Vec<Color> {
        let cfg = &self.config;
        let target = uniform(rng, cfg.target_distance[0], cfg.target_distance[1]);
        let spread = uniform(rng, cfg.spread_distance[0], cfg.spread_distance[1]);
        let mut grid: Vec<(f64, Color)> = vec![];
        for l in steps(cfg.grid_lightness) {
            for a in steps(cfg.grid_ab) {
                for b in steps(cfg.grid_ab) {
                    let Ok(c) = Color::lab(l, a, b) else { continue };
                    if !c.is_displayable() { continue }
                    let miss = bases.iter()
                        .map(|base| (c.distance(base) - target).abs())
                        .sum::<f64>() / bases.len() as f64;
                    grid.push((miss + uniform(rng, 0., cfg.noise), c));
                }
            }
        }
        grid.sort_by(|x, y| x.0.total_cmp(&y.0));
        let mut out: Vec<Color> = Vec::with_capacity(count);
        for (_, c) in &grid {
            if out.len() == count { break }
            let c = c.snapped();
            if out.iter().all(|o| o.distance(&c) >= spread) {
                out.push(c);
            }
        }
        debug!("delta-e-smart: {} of {count} colors from {} candidates \
                (target {target:.1}, spread {spread:.1})",
               out.len(), grid.len());
        out
    }
}

/// Generate colors with the default configuration; see
/// [`Generator::generate`].
pub fn generate(bases: &[Color], mode: HarmonyMode, count: usize,
                variation: u32, batch_seed: u64) -> Vec<Color> {
    Generator::default().generate(bases, mode, count, variation, batch_seed)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::hue_distance;

    fn bases() -> Vec<Color> {
        ["#B5651D", "#F5F0E8", "#9CAF88", "#8B4513", "#1C1C1C"].iter()
            .map(|h| Color::from_hex(h).unwrap()).collect()
    }

    fn still() -> GeneratorConfig {
        GeneratorConfig { lightness_jitter: 0., chroma_jitter: 0.,
                          complementary_jitter: 0., analogous_jitter: 0.,
                          triadic_jitter: 0., split_jitter: 0.,
                          ..GeneratorConfig::default() }
    }

    #[test]
    fn deterministic() {
        for mode in HarmonyMode::ALL {
            let a = generate(&bases(), mode, 6, 3, 1234);
            let b = generate(&bases(), mode, 6, 3, 1234);
            assert_eq!(a, b, "{mode}");
            assert!(!a.is_empty());
        }
    }

    #[test]
    fn variations_differ() {
        let batch = Generator::default()
            .generate_batch(&bases(), HarmonyMode::Triadic, 6, 3, 99);
        assert_eq!(batch.len(), 3);
        assert_ne!(batch[0], batch[1]);
        assert_ne!(batch[1], batch[2]);
        assert_eq!(batch[2], generate(&bases(), HarmonyMode::Triadic, 6, 2, 99));
    }

    #[test]
    fn empty_count() {
        for mode in HarmonyMode::ALL {
            assert!(generate(&bases(), mode, 0, 0, 1).is_empty());
        }
    }

    #[test]
    fn without_bases() {
        let out = generate(&[], HarmonyMode::Complementary, 5, 0, 7);
        assert_eq!(out.len(), 5);
        assert_eq!(out, generate(&[], HarmonyMode::Complementary, 5, 0, 7));
        assert!(out.iter().all(|c| c.is_displayable()));
    }

    #[test]
    fn rotations() {
        let g = Generator::new(still());
        let base = Color::lch(50., 25., 40.).unwrap();
        for (mode, expected) in [(HarmonyMode::Complementary, [220., 220.]),
                                 (HarmonyMode::Triadic, [160., 280.]),
                                 (HarmonyMode::SplitComplementary, [190., 250.]),
                                 (HarmonyMode::Analogous, [40., 40.])] {
            let out = g.generate(&[base], mode, 4, 0, 5);
            assert_eq!(out.len(), 4);
            for (i, c) in out.iter().enumerate() {
                let h = expected[i % 2];
                assert!(hue_distance(c.hue(), h) < 2., "{mode}: {} vs {h}",
                        c.hue());
                assert!((c.lightness() - 50.).abs() < 1.);
            }
        }
    }

    #[test]
    fn jitter_is_bounded() {
        let base = Color::lch(50., 25., 40.).unwrap();
        let out = generate(&[base], HarmonyMode::Analogous, 30, 0, 11);
        assert_eq!(out.len(), 30);
        // Gamut clipping may move the lightness by a few units.
        for c in &out {
            assert!((c.lightness() - 50.).abs() <= 34.);
        }
    }

    #[test]
    fn delta_e_smart_is_spread() {
        let out = generate(&bases(), HarmonyMode::DeltaESmart, 8, 0, 42);
        assert_eq!(out.len(), 8);
        for (i, c) in out.iter().enumerate() {
            assert!(c.is_displayable());
            for d in &out[i + 1 ..] {
                assert!(c.distance(d) >= 9.5, "{c} {d}");
            }
        }
    }

    #[test]
    fn delta_e_smart_may_return_fewer() {
        let out = generate(&bases(), HarmonyMode::DeltaESmart, 1000, 0, 42);
        assert!(!out.is_empty());
        assert!(out.len() < 1000);
    }

    #[test]
    fn mode_names() {
        for mode in HarmonyMode::ALL {
            assert_eq!(mode.to_string().parse::<HarmonyMode>().unwrap(), mode);
        }
        assert_eq!("Split-Complementary".parse::<HarmonyMode>().unwrap(),
                   HarmonyMode::SplitComplementary);
        assert!("pentadic".parse::<HarmonyMode>().is_err());
    }
}
