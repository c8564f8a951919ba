//! Cohesion score of a set of colors.
//!
//! The score (0–100) is a weighted sum of three independent sub-scores:
//!
//! - *hue cohesion*: few hue families (or fidelity to the hue families
//!   of a reference palette) scores high;
//! - *saturation coherence*: a small spread of chroma scores high;
//! - *lightness reasonableness*: penalizes flat (monotone) sets and
//!   holes in the tonal range, but not a wide range.
//!
//! When per-color weights are given, a color of weight `w` counts
//! `max(1, round(w))` times in the hue and chroma statistics so that
//! large items dominate.  The tonal structure (range, gaps) ignores
//! weights.

use serde::{Deserialize, Serialize};
use crate::color::{hue_distance, Color};

/// Relative importance of the three sub-scores.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

impl Weights {
    /// Create weights normalized to sum to 1.  Negative or non-finite
    /// components count as 0; if nothing is left the weights are equal.
    pub fn new(hue: f64, saturation: f64, lightness: f64) -> Self {
        let pos = |x: f64| if x.is_finite() && x > 0. { x } else { 0. };
        let (h, s, l) = (pos(hue), pos(saturation), pos(lightness));
        let sum = h + s + l;
        if sum > 0. {
            Weights { hue: h / sum, saturation: s / sum, lightness: l / sum }
        } else {
            Weights { hue: 1. / 3., saturation: 1. / 3., lightness: 1. / 3. }
        }
    }
}

/// A named weighting preset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    /// Hue 0.4, saturation 0.3, lightness 0.3.
    #[default]
    Balanced,
    /// Favors hue cohesion: 0.6, 0.2, 0.2.
    HueFamily,
    /// Favors the tonal structure: 0.25, 0.25, 0.5.
    Contrast,
    /// Like [`Algorithm::Balanced`] but statistics are weighted by the
    /// visual weight (surface area) of the items.
    SurfaceArea,
    Custom(Weights),
}

impl Algorithm {
    pub const PRESETS: [Algorithm; 4] = [Algorithm::Balanced,
        Algorithm::HueFamily, Algorithm::Contrast, Algorithm::SurfaceArea];

    pub fn weights(&self) -> Weights {
        match *self {
            Algorithm::Balanced | Algorithm::SurfaceArea =>
                Weights { hue: 0.4, saturation: 0.3, lightness: 0.3 },
            Algorithm::HueFamily =>
                Weights { hue: 0.6, saturation: 0.2, lightness: 0.2 },
            Algorithm::Contrast =>
                Weights { hue: 0.25, saturation: 0.25, lightness: 0.5 },
            Algorithm::Custom(w) => Weights::new(w.hue, w.saturation, w.lightness),
        }
    }

    /// Whether item visual weights should be passed to the scorer.
    pub fn uses_item_weights(&self) -> bool {
        matches!(self, Algorithm::SurfaceArea)
    }
}

/// Thresholds of the scoring function.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Colors with a chroma below this are neutral and carry no hue.
    pub neutral_chroma: f64,
    /// Maximum angle between a hue and a cluster center to join it.
    pub cluster_angle: f64,
    /// Hues within this angle of a reference cluster score 100.
    pub reference_tolerance: f64,
    /// Hues this far or farther from every reference cluster score 0.
    pub reference_cutoff: f64,
    /// Chroma standard deviation still scoring 100.
    pub chroma_knee: f64,
    /// Decay scale of the saturation score past the knee.
    pub chroma_scale: f64,
    /// Lightness ranges narrower than this are penalized…
    pub min_range: f64,
    /// …by this many points per missing unit.
    pub flat_penalty: f64,
    /// Gaps between consecutive lightnesses wider than this are
    /// penalized…
    pub max_gap: f64,
    /// …by this many points per unit over.
    pub gap_penalty: f64,
    /// Points per unit of standard deviation of the gaps.
    pub evenness_penalty: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            neutral_chroma: 8.,
            cluster_angle: 30.,
            reference_tolerance: 10.,
            reference_cutoff: 60.,
            chroma_knee: 5.,
            chroma_scale: 18.,
            min_range: 15.,
            flat_penalty: 4.,
            max_gap: 20.,
            gap_penalty: 1.5,
            evenness_penalty: 0.5,
        }
    }
}

/// The sub-scores and the combined score of a set of colors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Breakdown {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
    pub total: u8,
}

impl Breakdown {
    const TRIVIAL: Breakdown =
        Breakdown { hue: 100., saturation: 100., lightness: 100., total: 100 };
}

/// Number of times a color of weight `w` counts in the statistics.
#[inline]
fn multiplicity(w: f64) -> f64 { w.round().max(1.) }

/// Greedy clustering of hues (degrees).  A hue joins the first cluster
/// whose running circular mean is within `threshold`.  Returns the
/// cluster centers in creation order.
pub(crate) fn hue_clusters(hues: impl IntoIterator<Item = f64>,
                           threshold: f64) -> Vec<f64> {
    struct Cluster { sin: f64, cos: f64 }
    impl Cluster {
        fn center(&self) -> f64 {
            self.sin.atan2(self.cos).to_degrees().rem_euclid(360.)
        }
    }
    let mut clusters: Vec<Cluster> = vec![];
    for h in hues {
        let (s, c) = h.to_radians().sin_cos();
        match clusters.iter_mut()
            .find(|k| hue_distance(k.center(), h) <= threshold) {
            Some(k) => { k.sin += s; k.cos += c; }
            None => clusters.push(Cluster { sin: s, cos: c }),
        }
    }
    clusters.iter().map(Cluster::center).collect()
}

/// Weighted mean and standard deviation of `(value, count)` pairs.
fn mean_std(xs: &[(f64, f64)]) -> (f64, f64) {
    let n: f64 = xs.iter().map(|&(_, w)| w).sum();
    if n <= 0. { return (0., 0.) }
    let mean = xs.iter().map(|&(x, w)| w * x).sum::<f64>() / n;
    let var = xs.iter().map(|&(x, w)| w * (x - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}

/// Compute the cohesion score of sets of colors.
///
/// # Example
///
/// ```
/// use palette_cohesion::{Color, cohesion::{Algorithm, Scorer}};
/// let colors: Vec<Color> = ["#B5651D", "#F5F0E8", "#8B4513"].iter()
///     .map(|h| h.parse().unwrap()).collect();
/// let score = Scorer::new(Algorithm::Balanced).score(&colors);
/// assert!(score <= 100);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Scorer<'a> {
    algorithm: Algorithm,
    config: ScoringConfig,
    reference: Option<&'a [Color]>,
    weights: Option<&'a [f64]>,
}

impl<'a> Scorer<'a> {
    pub fn new(algorithm: Algorithm) -> Self {
        Scorer { algorithm, config: ScoringConfig::default(),
                 reference: None, weights: None }
    }

    /// Use the thresholds `config` instead of the default ones.
    pub fn config(mut self, config: ScoringConfig) -> Self {
        self.config = config;
        self
    }

    /// Score hue cohesion as fidelity to the hue families of `palette`.
    pub fn reference(mut self, palette: &'a [Color]) -> Self {
        self.reference = Some(palette);
        self
    }

    /// Per-color weights (1–10), in the same order as the scored colors.
    /// Missing weights count as 1.  Weights expand the hue and chroma
    /// statistics only; the lightness sub-score looks at each color once,
    /// since repeating a lightness would just add empty gaps.
    pub fn weights(mut self, weights: &'a [f64]) -> Self {
        self.weights = Some(weights);
        self
    }

    #[inline]
    pub fn algorithm(&self) -> Algorithm { self.algorithm }

    fn counts(&self, n: usize, weights: Option<&[f64]>) -> Vec<f64> {
        (0 .. n).map(|i| weights.and_then(|w| w.get(i).copied())
                     .map_or(1., multiplicity))
            .collect()
    }

    fn hue_score(&self, colors: &[Color], counts: &[f64]) -> f64 {
        let cfg = &self.config;
        let chromatic: Vec<(f64, f64)> = colors.iter().zip(counts)
            .filter(|(c, _)| c.chroma() >= cfg.neutral_chroma)
            .map(|(c, &n)| (c.hue(), n))
            .collect();
        if chromatic.is_empty() { return 100. }
        let centers = self.reference.map_or(vec![], |r| {
            hue_clusters(r.iter().filter(|c| c.chroma() >= cfg.neutral_chroma)
                         .map(Color::hue),
                         cfg.cluster_angle)
        });
        if centers.is_empty() {
            let hues = chromatic.iter().map(|&(h, _)| h);
            match hue_clusters(hues, cfg.cluster_angle).len() {
                0 ..= 2 => 100.,
                3 => 70.,
                4 => 35.,
                n => (35. - 15. * (n - 4) as f64).max(0.),
            }
        } else {
            let span = (cfg.reference_cutoff - cfg.reference_tolerance).max(1e-9);
            let fit: Vec<(f64, f64)> = chromatic.iter().map(|&(h, n)| {
                let d = centers.iter().map(|&k| hue_distance(k, h))
                    .fold(f64::INFINITY, f64::min);
                let s = if d <= cfg.reference_tolerance { 100. }
                        else { 100. * (1. - (d - cfg.reference_tolerance) / span) };
                (s.max(0.), n)
            }).collect();
            mean_std(&fit).0
        }
    }

    fn saturation_score(&self, colors: &[Color], counts: &[f64]) -> f64 {
        let chroma: Vec<(f64, f64)> = colors.iter().zip(counts)
            .map(|(c, &n)| (c.chroma(), n)).collect();
        let (_, sd) = mean_std(&chroma);
        let cfg = &self.config;
        if sd <= cfg.chroma_knee { 100. }
        else { 100. * (-(sd - cfg.chroma_knee) / cfg.chroma_scale.max(1e-9)).exp() }
    }

    fn lightness_score(&self, colors: &[Color]) -> f64 {
        let cfg = &self.config;
        let mut l: Vec<f64> = colors.iter().map(Color::lightness).collect();
        l.sort_by(f64::total_cmp);
        let range = l[l.len() - 1] - l[0];
        let mut score = 100.;
        if range < cfg.min_range {
            score -= (cfg.min_range - range) * cfg.flat_penalty;
        }
        let gaps: Vec<(f64, f64)> = l.windows(2).map(|w| (w[1] - w[0], 1.))
            .collect();
        for &(g, _) in &gaps {
            if g > cfg.max_gap { score -= (g - cfg.max_gap) * cfg.gap_penalty }
        }
        score -= mean_std(&gaps).1 * cfg.evenness_penalty;
        score.clamp(0., 100.)
    }

    fn breakdown_with(&self, colors: &[Color], weights: Option<&[f64]>)
                      -> Breakdown {
        if colors.len() < 2 { return Breakdown::TRIVIAL }
        let counts = self.counts(colors.len(), weights);
        let hue = self.hue_score(colors, &counts);
        let saturation = self.saturation_score(colors, &counts);
        let lightness = self.lightness_score(colors);
        let w = self.algorithm.weights();
        let total = w.hue * hue + w.saturation * saturation + w.lightness * lightness;
        Breakdown { hue, saturation, lightness,
                    total: total.round().clamp(0., 100.) as u8 }
    }

    /// The three sub-scores and the total for `colors`.
    pub fn breakdown(&self, colors: &[Color]) -> Breakdown {
        self.breakdown_with(colors, self.weights)
    }

    /// The cohesion score of `colors` in \[0, 100\].  Sets of fewer than
    /// 2 colors score 100.
    pub fn score(&self, colors: &[Color]) -> u8 { self.breakdown(colors).total }

    /// How much `colors[index]` contributes: the score of `colors` minus
    /// the score without it.  0 when fewer than 2 colors would remain or
    /// `index` is out of bounds.
    pub fn delta(&self, colors: &[Color], index: usize) -> i16 {
        if index >= colors.len() || colors.len() < 3 { return 0 }
        let mut rest = colors.to_vec();
        rest.remove(index);
        let rest_weights = self.weights.map(|w| {
            let mut w = w.to_vec();
            if index < w.len() { w.remove(index); }
            w
        });
        let with = self.score(colors) as i16;
        let without = self.breakdown_with(&rest, rest_weights.as_deref()).total;
        with - without as i16
    }
}

/// The cohesion score of `colors`; see [`Scorer`].
pub fn score(colors: &[Color], algorithm: Algorithm,
             reference: Option<&[Color]>, weights: Option<&[f64]>) -> u8 {
    let mut s = Scorer::new(algorithm);
    if let Some(r) = reference { s = s.reference(r) }
    if let Some(w) = weights { s = s.weights(w) }
    s.score(colors)
}

/// The contribution of `colors[index]` to the score; see [`Scorer::delta`].
pub fn delta(colors: &[Color], index: usize, algorithm: Algorithm,
             reference: Option<&[Color]>, weights: Option<&[f64]>) -> i16 {
    let mut s = Scorer::new(algorithm);
    if let Some(r) = reference { s = s.reference(r) }
    if let Some(w) = weights { s = s.weights(w) }
    s.delta(colors, index)
}
