use serde::{Deserialize, Serialize};
use crate::color::Color;

/// The part an item plays in the overall look.  Used as a soft
/// preference by the assignment engines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// Large surfaces setting the backdrop (walls, ceilings).  Prefer
    /// light, muted colors.
    Background,
    /// Floors and rugs.  Prefer lower-to-mid lightness and moderate
    /// chroma.
    Ground,
    /// Small or deliberate pops of color.  Prefer higher chroma.
    Accent,
    /// Generic furniture.  Mid lightness, any chroma.
    Anchor,
    /// Trim, doors, countertops.  Strongly prefer low chroma.
    Neutral,
    /// Wardrobe pieces expected to share neutral tones (shoes, belts,
    /// bags).
    Foundation,
    /// Main visible garments (tops, bottoms, outerwear).
    Core,
}

/// Item-level color hint used as a tiebreaker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tendency {
    Lighter,
    Darker,
    Warmer,
    Cooler,
    Neutral,
    Bold,
}

/// Visual weight of an item, i.e. how much of the field of view it
/// occupies.  Older catalogs use the discrete buckets; both map onto the
/// continuous 1–10 scale returned by [`Weight::value`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Weight {
    Scale(f64),
    Bucket(Bucket),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Large,
    Medium,
    Small,
}

impl Weight {
    /// The weight on the 1–10 scale.
    pub fn value(&self) -> f64 {
        match *self {
            Weight::Scale(w) if w.is_finite() => w.clamp(1., 10.),
            Weight::Scale(_) => DEFAULT_WEIGHT,
            Weight::Bucket(Bucket::Large) => 8.,
            Weight::Bucket(Bucket::Medium) => 5.,
            Weight::Bucket(Bucket::Small) => 2.,
        }
    }
}

/// Expected lightness interval of an item (L\* in \[0, 100\]).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LightnessRange {
    pub min: f64,
    pub max: f64,
}

impl LightnessRange {
    /// Create a range, swapping the bounds if needed and clamping them
    /// to \[0, 100\].
    pub fn new(min: f64, max: f64) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        LightnessRange { min: min.clamp(0., 100.), max: max.clamp(0., 100.) }
    }

    #[inline]
    pub fn mid(&self) -> f64 { 0.5 * (self.min + self.max) }

    #[inline]
    pub fn width(&self) -> f64 { self.max - self.min }

    #[inline]
    pub fn contains(&self, l: f64) -> bool { self.min <= l && l <= self.max }

    /// Distance from `l` to the range (0 inside).
    pub fn outside(&self, l: f64) -> f64 {
        if l < self.min { self.min - l }
        else if l > self.max { l - self.max }
        else { 0. }
    }

    /// The `j`-th of `k` targets spread evenly from `min` to `max`
    /// (the midpoint when `k <= 1`).
    pub fn spread(&self, j: usize, k: usize) -> f64 {
        if k <= 1 { self.mid() }
        else { self.min + self.width() * j as f64 / (k - 1) as f64 }
    }
}

pub(crate) const DEFAULT_WEIGHT: f64 = 3.;
pub(crate) const DEFAULT_RANGE: LightnessRange =
    LightnessRange { min: 20., max: 90. };

/// Normalized metadata of an item.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemMeta {
    /// Visual weight on the 1–10 scale.
    pub weight: f64,
    pub lightness: LightnessRange,
    pub role: Role,
    pub tendency: Option<Tendency>,
}

impl ItemMeta {
    pub fn new(weight: Weight, lightness: LightnessRange, role: Role) -> Self {
        ItemMeta { weight: weight.value(), lightness, role, tendency: None }
    }

    pub fn tendency(mut self, t: Tendency) -> Self {
        self.tendency = Some(t);
        self
    }

    /// Metadata used for names absent from a catalog.
    pub fn fallback(role: Role) -> Self {
        ItemMeta { weight: DEFAULT_WEIGHT, lightness: DEFAULT_RANGE, role,
                   tendency: None }
    }
}

/// One catalog record as it appears in configuration files.  Every field
/// but the name is optional.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    #[serde(default)]
    pub weight: Option<Weight>,
    #[serde(default)]
    pub lightness: Option<[f64; 2]>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub tendency: Option<Tendency>,
}

impl CatalogEntry {
    /// Normalize the entry, filling missing fields with the defaults of
    /// a catalog whose fallback role is `role`.
    pub fn meta(&self, role: Role) -> ItemMeta {
        ItemMeta {
            weight: self.weight.map_or(DEFAULT_WEIGHT, |w| w.value()),
            lightness: self.lightness
                .map_or(DEFAULT_RANGE, |[a, b]| LightnessRange::new(a, b)),
            role: self.role.unwrap_or(role),
            tendency: self.tendency,
        }
    }
}

/// An assignable slot.  The `id` is issued by whoever owns the item
/// lifecycle; this crate never creates identifiers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,
    pub name: String,
    /// `None` while unassigned.
    pub color: Option<Color>,
    pub meta: ItemMeta,
}

impl Item {
    pub fn new(id: u64, name: impl Into<String>, meta: ItemMeta) -> Self {
        Item { id, name: name.into(), color: None, meta }
    }

    /// Return the item with `color` assigned (pinned).
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    #[inline]
    pub fn is_assigned(&self) -> bool { self.color.is_some() }
}
