//! Assignment of palette colors to room items.
//!
//! Unassigned items are filled one at a time, heaviest first, each
//! taking the palette color that maximizes a composite fitness: fit to
//! the item's lightness range, fit to its [`Role`], a diversity bonus,
//! the cohesion of the room so far (as a tiebreaker) and the item's
//! [`Tendency`].  Decisions are never revisited.

use log::trace;
use crate::catalog::{Item, ItemMeta, LightnessRange, Role, Tendency};
use crate::cohesion::{Algorithm, Scorer, ScoringConfig};
use crate::color::Color;

/// Colors closer than this (ΔE) are taken to be the same palette entry.
const SAME_COLOR: f64 = 0.5;
/// Scale of the cohesion score in the fitness.
const HARMONY_SCALE: f64 = 0.15;

/// Processing order of the unassigned items.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Order {
    /// Heaviest items first (ties keep the list order).
    #[default]
    ByWeight,
    /// The order of the item list.
    Listed,
    /// The reverse order of the item list.
    Reversed,
}

fn lightness_fit(range: &LightnessRange, l: f64) -> f64 {
    if range.contains(l) {
        let half = (0.5 * range.width()).max(1.);
        30. * (1. - (l - range.mid()).abs() / half)
    } else {
        -1.5 * range.outside(l)
    }
}

fn role_fit(role: Role, l: f64, c: f64) -> f64 {
    match role {
        Role::Background => {
            let chroma = if c < 12. { 15. } else if c < 25. { 5. } else { -10. };
            let light = if l >= 75. { 10. } else if l >= 60. { 3. } else { -8. };
            chroma + light
        }
        Role::Ground => {
            let light = if (25. ..= 60.).contains(&l) { 10. } else { -5. };
            let chroma = if (8. ..= 45.).contains(&c) { 5. }
                         else if c > 60. { -5. } else { 0. };
            light + chroma
        }
        Role::Accent => {
            if c >= 40. { 15. } else if c >= 25. { 8. }
            else if c < 10. { -10. } else { 0. }
        }
        Role::Anchor | Role::Core => {
            let light = if (30. ..= 75.).contains(&l) { 5. } else { 0. };
            light + if c > 5. { 3. } else { 0. }
        }
        Role::Neutral | Role::Foundation => {
            if c < 10. { 20. } else if c < 20. { 8. } else { -15. }
        }
    }
}

/// Warm hues: reds, oranges, yellows and pinks (L\*C\*h angles).
fn is_warm(h: f64) -> bool { !(110. .. 330.).contains(&h) }

fn is_cool(h: f64) -> bool { (150. ..= 310.).contains(&h) }

fn tendency_fit(tendency: Option<Tendency>, color: &Color) -> f64 {
    let (l, c, h) = (color.lightness(), color.chroma(), color.hue());
    let chromatic = c >= 8.;
    let sign = |good: bool, bad: bool| {
        if good { 5. } else if bad { -5. } else { 0. }
    };
    match tendency {
        None => 0.,
        Some(Tendency::Lighter) => sign(l > 60., l < 40.),
        Some(Tendency::Darker) => sign(l < 40., l > 60.),
        Some(Tendency::Warmer) => sign(chromatic && is_warm(h),
                                       chromatic && is_cool(h)),
        Some(Tendency::Cooler) => sign(chromatic && is_cool(h),
                                       chromatic && is_warm(h)),
        Some(Tendency::Neutral) => sign(c < 12., c > 35.),
        Some(Tendency::Bold) => sign(c > 45., c < 15.),
    }
}

/// Bonus for a color already used `uses` times.  `spare` says whether
/// the palette has more colors than there are items left to fill.
fn diversity(uses: usize, spare: bool) -> f64 {
    let base = match uses {
        0 => 25.,
        1 => 8.,
        n => -10. * (n - 1) as f64,
    };
    if spare && uses > 0 { base - 15. * uses as f64 } else { base }
}

/// Tier of a candidate color relative to the best candidate of a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Within 5 points of the best.
    Great,
    /// Within 20 points of the best.
    Ok,
    Avoid,
}

impl Tier {
    fn of(score: u8, best: u8) -> Tier {
        match best.saturating_sub(score) {
            0 ..= 5 => Tier::Great,
            6 ..= 20 => Tier::Ok,
            _ => Tier::Avoid,
        }
    }
}

/// A candidate color for one slot, with the cohesion score the room
/// would have with it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Suggestion {
    pub color: Color,
    pub score: u8,
    pub tier: Tier,
}

/// The coarse sweep of L\*C\*h offered as suggestions besides the
/// palette: 12 hues × 3 lightnesses × 2 chromas, plus 5 neutrals.
pub fn candidate_grid() -> Vec<Color> {
    let mut grid = Vec::with_capacity(12 * 3 * 2 + 5);
    for k in 0 .. 12 {
        let h = 30. * k as f64;
        for l in [30., 55., 80.] {
            for c in [20., 45.] {
                grid.push(Color::polar(l, c, h).snapped());
            }
        }
    }
    for l in [10., 30., 50., 70., 90.] {
        grid.push(Color::polar(l, 0., 0.).snapped());
    }
    grid
}

/// Fills unassigned items with palette colors.
///
/// # Example
///
/// ```
/// use palette_cohesion::{assign::Filler, catalog, cohesion::Algorithm, Color};
/// let mut id = 0;
/// let items = catalog::LIVING_ROOM.instantiate(|| { id += 1; id });
/// let palette: Vec<Color> = ["#B5651D", "#F5F0E8", "#9CAF88", "#8B4513"]
///     .iter().map(|h| h.parse().unwrap()).collect();
/// let filled = Filler::new(Algorithm::SurfaceArea).fill(&items, &palette);
/// assert!(filled.iter().all(|i| i.color.is_some()));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Filler {
    algorithm: Algorithm,
    order: Order,
    scoring: ScoringConfig,
}

impl Filler {
    pub fn new(algorithm: Algorithm) -> Self {
        Filler { algorithm, order: Order::ByWeight,
                 scoring: ScoringConfig::default() }
    }

    /// Process the unassigned items in `order` (default: by weight).
    pub fn order(mut self, order: Order) -> Self {
        self.order = order;
        self
    }

    /// Thresholds of the cohesion score used as tiebreaker.
    pub fn scoring(mut self, scoring: ScoringConfig) -> Self {
        self.scoring = scoring;
        self
    }

    fn scorer<'a>(&self, palette: &'a [Color], weights: &'a [f64]) -> Scorer<'a> {
        let s = Scorer::new(self.algorithm).config(self.scoring);
        let s = if palette.is_empty() { s } else { s.reference(palette) };
        if self.algorithm.uses_item_weights() { s.weights(weights) } else { s }
    }

    /// Indices of the unassigned items in processing order.
    fn queue(&self, items: &[Item]) -> Vec<usize> {
        let mut queue: Vec<usize> = (0 .. items.len())
            .filter(|&i| !items[i].is_assigned()).collect();
        match self.order {
            Order::ByWeight => queue.sort_by(|&i, &j| {
                items[j].meta.weight.total_cmp(&items[i].meta.weight)
            }),
            Order::Listed => (),
            Order::Reversed => queue.reverse(),
        }
        queue
    }

    fn fitness(&self, meta: &ItemMeta, color: &Color, uses: usize, spare: bool,
               harmony: u8) -> f64 {
        let (l, c) = (color.lightness(), color.chroma());
        lightness_fit(&meta.lightness, l)
            + role_fit(meta.role, l, c)
            + diversity(uses, spare)
            + HARMONY_SCALE * harmony as f64
            + tendency_fit(meta.tendency, color)
    }

    /// Return a copy of `items` where every unassigned item has received a
    /// color of `palette`.  Assigned items are left untouched; an empty
    /// palette returns the items unchanged.
    pub fn fill(&self, items: &[Item], palette: &[Color]) -> Vec<Item> {
        let mut out = items.to_vec();
        if palette.is_empty() { return out }
        let mut uses = vec![0usize; palette.len()];
        let mut colors = vec![];
        let mut weights = vec![];
        for item in items {
            let Some(c) = item.color else { continue };
            colors.push(c);
            weights.push(item.meta.weight);
            if let Some(k) = palette.iter().position(|p| p.distance(&c) < SAME_COLOR) {
                uses[k] += 1;
            }
        }
        let queue = self.queue(items);
        for (n, &i) in queue.iter().enumerate() {
            let meta = out[i].meta;
            let spare = palette.len() > queue.len() - n;
            weights.push(meta.weight);
            let mut best: Option<(usize, f64)> = None;
            for (k, candidate) in palette.iter().enumerate() {
                colors.push(*candidate);
                let harmony = self.scorer(palette, &weights).score(&colors);
                colors.pop();
                let f = self.fitness(&meta, candidate, uses[k], spare, harmony);
                if best.map_or(true, |(_, b)| f > b) { best = Some((k, f)) }
            }
            weights.pop();
            if let Some((k, f)) = best {
                trace!("{} ← {} (fitness {f:.1})", out[i].name, palette[k]);
                out[i].color = Some(palette[k]);
                colors.push(palette[k]);
                weights.push(meta.weight);
                uses[k] += 1;
            }
        }
        out
    }

    /// Cohesion score of the colors assigned in `items`.
    pub fn cohesion(&self, items: &[Item], palette: &[Color]) -> u8 {
        let (colors, weights) = assigned(items);
        self.scorer(palette, &weights).score(&colors)
    }

    /// Contribution of `items[index]` to the cohesion of the assigned
    /// colors; 0 if that item is unassigned.
    pub fn delta(&self, items: &[Item], index: usize, palette: &[Color]) -> i16 {
        if !items.get(index).is_some_and(Item::is_assigned) { return 0 }
        let k = items[.. index].iter().filter(|i| i.is_assigned()).count();
        let (colors, weights) = assigned(items);
        self.scorer(palette, &weights).delta(&colors, k)
    }

    /// Rank candidate colors for `items[index]`: the [`candidate_grid`]
    /// and the palette, each scored by the cohesion of the other assigned
    /// items plus the candidate.  Sorted by decreasing score.
    pub fn suggest(&self, items: &[Item], index: usize, palette: &[Color])
                   -> Vec<Suggestion> {
        let Some(slot) = items.get(index) else { return vec![] };
        let others: Vec<Item> = items.iter().enumerate()
            .filter(|&(i, _)| i != index).map(|(_, it)| it.clone()).collect();
        let (mut colors, mut weights) = assigned(&others);
        weights.push(slot.meta.weight);
        let mut scored: Vec<(Color, u8)> = candidate_grid().into_iter()
            .chain(palette.iter().copied())
            .map(|c| {
                colors.push(c);
                let s = self.scorer(palette, &weights).score(&colors);
                colors.pop();
                (c, s)
            })
            .collect();
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        let best = scored.first().map_or(0, |&(_, s)| s);
        scored.into_iter()
            .map(|(color, score)| Suggestion { color, score,
                                               tier: Tier::of(score, best) })
            .collect()
    }
}

/// Colors and weights of the assigned items, in list order.
fn assigned(items: &[Item]) -> (Vec<Color>, Vec<f64>) {
    items.iter()
        .filter_map(|i| i.color.map(|c| (c, i.meta.weight)))
        .unzip()
}

/// Fill the unassigned items of `items` with colors of `palette`,
/// heaviest first; see [`Filler::fill`].
pub fn auto_fill(items: &[Item], palette: &[Color], algorithm: Algorithm)
                 -> Vec<Item> {
    Filler::new(algorithm).fill(items, palette)
}

/// Rank candidate colors for `items[index]`; see [`Filler::suggest`].
pub fn suggest(items: &[Item], index: usize, palette: &[Color],
               algorithm: Algorithm) -> Vec<Suggestion> {
    Filler::new(algorithm).suggest(items, index, palette)
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use crate::catalog::{self, ItemMeta, Weight};

    fn hexes(hs: &[&str]) -> Vec<Color> {
        hs.iter().map(|h| Color::from_hex(h).unwrap()).collect()
    }

    fn living_room() -> Vec<Item> {
        let mut id = 0;
        catalog::LIVING_ROOM.instantiate(|| { id += 1; id })
    }

    fn meta(role: Role, min: f64, max: f64) -> ItemMeta {
        ItemMeta::new(Weight::Scale(5.), LightnessRange::new(min, max), role)
    }

    #[test]
    fn empty_palette_is_a_no_op() {
        let items = living_room();
        assert_eq!(auto_fill(&items, &[], Algorithm::Balanced), items);
        assert!(auto_fill(&[], &hexes(&["#B5651D"]), Algorithm::Balanced)
                .is_empty());
    }

    #[test]
    fn fills_everything() {
        let palette = hexes(&["#B5651D", "#F5F0E8", "#9CAF88", "#8B4513"]);
        let filled = auto_fill(&living_room(), &palette, Algorithm::Balanced);
        assert!(filled.iter().all(Item::is_assigned));
        assert!(filled.iter().all(|i| palette.contains(&i.color.unwrap())));
    }

    #[test]
    fn pins_survive() {
        let palette = hexes(&["#B5651D", "#F5F0E8", "#9CAF88", "#8B4513"]);
        let mut items = living_room();
        let pink = Color::from_hex("#FF69B4").unwrap();
        items[2] = items[2].clone().with_color(pink);
        let filled = auto_fill(&items, &palette, Algorithm::HueFamily);
        assert_eq!(filled[2].color, Some(pink));
        assert_eq!(filled[2].id, items[2].id);
        // Everything assigned: idempotent.
        assert_eq!(auto_fill(&filled, &palette, Algorithm::HueFamily), filled);
    }

    #[test]
    fn weight_order() {
        let items = living_room();
        let queue = Filler::new(Algorithm::Balanced).queue(&items);
        let names: Vec<&str> = queue.iter().map(|&i| items[i].name.as_str())
            .collect();
        assert_eq!(names, ["Main Wall", "Floors", "Couch", "Accent Wall", "Rug",
                           "Drapes", "Bookshelf", "Doors"]);
        let rev = Filler::new(Algorithm::Balanced).order(Order::Reversed)
            .queue(&items);
        assert_eq!(rev, [7, 6, 5, 4, 3, 2, 1, 0]);
    }

    #[test]
    fn lightness_and_roles_drive_choice() {
        let palette = hexes(&["#F5F0E8", "#8B4513", "#1C1C1C"]);
        let items = vec![
            Item::new(1, "wall", meta(Role::Background, 70., 95.)),
            Item::new(2, "floor", meta(Role::Ground, 15., 50.)),
        ];
        let filled = auto_fill(&items, &palette, Algorithm::Balanced);
        assert_eq!(filled[0].color, Some(palette[0]));
        assert_eq!(filled[1].color, Some(palette[1]));
    }

    #[test]
    fn neutral_role_prefers_low_chroma() {
        let palette = hexes(&["#C8553D", "#D9D4CC"]);
        let items = vec![Item::new(1, "trim", meta(Role::Neutral, 20., 90.))];
        let filled = auto_fill(&items, &palette, Algorithm::Balanced);
        assert_eq!(filled[0].color, Some(palette[1]));
    }

    #[test]
    fn diversity_pressure() {
        let palette = hexes(&["#C0392B", "#E67E22", "#27AE60", "#2980B9",
                              "#8E44AD", "#F1C40F"]);
        let items: Vec<Item> = (0 .. 5)
            .map(|i| Item::new(i, format!("item {i}"), meta(Role::Anchor, 20., 90.)))
            .collect();
        let filled = auto_fill(&items, &palette, Algorithm::SurfaceArea);
        let distinct: HashSet<String> = filled.iter()
            .map(|i| i.color.unwrap().to_hex()).collect();
        assert!(distinct.len() > 2, "{distinct:?}");
    }

    #[test]
    fn diversity_terms() {
        assert!(diversity(0, false) > diversity(1, false));
        assert!(diversity(1, false) > 0.);
        assert!(diversity(2, false) < 0.);
        assert!(diversity(1, true) < 0.);
        assert!(diversity(3, true) < diversity(3, false));
    }

    #[test]
    fn tendencies() {
        let light = Color::lch(80., 5., 0.).unwrap();
        let rust = Color::lch(45., 50., 45.).unwrap();
        let teal = Color::lch(45., 40., 220.).unwrap();
        assert!(tendency_fit(Some(Tendency::Lighter), &light) > 0.);
        assert!(tendency_fit(Some(Tendency::Darker), &light) < 0.);
        assert!(tendency_fit(Some(Tendency::Warmer), &rust) > 0.);
        assert!(tendency_fit(Some(Tendency::Warmer), &teal) < 0.);
        assert!(tendency_fit(Some(Tendency::Cooler), &teal) > 0.);
        assert!(tendency_fit(Some(Tendency::Neutral), &light) > 0.);
        assert!(tendency_fit(Some(Tendency::Bold), &rust) > 0.);
        assert_eq!(tendency_fit(None, &rust), 0.);
    }

    #[test]
    fn suggestions_are_tiered() {
        let palette = hexes(&["#B5651D", "#F5F0E8", "#9CAF88", "#8B4513"]);
        let items = auto_fill(&living_room(), &palette, Algorithm::Balanced);
        let s = suggest(&items, 6, &palette, Algorithm::Balanced);
        assert_eq!(s.len(), 12 * 3 * 2 + 5 + palette.len());
        assert!(s.windows(2).all(|w| w[0].score >= w[1].score));
        assert_eq!(s[0].tier, Tier::Great);
        for x in &s {
            let gap = s[0].score - x.score;
            let tier = if gap <= 5 { Tier::Great }
                       else if gap <= 20 { Tier::Ok } else { Tier::Avoid };
            assert_eq!(x.tier, tier);
        }
        assert!(suggest(&items, 99, &palette, Algorithm::Balanced).is_empty());
    }

    #[test]
    fn cohesion_and_delta_of_items() {
        let palette = hexes(&["#B5651D", "#F5F0E8", "#9CAF88", "#8B4513"]);
        let filler = Filler::new(Algorithm::Balanced);
        let items = filler.fill(&living_room(), &palette);
        assert!(filler.cohesion(&items, &palette) <= 100);
        let mut partial = items.clone();
        partial[3].color = None;
        assert_eq!(filler.delta(&partial, 3, &palette), 0);
        let (colors, _) = assigned(&items);
        let s = Scorer::new(Algorithm::Balanced).reference(&palette);
        assert_eq!(filler.delta(&items, 5, &palette), s.delta(&colors, 5));
    }
}
