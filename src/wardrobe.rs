//! Wardrobe variant of the assignment engine.
//!
//! Garments are split in two lanes.  [`Role::Foundation`] pieces (shoes,
//! belts, bags) share the neutral colors of the palette: each takes the
//! neutral closest to its lightness target and several pieces may wear
//! the same one.  Visible garments take chromatic colors, spread apart
//! from each other, without reusing a color until the pool runs out.
//! Garments of the same kind get their colors in lightness order, so
//! three T-shirts come out dark, medium and light.

use std::collections::HashMap;
use log::{debug, trace};
use crate::catalog::{Item, Role};
use crate::color::Color;

/// Palette colors below this chroma form the neutral pool.
const NEUTRAL_CHROMA: f64 = 12.;
/// ΔE beyond which two garments count as fully distinct.
const SPREAD_CAP: f64 = 25.;
/// Cost of one unit of lightness away from a garment's target.
const LIGHTNESS_FIT: f64 = 1.5;

/// Split the palette into neutral and chromatic pools.  An empty pool
/// falls back to the whole palette.
fn pools(palette: &[Color]) -> (Vec<Color>, Vec<Color>) {
    let (mut neutral, mut chromatic): (Vec<Color>, Vec<Color>) =
        palette.iter().copied().partition(|c| c.chroma() < NEUTRAL_CHROMA);
    if neutral.is_empty() { neutral = palette.to_vec() }
    if chromatic.is_empty() { chromatic = palette.to_vec() }
    (neutral, chromatic)
}

/// Lightness target of each item.  The `k` unassigned items sharing a
/// name get targets spread evenly over their range so that, say, three
/// T-shirts come out light, medium and dark.
fn targets(items: &[Item]) -> Vec<f64> {
    let mut total: HashMap<&str, usize> = HashMap::new();
    for it in items.iter().filter(|i| !i.is_assigned()) {
        *total.entry(it.name.as_str()).or_default() += 1;
    }
    let mut seen: HashMap<&str, usize> = HashMap::new();
    items.iter().map(|it| {
        if it.is_assigned() { return it.meta.lightness.mid() }
        let k = total.get(it.name.as_str()).copied().unwrap_or(1);
        let j = seen.entry(it.name.as_str()).or_default();
        let t = it.meta.lightness.spread(*j, k);
        *j += 1;
        t
    }).collect()
}

/// Index of the color of `pool` closest in lightness to `target`.
fn nearest(pool: &[Color], target: f64) -> Option<usize> {
    pool.iter().enumerate()
        .min_by(|(_, a), (_, b)| {
            (a.lightness() - target).abs()
                .total_cmp(&(b.lightness() - target).abs())
        })
        .map(|(k, _)| k)
}

#[inline]
fn is_foundation(item: &Item) -> bool { item.meta.role == Role::Foundation }

/// Unassigned visible garments grouped by name, the group with the
/// narrowest lightness range first.
fn groups(items: &[Item]) -> Vec<Vec<usize>> {
    let mut groups: Vec<Vec<usize>> = vec![];
    for (i, it) in items.iter().enumerate() {
        if it.is_assigned() || is_foundation(it) { continue }
        match groups.iter_mut().find(|g| items[g[0]].name == it.name) {
            Some(g) => g.push(i),
            None => groups.push(vec![i]),
        }
    }
    let width = |g: &Vec<usize>| items[g[0]].meta.lightness.width();
    groups.sort_by(|g, h| width(g).total_cmp(&width(h)));
    groups
}

/// Return a copy of `items` where every unassigned garment has received
/// a color of `palette`.  Pinned garments keep their color and count as
/// already worn when spreading the visible ones.
pub fn auto_fill(items: &[Item], palette: &[Color]) -> Vec<Item> {
    let mut out = items.to_vec();
    if palette.is_empty() { return out }
    let (neutral, chromatic) = pools(palette);
    debug!("wardrobe pools: {} neutral, {} chromatic",
           neutral.len(), chromatic.len());
    let targets = targets(items);

    for (i, item) in out.iter_mut().enumerate() {
        if item.is_assigned() || !is_foundation(item) { continue }
        if let Some(k) = nearest(&neutral, targets[i]) {
            trace!("{} ← {} (target L {:.0})", item.name, neutral[k], targets[i]);
            item.color = Some(neutral[k]);
        }
    }

    let mut picked: Vec<Color> = items.iter()
        .filter(|i| !is_foundation(i))
        .filter_map(|i| i.color)
        .collect();
    let mut pool = chromatic.clone();
    for group in groups(items) {
        let mut chosen = Vec::with_capacity(group.len());
        for &i in &group {
            if pool.is_empty() {
                debug!("chromatic pool exhausted, reusing colors");
                pool = chromatic.clone();
            }
            let target = targets[i];
            let fit = |c: &Color| {
                let spread = picked.iter().map(|p| p.distance(c))
                    .fold(f64::INFINITY, f64::min);
                let spread = if spread.is_finite() { spread.min(SPREAD_CAP) }
                             else { 0. };
                spread - LIGHTNESS_FIT * (c.lightness() - target).abs()
            };
            let mut best = 0;
            let mut best_fit = f64::NEG_INFINITY;
            for (k, c) in pool.iter().enumerate() {
                let f = fit(c);
                if f > best_fit {
                    best = k;
                    best_fit = f;
                }
            }
            let c = pool.remove(best);
            chosen.push(c);
            picked.push(c);
        }
        // Darkest color to the darkest target.
        chosen.sort_by(|a, b| a.lightness().total_cmp(&b.lightness()));
        let mut slots = group;
        slots.sort_by(|&i, &j| targets[i].total_cmp(&targets[j]));
        for (i, c) in slots.into_iter().zip(chosen) {
            trace!("{} ← {c} (target L {:.0})", out[i].name, targets[i]);
            out[i].color = Some(c);
        }
    }
    out
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use crate::catalog::{self, ItemMeta, LightnessRange, Weight};

    fn hexes(hs: &[&str]) -> Vec<Color> {
        hs.iter().map(|h| Color::from_hex(h).unwrap()).collect()
    }

    fn capsule() -> Vec<Item> {
        let mut id = 0;
        catalog::CAPSULE.instantiate(|| { id += 1; id })
    }

    fn bases() -> Vec<Color> {
        hexes(&["#B5651D", "#F5F0E8", "#9CAF88", "#8B4513", "#1C1C1C"])
    }

    #[test]
    fn empty_palette() {
        let items = capsule();
        assert_eq!(auto_fill(&items, &[]), items);
    }

    #[test]
    fn pools_fall_back() {
        let (n, c) = pools(&bases());
        assert_eq!(n, hexes(&["#F5F0E8", "#1C1C1C"]));
        assert_eq!(c, hexes(&["#B5651D", "#9CAF88", "#8B4513"]));
        let greys = hexes(&["#808080", "#C0C0C0"]);
        assert_eq!(pools(&greys), (greys.clone(), greys.clone()));
    }

    #[test]
    fn same_garments_spread_lightness() {
        let t = targets(&capsule());
        assert_eq!(&t[.. 3], &[20., 55., 90.]);
        assert_eq!(t[3], 35.); // Jeans
        let mut items = capsule();
        items[0] = items[0].clone().with_color(Color::from_hex("#222222").unwrap());
        let t = targets(&items);
        assert_eq!(&t[1 .. 3], &[20., 90.]);
    }

    #[test]
    fn tees_follow_their_targets() {
        let mut palette = bases();
        palette.extend(hexes(&["#C0392B", "#E67E22", "#27AE60", "#2980B9",
                               "#8E44AD", "#F1C40F", "#16A085", "#2C3E50"]));
        let filled = auto_fill(&capsule(), &palette);
        let tees: Vec<f64> = filled[.. 3].iter()
            .map(|i| i.color.unwrap().lightness()).collect();
        assert!(tees[0] < tees[1] && tees[1] < tees[2], "{tees:?}");
        assert_eq!(filled[0].color, Some(Color::from_hex("#2C3E50").unwrap()));
        assert_eq!(filled[2].color, Some(Color::from_hex("#F1C40F").unwrap()));
    }

    #[test]
    fn narrowest_group_first() {
        let items = capsule();
        let names: Vec<&str> = groups(&items).iter()
            .map(|g| items[g[0]].name.as_str()).collect();
        assert_eq!(names, ["Jeans", "Jacket", "Scarf", "Sweater", "T-Shirt"]);
        assert_eq!(groups(&items)[4], vec![0, 1, 2]);
    }

    #[test]
    fn foundation_shares_neutrals() {
        let filled = auto_fill(&capsule(), &bases());
        let black = Color::from_hex("#1C1C1C").unwrap();
        for it in filled.iter().filter(|i| is_foundation(i)) {
            assert_eq!(it.color, Some(black), "{}", it.name);
        }
    }

    #[test]
    fn visible_garments_are_chromatic() {
        let palette = bases();
        let (_, chromatic) = pools(&palette);
        let filled = auto_fill(&capsule(), &palette);
        assert!(filled.iter().all(Item::is_assigned));
        for it in filled.iter().filter(|i| !is_foundation(i)) {
            assert!(chromatic.contains(&it.color.unwrap()), "{}", it.name);
        }
    }

    #[test]
    fn no_reuse_while_pool_lasts() {
        let palette = hexes(&["#C0392B", "#E67E22", "#27AE60", "#2980B9",
                              "#8E44AD", "#F1C40F", "#16A085", "#7F8C8D",
                              "#2C3E50"]);
        let filled = auto_fill(&capsule(), &palette);
        let visible: Vec<String> = filled.iter().filter(|i| !is_foundation(i))
            .map(|i| i.color.unwrap().to_hex()).collect();
        let distinct: HashSet<&String> = visible.iter().collect();
        assert_eq!(visible.len(), 7);
        assert_eq!(distinct.len(), 7);
    }

    #[test]
    fn pinned_garments_count_as_picked() {
        let meta = ItemMeta::new(Weight::Scale(5.), LightnessRange::new(20., 90.),
                                 Role::Core);
        let pinned = Color::lch(55., 40., 30.).unwrap();
        let near = Color::lch(55., 38., 32.).unwrap();
        let far = Color::lch(50., 40., 210.).unwrap();
        let tee = Item::new(2, "T-Shirt", meta);
        let alone = auto_fill(&[tee.clone()], &[near, far]);
        assert_eq!(alone[0].color, Some(near));
        let items = [Item::new(1, "Shirt", meta).with_color(pinned), tee];
        let filled = auto_fill(&items, &[near, far]);
        assert_eq!(filled[0].color, Some(pinned));
        assert_eq!(filled[1].color, Some(far));
    }
}
