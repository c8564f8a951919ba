//! Item metadata: the default room and wardrobe catalogs and the
//! templates instantiating them.
//!
//! Catalogs are plain lookup tables (name → [`ItemMeta`]).  The engines
//! only ever see normalized [`ItemMeta`] records; names missing from a
//! catalog get the catalog's fallback metadata.

use std::collections::BTreeMap;
use lazy_static::lazy_static;
use log::debug;

pub(crate) mod ty;
pub use ty::*;

/// Which family of items a catalog describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Room,
    Wardrobe,
}

/// A name → metadata table with a fallback for unknown names.
#[derive(Clone, Debug)]
pub struct Catalog {
    kind: Kind,
    entries: BTreeMap<String, ItemMeta>, // keys are lower-case
}

impl Catalog {
    /// An empty catalog.
    pub fn new(kind: Kind) -> Self {
        Catalog { kind, entries: BTreeMap::new() }
    }

    #[inline]
    pub fn kind(&self) -> Kind { self.kind }

    /// Role of the items not found in the catalog.
    pub fn fallback_role(&self) -> Role {
        match self.kind { Kind::Room => Role::Anchor, Kind::Wardrobe => Role::Core }
    }

    /// Add or replace the metadata of `name`.
    pub fn insert(&mut self, name: &str, meta: ItemMeta) {
        self.entries.insert(name.trim().to_lowercase(), meta);
    }

    /// Add or replace entries as read from a configuration file.
    pub fn extend<'a>(&mut self, entries: impl IntoIterator<Item = &'a CatalogEntry>) {
        let role = self.fallback_role();
        for e in entries {
            self.insert(&e.name, e.meta(role));
        }
    }

    /// The metadata of `name` (case-insensitive), if known.
    pub fn get(&self, name: &str) -> Option<ItemMeta> {
        self.entries.get(&name.trim().to_lowercase()).copied()
    }

    /// The metadata of `name`, or the fallback metadata (weight 3,
    /// lightness \[20, 90\], role [`Role::Anchor`] for rooms and
    /// [`Role::Core`] for wardrobes).
    pub fn lookup(&self, name: &str) -> ItemMeta {
        self.get(name).unwrap_or_else(|| {
            debug!("no catalog entry for “{name}”, using defaults");
            ItemMeta::fallback(self.fallback_role())
        })
    }

    /// Create an unassigned item named `name`.
    pub fn item(&self, id: u64, name: &str) -> Item {
        Item::new(id, name, self.lookup(name))
    }

    /// Names known to the catalog (lower-case, sorted).
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

fn room() -> Catalog {
    use Role::*;
    use Tendency::{Bold, Darker, Lighter, Warmer};
    let mut c = Catalog::new(Kind::Room);
    let mut add = |name, w: f64, min, max, role, t: Option<Tendency>| {
        let meta = ItemMeta::new(Weight::Scale(w),
                                 LightnessRange::new(min, max), role);
        c.insert(name, ItemMeta { tendency: t, ..meta });
    };
    add("Floors",       9., 15.,  50., Ground,     None);
    add("Main Wall",   10., 70.,  95., Background, None);
    add("Accent Wall",  6., 30.,  75., Accent,     None);
    add("Ceiling",      8., 85., 100., Background, Some(Lighter));
    add("Bookshelf",    4., 20.,  70., Anchor,     None);
    add("Doors",        3., 60.,  95., Neutral,    None);
    add("Trim",         2., 80., 100., Neutral,    Some(Lighter));
    add("Drapes",       5., 45.,  85., Anchor,     Some(Lighter));
    add("Couch",        7., 25.,  70., Anchor,     None);
    add("Rug",          6., 25.,  65., Ground,     Some(Warmer));
    add("Pillows",      1., 30.,  80., Accent,     Some(Bold));
    add("Cabinets",     6., 30.,  90., Anchor,     None);
    add("Countertop",   5., 40.,  95., Neutral,    None);
    add("Backsplash",   3., 50.,  90., Accent,     None);
    add("Bed",          7., 25.,  75., Anchor,     None);
    add("Bedding",      6., 60.,  95., Background, Some(Lighter));
    add("Coffee Table", 3., 20.,  60., Anchor,     Some(Darker));
    add("Armchair",     4., 25.,  70., Accent,     None);
    c
}

fn wardrobe() -> Catalog {
    use Bucket::*;
    use Role::*;
    let mut c = Catalog::new(Kind::Wardrobe);
    let mut add = |name, w, min, max, role| {
        c.insert(name, ItemMeta::new(Weight::Bucket(w),
                                     LightnessRange::new(min, max), role));
    };
    add("T-Shirt",  Medium, 20., 90., Core);
    add("Shirt",    Medium, 30., 90., Core);
    add("Sweater",  Medium, 20., 80., Core);
    add("Jacket",   Large,  15., 60., Core);
    add("Coat",     Large,  15., 55., Core);
    add("Jeans",    Large,  15., 55., Core);
    add("Trousers", Large,  15., 70., Core);
    add("Skirt",    Medium, 20., 70., Core);
    add("Dress",    Large,  25., 80., Core);
    add("Scarf",    Small,  30., 85., Accent);
    add("Shoes",    Small,  10., 40., Foundation);
    add("Boots",    Small,  10., 35., Foundation);
    add("Belt",     Small,  10., 40., Foundation);
    add("Bag",      Small,  15., 50., Foundation);
    if let Some(scarf) = c.get("Scarf") {
        c.insert("Scarf", scarf.tendency(Tendency::Bold));
    }
    c
}

lazy_static! {
    /// Default catalog of room surfaces and furniture.
    pub static ref ROOM: Catalog = room();
    /// Default catalog of garments.
    pub static ref WARDROBE: Catalog = wardrobe();
}

/// A named list of items.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Template {
    pub name: &'static str,
    pub kind: Kind,
    pub items: &'static [&'static str],
}

pub const LIVING_ROOM: Template = Template {
    name: "Living Room",
    kind: Kind::Room,
    items: &["Floors", "Main Wall", "Accent Wall", "Bookshelf", "Doors",
             "Drapes", "Couch", "Rug"],
};

pub const KITCHEN: Template = Template {
    name: "Kitchen",
    kind: Kind::Room,
    items: &["Floors", "Main Wall", "Cabinets", "Countertop", "Backsplash",
             "Trim", "Ceiling"],
};

pub const BEDROOM: Template = Template {
    name: "Bedroom",
    kind: Kind::Room,
    items: &["Floors", "Main Wall", "Accent Wall", "Bed", "Bedding",
             "Drapes", "Rug", "Pillows"],
};

pub const CAPSULE: Template = Template {
    name: "Capsule Wardrobe",
    kind: Kind::Wardrobe,
    items: &["T-Shirt", "T-Shirt", "T-Shirt", "Jeans", "Jacket", "Sweater",
             "Shoes", "Belt", "Bag", "Scarf"],
};

pub const TEMPLATES: [Template; 4] = [LIVING_ROOM, KITCHEN, BEDROOM, CAPSULE];

impl Template {
    /// Instantiate the template with the default catalog of its kind.
    /// `next_id` issues the identifiers of the new items.
    pub fn instantiate(&self, next_id: impl FnMut() -> u64) -> Vec<Item> {
        let catalog: &Catalog = match self.kind {
            Kind::Room => &ROOM,
            Kind::Wardrobe => &WARDROBE,
        };
        self.instantiate_with(catalog, next_id)
    }

    /// Instantiate the template looking item names up in `catalog`.
    pub fn instantiate_with(&self, catalog: &Catalog,
                            mut next_id: impl FnMut() -> u64) -> Vec<Item> {
        self.items.iter().map(|name| catalog.item(next_id(), name)).collect()
    }

    /// Find a template by name (case-insensitive).
    pub fn find(name: &str) -> Option<Template> {
        TEMPLATES.iter().copied().find(|t| t.name.eq_ignore_ascii_case(name))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let floors = ROOM.lookup("  floors ");
        assert_eq!(floors.role, Role::Ground);
        assert_eq!(floors.weight, 9.);
        assert_eq!(floors.lightness, LightnessRange { min: 15., max: 50. });
    }

    #[test]
    fn fallbacks() {
        let m = ROOM.lookup("Grand Piano");
        assert_eq!((m.weight, m.role), (3., Role::Anchor));
        assert_eq!((m.lightness.min, m.lightness.max), (20., 90.));
        assert_eq!(WARDROBE.lookup("Cape").role, Role::Core);
    }

    #[test]
    fn buckets_map_onto_scale() {
        assert_eq!(WARDROBE.lookup("Jeans").weight, 8.);
        assert_eq!(WARDROBE.lookup("T-Shirt").weight, 5.);
        assert_eq!(WARDROBE.lookup("Belt").weight, 2.);
        assert_eq!(Weight::Scale(42.).value(), 10.);
        assert_eq!(Weight::Scale(f64::NAN).value(), 3.);
        assert_eq!(WARDROBE.lookup("Scarf").tendency, Some(Tendency::Bold));
    }

    #[test]
    fn trim_and_doors_are_neutral() {
        for name in ["Doors", "Trim", "Countertop"] {
            assert_eq!(ROOM.lookup(name).role, Role::Neutral, "{name}");
        }
        assert_eq!(ROOM.lookup("Trim").tendency, Some(Tendency::Lighter));
        assert_eq!(ROOM.lookup("Rug").tendency, Some(Tendency::Warmer));
        assert_eq!(ROOM.lookup("Coffee Table").tendency, Some(Tendency::Darker));
    }

    #[test]
    fn floors_darker_than_walls() {
        let f = ROOM.lookup("Floors").lightness;
        let w = ROOM.lookup("Main Wall").lightness;
        assert!(f.max < w.min);
    }

    #[test]
    fn instantiate_uses_caller_ids() {
        let mut next = 100;
        let items = LIVING_ROOM.instantiate(|| { next += 1; next });
        assert_eq!(items.len(), 8);
        assert_eq!(items[0].id, 101);
        assert_eq!(items[7].id, 108);
        assert_eq!(items[7].name, "Rug");
        assert!(items.iter().all(|i| !i.is_assigned()));
        assert_eq!(Template::find("capsule wardrobe"), Some(CAPSULE));
    }

    #[test]
    fn extend_with_entries() {
        let mut c = Catalog::new(Kind::Wardrobe);
        c.extend(&[CatalogEntry {
            name: "Hat".into(), weight: Some(Weight::Bucket(Bucket::Small)),
            lightness: Some([80., 30.]), role: None, tendency: None }]);
        let hat = c.lookup("HAT");
        assert_eq!(hat.weight, 2.);
        assert_eq!(hat.role, Role::Core);
        assert_eq!((hat.lightness.min, hat.lightness.max), (30., 80.));
        assert_eq!(c.names().collect::<Vec<_>>(), vec!["hat"]);
    }

    #[test]
    fn spread_targets() {
        let r = LightnessRange::new(20., 80.);
        assert_eq!(r.spread(0, 3), 20.);
        assert_eq!(r.spread(1, 3), 50.);
        assert_eq!(r.spread(2, 3), 80.);
        assert_eq!(r.spread(0, 1), 50.);
        assert_eq!(r.outside(10.), 10.);
        assert_eq!(r.outside(50.), 0.);
    }
}
