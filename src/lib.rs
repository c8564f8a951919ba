//! Cohesive color palettes and their assignment to rooms and wardrobes.
//!
//! - [`Color`]: perceptual (CIE L\*a\*b\*) colors with hex and
//!   [`rgb`] pixel conversions, and the forgiving [`parse()`].
//! - [`harmony`]: seeded generation of colors related to locked bases
//!   ([`HarmonyMode`]).
//! - [`cohesion`]: a 0–100 score of how well a set of colors hangs
//!   together, with per-color contributions.
//! - [`assign`] and [`wardrobe`]: fill the unassigned [`Item`]s of a room
//!   or wardrobe from a palette, and rank candidate colors for a slot.
//! - [`catalog`]: default item metadata and templates.
//!
//! All of it is synchronous and deterministic.  The library logs through
//! the [`log`] facade and never installs a logger.
//!
//! ```
//! use palette_cohesion::{assign, catalog, harmony, Algorithm, Color,
//!                        HarmonyMode};
//! let bases = [Color::from_hex("#B5651D").unwrap(),
//!              Color::from_hex("#F5F0E8").unwrap()];
//! let mut palette = harmony::generate(&bases, HarmonyMode::Analogous, 6, 0, 42);
//! palette.extend(bases);
//! let mut id = 0;
//! let room = catalog::LIVING_ROOM.instantiate(|| { id += 1; id });
//! let room = assign::auto_fill(&room, &palette, Algorithm::SurfaceArea);
//! assert!(room.iter().all(|item| item.color.is_some()));
//! ```

pub mod assign;
pub mod catalog;
pub mod cohesion;
pub mod color;
pub mod config;
pub mod error;
pub mod harmony;
pub mod parse;
pub mod wardrobe;

pub use assign::{Suggestion, Tier};
pub use catalog::{Item, ItemMeta, Role, Tendency, Weight};
pub use cohesion::{Algorithm, Scorer};
pub use color::{hue_distance, Color, Lab, Lch, RGBColor};
pub use config::Config;
pub use error::{Error, Result};
pub use harmony::HarmonyMode;
pub use parse::parse;
