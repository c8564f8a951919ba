//! Generate palettes around a few locked colors, fill a living room and
//! a capsule wardrobe, and write the result to `living_room.html`.
//!
//! Usage: `cargo run --example living_room [config.toml]`.  Engine
//! decisions are logged to `living_room.log`.

use std::{env,
          io::{BufWriter, Write},
          fs::File,
          error::Error};
use log::LevelFilter;
use simplelog::WriteLogger;
use palette_cohesion::{
    catalog::{self, Kind, Item}, harmony, parse::parse_many, wardrobe,
    Color, Config, HarmonyMode, Tier,
};

type Err = Box<dyn Error>;

const BASES: &str = "#B5651D; #F5F0E8; rgb(156, 175, 136); #8B4513; lab(10, 0, 0)";

fn swatch(fh: &mut impl Write, c: Color, width: u32, label: &str)
          -> Result<(), Err> {
    writeln!(fh, "  <td style=\"width: {width}px; height: 40px; \
                  background-color: {c}\" title=\"{c}\">{label}</td>")?;
    Ok(())
}

fn table_of_colors(fh: &mut impl Write, colors: &[Color], comment: &str)
                   -> Result<(), Err> {
    writeln!(fh, "<table style=\"border: 0px;  border-spacing: 0px\"><tr>")?;
    for &c in colors {
        swatch(fh, c, 43, "")?;
    }
    writeln!(fh, "<td style=\"padding-left: 7px\">{comment}</td></tr>\
                  </table><br/>")?;
    Ok(())
}

fn table_of_items(fh: &mut impl Write, items: &[Item], comment: &str)
                  -> Result<(), Err> {
    writeln!(fh, "<h4>{comment}</h4>\n<table style=\"border-spacing: 4px\">")?;
    for item in items {
        write!(fh, "<tr><td>{}</td>", item.name)?;
        match item.color {
            Some(c) => swatch(fh, c, 80, "")?,
            None => writeln!(fh, "  <td>—</td>")?,
        }
        writeln!(fh, "<td>{}</td></tr>",
                 item.color.map_or(String::new(), |c| c.to_hex()))?;
    }
    writeln!(fh, "</table>")?;
    Ok(())
}

fn main() -> Result<(), Err> {
    WriteLogger::init(LevelFilter::Trace, simplelog::Config::default(),
                      File::create("living_room.log")?)?;
    let config = match env::args().nth(1) {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let bases = parse_many(BASES).colors;
    let generator = config.generator();
    let seed = harmony::clock_seed();

    let mut fh = BufWriter::new(File::create("living_room.html")?);
    writeln!(fh, "<html>\n\
                  <head>\n\
                  <title>Palette cohesion: living room</title>\n\
                  </head>\n\
                  <body>")?;
    writeln!(fh, "<h3>Locked colors</h3>")?;
    table_of_colors(&mut fh, &bases, "bases")?;

    writeln!(fh, "<h3>Generated (batch seed {seed:#x})</h3>")?;
    let scorer = config.scorer();
    let mut best: Option<(u8, Vec<Color>)> = None;
    for mode in HarmonyMode::ALL {
        for (v, colors) in generator.generate_batch(&bases, mode, 6, 3, seed)
            .into_iter().enumerate() {
            let mut palette = bases.clone();
            palette.extend(colors);
            let score = scorer.score(&palette);
            table_of_colors(&mut fh, &palette,
                            &format!("{mode} #{v}: cohesion {score}"))?;
            if best.as_ref().map_or(true, |(s, _)| score > *s) {
                best = Some((score, palette));
            }
        }
    }
    let Some((score, palette)) = best else { return Ok(()) };
    writeln!(fh, "<h3>Best palette (cohesion {score})</h3>")?;
    table_of_colors(&mut fh, &palette, "")?;

    let mut next = 0;
    let mut id = || { next += 1; next };
    let filler = config.filler();
    let room = catalog::LIVING_ROOM
        .instantiate_with(&config.catalog(Kind::Room), &mut id);
    let room = filler.fill(&room, &palette);
    table_of_items(&mut fh, &room,
                   &format!("Living room (cohesion {})",
                            filler.cohesion(&room, &palette)))?;

    if let Some(couch) = room.iter().position(|i| i.name == "Couch") {
        let great: Vec<Color> = filler.suggest(&room, couch, &palette).iter()
            .filter(|s| s.tier == Tier::Great).map(|s| s.color).collect();
        table_of_colors(&mut fh, &great, "great alternatives for the couch")?;
    }

    let closet = catalog::CAPSULE
        .instantiate_with(&config.catalog(Kind::Wardrobe), &mut id);
    table_of_items(&mut fh, &wardrobe::auto_fill(&closet, &palette),
                   "Capsule wardrobe")?;

    writeln!(fh, "</body>\n\
                  </html>")?;
    Ok(())
}
