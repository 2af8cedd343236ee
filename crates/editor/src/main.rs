//! Headless command-line front end for the terrain editor core.
//!
//! Covers the non-interactive workflows: generating fresh worlds,
//! inspecting saved files, exercising the sculpt tools, and migrating
//! files through a decode/encode round trip.

mod session;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glam::Vec3;
use persist::is_world_version;
use terrain_core::{SurfaceType, ToolMode};

use crate::session::EditorSession;

#[derive(Parser, Debug)]
#[command(name = "terraedit", version, about = "Headless procedural terrain editor", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a world with one terrain and save it
    New {
        /// Output world file
        out: PathBuf,
        /// Generation seed
        #[arg(short, long, default_value_t = 0)]
        seed: u64,
    },
    /// Summarize a terrain or world file
    Info {
        /// File to inspect
        file: PathBuf,
    },
    /// Generate a terrain, apply sample strokes, and save it
    SculptDemo {
        /// Output terrain file
        out: PathBuf,
        /// Generation seed
        #[arg(short, long, default_value_t = 0)]
        seed: u64,
    },
    /// Decode a terrain or world file and re-encode it
    Roundtrip {
        /// Input file
        input: PathBuf,
        /// Output file
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    match Args::parse().command {
        Command::New { out, seed } => cmd_new(&out, seed),
        Command::Info { file } => cmd_info(&file),
        Command::SculptDemo { out, seed } => cmd_sculpt_demo(&out, seed),
        Command::Roundtrip { input, out } => cmd_roundtrip(&input, &out),
    }
}

fn cmd_new(out: &Path, seed: u64) -> Result<()> {
    let mut session = EditorSession::new(seed);
    let index = session.new_terrain();
    let terrain = session.world().get(index).context("terrain vanished")?;
    println!(
        "generated terrain {} ({} vertices, {} objects)",
        terrain.id,
        terrain.geometry.vertex_count(),
        terrain.placed_objects.len()
    );
    session.save_world(out)?;
    println!("wrote {}", out.display());
    Ok(())
}

fn cmd_info(file: &Path) -> Result<()> {
    let version = sniff_version(file)?;
    let mut session = EditorSession::new(0);
    if is_world_version(&version) {
        session.load_world(file)?;
        println!("world file, version {version}");
        println!("  terrains: {}", session.world().len());
        println!("  active:   {:?}", session.world().active_index());
        for terrain in session.world().terrains() {
            print_terrain_summary(terrain);
        }
    } else {
        session.add_terrain_from_file(file)?;
        println!("terrain file, version {version}");
        if let Some(terrain) = session.world().active() {
            print_terrain_summary(terrain);
        }
    }
    Ok(())
}

fn print_terrain_summary(terrain: &terrain_core::TerrainInstance) {
    println!(
        "  {}: {}x{} segments={} offset=({:.1}, {:.1}, {:.1}) objects={}",
        terrain.id,
        terrain.config.terrain_width,
        terrain.config.terrain_depth,
        terrain.config.segments,
        terrain.offset.x,
        terrain.offset.y,
        terrain.offset.z,
        terrain.placed_objects.len()
    );
}

fn cmd_sculpt_demo(out: &Path, seed: u64) -> Result<()> {
    let mut session = EditorSession::new(seed);
    session.new_terrain();

    // A mound, a crater next to it, and a gravel patch on top.
    session.tool.current_tool_mode = ToolMode::SculptRaise;
    session.tool.brush_size = 25.0;
    session.tool.sculpt_strength = 4.0;
    session.interact(Vec3::new(-30.0, 0.0, 0.0));
    session.interact(Vec3::new(-30.0, 0.0, 0.0));

    session.tool.current_tool_mode = ToolMode::SculptLower;
    session.interact(Vec3::new(30.0, 0.0, 0.0));

    session.tool.current_tool_mode = ToolMode::Paint;
    session.tool.current_paint_type = SurfaceType::Gravel;
    session.tool.brush_size = 12.0;
    session.interact(Vec3::new(-30.0, 0.0, 0.0));

    session.save_active_terrain(out)?;
    println!("wrote sculpted terrain to {}", out.display());
    Ok(())
}

fn cmd_roundtrip(input: &Path, out: &Path) -> Result<()> {
    let version = sniff_version(input)?;
    let mut session = EditorSession::new(0);
    if is_world_version(&version) {
        session.load_world(input)?;
        session.save_world(out)?;
    } else {
        session.add_terrain_from_file(input)?;
        session.save_active_terrain(out)?;
    }
    println!("rewrote {} as {}", input.display(), out.display());
    Ok(())
}

/// Peek at a file's top-level `version` string to route it to the terrain
/// or world decoder.
fn sniff_version(file: &Path) -> Result<String> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let value: serde_json::Value =
        serde_json::from_str(&json).with_context(|| format!("{} is not JSON", file.display()))?;
    Ok(value
        .get("version")
        .and_then(serde_json::Value::as_str)
        .unwrap_or("(none)")
        .to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_new_with_seed() {
        let args = Args::try_parse_from(["terraedit", "new", "out.json", "--seed", "7"]).unwrap();
        match args.command {
            Command::New { out, seed } => {
                assert_eq!(out, PathBuf::from("out.json"));
                assert_eq!(seed, 7);
            }
            other => panic!("parsed wrong command: {other:?}"),
        }
    }

    #[test]
    fn seed_defaults_to_zero() {
        let args = Args::try_parse_from(["terraedit", "sculpt-demo", "out.json"]).unwrap();
        match args.command {
            Command::SculptDemo { seed, .. } => assert_eq!(seed, 0),
            other => panic!("parsed wrong command: {other:?}"),
        }
    }

    #[test]
    fn roundtrip_requires_both_paths() {
        assert!(Args::try_parse_from(["terraedit", "roundtrip", "only.json"]).is_err());
        assert!(Args::try_parse_from(["terraedit", "frobnicate"]).is_err());
    }
}
