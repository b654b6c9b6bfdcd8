// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Furnish every room of a floor plan and write the resulting layout as JSON.
//!
//! Configuration comes from `FURNISH_*` environment variables; command line
//! flags override them.

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use floorplan_furnish::{
    load_legacy_scene, load_scene_json, populate_scene, CatalogPolicy, LayoutConfig, SnapMode,
};
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "furnish-rooms")]
#[command(about = "Place catalog furniture into rooms extracted from a floor plan")]
#[command(version)]
#[command(group(ArgGroup::new("input").required(true).args(["scene", "legacy_dir"])))]
struct Cli {
    /// Scene JSON (rooms, obstacles and catalog)
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Directory with rooms.txt, objects.txt, rooms_info.txt and object_boundbox.txt
    #[arg(long)]
    legacy_dir: Option<PathBuf>,

    /// Room type policy JSON; built-in table if omitted
    #[arg(long)]
    policy: Option<PathBuf>,

    /// Base random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Search budget per item in seconds
    #[arg(long)]
    timeout_secs: Option<f64>,

    /// Cap on validated candidates per item
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Wall snapping: cardinal or normal
    #[arg(long)]
    snap_mode: Option<SnapMode>,

    /// Furnish rooms one after another instead of in parallel
    #[arg(long)]
    sequential: bool,

    /// Output file for the layout (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl Cli {
    fn layout_config(&self) -> LayoutConfig {
        let mut config = LayoutConfig::from_env();
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(timeout) = self.timeout_secs {
            config.timeout_secs = timeout;
        }
        if let Some(max) = self.max_attempts {
            config.max_attempts = Some(max);
        }
        if let Some(mode) = self.snap_mode {
            config.snap_mode = mode;
        }
        if self.sequential {
            config.parallel = false;
        }
        config
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,floorplan_furnish=debug".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.layout_config();

    let scene = match (&cli.scene, &cli.legacy_dir) {
        (Some(path), _) => load_scene_json(path)
            .with_context(|| format!("Failed to load scene {}", path.display()))?,
        (None, Some(dir)) => load_legacy_scene(dir)
            .with_context(|| format!("Failed to load plan directory {}", dir.display()))?,
        (None, None) => anyhow::bail!("either --scene or --legacy-dir is required"),
    };

    let policy = match &cli.policy {
        Some(path) => CatalogPolicy::from_json_file(path)
            .with_context(|| format!("Failed to load policy {}", path.display()))?,
        None => CatalogPolicy::default(),
    };

    tracing::info!(
        rooms = scene.rooms.len(),
        variants = scene.catalog.len(),
        timeout_secs = config.timeout_secs,
        snap_mode = %config.snap_mode,
        seed = ?config.seed,
        parallel = config.parallel,
        "Starting layout"
    );

    let start = Instant::now();
    let layout = populate_scene(&scene, &policy, &config);
    tracing::info!(
        placed = layout.placed_count(),
        rejected = layout.rejected.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Layout finished"
    );

    let json = serde_json::to_string_pretty(&layout).context("Failed to serialize layout")?;
    match &cli.output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}").context("Failed to write layout to stdout")?;
        }
    }
    Ok(())
}
