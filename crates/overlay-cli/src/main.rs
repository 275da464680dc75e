// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `ng-inspect`: run the overlay's Neuroglancer driver against saved snapshots.
//!
//! A snapshot is a JSON document with the viewer `state`, the live
//! `navigation` state and the page `elements` (selector plus content box)
//! the driver queries.
//!
//! # Usage
//! ```text
//! ng-inspect viewports <snapshot.json>
//! ng-inspect layers <snapshot.json>
//! ng-inspect shader --color 255,0,0 --color 0,255,0
//! ng-inspect refresh <snapshot.json> --name preds --url <url> [--color r,g,b]...
//! ```

// The CLI is expected to print to stdout.
#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::Table;
use overlay_app_core::config::ConfigService;
use overlay_config_fs::FsConfigStore;
use overlay_neuroglancer::{
    predictions_shader, NeuroglancerDriver, NeuroglancerSettings, SnapshotDocument, SnapshotHost,
};
use overlay_viewer_port::{
    ColorRgb8, NativeView, RefreshViewParams, ViewerDriver, ViewportDriver,
};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Inspect saved Neuroglancer snapshots through the overlay viewer driver"
)]
struct Cli {
    /// Directory holding `neuroglancer.json` settings (defaults to the platform config dir)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,
    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,
    /// Log driver decisions to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the viewports bound for the snapshot's layout
    Viewports {
        /// Snapshot document
        snapshot: PathBuf,
    },
    /// List image layers and which one is on display
    Layers {
        /// Snapshot document
        snapshot: PathBuf,
    },
    /// Print the prediction shader for the given channel colors
    Shader {
        /// Channel color as `r,g,b` (repeatable, in channel order)
        #[arg(long = "color", value_parser = parse_color, required = true)]
        colors: Vec<ColorRgb8>,
    },
    /// Open or refresh a layer and write the resulting snapshot
    Refresh {
        /// Snapshot document
        snapshot: PathBuf,
        /// Layer name
        #[arg(long)]
        name: String,
        /// Source url
        #[arg(long)]
        url: String,
        /// Copy the shader of the open layer with this source url
        #[arg(long)]
        similar_url: Option<String>,
        /// Channel color as `r,g,b` (repeatable, in channel order)
        #[arg(long = "color", value_parser = parse_color)]
        colors: Vec<ColorRgb8>,
        /// Where to write the snapshot (defaults to overwriting the input)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn parse_color(raw: &str) -> Result<ColorRgb8, String> {
    let parts = raw
        .split(',')
        .map(|part| part.trim().parse::<u8>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| format!("invalid color {raw:?}: {err}"))?;
    <[u8; 3]>::try_from(parts).map_err(|_| format!("color {raw:?} must have three components"))
}

#[derive(Serialize)]
struct ViewportRow {
    panel: usize,
    plane: &'static str,
    left: f64,
    bottom: f64,
    width: f64,
    height: f64,
    zoom_px_per_nm: f64,
    position: [f64; 3],
    orientation: [f64; 4],
    uvw_to_world: [f64; 16],
}

#[derive(Serialize)]
struct LayerRow {
    name: String,
    url: String,
    visible: bool,
    on_display: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // `--verbose` wins, then RUST_LOG, then warnings only.
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Command::Viewports { snapshot } => {
            let driver = open_driver(snapshot, load_settings(cli.config_dir.as_deref())?)?;
            print_viewports(&driver, cli.json)
        }
        Command::Layers { snapshot } => {
            let driver = open_driver(snapshot, load_settings(cli.config_dir.as_deref())?)?;
            print_layers(&driver, cli.json)
        }
        Command::Shader { colors } => {
            println!("{}", predictions_shader(colors));
            Ok(())
        }
        Command::Refresh {
            snapshot,
            name,
            url,
            similar_url,
            colors,
            output,
        } => {
            let driver = open_driver(snapshot, load_settings(cli.config_dir.as_deref())?)?;
            let mut params = RefreshViewParams::new(NativeView::new(name.clone(), url.clone()));
            if let Some(similar) = similar_url {
                params = params.with_similar_url_hint(similar.clone());
            }
            if !colors.is_empty() {
                params = params.with_channel_colors(colors.clone());
            }
            driver.refresh_view(&params)?;

            let target = output.as_deref().unwrap_or(snapshot.as_path());
            let document = driver.host().to_document();
            fs::write(target, serde_json::to_vec_pretty(&document)?)
                .with_context(|| format!("write snapshot {}", target.display()))?;
            let source = driver
                .host()
                .layer(name)
                .and_then(|layer| layer.get("source").and_then(|s| s.as_str()).map(str::to_owned))
                .ok_or_else(|| anyhow!("layer {name:?} missing after refresh"))?;
            println!("{source}");
            Ok(())
        }
    }
}

fn load_settings(config_dir: Option<&Path>) -> Result<NeuroglancerSettings> {
    let store = match config_dir {
        Some(dir) => FsConfigStore::with_base(dir)?,
        None => FsConfigStore::new()?,
    };
    debug!(dir = %store.base().display(), "loading settings");
    NeuroglancerSettings::load(&ConfigService::new(store)).context("load neuroglancer settings")
}

fn open_driver(
    path: &Path,
    settings: NeuroglancerSettings,
) -> Result<NeuroglancerDriver<SnapshotHost>> {
    let raw = fs::read(path).with_context(|| format!("read snapshot {}", path.display()))?;
    let document: SnapshotDocument = serde_json::from_slice(&raw)
        .with_context(|| format!("parse snapshot {}", path.display()))?;
    Ok(NeuroglancerDriver::new(
        SnapshotHost::from_document(document),
        settings,
    )?)
}

fn print_viewports(driver: &NeuroglancerDriver<SnapshotHost>, json: bool) -> Result<()> {
    let viewports = driver.viewport_drivers();
    if viewports.is_empty() && !json {
        println!("viewer not ready: no viewports bound");
        return Ok(());
    }
    let mut rows = Vec::with_capacity(viewports.len());
    for viewport in &viewports {
        let geometry = viewport.geometry()?;
        let pose = viewport.camera_pose_in_uvw_space()?;
        rows.push(ViewportRow {
            panel: viewport.panel().index,
            plane: viewport.plane().as_str(),
            left: geometry.left,
            bottom: geometry.bottom,
            width: geometry.width,
            height: geometry.height,
            zoom_px_per_nm: viewport.zoom_in_pixels_per_nm()?,
            position: pose.position_uvw.to_array(),
            orientation: pose.orientation_uvw.to_array(),
            uvw_to_world: viewport.uvw_to_world_matrix().to_array(),
        });
    }
    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }
    let mut table = Table::new();
    table.set_header(vec![
        "panel", "plane", "left", "bottom", "width", "height", "zoom", "orientation",
    ]);
    for row in &rows {
        table.add_row(vec![
            row.panel.to_string(),
            row.plane.to_owned(),
            row.left.to_string(),
            row.bottom.to_string(),
            row.width.to_string(),
            row.height.to_string(),
            format!("{:.4}", row.zoom_px_per_nm),
            format!("{:.4?}", row.orientation),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn print_layers(driver: &NeuroglancerDriver<SnapshotHost>, json: bool) -> Result<()> {
    let on_display = driver.data_view_on_display()?;
    let rows: Vec<LayerRow> = driver
        .image_layers()?
        .into_iter()
        .map(|layer| LayerRow {
            on_display: on_display.as_ref() == Some(&layer.native_view()),
            name: layer.name,
            url: layer.source,
            visible: layer.visible,
        })
        .collect();
    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }
    let mut table = Table::new();
    table.set_header(vec!["name", "url", "visible", "on display"]);
    for row in &rows {
        table.add_row(vec![
            row.name.clone(),
            row.url.clone(),
            row.visible.to_string(),
            if row.on_display { "*" } else { "" }.to_owned(),
        ]);
    }
    println!("{table}");
    Ok(())
}
