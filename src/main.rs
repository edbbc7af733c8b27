//! Scene Gallery - a 3D scene viewer with per-object metadata inspection
//!
//! Browses the scenes of an asset directory, renders the selected one in a
//! wgpu viewport, and shows each object's layout data beside it.

use anyhow::{Context, Result};
use clap::Parser;
use scene_gallery::gpu::DEPTH_BUFFER_BITS;
use scene_gallery::{GalleryApp, GalleryConfig};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "scene-gallery", version, about)]
struct Args {
    /// Directory holding <id>.json, <id>.glb and <id>.png files
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Scene ID loaded on startup
    #[arg(long)]
    scene: Option<String>,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn resolve_config(args: Args) -> Result<GalleryConfig> {
    let mut config = GalleryConfig::load(args.config.as_deref())
        .context("failed to load configuration")?;
    if let Some(assets) = args.assets {
        config.asset_root = assets;
    }
    if let Some(scene) = args.scene {
        config.default_scene = scene;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = resolve_config(Args::parse())?;
    log::info!(
        "Starting scene gallery with assets from {}",
        config.asset_root.display()
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_title("Scene Gallery"),
        renderer: eframe::Renderer::Wgpu,
        depth_buffer: DEPTH_BUFFER_BITS,
        ..Default::default()
    };

    eframe::run_native(
        "Scene Gallery",
        options,
        Box::new(move |cc| Ok(Box::new(GalleryApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {}", e))
}
