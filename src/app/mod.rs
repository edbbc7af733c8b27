//! Gallery application controller
//!
//! [`GalleryApp`] owns the viewer state, drains background load results at
//! the start of every frame, draws the panels, and applies the events the
//! panels emitted once the UI pass is done.

pub mod events;
pub mod loader;
pub mod panels;
pub mod state;

pub use events::{ControlId, EventBus, GalleryEvent};
pub use loader::{BackgroundLoader, LoadMessage, LoadedScene};
pub use state::{InfoTab, TaskLine, ViewerState};

use crate::config::GalleryConfig;
use crate::gallery::{AssetSource, DirectorySource, LoadProgress};
use crate::gpu::{self, GraphicsConfig, SharedSceneRenderer};
use crate::theme;
use eframe::wgpu;
use panels::PreviewCache;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

pub struct GalleryApp {
    config: GalleryConfig,
    state: ViewerState,
    bus: EventBus,
    loader: BackgroundLoader,
    previews: PreviewCache,
    discovery: Uuid,
    /// Latest byte count reported by an in-flight scene load
    load_progress: Option<LoadProgress>,
    renderer: SharedSceneRenderer,
    graphics: GraphicsConfig,
    selector_choice: Option<String>,
}

fn directory_source(config: &GalleryConfig) -> Arc<dyn AssetSource> {
    Arc::new(DirectorySource::new(
        config.asset_root.clone(),
        config.candidate_ids.clone(),
    ))
}

impl GalleryApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: GalleryConfig) -> Self {
        theme::apply(&cc.egui_ctx);
        let target_format = match cc.wgpu_render_state.as_ref() {
            Some(render_state) => render_state.target_format,
            None => {
                log::warn!("No wgpu render state; assuming Bgra8Unorm target");
                wgpu::TextureFormat::Bgra8Unorm
            }
        };
        Self::with_graphics(config, GraphicsConfig::for_target(target_format))
    }

    /// Starts discovery and the default scene load
    pub fn with_graphics(config: GalleryConfig, graphics: GraphicsConfig) -> Self {
        let mut loader = BackgroundLoader::new(directory_source(&config));
        let discovery = loader.discover();
        loader.load_scene(&config.default_scene);

        Self {
            state: ViewerState::new(config.page_size),
            bus: EventBus::new(&config.controls),
            selector_choice: Some(config.default_scene.clone()),
            config,
            loader,
            previews: PreviewCache::new(),
            discovery,
            load_progress: None,
            renderer: gpu::shared_renderer(),
            graphics,
        }
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn asset_root(&self) -> &PathBuf {
        &self.config.asset_root
    }

    pub fn is_loading(&self) -> bool {
        self.loader.scenes_in_flight() > 0
    }

    /// Applies finished background work in arrival order
    fn handle_messages(&mut self, ctx: &egui::Context) {
        for message in self.loader.poll() {
            match message {
                LoadMessage::Discovered { request, scenes } => {
                    if request != self.discovery {
                        log::debug!("Ignoring stale discovery {}", request);
                        continue;
                    }
                    log::info!("Discovered {} scenes", scenes.len());
                    if self.selector_choice.is_none() {
                        self.selector_choice = scenes.first().map(|scene| scene.id.clone());
                    }
                    self.state.set_scenes(scenes);
                }
                LoadMessage::Preview {
                    request,
                    scene_id,
                    result,
                } => {
                    if request != self.discovery {
                        continue;
                    }
                    match result {
                        Ok(image) => self.previews.insert(ctx, &scene_id, image),
                        Err(err) => log::warn!("No preview for scene {}: {}", scene_id, err),
                    }
                }
                LoadMessage::Progress {
                    scene_id, progress, ..
                } => {
                    log::trace!("Scene {}: {}", scene_id, progress.label());
                    self.load_progress = Some(progress);
                }
                LoadMessage::Scene {
                    request,
                    scene_id,
                    result,
                } => {
                    if !self.is_loading() {
                        self.load_progress = None;
                    }
                    match result {
                        Ok(loaded) => {
                            log::info!("Scene {} ready ({})", scene_id, request);
                            self.state
                                .install_scene(&scene_id, loaded.descriptor, loaded.model);
                        }
                        Err(err) => self.state.fail_load(&scene_id, err.to_string()),
                    }
                }
            }
        }
    }

    pub fn apply_event(&mut self, event: GalleryEvent) {
        log::debug!("Applying {:?}", event);
        match event {
            GalleryEvent::LoadScene(scene_id) => {
                self.state.carousel.select(&scene_id);
                self.selector_choice = Some(scene_id.clone());
                self.loader.load_scene(&scene_id);
            }
            GalleryEvent::PickMesh(hit) => self.state.select_mesh(hit),
            GalleryEvent::SelectInstance(instance) => {
                self.state.select_instance(&instance);
            }
            GalleryEvent::ResetView => self.state.reset_view(),
            GalleryEvent::ToggleWireframe => self.state.toggle_wireframe(),
            GalleryEvent::ShowAll => self.state.show_all(),
            GalleryEvent::PreviousPage => {
                self.state.carousel.previous();
            }
            GalleryEvent::NextPage => {
                self.state.carousel.next();
            }
            GalleryEvent::OpenGallery(path) => {
                log::info!("Switching gallery to {}", path.display());
                self.config.asset_root = path;
                self.loader.set_source(directory_source(&self.config));
                self.previews.clear();
                self.selector_choice = None;
                self.state.set_scenes(Vec::new());
                self.discovery = self.loader.discover();
            }
        }
    }

    fn handle_events(&mut self) {
        for event in self.bus.drain() {
            self.apply_event(event);
        }
    }

    fn wireframe(&self) -> bool {
        self.state
            .model
            .as_ref()
            .and_then(|model| model.meshes.first())
            .is_some_and(|mesh| mesh.material.wireframe)
    }
}

impl eframe::App for GalleryApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_messages(ctx);

        let frame_time = ctx.input(|i| i.stable_dt).clamp(0.0, 0.1);
        self.state.tick(Duration::from_secs_f32(frame_time));

        let wireframe = self.wireframe();
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            panels::toolbar::menu_bar(ui, &mut self.bus);
            panels::toolbar::controls(
                ui,
                &self.state.carousel,
                &mut self.selector_choice,
                wireframe,
                &mut self.bus,
            );
        });

        if self.bus.is_enabled(ControlId::Thumbnails) {
            egui::TopBottomPanel::bottom("thumbnails")
                .resizable(false)
                .show(ctx, |ui| {
                    panels::thumbnails::show(
                        ui,
                        &self.state.carousel,
                        &self.previews,
                        &mut self.bus,
                    );
                });
        }

        egui::SidePanel::right("info_panel")
            .default_width(theme::dimensions().info_panel_width)
            .show(ctx, |ui| {
                panels::info::show(ui, &mut self.state, &mut self.bus);
            });

        let loading = self.is_loading();
        let progress = self.load_progress.as_ref();
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                panels::viewport::show(
                    ui,
                    &mut self.state,
                    &self.renderer,
                    self.graphics,
                    &mut self.bus,
                    loading,
                    progress,
                );
            });

        self.handle_events();

        // Continuous render loop
        ctx.request_repaint();
    }
}
