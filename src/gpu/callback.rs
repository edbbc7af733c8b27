//! Scene viewport rendering callback for wgpu integration with egui

use super::config::GraphicsConfig;
use super::renderer::{SceneFrame, SceneRenderer};
use eframe::wgpu;
use egui_wgpu::CallbackTrait;
use std::sync::{Arc, Mutex};

/// Renderer slot shared between the app and its paint callbacks. The
/// renderer is created on the first prepare, once a device is at hand.
pub type SharedSceneRenderer = Arc<Mutex<Option<SceneRenderer>>>;

pub fn shared_renderer() -> SharedSceneRenderer {
    Arc::new(Mutex::new(None))
}

/// Paint callback drawing one frame of the loaded scene
pub struct ViewportRenderCallback {
    renderer: SharedSceneRenderer,
    config: GraphicsConfig,
    frame: SceneFrame,
}

impl ViewportRenderCallback {
    pub fn new(renderer: SharedSceneRenderer, config: GraphicsConfig, frame: SceneFrame) -> Self {
        Self {
            renderer,
            config,
            frame,
        }
    }
}

impl CallbackTrait for ViewportRenderCallback {
    fn prepare(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        _screen_descriptor: &egui_wgpu::ScreenDescriptor,
        egui_encoder: &mut wgpu::CommandEncoder,
        _callback_resources: &mut egui_wgpu::CallbackResources,
    ) -> Vec<wgpu::CommandBuffer> {
        match self.renderer.lock() {
            Ok(mut slot) => {
                let renderer =
                    slot.get_or_insert_with(|| SceneRenderer::new(device, queue, self.config));
                renderer.prepare(device, queue, &self.frame);
                // Recorded ahead of egui's pass, so the map is ready when paint samples it
                renderer.render_shadows(egui_encoder);
            }
            Err(e) => {
                log::error!("Failed to lock scene renderer in prepare: {}", e);
            }
        }
        Vec::new()
    }

    fn paint(
        &self,
        _info: egui::PaintCallbackInfo,
        render_pass: &mut wgpu::RenderPass<'static>,
        _callback_resources: &egui_wgpu::CallbackResources,
    ) {
        match self.renderer.lock() {
            Ok(slot) => {
                if let Some(renderer) = slot.as_ref() {
                    renderer.paint(render_pass);
                }
            }
            Err(e) => {
                log::error!("Failed to lock scene renderer in paint: {}", e);
            }
        }
    }
}
