//! Centralized graphics configuration for consistent eframe::wgpu settings

use eframe::wgpu;

/// Depth buffer bits requested from eframe; pipelines must agree with it
pub const DEPTH_BUFFER_BITS: u8 = 24;

/// Graphics settings shared by the viewport pipelines
#[derive(Debug, Clone, Copy)]
pub struct GraphicsConfig {
    pub sample_count: u32,
    pub texture_format: wgpu::TextureFormat,
    pub depth_format: Option<wgpu::TextureFormat>,
}

impl GraphicsConfig {
    /// Settings matching the surface eframe renders into
    pub fn for_target(texture_format: wgpu::TextureFormat) -> Self {
        Self {
            sample_count: 1, // Multisampling stays off, matching eframe defaults
            texture_format,
            depth_format: egui_wgpu::depth_format_from_bits(DEPTH_BUFFER_BITS, 0),
        }
    }

    /// Create multisample state from config
    pub fn multisample_state(&self) -> wgpu::MultisampleState {
        wgpu::MultisampleState {
            count: self.sample_count,
            mask: !0,
            alpha_to_coverage_enabled: false,
        }
    }

    /// Create color target state from config
    pub fn color_target_state(&self) -> wgpu::ColorTargetState {
        wgpu::ColorTargetState {
            format: self.texture_format,
            blend: Some(wgpu::BlendState::ALPHA_BLENDING),
            write_mask: wgpu::ColorWrites::ALL,
        }
    }

    /// Depth-tested, depth-writing state, or none when eframe has no depth buffer
    pub fn depth_stencil_state(&self) -> Option<wgpu::DepthStencilState> {
        self.depth_format.map(|format| wgpu::DepthStencilState {
            format,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_format_follows_bits() {
        let config = GraphicsConfig::for_target(wgpu::TextureFormat::Bgra8Unorm);
        assert_eq!(config.depth_format, Some(wgpu::TextureFormat::Depth24Plus));
        assert!(config.depth_stencil_state().is_some());
        assert_eq!(config.multisample_state().count, 1);
    }
}
