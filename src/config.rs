//! Renderer settings, loadable from JSON.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Submissions allowed to be outstanding before `render_frame` blocks.
    /// `1` waits for every frame to finish before returning.
    pub max_frames_in_flight: usize,
    pub load_action: LoadAction,
    pub sampler: SamplerConfig,
    pub power_preference: PowerPreference,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            max_frames_in_flight: 1,
            load_action: LoadAction::Clear([0.0, 0.0, 0.0, 1.0]),
            sampler: SamplerConfig::default(),
            power_preference: PowerPreference::Default,
        }
    }
}

impl RendererConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: RendererConfig = serde_json::from_str(json)?;
        Ok(config.normalized())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    fn normalized(mut self) -> Self {
        if self.max_frames_in_flight == 0 {
            log::warn!("max_frames_in_flight of 0 is not meaningful, using 1");
            self.max_frames_in_flight = 1;
        }
        self
    }
}

/// What a shader pass does with the drawable's previous contents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadAction {
    Load,
    Clear([f64; 4]),
}

impl LoadAction {
    pub fn to_wgpu(self) -> wgpu::LoadOp<wgpu::Color> {
        match self {
            LoadAction::Load => wgpu::LoadOp::Load,
            LoadAction::Clear([r, g, b, a]) => wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    Nearest,
    Linear,
}

impl From<Filter> for wgpu::FilterMode {
    fn from(filter: Filter) -> Self {
        match filter {
            Filter::Nearest => wgpu::FilterMode::Nearest,
            Filter::Linear => wgpu::FilterMode::Linear,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressMode {
    ClampToEdge,
    Repeat,
    MirrorRepeat,
}

impl From<AddressMode> for wgpu::AddressMode {
    fn from(mode: AddressMode) -> Self {
        match mode {
            AddressMode::ClampToEdge => wgpu::AddressMode::ClampToEdge,
            AddressMode::Repeat => wgpu::AddressMode::Repeat,
            AddressMode::MirrorRepeat => wgpu::AddressMode::MirrorRepeat,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    pub mag_filter: Filter,
    pub min_filter: Filter,
    pub address_mode: AddressMode,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            mag_filter: Filter::Linear,
            min_filter: Filter::Linear,
            address_mode: AddressMode::ClampToEdge,
        }
    }
}

impl SamplerConfig {
    pub fn create_sampler(&self, device: &wgpu::Device) -> wgpu::Sampler {
        let address_mode = self.address_mode.into();
        device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("quad_sampler"),
            address_mode_u: address_mode,
            address_mode_v: address_mode,
            address_mode_w: address_mode,
            mag_filter: self.mag_filter.into(),
            min_filter: self.min_filter.into(),
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerPreference {
    Default,
    LowPower,
    HighPerformance,
}

impl From<PowerPreference> for wgpu::PowerPreference {
    fn from(preference: PowerPreference) -> Self {
        match preference {
            PowerPreference::Default => wgpu::PowerPreference::default(),
            PowerPreference::LowPower => wgpu::PowerPreference::LowPower,
            PowerPreference::HighPerformance => wgpu::PowerPreference::HighPerformance,
        }
    }
}
