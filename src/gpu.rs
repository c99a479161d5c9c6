use pollster::block_on;

use crate::config::PowerPreference;
use crate::error::{RenderError, Result};

/// The device and its single long-lived queue.
pub struct GpuContext {
    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl GpuContext {
    pub fn headless(power_preference: PowerPreference) -> Result<Self> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
        Self::with_instance(instance, None, power_preference)
    }

    pub fn for_surface(
        instance: wgpu::Instance,
        surface: &wgpu::Surface<'_>,
        power_preference: PowerPreference,
    ) -> Result<Self> {
        Self::with_instance(instance, Some(surface), power_preference)
    }

    fn with_instance(
        instance: wgpu::Instance,
        compatible_surface: Option<&wgpu::Surface<'_>>,
        power_preference: PowerPreference,
    ) -> Result<Self> {
        let adapter = block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: power_preference.into(),
            force_fallback_adapter: false,
            compatible_surface,
        }))
        .ok_or(RenderError::NoAdapter)?;

        let info = adapter.get_info();
        log::info!("using adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("quadblit device"),
                required_features: wgpu::Features::empty(),
                // Use the adapter's resolution limits so drawables as large as the swapchain fit.
                required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: Default::default(),
            },
            None,
        ))?;

        Ok(Self {
            instance,
            adapter,
            device,
            queue,
        })
    }

    /// Runs `f` inside a validation error scope and turns any captured error into
    /// [`RenderError::Validation`].
    pub fn validated<T>(&self, f: impl FnOnce(&wgpu::Device) -> T) -> Result<T> {
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let value = f(&self.device);
        match block_on(self.device.pop_error_scope()) {
            Some(err) => Err(RenderError::Validation(err.to_string())),
            None => Ok(value),
        }
    }
}
