//! Slot indices shared by the bind group layouts and the WGSL programs.
//!
//! Programs are checked against their [`BindingLayout`] before compilation, so a slot
//! renumbered on one side only is a [`RenderError::BindingMismatch`].

use crate::error::{RenderError, Result};
use crate::utils::FrameConstants;

pub const POSITION_BUFFER_SLOT: u32 = 0;
pub const TEX_COORD_BUFFER_SLOT: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Texture,
    Sampler,
    Uniform { size: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingSlot {
    /// Name of the WGSL variable bound to this slot.
    pub name: &'static str,
    pub index: u32,
    pub kind: SlotKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingLayout {
    pub label: &'static str,
    pub group: u32,
    pub slots: &'static [BindingSlot],
}

/// One texture sampled directly by the fragment program.
pub const TEXTURED_LAYOUT: BindingLayout = BindingLayout {
    label: "textured",
    group: 0,
    slots: &[
        BindingSlot {
            name: "source_texture",
            index: 0,
            kind: SlotKind::Texture,
        },
        BindingSlot {
            name: "source_sampler",
            index: 1,
            kind: SlotKind::Sampler,
        },
    ],
};

/// The argument record: two textures, one sampler and the frame constants.
pub const ARGUMENT_LAYOUT: BindingLayout = BindingLayout {
    label: "argument_record",
    group: 0,
    slots: &[
        BindingSlot {
            name: "snapshot_texture",
            index: 0,
            kind: SlotKind::Texture,
        },
        BindingSlot {
            name: "camera_texture",
            index: 1,
            kind: SlotKind::Texture,
        },
        BindingSlot {
            name: "record_sampler",
            index: 2,
            kind: SlotKind::Sampler,
        },
        BindingSlot {
            name: "constants",
            index: 3,
            kind: SlotKind::Uniform {
                size: std::mem::size_of::<FrameConstants>() as u64,
            },
        },
    ],
};

impl BindingLayout {
    pub fn slot(&self, name: &str) -> Option<&BindingSlot> {
        self.slots.iter().find(|slot| slot.name == name)
    }

    pub fn layout_entries(&self) -> Vec<wgpu::BindGroupLayoutEntry> {
        self.slots
            .iter()
            .map(|slot| wgpu::BindGroupLayoutEntry {
                binding: slot.index,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: match slot.kind {
                    SlotKind::Texture => wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    SlotKind::Sampler => {
                        wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering)
                    }
                    SlotKind::Uniform { size } => wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(size),
                    },
                },
                count: None,
            })
            .collect()
    }

    pub fn create_bind_group_layout(&self, device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(self.label),
            entries: &self.layout_entries(),
        })
    }

    /// Orders named resources into bind group entries using this layout's indices.
    ///
    /// Every slot must receive exactly one resource.
    pub fn bind_group_entries<'a>(
        &self,
        resources: Vec<(&str, wgpu::BindingResource<'a>)>,
    ) -> Result<Vec<wgpu::BindGroupEntry<'a>>> {
        let mut entries: Vec<wgpu::BindGroupEntry<'a>> = Vec::with_capacity(self.slots.len());
        for (name, resource) in resources {
            let slot = self
                .slot(name)
                .ok_or_else(|| self.mismatch(format!("no slot named `{name}`")))?;
            if entries.iter().any(|entry| entry.binding == slot.index) {
                return Err(self.mismatch(format!("slot `{name}` bound twice")));
            }
            entries.push(wgpu::BindGroupEntry {
                binding: slot.index,
                resource,
            });
        }
        if let Some(missing) = self
            .slots
            .iter()
            .find(|slot| !entries.iter().any(|entry| entry.binding == slot.index))
        {
            return Err(self.mismatch(format!("slot `{}` left unbound", missing.name)));
        }
        entries.sort_by_key(|entry| entry.binding);
        Ok(entries)
    }

    pub fn create_bind_group(
        &self,
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        resources: Vec<(&str, wgpu::BindingResource<'_>)>,
    ) -> Result<wgpu::BindGroup> {
        let entries = self.bind_group_entries(resources)?;
        Ok(device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(self.label),
            layout,
            entries: &entries,
        }))
    }

    /// Checks that `source` declares exactly this layout's slots in its group.
    pub fn verify_wgsl(&self, source: &str) -> Result<()> {
        let declared: Vec<WgslBinding> = parse_wgsl_bindings(source)?
            .into_iter()
            .filter(|binding| binding.group == self.group)
            .collect();

        for slot in self.slots {
            let Some(binding) = declared.iter().find(|binding| binding.name == slot.name) else {
                return Err(self.mismatch(format!("shader does not declare `{}`", slot.name)));
            };
            if binding.index != slot.index {
                return Err(self.mismatch(format!(
                    "`{}` is bound at {} in the shader but {} in the layout",
                    slot.name, binding.index, slot.index
                )));
            }
            if !binding.matches_kind(slot.kind) {
                return Err(self.mismatch(format!(
                    "`{}` is declared as {:?} but the layout expects {:?}",
                    slot.name, binding.kind, slot.kind
                )));
            }
        }

        if let Some(extra) = declared
            .iter()
            .find(|binding| self.slot(&binding.name).is_none())
        {
            return Err(self.mismatch(format!(
                "shader declares `{}` at binding {} which the layout does not know",
                extra.name, extra.index
            )));
        }
        Ok(())
    }

    fn mismatch(&self, detail: String) -> RenderError {
        RenderError::BindingMismatch {
            layout: self.label,
            detail,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaredKind {
    Texture,
    Sampler,
    Uniform { size: u64 },
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WgslBinding {
    pub group: u32,
    pub index: u32,
    pub name: String,
    pub kind: DeclaredKind,
}

impl WgslBinding {
    fn matches_kind(&self, kind: SlotKind) -> bool {
        match (kind, self.kind) {
            (SlotKind::Texture, DeclaredKind::Texture) => true,
            (SlotKind::Sampler, DeclaredKind::Sampler) => true,
            (SlotKind::Uniform { size }, DeclaredKind::Uniform { size: declared }) => {
                size == declared
            }
            _ => false,
        }
    }
}

/// Every `@group @binding` variable of `source`, ordered by group then binding.
pub fn parse_wgsl_bindings(source: &str) -> Result<Vec<WgslBinding>> {
    let module = naga::front::wgsl::parse_str(source)
        .map_err(|err| RenderError::ShaderParse(err.emit_to_string(source)))?;

    let mut bindings: Vec<WgslBinding> = module
        .global_variables
        .iter()
        .filter_map(|(_, var)| {
            let binding = var.binding.as_ref()?;
            let inner = &module.types[var.ty].inner;
            let kind = match (var.space, inner) {
                (naga::AddressSpace::Handle, naga::TypeInner::Image { .. }) => {
                    DeclaredKind::Texture
                }
                (naga::AddressSpace::Handle, naga::TypeInner::Sampler { .. }) => {
                    DeclaredKind::Sampler
                }
                (naga::AddressSpace::Uniform, inner) => DeclaredKind::Uniform {
                    size: u64::from(inner.size(module.to_ctx())),
                },
                _ => DeclaredKind::Other,
            };
            Some(WgslBinding {
                group: binding.group,
                index: binding.binding,
                name: var.name.clone().unwrap_or_default(),
                kind,
            })
        })
        .collect();
    bindings.sort_by_key(|binding| (binding.group, binding.index));
    Ok(bindings)
}
