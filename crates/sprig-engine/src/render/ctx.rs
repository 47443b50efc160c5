use crate::device::{Gpu, GpuFrame};

/// Device handles plus the frame being recorded, for one presentation pass.
pub struct PresentCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub view: &'a wgpu::TextureView,
}

impl<'a> PresentCtx<'a> {
    pub fn for_frame(gpu: &'a Gpu<'_>, frame: &'a mut GpuFrame) -> Self {
        Self {
            device: gpu.device(),
            queue: gpu.queue(),
            surface_format: gpu.surface_format(),
            encoder: &mut frame.encoder,
            view: &frame.view,
        }
    }
}
