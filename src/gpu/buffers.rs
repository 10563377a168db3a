use wgpu::{Buffer, BufferUsages, Device, Queue};

use crate::config::{MAX_RINGS, WAVEFORM_CAPACITY};

/// Per-frame scene parameters (112 bytes, 16-byte aligned).
/// Field order mirrors `FrameParams` in scene.wgsl.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameParams {
    /// Seismograph panel (x, y, width, height) in pixels
    pub trace_rect: [f32; 4],
    /// Map panel (x, y, width, height) in pixels
    pub map_rect: [f32; 4],
    pub trace_color: [f32; 4],
    pub live_color: [f32; 4],
    pub marker_color: [f32; 4],
    /// Epicenter relative to the map panel origin, in pixels
    pub epicenter: [f32; 2],
    /// Screen-shake jitter applied to the whole scene
    pub shake_offset: [f32; 2],
    pub sample_count: u32,
    pub ring_count: u32,
    /// Half-height of the trace y-domain
    pub trace_domain: f32,
    pub _padding: u32,
}

/// One shockwave ring as drawn this frame (32 bytes)
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RingInstance {
    pub color: [f32; 4],
    pub radius: f32,
    pub opacity: f32,
    pub _padding: [f32; 2],
}

/// Uniform + storage buffers feeding the scene shader.
/// Storage buffers are sized for their maximum so they are never rebuilt.
pub struct SceneBuffers {
    pub frame_buffer: Buffer,
    pub samples_buffer: Buffer,
    pub rings_buffer: Buffer,
}

impl SceneBuffers {
    pub fn new(device: &Device) -> Self {
        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("frame-params-buffer"),
            size: std::mem::size_of::<FrameParams>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let samples_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("waveform-samples-buffer"),
            size: (WAVEFORM_CAPACITY * std::mem::size_of::<f32>()) as u64,
            usage: BufferUsages::STORAGE | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let rings_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("ring-instances-buffer"),
            size: (MAX_RINGS * std::mem::size_of::<RingInstance>()) as u64,
            usage: BufferUsages::STORAGE | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            frame_buffer,
            samples_buffer,
            rings_buffer,
        }
    }

    pub fn update_frame(&self, queue: &Queue, params: &FrameParams) {
        queue.write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(params));
    }

    /// Upload the trace history; returns the number of samples written
    pub fn update_samples(&self, queue: &Queue, samples: &[f32]) -> u32 {
        let count = samples.len().min(WAVEFORM_CAPACITY);
        if count > 0 {
            queue.write_buffer(&self.samples_buffer, 0, bytemuck::cast_slice(&samples[..count]));
        }
        count as u32
    }

    /// Upload live rings; returns the number of rings written
    pub fn update_rings(&self, queue: &Queue, rings: &[RingInstance]) -> u32 {
        let count = rings.len().min(MAX_RINGS);
        if count > 0 {
            queue.write_buffer(&self.rings_buffer, 0, bytemuck::cast_slice(&rings[..count]));
        }
        count as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_params_size() {
        assert_eq!(std::mem::size_of::<FrameParams>(), 112);
        assert_eq!(std::mem::size_of::<FrameParams>() % 16, 0);
    }

    #[test]
    fn test_ring_instance_size() {
        assert_eq!(std::mem::size_of::<RingInstance>(), 32);
    }

    #[test]
    fn test_ring_capacity_covers_largest_event() {
        let most = (crate::config::MAGNITUDE_MAX * crate::config::RINGS_PER_MAGNITUDE).floor() as usize;
        assert!(most <= MAX_RINGS);
    }
}
