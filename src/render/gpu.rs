use rustc_hash::FxHashMap;
use wgpu::util::DeviceExt;

use crate::core::vertex::Vertex;
use crate::render::backend::{MeshBackend, MeshHandle};

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
}

/// `MeshBackend` over wgpu buffers. Draws are recorded during the frame and
/// replayed into a render pass by `encode_draws`.
pub struct WgpuMeshBackend {
    device: wgpu::Device,
    meshes: FxHashMap<MeshHandle, GpuMesh>,
    next_id: u32,
    draws: Vec<(MeshHandle, u32)>,
}

impl WgpuMeshBackend {
    pub fn new(device: wgpu::Device) -> Self {
        Self {
            device,
            meshes: FxHashMap::default(),
            next_id: 0,
            draws: Vec::new(),
        }
    }

    /// Request a headless adapter and device.
    pub fn headless() -> Option<Self> {
        let instance = wgpu::Instance::default();
        let adapter =
            pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions::default()))
                .ok()?;
        let info = adapter.get_info();
        tracing::info!("Using adapter {} ({:?})", info.name, info.backend);
        let (device, _queue) =
            pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor::default())).ok()?;
        Some(Self::new(device))
    }

    pub fn live_meshes(&self) -> usize {
        self.meshes.len()
    }

    pub fn pending_draws(&self) -> usize {
        self.draws.len()
    }

    pub fn begin_frame(&mut self) {
        self.draws.clear();
    }

    /// Bind and draw every mesh recorded since `begin_frame`. The caller has
    /// already set the pipeline and bind groups.
    pub fn encode_draws(&mut self, pass: &mut wgpu::RenderPass<'_>) {
        for (handle, count) in self.draws.drain(..) {
            let Some(mesh) = self.meshes.get(&handle) else {
                continue;
            };
            pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..count, 0, 0..1);
        }
    }
}

impl MeshBackend for WgpuMeshBackend {
    fn create_mesh(&mut self, vertices: &[Vertex], indices: &[u32]) -> MeshHandle {
        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Chunk Vertex Buffer"),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Chunk Index Buffer"),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        let handle = MeshHandle(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.meshes.insert(
            handle,
            GpuMesh {
                vertex_buffer,
                index_buffer,
            },
        );
        handle
    }

    fn draw_mesh(&mut self, handle: MeshHandle, index_count: u32) {
        self.draws.push((handle, index_count));
    }

    fn destroy_mesh(&mut self, handle: MeshHandle) {
        if let Some(mesh) = self.meshes.remove(&handle) {
            mesh.vertex_buffer.destroy();
            mesh.index_buffer.destroy();
        }
    }
}
