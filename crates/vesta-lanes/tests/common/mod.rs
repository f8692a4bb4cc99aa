// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Mock device and recording command stream shared by the lane tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use vesta_core::renderer::*;
use vesta_lanes::render_lane::{Renderer, ShaderLibrary};

/// Hands out fresh ids for every object it is asked to create.
#[derive(Debug, Default)]
pub struct MockDevice {
    next_id: AtomicUsize,
    pub pipelines_created: AtomicUsize,
}

impl MockDevice {
    fn next(&self) -> usize {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    pub fn pipelines_created(&self) -> usize {
        self.pipelines_created.load(Ordering::Relaxed)
    }
}

impl GraphicsDevice for MockDevice {
    fn create_pipeline_layout(
        &self,
        _descriptor: &PipelineLayoutDescriptor,
    ) -> Result<PipelineLayoutId, ResourceError> {
        Ok(PipelineLayoutId(self.next()))
    }

    fn create_shader_module(
        &self,
        _descriptor: &ShaderModuleDescriptor,
    ) -> Result<ShaderModuleId, ResourceError> {
        Ok(ShaderModuleId(self.next()))
    }

    fn create_render_pipeline(
        &self,
        _descriptor: &GraphicsPipelineDesc,
    ) -> Result<RenderPipelineId, ResourceError> {
        self.pipelines_created.fetch_add(1, Ordering::Relaxed);
        Ok(RenderPipelineId(self.next()))
    }
}

/// One recorded call on a [`RecordingStream`].
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    RootSignature(PipelineLayoutId),
    Pipeline(RenderPipelineId),
    Topology(PrimitiveTopology),
    DescriptorHeaps,
    DescriptorTable(RootParameter, DescriptorHandle),
    ConstantBuffer(RootParameter, GpuAddress),
    DynamicConstantBuffer(RootParameter, Vec<u8>),
    DynamicSrv(RootParameter, usize),
    Transition(TargetId, ResourceState, bool),
    FlushBarriers,
    ClearDepth(TargetId),
    DepthStencilTarget(DepthView),
    RenderTargets(Vec<TargetId>, DepthView),
    ViewportAndScissor(Viewport, ScissorRect),
    VertexBuffer(u32, VertexBufferView),
    IndexBuffer(IndexBufferView),
    Draw(u32),
    DrawIndexed(u32, u32, i32),
}

#[derive(Debug, Default)]
pub struct RecordingStream {
    pub commands: Vec<Command>,
}

impl RecordingStream {
    pub fn draw_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, Command::DrawIndexed(..) | Command::Draw(_)))
            .count()
    }

    pub fn pipelines(&self) -> Vec<RenderPipelineId> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::Pipeline(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub fn vertex_buffers(&self) -> Vec<VertexBufferView> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::VertexBuffer(_, view) => Some(*view),
                _ => None,
            })
            .collect()
    }
}

impl CommandStream for RecordingStream {
    fn set_root_signature(&mut self, layout: PipelineLayoutId) {
        self.commands.push(Command::RootSignature(layout));
    }

    fn set_pipeline_state(&mut self, pipeline: RenderPipelineId) {
        self.commands.push(Command::Pipeline(pipeline));
    }

    fn set_primitive_topology(&mut self, topology: PrimitiveTopology) {
        self.commands.push(Command::Topology(topology));
    }

    fn set_descriptor_heaps(&mut self, _textures: DescriptorHeapId, _samplers: DescriptorHeapId) {
        self.commands.push(Command::DescriptorHeaps);
    }

    fn set_descriptor_table(&mut self, param: RootParameter, base: DescriptorHandle) {
        self.commands.push(Command::DescriptorTable(param, base));
    }

    fn set_constant_buffer(&mut self, param: RootParameter, address: GpuAddress) {
        self.commands.push(Command::ConstantBuffer(param, address));
    }

    fn set_dynamic_constant_buffer(&mut self, param: RootParameter, data: &[u8]) {
        self.commands
            .push(Command::DynamicConstantBuffer(param, data.to_vec()));
    }

    fn set_dynamic_srv(&mut self, param: RootParameter, data: &[u8]) {
        self.commands.push(Command::DynamicSrv(param, data.len()));
    }

    fn transition_resource(&mut self, target: TargetId, state: ResourceState, flush_immediate: bool) {
        self.commands
            .push(Command::Transition(target, state, flush_immediate));
    }

    fn flush_resource_barriers(&mut self) {
        self.commands.push(Command::FlushBarriers);
    }

    fn clear_depth(&mut self, target: TargetId) {
        self.commands.push(Command::ClearDepth(target));
    }

    fn set_depth_stencil_target(&mut self, depth: DepthView) {
        self.commands.push(Command::DepthStencilTarget(depth));
    }

    fn set_render_targets(&mut self, colors: &[TargetId], depth: DepthView) {
        self.commands
            .push(Command::RenderTargets(colors.to_vec(), depth));
    }

    fn set_viewport_and_scissor(&mut self, viewport: Viewport, scissor: ScissorRect) {
        self.commands
            .push(Command::ViewportAndScissor(viewport, scissor));
    }

    fn set_vertex_buffer(&mut self, slot: u32, view: VertexBufferView) {
        self.commands.push(Command::VertexBuffer(slot, view));
    }

    fn set_index_buffer(&mut self, view: IndexBufferView) {
        self.commands.push(Command::IndexBuffer(view));
    }

    fn draw(&mut self, vertex_count: u32) {
        self.commands.push(Command::Draw(vertex_count));
    }

    fn draw_indexed(&mut self, index_count: u32, start_index: u32, base_vertex: i32) {
        self.commands
            .push(Command::DrawIndexed(index_count, start_index, base_vertex));
    }
}

pub const SCENE_COLOR: TargetId = TargetId(10);
pub const SCENE_DEPTH: TargetId = TargetId(11);
pub const SHADOW_MAP: TargetId = TargetId(12);

pub fn scene_resources() -> SceneResources {
    SceneResources {
        texture_heap: DescriptorHeapId(0),
        sampler_heap: DescriptorHeapId(1),
        common_textures: DescriptorHandle {
            heap: DescriptorHeapId(0),
            index: 100,
        },
        scene_color: RenderTarget {
            id: SCENE_COLOR,
            format: TextureFormat::Rg11b10Float,
            width: 1280,
            height: 720,
        },
        scene_depth: DepthTarget {
            id: SCENE_DEPTH,
            format: TextureFormat::Depth32Float,
            width: 1280,
            height: 720,
        },
        shadow_buffer: DepthTarget {
            id: SHADOW_MAP,
            format: TextureFormat::Depth16Unorm,
            width: 2048,
            height: 2048,
        },
    }
}

pub fn renderer(device: &MockDevice, settings: RendererSettings) -> Renderer {
    let shaders = ShaderLibrary::build(device, |_| std::borrow::Cow::Borrowed(&[0u8; 4][..]))
        .expect("shader modules");
    Renderer::initialize(device, shaders, scene_resources(), settings).expect("renderer")
}

pub fn camera() -> CameraView {
    CameraView {
        view_proj: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
        position: [0.0, 2.0, -5.0],
    }
}

/// A mesh with `draws` sub-ranges, its pipeline resolved through `renderer`.
pub fn mesh(
    renderer: &mut Renderer,
    device: &MockDevice,
    flags: PsoFlags,
    draws: usize,
) -> Mesh {
    let pso = renderer.get_pso(device, flags).expect("pso");
    Mesh {
        flags,
        pso,
        vb_offset: 0,
        vb_size: 4096,
        vb_depth_offset: 4096,
        vb_depth_size: 2048,
        vb_stride: 24,
        ib_offset: 8192,
        ib_size: 1024,
        ib_format: IndexFormat::Uint16,
        srv_table: 3,
        sampler_table: 1,
        draws: (0..draws as u32)
            .map(|i| DrawRange {
                index_count: 36,
                start_index: i * 36,
                base_vertex: 0,
            })
            .collect(),
        ..Default::default()
    }
}
