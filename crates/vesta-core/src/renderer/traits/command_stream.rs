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

use crate::renderer::api::*;

/// A trait for an object that records a sequence of graphics commands.
///
/// Every method records immediately; nothing is validated or reordered. Resource
/// transitions may be batched by the implementation until
/// [`CommandStream::flush_resource_barriers`] is called or a transition is
/// recorded with `flush_immediate` set.
pub trait CommandStream {
    /// Binds the pipeline layout that subsequent root parameters refer to.
    fn set_root_signature(&mut self, layout: PipelineLayoutId);

    /// Binds a compiled pipeline.
    fn set_pipeline_state(&mut self, pipeline: RenderPipelineId);

    /// Sets the primitive topology of subsequent draws.
    fn set_primitive_topology(&mut self, topology: PrimitiveTopology);

    /// Binds the shader-visible texture and sampler heaps.
    fn set_descriptor_heaps(&mut self, textures: DescriptorHeapId, samplers: DescriptorHeapId);

    /// Binds a descriptor table to `param`.
    fn set_descriptor_table(&mut self, param: RootParameter, base: DescriptorHandle);

    /// Binds a root constant buffer by address.
    fn set_constant_buffer(&mut self, param: RootParameter, address: GpuAddress);

    /// Uploads `data` to transient memory and binds it as a constant buffer.
    fn set_dynamic_constant_buffer(&mut self, param: RootParameter, data: &[u8]);

    /// Uploads `data` to transient memory and binds it as a shader resource.
    fn set_dynamic_srv(&mut self, param: RootParameter, data: &[u8]);

    /// Records a state transition for `target`.
    fn transition_resource(&mut self, target: TargetId, state: ResourceState, flush_immediate: bool);

    /// Submits any batched transitions.
    fn flush_resource_barriers(&mut self);

    /// Clears a depth target to its clear value.
    fn clear_depth(&mut self, target: TargetId);

    /// Binds a depth target with no color targets.
    fn set_depth_stencil_target(&mut self, depth: DepthView);

    /// Binds color targets together with a depth target.
    fn set_render_targets(&mut self, colors: &[TargetId], depth: DepthView);

    /// Sets the viewport and scissor rectangle.
    fn set_viewport_and_scissor(&mut self, viewport: Viewport, scissor: ScissorRect);

    /// Binds a vertex buffer to `slot`.
    fn set_vertex_buffer(&mut self, slot: u32, view: VertexBufferView);

    /// Binds the index buffer.
    fn set_index_buffer(&mut self, view: IndexBufferView);

    /// Records a non-indexed draw of `vertex_count` vertices.
    fn draw(&mut self, vertex_count: u32);

    /// Records an indexed draw.
    fn draw_indexed(&mut self, index_count: u32, start_index: u32, base_vertex: i32);
}
