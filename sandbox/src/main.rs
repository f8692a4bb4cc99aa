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

// Vesta Sandbox
// Records one frame (shadows, depth prepass, opaque, sky, transparent)
// against a backend that only logs what it is asked to do.

use std::borrow::Cow;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result};
use vesta_core::renderer::*;
use vesta_lanes::render_lane::{BatchType, DrawPass, MeshSorter, Renderer, ShaderLibrary};

#[derive(Debug, Default)]
struct LoggingDevice {
    next_id: AtomicUsize,
}

impl LoggingDevice {
    fn next(&self) -> usize {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

impl GraphicsDevice for LoggingDevice {
    fn create_pipeline_layout(
        &self,
        descriptor: &PipelineLayoutDescriptor,
    ) -> Result<PipelineLayoutId, ResourceError> {
        let id = PipelineLayoutId(self.next());
        log::info!(
            " -> Root signature {:?}: {} parameters, {} static samplers",
            descriptor.label,
            descriptor.parameters.len(),
            descriptor.static_samplers.len()
        );
        Ok(id)
    }

    fn create_shader_module(
        &self,
        descriptor: &ShaderModuleDescriptor,
    ) -> Result<ShaderModuleId, ResourceError> {
        log::debug!(" -> Shader {:?} ({:?})", descriptor.label, descriptor.stage);
        Ok(ShaderModuleId(self.next()))
    }

    fn create_render_pipeline(
        &self,
        descriptor: &GraphicsPipelineDesc,
    ) -> Result<RenderPipelineId, ResourceError> {
        let id = RenderPipelineId(self.next());
        log::debug!(
            " -> Pipeline {:?}: {} inputs, {} color targets, depth {:?}",
            id,
            descriptor.input_layout.elements().len(),
            descriptor.color_formats.len(),
            descriptor.depth_stencil.depth_compare
        );
        Ok(id)
    }
}

#[derive(Debug, Default)]
struct LoggingStream {
    commands: usize,
    draws: usize,
}

impl LoggingStream {
    fn record(&mut self, what: std::fmt::Arguments<'_>) {
        self.commands += 1;
        log::trace!("{what}");
    }
}

impl CommandStream for LoggingStream {
    fn set_root_signature(&mut self, layout: PipelineLayoutId) {
        self.record(format_args!("SetRootSignature {layout:?}"));
    }

    fn set_pipeline_state(&mut self, pipeline: RenderPipelineId) {
        self.record(format_args!("SetPipelineState {pipeline:?}"));
    }

    fn set_primitive_topology(&mut self, topology: PrimitiveTopology) {
        self.record(format_args!("SetPrimitiveTopology {topology:?}"));
    }

    fn set_descriptor_heaps(&mut self, textures: DescriptorHeapId, samplers: DescriptorHeapId) {
        self.record(format_args!("SetDescriptorHeaps {textures:?} {samplers:?}"));
    }

    fn set_descriptor_table(&mut self, param: RootParameter, base: DescriptorHandle) {
        self.record(format_args!("SetDescriptorTable {param:?} {base:?}"));
    }

    fn set_constant_buffer(&mut self, param: RootParameter, address: GpuAddress) {
        self.record(format_args!("SetConstantBuffer {param:?} {address:?}"));
    }

    fn set_dynamic_constant_buffer(&mut self, param: RootParameter, data: &[u8]) {
        self.record(format_args!("SetDynamicConstantBuffer {param:?} {} bytes", data.len()));
    }

    fn set_dynamic_srv(&mut self, param: RootParameter, data: &[u8]) {
        self.record(format_args!("SetDynamicSrv {param:?} {} bytes", data.len()));
    }

    fn transition_resource(&mut self, target: TargetId, state: ResourceState, flush_immediate: bool) {
        self.record(format_args!(
            "TransitionResource {target:?} -> {state:?} (flush: {flush_immediate})"
        ));
    }

    fn flush_resource_barriers(&mut self) {
        self.record(format_args!("FlushResourceBarriers"));
    }

    fn clear_depth(&mut self, target: TargetId) {
        self.record(format_args!("ClearDepth {target:?}"));
    }

    fn set_depth_stencil_target(&mut self, depth: DepthView) {
        self.record(format_args!("SetDepthStencilTarget {depth:?}"));
    }

    fn set_render_targets(&mut self, colors: &[TargetId], depth: DepthView) {
        self.record(format_args!("SetRenderTargets {colors:?} {depth:?}"));
    }

    fn set_viewport_and_scissor(&mut self, viewport: Viewport, scissor: ScissorRect) {
        self.record(format_args!("SetViewportAndScissor {viewport:?} {scissor:?}"));
    }

    fn set_vertex_buffer(&mut self, slot: u32, view: VertexBufferView) {
        self.record(format_args!("SetVertexBuffer {slot} {view:?}"));
    }

    fn set_index_buffer(&mut self, view: IndexBufferView) {
        self.record(format_args!("SetIndexBuffer {view:?}"));
    }

    fn draw(&mut self, vertex_count: u32) {
        self.draws += 1;
        self.record(format_args!("Draw {vertex_count}"));
    }

    fn draw_indexed(&mut self, index_count: u32, start_index: u32, base_vertex: i32) {
        self.draws += 1;
        self.record(format_args!(
            "DrawIndexed {index_count} {start_index} {base_vertex}"
        ));
    }
}

fn scene_resources() -> SceneResources {
    SceneResources {
        texture_heap: DescriptorHeapId(0),
        sampler_heap: DescriptorHeapId(1),
        common_textures: DescriptorHandle {
            heap: DescriptorHeapId(0),
            index: 0,
        },
        scene_color: RenderTarget {
            id: TargetId(0),
            format: TextureFormat::Rg11b10Float,
            width: 1920,
            height: 1080,
        },
        scene_depth: DepthTarget {
            id: TargetId(1),
            format: TextureFormat::Depth32Float,
            width: 1920,
            height: 1080,
        },
        shadow_buffer: DepthTarget {
            id: TargetId(2),
            format: TextureFormat::Depth16Unorm,
            width: 2048,
            height: 2048,
        },
    }
}

fn load_settings() -> Result<RendererSettings> {
    match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read renderer settings from '{path}'"))?;
            let settings = RendererSettings::from_ron(&text)
                .with_context(|| format!("Invalid renderer settings in '{path}'"))?;
            log::info!("Loaded renderer settings from '{path}'");
            Ok(settings)
        }
        None => Ok(RendererSettings::default()),
    }
}

fn mesh(renderer: &mut Renderer, device: &LoggingDevice, flags: PsoFlags, index: u32) -> Result<Mesh> {
    let pso = renderer
        .get_pso(device, flags)
        .with_context(|| format!("No pipeline for {flags:?}"))?;
    let skinned = flags.is_skinned();
    Ok(Mesh {
        flags,
        pso,
        vb_offset: 0,
        vb_size: 24 * 1024,
        vb_depth_offset: 24 * 1024,
        vb_depth_size: 12 * 1024,
        vb_stride: if skinned { 40 } else { 24 },
        ib_offset: 36 * 1024,
        ib_size: 6 * 1024,
        ib_format: IndexFormat::Uint16,
        srv_table: index * 10,
        sampler_table: index * 10,
        num_joints: if skinned { 4 } else { 0 },
        start_joint: 0,
        draws: vec![DrawRange {
            index_count: 3 * 1024,
            start_index: 0,
            base_vertex: 0,
        }],
    })
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let settings = load_settings()?;
    let device = LoggingDevice::default();
    let shaders = ShaderLibrary::build(&device, |_| Cow::Borrowed(&[][..]))?;
    let mut renderer = Renderer::initialize(&device, shaders, scene_resources(), settings.clone())?;
    renderer.set_ibl_textures(Some(10));
    renderer.set_ibl_bias(2.0);

    let base = PsoFlags::REQUIRED | PsoFlags::HAS_UV0 | PsoFlags::HAS_TANGENT;
    let meshes = [
        mesh(&mut renderer, &device, base, 0)?,
        mesh(&mut renderer, &device, base | PsoFlags::ALPHA_TEST | PsoFlags::TWO_SIDED, 1)?,
        mesh(&mut renderer, &device, base | PsoFlags::ALPHA_BLEND, 2)?,
        mesh(&mut renderer, &device, base | PsoFlags::HAS_SKIN, 3)?,
    ];
    let skeleton = [Joint::IDENTITY; 4];
    log::info!("{} pipelines cached", renderer.pso_count());

    let camera = CameraView {
        view_proj: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
        position: [0.0, 1.5, -4.0],
    };

    let resources = *renderer.resources();
    let mut shadows = MeshSorter::new(BatchType::Shadows, true);
    shadows.set_camera(camera);
    shadows.set_depth_stencil_target(resources.shadow_buffer);

    let mut scene = MeshSorter::from_settings(BatchType::Default, &settings);
    scene.set_camera(camera);
    scene.set_depth_stencil_target(resources.scene_depth);

    for (i, mesh) in meshes.iter().enumerate() {
        let distance = 2.0 + i as f32 * 3.0;
        let mesh_cbv = GpuAddress(0x1000_0000 + i as u64 * 256);
        let material_cbv = GpuAddress(0x2000_0000 + i as u64 * 256);
        let buffer = GpuAddress(0x4000_0000);
        let joints = mesh.is_skinned().then_some(&skeleton[..]);

        shadows.add_mesh(mesh, distance, mesh_cbv, material_cbv, buffer, joints)?;
        scene.add_mesh(mesh, distance, mesh_cbv, material_cbv, buffer, joints)?;
    }
    shadows.sort();
    scene.sort();

    let mut stream = LoggingStream::default();
    let mut globals = GlobalConstants::default();

    shadows.render_meshes(DrawPass::ZPass, &mut stream, &renderer, &mut globals)?;
    scene.render_meshes(DrawPass::Opaque, &mut stream, &renderer, &mut globals)?;
    renderer.draw_skybox(
        &mut stream,
        &SkyboxView::default(),
        resources.scene_depth.full_viewport(),
        resources.scene_depth.full_scissor(),
    )?;
    scene.render_meshes(DrawPass::Transparent, &mut stream, &renderer, &mut globals)?;

    log::info!(
        "Frame recorded: {} commands, {} draws ({} shadow casters, {} scene objects)",
        stream.commands,
        stream.draws,
        shadows.object_count(),
        scene.object_count()
    );
    Ok(())
}
