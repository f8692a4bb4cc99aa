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

//! Per-frame draw batching: meshes are turned into sort keys, sorted, then
//! replayed pass by pass against a command stream.

use super::renderer::Renderer;
use super::shader_table::{depth_pso_index, SHADOW_PSO_OFFSET};
use super::sort_key::{back_to_front, front_to_back, DrawPass, SortKey, MAX_SORT_OBJECTS};
use thiserror::Error;
use vesta_core::renderer::{
    CameraView, CommandStream, DepthTarget, DepthView, DescriptorHandle, GlobalConstants,
    GpuAddress, IndexBufferView, Joint, Mesh, PrimitiveTopology, RenderError, RenderTarget,
    RendererSettings, ResourceState, RootParameter, ScissorRect, TargetId, VertexBufferView,
    Viewport,
};

/// Maximum number of color targets a sorter can bind.
pub const MAX_RENDER_TARGETS: usize = 8;

/// What a sorter renders into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchType {
    /// Scene color and depth.
    Default,
    /// A shadow map. Only depth is written.
    Shadows,
}

/// Errors raised while collecting draws.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeshSortError {
    /// Sort keys cannot reference more objects.
    #[error("Cannot sort more than {limit} objects in one batch")]
    TooManyObjects {
        /// The object limit.
        limit: usize,
    },
    /// Every color target slot is in use.
    #[error("Cannot bind more than {limit} render targets")]
    TooManyRenderTargets {
        /// The render target limit.
        limit: usize,
    },
}

#[derive(Debug, Clone, Copy)]
struct SortObject<'a> {
    mesh: &'a Mesh,
    skeleton: Option<&'a [Joint]>,
    mesh_cbv: GpuAddress,
    material_cbv: GpuAddress,
    buffer_ptr: GpuAddress,
}

impl<'a> SortObject<'a> {
    /// The joints the mesh is skinned with, or `None` for rigid meshes.
    fn joints(&self, object: usize) -> Result<Option<&'a [Joint]>, RenderError> {
        let mesh = self.mesh;
        if !mesh.is_skinned() {
            return Ok(None);
        }
        let skeleton = self
            .skeleton
            .ok_or(RenderError::MissingSkeleton { object })?;
        let start = mesh.start_joint as usize;
        let end = start + mesh.num_joints as usize;
        skeleton
            .get(start..end)
            .map(Some)
            .ok_or(RenderError::SkeletonOutOfRange {
                start: mesh.start_joint,
                count: mesh.num_joints,
                len: skeleton.len(),
            })
    }
}

/// Collects the draws of one frame and records them in pass order.
///
/// Meshes and skeletons are borrowed for the frame. Passes are replayed
/// monotonically: once a pass was recorded, later [`MeshSorter::render_meshes`]
/// calls do not record it again until [`MeshSorter::reset`].
#[derive(Debug)]
pub struct MeshSorter<'a> {
    batch_type: BatchType,
    separate_z_pass: bool,
    camera: Option<CameraView>,
    viewport: Option<Viewport>,
    scissor: Option<ScissorRect>,
    render_targets: Vec<RenderTarget>,
    depth_target: Option<DepthTarget>,

    objects: Vec<SortObject<'a>>,
    keys: Vec<SortKey>,
    pass_counts: [u32; DrawPass::COUNT],
    current_pass: usize,
    current_draw: usize,
}

impl<'a> MeshSorter<'a> {
    /// Creates an empty sorter.
    pub fn new(batch_type: BatchType, separate_z_pass: bool) -> Self {
        Self {
            batch_type,
            separate_z_pass,
            camera: None,
            viewport: None,
            scissor: None,
            render_targets: Vec::with_capacity(MAX_RENDER_TARGETS),
            depth_target: None,
            objects: Vec::new(),
            keys: Vec::new(),
            pass_counts: [0; DrawPass::COUNT],
            current_pass: 0,
            current_draw: 0,
        }
    }

    /// Creates an empty sorter using the depth prepass switch from `settings`.
    pub fn from_settings(batch_type: BatchType, settings: &RendererSettings) -> Self {
        Self::new(batch_type, settings.separate_z_pass)
    }

    /// The target kind fixed at construction.
    pub fn batch_type(&self) -> BatchType {
        self.batch_type
    }

    /// Whether opaque meshes get a depth prepass.
    pub fn separate_z_pass(&self) -> bool {
        self.separate_z_pass
    }

    /// Sets the camera whose transform fills the global constants.
    pub fn set_camera(&mut self, camera: CameraView) {
        self.camera = Some(camera);
    }

    /// Overrides the viewport. Defaults to the full depth target.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
    }

    /// Overrides the scissor rectangle.
    ///
    /// Defaults to the full depth target, or to the target inset by one texel
    /// for shadow batches.
    pub fn set_scissor(&mut self, scissor: ScissorRect) {
        self.scissor = Some(scissor);
    }

    /// Adds a color target. Without any, the scene color target is used.
    pub fn add_render_target(&mut self, target: RenderTarget) -> Result<(), MeshSortError> {
        if self.render_targets.len() >= MAX_RENDER_TARGETS {
            return Err(MeshSortError::TooManyRenderTargets {
                limit: MAX_RENDER_TARGETS,
            });
        }
        self.render_targets.push(target);
        Ok(())
    }

    /// Sets the depth target. Required before rendering.
    pub fn set_depth_stencil_target(&mut self, target: DepthTarget) {
        self.depth_target = Some(target);
    }

    /// Drops every submitted draw and rewinds to the first pass.
    ///
    /// Camera, targets, viewport and scissor are kept.
    pub fn reset(&mut self) {
        self.objects.clear();
        self.keys.clear();
        self.pass_counts = [0; DrawPass::COUNT];
        self.current_pass = 0;
        self.current_draw = 0;
    }

    /// Number of meshes that produced at least one draw.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Number of draws submitted to `pass`.
    pub fn pass_count(&self, pass: DrawPass) -> u32 {
        self.pass_counts[pass.index()]
    }

    /// The submitted keys, in sorted order once [`MeshSorter::sort`] ran.
    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    fn push_key(&mut self, pass: DrawPass, pso: u16, distance: u32, object: u16) {
        self.keys.push(SortKey::new(pass, pso, distance, object));
        self.pass_counts[pass.index()] += 1;
    }

    /// Submits a mesh.
    ///
    /// `distance` is the view depth used for ordering. `buffer_ptr` is the
    /// address the mesh's vertex and index offsets are relative to. Skinned
    /// meshes need `skeleton` when they are rendered.
    pub fn add_mesh(
        &mut self,
        mesh: &'a Mesh,
        distance: f32,
        mesh_cbv: GpuAddress,
        material_cbv: GpuAddress,
        buffer_ptr: GpuAddress,
        skeleton: Option<&'a [Joint]>,
    ) -> Result<(), MeshSortError> {
        let flags = mesh.flags;
        if self.batch_type == BatchType::Shadows && flags.is_alpha_blended() {
            log::trace!("Skipping alpha-blended mesh in shadow batch");
            return Ok(());
        }

        if self.objects.len() >= MAX_SORT_OBJECTS {
            return Err(MeshSortError::TooManyObjects {
                limit: MAX_SORT_OBJECTS,
            });
        }
        // Bounded by MAX_SORT_OBJECTS above.
        let object = self.objects.len() as u16;
        let depth_pso = u16::from(depth_pso_index(flags));
        let mesh_pso = u16::from(mesh.pso);

        match self.batch_type {
            BatchType::Shadows => self.push_key(
                DrawPass::ZPass,
                depth_pso + u16::from(SHADOW_PSO_OFFSET),
                front_to_back(distance),
                object,
            ),
            BatchType::Default if flags.is_alpha_blended() => self.push_key(
                DrawPass::Transparent,
                mesh_pso,
                back_to_front(distance),
                object,
            ),
            BatchType::Default if self.separate_z_pass || flags.is_alpha_tested() => {
                let distance = front_to_back(distance);
                self.push_key(DrawPass::ZPass, depth_pso, distance, object);
                self.push_key(DrawPass::Opaque, mesh_pso + 1, distance, object);
            }
            BatchType::Default => {
                self.push_key(DrawPass::Opaque, mesh_pso, front_to_back(distance), object)
            }
        }

        self.objects.push(SortObject {
            mesh,
            skeleton,
            mesh_cbv,
            material_cbv,
            buffer_ptr,
        });
        Ok(())
    }

    /// Orders the keys by pass, then pipeline, then distance.
    pub fn sort(&mut self) {
        self.keys.sort_unstable();
    }

    /// The key range recorded by a call rendering up to `pass`.
    fn pending_draws(&self, pass: DrawPass) -> std::ops::Range<usize> {
        let end = (self.current_pass..=pass.index())
            .map(|p| self.pass_counts[p] as usize)
            .sum::<usize>();
        self.current_draw..self.current_draw + end
    }

    fn check_targets(&self, depth: &DepthTarget) -> Result<(), RenderError> {
        for (slot, target) in self.render_targets.iter().enumerate() {
            if (target.width, target.height) != (depth.width, depth.height) {
                return Err(RenderError::TargetSizeMismatch {
                    slot,
                    color: (target.width, target.height),
                    depth: (depth.width, depth.height),
                });
            }
        }
        Ok(())
    }

    fn fill_globals(
        &self,
        camera: &CameraView,
        renderer: &Renderer,
        globals: &mut GlobalConstants,
    ) {
        let settings = renderer.settings();
        let resources = renderer.resources();
        let grid_dim = settings.light_grid_dim.max(1);
        let light_grid = renderer.light_grid();
        let [x, y, z] = camera.position;

        globals.view_proj = camera.view_proj;
        globals.camera_pos = [x, y, z, 1.0];
        globals.ibl_range = renderer.ibl_range();
        globals.ibl_bias = 0.0;
        globals.debug_flag = settings.debug_flag;
        globals.shadow_texel_size[0] = 1.0 / resources.shadow_buffer.width as f32;
        globals.inv_tile_dim[0] = 1.0 / grid_dim as f32;
        globals.inv_tile_dim[1] = 1.0 / grid_dim as f32;
        globals.tile_count[0] = resources.scene_color.width.div_ceil(grid_dim);
        globals.tile_count[1] = resources.scene_color.height.div_ceil(grid_dim);
        globals.first_light_index[0] = light_grid.first_cone_light;
        globals.first_light_index[1] = light_grid.first_cone_shadowed_light;
    }

    /// Records every pass from the current one up to and including `pass`.
    ///
    /// Requires a depth target and a camera. Fills `globals` and uploads it
    /// once per call. Nothing is recorded when a precondition fails.
    pub fn render_meshes(
        &mut self,
        pass: DrawPass,
        stream: &mut dyn CommandStream,
        renderer: &Renderer,
        globals: &mut GlobalConstants,
    ) -> Result<(), RenderError> {
        let depth = self.depth_target.ok_or(RenderError::MissingDepthTarget)?;
        let camera = self.camera.ok_or(RenderError::MissingCamera)?;
        if self.batch_type == BatchType::Default {
            self.check_targets(&depth)?;
        }
        for i in self.pending_draws(pass) {
            let key = self.keys[i];
            let object = usize::from(key.object());
            self.objects[object].joints(object)?;
            renderer.pipeline_handle(usize::from(key.pso()))?;
        }

        let resources = renderer.resources();
        stream.set_root_signature(renderer.root_signature());
        stream.set_primitive_topology(PrimitiveTopology::TriangleList);
        stream.set_descriptor_heaps(resources.texture_heap, resources.sampler_heap);
        stream.set_descriptor_table(RootParameter::CommonSrvs, resources.common_textures);

        self.fill_globals(&camera, renderer, globals);
        stream.set_dynamic_constant_buffer(RootParameter::CommonCbv, bytemuck::bytes_of(&*globals));

        let viewport = self.viewport.unwrap_or_else(|| depth.full_viewport());
        let scissor = match (self.scissor, self.batch_type) {
            (Some(scissor), _) => scissor,
            (None, BatchType::Default) => depth.full_scissor(),
            (None, BatchType::Shadows) => ScissorRect {
                left: 1,
                top: 1,
                right: depth.width.saturating_sub(2),
                bottom: depth.height.saturating_sub(2),
            },
        };

        if self.batch_type == BatchType::Shadows {
            stream.transition_resource(depth.id, ResourceState::DepthWrite, true);
            stream.clear_depth(depth.id);
            stream.set_depth_stencil_target(depth.writable());
        }

        let colors: Vec<TargetId> = if self.render_targets.is_empty() {
            vec![resources.scene_color.id]
        } else {
            self.render_targets.iter().map(|target| target.id).collect()
        };

        while self.current_pass <= pass.index() {
            let current = DrawPass::ALL[self.current_pass];
            let count = self.pass_counts[self.current_pass] as usize;
            self.current_pass += 1;
            if count == 0 {
                continue;
            }
            log::trace!("Recording {count} draws for {current:?} ({:?})", self.batch_type);

            if self.batch_type == BatchType::Default {
                let depth_view = match current {
                    DrawPass::ZPass => None,
                    DrawPass::Opaque if !self.separate_z_pass => Some(depth.writable()),
                    DrawPass::Opaque | DrawPass::Transparent => Some(depth.read_only()),
                };
                match depth_view {
                    None => {
                        stream.transition_resource(depth.id, ResourceState::DepthWrite, false);
                        stream.set_depth_stencil_target(depth.writable());
                    }
                    Some(view) => self.bind_color(stream, &colors, view),
                }
            }

            stream.set_viewport_and_scissor(viewport, scissor);
            stream.flush_resource_barriers();

            let last = self.current_draw + count;
            while self.current_draw < last {
                let key = self.keys[self.current_draw];
                self.record_draw(stream, renderer, current, key)?;
                self.current_draw += 1;
            }
        }

        if self.batch_type == BatchType::Shadows {
            stream.transition_resource(depth.id, ResourceState::PixelShaderResource, false);
        }
        Ok(())
    }

    fn bind_color(&self, stream: &mut dyn CommandStream, colors: &[TargetId], depth: DepthView) {
        let state = if depth.read_only {
            ResourceState::DepthRead
        } else {
            ResourceState::DepthWrite
        };
        stream.transition_resource(depth.target, state, false);
        for &color in colors {
            stream.transition_resource(color, ResourceState::RenderTarget, false);
        }
        stream.set_render_targets(colors, depth);
    }

    fn record_draw(
        &self,
        stream: &mut dyn CommandStream,
        renderer: &Renderer,
        pass: DrawPass,
        key: SortKey,
    ) -> Result<(), RenderError> {
        let index = usize::from(key.object());
        let object = &self.objects[index];
        let mesh = object.mesh;
        let resources = renderer.resources();

        stream.set_constant_buffer(RootParameter::MeshConstants, object.mesh_cbv);
        stream.set_constant_buffer(RootParameter::MaterialConstants, object.material_cbv);
        stream.set_descriptor_table(
            RootParameter::MaterialSrvs,
            DescriptorHandle {
                heap: resources.texture_heap,
                index: mesh.srv_table,
            },
        );
        stream.set_descriptor_table(
            RootParameter::MaterialSamplers,
            DescriptorHandle {
                heap: resources.sampler_heap,
                index: mesh.sampler_table,
            },
        );
        if let Some(joints) = object.joints(index)? {
            stream.set_dynamic_srv(RootParameter::SkinMatrices, bytemuck::cast_slice(joints));
        }
        stream.set_pipeline_state(renderer.pipeline_handle(usize::from(key.pso()))?);

        let vertices = if pass == DrawPass::ZPass {
            VertexBufferView {
                address: object.buffer_ptr + mesh.vb_depth_offset,
                size: mesh.vb_depth_size,
                stride: mesh.depth_vertex_stride(),
            }
        } else {
            VertexBufferView {
                address: object.buffer_ptr + mesh.vb_offset,
                size: mesh.vb_size,
                stride: mesh.vb_stride,
            }
        };
        stream.set_vertex_buffer(0, vertices);
        stream.set_index_buffer(IndexBufferView {
            address: object.buffer_ptr + mesh.ib_offset,
            size: mesh.ib_size,
            format: mesh.ib_format,
        });

        for draw in &mesh.draws {
            stream.draw_indexed(draw.index_count, draw.start_index, draw.base_vertex);
        }
        Ok(())
    }
}
