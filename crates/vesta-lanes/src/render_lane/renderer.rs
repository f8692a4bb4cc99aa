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

//! The mesh renderer context: root signature, shaders and the PSO cache.

use super::pipeline_library::{GraphicsPso, PipelineLibrary};
use super::shader_table::{
    color_shaders, ShaderLibrary, ShaderProgram, DEPTH_PSO_COUNT, SHADOW_PSO_OFFSET,
};
use std::borrow::Cow;
use vesta_core::renderer::{
    AddressMode, BlendState, CommandStream, CompareFunction, DepthStencilState, DepthTarget,
    DescriptorRangeType, FilterMode, GraphicsDevice, InputElement, InputLayout, LightGridInfo,
    PipelineError, PipelineLayoutDescriptor, PipelineLayoutId, PrimitiveTopology,
    RasterizerState, RenderError, RendererSettings, ResourceState, RootParameter,
    RootParameterDescriptor, RootParameterKind, ScissorRect, SceneResources, ShaderVisibility,
    SkyboxPsConstants, SkyboxView, SkyboxVsConstants, StaticSamplerDescriptor, VertexFormat,
    Viewport,
};

/// Maximum number of cached pipelines. Indices must fit in a byte.
pub const MAX_PSOS: usize = 256;

const POSITION: InputElement = InputElement::per_vertex("POSITION", 0, VertexFormat::Float32x3, 0);
const NORMAL: InputElement =
    InputElement::per_vertex("NORMAL", 0, VertexFormat::Unorm10_10_10_2, 0);
const TANGENT: InputElement =
    InputElement::per_vertex("TANGENT", 0, VertexFormat::Unorm10_10_10_2, 0);
const UV0: InputElement = InputElement::per_vertex("TEXCOORD", 0, VertexFormat::Float16x2, 0);
const UV1: InputElement = InputElement::per_vertex("TEXCOORD", 1, VertexFormat::Float16x2, 0);
const BLEND_INDICES: InputElement =
    InputElement::per_vertex("BLENDINDICES", 0, VertexFormat::Uint16x4, 0);
const BLEND_WEIGHTS: InputElement =
    InputElement::per_vertex("BLENDWEIGHT", 0, VertexFormat::Unorm16x4, 0);

/// Builds the input layout of a color pipeline from mesh flags.
///
/// The first texture coordinate is always declared. Meshes without one read it
/// from slot 1, which is left unbound.
pub fn color_input_layout(flags: vesta_core::renderer::PsoFlags) -> InputLayout {
    use vesta_core::renderer::PsoFlags;

    let mut layout = InputLayout::new();
    layout.push(POSITION);
    layout.push(NORMAL);
    if flags.contains(PsoFlags::HAS_TANGENT) {
        layout.push(TANGENT);
    }
    if flags.contains(PsoFlags::HAS_UV0) {
        layout.push(UV0);
    } else {
        layout.push(InputElement {
            input_slot: 1,
            ..UV0
        });
    }
    if flags.contains(PsoFlags::HAS_UV1) {
        layout.push(UV1);
    }
    if flags.is_skinned() {
        layout.push(BLEND_INDICES);
        layout.push(BLEND_WEIGHTS);
    }
    layout
}

fn depth_input_layout(alpha_test: bool, skinned: bool) -> InputLayout {
    let mut layout = InputLayout::new();
    layout.push(POSITION);
    if alpha_test {
        layout.push(UV0);
    }
    if skinned {
        layout.push(BLEND_INDICES);
        layout.push(BLEND_WEIGHTS);
    }
    layout
}

fn root_signature_descriptor(max_anisotropy: u32) -> PipelineLayoutDescriptor<'static> {
    let parameter = |kind, visibility| RootParameterDescriptor { kind, visibility };
    let table = |range_type, base_register, count| RootParameterKind::DescriptorTable {
        range_type,
        base_register,
        count,
    };

    // Slot order must follow RootParameter.
    let parameters = vec![
        parameter(
            RootParameterKind::ConstantBuffer { register: 0 },
            ShaderVisibility::Vertex,
        ),
        parameter(
            RootParameterKind::ConstantBuffer { register: 0 },
            ShaderVisibility::Pixel,
        ),
        parameter(table(DescriptorRangeType::Srv, 0, 10), ShaderVisibility::Pixel),
        parameter(
            table(DescriptorRangeType::Sampler, 0, 10),
            ShaderVisibility::Pixel,
        ),
        parameter(table(DescriptorRangeType::Srv, 10, 11), ShaderVisibility::Pixel),
        parameter(
            RootParameterKind::ConstantBuffer { register: 1 },
            ShaderVisibility::All,
        ),
        parameter(
            RootParameterKind::ShaderResource { register: 20 },
            ShaderVisibility::Vertex,
        ),
    ];
    debug_assert_eq!(parameters.len(), RootParameter::ALL.len());

    let default_sampler = StaticSamplerDescriptor {
        register: 10,
        filter: FilterMode::Anisotropic,
        address_mode: AddressMode::Wrap,
        max_anisotropy,
        compare: None,
        border_color: [0.0; 4],
        visibility: ShaderVisibility::Pixel,
    };
    let static_samplers = vec![
        default_sampler,
        StaticSamplerDescriptor {
            register: 11,
            filter: FilterMode::ComparisonLinear,
            address_mode: AddressMode::Clamp,
            compare: Some(CompareFunction::GreaterEqual),
            ..default_sampler
        },
        StaticSamplerDescriptor {
            register: 12,
            ..default_sampler
        },
        StaticSamplerDescriptor {
            register: 13,
            address_mode: AddressMode::Clamp,
            ..default_sampler
        },
    ];

    PipelineLayoutDescriptor {
        label: Some(Cow::Borrowed("mesh_root_signature")),
        parameters: Cow::Owned(parameters),
        static_samplers: Cow::Owned(static_samplers),
        allow_input_layout: true,
    }
}

fn pad_rows(m: [[f32; 3]; 3]) -> [[f32; 4]; 3] {
    m.map(|[x, y, z]| [x, y, z, 0.0])
}

/// Owns every pipeline meshes are drawn with, plus the scene-wide state the
/// mesh passes read.
///
/// Pipeline indices handed out by [`Renderer::get_pso`] are stable for the
/// lifetime of the renderer.
#[derive(Debug)]
pub struct Renderer {
    settings: RendererSettings,
    resources: SceneResources,
    root_signature: PipelineLayoutId,
    shaders: ShaderLibrary,
    library: PipelineLibrary,
    psos: Vec<GraphicsPso>,
    default_pso: GraphicsPso,
    skybox_pso: GraphicsPso,
    specular_ibl_range: f32,
    specular_ibl_bias: f32,
    light_grid: LightGridInfo,
}

impl Renderer {
    /// Creates the root signature and the fixed depth, shadow and skybox pipelines.
    ///
    /// The depth table holds 16 entries indexed by
    /// `alpha_test + skinned * 2 + two_sided * 4`; entries 8 and up render into
    /// the shadow buffer with a depth bias.
    pub fn initialize(
        device: &dyn GraphicsDevice,
        shaders: ShaderLibrary,
        resources: SceneResources,
        settings: RendererSettings,
    ) -> Result<Self, RenderError> {
        let root_signature =
            device.create_pipeline_layout(&root_signature_descriptor(settings.max_anisotropy))?;

        let mut library = PipelineLibrary::new();
        let mut psos = Vec::with_capacity(MAX_PSOS);

        for index in 0..DEPTH_PSO_COUNT {
            let shadow = index >= usize::from(SHADOW_PSO_OFFSET);
            let alpha_test = index & 1 != 0;
            let skinned = index & 2 != 0;
            let two_sided = index & 4 != 0;

            let label = format!(
                "{}depth{}{}{}",
                if shadow { "shadow_" } else { "" },
                if alpha_test { "_cutout" } else { "" },
                if skinned { "_skin" } else { "" },
                if two_sided { "_two_sided" } else { "" },
            );
            let mut pso = GraphicsPso::new(label, root_signature);
            pso.set_rasterizer_state(match (shadow, two_sided) {
                (false, false) => RasterizerState::DEFAULT,
                (false, true) => RasterizerState::TWO_SIDED,
                (true, false) => RasterizerState::SHADOW,
                (true, true) => RasterizerState::SHADOW_TWO_SIDED,
            });
            pso.set_blend_state(BlendState::DISABLED);
            pso.set_depth_stencil_state(DepthStencilState::READ_WRITE);
            pso.set_primitive_topology(PrimitiveTopology::TriangleList);
            pso.set_input_layout(depth_input_layout(alpha_test, skinned));
            let depth_format = if shadow {
                resources.shadow_buffer.format
            } else {
                resources.scene_depth.format
            };
            pso.set_render_target_formats(&[], Some(depth_format));

            let vertex = match (alpha_test, skinned) {
                (false, false) => ShaderProgram::DepthOnlyVs,
                (false, true) => ShaderProgram::DepthOnlySkinVs,
                (true, false) => ShaderProgram::CutoutDepthVs,
                (true, true) => ShaderProgram::CutoutDepthSkinVs,
            };
            pso.set_vertex_shader(shaders.get(vertex));
            pso.set_pixel_shader(alpha_test.then(|| shaders.get(ShaderProgram::CutoutDepthPs)));

            pso.finalize(&mut library, device)?;
            psos.push(pso);
        }

        let mut default_pso = GraphicsPso::new("mesh_color_template", root_signature);
        default_pso.set_rasterizer_state(RasterizerState::DEFAULT);
        default_pso.set_blend_state(BlendState::DISABLED);
        default_pso.set_depth_stencil_state(DepthStencilState::READ_WRITE);
        default_pso.set_input_layout(InputLayout::new());
        default_pso.set_primitive_topology(PrimitiveTopology::TriangleList);
        default_pso.set_render_target_formats(
            &[resources.scene_color.format],
            Some(resources.scene_depth.format),
        );
        default_pso.set_vertex_shader(shaders.get(ShaderProgram::DefaultVs));
        default_pso.set_pixel_shader(Some(shaders.get(ShaderProgram::DefaultPs)));

        let mut skybox_pso = default_pso.relabeled("skybox");
        skybox_pso.set_depth_stencil_state(DepthStencilState::READ_ONLY);
        skybox_pso.set_vertex_shader(shaders.get(ShaderProgram::SkyboxVs));
        skybox_pso.set_pixel_shader(Some(shaders.get(ShaderProgram::SkyboxPs)));
        skybox_pso.finalize(&mut library, device)?;

        log::debug!(
            "Mesh renderer initialized: {} fixed pipelines, {} compiled",
            psos.len(),
            library.len()
        );

        Ok(Self {
            settings,
            resources,
            root_signature,
            shaders,
            library,
            psos,
            default_pso,
            skybox_pso,
            specular_ibl_range: 0.0,
            specular_ibl_bias: 0.0,
            light_grid: LightGridInfo::default(),
        })
    }

    /// Returns the index of the depth-read-write pipeline for meshes with `flags`.
    ///
    /// `index + 1` is the same pipeline with a depth-equal test. Pipelines are
    /// matched by compiled handle, so flag sets that produce identical state share
    /// an index.
    pub fn get_pso(
        &mut self,
        device: &dyn GraphicsDevice,
        flags: vesta_core::renderer::PsoFlags,
    ) -> Result<u8, RenderError> {
        if !flags.has_required() {
            return Err(PipelineError::MissingRequiredFlags { flags }.into());
        }

        let mut color = self.default_pso.relabeled(format!("mesh_color_{:#05x}", flags.bits()));
        color.set_input_layout(color_input_layout(flags));

        let (vertex, pixel) = color_shaders(flags);
        color.set_vertex_shader(self.shaders.get(vertex));
        color.set_pixel_shader(Some(self.shaders.get(pixel)));

        if flags.is_alpha_blended() {
            color.set_blend_state(BlendState::TRADITIONAL);
            color.set_depth_stencil_state(DepthStencilState::READ_ONLY);
        }
        if flags.is_two_sided() {
            color.set_rasterizer_state(RasterizerState::TWO_SIDED);
        }
        let handle = color.finalize(&mut self.library, device)?;

        if let Some(index) = self.psos.iter().position(|pso| pso.handle() == Some(handle)) {
            log::trace!("Flags {flags:?} reuse pipeline {index}");
            return self.to_index(index);
        }

        if self.psos.len() + 2 > MAX_PSOS {
            return Err(PipelineError::CacheExhausted { capacity: MAX_PSOS }.into());
        }

        let mut equal = color.relabeled(format!("{}_depth_equal", color.label()));
        equal.set_depth_stencil_state(DepthStencilState::TEST_EQUAL);
        let equal_handle = equal.finalize(&mut self.library, device)?;
        debug_assert!(
            self.psos.iter().all(|pso| pso.handle() != Some(equal_handle)),
            "depth-equal twin of {flags:?} collides with a cached pipeline"
        );

        let index = self.psos.len();
        self.psos.push(color);
        self.psos.push(equal);
        log::debug!("Flags {flags:?} cached as pipelines {index} and {}", index + 1);
        self.to_index(index)
    }

    fn to_index(&self, index: usize) -> Result<u8, RenderError> {
        u8::try_from(index)
            .map_err(|_| PipelineError::CacheExhausted { capacity: MAX_PSOS }.into())
    }

    /// The cached pipeline at `index`.
    pub fn pso(&self, index: usize) -> Option<&GraphicsPso> {
        self.psos.get(index)
    }

    /// The compiled handle of the pipeline at `index`.
    pub fn pipeline_handle(
        &self,
        index: usize,
    ) -> Result<vesta_core::renderer::RenderPipelineId, PipelineError> {
        self.psos
            .get(index)
            .ok_or(PipelineError::UnknownPso { index })?
            .finalized_handle()
    }

    /// Number of cached pipelines, fixed ones included.
    pub fn pso_count(&self) -> usize {
        self.psos.len()
    }

    /// The unfinalized template color pipelines start from.
    pub fn default_pso(&self) -> &GraphicsPso {
        &self.default_pso
    }

    /// The skybox pipeline.
    pub fn skybox_pso(&self) -> &GraphicsPso {
        &self.skybox_pso
    }

    /// The root signature shared by every mesh pipeline.
    pub fn root_signature(&self) -> PipelineLayoutId {
        self.root_signature
    }

    /// The scene resources the renderer was initialized with.
    pub fn resources(&self) -> &SceneResources {
        &self.resources
    }

    /// The shader modules pipelines are built from.
    pub fn shaders(&self) -> &ShaderLibrary {
        &self.shaders
    }

    /// The settings the renderer was initialized with.
    pub fn settings(&self) -> &RendererSettings {
        &self.settings
    }

    /// Records the mip count of the specular IBL cube map, or `None` when unset.
    ///
    /// The IBL bias is clamped to the new range when a map is present.
    pub fn set_ibl_textures(&mut self, specular_mip_levels: Option<u32>) {
        self.specular_ibl_range = 0.0;
        if let Some(mips) = specular_mip_levels {
            self.specular_ibl_range = (mips as f32 - 1.0).max(0.0);
            self.specular_ibl_bias = self.specular_ibl_bias.min(self.specular_ibl_range);
        }
    }

    /// Sets the specular IBL mip bias, clamped to the current range.
    pub fn set_ibl_bias(&mut self, bias: f32) {
        self.specular_ibl_bias = bias.min(self.specular_ibl_range);
    }

    /// The highest mip of the specular IBL map.
    pub fn ibl_range(&self) -> f32 {
        self.specular_ibl_range
    }

    /// The specular IBL mip bias.
    pub fn ibl_bias(&self) -> f32 {
        self.specular_ibl_bias
    }

    /// Records light-grid indices for the global constants.
    pub fn set_light_grid(&mut self, info: LightGridInfo) {
        self.light_grid = info;
    }

    /// The light-grid indices last set.
    pub fn light_grid(&self) -> LightGridInfo {
        self.light_grid
    }

    /// Draws the sky behind everything already in the scene color target.
    pub fn draw_skybox(
        &self,
        stream: &mut dyn CommandStream,
        view: &SkyboxView,
        viewport: Viewport,
        scissor: ScissorRect,
    ) -> Result<(), RenderError> {
        let vs_constants = SkyboxVsConstants {
            proj_inverse: view.proj_inverse,
            view_inverse: pad_rows(view.view_inverse),
            rotation: pad_rows(view.rotation),
        };
        let ps_constants = SkyboxPsConstants {
            texture_level: self.specular_ibl_bias,
            ..Default::default()
        };
        let depth: &DepthTarget = &self.resources.scene_depth;
        let color = self.resources.scene_color.id;

        stream.set_root_signature(self.root_signature);
        stream.set_pipeline_state(self.skybox_pso.finalized_handle()?);

        stream.transition_resource(depth.id, ResourceState::DepthRead, false);
        stream.transition_resource(color, ResourceState::RenderTarget, true);
        stream.set_render_targets(&[color], depth.read_only());
        stream.set_viewport_and_scissor(viewport, scissor);

        stream.set_descriptor_heaps(self.resources.texture_heap, self.resources.sampler_heap);
        stream.set_dynamic_constant_buffer(
            RootParameter::MeshConstants,
            bytemuck::bytes_of(&vs_constants),
        );
        stream.set_dynamic_constant_buffer(
            RootParameter::MaterialConstants,
            bytemuck::bytes_of(&ps_constants),
        );
        stream.set_descriptor_table(RootParameter::CommonSrvs, self.resources.common_textures);
        stream.draw(3);
        Ok(())
    }
}
