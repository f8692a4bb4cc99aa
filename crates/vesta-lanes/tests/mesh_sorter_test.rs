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

mod common;

use approx::assert_relative_eq;
use common::{
    camera, mesh, renderer, Command, MockDevice, RecordingStream, SCENE_COLOR, SCENE_DEPTH,
    SHADOW_MAP,
};
use vesta_core::renderer::*;
use vesta_lanes::render_lane::{
    back_to_front, front_to_back, BatchType, DrawPass, MeshSortError, MeshSorter, Renderer,
};

fn scene_sorter<'a>(renderer: &Renderer, separate_z_pass: bool) -> MeshSorter<'a> {
    let mut sorter = MeshSorter::new(BatchType::Default, separate_z_pass);
    sorter.set_camera(camera());
    sorter.set_depth_stencil_target(renderer.resources().scene_depth);
    sorter
}

fn shadow_sorter<'a>(renderer: &Renderer) -> MeshSorter<'a> {
    let mut sorter = MeshSorter::new(BatchType::Shadows, true);
    sorter.set_camera(camera());
    sorter.set_depth_stencil_target(renderer.resources().shadow_buffer);
    sorter
}

fn submit<'a>(sorter: &mut MeshSorter<'a>, mesh: &'a Mesh, distance: f32, cbv: u64) {
    sorter
        .add_mesh(
            mesh,
            distance,
            GpuAddress(cbv),
            GpuAddress(0x100),
            GpuAddress(0x10000),
            None,
        )
        .unwrap();
}

fn mesh_cbvs(stream: &RecordingStream) -> Vec<u64> {
    stream
        .commands
        .iter()
        .filter_map(|c| match c {
            Command::ConstantBuffer(RootParameter::MeshConstants, address) => Some(address.0),
            _ => None,
        })
        .collect()
}

#[test]
fn test_sort_is_independent_of_submission_order() {
    let device = MockDevice::default();
    let mut renderer = renderer(&device, RendererSettings::default());
    let opaque = mesh(&mut renderer, &device, PsoFlags::REQUIRED | PsoFlags::HAS_UV0, 1);
    let blended = mesh(
        &mut renderer,
        &device,
        PsoFlags::REQUIRED | PsoFlags::HAS_UV0 | PsoFlags::ALPHA_BLEND,
        1,
    );
    let cutout = mesh(
        &mut renderer,
        &device,
        PsoFlags::REQUIRED | PsoFlags::HAS_UV0 | PsoFlags::ALPHA_TEST,
        1,
    );

    let submissions = [(&opaque, 3.0), (&blended, 1.0), (&cutout, 2.0), (&opaque, 0.5)];

    let mut forward = scene_sorter(&renderer, true);
    for (mesh, distance) in submissions {
        submit(&mut forward, mesh, distance, 0);
    }
    let mut backward = scene_sorter(&renderer, true);
    for (mesh, distance) in submissions.into_iter().rev() {
        submit(&mut backward, mesh, distance, 0);
    }
    forward.sort();
    backward.sort();

    // Object indices differ with submission order; everything above them must not.
    let strip = |sorter: &MeshSorter<'_>| -> Vec<u64> {
        sorter.keys().iter().map(|key| key.0 >> 16).collect()
    };
    assert_eq!(strip(&forward), strip(&backward));
    assert!(forward.keys().windows(2).all(|w| w[0] <= w[1]));
}

/// Transitions and target bindings, in recording order.
fn target_bindings(stream: &RecordingStream) -> Vec<Command> {
    stream
        .commands
        .iter()
        .filter(|c| {
            matches!(
                c,
                Command::Transition(..) | Command::RenderTargets(..) | Command::DepthStencilTarget(_)
            )
        })
        .cloned()
        .collect()
}

#[test]
fn test_opaque_front_to_back_and_transparent_back_to_front() {
    let device = MockDevice::default();
    let mut renderer = renderer(&device, RendererSettings::default());
    let opaque = mesh(&mut renderer, &device, PsoFlags::REQUIRED | PsoFlags::HAS_UV0, 1);
    let blended = mesh(
        &mut renderer,
        &device,
        PsoFlags::REQUIRED | PsoFlags::HAS_UV0 | PsoFlags::ALPHA_BLEND,
        1,
    );

    let mut sorter = scene_sorter(&renderer, false);
    submit(&mut sorter, &opaque, 10.0, 0x10);
    submit(&mut sorter, &opaque, 5.0, 0x5);
    submit(&mut sorter, &blended, 5.0, 0x50);
    submit(&mut sorter, &blended, 10.0, 0xA0);
    sorter.sort();

    let distances: Vec<(DrawPass, u32)> = sorter
        .keys()
        .iter()
        .map(|key| (key.pass(), key.distance()))
        .collect();
    assert_eq!(
        distances,
        vec![
            (DrawPass::Opaque, front_to_back(5.0)),
            (DrawPass::Opaque, front_to_back(10.0)),
            (DrawPass::Transparent, back_to_front(10.0)),
            (DrawPass::Transparent, back_to_front(5.0)),
        ]
    );

    let mut stream = RecordingStream::default();
    let mut globals = GlobalConstants::default();
    sorter
        .render_meshes(DrawPass::Transparent, &mut stream, &renderer, &mut globals)
        .unwrap();
    assert_eq!(mesh_cbvs(&stream), vec![0x5, 0x10, 0xA0, 0x50]);
}

#[test]
fn test_separate_z_pass_doubles_opaque_entries() {
    let device = MockDevice::default();
    let mut renderer = renderer(&device, RendererSettings::default());
    let opaque = mesh(&mut renderer, &device, PsoFlags::REQUIRED | PsoFlags::HAS_UV0, 1);

    let mut with_prepass = scene_sorter(&renderer, true);
    submit(&mut with_prepass, &opaque, 1.0, 0);
    assert_eq!(with_prepass.keys().len(), 2);
    assert_eq!(with_prepass.pass_count(DrawPass::ZPass), 1);
    assert_eq!(with_prepass.pass_count(DrawPass::Opaque), 1);
    assert_eq!(with_prepass.keys()[1].pso(), u16::from(opaque.pso) + 1);

    let mut without = scene_sorter(&renderer, false);
    submit(&mut without, &opaque, 1.0, 0);
    assert_eq!(without.keys().len(), 1);
    assert_eq!(without.keys()[0].pso(), u16::from(opaque.pso));
}

#[test]
fn test_sorter_follows_settings() {
    let settings = RendererSettings::from_ron("(separate_z_pass: false)").unwrap();
    let sorter = MeshSorter::from_settings(BatchType::Default, &settings);
    assert!(!sorter.separate_z_pass());
    assert_eq!(sorter.batch_type(), BatchType::Default);
}

#[test]
fn test_alpha_blended_meshes_cast_no_shadows() {
    let device = MockDevice::default();
    let mut renderer = renderer(&device, RendererSettings::default());
    let blended = mesh(
        &mut renderer,
        &device,
        PsoFlags::REQUIRED | PsoFlags::ALPHA_BLEND,
        1,
    );

    let mut sorter = shadow_sorter(&renderer);
    submit(&mut sorter, &blended, 1.0, 0);
    assert_eq!(sorter.keys().len(), 0);
    assert_eq!(sorter.object_count(), 0);
}

#[test]
fn test_render_twice_records_no_extra_draws() {
    let device = MockDevice::default();
    let mut renderer = renderer(&device, RendererSettings::default());
    let opaque = mesh(&mut renderer, &device, PsoFlags::REQUIRED | PsoFlags::HAS_UV0, 3);

    let mut sorter = scene_sorter(&renderer, true);
    submit(&mut sorter, &opaque, 1.0, 0);
    submit(&mut sorter, &opaque, 2.0, 0);
    sorter.sort();

    let mut globals = GlobalConstants::default();
    let mut stream = RecordingStream::default();
    sorter
        .render_meshes(DrawPass::Opaque, &mut stream, &renderer, &mut globals)
        .unwrap();
    assert_eq!(stream.draw_count(), 2 * 2 * 3);

    let mut again = RecordingStream::default();
    sorter
        .render_meshes(DrawPass::Opaque, &mut again, &renderer, &mut globals)
        .unwrap();
    assert_eq!(again.draw_count(), 0);

    sorter.reset();
    submit(&mut sorter, &opaque, 1.0, 0);
    let mut after_reset = RecordingStream::default();
    sorter
        .render_meshes(DrawPass::Transparent, &mut after_reset, &renderer, &mut globals)
        .unwrap();
    assert_eq!(after_reset.draw_count(), 2 * 3);
}

#[test]
fn test_passes_are_recorded_incrementally() {
    let device = MockDevice::default();
    let mut renderer = renderer(&device, RendererSettings::default());
    let opaque = mesh(&mut renderer, &device, PsoFlags::REQUIRED | PsoFlags::HAS_UV0, 1);

    let mut sorter = scene_sorter(&renderer, true);
    submit(&mut sorter, &opaque, 1.0, 0);
    sorter.sort();

    let mut globals = GlobalConstants::default();
    let mut z = RecordingStream::default();
    sorter
        .render_meshes(DrawPass::ZPass, &mut z, &renderer, &mut globals)
        .unwrap();
    assert_eq!(z.draw_count(), 1);
    assert_eq!(z.pipelines(), vec![renderer.pipeline_handle(0).unwrap()]);
    assert!(z.commands.contains(&Command::DepthStencilTarget(
        renderer.resources().scene_depth.writable()
    )));

    let mut color = RecordingStream::default();
    sorter
        .render_meshes(DrawPass::Opaque, &mut color, &renderer, &mut globals)
        .unwrap();
    assert_eq!(color.draw_count(), 1);
    assert_eq!(
        color.pipelines(),
        vec![renderer.pipeline_handle(usize::from(opaque.pso) + 1).unwrap()]
    );
    assert!(color.commands.contains(&Command::RenderTargets(
        vec![SCENE_COLOR],
        renderer.resources().scene_depth.read_only()
    )));
}

#[test]
fn test_z_pass_binds_the_depth_vertex_stream() {
    let device = MockDevice::default();
    let mut renderer = renderer(&device, RendererSettings::default());
    let flags = PsoFlags::REQUIRED | PsoFlags::HAS_UV0 | PsoFlags::ALPHA_TEST | PsoFlags::HAS_SKIN;
    let mut skinned = mesh(&mut renderer, &device, flags, 1);
    skinned.num_joints = 2;
    skinned.start_joint = 1;
    let skeleton = [Joint::IDENTITY; 3];

    let mut sorter = scene_sorter(&renderer, false);
    sorter
        .add_mesh(
            &skinned,
            1.0,
            GpuAddress(0x10),
            GpuAddress(0x20),
            GpuAddress(0x10000),
            Some(&skeleton),
        )
        .unwrap();
    sorter.sort();

    let mut stream = RecordingStream::default();
    let mut globals = GlobalConstants::default();
    sorter
        .render_meshes(DrawPass::Opaque, &mut stream, &renderer, &mut globals)
        .unwrap();

    let views = stream.vertex_buffers();
    assert_eq!(views.len(), 2);
    assert_eq!(
        views[0],
        VertexBufferView {
            address: GpuAddress(0x10000 + 4096),
            size: 2048,
            stride: 16 + 16,
        }
    );
    assert_eq!(views[1].stride, 24);
    assert_eq!(views[1].address, GpuAddress(0x10000));

    let skin_uploads = stream
        .commands
        .iter()
        .filter(|c| **c == Command::DynamicSrv(RootParameter::SkinMatrices, 2 * 112))
        .count();
    assert_eq!(skin_uploads, 2);
}

#[test]
fn test_skinned_mesh_requires_a_skeleton() {
    let device = MockDevice::default();
    let mut renderer = renderer(&device, RendererSettings::default());
    let mut skinned = mesh(
        &mut renderer,
        &device,
        PsoFlags::REQUIRED | PsoFlags::HAS_SKIN,
        1,
    );
    skinned.num_joints = 4;

    let mut sorter = scene_sorter(&renderer, true);
    submit(&mut sorter, &skinned, 1.0, 0);

    let mut stream = RecordingStream::default();
    let mut globals = GlobalConstants::default();
    let err = sorter
        .render_meshes(DrawPass::Opaque, &mut stream, &renderer, &mut globals)
        .unwrap_err();
    assert!(matches!(err, RenderError::MissingSkeleton { object: 0 }));
    assert!(stream.commands.is_empty());

    let short = [Joint::IDENTITY; 2];
    let mut sorter = scene_sorter(&renderer, true);
    sorter
        .add_mesh(
            &skinned,
            1.0,
            GpuAddress::NULL,
            GpuAddress::NULL,
            GpuAddress::NULL,
            Some(&short),
        )
        .unwrap();
    let err = sorter
        .render_meshes(DrawPass::Opaque, &mut stream, &renderer, &mut globals)
        .unwrap_err();
    assert!(matches!(
        err,
        RenderError::SkeletonOutOfRange {
            start: 0,
            count: 4,
            len: 2
        }
    ));
}

#[test]
fn test_preconditions() {
    let device = MockDevice::default();
    let renderer = renderer(&device, RendererSettings::default());
    let mut stream = RecordingStream::default();
    let mut globals = GlobalConstants::default();

    let mut sorter = MeshSorter::new(BatchType::Default, true);
    let err = sorter
        .render_meshes(DrawPass::Opaque, &mut stream, &renderer, &mut globals)
        .unwrap_err();
    assert!(matches!(err, RenderError::MissingDepthTarget));

    sorter.set_depth_stencil_target(renderer.resources().scene_depth);
    let err = sorter
        .render_meshes(DrawPass::Opaque, &mut stream, &renderer, &mut globals)
        .unwrap_err();
    assert!(matches!(err, RenderError::MissingCamera));

    sorter.set_camera(camera());
    sorter
        .add_render_target(RenderTarget {
            id: TargetId(40),
            format: TextureFormat::Rgba8Unorm,
            width: 640,
            height: 360,
        })
        .unwrap();
    let err = sorter
        .render_meshes(DrawPass::Opaque, &mut stream, &renderer, &mut globals)
        .unwrap_err();
    assert!(matches!(
        err,
        RenderError::TargetSizeMismatch {
            slot: 0,
            color: (640, 360),
            depth: (1280, 720)
        }
    ));
    assert!(stream.commands.is_empty());
}

#[test]
fn test_global_constants() {
    let device = MockDevice::default();
    let mut renderer = renderer(&device, RendererSettings::default());
    renderer.set_ibl_textures(Some(8));
    renderer.set_ibl_bias(2.0);
    renderer.set_light_grid(LightGridInfo {
        first_cone_light: 12,
        first_cone_shadowed_light: 20,
    });

    let mut sorter = scene_sorter(&renderer, true);
    let mut stream = RecordingStream::default();
    let mut globals = GlobalConstants::default();
    sorter
        .render_meshes(DrawPass::Transparent, &mut stream, &renderer, &mut globals)
        .unwrap();

    assert_eq!(globals.camera_pos, [0.0, 2.0, -5.0, 1.0]);
    assert_relative_eq!(globals.ibl_range, 7.0);
    assert_relative_eq!(globals.ibl_bias, 0.0);
    assert_relative_eq!(globals.inv_tile_dim[0], 1.0 / 16.0);
    assert_relative_eq!(globals.inv_tile_dim[1], 1.0 / 16.0);
    assert_relative_eq!(globals.shadow_texel_size[0], 1.0 / 2048.0);
    assert_eq!(globals.tile_count[..2], [80, 45]);
    assert_eq!(globals.first_light_index[..2], [12, 20]);

    let uploaded = stream.commands.iter().find_map(|c| match c {
        Command::DynamicConstantBuffer(RootParameter::CommonCbv, bytes) => Some(bytes.clone()),
        _ => None,
    });
    assert_eq!(uploaded.as_deref(), Some(bytemuck::bytes_of(&globals)));
    assert_eq!(stream.draw_count(), 0);
}

#[test]
fn test_shadow_batch_commands() {
    let device = MockDevice::default();
    let mut renderer = renderer(&device, RendererSettings::default());
    let opaque = mesh(&mut renderer, &device, PsoFlags::REQUIRED, 1);

    let mut sorter = shadow_sorter(&renderer);
    submit(&mut sorter, &opaque, 4.0, 0);
    sorter.sort();

    let mut stream = RecordingStream::default();
    let mut globals = GlobalConstants::default();
    sorter
        .render_meshes(DrawPass::ZPass, &mut stream, &renderer, &mut globals)
        .unwrap();

    let shadow = renderer.resources().shadow_buffer;
    let position = |wanted: &Command| stream.commands.iter().position(|c| c == wanted);
    let write = position(&Command::Transition(SHADOW_MAP, ResourceState::DepthWrite, true)).unwrap();
    let clear = position(&Command::ClearDepth(SHADOW_MAP)).unwrap();
    let bind = position(&Command::DepthStencilTarget(shadow.writable())).unwrap();
    assert!(write < clear && clear < bind);

    assert!(stream.commands.contains(&Command::ViewportAndScissor(
        shadow.full_viewport(),
        ScissorRect {
            left: 1,
            top: 1,
            right: 2046,
            bottom: 2046
        }
    )));
    assert_eq!(
        stream.commands.last(),
        Some(&Command::Transition(
            SHADOW_MAP,
            ResourceState::PixelShaderResource,
            false
        ))
    );
    assert_eq!(stream.pipelines(), vec![renderer.pipeline_handle(8).unwrap()]);
    assert!(!stream
        .commands
        .iter()
        .any(|c| matches!(c, Command::RenderTargets(..))));
}

#[test]
fn test_too_many_render_targets() {
    let mut sorter = MeshSorter::new(BatchType::Default, true);
    let target = RenderTarget {
        id: TargetId(1),
        format: TextureFormat::Rgba16Float,
        width: 8,
        height: 8,
    };
    for _ in 0..8 {
        sorter.add_render_target(target).unwrap();
    }
    assert_eq!(
        sorter.add_render_target(target),
        Err(MeshSortError::TooManyRenderTargets { limit: 8 })
    );
}

#[test]
fn test_opaque_pass_writes_depth_without_prepass() {
    let device = MockDevice::default();
    let mut renderer = renderer(&device, RendererSettings::default());
    let opaque = mesh(&mut renderer, &device, PsoFlags::REQUIRED, 1);

    let mut sorter = scene_sorter(&renderer, false);
    submit(&mut sorter, &opaque, 3.0, 0x10);
    sorter.sort();

    let mut stream = RecordingStream::default();
    let mut globals = GlobalConstants::default();
    sorter
        .render_meshes(DrawPass::Opaque, &mut stream, &renderer, &mut globals)
        .unwrap();

    let depth = renderer.resources().scene_depth;
    assert_eq!(
        target_bindings(&stream),
        vec![
            Command::Transition(SCENE_DEPTH, ResourceState::DepthWrite, false),
            Command::Transition(SCENE_COLOR, ResourceState::RenderTarget, false),
            Command::RenderTargets(vec![SCENE_COLOR], depth.writable()),
        ]
    );
    assert_eq!(stream.draw_count(), 1);
}

#[test]
fn test_transparent_pass_reads_depth() {
    let device = MockDevice::default();
    let mut renderer = renderer(&device, RendererSettings::default());
    let blended = mesh(
        &mut renderer,
        &device,
        PsoFlags::REQUIRED | PsoFlags::ALPHA_BLEND,
        1,
    );

    let mut sorter = scene_sorter(&renderer, false);
    submit(&mut sorter, &blended, 3.0, 0x10);
    sorter.sort();

    let mut stream = RecordingStream::default();
    let mut globals = GlobalConstants::default();
    sorter
        .render_meshes(DrawPass::Transparent, &mut stream, &renderer, &mut globals)
        .unwrap();

    let depth = renderer.resources().scene_depth;
    assert_eq!(
        target_bindings(&stream),
        vec![
            Command::Transition(SCENE_DEPTH, ResourceState::DepthRead, false),
            Command::Transition(SCENE_COLOR, ResourceState::RenderTarget, false),
            Command::RenderTargets(vec![SCENE_COLOR], depth.read_only()),
        ]
    );
    assert_eq!(stream.draw_count(), 1);
}

#[test]
fn test_draw_skybox_commands() {
    let device = MockDevice::default();
    let mut renderer = renderer(&device, RendererSettings::default());
    renderer.set_ibl_textures(Some(8));
    renderer.set_ibl_bias(2.5);

    let view = SkyboxView {
        proj_inverse: [
            [0.5, 0.0, 0.0, 0.0],
            [0.0, 0.25, 0.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
            [0.0, 0.0, -1.0, 1.0],
        ],
        view_inverse: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        rotation: [[0.0, 0.0, 1.0], [0.0, 1.0, 0.0], [-1.0, 0.0, 0.0]],
    };
    let depth = renderer.resources().scene_depth;
    let viewport = depth.full_viewport();
    let scissor = depth.full_scissor();

    let mut stream = RecordingStream::default();
    renderer
        .draw_skybox(&mut stream, &view, viewport, scissor)
        .unwrap();

    let vs_constants = SkyboxVsConstants {
        proj_inverse: view.proj_inverse,
        view_inverse: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
        ],
        rotation: [
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-1.0, 0.0, 0.0, 0.0],
        ],
    };
    let ps_constants = SkyboxPsConstants {
        texture_level: 2.5,
        ..Default::default()
    };

    assert_eq!(
        stream.commands,
        vec![
            Command::RootSignature(renderer.root_signature()),
            Command::Pipeline(renderer.skybox_pso().finalized_handle().unwrap()),
            Command::Transition(SCENE_DEPTH, ResourceState::DepthRead, false),
            Command::Transition(SCENE_COLOR, ResourceState::RenderTarget, true),
            Command::RenderTargets(vec![SCENE_COLOR], depth.read_only()),
            Command::ViewportAndScissor(viewport, scissor),
            Command::DescriptorHeaps,
            Command::DynamicConstantBuffer(
                RootParameter::MeshConstants,
                bytemuck::bytes_of(&vs_constants).to_vec()
            ),
            Command::DynamicConstantBuffer(
                RootParameter::MaterialConstants,
                bytemuck::bytes_of(&ps_constants).to_vec()
            ),
            Command::DescriptorTable(
                RootParameter::CommonSrvs,
                renderer.resources().common_textures
            ),
            Command::Draw(3),
        ]
    );
    assert!(matches!(
        &stream.commands[7],
        Command::DynamicConstantBuffer(_, bytes) if bytes.len() == 160
    ));
    assert!(matches!(
        &stream.commands[8],
        Command::DynamicConstantBuffer(_, bytes) if bytes.len() == 16
    ));
}
