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

//! Fixed-function state blocks and the presets the mesh renderer combines.
//!
//! Depth is reversed (1.0 at the near plane), so the read-write and read-only
//! presets compare with [`CompareFunction::GreaterEqual`].

use super::enums::*;
use crate::vesta_bitflags;
use std::hash::{Hash, Hasher};

/// Describes depth biasing, used to keep shadow casters from self-shadowing.
///
/// Floats are compared and hashed by bit pattern so the state can take part in
/// structural pipeline identity.
#[derive(Debug, Clone, Copy, Default)]
pub struct DepthBiasState {
    /// A constant value added to the depth of each fragment.
    pub constant: i32,
    /// A factor that scales with the fragment's depth slope.
    pub slope_scale: f32,
    /// The maximum bias that can be applied.
    pub clamp: f32,
}

impl PartialEq for DepthBiasState {
    fn eq(&self, other: &Self) -> bool {
        self.constant == other.constant
            && self.slope_scale.to_bits() == other.slope_scale.to_bits()
            && self.clamp.to_bits() == other.clamp.to_bits()
    }
}

impl Eq for DepthBiasState {}

impl Hash for DepthBiasState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.constant.hash(state);
        self.slope_scale.to_bits().hash(state);
        self.clamp.to_bits().hash(state);
    }
}

/// Describes rasterization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RasterizerState {
    /// Solid or wireframe fill.
    pub fill_mode: FillMode,
    /// The face culling mode.
    pub cull_mode: CullMode,
    /// The winding order of front faces.
    pub front_face: FrontFace,
    /// Depth bias applied to every fragment.
    pub depth_bias: DepthBiasState,
    /// If `false`, fragments outside the depth range are not clipped.
    pub depth_clip: bool,
}

impl RasterizerState {
    /// Solid fill, back-face culling, counter-clockwise front faces.
    pub const DEFAULT: Self = Self {
        fill_mode: FillMode::Solid,
        cull_mode: CullMode::Back,
        front_face: FrontFace::Ccw,
        depth_bias: DepthBiasState {
            constant: 0,
            slope_scale: 0.0,
            clamp: 0.0,
        },
        depth_clip: true,
    };

    /// [`RasterizerState::DEFAULT`] without culling.
    pub const TWO_SIDED: Self = Self {
        cull_mode: CullMode::None,
        ..Self::DEFAULT
    };

    /// [`RasterizerState::DEFAULT`] with the depth bias used when rendering shadow maps.
    pub const SHADOW: Self = Self {
        depth_bias: DepthBiasState {
            constant: -100,
            slope_scale: -1.5,
            clamp: 0.0,
        },
        ..Self::DEFAULT
    };

    /// [`RasterizerState::SHADOW`] without culling.
    pub const SHADOW_TWO_SIDED: Self = Self {
        cull_mode: CullMode::None,
        ..Self::SHADOW
    };
}

impl Default for RasterizerState {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Describes a complete blend equation for a single color component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlendComponentDescriptor {
    /// The blend factor for the source color (from the pixel shader).
    pub src_factor: BlendFactor,
    /// The blend factor for the destination color (already in the target).
    pub dst_factor: BlendFactor,
    /// The operation combining the two.
    pub operation: BlendOperation,
}

vesta_bitflags! {
    /// A bitmask to enable or disable writes to individual color channels.
    pub struct ColorWrites: u8 {
        /// Enable writes to the Red channel.
        const R = 0b0001;
        /// Enable writes to the Green channel.
        const G = 0b0010;
        /// Enable writes to the Blue channel.
        const B = 0b0100;
        /// Enable writes to the Alpha channel.
        const A = 0b1000;
        /// Enable writes to all channels.
        const ALL = 0b1111;
    }
}

/// Describes blending for the color targets of a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlendState {
    /// Color and alpha equations. `None` disables blending.
    pub blend: Option<(BlendComponentDescriptor, BlendComponentDescriptor)>,
    /// Which channels are written.
    pub write_mask: ColorWrites,
    /// If `true`, the pixel alpha drives MSAA coverage.
    pub alpha_to_coverage: bool,
}

impl BlendState {
    /// Blending off, all channels written.
    pub const DISABLED: Self = Self {
        blend: None,
        write_mask: ColorWrites::ALL,
        alpha_to_coverage: false,
    };

    /// Straight-alpha "over" blending: `src * a + dst * (1 - a)`.
    pub const TRADITIONAL: Self = Self {
        blend: Some((
            BlendComponentDescriptor {
                src_factor: BlendFactor::SrcAlpha,
                dst_factor: BlendFactor::OneMinusSrcAlpha,
                operation: BlendOperation::Add,
            },
            BlendComponentDescriptor {
                src_factor: BlendFactor::One,
                dst_factor: BlendFactor::OneMinusSrcAlpha,
                operation: BlendOperation::Add,
            },
        )),
        write_mask: ColorWrites::ALL,
        alpha_to_coverage: false,
    };

    /// Returns `true` if blending is enabled.
    pub const fn is_enabled(&self) -> bool {
        self.blend.is_some()
    }
}

impl Default for BlendState {
    fn default() -> Self {
        Self::DISABLED
    }
}

/// Describes depth testing. Stencil is unused by the mesh renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DepthStencilState {
    /// If `false`, depth testing and writing are both off.
    pub depth_test_enabled: bool,
    /// If `true`, passing fragments write their depth.
    pub depth_write_enabled: bool,
    /// The comparison function used for the depth test.
    pub depth_compare: CompareFunction,
}

impl DepthStencilState {
    /// Depth testing and writing disabled.
    pub const DISABLED: Self = Self {
        depth_test_enabled: false,
        depth_write_enabled: false,
        depth_compare: CompareFunction::Always,
    };

    /// Test and write, nearer fragments win.
    pub const READ_WRITE: Self = Self {
        depth_test_enabled: true,
        depth_write_enabled: true,
        depth_compare: CompareFunction::GreaterEqual,
    };

    /// Test without writing.
    pub const READ_ONLY: Self = Self {
        depth_test_enabled: true,
        depth_write_enabled: false,
        depth_compare: CompareFunction::GreaterEqual,
    };

    /// Only fragments exactly matching the depth laid down by a prepass survive.
    pub const TEST_EQUAL: Self = Self {
        depth_test_enabled: true,
        depth_write_enabled: false,
        depth_compare: CompareFunction::Equal,
    };
}

impl Default for DepthStencilState {
    fn default() -> Self {
        Self::READ_WRITE
    }
}
