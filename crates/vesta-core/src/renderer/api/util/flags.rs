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

//! Per-mesh feature flags.

use crate::vesta_bitflags;

vesta_bitflags! {
    /// Describes which vertex attributes a mesh carries and how its material behaves.
    ///
    /// The bit assignments are written by the asset pipeline and must not change.
    /// They drive both shader selection and input-layout construction.
    pub struct PsoFlags: u16 {
        /// Vertex positions are present. Required.
        const HAS_POSITION = 0x001;
        /// Vertex normals are present. Required.
        const HAS_NORMAL = 0x002;
        /// Vertex tangents are present.
        const HAS_TANGENT = 0x004;
        /// A first texture coordinate channel is present.
        const HAS_UV0 = 0x008;
        /// A second texture coordinate channel is present.
        const HAS_UV1 = 0x010;
        /// The material is alpha blended and drawn in the transparent pass.
        const ALPHA_BLEND = 0x020;
        /// The material discards fragments below an alpha cutoff.
        const ALPHA_TEST = 0x040;
        /// The material is rendered without back-face culling.
        const TWO_SIDED = 0x080;
        /// Joint indices and weights are present.
        const HAS_SKIN = 0x100;
    }
}

impl PsoFlags {
    /// Flags every mesh must carry.
    pub const REQUIRED: Self = Self::from_bits_retain(0x003);

    /// Returns `true` if both position and normal are present.
    pub const fn has_required(&self) -> bool {
        self.contains(Self::REQUIRED)
    }

    /// Shorthand for [`PsoFlags::ALPHA_BLEND`].
    pub const fn is_alpha_blended(&self) -> bool {
        self.contains(Self::ALPHA_BLEND)
    }

    /// Shorthand for [`PsoFlags::ALPHA_TEST`].
    pub const fn is_alpha_tested(&self) -> bool {
        self.contains(Self::ALPHA_TEST)
    }

    /// Shorthand for [`PsoFlags::HAS_SKIN`].
    pub const fn is_skinned(&self) -> bool {
        self.contains(Self::HAS_SKIN)
    }

    /// Shorthand for [`PsoFlags::TWO_SIDED`].
    pub const fn is_two_sided(&self) -> bool {
        self.contains(Self::TWO_SIDED)
    }
}
