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

//! Settings for the mesh renderer.

use serde::Deserialize;

/// Tunables read once when the renderer and its sorters are created.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RendererSettings {
    /// If `true`, opaque meshes are drawn in a depth prepass first and then
    /// shaded with a depth-equal test.
    pub separate_z_pass: bool,
    /// Forwarded to shaders through the global constants.
    pub debug_flag: f32,
    /// Maximum anisotropy of the default static sampler.
    pub max_anisotropy: u32,
    /// Screen-space tile size, in pixels, of the light grid.
    pub light_grid_dim: u32,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            separate_z_pass: true,
            debug_flag: 0.0,
            max_anisotropy: 8,
            light_grid_dim: 16,
        }
    }
}

impl RendererSettings {
    /// Parses settings from RON text. Missing fields keep their defaults.
    pub fn from_ron(text: &str) -> Result<Self, ron::error::SpannedError> {
        match ron::from_str::<Self>(text) {
            Ok(settings) => {
                log::debug!("Loaded renderer settings: {settings:?}");
                Ok(settings)
            }
            Err(err) => {
                log::warn!("Rejected renderer settings: {err}");
                Err(err)
            }
        }
    }
}
