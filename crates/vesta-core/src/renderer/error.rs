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

//! Defines the hierarchy of error types for the rendering subsystem.

use crate::renderer::api::util::PsoFlags;
use std::fmt;

/// An error related to the creation or caching of a graphics pipeline.
#[derive(Debug)]
pub enum PipelineError {
    /// Mesh flags lack the position or normal bit.
    MissingRequiredFlags {
        /// The offending flags.
        flags: PsoFlags,
    },
    /// The pipeline cache has no room for another pipeline pair.
    CacheExhausted {
        /// The maximum number of cached pipelines.
        capacity: usize,
    },
    /// A pipeline index does not name a cached pipeline.
    UnknownPso {
        /// The offending index.
        index: usize,
    },
    /// A pipeline was bound before being finalized.
    NotFinalized {
        /// The label of the pipeline.
        label: String,
    },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::MissingRequiredFlags { flags } => {
                write!(f, "Mesh flags must include position and normal, got {flags:?}")
            }
            PipelineError::CacheExhausted { capacity } => {
                write!(f, "Pipeline cache exhausted ({capacity} entries)")
            }
            PipelineError::UnknownPso { index } => {
                write!(f, "No cached pipeline at index {index}")
            }
            PipelineError::NotFinalized { label } => {
                write!(f, "Pipeline '{label}' was used before being finalized")
            }
        }
    }
}

impl std::error::Error for PipelineError {}

/// An error reported by a [`GraphicsDevice`](crate::renderer::GraphicsDevice)
/// while creating a GPU object.
#[derive(Debug)]
pub enum ResourceError {
    /// The backend rejected the request.
    BackendError(String),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::BackendError(msg) => {
                write!(f, "Backend-specific resource error: {msg}")
            }
        }
    }
}

impl std::error::Error for ResourceError {}

/// An error raised while initializing the renderer or recording a frame.
///
/// These are precondition violations: callers are expected to treat them as fatal.
#[derive(Debug)]
pub enum RenderError {
    /// Meshes were rendered without a depth target.
    MissingDepthTarget,
    /// Meshes were rendered without a camera.
    MissingCamera,
    /// A color target does not match the size of the depth target.
    TargetSizeMismatch {
        /// Slot of the color target.
        slot: usize,
        /// Size of the color target.
        color: (u32, u32),
        /// Size of the depth target.
        depth: (u32, u32),
    },
    /// A skinned mesh was submitted without joint matrices.
    MissingSkeleton {
        /// Index of the offending sort object.
        object: usize,
    },
    /// A skinned mesh references joints past the end of its skeleton.
    SkeletonOutOfRange {
        /// First joint referenced.
        start: u32,
        /// Number of joints referenced.
        count: u32,
        /// Number of joints in the skeleton.
        len: usize,
    },
    /// A pipeline could not be built or bound.
    Pipeline(PipelineError),
    /// An error occurred while managing a GPU resource.
    ResourceError(ResourceError),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::MissingDepthTarget => {
                write!(f, "No depth-stencil target was set before rendering.")
            }
            RenderError::MissingCamera => write!(f, "No camera was set before rendering."),
            RenderError::TargetSizeMismatch { slot, color, depth } => write!(
                f,
                "Render target {slot} is {}x{} but the depth target is {}x{}",
                color.0, color.1, depth.0, depth.1
            ),
            RenderError::MissingSkeleton { object } => {
                write!(f, "Sort object {object} is skinned but has no joint matrices")
            }
            RenderError::SkeletonOutOfRange { start, count, len } => write!(
                f,
                "Joints {start}..{} are out of range for a skeleton of {len}",
                u64::from(*start) + u64::from(*count)
            ),
            RenderError::Pipeline(err) => write!(f, "Pipeline error: {err}"),
            RenderError::ResourceError(err) => {
                write!(f, "Graphics resource operation failed: {err}")
            }
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Pipeline(err) => Some(err),
            RenderError::ResourceError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ResourceError> for RenderError {
    fn from(err: ResourceError) -> Self {
        RenderError::ResourceError(err)
    }
}

impl From<PipelineError> for RenderError {
    fn from(err: PipelineError) -> Self {
        RenderError::Pipeline(err)
    }
}
