//! Tensor aliases shared by the pre-processing, inference and post-processing stages.

/// A 3D f32 tensor, e.g. `[batch, 4 + nc, anchors]` model output
/// or `[batch, classes, dim]` text features.
pub type Tensor3D = ndarray::Array3<f32>;

/// A 4D f32 tensor in NCHW layout.
pub type Tensor4D = ndarray::Array4<f32>;
