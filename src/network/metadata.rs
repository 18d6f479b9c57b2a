use serde::{Deserialize, Serialize};

/// Spatial input size a classifier expects. Images are always fed as
/// three-channel RGB, so the flattened input width is `height * width * 3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputShape {
    pub height: u32,
    pub width: u32,
}

impl InputShape {
    pub const CHANNELS: usize = 3;

    pub fn new(height: u32, width: u32) -> Self {
        InputShape { height, width }
    }

    /// Number of scalar inputs a tensor of this shape carries.
    pub fn flat_len(&self) -> usize {
        self.height as usize * self.width as usize * Self::CHANNELS
    }

    pub fn is_empty(&self) -> bool {
        self.height == 0 || self.width == 0
    }
}

/// Annotations stored alongside the weights in a model artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    #[serde(default)]
    pub description: Option<String>,
    pub input: InputShape,
}
