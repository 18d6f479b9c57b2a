pub mod normalize;
pub mod tensor;

pub use normalize::{decode_image, normalize, normalize_bytes, ImageProcessingError};
pub use tensor::Tensor;
