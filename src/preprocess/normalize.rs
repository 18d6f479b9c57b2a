//! Image preprocessing: decodes uploaded bytes (PNG/JPEG/BMP/GIF), forces
//! three-channel RGB, resizes to the classifier's input size and scales pixel
//! values into [0, 1].

use image::imageops::{self, FilterType};
use image::DynamicImage;
use thiserror::Error;

use crate::network::metadata::InputShape;
use crate::preprocess::tensor::Tensor;

#[derive(Debug, Error)]
pub enum ImageProcessingError {
    #[error("image payload is empty")]
    EmptyPayload,

    #[error("cannot decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("image has zero size ({width}x{height})")]
    ZeroSized { width: u32, height: u32 },

    #[error("target shape {height}x{width} is empty")]
    EmptyTarget { height: u32, width: u32 },
}

/// Decodes raw bytes into an image, guessing the format from its magic bytes.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, ImageProcessingError> {
    if bytes.is_empty() {
        return Err(ImageProcessingError::EmptyPayload);
    }
    Ok(image::load_from_memory(bytes)?)
}

/// Converts `image` into a `[1, H, W, 3]` tensor for a classifier expecting
/// `target`.
///
/// Alpha is dropped and single-channel images are expanded to RGB before the
/// resize. Each channel byte is divided by 255.
pub fn normalize(image: &DynamicImage, target: InputShape) -> Result<Tensor, ImageProcessingError> {
    if target.is_empty() {
        return Err(ImageProcessingError::EmptyTarget {
            height: target.height,
            width: target.width,
        });
    }
    if image.width() == 0 || image.height() == 0 {
        return Err(ImageProcessingError::ZeroSized {
            width: image.width(),
            height: image.height(),
        });
    }

    let rgb = image.to_rgb8();
    let resized = if rgb.dimensions() == (target.width, target.height) {
        rgb
    } else {
        imageops::resize(&rgb, target.width, target.height, FilterType::CatmullRom)
    };

    let data: Vec<f32> = resized
        .pixels()
        .flat_map(|p| p.0.into_iter().map(|c| c as f32 / 255.0))
        .collect();

    // Length is width * height * 3 by construction of the RGB buffer.
    Tensor::from_rgb(target.height as usize, target.width as usize, data).ok_or(
        ImageProcessingError::ZeroSized {
            width: resized.width(),
            height: resized.height(),
        },
    )
}

/// `decode_image` followed by `normalize`.
pub fn normalize_bytes(bytes: &[u8], target: InputShape) -> Result<Tensor, ImageProcessingError> {
    let image = decode_image(bytes)?;
    normalize(&image, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{
        GrayAlphaImage, GrayImage, ImageOutputFormat, Luma, LumaA, Rgb, RgbImage, Rgba, RgbaImage,
    };
    use rand::Rng;
    use std::io::Cursor;

    fn png_bytes(img: &DynamicImage) -> Vec<u8> {
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Png).unwrap();
        buf
    }

    fn assert_valid(tensor: &Tensor, target: InputShape) {
        assert_eq!(
            tensor.shape(),
            [1, target.height as usize, target.width as usize, 3]
        );
        assert_eq!(tensor.as_slice().len(), target.flat_len());
        assert!(tensor.as_slice().iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn random_sizes_and_modes_always_match_target() {
        let mut rng = rand::thread_rng();
        let target = InputShape::new(7, 5);
        for _ in 0..24 {
            let w = rng.gen_range(1..40);
            let h = rng.gen_range(1..40);
            let seed: u8 = rng.gen();
            let img = match rng.gen_range(0..4) {
                0 => DynamicImage::ImageRgb8(RgbImage::from_fn(w, h, |x, y| {
                    Rgb([x as u8 ^ seed, y as u8, seed])
                })),
                1 => DynamicImage::ImageRgba8(RgbaImage::from_fn(w, h, |x, y| {
                    Rgba([x as u8, y as u8 ^ seed, 255, seed])
                })),
                2 => DynamicImage::ImageLuma8(GrayImage::from_fn(w, h, |x, _| {
                    Luma([x as u8 ^ seed])
                })),
                _ => DynamicImage::ImageLumaA8(GrayAlphaImage::from_fn(w, h, |_, y| {
                    LumaA([y as u8, seed])
                })),
            };
            let tensor = normalize(&img, target).unwrap();
            assert_valid(&tensor, target);
        }
    }

    #[test]
    fn extreme_pixels_map_to_unit_interval_bounds() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(2, 1, |x, _| {
            if x == 0 { Rgb([0, 0, 0]) } else { Rgb([255, 255, 255]) }
        }));
        let tensor = normalize(&img, InputShape::new(1, 2)).unwrap();
        assert_eq!(tensor.pixel(0, 0), Some([0.0, 0.0, 0.0]));
        assert_eq!(tensor.pixel(0, 1), Some([1.0, 1.0, 1.0]));
    }

    #[test]
    fn grayscale_is_replicated_across_channels() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(3, 3, Luma([51])));
        let tensor = normalize(&img, InputShape::new(3, 3)).unwrap();
        let px = tensor.pixel(1, 1).unwrap();
        assert!((px[0] - 0.2).abs() < 1e-6);
        assert_eq!(px[0], px[1]);
        assert_eq!(px[1], px[2]);
    }

    #[test]
    fn decodes_encoded_png_of_any_mode() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(9, 4, Rgba([10, 20, 30, 0])));
        let target = InputShape::new(4, 4);
        let tensor = normalize_bytes(&png_bytes(&img), target).unwrap();
        assert_valid(&tensor, target);
    }

    #[test]
    fn garbage_and_empty_bytes_are_rejected() {
        let target = InputShape::new(4, 4);
        assert!(matches!(
            normalize_bytes(b"definitely not an image", target),
            Err(ImageProcessingError::Decode(_))
        ));
        assert!(matches!(
            normalize_bytes(&[], target),
            Err(ImageProcessingError::EmptyPayload)
        ));
    }

    #[test]
    fn truncated_png_is_rejected() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 16, Rgb([1, 2, 3])));
        let bytes = png_bytes(&img);
        assert!(normalize_bytes(&bytes[..bytes.len() / 2], InputShape::new(4, 4)).is_err());
    }

    #[test]
    fn zero_sized_source_or_target_is_rejected() {
        let empty = DynamicImage::new_rgb8(0, 0);
        assert!(matches!(
            normalize(&empty, InputShape::new(2, 2)),
            Err(ImageProcessingError::ZeroSized { .. })
        ));

        let img = DynamicImage::new_rgb8(2, 2);
        assert!(matches!(
            normalize(&img, InputShape::new(0, 2)),
            Err(ImageProcessingError::EmptyTarget { .. })
        ));
    }
}
