//! Fixtures shared by the handler tests.

use std::io::Cursor;

use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};

use flockscan::{Classifier, InputShape, LabelCodec, ModelError, Predictor, Tensor};

use crate::state::{Readiness, ServiceContext};

const BODY_LIMIT: usize = 1 << 20;

/// Returns the same probability vector for every input.
struct FixedClassifier {
    output: Vec<f32>,
}

impl Classifier for FixedClassifier {
    fn input_shape(&self) -> InputShape {
        InputShape::new(4, 4)
    }

    fn num_classes(&self) -> usize {
        self.output.len()
    }

    fn predict(&self, _input: &Tensor) -> Result<Vec<f32>, ModelError> {
        Ok(self.output.clone())
    }
}

/// Fails on every invocation.
struct BrokenClassifier;

impl Classifier for BrokenClassifier {
    fn input_shape(&self) -> InputShape {
        InputShape::new(4, 4)
    }

    fn num_classes(&self) -> usize {
        2
    }

    fn predict(&self, _input: &Tensor) -> Result<Vec<f32>, ModelError> {
        Err(ModelError::Backend("device lost".into()))
    }
}

fn labels() -> LabelCodec {
    LabelCodec::new(vec!["healthy".into(), "coccidiosis".into()]).unwrap()
}

/// A ready service whose model always answers `output` over
/// `[healthy, coccidiosis]`.
pub fn ready_context(output: Vec<f32>) -> ServiceContext {
    let predictor = Predictor::new(Box::new(FixedClassifier { output }), labels()).unwrap();
    ServiceContext::new(Readiness::Ready(predictor), BODY_LIMIT)
}

pub fn failing_context() -> ServiceContext {
    let predictor = Predictor::new(Box::new(BrokenClassifier), labels()).unwrap();
    ServiceContext::new(Readiness::Ready(predictor), BODY_LIMIT)
}

pub fn degraded_context() -> ServiceContext {
    ServiceContext::new(
        Readiness::Degraded { reason: "artifact not found: classifier.json".into() },
        BODY_LIMIT,
    )
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 30) as u8, (y * 30) as u8, 128])
    }));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Png).unwrap();
    buf
}
