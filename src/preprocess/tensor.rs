/// Dense `f32` tensor in NHWC layout with a batch size of one:
/// shape `[1, height, width, 3]`, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    shape: [usize; 4],
    data: Vec<f32>,
}

impl Tensor {
    /// Wraps `data` as a single RGB image tensor. Returns `None` when the data
    /// length does not match `height * width * 3`.
    pub fn from_rgb(height: usize, width: usize, data: Vec<f32>) -> Option<Tensor> {
        if data.len() != height * width * 3 {
            return None;
        }
        Some(Tensor {
            shape: [1, height, width, 3],
            data,
        })
    }

    pub fn shape(&self) -> [usize; 4] {
        self.shape
    }

    pub fn height(&self) -> usize {
        self.shape[1]
    }

    pub fn width(&self) -> usize {
        self.shape[2]
    }

    /// Flattened values, ordered R, G, B per pixel, pixels row by row.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// The three channel values at row `y`, column `x`.
    pub fn pixel(&self, y: usize, x: usize) -> Option<[f32; 3]> {
        if y >= self.height() || x >= self.width() {
            return None;
        }
        let i = (y * self.width() + x) * 3;
        Some([self.data[i], self.data[i + 1], self.data[i + 2]])
    }
}
