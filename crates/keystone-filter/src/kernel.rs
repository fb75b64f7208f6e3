//! Convolution kernels
//!
//! A small row-major `f32` kernel with an explicit origin. The filters in
//! this crate only need one-dimensional Gaussian rows and columns, but the
//! type keeps the general 2D shape so separable passes can share it.

use crate::{FilterError, FilterResult};

/// A 2D convolution kernel
#[derive(Debug, Clone)]
pub struct Kernel {
    /// Width of the kernel
    width: u32,
    /// Height of the kernel
    height: u32,
    /// X coordinate of the center
    cx: u32,
    /// Y coordinate of the center
    cy: u32,
    /// Kernel data (row-major order)
    data: Vec<f32>,
}

impl Kernel {
    /// Create a zero kernel with the origin at its center.
    pub fn new(width: u32, height: u32) -> FilterResult<Self> {
        if width == 0 || height == 0 {
            return Err(FilterError::InvalidKernel(format!(
                "kernel must be non-empty, got {width}x{height}"
            )));
        }
        Ok(Self {
            width,
            height,
            cx: width / 2,
            cy: height / 2,
            data: vec![0.0; (width * height) as usize],
        })
    }

    /// Create a kernel from a slice of values in row-major order.
    pub fn from_slice(width: u32, height: u32, data: &[f32]) -> FilterResult<Self> {
        let mut kernel = Self::new(width, height)?;
        if data.len() != kernel.data.len() {
            return Err(FilterError::InvalidKernel(format!(
                "expected {} values for a {width}x{height} kernel, got {}",
                kernel.data.len(),
                data.len()
            )));
        }
        kernel.data.copy_from_slice(data);
        Ok(kernel)
    }

    /// Sigma used when the caller passes `sigma <= 0`.
    pub fn default_sigma(size: u32) -> f32 {
        0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8
    }

    /// Create a normalized one-row Gaussian kernel of odd `size`.
    ///
    /// A non-positive `sigma` is derived from the size with
    /// [`Kernel::default_sigma`].
    pub fn gaussian_row(size: u32, sigma: f32) -> FilterResult<Self> {
        if size == 0 || size % 2 == 0 {
            return Err(FilterError::InvalidKernel(format!(
                "Gaussian size must be odd, got {size}"
            )));
        }
        let sigma = if sigma > 0.0 {
            sigma
        } else {
            Self::default_sigma(size)
        };

        let half = (size / 2) as f32;
        let scale = -0.5 / (sigma * sigma);
        let values: Vec<f32> = (0..size)
            .map(|i| {
                let x = i as f32 - half;
                (scale * x * x).exp()
            })
            .collect();

        let mut kernel = Self::from_slice(size, 1, &values)?;
        kernel.normalize();
        Ok(kernel)
    }

    /// The same kernel with rows and columns exchanged.
    pub fn transposed(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for x in 0..self.width {
            for y in 0..self.height {
                data.push(self.data[(y * self.width + x) as usize]);
            }
        }
        Self {
            width: self.height,
            height: self.width,
            cx: self.cy,
            cy: self.cx,
            data,
        }
    }

    /// Get the kernel width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the kernel height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the center X coordinate.
    #[inline]
    pub fn center_x(&self) -> u32 {
        self.cx
    }

    /// Get the center Y coordinate.
    #[inline]
    pub fn center_y(&self) -> u32 {
        self.cy
    }

    /// Get the kernel data.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Get a value at (x, y).
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<f32> {
        if x < self.width && y < self.height {
            Some(self.data[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Normalize the kernel so that values sum to 1.
    ///
    /// A kernel summing to zero is left unchanged.
    pub fn normalize(&mut self) {
        let sum = self.sum();
        if sum.abs() > f32::EPSILON {
            self.data.iter_mut().for_each(|v| *v /= sum);
        }
    }

    /// Get the sum of all kernel values.
    pub fn sum(&self) -> f32 {
        self.data.iter().sum()
    }
}
