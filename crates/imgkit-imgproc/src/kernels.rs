use imgkit_image::{Image, ImageError};

/// Create a gaussian kernel.
///
/// # Arguments
///
/// * `kernel_size` - The size of the kernel.
/// * `sigma` - The sigma of the gaussian kernel. If not positive, it is derived
///   from the kernel size as `0.3 * ((kernel_size - 1) * 0.5 - 1) + 0.8`.
///
/// # Returns
///
/// A vector of the kernel, normalized to sum to one.
pub fn gaussian_kernel_1d(kernel_size: usize, sigma: f32) -> Vec<f32> {
    if kernel_size == 0 {
        return Vec::new();
    }

    let sigma = if sigma > 0.0 {
        sigma
    } else {
        0.3 * ((kernel_size - 1) as f32 * 0.5 - 1.0) + 0.8
    };

    let mean = (kernel_size - 1) as f32 / 2.0;
    let sigma_sq = sigma * sigma;

    // compute the kernel
    let mut kernel = (0..kernel_size)
        .map(|i| {
            let x = i as f32 - mean;
            (-(x * x) / (2.0 * sigma_sq)).exp()
        })
        .collect::<Vec<_>>();

    // normalize the kernel
    let norm = kernel.iter().sum::<f32>();
    kernel.iter_mut().for_each(|k| *k /= norm);
    kernel
}

/// Create a square 2D gaussian kernel as the outer product of two 1D kernels.
///
/// # Errors
///
/// Returns [`ImageError::InvalidKernelSize`] if `kernel_size` is zero or even.
///
/// # Example
///
/// ```
/// use imgkit_imgproc::kernels::generate_gaussian_kernel;
///
/// let kernel = generate_gaussian_kernel(3, 1.0).unwrap();
///
/// assert_eq!(kernel.size().width, 3);
/// assert!((kernel.as_slice().iter().sum::<f32>() - 1.0).abs() < 1e-6);
/// ```
pub fn generate_gaussian_kernel(kernel_size: usize, sigma: f32) -> Result<Image<f32, 1>, ImageError> {
    if kernel_size % 2 == 0 {
        return Err(ImageError::InvalidKernelSize(kernel_size));
    }

    let kernel_1d = gaussian_kernel_1d(kernel_size, sigma);
    let data = kernel_1d
        .iter()
        .flat_map(|ky| kernel_1d.iter().map(move |kx| ky * kx))
        .collect();

    Image::new([kernel_size, kernel_size].into(), data)
}

/// Pixel types a kernel can be added onto.
pub trait AddKernel: Copy {
    /// Add a kernel value to a pixel value.
    fn add_kernel_value(self, k: f32) -> Self;
}

impl AddKernel for f32 {
    fn add_kernel_value(self, k: f32) -> Self {
        self + k
    }
}

impl AddKernel for u8 {
    fn add_kernel_value(self, k: f32) -> Self {
        // float to int casts truncate and saturate
        self.saturating_add(k as u8)
    }
}

/// Add a kernel to an image with the top-left of the kernel at `(x, y)`.
///
/// Kernel cells falling outside of the image are skipped, so the kernel may
/// start at negative coordinates or hang over the right and bottom borders.
///
/// # Example
///
/// ```
/// use imgkit_image::Image;
/// use imgkit_imgproc::kernels::add_kernel_to_image;
///
/// let mut image = Image::<f32, 1>::from_size_val([3, 1].into(), 1.0).unwrap();
/// let kernel = Image::<f32, 1>::new([2, 1].into(), vec![0.5, 2.0]).unwrap();
///
/// add_kernel_to_image(&mut image, &kernel, -1, 0);
/// assert_eq!(image.as_slice(), &[3.0, 1.0, 1.0]);
/// ```
pub fn add_kernel_to_image<T: AddKernel>(
    image: &mut Image<T, 1>,
    kernel: &Image<f32, 1>,
    x: isize,
    y: isize,
) {
    let (cols, rows) = (image.cols() as isize, image.rows() as isize);

    for (j, kernel_row) in kernel.rows_iter().enumerate() {
        let iy = y + j as isize;
        if iy < 0 || iy >= rows {
            continue;
        }
        let row_start = (iy * cols) as usize;
        for (i, &k) in kernel_row.iter().enumerate() {
            let ix = x + i as isize;
            if ix < 0 || ix >= cols {
                continue;
            }
            let v = &mut image.as_slice_mut()[row_start + ix as usize];
            *v = v.add_kernel_value(k);
        }
    }
}
