use image::{imageops::FilterType, DynamicImage, GenericImageView, RgbImage};

/// Longest side an input photo is allowed to keep before detection.
pub const MAX_IMAGE_DIMENSION: u32 = 1024;

/// Downscale so the longer side is at most `max_dimension`, keeping aspect ratio.
///
/// Landmarks are normalized, so this only affects detector speed and accuracy,
/// never the engine's arithmetic.
pub fn limit_dimension(img: DynamicImage, max_dimension: u32) -> DynamicImage {
    let (width, height) = img.dimensions();
    let longest = width.max(height);
    if longest <= max_dimension {
        return img;
    }
    let scale = max_dimension as f64 / longest as f64;
    let new_width = ((width as f64 * scale) as u32).max(1);
    let new_height = ((height as f64 * scale) as u32).max(1);
    log::debug!(
        "downscaling {}x{} -> {}x{}",
        width,
        height,
        new_width,
        new_height
    );
    img.resize_exact(new_width, new_height, FilterType::Triangle)
}

/// Square model input built by resizing an image and padding it onto a black canvas.
pub struct Letterbox {
    pub canvas: RgbImage,
    pub scale: f32,
    pub offset_x: u32,
    pub offset_y: u32,
}

impl Letterbox {
    pub fn fit(img: &DynamicImage, size: u32) -> Self {
        let (orig_width, orig_height) = img.dimensions();
        let max_dim = orig_width.max(orig_height).max(1);
        let scale = size as f32 / max_dim as f32;
        let new_width = ((orig_width as f32 * scale) as u32).clamp(1, size);
        let new_height = ((orig_height as f32 * scale) as u32).clamp(1, size);

        let resized = img.resize_exact(new_width, new_height, FilterType::Triangle);

        let mut canvas = DynamicImage::new_rgb8(size, size);
        let offset_x = (size - new_width) / 2;
        let offset_y = (size - new_height) / 2;
        image::imageops::overlay(&mut canvas, &resized, offset_x as i64, offset_y as i64);

        Self {
            canvas: canvas.to_rgb8(),
            scale,
            offset_x,
            offset_y,
        }
    }

    /// Map a pixel position on the canvas back to source image pixels.
    pub fn to_source(&self, x: f32, y: f32) -> (f32, f32) {
        (
            (x - self.offset_x as f32) / self.scale,
            (y - self.offset_y as f32) / self.scale,
        )
    }

    /// Planar CHW tensor data in RGB order scaled to `[0, 1]`.
    pub fn chw_unit(&self) -> Vec<f32> {
        let (w, h) = self.canvas.dimensions();
        let pixel_count = (w * h) as usize;
        let mut data = vec![0.0f32; 3 * pixel_count];
        let (r_channel, rest) = data.split_at_mut(pixel_count);
        let (g_channel, b_channel) = rest.split_at_mut(pixel_count);

        for (i, px) in self.canvas.as_raw().chunks_exact(3).enumerate() {
            r_channel[i] = px[0] as f32 / 255.0;
            g_channel[i] = px[1] as f32 / 255.0;
            b_channel[i] = px[2] as f32 / 255.0;
        }
        data
    }
}
