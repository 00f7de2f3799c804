use std::path::Path;

use anyhow::{bail, Context};
use glam::Vec4;

use crate::assets;

/// A tightly packed, row-major 8-bit pixel buffer.
#[derive(Clone, Debug)]
pub struct Image {
    width: u32,
    height: u32,
    channel_count: u32,
    data: Vec<u8>,
}

impl Image {
    /// Decodes a PNG or JPEG file. When `flip_vertical` is set, the first row
    /// of the returned data is the bottom row of the picture, which is what
    /// OpenGL expects for texture coordinate (0, 0).
    pub fn load(path: impl AsRef<Path>, flip_vertical: bool) -> anyhow::Result<Image> {
        let path = assets::resolve(path);
        let decoded = ::image::io::Reader::open(&path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(anyhow::Error::from)
            .and_then(|reader| reader.decode().map_err(anyhow::Error::from))
            .with_context(|| {
                log::error!("failed to load image: {}", path.display());
                format!("failed to load image: {}", path.display())
            })?;
        let decoded = if flip_vertical {
            decoded.flipv()
        } else {
            decoded
        };
        let (width, height) = (decoded.width(), decoded.height());
        let (channel_count, data) = match decoded {
            ::image::DynamicImage::ImageLuma8(buf) => (1, buf.into_raw()),
            ::image::DynamicImage::ImageLumaA8(buf) => (2, buf.into_raw()),
            ::image::DynamicImage::ImageRgb8(buf) => (3, buf.into_raw()),
            other => (4, other.into_rgba8().into_raw()),
        };
        log::info!(
            "image: {} ({width}x{height}, {channel_count} channels)",
            path.display()
        );
        Ok(Image {
            width,
            height,
            channel_count,
            data,
        })
    }

    /// Allocates a zeroed image.
    pub fn create(width: u32, height: u32, channel_count: u32) -> anyhow::Result<Image> {
        if width == 0 || height == 0 {
            bail!("image dimensions must be nonzero, got {width}x{height}");
        }
        if !(1..=4).contains(&channel_count) {
            bail!("images have 1 to 4 channels, got {channel_count}");
        }
        let len = width as usize * height as usize * channel_count as usize;
        Ok(Image {
            width,
            height,
            channel_count,
            data: vec![0; len],
        })
    }

    /// Creates an RGBA image filled with `color`, whose components are
    /// clamped to 0..=1.
    pub fn create_single_color(width: u32, height: u32, color: Vec4) -> anyhow::Result<Image> {
        let mut image = Image::create(width, height, 4)?;
        let texel = (color.clamp(Vec4::ZERO, Vec4::ONE) * 255.0).to_array().map(|c| c as u8);
        for pixel in image.data.chunks_exact_mut(4) {
            pixel.copy_from_slice(&texel);
        }
        Ok(image)
    }

    /// Overwrites the image with a black and white checkerboard of
    /// `grid_x` by `grid_y` pixel cells. Alpha, if present, is opaque.
    pub fn set_check_image(&mut self, grid_x: u32, grid_y: u32) {
        let grid_x = grid_x.max(1);
        let grid_y = grid_y.max(1);
        let channels = self.channel_count as usize;
        for j in 0..self.height {
            for i in 0..self.width {
                let start = (j * self.width + i) as usize * channels;
                let value = if (i / grid_x + j / grid_y) % 2 == 0 { 255 } else { 0 };
                let pixel = &mut self.data[start..start + channels];
                match channels {
                    2 => pixel.copy_from_slice(&[value, 255]),
                    4 => pixel.copy_from_slice(&[value, value, value, 255]),
                    _ => pixel.fill(value),
                }
            }
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channel_count(&self) -> u32 {
        self.channel_count
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let channels = self.channel_count as usize;
        let start = (y * self.width + x) as usize * channels;
        &self.data[start..start + channels]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_color_is_clamped_and_scaled() {
        let image = Image::create_single_color(4, 2, Vec4::new(0.2, 2.0, -1.0, 1.0)).unwrap();
        assert_eq!(4, image.channel_count());
        assert_eq!(4 * 2 * 4, image.data().len());
        for y in 0..2 {
            for x in 0..4 {
                assert_eq!(&[51, 255, 0, 255], image.pixel(x, y));
            }
        }
    }

    #[test]
    fn checkerboard_alternates_per_cell() {
        let mut image = Image::create(64, 64, 4).unwrap();
        image.set_check_image(16, 16);
        assert_eq!(&[255, 255, 255, 255], image.pixel(0, 0));
        assert_eq!(&[255, 255, 255, 255], image.pixel(15, 15));
        assert_eq!(&[0, 0, 0, 255], image.pixel(16, 0));
        assert_eq!(&[0, 0, 0, 255], image.pixel(0, 16));
        assert_eq!(&[255, 255, 255, 255], image.pixel(16, 16));
        assert_eq!(&[0, 0, 0, 255], image.pixel(63, 32));
    }

    #[test]
    fn checkerboard_with_uneven_grid() {
        let mut image = Image::create(8, 4, 3).unwrap();
        image.set_check_image(4, 2);
        assert_eq!(&[255, 255, 255], image.pixel(3, 1));
        assert_eq!(&[0, 0, 0], image.pixel(4, 1));
        assert_eq!(&[0, 0, 0], image.pixel(3, 2));
        assert_eq!(&[255, 255, 255], image.pixel(7, 3));
    }

    #[test]
    fn invalid_dimensions_are_rejected() {
        assert!(Image::create(0, 4, 4).is_err());
        assert!(Image::create(4, 4, 5).is_err());
        assert!(Image::create_single_color(4, 0, Vec4::ONE).is_err());
    }

    #[test]
    fn missing_image_is_an_error() {
        assert!(Image::load("image/not_here.png", true).is_err());
    }
}
