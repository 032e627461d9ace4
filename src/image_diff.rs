//! Pixel-exact comparison of a test image against a reference image.

use image::{DynamicImage, RgbImage, RgbaImage};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Differences listed in the JSON report; the difference images cover all of them.
pub const MAX_REPORTED_DIFFERENCES: usize = 1024;

#[derive(Debug, thiserror::Error)]
pub enum CompareError {
    #[error("failed to load {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("test width {test} != reference width {reference}")]
    WidthMismatch { reference: u32, test: u32 },
    #[error("test height {test} != reference height {reference}")]
    HeightMismatch { reference: u32, test: u32 },
    #[error("test has {test} channels, reference has {reference}")]
    ChannelMismatch { reference: u8, test: u8 },
    #[error("failed to write {path}: {source}")]
    WriteImage {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to write {path}: {source}")]
    WriteReport {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// An image expanded to RGBA8, remembering how many channels the file had.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pixels: RgbaImage,
    channels: u8,
}

impl LoadedImage {
    pub fn open(path: &Path) -> Result<Self, CompareError> {
        let image = image::open(path).map_err(|source| CompareError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_dynamic(image))
    }

    pub fn from_dynamic(image: DynamicImage) -> Self {
        let channels = image.color().channel_count();
        Self {
            pixels: image.to_rgba8(),
            channels,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }
}

/// One differing component of one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelDiff {
    pub row: u32,
    pub column: u32,
    /// 0 to 3 for red, green, blue, alpha.
    pub comp: u8,
    #[serde(rename = "ref")]
    pub reference: u8,
    pub test: u8,
}

impl PixelDiff {
    pub fn abs_diff(&self) -> u8 {
        self.reference.abs_diff(self.test)
    }
}

/// JSON error report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffReport {
    pub pixel_differences: Vec<PixelDiff>,
}

/// Every differing component between two equally sized images, in row-major order.
#[derive(Debug, Clone)]
pub struct Comparison {
    width: u32,
    height: u32,
    differences: Vec<PixelDiff>,
}

impl Comparison {
    pub fn is_identical(&self) -> bool {
        self.differences.is_empty()
    }

    pub fn differences(&self) -> &[PixelDiff] {
        &self.differences
    }

    /// `|reference - test|` of the red, green and blue components.
    pub fn rgb_difference_image(&self) -> RgbImage {
        let mut image = RgbImage::new(self.width, self.height);
        for diff in self.differences.iter().filter(|d| d.comp < 3) {
            image.get_pixel_mut(diff.column, diff.row).0[diff.comp as usize] = diff.abs_diff();
        }
        image
    }

    /// `|reference - test|` of alpha, stored in the red channel.
    pub fn alpha_difference_image(&self) -> RgbImage {
        let mut image = RgbImage::new(self.width, self.height);
        for diff in self.differences.iter().filter(|d| d.comp == 3) {
            image.get_pixel_mut(diff.column, diff.row).0[0] = diff.abs_diff();
        }
        image
    }

    /// The first [`MAX_REPORTED_DIFFERENCES`] differences.
    pub fn report(&self) -> DiffReport {
        DiffReport {
            pixel_differences: self
                .differences
                .iter()
                .take(MAX_REPORTED_DIFFERENCES)
                .copied()
                .collect(),
        }
    }

    /// Writes both difference images and the JSON report.
    pub fn write_outputs(
        &self,
        rgb_path: &Path,
        alpha_path: &Path,
        json_path: &Path,
    ) -> Result<(), CompareError> {
        for (path, image) in [
            (rgb_path, self.rgb_difference_image()),
            (alpha_path, self.alpha_difference_image()),
        ] {
            image.save(path).map_err(|source| CompareError::WriteImage {
                path: path.to_path_buf(),
                source,
            })?;
        }

        if self.differences.len() > MAX_REPORTED_DIFFERENCES {
            log::warn!(
                "Number of differences is {}. Only writing {MAX_REPORTED_DIFFERENCES} to {}",
                self.differences.len(),
                json_path.display()
            );
        }
        let json = serde_json::to_string_pretty(&self.report())?;
        std::fs::write(json_path, json + "\n").map_err(|source| CompareError::WriteReport {
            path: json_path.to_path_buf(),
            source,
        })
    }
}

/// Compares two images component by component.
///
/// Images must agree in width, height and source channel count.
pub fn compare(reference: &LoadedImage, test: &LoadedImage) -> Result<Comparison, CompareError> {
    if reference.width() != test.width() {
        return Err(CompareError::WidthMismatch {
            reference: reference.width(),
            test: test.width(),
        });
    }
    if reference.height() != test.height() {
        return Err(CompareError::HeightMismatch {
            reference: reference.height(),
            test: test.height(),
        });
    }
    if reference.channels() != test.channels() {
        return Err(CompareError::ChannelMismatch {
            reference: reference.channels(),
            test: test.channels(),
        });
    }

    let mut differences = Vec::new();
    for (column, row, ref_pixel) in reference.pixels.enumerate_pixels() {
        let test_pixel = test.pixels.get_pixel(column, row);
        for comp in 0..4 {
            let (r, t) = (ref_pixel.0[comp], test_pixel.0[comp]);
            if r != t {
                differences.push(PixelDiff {
                    row,
                    column,
                    comp: comp as u8,
                    reference: r,
                    test: t,
                });
            }
        }
    }

    Ok(Comparison {
        width: reference.width(),
        height: reference.height(),
        differences,
    })
}
