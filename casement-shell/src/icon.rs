use std::path::{Path, PathBuf};

use image::{
    RgbaImage,
    imageops::{self, FilterType},
};
use thiserror::Error;

/// Sizes the window icon is rendered at; some window managers only pick exact matches.
pub const ICON_SIZES: [u32; 7] = [16, 22, 32, 48, 64, 128, 256];

// Luma weights and the 255/155 stretch in 8.24 fixed point.
const GRAY_RED: u32 = 5_016_387;
const GRAY_GREEN: u32 = 9_848_225;
const GRAY_BLUE: u32 = 1_912_602;
const GRAY_STRETCH: u32 = 27_601_226;
const GRAY_THRESHOLD: u32 = 100;

#[derive(Debug, Error)]
pub enum IconError {
    #[error("failed to load icon {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

pub fn logo_variant(variant: i32) -> &'static str {
    match variant {
        1 => "_blue",
        2 => "_green",
        3 => "_orange",
        4 => "_red",
        5 => "_old",
        _ => "",
    }
}

pub fn logo_path(assets_dir: &Path, variant: i32) -> PathBuf {
    assets_dir.join(format!("logo_256{}.png", logo_variant(variant)))
}

pub fn logo_no_margin_path(assets_dir: &Path, variant: i32) -> PathBuf {
    assets_dir.join(format!("logo_256_no_margin{}.png", logo_variant(variant)))
}

/// User supplied icon that overrides every logo variant.
pub fn custom_icon_path(working_dir: &Path) -> PathBuf {
    working_dir.join("tdata").join("icon.png")
}

fn load_rgba(path: &Path) -> Result<RgbaImage, IconError> {
    image::open(path)
        .map(|image| image.into_rgba8())
        .map_err(|source| IconError::Load {
            path: path.to_owned(),
            source,
        })
}

pub fn load_logo(assets_dir: &Path, variant: i32) -> Result<RgbaImage, IconError> {
    load_rgba(&logo_path(assets_dir, variant))
}

pub fn load_logo_no_margin(assets_dir: &Path, variant: i32) -> Result<RgbaImage, IconError> {
    load_rgba(&logo_no_margin_path(assets_dir, variant))
}

/// Grayscale with a dark cut-off, used to tell support sessions apart. Alpha is kept.
pub fn convert_icon_to_black(image: &mut RgbaImage) {
    for pixel in image.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        let gray = (u32::from(r) * GRAY_RED + u32::from(g) * GRAY_GREEN + u32::from(b) * GRAY_BLUE)
            >> 24;
        let component = if gray < GRAY_THRESHOLD {
            0
        } else {
            ((((gray - GRAY_THRESHOLD) * GRAY_STRETCH) >> 24) & 0xFF) as u8
        };
        pixel.0 = [component, component, component, a];
    }
}

/// Window icon rendered at every size in [`ICON_SIZES`].
#[derive(Debug, Clone)]
pub struct WindowIcon {
    images: Vec<RgbaImage>,
}

impl WindowIcon {
    pub fn from_image(image: &RgbaImage) -> Self {
        let images = ICON_SIZES
            .iter()
            .map(|&size| imageops::resize(image, size, size, FilterType::Triangle))
            .collect();
        Self { images }
    }

    pub fn pixmap(&self, size: u32) -> Option<&RgbaImage> {
        self.images.iter().find(|image| image.width() == size)
    }

    pub fn sizes(&self) -> Vec<u32> {
        self.images.iter().map(RgbaImage::width).collect()
    }
}

/// Base icon image: the custom icon when present, the configured logo otherwise.
pub fn create_official_image(
    working_dir: &Path,
    assets_dir: &Path,
    custom_icon_id: i32,
    support_mode: bool,
) -> Result<RgbaImage, IconError> {
    let custom = custom_icon_path(working_dir);
    let mut image = if custom.is_file() {
        load_rgba(&custom)?
    } else {
        load_logo(assets_dir, custom_icon_id)?
    };
    if support_mode {
        convert_icon_to_black(&mut image);
    }
    Ok(image)
}

pub fn create_icon(
    working_dir: &Path,
    assets_dir: &Path,
    custom_icon_id: i32,
    support_mode: bool,
) -> Result<WindowIcon, IconError> {
    let image = create_official_image(working_dir, assets_dir, custom_icon_id, support_mode)?;
    Ok(WindowIcon::from_image(&image))
}
