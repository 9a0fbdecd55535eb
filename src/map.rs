//! Map loading
//!
//! Maps are wall bitmaps. Two kinds of file are understood:
//! - Images (PNG, netpbm): opaque alpha is wall; images without alpha
//!   treat dark pixels as wall. Either is compared against the wall threshold.
//! - Text art: `#` is wall, `.` or space is floor, one character per
//!   `cell` pixels square
//!
//! Loading happens once before a match; any problem is a hard error.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::ImageReader;

use crate::consts::MAX_FIELD_SIDE;
use crate::settings::Settings;
use crate::sim::{Arena, Mask};

/// Pixels per character in text-art maps
pub const TEXT_CELL_SIZE: u32 = 20;

/// Errors raised while loading a map
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("failed to read map file: {0}")]
    Io(#[from] std::io::Error),

    #[error("map is empty")]
    Empty,

    #[error("failed to decode map image: {0}")]
    Image(#[from] image::ImageError),

    #[error("map is {width}x{height}, larger than {MAX_FIELD_SIDE} pixels on a side")]
    TooLarge { width: u32, height: u32 },

    #[error("unexpected character {found:?} at line {line}, column {column}")]
    BadCell {
        found: char,
        line: usize,
        column: usize,
    },
}

/// Load a map file and rescale it to the configured field size
pub fn load_map(path: impl AsRef<Path>, settings: &Settings) -> Result<Arena, MapError> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let walls = decode(&bytes, settings.wall_threshold)?;
    log::info!(
        "Loaded map {} ({}x{}, {} wall pixels)",
        path.display(),
        walls.width(),
        walls.height(),
        walls.count()
    );
    Ok(fit_to_field(walls, settings))
}

/// Rescale to `field_size` when one is configured
pub fn fit_to_field(walls: Mask, settings: &Settings) -> Arena {
    match settings.field_size {
        Some([w, h]) if (w, h) != (walls.width(), walls.height()) => {
            log::debug!("Scaling map {}x{} -> {}x{}", walls.width(), walls.height(), w, h);
            Arena::from_mask(walls.scale(w, h))
        }
        _ => Arena::from_mask(walls),
    }
}

/// Decode a map from raw file bytes, sniffing the format
pub fn decode(bytes: &[u8], threshold: u8) -> Result<Mask, MapError> {
    match image::guess_format(bytes) {
        Ok(_) => decode_image(bytes, threshold),
        Err(_) => {
            let text = String::from_utf8_lossy(bytes);
            parse_text_map(&text, TEXT_CELL_SIZE)
        }
    }
}

/// Parse `#`/`.` text art, scaling each character to a `cell` x `cell` block.
///
/// Short lines are padded with floor. Lines starting with `;` are comments.
pub fn parse_text_map(text: &str, cell: u32) -> Result<Mask, MapError> {
    let rows: Vec<&str> = text
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.starts_with(';'))
        .collect();
    let columns = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
    if rows.is_empty() || columns == 0 {
        return Err(MapError::Empty);
    }

    let mut cells = vec![false; rows.len() * columns];
    for (line, row) in rows.iter().enumerate() {
        for (column, ch) in row.chars().enumerate() {
            cells[line * columns + column] = match ch {
                '#' => true,
                '.' | ' ' => false,
                found => {
                    return Err(MapError::BadCell {
                        found,
                        line: line + 1,
                        column: column + 1,
                    });
                }
            };
        }
    }

    let cell = cell.max(1);
    let side = |count: usize| u32::try_from(count).ok().and_then(|n| n.checked_mul(cell));
    let (Some(width), Some(height)) = (side(columns), side(rows.len())) else {
        return Err(MapError::TooLarge {
            width: u32::MAX,
            height: u32::MAX,
        });
    };
    check_size(width, height)?;
    Ok(Mask::from_fn(width, height, |x, y| {
        cells[(y / cell) as usize * columns + (x / cell) as usize]
    }))
}

/// Decode a raster image. Images with an alpha channel use it directly;
/// opaque images count dark pixels as wall.
fn decode_image(bytes: &[u8], threshold: u8) -> Result<Mask, MapError> {
    let (width, height) = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .into_dimensions()?;
    check_size(width, height)?;

    let decoded = image::load_from_memory(bytes)?;
    let mask = if decoded.color().has_alpha() {
        let rgba = decoded.to_rgba8();
        Mask::from_fn(width, height, |x, y| rgba.get_pixel(x, y)[3] > threshold)
    } else {
        let luma = decoded.to_luma8();
        Mask::from_fn(width, height, |x, y| 255 - luma.get_pixel(x, y)[0] > threshold)
    };
    Ok(mask)
}

fn check_size(width: u32, height: u32) -> Result<(), MapError> {
    if width == 0 || height == 0 {
        return Err(MapError::Empty);
    }
    if width > MAX_FIELD_SIDE || height > MAX_FIELD_SIDE {
        return Err(MapError::TooLarge { width, height });
    }
    Ok(())
}
