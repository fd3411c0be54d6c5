//! Render targets and colours

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// An RGB display colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const RED: Color = Color::new(255, 0, 0);
    pub const GREEN: Color = Color::new(0, 255, 0);
    pub const BLUE: Color = Color::new(0, 0, 255);

    /// Create a colour from its components
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Luminance used when drawing into a grey image
    pub fn luminance(&self) -> u8 {
        let y = 0.299 * self.r as f64 + 0.587 * self.g as f64 + 0.114 * self.b as f64;
        y.round().clamp(0.0, 255.0) as u8
    }
}

/// A colour pixel with an alpha channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Pixel layouts a render target can hold
pub trait Pixel: Copy + Default + PartialEq + std::fmt::Debug {
    /// Convert a display colour into this layout
    fn from_color(color: Color) -> Self;
}

impl Pixel for Rgba {
    fn from_color(color: Color) -> Self {
        Self {
            r: color.r,
            g: color.g,
            b: color.b,
            a: 255,
        }
    }
}

impl Pixel for u8 {
    fn from_color(color: Color) -> Self {
        color.luminance()
    }
}

/// A row-major image used as render target
#[derive(Debug, Clone, PartialEq)]
pub struct Image<P: Pixel> {
    width: u32,
    height: u32,
    pixels: Vec<P>,
}

/// A colour render target
pub type ColorImage = Image<Rgba>;

/// A single-channel render target
pub type GrayImage = Image<u8>;

impl<P: Pixel> Image<P> {
    /// Create a new image filled with the default pixel
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![P::default(); width as usize * height as usize],
        }
    }

    /// Image width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get a pixel by row and column, `None` outside the image
    pub fn get(&self, row: u32, column: u32) -> Option<&P> {
        if row < self.height && column < self.width {
            self.pixels.get(row as usize * self.width as usize + column as usize)
        } else {
            None
        }
    }

    /// Set a pixel by row and column, ignoring locations outside the image
    pub fn set(&mut self, row: u32, column: u32, pixel: P) {
        if row < self.height && column < self.width {
            let index = row as usize * self.width as usize + column as usize;
            self.pixels[index] = pixel;
        }
    }

    /// Raw pixel buffer
    pub fn pixels(&self) -> &[P] {
        &self.pixels
    }
}

impl<P: Pixel> Index<(u32, u32)> for Image<P> {
    type Output = P;

    fn index(&self, (row, column): (u32, u32)) -> &Self::Output {
        &self.pixels[row as usize * self.width as usize + column as usize]
    }
}

impl<P: Pixel> IndexMut<(u32, u32)> for Image<P> {
    fn index_mut(&mut self, (row, column): (u32, u32)) -> &mut Self::Output {
        &mut self.pixels[row as usize * self.width as usize + column as usize]
    }
}
