use crate::constants::BLOCK_SIZE;
use derivative::Derivative;
use image::{Rgba, RgbaImage};
use imageproc::drawing;
use imageproc::rect::Rect;
use piston_window::graphics;
use piston_window::graphics::Transformed;
use piston_window::prelude::*;

/// A retained pixel surface addressed in board-cell coordinates. Motion
/// updates erase and fill individual cells in the buffer; each frame the
/// buffer is uploaded as a texture and drawn at the panel's offset.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct Canvas {
    #[derivative(Debug = "ignore")]
    texture_context: G2dTextureContext,
    offset: (f64, f64),
    background: Rgba<u8>,
    buffer: RgbaImage,
}

impl Canvas {
    pub fn new(
        window: &mut PistonWindow,
        cells: (u32, u32),
        offset: (f64, f64),
        background: Rgba<u8>,
    ) -> Self {
        let dims = (
            cells.0 * BLOCK_SIZE as u32,
            cells.1 * BLOCK_SIZE as u32,
        );
        Self {
            texture_context: window.create_texture_context(),
            offset,
            background,
            buffer: RgbaImage::from_pixel(dims.0, dims.1, background),
        }
    }

    pub fn clear(&mut self) {
        let (w, h) = self.buffer.dimensions();
        self.buffer = RgbaImage::from_pixel(w, h, self.background);
    }

    pub fn fill_region(&mut self, x: i32, y: i32, w: u32, h: u32, color: Rgba<u8>) {
        drawing::draw_filled_rect_mut(
            &mut self.buffer,
            Rect::at(x * BLOCK_SIZE as i32, y * BLOCK_SIZE as i32)
                .of_size(w * BLOCK_SIZE as u32, h * BLOCK_SIZE as u32),
            color,
        );
    }

    pub fn clear_region(&mut self, x: i32, y: i32, w: u32, h: u32) {
        self.fill_region(x, y, w, h, self.background);
    }

    fn texture(&mut self) -> G2dTexture {
        Texture::from_image(
            &mut self.texture_context,
            &self.buffer,
            &TextureSettings::new(),
        )
        .unwrap()
    }

    pub fn render(&mut self, context: graphics::Context, g: &mut G2d) {
        let transform = context.transform.trans(self.offset.0, self.offset.1);
        graphics::image(&self.texture(), transform, g);
    }
}
