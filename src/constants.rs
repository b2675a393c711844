use image::Rgba;

pub const BLOCK_SIZE: usize = 16;
pub const BOARD_WIDTH: i32 = 11;
pub const BOARD_HEIGHT: i32 = 17;
pub const NEXT_WIDTH: i32 = 4;
pub const NEXT_HEIGHT: i32 = 4;

/// Seconds per gravity tick.
pub const LOOP_TIME: f64 = 0.333;

/// Board panel, a one-cell gutter, then the preview panel.
pub const WINDOW_SIZE: (u32, u32) = (
    ((BOARD_WIDTH + 1 + NEXT_WIDTH) as usize * BLOCK_SIZE) as u32,
    (BOARD_HEIGHT as usize * BLOCK_SIZE) as u32,
);
pub const PREVIEW_OFFSET: f64 = ((BOARD_WIDTH + 1) as usize * BLOCK_SIZE) as f64;

pub const WINDOW_TITLE: &str = "supertris_rs";
pub const CLEAR_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
pub const BOARD_BACKGROUND: Rgba<u8> = Rgba([238, 238, 238, 255]);
pub const PREVIEW_BACKGROUND: Rgba<u8> = Rgba([212, 212, 212, 255]);
