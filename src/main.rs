mod board;
mod canvas;
mod constants;
mod game;
mod pieces;

use log::info;
use piston_window::prelude::*;
use piston_window::AdvancedWindow;

use crate::constants::{WINDOW_SIZE, WINDOW_TITLE};

fn main() {
    env_logger::init();

    let opengl = OpenGL::V3_2;
    // 11 * 17 board cells plus the 4 * 4 preview panel
    let mut window: PistonWindow = WindowSettings::new(WINDOW_TITLE, WINDOW_SIZE)
        .exit_on_esc(true)
        .graphics_api(opengl)
        .build()
        .unwrap();

    let mut game = game::Game::new(&mut window);
    info!("p starts a game, j/l move, k rotates");

    while let Some(e) = window.next() {
        game.handle_event(&e);
        e.update(|args| game.update(args));
        if let Some(notice) = game.take_notice() {
            window.set_title(format!("{} - {}", WINDOW_TITLE, notice));
        }
        window.draw_2d(&e, |c, g, _| {
            game.render(c, g);
        });
    }
}
