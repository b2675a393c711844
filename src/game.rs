use std::time::Instant;

use crate::board::Board;
use crate::canvas::Canvas;
use crate::constants::*;
use crate::pieces::{ActivePiece, Tetromino};
use log::{info, warn};
use nanorand::{Rng, WyRand};
use piston_window::graphics;
use piston_window::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Running,
    GameOver,
}

/// Running totals for the tick loop. The first loop and its full interval
/// are on the books before the first tick fires.
#[derive(Debug, Clone, Copy, PartialEq)]
struct LoopStats {
    loops: u32,
    total_wait: f64,
}

impl LoopStats {
    fn start() -> Self {
        Self {
            loops: 1,
            total_wait: LOOP_TIME,
        }
    }

    fn record(&mut self, wait: f64) {
        self.total_wait += wait;
        self.loops += 1;
    }

    fn average_ms(&self) -> f64 {
        self.total_wait * 1000.0 / self.loops as f64
    }
}

#[derive(Debug)]
pub struct Game {
    rng: WyRand,
    board: Board,
    board_canvas: Canvas,
    preview_canvas: Canvas,
    phase: Phase,
    active: Option<ActivePiece>,
    stats: LoopStats,
    elapsed_time: f64,
    next_tick: f64,
    notice: Option<String>,
}

impl Game {
    pub fn new(window: &mut PistonWindow) -> Self {
        Self {
            rng: WyRand::new(),
            board: Board::new(BOARD_WIDTH, BOARD_HEIGHT),
            board_canvas: Canvas::new(
                window,
                (BOARD_WIDTH as u32, BOARD_HEIGHT as u32),
                (0.0, 0.0),
                BOARD_BACKGROUND,
            ),
            preview_canvas: Canvas::new(
                window,
                (NEXT_WIDTH as u32, NEXT_HEIGHT as u32),
                (PREVIEW_OFFSET, 0.0),
                PREVIEW_BACKGROUND,
            ),
            phase: Phase::Idle,
            active: None,
            stats: LoopStats::start(),
            elapsed_time: 0.0,
            next_tick: 0.0,
            notice: None,
        }
    }

    pub fn handle_event(&mut self, event: &Event) {
        if let Some(button) = event.press_args() {
            match button {
                Button::Keyboard(key) => match key {
                    Key::J => {
                        self.move_active(-1, 0, false);
                    }
                    Key::L => {
                        self.move_active(1, 0, false);
                    }
                    Key::K => {
                        self.move_active(0, 0, true);
                    }
                    Key::Space => {
                        // drop is not wired up yet
                    }
                    Key::P => {
                        self.start_game();
                    }
                    _ => {}
                },
                Button::Mouse(MouseButton::Left) => {
                    self.start_game();
                }
                _ => {}
            }
        }
    }

    fn start_game(&mut self) {
        // a second start while a game is live would orphan the running loop
        if self.phase == Phase::Running {
            return;
        }

        let kind: Tetromino = self.rng.generate();
        let active = ActivePiece::spawn(kind, &self.board);

        self.stats = LoopStats::start();
        self.phase = Phase::Running;
        self.board_canvas.clear();
        for (x, y) in active.cells() {
            self.board_canvas.fill_region(x, y, 1, 1, kind.color());
        }
        self.active = Some(active);
        self.next_tick = self.elapsed_time + LOOP_TIME;
        info!("new game: {:?} piece entering at the top", kind);
    }

    /// Validate-then-mutate move of the active piece. The board surface is
    /// only touched once the move has gone through in full.
    fn move_active(&mut self, dx: i32, dy: i32, rotate: bool) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        let old_cells: Vec<(i32, i32)> = active.cells().collect();
        if !active.try_move(&self.board, dx, dy, rotate) {
            return false;
        }
        for (x, y) in old_cells {
            self.board_canvas.clear_region(x, y, 1, 1);
        }
        let color = active.kind().color();
        for (x, y) in active.cells() {
            self.board_canvas.fill_region(x, y, 1, 1, color);
        }
        true
    }

    pub fn update(&mut self, event: &UpdateArgs) {
        self.elapsed_time += event.dt;

        if self.phase != Phase::Running {
            return;
        }

        if self.elapsed_time >= self.next_tick {
            self.tick();
        }
    }

    fn tick(&mut self) {
        let tick_start = Instant::now();

        if !self.move_active(0, 1, false) {
            let summary = format!(
                "game over: {} loops, {:.1} ms per loop",
                self.stats.loops,
                self.stats.average_ms()
            );
            info!("{}", summary);
            self.notice = Some(summary);
            self.phase = Phase::GameOver;
            self.active = None;
            return;
        }

        // Self-rescheduling: the next tick is armed only after this one has
        // done its work, at whatever is left of the interval.
        let spent = tick_start.elapsed().as_secs_f64();
        if spent >= LOOP_TIME {
            warn!(
                "tick took {:.1} ms, over the {:.0} ms interval",
                spent * 1000.0,
                LOOP_TIME * 1000.0
            );
            self.notice = Some("system too slow".to_string());
            self.phase = Phase::GameOver;
            self.active = None;
            return;
        }
        let wait = LOOP_TIME - spent;
        self.stats.record(wait);
        self.next_tick = self.elapsed_time + wait;
    }

    /// A user-facing message produced since the last call, if any. The
    /// caller surfaces it in the window title.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    pub fn render(&mut self, context: graphics::Context, g: &mut G2d) {
        graphics::clear(CLEAR_COLOR, g);
        self.board_canvas.render(context, g);
        // TODO: draw the upcoming piece in the preview panel
        self.preview_canvas.render(context, g);
    }
}
