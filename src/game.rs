//! Round state machine and the pixel layout shared with the renderer.
//!
//! The controller here is pure: handlers receive explicit points and return
//! outcomes, and the shell in `lib.rs` turns those outcomes into DOM updates
//! and scheduled callbacks. That keeps every rule in this module testable
//! without a browser.

use crate::geometry::{
    Point, Rect, Segment, closest_intersection, point_in_polygon, segments_of_rect,
};
use crate::maze::{DIRECTIONS, Direction, Maze};

pub const GRID_WIDTH: usize = 10;
pub const GRID_HEIGHT: usize = 10;
pub const CELL_SIZE: f64 = 50.0;
pub const WALL_THICKNESS: f64 = 10.0;
/// Raw pointer coordinates shift by this much when mapped into maze space.
pub const INPUT_INSET: f64 = WALL_THICKNESS;
pub const START_POSITION: Point = Point { x: 20.0, y: 20.0 };

pub const ROUND_SECONDS: u32 = 60;
pub const PENALTY_MS: i32 = 600;
pub const FEEDBACK_DELAY_MS: i32 = 400;
pub const REGENERATE_DELAY_MS: i32 = 2000;

pub const PLAYER_FILL: &str = "#03A9F4";
pub const PLAYER_STROKE: &str = "#CFD8DC";
pub const PENALTY_FILL: &str = "#f00";
pub const WIN_FILL: &str = "#388E3C";
pub const LOSE_FILL: &str = "#FF5252";

/// Background rectangle of the cell at grid position `(x, y)`.
pub fn cell_rect(x: usize, y: usize) -> Rect {
    Rect {
        x: x as f64 * CELL_SIZE,
        y: y as f64 * CELL_SIZE,
        width: CELL_SIZE,
        height: CELL_SIZE,
    }
}

/// Rendered rectangle of one wall of the cell at `(x, y)`.
///
/// Top and right walls sit just outside the cell rectangle, the bottom wall
/// is inset into it, and the left wall extends one wall thickness upward so
/// interior corners are closed off.
pub fn wall_rect(x: usize, y: usize, side: Direction) -> Rect {
    let sx = x as f64 * CELL_SIZE;
    let sy = y as f64 * CELL_SIZE;
    match side {
        Direction::Top => Rect {
            x: sx,
            y: sy - WALL_THICKNESS,
            width: CELL_SIZE,
            height: WALL_THICKNESS,
        },
        Direction::Right => Rect {
            x: sx + CELL_SIZE,
            y: sy,
            width: WALL_THICKNESS,
            height: CELL_SIZE,
        },
        Direction::Bottom => Rect {
            x: sx,
            y: sy + CELL_SIZE - WALL_THICKNESS,
            width: CELL_SIZE,
            height: WALL_THICKNESS,
        },
        Direction::Left => Rect {
            x: sx - WALL_THICKNESS,
            y: sy - WALL_THICKNESS,
            width: WALL_THICKNESS,
            height: CELL_SIZE + WALL_THICKNESS,
        },
    }
}

/// Collision geometry for one round: every present wall rectangle plus the
/// goal polygon (corners of the start cell's rectangle).
pub struct RoundLayout {
    pub walls: Vec<Rect>,
    pub goal: Vec<Point>,
}

impl RoundLayout {
    pub fn of(maze: &Maze) -> RoundLayout {
        let mut walls = Vec::new();
        for cell in maze.cells() {
            for side in DIRECTIONS {
                if cell.wall(side) {
                    walls.push(wall_rect(cell.x, cell.y, side));
                }
            }
        }
        let start = maze.start_cell();
        let goal = segments_of_rect(&cell_rect(start.x, start.y))
            .iter()
            .map(|s| s.a)
            .collect();
        RoundLayout { walls, goal }
    }
}

/// Session scores. `best` stays unset until the first win.
#[derive(Clone, Copy, Default, Debug)]
pub struct Score {
    pub won: u32,
    pub lost: u32,
    pub moves: u32,
    pub best: Option<u32>,
}

impl Score {
    pub fn line(&self) -> String {
        let best = match self.best {
            Some(best) => best.to_string(),
            None => "??".to_string(),
        };
        format!(
            "won: {} | lost: {} | moves: {} | best: {}",
            self.won, self.lost, self.moves, best
        )
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Phase {
    /// Round in progress, input live.
    Playing,
    /// Between rounds (win/lose feedback, waiting for the next maze).
    RoundOver,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum ClickOutcome {
    /// Click while blocked or between rounds; not counted as a move.
    Ignored,
    /// Legal move, player now at `to`. `won` is set when the move landed
    /// inside the goal polygon and ended the round.
    Moved { to: Point, won: bool },
    /// A wall sits between the player and the target; the move counted but
    /// the player did not budge, and input is locked for the penalty.
    Rejected,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tick {
    /// Countdown still running, this many seconds left.
    Running(u32),
    /// Countdown reached zero while playing: the round is lost.
    Expired,
    /// Tick arrived between rounds; nothing to do.
    Idle,
}

/// Owns the per-round collision geometry, the player, and the session score.
pub struct Game {
    walls: Vec<[Segment; 4]>,
    goal: Vec<Point>,
    player: Point,
    blocked: bool,
    phase: Phase,
    seconds_left: u32,
    score: Score,
}

impl Game {
    pub fn new() -> Game {
        Game {
            walls: Vec::new(),
            goal: Vec::new(),
            player: START_POSITION,
            blocked: false,
            phase: Phase::RoundOver,
            seconds_left: 0,
            score: Score::default(),
        }
    }

    /// Installs a fresh maze layout and opens a round: move count and
    /// countdown reset, player back at the start pixel, block cleared.
    pub fn begin_round(&mut self, layout: &RoundLayout) {
        self.walls = layout.walls.iter().map(segments_of_rect).collect();
        self.goal = layout.goal.clone();
        self.player = START_POSITION;
        self.blocked = false;
        self.phase = Phase::Playing;
        self.seconds_left = ROUND_SECONDS;
        self.score.moves = 0;
    }

    /// Handles a committed pointer click at `target` (maze coordinates).
    pub fn pointer_click(&mut self, target: Point) -> ClickOutcome {
        if self.blocked || self.phase != Phase::Playing {
            return ClickOutcome::Ignored;
        }
        self.score.moves += 1;

        let ray = Segment::new(self.player, target);
        let moved = match closest_intersection(ray, &self.walls) {
            None => {
                self.player = target;
                true
            }
            Some(_) => {
                self.blocked = true;
                false
            }
        };

        // Goal check runs after movement resolution either way; a rejected
        // move leaves the player where a previous click already put them.
        if point_in_polygon(self.player, &self.goal) {
            let finished_in = self.score.moves;
            if self.score.best.is_none_or(|best| finished_in < best) {
                self.score.best = Some(finished_in);
            }
            self.score.won += 1;
            self.score.moves = 0;
            self.phase = Phase::RoundOver;
            return ClickOutcome::Moved {
                to: self.player,
                won: true,
            };
        }

        if moved {
            ClickOutcome::Moved {
                to: self.player,
                won: false,
            }
        } else {
            ClickOutcome::Rejected
        }
    }

    /// One countdown second. Expiry ends the round as a loss even while a
    /// blocking penalty is mid-flight.
    pub fn tick(&mut self) -> Tick {
        if self.phase != Phase::Playing {
            return Tick::Idle;
        }
        self.seconds_left -= 1;
        if self.seconds_left == 0 {
            self.score.lost += 1;
            self.score.moves = 0;
            self.phase = Phase::RoundOver;
            Tick::Expired
        } else {
            Tick::Running(self.seconds_left)
        }
    }

    /// Line-of-sight segment from the player toward `cursor`, stopping at
    /// the nearest wall. Visual only; mutates nothing.
    pub fn line_of_sight(&self, cursor: Point) -> Segment {
        let ray = Segment::new(self.player, cursor);
        let end = closest_intersection(ray, &self.walls).unwrap_or(cursor);
        Segment::new(self.player, end)
    }

    /// Ends the illegal-move penalty lock.
    pub fn clear_blocked(&mut self) {
        self.blocked = false;
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    pub fn player(&self) -> Point {
        self.player
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    pub fn timer_line(&self) -> String {
        format!("[ 0:{:02} ]", self.seconds_left)
    }
}

impl Default for Game {
    fn default() -> Game {
        Game::new()
    }
}
