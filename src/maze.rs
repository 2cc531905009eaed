//! Perfect-maze generation over a rectangular grid.
//!
//! The generator is the randomized depth-first backtracker: walk to a random
//! unvisited neighbour, knocking the shared wall out on both sides, and pop
//! back up the stack when boxed in. The result is a spanning tree: exactly
//! one path between any two cells.

use rand::Rng;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Top,
    Left,
    Bottom,
    Right,
}

pub const DIRECTIONS: [Direction; 4] = [
    Direction::Top,
    Direction::Left,
    Direction::Bottom,
    Direction::Right,
];

impl Direction {
    /// The side a neighbour sees us on. Removing a wall always removes
    /// this pair together.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Top => Direction::Bottom,
            Direction::Left => Direction::Right,
            Direction::Bottom => Direction::Top,
            Direction::Right => Direction::Left,
        }
    }

    fn delta(self) -> (i32, i32) {
        match self {
            Direction::Top => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Bottom => (0, 1),
            Direction::Right => (1, 0),
        }
    }

    fn index(self) -> usize {
        match self {
            Direction::Top => 0,
            Direction::Left => 1,
            Direction::Bottom => 2,
            Direction::Right => 3,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
    walls: [bool; 4],
    pub visited: bool,
    /// 1-based visit sequence number assigned during generation.
    pub order: u32,
    pub start: bool,
}

impl Cell {
    fn new(x: usize, y: usize) -> Cell {
        Cell {
            x,
            y,
            walls: [true; 4],
            visited: false,
            order: 0,
            start: false,
        }
    }

    pub fn wall(&self, side: Direction) -> bool {
        self.walls[side.index()]
    }

    fn remove_wall(&mut self, side: Direction) {
        self.walls[side.index()] = false;
    }
}

/// A generated maze. Cells live in a single flat buffer owned here and are
/// addressed by `(x, y)`; adjacency is recomputed from coordinates instead of
/// stored back-references.
pub struct Maze {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Maze {
    /// Generates a `width * height` maze with the randomized depth-first
    /// backtracker. Both dimensions must be at least 1.
    pub fn generate(width: usize, height: usize, rng: &mut impl Rng) -> Maze {
        assert!(width >= 1 && height >= 1, "maze dimensions must be positive");

        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                cells.push(Cell::new(x, y));
            }
        }
        let mut maze = Maze {
            width,
            height,
            cells,
        };

        let total = width * height;
        let mut current = (rng.gen_range(0..width), rng.gen_range(0..height));
        {
            let cell = maze.cell_mut(current.0, current.1);
            cell.visited = true;
            cell.start = true;
            cell.order = 1;
        }
        let mut visited = 1u32;
        let mut backtrack: Vec<(usize, usize)> = Vec::new();

        while (visited as usize) < total {
            let unvisited = maze.unvisited_neighbours(current.0, current.1);
            if unvisited.is_empty() {
                // Boxed in: pop back to a cell with unvisited neighbours.
                // The stack cannot underflow before every cell is visited on
                // a connected grid.
                current = backtrack.pop().expect("backtracking stack underflow");
                continue;
            }

            let side = unvisited[rng.gen_range(0..unvisited.len())];
            let (nx, ny) = maze
                .neighbour(current.0, current.1, side)
                .expect("unvisited neighbour must exist");
            backtrack.push(current);
            maze.cell_mut(current.0, current.1).remove_wall(side);
            maze.cell_mut(nx, ny).remove_wall(side.opposite());

            current = (nx, ny);
            visited += 1;
            let cell = maze.cell_mut(nx, ny);
            cell.visited = true;
            cell.order = visited;
        }

        maze
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y * self.width + x
    }

    pub fn cell(&self, x: usize, y: usize) -> &Cell {
        &self.cells[self.index(x, y)]
    }

    fn cell_mut(&mut self, x: usize, y: usize) -> &mut Cell {
        let i = self.index(x, y);
        &mut self.cells[i]
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Axial neighbour in `side` direction, or `None` at the grid boundary.
    pub fn neighbour(&self, x: usize, y: usize, side: Direction) -> Option<(usize, usize)> {
        let (dx, dy) = side.delta();
        let nx = x as i32 + dx;
        let ny = y as i32 + dy;
        if nx < 0 || ny < 0 || nx >= self.width as i32 || ny >= self.height as i32 {
            return None;
        }
        Some((nx as usize, ny as usize))
    }

    fn unvisited_neighbours(&self, x: usize, y: usize) -> Vec<Direction> {
        DIRECTIONS
            .iter()
            .copied()
            .filter(|&side| {
                self.neighbour(x, y, side)
                    .is_some_and(|(nx, ny)| !self.cell(nx, ny).visited)
            })
            .collect()
    }

    pub fn start_cell(&self) -> &Cell {
        self.cells
            .iter()
            .find(|c| c.start)
            .expect("generated maze has a start cell")
    }
}
