#![cfg(target_arch = "wasm32")]

use rand::SeedableRng;
use rand::rngs::StdRng;
use wasm_bindgen_test::*;

use maze_dash::game::{GRID_HEIGHT, GRID_WIDTH};
use maze_dash::maze::{DIRECTIONS, Maze};
use maze_dash::render_maze;

wasm_bindgen_test_configure!(run_in_browser);

fn svg_container() -> (web_sys::Document, web_sys::Element) {
    let window = web_sys::window().expect("no window");
    let document = window.document().expect("no document");
    let root = document
        .create_element_ns(Some("http://www.w3.org/2000/svg"), "svg")
        .expect("create svg");
    (document, root)
}

#[wasm_bindgen_test]
fn renders_one_group_per_cell_plus_markers() {
    let (document, root) = svg_container();
    let maze = Maze::generate(GRID_WIDTH, GRID_HEIGHT, &mut StdRng::seed_from_u64(1));

    let view = render_maze(&document, &root, &maze).expect("render");

    // 100 cell groups, plus the sight line and the player marker.
    assert_eq!(root.child_element_count(), (GRID_WIDTH * GRID_HEIGHT) as u32 + 2);
    assert_eq!(view.path_cells.len(), GRID_WIDTH * GRID_HEIGHT - 1);
    assert_eq!(view.player.tag_name(), "circle");
    assert_eq!(view.line.tag_name(), "line");
    assert_eq!(view.player.get_attribute("transform").as_deref(), Some("translate(20 20)"));
}

#[wasm_bindgen_test]
fn wall_rect_count_matches_maze() {
    let (document, root) = svg_container();
    let maze = Maze::generate(GRID_WIDTH, GRID_HEIGHT, &mut StdRng::seed_from_u64(2));
    render_maze(&document, &root, &maze).expect("render");

    let expected: usize = maze
        .cells()
        .map(|cell| DIRECTIONS.iter().filter(|&&side| cell.wall(side)).count())
        .sum();

    let mut walls = 0;
    let groups = root.children();
    for i in 0..groups.length() {
        let group = groups.item(i).expect("group");
        let children = group.children();
        for j in 0..children.length() {
            let child = children.item(j).expect("child");
            if child.get_attribute("class").as_deref() == Some("wall") {
                walls += 1;
            }
        }
    }
    assert_eq!(walls, expected);
}

#[wasm_bindgen_test]
fn rerender_replaces_previous_maze() {
    let (document, root) = svg_container();
    let first = Maze::generate(GRID_WIDTH, GRID_HEIGHT, &mut StdRng::seed_from_u64(3));
    render_maze(&document, &root, &first).expect("render first");
    let count_after_first = root.child_element_count();

    let second = Maze::generate(GRID_WIDTH, GRID_HEIGHT, &mut StdRng::seed_from_u64(4));
    render_maze(&document, &root, &second).expect("render second");

    assert_eq!(root.child_element_count(), count_after_first);
}
