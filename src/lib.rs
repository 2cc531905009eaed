//! Browser maze game: a procedurally generated perfect maze rendered as SVG,
//! navigated by point-and-click under a countdown timer.
//!
//! The host page provides three elements: an `<svg id="maze">` container, a
//! `#scoreboard` text sink, and a `#timer` text sink. Maze generation,
//! collision, and round state live in the `maze`, `geometry`, and `game`
//! modules and run the same natively as in the browser; this file is the
//! wasm shell that wires pointer events and timers to the controller.

use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, PointerEvent, Window};

pub mod game;
pub mod geometry;
pub mod maze;

use crate::game::{
    ClickOutcome, FEEDBACK_DELAY_MS, GRID_HEIGHT, GRID_WIDTH, Game, INPUT_INSET, LOSE_FILL,
    PENALTY_FILL, PENALTY_MS, PLAYER_FILL, PLAYER_STROKE, REGENERATE_DELAY_MS, RoundLayout,
    START_POSITION, Tick, WIN_FILL, cell_rect, wall_rect,
};
use crate::geometry::{Point, Rect, Segment};
use crate::maze::{DIRECTIONS, Maze};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Live element handles for one rendered maze. Replaced wholesale when the
/// next maze is rendered.
pub struct MazeView {
    pub player: Element,
    pub line: Element,
    /// Background rects of the non-start cells, recolored for win/lose
    /// feedback.
    pub path_cells: Vec<Element>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum RoundEnd {
    Won,
    Lost,
}

struct AppState {
    document: Document,
    maze_root: Element,
    scoreboard: Element,
    timer_display: Element,
    game: Game,
    view: Option<MazeView>,
    cursor: Point,
    round_end: Option<RoundEnd>,
    countdown_handle: Option<i32>,
}

type Shared = Rc<RefCell<AppState>>;
type CallbackHolder = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

fn window() -> Window {
    web_sys::window().expect("missing window")
}

fn js_value_to_string(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

fn svg_element(document: &Document, name: &str) -> Result<Element, JsValue> {
    document.create_element_ns(Some(SVG_NS), name)
}

fn rect_element(document: &Document, rect: &Rect, class: &str) -> Result<Element, JsValue> {
    let el = svg_element(document, "rect")?;
    el.set_attribute("class", class)?;
    el.set_attribute("x", &rect.x.to_string())?;
    el.set_attribute("y", &rect.y.to_string())?;
    el.set_attribute("width", &rect.width.to_string())?;
    el.set_attribute("height", &rect.height.to_string())?;
    Ok(el)
}

fn set_player_position(player: &Element, position: Point, penalty: bool) -> Result<(), JsValue> {
    let translate = format!("translate({} {})", position.x, position.y);
    if penalty {
        player.set_attribute("transform", &format!("{} scale(1.5)", translate))?;
        player.set_attribute("fill", PENALTY_FILL)
    } else {
        player.set_attribute("transform", &translate)?;
        player.set_attribute("fill", PLAYER_FILL)
    }
}

fn set_line_position(line: &Element, sight: Segment) -> Result<(), JsValue> {
    line.set_attribute("x1", &sight.a.x.to_string())?;
    line.set_attribute("y1", &sight.a.y.to_string())?;
    line.set_attribute("x2", &sight.b.x.to_string())?;
    line.set_attribute("y2", &sight.b.y.to_string())
}

/// Renders `maze` into `root`: per cell, one background rect plus one rect
/// per present wall, then the line-of-sight line and the player marker.
/// Previous contents are discarded.
pub fn render_maze(document: &Document, root: &Element, maze: &Maze) -> Result<MazeView, JsValue> {
    root.set_inner_html("");

    let mut path_cells = Vec::new();
    for cell in maze.cells() {
        let group = svg_element(document, "g")?;
        group.set_attribute("id", &format!("{}-{}", cell.x, cell.y))?;

        let class = if cell.start { "node start" } else { "node path" };
        let node = rect_element(document, &cell_rect(cell.x, cell.y), class)?;
        if !cell.start {
            path_cells.push(node.clone());
        }
        group.append_child(&node)?;

        for side in DIRECTIONS {
            if cell.wall(side) {
                let wall = rect_element(document, &wall_rect(cell.x, cell.y, side), "wall")?;
                group.append_child(&wall)?;
            }
        }
        root.append_child(&group)?;
    }

    let line = svg_element(document, "line")?;
    line.set_attribute("class", "line")?;
    line.set_attribute("style", "stroke:rgb(255,0,0);stroke-width:2")?;
    set_line_position(
        &line,
        Segment::new(
            START_POSITION,
            Point::new(START_POSITION.x + 10.0, START_POSITION.y),
        ),
    )?;
    root.append_child(&line)?;

    let player = svg_element(document, "circle")?;
    player.set_attribute("class", "player")?;
    player.set_attribute("cx", "0")?;
    player.set_attribute("cy", "0")?;
    player.set_attribute("r", "8")?;
    player.set_attribute("stroke", PLAYER_STROKE)?;
    player.set_attribute("stroke-width", "2")?;
    set_player_position(&player, START_POSITION, false)?;
    root.append_child(&player)?;

    Ok(MazeView {
        player,
        line,
        path_cells,
    })
}

/// Maps pointer client coordinates into maze space.
fn local_point(maze_root: &Element, pointer: &PointerEvent) -> Point {
    let rect = maze_root.get_bounding_client_rect();
    Point::new(
        pointer.client_x() as f64 - rect.left() - INPUT_INSET,
        pointer.client_y() as f64 - rect.top() - INPUT_INSET,
    )
}

fn update_scoreboard(st: &AppState) {
    st.scoreboard.set_text_content(Some(&st.game.score().line()));
}

fn update_timer(st: &AppState) {
    st.timer_display.set_text_content(Some(&st.game.timer_line()));
}

fn schedule_timeout(holder: &CallbackHolder, ms: i32) {
    if let Some(cb) = holder.borrow().as_ref() {
        let _ = window()
            .set_timeout_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), ms);
    }
}

fn restart_countdown(st: &mut AppState, tick: &CallbackHolder) {
    if let Some(handle) = st.countdown_handle.take() {
        window().clear_interval_with_handle(handle);
    }
    if let Some(cb) = tick.borrow().as_ref() {
        if let Ok(handle) = window().set_interval_with_callback_and_timeout_and_arguments_0(
            cb.as_ref().unchecked_ref(),
            1000,
        ) {
            st.countdown_handle = Some(handle);
        }
    }
}

/// Generates a fresh maze, renders it, and opens a new round.
fn start_round(state: &Shared, tick: &CallbackHolder) -> Result<(), JsValue> {
    let maze = Maze::generate(GRID_WIDTH, GRID_HEIGHT, &mut rand::thread_rng());
    let layout = RoundLayout::of(&maze);

    let mut st = state.borrow_mut();
    st.game.begin_round(&layout);
    let view = render_maze(&st.document, &st.maze_root, &maze)?;
    st.view = Some(view);
    st.round_end = None;
    update_scoreboard(&st);
    restart_countdown(&mut st, tick);
    Ok(())
}

/// Stops the countdown and schedules the win/lose recoloring and the next
/// maze. Clicks stay ignored until the new round opens.
fn end_round(
    st: &mut AppState,
    outcome: RoundEnd,
    feedback: &CallbackHolder,
    regenerate: &CallbackHolder,
) {
    st.round_end = Some(outcome);
    if let Some(handle) = st.countdown_handle.take() {
        window().clear_interval_with_handle(handle);
    }
    update_scoreboard(st);
    schedule_timeout(feedback, FEEDBACK_DELAY_MS);
    schedule_timeout(regenerate, REGENERATE_DELAY_MS);
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    if let Err(err) = start_impl() {
        let message = format!("fatal: {}", js_value_to_string(&err));

        if let Some(win) = web_sys::window() {
            if let Some(doc) = win.document() {
                if let Some(el) = doc.document_element() {
                    let _ = el.set_attribute("data-game-status", "error");
                }
            }
        }

        web_sys::console::error_1(&JsValue::from_str(&message));
    }
}

fn start_impl() -> Result<(), JsValue> {
    let win = window();
    let document = win
        .document()
        .ok_or_else(|| JsValue::from_str("missing document"))?;

    let maze_root = document
        .get_element_by_id("maze")
        .ok_or_else(|| JsValue::from_str("Missing maze container"))?;
    let scoreboard = document
        .get_element_by_id("scoreboard")
        .ok_or_else(|| JsValue::from_str("Missing scoreboard"))?;
    let timer_display = document
        .get_element_by_id("timer")
        .ok_or_else(|| JsValue::from_str("Missing timer display"))?;

    let state: Shared = Rc::new(RefCell::new(AppState {
        document: document.clone(),
        maze_root,
        scoreboard,
        timer_display,
        game: Game::new(),
        view: None,
        cursor: START_POSITION,
        round_end: None,
        countdown_handle: None,
    }));

    // The deferred callbacks reference each other (the countdown schedules
    // the regeneration, which restarts the countdown), so they live in
    // holders created up front and filled below.
    let tick_cb: CallbackHolder = Rc::new(RefCell::new(None));
    let penalty_cb: CallbackHolder = Rc::new(RefCell::new(None));
    let feedback_cb: CallbackHolder = Rc::new(RefCell::new(None));
    let regenerate_cb: CallbackHolder = Rc::new(RefCell::new(None));

    // Penalty over: unlock movement and restore the player's appearance.
    *penalty_cb.borrow_mut() = Some(Closure::wrap(Box::new({
        let state = Rc::clone(&state);
        move || {
            let mut st = state.borrow_mut();
            st.game.clear_blocked();
            let position = st.game.player();
            if let Some(view) = &st.view {
                let _ = set_player_position(&view.player, position, false);
            }
        }
    }) as Box<dyn FnMut()>));

    // Round-end feedback: flood the path cells green or red.
    *feedback_cb.borrow_mut() = Some(Closure::wrap(Box::new({
        let state = Rc::clone(&state);
        move || {
            let st = state.borrow();
            let fill = match st.round_end {
                Some(RoundEnd::Won) => WIN_FILL,
                Some(RoundEnd::Lost) => LOSE_FILL,
                None => return,
            };
            if let Some(view) = &st.view {
                for cell in &view.path_cells {
                    let _ = cell.set_attribute("style", &format!("fill: {}", fill));
                }
            }
        }
    }) as Box<dyn FnMut()>));

    *regenerate_cb.borrow_mut() = Some(Closure::wrap(Box::new({
        let state = Rc::clone(&state);
        let tick_cb = Rc::clone(&tick_cb);
        move || {
            if let Err(err) = start_round(&state, &tick_cb) {
                web_sys::console::error_1(&err);
            }
        }
    }) as Box<dyn FnMut()>));

    *tick_cb.borrow_mut() = Some(Closure::wrap(Box::new({
        let state = Rc::clone(&state);
        let feedback_cb = Rc::clone(&feedback_cb);
        let regenerate_cb = Rc::clone(&regenerate_cb);
        move || {
            let mut st = state.borrow_mut();
            match st.game.tick() {
                Tick::Running(_) => update_timer(&st),
                Tick::Expired => {
                    update_timer(&st);
                    end_round(&mut st, RoundEnd::Lost, &feedback_cb, &regenerate_cb);
                }
                Tick::Idle => {}
            }
        }
    }) as Box<dyn FnMut()>));

    let on_pointerdown = Closure::wrap(Box::new({
        let state = Rc::clone(&state);
        let penalty_cb = Rc::clone(&penalty_cb);
        let feedback_cb = Rc::clone(&feedback_cb);
        let regenerate_cb = Rc::clone(&regenerate_cb);
        move |event: Event| {
            let Some(pointer) = event.dyn_ref::<PointerEvent>() else {
                return;
            };

            let mut st = state.borrow_mut();
            let target = local_point(&st.maze_root, pointer);
            match st.game.pointer_click(target) {
                ClickOutcome::Ignored => {}
                ClickOutcome::Rejected => {
                    let position = st.game.player();
                    if let Some(view) = &st.view {
                        let _ = set_player_position(&view.player, position, true);
                    }
                    update_scoreboard(&st);
                    schedule_timeout(&penalty_cb, PENALTY_MS);
                }
                ClickOutcome::Moved { to, won } => {
                    if let Some(view) = &st.view {
                        let _ = set_player_position(&view.player, to, false);
                    }
                    update_scoreboard(&st);
                    if won {
                        end_round(&mut st, RoundEnd::Won, &feedback_cb, &regenerate_cb);
                    }
                }
            }
        }
    }) as Box<dyn FnMut(_)>);

    state
        .borrow()
        .maze_root
        .add_event_listener_with_callback("pointerdown", on_pointerdown.as_ref().unchecked_ref())?;
    on_pointerdown.forget();

    // Pointer tracking is coalesced to one line-of-sight update per frame;
    // the latest cursor position wins.
    let raf_holder: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let on_pointermove = Closure::wrap(Box::new({
        let state = Rc::clone(&state);
        let raf_holder = Rc::clone(&raf_holder);
        move |event: Event| {
            let Some(pointer) = event.dyn_ref::<PointerEvent>() else {
                return;
            };

            {
                let mut st = state.borrow_mut();
                let cursor = local_point(&st.maze_root, pointer);
                st.cursor = cursor;
            }

            if raf_holder.borrow().is_some() {
                return;
            }

            let state_cb = Rc::clone(&state);
            let raf_holder_cb = Rc::clone(&raf_holder);
            let cb = Closure::wrap(Box::new(move |_ts: f64| {
                raf_holder_cb.borrow_mut().take();

                let st = state_cb.borrow();
                let sight = st.game.line_of_sight(st.cursor);
                if let Some(view) = &st.view {
                    let _ = set_line_position(&view.line, sight);
                }
            }) as Box<dyn FnMut(f64)>);

            if window()
                .request_animation_frame(cb.as_ref().unchecked_ref())
                .is_ok()
            {
                *raf_holder.borrow_mut() = Some(cb);
            }
        }
    }) as Box<dyn FnMut(_)>);

    state
        .borrow()
        .maze_root
        .add_event_listener_with_callback("pointermove", on_pointermove.as_ref().unchecked_ref())?;
    on_pointermove.forget();

    // First round starts immediately; later rounds arrive via the
    // regeneration timeout.
    start_round(&state, &tick_cb)?;

    Ok(())
}
