//! Bone Runner entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{KeyboardEvent, PointerEvent};

    use bone_runner::game::{ANIMATION_TICK_MS, EXPIRY_SWEEP_MS};
    use bone_runner::platform::{IntervalHandle, LocalStore};
    use bone_runner::{ExchangeOutcome, Game, PowerKind, PrimaryOutcome, Tuning};

    type SharedGame = Rc<RefCell<Game<LocalStore>>>;

    thread_local! {
        /// Running interval timers; dropping them clears the intervals
        static TIMERS: RefCell<Vec<IntervalHandle>> = const { RefCell::new(Vec::new()) };
    }

    /// Hand the frame snapshot to the page's renderer, if it registered one
    fn publish(game: &Game<LocalStore>, now: f64) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Ok(callback) = js_sys::Reflect::get(&window, &JsValue::from_str("renderBoneRunner"))
        else {
            return;
        };
        let Some(callback) = callback.dyn_ref::<js_sys::Function>() else {
            return;
        };
        match serde_json::to_string(&game.view(now)) {
            Ok(json) => {
                if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
                    log::warn!("Renderer callback failed: {:?}", e);
                }
            }
            Err(e) => log::warn!("Failed to serialize frame: {e}"),
        }
    }

    fn request_animation_frame(game: SharedGame) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// One display frame; re-queues itself only while the run is live
    fn game_loop(game: SharedGame) {
        let now = js_sys::Date::now();
        let keep_going = {
            let mut g = game.borrow_mut();
            let keep_going = g.frame(now);
            publish(&g, now);
            keep_going
        };

        if keep_going {
            request_animation_frame(game);
        }
    }

    fn primary_action(game: &SharedGame) {
        let now = js_sys::Date::now();
        let outcome = {
            let mut g = game.borrow_mut();
            let outcome = g.primary_action(now);
            publish(&g, now);
            outcome
        };
        if outcome == PrimaryOutcome::Started {
            request_animation_frame(game.clone());
        }
    }

    fn setup_input_handlers(game: SharedGame) {
        let window = web_sys::window().unwrap();

        // Keyboard: space/up/enter = primary, S = shop, I = autopilot
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                match event.key().as_str() {
                    " " | "ArrowUp" | "Enter" => {
                        event.prevent_default();
                        primary_action(&game);
                    }
                    "s" | "S" => {
                        let mut g = game.borrow_mut();
                        let open = g.toggle_shop();
                        log::info!("Shop {}", if open { "opened" } else { "closed" });
                        publish(&g, js_sys::Date::now());
                    }
                    "i" | "I" => {
                        let mut g = game.borrow_mut();
                        let on = !g.autopilot();
                        g.set_autopilot(on);
                        log::info!("Autopilot: {}", on);
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Tap/click = primary, except on the page's own buttons
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let on_button = event
                    .target()
                    .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
                    .and_then(|el| el.closest("button").ok().flatten())
                    .is_some();
                if !on_button {
                    primary_action(&game);
                }
            });
            let _ = window
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Attach `f` to the click of the button with `id`, if the page has it
    fn on_click(
        id: &str,
        game: &SharedGame,
        mut f: impl FnMut(&mut Game<LocalStore>, f64) + 'static,
    ) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        if let Some(btn) = document.get_element_by_id(id) {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let now = js_sys::Date::now();
                let mut g = game.borrow_mut();
                f(&mut g, now);
                publish(&g, now);
            });
            let _ =
                btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_shop_buttons(game: SharedGame) {
        on_click("shop-btn", &game, |g, _| {
            g.toggle_shop();
        });

        for kind in PowerKind::ALL {
            on_click(&format!("buy-{}-btn", kind.id()), &game, move |g, _| {
                if g.buy_power(kind) {
                    log::info!("Bought {}", kind.id());
                } else {
                    log::info!("Can't afford {}", kind.id());
                }
            });
            on_click(&format!("use-{}-btn", kind.id()), &game, move |g, now| {
                if g.use_power(kind, now) {
                    log::info!("Activated {}", kind.id());
                }
            });
        }

        on_click("exchange-btn", &game, |g, _| match g.exchange() {
            ExchangeOutcome::Exchanged { spent, credited } => {
                log::info!("Exchanged {spent} bones for {credited} premium")
            }
            ExchangeOutcome::Insufficient => log::info!(
                "Need {} bones to exchange",
                g.tuning().economy.exchange_rate
            ),
        });
    }

    fn setup_timers(game: SharedGame) {
        let sweep = {
            let game = game.clone();
            IntervalHandle::start(EXPIRY_SWEEP_MS as i32, move || {
                let now = js_sys::Date::now();
                let mut g = game.borrow_mut();
                if !g.expiry_sweep(now).is_empty() {
                    publish(&g, now);
                }
            })
        };
        let anim = IntervalHandle::start(ANIMATION_TICK_MS as i32, move || {
            game.borrow_mut().animation_tick();
        });

        TIMERS.with(|timers| timers.borrow_mut().extend(sweep.into_iter().chain(anim)));

        // Stop the timers when the page goes away
        if let Some(window) = web_sys::window() {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                TIMERS.with(|timers| timers.borrow_mut().clear());
                log::info!("Timers stopped");
            });
            let _ = window
                .add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Bone Runner starting...");

        let seed = js_sys::Date::now() as u64;
        let tuning = Tuning::load();
        let store = LocalStore::open();
        if store.is_available() {
            log::info!("Progress is saved to LocalStorage");
        }
        let game = Rc::new(RefCell::new(Game::new(tuning, store, seed)));
        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(game.clone());
        setup_shop_buttons(game.clone());
        setup_timers(game.clone());
        publish(&game.borrow(), js_sys::Date::now());

        log::info!("Bone Runner ready!");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Bone Runner (native) starting...");
    log::info!("Native mode runs a headless autopilot session - build for wasm32 to play");

    let max_frames: u64 = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(60 * 60 * 5);
    headless_run(max_frames);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play one run with the autopilot at 60 frames per simulated second
#[cfg(not(target_arch = "wasm32"))]
fn headless_run(max_frames: u64) {
    use bone_runner::game::{ANIMATION_TICK_MS, EXPIRY_SWEEP_MS};
    use bone_runner::platform::{Clock, IntervalTimer, ManualClock};
    use bone_runner::{Game, MemoryStore, Tuning};

    const FRAME_MS: f64 = 1000.0 / 60.0;

    let clock = ManualClock::new(0.0);
    let mut game = Game::new(Tuning::load(), MemoryStore::new(), 0x5EED);
    let mut sweep = IntervalTimer::new(EXPIRY_SWEEP_MS, clock.now_ms());
    let mut anim = IntervalTimer::new(ANIMATION_TICK_MS, clock.now_ms());

    game.set_autopilot(true);
    game.primary_action(clock.now_ms());

    let mut frames = 0;
    while frames < max_frames && game.frame(clock.now_ms()) {
        clock.advance(FRAME_MS);
        frames += 1;
        for _ in 0..sweep.poll(clock.now_ms()) {
            game.expiry_sweep(clock.now_ms());
        }
        for _ in 0..anim.poll(clock.now_ms()) {
            game.animation_tick();
        }
    }
    sweep.cancel();
    anim.cancel();

    let state = game.state();
    println!(
        "Ran {} frames: score {}, coins {}, {} obstacles passed ({})",
        frames,
        state.session.score,
        state.session.coins,
        state.stats.obstacles,
        if state.is_game_over() {
            "crashed"
        } else {
            "still running"
        }
    );

    let outcome = game.exchange();
    let (spent, credited) = outcome.amounts();
    println!("Exchange: spent {spent}, credited {credited}");
}
