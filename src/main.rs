//! Calendar Breakout entry point
//!
//! In the browser: wires DOM input, buttons and file import to a session and
//! runs the fixed-step loop. Natively: imports a calendar and plays a
//! headless demo game.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{
        CanvasRenderingContext2d, HtmlCanvasElement, HtmlInputElement, KeyboardEvent,
        PointerEvent,
    };

    use calendar_breakout::audio::AudioManager;
    use calendar_breakout::consts::*;
    use calendar_breakout::error::ImportError;
    use calendar_breakout::render::{DrawCommand, TextAlign, scene};
    use calendar_breakout::sim::{CanvasSize, InputState, Session, tick};
    use calendar_breakout::{Settings, Tuning, sample_events};

    /// Vertical space reserved for the control bar above the canvas
    const CONTROLS_HEIGHT: f64 = 120.0;

    /// Game instance holding all state
    struct Game {
        session: Session,
        input: InputState,
        settings: Settings,
        audio: AudioManager,
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
        accumulator: f32,
        last_time: f64,
    }

    impl Game {
        /// Run simulation steps for `dt` seconds of real time
        fn update(&mut self, dt: f32, now_ms: f64) {
            self.accumulator += dt.min(0.1);

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                tick(&mut self.session, &self.input, now_ms);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clicks are one-shot
                self.input.click = None;
            }

            let events = self.session.drain_events();
            if self.settings.sound_enabled {
                self.audio
                    .play_events(&events, self.settings.effective_volume());
            }
        }

        /// Paint the current scene onto the canvas
        fn render(&self) {
            let ctx = &self.ctx;
            for cmd in scene(&self.session) {
                match cmd {
                    DrawCommand::FillRect { rect, color } => {
                        ctx.set_fill_style_str(&color.css());
                        ctx.fill_rect(
                            rect.x as f64,
                            rect.y as f64,
                            rect.width as f64,
                            rect.height as f64,
                        );
                    }
                    DrawCommand::StrokeRect { rect, color } => {
                        ctx.set_stroke_style_str(&color.css());
                        ctx.stroke_rect(
                            rect.x as f64,
                            rect.y as f64,
                            rect.width as f64,
                            rect.height as f64,
                        );
                    }
                    DrawCommand::Line { from, to, color } => {
                        ctx.set_stroke_style_str(&color.css());
                        ctx.begin_path();
                        ctx.move_to(from.x as f64, from.y as f64);
                        ctx.line_to(to.x as f64, to.y as f64);
                        ctx.stroke();
                    }
                    DrawCommand::Circle {
                        center,
                        radius,
                        color,
                    } => {
                        ctx.set_fill_style_str(&color.css());
                        ctx.begin_path();
                        let _ = ctx.arc(
                            center.x as f64,
                            center.y as f64,
                            radius as f64,
                            0.0,
                            std::f64::consts::TAU,
                        );
                        ctx.fill();
                    }
                    DrawCommand::Text {
                        pos,
                        text,
                        size,
                        color,
                        align,
                    } => {
                        ctx.set_fill_style_str(&color.css());
                        ctx.set_font(&format!("{}px sans-serif", size));
                        ctx.set_text_align(match align {
                            TextAlign::Left => "left",
                            TextAlign::Center => "center",
                            TextAlign::Right => "right",
                        });
                        let _ = ctx.fill_text(&text, pos.x as f64, pos.y as f64);
                    }
                }
            }
        }

        /// Pointer position in canvas pixels (the canvas may be CSS-scaled)
        fn canvas_point(&self, event: &PointerEvent) -> Vec2 {
            let sx = self.canvas.width() as f32 / self.canvas.client_width().max(1) as f32;
            let sy = self.canvas.height() as f32 / self.canvas.client_height().max(1) as f32;
            Vec2::new(event.offset_x() as f32 * sx, event.offset_y() as f32 * sy)
        }

        fn apply_canvas_size(&mut self, size: CanvasSize) {
            self.canvas.set_width(size.width as u32);
            self.canvas.set_height(size.height as u32);
            self.session.resize(size);
        }
    }

    fn viewport_size() -> CanvasSize {
        let available = web_sys::window()
            .and_then(|w| w.inner_height().ok())
            .and_then(|h| h.as_f64())
            .unwrap_or(800.0);
        CanvasSize::for_viewport_height((available - CONTROLS_HEIGHT) as f32)
    }

    /// Show a message in the notice area (empty string hides it)
    fn show_notice(message: &str) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(el) = document.get_element_by_id("notice") {
            el.set_text_content(Some(message));
            let _ = el.set_attribute("class", if message.is_empty() { "hidden" } else { "" });
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Calendar Breakout starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into()?;

        let size = viewport_size();
        canvas.set_width(size.width as u32);
        canvas.set_height(size.height as u32);

        let seed = js_sys::Date::now() as u64;
        let session = Session::new(sample_events(), size, Tuning::default(), seed);
        log::info!("Session created with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            session,
            input: InputState::default(),
            settings: Settings::default(),
            audio: AudioManager::new(),
            canvas: canvas.clone(),
            ctx,
            accumulator: 0.0,
            last_time: 0.0,
        }));

        setup_keyboard(game.clone())?;
        setup_pointer(&canvas, game.clone())?;
        setup_controls(game.clone())?;
        setup_resize(game.clone())?;

        request_animation_frame(game);
        log::info!("Calendar Breakout running!");
        Ok(())
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        let down = {
            let game = game.clone();
            Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" => g.input.left = true,
                    "ArrowRight" => g.input.right = true,
                    _ => return,
                }
                event.prevent_default();
                g.audio.resume();
            })
        };
        window.add_event_listener_with_callback("keydown", down.as_ref().unchecked_ref())?;
        down.forget();

        let up = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let mut g = game.borrow_mut();
            match event.key().as_str() {
                "ArrowLeft" => g.input.left = false,
                "ArrowRight" => g.input.right = false,
                _ => {}
            }
        });
        window.add_event_listener_with_callback("keyup", up.as_ref().unchecked_ref())?;
        up.forget();

        Ok(())
    }

    fn setup_pointer(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        // Press: a click (restart region) and the start of a drag
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                let point = g.canvas_point(&event);
                g.input.click = Some(point);
                g.input.pointer_x = Some(point.x);
                g.audio.resume();
            });
            canvas.add_event_listener_with_callback(
                "pointerdown",
                closure.as_ref().unchecked_ref(),
            )?;
            closure.forget();
        }

        // Drag
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let mut g = game.borrow_mut();
                if event.buttons() != 0 || event.pointer_type() == "touch" {
                    let point = g.canvas_point(&event);
                    g.input.pointer_x = Some(point.x);
                }
            });
            canvas.add_event_listener_with_callback(
                "pointermove",
                closure.as_ref().unchecked_ref(),
            )?;
            closure.forget();
        }

        // Release
        for name in ["pointerup", "pointercancel", "pointerleave"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                game.borrow_mut().input.pointer_x = None;
            });
            canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_controls(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or("no document")?;

        // Calendar file picker
        if let Some(el) = document.get_element_by_id("ics-file") {
            let input: HtmlInputElement = el.dyn_into()?;
            let game = game.clone();
            let input_clone = input.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let Some(file) = input_clone.files().and_then(|files| files.get(0)) else {
                    return;
                };
                let game = game.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    let result = match JsFuture::from(file.text()).await {
                        Ok(text) => {
                            let text = text.as_string().unwrap_or_default();
                            game.borrow_mut().session.load_ical(&text)
                        }
                        Err(e) => Err(ImportError::Read(format!("{:?}", e))),
                    };
                    match result {
                        Ok(count) => {
                            log::info!("Loaded {} events from {}", count, file.name());
                            show_notice("");
                        }
                        Err(e) => {
                            log::warn!("Import of {} failed: {}", file.name(), e);
                            show_notice(&e.to_string());
                        }
                    }
                });
            });
            input.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Back to the sample week
        if let Some(btn) = document.get_element_by_id("reset-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().session.restore_samples();
                show_notice("");
            });
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Sound toggle
        if let Some(btn) = document.get_element_by_id("sound-btn") {
            let game = game.clone();
            let label_target = btn.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                g.settings.toggle_sound();
                g.audio.resume();
                label_target.set_text_content(Some(g.settings.sound_label()));
            });
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Start again
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().session.restart();
            });
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_resize(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().apply_canvas_size(viewport_size());
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, js_sys::Date::now());
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use calendar_breakout::{ImportError, Tuning, import, sample_events};

    env_logger::init();
    log::info!("Calendar Breakout (native) starting...");
    log::info!("The playable version runs in the browser - build for wasm32 with `trunk serve`");

    let mut args = std::env::args().skip(1);

    let events = match args.next() {
        Some(path) => match std::fs::read_to_string(&path)
            .map_err(|e| ImportError::Read(format!("{}: {}", path, e)))
            .and_then(|text| import(&text))
        {
            Ok(events) => events,
            Err(e) => {
                log::warn!("{} - using the sample week instead", e);
                sample_events()
            }
        },
        None => sample_events(),
    };

    let tuning = match args.next() {
        Some(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("Ignoring tuning file {}: {}", path, e);
                Tuning::default()
            }
        },
        None => Tuning::default(),
    };

    println!("{} bricks:", events.len());
    for e in &events {
        println!(
            "  day {} {:>5.2}-{:<5.2} {}",
            e.day, e.start, e.end, e.title
        );
    }

    demo::play(events, tuning);
}

/// Headless autopilot game, for checking balance without a browser
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use calendar_breakout::CalendarEvent;
    use calendar_breakout::Tuning;
    use calendar_breakout::consts::SIM_DT;
    use calendar_breakout::sim::{CanvasSize, GameEvent, GamePhase, InputState, Session, tick};

    /// Three minutes of simulated play
    const MAX_STEPS: u32 = 60 * 180;

    pub fn play(events: Vec<CalendarEvent>, tuning: Tuning) {
        let mut session = Session::new(events, CanvasSize::default(), tuning, 2024);
        let mut bricks_broken = 0u32;
        let mut paddle_hits = 0u32;

        for step in 0..MAX_STEPS {
            // Track the ball, drifting so it doesn't bounce straight up forever
            let drift = (step as f32 * 0.013).sin() * 0.35 * session.paddle.width;
            let input = InputState {
                pointer_x: Some(session.ball.pos.x + drift),
                ..Default::default()
            };
            tick(&mut session, &input, step as f64 * SIM_DT as f64 * 1000.0);

            for event in session.drain_events() {
                match event {
                    GameEvent::BrickBroken { .. } => bricks_broken += 1,
                    GameEvent::PaddleHit => paddle_hits += 1,
                    GameEvent::LevelCleared { level } => println!("level {} cleared", level),
                    _ => {}
                }
            }

            if session.phase == GamePhase::GameOver {
                break;
            }
        }

        println!(
            "demo finished: {:?}, level {}, score {}, {} bricks broken, {} paddle hits",
            session.phase, session.level, session.score, bricks_broken, paddle_hits
        );
    }
}
