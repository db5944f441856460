//! Ringside entry point
//!
//! Browser build: wires the canvas, hit overlay and HUD to one fight.
//! Native build: runs one headless fight on a synthetic 60 Hz display.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_fight {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlElement, MouseEvent};

    use ringside::effects::EffectController;
    use ringside::hud::HudView;
    use ringside::platform::web::{CanvasSurface, HitOverlay, OverlaySink, RafHost, TimeoutTimer};
    use ringside::sim::{SimulationClient, SparringBout, SparringClient};
    use ringside::{Catalog, FightConfig, FightLifecycle, FightOutcome, FighterId};

    type WebFight = FightLifecycle<SparringBout, RafHost, TimeoutTimer, CanvasSurface>;

    const DEFAULT_FIGHTERS: [FighterId; 2] = [FighterId(25), FighterId(11)];

    fn document() -> Document {
        web_sys::window()
            .and_then(|w| w.document())
            .expect("no document")
    }

    fn now() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    /// Fighter numbers from `?f0=25&f1=11`, falling back to the default pair
    fn fighters_from_query(search: &str) -> [FighterId; 2] {
        let mut ids = DEFAULT_FIGHTERS;
        for pair in search.trim_start_matches('?').split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            let Ok(number) = value.parse::<u32>() else {
                continue;
            };
            match key {
                "f0" => ids[0] = FighterId(number),
                "f1" => ids[1] = FighterId(number),
                _ => {}
            }
        }
        ids
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn show_status(document: &Document, text: &str) {
        set_text(document, "status", text);
        if let Some(el) = document.get_element_by_id("status") {
            let _ = el.set_attribute("class", "");
        }
    }

    fn update_hud(document: &Document, fight: &WebFight) {
        let Some(snapshot) = fight.latest() else {
            return;
        };
        let view = HudView::from_snapshot(snapshot, fight.fighters());
        for (i, side) in view.sides.iter().enumerate() {
            set_text(document, &format!("p{}-name", i), &side.tag);
            let pips: String = side
                .pips
                .iter()
                .map(|p| if *p { '\u{25A0}' } else { '\u{25A1}' })
                .collect();
            set_text(document, &format!("p{}-health", i), &pips);

            if let Some(el) = document.get_element_by_id(&format!("p{}-energy", i)) {
                let _ = el.set_attribute(
                    "style",
                    &format!(
                        "width: {:.0}%; background: {}",
                        side.energy * 100.0,
                        side.color.to_hex()
                    ),
                );
            }
            if let Some(el) = document.get_element_by_id(&format!("p{}-heading", i)) {
                let _ = el.set_attribute(
                    "style",
                    &format!("transform: rotate({:.3}rad)", side.heading),
                );
            }
            if let Some(el) = document.get_element_by_id(&format!("p{}-body", i)) {
                let _ = el.set_attribute(
                    "style",
                    &format!("transform: rotate({:.3}rad)", side.rotation),
                );
            }
        }
    }

    fn show_outcome(catalog: &Catalog, outcome: FightOutcome) {
        let document = document();
        let text = match outcome {
            FightOutcome::Winner { fighter, .. } => catalog
                .lookup(fighter)
                .map(|f| format!("{} WINS", f.tag()))
                .unwrap_or_else(|| format!("FIGHTER {} WINS", fighter)),
            FightOutcome::Undecided { health } => format!("DRAW ({} HP EACH)", health),
        };
        log::info!("{}", text);
        set_text(&document, "result-text", &text);
        if let Some(el) = document.get_element_by_id("result") {
            let _ = el.set_attribute("class", "");
        }
    }

    fn on_frame(fight: &Rc<RefCell<WebFight>>, time: f64) {
        let mut f = fight.borrow_mut();
        match f.on_frame(time) {
            Ok(_) => update_hud(&document(), &f),
            Err(e) => show_status(&document(), &format!("Fight stopped: {}", e)),
        }
    }

    fn setup_fight_button(fight: Rc<RefCell<WebFight>>, client: Rc<SparringClient>) {
        let document = document();
        let Some(btn) = document.get_element_by_id("fight-btn") else {
            log::warn!("No fight button; confirming immediately");
            confirm(fight, client);
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            confirm(fight.clone(), client.clone());
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn confirm(fight: Rc<RefCell<WebFight>>, client: Rc<SparringClient>) {
        wasm_bindgen_futures::spawn_local(async move {
            // The lifecycle is not borrowed while the engine loads
            let ids = match fight.borrow_mut().begin_confirm() {
                Ok(ids) => ids,
                Err(_) => return,
            };
            let document = document();
            show_status(&document, "Loading fighters...");

            let loaded = client.construct(ids[0], ids[1]).await;
            let mut f = fight.borrow_mut();
            match f.activate(loaded, now()) {
                Ok(()) => {
                    if let Some(el) = document.get_element_by_id("status") {
                        let _ = el.set_attribute("class", "hidden");
                    }
                    if let Some(btn) = document.get_element_by_id("fight-btn") {
                        let _ = btn.set_attribute("class", "hidden");
                    }
                    update_hud(&document, &f);
                }
                Err(e) => show_status(&document, &format!("Could not start fight: {}", e)),
            }
        });
    }

    fn setup_teardown(fight: Rc<RefCell<WebFight>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut()>::new(move || {
            fight.borrow_mut().teardown();
        });
        let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Ringside starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let config = FightConfig::default();
        let catalog = Rc::new(Catalog::builtin());
        let search = window.location().search().unwrap_or_default();
        let ids = fighters_from_query(&search);

        let surface = match CanvasSurface::acquire(&canvas, config.surface_size) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("{}", e);
                show_status(&document, &e.to_string());
                return;
            }
        };

        let effects = Rc::new(RefCell::new(EffectController::new(config.hit_effect_ms)));
        let ring: HtmlElement = document
            .get_element_by_id("ring")
            .and_then(|el| el.dyn_into().ok())
            .expect("no ring container");
        let overlay = Rc::new(RefCell::new(HitOverlay::new(
            document.clone(),
            ring,
            effects,
            config.scale(),
        )));

        let host = RafHost::new(window.clone());
        let announce_catalog = catalog.clone();
        let fight: WebFight = match FightLifecycle::new(
            &catalog,
            ids,
            config,
            host.clone(),
            TimeoutTimer::new(window.clone()),
            surface,
        ) {
            Ok(fight) => fight
                .with_effects(Box::new(OverlaySink(overlay)))
                .on_fight_ended(move |outcome| show_outcome(&announce_catalog, outcome)),
            Err(e) => {
                log::error!("{}", e);
                show_status(&document, &e.to_string());
                return;
            }
        };
        let fight = Rc::new(RefCell::new(fight));
        update_hud(&document, &fight.borrow());

        let weak = Rc::downgrade(&fight);
        host.connect(move |time| {
            if let Some(fight) = weak.upgrade() {
                on_frame(&fight, time);
            }
        });

        let seed = js_sys::Date::now() as u64;
        log::info!("Sparring seed: {}", seed);
        let client = Rc::new(SparringClient::new(seed));

        setup_fight_button(fight.clone(), client);
        setup_teardown(fight);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_fight::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use futures::executor::block_on;

    use ringside::effects::EffectController;
    use ringside::hud::HudView;
    use ringside::platform::{ManualFrameHost, ManualTimer};
    use ringside::renderer::CommandRecorder;
    use ringside::sim::{SparringBout, SparringClient};
    use ringside::{Catalog, FightConfig, FightError, FightLifecycle, FightOutcome, FighterId};

    /// Display refresh of the synthetic host (ms)
    const REFRESH_MS: f64 = 1000.0 / 60.0;

    pub fn run(seed: u64) -> Result<(), FightError> {
        let catalog = Catalog::builtin();
        let config = FightConfig::default();
        let host = ManualFrameHost::new();
        let timer = ManualTimer::new();
        let effects = Rc::new(RefCell::new(EffectController::new(config.hit_effect_ms)));
        let announced = Rc::new(Cell::new(None::<FightOutcome>));

        let sink = announced.clone();
        let mut fight: FightLifecycle<SparringBout, _, _, _> = FightLifecycle::new(
            &catalog,
            [FighterId(25), FighterId(11)],
            config,
            host.clone(),
            timer.clone(),
            CommandRecorder::new(),
        )?
        .with_effects(Box::new(effects.clone()))
        .on_fight_ended(move |outcome| sink.set(Some(outcome)));

        log::info!("Sparring seed: {}", seed);
        block_on(fight.confirm(&SparringClient::new(seed), 0.0))?;

        let mut now = 0.0;
        let mut last_hud = f64::NEG_INFINITY;
        while host.take_pending().is_some() {
            now += REFRESH_MS;
            timer.advance(REFRESH_MS);
            fight.on_frame(now)?;

            if now - last_hud >= 1000.0 {
                if let Some(snapshot) = fight.latest() {
                    log::info!("{}", HudView::from_snapshot(snapshot, fight.fighters()));
                }
                last_hud = now;
            }
        }

        timer.advance(fight.config().resolution_delay_ms);
        log::info!(
            "{} frames drawn over {:.1} s, {} hits",
            fight.surface().frames(),
            now / 1000.0,
            effects.borrow().triggered()
        );

        match announced.get() {
            Some(FightOutcome::Winner { fighter, .. }) => {
                let name = catalog.get(fighter)?.tag();
                println!("{} wins", name);
            }
            Some(FightOutcome::Undecided { health }) => {
                println!("Draw: both fighters on {} health", health)
            }
            None => println!("Fight ended without a result"),
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Ringside (native) starting...");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(48);

    if let Err(e) = headless::run(seed) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main
}
