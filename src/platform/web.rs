//! Browser platform: requestAnimationFrame, setTimeout, Canvas 2D, DOM overlay

use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement, Window};

use super::{FrameHost, FrameRequest, Timer, TimerId};
use crate::color::Color;
use crate::effects::{EffectController, EffectFrame, EffectSink};
use crate::error::SurfaceError;
use crate::fight::HitEvent;
use crate::renderer::Surface;

/// Side of a hit effect element before scaling (px)
const EFFECT_SIZE_PX: f32 = 500.0;

fn js_err(value: JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value))
}

type FrameTarget = Rc<RefCell<Option<Rc<dyn Fn(f64)>>>>;

/// Frame host backed by `requestAnimationFrame`
///
/// Timestamps go to whatever was last passed to `connect`. A cancelled
/// request never fires, so its closure is never freed; that is one closure
/// per fight.
#[derive(Clone)]
pub struct RafHost {
    window: Window,
    target: FrameTarget,
}

impl RafHost {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            target: Rc::new(RefCell::new(None)),
        }
    }

    /// Route frame timestamps to `on_frame`
    pub fn connect(&self, on_frame: impl Fn(f64) + 'static) {
        *self.target.borrow_mut() = Some(Rc::new(on_frame));
    }
}

impl FrameHost for RafHost {
    fn request_frame(&mut self) -> FrameRequest {
        let target = self.target.clone();
        let callback = Closure::once_into_js(move |time: f64| {
            // Released before the call: the callback re-enters request_frame
            let on_frame = target.borrow().clone();
            if let Some(on_frame) = on_frame {
                on_frame(time);
            }
        });
        match self.window.request_animation_frame(callback.unchecked_ref()) {
            Ok(id) => FrameRequest(id),
            Err(e) => {
                log::error!("requestAnimationFrame failed: {}", js_err(e));
                FrameRequest(0)
            }
        }
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        if let Err(e) = self.window.cancel_animation_frame(request.0) {
            log::warn!("cancelAnimationFrame failed: {}", js_err(e));
        }
    }
}

/// Timer backed by `setTimeout`
#[derive(Clone)]
pub struct TimeoutTimer {
    window: Window,
}

impl TimeoutTimer {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl Timer for TimeoutTimer {
    fn set_timeout(&mut self, delay_ms: f64, callback: Box<dyn FnOnce()>) -> TimerId {
        let callback = Closure::once_into_js(move || callback());
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                delay_ms.max(0.0) as i32,
            ) {
            Ok(id) => TimerId(id),
            Err(e) => {
                log::error!("setTimeout failed: {}", js_err(e));
                TimerId(0)
            }
        }
    }

    fn clear_timeout(&mut self, id: TimerId) {
        self.window.clear_timeout_with_handle(id.0);
    }
}

/// Canvas 2D drawing surface
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Size the canvas and take its 2D context; fails if there is none
    pub fn acquire(canvas: &HtmlCanvasElement, size: f32) -> Result<Self, SurfaceError> {
        canvas.set_width(size as u32);
        canvas.set_height(size as u32);

        let ctx = canvas
            .get_context("2d")
            .map_err(|e| SurfaceError::Unavailable(js_err(e)))?
            .ok_or_else(|| SurfaceError::Unavailable("canvas has no 2d context".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| SurfaceError::Unavailable("2d context has the wrong type".into()))?;

        log::info!("Canvas surface acquired ({}x{})", size, size);
        Ok(Self { ctx })
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self, width: f32, height: f32) -> Result<(), SurfaceError> {
        self.ctx.clear_rect(0.0, 0.0, width as f64, height as f64);
        Ok(())
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) -> Result<(), SurfaceError> {
        self.ctx.begin_path();
        self.ctx
            .arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU)
            .map_err(|e| SurfaceError::Draw(js_err(e)))?;
        self.ctx.set_fill_style_str(&color.to_hex());
        self.ctx.fill();
        Ok(())
    }
}

/// Hit effects as absolutely positioned rings over the canvas
///
/// Runs its own animation-frame chain while effects are live, independent of
/// the fight's scheduler.
pub struct HitOverlay {
    document: Document,
    container: HtmlElement,
    effects: Rc<RefCell<EffectController>>,
    nodes: Vec<HtmlElement>,
    /// Surface pixels per world unit
    scale: f32,
    running: bool,
}

impl HitOverlay {
    pub fn new(
        document: Document,
        container: HtmlElement,
        effects: Rc<RefCell<EffectController>>,
        scale: f32,
    ) -> Self {
        Self {
            document,
            container,
            effects,
            nodes: Vec::new(),
            scale,
            running: false,
        }
    }

    /// Start the overlay's frame chain if it is idle
    pub fn wake(overlay: &Rc<RefCell<HitOverlay>>) {
        {
            let mut o = overlay.borrow_mut();
            if o.running {
                return;
            }
            o.running = true;
        }
        Self::request(overlay.clone());
    }

    fn request(overlay: Rc<RefCell<HitOverlay>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let callback = Closure::once_into_js(move |time: f64| {
            let live = {
                let mut o = overlay.borrow_mut();
                if let Err(e) = o.paint(time) {
                    log::warn!("Hit overlay paint failed: {}", e);
                }
                let live = o.effects.borrow().live() > 0;
                o.running = live;
                live
            };
            if live {
                Self::request(overlay);
            }
        });
        if let Err(e) = window.request_animation_frame(callback.unchecked_ref()) {
            log::warn!("Hit overlay frame request failed: {}", js_err(e));
        }
    }

    fn node(&mut self, index: usize) -> Result<&HtmlElement, String> {
        while self.nodes.len() <= index {
            let node: HtmlElement = self
                .document
                .create_element("div")
                .map_err(js_err)?
                .dyn_into()
                .map_err(|_| "created element is not an HtmlElement".to_string())?;
            let style = node.style();
            let _ = style.set_property("position", "absolute");
            let _ = style.set_property("pointer-events", "none");
            let _ = style.set_property("border-radius", "50%");
            let _ = style.set_property("border-style", "solid");
            let _ = style.set_property("width", &format!("{}px", EFFECT_SIZE_PX));
            let _ = style.set_property("height", &format!("{}px", EFFECT_SIZE_PX));
            self.container.append_child(&node).map_err(js_err)?;
            self.nodes.push(node);
        }
        Ok(&self.nodes[index])
    }

    fn paint(&mut self, now: f64) -> Result<(), String> {
        let frames = self.effects.borrow_mut().sample(now);
        for (i, frame) in frames.iter().enumerate() {
            let scale = self.scale;
            style_effect(self.node(i)?, frame, scale);
        }
        for node in self.nodes.iter().skip(frames.len()) {
            let _ = node.style().set_property("display", "none");
        }
        Ok(())
    }
}

fn style_effect(node: &HtmlElement, frame: &EffectFrame, scale: f32) {
    let style = node.style();
    let pos = frame.pos * scale;
    let color = frame.color.to_hex();
    let _ = style.set_property("display", "block");
    let _ = style.set_property("left", &format!("{:.1}px", pos.x));
    let _ = style.set_property("top", &format!("{:.1}px", pos.y));
    let _ = style.set_property(
        "transform",
        &format!("translate(-50%, -50%) scale({:.3})", frame.scale),
    );
    let _ = style.set_property("border-width", &format!("{:.1}px", frame.border));
    let _ = style.set_property("border-color", &color);
    let _ = style.set_property("opacity", &format!("{:.3}", frame.opacity));
    let _ = style.set_property(
        "background",
        &format!(
            "radial-gradient(circle, transparent 50%, {} 70%)",
            frame.color.to_hex_alpha(32.0 / 255.0)
        ),
    );
}

/// Effect sink that records the hit and wakes the overlay
#[derive(Clone)]
pub struct OverlaySink(pub Rc<RefCell<HitOverlay>>);

impl EffectSink for OverlaySink {
    fn on_hit(&mut self, hit: &HitEvent, now: f64) {
        self.0.borrow().effects.borrow_mut().trigger(hit, now);
        HitOverlay::wake(&self.0);
    }
}
