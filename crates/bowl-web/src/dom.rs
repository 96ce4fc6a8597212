use std::cell::RefCell;
use std::rc::Rc;

use bowl_engine::{ConfigError, UiCommand, UiSurface};
use thiserror::Error;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, EventTarget, HtmlButtonElement};

/// Element ids the page must provide.
pub const CANVAS_ID: &str = "c";
pub const TRIGGER_ID: &str = "spin-button";
pub const OVERLAY_ID: &str = "result-overlay";
pub const MESSAGE_ID: &str = "result-message";

/// CSS class that hides the result overlay.
const HIDDEN_CLASS: &str = "hidden";

/// Why the page could not start. Shown to the user as a blocking notice.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("no browser window available")]
    NoWindow,
    #[error("the window has no document")]
    NoDocument,
    #[error("required element #{0} is missing")]
    MissingElement(&'static str),
    #[error("could not listen for {0} events")]
    Listener(&'static str),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// The page controls a sequencer drives: the trigger button and the result overlay.
pub struct DomSurface {
    trigger: HtmlButtonElement,
    overlay: Element,
    message: Element,
}

impl DomSurface {
    /// Look up every required element. Fails on the first one missing.
    pub fn bind() -> Result<Self, StartupError> {
        let document = document()?;
        require(&document, CANVAS_ID)?;
        let trigger = require(&document, TRIGGER_ID)?
            .dyn_into::<HtmlButtonElement>()
            .map_err(|_| StartupError::MissingElement(TRIGGER_ID))?;
        let overlay = require(&document, OVERLAY_ID)?;
        let message = require(&document, MESSAGE_ID)?;

        Ok(Self {
            trigger,
            overlay,
            message,
        })
    }

    pub fn trigger(&self) -> &HtmlButtonElement {
        &self.trigger
    }

    pub fn overlay(&self) -> &Element {
        &self.overlay
    }

    fn set_overlay_hidden(&self, hidden: bool) {
        let classes = self.overlay.class_list();
        let result = if hidden {
            classes.add_1(HIDDEN_CLASS)
        } else {
            classes.remove_1(HIDDEN_CLASS)
        };
        if let Err(err) = result {
            log::warn!("Could not toggle #{}: {:?}", OVERLAY_ID, err);
        }
    }
}

impl UiSurface for DomSurface {
    fn apply(&mut self, command: &UiCommand) {
        match *command {
            UiCommand::Trigger { enabled, label } => {
                self.trigger.set_disabled(!enabled);
                self.trigger.set_text_content(Some(label));
            }
            UiCommand::ShowResult { outcome } => {
                self.message.set_inner_html(&outcome.message_html());
                self.set_overlay_hidden(false);
            }
            UiCommand::HideResult => self.set_overlay_hidden(true),
        }
    }
}

fn document() -> Result<Document, StartupError> {
    web_sys::window()
        .ok_or(StartupError::NoWindow)?
        .document()
        .ok_or(StartupError::NoDocument)
}

fn require(document: &Document, id: &'static str) -> Result<Element, StartupError> {
    document
        .get_element_by_id(id)
        .ok_or(StartupError::MissingElement(id))
}

/// Log a startup failure and block on an alert so the user sees it.
pub fn report_fatal(err: &StartupError) {
    log::error!("Startup failed: {}", err);
    if let Some(window) = web_sys::window() {
        let notice = format!("Lucky Bowl could not start: {}", err);
        if let Err(js) = window.alert_with_message(&notice) {
            log::warn!("Could not show startup notice: {:?}", js);
        }
    }
}

/// Call `handler` on every click of `target`.
pub fn on_click(target: &EventTarget, mut handler: impl FnMut() + 'static) -> Result<(), StartupError> {
    let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| handler());
    target
        .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
        .map_err(|_| StartupError::Listener("click"))?;
    closure.forget();
    Ok(())
}

/// Call `handler` with the key code of every key press on the window.
pub fn on_key_down(mut handler: impl FnMut(u32) + 'static) -> Result<(), StartupError> {
    let window = web_sys::window().ok_or(StartupError::NoWindow)?;
    let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
        if !event.repeat() {
            handler(event.key_code());
        }
    });
    window
        .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())
        .map_err(|_| StartupError::Listener("keydown"))?;
    closure.forget();
    Ok(())
}

struct FrameLoop {
    last_time: Option<f64>,
    frame: Box<dyn FnMut(f32)>,
}

/// Run `frame(dt_seconds)` on every animation frame, forever.
pub fn start_frame_loop(frame: impl FnMut(f32) + 'static) {
    let state = Rc::new(RefCell::new(FrameLoop {
        last_time: None,
        frame: Box::new(frame),
    }));
    request_frame(state);
}

fn request_frame(state: Rc<RefCell<FrameLoop>>) {
    let Some(window) = web_sys::window() else {
        log::error!("No window, animation stopped");
        return;
    };
    let callback = Closure::once_into_js(move |time: f64| {
        {
            let mut frame_loop = state.borrow_mut();
            let dt = match frame_loop.last_time {
                Some(last) => ((time - last) / 1000.0) as f32,
                None => 0.0,
            };
            frame_loop.last_time = Some(time);
            (frame_loop.frame)(dt);
        }
        request_frame(state);
    });
    if let Err(err) = window.request_animation_frame(callback.unchecked_ref()) {
        log::error!("requestAnimationFrame failed: {:?}", err);
    }
}
