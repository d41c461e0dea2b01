//! WebAssembly bindings for browser usage.
//!
//! Mounts the chart into a container element. The SVG is redrawn from the
//! controller on every animation frame while a transition runs; clicks and
//! hovers are delegated from the container to the controller by element id.
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { mount } from 'healthrisk-viz';
//!
//! await init();
//! await mount('#scatter', 'assets/data/healthRisk.csv');
//! ```

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{console, Element, Event, Response, Window};

use crate::chart::ChartController;
use crate::config::Config;
use crate::dataset::Dataset;
use crate::render::HoverTarget;
use crate::state::AxisLabel;

// ============================================================================
// Initialization
// ============================================================================

/// Install the panic hook so panics reach the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Get library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// ============================================================================
// Mount
// ============================================================================

struct Mounted {
    chart: ChartController,
    container: Element,
    animating: bool,
}

impl Mounted {
    fn draw(&self, now: Duration) {
        self.container.set_inner_html(&self.chart.render_svg(now));
    }
}

type Shared = Rc<RefCell<Mounted>>;

/// Load the data file and mount the chart.
///
/// `selector` defaults to `#scatter` and `data_url` to
/// `assets/data/healthRisk.csv`. A failed load is reported to the console
/// and nothing is drawn.
///
/// # Errors
///
/// Returns an error if there is no window or the container does not exist.
#[wasm_bindgen]
pub async fn mount(selector: Option<String>, data_url: Option<String>) -> Result<(), JsValue> {
    let config = Config::default();
    let selector = selector.unwrap_or_else(|| config.container.clone());
    let url = data_url.unwrap_or_else(|| config.data_path.display().to_string());

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;
    let container = document
        .query_selector(&selector)?
        .ok_or_else(|| JsValue::from_str(&format!("no element matches {selector}")))?;

    let text = match fetch_text(&window, &url).await {
        Ok(text) => text,
        Err(e) => {
            console::error_2(&JsValue::from_str(&format!("failed to load {url}:")), &e);
            return Ok(());
        }
    };
    let loaded = Dataset::from_csv_str(&text).and_then(|data| ChartController::new(data, &config));
    let chart = match loaded {
        Ok(chart) => chart,
        Err(e) => {
            console::error_1(&JsValue::from_str(&format!("failed to load {url}: {e}")));
            return Ok(());
        }
    };

    let mounted = Rc::new(RefCell::new(Mounted {
        chart,
        container: container.clone(),
        animating: false,
    }));
    mounted.borrow().draw(now(&window));

    let shared = Rc::clone(&mounted);
    listen(&container, "click", move |event| {
        let Some(label) = target_id(&event).as_deref().and_then(AxisLabel::from_element_id) else {
            return;
        };
        let changed = shared.borrow_mut().chart.click(label, current_time());
        if changed.is_some() {
            animate(Rc::clone(&shared));
        }
    })?;

    let shared = Rc::clone(&mounted);
    listen(&container, "mouseover", move |event| {
        let Some(target) = target_id(&event)
            .as_deref()
            .and_then(HoverTarget::from_element_id)
        else {
            return;
        };
        let now = current_time();
        let mut m = shared.borrow_mut();
        m.chart.hover(target, now);
        if !m.animating {
            m.draw(now);
        }
    })?;

    let shared = Rc::clone(&mounted);
    listen(&container, "mouseout", move |event| {
        if target_id(&event).as_deref().and_then(HoverTarget::from_element_id).is_none() {
            return;
        }
        let now = current_time();
        let mut m = shared.borrow_mut();
        m.chart.unhover();
        if !m.animating {
            m.draw(now);
        }
    })?;

    Ok(())
}

async fn fetch_text(window: &Window, url: &str) -> Result<String, JsValue> {
    let response: Response = JsFuture::from(window.fetch_with_str(url)).await?.dyn_into()?;
    if !response.ok() {
        return Err(JsValue::from_str(&format!("HTTP {}", response.status())));
    }
    let body = JsFuture::from(response.text()?).await?;
    body.as_string()
        .ok_or_else(|| JsValue::from_str("response body is not text"))
}

fn listen(
    target: &Element,
    kind: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut(Event)>::wrap(Box::new(handler));
    target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn target_id(event: &Event) -> Option<String> {
    event
        .target()?
        .dyn_into::<Element>()
        .ok()
        .map(|element| element.id())
}

// ============================================================================
// Frame loop
// ============================================================================

/// Redraw on every animation frame until all transitions have settled.
fn animate(shared: Shared) {
    if shared.borrow().animating {
        return;
    }
    shared.borrow_mut().animating = true;

    let f = Rc::new(RefCell::new(None::<Closure<dyn FnMut(f64)>>));
    let g = Rc::clone(&f);

    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp: f64| {
        let now = millis_to_duration(timestamp);
        let running = {
            let mut m = shared.borrow_mut();
            m.draw(now);
            m.animating = m.chart.is_animating(now);
            m.animating
        };

        if running {
            if let Some(callback) = f.borrow().as_ref() {
                request_frame(callback);
            }
        } else {
            // Last frame drawn; release the loop.
            let _ = f.borrow_mut().take();
        }
    }) as Box<dyn FnMut(f64)>));

    if let Some(callback) = g.borrow().as_ref() {
        request_frame(callback);
    }
}

fn request_frame(callback: &Closure<dyn FnMut(f64)>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    if let Err(e) = window.request_animation_frame(callback.as_ref().unchecked_ref()) {
        console::error_1(&e);
    }
}

fn now(window: &Window) -> Duration {
    window
        .performance()
        .map_or(Duration::ZERO, |performance| millis_to_duration(performance.now()))
}

fn current_time() -> Duration {
    web_sys::window().map_or(Duration::ZERO, |window| now(&window))
}

/// Convert a DOM high-resolution timestamp to a [`Duration`].
fn millis_to_duration(ms: f64) -> Duration {
    if ms.is_finite() && ms > 0.0 {
        Duration::from_secs_f64(ms / 1000.0)
    } else {
        Duration::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millis_to_duration() {
        assert_eq!(millis_to_duration(1500.0), Duration::from_millis(1500));
        assert_eq!(millis_to_duration(-3.0), Duration::ZERO);
        assert_eq!(millis_to_duration(f64::NAN), Duration::ZERO);
    }
}
