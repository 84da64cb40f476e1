use crate::config::PageConfig;
use crate::dom::query_all;
use crate::error::PageResult;
use crate::file_label::FileLabel;
use crate::flash::{self, Scheduler};
use crate::overlay::DeleteOverlay;
use crate::phone_guard::{self, Notifier};
use leptos::ev;
use leptos_dom::helpers::{window_event_listener, WindowListenerHandle};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Event, HtmlInputElement};

/// Element references and listeners for one page.
///
/// References are acquired once at attach time. A concern whose markup is
/// missing is left out; the others still attach.
pub(crate) struct PageController {
    pub overlay: Option<Rc<DeleteOverlay>>,
    pub file_label: Option<Rc<FileLabel>>,

    /// Window listeners (keep handles alive).
    _click_handle: Option<WindowListenerHandle>,
    _keydown_handle: Option<WindowListenerHandle>,
}

impl PageController {
    pub fn attach(
        doc: &Document,
        config: &PageConfig,
        scheduler: Rc<dyn Scheduler>,
        notifier: Rc<dyn Notifier>,
    ) -> Self {
        let overlay = match DeleteOverlay::acquire(doc, config) {
            Ok(o) => Some(Rc::new(o)),
            Err(e) => {
                log::error!("delete overlay not attached: {e}");
                None
            }
        };

        let (click, keydown) = match &overlay {
            Some(o) => {
                let o1 = o.clone();
                let click = window_event_listener(ev::click, move |ev: web_sys::MouseEvent| {
                    let target: Option<JsValue> = ev.target().map(Into::into);
                    if let Err(e) = o1.handle_click(target.as_ref()) {
                        log::warn!("{e}");
                    }
                });
                let o2 = o.clone();
                let keydown = window_event_listener(ev::keydown, move |ev: web_sys::KeyboardEvent| {
                    if let Err(e) = o2.handle_key(&ev.key()) {
                        log::warn!("{e}");
                    }
                });
                (Some(click), Some(keydown))
            }
            None => (None, None),
        };

        let file_label = match FileLabel::acquire(doc, config) {
            Ok(l) => {
                let l = Rc::new(l);
                match watch_file_inputs(doc, config, &l) {
                    Ok(n) => log::debug!("file label bound to {n} input(s)"),
                    Err(e) => log::warn!("file inputs not watched: {e}"),
                }
                Some(l)
            }
            Err(e) => {
                log::debug!("no file label on this page: {e}");
                None
            }
        };

        match flash::schedule_all(doc, config, scheduler) {
            Ok(n) => log::debug!("{n} flash message(s) scheduled"),
            Err(e) => log::warn!("flash messages not scheduled: {e}"),
        }

        match phone_guard::attach_all(doc, config, notifier) {
            Ok(n) => log::debug!("{n} form(s) guarded"),
            Err(e) => log::warn!("forms not guarded: {e}"),
        }

        log::info!(
            "page controller attached (overlay: {}, file label: {})",
            overlay.is_some(),
            file_label.is_some()
        );

        Self {
            overlay,
            file_label,
            _click_handle: click,
            _keydown_handle: keydown,
        }
    }

    pub fn confirm_delete(&self, contact_id: &str, contact_name: &str) {
        let Some(overlay) = &self.overlay else {
            log::warn!("confirmDelete called but no delete overlay on this page");
            return;
        };
        if let Err(e) = overlay.request_delete(contact_id, contact_name) {
            log::error!("{e}");
        }
    }

    pub fn close_delete_modal(&self) {
        let Some(overlay) = &self.overlay else {
            log::warn!("closeDeleteModal called but no delete overlay on this page");
            return;
        };
        if let Err(e) = overlay.dismiss() {
            log::error!("{e}");
        }
    }

    pub fn update_file_name(&self, input: &HtmlInputElement) {
        let Some(label) = &self.file_label else {
            log::warn!("updateFileName called but no file label on this page");
            return;
        };
        label.reflect_selection(input);
    }
}

fn watch_file_inputs(doc: &Document, config: &PageConfig, label: &Rc<FileLabel>) -> PageResult<usize> {
    let inputs = query_all::<HtmlInputElement>(doc, &config.file_input_selector)?;
    let count = inputs.len();
    for input in inputs {
        let label = label.clone();
        let watched = input.clone();
        let cb = Closure::<dyn FnMut(Event)>::new(move |_ev: Event| {
            label.reflect_selection(&watched);
        });
        if let Err(e) = input.add_event_listener_with_callback("change", cb.as_ref().unchecked_ref()) {
            log::warn!("change listener not added: {e:?}");
        }
        // Listener lives as long as the page.
        cb.forget();
    }
    Ok(count)
}

thread_local! {
    static CONTROLLER: RefCell<Option<Rc<PageController>>> = const { RefCell::new(None) };
}

pub(crate) fn set_current(controller: PageController) {
    CONTROLLER.with(|c| *c.borrow_mut() = Some(Rc::new(controller)));
}

/// The attached controller, if the page is ready.
pub(crate) fn current() -> Option<Rc<PageController>> {
    CONTROLLER.with(|c| c.borrow().clone())
}
