//! Client-side behavior for the contact manager's server-rendered pages.
//!
//! The server renders plain HTML; this crate is loaded on every page and
//! attaches the delete-confirmation overlay, the file-input label, flash
//! message auto-dismiss and the phone-number submit guard.

pub mod config;
mod controller;
mod dom;
pub mod error;
pub mod file_label;
pub mod flash;
mod logging;
pub mod overlay;
pub mod phone_guard;

use crate::config::PageConfig;
use crate::controller::PageController;
use crate::flash::WindowScheduler;
use crate::phone_guard::AlertNotifier;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::HtmlInputElement;

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

/// Defines `window.<name>` for inline template handlers.
fn set_global(window: &web_sys::Window, name: &str, f: &JsValue) {
    if let Err(e) = js_sys::Reflect::set(window, &name.into(), f) {
        log::error!("failed to install {name}: {e:?}");
    }
}

/// Installs `confirmDelete`, `closeDeleteModal` and `updateFileName`.
fn install_globals(window: &web_sys::Window) {
    let confirm = Closure::<dyn Fn(JsValue, JsValue)>::new(|id: JsValue, name: JsValue| {
        let id = js_to_text(&id);
        let name = js_to_text(&name);
        match controller::current() {
            Some(c) => c.confirm_delete(&id, &name),
            None => log::warn!("confirmDelete called before the page was ready"),
        }
    });
    set_global(window, "confirmDelete", confirm.as_ref());
    confirm.forget();

    let close = Closure::<dyn Fn()>::new(|| match controller::current() {
        Some(c) => c.close_delete_modal(),
        None => log::warn!("closeDeleteModal called before the page was ready"),
    });
    set_global(window, "closeDeleteModal", close.as_ref());
    close.forget();

    let update = Closure::<dyn Fn(JsValue)>::new(|input: JsValue| {
        let Ok(input) = input.dyn_into::<HtmlInputElement>() else {
            log::warn!("updateFileName expects a file input element");
            return;
        };
        match controller::current() {
            Some(c) => c.update_file_name(&input),
            None => log::warn!("updateFileName called before the page was ready"),
        }
    });
    set_global(window, "updateFileName", update.as_ref());
    update.forget();
}

/// Template arguments arrive as numbers or strings; convert like `String(v)`.
fn js_to_text(v: &JsValue) -> String {
    if let Some(s) = v.as_string() {
        return s;
    }
    js_sys::JsString::from("").concat(v).into()
}

fn attach_page(config: &PageConfig) {
    let Some(doc) = web_sys::window().and_then(|w| w.document()) else {
        log::error!("no document; page controller not attached");
        return;
    };
    let ctl = PageController::attach(
        &doc,
        config,
        Rc::new(WindowScheduler),
        Rc::new(AlertNotifier),
    );
    controller::set_current(ctl);
}

/// Attaches now, or on `DOMContentLoaded` while the document is still loading.
fn attach_when_ready(config: PageConfig) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(doc) = window.document() else {
        return;
    };

    if doc.ready_state() != "loading" {
        attach_page(&config);
        return;
    }

    let cb = Closure::once_into_js(move || attach_page(&config));
    if let Err(e) = doc.add_event_listener_with_callback("DOMContentLoaded", cb.unchecked_ref()) {
        log::error!("failed to wait for DOMContentLoaded: {e:?}");
    }
}

// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();

    let config = PageConfig::from_window();
    logging::init(config.log_level());

    if let Some(window) = web_sys::window() {
        install_globals(&window);
    }
    attach_when_ready(config);
}

// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` + wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_template_ids_arrive_as_numbers() {
        assert_eq!(js_to_text(&JsValue::from_str("17")), "17");
        assert_eq!(js_to_text(&JsValue::from_f64(42.0)), "42");
        assert_eq!(js_to_text(&JsValue::from_f64(1e21)), "1e+21");
        assert_eq!(js_to_text(&JsValue::UNDEFINED), "undefined");
        assert_eq!(js_to_text(&JsValue::NULL), "null");
    }

    fn mount_overlay(prefix: &str) -> (web_sys::Document, PageConfig) {
        let doc = leptos::prelude::document();
        let host = doc.create_element("div").unwrap();
        host.set_inner_html(&format!(
            r#"<div id="{prefix}_modal"><div>
                 <strong id="{prefix}_name"></strong>
                 <form id="{prefix}_form" method="post"></form>
               </div></div>"#
        ));
        doc.body().unwrap().append_child(&host).unwrap();
        let config = PageConfig {
            overlay_id: format!("{prefix}_modal"),
            overlay_form_id: format!("{prefix}_form"),
            overlay_name_id: format!("{prefix}_name"),
            flash_selector: format!(".{prefix}-none"),
            file_label_id: format!("{prefix}_no_label"),
            ..Default::default()
        };
        (doc, config)
    }

    fn global(name: &str) -> js_sys::Function {
        let window = web_sys::window().unwrap();
        js_sys::Reflect::get(&window, &name.into()).unwrap().unchecked_into()
    }

    struct Silent;

    impl phone_guard::Notifier for Silent {
        fn notify(&self, _message: &str) {}
    }

    #[wasm_bindgen_test]
    fn test_template_handlers_drive_the_overlay() {
        let (doc, config) = mount_overlay("glob");
        let ctl = PageController::attach(
            &doc,
            &config,
            Rc::new(flash::VirtualScheduler::default()),
            Rc::new(Silent),
        );
        controller::set_current(ctl);
        install_globals(&web_sys::window().unwrap());

        global("confirmDelete")
            .call2(&JsValue::NULL, &JsValue::from_f64(42.0), &JsValue::from_str("Ada"))
            .unwrap();

        let form: web_sys::HtmlFormElement =
            doc.get_element_by_id("glob_form").unwrap().unchecked_into();
        assert!(form.action().ends_with("/contacts/42/delete"));
        let name = doc.get_element_by_id("glob_name").unwrap();
        assert_eq!(name.text_content().as_deref(), Some("Ada"));
        let root = doc.get_element_by_id("glob_modal").unwrap();
        assert!(root.class_list().contains("active"));

        global("closeDeleteModal").call0(&JsValue::NULL).unwrap();
        assert!(!root.class_list().contains("active"));
    }

    #[wasm_bindgen_test]
    fn test_escape_keydown_on_window_closes_overlay() {
        let (doc, config) = mount_overlay("esck");
        let ctl = PageController::attach(
            &doc,
            &config,
            Rc::new(flash::VirtualScheduler::default()),
            Rc::new(Silent),
        );
        ctl.confirm_delete("9", "Edsger");
        let root = doc.get_element_by_id("esck_modal").unwrap();
        assert!(root.class_list().contains("active"));

        let init = web_sys::KeyboardEventInit::new();
        init.set_key("Escape");
        let ev = web_sys::KeyboardEvent::new_with_keyboard_event_init_dict("keydown", &init).unwrap();
        web_sys::window().unwrap().dispatch_event(&ev).unwrap();

        assert!(!root.class_list().contains("active"));
        assert!(!ctl.overlay.as_ref().unwrap().is_visible());
    }

    #[wasm_bindgen_test]
    fn test_globals_are_installed_on_window() {
        let window = web_sys::window().unwrap();
        install_globals(&window);
        for name in ["confirmDelete", "closeDeleteModal", "updateFileName"] {
            let f = js_sys::Reflect::get(&window, &name.into()).unwrap();
            assert!(f.is_function(), "{name} should be a function");
        }
    }

    #[wasm_bindgen_test]
    fn test_config_reads_window_object() {
        let window = web_sys::window().unwrap();
        let obj = js_sys::JSON::parse(r#"{"flash_delay_ms": 250}"#).unwrap();
        js_sys::Reflect::set(&window, &config::WINDOW_CONFIG_KEY.into(), &obj).unwrap();

        let c = PageConfig::from_window();
        assert_eq!(c.flash_delay_ms, 250);
        assert_eq!(c.overlay_id, "deleteModal");

        js_sys::Reflect::delete_property(&window, &config::WINDOW_CONFIG_KEY.into()).unwrap();
        assert_eq!(PageConfig::from_window(), PageConfig::default());
    }
}
