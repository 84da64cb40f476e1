use crate::config::PageConfig;
use crate::dom::element_by_id;
use crate::error::{PageError, PageResult};
use std::cell::RefCell;
use wasm_bindgen::JsValue;
use web_sys::{Document, Element, HtmlElement, HtmlFormElement};

/// Path the confirmation form posts to for `contact_id`.
///
/// The id is substituted verbatim.
pub fn delete_action_path(contact_id: &str) -> String {
    format!("/contacts/{contact_id}/delete")
}

/// True if `contact_id` survives percent-encoding unchanged.
pub(crate) fn is_path_safe(contact_id: &str) -> bool {
    !contact_id.is_empty() && urlencoding::encode(contact_id) == contact_id
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display)]
pub enum Visibility {
    #[default]
    #[strum(to_string = "hidden")]
    Hidden,
    #[strum(to_string = "visible")]
    Visible,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeleteTarget {
    pub contact_id: String,
    pub contact_name: String,
    pub action: String,
}

impl DeleteTarget {
    pub fn new(contact_id: &str, contact_name: &str) -> Self {
        Self {
            contact_id: contact_id.to_string(),
            contact_name: contact_name.to_string(),
            action: delete_action_path(contact_id),
        }
    }
}

/// Overlay state without any DOM attached.
///
/// The pending target is superseded by the next request and survives `hide`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OverlayModel {
    visibility: Visibility,
    pending: Option<DeleteTarget>,
}

impl OverlayModel {
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_visible(&self) -> bool {
        self.visibility == Visibility::Visible
    }

    pub fn pending(&self) -> Option<&DeleteTarget> {
        self.pending.as_ref()
    }

    /// Returns true if the overlay was hidden before.
    pub fn show(&mut self, target: DeleteTarget) -> bool {
        let changed = self.visibility == Visibility::Hidden;
        self.pending = Some(target);
        self.visibility = Visibility::Visible;
        changed
    }

    /// Returns true if the overlay was visible before.
    pub fn hide(&mut self) -> bool {
        let changed = self.visibility == Visibility::Visible;
        self.visibility = Visibility::Hidden;
        changed
    }
}

/// The delete-confirmation overlay bound to its page elements.
pub struct DeleteOverlay {
    root: HtmlElement,
    form: HtmlFormElement,
    name_display: Element,
    active_class: String,
    model: RefCell<OverlayModel>,
}

impl DeleteOverlay {
    pub fn acquire(doc: &Document, config: &PageConfig) -> PageResult<Self> {
        Ok(Self {
            root: element_by_id(doc, &config.overlay_id)?,
            form: element_by_id(doc, &config.overlay_form_id)?,
            name_display: element_by_id(doc, &config.overlay_name_id)?,
            active_class: config.overlay_active_class.clone(),
            model: RefCell::new(OverlayModel::default()),
        })
    }

    pub fn request_delete(&self, contact_id: &str, contact_name: &str) -> PageResult<()> {
        if !is_path_safe(contact_id) {
            log::warn!("contact id {contact_id:?} is not a safe path segment");
        }

        let target = DeleteTarget::new(contact_id, contact_name);
        if let Some(prev) = self.model.borrow().pending() {
            if prev.contact_id != target.contact_id {
                log::debug!("superseding pending delete of contact {}", prev.contact_id);
            }
        }

        // Plain text only; the name is never parsed as markup.
        self.name_display.set_text_content(Some(target.contact_name.as_str()));
        self.form.set_action(&target.action);
        self.root
            .class_list()
            .add_1(&self.active_class)
            .map_err(|e| PageError::js("show overlay", e))?;

        log::debug!("delete requested for contact {}", target.contact_id);
        self.model.borrow_mut().show(target);
        Ok(())
    }

    pub fn dismiss(&self) -> PageResult<()> {
        self.root
            .class_list()
            .remove_1(&self.active_class)
            .map_err(|e| PageError::js("hide overlay", e))?;
        self.model.borrow_mut().hide();
        Ok(())
    }

    pub fn is_visible(&self) -> bool {
        self.model.borrow().is_visible()
    }

    /// Dismisses if the click landed on the backdrop itself.
    ///
    /// Returns true if the click was a backdrop click.
    pub fn handle_click(&self, target: Option<&JsValue>) -> PageResult<bool> {
        let root: &JsValue = self.root.as_ref();
        let on_backdrop = target.is_some_and(|t| t == root);
        if on_backdrop {
            self.dismiss()?;
        }
        Ok(on_backdrop)
    }

    /// Dismisses a visible overlay on Escape.
    pub fn handle_key(&self, key: &str) -> PageResult<bool> {
        if key == "Escape" && self.is_visible() {
            self.dismiss()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Snapshot of the visibility and pending target.
    pub fn model(&self) -> OverlayModel {
        self.model.borrow().clone()
    }
}
