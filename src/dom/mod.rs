use crate::error::{PageError, PageResult};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element};

/// Looks up `#id` and casts it to the expected element type.
pub(crate) fn element_by_id<T: JsCast>(doc: &Document, id: &str) -> PageResult<T> {
    doc.get_element_by_id(id)
        .ok_or_else(|| PageError::missing_element(&format!("#{id}")))?
        .dyn_into::<T>()
        .map_err(|_| PageError::missing_element(&format!("#{id} (unexpected element type)")))
}

/// All elements in the document matching `selector` that cast to `T`.
///
/// Elements of another type are skipped.
pub(crate) fn query_all<T: JsCast>(doc: &Document, selector: &str) -> PageResult<Vec<T>> {
    let list = doc
        .query_selector_all(selector)
        .map_err(|e| PageError::js(&format!("querySelectorAll({selector})"), e))?;

    let mut out = Vec::with_capacity(list.length() as usize);
    for i in 0..list.length() {
        if let Some(el) = list.item(i).and_then(|n| n.dyn_into::<T>().ok()) {
            out.push(el);
        }
    }
    Ok(out)
}

/// First element under `form` with the given id.
///
/// Scoped to `form` so a page with several guarded forms binds each form to
/// its own field.
pub(crate) fn descendant_by_id<T: JsCast>(form: &Element, id: &str) -> PageResult<T> {
    form.query_selector(&format!("#{id}"))
        .map_err(|e| PageError::js(&format!("querySelector(#{id})"), e))?
        .ok_or_else(|| PageError::missing_element(&format!("#{id}")))?
        .dyn_into::<T>()
        .map_err(|_| PageError::missing_element(&format!("#{id} (unexpected element type)")))
}
