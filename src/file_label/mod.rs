use crate::config::PageConfig;
use crate::dom::element_by_id;
use crate::error::PageResult;
use web_sys::{Document, Element, HtmlInputElement};

pub const NO_FILE_CHOSEN: &str = "No file chosen";

/// Label text for a file picker whose selection is `names`.
///
/// Only the first name is shown, even for multi-select inputs.
pub fn label_for_selection<I, S>(names: I) -> String
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    names
        .into_iter()
        .next()
        .map(Into::into)
        .unwrap_or_else(|| NO_FILE_CHOSEN.to_string())
}

fn first_file_name(input: &HtmlInputElement) -> Option<String> {
    input.files().and_then(|files| files.get(0)).map(|f| f.name())
}

/// The label mirroring the current file-input selection.
pub struct FileLabel {
    label: Element,
}

impl FileLabel {
    pub fn acquire(doc: &Document, config: &PageConfig) -> PageResult<Self> {
        Ok(Self {
            label: element_by_id(doc, &config.file_label_id)?,
        })
    }

    /// Recomputes the label from `input`'s current selection.
    pub fn reflect_selection(&self, input: &HtmlInputElement) {
        let text = label_for_selection(first_file_name(input));
        self.label.set_text_content(Some(text.as_str()));
    }
}
