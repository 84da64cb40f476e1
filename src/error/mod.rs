use wasm_bindgen::JsValue;

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum PageErrorKind {
    /// The host page does not contain an element this crate binds to.
    #[strum(to_string = "missing element")]
    MissingElement,
    /// A DOM call threw.
    #[strum(to_string = "js")]
    Js,
}

#[derive(Clone, Debug)]
pub struct PageError {
    pub kind: PageErrorKind,
    pub message: String,
}

impl std::fmt::Display for PageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for PageError {}

impl PageError {
    pub(crate) fn missing_element(what: &str) -> Self {
        Self {
            kind: PageErrorKind::MissingElement,
            message: what.to_string(),
        }
    }

    pub(crate) fn js(ctx: &str, e: JsValue) -> Self {
        let detail = e
            .as_string()
            .or_else(|| {
                js_sys::JSON::stringify(&e)
                    .ok()
                    .and_then(|s| s.as_string())
            })
            .unwrap_or_else(|| "unknown error".to_string());
        Self {
            kind: PageErrorKind::Js,
            message: format!("{ctx}: {detail}"),
        }
    }
}

pub type PageResult<T> = Result<T, PageError>;
