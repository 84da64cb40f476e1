use crate::config::PageConfig;
use crate::dom::{descendant_by_id, query_all};
use crate::error::PageResult;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, HtmlFormElement, HtmlInputElement};

/// Minimum-length gate for the phone field.
///
/// This is a client-side convenience only; the server validates for real.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhonePolicy {
    pub min_len: usize,
}

impl Default for PhonePolicy {
    fn default() -> Self {
        Self { min_len: 10 }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhoneTooShort {
    pub len: usize,
    pub min_len: usize,
}

impl std::fmt::Display for PhoneTooShort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Phone number must be at least {} digits long.",
            self.min_len
        )
    }
}

impl std::error::Error for PhoneTooShort {}

impl PhonePolicy {
    pub fn from_config(config: &PageConfig) -> Self {
        Self {
            min_len: config.phone_min_len,
        }
    }

    /// Checks the trimmed length. Content is not inspected.
    ///
    /// Length is measured the way the browser measures `value.trim().length`:
    /// in UTF-16 code units, after stripping ECMAScript whitespace.
    pub fn check(&self, raw: &str) -> Result<(), PhoneTooShort> {
        let len = raw.trim_matches(is_js_trim_char).encode_utf16().count();
        if len < self.min_len {
            return Err(PhoneTooShort {
                len,
                min_len: self.min_len,
            });
        }
        Ok(())
    }
}

/// Characters `String.prototype.trim` strips.
///
/// Unicode `White_Space` minus U+0085, plus U+FEFF.
fn is_js_trim_char(c: char) -> bool {
    c == '\u{FEFF}' || (c.is_whitespace() && c != '\u{0085}')
}

/// Shows a blocking message to the user.
pub trait Notifier {
    fn notify(&self, message: &str);
}

/// `window.alert`.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlertNotifier;

impl Notifier for AlertNotifier {
    fn notify(&self, message: &str) {
        let Some(w) = web_sys::window() else {
            log::warn!("no window; notification dropped: {message}");
            return;
        };
        if let Err(e) = w.alert_with_message(message) {
            log::warn!("alert failed: {e:?}");
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitDecision {
    Proceed,
    Blocked(PhoneTooShort),
}

/// A guarded form and its phone field.
pub struct PhoneGuard {
    form: HtmlFormElement,
    phone: HtmlInputElement,
    policy: PhonePolicy,
    notifier: Rc<dyn Notifier>,
}

impl PhoneGuard {
    pub fn acquire(
        form: HtmlFormElement,
        config: &PageConfig,
        notifier: Rc<dyn Notifier>,
    ) -> PageResult<Self> {
        let phone = descendant_by_id(&form, &config.phone_field_id)?;
        Ok(Self {
            form,
            phone,
            policy: PhonePolicy::from_config(config),
            notifier,
        })
    }

    /// Runs the check for one submit event, cancelling it on failure.
    pub fn on_submit(&self, ev: &Event) -> SubmitDecision {
        match self.policy.check(&self.phone.value()) {
            Ok(()) => SubmitDecision::Proceed,
            Err(e) => {
                ev.prevent_default();
                log::debug!("blocked submit: phone has {} of {} characters", e.len, e.min_len);
                self.notifier.notify(&e.to_string());
                if let Err(fe) = self.phone.focus() {
                    log::warn!("could not focus phone field: {fe:?}");
                }
                SubmitDecision::Blocked(e)
            }
        }
    }

    /// Registers the submit listener for the page lifetime.
    pub fn attach(self) {
        let form = self.form.clone();
        let cb = Closure::<dyn FnMut(Event)>::new(move |ev: Event| {
            self.on_submit(&ev);
        });
        if let Err(e) = form.add_event_listener_with_callback("submit", cb.as_ref().unchecked_ref()) {
            log::error!("failed to guard form: {e:?}");
        }
        // Listener lives as long as the page.
        cb.forget();
    }
}

/// Guards every marked form in the document.
///
/// Forms without a phone field are skipped. Returns the number guarded.
pub fn attach_all(doc: &Document, config: &PageConfig, notifier: Rc<dyn Notifier>) -> PageResult<usize> {
    let forms = query_all::<HtmlFormElement>(doc, &config.guarded_form_selector)?;
    let mut guarded = 0;
    for form in forms {
        match PhoneGuard::acquire(form, config, notifier.clone()) {
            Ok(guard) => {
                guard.attach();
                guarded += 1;
            }
            Err(e) => log::warn!("form left unguarded: {e}"),
        }
    }
    Ok(guarded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_number_fails() {
        let err = PhonePolicy::default().check("12345").unwrap_err();
        assert_eq!(err, PhoneTooShort { len: 5, min_len: 10 });
        assert_eq!(err.to_string(), "Phone number must be at least 10 digits long.");
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        assert!(PhonePolicy::default().check("  1234567890  ").is_ok());
        assert!(PhonePolicy::default().check("\t123456789\n").is_err());
    }

    #[test]
    fn test_boundary_ten_passes_nine_fails() {
        let p = PhonePolicy::default();
        assert!(p.check("1234567890").is_ok());
        assert_eq!(p.check("123456789").unwrap_err().len, 9);
    }

    #[test]
    fn test_only_length_is_checked() {
        let p = PhonePolicy::default();
        assert!(p.check("(555) 12-34").is_ok());
        assert!(p.check("abcdefghij").is_ok());
        assert!(p.check("12345678901234567890").is_ok());
        assert!(p.check("").is_err());
        assert!(p.check("          ").is_err());
    }

    #[test]
    fn test_length_counts_utf16_units() {
        assert!(PhonePolicy::default().check("+٤٤٢٠٧٩٤٦٠٩٥").is_ok());
        // An astral character is two code units.
        assert!(PhonePolicy::default().check("12345678😀").is_ok());
        assert_eq!(PhonePolicy::default().check("1234567😀").unwrap_err().len, 9);
    }

    #[test]
    fn test_trim_matches_browser_whitespace() {
        let p = PhonePolicy::default();
        assert_eq!(p.check("\u{FEFF}123456789").unwrap_err().len, 9);
        assert_eq!(p.check("\u{00A0}123456789\u{3000}").unwrap_err().len, 9);
        assert_eq!(p.check("\u{2028}123456789\u{2029}").unwrap_err().len, 9);
        // NEL is not stripped by the browser, so it counts.
        assert!(p.check("\u{0085}123456789").is_ok());
    }

    #[test]
    fn test_policy_from_config() {
        let config = PageConfig {
            phone_min_len: 7,
            ..Default::default()
        };
        let p = PhonePolicy::from_config(&config);
        assert!(p.check("5551234").is_ok());
        assert_eq!(p.check("555123").unwrap_err().to_string(), "Phone number must be at least 7 digits long.");
    }
}
