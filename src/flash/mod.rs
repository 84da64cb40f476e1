//! Auto-dismiss for flash messages.
//!
//! Each message shown at page load is faded out after a delay and then
//! removed. Messages are scheduled independently and exactly once.

mod scheduler;

pub use scheduler::{Scheduler, Task, WindowScheduler};

#[cfg(test)]
pub(crate) use scheduler::VirtualScheduler;

use crate::config::PageConfig;
use crate::dom::query_all;
use crate::error::PageResult;
use std::rc::Rc;
use std::time::Duration;
use web_sys::{Document, HtmlElement};

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum FlashStep {
    #[strum(to_string = "fade")]
    Fade,
    #[strum(to_string = "remove")]
    Remove,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlashTiming {
    pub delay: Duration,
    pub fade: Duration,
}

impl Default for FlashTiming {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(5000),
            fade: Duration::from_millis(500),
        }
    }
}

impl FlashTiming {
    pub fn from_config(config: &PageConfig) -> Self {
        Self {
            delay: config.flash_delay(),
            fade: config.flash_fade(),
        }
    }

    /// Offset from scheduling at which `step` runs.
    pub fn offset(&self, step: FlashStep) -> Duration {
        match step {
            FlashStep::Fade => self.delay,
            FlashStep::Remove => self.delay.saturating_add(self.fade),
        }
    }
}

/// Something that can be faded out and removed.
pub trait FlashTarget {
    fn begin_fade(&self, fade: Duration);
    fn remove(&self);
}

impl FlashTarget for HtmlElement {
    fn begin_fade(&self, fade: Duration) {
        let style = self.style();
        let transition = format!("opacity {}ms", fade.as_millis());
        if let Err(e) = style
            .set_property("transition", &transition)
            .and_then(|_| style.set_property("opacity", "0"))
        {
            log::warn!("flash fade failed: {e:?}");
        }
    }

    fn remove(&self) {
        web_sys::Element::remove(self);
    }
}

/// Runs `step` on `target` and schedules the step after it.
fn run_step<T>(target: Rc<T>, scheduler: Rc<dyn Scheduler>, timing: FlashTiming, step: FlashStep)
where
    T: FlashTarget + ?Sized + 'static,
{
    log::trace!("flash {step}");
    match step {
        FlashStep::Fade => {
            target.begin_fade(timing.fade);
            let gap = timing
                .offset(FlashStep::Remove)
                .saturating_sub(timing.offset(FlashStep::Fade));
            let next = scheduler.clone();
            scheduler.schedule(
                gap,
                Box::new(move || run_step(target, next, timing, FlashStep::Remove)),
            );
        }
        FlashStep::Remove => target.remove(),
    }
}

/// Schedules fade then removal of `target`.
pub fn schedule_dismissal<T>(target: Rc<T>, scheduler: Rc<dyn Scheduler>, timing: FlashTiming)
where
    T: FlashTarget + ?Sized + 'static,
{
    let next = scheduler.clone();
    scheduler.schedule(
        timing.offset(FlashStep::Fade),
        Box::new(move || run_step(target, next, timing, FlashStep::Fade)),
    );
}

/// Schedules every flash message currently in the document.
///
/// Returns the number of messages scheduled.
pub fn schedule_all(
    doc: &Document,
    config: &PageConfig,
    scheduler: Rc<dyn Scheduler>,
) -> PageResult<usize> {
    let messages = query_all::<HtmlElement>(doc, &config.flash_selector)?;
    let timing = FlashTiming::from_config(config);
    let count = messages.len();
    for el in messages {
        schedule_dismissal(Rc::new(el), scheduler.clone(), timing);
    }
    Ok(count)
}
