//! Review capture: the multi-step wizard and its stopwatch

pub mod stopwatch;
pub mod wizard;

pub use stopwatch::{format_elapsed, Stopwatch, StopwatchState};
pub use wizard::{
    ReviewDraft, ReviewWizard, WizardError, WizardStep, DETAIL_RATING_RANGE, RATING_RANGE,
};
