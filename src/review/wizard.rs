//! Review capture wizard
//!
//! Five steps shown one at a time. Moving forward validates the step being
//! left; moving back never does. The stopwatch runs while the cigar is being
//! smoked and its reading becomes the review's smoke duration.

use std::fmt;
use std::time::Instant;
use thiserror::Error;

use super::Stopwatch;
use crate::models::{FlavorNotes, NewReview};

/// Overall rating bounds
pub const RATING_RANGE: (u8, u8) = (0, 100);

/// Draw, burn and construction rating bounds
pub const DETAIL_RATING_RANGE: (u8, u8) = (1, 5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WizardStep {
    Cigar,
    Smoke,
    Tasting,
    Verdict,
    Summary,
}

impl WizardStep {
    pub const ALL: [WizardStep; 5] = [
        WizardStep::Cigar,
        WizardStep::Smoke,
        WizardStep::Tasting,
        WizardStep::Verdict,
        WizardStep::Summary,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn next(&self) -> Option<WizardStep> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn previous(&self) -> Option<WizardStep> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::Cigar => "Cigar",
            WizardStep::Smoke => "Smoke",
            WizardStep::Tasting => "Tasting notes",
            WizardStep::Verdict => "Verdict",
            WizardStep::Summary => "Summary",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    #[error("Cigar name is required")]
    MissingCigarName,

    #[error("Overall rating is required")]
    MissingRating,

    #[error("{field} rating {value} is outside {min}-{max}")]
    RatingOutOfRange {
        field: &'static str,
        value: u8,
        min: u8,
        max: u8,
    },

    #[error("Already at the first step")]
    AtFirstStep,

    #[error("Already at the last step")]
    AtLastStep,

    #[error("Step {0} has not been visited yet")]
    NotVisited(WizardStep),

    #[error("Review can only be finished from the summary step")]
    NotAtSummary,
}

/// Field values collected so far
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewDraft {
    pub cigar_id: Option<String>,
    pub cigar_name: String,
    pub vitola: Option<String>,
    pub draw_rating: Option<u8>,
    pub burn_rating: Option<u8>,
    pub construction_rating: Option<u8>,
    pub flavor_notes: FlavorNotes,
    pub rating: Option<u8>,
    pub notes: String,
    pub image_url: Option<String>,
}

fn check_range(field: &'static str, value: Option<u8>, (min, max): (u8, u8)) -> Result<(), WizardError> {
    match value {
        Some(value) if value < min || value > max => Err(WizardError::RatingOutOfRange {
            field,
            value,
            min,
            max,
        }),
        _ => Ok(()),
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[derive(Debug, Clone)]
pub struct ReviewWizard {
    step: WizardStep,
    furthest: WizardStep,
    pub draft: ReviewDraft,
    pub stopwatch: Stopwatch,
}

impl Default for ReviewWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl ReviewWizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::Cigar,
            furthest: WizardStep::Cigar,
            draft: ReviewDraft::default(),
            stopwatch: Stopwatch::new(),
        }
    }

    /// Start from a cigar picked out of a humidor
    pub fn for_cigar(cigar_id: impl Into<String>, cigar_name: impl Into<String>) -> Self {
        let mut wizard = Self::new();
        wizard.draft.cigar_id = Some(cigar_id.into());
        wizard.draft.cigar_name = cigar_name.into();
        wizard
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn is_visited(&self, step: WizardStep) -> bool {
        step <= self.furthest
    }

    /// Check the fields owned by `step`
    pub fn validate(&self, step: WizardStep) -> Result<(), WizardError> {
        let draft = &self.draft;
        match step {
            WizardStep::Cigar => {
                if draft.cigar_name.trim().is_empty() {
                    return Err(WizardError::MissingCigarName);
                }
            }
            WizardStep::Smoke => {
                check_range("Draw", draft.draw_rating, DETAIL_RATING_RANGE)?;
                check_range("Burn", draft.burn_rating, DETAIL_RATING_RANGE)?;
                check_range("Construction", draft.construction_rating, DETAIL_RATING_RANGE)?;
            }
            WizardStep::Tasting => {}
            WizardStep::Verdict => {
                if draft.rating.is_none() {
                    return Err(WizardError::MissingRating);
                }
                check_range("Overall", draft.rating, RATING_RANGE)?;
            }
            WizardStep::Summary => {
                for step in &WizardStep::ALL[..WizardStep::Summary.index()] {
                    self.validate(*step)?;
                }
            }
        }
        Ok(())
    }

    /// Validate the current step and advance
    pub fn next(&mut self) -> Result<WizardStep, WizardError> {
        let next = self.step.next().ok_or(WizardError::AtLastStep)?;
        self.validate(self.step)?;
        self.step = next;
        self.furthest = self.furthest.max(next);
        Ok(next)
    }

    pub fn back(&mut self) -> Result<WizardStep, WizardError> {
        let previous = self.step.previous().ok_or(WizardError::AtFirstStep)?;
        self.step = previous;
        Ok(previous)
    }

    /// Jump to a step that has already been reached
    pub fn jump_to(&mut self, step: WizardStep) -> Result<WizardStep, WizardError> {
        if !self.is_visited(step) {
            return Err(WizardError::NotVisited(step));
        }
        self.step = step;
        Ok(step)
    }

    pub fn finish(&mut self) -> Result<NewReview, WizardError> {
        self.finish_at(Instant::now())
    }

    /// Build the review payload; stops the stopwatch if it is still running
    pub fn finish_at(&mut self, now: Instant) -> Result<NewReview, WizardError> {
        if self.step != WizardStep::Summary {
            return Err(WizardError::NotAtSummary);
        }
        self.validate(WizardStep::Summary)?;
        self.stopwatch.pause_at(now);

        let draft = &self.draft;
        let elapsed = self.stopwatch.elapsed_at(now).as_secs();
        Ok(NewReview {
            cigar_id: draft.cigar_id.clone(),
            cigar_name: draft.cigar_name.trim().to_string(),
            vitola: draft.vitola.as_deref().and_then(non_blank),
            rating: draft.rating.unwrap_or_default(),
            draw_rating: draft.draw_rating,
            burn_rating: draft.burn_rating,
            construction_rating: draft.construction_rating,
            flavor_notes: draft.flavor_notes.clone(),
            notes: non_blank(&draft.notes),
            smoke_duration_secs: (elapsed > 0).then_some(elapsed),
            image_url: draft.image_url.clone(),
        })
    }

    /// Back to a blank first step
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn filled() -> ReviewWizard {
        let mut wizard = ReviewWizard::new();
        wizard.draft.cigar_name = "  Oliva Serie V Melanio ".to_string();
        wizard.draft.vitola = Some("Figurado".to_string());
        wizard.draft.rating = Some(92);
        wizard
    }

    #[test]
    fn test_one_step_at_a_time() {
        let mut wizard = filled();
        let mut seen = vec![wizard.step()];
        while wizard.step() != WizardStep::Summary {
            seen.push(wizard.next().unwrap());
        }
        assert_eq!(seen, WizardStep::ALL.to_vec());
        assert_eq!(wizard.next(), Err(WizardError::AtLastStep));
    }

    #[test]
    fn test_refuses_to_advance_without_cigar_name() {
        let mut wizard = ReviewWizard::new();
        wizard.draft.cigar_name = "   ".to_string();

        assert_eq!(wizard.next(), Err(WizardError::MissingCigarName));
        assert_eq!(wizard.step(), WizardStep::Cigar);
    }

    #[test]
    fn test_detail_ratings_must_be_one_to_five() {
        let mut wizard = filled();
        wizard.next().unwrap();
        wizard.draft.burn_rating = Some(0);

        let err = wizard.next().unwrap_err();
        assert_eq!(
            err,
            WizardError::RatingOutOfRange {
                field: "Burn",
                value: 0,
                min: 1,
                max: 5
            }
        );
        assert_eq!(err.to_string(), "Burn rating 0 is outside 1-5");

        wizard.draft.burn_rating = Some(5);
        assert_eq!(wizard.next(), Ok(WizardStep::Tasting));
    }

    #[test]
    fn test_verdict_requires_rating_in_range() {
        let mut wizard = filled();
        wizard.draft.rating = None;
        wizard.jump_to(WizardStep::Cigar).unwrap();
        for _ in 0..3 {
            wizard.next().unwrap();
        }
        assert_eq!(wizard.step(), WizardStep::Verdict);
        assert_eq!(wizard.next(), Err(WizardError::MissingRating));

        wizard.draft.rating = Some(101);
        assert!(matches!(wizard.next(), Err(WizardError::RatingOutOfRange { .. })));

        wizard.draft.rating = Some(100);
        assert_eq!(wizard.next(), Ok(WizardStep::Summary));
    }

    #[test]
    fn test_back_and_jump_only_to_visited_steps() {
        let mut wizard = filled();
        assert_eq!(wizard.back(), Err(WizardError::AtFirstStep));

        wizard.next().unwrap();
        wizard.next().unwrap();
        assert_eq!(
            wizard.jump_to(WizardStep::Verdict),
            Err(WizardError::NotVisited(WizardStep::Verdict))
        );

        assert_eq!(wizard.back(), Ok(WizardStep::Smoke));
        assert_eq!(wizard.jump_to(WizardStep::Tasting), Ok(WizardStep::Tasting));
        assert_eq!(wizard.jump_to(WizardStep::Cigar), Ok(WizardStep::Cigar));
    }

    #[test]
    fn test_finish_only_from_summary() {
        let mut wizard = filled();
        assert_eq!(wizard.finish(), Err(WizardError::NotAtSummary));
    }

    #[test]
    fn test_finish_builds_review_with_smoke_time() {
        let t0 = Instant::now();
        let mut wizard = filled();
        wizard.next().unwrap();

        wizard.stopwatch.start_at(t0);
        wizard.stopwatch.pause_at(t0 + Duration::from_secs(1200));
        wizard.stopwatch.resume_at(t0 + Duration::from_secs(1500));
        wizard.draft.draw_rating = Some(4);
        wizard.draft.flavor_notes.first_third = vec!["cedar".to_string()];
        wizard.draft.notes = " Slow, even burn. ".to_string();

        while wizard.step() != WizardStep::Summary {
            wizard.next().unwrap();
        }

        let review = wizard.finish_at(t0 + Duration::from_secs(4500)).unwrap();
        assert_eq!(review.cigar_name, "Oliva Serie V Melanio");
        assert_eq!(review.rating, 92);
        assert_eq!(review.draw_rating, Some(4));
        assert_eq!(review.smoke_duration_secs, Some(4200));
        assert_eq!(review.notes.as_deref(), Some("Slow, even burn."));
        assert_eq!(review.flavor_notes.first_third, vec!["cedar"]);
        assert!(!wizard.stopwatch.is_running());
    }

    #[test]
    fn test_unused_stopwatch_leaves_duration_empty() {
        let mut wizard = ReviewWizard::for_cigar("c7", "Padron 1964");
        wizard.draft.rating = Some(88);
        while wizard.step() != WizardStep::Summary {
            wizard.next().unwrap();
        }

        let review = wizard.finish().unwrap();
        assert_eq!(review.cigar_id.as_deref(), Some("c7"));
        assert_eq!(review.smoke_duration_secs, None);

        wizard.reset();
        assert_eq!(wizard.step(), WizardStep::Cigar);
        assert!(wizard.draft.cigar_name.is_empty());
    }
}
