//! Review Wizard State
//!
//! Steps, draft fields and the smoke stopwatch behind the review form. Time
//! is passed in as epoch milliseconds so the logic runs outside a browser.

use crate::models::{FlavorNotes, NewReview};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
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
            WizardStep::Tasting => "Tasting",
            WizardStep::Verdict => "Verdict",
            WizardStep::Summary => "Summary",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum StopwatchState {
    #[default]
    Idle,
    Running,
    Paused,
}

/// Accumulates smoke time across pauses
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Stopwatch {
    pub state: StopwatchState,
    banked_ms: f64,
    since_ms: f64,
}

impl Stopwatch {
    pub fn start(&mut self, now_ms: f64) {
        if self.state == StopwatchState::Idle {
            self.state = StopwatchState::Running;
            self.since_ms = now_ms;
        }
    }

    pub fn pause(&mut self, now_ms: f64) {
        if self.state == StopwatchState::Running {
            self.banked_ms += (now_ms - self.since_ms).max(0.0);
            self.state = StopwatchState::Paused;
        }
    }

    pub fn resume(&mut self, now_ms: f64) {
        if self.state == StopwatchState::Paused {
            self.state = StopwatchState::Running;
            self.since_ms = now_ms;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn elapsed_secs(&self, now_ms: f64) -> u64 {
        let running = match self.state {
            StopwatchState::Running => (now_ms - self.since_ms).max(0.0),
            _ => 0.0,
        };
        ((self.banked_ms + running) / 1000.0) as u64
    }
}

/// "m:ss", or "h:mm:ss" from an hour up
pub fn format_elapsed(secs: u64) -> String {
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{}:{:02}", m, s)
    }
}

/// Field values collected so far
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WizardDraft {
    pub cigar_name: String,
    pub vitola: String,
    pub draw_rating: Option<u8>,
    pub burn_rating: Option<u8>,
    pub construction_rating: Option<u8>,
    pub first_third: String,
    pub second_third: String,
    pub final_third: String,
    pub rating: Option<u8>,
    pub notes: String,
    pub image_url: Option<String>,
}

fn notes_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(|n| n.trim().to_lowercase())
        .filter(|n| !n.is_empty())
        .collect()
}

fn non_blank(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl WizardDraft {
    /// Message for the first problem on `step`, if any
    pub fn problem(&self, step: WizardStep) -> Option<String> {
        let detail = |label: &str, value: Option<u8>| match value {
            Some(v) if !(1..=5).contains(&v) => Some(format!("{} rating must be 1-5", label)),
            _ => None,
        };

        match step {
            WizardStep::Cigar => self
                .cigar_name
                .trim()
                .is_empty()
                .then(|| "Name the cigar you smoked".to_string()),
            WizardStep::Smoke => detail("Draw", self.draw_rating)
                .or_else(|| detail("Burn", self.burn_rating))
                .or_else(|| detail("Construction", self.construction_rating)),
            WizardStep::Tasting => None,
            WizardStep::Verdict | WizardStep::Summary => match self.rating {
                None => Some("Give an overall score".to_string()),
                Some(r) if r > 100 => Some("Score must be 0-100".to_string()),
                Some(_) if step == WizardStep::Summary => self.problem(WizardStep::Cigar),
                Some(_) => None,
            },
        }
    }

    pub fn to_review(&self, smoke_secs: u64) -> NewReview {
        NewReview {
            cigar_name: self.cigar_name.trim().to_string(),
            vitola: non_blank(&self.vitola),
            rating: self.rating.unwrap_or_default(),
            draw_rating: self.draw_rating,
            burn_rating: self.burn_rating,
            construction_rating: self.construction_rating,
            flavor_notes: FlavorNotes {
                first_third: notes_list(&self.first_third),
                second_third: notes_list(&self.second_third),
                final_third: notes_list(&self.final_third),
            },
            notes: non_blank(&self.notes),
            smoke_duration_secs: (smoke_secs > 0).then_some(smoke_secs),
            image_url: self.image_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stopwatch_accumulates() {
        let mut watch = Stopwatch::default();
        watch.start(1_000.0);
        watch.pause(61_000.0);
        assert_eq!(watch.elapsed_secs(500_000.0), 60);

        watch.resume(100_000.0);
        assert_eq!(watch.elapsed_secs(130_000.0), 90);
        assert_eq!(format_elapsed(watch.elapsed_secs(130_000.0)), "1:30");
    }

    #[test]
    fn test_draft_validation() {
        let mut draft = WizardDraft::default();
        assert!(draft.problem(WizardStep::Cigar).is_some());
        draft.cigar_name = "Padron 1964".to_string();
        assert!(draft.problem(WizardStep::Cigar).is_none());

        draft.burn_rating = Some(7);
        assert_eq!(
            draft.problem(WizardStep::Smoke).as_deref(),
            Some("Burn rating must be 1-5")
        );
        draft.burn_rating = Some(4);

        assert!(draft.problem(WizardStep::Verdict).is_some());
        draft.rating = Some(92);
        assert!(draft.problem(WizardStep::Summary).is_none());
    }

    #[test]
    fn test_draft_to_review() {
        let draft = WizardDraft {
            cigar_name: " Oliva Serie V ".to_string(),
            first_third: "Cedar, pepper,".to_string(),
            rating: Some(90),
            ..Default::default()
        };
        let review = draft.to_review(0);
        assert_eq!(review.cigar_name, "Oliva Serie V");
        assert_eq!(review.flavor_notes.first_third, vec!["cedar", "pepper"]);
        assert_eq!(review.smoke_duration_secs, None);
        assert_eq!(review.vitola, None);
    }
}
