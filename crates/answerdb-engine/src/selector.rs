use tracing::debug;

use answerdb_core::config::QuerySettings;
use answerdb_core::types::{RankedCandidate, RenderStyle};

use crate::format::AnswerFormatter;

/// Slack for f32 rounding at the tie-window boundary.
const TIE_EPSILON: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnswerPolicy {
    /// Minimum top score for any answer.
    pub answer_threshold: f32,
    /// Candidates within this distance of the top score are all answers.
    pub tie_tolerance: f32,
    /// Character budget of a multi-answer digest, preamble excluded.
    pub character_limit: usize,
    pub max_answers: usize,
}

impl From<&QuerySettings> for AnswerPolicy {
    fn from(settings: &QuerySettings) -> Self {
        Self {
            answer_threshold: settings.answer_threshold,
            tie_tolerance: settings.similarity_threshold,
            character_limit: settings.character_limit,
            max_answers: settings.max_answers,
        }
    }
}

/// Terminal states of answer selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    NotFound,
    Single(String),
    Multi(Vec<String>),
}

pub struct AnswerSelector {
    policy: AnswerPolicy,
    formatter: AnswerFormatter,
}

impl AnswerSelector {
    pub fn new(policy: AnswerPolicy, formatter: AnswerFormatter) -> Self {
        Self { policy, formatter }
    }

    pub fn policy(&self) -> &AnswerPolicy {
        &self.policy
    }

    /// `ranked` must be sorted by descending score.
    pub fn select(&self, ranked: &[RankedCandidate], style: RenderStyle) -> Outcome {
        let Some(top) = ranked.first().map(|c| c.score) else {
            return Outcome::NotFound;
        };
        debug!(top, threshold = self.policy.answer_threshold, "top similarity");
        if top < self.policy.answer_threshold {
            return Outcome::NotFound;
        }

        let mut answers: Vec<String> = ranked
            .iter()
            .take_while(|c| top - c.score <= self.policy.tie_tolerance + TIE_EPSILON)
            .map(|c| self.formatter.format(&c.document, style))
            .collect();
        if answers.len() == 1 {
            return Outcome::Single(answers.remove(0));
        }

        let tied = answers.len();
        let mut kept = 0;
        let mut chars = 0;
        while chars < self.policy.character_limit && kept < answers.len() {
            chars += answers[kept].chars().count();
            kept += 1;
        }
        answers.truncate(kept.max(1).min(self.policy.max_answers.max(1)));
        debug!(tied, kept = answers.len(), chars, "selected answers");

        if answers.len() == 1 {
            Outcome::Single(answers.remove(0))
        } else {
            Outcome::Multi(answers)
        }
    }
}
