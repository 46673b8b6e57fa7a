use std::sync::Arc;

use crate::api::QuizApi;
use crate::errors::{AppError, AppResult};
use crate::models::domain::question::{Question, QuestionKind};
use crate::models::dto::{CreateChoiceRequest, CreateQuestionRequest};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WizardStep {
    ChooseType,
    EnterText,
    Options,
    Confirm,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChoiceEntry {
    pub text: String,
    pub is_correct: bool,
}

/// Type-specific option state. The variant determines the step sequence and
/// the save payload.
#[derive(Clone, Debug, PartialEq, Eq)]
enum OptionsDraft {
    MultipleChoice { entries: Vec<ChoiceEntry> },
    TrueFalse { answer: bool },
    ShortAnswer,
}

impl OptionsDraft {
    fn for_kind(kind: QuestionKind) -> Self {
        match kind {
            QuestionKind::MultipleChoice => OptionsDraft::MultipleChoice {
                entries: vec![ChoiceEntry::default(), ChoiceEntry::default()],
            },
            QuestionKind::TrueFalse => OptionsDraft::TrueFalse { answer: true },
            QuestionKind::ShortAnswer => OptionsDraft::ShortAnswer,
        }
    }

    fn kind(&self) -> QuestionKind {
        match self {
            OptionsDraft::MultipleChoice { .. } => QuestionKind::MultipleChoice,
            OptionsDraft::TrueFalse { .. } => QuestionKind::TrueFalse,
            OptionsDraft::ShortAnswer => QuestionKind::ShortAnswer,
        }
    }

    /// Whether this kind has an options step at all.
    fn has_options_step(&self) -> bool {
        !matches!(self, OptionsDraft::ShortAnswer)
    }
}

/// How many multiple-choice entries must be marked correct at save time.
/// Lenient (zero or more) is the default and supports multi-select
/// questions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CorrectChoicePolicy {
    #[default]
    Lenient,
    RequireAtLeastOne,
    RequireExactlyOne,
}

/// Multi-step authoring of a single question plus its choices:
/// choose type, enter text, type-specific options, confirm.
///
/// Saving is a create-question-then-create-choices sequence with no server
/// transaction. Rather than leaving an orphan on partial failure, the wizard
/// compensates by deleting the just-created question and surfaces the error
/// with the step still at `Confirm` so the teacher can retry.
pub struct QuestionWizard {
    api: Arc<dyn QuizApi>,
    quiz_id: String,
    policy: CorrectChoicePolicy,
    questions: Vec<Question>,
    step: WizardStep,
    text: String,
    options: OptionsDraft,
}

impl QuestionWizard {
    pub fn new(api: Arc<dyn QuizApi>, quiz_id: impl Into<String>) -> Self {
        Self {
            api,
            quiz_id: quiz_id.into(),
            policy: CorrectChoicePolicy::default(),
            questions: Vec::new(),
            step: WizardStep::ChooseType,
            text: String::new(),
            options: OptionsDraft::for_kind(QuestionKind::MultipleChoice),
        }
    }

    pub fn with_policy(mut self, policy: CorrectChoicePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn kind(&self) -> QuestionKind {
        self.options.kind()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Existing questions of the quiz, as last fetched.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn choice_entries(&self) -> Option<&[ChoiceEntry]> {
        match &self.options {
            OptionsDraft::MultipleChoice { entries } => Some(entries),
            _ => None,
        }
    }

    pub fn true_false_answer(&self) -> Option<bool> {
        match &self.options {
            OptionsDraft::TrueFalse { answer } => Some(*answer),
            _ => None,
        }
    }

    /// Refreshes the question list. A failed fetch is logged and the
    /// previous list kept; list reads degrade rather than error.
    pub async fn load_questions(&mut self) {
        match self.api.questions_for_quiz(&self.quiz_id).await {
            Ok(questions) => self.questions = questions,
            Err(err) => log::error!("Failed to load questions for quiz {}: {}", self.quiz_id, err),
        }
    }

    /// Picks the question type. Only meaningful on the first step; switching
    /// type resets the options draft to that type's initial state.
    pub fn choose_kind(&mut self, kind: QuestionKind) -> AppResult<()> {
        if self.step != WizardStep::ChooseType {
            return Err(AppError::ValidationError(
                "Question type is chosen on the first step".to_string(),
            ));
        }
        self.options = OptionsDraft::for_kind(kind);
        Ok(())
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn set_true_false(&mut self, answer: bool) -> AppResult<()> {
        match &mut self.options {
            OptionsDraft::TrueFalse { answer: current } => {
                *current = answer;
                Ok(())
            }
            _ => Err(AppError::ValidationError(
                "Not a true/false question".to_string(),
            )),
        }
    }

    /// Appends a blank choice entry. Entries can be added but not removed;
    /// blank ones are skipped at save time.
    pub fn add_choice_entry(&mut self) -> AppResult<()> {
        match &mut self.options {
            OptionsDraft::MultipleChoice { entries } => {
                entries.push(ChoiceEntry::default());
                Ok(())
            }
            _ => Err(AppError::ValidationError(
                "Not a multiple choice question".to_string(),
            )),
        }
    }

    pub fn set_choice_entry(
        &mut self,
        index: usize,
        text: impl Into<String>,
        is_correct: bool,
    ) -> AppResult<()> {
        match &mut self.options {
            OptionsDraft::MultipleChoice { entries } => {
                let entry = entries.get_mut(index).ok_or_else(|| {
                    AppError::ValidationError(format!("No choice entry at index {}", index))
                })?;
                entry.text = text.into();
                entry.is_correct = is_correct;
                Ok(())
            }
            _ => Err(AppError::ValidationError(
                "Not a multiple choice question".to_string(),
            )),
        }
    }

    /// Moves to the next step. Short answer questions skip the options step
    /// entirely: text goes straight to confirm.
    pub fn advance(&mut self) {
        self.step = match self.step {
            WizardStep::ChooseType => WizardStep::EnterText,
            WizardStep::EnterText if self.options.has_options_step() => WizardStep::Options,
            WizardStep::EnterText => WizardStep::Confirm,
            WizardStep::Options => WizardStep::Confirm,
            WizardStep::Confirm => WizardStep::Confirm,
        };
    }

    /// Moves to the previous step. The short-answer skip is symmetric:
    /// confirm goes back to the text step, never to options.
    pub fn back(&mut self) {
        self.step = match self.step {
            WizardStep::Confirm if self.options.has_options_step() => WizardStep::Options,
            WizardStep::Confirm => WizardStep::EnterText,
            WizardStep::Options => WizardStep::EnterText,
            WizardStep::EnterText => WizardStep::ChooseType,
            WizardStep::ChooseType => WizardStep::ChooseType,
        };
    }

    /// Creates the question, then its choices, then resets the wizard and
    /// refreshes the question list. On a choice-creation failure the
    /// just-created question is deleted (best effort) and the error
    /// surfaced; the wizard state is untouched so the teacher can retry.
    pub async fn save(&mut self) -> AppResult<()> {
        if self.step != WizardStep::Confirm {
            return Err(AppError::ValidationError(
                "Nothing to save before the confirm step".to_string(),
            ));
        }
        self.validate_draft()?;

        let request = CreateQuestionRequest {
            quiz: self.quiz_id.clone(),
            text: self.text.trim().to_string(),
            kind: self.kind(),
            points: 1,
            order: self.questions.len() as u32 + 1,
        };

        let question = self.api.create_question(&request).await.map_err(|err| {
            log::error!("Failed to save question: {}", err);
            err
        })?;

        if let Err(err) = self.create_choices(&question.id).await {
            log::error!(
                "Choice creation failed for question {}, rolling it back: {}",
                question.id,
                err
            );
            if let Err(cleanup_err) = self.api.delete_question(&question.id).await {
                log::error!(
                    "Could not delete question {} after failed save: {}",
                    question.id,
                    cleanup_err
                );
            }
            return Err(err);
        }

        self.load_questions().await;
        self.reset();
        Ok(())
    }

    /// Deletes an existing question and refreshes the list.
    pub async fn delete_question(&mut self, question_id: &str) -> AppResult<()> {
        self.api.delete_question(question_id).await.map_err(|err| {
            log::error!("Failed to delete question {}: {}", question_id, err);
            err
        })?;
        self.load_questions().await;
        Ok(())
    }

    fn validate_draft(&self) -> AppResult<()> {
        if self.text.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Question text is required".to_string(),
            ));
        }

        if let OptionsDraft::MultipleChoice { entries } = &self.options {
            let filled: Vec<&ChoiceEntry> = entries
                .iter()
                .filter(|e| !e.text.trim().is_empty())
                .collect();

            if filled.is_empty() {
                return Err(AppError::ValidationError(
                    "At least one non-empty choice is required".to_string(),
                ));
            }

            let correct = filled.iter().filter(|e| e.is_correct).count();
            match self.policy {
                CorrectChoicePolicy::Lenient => {}
                CorrectChoicePolicy::RequireAtLeastOne if correct == 0 => {
                    return Err(AppError::ValidationError(
                        "Mark at least one choice as correct".to_string(),
                    ));
                }
                CorrectChoicePolicy::RequireExactlyOne if correct != 1 => {
                    return Err(AppError::ValidationError(
                        "Mark exactly one choice as correct".to_string(),
                    ));
                }
                _ => {}
            }
        }
        Ok(())
    }

    async fn create_choices(&self, question_id: &str) -> AppResult<()> {
        match &self.options {
            OptionsDraft::ShortAnswer => Ok(()),
            OptionsDraft::TrueFalse { answer } => {
                // Materialized here, never user-shaped: exactly one of the
                // two records is marked correct.
                self.api
                    .create_choice(&CreateChoiceRequest {
                        question: question_id.to_string(),
                        text: "True".to_string(),
                        is_correct: *answer,
                        order: 0,
                    })
                    .await?;
                self.api
                    .create_choice(&CreateChoiceRequest {
                        question: question_id.to_string(),
                        text: "False".to_string(),
                        is_correct: !*answer,
                        order: 1,
                    })
                    .await?;
                Ok(())
            }
            OptionsDraft::MultipleChoice { entries } => {
                for (index, entry) in entries.iter().enumerate() {
                    if entry.text.trim().is_empty() {
                        continue; // skip empty
                    }
                    self.api
                        .create_choice(&CreateChoiceRequest {
                            question: question_id.to_string(),
                            text: entry.text.clone(),
                            is_correct: entry.is_correct,
                            order: index as u32,
                        })
                        .await?;
                }
                Ok(())
            }
        }
    }

    fn reset(&mut self) {
        self.step = WizardStep::ChooseType;
        self.text.clear();
        self.options = OptionsDraft::for_kind(QuestionKind::MultipleChoice);
    }
}
