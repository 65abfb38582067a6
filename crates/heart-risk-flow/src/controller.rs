use std::sync::Arc;
use std::time::Duration;

use risk_predictor::{PredictionClient, PredictionUnavailable};
use risk_spec::{
    AnswerSet, AnswerValue, ContentTables, InvalidAnswerInput, Language, PredictionResult,
    QuestionSpec, ScreenState, ScreenView, build_request, build_screen, validate_answer,
};
use time::OffsetDateTime;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::FlowError;
use crate::job::{PredictionCompletion, PredictionJob, PredictionTicket};

#[derive(Debug, Clone, PartialEq)]
pub enum FlowPhase {
    Questioning,
    Predicting(PredictionTicket),
    ShowingResult(PredictionResult),
    Unavailable(PredictionUnavailable),
}

impl FlowPhase {
    fn name(&self) -> &'static str {
        match self {
            FlowPhase::Questioning => "questioning",
            FlowPhase::Predicting(_) => "a prediction is pending",
            FlowPhase::ShowingResult(_) => "showing a result",
            FlowPhase::Unavailable(_) => "the prediction is unavailable",
        }
    }
}

/// Outcome of a successful `advance`.
#[derive(Debug)]
#[must_use = "a submitted job has to be run, or the flow stays pending"]
pub enum Advance {
    Moved { step: usize },
    /// The last question was answered. Run the job and feed its completion back
    /// through [`FlowController::apply_prediction`]; until then only `reset` and
    /// `set_language` are accepted.
    Submitted(PredictionJob),
}

/// Owns the step index, answers, language and prediction state of one session.
///
/// Every mutation is a discrete, synchronous call. The only asynchronous work
/// is a [`PredictionJob`], which runs detached and reports back through
/// [`FlowController::apply_prediction`].
pub struct FlowController {
    tables: Arc<ContentTables>,
    predictor: Arc<dyn PredictionClient>,
    timeout: Duration,
    session: Uuid,
    generation: u64,
    sequence: u64,
    language: Language,
    step: usize,
    answers: AnswerSet,
    phase: FlowPhase,
    issue: Option<InvalidAnswerInput>,
    inflight: Option<CancellationToken>,
}

impl FlowController {
    pub fn new(
        tables: Arc<ContentTables>,
        predictor: Arc<dyn PredictionClient>,
        timeout: Duration,
    ) -> Self {
        let form = tables.form();
        let answers = AnswerSet::new(form.id.clone(), form.version.clone());
        Self {
            tables,
            predictor,
            timeout,
            session: Uuid::new_v4(),
            generation: 0,
            sequence: 0,
            language: Language::default(),
            step: 0,
            answers,
            phase: FlowPhase::Questioning,
            issue: None,
            inflight: None,
        }
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn tables(&self) -> &ContentTables {
        &self.tables
    }

    pub fn session(&self) -> Uuid {
        self.session
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn phase(&self) -> &FlowPhase {
        &self.phase
    }

    /// The validation error blocking the current step, if any.
    pub fn issue(&self) -> Option<&InvalidAnswerInput> {
        self.issue.as_ref()
    }

    pub fn prediction(&self) -> Option<&PredictionResult> {
        match &self.phase {
            FlowPhase::ShowingResult(result) => Some(result),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.phase, FlowPhase::Predicting(_))
    }

    pub fn current_question(&self) -> Option<&QuestionSpec> {
        self.tables.form().question(self.step)
    }

    fn ensure_questioning(&self) -> Result<(), FlowError> {
        match self.phase {
            FlowPhase::Questioning => Ok(()),
            ref phase => Err(FlowError::NavigationLocked {
                phase: phase.name(),
            }),
        }
    }

    /// Upserts an answer. Returns whether the stored value changed.
    pub fn record_answer(
        &mut self,
        key: &str,
        value: impl Into<AnswerValue>,
    ) -> Result<bool, FlowError> {
        self.ensure_questioning()?;
        if self.tables.form().question_by_key(key).is_none() {
            return Err(FlowError::UnknownQuestion(key.to_string()));
        }
        let changed = self.answers.upsert(key, value.into());
        if changed {
            if self.issue.as_ref().is_some_and(|issue| issue.key == key) {
                self.issue = None;
            }
            self.answers.stamp(OffsetDateTime::now_utc());
        }
        Ok(changed)
    }

    /// Records an answer for the question at the current step.
    pub fn answer_current(&mut self, value: impl Into<AnswerValue>) -> Result<bool, FlowError> {
        let key = self
            .current_question()
            .map(|question| question.key.clone())
            .ok_or(FlowError::NavigationLocked {
                phase: self.phase.name(),
            })?;
        self.record_answer(&key, value)
    }

    /// Moves to the next question, or submits the answers from the last one.
    ///
    /// The current answer must be valid. On submission every answer is checked
    /// again and the flow jumps back to the first invalid one.
    pub fn advance(&mut self) -> Result<Advance, FlowError> {
        self.ensure_questioning()?;
        let form = self.tables.form();
        if let Some(question) = form.question(self.step)
            && let Err(issue) = validate_answer(question, self.answers.get(&question.key))
        {
            debug!(key = %issue.key, "advance blocked by invalid answer");
            self.issue = Some(issue.clone());
            return Err(issue.into());
        }
        self.issue = None;

        if form.last_index().is_some_and(|last| self.step < last) {
            self.step += 1;
            debug!(step = self.step, "advanced");
            return Ok(Advance::Moved { step: self.step });
        }

        match build_request(form, &self.answers) {
            Ok(request) => {
                let job = self.submit(request);
                Ok(Advance::Submitted(job))
            }
            Err(issue) => {
                if let Some(position) = form.position(&issue.key) {
                    self.step = position;
                }
                self.issue = Some(issue.clone());
                Err(issue.into())
            }
        }
    }

    fn submit(&mut self, request: risk_spec::PredictionRequest) -> PredictionJob {
        self.sequence += 1;
        let ticket = PredictionTicket {
            session: self.session,
            generation: self.generation,
            sequence: self.sequence,
        };
        let cancel = CancellationToken::new();
        self.inflight = Some(cancel.clone());
        self.phase = FlowPhase::Predicting(ticket);
        debug!(%ticket, "prediction submitted");
        PredictionJob {
            ticket,
            request,
            predictor: Arc::clone(&self.predictor),
            timeout: self.timeout,
            cancel,
        }
    }

    /// Steps back one question. Returns `false` at the first question.
    pub fn retreat(&mut self) -> Result<bool, FlowError> {
        self.ensure_questioning()?;
        if self.step == 0 {
            return Ok(false);
        }
        self.step -= 1;
        self.issue = None;
        debug!(step = self.step, "retreated");
        Ok(true)
    }

    /// Swaps the display language. Answers, step and any pending request are untouched.
    pub fn set_language(&mut self, language: Language) -> bool {
        let changed = self.language != language;
        self.language = language;
        changed
    }

    /// Returns to the first question with no answers, cancelling any pending request.
    pub fn reset(&mut self) {
        if let Some(token) = self.inflight.take() {
            token.cancel();
        }
        self.generation += 1;
        self.step = 0;
        self.answers.clear();
        self.phase = FlowPhase::Questioning;
        self.issue = None;
        debug!(session = %self.session, generation = self.generation, "flow reset");
    }

    /// Applies a finished prediction if it belongs to the pending request.
    pub fn apply_prediction(&mut self, completion: PredictionCompletion) -> Result<(), FlowError> {
        let PredictionCompletion { ticket, outcome } = completion;
        if self.phase != FlowPhase::Predicting(ticket) {
            warn!(%ticket, "discarding stale prediction response");
            return Err(FlowError::StaleResponse { ticket });
        }
        self.inflight = None;
        self.phase = match outcome {
            Ok(result) => {
                debug!(%ticket, risk = ?result.risk_level, "prediction applied");
                FlowPhase::ShowingResult(result)
            }
            Err(err) => {
                warn!(%ticket, error = %err, "prediction unavailable");
                FlowPhase::Unavailable(err)
            }
        };
        Ok(())
    }

    /// Resubmits the same answers after a failed prediction.
    pub fn retry(&mut self) -> Result<PredictionJob, FlowError> {
        if !matches!(self.phase, FlowPhase::Unavailable(_)) {
            return Err(FlowError::NotRetryable);
        }
        let request = build_request(self.tables.form(), &self.answers)?;
        Ok(self.submit(request))
    }

    /// `advance`, then wait for the prediction in place when one was submitted.
    pub async fn advance_and_resolve(&mut self) -> Result<&FlowPhase, FlowError> {
        if let Advance::Submitted(job) = self.advance()? {
            let completion = job.run().await;
            self.apply_prediction(completion)?;
        }
        Ok(&self.phase)
    }

    pub async fn retry_and_resolve(&mut self) -> Result<&FlowPhase, FlowError> {
        let job = self.retry()?;
        let completion = job.run().await;
        self.apply_prediction(completion)?;
        Ok(&self.phase)
    }

    /// Projection of the current state in the active language.
    pub fn screen(&self) -> ScreenView {
        let state = match &self.phase {
            FlowPhase::Questioning => ScreenState::Question {
                step: self.step,
                value: self
                    .current_question()
                    .and_then(|question| self.answers.get(&question.key)),
                error: self.issue.as_ref(),
            },
            FlowPhase::Predicting(_) => ScreenState::Pending,
            FlowPhase::ShowingResult(result) => ScreenState::Result(result),
            FlowPhase::Unavailable(_) => ScreenState::Unavailable,
        };
        build_screen(&self.tables, self.language, state)
    }
}
