//! Workflow engine: the per-message state machine.
//!
//! Given the current [`ConversationState`] and a [`ClassifiedMessage`],
//! [`WorkflowEngine::process`] computes the next state and the text to
//! send back. The engine is pure: it does no I/O and never fails. Invalid
//! input leaves the state untouched and answers with a localized error.

use std::sync::Arc;

use crate::domain::dialogue::{
    DialogueDefinition, DialogueDocument, ErrorCatalog, ErrorKind, Language, Phase,
    PhaseSequencer, DEFAULT_LANGUAGE_CODE,
};
use crate::domain::foundation::{StateMachine, UserId};

use super::message::ClassifiedMessage;
use super::state::ConversationState;

/// Shortest accepted audio answer, in seconds (inclusive).
pub const MIN_AUDIO_SECONDS: u32 = 20;

/// Highest accepted numeric answer in the formulaires phase.
pub const MAX_FORM_ANSWER: u32 = 4;

/// What a processed message did to the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// Input accepted, the dialogue moved forward.
    Accepted,
    /// An audio answer was accepted.
    AudioAccepted { audio_id: String },
    /// Input rejected, state unchanged.
    Rejected(ErrorKind),
    /// Conclusion reached, state cleared.
    Reset,
}

/// Result of processing one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: ConversationState,
    pub response: String,
    pub outcome: TransitionOutcome,
}

impl Transition {
    pub fn is_rejected(&self) -> bool {
        matches!(self.outcome, TransitionOutcome::Rejected(_))
    }

    pub fn into_parts(self) -> (ConversationState, String) {
        (self.state, self.response)
    }
}

/// Drives conversations through the dialogue phases.
#[derive(Debug, Clone)]
pub struct WorkflowEngine {
    sequencer: PhaseSequencer,
    errors: Arc<ErrorCatalog>,
}

impl WorkflowEngine {
    pub fn new(definition: Arc<DialogueDefinition>, errors: Arc<ErrorCatalog>) -> Self {
        Self {
            sequencer: PhaseSequencer::new(definition),
            errors,
        }
    }

    /// Builds an engine from a parsed dialogue document.
    pub fn from_document(document: DialogueDocument) -> Self {
        let (definition, errors) = document.into_parts();
        Self::new(Arc::new(definition), Arc::new(errors))
    }

    pub fn sequencer(&self) -> &PhaseSequencer {
        &self.sequencer
    }

    /// Prompt of a step, if defined.
    pub fn get_step(&self, language: &str, phase: Phase, step: usize) -> Option<&str> {
        self.sequencer.get_step(language, phase, step)
    }

    /// Localized error text. Never fails.
    pub fn error_message(&self, language: &str, kind: ErrorKind) -> &str {
        self.errors.message(language, kind)
    }

    /// Text sent to a user on first contact: the first presentation step
    /// in the default language.
    pub fn greeting(&self) -> &str {
        self.get_step(DEFAULT_LANGUAGE_CODE, Phase::Presentation, 0)
            .unwrap_or_else(|| self.error_message(DEFAULT_LANGUAGE_CODE, ErrorKind::UnknownState))
    }

    /// Processes one message and returns the next state with the response.
    pub fn process_message(
        &self,
        user_id: &UserId,
        message: &ClassifiedMessage,
        state: ConversationState,
    ) -> (ConversationState, String) {
        self.process(user_id, message, state).into_parts()
    }

    /// Processes one message and reports what happened.
    pub fn process(
        &self,
        user_id: &UserId,
        message: &ClassifiedMessage,
        state: ConversationState,
    ) -> Transition {
        let from_phase = state.phase;
        let from_step = state.step;

        let transition = match state.phase {
            Phase::Presentation => self.on_presentation(state, message),
            Phase::Formulaires => self.on_formulaires(state, message),
            Phase::AudioQuestions => self.on_audio_questions(state, message),
            Phase::Conclusion => self.on_conclusion(state),
            Phase::Unknown => self.reject(state, ErrorKind::UnknownState),
        };

        match &transition.outcome {
            TransitionOutcome::Rejected(kind) => tracing::debug!(
                user_id = %user_id,
                phase = %from_phase,
                step = from_step,
                message = message.kind(),
                error = %kind,
                "Message rejected"
            ),
            TransitionOutcome::AudioAccepted { audio_id } => tracing::info!(
                user_id = %user_id,
                audio_id = %audio_id,
                step = from_step,
                "Audio answer accepted"
            ),
            _ => {}
        }
        if !transition.is_rejected() {
            tracing::info!(
                user_id = %user_id,
                from_phase = %from_phase,
                from_step,
                to_phase = %transition.state.phase,
                to_step = transition.state.step,
                "Conversation advanced"
            );
        }

        transition
    }

    // ════════════════════════════════════════════════════════════════════
    // Phase handlers
    // ════════════════════════════════════════════════════════════════════

    fn on_presentation(
        &self,
        state: ConversationState,
        message: &ClassifiedMessage,
    ) -> Transition {
        let Some(language) = message.as_text().and_then(Language::from_token) else {
            return self.reject(state, ErrorKind::LangNotSupported);
        };

        // The missing-prompt error keeps the language the user had before choosing.
        let previous_language = state.language_code();
        let mut next = state;
        next.language = Some(language);
        self.enter_phase(next, Phase::Formulaires, previous_language, TransitionOutcome::Accepted)
    }

    fn on_formulaires(&self, state: ConversationState, message: &ClassifiedMessage) -> Transition {
        match message.as_text().and_then(parse_form_answer) {
            Some(_) => self.advance(state, TransitionOutcome::Accepted),
            None => self.reject(state, ErrorKind::InvalidNumber),
        }
    }

    fn on_audio_questions(
        &self,
        state: ConversationState,
        message: &ClassifiedMessage,
    ) -> Transition {
        match message {
            ClassifiedMessage::Audio { id, duration_secs } if *duration_secs >= MIN_AUDIO_SECONDS => {
                let outcome = TransitionOutcome::AudioAccepted {
                    audio_id: id.clone(),
                };
                self.advance(state, outcome)
            }
            ClassifiedMessage::Audio { .. } => self.reject(state, ErrorKind::AudioTooShort),
            _ => self.reject(state, ErrorKind::NotAudio),
        }
    }

    fn on_conclusion(&self, state: ConversationState) -> Transition {
        let language = state.language_code();
        let response = self
            .get_step(language, Phase::Conclusion, 0)
            .unwrap_or_else(|| self.error_message(language, ErrorKind::UnknownState))
            .to_string();

        Transition {
            state: ConversationState::default(),
            response,
            outcome: TransitionOutcome::Reset,
        }
    }

    // ════════════════════════════════════════════════════════════════════
    // Helpers
    // ════════════════════════════════════════════════════════════════════

    fn reject(&self, state: ConversationState, kind: ErrorKind) -> Transition {
        let response = self.error_message(state.language_code(), kind).to_string();
        Transition {
            state,
            response,
            outcome: TransitionOutcome::Rejected(kind),
        }
    }

    /// Moves to the next step of the current phase, or to the first step
    /// of the following phase once the current one is exhausted.
    fn advance(&self, state: ConversationState, outcome: TransitionOutcome) -> Transition {
        let language = state.language_code();
        let Some(next_step) = state.step.checked_add(1) else {
            return self.reject(state, ErrorKind::UnknownState);
        };

        if let Some(prompt) = self.get_step(language, state.phase, next_step) {
            return Transition {
                response: prompt.to_string(),
                state: ConversationState {
                    step: next_step,
                    ..state
                },
                outcome,
            };
        }

        match self.sequencer.next_phase(state.phase) {
            Some(following) => self.enter_phase(state, following, language, outcome),
            None => self.reject(state, ErrorKind::UnknownState),
        }
    }

    fn enter_phase(
        &self,
        state: ConversationState,
        target: Phase,
        error_language: &str,
        outcome: TransitionOutcome,
    ) -> Transition {
        let phase = match state.phase.transition_to(target) {
            Ok(phase) => phase,
            Err(err) => {
                tracing::warn!(from = %state.phase, to = %target, error = %err, "Invalid phase transition");
                return self.reject(state, ErrorKind::UnknownState);
            }
        };

        let next = ConversationState {
            language: state.language,
            phase,
            step: 0,
        };
        let response = self
            .get_step(next.language_code(), phase, 0)
            .unwrap_or_else(|| self.error_message(error_language, ErrorKind::UnknownState))
            .to_string();

        Transition {
            state: next,
            response,
            outcome,
        }
    }
}

/// Parses a formulaires answer: ASCII digits only after trimming, value
/// within `0..=MAX_FORM_ANSWER`.
pub fn parse_form_answer(input: &str) -> Option<u32> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // Overflowing digit strings are simply out of range.
    trimmed
        .parse::<u32>()
        .ok()
        .filter(|value| *value <= MAX_FORM_ANSWER)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIALOGUE: &str = r#"
QUESTIONS:
  es:
    presentation:
      - text: "Hola! Elige idioma: ES o CAT"
    formulaires:
      - question: "Pregunta 1 (0-4)"
      - question: "Pregunta 2 (0-4)"
    audio_questions:
      - question: "Audio 1"
      - question: "Audio 2"
    conclusion:
      - text: "Gracias!"
  ca:
    presentation:
      - text: "Hola! Tria idioma"
    formulaires:
      - question: "Pregunta 1 (0-4) ca"
      - question: "Pregunta 2 (0-4) ca"
    audio_questions:
      - question: "Àudio 1"
    conclusion:
      - text: "Gràcies!"
ERRORS:
  es:
    LANG_NOT_SUPPORTED: "Idioma no soportado"
    INVALID_NUMBER: "Número inválido"
    NOT_AUDIO: "Envía un audio"
    AUDIO_TOO_SHORT: "Audio demasiado corto"
    UNKNOWN_STATE: "Estado desconocido"
  ca:
    LANG_NOT_SUPPORTED: "Idioma no suportat"
    INVALID_NUMBER: "Número invàlid"
    NOT_AUDIO: "Envia un àudio"
    AUDIO_TOO_SHORT: "Àudio massa curt"
    UNKNOWN_STATE: "Estat desconegut"
"#;

    fn engine() -> WorkflowEngine {
        WorkflowEngine::from_document(DialogueDocument::from_yaml_str(DIALOGUE).unwrap())
    }

    fn engine_from(source: &str) -> WorkflowEngine {
        WorkflowEngine::from_document(DialogueDocument::from_yaml_str(source).unwrap())
    }

    fn user() -> UserId {
        UserId::new("telegram:1").unwrap()
    }

    fn at(language: Option<Language>, phase: Phase, step: usize) -> ConversationState {
        ConversationState::at(language, phase, step)
    }

    mod presentation {
        use super::*;

        #[test]
        fn every_spanish_token_selects_spanish() {
            let engine = engine();
            for token in ["ES", "CAST", "CASTELLANO", "ESPAÑOL", "ESP", "  es ", "español"] {
                let (state, response) = engine.process_message(
                    &user(),
                    &ClassifiedMessage::text(token),
                    ConversationState::new(),
                );
                assert_eq!(state, at(Some(Language::Es), Phase::Formulaires, 0), "{token}");
                assert_eq!(response, "Pregunta 1 (0-4)");
            }
        }

        #[test]
        fn every_catalan_token_selects_catalan() {
            let engine = engine();
            for token in ["CAT", "CATALAN", "CATALÀ", "català"] {
                let (state, response) = engine.process_message(
                    &user(),
                    &ClassifiedMessage::text(token),
                    ConversationState::new(),
                );
                assert_eq!(state, at(Some(Language::Ca), Phase::Formulaires, 0), "{token}");
                assert_eq!(response, "Pregunta 1 (0-4) ca");
            }
        }

        #[test]
        fn unknown_token_is_rejected_in_spanish() {
            let transition = engine().process(
                &user(),
                &ClassifiedMessage::text("FR"),
                ConversationState::new(),
            );
            assert!(transition.state.is_empty());
            assert_eq!(transition.response, "Idioma no soportado");
            assert_eq!(
                transition.outcome,
                TransitionOutcome::Rejected(ErrorKind::LangNotSupported)
            );
        }

        #[test]
        fn audio_is_rejected_as_unsupported_language() {
            let (state, response) = engine().process_message(
                &user(),
                &ClassifiedMessage::audio("a", 30),
                ConversationState::new(),
            );
            assert!(state.is_empty());
            assert_eq!(response, "Idioma no soportado");
        }

        #[test]
        fn rejection_uses_current_language() {
            let state = at(Some(Language::Ca), Phase::Presentation, 0);
            let (_, response) =
                engine().process_message(&user(), &ClassifiedMessage::text("xx"), state);
            assert_eq!(response, "Idioma no suportat");
        }

        #[test]
        fn missing_first_prompt_reports_unknown_state_in_previous_language() {
            let engine = engine_from(
                r#"
QUESTIONS:
  es:
    formulaires:
      - question: "P1"
ERRORS:
  es:
    UNKNOWN_STATE: "Estado desconocido"
  ca:
    UNKNOWN_STATE: "Estat desconegut"
"#,
            );
            let (state, response) = engine.process_message(
                &user(),
                &ClassifiedMessage::text("CAT"),
                ConversationState::new(),
            );
            assert_eq!(state, at(Some(Language::Ca), Phase::Formulaires, 0));
            assert_eq!(response, "Estado desconocido");
        }
    }

    mod formulaires {
        use super::*;

        #[test]
        fn valid_answer_advances_step() {
            let (state, response) = engine().process_message(
                &user(),
                &ClassifiedMessage::text("2"),
                at(Some(Language::Es), Phase::Formulaires, 0),
            );
            assert_eq!(state, at(Some(Language::Es), Phase::Formulaires, 1));
            assert_eq!(response, "Pregunta 2 (0-4)");
        }

        #[test]
        fn exhaustion_moves_to_audio_questions() {
            let (state, response) = engine().process_message(
                &user(),
                &ClassifiedMessage::text(" 4 "),
                at(Some(Language::Es), Phase::Formulaires, 1),
            );
            assert_eq!(state, at(Some(Language::Es), Phase::AudioQuestions, 0));
            assert_eq!(response, "Audio 1");
        }

        #[test]
        fn bounds_are_inclusive() {
            for answer in ["0", "4", "00", "004"] {
                let transition = engine().process(
                    &user(),
                    &ClassifiedMessage::text(answer),
                    at(Some(Language::Es), Phase::Formulaires, 0),
                );
                assert_eq!(transition.outcome, TransitionOutcome::Accepted, "{answer}");
            }
        }

        #[test]
        fn invalid_answers_leave_state_unchanged() {
            let start = at(Some(Language::Es), Phase::Formulaires, 1);
            for answer in ["5", "-1", "+2", "2.0", "dos", "", "   ", "٣", "99999999999999999999"] {
                let (state, response) = engine().process_message(
                    &user(),
                    &ClassifiedMessage::text(answer),
                    start.clone(),
                );
                assert_eq!(state, start, "{answer:?}");
                assert_eq!(response, "Número inválido");
            }
        }

        #[test]
        fn audio_is_invalid_number() {
            let start = at(Some(Language::Ca), Phase::Formulaires, 0);
            let (state, response) = engine().process_message(
                &user(),
                &ClassifiedMessage::audio("a", 30),
                start.clone(),
            );
            assert_eq!(state, start);
            assert_eq!(response, "Número invàlid");
        }
    }

    mod audio_questions {
        use super::*;

        #[test]
        fn twenty_seconds_is_accepted() {
            let transition = engine().process(
                &user(),
                &ClassifiedMessage::audio("media-1", 20),
                at(Some(Language::Es), Phase::AudioQuestions, 0),
            );
            assert_eq!(transition.state, at(Some(Language::Es), Phase::AudioQuestions, 1));
            assert_eq!(transition.response, "Audio 2");
            assert_eq!(
                transition.outcome,
                TransitionOutcome::AudioAccepted {
                    audio_id: "media-1".to_string()
                }
            );
        }

        #[test]
        fn nineteen_seconds_is_too_short() {
            let start = at(Some(Language::Es), Phase::AudioQuestions, 0);
            let (state, response) = engine().process_message(
                &user(),
                &ClassifiedMessage::audio("media-1", 19),
                start.clone(),
            );
            assert_eq!(state, start);
            assert_eq!(response, "Audio demasiado corto");
        }

        #[test]
        fn text_is_not_audio() {
            let start = at(Some(Language::Es), Phase::AudioQuestions, 1);
            let (state, response) =
                engine().process_message(&user(), &ClassifiedMessage::text("hola"), start.clone());
            assert_eq!(state, start);
            assert_eq!(response, "Envía un audio");
        }

        #[test]
        fn unsupported_is_not_audio() {
            let (_, response) = engine().process_message(
                &user(),
                &ClassifiedMessage::Unsupported,
                at(Some(Language::Ca), Phase::AudioQuestions, 0),
            );
            assert_eq!(response, "Envia un àudio");
        }

        #[test]
        fn exhaustion_moves_to_conclusion() {
            let (state, response) = engine().process_message(
                &user(),
                &ClassifiedMessage::audio("m", 45),
                at(Some(Language::Ca), Phase::AudioQuestions, 0),
            );
            assert_eq!(state, at(Some(Language::Ca), Phase::Conclusion, 0));
            assert_eq!(response, "Gràcies!");
        }
    }

    mod conclusion {
        use super::*;

        #[test]
        fn any_input_resets() {
            for message in [
                ClassifiedMessage::text("hola"),
                ClassifiedMessage::audio("a", 1),
                ClassifiedMessage::Unsupported,
            ] {
                let transition = engine().process(
                    &user(),
                    &message,
                    at(Some(Language::Es), Phase::Conclusion, 0),
                );
                assert!(transition.state.is_empty());
                assert_eq!(transition.response, "Gracias!");
                assert_eq!(transition.outcome, TransitionOutcome::Reset);
            }
        }

        #[test]
        fn missing_conclusion_prompt_reports_unknown_state() {
            let engine = engine_from(
                r#"
ERRORS:
  ca:
    UNKNOWN_STATE: "Estat desconegut"
"#,
            );
            let (state, response) = engine.process_message(
                &user(),
                &ClassifiedMessage::text("x"),
                at(Some(Language::Ca), Phase::Conclusion, 0),
            );
            assert!(state.is_empty());
            assert_eq!(response, "Estat desconegut");
        }
    }

    mod unknown_phase {
        use super::*;

        #[test]
        fn unknown_phase_answers_unknown_state() {
            let start = at(Some(Language::Es), Phase::Unknown, 3);
            let transition =
                engine().process(&user(), &ClassifiedMessage::text("hola"), start.clone());
            assert_eq!(transition.state, start);
            assert_eq!(transition.response, "Estado desconocido");
            assert_eq!(
                transition.outcome,
                TransitionOutcome::Rejected(ErrorKind::UnknownState)
            );
        }

        #[test]
        fn empty_catalog_uses_builtin_fallback() {
            let engine = engine_from("QUESTIONS: {}\n");
            let (_, response) = engine.process_message(
                &user(),
                &ClassifiedMessage::text("hola"),
                at(None, Phase::Unknown, 0),
            );
            assert_eq!(response, crate::domain::dialogue::FALLBACK_UNKNOWN_STATE);
        }

        #[test]
        fn saturated_step_is_rejected_instead_of_wrapping() {
            let stored: ConversationState =
                serde_yaml::from_str(&format!("lang: es\nphase: formulaires\nstep: {}\n", usize::MAX))
                    .unwrap();
            let transition =
                engine().process(&user(), &ClassifiedMessage::text("2"), stored.clone());
            assert_eq!(transition.state, stored);
            assert_eq!(transition.response, "Estado desconocido");
            assert_eq!(
                transition.outcome,
                TransitionOutcome::Rejected(ErrorKind::UnknownState)
            );
        }
    }

    mod greeting {
        use super::*;

        #[test]
        fn greeting_is_first_spanish_presentation_step() {
            assert_eq!(engine().greeting(), "Hola! Elige idioma: ES o CAT");
        }

        #[test]
        fn missing_presentation_falls_back_to_unknown_state() {
            let engine = engine_from("ERRORS:\n  es:\n    UNKNOWN_STATE: \"?\"\n");
            assert_eq!(engine.greeting(), "?");
        }
    }

    mod parse_form_answer {
        use super::super::parse_form_answer;

        #[test]
        fn accepts_trimmed_digits_in_range() {
            assert_eq!(parse_form_answer("3"), Some(3));
            assert_eq!(parse_form_answer("\t0\n"), Some(0));
        }

        #[test]
        fn rejects_non_digits_and_out_of_range() {
            assert_eq!(parse_form_answer("5"), None);
            assert_eq!(parse_form_answer("1 2"), None);
            assert_eq!(parse_form_answer("４"), None);
        }
    }
}
