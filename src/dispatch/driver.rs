//! Turn driver
//!
//! Orchestrates one conversation turn: recognize the utterance, evaluate the
//! interruption policy against the active dialog, continue or begin dialogs,
//! and persist the conversation context.

use std::sync::Arc;
use tracing::{debug, info};

use crate::config::{ArbitrationConfig, Settings};
use crate::dialog::{DialogId, FlowRegistry, StepOutcome};
use crate::recognizer::{arbitrate, Arbitration, Intent, Recognition, Recognizer};
use crate::state::{ConversationContext, StateStore};
use crate::utils::errors::Result;
use super::policy::InterruptionPolicy;
use super::router::{IntentRouter, RouteAction};

/// Closing line after a dialog finishes
pub const ANYTHING_ELSE_TEXT: &str = "Is there anything else I can help you with?";
/// Reply when the user cancels an active dialog
pub const CANCELLED_TEXT: &str = "Sure. I've cancelled that.";
/// Reply when the FAQ recognizer had no answer
pub const NO_ANSWER_TEXT: &str = "I couldn't find an answer for that one.";

/// Suggested queries offered once a dialog completes
pub fn suggested_queries() -> Vec<String> {
    vec![
        "Book a table".to_string(),
        "Who are you?".to_string(),
        "What can you do?".to_string(),
    ]
}

/// Where the conversation stands after a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStatus {
    /// A dialog is waiting for user input
    Waiting,
    /// The turn finished with no dialog left active
    Complete,
    /// The active dialog was cancelled this turn
    Cancelled,
}

/// Outgoing replies for one turn
#[derive(Debug, Clone, PartialEq)]
pub struct TurnResponse {
    pub messages: Vec<String>,
    pub suggested_actions: Vec<String>,
    pub status: TurnStatus,
    /// Recognition that drove this turn, when one was produced
    pub recognition: Option<Recognition>,
}

impl TurnResponse {
    fn new(messages: Vec<String>, status: TurnStatus) -> Self {
        Self {
            messages,
            suggested_actions: Vec::new(),
            status,
            recognition: None,
        }
    }
}

/// Per-turn dispatch orchestrator
pub struct TurnDriver {
    nlu: Arc<dyn Recognizer>,
    faq: Option<Arc<dyn Recognizer>>,
    store: Arc<dyn StateStore>,
    flows: FlowRegistry,
    router: IntentRouter,
    policy: InterruptionPolicy,
    arbitration: ArbitrationConfig,
    min_score: f32,
}

impl TurnDriver {
    /// Create a driver with an NLU recognizer only
    pub fn new(settings: &Settings, nlu: Arc<dyn Recognizer>, store: Arc<dyn StateStore>) -> Self {
        Self {
            nlu,
            faq: None,
            store,
            flows: FlowRegistry::new(),
            router: IntentRouter::new(&settings.dispatch),
            policy: InterruptionPolicy::new(&settings.dispatch),
            arbitration: settings.recognizer.arbitration.clone(),
            min_score: settings.dispatch.min_score,
        }
    }

    /// Add a FAQ recognizer; its results are arbitrated against the NLU's
    pub fn with_faq_recognizer(mut self, faq: Arc<dyn Recognizer>) -> Self {
        self.faq = Some(faq);
        self
    }

    /// Process one incoming message activity
    pub async fn take_turn(&self, conversation_id: &str, utterance: &str) -> Result<TurnResponse> {
        self.take_turn_with_recognition(conversation_id, utterance, None).await
    }

    /// Process one turn with a pre-supplied recognition (e.g. from an
    /// adapter that already ran its own recognizer)
    pub async fn take_turn_with_recognition(
        &self,
        conversation_id: &str,
        utterance: &str,
        pre_recognized: Option<Recognition>,
    ) -> Result<TurnResponse> {
        let mut context = self.store.load(conversation_id).await?
            .unwrap_or_else(|| ConversationContext::new(conversation_id));

        let recognition = match pre_recognized {
            Some(recognition) => recognition,
            None => match self.recognize(utterance).await? {
                Recognized::Winner(recognition) => recognition,
                Recognized::Ambiguous { nlu, faq } => {
                    debug!(conversation_id = conversation_id, nlu = %nlu.intent,
                           faq = %faq.intent, "Recognizers disagree, asking user");
                    self.store.save(&context).await?;
                    return Ok(TurnResponse::new(
                        vec![format!(
                            "I'm not quite sure what you meant. Did you want '{}', or an answer \
                             from the FAQ? Could you rephrase?",
                            nlu.intent
                        )],
                        TurnStatus::Waiting,
                    ));
                }
            },
        };

        crate::utils::logging::log_recognition(
            conversation_id,
            recognition.intent.as_str(),
            recognition.score,
        );

        // Evaluate if the requested operation is possible right now
        let outcome = self.policy.evaluate(context.dialog, recognition.intent);
        if !outcome.allowed {
            if let Some(active) = context.dialog {
                crate::utils::logging::log_interruption_denied(
                    conversation_id,
                    active.as_str(),
                    recognition.intent.as_str(),
                );
                let reprompt = self.flows.reprompt(&context)?;
                self.store.save(&context).await?;
                let mut response =
                    TurnResponse::new(vec![outcome.reason, reprompt], TurnStatus::Waiting);
                response.recognition = Some(recognition);
                return Ok(response);
            }
            self.store.save(&context).await?;
            let mut response = TurnResponse::new(vec![outcome.reason], TurnStatus::Complete);
            response.recognition = Some(recognition);
            return Ok(response);
        }

        let mut response = if let Some(active) = context.dialog {
            self.continue_active(&mut context, active, utterance, &recognition)?
        } else {
            self.begin_for(&mut context, &recognition, utterance)?
        };

        self.store.save(&context).await?;
        response.recognition = Some(recognition);
        Ok(response)
    }

    /// Run the recognizers and pick a winner
    async fn recognize(&self, utterance: &str) -> Result<Recognized> {
        let nlu = self.nlu.recognize(utterance).await?;

        let Some(faq_recognizer) = &self.faq else {
            return Ok(Recognized::Winner(nlu));
        };
        let faq = faq_recognizer.recognize(utterance).await?;

        match arbitrate(nlu, faq, &self.arbitration) {
            Arbitration::Winner { source, recognition } => {
                debug!(source = ?source, intent = %recognition.intent, "Arbitration picked a winner");
                Ok(Recognized::Winner(recognition))
            }
            Arbitration::Ambiguous { nlu, faq } => Ok(Recognized::Ambiguous { nlu, faq }),
        }
    }

    /// A dialog is active: cancel it, hand over to an interrupting dialog,
    /// or continue it with this turn's input.
    fn continue_active(
        &self,
        context: &mut ConversationContext,
        active: DialogId,
        utterance: &str,
        recognition: &Recognition,
    ) -> Result<TurnResponse> {
        if recognition.intent == Intent::Cancel && recognition.score >= self.min_score {
            info!(conversation_id = %context.conversation_id, dialog = %active, "Dialog cancelled by user");
            self.flows.cancel(context);
            return Ok(TurnResponse::new(
                vec![CANCELLED_TEXT.to_string()],
                TurnStatus::Cancelled,
            ));
        }

        if recognition.score >= self.min_score {
            if let Some(target) = IntentRouter::dialog_for(recognition.intent) {
                if target != active && self.flows.can_interrupt(active) {
                    crate::utils::logging::log_dialog_event(
                        &context.conversation_id,
                        active.as_str(),
                        "interrupted",
                    );
                    self.flows.cancel(context);
                    return self.begin_for(context, recognition, utterance);
                }
            }
        }

        let outcome = self.flows.advance(context, utterance)?;
        Ok(Self::response_for(outcome))
    }

    /// No dialog is active: route the intent and begin the chosen dialog
    fn begin_for(
        &self,
        context: &mut ConversationContext,
        recognition: &Recognition,
        utterance: &str,
    ) -> Result<TurnResponse> {
        match self.router.route(recognition, utterance) {
            RouteAction::Begin(dialog) => {
                if dialog == DialogId::WhatCanYouDo {
                    // A query entity (from the capability card) names the
                    // intent the user actually picked; dispatch to it instead.
                    if let Some(query) = recognition.entity("query") {
                        let requested = Intent::parse(&query.value);
                        if requested != Intent::None && requested != Intent::WhatCanYouDo {
                            let re_recognized = Recognition::new(requested, 1.0);
                            return self.begin_for(context, &re_recognized, utterance);
                        }
                    }
                }

                if dialog == DialogId::Faq {
                    let answer = recognition
                        .entity("answer")
                        .map(|e| e.value.clone())
                        .unwrap_or_else(|| NO_ANSWER_TEXT.to_string());
                    context.set_data("faqAnswer", answer)?;
                }

                crate::utils::logging::log_dialog_event(
                    &context.conversation_id,
                    dialog.as_str(),
                    "begin",
                );
                let outcome = self.flows.begin(context, dialog)?;
                Ok(Self::response_for(outcome))
            }
            RouteAction::CancelActive => {
                // Only reachable when no dialog is active; the policy reply applies
                let outcome = self.policy.evaluate(None, Intent::Cancel);
                Ok(TurnResponse::new(vec![outcome.reason], TurnStatus::Complete))
            }
            RouteAction::Fallback { messages } => {
                Ok(TurnResponse::new(messages, TurnStatus::Complete))
            }
        }
    }

    fn response_for(outcome: StepOutcome) -> TurnResponse {
        match outcome {
            StepOutcome::Waiting { prompt } => {
                TurnResponse::new(vec![prompt], TurnStatus::Waiting)
            }
            StepOutcome::Invalid { message } => {
                TurnResponse::new(vec![message], TurnStatus::Waiting)
            }
            StepOutcome::Complete { reply } => {
                let mut response = TurnResponse::new(
                    vec![reply, ANYTHING_ELSE_TEXT.to_string()],
                    TurnStatus::Complete,
                );
                response.suggested_actions = suggested_queries();
                response
            }
            StepOutcome::Cancelled { reply } => {
                TurnResponse::new(vec![reply], TurnStatus::Cancelled)
            }
        }
    }
}

enum Recognized {
    Winner(Recognition),
    Ambiguous { nlu: Recognition, faq: Recognition },
}
