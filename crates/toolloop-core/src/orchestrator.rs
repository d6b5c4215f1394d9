//! Tool-call orchestration loop
//!
//! Owns the conversation transcript, dispatches requested tool calls to the
//! registry, and re-queries the endpoint until the model produces a final
//! answer or the iteration budget is exhausted. Tool failures are reported
//! back to the model through the transcript; the model, not the orchestrator,
//! decides how to react to them.

use std::sync::Arc;
use thiserror::Error;

use crate::endpoint::{ChatEndpoint, ChatOptions, EndpointError};
use crate::logging::{Logger, NoOpLogger};
use crate::tools::ToolRegistry;
use crate::types::ChatMessage;
use crate::{log_debug, log_info};

/// Answer returned when the budget runs out on a transcript whose last
/// message has no content
pub const MAX_ITERATIONS_MARKER: &str = "Max iterations reached";

/// Errors that abort an orchestration run
///
/// Tool-level failures (malformed arguments, unknown tools, failing handlers)
/// are not represented here; they are absorbed into the transcript.
#[derive(Error, Debug)]
pub enum OrchestratorError {
    /// The iteration budget must be a positive integer
    #[error("max_iterations must be a positive integer")]
    InvalidIterationBudget,

    /// The endpoint could not be consulted
    #[error(transparent)]
    Endpoint(#[from] EndpointError),
}

pub type OrchestratorResult<T> = Result<T, OrchestratorError>;

/// How a run terminated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The model produced a call-free answer
    Answered,
    /// The iteration budget ran out; the answer is degraded, not an error
    BudgetExhausted,
}

/// Result of an orchestration run
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// The final answer text
    pub answer: String,
    /// How the run terminated
    pub termination: Termination,
    /// The full conversation transcript, in append order
    pub transcript: Vec<ChatMessage>,
}

/// Drives the send → tool → feedback loop against one endpoint and registry
pub struct Orchestrator {
    endpoint: Arc<dyn ChatEndpoint>,
    registry: Arc<ToolRegistry>,
    options: ChatOptions,
    system_prompt: Option<String>,
    max_iterations: usize,
    logger: Arc<dyn Logger>,
}

impl Orchestrator {
    /// Default iteration budget, matching the usual guard against runaway loops
    pub const DEFAULT_MAX_ITERATIONS: usize = 5;

    /// Create an orchestrator with default budget and no logging
    pub fn new(
        endpoint: Arc<dyn ChatEndpoint>,
        registry: Arc<ToolRegistry>,
        options: ChatOptions,
    ) -> Self {
        Self {
            endpoint,
            registry,
            options,
            system_prompt: None,
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
            logger: Arc::new(NoOpLogger::new()),
        }
    }

    /// Prepend a system message to every run
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Set the iteration budget
    ///
    /// Zero is rejected by [`Orchestrator::run`] with
    /// [`OrchestratorError::InvalidIterationBudget`].
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the logger
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Run the orchestration loop for one user query
    ///
    /// Terminates with [`Termination::Answered`] on the first call-free
    /// assistant reply, or with [`Termination::BudgetExhausted`] after
    /// `max_iterations` endpoint turns. Only endpoint failures abort the run.
    pub async fn run(&self, user_query: &str) -> OrchestratorResult<RunOutcome> {
        if self.max_iterations == 0 {
            return Err(OrchestratorError::InvalidIterationBudget);
        }

        let mut transcript = Vec::new();
        if let Some(prompt) = &self.system_prompt {
            transcript.push(ChatMessage::system(prompt));
        }
        transcript.push(ChatMessage::user(user_query));

        // Descriptor set is fixed for the duration of the run
        let descriptors = self.registry.descriptors();

        for iteration in 1..=self.max_iterations {
            log_debug!(
                self.logger,
                "[Orchestrator] Iteration {}/{}",
                iteration,
                self.max_iterations
            );

            let reply = self
                .endpoint
                .chat(&transcript, &descriptors, &self.options)
                .await?;

            let calls = reply.tool_calls.clone().unwrap_or_default();
            let content = reply.content.clone();
            transcript.push(reply);

            if calls.is_empty() {
                log_info!(
                    self.logger,
                    "[Orchestrator] Final answer after {} endpoint call(s)",
                    iteration
                );
                return Ok(RunOutcome {
                    answer: content.unwrap_or_default(),
                    termination: Termination::Answered,
                    transcript,
                });
            }

            log_info!(
                self.logger,
                "[Orchestrator] Model requested {} tool call(s)",
                calls.len()
            );
            transcript.extend(self.registry.execute_calls(&calls));
        }

        log_info!(
            self.logger,
            "[Orchestrator] Iteration budget of {} exhausted",
            self.max_iterations
        );

        let answer = transcript
            .last()
            .and_then(|m| m.content.clone())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| MAX_ITERATIONS_MARKER.to_string());

        Ok(RunOutcome {
            answer,
            termination: Termination::BudgetExhausted,
            transcript,
        })
    }
}
