//! REPL for gpt-dir
//!
//! This module implements the main loop: read → confirm cost → stream the
//! reply → report the cost → repeat. The `gpt-dir-core` state machine decides
//! what happens next; this driver owns stdin, stdout, and the HTTP client.

use std::io::{self, BufRead, Write};

use console::style;
use thiserror::Error;

use gpt_dir_core::client::{ApiError, ChatClient};
use gpt_dir_core::state::{ChatAction, ChatEvent};
use gpt_dir_core::types::{ChatRequest, Message};
use gpt_dir_core::StateMachine;

use crate::tokens::{CostEstimate, CostEstimator};

/// Estimated input cost (USD) above which a turn needs confirmation.
const COST_THRESHOLD: f64 = 0.05;
/// Estimated input token count above which a turn needs confirmation.
const TOKEN_THRESHOLD: usize = 8000;

/// Errors that end a session. All of them are fatal; there is no retry.
#[derive(Debug, Error)]
pub enum ReplError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("interactive input failed: {0}")]
    Io(#[from] io::Error),
    #[error("failed to serialize conversation: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// REPL configuration
pub struct ReplOptions {
    /// Model identifier as given on the command line; the remote name is
    /// this with a `gpt-` prefix
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Response token cap; None leaves the provider default
    pub max_tokens: Option<u32>,
    /// System prompt seeding the conversation
    pub system: String,
    /// Loaded file context, if an input path was supplied
    pub context: Option<String>,
    /// Whether to show verbose output
    pub verbose: bool,
}

/// The main REPL loop
pub struct Repl {
    options: ReplOptions,
    client: ChatClient,
    estimator: CostEstimator,
}

impl Repl {
    pub fn new(options: ReplOptions, client: ChatClient, estimator: CostEstimator) -> Self {
        Self {
            options,
            client,
            estimator,
        }
    }

    /// Run the session to completion. Returns Ok on graceful termination
    /// (declined confirmation or end of interactive input).
    pub fn run(mut self) -> Result<(), ReplError> {
        if self.options.verbose {
            eprintln!("[verbose] Starting chat session");
        }

        let mut machine =
            StateMachine::new(self.options.system.clone()).with_verbose(self.options.verbose);

        // Loaded context becomes the first user turn, so the first pass
        // goes straight to cost confirmation.
        let mut action = match self.options.context.take() {
            Some(text) => machine.handle_event(ChatEvent::ContextLoaded(text)),
            None => ChatAction::PromptForInput,
        };

        loop {
            action = match action {
                ChatAction::PromptForInput => match self.read_user_line()? {
                    Some(line) => machine.handle_event(ChatEvent::UserInput(line)),
                    None => machine.handle_event(ChatEvent::ShutdownRequested),
                },

                ChatAction::EstimateCost { conversation } => {
                    let estimate = self.conversation_estimate(&conversation)?;
                    if self.confirm(&estimate)? {
                        machine.handle_event(ChatEvent::CostAccepted)
                    } else {
                        machine.handle_event(ChatEvent::CostDeclined)
                    }
                }

                ChatAction::SendRequest { messages } => {
                    self.stream_reply(&mut machine, messages)?
                }

                ChatAction::ReportUsage { conversation, reply } => {
                    let input = self.conversation_estimate(&conversation)?;
                    let output = self.estimator.output_estimate(&reply);
                    println!();
                    println!("Total Costs: {:.5}", input.cost + output.cost);
                    println!();
                    ChatAction::PromptForInput
                }

                ChatAction::Shutdown => break,

                // Fragments are consumed inside stream_reply; WaitForEvent
                // only surfaces if the machine rejected one of our events.
                ChatAction::DisplayFragment(_) | ChatAction::WaitForEvent => break,
            };
        }

        if self.options.verbose {
            eprintln!("[verbose] Chat session ended");
        }
        Ok(())
    }

    /// Issue the streaming request, printing each fragment as it arrives.
    fn stream_reply(
        &self,
        machine: &mut StateMachine,
        messages: Vec<Message>,
    ) -> Result<ChatAction, ReplError> {
        let request = ChatRequest {
            model: format!("gpt-{}", self.options.model),
            messages,
            temperature: self.options.temperature,
            max_tokens: self.options.max_tokens,
            stream: true,
        };

        if self.options.verbose {
            eprintln!("[verbose] Requesting completion from {}", request.model);
        }

        print!("{}: ", style("Assistant").yellow());
        io::stdout().flush()?;

        let stream = self.client.stream_completion(&request)?;
        for fragment in stream {
            let fragment = fragment?;
            if let ChatAction::DisplayFragment(text) =
                machine.handle_event(ChatEvent::Fragment(fragment))
            {
                print!("{}", text);
                io::stdout().flush()?;
            }
        }

        Ok(machine.handle_event(ChatEvent::StreamCompleted))
    }

    /// Input-side estimate over the serialized conversation, mirroring what
    /// the request body will carry.
    fn conversation_estimate(&self, conversation: &[Message]) -> Result<CostEstimate, ReplError> {
        let serialized = serde_json::to_string(conversation)?;
        Ok(self.estimator.input_estimate(&serialized))
    }

    /// Ask the operator to confirm an over-threshold turn. Cheap turns pass
    /// silently; end of input declines.
    fn confirm(&self, estimate: &CostEstimate) -> Result<bool, ReplError> {
        if !needs_confirmation(estimate) {
            if self.options.verbose {
                eprintln!(
                    "[verbose] {} tokens, {:.5} under threshold, proceeding",
                    estimate.tokens, estimate.cost
                );
            }
            return Ok(true);
        }

        println!(
            "Tokens: {} -> Input costs: {:.5}, proceed? [Y/n]",
            estimate.tokens, estimate.cost
        );
        let mut reply = String::new();
        if io::stdin().lock().read_line(&mut reply)? == 0 {
            return Ok(false);
        }
        Ok(accepts(&reply))
    }

    /// Blocking prompt for the next user message. Returns None at end of
    /// input; empty lines re-prompt.
    fn read_user_line(&self) -> Result<Option<String>, ReplError> {
        loop {
            print!("{}: ", style("User").blue());
            io::stdout().flush()?;

            let mut input = String::new();
            if io::stdin().lock().read_line(&mut input)? == 0 {
                return Ok(None);
            }

            let input = input.trim();
            if input.is_empty() {
                if self.options.verbose {
                    eprintln!("[verbose] Skipping empty message");
                }
                continue;
            }
            return Ok(Some(input.to_string()));
        }
    }
}

/// A turn needs confirmation when either threshold is crossed.
fn needs_confirmation(estimate: &CostEstimate) -> bool {
    estimate.cost > COST_THRESHOLD || estimate.tokens > TOKEN_THRESHOLD
}

/// Empty input defaults to yes; otherwise only a case-insensitive `y` accepts.
fn accepts(reply: &str) -> bool {
    let reply = reply.trim();
    reply.is_empty() || reply.eq_ignore_ascii_case("y")
}
