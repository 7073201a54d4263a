use crate::state::{ChatAction, ChatEvent, ChatState};
use crate::types::Message;

/// Drives the conversation loop: user turn, cost confirmation, streamed
/// reply, cost report, repeat. Holds no I/O; every effect is returned as a
/// [`ChatAction`] for the caller to perform.
pub struct StateMachine {
    state: ChatState,
    verbose: bool,
}

impl StateMachine {
    /// Create a machine whose conversation is seeded with the system prompt.
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            state: ChatState::AwaitingUserInput {
                conversation: vec![Message::system(system_prompt)],
            },
            verbose: false,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn state(&self) -> &ChatState {
        &self.state
    }

    /// Process an event and return the action to perform
    pub fn handle_event(&mut self, event: ChatEvent) -> ChatAction {
        let old_state_name = self.state.name();

        let action = self.transition(event);

        if self.verbose {
            eprintln!("[STATE] {} -> {}", old_state_name, self.state.name());
        }

        action
    }

    fn transition(&mut self, event: ChatEvent) -> ChatAction {
        // Handle shutdown from any state
        if matches!(event, ChatEvent::ShutdownRequested) {
            self.state = ChatState::Terminated;
            return ChatAction::Shutdown;
        }

        match (&self.state, event) {
            // === AwaitingUserInput ===
            // The loaded file concatenation becomes the first user turn,
            // appended verbatim.
            (ChatState::AwaitingUserInput { conversation }, ChatEvent::ContextLoaded(text)) => {
                let mut conv = conversation.clone();
                conv.push(Message::user(text));

                self.state = ChatState::ConfirmingCost {
                    conversation: conv.clone(),
                };

                ChatAction::EstimateCost { conversation: conv }
            }

            // Interactive input is JSON-escaped so control characters
            // survive the round trip through the request body.
            (ChatState::AwaitingUserInput { conversation }, ChatEvent::UserInput(text)) => {
                let mut conv = conversation.clone();
                let quoted = serde_json::to_string(&text).unwrap_or_else(|_| text.clone());
                conv.push(Message::user(quoted));

                self.state = ChatState::ConfirmingCost {
                    conversation: conv.clone(),
                };

                ChatAction::EstimateCost { conversation: conv }
            }

            // === ConfirmingCost ===
            (ChatState::ConfirmingCost { conversation }, ChatEvent::CostAccepted) => {
                let conv = conversation.clone();

                self.state = ChatState::StreamingResponse {
                    conversation: conv.clone(),
                    fragments: Vec::new(),
                };

                ChatAction::SendRequest { messages: conv }
            }

            (ChatState::ConfirmingCost { .. }, ChatEvent::CostDeclined) => {
                self.state = ChatState::Terminated;
                ChatAction::Shutdown
            }

            // === StreamingResponse ===
            (
                ChatState::StreamingResponse {
                    conversation,
                    fragments,
                },
                ChatEvent::Fragment(text),
            ) => {
                let mut frags = fragments.clone();
                frags.push(text.clone());

                self.state = ChatState::StreamingResponse {
                    conversation: conversation.clone(),
                    fragments: frags,
                };

                ChatAction::DisplayFragment(text)
            }

            (
                ChatState::StreamingResponse {
                    conversation,
                    fragments,
                },
                ChatEvent::StreamCompleted,
            ) => {
                let reply = fragments.concat();
                let mut conv = conversation.clone();
                conv.push(Message::assistant(reply.clone()));

                self.state = ChatState::AwaitingUserInput {
                    conversation: conv.clone(),
                };

                ChatAction::ReportUsage {
                    conversation: conv,
                    reply,
                }
            }

            // === Invalid transition ===
            (state, event) => {
                if self.verbose {
                    eprintln!(
                        "[WARN] Invalid transition: {:?} in state {}",
                        event,
                        state.name()
                    );
                }
                ChatAction::WaitForEvent
            }
        }
    }

    /// For testing: set the initial state
    #[cfg(test)]
    pub fn with_state(mut self, state: ChatState) -> Self {
        self.state = state;
        self
    }
}
