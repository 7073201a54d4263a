use crate::types::Message;

/// The conversation loop's current state
#[derive(Debug, Clone)]
pub enum ChatState {
    /// Idle, waiting for the operator to type a message
    AwaitingUserInput { conversation: Vec<Message> },

    /// A user turn is pending; its cost must be estimated and accepted
    /// before the request goes out
    ConfirmingCost { conversation: Vec<Message> },

    /// Consuming the incremental response stream
    StreamingResponse {
        conversation: Vec<Message>,
        fragments: Vec<String>,
    },

    /// Terminal state - the session is over
    Terminated,
}

impl ChatState {
    /// Returns the state name for transition traces
    pub fn name(&self) -> &'static str {
        match self {
            Self::AwaitingUserInput { .. } => "AwaitingUserInput",
            Self::ConfirmingCost { .. } => "ConfirmingCost",
            Self::StreamingResponse { .. } => "StreamingResponse",
            Self::Terminated => "Terminated",
        }
    }

    /// Returns the conversation if this state carries one
    pub fn conversation(&self) -> Option<&Vec<Message>> {
        match self {
            Self::AwaitingUserInput { conversation } => Some(conversation),
            Self::ConfirmingCost { conversation } => Some(conversation),
            Self::StreamingResponse { conversation, .. } => Some(conversation),
            Self::Terminated => None,
        }
    }

    /// Returns true if this is the Terminated state
    pub fn is_terminated(&self) -> bool {
        matches!(self, Self::Terminated)
    }
}

/// Events that can be sent to the state machine
#[derive(Debug, Clone)]
pub enum ChatEvent {
    /// File context was loaded at startup; becomes the first user turn verbatim
    ContextLoaded(String),

    /// Operator submitted a message
    UserInput(String),

    /// The pending turn's cost was accepted (either under threshold or
    /// confirmed interactively)
    CostAccepted,

    /// Operator declined the cost confirmation
    CostDeclined,

    /// One incremental fragment arrived from the response stream
    Fragment(String),

    /// The response stream reached its end marker
    StreamCompleted,

    /// Operator requested shutdown (e.g. end of input or Ctrl+C)
    ShutdownRequested,
}

/// Actions the caller must perform
#[derive(Debug, Clone, PartialEq)]
pub enum ChatAction {
    /// Estimate the input-side cost of the conversation and confirm it
    /// with the operator if it crosses a threshold
    EstimateCost { conversation: Vec<Message> },

    /// Issue the streaming completion request
    SendRequest { messages: Vec<Message> },

    /// Print one stream fragment immediately
    DisplayFragment(String),

    /// Report the turn's total cost: input side over the full conversation
    /// plus output side over the new reply
    ReportUsage {
        conversation: Vec<Message>,
        reply: String,
    },

    /// Prompt for operator input
    PromptForInput,

    /// Wait for the next event (no action needed)
    WaitForEvent,

    /// Terminate the session
    Shutdown,
}
