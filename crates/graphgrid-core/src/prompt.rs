//! User prompts as an async request/response capability.

use crate::storage::BoxFuture;
use std::cell::RefCell;
use std::collections::VecDeque;

/// What the engine is asking the user for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptRequest {
    /// Text for a new text node.
    NewText,
    /// Replacement text for an existing text node.
    EditText { current: String },
    /// New name for a diagram.
    RenameDiagram { current: String },
    /// Yes/no question. Any answer other than `None` means yes.
    Confirm { message: String },
}

impl PromptRequest {
    /// Message shown to the user.
    pub fn message(&self) -> &str {
        match self {
            PromptRequest::NewText => "Enter the text:",
            PromptRequest::EditText { .. } => "Edit text:",
            PromptRequest::RenameDiagram { .. } => "Rename graph:",
            PromptRequest::Confirm { message } => message,
        }
    }

    /// Value to pre-fill the input with.
    pub fn initial_value(&self) -> Option<&str> {
        match self {
            PromptRequest::EditText { current } | PromptRequest::RenameDiagram { current } => {
                Some(current)
            }
            PromptRequest::NewText | PromptRequest::Confirm { .. } => None,
        }
    }
}

/// Asks the user for input. `None` means the prompt was dismissed.
pub trait Prompter {
    fn prompt(&self, request: &PromptRequest) -> BoxFuture<'_, Option<String>>;
}

/// Ask a yes/no question.
pub async fn confirm(prompter: &dyn Prompter, message: impl Into<String>) -> bool {
    let request = PromptRequest::Confirm {
        message: message.into(),
    };
    prompter.prompt(&request).await.is_some()
}

/// Prompter that answers from a queue and records what it was asked.
///
/// Once the queue is empty every prompt is dismissed.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    responses: RefCell<VecDeque<Option<String>>>,
    requests: RefCell<Vec<PromptRequest>>,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an answer.
    pub fn answer(self, text: impl Into<String>) -> Self {
        self.responses.borrow_mut().push_back(Some(text.into()));
        self
    }

    /// Queue a dismissal.
    pub fn dismiss(self) -> Self {
        self.responses.borrow_mut().push_back(None);
        self
    }

    /// Queue an answer on an existing prompter.
    pub fn push(&self, response: Option<String>) {
        self.responses.borrow_mut().push_back(response);
    }

    /// Every request seen so far, oldest first.
    pub fn requests(&self) -> Vec<PromptRequest> {
        self.requests.borrow().clone()
    }

    pub fn remaining(&self) -> usize {
        self.responses.borrow().len()
    }
}

impl Prompter for ScriptedPrompter {
    fn prompt(&self, request: &PromptRequest) -> BoxFuture<'_, Option<String>> {
        self.requests.borrow_mut().push(request.clone());
        let response = self.responses.borrow_mut().pop_front().flatten();
        log::debug!("prompt {:?} answered with {:?}", request.message(), response);
        Box::pin(std::future::ready(response))
    }
}
