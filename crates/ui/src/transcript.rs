use crate::error::ChatError;

/// How far a turn's request has progressed
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TurnStatus {
    /// Request in flight
    #[default]
    Pending,
    Answered,
    /// Request failed; the answer stays empty
    Failed(ChatError),
}

/// One user query and its answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    user_text: String,
    ai_text: String,
    status: TurnStatus,
}

impl Turn {
    fn new(user_text: String) -> Self {
        Self { user_text, ai_text: String::new(), status: TurnStatus::Pending }
    }

    pub fn user_text(&self) -> &str {
        &self.user_text
    }

    /// Empty until answered, and forever empty after a failure
    pub fn ai_text(&self) -> &str {
        &self.ai_text
    }

    pub fn status(&self) -> &TurnStatus {
        &self.status
    }

    pub fn is_pending(&self) -> bool {
        self.status == TurnStatus::Pending
    }
}

/// Append-only log of turns for one session
///
/// Every mutation bumps [`Transcript::revision`] so observers can tell when to react.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    turns: Vec<Turn>,
    revision: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn with an empty answer and return its index
    pub fn append_turn(&mut self, user_text: impl Into<String>) -> Result<usize, ChatError> {
        let user_text = user_text.into();
        if user_text.trim().is_empty() {
            return Err(ChatError::EmptySubmission);
        }

        self.turns.push(Turn::new(user_text));
        self.revision += 1;
        Ok(self.turns.len() - 1)
    }

    /// Write the answer for a pending turn
    ///
    /// Out-of-range indices and already settled turns are rejected without touching anything.
    pub fn set_answer(&mut self, index: usize, ai_text: impl Into<String>) -> Result<(), ChatError> {
        let turn = self.pending_turn_mut(index)?;
        turn.ai_text = ai_text.into();
        turn.status = TurnStatus::Answered;
        self.revision += 1;
        Ok(())
    }

    /// Settle a pending turn as failed, leaving its answer empty
    pub fn mark_failed(&mut self, index: usize, error: ChatError) -> Result<(), ChatError> {
        let turn = self.pending_turn_mut(index)?;
        turn.status = TurnStatus::Failed(error);
        self.revision += 1;
        Ok(())
    }

    fn pending_turn_mut(&mut self, index: usize) -> Result<&mut Turn, ChatError> {
        match self.turns.get_mut(index) {
            Some(turn) if turn.is_pending() => Ok(turn),
            _ => Err(ChatError::StaleAnswer { index }),
        }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn get(&self, index: usize) -> Option<&Turn> {
        self.turns.get(index)
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.turns.iter().filter(|turn| turn.is_pending()).count()
    }

    /// Monotonic change counter
    pub fn revision(&self) -> u64 {
        self.revision
    }
}
