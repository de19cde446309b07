use parlance_core::PromptRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// POST this request to the relay and feed the outcome back as a `Msg`.
    SendPrompt(PromptRequest),
    /// Move keyboard focus back to the prompt input.
    FocusInput,
}
