pub mod idea;
pub mod system;

/// The two texts sent for one enhancement call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnhancePrompt {
    pub system_instruction: String,
    pub user_message: String,
}

/// Assemble the system instruction and the user message for a raw idea.
pub fn assemble_prompt(raw_message: &str) -> EnhancePrompt {
    let mut system_instruction = String::new();
    system::append_instructions(&mut system_instruction);

    let mut user_message = String::new();
    idea::append_idea(&mut user_message, raw_message);

    EnhancePrompt {
        system_instruction,
        user_message,
    }
}
