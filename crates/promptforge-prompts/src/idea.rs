/// Append the per-call user message that carries the raw idea.
///
/// The idea is embedded as-is, surrounding whitespace included.
pub fn append_idea(prompt: &mut String, raw_message: &str) {
    prompt.push_str(&format!("User's raw idea: \"{raw_message}\"\n\n"));
    prompt.push_str(
        "Transform this idea into an enhanced LLM prompt based on the instructions provided.",
    );
}
