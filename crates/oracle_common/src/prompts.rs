//! Oracle prompt construction.
//!
//! Static policy: the system prompt asks the generator for exactly the
//! three reading fields as strict JSON. The generator is asked for valid
//! output but never trusted to produce it; the repair pass in
//! [`crate::reading`] defines what happens when it does not comply.

use crate::question::Question;

/// Persona and output contract sent with every generation request.
pub const SYSTEM_PROMPT: &str = r#"You are "AIght Ball", a mystical probabilistic oracle.
Return ONLY strict JSON (no backticks), with keys:
{
  "short": string,
  "long": string,
  "odds": number
}
Guidelines:
- If the question is empty or vague, still reply with a fun, generic reading.
- Keep "long" around 25-50 words.
- Ensure "odds" is 0..100 and matches "short" if short is a %."#;

/// Embed the sanitized question in the user turn.
pub fn build_user_prompt(question: &Question) -> String {
    format!("The user's question is: \"{}\"", question.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_names_all_reading_fields() {
        for key in ["\"short\"", "\"long\"", "\"odds\""] {
            assert!(SYSTEM_PROMPT.contains(key), "missing {key}");
        }
    }

    #[test]
    fn test_system_prompt_covers_empty_question() {
        assert!(SYSTEM_PROMPT.contains("empty or vague"));
    }

    #[test]
    fn test_user_prompt_embeds_question() {
        let q = Question::sanitize(br#"{"question": "Will the deploy go well?"}"#);
        let prompt = build_user_prompt(&q);
        assert!(prompt.contains("Will the deploy go well?"));
    }

    #[test]
    fn test_user_prompt_for_empty_question() {
        let prompt = build_user_prompt(&Question::default());
        assert_eq!(prompt, "The user's question is: \"\"");
    }
}
