/*!
 * Prompt templates for advisory translation.
 */

use crate::language_utils::display_name;
use crate::preservation::codec::TOKEN_MARKER;

/// Builder for the translator's system and context messages
#[derive(Debug, Clone)]
pub struct TranslationPrompt {
    /// Template with `{source_language}`, `{target_language}` and `{token}` placeholders
    template: String,
}

impl TranslationPrompt {
    /// The default system prompt for security advisories
    pub const CVE_TRANSLATOR: &'static str = r#"You are a cybersecurity translation specialist. Translate {source_language} security advisories (CVE documents) into {target_language} while preserving technical accuracy.

## Never translate
- CVE IDs and advisory IDs (e.g. CVE-2025-41225, VMSA-2025-0010)
- CVSS labels, vectors and scores (e.g. CVSSv3, 8.8)
- Product names and versions (e.g. VMware ESXi 7.0.3), build numbers
- Company names (VMware, Microsoft, ...)
- URLs, e-mail addresses, file paths and other technical identifiers

## Protected tokens
- Tokens of the form [{token}:NNNN] stand for protected terms (the marker may carry a number, e.g. [{token}2:NNNN])
- Copy every token exactly as written, keep its brackets and digits
- Never translate, reorder the digits of, merge or drop a token

## Style
- Translate descriptions, impact statements, instructions and procedures
- Use formal business register appropriate for technical documentation (for Japanese, 敬語)
- Keep the original sentence structure when possible
- Prefer technical accuracy over fluency
- Return only the translated text"#;

    /// Create a prompt from a custom template
    pub fn new(template: impl Into<String>) -> Self {
        Self { template: template.into() }
    }

    /// The default advisory prompt
    pub fn cve_translator() -> Self {
        Self::new(Self::CVE_TRANSLATOR)
    }

    /// Use a custom template when one is configured
    pub fn from_override(custom: Option<&str>) -> Self {
        match custom {
            Some(template) if !template.trim().is_empty() => Self::new(template),
            _ => Self::cve_translator(),
        }
    }

    /// Render the system message for a language pair
    pub fn system_message(&self, source_language: &str, target_language: &str) -> String {
        self.template
            .replace("{source_language}", &display_name(source_language))
            .replace("{target_language}", &display_name(target_language))
            .replace("{token}", TOKEN_MARKER)
    }

    /// Render the optional context message
    pub fn context_message(context: &str) -> String {
        format!("Additional context: {}", context.trim())
    }
}

impl Default for TranslationPrompt {
    fn default() -> Self {
        Self::cve_translator()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_systemMessage_shouldNameLanguagesAndTokens() {
        let message = TranslationPrompt::default().system_message("en", "ja");

        assert!(message.contains("English security advisories"));
        assert!(message.contains("into Japanese"));
        assert!(message.contains("[KEEP:NNNN]"));
        assert!(!message.contains("{token}"));
    }

    #[test]
    fn test_fromOverride_withBlankTemplate_shouldUseDefault() {
        let prompt = TranslationPrompt::from_override(Some("   "));
        assert!(prompt.system_message("en", "ja").contains("cybersecurity"));

        let custom = TranslationPrompt::from_override(Some("Translate to {target_language}."));
        assert_eq!(custom.system_message("en", "ja"), "Translate to Japanese.");
    }

    #[test]
    fn test_contextMessage_shouldPrefixContext() {
        assert_eq!(
            TranslationPrompt::context_message(" CVE security document translation "),
            "Additional context: CVE security document translation"
        );
    }
}
