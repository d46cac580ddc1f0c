//! Prompt-injection screening for candidate turns.
//!
//! Detection only: accepted text is returned as given, rejected text is
//! never forwarded to the model. Patterns are multi-word phrases so that
//! ordinary technical answers mentioning "sistema" or "instrucciones" pass.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Maximum length of a candidate turn in characters.
pub const MAX_USER_CONTENT_CHARS: usize = 8000;

/// Family of injection attempt that was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InjectionClass {
    /// "ignore the previous instructions", "olvida las reglas"...
    InstructionOverride,
    /// "reveal your system prompt", "revela el sistema"...
    PromptDisclosure,
    /// The literal term "jailbreak".
    Jailbreak,
}

impl InjectionClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            InjectionClass::InstructionOverride => "instruction_override",
            InjectionClass::PromptDisclosure => "prompt_disclosure",
            InjectionClass::Jailbreak => "jailbreak",
        }
    }
}

impl fmt::Display for InjectionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejection returned when a turn matches an injection pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Prompt injection detected ({class})")]
pub struct InjectionDetected {
    pub class: InjectionClass,
}

static INJECTION_PATTERNS: Lazy<Vec<(Regex, InjectionClass)>> = Lazy::new(|| {
    use InjectionClass::*;
    [
        // English override
        (
            r"(?i)\b(?:ignore|disregard|forget|override|bypass)\s+(?:all\s+|any\s+)?(?:(?:the|your|previous|prior|above|earlier|system)\s+)*(?:instructions?|rules|prompt|directives?|restrictions)\b",
            InstructionOverride,
        ),
        // Spanish override
        (
            r"(?i)\b(?:ignora|ignorar|ignore|olvida|olvidar|olvide|omite|omitir|salta|sáltate|saltate|anula|desobedece)\s+(?:todas\s+|todo\s+)?(?:(?:las|tus|los|lo|sus)\s+)?(?:(?:anteriores|previas)\s+)?(?:instrucciones|reglas|indicaciones|directrices|normas)\b",
            InstructionOverride,
        ),
        // English disclosure
        (
            r"(?i)\b(?:reveal|show|print|display|repeat|tell\s+me)\s+(?:me\s+)?(?:your\s+|the\s+)?(?:system\s+prompt|system\s+instructions?|initial\s+instructions?|hidden\s+instructions?)\b",
            PromptDisclosure,
        ),
        // Spanish disclosure
        (
            r"(?i)\brevela(?:r|me)?\s+(?:el\s+|tu\s+|tus\s+|las\s+)?(?:sistema|prompt|instrucciones)\b",
            PromptDisclosure,
        ),
        (
            r"(?i)\b(?:muestra|muéstrame|muestrame|dime|enséñame|enseñame|repite|imprime)\s+(?:el\s+|tu\s+|tus\s+|las\s+)?(?:prompt(?:\s+del\s+sistema)?|instrucciones\s+(?:del\s+sistema|iniciales|ocultas|originales))\b",
            PromptDisclosure,
        ),
        (r"(?i)\bjailbreak\w*", Jailbreak),
    ]
    .into_iter()
    .map(|(pattern, class)| (Regex::new(pattern).expect("valid injection regex"), class))
    .collect()
});

/// Screens candidate turns before they reach the model.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSanitizer;

impl InputSanitizer {
    pub fn new() -> Self {
        Self
    }

    /// Returns the trimmed text if no injection pattern matches.
    pub fn sanitize(&self, text: &str) -> Result<String, InjectionDetected> {
        let trimmed = text.trim();
        match self.detect(trimmed) {
            Some(class) => {
                tracing::warn!(
                    pattern_class = %class,
                    content_chars = trimmed.chars().count(),
                    "Rejected candidate turn"
                );
                Err(InjectionDetected { class })
            }
            None => Ok(trimmed.to_string()),
        }
    }

    /// Returns the class of the first pattern that matches, if any.
    pub fn detect(&self, text: &str) -> Option<InjectionClass> {
        INJECTION_PATTERNS
            .iter()
            .find(|(pattern, _)| pattern.is_match(text))
            .map(|(_, class)| *class)
    }
}
