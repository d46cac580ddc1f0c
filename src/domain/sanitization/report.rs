//! Post-processing of the model's evaluation report.
//!
//! The model is asked for a narrative report but routinely repeats the
//! interview header the renderer already prints, leaves template
//! placeholders behind, mentions the employability level several times
//! and quotes "spelling errors" the candidate never wrote. Each of those
//! is corrected by one pure pass below; [`ReportSanitizer`] chains them.
//!
//! Pass order:
//! 1. [`remove_interview_data_sections`]
//! 2. [`remove_metadata_lines`]
//! 3. [`strip_json_blocks`]
//! 4. [`resolve_placeholders`]
//! 5. [`extract_rating`]
//! 6. [`remove_inline_rating`]
//! 7. [`verify_spelling_examples`]
//! 8. [`collapse_blank_lines`]

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;

use crate::domain::interview::{EmployabilityRating, InterviewMetadata, Turn, UNSPECIFIED};

/// Characters inspected after the spelling-section anchor.
pub const QUOTE_LOOKAHEAD_CHARS: usize = 900;

/// Lines longer than this are narrative, not "Key: value" metadata.
const METADATA_LINE_MAX_CHARS: usize = 80;

/// Upper bound on whole-pipeline repetitions while seeking a fixed point.
const MAX_PASSES: usize = 32;

/// Phrases meaning the report found no spelling errors. Accent-folded.
const NO_ERROR_PHRASES: [&str; 7] = [
    "no se detectaron",
    "no se han detectado",
    "no se encontraron",
    "sin errores",
    "ningun error",
    "buena ortografia",
    "correcta ortografia",
];

/// Values substituted into the report, already rendered for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportFacts {
    pub interview_date: String,
    pub role: String,
    pub academic_level: String,
    pub cycle: String,
    pub duration: String,
}

impl ReportFacts {
    pub fn new(interview_date: impl Into<String>, metadata: &InterviewMetadata) -> Self {
        Self {
            interview_date: interview_date.into(),
            role: metadata.display_role(),
            academic_level: metadata.display_academic_level(),
            cycle: metadata.display_cycle(),
            duration: metadata.display_duration(),
        }
    }
}

/// Narrative text plus the single employability rating shown as a banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SanitizedReport {
    pub text: String,
    pub rating: Option<EmployabilityRating>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Patterns
// ════════════════════════════════════════════════════════════════════════════════

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid report regex")
}

static INTERVIEW_DATA_HEADING: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"(?i)^\s*(?:[^\p{L}\p{N}\s]+\s*|\d+[.)]\s*)*datos\s+de\s+la\s+entrevista[^\p{L}\p{N}]*$",
    )
});

static ANY_HEADING: Lazy<Regex> =
    Lazy::new(|| compile(r"^\s*(?:#{1,6}|\*\*[^*\n]+\*\*\s*:?\s*$)"));

static METADATA_LINE: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"(?i)^\s*(?:[-*•]\s*)?(?:\*\*|__)?\s*(?:candidato|fecha|rol\s+simulado|nivel\s+acad[ée]mico|ciclo\s+formativo|duraci[óo]n)(?:\s+de\s+la\s+entrevista)?\s*(?:\*\*|__)?\s*:",
    )
});

static BULLET_LINE: Lazy<Regex> = Lazy::new(|| compile(r"^\s*(?:[-•]|\*\s)"));

static JSON_MARKER_BLOCK: Lazy<Regex> =
    Lazy::new(|| compile(r"(?s)---JSON-REPORT-START---.*?---JSON-REPORT-END---"));
static JSON_MARKER_TAIL: Lazy<Regex> = Lazy::new(|| compile(r"(?s)---JSON-REPORT-START---.*"));
static JSON_MARKER_STRAY: Lazy<Regex> = Lazy::new(|| compile(r"---JSON-REPORT-END---"));
static JSON_FENCE: Lazy<Regex> = Lazy::new(|| compile(r"(?is)```[ \t]*json\b.*?```"));
static JSON_FENCE_TAIL: Lazy<Regex> = Lazy::new(|| compile(r"(?is)```[ \t]*json\b.*"));

static BRACKET_TOKEN: Lazy<Regex> = Lazy::new(|| compile(r"\[([^\[\]\n]*)\]"));

static EXPLICIT_RATING: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"(?i)nivel\s+de\s+empleabilidad\s*[*_]*\s*:?\s*[*_]*\s*(muy\s+bajo|muy\s+bueno|bajo|medio|bueno)\b",
    )
});

static ANY_RATING: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)\b(muy\s+bajo|muy\s+bueno|bajo|medio|bueno)\b"));

static SPELLING_ANCHOR: Lazy<Regex> = Lazy::new(|| compile(r"(?i)ejempl|ortograf"));

static QUOTED: Lazy<Regex> = Lazy::new(|| compile(r#"["“]([^"“”\n]+)["”]"#));

static BLANK_RUN: Lazy<Regex> = Lazy::new(|| compile(r"\n(?:[ \t]*\n){2,}"));

// ════════════════════════════════════════════════════════════════════════════════
// Passes
// ════════════════════════════════════════════════════════════════════════════════

/// Removes every "DATOS DE LA ENTREVISTA" heading together with its body.
///
/// The body ends at the next heading, at a blank line followed by a line
/// starting with a capital letter, or at the end of the text.
pub fn remove_interview_data_sections(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let mut kept = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        if !INTERVIEW_DATA_HEADING.is_match(lines[i]) {
            kept.push(lines[i]);
            i += 1;
            continue;
        }

        i += 1;
        while i < lines.len() {
            let line = lines[i];
            if INTERVIEW_DATA_HEADING.is_match(line) || ANY_HEADING.is_match(line) {
                break;
            }
            let capital_follows = lines.get(i + 1).map_or(false, |next| starts_with_capital(next));
            if line.trim().is_empty() && capital_follows {
                break;
            }
            i += 1;
        }
    }

    kept.join("\n")
}

fn starts_with_capital(line: &str) -> bool {
    line.trim_start()
        .chars()
        .next()
        .map_or(false, char::is_uppercase)
}

/// Removes leftover "Candidato: ...", "Fecha: ..." style lines.
///
/// Bullet lines always go; plain lines only when short enough to be a
/// key/value pair rather than a sentence.
pub fn remove_metadata_lines(text: &str) -> String {
    text.lines()
        .filter(|line| {
            let is_metadata = METADATA_LINE.is_match(line)
                && (BULLET_LINE.is_match(line)
                    || line.chars().count() <= METADATA_LINE_MAX_CHARS);
            !is_metadata
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Removes fenced JSON blocks and `---JSON-REPORT-START---` sections.
///
/// An unterminated block runs to the end of the text.
pub fn strip_json_blocks(text: &str) -> String {
    let text = JSON_MARKER_BLOCK.replace_all(text, "");
    let text = JSON_MARKER_TAIL.replace_all(&text, "");
    let text = JSON_MARKER_STRAY.replace_all(&text, "");
    let text = JSON_FENCE.replace_all(&text, "");
    JSON_FENCE_TAIL.replace_all(&text, "").into_owned()
}

/// Substitutes known `[placeholder]` tokens and drops unknown ones.
///
/// Repeats until no bracket token is left, so nested tokens resolve from
/// the inside out.
pub fn resolve_placeholders(text: &str, facts: &ReportFacts) -> String {
    let mut current = text.to_string();
    while BRACKET_TOKEN.is_match(&current) {
        current = BRACKET_TOKEN
            .replace_all(&current, |caps: &Captures| {
                placeholder_value(&caps[1], facts)
                    .map(display_value)
                    .unwrap_or_default()
            })
            .into_owned();
    }
    current
}

fn placeholder_value<'a>(token: &str, facts: &'a ReportFacts) -> Option<&'a str> {
    let key = fold_accents(&token.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase());
    let value = match key.as_str() {
        "fecha actual" | "fecha" | "fecha de la entrevista" | "fecha de hoy" => {
            &facts.interview_date
        }
        "rol proporcionado por el candidato" | "rol" | "rol simulado" | "rol laboral"
        | "puesto" => &facts.role,
        "nivel academico"
        | "nivel academico del candidato"
        | "nivel academico proporcionado por el candidato" => &facts.academic_level,
        "ciclo formativo"
        | "ciclo"
        | "ciclo formativo del candidato"
        | "ciclo formativo proporcionado por el candidato" => &facts.cycle,
        "duracion" | "duracion de la entrevista" => &facts.duration,
        _ => return None,
    };
    Some(value.as_str())
}

fn display_value(value: &str) -> String {
    let cleaned: String = value.chars().filter(|c| *c != '[' && *c != ']').collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        UNSPECIFIED.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Finds the employability rating, preferring an explicit
/// "Nivel de empleabilidad: X" over the first bare rating phrase.
pub fn extract_rating(text: &str) -> Option<EmployabilityRating> {
    EXPLICIT_RATING
        .captures(text)
        .or_else(|| ANY_RATING.captures(text))
        .and_then(|caps| EmployabilityRating::parse(&caps[1]))
}

/// Drops every line that mentions "empleabilidad".
pub fn remove_inline_rating(text: &str) -> String {
    text.lines()
        .filter(|line| !line.to_lowercase().contains("empleabilidad"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Removes lines quoting spelling mistakes that the candidate never wrote.
///
/// Quotes are looked for in the stretch of text following the last
/// "ejempl"/"ortograf" mention. When that stretch states that no errors
/// were found the text is returned untouched.
pub fn verify_spelling_examples(text: &str, candidate_turns: &[&str]) -> String {
    let Some(anchor) = SPELLING_ANCHOR.find_iter(text).last() else {
        return text.to_string();
    };
    let tail = &text[anchor.start()..];
    let end = tail
        .char_indices()
        .nth(QUOTE_LOOKAHEAD_CHARS)
        .map_or(tail.len(), |(idx, _)| idx);
    let neighborhood = &tail[..end];

    let folded = fold_accents(&neighborhood.to_lowercase());
    if NO_ERROR_PHRASES.iter().any(|phrase| folded.contains(phrase)) {
        return text.to_string();
    }

    let unverified: Vec<&str> = QUOTED
        .captures_iter(neighborhood)
        .filter(|caps| !is_attested(&caps[1], candidate_turns))
        .filter_map(|caps| caps.get(0).map(|m| m.as_str()))
        .collect();

    if unverified.is_empty() {
        return text.to_string();
    }

    tracing::debug!(removed_quotes = unverified.len(), "Dropping unverified spelling examples");

    text.lines()
        .filter(|line| !unverified.iter().any(|quote| line.contains(quote)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_attested(quote: &str, candidate_turns: &[&str]) -> bool {
    let needle = quote.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    let bare = trim_punctuation(&needle);

    candidate_turns.iter().any(|content| {
        let haystack = content.to_lowercase();
        haystack.contains(&needle)
            || (!bare.is_empty()
                && haystack
                    .split_whitespace()
                    .any(|token| trim_punctuation(token) == bare))
    })
}

fn trim_punctuation(s: &str) -> &str {
    s.trim_matches(|c: char| !c.is_alphanumeric())
}

/// Collapses runs of two or more blank lines into one and trims the ends.
pub fn collapse_blank_lines(text: &str) -> String {
    BLANK_RUN.replace_all(text, "\n\n").trim().to_string()
}

fn fold_accents(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'á' | 'à' => 'a',
            'é' | 'è' => 'e',
            'í' | 'ì' => 'i',
            'ó' | 'ò' => 'o',
            'ú' | 'ù' | 'ü' => 'u',
            other => other,
        })
        .collect()
}

// ════════════════════════════════════════════════════════════════════════════════
// Pipeline
// ════════════════════════════════════════════════════════════════════════════════

/// Deterministic corrective layer over the raw model report.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportSanitizer;

impl ReportSanitizer {
    pub fn new() -> Self {
        Self
    }

    /// Cleans `raw` and extracts its employability rating.
    ///
    /// Spelling examples are checked against the candidate turns of
    /// `transcript`. The result is a fixed point: sanitizing it again with
    /// the same facts and transcript returns the same text.
    pub fn sanitize(&self, raw: &str, facts: &ReportFacts, transcript: &[Turn]) -> SanitizedReport {
        let evidence: Vec<&str> = transcript
            .iter()
            .filter(|turn| turn.is_from_user())
            .map(|turn| turn.content.as_str())
            .collect();

        let normalized = raw.replace("\r\n", "\n");
        let structural = self.strip_structure(&normalized, facts);
        let rating = extract_rating(&structural);

        let mut text = self.finish(&structural, &evidence);
        for _ in 0..MAX_PASSES {
            let next = self.finish(&self.strip_structure(&text, facts), &evidence);
            if next == text {
                break;
            }
            text = next;
        }

        tracing::debug!(
            raw_chars = raw.chars().count(),
            clean_chars = text.chars().count(),
            rating = ?rating,
            "Report sanitized"
        );

        SanitizedReport { text, rating }
    }

    fn strip_structure(&self, text: &str, facts: &ReportFacts) -> String {
        let text = remove_interview_data_sections(text);
        let text = remove_metadata_lines(&text);
        let text = strip_json_blocks(&text);
        resolve_placeholders(&text, facts)
    }

    fn finish(&self, text: &str, evidence: &[&str]) -> String {
        let mut current = collapse_blank_lines(&remove_inline_rating(text));
        for _ in 0..MAX_PASSES {
            let next = collapse_blank_lines(&verify_spelling_examples(&current, evidence));
            if next == current {
                break;
            }
            current = next;
        }
        current
    }
}
