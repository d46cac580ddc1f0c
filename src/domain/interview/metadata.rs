//! Transcript metadata extraction.
//!
//! Recovers the interview configuration (role level, academic level,
//! training cycle, duration) from free-text turns. These are settled
//! during the first exchanges, either stated by the candidate or confirmed
//! by the interviewer, so only the earliest turns are inspected.
//!
//! Each field is an independent `Option` reducer: the first qualifying
//! turn fixes it and later turns are never consulted for that field.
//! Extraction never fails; unresolved fields render as [`UNSPECIFIED`].

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

use super::{Sender, Turn};

/// Placeholder shown for any field that could not be resolved.
pub const UNSPECIFIED: &str = "No especificado";

/// Default number of earliest turns inspected.
pub const DEFAULT_EXTRACTION_WINDOW: usize = 30;

/// Seniority of the simulated position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RoleLevel {
    Junior,
    Middle,
    Senior,
}

impl RoleLevel {
    pub fn label(&self) -> &'static str {
        match self {
            RoleLevel::Junior => "Junior",
            RoleLevel::Middle => "Middle",
            RoleLevel::Senior => "Senior",
        }
    }
}

/// Academic level of the candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AcademicLevel {
    FpBasica,
    FpMedia,
    FpSuperior,
    MasterEspecializacion,
    /// Bare "FP" answer without a grade.
    Fp,
}

impl AcademicLevel {
    pub fn label(&self) -> &'static str {
        match self {
            AcademicLevel::FpBasica => "FP Básica",
            AcademicLevel::FpMedia => "FP Media",
            AcademicLevel::FpSuperior => "FP Superior",
            AcademicLevel::MasterEspecializacion => "Máster/Especialización",
            AcademicLevel::Fp => "FP",
        }
    }
}

/// Requested interview length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum InterviewDuration {
    Corta,
    Media,
    Larga,
}

impl InterviewDuration {
    pub fn label(&self) -> &'static str {
        match self {
            InterviewDuration::Corta => "Corta",
            InterviewDuration::Media => "Media",
            InterviewDuration::Larga => "Larga",
        }
    }
}

/// Training cycle, either from the known table or a verbatim answer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum TrainingCycle {
    Known(&'static str),
    Verbatim(String),
}

impl TrainingCycle {
    pub fn label(&self) -> &str {
        match self {
            TrainingCycle::Known(name) => name,
            TrainingCycle::Verbatim(text) => text,
        }
    }
}

macro_rules! impl_label_display {
    ($($ty:ty),+) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.label())
                }
            }
        )+
    };
}

impl_label_display!(RoleLevel, AcademicLevel, InterviewDuration, TrainingCycle);

/// Interview parameters recovered from a transcript.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InterviewMetadata {
    pub role: Option<RoleLevel>,
    pub academic_level: Option<AcademicLevel>,
    pub cycle: Option<TrainingCycle>,
    pub duration: Option<InterviewDuration>,
}

impl InterviewMetadata {
    pub fn is_complete(&self) -> bool {
        self.role.is_some()
            && self.academic_level.is_some()
            && self.cycle.is_some()
            && self.duration.is_some()
    }

    pub fn display_role(&self) -> String {
        label_or_unspecified(self.role.as_ref().map(RoleLevel::label))
    }

    pub fn display_academic_level(&self) -> String {
        label_or_unspecified(self.academic_level.as_ref().map(AcademicLevel::label))
    }

    pub fn display_cycle(&self) -> String {
        label_or_unspecified(self.cycle.as_ref().map(TrainingCycle::label))
    }

    pub fn display_duration(&self) -> String {
        label_or_unspecified(self.duration.as_ref().map(InterviewDuration::label))
    }
}

fn label_or_unspecified(label: Option<&str>) -> String {
    label.unwrap_or(UNSPECIFIED).to_string()
}

// ════════════════════════════════════════════════════════════════════════════════
// Detectors
// ════════════════════════════════════════════════════════════════════════════════

static ROLE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(junior|middle|senior)\b").expect("valid role regex")
});

static ACADEMIC_PATTERNS: Lazy<Vec<(Regex, AcademicLevel)>> = Lazy::new(|| {
    [
        (r"(?i)\bfp\s+b[áa]sic[ao]\b", AcademicLevel::FpBasica),
        (r"(?i)\bfp\s+medi[ao]\b", AcademicLevel::FpMedia),
        (r"(?i)\bfp\s+superior\b", AcademicLevel::FpSuperior),
        (
            r"(?i)\b(?:m[áa]ster|especializaci[óo]n)\b",
            AcademicLevel::MasterEspecializacion,
        ),
    ]
    .into_iter()
    .map(|(pattern, level)| (Regex::new(pattern).expect("valid academic regex"), level))
    .collect()
});

static BARE_FP_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bfp\b").expect("valid fp regex"));

static DURATION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(corta|media|larga)\b").expect("valid duration regex")
});

/// Known cycles in lookup order. Longer names that contain a shorter one
/// ("auxiliar de enfermería" vs "enfermería") come first.
static CYCLE_TABLE: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (
            r"(?i)\bauxiliar\s+de\s+enfermer[íi]a\b",
            "Técnico en Cuidados Auxiliares de Enfermería",
        ),
        (r"(?i)\bdaw\b", "DAW - Desarrollo de Aplicaciones Web"),
        (r"(?i)\bdam\b", "DAM - Desarrollo de Aplicaciones Multiplataforma"),
        (r"(?i)\basir\b", "ASIR - Administración de Sistemas Informáticos en Red"),
        (r"(?i)\bsmr\b", "SMR - Sistemas Microinformáticos y Redes"),
        (r"(?i)\benfermer[íi]a\b", "Enfermería"),
        (r"(?i)\bintegraci[óo]n\s+social\b", "Integración Social"),
        (r"(?i)\belectr[óo]nica\b", "Electrónica"),
        (r"(?i)\badministraci[óo]n\s+y\s+finanzas\b", "Administración y Finanzas"),
        (r"(?i)\bcomercio\s+internacional\b", "Comercio Internacional"),
        (r"(?i)\bmarketing\b", "Marketing y Publicidad"),
    ]
    .into_iter()
    .map(|(pattern, name)| (Regex::new(pattern).expect("valid cycle regex"), name))
    .collect()
});

const CYCLE_KEYWORDS: [&str; 7] = [
    "ciclo",
    "estudio",
    "estudiando",
    "formativo",
    "carrera",
    "especialidad",
    "técnico",
];

const BARE_FP_MAX_CHARS: usize = 50;
const VERBATIM_CYCLE_MIN_CHARS: usize = 4;
const VERBATIM_CYCLE_MAX_CHARS: usize = 149;

fn detect_role(text: &str) -> Option<RoleLevel> {
    let captured = ROLE_PATTERN.captures(text)?;
    match captured[1].to_lowercase().as_str() {
        "junior" => Some(RoleLevel::Junior),
        "middle" => Some(RoleLevel::Middle),
        "senior" => Some(RoleLevel::Senior),
        _ => None,
    }
}

fn detect_academic_level(text: &str) -> Option<AcademicLevel> {
    ACADEMIC_PATTERNS
        .iter()
        .find(|(pattern, _)| pattern.is_match(text))
        .map(|(_, level)| *level)
        .or_else(|| {
            let short = text.chars().count() < BARE_FP_MAX_CHARS;
            (short && BARE_FP_PATTERN.is_match(text)).then_some(AcademicLevel::Fp)
        })
}

fn detect_duration(text: &str) -> Option<InterviewDuration> {
    let captured = DURATION_PATTERN.captures(text)?;
    match captured[1].to_lowercase().as_str() {
        "corta" => Some(InterviewDuration::Corta),
        "media" => Some(InterviewDuration::Media),
        "larga" => Some(InterviewDuration::Larga),
        _ => None,
    }
}

fn detect_cycle(text: &str, sender: Sender) -> Option<TrainingCycle> {
    if let Some((_, name)) = CYCLE_TABLE.iter().find(|(pattern, _)| pattern.is_match(text)) {
        return Some(TrainingCycle::Known(name));
    }

    if !sender.is_user() || text.contains('?') {
        return None;
    }
    let len = text.chars().count();
    if !(VERBATIM_CYCLE_MIN_CHARS..=VERBATIM_CYCLE_MAX_CHARS).contains(&len) {
        return None;
    }
    let lower = text.to_lowercase();
    CYCLE_KEYWORDS
        .iter()
        .any(|keyword| lower.contains(keyword))
        .then(|| TrainingCycle::Verbatim(text.to_string()))
}

/// Fills `slot` with the detector result unless it is already resolved.
fn resolve<T>(slot: &mut Option<T>, detect: impl FnOnce() -> Option<T>) {
    if slot.is_none() {
        *slot = detect();
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Extractor
// ════════════════════════════════════════════════════════════════════════════════

/// Heuristic extractor over stored turns.
#[derive(Debug, Clone, Copy)]
pub struct MetadataExtractor {
    window: usize,
    candidate_only: bool,
}

impl Default for MetadataExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_EXTRACTION_WINDOW)
    }
}

impl MetadataExtractor {
    /// Creates an extractor that inspects the earliest `window` turns.
    pub fn new(window: usize) -> Self {
        Self {
            window,
            candidate_only: false,
        }
    }

    /// Restricts the field detectors to the candidate's turns.
    ///
    /// The window still counts every turn.
    pub fn candidate_turns_only(mut self) -> Self {
        self.candidate_only = true;
        self
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Extracts metadata from turns given newest-first, as the store returns them.
    pub fn extract(&self, turns_newest_first: &[Turn]) -> InterviewMetadata {
        let mut metadata = InterviewMetadata::default();

        let earliest = turns_newest_first
            .iter()
            .rev()
            .take(self.window)
            .filter(|turn| !self.candidate_only || turn.is_from_user());

        for turn in earliest {
            let text = turn.content.trim();
            resolve(&mut metadata.role, || detect_role(text));
            resolve(&mut metadata.academic_level, || detect_academic_level(text));
            resolve(&mut metadata.duration, || detect_duration(text));
            resolve(&mut metadata.cycle, || detect_cycle(text, turn.sender));

            if metadata.is_complete() {
                break;
            }
        }

        metadata
    }
}
