// ── Emotion: Keyword Classifiers ────────────────────────────────────────────
//
// Two coarse, deterministic keyword heuristics. No model, no I/O.
//
//   classify_event  — event text → EventCategory (ordered rules, first wins)
//   analyze_emotion — free text → detected EmotionKind (fallback target for
//                     uncategorized events)
//   replay_keyword  — "last time" reference with a quoted phrase → the phrase
//
// Matching is case-insensitive substring search over the lowercased text.
// Phrase lists carry both English and Chinese markers.

use crate::atoms::types::{EmotionKind, EventCategory};

// ═════════════════════════════════════════════════════════════════════════════
// Event category lexicon (checked in this order)
// ═════════════════════════════════════════════════════════════════════════════

const PRAISE_MARKERS: &[&str] = &["好棒", "很棒", "厉害", "优秀", "great", "good job"];

const APOLOGY_MARKERS: &[&str] = &["抱歉", "对不起", "sorry", "apologize"];

const CRITICISM_MARKERS: &[&str] = &["不好", "差", "bad", "wrong"];

const NEED_MARKERS: &[&str] = &["需要", "帮忙", "help", "need"];

const IGNORE_MARKERS: &[&str] = &["不理", "忽略", "ignore"];

const CATEGORY_RULES: &[(EventCategory, &[&str])] = &[
    (EventCategory::Praise, PRAISE_MARKERS),
    (EventCategory::Apology, APOLOGY_MARKERS),
    (EventCategory::Criticism, CRITICISM_MARKERS),
    (EventCategory::Need, NEED_MARKERS),
    (EventCategory::Ignore, IGNORE_MARKERS),
];

// ═════════════════════════════════════════════════════════════════════════════
// Detected-emotion lexicon
// ═════════════════════════════════════════════════════════════════════════════

/// Extreme negative content. Any hit wins outright.
const EMERGENCY_MARKERS: &[&str] = &[
    "不想活了",
    "自杀",
    "结束生命",
    "死了算了",
    "kill myself",
    "suicide",
    "end my life",
    "want to die",
];

const SAD_MARKERS: &[&str] = &[
    "难过", "伤心", "悲伤", "沮丧", "失落", "痛苦", "哭", "sad", "depressed", "unhappy", "upset",
    "down", "cry",
];

const ANGRY_MARKERS: &[&str] = &[
    "生气", "愤怒", "气死了", "讨厌", "恨", "烦", "angry", "mad", "furious", "hate", "annoyed",
];

/// Happy hits per thousand characters below which a text stays NEUTRAL, so a
/// lone "glad" buried in a long message does not read as joy.
const HAPPY_MIN_DENSITY: f64 = 0.5;

/// Marker that a message refers back to an earlier exchange.
const REPLAY_TRIGGER: &str = "上次";

/// Quote pairs checked in order; corner brackets first.
const REPLAY_QUOTES: &[(char, char)] = &[('「', '」'), ('“', '”'), ('"', '"')];

const HAPPY_MARKERS: &[&str] = &["开心", "高兴", "快乐", "兴奋", "愉快", "happy", "glad", "excited", "joyful", "pleased"];

/// Classify event text into a category.
///
/// Rules run praise → apology → criticism → need → ignore; the first rule
/// with any matching phrase wins. Returns `None` when nothing matches so the
/// caller can apply its own fallback policy.
pub fn classify_event(text: &str) -> Option<EventCategory> {
    let lower = text.to_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|(_, markers)| contains_any(&lower, markers))
        .map(|(category, _)| *category)
}

/// Coarse sentiment detector used when the caller has no external classifier.
///
/// Blank text is NEUTRAL. Emergency phrases win outright. Otherwise SAD wins
/// when its hit count is strictly greater than both others, then ANGRY under
/// the same rule, then HAPPY when its hits are dense enough (more than 0.5 per
/// thousand characters); everything else is NEUTRAL.
pub fn analyze_emotion(text: &str) -> EmotionKind {
    if text.trim().is_empty() {
        return EmotionKind::Neutral;
    }
    let lower = text.to_lowercase();

    if contains_any(&lower, EMERGENCY_MARKERS) {
        return EmotionKind::Emergency;
    }

    let sad = count_marker_hits(&lower, SAD_MARKERS);
    let angry = count_marker_hits(&lower, ANGRY_MARKERS);
    let happy = count_marker_hits(&lower, HAPPY_MARKERS);

    if sad > 0 && sad > angry && sad > happy {
        EmotionKind::Sad
    } else if angry > 0 && angry > sad && angry > happy {
        EmotionKind::Angry
    } else if happy > 0 && marker_density(happy, &lower) > HAPPY_MIN_DENSITY {
        EmotionKind::Happy
    } else {
        EmotionKind::Neutral
    }
}

/// Keyword to replay when the text refers to "last time" (上次) and quotes a
/// phrase, e.g. `上次你说「好棒」` → `好棒`.
///
/// The phrase runs from the first opening quote to the next closing quote
/// (or the end of the text). Blank phrases yield `None`.
pub fn replay_keyword(text: &str) -> Option<&str> {
    if !text.contains(REPLAY_TRIGGER) {
        return None;
    }
    let (open, close) = REPLAY_QUOTES
        .iter()
        .copied()
        .find(|(open, close)| text.contains(*open) && text.contains(*close))?;
    let start = text.find(open)? + open.len_utf8();
    let rest = &text[start..];
    let phrase = match rest.find(close) {
        Some(end) => &rest[..end],
        None => rest,
    };
    let phrase = phrase.trim();
    (!phrase.is_empty()).then_some(phrase)
}

fn contains_any(text: &str, markers: &[&str]) -> bool {
    markers.iter().any(|m| text.contains(m))
}

/// Marker hits per thousand characters.
fn marker_density(hits: usize, text: &str) -> f64 {
    let len = text.chars().count();
    if len == 0 {
        return 0.0;
    }
    hits as f64 / len as f64 * 1000.0
}

/// Count how many markers appear in the text (substring match).
fn count_marker_hits(text: &str, markers: &[&str]) -> usize {
    markers.iter().filter(|m| text.contains(**m)).count()
}
