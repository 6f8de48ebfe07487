//! Per-line structural signals: headers, list markers, quantities, verbs.
//!
//! Detection runs on a folded key (NFKC, lowercase) so full-width digits and
//! vulgar fractions read like their ASCII forms. The text that ends up in the
//! result keeps the original characters, minus the list marker.
use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static BULLET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:[-*+](?:\s+|$)|[\x{2022}\x{00b7}\x{2023}\x{25e6}\x{25aa}\x{2013}\x{2014}]\s*|\[[ xX]?\]\s+)",
    )
    .expect("bullet regex is valid")
});

static NUMBERED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:step\s*\d{1,3}\s*[.):\-]?\s*|\d{1,3}\s*[.)]\s+|\(\d{1,3}\)\s+)")
        .expect("numbered regex is valid")
});

static QUANTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:\d+\s+\d+\s*[/\x{2044}]\s*\d+|\d+(?:[.,]\d+)?(?:\s*[/\x{2044}]\s*\d+)?)(?:\s*(?:-|to)\s*\d+(?:[.,]\d+)?)?\s*[a-z(]",
    )
    .expect("quantity regex is valid")
});

static ARTICLE_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:a|an|one)\s+(?:pinch|dash|handful|splash|sprig|knob|bunch|clove|cup|teaspoon|tablespoon|few|couple)\b",
    )
    .expect("article unit regex is valid")
});

static HEADER_PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\([^)]*\)$").expect("parenthetical regex is valid"));

const INGREDIENT_HEADERS: &[&str] = &[
    "ingredient",
    "ingredient list",
    "ingredients",
    "ingredients list",
    "what you need",
    "what you'll need",
    "you will need",
];

const INSTRUCTION_HEADERS: &[&str] = &[
    "direction",
    "directions",
    "how to make it",
    "instruction",
    "instructions",
    "method",
    "preparation",
    "procedure",
    "steps",
];

const NOTE_HEADERS: &[&str] = &["note", "notes", "tip", "tips"];

// Sorted; looked up with binary search.
const COOKING_VERBS: &[&str] = &[
    "add", "arrange", "bake", "baste", "beat", "blanch", "blend", "boil", "braise", "bring",
    "broil", "brown", "brush", "chill", "chop", "coat", "combine", "cook", "cool", "cover",
    "crack", "cream", "crush", "cut", "dice", "discard", "dissolve", "divide", "drain", "dredge",
    "drizzle", "dust", "fill", "flip", "fold", "fry", "garnish", "grate", "grease", "grill",
    "heat", "knead", "layer", "let", "line", "marinate", "mash", "measure", "melt", "mince",
    "mix", "peel", "place", "poach", "pour", "preheat", "press", "put", "reduce", "refrigerate",
    "remove", "rinse", "roast", "roll", "rub", "saute", "sauté", "scatter", "scoop", "sear",
    "season", "serve", "set", "shape", "shred", "sift", "simmer", "slice", "soak", "spoon",
    "spread", "sprinkle", "squeeze", "steam", "stir", "store", "strain", "stuff", "taste",
    "toast", "top", "toss", "transfer", "trim", "turn", "wash", "whip", "whisk", "wrap",
];

/// Section header kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Header {
    Ingredients,
    Instructions,
    Notes,
}

/// List marker a line starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Marker {
    Bullet,
    Numbered,
}

/// One input line with its signals precomputed.
#[derive(Debug, Clone)]
pub(crate) struct Line {
    /// Whitespace-collapsed original line.
    pub(crate) text: String,
    /// Line without its list marker.
    pub(crate) body: String,
    pub(crate) marker: Option<Marker>,
    pub(crate) header: Option<Header>,
    body_key: String,
}

impl Line {
    pub(crate) fn analyze(text: String) -> Self {
        let (marker, body) = strip_marker(&text);
        let header = if marker.is_none() {
            header_kind(&text)
        } else {
            None
        };
        let body_key = fold(&body);
        Self {
            text,
            body,
            marker,
            header,
            body_key,
        }
    }

    /// Starts with an amount: `2 eggs`, `200g flour`, `½ cup milk`,
    /// `a pinch of salt`.
    pub(crate) fn is_quantity_led(&self) -> bool {
        self.marker != Some(Marker::Numbered)
            && (QUANTITY.is_match(&self.body_key) || ARTICLE_UNIT.is_match(&self.body_key))
    }

    /// First word is a cooking verb.
    pub(crate) fn is_imperative(&self) -> bool {
        let first = self
            .body_key
            .split_whitespace()
            .next()
            .map(|word| word.trim_matches(|c: char| !c.is_alphabetic()))
            .unwrap_or_default();
        !first.is_empty() && COOKING_VERBS.binary_search(&first).is_ok()
    }

    pub(crate) fn word_count(&self) -> usize {
        self.body.split_whitespace().count()
    }

    /// Ends like a sentence.
    pub(crate) fn is_sentence(&self) -> bool {
        self.body.ends_with(['.', '!', '?'])
    }

    pub(crate) fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

fn fold(text: &str) -> String {
    text.nfkc().collect::<String>().to_lowercase()
}

fn strip_marker(text: &str) -> (Option<Marker>, String) {
    if let Some(found) = NUMBERED.find(text) {
        return (Some(Marker::Numbered), text[found.end()..].trim().to_string());
    }
    if let Some(found) = BULLET.find(text) {
        return (Some(Marker::Bullet), text[found.end()..].trim().to_string());
    }
    (None, text.to_string())
}

fn header_kind(text: &str) -> Option<Header> {
    let key = fold(text);
    let key = key
        .trim_start_matches(|c: char| matches!(c, '#' | '*' | '_' | '=') || c.is_whitespace())
        .trim_end_matches(|c: char| matches!(c, ':' | '*' | '_' | '-' | '=') || c.is_whitespace());
    let key = HEADER_PARENTHETICAL.replace(key, "");
    let key = key.trim_end_matches(':').trim();
    if INGREDIENT_HEADERS.contains(&key) {
        Some(Header::Ingredients)
    } else if INSTRUCTION_HEADERS.contains(&key) {
        Some(Header::Instructions)
    } else if NOTE_HEADERS.contains(&key) {
        Some(Header::Notes)
    } else {
        None
    }
}
