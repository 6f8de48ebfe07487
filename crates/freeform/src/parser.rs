use std::time::Instant;

use tracing::debug;

use crate::classify::{Header, Line, Marker};
use crate::config::ParserConfig;
use crate::lines::{split_lines, truncate_at_boundary};
use crate::result::{ParseMode, ParseResult};

const HEADER_SIGNAL: f64 = 0.3;
const MARKER_SIGNAL: f64 = 0.1;
const BOTH_LISTS_SIGNAL: f64 = 0.2;
const MINOR_SIGNAL: f64 = 0.05;

/// Parses pasted text with the default [`ParserConfig`].
///
/// ```
/// let result = freeform::parse("Ingredients:\n- 2 eggs\nInstructions:\n1. Whisk");
/// assert_eq!(result.ingredients, vec!["2 eggs"]);
/// assert_eq!(result.instructions, vec!["Whisk"]);
/// ```
pub fn parse(text: &str) -> ParseResult {
    parse_with_config(text, &ParserConfig::default())
}

/// Parses pasted text. Never fails: input that does not look like a recipe
/// yields empty lists and zero confidence.
pub fn parse_with_config(text: &str, config: &ParserConfig) -> ParseResult {
    let started = Instant::now();
    let input = truncate_at_boundary(text, config.max_input_bytes);
    let lines: Vec<Line> = split_lines(input).into_iter().map(Line::analyze).collect();

    let first_header = lines.iter().position(|line| {
        matches!(
            line.header,
            Some(Header::Ingredients | Header::Instructions)
        )
    });
    let title_at = find_title(&lines, config, first_header);

    let mut capture = Capture::default();
    let mode = match first_header {
        Some(_) => {
            split_by_headers(&lines, title_at, config, &mut capture);
            ParseMode::Headers
        }
        None => {
            for (index, line) in lines.iter().enumerate() {
                if Some(index) != title_at {
                    capture.push(classify(line, config), line);
                }
            }
            ParseMode::Markers
        }
    };

    let title = title_at.map(|index| lines[index].text.clone());
    let mut result = capture.finish(title, mode);
    if result.is_unclassified() {
        result.mode = ParseMode::None;
    }

    debug!(
        mode = %result.mode,
        confidence = result.confidence,
        ingredients = result.ingredients.len(),
        instructions = result.instructions.len(),
        prose = result.prose.len(),
        input_bytes = input.len(),
        elapsed_micros = started.elapsed().as_micros() as u64,
        "parse_complete"
    );
    result
}

/// Index of the first short leading line that is plain text. With headers
/// present only lines above the first header are considered; without them
/// a line led by a cooking verb is taken for a step, not a title.
fn find_title(lines: &[Line], config: &ParserConfig, first_header: Option<usize>) -> Option<usize> {
    let scan = first_header.map_or(config.title_scan_lines, |at| {
        at.min(config.title_scan_lines)
    });
    lines.iter().take(scan).position(|line| {
        line.marker.is_none()
            && line.header.is_none()
            && line.char_count() <= config.max_title_chars
            && !line.is_quantity_led()
            && !line.is_sentence()
            && (first_header.is_some() || !line.is_imperative())
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bucket {
    Ingredients,
    Instructions,
    Prose,
}

fn classify(line: &Line, config: &ParserConfig) -> Bucket {
    match line.marker {
        Some(Marker::Numbered) => Bucket::Instructions,
        Some(Marker::Bullet)
            if line.is_imperative() && line.word_count() >= config.bullet_step_min_words =>
        {
            Bucket::Instructions
        }
        Some(Marker::Bullet) => Bucket::Ingredients,
        None if line.is_quantity_led() => Bucket::Ingredients,
        None if line.is_imperative() => Bucket::Instructions,
        None => Bucket::Prose,
    }
}

fn split_by_headers(
    lines: &[Line],
    title_at: Option<usize>,
    config: &ParserConfig,
    capture: &mut Capture,
) {
    let has_ingredient_header = lines
        .iter()
        .any(|line| line.header == Some(Header::Ingredients));
    let mut section: Option<Header> = None;

    for (index, line) in lines.iter().enumerate() {
        if Some(index) == title_at {
            continue;
        }
        if let Some(header) = line.header {
            capture.headers.push(header);
            section = Some(header);
            continue;
        }
        let bucket = match section {
            None if has_ingredient_header => Bucket::Prose,
            None => classify(line, config),
            Some(Header::Notes) => Bucket::Prose,
            Some(Header::Instructions) => Bucket::Instructions,
            Some(Header::Ingredients) => {
                // Numbered lines following an unnumbered ingredient list
                // mean the instructions header was left out.
                let after_list = capture
                    .ingredient_markers
                    .last()
                    .is_some_and(|marker| *marker != Some(Marker::Numbered));
                if line.marker == Some(Marker::Numbered) && after_list {
                    section = Some(Header::Instructions);
                    Bucket::Instructions
                } else {
                    Bucket::Ingredients
                }
            }
        };
        capture.push(bucket, line);
    }
}

#[derive(Debug, Default)]
struct Capture {
    ingredients: Vec<String>,
    instructions: Vec<String>,
    prose: Vec<String>,
    ingredient_markers: Vec<Option<Marker>>,
    instruction_markers: Vec<Option<Marker>>,
    headers: Vec<Header>,
}

impl Capture {
    fn push(&mut self, bucket: Bucket, line: &Line) {
        match bucket {
            Bucket::Ingredients if !line.body.is_empty() => {
                self.ingredients.push(line.body.clone());
                self.ingredient_markers.push(line.marker);
            }
            Bucket::Instructions if !line.body.is_empty() => {
                self.instructions.push(line.body.clone());
                self.instruction_markers.push(line.marker);
            }
            Bucket::Ingredients | Bucket::Instructions => {}
            Bucket::Prose => self.prose.push(line.text.clone()),
        }
    }

    fn confidence(&self, has_title: bool, mode: ParseMode) -> f64 {
        if self.ingredients.is_empty() && self.instructions.is_empty() {
            return 0.0;
        }
        let mut score = 0.0;
        match mode {
            ParseMode::Headers => {
                if self.headers.contains(&Header::Ingredients) {
                    score += HEADER_SIGNAL;
                }
                if self.headers.contains(&Header::Instructions) {
                    score += HEADER_SIGNAL;
                }
            }
            ParseMode::Markers | ParseMode::None => {
                if !self.ingredients.is_empty() {
                    score += MARKER_SIGNAL;
                }
                if !self.instructions.is_empty() {
                    score += MARKER_SIGNAL;
                }
            }
        }
        if !self.ingredients.is_empty() && !self.instructions.is_empty() {
            score += BOTH_LISTS_SIGNAL;
        }
        if consistent(&self.ingredient_markers) {
            score += MINOR_SIGNAL;
        }
        if !self.instruction_markers.is_empty()
            && self
                .instruction_markers
                .iter()
                .all(|marker| *marker == Some(Marker::Numbered))
        {
            score += MINOR_SIGNAL;
        }
        if has_title {
            score += MINOR_SIGNAL;
        }
        (score.clamp(0.0, 1.0) * 100.0).round() / 100.0
    }

    fn finish(self, title: Option<String>, mode: ParseMode) -> ParseResult {
        let confidence = self.confidence(title.is_some(), mode);
        ParseResult {
            title,
            ingredients: self.ingredients,
            instructions: self.instructions,
            prose: self.prose,
            confidence,
            mode,
        }
    }
}

fn consistent(markers: &[Option<Marker>]) -> bool {
    match markers.first() {
        Some(Some(first)) => markers.iter().all(|marker| *marker == Some(*first)),
        _ => false,
    }
}
