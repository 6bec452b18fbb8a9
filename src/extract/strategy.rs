//! Extraction strategies
//!
//! Three independent, side-effect-free ways of reading a title (and maybe
//! an author) off a cover. Each strategy contributes at most one candidate;
//! the extractor merges and ranks them.

use tracing::debug;

use super::names::is_probable_author_name;
use super::Candidate;
use crate::config::ExtractConfig;
use crate::layout::LineElement;

/// Closed set of extraction strategies, invoked uniformly by the extractor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Tallest non-author line is the title; look below it for an author
    LargestTitle,
    /// Explicit "by ..." line or "<title> by <author>" split
    ByLinePattern,
    /// Multi-line title joined from similarly-sized lines near the top
    CombinedTitle,
}

impl Strategy {
    /// All strategies in contribution order
    pub const ALL: [Strategy; 3] = [
        Strategy::LargestTitle,
        Strategy::ByLinePattern,
        Strategy::CombinedTitle,
    ];

    /// Run this strategy over top-to-bottom ordered, noise-filtered lines
    pub fn extract(self, lines: &[LineElement], config: &ExtractConfig) -> Option<Candidate> {
        let candidate = match self {
            Strategy::LargestTitle => largest_title(lines, config),
            Strategy::ByLinePattern => by_line_pattern(lines),
            Strategy::CombinedTitle => combined_title(lines, config),
        };
        if let Some(ref c) = candidate {
            debug!(strategy = ?self, title = %c.title, confidence = c.confidence, "strategy produced candidate");
        }
        candidate
    }
}

fn tallest<'a, I>(lines: I) -> Option<&'a LineElement>
where
    I: IntoIterator<Item = &'a LineElement>,
{
    lines.into_iter().max_by(|a, b| {
        a.bounds
            .height
            .partial_cmp(&b.bounds.height)
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}

fn strip_by_prefix(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    match trimmed.get(..3) {
        Some(prefix) if prefix.eq_ignore_ascii_case("by ") => Some(trimmed[3..].trim()),
        _ => None,
    }
}

/// Tallest line not shaped like a name becomes the title. The author is the
/// largest smaller line beneath it inside the author band, preferring an
/// explicit "by " prefix over a bare name.
fn largest_title(lines: &[LineElement], config: &ExtractConfig) -> Option<Candidate> {
    let title = tallest(lines.iter().filter(|l| !is_probable_author_name(&l.text)))?;

    let below: Vec<&LineElement> = lines
        .iter()
        .filter(|l| {
            let cy = l.bounds.center_y();
            title.bounds.center_y() - cy >= config.author_gap
                && l.bounds.height < title.bounds.height
                && cy >= config.author_band_min
                && cy <= config.author_band_max
        })
        .collect();

    let author = tallest(
        below
            .iter()
            .copied()
            .filter(|l| strip_by_prefix(&l.text).is_some()),
    )
    .and_then(|l| {
        strip_by_prefix(&l.text)
            .filter(|a| !a.is_empty())
            .map(str::to_string)
    })
    .or_else(|| {
        tallest(
            below
                .iter()
                .copied()
                .filter(|l| is_probable_author_name(&l.text)),
        )
        .map(|l| l.text.trim().to_string())
    });

    let height = title.bounds.height;
    let mut confidence: f32 = 0.5;
    if height > 0.15 {
        confidence += 0.3;
    } else if height > 0.10 {
        confidence += 0.2;
    } else if height > 0.05 {
        confidence += 0.1;
    }
    if author.is_some() {
        confidence += 0.15;
    }
    confidence += 0.1;

    Some(Candidate {
        title: title.text.trim().to_string(),
        author,
        confidence: confidence.min(1.0),
    })
}

/// Look for an explicit "by" marker: either a line starting with "by " whose
/// predecessor is the title, or a single "<title> by <author>" line.
fn by_line_pattern(lines: &[LineElement]) -> Option<Candidate> {
    for (i, line) in lines.iter().enumerate() {
        if let Some(author) = strip_by_prefix(&line.text) {
            if i > 0 && !author.is_empty() {
                return Some(Candidate {
                    title: lines[i - 1].text.trim().to_string(),
                    author: Some(author.to_string()),
                    confidence: 0.90,
                });
            }
        }
    }

    for line in lines {
        let lower = line.text.to_lowercase();
        if let Some(pos) = lower.find(" by ") {
            let title = line.text[..pos].trim();
            let author = line.text[pos + 4..].trim();
            if !title.is_empty() && !author.is_empty() {
                return Some(Candidate {
                    title: title.to_string(),
                    author: Some(author.to_string()),
                    confidence: 0.90,
                });
            }
        }
    }

    None
}

/// Join similarly-sized non-author lines near the top of the cover into a
/// multi-line title.
fn combined_title(lines: &[LineElement], config: &ExtractConfig) -> Option<Candidate> {
    let top_band: Vec<&LineElement> = lines
        .iter()
        .filter(|l| {
            l.bounds.center_y() > config.title_band_min
                && l.bounds.height > config.min_title_line_height
                && !is_probable_author_name(&l.text)
        })
        .collect();

    if top_band.len() < 2 {
        return None;
    }

    let max_height = tallest(top_band.iter().copied())?.bounds.height;
    let members: Vec<&LineElement> = top_band
        .into_iter()
        .filter(|l| l.bounds.height >= config.combined_height_ratio * max_height)
        .collect();

    if members.len() < 2 {
        return None;
    }

    // Lines are already in vertical order; take at most three
    let title = members
        .iter()
        .take(3)
        .map(|l| l.text.trim())
        .collect::<Vec<_>>()
        .join(" ");

    let lower = title.to_lowercase();
    if config.combined_denylist.iter().any(|d| lower.contains(d.as_str())) {
        return None;
    }

    let member_texts: Vec<&str> = members.iter().map(|l| l.text.as_str()).collect();
    let names = || {
        lines
            .iter()
            .filter(|l| !member_texts.contains(&l.text.as_str()))
            .filter(|l| is_probable_author_name(&l.text))
    };
    let author = tallest(names().filter(|l| {
        let cy = l.bounds.center_y();
        cy >= config.author_band_min && cy <= config.author_band_max
    }))
    .or_else(|| tallest(names()))
    .map(|l| l.text.trim().to_string());

    Some(Candidate {
        title,
        author,
        confidence: 0.85,
    })
}
