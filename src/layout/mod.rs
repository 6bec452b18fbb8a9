//! Layout Clustering
//!
//! Groups raw text observations into semantic lines. Recognition engines
//! return fragments in no particular order and often split a single printed
//! line into several observations; this pass merges fragments that share a
//! vertical center and orders the result top-to-bottom.

use tracing::debug;

use crate::observation::{NormalizedRect, TextObservation};

/// A merged group of observations judged to be on the same printed line
#[derive(Debug, Clone, PartialEq)]
pub struct LineElement {
    /// Member texts joined left-to-right with single spaces
    pub text: String,
    /// Bounds of the tallest member (a proxy for font size)
    pub bounds: NormalizedRect,
    /// Arithmetic mean of member confidences
    pub confidence: f32,
}

/// Cluster observations into lines, ordered top-to-bottom.
///
/// Greedy single-pass grouping: observations are visited in descending
/// vertical-center order (ties broken by input index, so the result is
/// deterministic) and each unclaimed observation seeds a line that absorbs
/// every other unclaimed observation within `vertical_tolerance` of it.
///
/// An empty input yields an empty output.
pub fn cluster_lines(observations: &[TextObservation], vertical_tolerance: f32) -> Vec<LineElement> {
    if observations.is_empty() {
        return Vec::new();
    }

    let mut order: Vec<usize> = (0..observations.len()).collect();
    order.sort_by(|&a, &b| {
        observations[b]
            .bounds
            .center_y()
            .partial_cmp(&observations[a].bounds.center_y())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });

    let mut claimed = vec![false; observations.len()];
    let mut lines = Vec::new();

    for &seed in &order {
        if claimed[seed] {
            continue;
        }
        claimed[seed] = true;

        let seed_center = observations[seed].bounds.center_y();
        let mut members = vec![seed];

        for &other in &order {
            if claimed[other] {
                continue;
            }
            let delta = (observations[other].bounds.center_y() - seed_center).abs();
            if delta < vertical_tolerance {
                claimed[other] = true;
                members.push(other);
            }
        }

        // Left-to-right reading order within the line
        members.sort_by(|&a, &b| {
            observations[a]
                .bounds
                .x
                .partial_cmp(&observations[b].bounds.x)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.cmp(&b))
        });

        let text = members
            .iter()
            .map(|&i| observations[i].text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        let tallest = members
            .iter()
            .copied()
            .max_by(|&a, &b| {
                observations[a]
                    .bounds
                    .height
                    .partial_cmp(&observations[b].bounds.height)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(seed);

        let confidence =
            members.iter().map(|&i| observations[i].confidence).sum::<f32>() / members.len() as f32;

        lines.push(LineElement {
            text,
            bounds: observations[tallest].bounds,
            confidence,
        });
    }

    debug!(
        observations = observations.len(),
        lines = lines.len(),
        "clustered observations into lines"
    );

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(text: &str, x: f32, y: f32, h: f32, confidence: f32) -> TextObservation {
        TextObservation::new(text, confidence, NormalizedRect::new(x, y, 0.2, h))
    }

    #[test]
    fn test_empty_input() {
        let lines = cluster_lines(&[], 0.06);
        assert!(lines.is_empty());
    }

    #[test]
    fn test_single_line_merges() {
        // All observations within vertical tolerance of each other
        let observations = vec![
            obs("GREAT", 0.35, 0.70, 0.05, 0.9),
            obs("THE", 0.15, 0.71, 0.05, 0.8),
            obs("GATSBY", 0.55, 0.69, 0.06, 1.0),
        ];

        let lines = cluster_lines(&observations, 0.06);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "THE GREAT GATSBY");
        assert!((lines[0].confidence - 0.9).abs() < 0.001);
        // Bounds come from the tallest member
        assert!((lines[0].bounds.height - 0.06).abs() < 1e-6);
    }

    #[test]
    fn test_separate_lines_stay_separate() {
        let observations = vec![
            obs("AUTHOR NAME", 0.2, 0.40, 0.03, 0.9),
            obs("TITLE", 0.2, 0.70, 0.08, 0.9),
        ];

        let lines = cluster_lines(&observations, 0.06);
        assert_eq!(lines.len(), 2);
        // Top-to-bottom order
        assert_eq!(lines[0].text, "TITLE");
        assert_eq!(lines[1].text, "AUTHOR NAME");
    }

    #[test]
    fn test_deterministic_with_equal_centers() {
        let observations = vec![
            obs("B", 0.4, 0.5, 0.05, 0.9),
            obs("A", 0.1, 0.5, 0.05, 0.9),
        ];

        let first = cluster_lines(&observations, 0.06);
        let second = cluster_lines(&observations, 0.06);
        assert_eq!(first, second);
        assert_eq!(first[0].text, "A B");
    }
}
