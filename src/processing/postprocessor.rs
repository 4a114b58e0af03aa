//! Classification Postprocessing - arg-max and top-k over class scores

use std::cmp::Ordering;

/// A scored class
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassScore {
    pub index: usize,
    pub score: f32,
}

impl std::fmt::Display for ClassScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Max is {} with index {}", self.score, self.index)
    }
}

/// Index and score of the highest class.
///
/// Uses a strict `>` scan, so the first of several equal maxima wins. NaN
/// scores never win. Returns `None` when there is no comparable score.
pub fn argmax(scores: &[f32]) -> Option<ClassScore> {
    let mut best: Option<ClassScore> = None;

    for (index, &score) in scores.iter().enumerate() {
        if score.is_nan() {
            continue;
        }
        match best {
            Some(b) if score > b.score => best = Some(ClassScore { index, score }),
            None => best = Some(ClassScore { index, score }),
            _ => {}
        }
    }

    best
}

/// The `k` highest scores, best first. Equal scores keep ascending index order.
pub fn top_k(scores: &[f32], k: usize) -> Vec<ClassScore> {
    let mut ranked: Vec<ClassScore> = scores
        .iter()
        .enumerate()
        .filter(|(_, s)| !s.is_nan())
        .map(|(index, &score)| ClassScore { index, score })
        .collect();

    // stable sort keeps index order among ties
    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    ranked.truncate(k);
    ranked
}

/// Prediction summary: the arg-max line, then a top-k table when `top > 1`.
///
/// Returns `None` when no score is comparable.
pub fn prediction_report(scores: &[f32], top: usize) -> Option<String> {
    let best = argmax(scores)?;
    let mut report = format!("{}\n", best);

    if top > 1 {
        report.push_str(&format!("Top {}:\n", top));
        for (rank, class) in top_k(scores, top).iter().enumerate() {
            report.push_str(&format!(
                "  #{:<2} index {:>4}  score {}\n",
                rank + 1,
                class.index,
                class.score
            ));
        }
    }

    Some(report)
}

/// Print the prediction summary.
pub fn print_prediction(scores: &[f32], top: usize) {
    match prediction_report(scores, top) {
        Some(report) => print!("{}", report),
        None => eprintln!("No valid class score in output"),
    }
}
