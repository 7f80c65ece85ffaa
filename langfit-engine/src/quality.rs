//! Question quality scoring
//!
//! A question is worth asking when it splits the candidate set into a few
//! evenly sized groups while touching most, but not all, of the candidates.
//!
//! **Score bands:**
//! - Coverage: 0.60-0.90 → 3.0, above 0.90 → 2.0, 0.45-0.60 → 1.5, lower → 1.0
//! - Answer count: 3 → 3.0, 2 or 4 → 2.0, 5+ → 1.0
//! - Balance: 2.0 / (1 + variance / mean²) over per-answer language counts

/// Fraction of the candidate set mentioned by at least one answer
///
/// # Arguments
/// * `answer_languages` - Language ids per answer
/// * `candidate_count` - Size of the candidate set
pub fn coverage_ratio<S: AsRef<str>>(answer_languages: &[&[S]], candidate_count: usize) -> f64 {
    if candidate_count == 0 {
        return 0.0;
    }
    let mut covered: Vec<&str> = answer_languages
        .iter()
        .flat_map(|languages| languages.iter().map(|l| l.as_ref()))
        .collect();
    covered.sort_unstable();
    covered.dedup();
    covered.len() as f64 / candidate_count as f64
}

pub fn coverage_bonus(coverage: f64) -> f64 {
    if (0.6..=0.9).contains(&coverage) {
        3.0
    } else if coverage > 0.9 {
        2.0
    } else if coverage >= 0.45 {
        1.5
    } else {
        1.0
    }
}

pub fn answer_count_bonus(answer_count: usize) -> f64 {
    match answer_count {
        3 => 3.0,
        2 | 4 => 2.0,
        _ => 1.0,
    }
}

/// Even splits score 2.0; lopsided splits approach 0
pub fn balance_bonus(group_sizes: &[usize]) -> f64 {
    if group_sizes.is_empty() {
        return 0.0;
    }
    let n = group_sizes.len() as f64;
    let total: usize = group_sizes.iter().sum();
    let mean = total as f64 / n;
    if mean == 0.0 {
        return 0.0;
    }
    let variance = group_sizes
        .iter()
        .map(|&size| {
            let deviation = size as f64 - mean;
            deviation * deviation
        })
        .sum::<f64>()
        / n;
    2.0 / (1.0 + variance / (mean * mean))
}

/// Combined quality score of a materialized question
pub fn quality_score<S: AsRef<str>>(answer_languages: &[&[S]], candidate_count: usize) -> f64 {
    let coverage = coverage_ratio(answer_languages, candidate_count);
    let sizes: Vec<usize> = answer_languages
        .iter()
        .map(|languages| languages.len())
        .collect();
    coverage_bonus(coverage) + answer_count_bonus(answer_languages.len()) + balance_bonus(&sizes)
}
