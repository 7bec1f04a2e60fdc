//! Best/worst candidate tables from a finished search

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::search::CandidateScore;
use crate::Result;

/// Picks and renders the strongest and weakest configurations of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResultAnalyzer {
    result_count: usize,
}

impl Default for SearchResultAnalyzer {
    fn default() -> Self {
        Self { result_count: 10 }
    }
}

impl SearchResultAnalyzer {
    /// Show `result_count` rows per table.
    #[must_use]
    pub const fn new(result_count: usize) -> Self {
        Self { result_count }
    }

    fn ranked<'a>(candidates: &'a [CandidateScore]) -> Vec<&'a CandidateScore> {
        let mut ranked: Vec<&CandidateScore> = candidates.iter().collect();
        // stable: equal scores keep evaluation order
        ranked.sort_by(|a, b| b.mean_test_score.total_cmp(&a.mean_test_score));
        ranked
    }

    /// Top candidates by mean score, best first.
    #[must_use]
    pub fn best_params<'a>(&self, candidates: &'a [CandidateScore]) -> Vec<&'a CandidateScore> {
        let mut ranked = Self::ranked(candidates);
        ranked.truncate(self.result_count);
        ranked
    }

    /// Bottom candidates, still ordered best first.
    #[must_use]
    pub fn bad_params<'a>(&self, candidates: &'a [CandidateScore]) -> Vec<&'a CandidateScore> {
        let ranked = Self::ranked(candidates);
        let skip = ranked.len().saturating_sub(self.result_count);
        ranked.into_iter().skip(skip).collect()
    }

    /// psql-style table of `mean_test_score | std_test_score | params`.
    #[must_use]
    pub fn render_table(rows: &[&CandidateScore]) -> String {
        let headers = ["mean_test_score", "std_test_score", "params"];
        let cells: Vec<[String; 3]> = rows
            .iter()
            .map(|c| {
                [
                    format!("{:.6}", c.mean_test_score),
                    format!("{:.6}", c.std_test_score),
                    c.params.to_string(),
                ]
            })
            .collect();

        let mut widths = headers.map(str::len);
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let dashes: Vec<String> = widths.iter().map(|w| "-".repeat(w + 2)).collect();
        let border = format!("+{}+", dashes.join("+"));
        let separator = format!("|{}|", dashes.join("+"));
        let line = |row: [&str; 3]| {
            let parts: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(cell, &w)| format!(" {cell:<w$} "))
                .collect();
            format!("|{}|", parts.join("|"))
        };

        let mut lines = vec![border.clone(), line(headers), separator];
        lines.extend(
            cells
                .iter()
                .map(|row| line([row[0].as_str(), row[1].as_str(), row[2].as_str()])),
        );
        lines.push(border);

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    /// Write the candidate table as JSON into a new `%d_%m_%y_%H_%M_%S`
    /// sub-directory of `output_dir`. Returns the file path.
    ///
    /// # Errors
    ///
    /// IO or JSON errors.
    pub fn save_candidates(output_dir: &Path, candidates: &[CandidateScore]) -> Result<PathBuf> {
        let stamp = Local::now().format("%d_%m_%y_%H_%M_%S").to_string();
        let dir = output_dir.join(stamp);
        fs::create_dir_all(&dir)?;

        let path = dir.join("candidates.json");
        fs::write(&path, serde_json::to_vec_pretty(candidates)?)?;
        tracing::debug!(path = %path.display(), rows = candidates.len(), "saved candidate table");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamSet;

    fn candidates() -> Vec<CandidateScore> {
        [0.6, 0.9, 0.75, 0.8]
            .iter()
            .enumerate()
            .map(|(i, &mean)| CandidateScore {
                params: ParamSet::new().with("k", i64::try_from(i).unwrap()),
                fold_scores: vec![mean],
                mean_test_score: mean,
                std_test_score: 0.01,
                rank_test_score: 0,
            })
            .collect()
    }

    #[test]
    fn test_best_and_bad_params() {
        let all = candidates();
        let analyzer = SearchResultAnalyzer::new(2);

        let best: Vec<f64> = analyzer.best_params(&all).iter().map(|c| c.mean_test_score).collect();
        assert_eq!(best, vec![0.9, 0.8]);

        let bad: Vec<f64> = analyzer.bad_params(&all).iter().map(|c| c.mean_test_score).collect();
        assert_eq!(bad, vec![0.75, 0.6]);

        assert_eq!(SearchResultAnalyzer::default().best_params(&all).len(), 4);
    }

    #[test]
    fn test_render_table() {
        let all = candidates();
        let rows = SearchResultAnalyzer::new(1).best_params(&all);
        let table = SearchResultAnalyzer::render_table(&rows);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 5);
        assert!(lines[1].contains("mean_test_score"));
        assert!(lines[3].contains("0.900000"));
        assert!(lines[3].contains("{'k': 1}"));
        assert!(lines.iter().all(|l| l.len() == lines[0].len()));
        assert!(table.ends_with("+\n"));
        assert_eq!(lines[0], lines[4]);
    }

    #[test]
    fn test_render_empty_table() {
        let table = SearchResultAnalyzer::render_table(&[]);
        assert_eq!(table.lines().count(), 4);
        assert!(table.lines().nth(1).unwrap().starts_with("| mean_test_score "));
    }

    #[test]
    fn test_save_candidates() {
        let dir = tempfile::tempdir().unwrap();
        let path = SearchResultAnalyzer::save_candidates(dir.path(), &candidates()).unwrap();
        let saved: Vec<CandidateScore> =
            serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap();
        assert_eq!(saved, candidates());
    }
}
