use crate::parser::open_input;
use crate::types::{Rank, TargetMode};
use anyhow::{Context, Result};
use std::io::BufRead;
use std::path::Path;

/// Lines starting with this marker are headers or comments.
pub const COMMENT_MARKER: char = '#';

/// Zygosity values marking a homozygous call.
pub const HOMOZYGOUS_MARKERS: [&str; 2] = ["1/1", "1|1"];

/// Length of the type prefix the ranking engine puts before chromosome names.
pub const RANKING_PREFIX_LEN: usize = 3;

/// Read the non-comment, non-blank lines of a tab-delimited file.
pub fn read_data_lines(path: &Path) -> Result<Vec<String>> {
    let reader = open_input(path)?;
    data_lines_from_reader(reader).with_context(|| format!("Failed to read {}", path.display()))
}

pub fn data_lines_from_reader<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim_end_matches(&['\r', '\n'][..]);
        if line.starts_with(COMMENT_MARKER) || line.trim().is_empty() {
            continue;
        }
        lines.push(line.to_string());
    }
    Ok(lines)
}

fn is_homozygous(line: &str) -> bool {
    line.rsplit('\t')
        .next()
        .map(str::trim)
        .is_some_and(|zygosity| HOMOZYGOUS_MARKERS.contains(&zygosity))
}

/// Pick the inserted variant line(s) from the tail of a patient file.
///
/// Dominant mode takes the last line. Recessive mode takes the last two,
/// unless the last one is homozygous. Empty input yields an empty slice.
pub fn select_target(lines: &[String], mode: TargetMode) -> &[String] {
    let take = match mode {
        TargetMode::Dominant => 1,
        TargetMode::Recessive => match lines.last() {
            Some(last) if is_homozygous(last) => 1,
            _ => 2,
        },
    };
    &lines[lines.len().saturating_sub(take)..]
}

/// Drop the ranking engine's type prefix from a chromosome token.
fn strip_ranking_prefix(chromosome: &str) -> &str {
    chromosome
        .char_indices()
        .nth(RANKING_PREFIX_LEN)
        .map(|(idx, _)| &chromosome[idx..])
        .unwrap_or("")
}

fn chromosome_and_locus(line: &str) -> Option<(&str, &str)> {
    let mut fields = line.split('\t');
    Some((fields.next()?, fields.next()?))
}

/// Does the ranking line sit at the same position as any target line?
pub fn is_match(target: &[String], ranking_line: &str) -> bool {
    let Some((ranked_chrom, ranked_locus)) = chromosome_and_locus(ranking_line) else {
        return false;
    };
    let ranked_chrom = strip_ranking_prefix(ranked_chrom);

    target.iter().any(|line| {
        chromosome_and_locus(line)
            .is_some_and(|(chrom, locus)| chrom == ranked_chrom && locus == ranked_locus)
    })
}

/// 1-based position of the first ranking line matching the target.
pub fn get_rank<S: AsRef<str>>(target: &[String], ranking: &[S]) -> Rank {
    ranking
        .iter()
        .position(|line| is_match(target, line.as_ref()))
        .map(|idx| Rank::Found(idx + 1))
        .unwrap_or(Rank::NotFound)
}
