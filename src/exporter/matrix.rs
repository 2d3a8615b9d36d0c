// file: src/exporter/matrix.rs
// description: rewrites pipe-delimited matrices in answers as bmatrix blocks

use crate::extractor::patterns::MATRIX_BLOCK;
use regex::Captures;

/// Converts every run of `| a b |` lines into a `bmatrix` environment.
/// Text outside those runs is returned unchanged.
pub fn format_matrices(text: &str) -> String {
    MATRIX_BLOCK
        .replace_all(text, |caps: &Captures| to_bmatrix(&caps[0]))
        .into_owned()
}

fn to_bmatrix(block: &str) -> String {
    let rows: Vec<String> = block
        .lines()
        .map(|line| {
            line.trim()
                .trim_start_matches('|')
                .trim_end_matches('|')
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|element| !element.is_empty())
                .collect::<Vec<_>>()
                .join(" & ")
        })
        .collect();

    format!("\\begin{{bmatrix}}{}\\end{{bmatrix}}", rows.join(" \\\\ "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_two_by_two() {
        assert_eq!(
            format_matrices("| 1 2 |\n| 3 4 |"),
            "\\begin{bmatrix}1 & 2 \\\\ 3 & 4\\end{bmatrix}"
        );
    }

    #[test]
    fn test_surrounding_text_untouched() {
        let input = "Let A be:\n| 1 2 |\n| 3 4 |\nThen det(A) = -2.";
        assert_eq!(
            format_matrices(input),
            "Let A be:\n\\begin{bmatrix}1 & 2 \\\\ 3 & 4\\end{bmatrix}\nThen det(A) = -2."
        );
    }

    #[test]
    fn test_multiple_blocks() {
        let input = "A =\n| 1, 0 |\n| 0, 1 |\nand B =\n|5 6 7|";
        assert_eq!(
            format_matrices(input),
            "A =\n\\begin{bmatrix}1 & 0 \\\\ 0 & 1\\end{bmatrix}\nand B =\n\\begin{bmatrix}5 & 6 & 7\\end{bmatrix}"
        );
    }

    #[test]
    fn test_no_matrix_is_identity() {
        let input = "No matrices here, only |x| inline and a | b | c table.";
        assert_eq!(format_matrices(input), input);
        assert_eq!(format_matrices(""), "");
    }
}
