// file: src/extractor/patterns.rs
// description: compiled regex patterns for question paper parsing
// reference: https://docs.rs/regex

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Three uppercase letters and three digits as a standalone token
    pub static ref SUBJECT_CODE: Regex = Regex::new(
        r"\b[A-Z]{3}[0-9]{3}\b"
    ).expect("SUBJECT_CODE regex is valid");

    // "Module – 1", "Module-2", "Module  – 10" (hyphen or en dash)
    pub static ref MODULE_HEADING: Regex = Regex::new(
        r"\bModule\s*[-\x{2013}]\s*[0-9]+"
    ).expect("MODULE_HEADING regex is valid");

    pub static ref SPACE_RUN: Regex = Regex::new(
        r" {2,}"
    ).expect("SPACE_RUN regex is valid");

    // Consecutive lines of the form "| a b c |" without inner pipes
    pub static ref MATRIX_BLOCK: Regex = Regex::new(
        r"(?m)^[ \t]*\|[^|\n]+\|[ \t\r]*(?:\n[ \t]*\|[^|\n]+\|[ \t\r]*)*$"
    ).expect("MATRIX_BLOCK regex is valid");
}
