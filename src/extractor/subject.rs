// file: src/extractor/subject.rs
// description: subject code extraction used to namespace cached answers

use crate::extractor::patterns::SUBJECT_CODE;
use crate::models::SubjectCode;

pub struct SubjectCodeExtractor;

impl SubjectCodeExtractor {
    pub fn new() -> Self {
        Self
    }

    /// First standalone `[A-Z]{3}[0-9]{3}` token anywhere in the text.
    pub fn extract(&self, text: &str) -> Option<SubjectCode> {
        SUBJECT_CODE
            .find(text)
            .map(|found| SubjectCode::new(found.as_str()))
    }
}

impl Default for SubjectCodeExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_leading_code() {
        let extractor = SubjectCodeExtractor::new();
        let code = extractor.extract("ABC123 Module – 1 Define a closure.");
        assert_eq!(code, Some(SubjectCode::new("ABC123")));
    }

    #[test]
    fn test_search_is_not_anchored() {
        let extractor = SubjectCodeExtractor::new();
        let code = extractor.extract("Fifth Semester Exam, Course Code: CSE301 (2021 scheme) EEE202");
        assert_eq!(code, Some(SubjectCode::new("CSE301")));
    }

    #[test]
    fn test_rejects_wrong_shapes() {
        let extractor = SubjectCodeExtractor::new();
        assert_eq!(extractor.extract("abc123"), None);
        assert_eq!(extractor.extract("AB1234"), None);
        assert_eq!(extractor.extract("ABCD123"), None);
        assert_eq!(extractor.extract("ABC1234"), None);
        assert_eq!(extractor.extract(""), None);
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let extractor = SubjectCodeExtractor::new();
        let text = "MAT101 and PHY102";
        assert_eq!(extractor.extract(text), extractor.extract(text));
    }
}
