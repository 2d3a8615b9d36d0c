// file: src/parser/segmenter.rs
// description: splits normalized question paper text into ordered modules
// reference: heading-delimited section splitting

use crate::extractor::patterns::MODULE_HEADING;
use crate::models::Module;
use tracing::debug;

pub struct ModuleSegmenter;

impl ModuleSegmenter {
    pub fn new() -> Self {
        Self
    }

    /// Returns the trimmed body of every module, in heading order.
    ///
    /// Text before the first heading is dropped. No heading means no modules,
    /// which is not an error.
    pub fn segment(&self, text: &str) -> Vec<String> {
        self.segment_modules(text)
            .into_iter()
            .map(|module| module.body)
            .collect()
    }

    pub fn segment_modules(&self, text: &str) -> Vec<Module> {
        let headings: Vec<_> = MODULE_HEADING.find_iter(text).collect();

        let modules: Vec<Module> = headings
            .iter()
            .enumerate()
            .map(|(position, heading)| {
                let body_end = headings
                    .get(position + 1)
                    .map(|next| next.start())
                    .unwrap_or(text.len());
                let body = text[heading.end()..body_end].trim();
                Module::new(position + 1, heading.as_str().trim(), body)
            })
            .collect();

        debug!("Segmented text into {} modules", modules.len());
        modules
    }
}

impl Default for ModuleSegmenter {
    fn default() -> Self {
        Self::new()
    }
}
