use tracing::*;

use crate::ocr::{OcrDocument, OcrEngine, OcrLine};

use super::fragment::Fragment;

/// Run the engine on a pdf and flatten its output into fragments.
///
/// OCR failures are logged and give an empty list; the rest of the
/// pipeline then produces empty exports instead of aborting.
pub fn extract_fragments(engine: &mut dyn OcrEngine, document: &[u8]) -> Vec<Fragment> {
    match engine.recognize(document) {
        Ok(ocr) => {
            if ocr.pages.is_empty() {
                warn!("ocr returned no pages");
            }
            flatten_document(&ocr)
        }
        Err(err) => {
            warn!("ocr failed, no fragment extracted: {}", err);
            Vec::new()
        }
    }
}

/// One fragment per OCR line, in page then line order.
pub fn flatten_document(document: &OcrDocument) -> Vec<Fragment> {
    let fragments = document
        .pages
        .iter()
        .enumerate()
        .flat_map(|(idx, page)| {
            page.blocks
                .iter()
                .flat_map(|block| block.lines.iter())
                .filter_map(move |line| fragment_from_line(idx + 1, line))
        })
        .collect::<Vec<_>>();

    debug!("extracted {} fragments", fragments.len());
    fragments
}

/// Top-left corner of the line and its words joined by single spaces, in the
/// order the engine recognized them.
fn fragment_from_line(page: usize, line: &OcrLine) -> Option<Fragment> {
    if line.words.is_empty() {
        return None;
    }

    let x = line
        .words
        .iter()
        .map(|word| word.geometry.min.x)
        .fold(f32::INFINITY, f32::min);
    let y = line
        .words
        .iter()
        .map(|word| word.geometry.min.y)
        .fold(f32::INFINITY, f32::min);
    let text = line
        .words
        .iter()
        .map(|word| word.value.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    Fragment::new(page, x, y, text).ok()
}

#[cfg(test)]
pub(crate) mod tests {
    use glam::Vec2;

    use super::*;
    use crate::{
        analysis::bbox::Bbox,
        error::PlancalError,
        ocr::{OcrBlock, OcrPage, OcrWord},
    };

    pub(crate) struct StubEngine {
        pub result: Option<OcrDocument>,
    }

    impl OcrEngine for StubEngine {
        fn recognize(&mut self, _document: &[u8]) -> Result<OcrDocument, PlancalError> {
            self.result.clone().ok_or(PlancalError::Config {
                message: "stub engine has no document".to_string(),
            })
        }
    }

    pub(crate) fn word(value: &str, x: f32, y: f32) -> OcrWord {
        OcrWord {
            value: value.to_string(),
            geometry: Bbox::new(Vec2::new(x, y), Vec2::new(x + 0.05, y + 0.02)),
        }
    }

    pub(crate) fn document(pages: Vec<Vec<Vec<OcrWord>>>) -> OcrDocument {
        OcrDocument {
            pages: pages
                .into_iter()
                .map(|lines| OcrPage {
                    blocks: vec![OcrBlock {
                        lines: lines.into_iter().map(|words| OcrLine { words }).collect(),
                    }],
                })
                .collect(),
        }
    }

    #[test]
    fn test_line_position_is_top_left_of_words() {
        let ocr = document(vec![vec![vec![
            word("09:00-12:00", 0.30, 0.42),
            word("Réunion", 0.12, 0.41),
            word("équipe", 0.45, 0.43),
        ]]]);

        let fragments = flatten_document(&ocr);
        assert_eq!(fragments.len(), 1);

        let fragment = &fragments[0];
        assert_eq!(fragment.page(), 1);
        assert_eq!(fragment.x(), 0.12);
        assert_eq!(fragment.y(), 0.41);
        // word order is the engine's, not re-sorted by x
        assert_eq!(fragment.text(), "09:00-12:00 Réunion équipe");
    }

    #[test]
    fn test_pages_are_numbered_from_one() {
        let ocr = document(vec![
            vec![vec![word("lun. 7", 0.1, 0.1)], vec![]],
            vec![vec![word("mar. 8", 0.1, 0.1)]],
        ]);

        let pages = flatten_document(&ocr)
            .iter()
            .map(Fragment::page)
            .collect::<Vec<_>>();
        assert_eq!(pages, vec![1, 2]);
    }

    #[test]
    fn test_engine_failure_gives_no_fragment() {
        let mut engine = StubEngine { result: None };
        assert!(extract_fragments(&mut engine, b"%PDF-").is_empty());

        let mut engine = StubEngine {
            result: Some(OcrDocument::default()),
        };
        assert!(extract_fragments(&mut engine, b"%PDF-").is_empty());
    }
}
