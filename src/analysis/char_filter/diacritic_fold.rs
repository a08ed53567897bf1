use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use super::CharFilter;

/// A char filter that removes diacritics.
///
/// The input is decomposed (NFKD), every combining mark except the kana
/// voicing marks is dropped, and the rest is recomposed (NFC). `đ`/`Đ`
/// have no decomposition and are mapped to `d`/`D` explicitly.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiacriticFoldingCharFilter;

impl DiacriticFoldingCharFilter {
    pub fn new() -> Self {
        DiacriticFoldingCharFilter
    }
}

/// Dakuten and handakuten; dropping them would turn "ド" into "ト".
fn is_kana_voicing_mark(c: char) -> bool {
    matches!(c, '\u{3099}' | '\u{309A}')
}

impl CharFilter for DiacriticFoldingCharFilter {
    fn filter(&self, input: &str) -> String {
        let stripped: String = input
            .nfkd()
            .filter_map(|c| match c {
                'đ' => Some('d'),
                'Đ' => Some('D'),
                c if is_combining_mark(c) && !is_kana_voicing_mark(c) => None,
                c => Some(c),
            })
            .collect();

        stripped.nfc().collect()
    }

    fn name(&self) -> &'static str {
        "diacritic_fold"
    }
}
