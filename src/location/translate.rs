//! Japanese display names for Vietnamese addresses.

use lazy_static::lazy_static;

use crate::analysis::TextNormalizer;
use crate::analysis::char_filter::mapping::MappingCharFilter;
use crate::analysis::char_filter::pattern_replace::PatternReplaceCharFilter;
use crate::analysis::char_filter::whitespace::WhitespaceCollapseCharFilter;

/// Shown when nothing better is known about the user's position.
pub const CURRENT_LOCATION: &str = "現在地";

const PLACE_NAMES: &[(&str, &str)] = &[
    // Cities
    ("Hanoi", "ハノイ"),
    ("Ha Noi", "ハノイ"),
    ("Hà Nội", "ハノイ"),
    ("Ho Chi Minh City", "ホーチミン"),
    ("Ho Chi Minh", "ホーチミン"),
    ("Da Nang", "ダナン"),
    ("Đà Nẵng", "ダナン"),
    ("Hai Phong", "ハイフォン"),
    ("Can Tho", "カントー"),
    ("Nha Trang", "ニャチャン"),
    ("Hue", "フエ"),
    ("Vung Tau", "ブンタウ"),
    ("Da Lat", "ダラット"),
    // Hanoi districts
    ("Hoan Kiem", "ホアンキエム区"),
    ("Hoàn Kiếm", "ホアンキエム区"),
    ("Ba Dinh", "バーディン区"),
    ("Ba Đình", "バーディン区"),
    ("Dong Da", "ドンダー区"),
    ("Đống Đa", "ドンダー区"),
    ("Hai Ba Trung", "ハイバーチュン区"),
    ("Hai Bà Trưng", "ハイバーチュン区"),
    ("Tay Ho", "タイホー区"),
    ("Tây Hồ", "タイホー区"),
    ("Cau Giay", "カウザイ区"),
    ("Cầu Giấy", "カウザイ区"),
    ("Thanh Xuan", "タインスアン区"),
    ("Thanh Xuân", "タインスアン区"),
    ("Long Bien", "ロンビエン区"),
    ("Long Biên", "ロンビエン区"),
    ("Ha Dong", "ハードン区"),
    ("Hà Đông", "ハードン区"),
    ("Nam Tu Liem", "ナムトゥリエム区"),
    ("Nam Từ Liêm", "ナムトゥリエム区"),
    ("Bac Tu Liem", "バックトゥリエム区"),
    ("Bắc Từ Liêm", "バックトゥリエム区"),
    ("Hoang Mai", "ホアンマイ区"),
    ("Hoàng Mai", "ホアンマイ区"),
    // Ho Chi Minh City districts
    ("District 1", "1区"),
    ("Quan 1", "1区"),
    ("Quận 1", "1区"),
    ("District 2", "2区"),
    ("District 3", "3区"),
    ("District 4", "4区"),
    ("District 5", "5区"),
    ("District 7", "7区"),
    ("District 10", "10区"),
    ("Binh Thanh", "ビンタン区"),
    ("Bình Thạnh", "ビンタン区"),
    ("Phu Nhuan", "フーニュアン区"),
    ("Phú Nhuận", "フーニュアン区"),
    ("Tan Binh", "タンビン区"),
    ("Tân Bình", "タンビン区"),
    ("Go Vap", "ゴーヴァップ区"),
    ("Gò Vấp", "ゴーヴァップ区"),
    ("Thu Duc", "トゥードゥック区"),
    ("Thủ Đức", "トゥードゥック区"),
    // Street vocabulary
    ("Ward", "坊"),
    ("Phuong", "坊"),
    ("Phường", "坊"),
    ("Street", "通り"),
    ("Road", "通り"),
    ("Duong", "通り"),
    ("Đường", "通り"),
    ("Pho", "通り"),
    ("Phố", "通り"),
    ("Avenue", "大通り"),
    ("Boulevard", "大通り"),
    ("National Highway", "国道"),
    ("Highway", "国道"),
    ("Lane", "路地"),
    ("Alley", "路地"),
    ("Vietnam", "ベトナム"),
    ("Viet Nam", "ベトナム"),
    ("Chu Van An", "チュー・ヴァン・アン"),
    ("Chu Văn An", "チュー・ヴァン・アン"),
];

lazy_static! {
    static ref TRANSLATOR: TextNormalizer = TextNormalizer::new()
        .with_filter(
            PatternReplaceCharFilter::new(r"(?i)(?:National\s+)?Highway\s+(\d+)", "国道${1}号")
                .expect("highway pattern is valid")
        )
        .with_filter(
            MappingCharFilter::new_case_insensitive(PLACE_NAMES.iter().copied())
                .expect("place name table builds")
        )
        .with_filter(PatternReplaceCharFilter::new(r",\s*,", ",").expect("comma pattern is valid"))
        .with_filter(WhitespaceCollapseCharFilter::new());
}

/// Replace known Vietnamese and English place words with Japanese.
///
/// Overlapping names resolve to the longest one. An empty result becomes
/// [`CURRENT_LOCATION`].
pub fn translate_location_to_japanese(text: &str) -> String {
    let translated = TRANSLATOR.normalize(text);
    if translated.is_empty() {
        CURRENT_LOCATION.to_string()
    } else {
        translated
    }
}
