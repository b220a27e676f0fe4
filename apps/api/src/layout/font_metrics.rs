//! Static font-metric tables for the serif family used by every résumé run.
//!
//! Widths are the Adobe core-font AFM advances for Times-Roman, Times-Bold and
//! Times-Italic, in thousandths of an em. These are the exact metrics a PDF
//! viewer uses for the standard Type1 fonts, so the wrap computed here is the
//! wrap the reader sees.
//!
//! All tables cover ASCII 0x20..=0x7E (95 printable characters).
//! Index = (char as usize) - 32.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::layout::error::LayoutError;

/// Bullet marker drawn in front of every bullet block.
pub const BULLET_GLYPH: &str = "\u{2022}";

// ────────────────────────────────────────────────────────────────────────────
// Font selection
// ────────────────────────────────────────────────────────────────────────────

/// Weight/style switched per run. There is no bold-italic face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    Normal,
    Bold,
    Italic,
}

/// A style at a size in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub style: FontStyle,
    pub size: f32,
}

impl Font {
    pub fn new(style: FontStyle, size: f32) -> Self {
        Self { style, size }
    }

    pub fn normal(size: f32) -> Self {
        Self::new(FontStyle::Normal, size)
    }

    pub fn bold(size: f32) -> Self {
        Self::new(FontStyle::Bold, size)
    }

    pub fn italic(size: f32) -> Self {
        Self::new(FontStyle::Italic, size)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Measurement provider
// ────────────────────────────────────────────────────────────────────────────

/// Text metrics consulted by every drawing primitive.
///
/// The provider is the single source of truth for both wrapping and the height
/// estimates handed to the page cursor, so the two can never disagree.
pub trait MeasurementProvider {
    /// Rendered width of `text` in points.
    fn measure_width(&self, text: &str, font: Font) -> Result<f32, LayoutError>;

    /// Greedy word-wrap of `text` into lines no wider than `max_width`.
    ///
    /// A word joins the current line only if the measured width of the joined
    /// line still fits. A word that is wider than `max_width` on its own is
    /// placed alone on its line, unsplit. Whitespace-only input yields no lines.
    fn wrap_to_lines(
        &self,
        text: &str,
        font: Font,
        max_width: f32,
    ) -> Result<Vec<String>, LayoutError> {
        let mut lines = Vec::new();
        let mut current = String::new();

        for word in text.split_whitespace() {
            if current.is_empty() {
                let word_width = self.measure_width(word, font)?;
                if word_width > max_width {
                    debug!(word, word_width, max_width, "word wider than line, placing alone");
                }
                current.push_str(word);
                continue;
            }

            let candidate = format!("{current} {word}");
            if self.measure_width(&candidate, font)? > max_width {
                lines.push(std::mem::take(&mut current));
                let word_width = self.measure_width(word, font)?;
                if word_width > max_width {
                    debug!(word, word_width, max_width, "word wider than line, placing alone");
                }
                current.push_str(word);
            } else {
                current = candidate;
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
        Ok(lines)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static character-width table for one face.
///
/// `widths[i]` = advance of ASCII character `(i + 32)` in 1/1000 em.
///
/// Width array slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
///
/// `latin1[i]` = advance of U+00A0 + i, the upper half of WinAnsi.
pub struct FontMetricTable {
    widths: [u16; 95],
    latin1: [u16; 96],
    /// Fallback for code points outside Latin-1 and the punctuation table.
    pub average_char_width: u16,
}

impl FontMetricTable {
    /// Advance of a single character in 1/1000 em.
    pub fn char_units(&self, c: char) -> u16 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            return self.widths[code - 32];
        }
        if (0xA0..=0xFF).contains(&code) {
            return self.latin1[code - 0xA0];
        }
        match c {
            '\u{2022}' => 350,
            '\u{2013}' => 500,
            '\u{2014}' | '\u{2026}' => 1000,
            '\u{2018}' | '\u{2019}' => 333,
            '\u{201C}' | '\u{201D}' => 444,
            _ => self.average_char_width,
        }
    }

    /// Total advance of a string in 1/1000 em.
    ///
    /// Integer units keep the sum exact, so a prefix of a line never measures
    /// wider than the line itself.
    pub fn measure_units(&self, s: &str) -> u32 {
        s.chars().map(|c| u32::from(self.char_units(c))).sum()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables (ASCII printable + Latin-1 upper half)
// ────────────────────────────────────────────────────────────────────────────

static TIMES_ROMAN_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
        // 0    1    2    3    4    5    6    7    8    9
        500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
        // :    ;    <    =    >    ?    @
        278, 278, 564, 564, 564, 444, 921,
        // A    B    C    D    E    F    G    H    I    J    K    L    M
        722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889,
        // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
        722, 722, 556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611,
        // [    \    ]    ^    _    `
        333, 278, 333, 469, 500, 333,
        // a    b    c    d    e    f    g    h    i    j    k    l    m
        444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778,
        // n    o    p    q    r    s    t    u    v    w    x    y    z
        500, 500, 500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444,
        // {    |    }    ~
        480, 200, 480, 541,
    ],
    #[rustfmt::skip]
    latin1: [
        // nbsp ¡    ¢    £    ¤    ¥    ¦    §    ¨    ©    ª    «    ¬    shy  ®    ¯
        250, 333, 500, 500, 500, 500, 200, 500, 333, 760, 276, 500, 564, 333, 760, 333,
        // °    ±    ²    ³    ´    µ    ¶    ·    ¸    ¹    º    »    ¼    ½    ¾    ¿
        400, 564, 300, 300, 333, 500, 453, 250, 333, 300, 310, 500, 750, 750, 750, 444,
        // À    Á    Â    Ã    Ä    Å    Æ    Ç    È    É    Ê    Ë    Ì    Í    Î    Ï
        722, 722, 722, 722, 722, 722, 889, 667, 611, 611, 611, 611, 333, 333, 333, 333,
        // Ð    Ñ    Ò    Ó    Ô    Õ    Ö    ×    Ø    Ù    Ú    Û    Ü    Ý    Þ    ß
        722, 722, 722, 722, 722, 722, 722, 564, 722, 722, 722, 722, 722, 722, 556, 500,
        // à    á    â    ã    ä    å    æ    ç    è    é    ê    ë    ì    í    î    ï
        444, 444, 444, 444, 444, 444, 667, 444, 444, 444, 444, 444, 278, 278, 278, 278,
        // ð    ñ    ò    ó    ô    õ    ö    ÷    ø    ù    ú    û    ü    ý    þ    ÿ
        500, 500, 500, 500, 500, 500, 500, 564, 500, 500, 500, 500, 500, 500, 500, 500,
    ],
    average_char_width: 480,
};

static TIMES_BOLD_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp   !    "    #    $    %     &    '    (    )    *    +    ,    -    .    /
        250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
        // 0    1    2    3    4    5    6    7    8    9
        500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
        // :    ;    <    =    >    ?    @
        333, 333, 570, 570, 570, 500, 930,
        // A    B    C    D    E    F    G    H    I    J    K    L    M
        722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944,
        // N    O    P    Q    R    S    T    U    V    W     X    Y    Z
        722, 778, 611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667,
        // [    \    ]    ^    _    `
        333, 278, 333, 581, 500, 333,
        // a    b    c    d    e    f    g    h    i    j    k    l    m
        500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833,
        // n    o    p    q    r    s    t    u    v    w    x    y    z
        556, 500, 556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444,
        // {    |    }    ~
        394, 220, 394, 520,
    ],
    #[rustfmt::skip]
    latin1: [
        // nbsp ¡    ¢    £    ¤    ¥    ¦    §    ¨    ©    ª    «    ¬    shy  ®    ¯
        250, 333, 500, 500, 500, 500, 220, 500, 333, 747, 300, 500, 570, 333, 747, 333,
        // °    ±    ²    ³    ´    µ    ¶    ·    ¸    ¹    º    »    ¼    ½    ¾    ¿
        400, 570, 300, 300, 333, 556, 540, 250, 333, 300, 330, 500, 750, 750, 750, 500,
        // À    Á    Â    Ã    Ä    Å    Æ     Ç    È    É    Ê    Ë    Ì    Í    Î    Ï
        722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 389, 389, 389, 389,
        // Ð    Ñ    Ò    Ó    Ô    Õ    Ö    ×    Ø    Ù    Ú    Û    Ü    Ý    Þ    ß
        722, 722, 778, 778, 778, 778, 778, 570, 778, 722, 722, 722, 722, 722, 611, 556,
        // à    á    â    ã    ä    å    æ    ç    è    é    ê    ë    ì    í    î    ï
        500, 500, 500, 500, 500, 500, 722, 444, 444, 444, 444, 444, 278, 278, 278, 278,
        // ð    ñ    ò    ó    ô    õ    ö    ÷    ø    ù    ú    û    ü    ý    þ    ÿ
        500, 556, 500, 500, 500, 500, 500, 570, 500, 556, 556, 556, 556, 500, 556, 500,
    ],
    average_char_width: 500,
};

static TIMES_ITALIC_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        250, 333, 420, 500, 500, 833, 778, 214, 333, 333, 500, 675, 250, 333, 250, 278,
        // 0    1    2    3    4    5    6    7    8    9
        500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
        // :    ;    <    =    >    ?    @
        333, 333, 675, 675, 675, 500, 920,
        // A    B    C    D    E    F    G    H    I    J    K    L    M
        611, 611, 667, 722, 611, 611, 722, 722, 333, 444, 667, 556, 833,
        // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
        667, 722, 611, 722, 611, 500, 556, 722, 611, 833, 611, 556, 556,
        // [    \    ]    ^    _    `
        389, 278, 389, 422, 500, 333,
        // a    b    c    d    e    f    g    h    i    j    k    l    m
        500, 500, 444, 500, 444, 278, 500, 500, 278, 278, 444, 278, 722,
        // n    o    p    q    r    s    t    u    v    w    x    y    z
        500, 500, 500, 500, 389, 389, 278, 500, 444, 667, 444, 444, 389,
        // {    |    }    ~
        400, 275, 400, 541,
    ],
    #[rustfmt::skip]
    latin1: [
        // nbsp ¡    ¢    £    ¤    ¥    ¦    §    ¨    ©    ª    «    ¬    shy  ®    ¯
        250, 389, 500, 500, 500, 500, 275, 500, 333, 760, 276, 500, 675, 333, 760, 333,
        // °    ±    ²    ³    ´    µ    ¶    ·    ¸    ¹    º    »    ¼    ½    ¾    ¿
        400, 675, 300, 300, 333, 500, 523, 250, 333, 300, 310, 500, 750, 750, 750, 500,
        // À    Á    Â    Ã    Ä    Å    Æ    Ç    È    É    Ê    Ë    Ì    Í    Î    Ï
        611, 611, 611, 611, 611, 611, 889, 667, 611, 611, 611, 611, 333, 333, 333, 333,
        // Ð    Ñ    Ò    Ó    Ô    Õ    Ö    ×    Ø    Ù    Ú    Û    Ü    Ý    Þ    ß
        722, 667, 722, 722, 722, 722, 722, 675, 722, 722, 722, 722, 722, 556, 611, 500,
        // à    á    â    ã    ä    å    æ    ç    è    é    ê    ë    ì    í    î    ï
        500, 500, 500, 500, 500, 500, 667, 444, 444, 444, 444, 444, 278, 278, 278, 278,
        // ð    ñ    ò    ó    ô    õ    ö    ÷    ø    ù    ú    û    ü    ý    þ    ÿ
        500, 500, 500, 500, 500, 500, 500, 675, 500, 500, 500, 500, 500, 444, 500, 444,
    ],
    average_char_width: 470,
};

/// Returns the static metric table for a given style.
pub fn get_metrics(style: FontStyle) -> &'static FontMetricTable {
    match style {
        FontStyle::Normal => &TIMES_ROMAN_TABLE,
        FontStyle::Bold => &TIMES_BOLD_TABLE,
        FontStyle::Italic => &TIMES_ITALIC_TABLE,
    }
}

/// Measurement provider backed by the static Times tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticMetrics;

impl MeasurementProvider for StaticMetrics {
    fn measure_width(&self, text: &str, font: Font) -> Result<f32, LayoutError> {
        if !font.size.is_finite() || font.size <= 0.0 {
            return Err(LayoutError::Metrics(format!(
                "invalid font size {} for {:?}",
                font.size, font.style
            )));
        }
        let units = get_metrics(font.style).measure_units(text);
        Ok(units as f32 * font.size / 1000.0)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const BULLET_TEXT: &str = "Architected a distributed caching layer using Redis and consistent \
        hashing, reducing p99 latency by 40% under 50k RPS peak load across three regions";

    fn body() -> Font {
        Font::normal(11.0)
    }

    #[test]
    fn test_measure_empty_returns_zero() {
        assert_eq!(StaticMetrics.measure_width("", body()).unwrap(), 0.0);
    }

    #[test]
    fn test_measure_ascii_characters() {
        // "Rust" = R(667) + u(500) + s(389) + t(278) = 1834 units → 20.174pt at 11pt
        let width = StaticMetrics.measure_width("Rust", body()).unwrap();
        assert!((width - 20.174).abs() < 1e-3, "got {width}");
    }

    #[test]
    fn test_bold_wider_than_normal() {
        let normal = StaticMetrics.measure_width("Engineer", Font::normal(11.0)).unwrap();
        let bold = StaticMetrics.measure_width("Engineer", Font::bold(11.0)).unwrap();
        assert!(bold > normal, "bold {bold} should exceed normal {normal}");
    }

    #[test]
    fn test_latin1_uses_afm_widths() {
        let roman = get_metrics(FontStyle::Normal);
        assert_eq!(roman.char_units('é'), 444);
        assert_eq!(roman.char_units('ü'), 500);
        assert_eq!(roman.char_units('\u{00A0}'), 250);
        assert_eq!(get_metrics(FontStyle::Bold).char_units('Æ'), 1000);
        assert_eq!(get_metrics(FontStyle::Italic).char_units('ÿ'), 444);

        // "Zürich" = Z(611) + ü(500) + r(333) + i(278) + c(444) + h(500) = 2666
        let width = StaticMetrics.measure_width("Zürich", Font::normal(10.0)).unwrap();
        assert!((width - 26.66).abs() < 1e-3, "got {width}");
    }

    #[test]
    fn test_outside_latin1_falls_back_to_average() {
        let table = get_metrics(FontStyle::Normal);
        assert_eq!(table.char_units('Ł'), table.average_char_width);
        assert_eq!(table.char_units('\u{2022}'), 350);
    }

    #[test]
    fn test_invalid_font_size_is_metrics_error() {
        for size in [0.0, -4.0, f32::NAN, f32::INFINITY] {
            let err = StaticMetrics.measure_width("x", Font::normal(size)).unwrap_err();
            assert!(matches!(err, LayoutError::Metrics(_)), "size {size}");
        }
    }

    #[test]
    fn test_wrap_empty_text_has_no_lines() {
        let lines = StaticMetrics.wrap_to_lines("   ", body(), 100.0).unwrap();
        assert!(lines.is_empty());
    }

    #[test]
    fn test_wrap_lines_fit_width() {
        let lines = StaticMetrics.wrap_to_lines(BULLET_TEXT, body(), 200.0).unwrap();
        assert!(lines.len() > 1, "expected wrapping, got {lines:?}");
        for line in &lines {
            let w = StaticMetrics.measure_width(line, body()).unwrap();
            assert!(w <= 200.0, "line {line:?} measures {w}");
        }
    }

    #[test]
    fn test_wrap_preserves_word_sequence() {
        let lines = StaticMetrics.wrap_to_lines(BULLET_TEXT, body(), 150.0).unwrap();
        let rejoined = lines.join(" ");
        let expected: Vec<&str> = BULLET_TEXT.split_whitespace().collect();
        let actual: Vec<&str> = rejoined.split_whitespace().collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_wrap_is_idempotent() {
        for width in [60.0, 120.0, 250.0, 540.0] {
            let lines = StaticMetrics.wrap_to_lines(BULLET_TEXT, body(), width).unwrap();
            for line in &lines {
                let rewrapped = StaticMetrics.wrap_to_lines(line, body(), width).unwrap();
                assert_eq!(rewrapped, vec![line.clone()], "width {width}");
            }
        }
    }

    #[test]
    fn test_wrap_overlong_word_sits_alone_unsplit() {
        let text = "a Supercalifragilisticexpialidocious b";
        let lines = StaticMetrics.wrap_to_lines(text, body(), 40.0).unwrap();
        assert_eq!(lines, vec!["a", "Supercalifragilisticexpialidocious", "b"]);
    }

    #[test]
    fn test_wrap_is_deterministic() {
        let a = StaticMetrics.wrap_to_lines(BULLET_TEXT, body(), 180.0).unwrap();
        let b = StaticMetrics.wrap_to_lines(BULLET_TEXT, body(), 180.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_wrap_propagates_metrics_failure() {
        let err = StaticMetrics
            .wrap_to_lines("one two", Font::bold(0.0), 100.0)
            .unwrap_err();
        assert!(matches!(err, LayoutError::Metrics(_)));
    }
}
