use unicode_bidi::{BidiInfo, LTR_LEVEL, Level, RTL_LEVEL};

/// Base direction hint for paragraph analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BaseDirection {
    /// Detect paragraph base direction from text (first strong char).
    #[default]
    Auto,
    /// Force overall left-to-right base direction.
    Ltr,
    /// Force overall right-to-left base direction.
    Rtl,
}

impl BaseDirection {
    pub fn to_level(self) -> Option<Level> {
        match self {
            BaseDirection::Auto => None,
            BaseDirection::Ltr => Some(LTR_LEVEL),
            BaseDirection::Rtl => Some(RTL_LEVEL),
        }
    }
}

/// Paragraph direction classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphDirection {
    Ltr,
    Rtl,
    /// Runs of both directions; the paragraph level gives the base.
    Mixed,
}

/// BiDi summary for a single paragraph (text without its newline).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParagraphBidi {
    /// Paragraph embedding level (UAX-9).
    pub level: u8,
    /// Direction derived from the resolved levels.
    pub direction: ParagraphDirection,
}

impl Default for ParagraphBidi {
    fn default() -> Self {
        Self {
            level: 0,
            direction: ParagraphDirection::Ltr,
        }
    }
}

impl ParagraphBidi {
    /// Analyze a single paragraph of text.
    pub fn analyze(text: &str, base_dir: BaseDirection) -> Self {
        let info = BidiInfo::new(text, base_dir.to_level());
        let Some(para) = info.paragraphs.first() else {
            let level = base_dir.to_level().unwrap_or(LTR_LEVEL);
            return Self {
                level: level.number(),
                direction: if level.is_rtl() {
                    ParagraphDirection::Rtl
                } else {
                    ParagraphDirection::Ltr
                },
            };
        };

        let levels = &info.levels[para.range.clone()];
        let has_rtl = levels.iter().any(|l| l.is_rtl());
        let has_ltr = levels.iter().any(|l| l.is_ltr());
        let direction = match (has_ltr, has_rtl) {
            (true, true) => ParagraphDirection::Mixed,
            (false, true) => ParagraphDirection::Rtl,
            _ if para.level.is_rtl() => ParagraphDirection::Rtl,
            _ => ParagraphDirection::Ltr,
        };

        Self {
            level: para.level.number(),
            direction,
        }
    }

    /// Whether the paragraph's base direction is right-to-left.
    pub fn is_rtl(&self) -> bool {
        self.level % 2 == 1
    }
}
