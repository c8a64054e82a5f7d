//! The landing page as terminal blocks
//!
//! Blocks are laid out in terminal cells and reported to the observer in
//! pixels, one cell being [`CELL_WIDTH_PX`] x [`CELL_HEIGHT_PX`], so pixel
//! root margins like `-80px` keep roughly their on-screen meaning.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};
use unveil_core::config::{RevealConfig, StaggerConfig};
use unveil_core::geometry::Rect;
use unveil_core::{AnimationId, ElementId, RevealOptions, StaggerGroup};

pub const CELL_WIDTH_PX: f64 = 8.0;
pub const CELL_HEIGHT_PX: f64 = 16.0;

/// Columns kept free on each side of the content
const SIDE_PADDING: u16 = 2;
/// Element ids reserved per block; items use the ids after the block's own
const IDS_PER_BLOCK: u64 = 1000;

pub const MARQUEE_TEXTS: [&str; 5] = [
    "Memory First - \"Built to Remember\"",
    "All-Day Battery",
    "Software-First Architecture",
    "Designed to Stay Light",
    "#Built Smarter",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRole {
    HeroTitle,
    Tag,
    Title,
    Body,
    Item,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BlockContent {
    /// Fills the first screen; the intro overlay sits on top of it
    Hero,
    Marquee,
    Header {
        tag: &'static str,
        title: &'static str,
        desc: &'static str,
    },
    Items(Vec<&'static str>),
}

/// How a block is wired to the reveal engine
#[derive(Debug, Clone, PartialEq)]
pub enum BlockReveal {
    Static,
    Single(RevealOptions),
    Group {
        options: RevealOptions,
        stagger: StaggerGroup,
    },
    PerItem {
        options: RevealOptions,
        stagger: StaggerGroup,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub content: BlockContent,
    pub reveal: BlockReveal,
}

impl Block {
    fn header(tag: &'static str, title: &'static str, desc: &'static str, options: RevealOptions) -> Self {
        Self {
            content: BlockContent::Header { tag, title, desc },
            reveal: BlockReveal::Single(options),
        }
    }

    fn items(items: Vec<&'static str>, reveal: BlockReveal) -> Self {
        Self {
            content: BlockContent::Items(items),
            reveal,
        }
    }

    pub fn element(index: usize) -> ElementId {
        ElementId(index as u64 * IDS_PER_BLOCK)
    }

    pub fn item_element(index: usize, item: usize) -> ElementId {
        ElementId(index as u64 * IDS_PER_BLOCK + 1 + item as u64)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub blocks: Vec<Block>,
}

impl Page {
    /// The product landing page, wired with the configured reveal defaults
    pub fn landing(reveal: &RevealConfig, stagger: &StaggerConfig) -> Self {
        let section = |animation: AnimationId, delay: u64| {
            reveal.section_options().with_animation(animation).with_delay(delay)
        };
        let group = |animation: AnimationId, base: u64, step: u64| BlockReveal::Group {
            options: section(animation, 0),
            stagger: StaggerGroup::new(base, step),
        };
        let heading = || section(AnimationId::SlideUp, 0);

        let blocks = vec![
            Block {
                content: BlockContent::Hero,
                reveal: BlockReveal::Static,
            },
            Block {
                content: BlockContent::Marquee,
                reveal: BlockReveal::Static,
            },
            Block::header(
                "The Problem",
                "Why Current Smart Glasses Fail",
                "Most smart glasses today face the same fundamental issues. As a result, they remain niche, costly, and impractical for everyday use.",
                heading(),
            ),
            Block::items(
                vec![
                    "Bulky & Uncomfortable",
                    "Expensive Hardware",
                    "Poor Battery Life",
                    "Quick Obsolescence",
                    "Hard to Improve",
                ],
                BlockReveal::Single(section(AnimationId::Zoom, 200)),
            ),
            Block::header(
                "The Core Idea",
                "Software-First Intelligence",
                "Do not make hardware smarter than it needs to be. Make the system smarter instead.",
                heading(),
            ),
            Block::items(
                vec![
                    "Lightweight Design: minimal onboard hardware",
                    "Energy Efficient: heavy lifting happens on the phone",
                    "Affordable: fewer expensive components",
                    "Upgradeable: improves through software updates",
                ],
                BlockReveal::PerItem {
                    options: reveal
                        .options()
                        .with_animation(AnimationId::SlideUp)
                        .with_root_margin(reveal.section_root_margin),
                    stagger: stagger.per_item(),
                },
            ),
            Block::header(
                "System Architecture",
                "Intelligence Flow",
                "This architecture keeps the glasses simple while enabling advanced intelligence.",
                heading(),
            ),
            Block::items(
                vec![
                    "Glasses capture audio and video",
                    "Phone runs AI processing",
                    "Cloud adds optional deep analysis",
                    "Results return to the wearer",
                ],
                BlockReveal::Single(section(AnimationId::Cascade, 200)),
            ),
            Block::header(
                "Products",
                "Choose Your Configuration",
                "Three configurations of the first generation, from minimal to advanced.",
                heading(),
            ),
            Block::items(
                vec![
                    "SpecEI (Gen-1): minimal and lightweight, focused on core experimentation",
                    "SpecEI Pro (Gen-1): balanced, designed for everyday usability",
                    "SpecEI Max (Gen-1): advanced, designed for deeper experimentation",
                ],
                group(AnimationId::SlideUp, 200, 200),
            ),
            Block::header(
                "Technology",
                "Software and AI Intelligence",
                "Processing is split intelligently: on-device logic for efficiency, mobile-based AI for depth.",
                heading(),
            ),
            Block::items(
                vec![
                    "Edge processing for instant responses",
                    "Mobile AI for context understanding",
                    "Memory indexing for recall",
                    "Over-the-air model updates",
                ],
                group(AnimationId::SlideLeft, 300, 100),
            ),
            Block::header(
                "Mobile App",
                "Companion Mobile Application",
                "The glasses sense. The app understands. The system responds.",
                heading(),
            ),
            Block::items(
                vec![
                    "Pairing: device pairing and management",
                    "Sync: voice and video synchronization",
                    "AI Assistant: natural language interaction",
                    "Search: searchable memory and context recall",
                    "Privacy: privacy and data controls",
                    "Storage: secure data management",
                    "Settings: unified control center",
                    "Analytics: usage insights and stats",
                ],
                group(AnimationId::Zoom, 100, 50),
            ),
            Block::header(
                "Applications",
                "Realistic Use Cases",
                "Designed for realistic scenarios, focused on achievable intelligence.",
                heading(),
            ),
            Block::items(
                vec![
                    "Hands-Free Capture",
                    "Conversation Memory",
                    "Contextual Reminders",
                    "Learning Assistance",
                    "Accessibility Support",
                    "Professional Documentation",
                ],
                group(AnimationId::SlideUp, 200, 100),
            ),
            Block::header(
                "Trust",
                "Privacy and Ethics",
                "Privacy is treated as an engineering requirement.",
                heading(),
            ),
            Block::items(
                vec![
                    "User-Controlled Data Flow",
                    "Explicit Consent",
                    "On-Device Processing",
                    "Transparent Operation",
                ],
                BlockReveal::Single(section(AnimationId::SlideRight, 200)),
            ),
            Block::header(
                "Support",
                "Why SpecEI Deserves Funding",
                "What makes it valuable is not polish. It is architecture, direction, and system thinking.",
                section(AnimationId::Zoom, 0),
            ),
            Block::items(
                vec![
                    "Refine hardware prototypes",
                    "Improve AI models",
                    "Expand the companion app",
                    "Run real-world pilots",
                ],
                group(AnimationId::SlideUp, 200, 50),
            ),
            Block::items(
                vec!["[ Support the Project ]  [ Learn More ]"],
                BlockReveal::Single(section(AnimationId::Elastic, 500)),
            ),
            Block::header(
                "Vision",
                "A Step Toward Wearables That Actually Work",
                "Better system design, smarter intelligence distribution, practical AI deployment, and responsible engineering.",
                heading(),
            ),
        ];

        Self { blocks }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LaidOutLine {
    pub role: TextRole,
    pub text: String,
}

/// One observable piece of a block: the whole block, or a single item
#[derive(Debug, Clone, PartialEq)]
pub struct ItemLayout {
    pub element: ElementId,
    /// Page row of the first line
    pub y: u16,
    pub lines: Vec<LaidOutLine>,
}

impl ItemLayout {
    pub fn height(&self) -> u16 {
        self.lines.len() as u16
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockLayout {
    pub element: ElementId,
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
    pub items: Vec<ItemLayout>,
}

impl BlockLayout {
    pub fn rect_px(&self) -> Rect {
        cells_to_px(self.x, self.y, self.width, self.height)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub width: u16,
    pub viewport_height: u16,
    pub blocks: Vec<BlockLayout>,
    /// Total page height in rows
    pub height: u16,
}

impl PageLayout {
    pub fn max_scroll(&self) -> u16 {
        self.height.saturating_sub(self.viewport_height)
    }

    /// Every element with its pixel rectangle
    pub fn element_rects(&self) -> Vec<(ElementId, Rect)> {
        let mut rects = Vec::new();
        for block in &self.blocks {
            rects.push((block.element, block.rect_px()));
            for item in &block.items {
                if item.element != block.element {
                    rects.push((item.element, cells_to_px(block.x, item.y, block.width, item.height())));
                }
            }
        }
        rects
    }
}

pub fn cells_to_px(x: u16, y: u16, width: u16, height: u16) -> Rect {
    Rect::new(
        x as f64 * CELL_WIDTH_PX,
        y as f64 * CELL_HEIGHT_PX,
        width as f64 * CELL_WIDTH_PX,
        height as f64 * CELL_HEIGHT_PX,
    )
}

/// Lay the page out for a `width` x `viewport_height` terminal area
pub fn layout(page: &Page, width: u16, viewport_height: u16) -> PageLayout {
    let content_width = width.saturating_sub(SIDE_PADDING * 2).max(1);
    let mut y = 0u16;
    let mut blocks = Vec::with_capacity(page.blocks.len());

    for (index, block) in page.blocks.iter().enumerate() {
        let element = Block::element(index);
        let start = y;

        let items = match &block.content {
            BlockContent::Hero => {
                let height = viewport_height.max(4);
                let top = height / 2 - 1;
                let lines = (0..height)
                    .map(|row| LaidOutLine {
                        role: TextRole::HeroTitle,
                        text: match row {
                            r if r == top => "PROJECT:".to_string(),
                            r if r == top + 1 => "SPECULAR".to_string(),
                            _ => String::new(),
                        },
                    })
                    .collect();
                vec![ItemLayout { element, y, lines }]
            }
            BlockContent::Marquee => {
                let lines = vec![
                    LaidOutLine { role: TextRole::Tag, text: String::new() },
                    LaidOutLine { role: TextRole::Tag, text: String::new() },
                ];
                vec![ItemLayout { element, y, lines }]
            }
            BlockContent::Header { tag, title, desc } => {
                let mut lines = vec![
                    LaidOutLine { role: TextRole::Tag, text: tag.to_uppercase() },
                    LaidOutLine { role: TextRole::Title, text: String::new() },
                ];
                lines.extend(wrap(title, content_width).into_iter().map(|text| LaidOutLine { role: TextRole::Title, text }));
                lines.push(LaidOutLine { role: TextRole::Body, text: String::new() });
                lines.extend(wrap(desc, content_width).into_iter().map(|text| LaidOutLine { role: TextRole::Body, text }));
                vec![ItemLayout { element, y, lines }]
            }
            BlockContent::Items(texts) => {
                let mut items = Vec::with_capacity(texts.len());
                let mut item_y = y;
                for (i, text) in texts.iter().enumerate() {
                    let lines: Vec<LaidOutLine> = wrap(text, content_width.saturating_sub(2).max(1))
                        .into_iter()
                        .enumerate()
                        .map(|(n, line)| LaidOutLine {
                            role: TextRole::Item,
                            text: if n == 0 { format!("▸ {}", line) } else { format!("  {}", line) },
                        })
                        .collect();
                    let height = lines.len() as u16;
                    items.push(ItemLayout {
                        element: Block::item_element(index, i),
                        y: item_y,
                        lines,
                    });
                    item_y += height + 1;
                }
                items
            }
        };

        let bottom = items.iter().map(|item| item.y + item.height()).max().unwrap_or(start);
        blocks.push(BlockLayout {
            element,
            x: SIDE_PADDING,
            y: start,
            width: content_width,
            height: bottom - start,
            items,
        });

        // Gap between blocks; wider before a section header
        let gap = match page.blocks.get(index + 1).map(|b| &b.content) {
            Some(BlockContent::Header { .. }) => 4,
            Some(_) => 2,
            None => 1,
        };
        y = bottom + gap;
    }

    PageLayout {
        width,
        viewport_height,
        blocks,
        height: y,
    }
}

/// Greedy word wrap by display width; words longer than `width` are split
pub fn wrap(text: &str, width: u16) -> Vec<String> {
    let width = width.max(1) as usize;
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let word_width = word.width();
        let current_width = current.width();

        if !current.is_empty() && current_width + 1 + word_width <= width {
            current.push(' ');
            current.push_str(word);
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if word_width <= width {
            current.push_str(word);
            continue;
        }

        // Hard split an oversized word
        let mut chunk_width = 0;
        for c in word.chars() {
            let w = c.width().unwrap_or(0);
            if chunk_width + w > width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                chunk_width = 0;
            }
            current.push(c);
            chunk_width += w;
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// One repetition of the marquee row, separators included
pub fn marquee_copy() -> String {
    let mut copy = String::new();
    for text in MARQUEE_TEXTS {
        copy.push_str(text);
        copy.push_str("  ✦  ");
    }
    copy
}

#[cfg(test)]
mod tests {
    use super::*;

    fn landing() -> Page {
        Page::landing(&RevealConfig::default(), &StaggerConfig::default())
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("a bb ccc", 4), vec!["a bb", "ccc"]);
        assert_eq!(wrap("abcdefgh", 3), vec!["abc", "def", "gh"]);
        assert_eq!(wrap("", 10), vec![""]);
        assert_eq!(wrap("Software-First Intelligence", 80), vec!["Software-First Intelligence"]);
    }

    #[test]
    fn test_element_ids_are_unique() {
        let page = landing();
        let layout = layout(&page, 80, 24);
        let rects = layout.element_rects();
        let mut ids: Vec<_> = rects.iter().map(|(id, _)| *id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), rects.len());
    }

    #[test]
    fn test_blocks_are_stacked() {
        let page = landing();
        let layout = layout(&page, 60, 20);

        assert_eq!(layout.blocks.len(), page.len());
        assert_eq!(layout.blocks[0].height, 20);
        for pair in layout.blocks.windows(2) {
            assert!(pair[1].y >= pair[0].y + pair[0].height);
        }
        assert!(layout.height > layout.viewport_height);
        assert_eq!(layout.max_scroll(), layout.height - 20);
    }

    #[test]
    fn test_rects_are_in_pixels() {
        let page = landing();
        let layout = layout(&page, 80, 24);
        let hero = layout.blocks[0].rect_px();
        assert_eq!(hero.y, 0.0);
        assert_eq!(hero.height, 24.0 * CELL_HEIGHT_PX);
        assert_eq!(hero.x, SIDE_PADDING as f64 * CELL_WIDTH_PX);
    }

    #[test]
    fn test_items_wrap_with_narrow_width() {
        let page = landing();
        let narrow = layout(&page, 20, 24);
        let wide = layout(&page, 120, 24);
        assert!(narrow.height > wide.height);
    }

    #[test]
    fn test_marquee_copy_contains_every_text() {
        let copy = marquee_copy();
        for text in MARQUEE_TEXTS {
            assert!(copy.contains(text));
        }
    }
}
