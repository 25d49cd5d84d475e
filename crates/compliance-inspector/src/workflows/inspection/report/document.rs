use super::aggregate::PropertyViolationGroup;
use super::summary::{plural, ReportContext, ReportSummary, NO_VIOLATIONS_MESSAGE, REPORT_TITLE};
use chrono::NaiveDate;
use serde::Serialize;

/// Estimated printable lines per page.
pub const PAGE_LINE_BUDGET: usize = 48;
/// Characters per printed line used for wrapping estimates.
pub const CHARS_PER_LINE: usize = 90;
pub const DOCUMENT_FILE_STEM: &str = "Property_Violations";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextStyle {
    Plain,
    Bold,
    Italic,
    Muted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Emphasis {
    Major,
    Minor,
}

impl Emphasis {
    pub const fn color(self) -> &'static str {
        match self {
            Self::Major => "#dc3545",
            Self::Minor => "#fd7e14",
        }
    }

    pub const fn tag(self) -> &'static str {
        match self {
            Self::Major => "MAJOR",
            Self::Minor => "MINOR",
        }
    }
}

/// Hyperlink to an externally stored photo; never embedded data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentLink {
    pub number: usize,
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DocumentBlock {
    Heading {
        text: String,
        level: u8,
    },
    Paragraph {
        text: String,
        style: TextStyle,
    },
    KeyValueTable {
        rows: Vec<(String, String)>,
    },
    NumberedList {
        title: String,
        emphasis: Emphasis,
        /// Number of the first item, so continued lists keep counting.
        start: usize,
        items: Vec<String>,
    },
    PhotoLinks {
        links: Vec<DocumentLink>,
    },
    Separator,
}

impl DocumentBlock {
    fn heading(text: impl Into<String>, level: u8) -> Self {
        Self::Heading {
            text: text.into(),
            level,
        }
    }

    fn paragraph(text: impl Into<String>, style: TextStyle) -> Self {
        Self::Paragraph {
            text: text.into(),
            style,
        }
    }

    /// Lines the block occupies, including its trailing gap.
    pub fn estimated_lines(&self) -> usize {
        match self {
            Self::Heading { .. } => 2,
            Self::Paragraph { text, .. } => wrapped_lines(text) + 1,
            Self::KeyValueTable { rows } => rows.len() + 1,
            Self::NumberedList { items, .. } => {
                1 + items.iter().map(|item| wrapped_lines(item)).sum::<usize>() + 1
            }
            Self::PhotoLinks { links } => links.len() + 1,
            Self::Separator => 1,
        }
    }
}

impl DocumentBlock {
    /// Splits off a head that fits in `budget` lines. Blocks that cannot be
    /// split, or that would leave an empty head or tail, come back unchanged.
    fn split_to_fit(self, budget: usize) -> Result<(Self, Self), Self> {
        match self {
            Self::NumberedList {
                title,
                emphasis,
                start,
                mut items,
            } => {
                let mut used = 2;
                let take = items
                    .iter()
                    .take_while(|item| {
                        used += wrapped_lines(item);
                        used <= budget
                    })
                    .count();
                if take == 0 || take == items.len() {
                    return Err(Self::NumberedList {
                        title,
                        emphasis,
                        start,
                        items,
                    });
                }
                let rest = items.split_off(take);
                let tail = Self::NumberedList {
                    title: continued(&title),
                    emphasis,
                    start: start + take,
                    items: rest,
                };
                let head = Self::NumberedList {
                    title,
                    emphasis,
                    start,
                    items,
                };
                Ok((head, tail))
            }
            Self::PhotoLinks { mut links } => {
                let take = budget.saturating_sub(1);
                if take == 0 || take >= links.len() {
                    return Err(Self::PhotoLinks { links });
                }
                let rest = links.split_off(take);
                Ok((Self::PhotoLinks { links }, Self::PhotoLinks { links: rest }))
            }
            Self::KeyValueTable { mut rows } => {
                let take = budget.saturating_sub(1);
                if take == 0 || take >= rows.len() {
                    return Err(Self::KeyValueTable { rows });
                }
                let rest = rows.split_off(take);
                Ok((Self::KeyValueTable { rows }, Self::KeyValueTable { rows: rest }))
            }
            Self::Paragraph { text, style } => {
                let take = budget.saturating_sub(1) * CHARS_PER_LINE;
                let cut = text.char_indices().nth(take).map(|(index, _)| index);
                match cut {
                    Some(index) if take > 0 => {
                        let head = Self::paragraph(&text[..index], style);
                        let tail = Self::paragraph(&text[index..], style);
                        Ok((head, tail))
                    }
                    _ => Err(Self::Paragraph { text, style }),
                }
            }
            other => Err(other),
        }
    }
}

fn continued(title: &str) -> String {
    if title.ends_with(" (continued)") {
        title.to_string()
    } else {
        format!("{title} (continued)")
    }
}

fn wrapped_lines(text: &str) -> usize {
    text.chars().count().div_ceil(CHARS_PER_LINE).max(1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    Title,
    Summary,
    Properties,
    NoViolations,
    Trailer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentPage {
    pub number: usize,
    pub kind: PageKind,
    pub blocks: Vec<DocumentBlock>,
}

impl DocumentPage {
    pub fn estimated_lines(&self) -> usize {
        self.blocks.iter().map(DocumentBlock::estimated_lines).sum()
    }
}

/// Logical structure of the downloadable report, prior to packaging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportDocument {
    pub title: String,
    pub organization: String,
    pub generated_on: NaiveDate,
    pub file_stem: &'static str,
    pub summary: ReportSummary,
    pub pages: Vec<DocumentPage>,
}

impl ReportDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn pages_of_kind(&self, kind: PageKind) -> impl Iterator<Item = &DocumentPage> {
        self.pages.iter().filter(move |page| page.kind == kind)
    }

    /// Every photo link in document order.
    pub fn photo_links(&self) -> impl Iterator<Item = &DocumentLink> {
        self.pages
            .iter()
            .flat_map(|page| page.blocks.iter())
            .flat_map(|block| match block {
                DocumentBlock::PhotoLinks { links } => links.as_slice(),
                _ => &[][..],
            })
    }
}

pub fn render_document(groups: &[PropertyViolationGroup], context: &ReportContext) -> ReportDocument {
    let summary = ReportSummary::from_groups(groups);
    let mut paginator = Paginator::default();

    paginator.push_page(PageKind::Title, title_page(context, &summary));

    if groups.is_empty() {
        paginator.push_page(
            PageKind::NoViolations,
            vec![
                DocumentBlock::heading("No Violations Found", 1),
                DocumentBlock::paragraph(NO_VIOLATIONS_MESSAGE, TextStyle::Plain),
            ],
        );
    } else {
        paginator.push_page(PageKind::Summary, summary_page(&summary));
        paginator.begin_flow(PageKind::Properties);
        for (index, group) in groups.iter().enumerate() {
            paginator.push_section(property_section(index + 1, group));
            if index + 1 < groups.len() {
                paginator.push_separator();
            }
        }
        paginator.end_flow();
    }

    paginator.push_page(PageKind::Trailer, trailer_page(context));

    ReportDocument {
        title: REPORT_TITLE.to_string(),
        organization: context.organization.clone(),
        generated_on: context.generated_at.date_naive(),
        file_stem: DOCUMENT_FILE_STEM,
        summary,
        pages: paginator.finish(),
    }
}

fn title_page(context: &ReportContext, summary: &ReportSummary) -> Vec<DocumentBlock> {
    vec![
        DocumentBlock::heading(REPORT_TITLE, 1),
        DocumentBlock::paragraph(context.organization.clone(), TextStyle::Bold),
        DocumentBlock::paragraph(
            format!("Generated {}", context.generated_date_label()),
            TextStyle::Plain,
        ),
        DocumentBlock::paragraph(
            format!(
                "{} with violations",
                plural(summary.total_properties, "property", "properties")
            ),
            TextStyle::Plain,
        ),
    ]
}

fn summary_page(summary: &ReportSummary) -> Vec<DocumentBlock> {
    vec![
        DocumentBlock::heading("Summary Statistics", 1),
        DocumentBlock::KeyValueTable {
            rows: summary
                .lines()
                .into_iter()
                .map(|(label, value)| (label.to_string(), value.to_string()))
                .collect(),
        },
    ]
}

fn trailer_page(context: &ReportContext) -> Vec<DocumentBlock> {
    vec![
        DocumentBlock::heading("End of Report", 1),
        DocumentBlock::paragraph(
            format!("{} | {}", context.organization, context.generated_timestamp_label()),
            TextStyle::Muted,
        ),
    ]
}

fn property_section(index: usize, group: &PropertyViolationGroup) -> Vec<DocumentBlock> {
    let mut blocks = vec![
        DocumentBlock::heading(format!("{}. {}", index, group.address), 2),
        DocumentBlock::KeyValueTable {
            rows: vec![
                ("Review Date".to_string(), group.review_date_label()),
                ("Review Team".to_string(), group.review_team.clone()),
                ("Submitted By".to_string(), group.submitted_by.clone()),
                ("Status".to_string(), group.status_label.clone()),
                ("Photos".to_string(), group.photo_count.to_string()),
            ],
        },
    ];

    let major: Vec<String> = group
        .major_violations()
        .map(|entry| entry.label.to_string())
        .collect();
    if !major.is_empty() {
        blocks.push(DocumentBlock::NumberedList {
            title: format!("Major Violations ({})", major.len()),
            emphasis: Emphasis::Major,
            start: 1,
            items: major,
        });
    }

    let minor: Vec<String> = group
        .minor_violations()
        .map(|entry| entry.label.to_string())
        .collect();
    if !minor.is_empty() {
        blocks.push(DocumentBlock::NumberedList {
            title: format!("Minor Violations ({})", minor.len()),
            emphasis: Emphasis::Minor,
            start: 1,
            items: minor,
        });
    }

    if let Some(comments) = &group.comments {
        blocks.push(DocumentBlock::paragraph(
            format!("Comments: {comments}"),
            TextStyle::Italic,
        ));
    }

    if !group.photos.is_empty() {
        blocks.push(DocumentBlock::heading(
            format!("Photos ({})", group.photo_count),
            3,
        ));
        blocks.push(DocumentBlock::PhotoLinks {
            links: group
                .photos
                .iter()
                .enumerate()
                .map(|(offset, url)| DocumentLink {
                    number: offset + 1,
                    label: format!("Photo {}", offset + 1),
                    url: url.clone(),
                })
                .collect(),
        });
    }

    if group.notice_sent() {
        let follow_up = &group.follow_up;
        let mut rows = vec![(
            "Violation notice sent".to_string(),
            follow_up
                .notice_date
                .map(format_date)
                .unwrap_or_else(|| "Yes".to_string()),
        )];
        if let Some(date) = follow_up.compliance_deadline {
            rows.push(("Compliance deadline".to_string(), format_date(date)));
        }
        if let Some(date) = follow_up.reinspection_date {
            rows.push(("Re-inspection date".to_string(), format_date(date)));
        }
        blocks.push(DocumentBlock::heading("Follow-up", 3));
        blocks.push(DocumentBlock::KeyValueTable { rows });
    }

    blocks
}

fn format_date(date: NaiveDate) -> String {
    date.format("%B %d, %Y").to_string()
}

/// Lays property sections onto pages without splitting a section that fits.
/// Blocks taller than a page are split item-wise.
#[derive(Debug, Default)]
struct Paginator {
    pages: Vec<DocumentPage>,
    flow: Option<(PageKind, Vec<DocumentBlock>, usize)>,
}

impl Paginator {
    fn push_page(&mut self, kind: PageKind, blocks: Vec<DocumentBlock>) {
        self.pages.push(DocumentPage {
            number: 0,
            kind,
            blocks,
        });
    }

    fn begin_flow(&mut self, kind: PageKind) {
        self.flow = Some((kind, Vec::new(), 0));
    }

    fn push_section(&mut self, blocks: Vec<DocumentBlock>) {
        let height: usize = blocks.iter().map(DocumentBlock::estimated_lines).sum();
        if self.used() > 0 && self.used() + height > PAGE_LINE_BUDGET {
            self.break_page();
        }
        for block in blocks {
            self.push_flowing_block(block);
        }
    }

    fn push_flowing_block(&mut self, block: DocumentBlock) {
        let mut pending = Some(block);
        while let Some(block) = pending.take() {
            let lines = block.estimated_lines();
            let remaining = PAGE_LINE_BUDGET.saturating_sub(self.used());
            if lines <= remaining {
                self.push_block(block, lines);
            } else if lines <= PAGE_LINE_BUDGET {
                self.break_page();
                pending = Some(block);
            } else {
                match block.split_to_fit(remaining) {
                    Ok((head, tail)) => {
                        let head_lines = head.estimated_lines();
                        self.push_block(head, head_lines);
                        self.break_page();
                        pending = Some(tail);
                    }
                    Err(block) if self.used() > 0 => {
                        self.break_page();
                        pending = Some(block);
                    }
                    Err(block) => self.push_block(block, lines),
                }
            }
        }
    }

    fn push_separator(&mut self) {
        let separator = DocumentBlock::Separator;
        let lines = separator.estimated_lines();
        if self.used() + lines > PAGE_LINE_BUDGET {
            // The page break separates the sections.
            self.break_page();
        } else {
            self.push_block(separator, lines);
        }
    }

    fn used(&self) -> usize {
        self.flow.as_ref().map(|(_, _, used)| *used).unwrap_or(0)
    }

    fn push_block(&mut self, block: DocumentBlock, lines: usize) {
        if let Some((_, blocks, used)) = self.flow.as_mut() {
            blocks.push(block);
            *used += lines;
        }
    }

    fn break_page(&mut self) {
        let Some((kind, blocks, used)) = self.flow.as_mut() else {
            return;
        };
        if blocks.is_empty() {
            return;
        }
        let page = DocumentPage {
            number: 0,
            kind: *kind,
            blocks: std::mem::take(blocks),
        };
        *used = 0;
        self.pages.push(page);
    }

    fn end_flow(&mut self) {
        self.break_page();
        self.flow = None;
    }

    fn finish(mut self) -> Vec<DocumentPage> {
        self.end_flow();
        for (offset, page) in self.pages.iter_mut().enumerate() {
            page.number = offset + 1;
        }
        self.pages
    }
}
