//! Reply formatting.
//!
//! Bot text is split into blocks: blank lines separate paragraphs, single
//! newlines are line breaks inside a paragraph, and runs of lines starting
//! with `N. ` become an ordered list. Views decide how blocks are drawn.

use std::sync::LazyLock;

use regex::Regex;

static LIST_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d+)\.\s+(.*)$").expect("list item pattern is a valid regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub number: u32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Lines joined by line breaks.
    Paragraph(Vec<String>),
    OrderedList(Vec<ListItem>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormattedReply {
    pub blocks: Vec<Block>,
}

impl FormattedReply {
    /// Render back to plain text, one blank line between blocks.
    pub fn to_plain(&self) -> String {
        self.blocks
            .iter()
            .map(|block| match block {
                Block::Paragraph(lines) => lines.join("\n"),
                Block::OrderedList(items) => items
                    .iter()
                    .map(|item| format!("{}. {}", item.number, item.text))
                    .collect::<Vec<_>>()
                    .join("\n"),
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

fn parse_list_item(line: &str) -> Option<ListItem> {
    let caps = LIST_ITEM.captures(line)?;
    let number = caps.get(1)?.as_str().parse().ok()?;
    Some(ListItem {
        number,
        text: caps.get(2)?.as_str().trim_end().to_string(),
    })
}

pub fn format_reply(text: &str) -> FormattedReply {
    let normalized = text.replace("\r\n", "\n");
    let mut blocks: Vec<Block> = Vec::new();

    for chunk in normalized.split("\n\n") {
        // A chunk boundary ends any open paragraph, but list items separated
        // by blank lines still belong to one list.
        let mut chunk_started = true;
        for line in chunk.lines() {
            if line.trim().is_empty() {
                chunk_started = true;
                continue;
            }

            match (parse_list_item(line), blocks.last_mut()) {
                (Some(item), Some(Block::OrderedList(items))) => items.push(item),
                (Some(item), _) => blocks.push(Block::OrderedList(vec![item])),
                (None, Some(Block::Paragraph(lines))) if !chunk_started => {
                    lines.push(line.trim_end().to_string());
                }
                (None, _) => blocks.push(Block::Paragraph(vec![line.trim_end().to_string()])),
            }
            chunk_started = false;
        }
    }

    FormattedReply { blocks }
}
