// File: src/meta/sfc.rs
// Purpose: Split single-file documents into script sections and custom blocks

use once_cell::sync::Lazy;
use regex::Regex;

/// Opening tag at the start of the input: name, raw attributes, self-closing slash
static OPEN_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<([A-Za-z][A-Za-z0-9_-]*)((?:\s[^>]*?)?)(/?)>").unwrap());

/// Any opening or closing tag: closing slash, name, self-closing slash
static TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<(/?)([A-Za-z][A-Za-z0-9_-]*)(?:\s[^>]*?)?(/?)>").unwrap());

static SETUP_ATTR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:^|\s)setup(?:\s|=|$)").unwrap());

/// A top-level block that is neither `<template>`, `<script>` nor `<style>`
#[derive(Debug, Clone, PartialEq)]
pub struct CustomBlock {
    /// Element name, e.g. `config`
    pub kind: String,
    /// Raw attribute text of the opening tag
    pub attrs: String,
    /// Raw inner content
    pub content: String,
}

/// Sectioned content of a single-file document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentSections {
    /// First `<script>` block without a `setup` attribute
    pub script: Option<String>,
    /// First `<script setup>` block
    pub script_setup: Option<String>,
    pub custom_blocks: Vec<CustomBlock>,
}

impl DocumentSections {
    /// First custom block of the given kind
    pub fn custom_block(&self, kind: &str) -> Option<&CustomBlock> {
        self.custom_blocks.iter().find(|block| block.kind == kind)
    }
}

/// Parses the top level of a single-file document
///
/// Unterminated blocks end sectioning; whatever was found before is kept.
///
/// # Examples
///
/// ```
/// use pagetree::meta::sfc::parse_document;
///
/// let doc = parse_document(r#"
/// <template><h1>Hi</h1></template>
/// <script setup lang="ts">const a = 1</script>
/// <config>{ "title": "Hi" }</config>
/// "#);
///
/// assert_eq!(doc.script, None);
/// assert_eq!(doc.script_setup.as_deref(), Some("const a = 1"));
/// assert_eq!(doc.custom_block("config").unwrap().content, r#"{ "title": "Hi" }"#);
/// ```
pub fn parse_document(src: &str) -> DocumentSections {
    let mut sections = DocumentSections::default();
    let mut pos = 0;

    while let Some(offset) = src[pos..].find('<') {
        let start = pos + offset;
        let rest = &src[start..];

        if rest.starts_with("<!--") {
            match rest.find("-->") {
                Some(end) => {
                    pos = start + end + 3;
                    continue;
                }
                None => break,
            }
        }

        let Some(caps) = OPEN_TAG.captures(rest) else {
            pos = start + 1;
            continue;
        };

        let name = caps[1].to_string();
        let attrs = caps[2].trim().to_string();
        let content_start = start + caps[0].len();

        if !caps[3].is_empty() {
            push_block(&mut sections, name, attrs, String::new());
            pos = content_start;
            continue;
        }

        let Some((content_end, block_end)) = find_close(src, content_start, &name) else {
            break;
        };

        let content = src[content_start..content_end].trim().to_string();
        push_block(&mut sections, name, attrs, content);
        pos = block_end;
    }

    sections
}

fn push_block(sections: &mut DocumentSections, name: String, attrs: String, content: String) {
    match name.as_str() {
        "script" if SETUP_ATTR.is_match(&attrs) => {
            if sections.script_setup.is_none() {
                sections.script_setup = Some(content);
            }
        }
        "script" => {
            if sections.script.is_none() {
                sections.script = Some(content);
            }
        }
        "template" | "style" => {}
        _ => sections.custom_blocks.push(CustomBlock {
            kind: name,
            attrs,
            content,
        }),
    }
}

/// Finds the closing tag of the block opened just before `from`
///
/// Returns `(content_end, block_end)`. Script and style bodies are raw text;
/// other blocks balance nested elements of the same name.
fn find_close(src: &str, from: usize, name: &str) -> Option<(usize, usize)> {
    let raw_text = matches!(name, "script" | "style");
    let mut depth = 0usize;

    for caps in TAG.captures_iter(&src[from..]) {
        if &caps[2] != name {
            continue;
        }
        let whole = caps.get(0)?;
        let closing = !caps[1].is_empty();
        let self_closing = !caps[3].is_empty();

        if closing {
            if depth == 0 {
                return Some((from + whole.start(), from + whole.end()));
            }
            depth -= 1;
        } else if !raw_text && !self_closing {
            depth += 1;
        }
    }

    None
}
