//! Changelog parsing and rewriting.
//!
//! A changelog document is a title block followed by a mutable `## Draft`
//! section and zero or more dated version sections in descending order:
//!
//! ```text
//! # Changelog
//! All notable changes to this project will be documented in this file.
//!
//! ## Draft
//!
//! ## 1.0.0 (08-06-2021)
//! - Released 1.0.0
//! ```
//!
//! Releasing moves the Draft bullets into a new dated section directly below
//! the Draft heading and leaves Draft empty for future entries.

use crate::error::ValidationError;
use chrono::NaiveDate;
use semver::Version;

/// Default changelog file name in the theme root
pub const CHANGELOG_FILE: &str = "CHANGELOG.md";

const DRAFT_HEADING: &str = "## Draft";

const TEMPLATE: &str = "# Changelog\n\
All notable changes to this project will be documented in this file.\n\
\n\
## Draft\n";

/// Author attribution rendered into the release-note excerpt
#[derive(Debug, Clone, Default)]
pub struct AuthorMetadata {
    /// Author display name
    pub name: Option<String>,
    /// Author contact email
    pub email: Option<String>,
    /// Support URL for the theme
    pub support_url: Option<String>,
}

impl AuthorMetadata {
    fn attribution(&self) -> Option<String> {
        let mut line = String::new();
        if let Some(name) = &self.name {
            line.push_str(name);
        }
        if let Some(email) = &self.email {
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(&format!("<{email}>"));
        }
        if let Some(url) = &self.support_url {
            if !line.is_empty() {
                line.push_str(" - ");
            }
            line.push_str(url);
        }
        if line.is_empty() {
            None
        } else {
            Some(format!("Maintained by {line}"))
        }
    }
}

/// Result of rendering a new version section into a changelog
#[derive(Debug, Clone)]
pub struct RenderedChangelog {
    /// The full updated changelog document
    pub document: String,
    /// The new version's section text alone, for reuse as release-note body
    pub excerpt: String,
}

/// Parses and rewrites changelog documents
#[derive(Debug, Clone, Copy, Default)]
pub struct ChangelogEditor;

impl ChangelogEditor {
    /// Render a new dated section for `version` into `document`.
    ///
    /// `document` is the current changelog text, or `None` when the file does
    /// not exist yet; in that case a minimal template (title plus empty Draft)
    /// is materialized first. Bullets currently under `## Draft` are carried
    /// into the new section and Draft is left empty.
    ///
    /// Re-releasing a version whose section already exists is refused with
    /// [`ValidationError::DuplicateChangelogEntry`].
    pub fn render(
        document: Option<&str>,
        version: &Version,
        date: NaiveDate,
        author: &AuthorMetadata,
    ) -> Result<RenderedChangelog, ValidationError> {
        let text = document.unwrap_or(TEMPLATE);

        if Self::has_section_for(text, version) {
            return Err(ValidationError::DuplicateChangelogEntry {
                version: version.clone(),
            });
        }

        let parsed = ParsedChangelog::parse(text);

        let mut body = parsed.draft_bullets.clone();
        if body.is_empty() {
            body.push(format!("- Released {version}"));
        }

        let heading = format!("## {} ({})", version, date.format("%d-%m-%Y"));

        let mut section = String::new();
        section.push_str(&heading);
        section.push('\n');
        for bullet in &body {
            section.push_str(bullet);
            section.push('\n');
        }

        let mut updated = String::new();
        for line in &parsed.preamble {
            updated.push_str(line);
            updated.push('\n');
        }
        updated.push_str(DRAFT_HEADING);
        updated.push_str("\n\n");
        updated.push_str(&section);
        if !parsed.tail.is_empty() {
            updated.push('\n');
            for line in &parsed.tail {
                updated.push_str(line);
                updated.push('\n');
            }
        }

        let mut excerpt = section;
        if let Some(attribution) = author.attribution() {
            excerpt.push('\n');
            excerpt.push_str(&attribution);
            excerpt.push('\n');
        }

        Ok(RenderedChangelog {
            document: updated,
            excerpt,
        })
    }

    /// Whether the document already carries a dated section for `version`
    pub fn has_section_for(document: &str, version: &Version) -> bool {
        document.lines().any(|line| {
            let line = line.trim_start();
            let Some(rest) = line.strip_prefix("## ") else {
                return false;
            };
            rest.split_whitespace()
                .next()
                .and_then(|token| Version::parse(token).ok())
                .is_some_and(|v| v == *version)
        })
    }
}

/// Changelog split into the parts the editor rearranges
struct ParsedChangelog {
    /// Lines before the Draft heading (title block)
    preamble: Vec<String>,
    /// Bullet lines currently under the Draft heading
    draft_bullets: Vec<String>,
    /// Everything from the first dated section onward, untouched
    tail: Vec<String>,
}

impl ParsedChangelog {
    fn parse(text: &str) -> Self {
        let lines: Vec<&str> = text.lines().collect();

        let draft_idx = lines
            .iter()
            .position(|line| line.trim_start().eq_ignore_ascii_case(DRAFT_HEADING));

        let (preamble_end, draft_start) = match draft_idx {
            Some(idx) => (idx, idx + 1),
            // No Draft heading: the whole title block is the preamble and a
            // Draft heading is synthesized before the first section.
            None => {
                let first_section = lines
                    .iter()
                    .position(|line| line.trim_start().starts_with("## "))
                    .unwrap_or(lines.len());
                (first_section, first_section)
            }
        };

        let mut preamble: Vec<String> = lines[..preamble_end]
            .iter()
            .map(|l| l.trim_end().to_string())
            .collect();
        // Drop trailing blank lines so spacing stays canonical on rewrite.
        while preamble.last().is_some_and(|l| l.is_empty()) {
            preamble.pop();
        }
        if !preamble.is_empty() {
            preamble.push(String::new());
        }

        let tail_start = lines[draft_start..]
            .iter()
            .position(|line| line.trim_start().starts_with("## "))
            .map(|offset| draft_start + offset)
            .unwrap_or(lines.len());

        let draft_bullets: Vec<String> = lines[draft_start..tail_start]
            .iter()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();

        let mut tail: Vec<String> = lines[tail_start..]
            .iter()
            .map(|l| l.trim_end().to_string())
            .collect();
        while tail.last().is_some_and(|l| l.is_empty()) {
            tail.pop();
        }

        Self {
            preamble,
            draft_bullets,
            tail,
        }
    }
}
