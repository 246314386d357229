// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use regex::Regex;
use smallvec::SmallVec;

use super::FrameKind;

/// Characters that may continue an identifier. Hyphens are allowed, so `end-of-list`
/// is one identifier and not the `end` keyword.
#[must_use]
pub fn is_identifier_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '-'
}

/// One row of the rule table: the construct it recognizes and the anchored patterns
/// (one per spelling) that recognize it.
#[derive(Debug, Clone)]
pub struct IndentRule {
    pub kind: FrameKind,
    pub patterns: SmallVec<[Regex; 4]>,
}

impl IndentRule {
    /// Each spelling is matched literally, except that a space inside it matches any
    /// run of whitespace (so `else if` also matches `else   if`).
    ///
    /// # Errors
    ///
    /// Returns an error if a spelling produces a pattern that does not compile.
    pub fn try_new(kind: FrameKind, spellings: &[&str]) -> Result<Self, regex::Error> {
        let mut patterns = SmallVec::new();
        for spelling in spellings {
            let body = spelling
                .split(' ')
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+");
            patterns.push(Regex::new(&format!("^(?:{body})"))?);
        }
        Ok(Self { kind, patterns })
    }

    /// Length of the longest spelling of this rule that starts `input`. A spelling that
    /// ends in an identifier character only counts when it is not followed by another
    /// one.
    #[must_use]
    pub fn match_len(&self, input: &str) -> Option<usize> {
        self.patterns
            .iter()
            .filter_map(|pattern| pattern.find(input))
            .map(|found| found.end())
            .filter(|&end| {
                let ends_in_word = input[..end].chars().next_back().is_some_and(is_identifier_char);
                let next_is_word = input[end..].chars().next().is_some_and(is_identifier_char);
                !(ends_in_word && next_is_word)
            })
            .max()
    }
}

/// The ordered rule table. Matching picks the longest match across all rules, and ties
/// go to the rule that comes first.
#[derive(Debug, Clone)]
pub struct IndentRules {
    pub rules: Vec<IndentRule>,
}

impl IndentRules {
    /// The table for the block language: keyword openers closed by `end` (or `;`),
    /// `|` and `else` arms, and a `sharing` section at the tail of `data` blocks.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the patterns fail to compile.
    pub fn try_default() -> Result<Self, regex::Error> {
        Ok(Self {
            rules: vec![
                IndentRule::try_new(FrameKind::OpenDouble, &["data", "ask", "cases"])?,
                IndentRule::try_new(
                    FrameKind::OpenSingle,
                    &[
                        "fun", "lam", "method", "if", "when", "for", "check", "examples",
                        "block", "(",
                    ],
                )?,
                IndentRule::try_new(
                    FrameKind::SoftUnindent,
                    &["|", "else if", "else", "where"],
                )?,
                IndentRule::try_new(FrameKind::Sharing, &["sharing"])?,
                IndentRule::try_new(FrameKind::CloseParen, &[")"])?,
                IndentRule::try_new(FrameKind::End, &["end", ";"])?,
            ],
        })
    }

    /// Finds the rule that matches the longest prefix of `input`.
    #[must_use]
    pub fn longest_match(&self, input: &str) -> Option<(FrameKind, usize)> {
        let mut best: Option<(FrameKind, usize)> = None;
        for rule in &self.rules {
            if let Some(len) = rule.match_len(input) {
                match best {
                    Some((_, best_len)) if best_len >= len => {}
                    _ => best = Some((rule.kind, len)),
                }
            }
        }
        best
    }
}
