// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use smallvec::SmallVec;

use super::{FrameKind, IndentFrame, IndentRules, is_identifier_char};

/// Lexical indentation for a block structured language. Source is scanned a line at a
/// time, and each line yields one [`IndentFrame`]. The frames of all the lines typed so
/// far are enough to:
/// 1. Reindent any line ([`IndentTracker::indent_for`]).
/// 2. Tell whether the buffer closes every block it opens
///    ([`IndentTracker::is_submit_ready`]).
///
/// This is a guess, not a parse. Text that no rule matches is skipped a token at a
/// time, and has no effect on the indent.
#[derive(Debug, Clone)]
pub struct IndentTracker {
    rules: IndentRules,
}

impl IndentTracker {
    #[must_use]
    pub fn new(rules: IndentRules) -> Self { Self { rules } }

    /// # Errors
    ///
    /// Returns an error if the default rule table fails to compile.
    pub fn try_default() -> Result<Self, regex::Error> {
        Ok(Self::new(IndentRules::try_default()?))
    }

    /// Scans `line` and pushes its frame onto `frames`.
    pub fn advance(&self, line: &str, frames: &mut Vec<IndentFrame>) {
        let frame = self.frame_for(line, frames);
        frames.push(frame);
    }

    /// Frames for each of `lines`, starting from an empty stack.
    pub fn scan<'a>(&self, lines: impl IntoIterator<Item = &'a str>) -> Vec<IndentFrame> {
        let mut frames = vec![];
        for line in lines {
            self.advance(line, &mut frames);
        }
        frames
    }

    /// Indent units for the line at `index`. Out of range lines get 0.
    #[must_use]
    pub fn indent_for(frames: &[IndentFrame], index: usize) -> usize {
        frames.get(index).map_or(0, IndentFrame::depth)
    }

    /// Indices of the lines that opened a block which is still open at the end of
    /// `frames`, innermost last. Each frame first closes the blocks whose base depth it
    /// has dropped back to, then opens one if its level rose.
    #[must_use]
    pub fn open_blocks(frames: &[IndentFrame]) -> Vec<usize> {
        let mut stack: Vec<(usize, isize)> = vec![];
        let mut prev_level = 0;
        for (index, frame) in frames.iter().enumerate() {
            while stack.last().is_some_and(|&(_, base)| base >= frame.level) {
                stack.pop();
            }
            if frame.level > prev_level {
                stack.push((index, prev_level));
            }
            prev_level = frame.level;
        }
        stack.into_iter().map(|(index, _)| index).collect()
    }

    /// `true` when every block opened in `frames` has been closed, and the last line
    /// leaves the running depth at the outermost level.
    #[must_use]
    pub fn is_submit_ready(frames: &[IndentFrame]) -> bool {
        Self::open_blocks(frames).is_empty() && frames.last().is_none_or(|it| it.level <= 0)
    }

    fn frame_for(&self, line: &str, frames: &[IndentFrame]) -> IndentFrame {
        let inherited = frames.last().map_or(0, |it| it.level);
        let mut running = inherited;
        let mut line_depth = None;
        let mut kind = None;
        // Bases of blocks opened earlier on this same line.
        let mut same_line_bases: SmallVec<[isize; 4]> = SmallVec::new();
        let mut is_first_token = true;

        let mut rest = line.trim();
        while let Some(start) = rest.find(|it: char| !it.is_whitespace()) {
            rest = &rest[start..];
            if rest.starts_with('#') {
                break;
            }

            let Some((rule_kind, len)) = self.rules.longest_match(rest) else {
                rest = &rest[skip_token(rest)..];
                is_first_token = false;
                continue;
            };

            let depth = match rule_kind {
                FrameKind::OpenDouble | FrameKind::OpenSingle => {
                    same_line_bases.push(running);
                    running += if rule_kind == FrameKind::OpenDouble { 2 } else { 1 };
                    inherited
                }
                FrameKind::SoftUnindent => inherited - 1,
                FrameKind::Sharing => {
                    running -= 1;
                    inherited - 2
                }
                FrameKind::CloseParen => {
                    same_line_bases.pop();
                    running -= 1;
                    running
                }
                FrameKind::End => {
                    running = match same_line_bases.pop() {
                        Some(base) => base,
                        None => enclosing_level(frames, running),
                    };
                    running
                }
            };

            if is_first_token {
                line_depth = Some(depth);
            }
            kind.get_or_insert(rule_kind);
            is_first_token = false;
            rest = &rest[len..];
        }

        let line_depth = line_depth.unwrap_or(inherited);
        IndentFrame {
            kind,
            level_offset: line_depth - running,
            level: running,
        }
    }
}

/// Walks back to the nearest frame that sits shallower than `running`. That is the
/// depth outside the innermost open block. When there is none, the outermost level.
fn enclosing_level(frames: &[IndentFrame], running: isize) -> isize {
    frames
        .iter()
        .rev()
        .map(|it| it.level)
        .find(|&level| level < running)
        .unwrap_or(0)
}

/// Byte length of the token that starts `input`, which is one that no rule matched.
fn skip_token(input: &str) -> usize {
    let mut chars = input.char_indices();
    let Some((_, first)) = chars.next() else {
        return 0;
    };

    if is_identifier_char(first) {
        return input
            .find(|it: char| !is_identifier_char(it))
            .unwrap_or(input.len());
    }

    if first == '"' || first == '\'' {
        let mut escaped = false;
        for (index, ch) in chars {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                _ if ch == first => return index + ch.len_utf8(),
                _ => {}
            }
        }
        return input.len();
    }

    first.len_utf8()
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn tracker() -> IndentTracker { IndentTracker::try_default().unwrap() }

    fn depths(source: &str) -> Vec<usize> {
        let frames = tracker().scan(source.lines());
        (0..frames.len())
            .map(|index| IndentTracker::indent_for(&frames, index))
            .collect()
    }

    #[test]
    fn test_balanced_block_is_submit_ready() {
        let tracker = tracker();
        let mut frames = vec![];

        tracker.advance("fun f(x):", &mut frames);
        assert!(!IndentTracker::is_submit_ready(&frames));
        pretty_assertions::assert_eq!(IndentTracker::open_blocks(&frames), vec![0]);

        tracker.advance("x + 1", &mut frames);
        assert!(!IndentTracker::is_submit_ready(&frames));

        tracker.advance("end", &mut frames);
        assert!(IndentTracker::open_blocks(&frames).is_empty());
        assert!(IndentTracker::is_submit_ready(&frames));
    }

    #[test_case("fun f():", 1 ; "single open")]
    #[test_case("if x:", 1 ; "if opens one")]
    #[test_case("data D:", 2 ; "double open")]
    #[test_case("cases(List) l:", 2 ; "cases with parens")]
    fn test_opener_deepens_following_line(opener: &str, units: usize) {
        let tracker = tracker();
        let mut frames = vec![];
        tracker.advance("x = 1", &mut frames);
        let before = IndentTracker::indent_for(&frames, 0);

        tracker.advance(opener, &mut frames);
        pretty_assertions::assert_eq!(IndentTracker::indent_for(&frames, 1), before);

        tracker.advance("", &mut frames);
        pretty_assertions::assert_eq!(IndentTracker::indent_for(&frames, 2), before + units);
    }

    #[test]
    fn test_nested_blocks() {
        let source = "fun f(x):\nif x:\n1\nelse if y:\n2\nelse:\n3\nend\nend";
        pretty_assertions::assert_eq!(depths(source), vec![0, 1, 2, 1, 2, 1, 2, 1, 0]);
        let frames = tracker().scan(source.lines());
        assert!(IndentTracker::is_submit_ready(&frames));
    }

    #[test]
    fn test_data_with_sharing() {
        let source = "data Color:\n| red\n| green\nsharing:\nmethod m(self): 1 end\nend";
        pretty_assertions::assert_eq!(depths(source), vec![0, 1, 1, 0, 1, 0]);
        let frames = tracker().scan(source.lines());
        assert!(IndentTracker::is_submit_ready(&frames));
    }

    #[test]
    fn test_where_block() {
        let source = "fun f(x):\nx\nwhere:\nf(1) is 1\nend";
        pretty_assertions::assert_eq!(depths(source), vec![0, 1, 0, 1, 0]);
    }

    #[test]
    fn test_open_and_end_on_same_line() {
        let source = "fun f(x): if x: 1 else: 2 end end\ny";
        pretty_assertions::assert_eq!(depths(source), vec![0, 0]);
        let frames = tracker().scan(source.lines());
        assert!(IndentTracker::is_submit_ready(&frames));
    }

    #[test]
    fn test_parens_across_lines() {
        let source = "x = f(1,\n2,\n)\ny";
        pretty_assertions::assert_eq!(depths(source), vec![0, 1, 0, 0]);
        let frames = tracker().scan(source.lines());
        assert!(IndentTracker::is_submit_ready(&frames));
    }

    #[test]
    fn test_keywords_in_strings_and_comments_are_ignored() {
        let frames = tracker().scan(["x = \"fun end (\" # if data"]);
        pretty_assertions::assert_eq!(frames[0].kind, None);
        assert!(IndentTracker::is_submit_ready(&frames));
    }

    #[test]
    fn test_unknown_text_changes_nothing() {
        let frames = tracker().scan(["fun f():", "@@ ~~ $$"]);
        pretty_assertions::assert_eq!(frames[1].level, frames[0].level);
        pretty_assertions::assert_eq!(IndentTracker::indent_for(&frames, 1), 1);
    }

    #[test]
    fn test_stray_end_clamps_at_zero() {
        let frames = tracker().scan(["end", ")"]);
        pretty_assertions::assert_eq!(IndentTracker::indent_for(&frames, 0), 0);
        pretty_assertions::assert_eq!(IndentTracker::indent_for(&frames, 1), 0);
        pretty_assertions::assert_eq!(frames[1].level, -1);
    }

    #[test]
    fn test_empty_frames() {
        assert!(IndentTracker::is_submit_ready(&[]));
        pretty_assertions::assert_eq!(IndentTracker::indent_for(&[], 3), 0);
    }
}
