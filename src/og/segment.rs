//! Title segmentation.
//!
//! A title is cut into atomic [`Segments`]: every CJK character stands alone,
//! and every run of other non-space characters is one segment. Line breaks
//! are only ever placed between segments.
//!
//! Alongside each segment we keep a flag saying whether a literal space must
//! be put back in front of it when segments are joined into a line:
//!
//! ```text
//! "Rust 入門 guide"  →  ["Rust", "入", "門", "guide"]
//!                       [false,  false, false, false]
//! "Hello World"     →  ["Hello", "World"]
//!                       [false,   true]
//! ```
//!
//! Spaces in front of a CJK character are dropped, and a run that directly
//! follows a CJK character gets no space of its own. Joining all segments
//! therefore reproduces the title with whitespace runs collapsed to a single
//! space, minus any space that preceded a CJK character.

use super::script::is_cjk;
use std::ops::Range;

/// Ordered segments of a title plus their leading-space flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segments {
    texts: Vec<String>,
    space_before: Vec<bool>,
}

impl Segments {
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    pub fn space_before(&self) -> &[bool] {
        &self.space_before
    }

    pub fn text(&self, index: usize) -> &str {
        &self.texts[index]
    }

    /// Rebuild the line made of the segments in `range`.
    ///
    /// A space is inserted before a segment whose flag is set, unless it is
    /// the first segment of the line.
    pub fn join(&self, range: Range<usize>) -> String {
        let mut line = String::new();
        for i in range.clone() {
            if i > range.start && self.space_before[i] {
                line.push(' ');
            }
            line.push_str(&self.texts[i]);
        }
        line
    }

    pub fn join_all(&self) -> String {
        self.join(0..self.len())
    }

    /// Segments from `start` onward, with the new first flag cleared.
    pub fn tail(&self, start: usize) -> Segments {
        let mut tail = Segments {
            texts: self.texts[start..].to_vec(),
            space_before: self.space_before[start..].to_vec(),
        };
        if let Some(first) = tail.space_before.first_mut() {
            *first = false;
        }
        tail
    }

    fn push(&mut self, text: String, space_before: bool) {
        self.texts.push(text);
        self.space_before.push(space_before);
    }
}

/// Split a title into segments.
pub fn segment(title: &str) -> Segments {
    let mut segments = Segments::default();
    let mut run = String::new();
    let mut run_space = false;
    let mut pending_space = false;

    for c in title.chars() {
        if is_cjk(c) {
            flush_run(&mut segments, &mut run, run_space);
            segments.push(c.to_string(), false);
            pending_space = false;
        } else if c == ' ' {
            flush_run(&mut segments, &mut run, run_space);
            pending_space = true;
        } else {
            if run.is_empty() {
                run_space = pending_space;
                pending_space = false;
            }
            run.push(c);
        }
    }
    flush_run(&mut segments, &mut run, run_space);

    if let Some(first) = segments.space_before.first_mut() {
        *first = false;
    }
    segments
}

fn flush_run(segments: &mut Segments, run: &mut String, space_before: bool) {
    if !run.is_empty() {
        segments.push(std::mem::take(run), space_before);
    }
}
