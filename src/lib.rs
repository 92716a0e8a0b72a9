//! # nebel
//!
//! A small static generator for a personal blog. Markdown posts with a
//! front matter header go in, a plain HTML site with an Atom feed and one
//! social preview ("OG") image per post comes out.
//!
//! # Pipeline
//!
//! ```text
//! posts/*.markdown ─► post::load_posts ─► sort, permalink, prev/next
//!                                              │
//!        ┌─────────────────┬───────────────────┼──────────────────┐
//!        ▼                 ▼                   ▼                  ▼
//!   post pages        index.html           atom.xml        og::generate_og_image
//!                                                               (cached)
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`post`] | Front matter, date resolution, markdown, ordering and permalinks |
//! | [`generate`] | The build: pages, index, feed, static copy, OG images |
//! | [`og`] | Title fitting and rasterization of the 1200×630 preview image |
//! | [`cache`] | Content-addressed cache so unchanged OG images are not re-rendered |
//! | [`config`] | `config.toml` loading, validation, merging over stock defaults |
//! | [`naming`] | `YYYY-MM-DD-title` post filename convention |
//! | [`new`] | `nebel new`: scaffold a post file |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Maud Over Template Engines
//!
//! HTML and the Atom feed are generated with [Maud](https://maud.lambda.xyz/),
//! a compile-time HTML macro system. Malformed markup is a build error and
//! interpolation is escaped by default.
//!
//! ## Fitting Titles Instead of Truncating Them
//!
//! Preview cards are seen at thumbnail size, so the title should be as large
//! as possible. The [`og`] engine walks a fixed ladder of font sizes and takes
//! the first that fits on one line, falling back to balanced multi-line
//! wrapping at the smallest size. Line breaks avoid splitting kanji compounds
//! and prefer the position right after a Japanese particle.
//!
//! ## Pure-Rust Rasterization
//!
//! Glyphs are rasterized with `fontdue` and composited into an `image`
//! buffer without touching system fonts or C libraries. The same font bytes
//! give the same PNG everywhere, which is also what makes the OG cache sound.
//!
//! ## Positional Permalinks
//!
//! A post lives at `/blog/YYYY/MM/DD/N`, where `N` is its position among
//! that day's posts. URLs stay short and date-readable without slugs. The
//! cost is that inserting an earlier post on the same day shifts `N`; the
//! OG cache copies the affected images to their new slots instead of
//! re-rendering them.

pub mod cache;
pub mod config;
pub mod generate;
pub mod naming;
pub mod new;
pub mod og;
pub mod output;
pub mod post;

#[cfg(test)]
pub(crate) mod test_helpers;
