//! Site generation.
//!
//! Reads the posts directory and writes the finished site:
//!
//! ```text
//! public/
//! ├── index.html                 # Latest post, index layout
//! ├── atom.xml                   # Newest `feed.entries` posts, newest first
//! ├── .og-cache.json             # OG image cache manifest
//! ├── blog/
//! │   └── 2026/01/27/
//! │       ├── 1/
//! │       │   ├── index.html     # Post page
//! │       │   └── ogp.png        # Social preview image
//! │       └── 2/
//! │           └── ...
//! └── css/style.css              # Everything under static/ is copied as is
//! ```
//!
//! Posts are processed oldest first, so `/blog/2026/01/27/1` is the first
//! post of that day.
//!
//! ## HTML Generation
//!
//! Pages and the feed are [maud](https://maud.lambda.xyz/) templates: checked
//! at compile time, escaped by default. Post bodies are inserted pre-rendered
//! from markdown.

use crate::cache::{self, CacheManifest, CacheStats};
use crate::config::{ConfigError, SiteConfig};
use crate::og::params::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::og::{self, OG_IMAGE_FILENAME, OgAssets, OgError};
use crate::post::{self, Post, PostError, PostLink};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Post error: {0}")]
    Post(#[from] PostError),
    #[error("OG image error: {0}")]
    Og(#[from] OgError),
    #[error("Static copy error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("no posts found in {0}")]
    NoPosts(PathBuf),
}

#[derive(Debug, Clone, Copy)]
pub struct GenerateOptions {
    /// Reuse OG images whose inputs are unchanged.
    pub use_cache: bool,
    /// Render OG images at all (also requires `og.enabled`).
    pub og_images: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            og_images: true,
        }
    }
}

/// How a post's OG image was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OgStatus {
    Cached,
    Copied,
    Rendered,
}

#[derive(Debug, Clone)]
pub struct PostReport {
    pub title: String,
    pub permalink: String,
    pub source: PathBuf,
    pub og: Option<OgStatus>,
}

/// What one build wrote, for the CLI summary.
#[derive(Debug)]
pub struct GenerateReport {
    pub output_dir: PathBuf,
    pub posts: Vec<PostReport>,
    pub feed_entries: usize,
    pub static_files: usize,
    pub og_stats: Option<CacheStats>,
}

/// Build the site rooted at `root` into `root/<paths.output>`.
pub fn generate(
    root: &Path,
    config: &SiteConfig,
    options: &GenerateOptions,
) -> Result<GenerateReport, GenerateError> {
    let tz = config.timezone()?;
    let posts_dir = root.join(&config.paths.posts);
    let output_dir = root.join(&config.paths.output);

    // Load assets before writing anything so a missing font fails fast.
    let assets = if options.og_images && config.og.enabled {
        Some(OgAssets::load(
            &root.join(&config.og.font),
            &root.join(&config.og.avatar),
        )?)
    } else {
        None
    };

    let posts = post::load_posts(&posts_dir, tz)?;
    let Some(latest) = posts.last() else {
        return Err(GenerateError::NoPosts(posts_dir));
    };
    info!(count = posts.len(), "loaded posts");

    fs::create_dir_all(&output_dir)?;
    let og_enabled = assets.is_some();

    for post in &posts {
        let dir = post.output_dir(&output_dir);
        fs::create_dir_all(&dir)?;
        let page = render_post_page(config, post, og_enabled);
        fs::write(dir.join("index.html"), page.into_string())?;
        debug!(permalink = %post.permalink, "wrote post page");
    }

    let index = render_index_page(config, latest);
    fs::write(output_dir.join("index.html"), index.into_string())?;

    let feed_posts: Vec<&Post> = posts.iter().rev().take(config.feed.entries).collect();
    let feed = render_atom(config, &feed_posts);
    fs::write(output_dir.join("atom.xml"), feed.into_string())?;

    let static_files = copy_static(&root.join(&config.paths.static_dir), &output_dir)?;

    let (og_statuses, og_stats) = match &assets {
        Some(assets) => {
            let (statuses, stats) =
                render_og_images(&posts, assets, config.og_label(), &output_dir, options.use_cache)?;
            (statuses.into_iter().map(Some).collect(), Some(stats))
        }
        None => (vec![None; posts.len()], None),
    };

    let reports = posts
        .iter()
        .zip(og_statuses)
        .map(|(post, og)| PostReport {
            title: post.title.clone(),
            permalink: post.permalink.clone(),
            source: post.source.clone(),
            og,
        })
        .collect();

    Ok(GenerateReport {
        output_dir,
        posts: reports,
        feed_entries: feed_posts.len(),
        static_files,
        og_stats,
    })
}

/// Copy `src` recursively into `dst`. A missing `src` copies nothing.
fn copy_static(src: &Path, dst: &Path) -> Result<usize, GenerateError> {
    if !src.is_dir() {
        debug!(path = %src.display(), "no static directory");
        return Ok(0);
    }
    let mut copied = 0;
    for entry in WalkDir::new(src).min_depth(1) {
        let entry = entry?;
        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// What has to happen to produce one post's card.
#[derive(Debug, Clone, PartialEq, Eq)]
enum CardPlan {
    Cached,
    /// An identical card exists at this other path.
    Copy(String),
    Render,
}

#[derive(Debug)]
struct CardJob {
    source_hash: String,
    relative: String,
    plan: CardPlan,
}

/// Decide for each post whether its card is cached, can be copied from
/// another path, or has to be rendered. Nothing is read or written here
/// beyond checking that cached files still exist.
fn plan_cards(
    posts: &[Post],
    manifest: &CacheManifest,
    label: &str,
    params_hash: &str,
    output_dir: &Path,
) -> Vec<CardJob> {
    posts
        .iter()
        .map(|post| {
            let source_hash = cache::hash_card_source(
                &post.title,
                &post.date.date_naive().format("%Y-%m-%d").to_string(),
                label,
            );
            let relative = format!(
                "{}/{}",
                post.permalink.trim_start_matches('/'),
                OG_IMAGE_FILENAME
            );
            let plan = match manifest.find_cached(&source_hash, params_hash, output_dir) {
                Some(stored) if stored == relative => CardPlan::Cached,
                Some(stored) => CardPlan::Copy(stored),
                None => CardPlan::Render,
            };
            CardJob {
                source_hash,
                relative,
                plan,
            }
        })
        .collect()
}

/// Produce `ogp.png` for every post, reusing cached images where possible.
///
/// Cached cards that moved are read before anything is written: a post
/// inserted earlier in a day shifts its neighbours' permalinks, and the
/// renders for the new slots would otherwise overwrite them.
fn render_og_images(
    posts: &[Post],
    assets: &OgAssets,
    label: &str,
    output_dir: &Path,
    use_cache: bool,
) -> Result<(Vec<OgStatus>, CacheStats), GenerateError> {
    let mut manifest = if use_cache {
        CacheManifest::load(output_dir)
    } else {
        CacheManifest::empty()
    };
    let params_hash = cache::hash_card_params(assets.fingerprint(), CANVAS_WIDTH, CANVAS_HEIGHT);
    let jobs = plan_cards(posts, &manifest, label, &params_hash, output_dir);

    let copies = jobs
        .iter()
        .map(|job| match &job.plan {
            CardPlan::Copy(from) => fs::read(output_dir.join(from)).map(Some),
            _ => Ok(None),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut stats = CacheStats::default();
    let mut statuses = Vec::with_capacity(posts.len());

    for ((post, job), bytes) in posts.iter().zip(jobs).zip(copies) {
        let dir = post.output_dir(output_dir);
        let status = match (job.plan, bytes) {
            (CardPlan::Cached, _) => {
                stats.hit();
                OgStatus::Cached
            }
            (CardPlan::Copy(_), Some(bytes)) => {
                fs::create_dir_all(&dir)?;
                fs::write(output_dir.join(&job.relative), bytes)?;
                stats.copy();
                OgStatus::Copied
            }
            (CardPlan::Copy(_) | CardPlan::Render, _) => {
                og::generate_og_image(assets, label, &post.title, post.date.date_naive(), &dir)?;
                stats.miss();
                OgStatus::Rendered
            }
        };
        debug!(permalink = %post.permalink, ?status, "OG image");
        manifest.insert(job.relative, job.source_hash, params_hash.clone());
        statuses.push(status);
    }

    manifest.save(output_dir)?;
    Ok((statuses, stats))
}

fn absolute_url(config: &SiteConfig, path: &str) -> String {
    format!("{}{}", config.site.base_url.trim_end_matches('/'), path)
}

// ============================================================================
// HTML Components
// ============================================================================

/// Open Graph metadata for one page.
struct PageMeta<'a> {
    title: &'a str,
    url: String,
    kind: &'a str,
    image: Option<String>,
}

/// Renders the base HTML document structure
fn base_document(config: &SiteConfig, page_title: &str, meta: &PageMeta, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="ja" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (page_title) }
                link rel="stylesheet" href=(config.site.stylesheet);
                link rel="alternate" type="application/atom+xml" title=(config.site.title) href="/atom.xml";
                meta property="og:title" content=(meta.title);
                meta property="og:type" content=(meta.kind);
                meta property="og:url" content=(meta.url);
                meta property="og:site_name" content=(config.site.title);
                @if let Some(image) = &meta.image {
                    meta property="og:image" content=(image);
                    meta name="twitter:card" content="summary_large_image";
                }
            }
            body {
                header.site-header {
                    a href="/" { (config.site.title) }
                }
                (content)
            }
        }
    }
}

fn post_article(post: &Post) -> Markup {
    html! {
        article.post {
            h1.post-title {
                a href={ (post.permalink) "/" } { (post.title) }
            }
            time.post-date datetime=(post.date.to_rfc3339()) {
                (post.date.format("%Y-%m-%d %H:%M").to_string())
            }
            div.post-body {
                (PreEscaped(&post.body_html))
            }
        }
    }
}

fn neighbour_nav(prev: Option<&PostLink>, next: Option<&PostLink>) -> Markup {
    html! {
        nav.post-nav {
            @if let Some(prev) = prev {
                a.prev href={ (prev.permalink) "/" } rel="prev" { "« " (prev.title) }
            }
            @if let Some(next) = next {
                a.next href={ (next.permalink) "/" } rel="next" { (next.title) " »" }
            }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders a post's own page at its permalink.
fn render_post_page(config: &SiteConfig, post: &Post, og_image: bool) -> Markup {
    let url = absolute_url(config, &format!("{}/", post.permalink));
    let meta = PageMeta {
        title: &post.title,
        image: og_image.then(|| format!("{url}{OG_IMAGE_FILENAME}")),
        url,
        kind: "article",
    };
    let page_title = format!("{} | {}", post.title, config.site.title);

    let content = html! {
        main.post-page {
            (post_article(post))
            (neighbour_nav(post.prev.as_ref(), post.next.as_ref()))
        }
    };
    base_document(config, &page_title, &meta, content)
}

/// Renders the home page: the latest post, with a link back through the
/// archive.
fn render_index_page(config: &SiteConfig, latest: &Post) -> Markup {
    let meta = PageMeta {
        title: &config.site.title,
        url: absolute_url(config, "/"),
        kind: "website",
        image: None,
    };
    let content = html! {
        main.index-page {
            (post_article(latest))
            (neighbour_nav(latest.prev.as_ref(), None))
        }
    };
    base_document(config, &config.site.title, &meta, content)
}

/// Renders the Atom feed for `posts`, which must be newest first.
fn render_atom(config: &SiteConfig, posts: &[&Post]) -> Markup {
    let home = absolute_url(config, "/");
    html! {
        (PreEscaped(r#"<?xml version="1.0" encoding="utf-8"?>"#))
        feed xmlns="http://www.w3.org/2005/Atom" {
            title { (config.site.title) }
            link href=(absolute_url(config, "/atom.xml")) rel="self" {}
            link href=(home) {}
            @if let Some(newest) = posts.first() {
                updated { (newest.date.to_rfc3339()) }
            }
            id { (home) }
            author {
                name { (config.site.author) }
            }
            @for post in posts {
                @let url = absolute_url(config, &format!("{}/", post.permalink));
                entry {
                    title { (post.title) }
                    link href=(url) {}
                    id { (url) }
                    updated { (post.date.to_rfc3339()) }
                    content type="html" { (post.body_html) }
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
