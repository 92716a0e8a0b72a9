use clap::{Parser, Subcommand};
use nebel::{config, generate, new, output};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "nebel")]
#[command(about = "Static blog generator with social preview images")]
#[command(long_about = "\
Static blog generator with social preview images

Posts are markdown files with a small front matter header. Every build
renders each post to /blog/YYYY/MM/DD/N/, the latest post to the home page,
an Atom feed, and a 1200x630 ogp.png per post with the title fitted to the
card.

Site structure:

  .
  ├── config.toml                        # Optional, see `nebel gen-config`
  ├── posts/
  │   └── 2026-01-27-hello.markdown      # ---\\ntitle: ...\\ndate: ...\\n---
  ├── static/                            # Copied verbatim into the output
  ├── assets/
  │   ├── fonts/NotoSansCJKjp-Bold.otf   # OG image font
  │   └── avatar.png                     # OG image footer avatar
  └── public/                            # Output

Set RUST_LOG=debug to see layout and cache decisions.")]
#[command(version = version_string())]
struct Cli {
    /// Site root directory
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new post stamped with the current time
    New {
        /// Post title
        title: String,
    },
    /// Build the site into the output directory
    Generate {
        /// Ignore the OG image cache and re-render every image
        #[arg(long)]
        no_cache: bool,
        /// Skip OG image generation entirely
        #[arg(long)]
        no_og: bool,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::New { title } => {
            let site_config = config::load_config(&cli.root)?;
            let path = new::create_post_now(&cli.root, &site_config, &title)?;
            output::print_new_post_output(&path, &cli.root);
        }
        Command::Generate { no_cache, no_og } => {
            let site_config = config::load_config(&cli.root)?;
            let options = generate::GenerateOptions {
                use_cache: !no_cache,
                og_images: !no_og,
            };
            let report = generate::generate(&cli.root, &site_config, &options)?;
            output::print_generate_output(&report, &cli.root);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
