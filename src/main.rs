use std::io::{self, IsTerminal, Read};

use anyhow::Result;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "reader-overlay-rust",
    version,
    about = "Compute word highlight regions for a rendered page"
)]
struct Cli {
    /// Page JSON (viewport, glyph runs, words). Reads stdin when omitted
    #[arg(short = 'd', long = "data")]
    data: Option<String>,

    /// Reading direction override: auto, horizontal, vertical
    #[arg(short = 'D', long = "direction")]
    direction: Option<String>,

    /// Print the furigana-filtered base text (tokenizer input) and exit
    #[arg(long = "base-text")]
    base_text: bool,

    /// Pretty-print the region JSON
    #[arg(long = "pretty")]
    pretty: bool,

    /// Rendered page image used as the debug overlay background
    #[arg(long = "image", requires = "debug_overlay")]
    image: Option<String>,

    /// Write debug overlay PNG and region JSON
    #[arg(long = "debug-overlay")]
    debug_overlay: bool,

    /// Read extra settings from a local TOML file
    #[arg(short = 'r', long = "read-settings")]
    read_settings: Option<String>,

    /// Enable verbose logging
    #[arg(long = "verbose")]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    reader_overlay_rust::logging::init(cli.verbose)?;

    let input = if cli.data.is_none() && !io::stdin().is_terminal() {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Some(buffer)
    } else {
        None
    };

    let config = reader_overlay_rust::Config {
        data: cli.data,
        settings_path: cli.read_settings,
        direction: cli.direction,
        base_text: cli.base_text,
        pretty: cli.pretty,
        image: cli.image,
        debug_overlay: cli.debug_overlay,
    };
    let output = reader_overlay_rust::run(config, input)?;
    println!("{}", output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_requires_debug_overlay() {
        let err = Cli::try_parse_from(["reader-overlay-rust", "--image", "page.png"])
            .expect_err("missing --debug-overlay");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
        let cli = Cli::try_parse_from([
            "reader-overlay-rust",
            "--image",
            "page.png",
            "--debug-overlay",
        ])
        .expect("cli");
        assert!(cli.debug_overlay);
        assert_eq!(cli.image.as_deref(), Some("page.png"));
    }
}
