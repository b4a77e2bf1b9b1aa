//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Render grayscale images as ASCII-art mosaics
#[derive(Parser, Debug)]
#[command(name = "ascii-mosaic")]
#[command(version, about = "Render images as ASCII-art mosaics", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Config file path
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render an image as ASCII art
    Render(RenderArgs),
    /// Show glyph count, block size and tree shape of a model
    ModelInfo {
        /// Model blob (default: configured model, else built-in)
        path: Option<PathBuf>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Args, Debug, Clone, PartialEq, Eq)]
pub struct RenderArgs {
    /// Image to render (any format the image decoder understands)
    pub image: PathBuf,

    /// Trained model blob (overrides config)
    #[arg(long, short)]
    pub model: Option<PathBuf>,

    /// Skip local contrast equalization
    #[arg(long)]
    pub no_optimize: bool,

    /// Write the text to a file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Save the glyph mosaic as an image
    #[arg(long, short)]
    pub preview: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_args(args: Args) -> RenderArgs {
        match args.command {
            Command::Render(render) => render,
            other => panic!("Expected Render subcommand, got {:?}", other),
        }
    }

    #[test]
    fn test_render_defaults() {
        let args = Args::parse_from(["ascii-mosaic", "render", "photo.png"]);
        assert!(args.config.is_none());
        let render = render_args(args);
        assert_eq!(render.image, PathBuf::from("photo.png"));
        assert!(render.model.is_none());
        assert!(!render.no_optimize);
        assert!(render.output.is_none());
        assert!(render.preview.is_none());
    }

    #[test]
    fn test_render_options() {
        let args = Args::parse_from([
            "ascii-mosaic",
            "render",
            "photo.png",
            "--model",
            "/tmp/model.bin",
            "--no-optimize",
            "-o",
            "out.txt",
            "--preview",
            "out.png",
        ]);
        let render = render_args(args);
        assert_eq!(render.model, Some(PathBuf::from("/tmp/model.bin")));
        assert!(render.no_optimize);
        assert_eq!(render.output, Some(PathBuf::from("out.txt")));
        assert_eq!(render.preview, Some(PathBuf::from("out.png")));
    }

    #[test]
    fn test_global_config_option() {
        let args = Args::parse_from(["ascii-mosaic", "render", "a.png", "-c", "/tmp/c.toml"]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/c.toml")));

        let args = Args::parse_from(["ascii-mosaic", "--config", "/tmp/c.toml", "config", "show"]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/c.toml")));
    }

    #[test]
    fn test_render_requires_image() {
        assert!(Args::try_parse_from(["ascii-mosaic", "render"]).is_err());
    }

    #[test]
    fn test_model_info_subcommand() {
        let args = Args::parse_from(["ascii-mosaic", "model-info"]);
        assert!(matches!(args.command, Command::ModelInfo { path: None }));

        let args = Args::parse_from(["ascii-mosaic", "model-info", "m.bin"]);
        match args.command {
            Command::ModelInfo { path } => assert_eq!(path, Some(PathBuf::from("m.bin"))),
            _ => panic!("Expected ModelInfo subcommand"),
        }
    }

    #[test]
    fn test_config_subcommands() {
        let args = Args::parse_from(["ascii-mosaic", "config", "show"]);
        assert!(matches!(
            args.command,
            Command::Config {
                action: ConfigAction::Show
            }
        ));

        let args = Args::parse_from(["ascii-mosaic", "config", "init"]);
        assert!(matches!(
            args.command,
            Command::Config {
                action: ConfigAction::Init
            }
        ));
    }
}
