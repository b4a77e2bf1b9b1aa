//! Subcommand handlers for render, model-info and config actions.

use std::io::Write;
use std::path::{Path, PathBuf};

use super::args::{ConfigAction, RenderArgs};
use crate::config::{default_path, Config, ConfigError, DEFAULT_CONFIG_TOML};
use crate::image_io::{load_grayscale, save_preview};
use crate::model::{builtin_blob, fingerprint, FormatError, Model, TreeNode};
use crate::mosaic::{RenderContext, RenderError};

/// Errors surfaced to the command line.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Failed to read model '{}': {source}", .path.display())]
    ModelRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid model '{label}': {source}")]
    Model { label: String, source: FormatError },

    #[error("Failed to load image '{}': {source}", .path.display())]
    Image {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to save preview '{}': {source}", .path.display())]
    Preview {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Render failed: {0}")]
    Render(#[from] RenderError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Config file already exists: {}", .0.display())]
    ConfigExists(PathBuf),

    #[error("Failed to serialize config: {0}")]
    ConfigFormat(#[from] toml::ser::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Raw model bytes plus a label for messages.
struct ModelSource {
    label: String,
    blob: Option<Vec<u8>>,
}

impl ModelSource {
    /// Read the model at `path`, or select the built-in model.
    fn load(path: Option<&Path>) -> Result<Self, CliError> {
        match path {
            Some(path) => {
                let blob = std::fs::read(path).map_err(|source| CliError::ModelRead {
                    path: path.to_path_buf(),
                    source,
                })?;
                Ok(Self {
                    label: path.display().to_string(),
                    blob: Some(blob),
                })
            }
            None => Ok(Self {
                label: "built-in".to_string(),
                blob: None,
            }),
        }
    }

    fn bytes(&self) -> &[u8] {
        match &self.blob {
            Some(blob) => blob,
            None => builtin_blob(),
        }
    }

    fn parse(&self) -> Result<Model<'_>, CliError> {
        Model::parse(self.bytes()).map_err(|source| CliError::Model {
            label: self.label.clone(),
            source,
        })
    }
}

/// Render an image and write the text to `--output` or `out`.
pub fn run_render(args: &RenderArgs, config: &Config, out: &mut impl Write) -> Result<(), CliError> {
    let model_path = args.model.as_deref().or(config.model.path.as_deref());
    let source = ModelSource::load(model_path)?;
    let context = RenderContext::new(source.parse()?, config.render.options())?;

    let mut image = load_grayscale(&args.image).map_err(|source| CliError::Image {
        path: args.image.clone(),
        source,
    })?;

    let optimize = config.render.optimize && !args.no_optimize;
    let (text, rendered) =
        context.render_to_string(&mut image.pixels, image.width, image.height, optimize)?;

    log::info!(
        "Rendered {} as {}x{} glyphs with the {} model",
        args.image.display(),
        rendered.indices.cols(),
        rendered.indices.rows(),
        source.label
    );

    match &args.output {
        Some(path) => std::fs::write(path, &text).map_err(|source| CliError::Write {
            path: path.clone(),
            source,
        })?,
        None => out.write_all(text.as_bytes())?,
    }

    if let Some(path) = &args.preview {
        save_preview(path, &image).map_err(|source| CliError::Preview {
            path: path.clone(),
            source,
        })?;
    }

    Ok(())
}

/// Print a summary of the selected model.
pub fn model_info(path: Option<&Path>, config: &Config, out: &mut impl Write) -> Result<(), CliError> {
    let source = ModelSource::load(path.or(config.model.path.as_deref()))?;
    let model = source.parse()?;

    writeln!(out, "Model: {}", source.label)?;
    writeln!(out, "  Glyphs: {}", model.glyph_count())?;
    writeln!(
        out,
        "  Block size: {}x{} (rows x cols)",
        model.block_rows(),
        model.block_cols()
    )?;
    match model.tree() {
        Some(tree) => {
            let leaves = tree.nodes().iter().filter(|n| n.is_leaf()).count();
            let splits = tree
                .nodes()
                .iter()
                .filter(|n| matches!(n, TreeNode::Split { .. }))
                .count();
            writeln!(
                out,
                "  Tree: depth {}, {} nodes ({} splits, {} leaves)",
                tree.depth(),
                tree.len(),
                splits,
                leaves
            )?;
        }
        None => writeln!(out, "  Tree: none (every block renders glyph 0)")?,
    }
    writeln!(out, "  SHA-256: {}", fingerprint(source.bytes()))?;
    Ok(())
}

/// Handle config subcommand actions.
pub fn handle_config_action(
    action: &ConfigAction,
    path: Option<&Path>,
    config: &Config,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(default_path);

    match action {
        ConfigAction::Show => {
            writeln!(out, "Current configuration:")?;
            writeln!(out)?;
            write!(out, "{}", config.to_toml()?)?;
            writeln!(out)?;
            if config_path.exists() {
                writeln!(out, "Config file: {} (exists)", config_path.display())?;
            } else {
                writeln!(out, "Config file: {} (not found)", config_path.display())?;
            }
        }
        ConfigAction::Init => {
            if config_path.exists() {
                return Err(CliError::ConfigExists(config_path));
            }

            // Create parent directories if needed
            if let Some(parent) = config_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&config_path, DEFAULT_CONFIG_TOML).map_err(|source| {
                CliError::Write {
                    path: config_path.clone(),
                    source,
                }
            })?;

            writeln!(out, "Created config file: {}", config_path.display())?;
        }
    }
    Ok(())
}
