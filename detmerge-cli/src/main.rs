use clap::Parser;
use detmerge::render::draw::{draw_annotations, frame_of, load_rgb_image, save_image};
use detmerge::{
    plan_annotations, ApproxMetrics, ColorTable, Detection, DetectorThresholds, MergeConfig,
    MergeOutcome, ModelRegistry, ModelSelector, RenderStyle, ReplayDetector, Rgb, SourceReport,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Merge detections from several models and annotate the image")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
struct ModelSourceJson {
    detections_path: String,
    #[serde(default = "default_confidence")]
    confidence: f32,
    #[serde(default = "default_detector_iou")]
    iou: f32,
}

fn default_confidence() -> f32 {
    DetectorThresholds::default().confidence
}

fn default_detector_iou() -> f32 {
    DetectorThresholds::default().iou
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct MergeConfigJson {
    iou_threshold: f32,
}

impl Default for MergeConfigJson {
    fn default() -> Self {
        Self {
            iou_threshold: MergeConfig::default().iou_threshold,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RenderConfigJson {
    outline_width: u32,
    base_font_size: u32,
    default_color: Rgb,
    class_colors: Option<BTreeMap<String, Rgb>>,
}

impl Default for RenderConfigJson {
    fn default() -> Self {
        let style = RenderStyle::default();
        Self {
            outline_width: style.outline_width,
            base_font_size: style.base_font_size,
            default_color: Rgb::WHITE,
            class_colors: None,
        }
    }
}

impl RenderConfigJson {
    fn color_table(&self) -> ColorTable {
        match &self.class_colors {
            Some(colors) => {
                let mut table = ColorTable::new(self.default_color);
                for (label, color) in colors {
                    table.insert(label.clone(), *color);
                }
                table
            }
            None => ColorTable::fish_disease().with_default_color(self.default_color),
        }
    }

    fn style(&self) -> RenderStyle {
        RenderStyle {
            outline_width: self.outline_width,
            base_font_size: self.base_font_size,
            ..RenderStyle::default()
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    image_path: String,
    output_path: Option<String>,
    report_path: Option<String>,
    model: String,
    models: BTreeMap<String, ModelSourceJson>,
    merge: MergeConfigJson,
    render: RenderConfigJson,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            image_path: String::new(),
            output_path: None,
            report_path: None,
            model: String::new(),
            models: BTreeMap::new(),
            merge: MergeConfigJson::default(),
            render: RenderConfigJson::default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Report {
    model: String,
    sources: Vec<SourceReport>,
    merge: Option<MergeOutcome>,
    detections: Vec<Detection>,
}

/// Loads the configured sources named by `selector`; names without a source
/// are left for `resolve` to report.
fn build_registry(
    selector: &ModelSelector,
    models: &BTreeMap<String, ModelSourceJson>,
) -> Result<ModelRegistry, Box<dyn std::error::Error>> {
    let mut registry = ModelRegistry::new();
    for name in selector.names() {
        let Some(source) = models.get(name) else {
            continue;
        };
        let thresholds = DetectorThresholds {
            confidence: source.confidence,
            iou: source.iou,
        };
        let detector =
            ReplayDetector::from_json_file(name.clone(), &source.detections_path, thresholds)?;
        registry.register(detector);
    }
    Ok(registry)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env()
                    .add_directive("detmerge=info".parse()?)
                    .add_directive("detmerge_cli=info".parse()?),
            )
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.image_path.is_empty() || config.model.is_empty() {
        return Err("image_path and model must be set in the config".into());
    }

    let selector = ModelSelector::parse(&config.model)?;
    let registry = build_registry(&selector, &config.models)?;
    let ensemble = registry.resolve(
        &selector,
        MergeConfig {
            iou_threshold: config.merge.iou_threshold,
            ..MergeConfig::default()
        },
    )?;

    let mut image = load_rgb_image(&config.image_path)?;
    let frame = frame_of(&image);
    let output = ensemble.run(&frame)?;
    match &output.outcome {
        Some(outcome) => info!(
            model = %selector,
            candidates = outcome.candidates,
            kept = outcome.kept,
            suppressed = outcome.suppressed,
            "merged detections"
        ),
        None => info!(
            model = %selector,
            kept = output.detections.len(),
            "single model, nothing to merge"
        ),
    }

    if let Some(path) = &config.output_path {
        let annotations = plan_annotations(
            &output.detections,
            frame,
            &config.render.color_table(),
            &config.render.style(),
            &ApproxMetrics::default(),
        );
        draw_annotations(&mut image, &annotations);
        save_image(&image, path)?;
        info!(path = path.as_str(), annotations = annotations.len(), "wrote annotated image");
    }

    let report = Report {
        model: selector.to_string(),
        sources: output.sources,
        merge: output.outcome,
        detections: output.detections,
    };
    let json = serde_json::to_string_pretty(&report)?;

    match config.report_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
