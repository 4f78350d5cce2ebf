use clap::Parser;
use contourmatch::io::load_gray_image;
use contourmatch::{
    CorrelationMatcher, Detector, DetectorConfig, FoundTemplate, MatchConfig, PreprocessConfig,
    TemplateLibrary,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "ContourMatch CLI (JSON config driven)")]
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
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct PreprocessConfigJson {
    equalize_hist: bool,
    noise_filter: bool,
    canny_threshold: f32,
    blur: bool,
    adaptive_threshold_block_size: usize,
    adaptive_threshold_constant: f32,
    add_canny: bool,
}

impl Default for PreprocessConfigJson {
    fn default() -> Self {
        let cfg = PreprocessConfig::default();
        Self {
            equalize_hist: cfg.equalize_hist,
            noise_filter: cfg.noise_filter,
            canny_threshold: cfg.canny_threshold,
            blur: cfg.blur,
            adaptive_threshold_block_size: cfg.adaptive_threshold_block_size,
            adaptive_threshold_constant: cfg.adaptive_threshold_constant,
            add_canny: cfg.add_canny,
        }
    }
}

impl From<PreprocessConfigJson> for PreprocessConfig {
    fn from(value: PreprocessConfigJson) -> Self {
        Self {
            equalize_hist: value.equalize_hist,
            noise_filter: value.noise_filter,
            canny_threshold: value.canny_threshold,
            blur: value.blur,
            adaptive_threshold_block_size: value.adaptive_threshold_block_size,
            adaptive_threshold_constant: value.adaptive_threshold_constant,
            add_canny: value.add_canny,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DetectorConfigJson {
    preprocess: PreprocessConfigJson,
    filter_contours_by_size: bool,
    min_contour_length: usize,
    min_contour_area: f64,
    min_form_factor: f64,
    only_find_contours: bool,
    template_size: usize,
    parallel: bool,
}

impl Default for DetectorConfigJson {
    fn default() -> Self {
        let cfg = DetectorConfig::default();
        Self {
            preprocess: PreprocessConfigJson::default(),
            filter_contours_by_size: cfg.filter_contours_by_size,
            min_contour_length: cfg.min_contour_length,
            min_contour_area: cfg.min_contour_area,
            min_form_factor: cfg.min_form_factor,
            only_find_contours: cfg.only_find_contours,
            template_size: cfg.template_size,
            parallel: cfg.parallel,
        }
    }
}

impl From<DetectorConfigJson> for DetectorConfig {
    fn from(value: DetectorConfigJson) -> Self {
        Self {
            preprocess: value.preprocess.into(),
            filter_contours_by_size: value.filter_contours_by_size,
            min_contour_length: value.min_contour_length,
            min_contour_area: value.min_contour_area,
            min_form_factor: value.min_form_factor,
            only_find_contours: value.only_find_contours,
            template_size: value.template_size,
            parallel: value.parallel,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct MatchConfigJson {
    min_rate: f64,
    max_acf_deviation: f64,
    use_acf_prefilter: bool,
}

impl Default for MatchConfigJson {
    fn default() -> Self {
        let cfg = MatchConfig::default();
        Self {
            min_rate: cfg.min_rate,
            max_acf_deviation: cfg.max_acf_deviation,
            use_acf_prefilter: cfg.use_acf_prefilter,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TemplateEntry {
    name: String,
    path: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    frame_path: String,
    templates: Vec<TemplateEntry>,
    output_path: Option<String>,
    detector: DetectorConfigJson,
    #[serde(rename = "match")]
    match_cfg: MatchConfigJson,
}

#[derive(Debug, Serialize)]
struct RectRecord {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

#[derive(Debug, Serialize)]
struct DetectionRecord {
    template: String,
    contour_index: usize,
    rate: f64,
    angle_deg: f64,
    scale: f64,
    rect: RectRecord,
}

impl DetectionRecord {
    fn new(found: &FoundTemplate, library: &TemplateLibrary) -> Self {
        let rect = found.sample.bounding_rect();
        Self {
            template: library
                .get(found.template_index)
                .map(|t| t.name().to_string())
                .unwrap_or_default(),
            contour_index: found.sample.contour_index(),
            rate: found.rate,
            angle_deg: found.angle_deg,
            scale: found.scale,
            rect: RectRecord {
                x: rect.x,
                y: rect.y,
                width: rect.width,
                height: rect.height,
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    contours: usize,
    samples: usize,
    detections: Vec<DetectionRecord>,
}

/// Records the largest contour of each template image as a library entry.
fn build_library(
    templates: &[TemplateEntry],
    cfg: &DetectorConfig,
) -> Result<TemplateLibrary, Box<dyn std::error::Error>> {
    // No size test: the frame-area ceiling does not apply to cropped templates.
    let finder = Detector::new(DetectorConfig {
        only_find_contours: true,
        filter_contours_by_size: false,
        ..cfg.clone()
    })?;
    let scratch = RwLock::new(TemplateLibrary::new(cfg.template_size)?);
    let mut library = TemplateLibrary::new(cfg.template_size)?;

    for entry in templates {
        let image = load_gray_image(&entry.path)?;
        let out = finder.process_frame(image.view(), &scratch)?;
        let largest = out
            .detections
            .contours
            .iter()
            .filter(|c| c.point_count() >= cfg.min_contour_length)
            .max_by(|a, b| a.area().total_cmp(&b.area()))
            .ok_or_else(|| format!("no contour found in template '{}'", entry.name))?;
        library.add_contour(entry.name.clone(), largest)?;
        tracing::info!(name = %entry.name, points = largest.point_count(), "recorded template");
    }
    Ok(library)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive("contourmatch=info".parse()?),
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
    if config.frame_path.is_empty() {
        return Err("frame_path must be set in the config".into());
    }

    let detector_cfg: DetectorConfig = config.detector.into();
    let library = if detector_cfg.only_find_contours {
        TemplateLibrary::new(detector_cfg.template_size)?
    } else {
        if config.templates.is_empty() {
            return Err("at least one template is required unless only_find_contours is set".into());
        }
        build_library(&config.templates, &detector_cfg)?
    };

    let matcher = CorrelationMatcher::new().with_config(MatchConfig {
        min_rate: config.match_cfg.min_rate,
        max_acf_deviation: config.match_cfg.max_acf_deviation,
        use_acf_prefilter: config.match_cfg.use_acf_prefilter,
    });
    let detector = Detector::with_engine(detector_cfg, matcher)?;

    let frame = load_gray_image(&config.frame_path)?;
    let known = RwLock::new(library);
    let out = detector.process_frame(frame.view(), &known)?;

    let library = known.read().map_err(|_| "known templates lock poisoned")?;
    let output = Output {
        contours: out.detections.contours.len(),
        samples: out.detections.samples.len(),
        detections: out
            .detections
            .found
            .iter()
            .map(|f| DetectionRecord::new(f, &library))
            .collect(),
    };
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
