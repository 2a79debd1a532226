use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use satscope::data::{
    FileSource, FilterState, ObjectCategory, ObjectSource, TrackedObject, DEFAULT_MAX_VISIBLE,
    MIN_VISIBLE,
};
use satscope::propagation::{build_orbit, now_instant, Sgp4Propagator, DEFAULT_SAMPLES_PER_ORBIT};
use satscope::renderer::{InfoPanel, MarkerFrame, Scene, SceneSettings, DEFAULT_ANIMATION_SPEED};

/// Snapshot and filter options shared by every command
#[derive(Args, Debug, Clone)]
pub struct SceneArgs {
    /// Tracked-object snapshot (JSON, optionally .gz)
    #[arg(long, default_value = "data/tracked_objects.json")]
    pub snapshot: PathBuf,
    /// Visible categories (repeatable); all when omitted
    #[arg(long = "category", value_parser = parse_category)]
    pub categories: Vec<ObjectCategory>,
    /// Case-insensitive name / NORAD ID filter
    #[arg(long, default_value = "")]
    pub search: String,
    /// Maximum number of rendered objects
    #[arg(long)]
    pub max_visible: Option<usize>,
    /// Samples per orbit
    #[arg(long, default_value_t = DEFAULT_SAMPLES_PER_ORBIT)]
    pub samples: usize,
    /// Build orbit sets on a worker thread
    #[arg(long)]
    pub background: bool,
}

#[derive(Args, Debug, Clone)]
pub struct OrbitsArgs {
    #[command(flatten)]
    pub scene: SceneArgs,
    /// Output JSON file path (stdout when omitted)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct InfoArgs {
    /// Tracked-object snapshot (JSON, optionally .gz)
    #[arg(long, default_value = "data/tracked_objects.json")]
    pub snapshot: PathBuf,
    /// NORAD catalog number of the object to inspect
    pub norad_id: u32,
    /// Print the panel as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct FramesArgs {
    #[command(flatten)]
    pub scene: SceneArgs,
    /// Animation speed in phase-units per second
    #[arg(long, default_value_t = DEFAULT_ANIMATION_SPEED)]
    pub speed: f64,
    /// Elapsed seconds of the first frame
    #[arg(long, default_value_t = 0.0)]
    pub start: f64,
    /// Seconds between frames
    #[arg(long, default_value_t = 1.0)]
    pub step: f64,
    /// Number of frames
    #[arg(long, default_value_t = 10)]
    pub count: usize,
    /// NORAD ID to select before animating
    #[arg(long)]
    pub select: Option<u32>,
    /// Hide the orbit path arcs
    #[arg(long)]
    pub hide_paths: bool,
    /// Label every marker
    #[arg(long)]
    pub all_labels: bool,
    /// Output JSON file path (stdout when omitted)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    /// Tracked-object snapshot (JSON, optionally .gz)
    #[arg(long, default_value = "data/tracked_objects.json")]
    pub snapshot: PathBuf,
}

fn parse_category(label: &str) -> Result<ObjectCategory, String> {
    Ok(ObjectCategory::from_label(label))
}

#[derive(Debug, Serialize)]
struct FrameDump {
    elapsed_seconds: f64,
    markers: Vec<MarkerFrame>,
}

fn open_scene(args: &SceneArgs) -> Result<Scene<Sgp4Propagator>> {
    if args.samples == 0 {
        return Err(anyhow!("samples must be > 0"));
    }

    let settings = SceneSettings {
        samples_per_orbit: args.samples,
        max_visible: args.max_visible.map_or(DEFAULT_MAX_VISIBLE, |max| max.max(MIN_VISIBLE)),
        background_builds: args.background,
        ..SceneSettings::default()
    };
    let mut scene = Scene::new(Sgp4Propagator::new(), settings);

    if !args.categories.is_empty() {
        scene.select_no_categories();
        for &category in &args.categories {
            if !scene.filter().is_category_visible(category) {
                scene.toggle_category(category);
            }
        }
    }
    scene.set_search(args.search.as_str());

    let mut source = FileSource::new(&args.snapshot);
    scene.refresh_from(&mut source)?;

    if !scene.wait_for_orbits(Duration::from_secs(600)) {
        return Err(anyhow!("orbit build did not finish"));
    }
    Ok(scene)
}

fn write_json<T: Serialize + ?Sized>(value: &T, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {:?}", path))?;
            serde_json::to_writer_pretty(BufWriter::new(file), value)?;
            log::info!("Wrote {:?}", path);
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            serde_json::to_writer_pretty(&mut handle, value)?;
            writeln!(handle)?;
        }
    }
    Ok(())
}

/// Filter state described by the command line
fn filter_from_args(args: &SceneArgs, objects: &[TrackedObject]) -> FilterState {
    let mut filter = FilterState::default();
    if !args.categories.is_empty() {
        filter.visible_categories = args.categories.iter().copied().collect();
    }
    filter.set_search(args.search.as_str());
    if let Some(max) = args.max_visible {
        let filtered_total = filter.filtered(objects).len();
        filter.set_max_visible(max, filtered_total);
    }
    filter
}

/// Build the orbit set for the filtered objects and dump it as JSON
pub fn run_orbits(args: OrbitsArgs) -> Result<()> {
    let scene_args = &args.scene;
    if scene_args.samples == 0 {
        return Err(anyhow!("samples must be > 0"));
    }

    let objects = FileSource::new(&scene_args.snapshot).request()?;
    let filter = filter_from_args(scene_args, &objects);
    let visible = filter.effective_set(&objects);

    log::info!(
        "Propagating {} of {} objects ({} samples per orbit)...",
        visible.len(),
        objects.len(),
        scene_args.samples
    );

    let propagator = Sgp4Propagator::new();
    let start = now_instant();
    let progress = ProgressBar::new(visible.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{elapsed_precise} {bar:40.cyan/blue} {pos}/{len} {msg}")?
            .progress_chars("##-"),
    );

    let mut orbits = Vec::with_capacity(visible.len());
    for object in &visible {
        progress.set_message(object.display_name());
        if let Some(record) = build_orbit(&propagator, object, &start, scene_args.samples) {
            orbits.push(record);
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    log::info!(
        "{} orbits built, {} objects omitted",
        orbits.len(),
        visible.len() - orbits.len()
    );
    write_json(&orbits, args.output.as_deref())
}

/// Print the info panel for one object
pub fn run_info(args: InfoArgs) -> Result<()> {
    let objects = FileSource::new(&args.snapshot).request()?;
    let object = objects
        .iter()
        .find(|obj| obj.norad_id == args.norad_id)
        .ok_or_else(|| anyhow!("NORAD {} is not in {:?}", args.norad_id, args.snapshot))?;

    let panel = InfoPanel::new(&Sgp4Propagator::new(), object);

    if args.json {
        return write_json(&panel, None);
    }

    println!("{} (NORAD {})", panel.name, panel.norad_id);
    println!("Type:          {}", panel.category);
    if let Some(source) = &panel.source {
        println!("Source:        {}", source);
    }
    if !panel.updated_at.is_empty() {
        println!("Updated:       {}", panel.updated_at);
    }
    println!();
    match &panel.parameters {
        Some(params) => println!("{}", params.formatted()),
        None => println!("Orbital parameters unavailable"),
    }
    println!();
    println!("{}", panel.tle.line1);
    println!("{}", panel.tle.line2);

    if panel.alert_count > 0 {
        println!();
        println!("Collision alerts: {}", panel.alert_count);
        for alert in &panel.alerts {
            println!(
                "  {} vs {}  TCA {}  risk {}",
                alert.sat_1_name,
                alert.sat_2_name,
                alert.tca,
                alert.risk_level.as_deref().unwrap_or("-")
            );
        }
    }
    Ok(())
}

/// Dump per-frame marker states
pub fn run_frames(args: FramesArgs) -> Result<()> {
    if !args.step.is_finite() || !args.start.is_finite() {
        return Err(anyhow!("start and step must be finite"));
    }

    let mut scene = open_scene(&args.scene)?;
    scene.set_speed(args.speed);
    scene.set_show_orbit_paths(!args.hide_paths);
    scene.set_show_all_labels(args.all_labels);
    if let Some(id) = args.select {
        scene.click_object(id);
        if scene.selected().is_none() {
            log::warn!("NORAD {} is not visible; nothing selected", id);
        }
    }

    let frames: Vec<FrameDump> = (0..args.count)
        .map(|i| {
            let elapsed_seconds = args.start + i as f64 * args.step;
            FrameDump {
                elapsed_seconds,
                markers: scene.frame(elapsed_seconds),
            }
        })
        .collect();

    write_json(&frames, args.output.as_deref())
}

/// Print sidebar statistics
pub fn run_stats(args: SceneArgs) -> Result<()> {
    let scene = open_scene(&args)?;
    let stats = scene.statistics();
    let (lo, hi) = scene.max_visible_range();

    println!("Total objects:   {}", stats.total_objects);
    println!("Visible:         {}", stats.visible_objects);
    println!("Rendered orbits: {}", stats.rendered_orbits);
    println!("Max visible:     {} (range {}-{})", scene.filter().max_visible, lo, hi);
    let presets: Vec<String> = scene
        .settings()
        .speed_presets
        .iter()
        .map(|speed| format!("{}", speed))
        .collect();
    println!("Speed:           {} (presets {})", scene.filter().speed, presets.join(", "));
    for count in &stats.categories {
        println!(
            "  [{}] {:<12} {}",
            if count.visible { "x" } else { " " },
            count.category.label(),
            count.count
        );
    }
    Ok(())
}

/// Ask the data source for a collision scan
pub fn run_scan(args: ScanArgs) -> Result<()> {
    let mut source = FileSource::new(&args.snapshot);
    let objects = source.request()?;
    log::info!(
        "Requesting collision scan over {} objects from {:?}",
        objects.len(),
        source.path()
    );
    let message = source.trigger_scan()?;
    println!("{}", message);
    Ok(())
}
