use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use teamtrack::sink::CsvWriter;
use teamtrack::source::DetectionReader;
use teamtrack::{Frame, TeamTracker, TeamTracking, TrackerConfig};
use tracing::{info, warn};

/// Team classification over a directory of frame images
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory with the frames, processed in file name order
    #[arg(short, long)]
    frames: PathBuf,

    /// Candidate boxes, one `frame_index:[json]` line per frame
    #[arg(short, long)]
    detections: PathBuf,

    /// Output CSV
    #[arg(short, long, default_value = "ours.csv")]
    output: PathBuf,

    /// Optional YAML tracker config
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "teamtrack=info,track_frames=info".into()),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => TrackerConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => TrackerConfig::default(),
    };

    let mut images: Vec<PathBuf> = std::fs::read_dir(&args.frames)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file())
        .collect();
    images.sort();

    if images.is_empty() {
        bail!("no frames in {}", args.frames.display());
    }

    let dets = std::io::BufReader::new(std::fs::File::open(&args.detections)?);
    let mut writer = CsvWriter::new(std::io::BufWriter::new(std::fs::File::create(&args.output)?));
    let mut session = TeamTracker::new(config);
    let mut emitted = 0usize;

    for item in DetectionReader::new(dets) {
        let (idx, candidates) = item?;

        let Some(path) = images.get(idx as usize) else {
            warn!(frame = idx, "no image for frame, stopping");
            break;
        };

        let image = image::open(path)?.to_rgb8();
        let frame = Frame::new(idx, image, candidates);
        let detections = session.process(&frame);

        emitted += detections.len();
        writer.write_frame(idx, &detections)?;
    }

    writer.finish()?;
    info!(
        boxes = emitted,
        tracks = session.tracks().len(),
        "written {}",
        args.output.display()
    );

    Ok(())
}
