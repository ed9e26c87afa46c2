use anyhow::{bail, Result};
use clap::Parser;
use opencv::{core, imgproc, prelude::*, videoio};
use std::path::PathBuf;
use teamtrack::sink::CsvWriter;
use teamtrack::source::DetectionReader;
use teamtrack::{Detection, Frame, TeamTracker, TeamTracking, TrackerConfig};
use tracing::{debug, info};

/// Team classification over a video file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input video
    video: String,

    /// Candidate boxes, one `frame_index:[json]` line per frame
    #[arg(short, long)]
    detections: PathBuf,

    /// Output CSV
    #[arg(short, long, default_value = "ours.csv")]
    output: PathBuf,

    /// Optional YAML tracker config
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write an annotated copy of the video (XVID, 24 fps)
    #[arg(short, long)]
    render: Option<String>,
}

fn draw_detection(frame: &mut core::Mat, det: &Detection) -> opencv::Result<()> {
    let [r, g, b] = det.team.color().0;
    let color = core::Scalar::new(b as f64, g as f64, r as f64, 255.0);
    let rect = core::Rect::new(det.bbox.left(), det.bbox.top(), det.bbox.width(), det.bbox.height());

    imgproc::rectangle(frame, rect, color, 2, imgproc::LINE_8, 0)?;

    let label = format!("{} #{}", det.team.name(), det.track_id);
    imgproc::put_text(
        frame,
        &label,
        core::Point::new(rect.x, (rect.y - 4).max(10)),
        imgproc::FONT_HERSHEY_SIMPLEX,
        0.4,
        color,
        1,
        imgproc::LINE_AA,
        false,
    )?;

    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "teamtrack=info,track_video=info".into()),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => TrackerConfig::load(path)?,
        None => TrackerConfig::default(),
    };

    let mut cam = videoio::VideoCapture::from_file(&args.video, videoio::CAP_ANY)?;
    if !videoio::VideoCapture::is_opened(&cam)? {
        bail!("could not open {}", args.video);
    }

    let total = cam.get(videoio::CAP_PROP_FRAME_COUNT)? as i64;
    info!("video {} with {} frames", args.video, total);

    let dets = std::io::BufReader::new(std::fs::File::open(&args.detections)?);
    let mut lines = DetectionReader::new(dets);
    let mut writer = CsvWriter::new(std::io::BufWriter::new(std::fs::File::create(&args.output)?));
    let mut session = TeamTracker::new(config);

    let mut render = match &args.render {
        Some(path) => {
            let fps = 24.0;
            let size = core::Size::new(
                cam.get(videoio::CAP_PROP_FRAME_WIDTH)? as i32,
                cam.get(videoio::CAP_PROP_FRAME_HEIGHT)? as i32,
            );
            let fourcc = videoio::VideoWriter::fourcc(b'X' as _, b'V' as _, b'I' as _, b'D' as _)?;
            info!("rendering to {}", path);
            Some(videoio::VideoWriter::new(path, fourcc, fps, size, true)?)
        }
        None => None,
    };

    let mut bgr = core::Mat::default();
    let mut rgb = core::Mat::default();
    let mut frame_idx = 0u64;

    loop {
        if !cam.read(&mut bgr)? {
            break;
        }

        let (fwidth, fheight) = (bgr.cols(), bgr.rows());
        if fwidth == 0 || fheight == 0 {
            break;
        }

        let candidates = match lines.next() {
            Some(item) => {
                let (idx, candidates) = item?;
                if idx != frame_idx {
                    bail!("detections out of sync: expected frame {}, got {}", frame_idx, idx);
                }
                candidates
            }
            None => break,
        };

        imgproc::cvt_color(&bgr, &mut rgb, imgproc::COLOR_BGR2RGB, 0)?;
        let pixels = rgb.data_bytes()?.to_vec();

        let frame = Frame::from_raw(frame_idx, fwidth as u32, fheight as u32, pixels, candidates)?;
        let detections = session.process(&frame);
        debug!(frame = frame_idx, players = detections.len(), "frame done");

        writer.write_frame(frame_idx, &detections)?;

        if let Some(out) = render.as_mut() {
            for det in &detections {
                draw_detection(&mut bgr, det)?;
            }
            out.write(&bgr)?;
        }

        frame_idx += 1;
    }

    writer.finish()?;

    if let Some(mut out) = render.take() {
        out.release()?;
    }
    info!("processed {} frames, written {}", frame_idx, args.output.display());

    Ok(())
}
