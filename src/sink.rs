use crate::detection::Detection;
use crate::error::Error;
use std::io::Write;

pub const CSV_HEADER: &str = "frame,x1,y1,x2,y2,team";

/// Writes emitted detections as `frame,x1,y1,x2,y2,team` rows.
///
/// The header goes out with the first write, so a session that never emits
/// anything still leaves a valid file behind once `finish` is called.
pub struct CsvWriter<W: Write> {
    out: W,
    header_written: bool,
}

impl<W: Write> CsvWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            header_written: false,
        }
    }

    fn ensure_header(&mut self) -> Result<(), Error> {
        if !self.header_written {
            writeln!(self.out, "{}", CSV_HEADER)?;
            self.header_written = true;
        }

        Ok(())
    }

    pub fn write_frame(&mut self, frame_index: u64, detections: &[Detection]) -> Result<(), Error> {
        self.ensure_header()?;

        for det in detections {
            let c = det.corners();

            writeln!(
                self.out,
                "{},{},{},{},{},{}",
                frame_index,
                c.left(),
                c.top(),
                c.right(),
                c.bottom(),
                det.team
            )?;
        }

        Ok(())
    }

    /// Flushes and hands back the underlying writer.
    pub fn finish(mut self) -> Result<W, Error> {
        self.ensure_header()?;
        self.out.flush()?;

        Ok(self.out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bbox::BBox;
    use crate::team::Team;

    #[test]
    fn rows_use_corner_coordinates() {
        let mut w = CsvWriter::new(Vec::new());
        let dets = [
            Detection {
                bbox: BBox::ltwh(10, 20, 30, 40),
                team: Team::A,
                track_id: 0,
            },
            Detection {
                bbox: BBox::ltwh(100, 5, 12, 24),
                team: Team::B,
                track_id: 1,
            },
        ];

        w.write_frame(3, &dets).unwrap();
        w.write_frame(4, &[]).unwrap();
        let text = String::from_utf8(w.finish().unwrap()).unwrap();

        assert_eq!(
            text,
            "frame,x1,y1,x2,y2,team\n3,10,20,40,60,0\n3,100,5,112,29,1\n"
        );
    }

    #[test]
    fn empty_session_still_has_header() {
        let w = CsvWriter::new(Vec::new());
        let text = String::from_utf8(w.finish().unwrap()).unwrap();
        assert_eq!(text, "frame,x1,y1,x2,y2,team\n");
    }
}
