use crate::bbox::{BBox, Ltwh};
use crate::error::Error;
use serde_derive::{Deserialize, Serialize};
use std::io::BufRead;

/// Candidate rectangle as stored in detection dumps.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct RawBox {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl From<RawBox> for BBox<Ltwh> {
    fn from(b: RawBox) -> Self {
        BBox::ltwh(b.x, b.y, b.w, b.h)
    }
}

/// Reads per-frame candidates from `frame_index:[{"x":..,"y":..,"w":..,"h":..}, ..]` lines.
pub struct DetectionReader<R: BufRead> {
    lines: std::io::Lines<R>,
    line_no: usize,
}

impl<R: BufRead> DetectionReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }

    fn parse(&self, line: &str) -> Result<(u64, Vec<BBox<Ltwh>>), Error> {
        let (idx, vector) = line.split_once(':').ok_or(Error::DetectionsFormat {
            line: self.line_no,
            reason: "expected `:`",
        })?;

        let idx = idx.trim().parse::<u64>().map_err(|_| Error::DetectionsFormat {
            line: self.line_no,
            reason: "parse frame index failed",
        })?;

        let boxes: Vec<RawBox> = serde_json::from_str(vector)?;

        Ok((idx, boxes.into_iter().map(Into::into).collect()))
    }
}

impl<R: BufRead> Iterator for DetectionReader<R> {
    type Item = Result<(u64, Vec<BBox<Ltwh>>), Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(err) => return Some(Err(err.into())),
            };
            self.line_no += 1;

            if line.trim().is_empty() {
                continue;
            }

            return Some(self.parse(&line));
        }
    }
}
