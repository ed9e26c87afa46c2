use crate::bbox::{BBox, Ltwh};

#[inline]
fn touches(a: &BBox<Ltwh>, b: &BBox<Ltwh>) -> bool {
    a.intersection(b).area() > 0 || a.contains_corner_of(b) || b.contains_corner_of(a)
}

/// Collapses overlapping candidates into one box per player.
///
/// Every seed box keeps absorbing any not-yet-used box it touches (positive
/// overlap, or a corner of one inside the other) until a whole pass adds
/// nothing, so chains of overlapping detections end up in a single box.
/// Boxes fully enclosed by another merged box are dropped afterwards.
pub fn merge_boxes(boxes: &[BBox<Ltwh>]) -> Vec<BBox<Ltwh>> {
    let mut used = vec![false; boxes.len()];
    let mut merged = Vec::with_capacity(boxes.len());

    for i in 0..boxes.len() {
        if used[i] {
            continue;
        }

        let mut acc = boxes[i];

        loop {
            let mut changed = false;

            for (j, other) in boxes.iter().enumerate() {
                if i == j || used[j] {
                    continue;
                }

                if touches(&acc, other) {
                    acc = acc.union(other);
                    used[j] = true;
                    changed = true;
                }
            }

            if !changed {
                break;
            }
        }

        used[i] = true;
        merged.push(acc);
    }

    merged
        .iter()
        .enumerate()
        .filter(|&(i, b)| {
            !merged
                .iter()
                .enumerate()
                .any(|(j, outer)| i != j && outer.encloses(b))
        })
        .map(|(_, b)| *b)
        .collect()
}
