use nalgebra as na;
use serde_derive::{Deserialize, Serialize};
use std::marker::PhantomData;

pub trait BBoxFormat: std::fmt::Debug {}

/// Left-top-width-height format, contains left top corner and width-height
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Ltwh;
impl BBoxFormat for Ltwh {}

/// Left-top-right-bottom format, contains left top and (exclusive) right bottom corners
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Ltrb;
impl BBoxFormat for Ltrb {}

/// Integer pixel rectangle tagged with its coordinate layout.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct BBox<F: BBoxFormat>([i32; 4], PhantomData<F>);

impl Default for BBox<Ltwh> {
    fn default() -> Self {
        BBox::ltwh(0, 0, 0, 0)
    }
}

impl BBox<Ltwh> {
    #[inline]
    pub fn ltwh(x: i32, y: i32, w: i32, h: i32) -> Self {
        BBox([x, y, w, h], PhantomData)
    }

    #[inline(always)]
    pub fn left(&self) -> i32 {
        self.0[0]
    }

    #[inline(always)]
    pub fn top(&self) -> i32 {
        self.0[1]
    }

    #[inline(always)]
    pub fn width(&self) -> i32 {
        self.0[2]
    }

    #[inline(always)]
    pub fn height(&self) -> i32 {
        self.0[3]
    }

    #[inline(always)]
    pub fn right(&self) -> i32 {
        self.0[0] + self.0[2]
    }

    #[inline(always)]
    pub fn bottom(&self) -> i32 {
        self.0[1] + self.0[3]
    }

    #[inline]
    pub fn area(&self) -> i64 {
        self.width() as i64 * self.height() as i64
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    #[inline]
    pub fn top_left(&self) -> (i32, i32) {
        (self.left(), self.top())
    }

    #[inline]
    pub fn bottom_right(&self) -> (i32, i32) {
        (self.right(), self.bottom())
    }

    /// Midpoint of the top-left and bottom-right corners.
    #[inline]
    pub fn center(&self) -> na::Point2<f32> {
        na::Point2::new(
            (self.left() + self.right()) as f32 * 0.5,
            (self.top() + self.bottom()) as f32 * 0.5,
        )
    }

    /// Half-open containment: the bottom-right corner of a box is not inside it.
    #[inline]
    pub fn contains(&self, (px, py): (i32, i32)) -> bool {
        self.left() <= px && px < self.right() && self.top() <= py && py < self.bottom()
    }

    /// Either corner of `other` lies inside `self`.
    #[inline]
    pub fn contains_corner_of(&self, other: &Self) -> bool {
        self.contains(other.top_left()) || self.contains(other.bottom_right())
    }

    /// Both corners of `other` lie inside `self`.
    #[inline]
    pub fn encloses(&self, other: &Self) -> bool {
        self.contains(other.top_left()) && self.contains(other.bottom_right())
    }

    /// Overlapping region, or an all-zero box when the boxes do not overlap.
    pub fn intersection(&self, other: &Self) -> Self {
        let l = self.left().max(other.left());
        let t = self.top().max(other.top());
        let w = self.right().min(other.right()) - l;
        let h = self.bottom().min(other.bottom()) - t;

        if w <= 0 || h <= 0 {
            Self::default()
        } else {
            Self::ltwh(l, t, w, h)
        }
    }

    /// Smallest box covering both; an empty operand yields the other one.
    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }

        if other.is_empty() {
            return *self;
        }

        let l = self.left().min(other.left());
        let t = self.top().min(other.top());
        let r = self.right().max(other.right());
        let b = self.bottom().max(other.bottom());

        Self::ltwh(l, t, r - l, b - t)
    }

    #[inline]
    pub fn clip(&self, width: u32, height: u32) -> Self {
        self.intersection(&Self::ltwh(0, 0, width as i32, height as i32))
    }

    #[inline]
    pub fn as_ltrb(&self) -> BBox<Ltrb> {
        self.into()
    }
}

impl BBox<Ltrb> {
    #[inline]
    pub fn ltrb(l: i32, t: i32, r: i32, b: i32) -> Self {
        BBox([l, t, r, b], PhantomData)
    }

    #[inline(always)]
    pub fn left(&self) -> i32 {
        self.0[0]
    }

    #[inline(always)]
    pub fn top(&self) -> i32 {
        self.0[1]
    }

    #[inline(always)]
    pub fn right(&self) -> i32 {
        self.0[2]
    }

    #[inline(always)]
    pub fn bottom(&self) -> i32 {
        self.0[3]
    }
}

impl<'a> From<&'a BBox<Ltwh>> for BBox<Ltrb> {
    #[inline]
    fn from(v: &'a BBox<Ltwh>) -> Self {
        Self([v.0[0], v.0[1], v.0[2] + v.0[0], v.0[3] + v.0[1]], PhantomData)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bottom_right_corner_is_exclusive() {
        let b = BBox::ltwh(10, 10, 5, 5);
        assert!(b.contains((10, 10)));
        assert!(b.contains((14, 14)));
        assert!(!b.contains((15, 15)));
        assert!(!b.contains(b.bottom_right()));
    }

    #[test]
    fn intersection_of_disjoint_boxes_is_empty() {
        let a = BBox::ltwh(0, 0, 10, 10);
        let b = BBox::ltwh(10, 0, 10, 10);
        assert!(a.intersection(&b).is_empty());
        assert_eq!(a.intersection(&BBox::ltwh(5, 5, 10, 10)), BBox::ltwh(5, 5, 5, 5));
    }

    #[test]
    fn union_covers_both() {
        let a = BBox::ltwh(0, 0, 10, 10);
        let b = BBox::ltwh(20, 5, 10, 20);
        assert_eq!(a.union(&b), BBox::ltwh(0, 0, 30, 25));
        assert_eq!(BBox::default().union(&b), b);
    }

    #[test]
    fn clip_to_frame() {
        let b = BBox::ltwh(-5, 90, 20, 20);
        assert_eq!(b.clip(100, 100), BBox::ltwh(0, 90, 15, 10));
        assert!(BBox::ltwh(120, 0, 10, 10).clip(100, 100).is_empty());
    }

    #[test]
    fn ltrb_conversion() {
        let b = BBox::ltwh(3, 4, 10, 20);
        let r = b.as_ltrb();
        assert_eq!((r.left(), r.top(), r.right(), r.bottom()), (3, 4, 13, 24));
        assert_eq!(r, BBox::ltrb(3, 4, 13, 24));
    }
}
