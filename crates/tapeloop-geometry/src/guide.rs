//! Guide posts and the ordered loop they form.
//!
//! The registry keeps posts in winding order. Index 0 is always the first
//! drive anchor; the second anchor sits somewhere later in the sequence. The
//! stretch from the first anchor to the second is the *outbound run*, the
//! stretch from the second anchor back around to the first is the *return run*.

use crate::error::{Error, Result};
use crate::point::{unit, Point, Vec2, EPSILON};
use core::fmt;
use serde::{Deserialize, Serialize};

/// Stable identifier of a guide post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PostId(pub u32);

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "post#{}", self.0)
    }
}

/// A circular post the tape wraps around.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GuidePost {
    pub id: PostId,
    /// Post center in drawing units.
    pub center: Point,
    /// Wrap radius, always > 0.
    pub radius: f64,
    /// Drive anchors are locked; they can be neither moved nor removed.
    pub locked: bool,
}

impl GuidePost {
    pub fn new(id: PostId, center: Point, radius: f64) -> Self {
        Self {
            id,
            center,
            radius,
            locked: false,
        }
    }

    pub fn anchor(id: PostId, center: Point, radius: f64) -> Self {
        Self {
            id,
            center,
            radius,
            locked: true,
        }
    }
}

/// Ordered, cyclic set of guide posts with two locked drive anchors.
#[derive(Debug, Clone)]
pub struct GuideRegistry {
    posts: Vec<GuidePost>,
    anchors: (PostId, PostId),
    next_id: u32,
    max_guides: usize,
}

impl GuideRegistry {
    /// Create a loop holding only the two drive anchors.
    pub fn new(
        anchor_a: Point,
        anchor_b: Point,
        anchor_radius: f64,
        max_guides: usize,
    ) -> Result<Self> {
        validate_radius(anchor_radius)?;
        if !anchor_a.is_finite() || !anchor_b.is_finite() {
            return Err(Error::NonFinitePosition);
        }

        let a = GuidePost::anchor(PostId(0), anchor_a, anchor_radius);
        let b = GuidePost::anchor(PostId(1), anchor_b, anchor_radius);

        Ok(Self {
            posts: vec![a, b],
            anchors: (a.id, b.id),
            next_id: 2,
            max_guides,
        })
    }

    /// Posts in winding order.
    #[inline]
    pub fn posts(&self) -> &[GuidePost] {
        &self.posts
    }

    /// Ids of the first and second drive anchors.
    #[inline]
    pub fn anchors(&self) -> (PostId, PostId) {
        self.anchors
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    /// Always false: both anchors are permanent.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Number of movable guides beyond the two anchors.
    pub fn guide_count(&self) -> usize {
        self.posts.iter().filter(|p| !p.locked).count()
    }

    #[inline]
    pub fn max_guides(&self) -> usize {
        self.max_guides
    }

    pub fn get(&self, id: PostId) -> Option<&GuidePost> {
        self.posts.iter().find(|p| p.id == id)
    }

    pub fn index_of(&self, id: PostId) -> Option<usize> {
        self.posts.iter().position(|p| p.id == id)
    }

    /// Insert a movable guide at `index` in winding order.
    ///
    /// Index 0 is reserved for the first anchor, so 0 inserts at the end of
    /// the sequence (the same place in the cycle).
    pub fn insert_guide(&mut self, index: usize, center: Point, radius: f64) -> Result<PostId> {
        validate_radius(radius)?;
        if !center.is_finite() {
            return Err(Error::NonFinitePosition);
        }
        if self.guide_count() >= self.max_guides {
            return Err(Error::GuideLimitReached {
                max: self.max_guides,
            });
        }

        let id = PostId(self.next_id);
        self.next_id += 1;

        let index = if index == 0 || index > self.posts.len() {
            self.posts.len()
        } else {
            index
        };
        self.posts.insert(index, GuidePost::new(id, center, radius));
        Ok(id)
    }

    /// Insert a guide directly after `after` in winding order.
    pub fn insert_after(&mut self, after: PostId, center: Point, radius: f64) -> Result<PostId> {
        let index = self.index_of(after).ok_or(Error::UnknownGuide(after))?;
        self.insert_guide(index + 1, center, radius)
    }

    /// Insert a guide where it belongs geometrically.
    ///
    /// Guides right of the anchor line (first anchor to second) join the
    /// outbound run, the others join the return run; within a run posts are
    /// ordered by their projection on the anchor axis.
    pub fn insert_by_primary_axis(&mut self, center: Point, radius: f64) -> Result<PostId> {
        let index = self.primary_axis_slot(center);
        self.insert_guide(index, center, radius)
    }

    /// Remove a movable guide. Anchors are never removed.
    pub fn remove(&mut self, id: PostId) -> Result<GuidePost> {
        let index = self.index_of(id).ok_or(Error::UnknownGuide(id))?;
        if self.posts[index].locked {
            return Err(Error::AnchorLocked(id));
        }
        Ok(self.posts.remove(index))
    }

    /// Move a movable guide. The caller clamps `center` to the workspace.
    pub fn move_to(&mut self, id: PostId, center: Point) -> Result<()> {
        if !center.is_finite() {
            return Err(Error::NonFinitePosition);
        }
        let index = self.index_of(id).ok_or(Error::UnknownGuide(id))?;
        let post = &mut self.posts[index];
        if post.locked {
            return Err(Error::AnchorLocked(id));
        }
        post.center = center;
        Ok(())
    }

    /// Change the wrap radius of a movable guide.
    ///
    /// Anchors are fixed reel hubs: their radius is set once in [`new`](Self::new).
    pub fn set_radius(&mut self, id: PostId, radius: f64) -> Result<()> {
        validate_radius(radius)?;
        let index = self.index_of(id).ok_or(Error::UnknownGuide(id))?;
        let post = &mut self.posts[index];
        if post.locked {
            return Err(Error::AnchorLocked(id));
        }
        post.radius = radius;
        Ok(())
    }

    /// Re-sort every movable guide geometrically, keeping the anchors at the
    /// ends of the outbound run.
    pub fn arrange_by_primary_axis(&mut self) {
        let (a, b) = self.anchor_posts();
        let axis = AnchorAxis::new(a.center, b.center);

        let mut outbound: Vec<GuidePost> = Vec::new();
        let mut inbound: Vec<GuidePost> = Vec::new();
        for post in self.posts.iter().filter(|p| !p.locked) {
            if axis.is_outbound(post.center) {
                outbound.push(*post);
            } else {
                inbound.push(*post);
            }
        }

        outbound.sort_by(|l, r| axis.key(l.center).total_cmp(&axis.key(r.center)));
        inbound.sort_by(|l, r| axis.key(r.center).total_cmp(&axis.key(l.center)));

        let mut posts = Vec::with_capacity(self.posts.len());
        posts.push(a);
        posts.extend(outbound);
        posts.push(b);
        posts.extend(inbound);
        self.posts = posts;
    }

    fn anchor_posts(&self) -> (GuidePost, GuidePost) {
        // Both anchors are always present.
        let a = self.posts[0];
        let b = self
            .posts
            .iter()
            .copied()
            .find(|p| p.id == self.anchors.1)
            .unwrap_or(a);
        (a, b)
    }

    fn primary_axis_slot(&self, center: Point) -> usize {
        let (a, b) = self.anchor_posts();
        let axis = AnchorAxis::new(a.center, b.center);
        let key = axis.key(center);
        let b_index = self.index_of(b.id).unwrap_or(self.posts.len() - 1);

        if axis.is_outbound(center) {
            (1..b_index)
                .find(|&i| axis.key(self.posts[i].center) > key)
                .unwrap_or(b_index)
        } else {
            (b_index + 1..self.posts.len())
                .find(|&i| axis.key(self.posts[i].center) < key)
                .unwrap_or(self.posts.len())
        }
    }
}

fn validate_radius(radius: f64) -> Result<()> {
    if radius > 0.0 && radius.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidRadius(radius))
    }
}

/// The line from the first anchor to the second.
struct AnchorAxis {
    origin: Point,
    /// Unit direction; +x when the anchors coincide.
    dir: Vec2,
}

impl AnchorAxis {
    fn new(a: Point, b: Point) -> Self {
        let dir = unit(b - a)
            .map(|(dir, _)| dir)
            .unwrap_or(Vec2::new(1.0, 0.0));
        Self { origin: a, dir }
    }

    #[inline]
    fn key(&self, p: Point) -> f64 {
        (p - self.origin).dot(self.dir)
    }

    #[inline]
    fn is_outbound(&self, p: Point) -> bool {
        self.dir.cross(p - self.origin) <= EPSILON
    }
}
