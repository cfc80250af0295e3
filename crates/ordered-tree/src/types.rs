//! Node definitions.
//!
//! Every "pointer" is an `Option<u32>` index into a [`Vec`]-backed arena.
//! Slot [`HEAD`] is the sentinel: it never stores a value, its `p` link is
//! the root, its `l` link the minimum and its `r` link the maximum node.
//! The root's parent is [`HEAD`], so the same link type serves real nodes and
//! the sentinel alike.

/// Arena index of the head sentinel.
pub const HEAD: u32 = 0;

/// Node color. A nil link counts as [`Color::Black`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Black,
}

/// Structural links (`p`, `l`, `r`) plus the color tag.
pub trait Node {
    fn p(&self) -> Option<u32>;
    fn l(&self) -> Option<u32>;
    fn r(&self) -> Option<u32>;
    fn set_p(&mut self, v: Option<u32>);
    fn set_l(&mut self, v: Option<u32>);
    fn set_r(&mut self, v: Option<u32>);
    fn color(&self) -> Color;
    fn set_color(&mut self, c: Color);

    fn is_black(&self) -> bool {
        self.color() == Color::Black
    }
}

/// One arena slot.
///
/// `v` is `None` for the head sentinel and for vacant slots. `g` is the slot
/// generation, bumped every time the slot is released, so that a
/// [`Cursor`](crate::Cursor) taken on an erased node can be told apart from a
/// cursor on whatever reuses the slot later.
#[derive(Clone, Debug)]
pub struct RbNode<T> {
    pub p: Option<u32>,
    pub l: Option<u32>,
    pub r: Option<u32>,
    pub c: Color,
    pub g: u32,
    pub v: Option<T>,
}

impl<T> RbNode<T> {
    /// A detached red node holding `v`.
    pub fn new(v: T) -> Self {
        Self {
            p: None,
            l: None,
            r: None,
            c: Color::Red,
            g: 0,
            v: Some(v),
        }
    }

    /// The head sentinel of an empty tree: black, min/max linked to itself.
    pub fn head() -> Self {
        Self {
            p: None,
            l: Some(HEAD),
            r: Some(HEAD),
            c: Color::Black,
            g: 0,
            v: None,
        }
    }

    pub(crate) fn vacant(g: u32) -> Self {
        Self {
            p: None,
            l: None,
            r: None,
            c: Color::Black,
            g,
            v: None,
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.v.is_some()
    }
}

impl<T> Node for RbNode<T> {
    fn p(&self) -> Option<u32> {
        self.p
    }

    fn l(&self) -> Option<u32> {
        self.l
    }

    fn r(&self) -> Option<u32> {
        self.r
    }

    fn set_p(&mut self, v: Option<u32>) {
        self.p = v;
    }

    fn set_l(&mut self, v: Option<u32>) {
        self.l = v;
    }

    fn set_r(&mut self, v: Option<u32>) {
        self.r = v;
    }

    fn color(&self) -> Color {
        self.c
    }

    fn set_color(&mut self, c: Color) {
        self.c = c;
    }
}
