//! Link-level navigation shared by the balancing code and the tree core.
//!
//! All functions take the arena slice and work with indices. The root is
//! parented by [`HEAD`]; walking up past the root lands on the sentinel, which
//! doubles as the end position.

use crate::types::{Node, HEAD};

#[inline]
pub(crate) fn get_p<N: Node>(arena: &[N], idx: u32) -> Option<u32> {
    arena[idx as usize].p()
}
#[inline]
pub(crate) fn get_l<N: Node>(arena: &[N], idx: u32) -> Option<u32> {
    arena[idx as usize].l()
}
#[inline]
pub(crate) fn get_r<N: Node>(arena: &[N], idx: u32) -> Option<u32> {
    arena[idx as usize].r()
}
#[inline]
pub(crate) fn set_l<N: Node>(arena: &mut [N], idx: u32, v: Option<u32>) {
    arena[idx as usize].set_l(v);
}
#[inline]
pub(crate) fn set_r<N: Node>(arena: &mut [N], idx: u32, v: Option<u32>) {
    arena[idx as usize].set_r(v);
}
#[inline]
pub(crate) fn set_p<N: Node>(arena: &mut [N], idx: u32, v: Option<u32>) {
    arena[idx as usize].set_p(v);
}

/// Parent of a linked node. The root's parent is [`HEAD`].
#[inline]
pub(crate) fn parent<N: Node>(arena: &[N], idx: u32) -> u32 {
    get_p(arena, idx).unwrap_or(HEAD)
}

/// Root of the tree, if any.
#[inline]
pub fn root<N: Node>(arena: &[N]) -> Option<u32> {
    get_p(arena, HEAD)
}

/// Leftmost node of the subtree at `root`.
pub fn first<N: Node>(arena: &[N], root: Option<u32>) -> Option<u32> {
    let mut curr = root;
    while let Some(idx) = curr {
        match get_l(arena, idx) {
            Some(l) => curr = Some(l),
            None => return Some(idx),
        }
    }
    curr
}

/// Rightmost node of the subtree at `root`.
pub fn last<N: Node>(arena: &[N], root: Option<u32>) -> Option<u32> {
    let mut curr = root;
    while let Some(idx) = curr {
        match get_r(arena, idx) {
            Some(r) => curr = Some(r),
            None => return Some(idx),
        }
    }
    curr
}

/// In-order successor of `node`; [`HEAD`] past the maximum.
pub fn next<N: Node>(arena: &[N], node: u32) -> u32 {
    if let Some(r) = get_r(arena, node) {
        let mut curr = r;
        while let Some(l) = get_l(arena, curr) {
            curr = l;
        }
        return curr;
    }
    let mut curr = node;
    let mut p = parent(arena, node);
    while p != HEAD && get_r(arena, p) == Some(curr) {
        curr = p;
        p = parent(arena, p);
    }
    p
}

/// In-order predecessor of `node`. `prev(HEAD)` is the maximum; the
/// predecessor of the minimum is [`HEAD`].
pub fn prev<N: Node>(arena: &[N], node: u32) -> u32 {
    if node == HEAD {
        return get_r(arena, HEAD).unwrap_or(HEAD);
    }
    if let Some(l) = get_l(arena, node) {
        let mut curr = l;
        while let Some(r) = get_r(arena, curr) {
            curr = r;
        }
        return curr;
    }
    let mut curr = node;
    let mut p = parent(arena, node);
    while p != HEAD && get_l(arena, p) == Some(curr) {
        curr = p;
        p = parent(arena, p);
    }
    p
}

/// Number of nodes in the subtree at `root`, by traversal.
pub fn size<N: Node>(arena: &[N], root: Option<u32>) -> usize {
    let Some(root) = root else {
        return 0;
    };
    let mut count = 0usize;
    let mut stack = vec![root];
    while let Some(i) = stack.pop() {
        count += 1;
        if let Some(l) = get_l(arena, i) {
            stack.push(l);
        }
        if let Some(r) = get_r(arena, i) {
            stack.push(r);
        }
    }
    count
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    Root,
    Left,
    Right,
}

#[inline]
fn side_of<N: Node>(arena: &[N], p: u32, child: u32) -> Side {
    if p == HEAD {
        Side::Root
    } else if get_l(arena, p) == Some(child) {
        Side::Left
    } else {
        Side::Right
    }
}

#[inline]
fn set_child<N: Node>(arena: &mut [N], p: u32, side: Side, v: Option<u32>) {
    match side {
        Side::Root => set_p(arena, HEAD, v),
        Side::Left => set_l(arena, p, v),
        Side::Right => set_r(arena, p, v),
    }
}

/// Points whichever link of `p` referenced `old` at `new` instead. When `p`
/// is [`HEAD`] this replaces the root.
#[inline]
pub(crate) fn replace_child<N: Node>(arena: &mut [N], p: u32, old: u32, new: Option<u32>) {
    let side = side_of(arena, p, old);
    set_child(arena, p, side, new);
}

/// Exchanges the tree positions of `x` and `y`, links and colors included.
/// Values stay in their slots, so indices into the arena keep addressing the
/// same values.
pub fn swap<N: Node>(arena: &mut [N], x: u32, y: u32) {
    if x == y {
        return;
    }

    let xp = parent(arena, x);
    let xl = get_l(arena, x);
    let xr = get_r(arena, x);
    let x_side = side_of(arena, xp, x);

    let yp = parent(arena, y);
    let yl = get_l(arena, y);
    let yr = get_r(arena, y);
    let y_side = side_of(arena, yp, y);

    let xc = arena[x as usize].color();
    let yc = arena[y as usize].color();
    arena[x as usize].set_color(yc);
    arena[y as usize].set_color(xc);

    if yl == Some(x) {
        set_l(arena, x, Some(y));
        set_p(arena, y, Some(x));
    } else {
        set_l(arena, x, yl);
        if let Some(yl) = yl {
            set_p(arena, yl, Some(x));
        }
    }

    if yr == Some(x) {
        set_r(arena, x, Some(y));
        set_p(arena, y, Some(x));
    } else {
        set_r(arena, x, yr);
        if let Some(yr) = yr {
            set_p(arena, yr, Some(x));
        }
    }

    if xl == Some(y) {
        set_l(arena, y, Some(x));
        set_p(arena, x, Some(y));
    } else {
        set_l(arena, y, xl);
        if let Some(xl) = xl {
            set_p(arena, xl, Some(y));
        }
    }

    if xr == Some(y) {
        set_r(arena, y, Some(x));
        set_p(arena, x, Some(y));
    } else {
        set_r(arena, y, xr);
        if let Some(xr) = xr {
            set_p(arena, xr, Some(y));
        }
    }

    if xp != y {
        set_p(arena, y, Some(xp));
        set_child(arena, xp, x_side, Some(y));
    }

    if yp != x {
        set_p(arena, x, Some(yp));
        set_child(arena, yp, y_side, Some(x));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Color, RbNode};

    /// Builds `2(1, 3)` under the head sentinel by hand.
    fn three() -> Vec<RbNode<i32>> {
        let mut arena = vec![RbNode::head(), RbNode::new(1), RbNode::new(2), RbNode::new(3)];
        arena[0].p = Some(2);
        arena[0].l = Some(1);
        arena[0].r = Some(3);
        arena[2].p = Some(HEAD);
        arena[2].l = Some(1);
        arena[2].r = Some(3);
        arena[2].c = Color::Black;
        arena[1].p = Some(2);
        arena[3].p = Some(2);
        arena
    }

    #[test]
    fn next_and_prev_walk_in_order() {
        let arena = three();
        assert_eq!(first(&arena, root(&arena)), Some(1));
        assert_eq!(last(&arena, root(&arena)), Some(3));
        assert_eq!(next(&arena, 1), 2);
        assert_eq!(next(&arena, 2), 3);
        assert_eq!(next(&arena, 3), HEAD);
        assert_eq!(prev(&arena, HEAD), 3);
        assert_eq!(prev(&arena, 3), 2);
        assert_eq!(prev(&arena, 1), HEAD);
        assert_eq!(size(&arena, root(&arena)), 3);
    }

    #[test]
    fn swap_root_with_adjacent_child() {
        let mut arena = three();
        swap(&mut arena, 2, 3);
        assert_eq!(root(&arena), Some(3));
        assert_eq!(arena[3].l, Some(1));
        assert_eq!(arena[3].r, Some(2));
        assert_eq!(arena[2].p, Some(3));
        assert_eq!(arena[1].p, Some(3));
        assert_eq!(arena[3].p, Some(HEAD));
        assert_eq!(arena[3].c, Color::Black);
        assert_eq!(arena[2].c, Color::Red);
    }
}
