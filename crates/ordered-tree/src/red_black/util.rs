//! Red-black linking, unlinking and rebalancing over a head-rooted arena.

use log::debug;

use crate::error::InvariantViolation;
use crate::types::{Color, Node, RbNode, HEAD};
use crate::util::{
    first, get_l, get_p, get_r, last, next, parent, prev, replace_child, root, set_l, set_p,
    set_r, swap,
};

#[inline]
fn is_red<N: Node>(arena: &[N], i: Option<u32>) -> bool {
    i.is_some_and(|i| !arena[i as usize].is_black())
}

#[inline]
fn set_color<N: Node>(arena: &mut [N], i: u32, c: Color) {
    arena[i as usize].set_color(c);
}

/// Rotates `x` down to the left; its right child takes its place.
fn rotate_left<N: Node>(arena: &mut [N], x: u32) {
    let y = get_r(arena, x).expect("rotate_left needs a right child");
    let yl = get_l(arena, y);
    let xp = parent(arena, x);

    set_r(arena, x, yl);
    if let Some(yl) = yl {
        set_p(arena, yl, Some(x));
    }
    set_p(arena, y, Some(xp));
    replace_child(arena, xp, x, Some(y));
    set_l(arena, y, Some(x));
    set_p(arena, x, Some(y));
}

/// Rotates `x` down to the right; its left child takes its place.
fn rotate_right<N: Node>(arena: &mut [N], x: u32) {
    let y = get_l(arena, x).expect("rotate_right needs a left child");
    let yr = get_r(arena, y);
    let xp = parent(arena, x);

    set_l(arena, x, yr);
    if let Some(yr) = yr {
        set_p(arena, yr, Some(x));
    }
    set_p(arena, y, Some(xp));
    replace_child(arena, xp, x, Some(y));
    set_r(arena, y, Some(x));
    set_p(arena, x, Some(y));
}

/// Links the detached node `n` as the `left`/right child of `p` (or as the
/// root when `p` is [`HEAD`]), keeps the head's min/max links current and
/// restores the color invariant.
pub fn insert_at<N: Node>(arena: &mut [N], n: u32, p: u32, left: bool) {
    set_p(arena, n, Some(p));
    set_l(arena, n, None);
    set_r(arena, n, None);
    set_color(arena, n, Color::Red);

    if p == HEAD {
        set_p(arena, HEAD, Some(n));
        set_l(arena, HEAD, Some(n));
        set_r(arena, HEAD, Some(n));
    } else if left {
        set_l(arena, p, Some(n));
        if get_l(arena, HEAD) == Some(p) {
            set_l(arena, HEAD, Some(n));
        }
    } else {
        set_r(arena, p, Some(n));
        if get_r(arena, HEAD) == Some(p) {
            set_r(arena, HEAD, Some(n));
        }
    }

    insert_fixup(arena, n);
}

fn insert_fixup<N: Node>(arena: &mut [N], n: u32) {
    let mut z = n;
    loop {
        let mut p = parent(arena, z);
        if p == HEAD || arena[p as usize].is_black() {
            break;
        }
        // A red parent is never the root, so the grandparent is a real node.
        let g = parent(arena, p);
        if get_l(arena, g) == Some(p) {
            let u = get_r(arena, g);
            if let Some(u) = u.filter(|&u| !arena[u as usize].is_black()) {
                set_color(arena, p, Color::Black);
                set_color(arena, u, Color::Black);
                set_color(arena, g, Color::Red);
                z = g;
                continue;
            }
            if get_r(arena, p) == Some(z) {
                z = p;
                rotate_left(arena, z);
                p = parent(arena, z);
            }
            set_color(arena, p, Color::Black);
            set_color(arena, g, Color::Red);
            rotate_right(arena, g);
        } else {
            let u = get_l(arena, g);
            if let Some(u) = u.filter(|&u| !arena[u as usize].is_black()) {
                set_color(arena, p, Color::Black);
                set_color(arena, u, Color::Black);
                set_color(arena, g, Color::Red);
                z = g;
                continue;
            }
            if get_l(arena, p) == Some(z) {
                z = p;
                rotate_right(arena, z);
                p = parent(arena, z);
            }
            set_color(arena, p, Color::Black);
            set_color(arena, g, Color::Red);
            rotate_left(arena, g);
        }
        break;
    }

    if let Some(r) = root(arena) {
        set_color(arena, r, Color::Black);
    }
}

/// Unlinks `n` from the tree and rebalances. The slot is left detached; its
/// value is untouched.
///
/// A node with two children first trades places with its in-order successor
/// (links and colors, not values), which reduces the removal to a node with
/// at most one child.
pub fn remove<N: Node>(arena: &mut [N], n: u32) {
    debug_assert_ne!(n, HEAD, "cannot remove the head sentinel");

    if get_l(arena, HEAD) == Some(n) {
        let successor = next(arena, n);
        set_l(arena, HEAD, Some(successor));
    }
    if get_r(arena, HEAD) == Some(n) {
        let predecessor = prev(arena, n);
        set_r(arena, HEAD, Some(predecessor));
    }

    if let (Some(_), Some(r)) = (get_l(arena, n), get_r(arena, n)) {
        let successor = first(arena, Some(r)).expect("right subtree is not empty");
        swap(arena, n, successor);
    }

    let child = get_l(arena, n).or(get_r(arena, n));
    let p = parent(arena, n);
    replace_child(arena, p, n, child);
    if let Some(child) = child {
        set_p(arena, child, Some(p));
    }

    let removed_black = arena[n as usize].is_black();
    set_p(arena, n, None);
    set_l(arena, n, None);
    set_r(arena, n, None);

    if root(arena).is_none() {
        set_l(arena, HEAD, Some(HEAD));
        set_r(arena, HEAD, Some(HEAD));
        return;
    }

    if removed_black {
        remove_fixup(arena, child, p);
    }
}

/// Resolves the missing black on the path through `x` (possibly nil), whose
/// parent is `xp`.
fn remove_fixup<N: Node>(arena: &mut [N], mut x: Option<u32>, mut xp: u32) {
    while xp != HEAD && !is_red(arena, x) {
        if get_l(arena, xp) == x {
            let mut w = get_r(arena, xp).expect("double-black node has a sibling");
            if !arena[w as usize].is_black() {
                set_color(arena, w, Color::Black);
                set_color(arena, xp, Color::Red);
                rotate_left(arena, xp);
                w = get_r(arena, xp).expect("double-black node has a sibling");
            }
            if !is_red(arena, get_l(arena, w)) && !is_red(arena, get_r(arena, w)) {
                set_color(arena, w, Color::Red);
                x = Some(xp);
                xp = parent(arena, xp);
                continue;
            }
            if !is_red(arena, get_r(arena, w)) {
                if let Some(wl) = get_l(arena, w) {
                    set_color(arena, wl, Color::Black);
                }
                set_color(arena, w, Color::Red);
                rotate_right(arena, w);
                w = get_r(arena, xp).expect("double-black node has a sibling");
            }
            let pc = arena[xp as usize].color();
            set_color(arena, w, pc);
            set_color(arena, xp, Color::Black);
            if let Some(wr) = get_r(arena, w) {
                set_color(arena, wr, Color::Black);
            }
            rotate_left(arena, xp);
        } else {
            let mut w = get_l(arena, xp).expect("double-black node has a sibling");
            if !arena[w as usize].is_black() {
                set_color(arena, w, Color::Black);
                set_color(arena, xp, Color::Red);
                rotate_right(arena, xp);
                w = get_l(arena, xp).expect("double-black node has a sibling");
            }
            if !is_red(arena, get_l(arena, w)) && !is_red(arena, get_r(arena, w)) {
                set_color(arena, w, Color::Red);
                x = Some(xp);
                xp = parent(arena, xp);
                continue;
            }
            if !is_red(arena, get_l(arena, w)) {
                if let Some(wr) = get_r(arena, w) {
                    set_color(arena, wr, Color::Black);
                }
                set_color(arena, w, Color::Red);
                rotate_left(arena, w);
                w = get_l(arena, xp).expect("double-black node has a sibling");
            }
            let pc = arena[xp as usize].color();
            set_color(arena, w, pc);
            set_color(arena, xp, Color::Black);
            if let Some(wl) = get_l(arena, w) {
                set_color(arena, wl, Color::Black);
            }
            rotate_right(arena, xp);
        }
        x = root(arena);
        break;
    }

    if let Some(x) = x {
        set_color(arena, x, Color::Black);
    }
}

/// Checks every structural invariant of the tree stored in `arena`.
///
/// `less` must be the tree's ordering; `len` is the tree's size counter.
pub fn assert_red_black_tree<T, K, F>(
    arena: &[RbNode<T>],
    len: usize,
    key: impl Fn(&T) -> &K,
    less: F,
) -> Result<(), InvariantViolation>
where
    K: ?Sized,
    F: Fn(&K, &K) -> bool,
{
    let result = check(arena, len, key, less);
    if let Err(err) = &result {
        debug!("red-black check failed: {err}");
    }
    result
}

fn check<T, K, F>(
    arena: &[RbNode<T>],
    len: usize,
    key: impl Fn(&T) -> &K,
    less: F,
) -> Result<(), InvariantViolation>
where
    K: ?Sized,
    F: Fn(&K, &K) -> bool,
{
    if !arena[HEAD as usize].is_black() {
        return Err(InvariantViolation::HeadNotBlack);
    }

    let Some(r) = root(arena) else {
        if len != 0 {
            return Err(InvariantViolation::SizeMismatch {
                recorded: len,
                counted: 0,
            });
        }
        if get_l(arena, HEAD) != Some(HEAD) || get_r(arena, HEAD) != Some(HEAD) {
            return Err(InvariantViolation::StaleBounds);
        }
        return Ok(());
    };

    if get_p(arena, r) != Some(HEAD) {
        return Err(InvariantViolation::RootDetached { node: r });
    }
    if !arena[r as usize].is_black() {
        return Err(InvariantViolation::RootNotBlack { node: r });
    }
    if get_l(arena, HEAD) != first(arena, Some(r)) || get_r(arena, HEAD) != last(arena, Some(r)) {
        return Err(InvariantViolation::StaleBounds);
    }

    fn black_height<T>(arena: &[RbNode<T>], node: Option<u32>) -> Result<usize, InvariantViolation> {
        let Some(node) = node else {
            return Ok(0);
        };
        let n = &arena[node as usize];
        if !n.is_occupied() {
            return Err(InvariantViolation::VacantLinked { node });
        }

        for child in [n.l, n.r].into_iter().flatten() {
            if arena[child as usize].p != Some(node) {
                return Err(InvariantViolation::BrokenParentLink { node, child });
            }
            if !n.is_black() && !arena[child as usize].is_black() {
                return Err(InvariantViolation::RedRed { node });
            }
        }

        let left = black_height(arena, n.l)?;
        let right = black_height(arena, n.r)?;
        if left != right {
            return Err(InvariantViolation::BlackHeight { node, left, right });
        }

        Ok(left + usize::from(n.is_black()))
    }

    black_height(arena, Some(r))?;

    let mut counted = 0usize;
    let mut prev_node: Option<u32> = None;
    let mut curr = get_l(arena, HEAD).unwrap_or(HEAD);
    while curr != HEAD {
        if let Some(prev) = prev_node {
            let (Some(a), Some(b)) = (&arena[prev as usize].v, &arena[curr as usize].v) else {
                return Err(InvariantViolation::VacantLinked { node: curr });
            };
            if !less(key(a), key(b)) {
                return Err(InvariantViolation::Order { node: curr });
            }
        }
        counted += 1;
        if counted > len {
            break;
        }
        prev_node = Some(curr);
        curr = next(arena, curr);
    }

    if counted != len {
        return Err(InvariantViolation::SizeMismatch {
            recorded: len,
            counted: crate::util::size(arena, Some(r)),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(v: &i32) -> &i32 {
        v
    }

    fn less(a: &i32, b: &i32) -> bool {
        a < b
    }

    /// Plain BST descent followed by the red-black link step.
    fn push(arena: &mut Vec<RbNode<i32>>, value: i32) {
        arena.push(RbNode::new(value));
        let n = (arena.len() - 1) as u32;
        let mut p = HEAD;
        let mut left = true;
        let mut curr = root(arena);
        while let Some(i) = curr {
            p = i;
            left = value < arena[i as usize].v.unwrap();
            curr = if left { arena[i as usize].l } else { arena[i as usize].r };
        }
        insert_at(arena, n, p, left);
    }

    #[test]
    fn ascending_inserts_stay_balanced() {
        let mut arena = vec![RbNode::head()];
        for v in 0..64 {
            push(&mut arena, v);
            assert_red_black_tree(&arena, (v + 1) as usize, key, less).unwrap();
        }
    }

    #[test]
    fn remove_detaches_and_rebalances() {
        let mut arena = vec![RbNode::head()];
        for v in [5, 3, 8, 1, 4, 7, 9] {
            push(&mut arena, v);
        }
        // Slot 1 holds 5, the root with two children.
        remove(&mut arena, 1);
        assert_eq!(arena[1].p, None);
        arena[1].v = None;
        assert_red_black_tree(&arena, 6, key, less).unwrap();
        assert_eq!(root(&arena).map(|r| arena[r as usize].c), Some(Color::Black));
    }

    #[test]
    fn checker_reports_red_root() {
        let mut arena = vec![RbNode::head()];
        for v in [2, 1, 3] {
            push(&mut arena, v);
        }
        let r = root(&arena).unwrap();
        arena[r as usize].c = Color::Red;
        assert_eq!(
            assert_red_black_tree(&arena, 3, key, less),
            Err(InvariantViolation::RootNotBlack { node: r })
        );
    }

    #[test]
    fn checker_reports_red_red() {
        // 2(1, 3) with 4 hung red under red 3, bypassing the fixup.
        let mut arena = vec![RbNode::head()];
        for v in [2, 1, 3] {
            push(&mut arena, v);
        }
        arena.push(RbNode::new(4));
        arena[4].p = Some(3);
        arena[3].r = Some(4);
        arena[HEAD as usize].r = Some(4);
        assert_eq!(
            assert_red_black_tree(&arena, 4, key, less),
            Err(InvariantViolation::RedRed { node: 3 })
        );
    }

    #[test]
    fn checker_reports_black_height() {
        let mut arena = vec![RbNode::head()];
        for v in [2, 1, 3] {
            push(&mut arena, v);
        }
        // Slot 2 holds 1, the left child of the root.
        arena[2].c = Color::Black;
        assert_eq!(
            assert_red_black_tree(&arena, 3, key, less),
            Err(InvariantViolation::BlackHeight {
                node: 1,
                left: 1,
                right: 0
            })
        );
    }

    #[test]
    fn checker_reports_order() {
        let mut arena = vec![RbNode::head()];
        for v in [2, 1, 3] {
            push(&mut arena, v);
        }
        arena[2].v = Some(3);
        arena[3].v = Some(1);
        assert_eq!(
            assert_red_black_tree(&arena, 3, key, less),
            Err(InvariantViolation::Order { node: 1 })
        );
    }

    #[test]
    fn checker_reports_size_mismatch() {
        let mut arena = vec![RbNode::head()];
        for v in [2, 1, 3] {
            push(&mut arena, v);
        }
        for recorded in [2, 5] {
            assert_eq!(
                assert_red_black_tree(&arena, recorded, key, less),
                Err(InvariantViolation::SizeMismatch {
                    recorded,
                    counted: 3
                })
            );
        }
        assert_eq!(
            assert_red_black_tree(&[RbNode::<i32>::head()], 1, key, less),
            Err(InvariantViolation::SizeMismatch {
                recorded: 1,
                counted: 0
            })
        );
    }
}
