//! List diffing for the compose list
//!
//! Computes an [`EditScript`] that turns a rendered copy of an old list into
//! one that matches a new list, touching only rows that actually changed.
//!
//! Rows are compared on two levels (see [`Diffable`]):
//!
//! - **Row identity** decides whether an old and a new element denote the
//!   same logical row. Matching runs on identity with Myers' O((N+M)·D)
//!   shortest-edit-path algorithm.
//! - **Content equality** decides whether a matched row has to be re-rendered.
//!
//! Rows that leave the common subsequence but reappear elsewhere are reported
//! as moves instead of a remove/insert pair.
//!
//! ## Applying a script
//!
//! Operations are meant to be applied in order to a list of the old length:
//!
//! 1. Removals, highest position first.
//! 2. Inserts and moves, in ascending target position. Before each of these
//!    the prefix `0..position` already matches the new list.
//! 3. Changes, against final positions.
//!
//! [`EditScript::replay`] performs exactly this simulation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity and equality rules for diffable rows
pub trait Diffable {
    /// Whether both values denote the same logical row
    fn same_row(&self, other: &Self) -> bool;

    /// Whether a matched row can be kept without re-rendering
    fn same_content(&self, other: &Self) -> bool;
}

/// A single list update instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditOp {
    /// Remove `count` rows starting at `position`
    Remove {
        /// First removed row
        position: usize,
        /// Number of rows
        count: usize,
    },
    /// Insert `count` new rows starting at `position`
    Insert {
        /// First inserted row
        position: usize,
        /// Number of rows
        count: usize,
    },
    /// Move one row from `from` to `to`
    Move {
        /// Current position
        from: usize,
        /// Target position
        to: usize,
    },
    /// Re-render `count` rows starting at `position`
    Change {
        /// First changed row
        position: usize,
        /// Number of rows
        count: usize,
    },
}

impl fmt::Display for EditOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remove { position, count } => write!(f, "-{count}@{position}"),
            Self::Insert { position, count } => write!(f, "+{count}@{position}"),
            Self::Move { from, to } => write!(f, "{from}->{to}"),
            Self::Change { position, count } => write!(f, "~{count}@{position}"),
        }
    }
}

/// Ordered list of update instructions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditScript {
    ops: Vec<EditOp>,
}

impl EditScript {
    /// Get the operations in application order
    pub fn ops(&self) -> &[EditOp] {
        &self.ops
    }

    /// Whether nothing needs to be updated
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Number of operations
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Iterate over the operations
    pub fn iter(&self) -> std::slice::Iter<'_, EditOp> {
        self.ops.iter()
    }

    /// Simulate the structural operations on a list of `old_len` rows.
    ///
    /// Returns, for every row of the resulting list, the old index it was
    /// carried over from, or `None` if the row was inserted.
    ///
    /// Panics if the script was not computed for a list of `old_len` rows.
    pub fn replay(&self, old_len: usize) -> Vec<Option<usize>> {
        let mut rows: Vec<Option<usize>> = (0..old_len).map(Some).collect();
        for op in &self.ops {
            match *op {
                EditOp::Remove { position, count } => {
                    rows.drain(position..position + count);
                }
                EditOp::Insert { position, count } => {
                    rows.splice(position..position, std::iter::repeat_n(None, count));
                }
                EditOp::Move { from, to } => {
                    let row = rows.remove(from);
                    rows.insert(to, row);
                }
                EditOp::Change { .. } => {}
            }
        }
        rows
    }

    /// Positions (in the new list) that need re-rendering
    pub fn changed_positions(&self) -> Vec<usize> {
        self.ops
            .iter()
            .filter_map(|op| match *op {
                EditOp::Change { position, count } => Some(position..position + count),
                _ => None,
            })
            .flatten()
            .collect()
    }

    fn push_run(&mut self, op: EditOp) {
        let merged = match (self.ops.last_mut(), op) {
            (
                Some(EditOp::Insert { position, count }),
                EditOp::Insert {
                    position: next, ..
                },
            )
            | (
                Some(EditOp::Change { position, count }),
                EditOp::Change {
                    position: next, ..
                },
            ) if *position + *count == next => {
                *count += 1;
                true
            }
            _ => false,
        };
        if !merged {
            self.ops.push(op);
        }
    }
}

impl<'a> IntoIterator for &'a EditScript {
    type Item = &'a EditOp;
    type IntoIter = std::slice::Iter<'a, EditOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}

/// Compute the edit script between two lists
pub fn diff<T: Diffable>(old: &[T], new: &[T]) -> EditScript {
    let mut script = EditScript::default();

    // Old index each new row is carried over from
    let mut source: Vec<Option<usize>> = vec![None; new.len()];
    let mut kept = vec![false; old.len()];
    for (i, j) in common_rows(old, new) {
        source[j] = Some(i);
        kept[i] = true;
    }

    // Rows that fell out of the common subsequence but still exist are moves
    for (j, new_row) in new.iter().enumerate() {
        if source[j].is_some() {
            continue;
        }
        if let Some(i) = (0..old.len()).find(|&i| !kept[i] && old[i].same_row(new_row)) {
            source[j] = Some(i);
            kept[i] = true;
        }
    }

    let mut i = old.len();
    while i > 0 {
        i -= 1;
        if kept[i] {
            continue;
        }
        let end = i + 1;
        while i > 0 && !kept[i - 1] {
            i -= 1;
        }
        script.ops.push(EditOp::Remove {
            position: i,
            count: end - i,
        });
    }

    let mut current: Vec<Option<usize>> = (0..old.len()).filter(|&i| kept[i]).map(Some).collect();
    for (j, origin) in source.iter().enumerate() {
        match origin {
            None => {
                current.insert(j, None);
                script.push_run(EditOp::Insert {
                    position: j,
                    count: 1,
                });
            }
            Some(i) => {
                if let Some(from) = current.iter().position(|row| *row == Some(*i))
                    && from != j
                {
                    let row = current.remove(from);
                    current.insert(j, row);
                    script.ops.push(EditOp::Move { from, to: j });
                }
            }
        }
    }

    for (j, origin) in source.iter().enumerate() {
        if let Some(i) = origin
            && !old[*i].same_content(&new[j])
        {
            script.push_run(EditOp::Change {
                position: j,
                count: 1,
            });
        }
    }

    script
}

/// Pairs `(old, new)` on a shortest edit path, in ascending order
fn common_rows<T: Diffable>(old: &[T], new: &[T]) -> Vec<(usize, usize)> {
    let n = old.len() as isize;
    let m = new.len() as isize;
    if n == 0 || m == 0 {
        return Vec::new();
    }

    let max = n + m;
    let offset = max + 1;
    // v[k + offset]: furthest x reached on diagonal k
    let mut v = vec![0isize; (2 * max + 3) as usize];
    let mut trace = Vec::new();

    'search: for d in 0..=max {
        trace.push(v.clone());
        for k in (-d..=d).step_by(2) {
            let idx = (k + offset) as usize;
            let mut x = if k == -d || (k != d && v[idx - 1] < v[idx + 1]) {
                v[idx + 1]
            } else {
                v[idx - 1] + 1
            };
            let mut y = x - k;
            while x < n && y < m && old[x as usize].same_row(&new[y as usize]) {
                x += 1;
                y += 1;
            }
            v[idx] = x;
            if x >= n && y >= m {
                break 'search;
            }
        }
    }

    let mut pairs = Vec::new();
    let (mut x, mut y) = (n, m);
    for (d, v) in trace.iter().enumerate().rev() {
        let d = d as isize;
        let k = x - y;
        let idx = (k + offset) as usize;
        let prev_k = if k == -d || (k != d && v[idx - 1] < v[idx + 1]) {
            k + 1
        } else {
            k - 1
        };
        let prev_x = v[(prev_k + offset) as usize];
        let prev_y = prev_x - prev_k;

        while x > prev_x && y > prev_y {
            x -= 1;
            y -= 1;
            pairs.push((x as usize, y as usize));
        }

        if d > 0 {
            x = prev_x;
            y = prev_y;
        }
    }

    pairs.reverse();
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EditorItem, Item, PreviousStatusItem};
    use chrono::Utc;

    /// Rows identified by the key, with a revision standing in for content
    #[derive(Debug, Clone, PartialEq)]
    struct Row(u32, u32);

    impl Diffable for Row {
        fn same_row(&self, other: &Self) -> bool {
            self.0 == other.0
        }

        fn same_content(&self, other: &Self) -> bool {
            self == other
        }
    }

    fn rows(keys: &[u32]) -> Vec<Row> {
        keys.iter().map(|&k| Row(k, 0)).collect()
    }

    /// Assert that replaying the script on `old` yields `new`
    fn assert_transforms(old: &[Row], new: &[Row]) -> EditScript {
        let script = diff(old, new);
        let replayed = script.replay(old.len());
        assert_eq!(replayed.len(), new.len(), "script {script:?}");

        let changed = script.changed_positions();
        for (j, origin) in replayed.iter().enumerate() {
            if let Some(i) = origin {
                assert!(old[*i].same_row(&new[j]), "row {j} bound to wrong old row");
                if !old[*i].same_content(&new[j]) {
                    assert!(changed.contains(&j), "row {j} changed but not reported");
                }
            } else {
                assert!(
                    !old.iter().any(|row| row.same_row(&new[j])),
                    "row {j} inserted although it existed"
                );
            }
        }
        script
    }

    fn previous(id: i64, text: &str) -> Item {
        Item::PreviousStatus(PreviousStatusItem {
            id,
            text: text.to_string(),
            created_at: Utc::now(),
        })
    }

    #[test]
    fn test_identical_lists_have_empty_script() {
        let list = rows(&[1, 2, 3, 4]);
        assert!(diff(&list, &list).is_empty());

        let empty: Vec<Row> = Vec::new();
        assert!(diff(&empty, &empty).is_empty());
    }

    #[test]
    fn test_insert_into_empty() {
        let script = assert_transforms(&[], &rows(&[1, 2, 3]));
        assert_eq!(
            script.ops(),
            &[EditOp::Insert {
                position: 0,
                count: 3
            }]
        );
    }

    #[test]
    fn test_remove_everything() {
        let script = assert_transforms(&rows(&[1, 2, 3]), &[]);
        assert_eq!(
            script.ops(),
            &[EditOp::Remove {
                position: 0,
                count: 3
            }]
        );
    }

    #[test]
    fn test_removals_run_from_the_end() {
        let script = assert_transforms(&rows(&[1, 2, 3, 4, 5]), &rows(&[1, 3, 5]));
        assert_eq!(
            script.ops(),
            &[
                EditOp::Remove {
                    position: 3,
                    count: 1
                },
                EditOp::Remove {
                    position: 1,
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_content_change_only() {
        let old = vec![Row(1, 0), Row(2, 0), Row(3, 0)];
        let new = vec![Row(1, 0), Row(2, 1), Row(3, 1)];
        let script = assert_transforms(&old, &new);
        assert_eq!(
            script.ops(),
            &[EditOp::Change {
                position: 1,
                count: 2
            }]
        );
    }

    #[test]
    fn test_swap_is_a_move() {
        let script = assert_transforms(&rows(&[1, 2, 9]), &rows(&[2, 1, 9]));
        assert_eq!(script.len(), 1);
        assert!(matches!(script.ops()[0], EditOp::Move { .. }));
    }

    #[test]
    fn test_mixed_edits() {
        assert_transforms(&rows(&[1, 2, 3, 4, 5, 6]), &rows(&[7, 3, 1, 8, 6, 5]));
        assert_transforms(&rows(&[1, 2]), &rows(&[3, 4, 5]));
        assert_transforms(&rows(&[5, 4, 3, 2, 1]), &rows(&[1, 2, 3, 4, 5]));
    }

    #[test]
    fn test_pseudo_random_lists() {
        // Small LCG so the cases are reproducible
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next = move |bound: u64| {
            seed = seed
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            (seed >> 33) % bound
        };

        for _ in 0..200 {
            let mut old = Vec::new();
            let mut new = Vec::new();
            for key in 0..12u32 {
                if next(3) > 0 {
                    old.push(Row(key, next(2) as u32));
                }
                if next(3) > 0 {
                    new.push(Row(key, next(2) as u32));
                }
            }
            // Shuffle the new list a little
            for _ in 0..next(4) {
                if new.len() > 1 {
                    let a = next(new.len() as u64) as usize;
                    let b = next(new.len() as u64) as usize;
                    new.swap(a, b);
                }
            }
            assert_transforms(&old, &new);
        }
    }

    #[test]
    fn test_editor_update_is_a_single_change() {
        let old = vec![previous(1, "first"), Item::Editor(EditorItem::default())];
        let new = vec![
            previous(1, "first"),
            Item::Editor(EditorItem {
                status: "typing".to_string(),
                status_length: 6,
                ..EditorItem::default()
            }),
        ];
        let script = diff(&old, &new);
        assert_eq!(
            script.ops(),
            &[EditOp::Change {
                position: 1,
                count: 1
            }]
        );
    }

    #[test]
    fn test_previous_status_with_same_id_is_unchanged() {
        let editor = Item::Editor(EditorItem::default());
        let old = vec![previous(42, "before"), editor.clone()];
        let new = vec![previous(42, "after"), editor];
        assert!(diff(&old, &new).is_empty());
    }

    #[test]
    fn test_new_history_replaces_old() {
        let editor = Item::Editor(EditorItem::default());
        let old = vec![previous(1, "one"), editor.clone()];
        let new = vec![previous(2, "two"), editor];
        let script = diff(&old, &new);
        assert_eq!(
            script.ops(),
            &[
                EditOp::Remove {
                    position: 0,
                    count: 1
                },
                EditOp::Insert {
                    position: 0,
                    count: 1
                },
            ]
        );
        assert_eq!(script.replay(2), vec![None, Some(1)]);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            EditOp::Insert {
                position: 2,
                count: 1
            }
            .to_string(),
            "+1@2"
        );
        assert_eq!(EditOp::Move { from: 3, to: 0 }.to_string(), "3->0");
    }
}
