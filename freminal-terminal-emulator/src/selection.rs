// Copyright (C) 2024-2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use freminal_common::buffer_states::{cursor::CursorPos, tchar::TChar};

use crate::state::buffer::TerminalBufferHolder;

/// Lifecycle of a selection drag.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum SelectionMode {
    /// No selection exists.
    #[default]
    Idle,
    /// A selection anchor has been dropped but the pointer hasn't moved (or the
    /// drag hasn't been released yet).
    Empty,
    /// The drag has been released; the selection is final until the next click.
    Ready,
}

/// Shape of the selected region.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum SelectionKind {
    /// Follows line wrapping; begin/end bound the first/last row, full rows between.
    #[default]
    Regular,
    /// A column block spanning every row in range.
    Rectangular,
}

/// Granularity the selection snaps to.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum SelectionSnap {
    #[default]
    None,
    Word,
    Line,
}

/// Tracks an in-progress or completed text selection against a screen buffer.
///
/// `ob`/`oe` are the raw anchor/cursor positions as the pointer reports them;
/// `nb`/`ne` are those same two points ordered and snapped, and are what
/// rendering and [`Selection::get_text`] consume.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct Selection {
    pub mode: SelectionMode,
    pub kind: SelectionKind,
    pub snap: SelectionSnap,
    /// Which screen the selection was started on. A screen swap (DECSET 1049)
    /// invalidates any selection started on the other one.
    pub on_alt_screen: bool,
    ob: CursorPos,
    oe: CursorPos,
    nb: CursorPos,
    ne: CursorPos,
}

impl Selection {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.mode != SelectionMode::Idle
    }

    /// Drops a new anchor, discarding whatever selection existed before.
    pub fn start(&mut self, pos: CursorPos, snap: SelectionSnap, on_alt_screen: bool) {
        self.mode = SelectionMode::Empty;
        self.kind = SelectionKind::Regular;
        self.snap = snap;
        self.on_alt_screen = on_alt_screen;
        self.ob = pos;
        self.oe = pos;
        self.nb = pos;
        self.ne = pos;
    }

    /// Moves the live end of the selection to `pos` and re-derives the
    /// normalized, snapped bounds. `done` marks the drag as released.
    pub fn extend(
        &mut self,
        pos: CursorPos,
        kind: SelectionKind,
        done: bool,
        buffer: &TerminalBufferHolder,
        word_delimiters: &str,
    ) {
        if self.mode == SelectionMode::Idle {
            return;
        }

        self.oe = pos;
        self.kind = kind;
        self.normalize(buffer, word_delimiters);
        self.mode = if done {
            SelectionMode::Ready
        } else {
            SelectionMode::Empty
        };
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Orders `ob`/`oe` and applies the current snap mode, writing `nb`/`ne`.
    fn normalize(&mut self, buffer: &TerminalBufferHolder, word_delimiters: &str) {
        let (mut begin, mut end) = order(self.ob, self.oe);

        match self.snap {
            SelectionSnap::None => {}
            SelectionSnap::Word => {
                begin = extend_word_left(buffer, begin, word_delimiters);
                end = extend_word_right(buffer, end, word_delimiters);
            }
            SelectionSnap::Line => {
                begin.x = 0;
                while begin.y > 0 && buffer.row_wrapped(begin.y - 1) {
                    begin.y -= 1;
                }

                end.x = buffer.width.saturating_sub(1);
                while buffer.row_wrapped(end.y) {
                    end.y += 1;
                }
            }
        }

        self.nb = begin;
        self.ne = end;
    }

    /// The current normalized, snapped bounds. Only meaningful when
    /// [`Selection::is_active`].
    #[must_use]
    pub const fn normalized(&self) -> (CursorPos, CursorPos) {
        (self.nb, self.ne)
    }

    /// Whether `pos` falls within the normalized selection, for highlight
    /// rendering.
    #[must_use]
    pub fn contains(&self, pos: CursorPos) -> bool {
        if !self.is_active() {
            return false;
        }

        match self.kind {
            SelectionKind::Rectangular => {
                let (x1, x2) = min_max(self.nb.x, self.ne.x);
                let (y1, y2) = min_max(self.nb.y, self.ne.y);
                (y1..=y2).contains(&pos.y) && (x1..=x2).contains(&pos.x)
            }
            SelectionKind::Regular => {
                let (begin, end) = (self.nb, self.ne);
                if pos.y < begin.y || pos.y > end.y {
                    return false;
                }
                if begin.y == end.y {
                    return pos.x >= begin.x && pos.x <= end.x;
                }
                if pos.y == begin.y {
                    return pos.x >= begin.x;
                }
                if pos.y == end.y {
                    return pos.x <= end.x;
                }
                true
            }
        }
    }

    /// Shifts or invalidates the selection when the scroll region `top..=bot`
    /// rotates by `n` rows (positive scrolls content up, negative scrolls it
    /// down), matching how the terminal buffer itself rotates line ranges.
    pub fn scroll(&mut self, top: usize, bot: usize, n: isize) {
        if self.mode == SelectionMode::Idle || n == 0 {
            return;
        }

        if !in_range(self.ob.y, top, bot) || !in_range(self.oe.y, top, bot) {
            self.clear();
            return;
        }

        let (Some(ob), Some(oe)) = (shift_row(self.ob.y, top, bot, n), shift_row(self.oe.y, top, bot, n))
        else {
            self.clear();
            return;
        };

        self.ob.y = ob;
        self.oe.y = oe;
        self.nb.y = shift_row(self.nb.y, top, bot, n).unwrap_or(self.nb.y);
        self.ne.y = shift_row(self.ne.y, top, bot, n).unwrap_or(self.ne.y);
    }

    /// Serializes the selected cells to UTF-8: rectangular selections keep
    /// their column window on every row, regular selections take full rows
    /// between the first and last, trailing spaces on each line are trimmed,
    /// and wrapped rows are joined without an inserted newline.
    #[must_use]
    pub fn get_text(&self, buffer: &TerminalBufferHolder) -> String {
        if self.mode == SelectionMode::Idle {
            return String::new();
        }

        let (begin, end) = (self.nb, self.ne);
        let mut out = String::new();

        for y in begin.y..=end.y {
            let (row_start, row_end) = match self.kind {
                SelectionKind::Rectangular => min_max(begin.x, end.x),
                SelectionKind::Regular => {
                    let start = if y == begin.y { begin.x } else { 0 };
                    let end_x = if y == end.y {
                        end.x
                    } else {
                        buffer.width.saturating_sub(1)
                    };
                    (start, end_x)
                }
            };

            let mut line = String::new();
            for x in row_start..=row_end {
                match buffer.char_at(&CursorPos { x, y }) {
                    Some(TChar::NewLine) | None => break,
                    Some(c) => line.push_str(&c.to_string()),
                }
            }

            out.push_str(line.trim_end_matches(' '));

            let last_row = y == end.y;
            let joins_next = self.kind == SelectionKind::Regular && buffer.row_wrapped(y);
            if !last_row && !joins_next {
                out.push('\n');
            }
        }

        out
    }
}

fn order(a: CursorPos, b: CursorPos) -> (CursorPos, CursorPos) {
    if (a.y, a.x) <= (b.y, b.x) {
        (a, b)
    } else {
        (b, a)
    }
}

const fn min_max(a: usize, b: usize) -> (usize, usize) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

const fn in_range(y: usize, top: usize, bot: usize) -> bool {
    y >= top && y <= bot
}

fn shift_row(y: usize, top: usize, bot: usize, n: isize) -> Option<usize> {
    if y < top || y > bot {
        return Some(y);
    }

    let shifted = isize::try_from(y).ok()?.checked_sub(n)?;
    let top = isize::try_from(top).ok()?;
    let bot = isize::try_from(bot).ok()?;
    if shifted < top || shifted > bot {
        return None;
    }
    usize::try_from(shifted).ok()
}

/// The position one cell to the left of `pos`, following a wrapped row onto
/// the row above, or `None` if that would cross a hard line break or go off
/// the top of the buffer.
fn prev_pos(buffer: &TerminalBufferHolder, pos: CursorPos) -> Option<CursorPos> {
    if pos.x > 0 {
        return Some(CursorPos {
            x: pos.x - 1,
            y: pos.y,
        });
    }

    let prev_row = pos.y.checked_sub(1)?;
    buffer
        .row_wrapped(prev_row)
        .then_some(CursorPos {
            x: buffer.width.saturating_sub(1),
            y: prev_row,
        })
}

/// The position one cell to the right of `pos`, following a wrap onto the row
/// below, or `None` if that would cross a hard line break.
fn next_pos(buffer: &TerminalBufferHolder, pos: CursorPos) -> Option<CursorPos> {
    let last_col = buffer.width.saturating_sub(1);
    if pos.x < last_col {
        return Some(CursorPos {
            x: pos.x + 1,
            y: pos.y,
        });
    }

    buffer.row_wrapped(pos.y).then_some(CursorPos {
        x: 0,
        y: pos.y + 1,
    })
}

fn is_word_delimiter(c: &TChar, delimiters: &str) -> bool {
    match c {
        TChar::NewLine => true,
        TChar::Space => delimiters.contains(' '),
        TChar::Ascii(b) => delimiters.contains(*b as char),
        TChar::Utf8(bytes) => std::str::from_utf8(bytes)
            .ok()
            .and_then(|s| s.chars().next())
            .is_some_and(|c| delimiters.contains(c)),
    }
}

fn extend_word_left(buffer: &TerminalBufferHolder, mut pos: CursorPos, delimiters: &str) -> CursorPos {
    while let Some(candidate) = prev_pos(buffer, pos) {
        match buffer.char_at(&candidate) {
            Some(c) if !is_word_delimiter(c, delimiters) => pos = candidate,
            _ => break,
        }
    }
    pos
}

fn extend_word_right(buffer: &TerminalBufferHolder, mut pos: CursorPos, delimiters: &str) -> CursorPos {
    while let Some(candidate) = next_pos(buffer, pos) {
        match buffer.char_at(&candidate) {
            Some(c) if !is_word_delimiter(c, delimiters) => pos = candidate,
            _ => break,
        }
    }
    pos
}

#[cfg(test)]
mod tests {
    use super::*;
    use freminal_common::buffer_states::buffer_type::BufferType;

    fn write_line(buffer: &mut TerminalBufferHolder, cursor: CursorPos, data: &[u8]) -> CursorPos {
        match buffer.insert_data(&cursor, data, &Default::default()) {
            Ok(response) => response.new_cursor_pos,
            Err(e) => panic!("insert should succeed: {e}"),
        }
    }

    fn buffer_with(lines: &[&str], width: usize) -> TerminalBufferHolder {
        let mut buffer = TerminalBufferHolder::new(width, 10, BufferType::Primary);
        let mut cursor = CursorPos { x: 0, y: 0 };
        for (i, line) in lines.iter().enumerate() {
            cursor = write_line(&mut buffer, cursor, line.as_bytes());
            if i != lines.len() - 1 {
                cursor = write_line(&mut buffer, cursor, b"\n");
            }
        }
        buffer
    }

    #[test]
    fn starts_idle_by_default() {
        let selection = Selection::default();
        assert!(!selection.is_active());
        assert_eq!(selection.mode, SelectionMode::Idle);
    }

    #[test]
    fn start_then_extend_orders_reversed_drag() {
        let buffer = buffer_with(&["hello world"], 20);
        let mut selection = Selection::default();
        selection.start(CursorPos { x: 6, y: 0 }, SelectionSnap::None, false);
        selection.extend(
            CursorPos { x: 0, y: 0 },
            SelectionKind::Regular,
            true,
            &buffer,
            " ",
        );

        let (begin, end) = selection.normalized();
        assert_eq!(begin, CursorPos { x: 0, y: 0 });
        assert_eq!(end, CursorPos { x: 6, y: 0 });
        assert_eq!(selection.mode, SelectionMode::Ready);
    }

    #[test]
    fn word_snap_expands_to_word_boundaries() {
        let buffer = buffer_with(&["hello world"], 20);
        let mut selection = Selection::default();
        selection.start(CursorPos { x: 7, y: 0 }, SelectionSnap::Word, false);
        selection.extend(
            CursorPos { x: 7, y: 0 },
            SelectionKind::Regular,
            true,
            &buffer,
            " \t\n!\"#$%&'()*+,-./:;<=>?@[\\]^`{|}~",
        );

        let (begin, end) = selection.normalized();
        assert_eq!(begin, CursorPos { x: 6, y: 0 });
        assert_eq!(end, CursorPos { x: 10, y: 0 });
        assert_eq!(selection.get_text(&buffer), "world");
    }

    #[test]
    fn line_snap_takes_full_row() {
        let buffer = buffer_with(&["hi"], 10);
        let mut selection = Selection::default();
        selection.start(CursorPos { x: 0, y: 0 }, SelectionSnap::Line, false);
        selection.extend(
            CursorPos { x: 0, y: 0 },
            SelectionKind::Regular,
            true,
            &buffer,
            " ",
        );

        assert_eq!(selection.get_text(&buffer), "hi");
    }

    #[test]
    fn get_text_spans_multiple_rows() {
        let buffer = buffer_with(&["abc", "def"], 10);
        let mut selection = Selection::default();
        selection.start(CursorPos { x: 1, y: 0 }, SelectionSnap::None, false);
        selection.extend(
            CursorPos { x: 1, y: 1 },
            SelectionKind::Regular,
            true,
            &buffer,
            " ",
        );

        assert_eq!(selection.get_text(&buffer), "bc\nde");
    }

    #[test]
    fn rectangular_selection_keeps_column_window() {
        let buffer = buffer_with(&["abcdef", "ghijkl"], 10);
        let mut selection = Selection::default();
        selection.start(CursorPos { x: 1, y: 0 }, SelectionSnap::None, false);
        selection.extend(
            CursorPos { x: 3, y: 1 },
            SelectionKind::Rectangular,
            true,
            &buffer,
            " ",
        );

        assert_eq!(selection.get_text(&buffer), "bcd\nhij");
    }

    #[test]
    fn clear_resets_to_idle() {
        let buffer = buffer_with(&["hi"], 10);
        let mut selection = Selection::default();
        selection.start(CursorPos { x: 0, y: 0 }, SelectionSnap::None, false);
        selection.extend(
            CursorPos { x: 1, y: 0 },
            SelectionKind::Regular,
            true,
            &buffer,
            " ",
        );
        selection.clear();

        assert!(!selection.is_active());
        assert_eq!(selection.get_text(&buffer), "");
    }

    #[test]
    fn scroll_shifts_rows_within_region() {
        let mut selection = Selection::default();
        selection.start(CursorPos { x: 0, y: 5 }, SelectionSnap::None, false);
        selection.mode = SelectionMode::Ready;
        selection.nb = CursorPos { x: 0, y: 5 };
        selection.ne = CursorPos { x: 0, y: 5 };
        selection.oe = CursorPos { x: 0, y: 5 };

        selection.scroll(0, 9, 2);

        assert!(selection.is_active());
        assert_eq!(selection.ob.y, 3);
        assert_eq!(selection.nb.y, 3);
    }

    #[test]
    fn scroll_clears_selection_outside_region() {
        let mut selection = Selection::default();
        selection.start(CursorPos { x: 0, y: 5 }, SelectionSnap::None, false);
        selection.mode = SelectionMode::Ready;

        selection.scroll(0, 9, 20);

        assert!(!selection.is_active());
    }

    #[test]
    fn contains_reports_full_span_for_multiline_regular_selection() {
        let mut selection = Selection::default();
        selection.start(CursorPos { x: 2, y: 0 }, SelectionSnap::None, false);
        selection.mode = SelectionMode::Ready;
        selection.nb = CursorPos { x: 2, y: 0 };
        selection.ne = CursorPos { x: 1, y: 1 };

        assert!(selection.contains(CursorPos { x: 5, y: 0 }));
        assert!(selection.contains(CursorPos { x: 0, y: 1 }));
        assert!(!selection.contains(CursorPos { x: 0, y: 0 }));
        assert!(!selection.contains(CursorPos { x: 5, y: 1 }));
    }
}
