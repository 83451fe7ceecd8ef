// Copyright (C) 2024-2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Grid-content tests for DECSTBM scroll regions. Unlike the parser-level
//! `csi_commands_decstbm` tests, these drive a real `TerminalState` and
//! assert on the resulting screen cells, not just the emitted
//! `TerminalOutput` variants.

use freminal_common::buffer_states::cursor::CursorPos;
use freminal_common::buffer_states::tchar::TChar;
use freminal_terminal_emulator::state::internal::TerminalState;

#[test]
fn linefeed_at_bottom_margin_scrolls_only_the_region() {
    let mut state = TerminalState::default();
    state.set_win_size(3, 5);

    // Region covers rows 2..4 (1-based), i.e. 0-based rows 1..=3.
    state.handle_incoming_data(b"\x1b[2;4r");

    state.handle_incoming_data(b"\x1b[1;1HA");
    state.handle_incoming_data(b"\x1b[2;1HB");
    state.handle_incoming_data(b"\x1b[3;1HC");
    state.handle_incoming_data(b"\x1b[4;1HD");
    state.handle_incoming_data(b"\x1b[5;1HE");

    // Place cursor on the bottom margin (0-based y=3) and trigger a linefeed.
    state.handle_incoming_data(b"\x1b[4;1H\n");

    let buffer = &state.get_current_buffer().terminal_buffer;
    assert_eq!(
        buffer.char_at(&CursorPos { x: 0, y: 0 }),
        Some(&TChar::Ascii(b'A')),
        "row above the region must be untouched by the scroll"
    );
    assert_eq!(
        buffer.char_at(&CursorPos { x: 0, y: 1 }),
        Some(&TChar::Ascii(b'C')),
        "region row 1 must have taken on the old row 2's content"
    );
    assert_eq!(
        buffer.char_at(&CursorPos { x: 0, y: 2 }),
        Some(&TChar::Ascii(b'D')),
        "region row 2 must have taken on the old row 3's content"
    );
    assert!(
        buffer.char_at(&CursorPos { x: 0, y: 3 }).is_none(),
        "a fresh blank line must have scrolled in at the bottom margin"
    );
    assert_eq!(
        buffer.char_at(&CursorPos { x: 0, y: 4 }),
        Some(&TChar::Ascii(b'E')),
        "row below the region must be untouched by the scroll"
    );

    // Cursor must stay pinned to the bottom margin, not grow past it.
    let cursor = state.get_current_buffer().cursor_state.pos;
    assert_eq!(cursor.y, 3);
}

#[test]
fn linefeed_above_bottom_margin_just_moves_cursor_down() {
    let mut state = TerminalState::default();
    state.set_win_size(3, 5);
    state.handle_incoming_data(b"\x1b[2;4r");

    state.handle_incoming_data(b"\x1b[1;1HA");
    state.handle_incoming_data(b"\x1b[2;1HB");

    // Cursor sits above the bottom margin (0-based y=1); linefeed should not
    // trigger a scroll at all, just move the cursor down one row.
    state.handle_incoming_data(b"\x1b[2;1H\n");

    let buffer = &state.get_current_buffer().terminal_buffer;
    assert_eq!(
        buffer.char_at(&CursorPos { x: 0, y: 0 }),
        Some(&TChar::Ascii(b'A'))
    );
    assert_eq!(
        buffer.char_at(&CursorPos { x: 0, y: 1 }),
        Some(&TChar::Ascii(b'B'))
    );

    let cursor = state.get_current_buffer().cursor_state.pos;
    assert_eq!(cursor.y, 2);
}

#[test]
fn scroll_up_csi_s_rotates_only_the_region() {
    let mut state = TerminalState::default();
    state.set_win_size(3, 5);
    state.handle_incoming_data(b"\x1b[2;4r");

    state.handle_incoming_data(b"\x1b[1;1HA");
    state.handle_incoming_data(b"\x1b[2;1HB");
    state.handle_incoming_data(b"\x1b[3;1HC");
    state.handle_incoming_data(b"\x1b[4;1HD");
    state.handle_incoming_data(b"\x1b[5;1HE");

    // CSI S (SU) with no cursor-position dependency, unlike a linefeed.
    state.handle_incoming_data(b"\x1b[1S");

    let buffer = &state.get_current_buffer().terminal_buffer;
    assert_eq!(
        buffer.char_at(&CursorPos { x: 0, y: 0 }),
        Some(&TChar::Ascii(b'A'))
    );
    assert_eq!(
        buffer.char_at(&CursorPos { x: 0, y: 1 }),
        Some(&TChar::Ascii(b'C'))
    );
    assert_eq!(
        buffer.char_at(&CursorPos { x: 0, y: 2 }),
        Some(&TChar::Ascii(b'D'))
    );
    assert!(buffer.char_at(&CursorPos { x: 0, y: 3 }).is_none());
    assert_eq!(
        buffer.char_at(&CursorPos { x: 0, y: 4 }),
        Some(&TChar::Ascii(b'E'))
    );
}

#[test]
fn delete_lines_shifts_region_and_clears_bottom() {
    let mut state = TerminalState::default();
    state.set_win_size(3, 5);
    state.handle_incoming_data(b"\x1b[2;4r");

    state.handle_incoming_data(b"\x1b[1;1HA");
    state.handle_incoming_data(b"\x1b[2;1HB");
    state.handle_incoming_data(b"\x1b[3;1HC");
    state.handle_incoming_data(b"\x1b[4;1HD");
    state.handle_incoming_data(b"\x1b[5;1HE");

    // Cursor on region row 1 (0-based), delete one line there.
    state.handle_incoming_data(b"\x1b[2;1H\x1b[1M");

    let buffer = &state.get_current_buffer().terminal_buffer;
    assert_eq!(
        buffer.char_at(&CursorPos { x: 0, y: 0 }),
        Some(&TChar::Ascii(b'A')),
        "row above the region must be untouched"
    );
    assert_eq!(
        buffer.char_at(&CursorPos { x: 0, y: 1 }),
        Some(&TChar::Ascii(b'C')),
        "deleted row 1 must be replaced by old row 2"
    );
    assert_eq!(
        buffer.char_at(&CursorPos { x: 0, y: 2 }),
        Some(&TChar::Ascii(b'D')),
        "old row 3 must shift up to row 2"
    );
    assert!(
        buffer.char_at(&CursorPos { x: 0, y: 3 }).is_none(),
        "bottom margin row must be cleared"
    );
    assert_eq!(
        buffer.char_at(&CursorPos { x: 0, y: 4 }),
        Some(&TChar::Ascii(b'E')),
        "row below the region must be untouched"
    );
}
