// Copyright (C) 2024-2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::ansi::{ParserOutcome, TerminalOutput, parse_param_as};
use crate::error::ParserFailures;

/// Scroll Up (SU)
///
/// Scrolls the scroll region up by `n` lines, pulling in blank lines at the
/// bottom margin.
///
/// ESC [ Pn S
/// # Errors
/// Will return an error if the parameter is not a valid number
pub fn ansi_parser_inner_csi_finished_scroll_up(
    params: &[u8],
    output: &mut Vec<TerminalOutput>,
) -> ParserOutcome {
    let Ok(param) = parse_param_as::<usize>(params) else {
        return ParserOutcome::InvalidParserFailure(ParserFailures::UnhandledScrollCommand(
            format!("{params:?}"),
        ));
    };

    let param = match param {
        Some(0) | None => 1,
        Some(n) => n,
    };

    output.push(TerminalOutput::ScrollUp(param));

    ParserOutcome::Finished
}

/// Scroll Down (SD)
///
/// Scrolls the scroll region down by `n` lines, pulling in blank lines at the
/// top margin.
///
/// ESC [ Pn T
/// # Errors
/// Will return an error if the parameter is not a valid number
pub fn ansi_parser_inner_csi_finished_scroll_down(
    params: &[u8],
    output: &mut Vec<TerminalOutput>,
) -> ParserOutcome {
    let Ok(param) = parse_param_as::<usize>(params) else {
        return ParserOutcome::InvalidParserFailure(ParserFailures::UnhandledScrollCommand(
            format!("{params:?}"),
        ));
    };

    let param = match param {
        Some(0) | None => 1,
        Some(n) => n,
    };

    output.push(TerminalOutput::ScrollDown(param));

    ParserOutcome::Finished
}
