// Copyright (C) 2024-2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::ansi::{ParserOutcome, TerminalOutput, parse_param_as};
use crate::error::ParserFailures;

/// Horizontal Position Relative (HPR)
///
/// Moves the cursor forward `n` columns. Unlike CUF, HPR does not wrap and
/// is unaffected by origin mode.
///
/// ESC [ Pn a
/// # Errors
/// Will return an error if the parameter is not a valid number
pub fn ansi_parser_inner_csi_finished_hpr(
    params: &[u8],
    output: &mut Vec<TerminalOutput>,
) -> ParserOutcome {
    let Ok(param) = parse_param_as::<usize>(params) else {
        return ParserOutcome::InvalidParserFailure(ParserFailures::UnhandledPositionCommand(
            format!("{params:?}"),
        ));
    };

    let param = match param {
        Some(0 | 1) | None => 1,
        Some(n) => n,
    };

    output.push(TerminalOutput::HorizontalPositionRelative(param));

    ParserOutcome::Finished
}

/// Vertical Position Relative (VPR)
///
/// Moves the cursor down `n` rows.
///
/// ESC [ Pn e
/// # Errors
/// Will return an error if the parameter is not a valid number
pub fn ansi_parser_inner_csi_finished_vpr(
    params: &[u8],
    output: &mut Vec<TerminalOutput>,
) -> ParserOutcome {
    let Ok(param) = parse_param_as::<usize>(params) else {
        return ParserOutcome::InvalidParserFailure(ParserFailures::UnhandledPositionCommand(
            format!("{params:?}"),
        ));
    };

    let param = match param {
        Some(0 | 1) | None => 1,
        Some(n) => n,
    };

    output.push(TerminalOutput::VerticalPositionRelative(param));

    ParserOutcome::Finished
}

/// Vertical Position Absolute (VPA)
///
/// Moves the cursor to the given row, keeping the column unchanged.
///
/// ESC [ Pn d
/// # Errors
/// Will return an error if the parameter is not a valid number
pub fn ansi_parser_inner_csi_finished_vpa(
    params: &[u8],
    output: &mut Vec<TerminalOutput>,
) -> ParserOutcome {
    let Ok(param) = parse_param_as::<usize>(params) else {
        return ParserOutcome::InvalidParserFailure(ParserFailures::UnhandledPositionCommand(
            format!("{params:?}"),
        ));
    };

    let param = match param {
        Some(0 | 1) | None => 1,
        Some(n) => n,
    };

    output.push(TerminalOutput::VerticalPositionAbsolute(param));

    ParserOutcome::Finished
}
