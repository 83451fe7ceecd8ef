// Copyright (C) 2024-2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::ansi::{ParserOutcome, TerminalOutput, parse_param_as};
use crate::error::ParserFailures;

/// Repeat Preceding Graphic Character (REP)
///
/// Repeats the last printed character `n` times. If there is no preceding
/// printable character, the sequence is a no-op.
///
/// ESC [ Pn b
/// # Errors
/// Will return an error if the parameter is not a valid number
pub fn ansi_parser_inner_csi_finished_rep(
    params: &[u8],
    output: &mut Vec<TerminalOutput>,
) -> ParserOutcome {
    let Ok(param) = parse_param_as::<usize>(params) else {
        return ParserOutcome::InvalidParserFailure(ParserFailures::UnhandledREPCommand(format!(
            "{params:?}"
        )));
    };

    let param = match param {
        Some(0) | None => 1,
        Some(n) => n,
    };

    output.push(TerminalOutput::RepeatLastCharacter(param));

    ParserOutcome::Finished
}
