// Copyright (C) 2024-2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::ansi::{ParserOutcome, TerminalOutput, parse_param_as};
use crate::error::ParserFailures;

/// Tab Clear (TBC)
///
/// Values for param:
/// 0 - Clear the tab stop at the cursor column (default)
/// 3 - Clear all tab stops
///
/// ESC [ Pn g
/// # Errors
/// Will return an error if the parameter is not a valid number
pub fn ansi_parser_inner_csi_finished_tbc(
    params: &[u8],
    output: &mut Vec<TerminalOutput>,
) -> ParserOutcome {
    let Ok(param) = parse_param_as::<usize>(params) else {
        return ParserOutcome::InvalidParserFailure(ParserFailures::UnhandledTBCCommand(format!(
            "{params:?}"
        )));
    };

    let param = param.unwrap_or(0);

    output.push(TerminalOutput::TabClear(param));

    ParserOutcome::Finished
}
