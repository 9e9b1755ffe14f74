// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! isochron - ISO 8601 durations and time intervals, parsed and formatted

use std::process::ExitCode;

fn main() -> ExitCode {
    isochron_cli::run()
}
