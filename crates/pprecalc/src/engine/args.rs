use std::ffi::OsString;

use super::ComputeRequest;

/// Flag asking the engine for a raw binary result on stdout
pub const BINARY_OUTPUT_FLAG: &str = "-obinary";
pub const TAIKO_FLAG: &str = "-taiko";

/// Build the engine's positional argument vector.
///
/// Layout: `<map> <n>x100 <n>x50 <n>m <n>x [+MODS] [-taiko] -obinary`.
/// The mod token is left out when the play has no mods at all and rendered
/// as a bare `+` when bits are set but none are recognised.
pub fn build_args(request: &ComputeRequest) -> Vec<OsString> {
    let stats = &request.stats;
    let mut args: Vec<OsString> = vec![
        request.map_path.clone().into_os_string(),
        format!("{}x100", stats.count_100).into(),
        format!("{}x50", stats.count_50).into(),
        format!("{}m", stats.misses).into(),
        format!("{}x", stats.max_combo).into(),
    ];

    if let Some(tokens) = request.mods.readable() {
        args.push(format!("+{}", tokens).into());
    }

    if request.mode.is_taiko() {
        args.push(TAIKO_FLAG.into());
    }

    args.push(BINARY_OUTPUT_FLAG.into());
    args
}
