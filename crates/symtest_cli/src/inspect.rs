//! Offline inspection of Test-Case files.

use std::io::Write;
use std::path::Path;
use symtest_core::{encode_name, CoreError, CoreResult, Kind};
use symtest_log::TestCaseReader;

/// Print every record of a Test-Case file, returning the number decoded.
///
/// Undecodable records are reported inline and skipped. With `json` each
/// record is printed as one JSON object per line.
///
/// # Errors
///
/// Returns `Io` if the file cannot be opened or `out` cannot be written
pub fn inspect_file(path: impl AsRef<Path>, json: bool, out: &mut dyn Write) -> CoreResult<usize> {
    let mut decoded = 0;

    for (index, item) in TestCaseReader::open(path)?.enumerate() {
        match item {
            Ok(case) if json => {
                let line = serde_json::to_string(&case).map_err(|err| CoreError::Io {
                    message: err.to_string(),
                })?;
                writeln!(out, "{}", line)?;
                decoded += 1;
            }
            Ok(case) => {
                writeln!(
                    out,
                    "#{} path={} time={} {}",
                    index, case.high_level_path_id, case.time_stamp, case.assignment
                )?;
                writeln!(out, "    output: {:?}", case.output)?;
                decoded += 1;
            }
            Err(err) => writeln!(out, "#{} undecodable: {}", index, err)?,
        }
    }

    Ok(decoded)
}

/// Encoded assignment name for a base, optional kind letter and hint
///
/// # Errors
///
/// Returns `Decoding` for an unknown kind letter
pub fn encode_name_command(base: &str, kind: Option<&str>, hint: Option<&str>) -> CoreResult<String> {
    let kind = kind.map(Kind::from_letter).transpose()?;
    Ok(encode_name(base, kind, hint))
}
