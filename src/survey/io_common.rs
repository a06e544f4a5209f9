use std::fs;
use std::io::Read;
use std::path::Path;

use chrono::TimeZone;

use crate::survey::*;

/// Reads a whole file, or the standard input for `-`.
pub fn read_input_text(path: &str) -> SurveyResult<String> {
    if path == "-" {
        let mut contents = String::new();
        std::io::stdin()
            .read_to_string(&mut contents)
            .context(OpeningJsonSnafu { path })?;
        Ok(contents)
    } else {
        fs::read_to_string(path).context(OpeningJsonSnafu { path })
    }
}

pub fn is_stdout(out: &str) -> bool {
    out.is_empty() || out == "stdout"
}

pub fn write_output(path: &Path, contents: &str) -> SurveyResult<()> {
    let p = path.display().to_string();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).context(WritingOutputSnafu { path: p.clone() })?;
        }
    }
    fs::write(path, contents).context(WritingOutputSnafu { path: p.clone() })?;
    info!("write_output: wrote {}", p);
    Ok(())
}

/// Converts a spreadsheet date (days since 1899-12-30) to a UTC timestamp.
pub fn excel_serial_to_utc(serial: f64) -> Option<DateTime<Utc>> {
    let epoch = chrono::NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    let naive = epoch.checked_add_signed(chrono::Duration::milliseconds(millis))?;
    Some(Utc.from_utc_datetime(&naive))
}
