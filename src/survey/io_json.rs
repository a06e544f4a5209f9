// Primitives for reading responses in JSON.

use crate::survey::io_common::read_input_text;
use crate::survey::*;

/// Reads a JSON array of responses, or a single response object.
///
/// Nothing is returned if any of the responses is invalid.
pub fn parse_records(contents: &str) -> SurveyResult<Vec<SurveyRecord>> {
    let js: JSValue = serde_json::from_str(contents).context(ParsingJsonSnafu {})?;
    let items = match js {
        JSValue::Array(l) => l,
        x => vec![x],
    };
    let mut res: Vec<SurveyRecord> = Vec::with_capacity(items.len());
    for (position, item) in items.into_iter().enumerate() {
        let record: SurveyRecord =
            serde_json::from_value(item).context(InvalidRecordSnafu { position })?;
        res.push(record);
    }
    Ok(res)
}

pub fn read_json(path: &str) -> BSurveyResult<Vec<SurveyRecord>> {
    let contents = read_input_text(path)?;
    let records = parse_records(&contents)?;
    debug!("read_json: {} responses in {}", records.len(), path);
    Ok(records)
}
