// Responses exported from a form tool as a spreadsheet.
//
// The first row holds the field names (`nps`, `internet_0`, `liked_most`, ...)
// and each following row is one response.

use calamine::{open_workbook, DataType, Reader, Xlsx};
use serde_json::Map as JSMap;

use crate::survey::io_common::excel_serial_to_utc;
use crate::survey::*;

pub fn read_msforms_responses(
    path: &str,
    worksheet_name: Option<&str>,
) -> BSurveyResult<Vec<SurveyRecord>> {
    let wrange = get_range(path, worksheet_name)?;

    let mut iter = wrange.rows();
    let header: Vec<String> = iter
        .next()
        .context(EmptyExcelSnafu {})?
        .iter()
        .map(|c| match c {
            DataType::String(s) => s.trim().to_string(),
            x => x.to_string(),
        })
        .collect();
    debug!("read_msforms_responses: header: {:?}", header);

    let mut res: Vec<SurveyRecord> = Vec::new();
    for (idx, row) in iter.enumerate() {
        // The header is line 1.
        let lineno = idx as u64 + 2;
        let mut obj: JSMap<String, JSValue> = JSMap::new();
        for (name, cell) in header.iter().zip(row.iter()) {
            if name.is_empty() {
                continue;
            }
            if let Some(v) = cell_value(cell, lineno)? {
                obj.insert(name.clone(), v);
            }
        }
        if obj.is_empty() {
            debug!("read_msforms_responses: skipping empty line {}", lineno);
            continue;
        }
        let record: SurveyRecord = serde_json::from_value(JSValue::Object(obj))
            .context(InvalidRecordSnafu { position: res.len() })?;
        res.push(record);
    }
    info!("read_msforms_responses: {} responses in {}", res.len(), path);
    Ok(res)
}

fn cell_value(cell: &DataType, lineno: u64) -> SurveyResult<Option<JSValue>> {
    let v = match cell {
        DataType::Empty => None,
        DataType::String(s) if s.trim().is_empty() => None,
        DataType::String(s) => Some(JSValue::from(s.clone())),
        DataType::Int(i) => Some(JSValue::from(*i)),
        DataType::Float(f) if f.fract() == 0.0 => Some(JSValue::from(*f as i64)),
        DataType::Float(f) => Some(JSValue::from(*f)),
        DataType::Bool(b) => Some(JSValue::from(*b)),
        DataType::DateTime(serial) => {
            let ts = excel_serial_to_utc(*serial).context(ExcelWrongCellTypeSnafu {
                lineno,
                content: format!("{:?}", cell),
            })?;
            Some(JSValue::from(ts.to_rfc3339()))
        }
        DataType::Error(_) => {
            return Err(SurveyError::ExcelWrongCellType {
                lineno,
                content: format!("{:?}", cell),
            });
        }
    };
    Ok(v)
}

fn get_range(path: &str, worksheet_name: Option<&str>) -> BSurveyResult<calamine::Range<DataType>> {
    debug!(
        "get_range: path: {:?} worksheet: {:?}",
        path, worksheet_name
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(name) = worksheet_name {
        let wrange = workbook
            .worksheet_range(name)
            .context(EmptyExcelSnafu {})?
            .context(OpeningExcelSnafu { path })?;
        return Ok(wrange);
    }
    let all_worksheets = workbook.worksheets();
    match all_worksheets.as_slice() {
        [] => Err(Box::new(SurveyError::EmptyExcel {})),
        [(name, wrange)] => {
            debug!("get_range: using the only worksheet {:?}", name);
            Ok(wrange.clone())
        }
        l => Err(Box::new(SurveyError::ExcelWorksheetRequired {
            names: l.iter().map(|(n, _)| n.clone()).collect(),
        })),
    }
}
