//! `grammar_quiz_results.xlsx`: one worksheet, "Quiz Results", same three columns as the CSV.

use rust_xlsxwriter::{DocProperties, ExcelDateTime, Format, Workbook};

use super::{ExportError, HEADERS};
use crate::domain::{ResultRow, Score};

pub const SHEET_NAME: &str = "Quiz Results";

const COLUMN_WIDTHS: [f64; 3] = [70.0, 30.0, 30.0];

pub fn render(rows: &[ResultRow], _score: &Score) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();

    // Pin the creation date; otherwise docProps/core.xml carries "now".
    let created = ExcelDateTime::from_ymd(2000, 1, 1)?;
    let props = DocProperties::new()
        .set_title("Grammar Quiz Results")
        .set_creation_datetime(&created);
    workbook.set_properties(&props);

    let header = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, (title, width)) in HEADERS.iter().zip(COLUMN_WIDTHS).enumerate() {
        let col = col as u16;
        sheet.set_column_width(col, width)?;
        sheet.write_string_with_format(0, col, *title, &header)?;
    }

    for (i, r) in rows.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, &r.question)?;
        if let Some(answer) = &r.your_answer {
            sheet.write_string(row, 1, answer)?;
        }
        sheet.write_string(row, 2, &r.correct_answer)?;
    }

    Ok(workbook.save_to_buffer()?)
}

/// Test-side reader for rendered workbooks: unzips the package and resolves
/// shared-string cells of the first sheet into `"B2" -> "than"` pairs.
#[cfg(test)]
pub(crate) mod inspect {
    use std::collections::BTreeMap;
    use std::io::{Cursor, Read};

    pub fn part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("xlsx is a zip");
        let mut file = archive.by_name(name).expect("part present");
        let mut out = String::new();
        file.read_to_string(&mut out).expect("utf-8 part");
        out
    }

    fn between<'a>(s: &'a str, open: &str, close: &str) -> Option<&'a str> {
        let start = s.find(open)? + open.len();
        let end = s[start..].find(close)? + start;
        Some(&s[start..end])
    }

    fn shared_strings(bytes: &[u8]) -> Vec<String> {
        part(bytes, "xl/sharedStrings.xml")
            .split("<si>")
            .skip(1)
            .map(|si| {
                let t = &si[si.find("<t").expect("text run")..];
                between(t, ">", "</t>").unwrap_or_default().to_string()
            })
            .collect()
    }

    pub fn cells(bytes: &[u8]) -> BTreeMap<String, String> {
        let strings = shared_strings(bytes);
        part(bytes, "xl/worksheets/sheet1.xml")
            .split("<c r=\"")
            .skip(1)
            .filter_map(|c| {
                let cell = &c[..c.find("</c>")?];
                let reference = &cell[..cell.find('"')?];
                let index: usize = between(cell, "<v>", "</v>")?.parse().ok()?;
                Some((reference.to_string(), strings.get(index)?.clone()))
            })
            .collect()
    }

    /// Data rows whose "Your Answer" cell equals the "Correct Answer" cell.
    pub fn matching_rows(bytes: &[u8]) -> usize {
        let cells = cells(bytes);
        (2..)
            .take_while(|n| cells.contains_key(&format!("A{n}")))
            .filter(|n| {
                let yours = cells.get(&format!("B{n}"));
                yours.is_some() && yours == cells.get(&format!("C{n}"))
            })
            .count()
    }
}
