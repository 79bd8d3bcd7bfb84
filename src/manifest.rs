//! CSV manifest of the tags printed on a sheet.

use serde::Serialize;
use std::io::Write;
use std::path::Path;

use crate::error::RenderError;
use crate::layout::Sheet;

#[derive(Debug, Serialize)]
struct ManifestRecord<'a> {
    tag: &'a str,
    row: usize,
    column: usize,
    x_mm: f64,
    y_mm: f64,
    width_mm: f64,
    height_mm: f64,
    payload: String,
}

pub fn write_manifest<W: Write>(sheet: &Sheet, writer: W) -> Result<(), RenderError> {
    let mut wtr = csv::Writer::from_writer(writer);
    let size = sheet.cell_size();
    for cell in sheet.cells() {
        wtr.serialize(ManifestRecord {
            tag: &cell.tag,
            row: cell.row,
            column: cell.column,
            x_mm: cell.position.width,
            y_mm: cell.position.height,
            width_mm: size.width,
            height_mm: size.height,
            payload: sheet.symbol_payload(cell),
        })?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn save_manifest(sheet: &Sheet, path: &Path) -> Result<(), RenderError> {
    let file = std::fs::File::create(path).map_err(|source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_manifest(sheet, std::io::BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SheetSettings;
    use crate::layout::create_sheet;
    use crate::tag::XorShiftSource;
    use csv::ReaderBuilder;

    #[test]
    fn test_write_manifest() {
        let settings = SheetSettings {
            rows: 2,
            cols: 3,
            prefix: Some("https://example.com/t/".to_string()),
            ..Default::default()
        };
        let sheet = create_sheet(&settings, XorShiftSource::from_seed(21)).unwrap();
        let mut buf = Vec::new();
        write_manifest(&sheet, &mut buf).unwrap();

        let mut rdr = ReaderBuilder::new().from_reader(&buf[..]);
        let headers = rdr.headers().unwrap().clone();
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            ["tag", "row", "column", "x_mm", "y_mm", "width_mm", "height_mm", "payload"]
        );

        let records: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 6);
        let last = &records[5];
        let cell = sheet.cell(1, 2).unwrap();
        assert_eq!(&last[0], cell.tag);
        assert_eq!(&last[1], "1");
        assert_eq!(&last[2], "2");
        assert_eq!(last[3].parse::<f64>().unwrap(), cell.position.width);
        assert_eq!(&last[7], format!("https://example.com/t/{}", cell.tag));
    }

    #[test]
    fn test_save_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tags.csv");
        let sheet = create_sheet(&SheetSettings::default(), XorShiftSource::from_seed(3)).unwrap();
        save_manifest(&sheet, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        // header plus one line per cell
        assert_eq!(text.lines().count(), 1 + 7 * 4);
    }
}
