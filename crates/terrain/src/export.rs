//! CSV serialization of point clouds.
//!
//! The format is the one plotting scripts expect: a single `x,y,z` header
//! followed by one comma-separated row per point.

use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::Path;

use crate::error::{Result, TerrainError};
use crate::projector::Point;

pub const HEADER: &str = "x,y,z";

/// Writes `points` to `path`, creating or truncating the file.
pub fn export(points: &[Point], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_points(points, &mut writer)?;
    writer.flush()?;
    tracing::info!("Points saved to {}", path.display());
    Ok(())
}

/// Writes the header and every point, in order, to `writer`.
///
/// Coordinates use the shortest representation that parses back to the
/// same `f64`.
pub fn write_points<W: Write>(points: &[Point], writer: &mut W) -> Result<()> {
    writeln!(writer, "{HEADER}")?;
    for p in points {
        writeln!(writer, "{:?},{:?},{:?}", p.x, p.y, p.z)?;
    }
    Ok(())
}

/// Serializes points into an in-memory CSV document.
pub fn to_csv_string(points: &[Point]) -> Result<String> {
    let mut buf = Vec::with_capacity(points.len() * 24 + HEADER.len() + 1);
    write_points(points, &mut buf)?;
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}

/// Parses a document produced by [`write_points`].
///
/// The header row is required; blank lines are skipped.
pub fn read_points<R: BufRead>(reader: R) -> Result<Vec<Point>> {
    let mut lines = reader.lines().enumerate();

    match lines.next() {
        Some((_, header)) => {
            let header = header?;
            if header.trim() != HEADER {
                return Err(TerrainError::Csv {
                    line: 1,
                    message: format!("expected header `{HEADER}`, found `{header}`"),
                });
            }
        }
        None => {
            return Err(TerrainError::Csv {
                line: 1,
                message: "missing header".to_string(),
            });
        }
    }

    let mut points = Vec::new();
    for (idx, line) in lines {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        points.push(parse_row(line, idx + 1)?);
    }
    Ok(points)
}

fn parse_row(line: &str, line_no: usize) -> Result<Point> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != 3 {
        return Err(TerrainError::Csv {
            line: line_no,
            message: format!("expected 3 fields, found {}", fields.len()),
        });
    }

    let parse = |s: &str| {
        s.parse::<f64>().map_err(|e| TerrainError::Csv {
            line: line_no,
            message: format!("invalid number `{s}`: {e}"),
        })
    };

    Ok(Point {
        x: parse(fields[0])?,
        y: parse(fields[1])?,
        z: parse(fields[2])?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_write_format() {
        let points = vec![Point::new(0.0, 5.0, 12.25), Point::new(5.0, 0.0, -0.5)];
        let csv = to_csv_string(&points).unwrap();
        assert_eq!(csv, "x,y,z\n0.0,5.0,12.25\n5.0,0.0,-0.5\n");
    }

    #[test]
    fn test_empty_point_set_writes_header_only() {
        assert_eq!(to_csv_string(&[]).unwrap(), "x,y,z\n");
    }

    #[test]
    fn test_read_back_preserves_order_and_values() {
        let points: Vec<Point> = (0..50)
            .map(|i| {
                let f = i as f64;
                Point::new(f * 0.1, f / 3.0, (f * 1.7).sin() * 123.456)
            })
            .collect();
        let csv = to_csv_string(&points).unwrap();
        let parsed = read_points(Cursor::new(csv)).unwrap();
        assert_eq!(parsed, points);
    }

    #[test]
    fn test_read_rejects_bad_header() {
        let err = read_points(Cursor::new("a,b,c\n1,2,3\n")).unwrap_err();
        assert!(matches!(err, TerrainError::Csv { line: 1, .. }));
    }

    #[test]
    fn test_read_reports_bad_row() {
        let err = read_points(Cursor::new("x,y,z\n1,2,3\n1,two,3\n")).unwrap_err();
        assert!(matches!(err, TerrainError::Csv { line: 3, .. }));

        let err = read_points(Cursor::new("x,y,z\n1,2\n")).unwrap_err();
        assert!(matches!(err, TerrainError::Csv { line: 2, .. }));
    }

    #[test]
    fn test_export_creates_and_overwrites_file() {
        let dir = std::env::temp_dir().join(format!("terrain-export-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("terrain.csv");

        export(&[Point::new(1.0, 2.0, 3.0)], &path).unwrap();
        export(&[Point::new(4.0, 5.0, 6.0)], &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "x,y,z\n4.0,5.0,6.0\n");
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let path = std::env::temp_dir()
            .join("terrain-definitely-missing-dir")
            .join("nested")
            .join("terrain.csv");
        let err = export(&[], &path).unwrap_err();
        assert!(matches!(err, TerrainError::Io(_)));
    }
}
