//! Map resource parser.
//!
//! A map file is plain text:
//!
//! ```text
//! # optional comment lines and blank lines are skipped
//! 5 5 5 5        <- cell (0, 0): NE SE SW NW color codes
//! 5 4 5 5        <- cell (0, 1)
//! ...            <- width * height cell lines, index x * height + y
//! 2,0            <- target cell
//! 0,4            <- destination cell
//! ```
//!
//! Color digits sit at the fixed character offsets 0, 2, 4 and 6 of each cell
//! line; anything after offset 6 is ignored.  Grid dimensions are not stored in
//! the file and are supplied by the caller.
//!
//! Every defect is reported as [`GridError::MapFormat`] with the 1-based line
//! number so the run can abort before any filtering starts.

use std::path::Path;

use gridloc_types::{Cell, Color, GridCellObservation, GridError};
use tracing::info;

use crate::grid_map::{GridMap, checked_cell_count};

const DIGIT_OFFSETS: [usize; 4] = [0, 2, 4, 6];

/// A parsed map resource.
#[derive(Debug, Clone, PartialEq)]
pub struct MapFile {
    pub map: GridMap,
    pub target: Cell,
    pub destination: Cell,
}

impl MapFile {
    /// Read and parse the map file at `path`.
    ///
    /// # Errors
    ///
    /// [`GridError::Io`] if the file cannot be read, otherwise the errors of
    /// [`MapFile::parse`].
    pub fn load(path: impl AsRef<Path>, width: usize, height: usize) -> Result<Self, GridError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| GridError::Io(format!("failed to read map {}: {e}", path.display())))?;
        let parsed = Self::parse(&raw, width, height)?;
        info!(
            path = %path.display(),
            width,
            height,
            target = %parsed.target,
            destination = %parsed.destination,
            "map loaded"
        );
        Ok(parsed)
    }

    /// Parse map text for a `width x height` grid.
    pub fn parse(text: &str, width: usize, height: usize) -> Result<Self, GridError> {
        let cell_count = checked_cell_count(width, height)?;
        let lines: Vec<(usize, &str)> = text
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim_end()))
            .filter(|(_, l)| {
                let t = l.trim_start();
                !t.is_empty() && !t.starts_with('#')
            })
            .collect();

        let expected = cell_count + 2;
        if lines.len() < expected {
            let line = text.lines().count() + 1;
            return Err(GridError::MapFormat {
                line,
                reason: format!(
                    "expected {cell_count} cell lines and 2 coordinate lines, found {} lines",
                    lines.len()
                ),
            });
        }
        if let Some((line, _)) = lines.get(expected) {
            return Err(GridError::MapFormat {
                line: *line,
                reason: "unexpected content after destination line".to_string(),
            });
        }

        let cells = lines[..cell_count]
            .iter()
            .map(|(line, text)| parse_cell_line(*line, text))
            .collect::<Result<Vec<_>, _>>()?;
        let map = GridMap::new(width, height, cells)?;

        let (target_line, target_text) = lines[cell_count];
        let (dest_line, dest_text) = lines[cell_count + 1];
        let target = parse_coordinate(target_line, target_text, &map)?;
        let destination = parse_coordinate(dest_line, dest_text, &map)?;

        Ok(Self {
            map,
            target,
            destination,
        })
    }
}

fn parse_cell_line(line: usize, text: &str) -> Result<GridCellObservation, GridError> {
    let bytes = text.as_bytes();
    let mut colors = [Color::Unknown; 4];
    for (slot, offset) in DIGIT_OFFSETS.iter().enumerate() {
        if *offset > 0 {
            check_separator(line, bytes, offset - 1)?;
        }
        let byte = bytes.get(*offset).copied().ok_or_else(|| GridError::MapFormat {
            line,
            reason: format!("cell line too short, missing color at offset {offset}"),
        })?;
        if !byte.is_ascii_digit() {
            return Err(GridError::MapFormat {
                line,
                reason: format!("expected a color digit at offset {offset}, found '{}'", byte as char),
            });
        }
        colors[slot] = match Color::from_code(byte - b'0') {
            Some(Color::Unknown) | None => {
                return Err(GridError::MapFormat {
                    line,
                    reason: format!("color code {} is not part of the map palette", byte as char),
                });
            }
            Some(color) => color,
        };
    }
    Ok(GridCellObservation::from_array(colors))
}

fn check_separator(line: usize, bytes: &[u8], offset: usize) -> Result<(), GridError> {
    match bytes.get(offset) {
        Some(b' ' | b'\t') => Ok(()),
        Some(other) => Err(GridError::MapFormat {
            line,
            reason: format!("expected a space at offset {offset}, found '{}'", *other as char),
        }),
        None => Err(GridError::MapFormat {
            line,
            reason: format!("cell line too short, missing separator at offset {offset}"),
        }),
    }
}

fn parse_coordinate(line: usize, text: &str, map: &GridMap) -> Result<Cell, GridError> {
    let bad = |reason: String| GridError::MapFormat { line, reason };
    let (x, y) = text
        .split_once(',')
        .ok_or_else(|| bad(format!("expected 'x,y' coordinate, found '{}'", text.trim())))?;
    let x: i64 = x
        .trim()
        .parse()
        .map_err(|_| bad(format!("invalid x coordinate '{}'", x.trim())))?;
    let y: i64 = y
        .trim()
        .parse()
        .map_err(|_| bad(format!("invalid y coordinate '{}'", y.trim())))?;
    if !map.contains(x, y) {
        return Err(bad(format!(
            "coordinate ({x}, {y}) is outside the {}x{} grid",
            map.width(),
            map.height()
        )));
    }
    Ok(Cell::new(x as usize, y as usize))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_two() -> String {
        [
            "# 2x2 test map",
            "5 5 5 5",
            "4 2 1 3",
            "",
            "0 0 0 0  trailing notes are ignored",
            "5 4 5 4",
            "1,1",
            "0,1",
        ]
        .join("\n")
    }

    #[test]
    fn parses_cells_and_coordinates() {
        let parsed = MapFile::parse(&two_by_two(), 2, 2).unwrap();
        assert_eq!(parsed.map.width(), 2);
        assert_eq!(
            parsed.map.lookup(0, 1).unwrap(),
            GridCellObservation::new(Color::Red, Color::Green, Color::Blue, Color::Yellow)
        );
        assert_eq!(
            parsed.map.lookup(1, 0).unwrap(),
            GridCellObservation::uniform(Color::Black)
        );
        assert_eq!(parsed.target, Cell::new(1, 1));
        assert_eq!(parsed.destination, Cell::new(0, 1));
    }

    #[test]
    fn missing_lines_are_reported() {
        let text = "5 5 5 5\n5 5 5 5\n1,1\n";
        let err = MapFile::parse(text, 2, 2).unwrap_err();
        assert!(matches!(err, GridError::MapFormat { .. }));
    }

    #[test]
    fn trailing_content_is_reported_with_line_number() {
        let text = format!("{}\n9,9", two_by_two());
        let err = MapFile::parse(&text, 2, 2).unwrap_err();
        assert_eq!(
            err,
            GridError::MapFormat {
                line: 9,
                reason: "unexpected content after destination line".to_string()
            }
        );
    }

    #[test]
    fn non_digit_at_fixed_offset_is_rejected() {
        let text = two_by_two().replace("4 2 1 3", "4 x 1 3");
        let err = MapFile::parse(&text, 2, 2).unwrap_err();
        match err {
            GridError::MapFormat { line, reason } => {
                assert_eq!(line, 3);
                assert!(reason.contains("offset 2"), "{reason}");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn unknown_color_code_is_rejected() {
        let text = two_by_two().replace("4 2 1 3", "4 2 6 3");
        assert!(matches!(
            MapFile::parse(&text, 2, 2),
            Err(GridError::MapFormat { line: 3, .. })
        ));
        let text = two_by_two().replace("4 2 1 3", "4 2 1 9");
        assert!(MapFile::parse(&text, 2, 2).is_err());
    }

    #[test]
    fn missing_separator_is_rejected() {
        let text = two_by_two().replace("4 2 1 3", "4021103");
        match MapFile::parse(&text, 2, 2).unwrap_err() {
            GridError::MapFormat { line, reason } => {
                assert_eq!(line, 3);
                assert!(reason.contains("offset 1"), "{reason}");
            }
            other => panic!("unexpected error {other:?}"),
        }
        let tabbed = two_by_two().replace("4 2 1 3", "4\t2\t1\t3");
        assert!(MapFile::parse(&tabbed, 2, 2).is_ok());
    }

    #[test]
    fn oversized_dimensions_are_invalid_config() {
        let err = MapFile::parse("5 5 5 5\n0,0\n0,0\n", usize::MAX / 2, 3).unwrap_err();
        assert!(matches!(err, GridError::InvalidConfig(_)), "{err:?}");
    }

    #[test]
    fn short_cell_line_is_rejected() {
        let text = two_by_two().replace("4 2 1 3", "4 2 1");
        assert!(matches!(
            MapFile::parse(&text, 2, 2),
            Err(GridError::MapFormat { line: 3, .. })
        ));
    }

    #[test]
    fn coordinate_outside_grid_is_rejected() {
        let text = two_by_two().replace("1,1", "2,0");
        assert!(matches!(
            MapFile::parse(&text, 2, 2),
            Err(GridError::MapFormat { line: 7, .. })
        ));
        let text = two_by_two().replace("0,1", "0;1");
        assert!(matches!(
            MapFile::parse(&text, 2, 2),
            Err(GridError::MapFormat { line: 8, .. })
        ));
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("grid.map");
        std::fs::write(&path, two_by_two()).expect("write map");
        let parsed = MapFile::load(&path, 2, 2).expect("load");
        assert_eq!(parsed.map.cell_count(), 4);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let err = MapFile::load(dir.path().join("absent.map"), 2, 2).unwrap_err();
        assert!(matches!(err, GridError::Io(_)));
    }
}
