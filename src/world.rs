use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Wall,
}

/// Immutable occupancy grid, stored row-major and indexed `[row][col]`
/// (row = Y, col = X).
#[derive(Clone, Debug, PartialEq)]
pub struct GridMap {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

/// Classic 16x16 layout used when no map is configured.
const BUILTIN_ROWS: [&str; 16] = [
    "################",
    "#..............#",
    "#.##..#.###.#..#",
    "#.#...#...#.#..#",
    "#....##........#",
    "#.#.....##..#..#",
    "#.#####.....#..#",
    "#.....#..#.##..#",
    "#.###.#..#.....#",
    "#...#....####..#",
    "#.#.#..#.......#",
    "#.#....#.#.#.#.#",
    "#.####.#.#.#.#.#",
    "#........#.#...#",
    "#..............#",
    "################",
];

impl GridMap {
    pub fn builtin() -> Self {
        let cells = BUILTIN_ROWS
            .iter()
            .flat_map(|row| row.bytes())
            .map(|b| if b == b'#' { Cell::Wall } else { Cell::Empty })
            .collect();
        Self {
            width: BUILTIN_ROWS[0].len(),
            height: BUILTIN_ROWS.len(),
            cells,
        }
    }

    /// Builds a grid from text rows. `#` and `1` are walls; `.`, `0` and
    /// spaces are empty.
    pub fn from_rows<I, S>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut width = None;
        let mut cells = Vec::new();
        let mut height = 0;

        for (row, line) in rows.into_iter().enumerate() {
            let line = line.as_ref().trim_end_matches(['\r', '\n']);
            let mut count = 0;
            for (column, ch) in line.chars().enumerate() {
                let cell = match ch {
                    '#' | '1' => Cell::Wall,
                    '.' | '0' | ' ' => Cell::Empty,
                    found => {
                        return Err(Error::MapParse {
                            line: row + 1,
                            column: column + 1,
                            found,
                        });
                    }
                };
                cells.push(cell);
                count += 1;
            }

            match width {
                None => width = Some(count),
                Some(expected) if expected != count => {
                    return Err(Error::RaggedMap {
                        row,
                        expected,
                        found: count,
                    });
                }
                Some(_) => {}
            }
            height += 1;
        }

        match width {
            Some(width) if width > 0 => Ok(Self {
                width,
                height,
                cells,
            }),
            _ => Err(Error::EmptyMap),
        }
    }

    /// Parses a text map, ignoring trailing blank lines.
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines: Vec<&str> = text.lines().collect();
        while lines.last().is_some_and(|line| line.trim().is_empty()) {
            lines.pop();
        }
        Self::from_rows(lines)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Checked access: anything outside the grid reads as a wall.
    #[inline]
    pub fn cell(&self, x: i64, y: i64) -> Cell {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return Cell::Wall;
        }
        self.cells[y as usize * self.width + x as usize]
    }

    #[inline]
    pub fn is_wall(&self, x: i64, y: i64) -> bool {
        self.cell(x, y) == Cell::Wall
    }

    /// Tests the cell containing a continuous map coordinate.
    #[inline]
    pub fn is_wall_at(&self, x: f64, y: f64) -> bool {
        if !x.is_finite() || !y.is_finite() {
            return true;
        }
        self.is_wall(x.floor() as i64, y.floor() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_map_has_solid_border() {
        let map = GridMap::builtin();
        assert_eq!((map.width(), map.height()), (16, 16));
        for i in 0..16 {
            assert!(map.is_wall(i, 0));
            assert!(map.is_wall(i, 15));
            assert!(map.is_wall(0, i));
            assert!(map.is_wall(15, i));
        }
        assert!(!map.is_wall(8, 8));
        assert_eq!(map, GridMap::from_rows(BUILTIN_ROWS).unwrap());
    }

    #[test]
    fn out_of_bounds_reads_as_wall() {
        let map = GridMap::parse("...\n...\n").unwrap();
        assert!(!map.is_wall(1, 1));
        assert!(map.is_wall(-1, 0));
        assert!(map.is_wall(3, 0));
        assert!(map.is_wall(0, 2));
        assert!(map.is_wall_at(-0.01, 0.5));
        assert!(map.is_wall_at(f64::NAN, 0.5));
    }

    #[test]
    fn rows_are_y_and_columns_are_x() {
        let map = GridMap::parse("..#\n...\n...\n").unwrap();
        assert!(map.is_wall(2, 0));
        assert!(!map.is_wall(0, 2));
        assert!(!map.is_wall(2, 1));
    }

    #[test]
    fn rejects_malformed_maps() {
        assert!(matches!(GridMap::parse(""), Err(Error::EmptyMap)));
        assert!(matches!(
            GridMap::parse("##\n#\n"),
            Err(Error::RaggedMap { row: 1, .. })
        ));
        assert!(matches!(
            GridMap::parse("#x#"),
            Err(Error::MapParse {
                line: 1,
                column: 2,
                found: 'x'
            })
        ));
    }
}
