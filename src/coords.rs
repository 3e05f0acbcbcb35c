// This file is part of the kibitz library.
// Copyright (C) 2024 The kibitz developers
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.

use std::{error::Error, fmt, str::FromStr};

/// Error when parsing an invalid square name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseCoordsError;

impl fmt::Display for ParseCoordsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid square name")
    }
}

impl Error for ParseCoordsError {}

/// Location of a cell on the board.
///
/// Row `0` is the first rank (white's side) and column `0` is the a-file.
/// Cells are indexed `row * 8 + col`, so index `0` is a1 and `63` is h8.
///
/// # Examples
///
/// ```
/// use kibitz::Coords;
///
/// let e4: Coords = "e4".parse()?;
/// assert_eq!(e4.row(), 3);
/// assert_eq!(e4.col(), 4);
/// assert_eq!(e4.index(), 28);
/// assert_eq!(e4.to_string(), "e4");
/// # Ok::<_, kibitz::ParseCoordsError>(())
/// ```
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawCoords")
)]
pub struct Coords {
    row: u8,
    col: u8,
}

impl Coords {
    /// Creates coordinates from a row and a column.
    ///
    /// # Panics
    ///
    /// Panics if either value is outside `0..8`.
    #[track_caller]
    pub const fn new(row: u8, col: u8) -> Coords {
        assert!(row < 8 && col < 8, "coordinates out of range");
        Coords { row, col }
    }

    /// Creates coordinates, or returns `None` if either value is outside
    /// `0..8`.
    pub const fn try_new(row: u8, col: u8) -> Option<Coords> {
        if row < 8 && col < 8 {
            Some(Coords { row, col })
        } else {
            None
        }
    }

    /// Creates coordinates from a cell index in `0..64`.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of range.
    #[track_caller]
    pub const fn from_index(index: usize) -> Coords {
        assert!(index < 64, "cell index out of range");
        Coords {
            row: (index / 8) as u8,
            col: (index % 8) as u8,
        }
    }

    /// Parses a square name like `e4`.
    pub fn from_ascii(s: &[u8]) -> Result<Coords, ParseCoordsError> {
        match *s {
            [file @ b'a'..=b'h', rank @ b'1'..=b'8'] => Ok(Coords {
                row: rank - b'1',
                col: file - b'a',
            }),
            _ => Err(ParseCoordsError),
        }
    }

    #[inline]
    pub const fn row(self) -> u8 {
        self.row
    }

    #[inline]
    pub const fn col(self) -> u8 {
        self.col
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.row as usize * 8 + self.col as usize
    }

    /// Moves by the given row and column deltas, or returns `None` if that
    /// leaves the board.
    ///
    /// # Examples
    ///
    /// ```
    /// use kibitz::Coords;
    ///
    /// let a1 = Coords::new(0, 0);
    /// assert_eq!(a1.offset(2, 1), Some(Coords::new(2, 1)));
    /// assert_eq!(a1.offset(-1, 0), None);
    /// ```
    #[inline]
    pub fn offset(self, dr: i8, dc: i8) -> Option<Coords> {
        let row = self.row as i8 + dr;
        let col = self.col as i8 + dc;
        if (0..8).contains(&row) && (0..8).contains(&col) {
            Some(Coords {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    /// Same row, different column.
    #[inline]
    pub fn with_col(self, col: u8) -> Coords {
        Coords::new(self.row, col)
    }

    /// Distance to the nearest edge column, `0` on the a- and h-files.
    #[inline]
    pub fn col_centrality(self) -> u8 {
        self.col.min(7 - self.col)
    }

    /// Distance to the nearest edge row, `0` on the first and last rank.
    #[inline]
    pub fn row_centrality(self) -> u8 {
        self.row.min(7 - self.row)
    }

    /// All 64 cells in index order.
    pub fn all() -> impl Iterator<Item = Coords> {
        (0..64).map(Coords::from_index)
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawCoords {
    row: u8,
    col: u8,
}

#[cfg(feature = "serde")]
impl TryFrom<RawCoords> for Coords {
    type Error = ParseCoordsError;

    fn try_from(raw: RawCoords) -> Result<Coords, ParseCoordsError> {
        Coords::try_new(raw.row, raw.col).ok_or(ParseCoordsError)
    }
}

impl FromStr for Coords {
    type Err = ParseCoordsError;

    fn from_str(s: &str) -> Result<Coords, ParseCoordsError> {
        Coords::from_ascii(s.as_bytes())
    }
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            char::from(b'a' + self.col),
            char::from(b'1' + self.row)
        )
    }
}

impl fmt::Debug for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string().to_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("a1".parse::<Coords>(), Ok(Coords::new(0, 0)));
        assert_eq!("h8".parse::<Coords>(), Ok(Coords::new(7, 7)));
        assert_eq!("i1".parse::<Coords>(), Err(ParseCoordsError));
        assert_eq!("a9".parse::<Coords>(), Err(ParseCoordsError));
        assert_eq!("a".parse::<Coords>(), Err(ParseCoordsError));
        assert_eq!("a1 ".parse::<Coords>(), Err(ParseCoordsError));
    }

    #[test]
    fn test_try_new() {
        assert_eq!(Coords::try_new(7, 0), Some(Coords::new(7, 0)));
        assert_eq!(Coords::try_new(8, 0), None);
        assert_eq!(Coords::try_new(0, 8), None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_rejects_out_of_range() {
        let e4: Coords = serde_json::from_str(r#"{"row":3,"col":4}"#).unwrap();
        assert_eq!(e4, Coords::new(3, 4));
        assert_eq!(serde_json::to_string(&e4).unwrap(), r#"{"row":3,"col":4}"#);
        assert!(serde_json::from_str::<Coords>(r#"{"row":8,"col":0}"#).is_err());
        assert!(serde_json::from_str::<Coords>(r#"{"row":0,"col":200}"#).is_err());
    }

    #[test]
    fn test_index_order() {
        let all: Vec<Coords> = Coords::all().collect();
        assert_eq!(all.len(), 64);
        assert_eq!(all[1].to_string(), "b1");
        assert_eq!(all[8].to_string(), "a2");
        for (i, c) in all.iter().enumerate() {
            assert_eq!(c.index(), i);
        }
    }

    #[test]
    fn test_centrality() {
        let d4 = Coords::new(3, 3);
        assert_eq!(d4.row_centrality(), 3);
        assert_eq!(d4.col_centrality(), 3);
        assert_eq!(Coords::new(7, 6).col_centrality(), 1);
    }

    #[test]
    #[should_panic]
    fn test_out_of_range() {
        let _ = Coords::new(8, 0);
    }
}
