//! Vector path parsing.
//!
//! Hand-drawn annotations arrive as move/line/close path strings in pixel
//! coordinates, e.g. `"M447.5,212L440,225.2L462,231Z"`. Parsing splits on
//! the line-segment delimiter `L`, strips the move (`M`) and close (`Z`)
//! markers, and rounds each coordinate to the nearest integer pixel. The
//! vertex sequence is implicitly closed.
//!
//! Malformed coordinate tokens raise [`Error::PathParse`]; callers are
//! expected to hand over syntactically well-formed paths, since recovery
//! cannot safely guess the intended geometry.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One rounded path vertex in pixel coordinates (x = column, y = row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathVertex {
    /// Column coordinate.
    pub x: i64,
    /// Row coordinate.
    pub y: i64,
}

impl PathVertex {
    /// Create a vertex.
    #[inline]
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// Parse a move/line/close path string into rounded integer vertices.
///
/// Each `L`-delimited segment must carry exactly one `x,y` coordinate pair
/// after marker stripping; anything else is a parse error.
pub fn parse_path(path: &str) -> Result<Vec<PathVertex>> {
    let mut vertices = Vec::new();

    for (segment, raw) in path.split('L').enumerate() {
        let cleaned = raw.replace(['M', 'Z'], "");
        let mut parts = cleaned.split(',');

        let x = parse_coordinate(parts.next().unwrap_or(""), &cleaned, segment)?;
        let y = parse_coordinate(parts.next().unwrap_or(""), &cleaned, segment)?;
        if parts.next().is_some() {
            return Err(Error::PathParse {
                token: cleaned,
                segment,
            });
        }

        vertices.push(PathVertex::new(round_pixel(x), round_pixel(y)));
    }

    Ok(vertices)
}

fn parse_coordinate(token: &str, cleaned: &str, segment: usize) -> Result<f64> {
    token.trim().parse::<f64>().map_err(|_| Error::PathParse {
        token: if token.is_empty() {
            cleaned.to_string()
        } else {
            token.to_string()
        },
        segment,
    })
}

/// Round a drawn coordinate to its pixel index (half away from zero).
#[inline]
fn round_pixel(coordinate: f64) -> i64 {
    coordinate.round() as i64
}
