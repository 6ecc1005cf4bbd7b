use serde::{Deserialize, Serialize};

use crate::{Rect, Result, Word};

/// Word orientation. Vertical words are rotated 90° counter-clockwise and read
/// bottom to top. Serialized as degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
pub enum Angle {
    Horizontal,
    Vertical,
}

impl Angle {
    pub fn degrees(self) -> u16 {
        match self {
            Angle::Horizontal => 0,
            Angle::Vertical => 90,
        }
    }

    pub fn flipped(self) -> Angle {
        match self {
            Angle::Horizontal => Angle::Vertical,
            Angle::Vertical => Angle::Horizontal,
        }
    }
}

impl From<Angle> for u16 {
    fn from(angle: Angle) -> u16 {
        angle.degrees()
    }
}

impl TryFrom<u16> for Angle {
    type Error = String;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        match degrees {
            0 => Ok(Angle::Horizontal),
            90 => Ok(Angle::Vertical),
            other => Err(format!("unsupported angle {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub [u8; 3]);

/// One placed word. `x`/`y` is the top-left corner of the glyph box, already
/// oriented by `angle`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    #[serde(flatten)]
    pub word: Word,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub font_size: f32,
    pub angle: Angle,
    pub color: Rgb,
}

impl Placement {
    pub fn text(&self) -> &str {
        &self.word.text
    }

    pub fn bounds(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }

    pub fn overlaps(&self, other: &Placement) -> bool {
        self.bounds().intersects(&other.bounds())
    }
}

/// Placements in processing order (descending frequency) on a `width` x
/// `height` canvas. Consumed by a renderer or serialized as JSON.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutResult {
    pub width: u32,
    pub height: u32,
    placements: Vec<Placement>,
}

impl LayoutResult {
    pub fn new(width: u32, height: u32, placements: Vec<Placement>) -> Self {
        LayoutResult {
            width,
            height,
            placements,
        }
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Placement> {
        self.placements.iter()
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl IntoIterator for LayoutResult {
    type Item = Placement;
    type IntoIter = std::vec::IntoIter<Placement>;

    fn into_iter(self) -> Self::IntoIter {
        self.placements.into_iter()
    }
}

impl<'a> IntoIterator for &'a LayoutResult {
    type Item = &'a Placement;
    type IntoIter = std::slice::Iter<'a, Placement>;

    fn into_iter(self) -> Self::IntoIter {
        self.placements.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{Angle, LayoutResult, Placement, Rgb};
    use crate::Word;

    fn placement(text: &str, x: u32, y: u32, angle: Angle) -> Placement {
        Placement {
            word: Word {
                text: text.into(),
                count: 3,
            },
            x,
            y,
            width: 20,
            height: 10,
            font_size: 8.0,
            angle,
            color: Rgb([255, 0, 10]),
        }
    }

    #[test]
    fn json_records_are_flat() {
        let layout = LayoutResult::new(100, 50, vec![placement("dog", 1, 2, Angle::Vertical)]);
        let value: serde_json::Value = serde_json::from_str(&layout.to_json().unwrap()).unwrap();

        let record = &value["placements"][0];
        assert_eq!(record["text"], "dog");
        assert_eq!(record["count"], 3);
        assert_eq!(record["x"], 1);
        assert_eq!(record["angle"], 90);
        assert_eq!(record["color"], serde_json::json!([255, 0, 10]));
        assert_eq!(value["width"], 100);
    }

    #[test]
    fn json_reads_back() {
        let layout = LayoutResult::new(
            64,
            64,
            vec![
                placement("dog", 0, 0, Angle::Horizontal),
                placement("cat", 30, 30, Angle::Vertical),
            ],
        );
        let parsed = LayoutResult::from_json(&layout.to_json().unwrap()).unwrap();
        assert_eq!(parsed, layout);
    }

    #[test]
    fn rejects_unknown_angle() {
        assert!(Angle::try_from(45u16).is_err());
        assert_eq!(Angle::try_from(90u16), Ok(Angle::Vertical));
    }

    #[test]
    fn overlap_uses_glyph_boxes() {
        let a = placement("a", 0, 0, Angle::Horizontal);
        let b = placement("b", 19, 9, Angle::Horizontal);
        let c = placement("c", 20, 0, Angle::Horizontal);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }
}
