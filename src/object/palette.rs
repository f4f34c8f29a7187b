use std::path::Path;

use bevy::color::ColorToPacked;
use bevy::prelude::*;

use super::xml::{self, XmlElement};
use crate::constants::PALETTE_FILE_NAME;
use crate::error::FileResult;

const PALETTE_DOCTYPE: &str = "PencilPalette";

/// A named palette entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ColourRef {
    pub name: String,
    pub colour: Color,
}

impl ColourRef {
    pub fn new(name: impl Into<String>, rgb: [u8; 3]) -> Self {
        Self {
            name: name.into(),
            colour: Color::srgb_u8(rgb[0], rgb[1], rgb[2]),
        }
    }

    pub fn rgba(&self) -> [u8; 4] {
        self.colour.to_srgba().to_u8_array()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Palette {
    pub colours: Vec<ColourRef>,
}

impl Palette {
    pub fn pencil_default() -> Self {
        let colours = [
            ("Black", [0, 0, 0]),
            ("Red", [255, 0, 0]),
            ("Dark Red", [128, 0, 0]),
            ("Orange", [255, 128, 0]),
            ("Dark Orange", [128, 64, 0]),
            ("Yellow", [255, 255, 0]),
            ("Dark Yellow", [128, 128, 0]),
            ("Green", [0, 255, 0]),
            ("Dark Green", [0, 128, 0]),
            ("Cyan", [0, 255, 255]),
            ("Dark Cyan", [0, 128, 128]),
            ("Blue", [0, 0, 255]),
            ("Dark Blue", [0, 0, 128]),
            ("White", [255, 255, 255]),
            ("Very Light Grey", [220, 220, 229]),
            ("Light Grey", [192, 192, 192]),
            ("Grey", [160, 160, 164]),
            ("Dark Grey", [128, 128, 128]),
            ("Light Skin", [255, 227, 187]),
            ("Light Skin - shade", [221, 196, 161]),
            ("Skin", [255, 214, 156]),
            ("Skin - shade", [207, 174, 127]),
            ("Dark Skin", [255, 198, 116]),
            ("Dark Skin - shade", [227, 177, 105]),
        ]
        .into_iter()
        .map(|(name, rgb)| ColourRef::new(name, rgb))
        .collect();
        Self { colours }
    }

    pub fn len(&self) -> usize {
        self.colours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colours.is_empty()
    }

    pub fn to_xml(&self) -> XmlElement {
        let mut root = XmlElement::new("palette");
        for colour in &self.colours {
            let [r, g, b, a] = colour.rgba();
            root.children.push(
                XmlElement::new("Colour")
                    .with_attr("name", &colour.name)
                    .with_attr("red", r)
                    .with_attr("green", g)
                    .with_attr("blue", b)
                    .with_attr("alpha", a),
            );
        }
        root
    }

    pub fn from_xml(root: &XmlElement) -> Self {
        let colours = root
            .children_named("Colour")
            .map(|el| ColourRef {
                name: el.attr("name").unwrap_or_default().to_string(),
                colour: Color::srgba_u8(
                    el.attr_or("red", 0),
                    el.attr_or("green", 0),
                    el.attr_or("blue", 0),
                    el.attr_or("alpha", 255),
                ),
            })
            .collect();
        Self { colours }
    }

    /// Read `palette.xml` from `data_dir`. Returns `None` when the file is
    /// absent or unreadable; the caller falls back to the default set.
    pub fn load(data_dir: &Path) -> Option<Self> {
        let path = data_dir.join(PALETTE_FILE_NAME);
        let text = std::fs::read_to_string(&path).ok()?;
        match xml::parse_document(&text) {
            Ok(doc) => doc
                .root
                .filter(|root| root.name == "palette")
                .map(|root| Self::from_xml(&root)),
            Err(e) => {
                warn!("Ignoring unreadable palette {}: {}", path.display(), e);
                None
            }
        }
    }

    pub fn save(&self, data_dir: &Path) -> FileResult<()> {
        let bytes = xml::write_document(PALETTE_DOCTYPE, &self.to_xml())?;
        std::fs::write(data_dir.join(PALETTE_FILE_NAME), bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_palette_starts_with_black() {
        let palette = Palette::pencil_default();
        assert_eq!(palette.len(), 24);
        assert_eq!(palette.colours[0].name, "Black");
        assert_eq!(palette.colours[0].rgba(), [0, 0, 0, 255]);
    }

    #[test]
    fn test_missing_file_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Palette::load(dir.path()).is_none());
    }

    #[test]
    fn test_save_then_load_keeps_exact_colours() {
        let dir = tempfile::tempdir().unwrap();
        let mut palette = Palette::pencil_default();
        palette.colours.push(ColourRef {
            name: "Glass".to_string(),
            colour: Color::srgba_u8(12, 34, 56, 78),
        });
        palette.save(dir.path()).unwrap();

        let loaded = Palette::load(dir.path()).unwrap();
        let rgba: Vec<_> = loaded.colours.iter().map(ColourRef::rgba).collect();
        let expected: Vec<_> = palette.colours.iter().map(ColourRef::rgba).collect();
        assert_eq!(rgba, expected);
        assert_eq!(loaded.colours[24].name, "Glass");
    }

    #[test]
    fn test_corrupt_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(PALETTE_FILE_NAME), "<palette><Colour").unwrap();
        assert!(Palette::load(dir.path()).is_none());
    }
}
