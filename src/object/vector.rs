//! Vector frame content and its `.vec` file format.

use std::path::Path;

use bevy::math::{Rect, Vec2};

use super::xml::{self, XmlElement};
use crate::error::{FileError, FileResult};

const VECTOR_DOCTYPE: &str = "PencilVectorImage";

/// One stroke: a polyline of control points drawn with a palette colour.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    pub points: Vec<Vec2>,
    pub width: f32,
    /// Index into the document palette
    pub colour: usize,
    pub selected: bool,
}

impl Curve {
    pub fn new(points: Vec<Vec2>, width: f32, colour: usize) -> Self {
        Self {
            points,
            width,
            colour,
            selected: false,
        }
    }

    fn bounds(&self) -> Option<Rect> {
        let (first, rest) = self.points.split_first()?;
        Some(rest.iter().fold(Rect::from_corners(*first, *first), |acc, p| {
            acc.union_point(*p)
        }))
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct VectorImage {
    pub curves: Vec<Curve>,
}

impl VectorImage {
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    pub fn select_all(&mut self) {
        self.curves.iter_mut().for_each(|c| c.selected = true);
    }

    pub fn deselect_all(&mut self) {
        self.curves.iter_mut().for_each(|c| c.selected = false);
    }

    /// Bounding box of the selected curves.
    pub fn selection_rect(&self) -> Option<Rect> {
        self.curves
            .iter()
            .filter(|c| c.selected)
            .filter_map(Curve::bounds)
            .reduce(|a, b| a.union(b))
    }

    /// Append the selected curves of `other` (all of them when none is
    /// selected); the appended curves become the new selection.
    pub fn paste(&mut self, other: &VectorImage) {
        let any_selected = other.curves.iter().any(|c| c.selected);
        self.deselect_all();
        for curve in other.curves.iter().filter(|c| !any_selected || c.selected) {
            let mut curve = curve.clone();
            curve.selected = true;
            self.curves.push(curve);
        }
    }

    pub fn to_xml(&self) -> XmlElement {
        let mut root = XmlElement::new("image").with_attr("type", "vector");
        for curve in &self.curves {
            let mut el = XmlElement::new("curve")
                .with_attr("width", curve.width)
                .with_attr("colour", curve.colour);
            for p in &curve.points {
                el.children.push(
                    XmlElement::new("point")
                        .with_attr("x", p.x)
                        .with_attr("y", p.y),
                );
            }
            root.children.push(el);
        }
        root
    }

    pub fn from_xml(root: &XmlElement) -> Self {
        let curves = root
            .children_named("curve")
            .map(|el| Curve {
                points: el
                    .children_named("point")
                    .map(|p| Vec2::new(p.attr_or("x", 0.0), p.attr_or("y", 0.0)))
                    .collect(),
                width: el.attr_or("width", 1.0),
                colour: el.attr_or("colour", 0),
                selected: false,
            })
            .collect();
        Self { curves }
    }

    pub fn read(path: &Path) -> FileResult<Self> {
        let doc = xml::read_document(path)?;
        match doc.root {
            Some(root) if root.name == "image" => Ok(Self::from_xml(&root)),
            _ => Err(FileError::invalid_document(format!(
                "{} is not a vector image",
                path.display()
            ))),
        }
    }

    pub fn write(&self, path: &Path) -> FileResult<()> {
        let bytes = xml::write_document(VECTOR_DOCTYPE, &self.to_xml())?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}
