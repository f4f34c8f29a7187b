use std::collections::BTreeMap;
use std::path::Path;

use bevy::math::{DAffine2, IVec2};
use bevy::prelude::*;

use super::bitmap::BitmapImage;
use super::vector::VectorImage;
use super::xml::XmlElement;
use crate::error::FileResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Bitmap,
    Vector,
    Sound,
    Camera,
}

impl LayerKind {
    /// Numeric `type` attribute used in document XML.
    pub fn xml_code(self) -> i32 {
        match self {
            LayerKind::Bitmap => 1,
            LayerKind::Vector => 2,
            LayerKind::Sound => 4,
            LayerKind::Camera => 5,
        }
    }

    pub fn from_xml_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(LayerKind::Bitmap),
            2 => Some(LayerKind::Vector),
            4 => Some(LayerKind::Sound),
            5 => Some(LayerKind::Camera),
            _ => None,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            LayerKind::Bitmap => "Bitmap",
            LayerKind::Vector => "Vector",
            LayerKind::Sound => "Sound",
            LayerKind::Camera => "Camera",
        }
    }

    /// Layers whose frames hold drawable image content (and can be backed up).
    pub fn has_images(self) -> bool {
        matches!(self, LayerKind::Bitmap | LayerKind::Vector)
    }
}

/// Image content of a single keyframe.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameImage {
    Bitmap(BitmapImage),
    Vector(VectorImage),
}

impl FrameImage {
    pub fn kind(&self) -> LayerKind {
        match self {
            FrameImage::Bitmap(_) => LayerKind::Bitmap,
            FrameImage::Vector(_) => LayerKind::Vector,
        }
    }
}

/// An audio file attached to a sound layer key. The bytes are held in memory
/// so the document does not depend on the folder it was loaded from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SoundClip {
    pub file_name: String,
    pub data: Vec<u8>,
}

impl SoundClip {
    fn extension(&self) -> &str {
        Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("wav")
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraKey {
    pub view: DAffine2,
}

impl Default for CameraKey {
    fn default() -> Self {
        Self {
            view: DAffine2::IDENTITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayerContent {
    Bitmap(BTreeMap<i32, BitmapImage>),
    Vector(BTreeMap<i32, VectorImage>),
    Sound(BTreeMap<i32, SoundClip>),
    Camera(BTreeMap<i32, CameraKey>),
}

impl LayerContent {
    fn empty(kind: LayerKind) -> Self {
        match kind {
            LayerKind::Bitmap => LayerContent::Bitmap(BTreeMap::new()),
            LayerKind::Vector => LayerContent::Vector(BTreeMap::new()),
            LayerKind::Sound => LayerContent::Sound(BTreeMap::new()),
            LayerKind::Camera => LayerContent::Camera(BTreeMap::new()),
        }
    }

    fn keys(&self) -> Vec<i32> {
        match self {
            LayerContent::Bitmap(m) => m.keys().copied().collect(),
            LayerContent::Vector(m) => m.keys().copied().collect(),
            LayerContent::Sound(m) => m.keys().copied().collect(),
            LayerContent::Camera(m) => m.keys().copied().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub id: i32,
    pub name: String,
    pub visible: bool,
    pub content: LayerContent,
}

impl Layer {
    pub fn new(id: i32, kind: LayerKind, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            visible: true,
            content: LayerContent::empty(kind),
        }
    }

    pub fn kind(&self) -> LayerKind {
        match self.content {
            LayerContent::Bitmap(_) => LayerKind::Bitmap,
            LayerContent::Vector(_) => LayerKind::Vector,
            LayerContent::Sound(_) => LayerKind::Sound,
            LayerContent::Camera(_) => LayerKind::Camera,
        }
    }

    pub fn key_count(&self) -> usize {
        self.content.keys().len()
    }

    pub fn key_exists(&self, frame: i32) -> bool {
        match &self.content {
            LayerContent::Bitmap(m) => m.contains_key(&frame),
            LayerContent::Vector(m) => m.contains_key(&frame),
            LayerContent::Sound(m) => m.contains_key(&frame),
            LayerContent::Camera(m) => m.contains_key(&frame),
        }
    }

    /// Frame number of a keyframe relative to `frame`.
    ///
    /// Offset 0 is the key at or before `frame`, -1 the key before that and
    /// +1 the key after it.
    pub fn last_key_position(&self, frame: i32, offset: i32) -> Option<i32> {
        let keys = self.content.keys();
        let at_or_before = keys.partition_point(|&k| k <= frame) as i64 - 1;
        let target = at_or_before + i64::from(offset);
        usize::try_from(target)
            .ok()
            .and_then(|i| keys.get(i).copied())
    }

    /// Copy of the image content found by [`Self::last_key_position`].
    /// Sound and camera layers have no image content.
    pub fn image_at_frame(&self, frame: i32, offset: i32) -> Option<FrameImage> {
        let key = self.last_key_position(frame, offset)?;
        match &self.content {
            LayerContent::Bitmap(m) => m.get(&key).cloned().map(FrameImage::Bitmap),
            LayerContent::Vector(m) => m.get(&key).cloned().map(FrameImage::Vector),
            _ => None,
        }
    }

    /// Overwrite the image the layer shows at `frame` (the key at or before
    /// it). When there is no such key, a key is created at `frame`.
    ///
    /// Returns false when the image variant does not match the layer.
    pub fn replace_image_at_frame(&mut self, frame: i32, image: FrameImage) -> bool {
        let key = self.last_key_position(frame, 0).unwrap_or(frame);
        match (&mut self.content, image) {
            (LayerContent::Bitmap(m), FrameImage::Bitmap(img)) => {
                m.insert(key, img);
                true
            }
            (LayerContent::Vector(m), FrameImage::Vector(img)) => {
                m.insert(key, img);
                true
            }
            _ => false,
        }
    }

    /// Insert an empty key at `frame`. Returns false if a key already exists
    /// or the layer cannot hold empty keys (sound).
    pub fn add_key(&mut self, frame: i32) -> bool {
        if self.key_exists(frame) {
            return false;
        }
        match &mut self.content {
            LayerContent::Bitmap(m) => {
                m.insert(frame, BitmapImage::default());
            }
            LayerContent::Vector(m) => {
                m.insert(frame, VectorImage::default());
            }
            LayerContent::Camera(m) => {
                let view = m
                    .range(..frame)
                    .next_back()
                    .map(|(_, k)| *k)
                    .unwrap_or_default();
                m.insert(frame, view);
            }
            LayerContent::Sound(_) => return false,
        }
        true
    }

    pub fn add_sound(&mut self, frame: i32, clip: SoundClip) -> bool {
        match &mut self.content {
            LayerContent::Sound(m) => {
                m.insert(frame, clip);
                true
            }
            _ => false,
        }
    }

    pub fn bitmap_at_mut(&mut self, frame: i32) -> Option<&mut BitmapImage> {
        let key = self.last_key_position(frame, 0)?;
        match &mut self.content {
            LayerContent::Bitmap(m) => m.get_mut(&key),
            _ => None,
        }
    }

    pub fn vector_at_mut(&mut self, frame: i32) -> Option<&mut VectorImage> {
        let key = self.last_key_position(frame, 0)?;
        match &mut self.content {
            LayerContent::Vector(m) => m.get_mut(&key),
            _ => None,
        }
    }

    fn image_file_name(&self, frame: i32, extension: &str) -> String {
        format!("{:03}.{:03}.{}", self.id, frame, extension)
    }

    fn sound_file_name(&self, frame: i32, clip: &SoundClip) -> String {
        format!("sound_{:03}_{:03}.{}", self.id, frame, clip.extension())
    }

    /// Write frame assets into `data_dir`. Camera layers have none.
    pub fn save(&self, data_dir: &Path) -> FileResult<()> {
        match &self.content {
            LayerContent::Bitmap(m) => {
                for (frame, image) in m.iter().filter(|(_, img)| !img.is_empty()) {
                    image.save_png(&data_dir.join(self.image_file_name(*frame, "png")))?;
                }
            }
            LayerContent::Vector(m) => {
                for (frame, image) in m {
                    image.write(&data_dir.join(self.image_file_name(*frame, "vec")))?;
                }
            }
            LayerContent::Sound(m) => {
                for (frame, clip) in m {
                    std::fs::write(data_dir.join(self.sound_file_name(*frame, clip)), &clip.data)?;
                }
            }
            LayerContent::Camera(_) => {}
        }
        debug!(
            "Saved layer {} '{}' ({} keys)",
            self.id,
            self.name,
            self.key_count()
        );
        Ok(())
    }

    pub fn to_xml(&self) -> XmlElement {
        let mut el = XmlElement::new("layer")
            .with_attr("id", self.id)
            .with_attr("name", &self.name)
            .with_attr("visibility", self.visible)
            .with_attr("type", self.kind().xml_code());

        match &self.content {
            LayerContent::Bitmap(m) => {
                for (frame, image) in m {
                    let mut key = XmlElement::new("image").with_attr("frame", frame);
                    if !image.is_empty() {
                        key.set_attr("src", self.image_file_name(*frame, "png"));
                    }
                    key.set_attr("topLeftX", image.top_left().x);
                    key.set_attr("topLeftY", image.top_left().y);
                    el.children.push(key);
                }
            }
            LayerContent::Vector(m) => {
                for frame in m.keys() {
                    el.children.push(
                        XmlElement::new("image")
                            .with_attr("frame", frame)
                            .with_attr("src", self.image_file_name(*frame, "vec")),
                    );
                }
            }
            LayerContent::Sound(m) => {
                for (frame, clip) in m {
                    el.children.push(
                        XmlElement::new("sound")
                            .with_attr("frame", frame)
                            .with_attr("src", self.sound_file_name(*frame, clip))
                            .with_attr("name", &clip.file_name),
                    );
                }
            }
            LayerContent::Camera(m) => {
                for (frame, key) in m {
                    let [m11, m12, m21, m22, dx, dy] = key.view.to_cols_array();
                    el.children.push(
                        XmlElement::new("camera")
                            .with_attr("frame", frame)
                            .with_attr("m11", m11)
                            .with_attr("m12", m12)
                            .with_attr("m21", m21)
                            .with_attr("m22", m22)
                            .with_attr("dx", dx)
                            .with_attr("dy", dy),
                    );
                }
            }
        }
        el
    }

    /// Rebuild a layer from its XML element, reading frame assets from
    /// `data_dir`. Unknown layer types yield `Ok(None)`.
    pub fn from_xml(el: &XmlElement, data_dir: &Path) -> FileResult<Option<Layer>> {
        let code: i32 = el.attr_or("type", 0);
        let Some(kind) = LayerKind::from_xml_code(code) else {
            warn!("Skipping layer with unknown type {}", code);
            return Ok(None);
        };

        let mut layer = Layer::new(
            el.attr_or("id", 0),
            kind,
            el.attr("name").unwrap_or_default(),
        );
        layer.visible = el.attr("visibility") != Some("false");

        match &mut layer.content {
            LayerContent::Bitmap(m) => {
                for key in el.children_named("image") {
                    let frame = key.attr_or("frame", 1);
                    let top_left = IVec2::new(key.attr_or("topLeftX", 0), key.attr_or("topLeftY", 0));
                    let image = match asset_path(key, data_dir) {
                        Some(path) if path.exists() => BitmapImage::load_png(&path, top_left)?,
                        Some(path) => {
                            warn!("Missing bitmap file {}", path.display());
                            BitmapImage::new(top_left, Default::default())
                        }
                        None => BitmapImage::new(top_left, Default::default()),
                    };
                    m.insert(frame, image);
                }
            }
            LayerContent::Vector(m) => {
                for key in el.children_named("image") {
                    let frame = key.attr_or("frame", 1);
                    let image = match asset_path(key, data_dir) {
                        Some(path) if path.exists() => VectorImage::read(&path)?,
                        Some(path) => {
                            warn!("Missing vector file {}", path.display());
                            VectorImage::default()
                        }
                        None => VectorImage::default(),
                    };
                    m.insert(frame, image);
                }
            }
            LayerContent::Sound(m) => {
                for key in el.children_named("sound") {
                    let frame = key.attr_or("frame", 1);
                    let Some(path) = asset_path(key, data_dir) else {
                        continue;
                    };
                    match std::fs::read(&path) {
                        Ok(data) => {
                            let file_name = key
                                .attr("name")
                                .map(str::to_string)
                                .or_else(|| {
                                    path.file_name().map(|n| n.to_string_lossy().into_owned())
                                })
                                .unwrap_or_default();
                            m.insert(frame, SoundClip { file_name, data });
                        }
                        Err(e) => warn!("Skipping sound {}: {}", path.display(), e),
                    }
                }
            }
            LayerContent::Camera(m) => {
                for key in el.children_named("camera") {
                    let view = DAffine2::from_cols_array(&[
                        key.attr_or("m11", 1.0),
                        key.attr_or("m12", 0.0),
                        key.attr_or("m21", 0.0),
                        key.attr_or("m22", 1.0),
                        key.attr_or("dx", 0.0),
                        key.attr_or("dy", 0.0),
                    ]);
                    m.insert(key.attr_or("frame", 1), CameraKey { view });
                }
            }
        }
        Ok(Some(layer))
    }
}

/// Asset referenced by a key's `src` attribute. Only the file name is used,
/// so a document cannot point outside its data folder.
fn asset_path(key: &XmlElement, data_dir: &Path) -> Option<std::path::PathBuf> {
    let src = key.attr("src").filter(|s| !s.is_empty())?;
    Path::new(src).file_name().map(|name| data_dir.join(name))
}
