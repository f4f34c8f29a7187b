use bevy::math::DAffine2;
use bevy::prelude::*;

use super::xml::XmlElement;

/// Session state stored in the `<editor>` block of a document.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorState {
    pub current_frame: i32,
    pub current_colour: Color,
    pub current_layer: usize,
    pub current_view: DAffine2,
    pub fps: i32,
    pub is_loop: bool,
    pub is_ranged_playback: bool,
    pub mark_in_frame: i32,
    pub mark_out_frame: i32,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            current_frame: 1,
            current_colour: Color::WHITE,
            current_layer: 0,
            current_view: DAffine2::IDENTITY,
            fps: 12,
            is_loop: false,
            is_ranged_playback: false,
            mark_in_frame: 0,
            mark_out_frame: 15,
        }
    }
}

impl EditorState {
    /// Parse an `<editor>` element. Every leaf is optional; unknown leaves
    /// are ignored.
    pub fn from_xml(editor: &XmlElement) -> Self {
        let mut state = Self::default();
        for el in &editor.children {
            match el.name.as_str() {
                "currentFrame" => state.current_frame = el.attr_or("value", 1),
                "currentColor" => {
                    state.current_colour = Color::srgba_u8(
                        el.attr_or("r", 255),
                        el.attr_or("g", 255),
                        el.attr_or("b", 255),
                        el.attr_or("a", 255),
                    );
                }
                "currentLayer" => state.current_layer = el.attr_or("value", 0),
                "currentView" => {
                    state.current_view = DAffine2::from_cols_array(&[
                        el.attr_or("m11", 1.0),
                        el.attr_or("m12", 0.0),
                        el.attr_or("m21", 0.0),
                        el.attr_or("m22", 1.0),
                        el.attr_or("dx", 0.0),
                        el.attr_or("dy", 0.0),
                    ]);
                }
                "fps" => state.fps = el.attr_or("value", 12),
                "isLoop" => state.is_loop = el.attr_flag("value"),
                "isRangedPlayback" => state.is_ranged_playback = el.attr_flag("value"),
                "markInFrame" => state.mark_in_frame = el.attr_or("value", 0),
                "markOutFrame" => state.mark_out_frame = el.attr_or("value", 15),
                other => debug!("Ignoring editor entry <{}>", other),
            }
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use bevy::color::ColorToPacked;

    use super::*;

    fn leaf(name: &str, attrs: &[(&str, &str)]) -> XmlElement {
        attrs
            .iter()
            .fold(XmlElement::new(name), |el, (k, v)| el.with_attr(k, v))
    }

    #[test]
    fn test_empty_block_gives_defaults() {
        let state = EditorState::from_xml(&XmlElement::new("editor"));
        assert_eq!(state, EditorState::default());
        assert_eq!(state.current_frame, 1);
        assert_eq!(state.fps, 12);
        assert_eq!(state.mark_out_frame, 15);
    }

    #[test]
    fn test_mark_in_and_out_are_separate_fields() {
        let editor = XmlElement::new("editor")
            .with_child(leaf("markInFrame", &[("value", "3")]))
            .with_child(leaf("markOutFrame", &[("value", "40")]));
        let state = EditorState::from_xml(&editor);
        assert_eq!(state.mark_in_frame, 3);
        assert_eq!(state.mark_out_frame, 40);
    }

    #[test]
    fn test_mark_out_alone_leaves_mark_in_default() {
        let editor = XmlElement::new("editor").with_child(leaf("markOutFrame", &[]));
        let state = EditorState::from_xml(&editor);
        assert_eq!(state.mark_in_frame, 0);
        assert_eq!(state.mark_out_frame, 15);
    }

    #[test]
    fn test_all_leaves_are_parsed() {
        let editor = XmlElement::new("editor")
            .with_child(leaf("currentFrame", &[("value", "9")]))
            .with_child(leaf("currentColor", &[("r", "10"), ("g", "20"), ("b", "30")]))
            .with_child(leaf("currentLayer", &[("value", "2")]))
            .with_child(leaf(
                "currentView",
                &[("m11", "2"), ("m22", "0.5"), ("dx", "-4"), ("dy", "8")],
            ))
            .with_child(leaf("fps", &[("value", "24")]))
            .with_child(leaf("isLoop", &[("value", "true")]))
            .with_child(leaf("isRangedPlayback", &[("value", "yes")]))
            .with_child(leaf("somethingNew", &[]));
        let state = EditorState::from_xml(&editor);

        assert_eq!(state.current_frame, 9);
        assert_eq!(state.current_colour.to_srgba().to_u8_array(), [10, 20, 30, 255]);
        assert_eq!(state.current_layer, 2);
        assert_eq!(
            state.current_view,
            DAffine2::from_cols_array(&[2.0, 0.0, 0.0, 0.5, -4.0, 8.0])
        );
        assert_eq!(state.fps, 24);
        assert!(state.is_loop);
        assert!(!state.is_ranged_playback);
    }
}
