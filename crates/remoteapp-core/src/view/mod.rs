//! View adapters projecting model state for presentation shells
//!
//! The adapters own no lifecycle state. They read the shared
//! [`ApplicationListModel`](crate::ApplicationListModel), compute display
//! values, and forward user intents back to it.

mod detail;
mod form;
mod list;

pub use detail::*;
pub use form::*;
pub use list::*;

use remoteapp_client::urlutils::path_join;
use remoteapp_client::Image;

/// Width taken by the application list next to the frame
pub const SIDEBAR_WIDTH: u32 = 230;
/// Height taken by the header bar above the frame
pub const HEADER_HEIGHT: u32 = 50;
/// Smallest frame size handed to a running application
pub const MIN_FRAME_SIZE: FrameSize = FrameSize {
    width: 320,
    height: 240,
};

/// Visible area the shell has available
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl From<&remoteapp_config::ViewConfig> for Viewport {
    fn from(config: &remoteapp_config::ViewConfig) -> Self {
        Self::new(config.viewport_width, config.viewport_height)
    }
}

/// Minimum size of the embedded application frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl std::fmt::Display for FrameSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Largest frame that fits the viewport once the shell chrome is removed
pub fn max_iframe_size(viewport: Viewport) -> FrameSize {
    FrameSize {
        width: viewport
            .width
            .saturating_sub(SIDEBAR_WIDTH)
            .max(MIN_FRAME_SIZE.width),
        height: viewport
            .height
            .saturating_sub(HEADER_HEIGHT)
            .max(MIN_FRAME_SIZE.height),
    }
}

/// Icon source for an image: inline PNG data if present, else the generic icon
pub fn icon_src(image: &Image, base_url: &str) -> String {
    match image.icon() {
        Some(icon) => format!("data:image/png;base64,{}", icon),
        None => path_join(&[base_url, "static", "images", "generic_appicon_128.png"]),
    }
}

/// URL of the frame showing a running container.
///
/// The first render after a start omits the trailing slash.
pub fn frame_url(base_url: &str, url_id: &str, delayed: bool) -> String {
    let url = path_join(&[base_url, "containers", url_id]);
    if delayed {
        url
    } else {
        url + "/"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_url_trailing_slash() {
        let base = "http://host/user/alice";
        assert_eq!(
            frame_url(base, "abc123", true),
            "http://host/user/alice/containers/abc123"
        );
        assert_eq!(
            frame_url(base, "abc123", false),
            "http://host/user/alice/containers/abc123/"
        );
    }

    #[test]
    fn test_icon_src() {
        let mut image = Image {
            name: "simphony/desktop".to_string(),
            ..Default::default()
        };
        assert_eq!(
            icon_src(&image, "/user/alice/"),
            "/user/alice/static/images/generic_appicon_128.png"
        );

        image.icon_128 = Some(String::new());
        assert_eq!(
            icon_src(&image, "/user/alice"),
            "/user/alice/static/images/generic_appicon_128.png"
        );

        image.icon_128 = Some("iVBORw0KGgo".to_string());
        assert_eq!(icon_src(&image, "/user/alice"), "data:image/png;base64,iVBORw0KGgo");
    }

    #[test]
    fn test_max_iframe_size() {
        assert_eq!(
            max_iframe_size(Viewport::new(1280, 800)),
            FrameSize {
                width: 1050,
                height: 750
            }
        );
        assert_eq!(max_iframe_size(Viewport::new(100, 100)), MIN_FRAME_SIZE);
        assert_eq!(max_iframe_size(Viewport::new(1280, 800)).to_string(), "1050x750");
    }
}
