/// Per-tab overlay controller.
///
/// The lifecycle only mounts and unmounts in response to coordinator
/// messages. ESC asks the coordinator to deactivate; the overlay comes down
/// when the coordinator's `DEACTIVATE` arrives, so the registry stays the
/// single source of truth.
use crate::messages::{Message, RandomImageResponse};

#[cfg(target_arch = "wasm32")]
pub mod content;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayCommand {
    Mount,
    Unmount,
    Nothing,
}

#[derive(Debug, Default)]
pub struct OverlayLifecycle {
    mounted: bool,
}

impl OverlayLifecycle {
    pub fn new() -> Self {
        OverlayLifecycle { mounted: false }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Repeated `ACTIVATE` or `DEACTIVATE` yields `Nothing`.
    pub fn handle(&mut self, message: Message) -> OverlayCommand {
        match (message, self.mounted) {
            (Message::Activate, false) => {
                self.mounted = true;
                OverlayCommand::Mount
            }
            (Message::Deactivate, true) => {
                self.mounted = false;
                OverlayCommand::Unmount
            }
            _ => OverlayCommand::Nothing,
        }
    }
}

/// The message a key press should send to the coordinator, if any.
pub fn exit_request(key: &str) -> Option<Message> {
    match key {
        "Escape" | "Esc" => Some(Message::Deactivate),
        _ => None,
    }
}

/// What the overlay shows in place of the image
#[derive(Debug, Clone, PartialEq)]
pub enum ImageView {
    Loading,
    Ready(String),
    Failed(String),
}

impl ImageView {
    /// Interpret the coordinator's reply (or the lack of one).
    pub fn from_reply(reply: Result<Option<RandomImageResponse>, String>) -> ImageView {
        match reply {
            Ok(Some(response)) => match response.into_result() {
                Ok(data_url) => ImageView::Ready(data_url),
                Err(error) => ImageView::Failed(error),
            },
            Ok(None) => ImageView::Failed("No response from the background worker".to_string()),
            Err(error) => ImageView::Failed(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount_is_idempotent() {
        let mut lifecycle = OverlayLifecycle::new();

        assert_eq!(lifecycle.handle(Message::Activate), OverlayCommand::Mount);
        assert_eq!(lifecycle.handle(Message::Activate), OverlayCommand::Nothing);
        assert!(lifecycle.is_mounted());
    }

    #[test]
    fn test_double_deactivate_is_noop() {
        let mut lifecycle = OverlayLifecycle::new();
        lifecycle.handle(Message::Activate);

        assert_eq!(lifecycle.handle(Message::Deactivate), OverlayCommand::Unmount);
        assert_eq!(lifecycle.handle(Message::Deactivate), OverlayCommand::Nothing);
        assert!(!lifecycle.is_mounted());
    }

    #[test]
    fn test_deactivate_before_activate() {
        let mut lifecycle = OverlayLifecycle::new();
        assert_eq!(lifecycle.handle(Message::Deactivate), OverlayCommand::Nothing);
    }

    #[test]
    fn test_image_request_is_not_a_lifecycle_event() {
        let mut lifecycle = OverlayLifecycle::new();
        assert_eq!(lifecycle.handle(Message::GetRandomImage), OverlayCommand::Nothing);
    }

    #[test]
    fn test_exit_request() {
        assert_eq!(exit_request("Escape"), Some(Message::Deactivate));
        assert_eq!(exit_request("Enter"), None);
        assert_eq!(exit_request("e"), None);
    }

    #[test]
    fn test_image_view_from_reply() {
        assert_eq!(
            ImageView::from_reply(Ok(Some(RandomImageResponse::found("data:a".into())))),
            ImageView::Ready("data:a".to_string())
        );
        assert_eq!(
            ImageView::from_reply(Ok(Some(RandomImageResponse::failed("No images available")))),
            ImageView::Failed("No images available".to_string())
        );
        assert!(matches!(ImageView::from_reply(Ok(None)), ImageView::Failed(_)));
        assert_eq!(
            ImageView::from_reply(Err("timed out".into())),
            ImageView::Failed("timed out".to_string())
        );
    }
}
