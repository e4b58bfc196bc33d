use thiserror::Error;
use wayland_client::globals::BindError;

/// Fatal problems while bringing the window up
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("compositor does not provide {interface}")]
    MissingGlobal {
        interface: &'static str,
        #[source]
        source: BindError,
    },

    #[error("cursor theme could not be loaded")]
    CursorTheme,

    #[error("buffer of {width}x{height} exceeds protocol limits")]
    BufferTooLarge { width: u32, height: u32 },
}
