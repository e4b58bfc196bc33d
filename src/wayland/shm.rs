//! Solid-colour shared-memory buffers

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::os::fd::{AsFd, FromRawFd};
use subdeco_layout::Size;
use wayland_client::protocol::{wl_buffer::WlBuffer, wl_shm};
use wayland_client::QueueHandle;

use super::error::StartupError;
use super::App;

/// Anonymous file backing one shm pool
fn memfd() -> Result<File> {
    let fd = unsafe { libc::memfd_create(c"subdeco-shm".as_ptr(), libc::MFD_CLOEXEC) };
    if fd < 0 {
        return Err(std::io::Error::last_os_error()).context("memfd_create failed");
    }
    // SAFETY: fd was just returned by memfd_create and is owned by nobody else
    Ok(unsafe { File::from_raw_fd(fd) })
}

/// Opaque ARGB8888 pixel for a 0xRRGGBB colour
pub fn opaque(rgb: u32) -> u32 {
    0xff00_0000 | (rgb & 0x00ff_ffff)
}

/// Protocol dimensions of an ARGB8888 buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BufferLayout {
    width: i32,
    height: i32,
    stride: i32,
    len: i32,
}

impl BufferLayout {
    fn new(size: Size) -> Result<Self, StartupError> {
        let too_large = || StartupError::BufferTooLarge {
            width: size.width,
            height: size.height,
        };
        let width = i32::try_from(size.width).map_err(|_| too_large())?;
        let height = i32::try_from(size.height).map_err(|_| too_large())?;
        let stride = width.checked_mul(4).ok_or_else(too_large)?;
        let len = stride.checked_mul(height).ok_or_else(too_large)?;
        Ok(Self {
            width,
            height,
            stride,
            len,
        })
    }
}

/// Create a buffer of `size` filled with `rgb`. The pool is destroyed right
/// away; the buffer keeps the memory alive until it is destroyed.
pub fn solid_buffer(
    shm: &wl_shm::WlShm,
    qh: &QueueHandle<App>,
    size: Size,
    rgb: u32,
) -> Result<WlBuffer> {
    let BufferLayout {
        width,
        height,
        stride,
        len,
    } = BufferLayout::new(size)?;

    let pixels = vec![opaque(rgb); size.area() as usize];
    let mut file = memfd()?;
    file.write_all(bytemuck::cast_slice(&pixels))
        .context("Failed to fill shm file")?;

    let pool = shm.create_pool(file.as_fd(), len, qh, ());
    let buffer = pool.create_buffer(0, width, height, stride, wl_shm::Format::Argb8888, qh, ());
    pool.destroy();

    Ok(buffer)
}
