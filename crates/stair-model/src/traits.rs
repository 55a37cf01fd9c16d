// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Seams to host-side collaborators

use crate::material::{ImageSize, TextureHandle};

/// Access to the host's texture loader
///
/// Loading is asynchronous on the host side; a texture that is registered but
/// not yet loaded reports no image size, and geometry falls back to a square
/// aspect instead of waiting.
pub trait TextureProvider {
    /// Pixel dimensions once the image has loaded
    fn image_size(&self, handle: &TextureHandle) -> Option<ImageSize>;

    /// Symmetric border crop in UV units (0 means no crop)
    fn inset(&self, handle: &TextureHandle) -> f64 {
        let _ = handle;
        0.0
    }

    /// Whether the provider knows this texture at all
    fn contains(&self, handle: &TextureHandle) -> bool {
        self.image_size(handle).is_some()
    }

    /// Handle to bind in place of `handle` (a placeholder while loading)
    fn resolve(&self, handle: &TextureHandle) -> TextureHandle {
        handle.clone()
    }
}

/// Provider that never has any texture loaded
#[derive(Clone, Copy, Debug, Default)]
pub struct NoTextures;

impl TextureProvider for NoTextures {
    fn image_size(&self, _handle: &TextureHandle) -> Option<ImageSize> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_textures() {
        let handle = TextureHandle::new("oak.jpg");
        assert!(NoTextures.image_size(&handle).is_none());
        assert_eq!(NoTextures.inset(&handle), 0.0);
        assert!(!NoTextures.contains(&handle));
        assert_eq!(NoTextures.resolve(&handle), handle);
    }
}
