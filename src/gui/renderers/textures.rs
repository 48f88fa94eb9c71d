use std::fs;
use std::path::Path;
use std::rc::Rc;

use image::DynamicImage;
use kiss3d::context::Context;
use kiss3d::resource::{Texture, TextureManager};

use crate::error::TextureError;
use crate::gfx::{TextureHandle, TextureLoader};

/// Every texture the scene uses, indexed by `TextureHandle`. Slot 0 is
/// kiss3d's plain default texture, which doubles as the placeholder.
pub struct TextureTable {
    textures: Vec<Rc<Texture>>,
}

impl TextureTable {
    pub fn new() -> Self {
        let placeholder = TextureManager::get_global_manager(|tm| tm.get_default());
        TextureTable {
            textures: vec![placeholder],
        }
    }

    pub fn bind(&self, handle: TextureHandle) {
        let texture = match self.textures.get(handle.0) {
            Some(texture) => texture,
            None => {
                log::warn!("Unknown texture {:?}, using the placeholder", handle);
                &self.textures[TextureHandle::PLACEHOLDER.0]
            }
        };

        let ctxt = Context::get();
        ctxt.active_texture(Context::TEXTURE0);
        ctxt.bind_texture(Context::TEXTURE_2D, Some(&**texture));
    }
}

impl TextureLoader for TextureTable {
    fn load(&mut self, path: &Path) -> Result<TextureHandle, TextureError> {
        let bytes = fs::read(path).map_err(|source| TextureError::Read {
            path: path.to_owned(),
            source,
        })?;
        let image = decode_rgba(path, &bytes)?;

        let name = path.to_string_lossy();
        let texture = TextureManager::get_global_manager(|tm| tm.add_image(image.clone(), &name));
        self.textures.push(texture);

        log::info!("Loaded texture {}", path.display());
        Ok(TextureHandle(self.textures.len() - 1))
    }
}

/// Decodes an image file and converts it to 8-bit RGBA, the only layout that
/// kiss3d uploads for every source format (grayscale, alpha, 16-bit...).
pub fn decode_rgba(path: &Path, bytes: &[u8]) -> Result<DynamicImage, TextureError> {
    let image = image::load_from_memory(bytes).map_err(|source| TextureError::Decode {
        path: path.to_owned(),
        source,
    })?;
    Ok(DynamicImage::ImageRgba8(image.into_rgba8()))
}
