//! Offscreen render targets
//!
//! Targets are addressed by [`OffscreenId`] keys. Copying a target's colour
//! buffer into a texture records a [`TextureBinding`] on the destination;
//! when the source is destroyed that binding is invalidated rather than left
//! pointing at freed storage.

use crate::core::config::GlConfig;
use crate::error::{DisplayError, DisplayResult};
use crate::platform::{NativeTarget, OffscreenDescriptor, PixelFormat, Platform};
use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};
use std::collections::HashMap;

new_key_type! {
    /// Handle to an offscreen target
    pub struct OffscreenId;
}

/// Texture target an offscreen buffer is bound as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureTarget {
    /// `GL_TEXTURE_2D`
    Texture2D,
    /// `GL_TEXTURE_RECTANGLE`
    TextureRectangle,
}

impl TextureTarget {
    /// OpenGL enum value
    pub const fn gl_enum(self) -> u32 {
        match self {
            Self::Texture2D => 0x0DE1,
            Self::TextureRectangle => 0x84F5,
        }
    }
}

/// Internal texture format of an offscreen buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InternalFormat {
    /// 8-bit RGB
    Rgb8,
    /// 8-bit RGBA
    Rgba8,
    /// Half-float RGB
    Rgb16F,
    /// Half-float RGBA
    Rgba16F,
}

impl InternalFormat {
    /// OpenGL enum value
    pub const fn gl_enum(self) -> u32 {
        match self {
            Self::Rgb8 => 0x8051,
            Self::Rgba8 => 0x8058,
            Self::Rgb16F => 0x881B,
            Self::Rgba16F => 0x881A,
        }
    }

    /// Whether components are half floats
    pub const fn is_float(self) -> bool {
        matches!(self, Self::Rgb16F | Self::Rgba16F)
    }
}

/// Which colour buffer of a source target to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColourBuffer {
    /// `GL_FRONT`
    Front,
    /// `GL_BACK`
    Back,
}

impl ColourBuffer {
    /// OpenGL enum value
    pub const fn gl_enum(self) -> u32 {
        match self {
            Self::Front => 0x0404,
            Self::Back => 0x0405,
        }
    }
}

/// An offscreen buffer and its negotiated pixel format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffscreenTarget {
    descriptor: OffscreenDescriptor,
    native: NativeTarget,
    pixel_format: PixelFormat,
}

impl OffscreenTarget {
    /// Creation parameters
    pub const fn descriptor(&self) -> &OffscreenDescriptor {
        &self.descriptor
    }

    /// Negotiated pixel format
    pub const fn pixel_format(&self) -> &PixelFormat {
        &self.pixel_format
    }

    /// Width and height in pixels
    pub const fn size(&self) -> (u32, u32) {
        (self.descriptor.width, self.descriptor.height)
    }
}

/// Destination of a texture copy: an offscreen target's context, or the primary one for `None`
pub type TextureSlot = Option<OffscreenId>;

/// Contents last copied into a destination's texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureBinding {
    /// Holds a copy of `source`'s colour buffer
    Bound {
        /// Target the pixels came from
        source: OffscreenId,
        /// Buffer that was read
        buffer: ColourBuffer,
    },
    /// The source was destroyed; the texture must not be refreshed from it
    Invalidated,
}

/// All live offscreen targets
#[derive(Debug, Default)]
pub struct OffscreenTargets {
    targets: SlotMap<OffscreenId, OffscreenTarget>,
    bindings: HashMap<TextureSlot, TextureBinding>,
    active: Option<OffscreenId>,
}

impl OffscreenTargets {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a target
    ///
    /// The pixel format follows `gl` except for colour and alpha depth, which
    /// are left to the driver; the texture's internal format sets storage.
    pub fn create(
        &mut self,
        platform: &mut dyn Platform,
        descriptor: OffscreenDescriptor,
        gl: &GlConfig,
    ) -> DisplayResult<OffscreenId> {
        if descriptor.width == 0 || descriptor.height == 0 {
            return Err(DisplayError::InvalidConfig(format!(
                "offscreen target needs a non-zero size, got {}x{}",
                descriptor.width, descriptor.height
            )));
        }
        gl.validate().map_err(DisplayError::InvalidConfig)?;

        let request = gl.offscreen_request();
        let (native, pixel_format) = platform
            .create_offscreen(&descriptor, &request)
            .map_err(DisplayError::OffscreenCreation)?;

        let missing = pixel_format.shortfalls(&request);
        if !missing.is_empty() {
            platform.destroy_offscreen(native);
            return Err(DisplayError::PixelFormatUnavailable(format!(
                "offscreen {} below the requested minimum",
                missing.join(", ")
            )));
        }

        let id = self.targets.insert(OffscreenTarget {
            descriptor,
            native,
            pixel_format,
        });
        log::debug!(
            "Offscreen target {id:?} created: {}x{} {:?}",
            descriptor.width,
            descriptor.height,
            descriptor.internal_format
        );
        Ok(id)
    }

    /// Release a target and invalidate textures copied from it
    pub fn destroy(&mut self, platform: &mut dyn Platform, id: OffscreenId) -> DisplayResult<()> {
        let target = self
            .targets
            .remove(id)
            .ok_or_else(|| DisplayError::contract(format!("offscreen target {id:?} does not exist")))?;

        if self.active == Some(id) {
            self.active = None;
            if let Err(e) = platform.bind_render_target(None) {
                log::warn!("Failed to restore the primary render target: {e}");
            }
        }

        self.bindings.remove(&Some(id));
        for binding in self.bindings.values_mut() {
            if matches!(binding, TextureBinding::Bound { source, .. } if *source == id) {
                *binding = TextureBinding::Invalidated;
            }
        }

        platform.destroy_offscreen(target.native);
        log::debug!("Offscreen target {id:?} destroyed");
        Ok(())
    }

    /// Release every target
    pub fn destroy_all(&mut self, platform: &mut dyn Platform) {
        let ids: Vec<OffscreenId> = self.targets.keys().collect();
        for id in ids {
            if let Err(e) = self.destroy(platform, id) {
                log::warn!("{e}");
            }
        }
        self.bindings.clear();
    }

    /// Direct rendering to `target`, or the primary surface for `None`
    pub fn set_render_target(
        &mut self,
        platform: &mut dyn Platform,
        target: Option<OffscreenId>,
    ) -> DisplayResult<()> {
        let native = target.map(|id| self.native(id)).transpose()?;
        platform.bind_render_target(native).map_err(DisplayError::Fatal)?;
        self.active = target;
        Ok(())
    }

    /// Copy `source`'s colour buffer into the texture bound in `destination`
    pub fn copy_to_texture(
        &mut self,
        platform: &mut dyn Platform,
        destination: TextureSlot,
        source: OffscreenId,
        buffer: ColourBuffer,
    ) -> DisplayResult<()> {
        let native_source = self.native(source)?;
        let native_destination = destination.map(|id| self.native(id)).transpose()?;
        platform
            .copy_to_texture(native_destination, native_source, buffer)
            .map_err(DisplayError::Fatal)?;
        self.bindings
            .insert(destination, TextureBinding::Bound { source, buffer });
        Ok(())
    }

    /// Repeat the last copy into `destination` to pick up new source contents
    pub fn refresh_texture(&mut self, platform: &mut dyn Platform, destination: TextureSlot) -> DisplayResult<()> {
        match self.bindings.get(&destination).copied() {
            Some(TextureBinding::Bound { source, buffer }) => {
                self.copy_to_texture(platform, destination, source, buffer)
            }
            Some(TextureBinding::Invalidated) => Err(DisplayError::contract(
                "texture source offscreen target was destroyed",
            )),
            None => Err(DisplayError::contract("no texture has been copied into this destination")),
        }
    }

    fn native(&self, id: OffscreenId) -> DisplayResult<NativeTarget> {
        self.targets
            .get(id)
            .map(|target| target.native)
            .ok_or_else(|| DisplayError::contract(format!("offscreen target {id:?} does not exist")))
    }

    /// Look up a live target
    pub fn get(&self, id: OffscreenId) -> Option<&OffscreenTarget> {
        self.targets.get(id)
    }

    /// What was last copied into `destination`
    pub fn binding(&self, destination: TextureSlot) -> Option<TextureBinding> {
        self.bindings.get(&destination).copied()
    }

    /// The target rendering is directed to, `None` for the primary surface
    pub const fn active(&self) -> Option<OffscreenId> {
        self.active
    }

    /// Number of live targets
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// True when no targets exist
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_enums() {
        assert_eq!(InternalFormat::Rgba16F.gl_enum(), 0x881A);
        assert!(InternalFormat::Rgb16F.is_float());
        assert!(!InternalFormat::Rgba8.is_float());
        assert_eq!(TextureTarget::TextureRectangle.gl_enum(), 0x84F5);
        assert_eq!(ColourBuffer::Back.gl_enum(), 0x0405);
    }
}
