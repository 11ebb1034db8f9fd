//! # Rendering Loop
//!
//! Frame pairing, fades and offscreen targets. Nothing here draws; the
//! application renders with OpenGL between `begin_render` and `end_render`
//! and these types keep the protocol around it honest.
//!
//! ## Frame Protocol
//!
//! ```text
//! begin_render() ─► Ok(false) ─► skip frame
//!      │
//!      ▼ Ok(true)
//!   draw ─► end_render()      fade overlay, swap
//!      └──► discard_render()  nothing presented
//! ```

pub mod fade;
pub mod frame;
pub mod offscreen;

pub use fade::{Fade, FadeState, DEFAULT_FADE_TIME_SECS};
pub use frame::{DrawCallback, RedrawReason, RedrawRequest, RenderLoop};
pub use offscreen::{
    ColourBuffer, InternalFormat, OffscreenId, OffscreenTarget, OffscreenTargets, TextureBinding,
    TextureSlot, TextureTarget,
};
