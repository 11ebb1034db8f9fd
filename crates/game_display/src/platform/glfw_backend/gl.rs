//! The handful of OpenGL entry points the backend itself needs
//!
//! Loaded through GLFW from the current context. Applications bring their own
//! loader for drawing.

use crate::platform::{PixelFormat, PlatformError, PlatformResult};
use crate::render::offscreen::{ColourBuffer, InternalFormat, TextureTarget};
use crate::video::context::GlInfo;
use std::ffi::{c_void, CStr};
use std::os::raw::c_char;

const GL_VENDOR: u32 = 0x1F00;
const GL_RENDERER: u32 = 0x1F01;
const GL_VERSION: u32 = 0x1F02;
const GL_EXTENSIONS: u32 = 0x1F03;
const GL_RED_BITS: u32 = 0x0D52;
const GL_GREEN_BITS: u32 = 0x0D53;
const GL_BLUE_BITS: u32 = 0x0D54;
const GL_ALPHA_BITS: u32 = 0x0D55;
const GL_DEPTH_BITS: u32 = 0x0D56;
const GL_STENCIL_BITS: u32 = 0x0D57;
const GL_SAMPLES: u32 = 0x80A9;
const GL_RGBA: u32 = 0x1908;
const GL_FLOAT: u32 = 0x1406;

type GetStringFn = unsafe extern "system" fn(u32) -> *const u8;
type GetIntegervFn = unsafe extern "system" fn(u32, *mut i32);
type ReadBufferFn = unsafe extern "system" fn(u32);
type ReadPixelsFn = unsafe extern "system" fn(i32, i32, i32, i32, u32, u32, *mut c_void);
type TexImage2DFn =
    unsafe extern "system" fn(u32, i32, i32, i32, i32, i32, u32, u32, *const c_void);

/// Entry points resolved from a live context
#[derive(Clone, Copy)]
pub(super) struct GlFunctions {
    get_string: GetStringFn,
    get_integerv: GetIntegervFn,
    read_buffer: ReadBufferFn,
    read_pixels: ReadPixelsFn,
    tex_image_2d: TexImage2DFn,
}

fn resolve(window: &mut glfw::Window, name: &str) -> PlatformResult<usize> {
    let proc_address = window.get_proc_address(name);
    // GLFW hands back a nullable function pointer; only its address matters here.
    let address: usize = unsafe { std::mem::transmute_copy(&proc_address) };
    if address == 0 {
        return Err(PlatformError::Unsupported(format!("{name} is not available")));
    }
    Ok(address)
}

impl GlFunctions {
    /// Resolve entry points; `window`'s context must be current
    pub(super) fn load(window: &mut glfw::Window) -> PlatformResult<Self> {
        // SAFETY: each address was returned by the driver for the named
        // function, whose C signature matches the pointer type it is cast to.
        unsafe {
            Ok(Self {
                get_string: std::mem::transmute::<usize, GetStringFn>(resolve(window, "glGetString")?),
                get_integerv: std::mem::transmute::<usize, GetIntegervFn>(resolve(
                    window,
                    "glGetIntegerv",
                )?),
                read_buffer: std::mem::transmute::<usize, ReadBufferFn>(resolve(window, "glReadBuffer")?),
                read_pixels: std::mem::transmute::<usize, ReadPixelsFn>(resolve(window, "glReadPixels")?),
                tex_image_2d: std::mem::transmute::<usize, TexImage2DFn>(resolve(
                    window,
                    "glTexImage2D",
                )?),
            })
        }
    }

    fn string(&self, name: u32) -> String {
        // SAFETY: glGetString returns null or a static NUL-terminated string.
        unsafe {
            let ptr = (self.get_string)(name);
            if ptr.is_null() {
                String::new()
            } else {
                CStr::from_ptr(ptr.cast::<c_char>()).to_string_lossy().into_owned()
            }
        }
    }

    fn integer(&self, name: u32) -> u32 {
        let mut value = 0i32;
        // SAFETY: every queried name returns exactly one integer.
        unsafe { (self.get_integerv)(name, &mut value) };
        value.max(0) as u32
    }

    /// Driver strings of the current context
    pub(super) fn info(&self) -> GlInfo {
        GlInfo {
            version: self.string(GL_VERSION),
            extensions: self.string(GL_EXTENSIONS),
            vendor: self.string(GL_VENDOR),
            renderer: self.string(GL_RENDERER),
        }
    }

    /// Pixel format of the current context's default framebuffer
    pub(super) fn pixel_format(&self) -> PixelFormat {
        PixelFormat {
            colour_bits: self.integer(GL_RED_BITS)
                + self.integer(GL_GREEN_BITS)
                + self.integer(GL_BLUE_BITS),
            alpha_bits: self.integer(GL_ALPHA_BITS),
            depth_bits: self.integer(GL_DEPTH_BITS),
            stencil_bits: self.integer(GL_STENCIL_BITS),
            samples: self.integer(GL_SAMPLES),
        }
    }

    /// Read a colour buffer of the current context as RGBA floats
    pub(super) fn read_pixels(&self, buffer: ColourBuffer, width: u32, height: u32) -> Vec<f32> {
        let mut pixels = vec![0.0f32; width as usize * height as usize * 4];
        // SAFETY: `pixels` holds width * height RGBA float texels.
        unsafe {
            (self.read_buffer)(buffer.gl_enum());
            (self.read_pixels)(
                0,
                0,
                width as i32,
                height as i32,
                GL_RGBA,
                GL_FLOAT,
                pixels.as_mut_ptr().cast::<c_void>(),
            );
        }
        pixels
    }

    /// Load RGBA float pixels into the texture bound to `target` in the current context
    pub(super) fn upload(
        &self,
        target: TextureTarget,
        format: InternalFormat,
        width: u32,
        height: u32,
        pixels: &[f32],
    ) {
        debug_assert_eq!(pixels.len(), width as usize * height as usize * 4);
        // SAFETY: `pixels` holds width * height RGBA float texels.
        unsafe {
            (self.tex_image_2d)(
                target.gl_enum(),
                0,
                format.gl_enum() as i32,
                width as i32,
                height as i32,
                0,
                GL_RGBA,
                GL_FLOAT,
                pixels.as_ptr().cast::<c_void>(),
            );
        }
    }
}
