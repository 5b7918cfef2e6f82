use crate::{
    foundation::core::{Size, Viewport},
    foundation::error::{ReelError, ReelResult},
};

/// Readback of a surface or composited page frame.
#[derive(Clone, Debug)]
pub struct FrameRgba {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRgba {
    /// Convert to straight alpha for encoders that expect it. No-op if already straight.
    pub fn into_straight(mut self) -> Self {
        if self.premultiplied {
            for px in self.data.chunks_exact_mut(4) {
                let a = u32::from(px[3]);
                if a == 0 {
                    px[..3].fill(0);
                    continue;
                }
                for c in &mut px[..3] {
                    *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
                }
            }
            self.premultiplied = false;
        }
        self
    }
}

/// Fixed-size drawing target whose pixel dimensions track the viewport.
pub struct Surface {
    width: u16,
    height: u16,
    pub(crate) pixmap: vello_cpu::Pixmap,
}

impl Surface {
    pub fn new(viewport: Viewport) -> ReelResult<Self> {
        let (width, height) = surface_dims(viewport)?;
        Ok(Self {
            width,
            height,
            pixmap: vello_cpu::Pixmap::new(width, height),
        })
    }

    /// Match the viewport size. Returns `true` when the dimensions changed.
    ///
    /// A size change reallocates the pixmap, so previous contents are lost.
    pub fn resize(&mut self, viewport: Viewport) -> ReelResult<bool> {
        let (width, height) = surface_dims(viewport)?;
        if width == self.width && height == self.height {
            return Ok(false);
        }
        *self = Self {
            width,
            height,
            pixmap: vello_cpu::Pixmap::new(width, height),
        };
        Ok(true)
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    /// Premultiplied RGBA8, row-major.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        self.pixmap.data_as_u8_slice_mut()
    }

    pub fn pixel(&self, x: u16, y: u16) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (usize::from(y) * usize::from(self.width) + usize::from(x)) * 4;
        let d = self.data();
        Some([d[i], d[i + 1], d[i + 2], d[i + 3]])
    }

    pub fn readback(&self) -> FrameRgba {
        FrameRgba {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: self.data().to_vec(),
            premultiplied: true,
        }
    }
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

fn surface_dims(viewport: Viewport) -> ReelResult<(u16, u16)> {
    if viewport.width == 0 || viewport.height == 0 {
        return Err(ReelError::validation("surface dimensions must be non-zero"));
    }
    let width: u16 = viewport
        .width
        .try_into()
        .map_err(|_| ReelError::render("surface width exceeds u16"))?;
    let height: u16 = viewport
        .height
        .try_into()
        .map_err(|_| ReelError::render("surface height exceeds u16"))?;
    Ok((width, height))
}
