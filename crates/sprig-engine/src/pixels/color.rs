/// Straight-alpha RGBA color, one byte per channel.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba([0, 0, 0, 0]);
    pub const BLACK: Rgba = Rgba([0, 0, 0, 255]);
    pub const WHITE: Rgba = Rgba([255, 255, 255, 255]);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    #[inline]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 255])
    }

    #[inline]
    pub const fn r(self) -> u8 {
        self.0[0]
    }

    #[inline]
    pub const fn g(self) -> u8 {
        self.0[1]
    }

    #[inline]
    pub const fn b(self) -> u8 {
        self.0[2]
    }

    #[inline]
    pub const fn a(self) -> u8 {
        self.0[3]
    }

    #[inline]
    pub const fn is_opaque(self) -> bool {
        self.0[3] == 255
    }

    /// Straight-alpha source-over composite of `self` onto `dst`.
    ///
    /// Opaque sources replace `dst`; fully transparent sources leave it as is.
    pub fn over(self, dst: Rgba) -> Rgba {
        match self.a() {
            255 => self,
            0 => dst,
            sa => {
                let sa = sa as u32;
                let da = scale(dst.a(), 255 - sa) as u32;
                let out_a = sa + da;
                let mix = |s: u8, d: u8| -> u8 {
                    ((s as u32 * sa + d as u32 * da + out_a / 2) / out_a) as u8
                };
                Rgba([
                    mix(self.r(), dst.r()),
                    mix(self.g(), dst.g()),
                    mix(self.b(), dst.b()),
                    out_a.min(255) as u8,
                ])
            }
        }
    }
}

/// `v * f / 255` with the usual shift approximation.
#[inline]
fn scale(v: u8, f: u32) -> u8 {
    let x = v as u32 * f;
    ((x + 1 + (x >> 8)) >> 8) as u8
}
