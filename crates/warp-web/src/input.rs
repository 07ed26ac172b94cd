use warp_core::constants::MAX_PIXEL_RATIO;
use warp_core::Viewport;

/// Device pixel ratio, capped so high-DPI screens don't quadruple fill cost.
#[inline]
pub fn capped_pixel_ratio(dpr: f64) -> f32 {
    if !dpr.is_finite() || dpr <= 0.0 {
        return 1.0;
    }
    dpr.min(MAX_PIXEL_RATIO) as f32
}

#[inline]
fn css_px(v: f64) -> u32 {
    if v.is_finite() && v > 0.0 {
        v.floor() as u32
    } else {
        0
    }
}

/// Container client size (CSS px) plus DPR to a viewport. A container that
/// has not been laid out yet yields an empty viewport.
pub fn viewport_from_css(width: f64, height: f64, dpr: f64) -> Viewport {
    Viewport::new(css_px(width), css_px(height), capped_pixel_ratio(dpr))
}

/// Client coordinates to coordinates relative to the container's top-left.
#[inline]
pub fn local_pointer(client_x: f64, client_y: f64, left: f64, top: f64) -> (f32, f32) {
    ((client_x - left) as f32, (client_y - top) as f32)
}

/// JS numbers are f64; anything non-finite or negative falls back.
pub fn seed_or(seed: Option<f64>, fallback: u64) -> u64 {
    match seed {
        Some(s) if s.is_finite() && s >= 0.0 => s.trunc() as u64,
        _ => fallback,
    }
}

/// Detach children front to back until `first` reports none, so the
/// container ends up holding only what is appended next. Returns how many
/// were removed; the first failed removal stops the loop.
pub fn clear_children<N, E>(
    mut first: impl FnMut() -> Option<N>,
    mut remove: impl FnMut(N) -> Result<(), E>,
) -> Result<usize, E> {
    let mut removed = 0;
    while let Some(child) = first() {
        remove(child)?;
        removed += 1;
    }
    Ok(removed)
}
