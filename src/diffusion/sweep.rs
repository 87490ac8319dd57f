//! One explicit flux-exchange sweep over a working grid.
//!
//! For every pair of 4-adjacent cells the donor is the cell with more mass.
//! It sends `max(U[donor] - U[receiver], 0) · dt` mass units and the same
//! *proportion* of its weighted coordinates. The update is written as a gather:
//! each cell sums what it receives from and sends to its in-grid neighbours,
//! reading only the source buffer. Both sides of a pair evaluate the same
//! [`transfer`] call, so what one cell loses the other gains bit for bit and
//! border cells never exchange with anything outside the grid.

use crate::field::WorkingGrid;
use crate::image::ImageView;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Mass and weighted coordinates moved from `donor` to `receiver` cell.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Transfer {
    pub mass: f32,
    pub x_hat: f32,
    pub y_hat: f32,
}

/// Amount the donor cell sends to the receiver during a step of size `dt`.
#[inline]
pub fn transfer(donor: [f32; 3], receiver_mass: f32, dt: f32) -> Transfer {
    let outflow = (donor[0] - receiver_mass).max(0.0) * dt;
    if outflow == 0.0 {
        return Transfer::default();
    }
    let proportion = outflow / donor[0];
    Transfer {
        mass: outflow,
        x_hat: proportion * donor[1],
        y_hat: proportion * donor[2],
    }
}

/// Advance `src` by `dt` into `dst`. Both grids must share a shape.
///
/// Rows are split across threads with the `parallel` feature; the result is
/// identical to [`sweep_serial`].
pub fn sweep(src: &WorkingGrid, dst: &mut WorkingGrid, dt: f32) {
    #[cfg(feature = "parallel")]
    sweep_parallel(src, dst, dt);

    #[cfg(not(feature = "parallel"))]
    sweep_serial(src, dst, dt);
}

/// Single-threaded [`sweep`].
pub fn sweep_serial(src: &WorkingGrid, dst: &mut WorkingGrid, dt: f32) {
    debug_assert_eq!(src.mass.shape(), dst.mass.shape());
    let w = src.width();
    if w == 0 {
        return;
    }
    let rows = dst
        .mass
        .data
        .chunks_mut(w)
        .zip(dst.coords.x_hat.data.chunks_mut(w))
        .zip(dst.coords.y_hat.data.chunks_mut(w));
    for (y, ((u, xh), yh)) in rows.enumerate() {
        sweep_row(src, y, dt, u, xh, yh);
    }
}

#[cfg(feature = "parallel")]
fn sweep_parallel(src: &WorkingGrid, dst: &mut WorkingGrid, dt: f32) {
    debug_assert_eq!(src.mass.shape(), dst.mass.shape());
    let w = src.width();
    if w == 0 {
        return;
    }
    dst.mass
        .data
        .par_chunks_mut(w)
        .zip(dst.coords.x_hat.data.par_chunks_mut(w))
        .zip(dst.coords.y_hat.data.par_chunks_mut(w))
        .enumerate()
        .for_each(|(y, ((u, xh), yh))| sweep_row(src, y, dt, u, xh, yh));
}

#[inline]
fn cell(src: &WorkingGrid, x: usize, y: usize) -> [f32; 3] {
    let i = src.mass.idx(x, y);
    [
        src.mass.data[i],
        src.coords.x_hat.data[i],
        src.coords.y_hat.data[i],
    ]
}

fn sweep_row(
    src: &WorkingGrid,
    y: usize,
    dt: f32,
    out_u: &mut [f32],
    out_xh: &mut [f32],
    out_yh: &mut [f32],
) {
    let w = src.width();
    let h = src.height();
    for x in 0..w {
        let me = cell(src, x, y);
        let mut du = 0.0f32;
        let mut dxh = 0.0f32;
        let mut dyh = 0.0f32;

        let mut exchange = |nx: usize, ny: usize| {
            let other = cell(src, nx, ny);
            let sent = transfer(me, other[0], dt);
            let got = transfer(other, me[0], dt);
            du += got.mass - sent.mass;
            dxh += got.x_hat - sent.x_hat;
            dyh += got.y_hat - sent.y_hat;
        };

        // vertical pairs
        if y > 0 {
            exchange(x, y - 1);
        }
        if y + 1 < h {
            exchange(x, y + 1);
        }
        // horizontal pairs
        if x > 0 {
            exchange(x - 1, y);
        }
        if x + 1 < w {
            exchange(x + 1, y);
        }

        out_u[x] = me[0] + du;
        out_xh[x] = me[1] + dxh;
        out_yh[x] = me[2] + dyh;
    }
}
