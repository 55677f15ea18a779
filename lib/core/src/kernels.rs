//! Dense `f32` kernels shared by [`Vector`](crate::Vector),
//! [`SparseVector`](crate::SparseVector) and the neighbour index.
//!
//! Loops run over `chunks_exact(8)` with split accumulators so LLVM can keep
//! two independent FMA chains in flight and vectorize the body.

/// Dot product. Slices of different length yield 0.0.
#[inline]
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let mut lo = 0.0f32;
    let mut hi = 0.0f32;

    let a_chunks = a.chunks_exact(8);
    let b_chunks = b.chunks_exact(8);
    let a_rest = a_chunks.remainder();
    let b_rest = b_chunks.remainder();

    for (x, y) in a_chunks.zip(b_chunks) {
        lo += x[0] * y[0] + x[1] * y[1] + x[2] * y[2] + x[3] * y[3];
        hi += x[4] * y[4] + x[5] * y[5] + x[6] * y[6] + x[7] * y[7];
    }

    for (x, y) in a_rest.iter().zip(b_rest) {
        lo += x * y;
    }

    lo + hi
}

#[inline]
pub fn norm_squared(v: &[f32]) -> f32 {
    dot(v, v)
}

#[inline]
pub fn norm(v: &[f32]) -> f32 {
    norm_squared(v).sqrt()
}

/// Euclidean distance. Slices of different length are infinitely far apart.
#[inline]
pub fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return f32::INFINITY;
    }

    let mut lo = 0.0f32;
    let mut hi = 0.0f32;

    let a_chunks = a.chunks_exact(4);
    let b_chunks = b.chunks_exact(4);
    let a_rest = a_chunks.remainder();
    let b_rest = b_chunks.remainder();

    for (x, y) in a_chunks.zip(b_chunks) {
        let d0 = x[0] - y[0];
        let d1 = x[1] - y[1];
        let d2 = x[2] - y[2];
        let d3 = x[3] - y[3];
        lo += d0 * d0 + d1 * d1;
        hi += d2 * d2 + d3 * d3;
    }

    for (x, y) in a_rest.iter().zip(b_rest) {
        let d = x - y;
        lo += d * d;
    }

    (lo + hi).sqrt()
}
