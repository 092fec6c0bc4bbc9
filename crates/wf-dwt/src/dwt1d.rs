use wf_core::{BorderMode, map_index};

use crate::FilterBank;

/// One analysis step on an even-length signal.
///
/// `approx[o] = sum_j lo[j] * x[(2o + F/2 - j) mod n]`, and likewise for
/// `detail` with the high-pass taps.
pub fn analyze(
    signal: &[f64],
    bank: &FilterBank,
    border: &BorderMode,
    approx: &mut [f64],
    detail: &mut [f64],
) {
    let n = signal.len();
    assert!(n.is_multiple_of(2), "signal length must be even");
    assert_eq!(approx.len(), n / 2, "approx must hold n/2 coefficients");
    assert_eq!(detail.len(), n / 2, "detail must hold n/2 coefficients");

    let f = bank.len();
    let half = f / 2;

    for (o, (a_out, d_out)) in approx.iter_mut().zip(detail.iter_mut()).enumerate() {
        let base = 2 * o + half;
        let mut a = 0.0f64;
        let mut d = 0.0f64;

        if base + 1 >= f && base < n {
            // Interior: full footprint in range, no wrapping.
            for j in 0..f {
                let x = signal[base - j];
                a += bank.lo[j] * x;
                d += bank.hi[j] * x;
            }
        } else {
            for j in 0..f {
                let idx = map_index(base as isize - j as isize, n, border)
                    .expect("periodic index must map for non-empty signal");
                let x = signal[idx];
                a += bank.lo[j] * x;
                d += bank.hi[j] * x;
            }
        }

        *a_out = a;
        *d_out = d;
    }
}

/// Inverse of [`analyze`]: the transpose of the analysis operator, which for
/// an orthogonal bank reconstructs the signal exactly.
pub fn synthesize(
    approx: &[f64],
    detail: &[f64],
    bank: &FilterBank,
    border: &BorderMode,
    out: &mut [f64],
) {
    assert_eq!(approx.len(), detail.len(), "bands must have equal length");
    assert_eq!(out.len(), 2 * approx.len(), "out must hold 2x coefficients");

    let n = out.len();
    let f = bank.len();
    let half = f / 2;
    out.fill(0.0);

    for (o, (&a, &d)) in approx.iter().zip(detail).enumerate() {
        let base = 2 * o + half;
        if base + 1 >= f && base < n {
            for j in 0..f {
                out[base - j] += bank.lo[j] * a + bank.hi[j] * d;
            }
        } else {
            for j in 0..f {
                let idx = map_index(base as isize - j as isize, n, border)
                    .expect("periodic index must map for non-empty signal");
                out[idx] += bank.lo[j] * a + bank.hi[j] * d;
            }
        }
    }
}
