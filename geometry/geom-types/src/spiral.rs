//! Euler spirals (clothoids) and Fresnel integrals.
//!
//! An OpenDRIVE spiral interpolates curvature linearly in arc length. The
//! closed-form position integral reduces to Fresnel integrals, which are
//! evaluated with a power series for small arguments and the asymptotic
//! auxiliary-function expansion for large ones.

use std::f64::consts::{FRAC_PI_2, PI};

/// Fresnel integrals `C(x)` and `S(x)` with the `sin(pi t^2 / 2)` convention.
///
/// Accuracy is better than 1e-12 over the arguments produced by road-scale
/// clothoids.
#[must_use]
pub fn fresnel(x: f64) -> (f64, f64) {
    let ax = x.abs();
    let (c, s) = if ax < 3.0 {
        fresnel_series(ax)
    } else {
        fresnel_asymptotic(ax)
    };
    if x < 0.0 { (-c, -s) } else { (c, s) }
}

/// Power series (accurate below the asymptotic switch at `x = 3`).
fn fresnel_series(x: f64) -> (f64, f64) {
    let z = FRAC_PI_2 * x * x;
    let z2 = z * z;

    // C(x) = x * sum (-z^2)^n / ((2n)! (4n+1))
    let mut c_sum = 0.0;
    let mut term = 1.0;
    let mut n = 0u32;
    loop {
        let contribution = term / f64::from(4 * n + 1);
        c_sum += contribution;
        if contribution.abs() < 1e-17 * c_sum.abs().max(1.0) || n > 40 {
            break;
        }
        n += 1;
        term *= -z2 / (f64::from(2 * n) * f64::from(2 * n - 1));
    }

    // S(x) = x * z * sum (-z^2)^n / ((2n+1)! (4n+3))
    let mut s_sum = 0.0;
    term = 1.0;
    n = 0;
    loop {
        let contribution = term / f64::from(4 * n + 3);
        s_sum += contribution;
        if contribution.abs() < 1e-17 * s_sum.abs().max(1.0) || n > 40 {
            break;
        }
        n += 1;
        term *= -z2 / (f64::from(2 * n) * f64::from(2 * n + 1));
    }

    (x * c_sum, x * z * s_sum)
}

/// Asymptotic expansion through the auxiliary functions `f` and `g`:
/// `C = 1/2 + f sin(z) - g cos(z)`, `S = 1/2 - f cos(z) - g sin(z)`.
fn fresnel_asymptotic(x: f64) -> (f64, f64) {
    let z = FRAC_PI_2 * x * x;
    let u = 1.0 / (2.0 * z);

    // f ~ (1/(pi x)) * sum (-1)^m (4m-1)!! u^(2m)
    // g ~ (1/(pi x)) * sum (-1)^m (4m+1)!! u^(2m+1)
    let mut f_sum = 0.0;
    let mut g_sum = 0.0;
    let mut f_term: f64 = 1.0;
    let mut g_term = u;
    for m in 0..12u32 {
        if f_term.abs() < 1e-17 && g_term.abs() < 1e-17 {
            break;
        }
        f_sum += f_term;
        g_sum += g_term;
        let m = f64::from(m);
        f_term *= -(4.0 * m + 1.0) * (4.0 * m + 3.0) * u * u;
        g_term *= -(4.0 * m + 3.0) * (4.0 * m + 5.0) * u * u;
    }
    let scale = 1.0 / (PI * x);
    let f = scale * f_sum;
    let g = scale * g_sum;

    let (sin_z, cos_z) = z.sin_cos();
    (
        0.5 + f * sin_z - g * cos_z,
        0.5 - f * cos_z - g * sin_z,
    )
}

/// Local clothoid displacement after arc length `ds`, starting at curvature
/// `curv_start` with curvature rate `curv_rate` per metre.
///
/// Returns `(x, y, heading)` in the segment's local frame. Degenerate rates
/// fall back to the arc (constant curvature) and line closed forms.
#[must_use]
pub fn clothoid_local(curv_start: f64, curv_rate: f64, ds: f64) -> (f64, f64, f64) {
    let heading = curv_start * ds + 0.5 * curv_rate * ds * ds;

    if curv_rate.abs() < 1e-12 {
        // Constant curvature: arc, or line when also straight.
        if curv_start.abs() < 1e-12 {
            return (ds, 0.0, heading);
        }
        let angle = curv_start * ds;
        let radius = 1.0 / curv_start;
        return (radius * angle.sin(), radius * (1.0 - angle.cos()), heading);
    }

    // Mirror so the rate is positive, flip y and heading back afterwards.
    let (k0, rate, mirror) = if curv_rate > 0.0 {
        (curv_start, curv_rate, 1.0)
    } else {
        (-curv_start, -curv_rate, -1.0)
    };

    let scale = (PI / rate).sqrt();
    let v0 = k0 / (PI * rate).sqrt();
    let v1 = (k0 + rate * ds) / (PI * rate).sqrt();
    let phi0 = k0 * k0 / (2.0 * rate);

    let (c0, s0) = fresnel(v0);
    let (c1, s1) = fresnel(v1);
    let dc = c1 - c0;
    let dsin = s1 - s0;

    let (sin_phi, cos_phi) = phi0.sin_cos();
    let x = scale * (cos_phi * dc + sin_phi * dsin);
    let y = scale * (cos_phi * dsin - sin_phi * dc);

    (x, mirror * y, heading)
}
