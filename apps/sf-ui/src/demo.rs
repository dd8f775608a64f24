//! Figure shown at startup: a truncated Fourier series of a square wave
//! next to its first harmonic.

use sf_controls::ParamConfig;
use sf_expr::Expr;
use sf_figure::{FigureResult, PlotOptions, PlotSurface, SurfaceOptions};

/// `a * 4/pi * sum_{k<terms} sin((2k+1) w x) / (2k+1)`
pub fn square_wave(terms: usize) -> Expr {
    let (a, w, x) = (Expr::sym("a"), Expr::sym("w"), Expr::sym("x"));
    let mut sum = Expr::num(0.0);
    for k in 0..terms {
        let n = (2 * k + 1) as f64;
        sum = sum + (n * w.clone() * x.clone()).sin() / n;
    }
    a * 4.0 / Expr::pi() * sum
}

pub fn build() -> FigureResult<PlotSurface> {
    let options = SurfaceOptions::new()
        .with_x_range(-6.5, 6.5)?
        .with_y_range(-2.0, 2.0)?
        .with_title("Fourier series of a square wave");
    let mut surface = PlotSurface::with_options(options)?;

    surface.add_param("a", ParamConfig::new().value(1.0).range(0.0, 1.5))?;
    surface.add_param("w", ParamConfig::new().value(1.0).range(0.2, 3.0).step(0.05))?;

    surface
        .plot(
            "x",
            square_wave(7),
            PlotOptions::new().id("square").parameters(["a", "w"]),
        )?
        .set_label("7 terms");

    surface
        .plot(
            "x",
            square_wave(1),
            PlotOptions::new()
                .id("fundamental")
                .parameters(["a", "w"])
                .sampling_points(200),
        )?
        .set_label("1 term");

    Ok(surface)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sf_expr::{NumericFunction, Symbol, TreeCompiler};

    #[test]
    fn demo_builds_two_curves() {
        let surface = build().unwrap();
        assert_eq!(surface.curve_count(), 2);
        let labels: Vec<_> = surface.curves().map(|c| c.label().to_string()).collect();
        assert_eq!(labels, ["7 terms", "1 term"]);
    }

    #[test]
    fn square_wave_is_near_amplitude_mid_period() {
        let args = [Symbol::from("x"), Symbol::from("a"), Symbol::from("w")];
        let f = TreeCompiler.compile_expr(&square_wave(50), &args).unwrap();
        let y = f.evaluate(&[std::f64::consts::FRAC_PI_2], &[1.0, 1.0]).unwrap();
        assert!((y[0] - 1.0).abs() < 0.02, "{y:?}");
    }
}
