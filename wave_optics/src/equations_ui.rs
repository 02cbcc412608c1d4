//! Equations shown in the wave optics sidebar

use common::ui::Equation;

pub const WAVE_EQUATIONS: &[Equation] = &[
    Equation {
        name: "Superposition",
        formula: "ψ = (1/N) Σ A·sin(k·r − ωt + φᵢ)",
        description: "k = f / 150, averaged over every source",
    },
    Equation {
        name: "Path Difference",
        formula: "Δ = d·sin θ = mλ",
        description: "Bright fringes where the paths differ by whole wavelengths",
    },
    Equation {
        name: "Double Slit",
        formula: "I = I₀·cos²(π d sin θ / λ)",
        description: "Two coherent sources",
    },
    Equation {
        name: "Single Slit",
        formula: "I = I₀·sinc²(π w sin θ / λ)",
        description: "Finite aperture of width w",
    },
    Equation {
        name: "Grating",
        formula: "I = I₀·[sin Nδ / sin δ]² / N²",
        description: "δ = π d sin θ / λ; more slits sharpen the peaks",
    },
    Equation {
        name: "Fringe Spacing",
        formula: "Δy = λL / d",
        description: "Screen distance L = 200 px",
    },
];

pub const WAVE_VARIABLES: &[(&str, &str)] = &[
    ("ψ", "Wave displacement"),
    ("A", "Amplitude"),
    ("λ", "Wavelength (1000 / f px)"),
    ("f", "Frequency"),
    ("d", "Slit separation (px)"),
    ("w", "Slit width (px)"),
    ("N", "Number of slits"),
    ("θ", "Observation angle"),
    ("φ", "Source phase offset"),
    ("m", "Interference order"),
];
