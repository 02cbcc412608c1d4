//! Equations shown in the reentry sidebar

use common::ui::Equation;

pub const REENTRY_EQUATIONS: &[Equation] = &[
    Equation {
        name: "Exponential Atmosphere",
        formula: "ρ = ρ₀ · e^(−h/H)",
        description: "Density falls by 1/e every scale height",
    },
    Equation {
        name: "Drag Deceleration",
        formula: "a_d = ½·ρ·v²·C_d·A / m",
        description: "Always opposes the motion",
    },
    Equation {
        name: "Velocity Update",
        formula: "v −= (a_d − g·sin γ)·Δt",
        description: "Gravity along the path speeds the capsule up",
    },
    Equation {
        name: "Altitude Update",
        formula: "h −= v·sin γ·Δt",
        description: "Vertical component of the flight path",
    },
    Equation {
        name: "Stagnation Heating",
        formula: "q = k·√ρ·v³,  T = min(3000, 20 + q/10⁴)",
        description: "Surface temperature approximation",
    },
    Equation {
        name: "Load Factor",
        formula: "n = a_d / g",
        description: "Above 12 g the vehicle breaks up",
    },
];

pub const REENTRY_VARIABLES: &[(&str, &str)] = &[
    ("ρ, ρ₀", "Air density, sea-level density (1.225 kg/m³)"),
    ("h, H", "Altitude, scale height (8500 m)"),
    ("v", "Speed along the flight path"),
    ("γ", "Entry (flight path) angle"),
    ("C_d", "Drag coefficient"),
    ("A, m", "Reference area (10 m²), mass (5000 kg)"),
    ("q, T", "Heat flux, surface temperature (°C)"),
    ("n", "G-force"),
];
