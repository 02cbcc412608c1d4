//! Equations shown in the gravity sandbox sidebar

use common::ui::Equation;

pub const GRAVITY_EQUATIONS: &[Equation] = &[
    Equation {
        name: "Softened Gravitation",
        formula: "F = G·m₁·m₂ / (r² + ε)",
        description: "ε keeps the force finite when bodies overlap",
    },
    Equation {
        name: "N-Body Acceleration",
        formula: "a⃗ᵢ = Σⱼ F·r̂ᵢⱼ / mᵢ",
        description: "Sum of every other body's pull",
    },
    Equation {
        name: "Semi-implicit Euler",
        formula: "v += a·Δt,  p += v·Δt",
        description: "Velocity first, then position, Δt = time scale / 2",
    },
    Equation {
        name: "Perfectly Inelastic Merge",
        formula: "v = (m₁v₁ + m₂v₂) / (m₁ + m₂)",
        description: "Momentum is conserved when bodies merge",
    },
    Equation {
        name: "Merged Radius",
        formula: "R = ∛M · 2.5",
        description: "Radius follows total mass",
    },
    Equation {
        name: "Kinetic Energy",
        formula: "K = Σ ½·m·v²",
        description: "Sampled every 15 steps",
    },
];

pub const GRAVITY_VARIABLES: &[(&str, &str)] = &[
    ("G", "Gravitational constant (sandbox units)"),
    ("M, m", "Mass of bodies"),
    ("r", "Distance between centers"),
    ("ε", "Softening constant (100)"),
    ("v⃗", "Velocity vector"),
    ("Δt", "Integration step"),
    ("R", "Body radius"),
    ("K", "Kinetic energy"),
];
