//! Per-day nutrient requirement precomputation.
//!
//! Turns basic patient data into a default target vector for the reference
//! ten-nutrient deployment, using Harris-Benedict basal-metabolic-rate
//! equations. Electrolyte allowances are fixed baselines; in intensive care
//! they are measured and integrated separately, so they are deliberately not
//! patient-specific.

/// Nutrient order of the reference deployment.
pub const REFERENCE_NUTRIENTS: [&str; 10] = [
    "energy", "protein", "fat", "carbohydrate", "na", "k", "ca", "mg", "p", "fe",
];

/// Default importance weights: macronutrients matter most, electrolytes are
/// tracked loosely.
pub const DEFAULT_WEIGHTS: [f64; 10] = [1.0, 1.0, 1.0, 1.0, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1];

/// Activity factor for a patient recuperating in bed all day.
const ACTIVITY_FACTOR: f64 = 1.2;

/// Non-protein energy split: 65% carbohydrate, 35% fat.
const CARB_ENERGY_SHARE: f64 = 0.65;
const FAT_ENERGY_SHARE: f64 = 0.35;

/// Energy density in kcal per gram.
const KCAL_PER_G_CARB: f64 = 4.0;
const KCAL_PER_G_FAT: f64 = 9.0;
const KCAL_PER_G_PROTEIN: f64 = 4.0;

/// Protein requirement in g per kg of body weight (ESPEN ICU guideline).
const PROTEIN_G_PER_KG: f64 = 1.3;

// Fixed electrolyte allowances, in mg per day.
const NA_MG: f64 = 2000.0;
const K_MG: f64 = 3500.0;
const CA_MG: f64 = 800.0;
const MG_MG: f64 = 3750.0;
const P_MG: f64 = 800.0;
const FE_MG: f64 = 14.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy)]
pub struct Patient {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age_years: f64,
    pub sex: Sex,
}

/// Basal metabolic rate in kcal/day, Harris-Benedict equation in the
/// Pavlidou 2023 revision (calibrated on modern Western populations).
pub fn basal_metabolic_rate(patient: &Patient) -> f64 {
    match patient.sex {
        Sex::Male => {
            9.65 * patient.weight_kg + 5.73 * patient.height_cm - 5.08 * patient.age_years + 260.0
        }
        Sex::Female => {
            7.38 * patient.weight_kg + 6.07 * patient.height_cm - 2.31 * patient.age_years + 43.0
        }
    }
}

/// Basal metabolic rate in kcal/day, Harris-Benedict equation in the
/// Roza-Shizgal 1984 revision. Kept as the documented alternative; does not
/// necessarily apply to underweight or obese patients.
pub fn basal_metabolic_rate_1984(patient: &Patient) -> f64 {
    match patient.sex {
        Sex::Male => {
            13.397 * patient.weight_kg + 4.799 * patient.height_cm - 5.677 * patient.age_years
                + 88.362
        }
        Sex::Female => {
            9.247 * patient.weight_kg + 3.098 * patient.height_cm - 4.330 * patient.age_years
                + 447.593
        }
    }
}

/// Per-day nutrient targets in [`REFERENCE_NUTRIENTS`] order: energy in kcal,
/// macronutrients in g, electrolytes in mg.
pub fn daily_targets(patient: &Patient) -> Vec<f64> {
    let non_protein_energy = basal_metabolic_rate(patient) * ACTIVITY_FACTOR;

    let carbohydrate = CARB_ENERGY_SHARE * non_protein_energy / KCAL_PER_G_CARB;
    let fat = FAT_ENERGY_SHARE * non_protein_energy / KCAL_PER_G_FAT;
    let protein = patient.weight_kg * PROTEIN_G_PER_KG;
    let energy = non_protein_energy + protein * KCAL_PER_G_PROTEIN;

    vec![
        energy,
        protein,
        fat,
        carbohydrate,
        NA_MG,
        K_MG,
        CA_MG,
        MG_MG,
        P_MG,
        FE_MG,
    ]
}
