use std::fs;
use std::path::PathBuf;

use assert_float_eq::assert_float_absolute_eq;
use nutri_blend_rs::{BlendError, BlendRequest, Catalog, Limits, MixModel};

fn write_tables(dir: &tempfile::TempDir, formulas: &str, solutions: &str) -> (PathBuf, PathBuf) {
    let formulas_path = dir.path().join("formulas.csv");
    let solutions_path = dir.path().join("solutions.csv");
    fs::write(&formulas_path, formulas).unwrap();
    fs::write(&solutions_path, solutions).unwrap();
    (formulas_path, solutions_path)
}

#[test]
fn test_load_catalog_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let (formulas, solutions) = write_tables(
        &dir,
        "name,volume,priority,Kcal,Protein g\n\
         Alpha,250,0.8,100,5\n\
         Beta,,,50,\n",
        "name,volume,Kcal,Protein g\n\
         Saline,100,0,0\n",
    );

    let catalog = Catalog::load(&formulas, &solutions).unwrap();

    assert_eq!(catalog.n_formulas(), 2);
    assert_eq!(catalog.n_solutions(), 1);
    assert_eq!(catalog.nutrient_count(), 2);
    assert_eq!(catalog.nutrient_names(), &["Kcal", "Protein g"]);

    // Alpha as written; Beta falls back to the defaults and zeroed cells.
    assert_eq!(catalog.bottle_volumes(), &[250.0, 500.0, 100.0]);
    assert_float_absolute_eq!(catalog.priorities()[0], 0.8, 1e-9);
    assert_float_absolute_eq!(catalog.priorities()[1], 1.0, 1e-9);
    assert_eq!(catalog.composition(1), &[50.0, 0.0]);
    assert_eq!(catalog.composition(2), &[0.0, 0.0]);
}

#[test]
fn test_nutrient_count_mismatch_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let (formulas, solutions) = write_tables(
        &dir,
        "name,volume,priority,Kcal,Protein g\n\
         Alpha,500,1.0,100,5\n",
        "name,volume,Kcal,Protein g,Fe mg\n\
         Saline,500,0,0,0\n",
    );

    let result = Catalog::load(&formulas, &solutions);
    assert!(matches!(
        result,
        Err(BlendError::CatalogMismatch {
            formulas: 2,
            solutions: 3
        })
    ));
}

#[test]
fn test_nutrient_order_mismatch_is_fatal() {
    // Same column count, different ordering: index alignment would be wrong.
    let dir = tempfile::tempdir().unwrap();
    let (formulas, solutions) = write_tables(
        &dir,
        "name,volume,priority,Kcal,Protein g\n\
         Alpha,500,1.0,100,5\n",
        "name,volume,Protein g,Kcal\n\
         Saline,500,0,0\n",
    );

    let result = Catalog::load(&formulas, &solutions);
    assert!(matches!(result, Err(BlendError::CatalogMismatch { .. })));
}

#[test]
fn test_missing_table_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let (formulas, _) = write_tables(
        &dir,
        "name,volume,priority,Kcal\nAlpha,500,1.0,100\n",
        "name,volume,Kcal\nSaline,500,0\n",
    );

    let result = Catalog::load(&formulas, dir.path().join("nope.csv"));
    assert!(result.is_err());
}

#[test]
fn test_end_to_end_load_and_solve() {
    let dir = tempfile::tempdir().unwrap();
    let (formulas, solutions) = write_tables(
        &dir,
        "name,volume,priority,bottles,Protein g\n\
         ProteinPlus,100,1.0,100,5\n",
        "name,volume,Protein g\n\
         Water,500,0\n",
    );

    let catalog = Catalog::load(&formulas, &solutions).unwrap();
    let mut model = MixModel::new(catalog, Limits::default()).unwrap();

    let result = model
        .solve(&BlendRequest::new(vec![60.0], vec![1.0]))
        .unwrap();

    assert_float_absolute_eq!(result.deviation, 0.0, 1e-4);
    assert_eq!(result.formulas_used(), 1);
    assert_eq!(result.formulas[0].bottles, 12);
    assert_float_absolute_eq!(result.nutrients[0], 60.0, 1e-3);
}
