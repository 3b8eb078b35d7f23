#![allow(dead_code)]

use factory_lib::prelude::*;

pub const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/recipes.json");

pub fn catalog() -> Catalog {
    Catalog::from_file(FIXTURE).expect("Failed to load fixture catalog")
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

pub fn names<'a>(amounts: &[(&'a Item, Rate)]) -> Vec<&'a str> {
    amounts.iter().map(|(item, _)| item.name.as_str()).collect()
}
