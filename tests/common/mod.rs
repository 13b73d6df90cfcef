#![allow(dead_code)]

use name2gender::{Gender, NameRecord};

/// None of these names contain `z`, `x`, `q`, `p`, `l` or `m`.
pub const FEMALE: &[&str] = &[
    "anna", "rita", "tina", "nora", "sara", "hanna", "edna", "ida", "gina", "rosa", "vera",
    "dora", "iris", "tanya", "wanda",
];

pub const MALE: &[&str] = &[
    "bob", "otto", "ted", "ron", "ben", "dan", "fred", "ivan", "oscar", "victor",
];

pub fn records() -> Vec<NameRecord> {
    FEMALE
        .iter()
        .map(|n| NameRecord::new(*n, Gender::Female))
        .chain(MALE.iter().map(|n| NameRecord::new(*n, Gender::Male)))
        .collect()
}

pub fn csv() -> String {
    let mut out = String::from("Name,Gender\n");
    for r in records() {
        let label = match r.gender {
            Gender::Male => "M",
            Gender::Female => "F",
        };
        out.push_str(&format!("{},{}\n", r.name, label));
    }
    out
}
