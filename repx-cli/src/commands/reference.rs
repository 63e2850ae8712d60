//! Static reference commands

use colored::*;

use repx_core::domain::Discipline;
use repx_core::dto::regulations::{DisciplinesResponse, RegulationsResponse};

use crate::output::{print_discipline, print_regulations};

pub fn show_regulations(discipline: Discipline) {
    print_regulations(&RegulationsResponse::for_discipline(discipline));
}

pub fn list_disciplines() {
    let response = DisciplinesResponse::all();

    println!(
        "{}",
        format!("{} discipline(s):", response.disciplines.len()).bold()
    );
    println!();
    for info in &response.disciplines {
        print_discipline(info);
    }
}
