use clap::ValueEnum;

use viability_api::HelperTable;
use viability_types::Category;

#[derive(Copy, Clone, ValueEnum)]
pub(crate) enum CategoryFlag {
    Positive,
    Moderate,
    Negative,
    InadequateUse,
    ExcessiveUse,
}

impl CategoryFlag {
    pub(crate) const fn as_domain(self) -> Category {
        match self {
            CategoryFlag::Positive => Category::Positive,
            CategoryFlag::Moderate => Category::Moderate,
            CategoryFlag::Negative => Category::Negative,
            CategoryFlag::InadequateUse => Category::InadequateUse,
            CategoryFlag::ExcessiveUse => Category::ExcessiveUse,
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
pub(crate) enum HelperTableFlag {
    Qualificacoes,
    Naturezas,
    Cnaes,
}

impl HelperTableFlag {
    pub(crate) const fn as_domain(self) -> HelperTable {
        match self {
            HelperTableFlag::Qualificacoes => HelperTable::Qualificacoes,
            HelperTableFlag::Naturezas => HelperTable::Naturezas,
            HelperTableFlag::Cnaes => HelperTable::Cnaes,
        }
    }
}
