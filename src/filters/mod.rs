pub mod genotype;
pub mod ideal;
pub mod inheritance;
pub mod phenotype;
pub mod resolution;

pub use genotype::*;
pub use ideal::*;
pub use inheritance::*;
pub use phenotype::*;
pub use resolution::*;
